//! Physical line handling and logical card assembly
//!
//! The lexer is purely structural. It knows about the message block, title,
//! block separators, comments, and continuations, but nothing about what any
//! card means.

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::diagnostic::{Code, Diagnostic, Pass, Severity, Span};
use crate::format::f;

/// Physical lines longer than this are reported
pub const MAX_LINE_LENGTH: usize = 128;

/// Leading indent that marks a continuation line
pub const CONTINUATION_INDENT: usize = 5;

const TAB_STOP: usize = 8;

/// Classification of a logical line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LineKind {
    BlankSeparator,
    CommentFull,
    CommentInline,
    CardBody,
}

/// The three blocks of a deck, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Block {
    Cells,
    Surfaces,
    Data,
}

impl Block {
    pub const ALL: [Block; 3] = [Block::Cells, Block::Surfaces, Block::Data];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cells => "cell",
            Self::Surfaces => "surface",
            Self::Data => "data",
        }
    }
}

/// A card or a stand-alone comment/blank line with its source lines
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalLine {
    pub kind: LineKind,
    pub span: Span,
    /// Joined card body for [LineKind::CardBody], otherwise empty
    pub text: String,
    /// Inline `$` comments
    pub comments: Vec<String>,
    /// Physical lines as read, after tab normalisation
    pub raw: Vec<String>,
}

impl LogicalLine {
    fn single(kind: LineKind, number: usize, raw: &str) -> Self {
        Self {
            kind,
            span: Span::line(number),
            text: String::new(),
            comments: Vec::new(),
            raw: vec![raw.to_string()],
        }
    }
}

/// Lexer output: everything needed to rebuild the deck text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexed {
    /// `message:` block lines, including the terminating blank
    pub message: Vec<String>,
    pub title: String,
    /// 1-based line of the title, 0 for an empty input
    pub title_line: usize,
    /// Logical lines of the cell, surface, and data blocks
    pub blocks: [Vec<LogicalLine>; 3],
    /// Line number and text of each block separator found
    pub separators: Vec<(usize, String)>,
    /// Blank lines after the data block
    pub trailing: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

// card under construction
struct Pending {
    span: Span,
    raw: Vec<String>,
    body: Vec<String>,
    comments: Vec<String>,
    ampersand: bool,
}

impl Pending {
    fn new(number: usize) -> Self {
        Self {
            span: Span::line(number),
            raw: Vec::new(),
            body: Vec::new(),
            comments: Vec::new(),
            ampersand: false,
        }
    }

    fn push_body(&mut self, number: usize, line: &str) {
        let (body, comment) = split_inline_comment(line);
        let mut body = body.trim();
        self.ampersand = body.ends_with('&');
        if self.ampersand {
            body = body[..body.len() - 1].trim_end();
        }
        if !body.is_empty() {
            self.body.push(body.to_string());
        }
        if let Some(c) = comment {
            self.comments.push(c.trim().to_string());
        }
        self.raw.push(line.to_string());
        self.span = self.span.merge(Span::line(number));
    }

    fn absorb(&mut self, number: usize, line: String) {
        self.raw.push(line);
        self.span = self.span.merge(Span::line(number));
    }

    fn finish(self) -> LogicalLine {
        LogicalLine {
            kind: LineKind::CardBody,
            span: self.span,
            text: self.body.join(" "),
            comments: self.comments,
            raw: self.raw,
        }
    }
}

/// Split deck text into logical lines
///
/// Structural problems are reported in [Lexed::diagnostics]. Lexing never
/// fails and never drops a physical line.
pub fn lex(text: &str) -> Lexed {
    let mut lexed = Lexed::default();
    let lines = physical_lines(text, &mut lexed.diagnostics);
    let mut n = 0;

    let is_message = lines
        .first()
        .is_some_and(|l| l.trim_start().to_lowercase().starts_with("message:"));
    if is_message {
        while n < lines.len() {
            let blank = lines[n].trim().is_empty();
            lexed.message.push(lines[n].clone());
            n += 1;
            if blank {
                break;
            }
        }
        debug!("Message block of {} lines", lexed.message.len());
    }

    match lines.get(n) {
        Some(title) => {
            lexed.title = title.clone();
            lexed.title_line = n + 1;
            if title.trim().is_empty() {
                lexed.diagnostics.push(
                    Diagnostic::new(
                        Severity::Warning,
                        Pass::Lexical,
                        Code::EmptyTitle,
                        "title line is empty",
                    )
                    .at(Span::line(n + 1)),
                );
            }
            n += 1;
        }
        None => lexed.diagnostics.push(Diagnostic::new(
            Severity::Warning,
            Pass::Lexical,
            Code::EmptyTitle,
            "deck has no title line",
        )),
    }

    let mut block = 0;
    let mut pending: Option<Pending> = None;
    let mut held: Vec<LogicalLine> = Vec::new();

    let mut i = n;
    while i < lines.len() {
        let number = i + 1;
        let line = &lines[i];

        if line.trim().is_empty() {
            flush(&mut lexed.blocks[block], &mut pending, &mut held);
            if block < 2 {
                trace!("Block separator at line {number}");
                lexed.separators.push((number, line.clone()));
                block += 1;
            } else if lines[i..].iter().all(|l| l.trim().is_empty()) {
                lexed.trailing = lines[i..].to_vec();
                break;
            } else {
                lexed.diagnostics.push(
                    Diagnostic::new(
                        Severity::Error,
                        Pass::Lexical,
                        Code::ExtraBlockSeparator,
                        "blank line inside the data block",
                    )
                    .at(Span::line(number))
                    .with_hint("remove the blank line or comment it out"),
                );
                lexed.blocks[2].push(LogicalLine::single(
                    LineKind::BlankSeparator,
                    number,
                    line,
                ));
            }
        } else if is_full_comment(line) {
            held.push(LogicalLine::single(LineKind::CommentFull, number, line));
        } else if line.trim_start().starts_with('$') {
            held.push(LogicalLine::single(LineKind::CommentInline, number, line));
        } else {
            let indent = leading_spaces(line);
            let continues = pending
                .as_ref()
                .is_some_and(|c| c.ampersand || indent >= CONTINUATION_INDENT);
            if let (true, Some(card)) = (continues, pending.as_mut()) {
                for comment in held.drain(..) {
                    let (number, raw) = (comment.span.first, comment.raw.concat());
                    card.absorb(number, raw);
                }
                card.push_body(number, line);
            } else {
                if indent >= CONTINUATION_INDENT {
                    lexed.diagnostics.push(
                        Diagnostic::new(
                            Severity::Error,
                            Pass::Lexical,
                            Code::IllegalContinuation,
                            "continuation line with no card to continue",
                        )
                        .at(Span::line(number)),
                    );
                }
                flush(&mut lexed.blocks[block], &mut pending, &mut held);
                let mut card = Pending::new(number);
                card.push_body(number, line);
                pending = Some(card);
            }
        }
        i += 1;
    }
    flush(&mut lexed.blocks[block], &mut pending, &mut held);

    check_structure(&mut lexed, lines.len());
    lexed
}

// close the pending card then emit held comments after it
fn flush(block: &mut Vec<LogicalLine>, pending: &mut Option<Pending>, held: &mut Vec<LogicalLine>) {
    if let Some(card) = pending.take() {
        block.push(card.finish());
    }
    block.append(held);
}

fn check_structure(lexed: &mut Lexed, line_count: usize) {
    let found = lexed.separators.len();
    if found < 2 {
        lexed.diagnostics.push(
            Diagnostic::new(
                Severity::Fatal,
                Pass::Lexical,
                Code::MissingBlockSeparator,
                f!("missing block separator: expected 2 blank lines, found {found}"),
            )
            .at_opt((line_count > 0).then(|| Span::line(line_count))),
        );
        return;
    }

    for b in Block::ALL {
        let has_cards = lexed.blocks[b.index()]
            .iter()
            .any(|l| l.kind == LineKind::CardBody);
        if !has_cards {
            let line = match b {
                Block::Cells => lexed.separators[0].0,
                Block::Surfaces => lexed.separators[1].0,
                Block::Data => line_count,
            };
            lexed.diagnostics.push(
                Diagnostic::new(
                    Severity::Error,
                    Pass::Lexical,
                    Code::EmptyBlock,
                    f!("{} block is empty", b.name()),
                )
                .at(Span::line(line)),
            );
        }
    }
}

/// Split into lines, accepting LF and CRLF, and normalise tabs
fn physical_lines(text: &str, diagnostics: &mut Vec<Diagnostic>) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let body = text.strip_suffix('\n').unwrap_or(text);

    body.split('\n')
        .enumerate()
        .map(|(i, line)| {
            let number = i + 1;
            let line = line.strip_suffix('\r').unwrap_or(line);
            let line = if line.contains('\t') {
                warn!("Tab characters normalised on line {number}");
                diagnostics.push(
                    Diagnostic::new(
                        Severity::Warning,
                        Pass::Lexical,
                        Code::TabCharacter,
                        "tab characters replaced by spaces",
                    )
                    .at(Span::line(number)),
                );
                expand_tabs(line)
            } else {
                line.to_string()
            };

            let length = line.chars().count();
            if length > MAX_LINE_LENGTH {
                diagnostics.push(
                    Diagnostic::new(
                        Severity::Warning,
                        Pass::Lexical,
                        Code::LineTooLong,
                        f!("line is {length} columns, limit is {MAX_LINE_LENGTH}"),
                    )
                    .at(Span::line(number)),
                );
            }
            line
        })
        .collect()
}

/// Leading tabs advance to the next tab stop, any other tab is one space
fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut leading = true;
    for c in line.chars() {
        match c {
            '\t' if leading => {
                let pad = TAB_STOP - out.len() % TAB_STOP;
                out.extend(std::iter::repeat(' ').take(pad));
            }
            '\t' => out.push(' '),
            ' ' => out.push(' '),
            _ => {
                leading = false;
                out.push(c);
            }
        }
    }
    out
}

/// `c` or `C` within the first five columns, then a space or end of line
pub fn is_full_comment(line: &str) -> bool {
    let trimmed = line.trim_start_matches(' ');
    let column = line.len() - trimmed.len();
    let mut chars = trimmed.chars();
    column < CONTINUATION_INDENT
        && matches!(chars.next(), Some('c' | 'C'))
        && chars.next().map_or(true, |c| c == ' ')
}

/// Separate the card body from a trailing `$` comment
pub fn split_inline_comment(line: &str) -> (&str, Option<&str>) {
    match line.find('$') {
        Some(i) => (&line[..i], Some(&line[i + 1..])),
        None => (line, None),
    }
}

pub fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

#[cfg(test)]
mod lexer_tests {
    use super::*;

    fn codes(lexed: &Lexed) -> Vec<Code> {
        lexed.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn three_blocks() {
        let lexed = lex("title\n1 0 -1\n\n1 so 5\n\nmode n\n");
        assert!(lexed.diagnostics.is_empty());
        assert_eq!(lexed.title, "title");
        assert_eq!(lexed.blocks[0].len(), 1);
        assert_eq!(lexed.blocks[1][0].text, "1 so 5");
        assert_eq!(lexed.blocks[2][0].span, Span::line(6));
        assert_eq!(lexed.separators.len(), 2);
    }

    #[test]
    fn crlf_line_endings() {
        let lexed = lex("title\r\n1 0 -1\r\n\r\n1 so 5\r\n\r\nmode n\r\n");
        assert!(lexed.diagnostics.is_empty());
        assert_eq!(lexed.blocks[2][0].text, "mode n");
    }

    #[test]
    fn missing_separator_is_fatal() {
        let lexed = lex("title\n1 0 -1\n\n1 so 5\n");
        assert_eq!(codes(&lexed), vec![Code::MissingBlockSeparator]);
        assert_eq!(lexed.diagnostics[0].severity, Severity::Fatal);
    }

    #[test]
    fn extra_separator_is_error() {
        let lexed = lex("t\n1 0 -1\n\n1 so 5\n\nmode n\n\nnps 10\n");
        assert_eq!(codes(&lexed), vec![Code::ExtraBlockSeparator]);
        assert_eq!(lexed.diagnostics[0].span, Some(Span::line(7)));
        assert_eq!(lexed.blocks[2].len(), 3);
    }

    #[test]
    fn trailing_blanks_allowed() {
        let lexed = lex("t\n1 0 -1\n\n1 so 5\n\nmode n\n\n\n");
        assert!(lexed.diagnostics.is_empty());
        assert_eq!(lexed.trailing.len(), 2);
    }

    #[test]
    fn indent_and_ampersand_continuations() {
        let text = "t\n1 0 -1 &\nimp:n=1\n2 0 1\n      imp:n=0 $ outside\n\n1 so 5\n\nmode n\n";
        let lexed = lex(text);
        let cells = &lexed.blocks[0];
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].text, "1 0 -1 imp:n=1");
        assert_eq!(cells[0].span, Span::new(2, 3));
        assert_eq!(cells[1].text, "2 0 1 imp:n=0");
        assert_eq!(cells[1].comments, vec!["outside"]);
    }

    #[test]
    fn comment_inside_continuation_is_absorbed() {
        let text = "t\n1 0 -1\nc note\n     imp:n=1\nc after\n\n1 so 5\n\nmode n\n";
        let lexed = lex(text);
        let cells = &lexed.blocks[0];
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].span, Span::new(2, 4));
        assert_eq!(cells[0].raw.len(), 3);
        assert_eq!(cells[1].kind, LineKind::CommentFull);
    }

    #[test]
    fn comment_rules() {
        assert!(is_full_comment("c comment"));
        assert!(is_full_comment("C"));
        assert!(is_full_comment("    c indented"));
        assert!(!is_full_comment("     c too far"));
        assert!(!is_full_comment("cut:n j 0.1"));
    }

    #[test]
    fn tabs_normalised_and_warned() {
        let lexed = lex("t\n1 0 -1\n\tIMP:N=1\n\n1 so 5\n\nmode n\n");
        assert_eq!(codes(&lexed), vec![Code::TabCharacter]);
        assert_eq!(lexed.blocks[0][0].text, "1 0 -1 IMP:N=1");
    }

    #[test]
    fn long_line_warned() {
        let long = f!("1 0 -1 {}", "1 ".repeat(70));
        let lexed = lex(&f!("t\n{long}\n\n1 so 5\n\nmode n\n"));
        assert_eq!(codes(&lexed), vec![Code::LineTooLong]);
    }

    #[test]
    fn message_block_and_empty_title() {
        let lexed = lex("message: i=a.i\n\n \n1 0 -1\n\n1 so 5\n\nmode n\n");
        assert_eq!(lexed.message.len(), 2);
        assert_eq!(lexed.title_line, 3);
        assert_eq!(codes(&lexed), vec![Code::EmptyTitle]);
    }

    #[test]
    fn illegal_leading_continuation() {
        let lexed = lex("t\n      1 0 -1\n\n1 so 5\n\nmode n\n");
        assert_eq!(codes(&lexed), vec![Code::IllegalContinuation]);
    }

    #[test]
    fn empty_block() {
        let lexed = lex("t\n1 0 -1\n\nc only a comment\n\nmode n\n");
        assert_eq!(codes(&lexed), vec![Code::EmptyBlock]);
    }
}
