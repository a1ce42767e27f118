//! Locating card words in the physical lines they were read from

use idate_deck::lexer::{is_full_comment, split_inline_comment};
use idate_deck::Card;

/// One word of a card body and where it sits in the deck text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    /// 0-based index into the deck lines
    pub line: usize,
    /// Byte range within that line
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Body words of a card in order, skipping comments and `&` markers
///
/// `=` separates words like whitespace, so `imp:n=1` gives `imp:n` and `1`.
pub(crate) fn locate(card: &Card) -> Vec<Token> {
    let mut tokens = Vec::new();
    let first = card.span.first - 1;

    for (offset, raw) in card.raw.iter().enumerate() {
        if is_full_comment(raw) || raw.trim_start().starts_with('$') {
            continue;
        }
        let (body, _) = split_inline_comment(raw);
        let body = body.trim_end();
        let body = body.strip_suffix('&').unwrap_or(body);

        let mut start = None;
        for (i, c) in body.char_indices().chain(std::iter::once((body.len(), ' '))) {
            let separator = c.is_whitespace() || c == '=';
            match (start, separator) {
                (None, false) => start = Some(i),
                (Some(s), true) => {
                    tokens.push(Token {
                        line: first + offset,
                        start: s,
                        end: i,
                        text: body[s..i].to_string(),
                    });
                    start = None;
                }
                _ => (),
            }
        }
    }

    tokens
}

/// Replace tokens in place, working from the end of each line
pub(crate) fn replace(lines: &mut [String], mut edits: Vec<(Token, String)>) {
    edits.sort_by(|a, b| (b.0.line, b.0.start).cmp(&(a.0.line, a.0.start)));
    for (token, text) in edits {
        if let Some(line) = lines.get_mut(token.line) {
            line.replace_range(token.start..token.end, &text);
        }
    }
}

/// Position after the last body word of a card, `(line, byte)`
pub(crate) fn body_end(tokens: &[Token]) -> Option<(usize, usize)> {
    tokens.last().map(|t| (t.line, t.end))
}

#[cfg(test)]
mod tokens_tests {
    use super::*;
    use idate_deck::Deck;

    #[test]
    fn words_across_continuations() {
        let deck = Deck::parse("t\n1 1 -7.8 -1 imp:n=1 $ fuel\nc note\n     vol=2 &\n     tmp=1e-8\n2 0 1\n\n1 so 1\n\nm1 1001 1\n").deck;
        let card = deck.cells.iter().find_map(|e| e.card()).unwrap();
        let tokens = locate(card);
        let words: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["1", "1", "-7.8", "-1", "imp:n", "1", "vol", "2", "tmp", "1e-8"]);
        assert_eq!((tokens[2].line, tokens[2].start, tokens[2].end), (1, 4, 8));
        assert_eq!(tokens[6].line, 3);
        assert_eq!(body_end(&tokens), Some((4, 13)));
    }

    #[test]
    fn replacement_keeps_comment() {
        let mut lines = vec!["1 1 -7.8 -1 imp:n=1 $ fuel".to_string()];
        let token = Token { line: 0, start: 4, end: 8, text: "-7.8".into() };
        let imp = Token { line: 0, start: 18, end: 19, text: "1".into() };
        replace(&mut lines, vec![(token, "-10.2".into()), (imp, "2".into())]);
        assert_eq!(lines[0], "1 1 -10.2 -1 imp:n=2 $ fuel");
    }
}
