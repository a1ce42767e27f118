//! Turn lexed lines into typed cards

use std::path::Path;

use log::{debug, info, trace};

use crate::cards::{Card, CardData};
use crate::deck::{Deck, Entry, Parsed};
use crate::diagnostic::sort_diagnostics;
use crate::error::{ParseError, Result};
use crate::lexer::{lex, Block, LineKind, LogicalLine};
use crate::parsers::{parse_cell, parse_data, parse_surface};

/// Parse one card body as a card of the given block
///
/// ```rust
/// # use idate_deck::{parse_card, Block, CardKind};
/// # use idate_deck::lexer::lex;
/// let lexed = lex("t\n1 0 -1\n\n1 so 1\n\nm1 1001 1\n");
/// let card = parse_card(Block::Data, &lexed.blocks[2][0]).unwrap();
/// assert_eq!(card.kind(), CardKind::Material);
/// ```
pub fn parse_card(block: Block, line: &LogicalLine) -> core::result::Result<Card, ParseError> {
    let data = match block {
        Block::Cells => CardData::Cell(parse_cell(&line.text)?),
        Block::Surfaces => CardData::Surface(parse_surface(&line.text)?),
        Block::Data => parse_data(&line.text)?,
    };

    Ok(Card {
        data,
        span: line.span,
        raw: line.raw.clone(),
        text: line.text.clone(),
        comments: line.comments.clone(),
    })
}

/// Read deck text into a [Deck] and its diagnostics
pub(crate) fn read_str(text: &str) -> Parsed {
    let lexed = lex(text);
    let mut diagnostics = lexed.diagnostics;

    let mut blocks: [Vec<Entry>; 3] = Default::default();
    for block in Block::ALL {
        for line in &lexed.blocks[block.index()] {
            let entry = match line.kind {
                LineKind::CardBody => match parse_card(block, line) {
                    Ok(card) => {
                        trace!("{} card at line {}", block.name(), card.span);
                        Entry::Card(card)
                    }
                    Err(e) => {
                        debug!("Line {}: {e}", line.span);
                        diagnostics.push(e.to_diagnostic(line.span));
                        Entry::Invalid(line.clone(), e)
                    }
                },
                _ => Entry::Comment(line.clone()),
            };
            blocks[block.index()].push(entry);
        }
    }

    let [cells, surfaces, data] = blocks;
    let deck = Deck {
        message: lexed.message,
        title: lexed.title,
        title_line: lexed.title_line,
        cells,
        surfaces,
        data,
        separators: lexed.separators,
        trailing: lexed.trailing,
    };

    sort_diagnostics(&mut diagnostics);
    Parsed { deck, diagnostics }
}

/// Read a deck from disk, tagging every diagnostic with the path
pub(crate) fn read_file<P: AsRef<Path>>(path: P) -> Result<Parsed> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    info!("Reading {}", path.display());

    let mut parsed = read_str(&text);
    let file = path.display().to_string();
    for d in parsed.diagnostics.iter_mut() {
        d.file = Some(file.clone());
    }

    debug!(
        "{} cards, {} diagnostics",
        parsed.deck.cards().count(),
        parsed.diagnostics.len()
    );
    Ok(parsed)
}
