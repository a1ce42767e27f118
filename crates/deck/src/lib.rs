#![doc = include_str!("../readme.md")]

mod cards;
mod deck;
mod diagnostic;
mod error;
mod format;
pub mod lexer;
mod parsers;
mod particle;
mod reader;
pub mod rotation;

// flatten public API and inline the documentation
#[doc(inline)]
pub use cards::*;

#[doc(inline)]
pub use deck::{Deck, Entry, Parsed};

#[doc(inline)]
pub use diagnostic::{sort_diagnostics, Code, Diagnostic, Pass, Severity, SourceSpan, Span};

#[doc(inline)]
pub use error::{Error, ParseError, Result};

#[doc(inline)]
pub use format::{compact_repeats, f, wrap_card, wrap_words, CardNumber, CARD_WIDTH, CONTINUATION};

#[doc(inline)]
pub use lexer::{lex, Block, LineKind, LogicalLine};

#[doc(inline)]
pub use parsers::MAX_EXPANDED_VALUES;

#[doc(inline)]
pub use particle::Particle;

#[doc(inline)]
pub use reader::parse_card;
