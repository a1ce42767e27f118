//! Result and Error types for idate-editor
use itertools::Itertools;

use crate::violation::Violation;

/// Type alias for `Result<T, editor::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `idate-editor` crate
///
/// An edit that would break the deck is refused with every [Violation] it
/// would introduce, and nothing is written.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to read deck")]
    DeckError(#[from] idate_deck::Error),

    #[error("invalid pattern")]
    RegexError(#[from] regex::Error),

    #[error("failed to (de)serialise index")]
    IndexError(#[from] bincode::Error),

    #[error("edit refused: {}", .0.iter().join("; "))]
    Refused(Vec<Violation>),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} changed since the dry run")]
    StaleFile(String),
}

impl Error {
    /// Violations behind a refused edit, empty for anything else
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Refused(v) => v,
            _ => &[],
        }
    }
}
