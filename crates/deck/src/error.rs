//! Result and Error types for idate-deck
use crate::diagnostic::{Code, Diagnostic, Pass, Severity, Span};
use crate::format::f;

/// Type alias for `Result<T, deck::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `idate-deck` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to infer particle from \"{0}\"")]
    UnknownParticle(String),

    #[error("card could not be parsed: {0}")]
    Card(#[from] ParseError),
}

/// Reasons a single card can fail to parse
///
/// These never abort reading a deck. The reader converts them into
/// [Diagnostic]s on the card span and carries on with the next card.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("malformed card: {0}")]
    MalformedCard(String),

    #[error("unknown surface mnemonic \"{0}\"")]
    UnknownMnemonic(String),

    #[error("bad value for \"{key}\": {reason}")]
    BadParameter { key: String, reason: String },

    #[error("{what} expects {expected} values, found {found}")]
    WrongArity {
        what: String,
        expected: String,
        found: usize,
    },

    #[error("repeat \"{0}\" has no preceding value")]
    RunLengthWithoutPredecessor(String),

    #[error("fill array needs {required} entries, found {provided}")]
    FillArrayLengthMismatch { required: usize, provided: usize },
}

impl ParseError {
    /// Shorthand for a [ParseError::BadParameter]
    pub fn bad(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadParameter {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Diagnostic code matching the error kind
    pub fn code(&self) -> Code {
        match self {
            Self::MalformedCard(_) => Code::MalformedCard,
            Self::UnknownMnemonic(_) => Code::UnknownMnemonic,
            Self::BadParameter { .. } => Code::BadParameter,
            Self::WrongArity { .. } => Code::WrongArity,
            Self::RunLengthWithoutPredecessor(_) => Code::RunLengthWithoutPredecessor,
            Self::FillArrayLengthMismatch { .. } => Code::FillArrayLengthMismatch,
        }
    }

    /// Report the failure as a parse error on the given lines
    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        Diagnostic::new(Severity::Error, Pass::Parse, self.code(), self.to_string()).at(span)
    }
}

// nom errors only ever surface as malformed cards
impl From<nom::Err<nom::error::Error<&str>>> for ParseError {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        match err {
            nom::Err::Incomplete(_) => Self::MalformedCard("unexpected end of card".into()),
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                Self::MalformedCard(f!("unexpected input near \"{}\"", e.input))
            }
        }
    }
}
