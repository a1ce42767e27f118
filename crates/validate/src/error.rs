//! Result and Error types for idate-validate

/// Type alias for `Result<T, validate::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `idate-validate` crate
///
/// Problems with the deck itself are never errors. They are reported as
/// diagnostics in a [Report](crate::Report).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to read deck")]
    DeckError(#[from] idate_deck::Error),

    #[error("failed to (de)serialise json")]
    JsonError(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
