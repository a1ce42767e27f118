//! Result and Error types for idate-catalogue

/// Type alias for `Result<T, catalogue::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `idate-catalogue` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to read catalogue tables")]
    JsonError(#[from] serde_json::Error),

    #[error("material class \"{name}\" has an empty range {first}-{last}")]
    EmptyClassRange { name: String, first: u32, last: u32 },
}
