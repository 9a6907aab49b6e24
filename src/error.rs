//! Error types shared by every module of the crate.

use thiserror::Error;

/// Errors produced by the digest, cipher and generator modules.
///
/// All operations are pure and deterministic, so none of these are worth
/// retrying: the same input reproduces the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Caller supplied an argument the operation cannot accept
    /// (key length, key size, ciphertext length, generator modulus, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Decrypted or framed data failed validation.
    #[error("Corrupted data: {0}")]
    CorruptedData(String),

    /// The operation needs state that was never initialized, or was consumed.
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn corrupted(msg: impl Into<String>) -> Self {
        Error::CorruptedData(msg.into())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::CorruptedData(format!("decrypted bytes are not valid UTF-8: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::CorruptedData(format!("malformed file metadata: {}", err))
    }
}
