use thiserror::Error;

/// Errors raised by series handling, classification and generation.
///
/// An empty historical slice is not an error: generators return `Ok(None)` so that batch
/// callers can skip it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    /// Unknown sky condition, sampling method, month, column or an out-of-range parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Empty or non-monotonic time index, uninferable resolution, ragged columns.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl SynthError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn malformed_input(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;
