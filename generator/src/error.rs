//! Generator error types

use thiserror::Error;

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Generator error types
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Every configured provider was tried once and failed
    #[error("all image generation providers failed")]
    AllProvidersFailed,

    /// A collection run produced zero successful items
    #[error("no items could be generated for the collection")]
    EmptyCollection,

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl GeneratorError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        GeneratorError::InvalidRequest {
            message: message.into(),
        }
    }
}
