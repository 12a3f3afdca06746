//! WebServer-specific error types

use thiserror::Error;

/// Result type for webserver operations
pub type WebServerResult<T> = Result<T, WebServerError>;

/// WebServer error types
#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}
