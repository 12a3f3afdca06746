//! Shared failure taxonomy for external calls
//!
//! Every provider adapter and contract read maps its transport-level outcome
//! into [`ProviderFailure`]. Orchestrators never let these escape their
//! boundary; they convert them into "try next provider" (image side) or
//! "field unavailable" (chain side).

use thiserror::Error;

/// Failure of one external call (image provider, RPC read or metadata fetch)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderFailure {
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("service unavailable")]
    ServiceUnavailable,

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("timed out after {0} seconds")]
    Timeout(u64),
}

impl ProviderFailure {
    /// Rate-limit predicate used by the retry wrapper
    ///
    /// Detection lives at the transport where the provider-specific marker is
    /// known (HTTP 429, or a marker substring in an RPC error body); callers
    /// only ever check this predicate.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ProviderFailure::RateLimited)
    }

    /// Map a non-success HTTP status to a failure variant
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            401 | 403 => ProviderFailure::AuthenticationFailed,
            429 => ProviderFailure::RateLimited,
            503 => ProviderFailure::ServiceUnavailable,
            _ => ProviderFailure::Server(body.into()),
        }
    }
}
