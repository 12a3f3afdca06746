//! Chain error types

use thiserror::Error;

/// Result type for chain operations
pub type ChainResult<T> = Result<T, ChainError>;

/// Chain error types
///
/// Transport and decode failures stay inside the crate as
/// `ProviderFailure`; a malformed address is the only error the reconciler
/// surfaces.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("invalid wallet address: {address}")]
    InvalidAddress { address: String },
}
