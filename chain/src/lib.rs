//! Blockchain read orchestrator
//!
//! Reconciles a wallet's on-chain state (factory collections plus minted
//! tokens) into a local snapshot. All reads go through a retry wrapper that
//! retries rate limits only; any other failure degrades the affected field
//! instead of failing the whole load.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

pub use crate::core::reconciler::{ChainReconciler, PacingConfig};
pub use crate::core::retry::RetryPolicy;
pub use crate::core::store::ChainStore;
pub use error::{ChainError, ChainResult};
pub use services::{HttpMetadataFetcher, RpcContractReader};
pub use traits::{ContractReader, MetadataFetcher, MockContractReader, MockMetadataFetcher};
pub use types::{ChainSnapshot, CollectionInfo};
