//! Shared types for the artmint orchestration stack
//!
//! Contains the domain types that cross crate boundaries: provider
//! identifiers, generation requests/results, the on-chain mirror records and
//! the provider failure taxonomy. Component-internal types stay in their
//! respective crates.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
