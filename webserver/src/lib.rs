//! HTTP boundary for the artmint orchestrators
//!
//! Thin axum layer over the generator and chain crates: request validation,
//! JSON shaping and the IPFS pinning service. All orchestration semantics
//! live below this crate.

pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod web;

pub use error::{WebServerError, WebServerResult};
pub use state::AppState;
pub use traits::{IpfsPinner, MockIpfsPinner};
pub use web::build_router;
