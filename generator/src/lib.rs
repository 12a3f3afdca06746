//! Image generation orchestrator
//!
//! Produces one normalized image per request by walking an ordered chain of
//! external text-to-image providers, falling back to a deterministic
//! procedural renderer when every configured provider fails. Collection
//! (batch) generation drives the same chain once per item with pacing and
//! partial-failure tolerance.

pub mod core;
pub mod error;
pub mod registry;
pub mod services;
pub mod traits;
pub mod types;

pub use crate::core::collection::CollectionGenerator;
pub use crate::core::orchestrator::ImageOrchestrator;
pub use error::{GeneratorError, GeneratorResult};
pub use registry::{ProviderCredentials, ProviderRegistry};
pub use traits::{ImageProvider, MockImageProvider};
