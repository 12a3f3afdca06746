//! Provider adapter seam for dependency injection

use async_trait::async_trait;
use shared::{ProviderFailure, ProviderId};

use crate::types::EnhancedRequest;

/// One external text-to-image provider
///
/// Each adapter hides its provider's request shape and response format and
/// returns a normalized `data:<mime>;base64,<payload>` URI. Adapters never
/// retry internally; the orchestrator calls each configured provider at most
/// once per request.
#[mockall::automock]
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Stable identifier, also used as the reported service tag
    fn id(&self) -> ProviderId;

    /// Generate one image for the enhanced request
    async fn generate(&self, request: &EnhancedRequest) -> Result<String, ProviderFailure>;
}
