//! Service trait definitions for dependency injection

use async_trait::async_trait;
use serde_json::Value;
use shared::ProviderFailure;

/// Pins content to IPFS and returns a gateway URL
#[mockall::automock]
#[async_trait]
pub trait IpfsPinner: Send + Sync {
    /// Pin raw file bytes under `file_name`
    async fn pin_file(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, ProviderFailure>;

    /// Pin a JSON document under `name`
    async fn pin_json(&self, document: &Value, name: &str) -> Result<String, ProviderFailure>;
}
