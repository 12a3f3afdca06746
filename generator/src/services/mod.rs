//! Adapters for the external text-to-image providers
//!
//! Each adapter owns its provider's request shape and response format and
//! normalizes output to a `data:<mime>;base64,<payload>` URI. Constructors
//! take the HTTP client plus credential; every adapter also exposes a
//! base-URL override for tests.

mod huggingface;
mod mcp;
mod openai;
mod pollinations;
mod replicate;
mod stability;

pub use huggingface::HuggingFaceProvider;
pub use mcp::McpProvider;
pub use openai::OpenAiProvider;
pub use pollinations::{BackupPollinationsProvider, EnhancedPollinationsProvider};
pub use replicate::ReplicateProvider;
pub use stability::StabilityProvider;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use shared::ProviderFailure;

pub(crate) fn network_failure(error: reqwest::Error) -> ProviderFailure {
    ProviderFailure::Network(error.to_string())
}

/// Map a non-success response to a failure, consuming the body for context
pub(crate) async fn failure_from_response(response: reqwest::Response) -> ProviderFailure {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderFailure::from_status(status, &body)
}

/// Fetch an image URL and normalize it to a data URI
pub(crate) async fn fetch_as_data_uri(
    client: &reqwest::Client,
    url: &str,
    mime: &str,
) -> Result<String, ProviderFailure> {
    let response = client.get(url).send().await.map_err(network_failure)?;
    if !response.status().is_success() {
        return Err(failure_from_response(response).await);
    }
    let bytes = response.bytes().await.map_err(network_failure)?;
    Ok(encode_data_uri(&bytes, mime))
}

pub(crate) fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}
