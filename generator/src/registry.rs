//! Provider registry built once at startup
//!
//! Replaces ambient process-state checks: credentials are read from the
//! environment exactly once, validated, and the resulting ordered provider
//! list is injected into the orchestrator. The fallback precedence among
//! configured providers is fixed here.

use std::sync::Arc;

use shared::ProviderId;
use tracing::info;

use crate::services::{
    BackupPollinationsProvider, EnhancedPollinationsProvider, HuggingFaceProvider,
    McpProvider, OpenAiProvider, ReplicateProvider, StabilityProvider,
};
use crate::traits::ImageProvider;

/// Credentials for the external providers, read once at startup
///
/// A credential is only kept when it is non-empty, not one of the
/// `your_..._here` template placeholders, and carries the provider's literal
/// key prefix. Pollinations needs no credential; the local MCP bridge is
/// configured by its URL.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    pub huggingface_key: Option<String>,
    pub replicate_token: Option<String>,
    pub openai_key: Option<String>,
    pub stability_key: Option<String>,
    pub mcp_url: Option<String>,
}

impl ProviderCredentials {
    /// Load from `.env` (if present) and the process environment
    pub fn from_env() -> Self {
        // Safe to call repeatedly; already-set variables win
        let _ = dotenvy::dotenv();

        Self {
            huggingface_key: valid_key("HUGGINGFACE_API_KEY", Some("hf_")),
            replicate_token: valid_key("REPLICATE_API_TOKEN", Some("r8_")),
            openai_key: valid_key("OPENAI_API_KEY", Some("sk-")),
            stability_key: valid_key("STABILITY_API_KEY", Some("sk-")),
            mcp_url: valid_key("MCP_SERVER_URL", None),
        }
    }
}

/// Read and validate one credential from the environment
fn valid_key(var: &str, prefix: Option<&str>) -> Option<String> {
    let value = std::env::var(var).ok()?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return None;
    }
    // Template placeholders left in .env files count as absent
    if value.starts_with("your_") && value.ends_with("_here") {
        return None;
    }
    if let Some(prefix) = prefix {
        if !value.starts_with(prefix) {
            return None;
        }
    }
    Some(value)
}

/// Ordered set of configured providers
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ImageProvider>>,
}

impl ProviderRegistry {
    /// Registry with an explicit provider list, in fallback order
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>) -> Self {
        Self { providers }
    }

    /// Build the real adapters for every configured credential
    ///
    /// Precedence is fixed: HuggingFace, Replicate, MCP, OpenAI, Stability,
    /// then the two keyless Pollinations endpoints.
    pub fn from_credentials(credentials: &ProviderCredentials, client: reqwest::Client) -> Self {
        let mut providers: Vec<Arc<dyn ImageProvider>> = Vec::new();

        if let Some(key) = &credentials.huggingface_key {
            providers.push(Arc::new(HuggingFaceProvider::new(client.clone(), key.clone())));
        }
        if let Some(token) = &credentials.replicate_token {
            providers.push(Arc::new(ReplicateProvider::new(client.clone(), token.clone())));
        }
        if let Some(url) = &credentials.mcp_url {
            providers.push(Arc::new(McpProvider::new(client.clone(), url.clone())));
        }
        if let Some(key) = &credentials.openai_key {
            providers.push(Arc::new(OpenAiProvider::new(client.clone(), key.clone())));
        }
        if let Some(key) = &credentials.stability_key {
            providers.push(Arc::new(StabilityProvider::new(client.clone(), key.clone())));
        }
        providers.push(Arc::new(EnhancedPollinationsProvider::new(client.clone())));
        providers.push(Arc::new(BackupPollinationsProvider::new(client)));

        let registry = Self { providers };
        info!(providers = ?registry.ids(), "provider registry initialized");
        registry
    }

    pub fn providers(&self) -> &[Arc<dyn ImageProvider>] {
        &self.providers
    }

    pub fn ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|p| p.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_keys_rejected() {
        std::env::set_var("TEST_PLACEHOLDER_KEY", "your_huggingface_key_here");
        assert_eq!(valid_key("TEST_PLACEHOLDER_KEY", None), None);
        std::env::remove_var("TEST_PLACEHOLDER_KEY");
    }

    #[test]
    fn test_prefix_enforced() {
        std::env::set_var("TEST_PREFIX_KEY", "not-a-replicate-token");
        assert_eq!(valid_key("TEST_PREFIX_KEY", Some("r8_")), None);
        std::env::set_var("TEST_PREFIX_KEY", "r8_abc123");
        assert_eq!(
            valid_key("TEST_PREFIX_KEY", Some("r8_")),
            Some("r8_abc123".to_string())
        );
        std::env::remove_var("TEST_PREFIX_KEY");
    }

    #[test]
    fn test_keyless_registry_still_has_pollinations() {
        let registry = ProviderRegistry::from_credentials(
            &ProviderCredentials::default(),
            reqwest::Client::new(),
        );
        assert_eq!(
            registry.ids(),
            vec![
                ProviderId::EnhancedPollinations,
                ProviderId::BackupPollinations
            ]
        );
    }
}
