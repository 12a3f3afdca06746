//! Pollinations adapters (keyless)
//!
//! Two independent endpoints of the same free service. The enhanced endpoint
//! picks a model by prompt keywords and asks for server-side enhancement; the
//! backup endpoint is a plainer fallback with a sanitized prompt. Both are
//! always registered, so the chain has network-backed options even with no
//! credentials configured.

use async_trait::async_trait;
use rand::Rng;
use regex::Regex;
use shared::{ProviderFailure, ProviderId};
use std::sync::OnceLock;

use crate::services::{encode_data_uri, failure_from_response, network_failure};
use crate::traits::ImageProvider;
use crate::types::EnhancedRequest;

const ENHANCED_BASE_URL: &str = "https://image.pollinations.ai";
const BACKUP_BASE_URL: &str = "https://pollinations.ai";

/// Model choice by prompt keywords
fn select_model(prompt: &str) -> &'static str {
    let lower = prompt.to_lowercase();
    if lower.contains("realistic") || lower.contains("photo") {
        "flux-realism"
    } else if lower.contains("3d") || lower.contains("render") {
        "flux-3d"
    } else if lower.contains("fast") || lower.contains("quick") {
        "turbo"
    } else {
        "flux"
    }
}

pub struct EnhancedPollinationsProvider {
    client: reqwest::Client,
    base_url: String,
}

impl EnhancedPollinationsProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: ENHANCED_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageProvider for EnhancedPollinationsProvider {
    fn id(&self) -> ProviderId {
        ProviderId::EnhancedPollinations
    }

    async fn generate(&self, request: &EnhancedRequest) -> Result<String, ProviderFailure> {
        let seed: u32 = rand::thread_rng().gen_range(0..1_000_000);
        let url = format!(
            "{}/prompt/{}?width={}&height={}&seed={seed}&enhance=true&model={}&nologo=true&private=false",
            self.base_url,
            urlencoding::encode(&request.prompt),
            request.width,
            request.height,
            select_model(&request.prompt),
        );

        let response = self.client.get(url).send().await.map_err(network_failure)?;
        if !response.status().is_success() {
            return Err(failure_from_response(response).await);
        }
        let bytes = response.bytes().await.map_err(network_failure)?;
        if bytes.is_empty() {
            return Err(ProviderFailure::InvalidResponse(
                "empty image body".to_string(),
            ));
        }
        Ok(encode_data_uri(&bytes, "image/jpeg"))
    }
}

fn unsafe_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^\w\s,.-]").unwrap())
}

pub struct BackupPollinationsProvider {
    client: reqwest::Client,
    base_url: String,
}

impl BackupPollinationsProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: BACKUP_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageProvider for BackupPollinationsProvider {
    fn id(&self) -> ProviderId {
        ProviderId::BackupPollinations
    }

    async fn generate(&self, request: &EnhancedRequest) -> Result<String, ProviderFailure> {
        let cleaned = unsafe_chars().replace_all(&request.prompt, "");
        let url = format!(
            "{}/p/{}?width={}&height={}&model=flux&enhance=true",
            self.base_url,
            urlencoding::encode(&cleaned),
            request.width,
            request.height,
        );

        let response = self.client.get(url).send().await.map_err(network_failure)?;
        if !response.status().is_success() {
            return Err(failure_from_response(response).await);
        }
        let bytes = response.bytes().await.map_err(network_failure)?;
        if bytes.is_empty() {
            return Err(ProviderFailure::InvalidResponse(
                "empty image body".to_string(),
            ));
        }
        Ok(encode_data_uri(&bytes, "image/jpeg"))
    }
}
