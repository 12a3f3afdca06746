//! Stability AI adapter (SDXL 1024 text-to-image)

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use shared::{ProviderFailure, ProviderId};

use crate::services::{failure_from_response, network_failure};
use crate::traits::ImageProvider;
use crate::types::EnhancedRequest;

const DEFAULT_BASE_URL: &str = "https://api.stability.ai";
const ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: String,
}

pub struct StabilityProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl StabilityProvider {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageProvider for StabilityProvider {
    fn id(&self) -> ProviderId {
        ProviderId::StabilityAi
    }

    async fn generate(&self, request: &EnhancedRequest) -> Result<String, ProviderFailure> {
        let response = self
            .client
            .post(format!(
                "{}/v1/generation/{ENGINE}/text-to-image",
                self.base_url
            ))
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .json(&json!({
                "text_prompts": [
                    { "text": request.prompt, "weight": 1 },
                    { "text": request.negative_prompt, "weight": -1 },
                ],
                "cfg_scale": 7,
                "width": request.width,
                "height": request.height,
                "samples": 1,
                "steps": 50,
            }))
            .send()
            .await
            .map_err(network_failure)?;

        if !response.status().is_success() {
            return Err(failure_from_response(response).await);
        }

        let body: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::InvalidResponse(e.to_string()))?;
        let artifact = body.artifacts.first().ok_or_else(|| {
            ProviderFailure::InvalidResponse("no artifacts in response".to_string())
        })?;
        Ok(format!("data:image/png;base64,{}", artifact.base64))
    }
}
