//! Hugging Face inference API adapter (SDXL base)

use async_trait::async_trait;
use serde_json::json;
use shared::{ProviderFailure, ProviderId};

use crate::services::{encode_data_uri, failure_from_response, network_failure};
use crate::traits::ImageProvider;
use crate::types::EnhancedRequest;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";

pub struct HuggingFaceProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl HuggingFaceProvider {
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
impl ImageProvider for HuggingFaceProvider {
    fn id(&self) -> ProviderId {
        ProviderId::HuggingFace
    }

    async fn generate(&self, request: &EnhancedRequest) -> Result<String, ProviderFailure> {
        let response = self
            .client
            .post(format!("{}/models/{MODEL}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "inputs": request.prompt,
                "parameters": {
                    "negative_prompt": request.negative_prompt,
                    "width": request.width,
                    "height": request.height,
                    "num_inference_steps": request.num_inference_steps,
                    "guidance_scale": request.guidance_scale,
                }
            }))
            .send()
            .await
            .map_err(network_failure)?;

        if !response.status().is_success() {
            return Err(failure_from_response(response).await);
        }

        // The inference API answers with raw image bytes
        let bytes = response.bytes().await.map_err(network_failure)?;
        if bytes.is_empty() {
            return Err(ProviderFailure::InvalidResponse(
                "empty image body".to_string(),
            ));
        }
        Ok(encode_data_uri(&bytes, "image/jpeg"))
    }
}
