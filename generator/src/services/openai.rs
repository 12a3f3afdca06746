//! OpenAI image generation adapter (DALL-E 3)

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use shared::{ProviderFailure, ProviderId};

use crate::services::{failure_from_response, fetch_as_data_uri, network_failure};
use crate::traits::ImageProvider;
use crate::types::EnhancedRequest;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageEntry>,
}

#[derive(Debug, Deserialize)]
struct ImageEntry {
    url: String,
}

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
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
impl ImageProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    async fn generate(&self, request: &EnhancedRequest) -> Result<String, ProviderFailure> {
        // DALL-E 3 has no negative-prompt parameter and fixes its own sizes
        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": "dall-e-3",
                "prompt": request.prompt,
                "n": 1,
                "size": "1024x1024",
                "quality": "hd",
                "style": "vivid",
            }))
            .send()
            .await
            .map_err(network_failure)?;

        if !response.status().is_success() {
            return Err(failure_from_response(response).await);
        }

        let body: ImagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::InvalidResponse(e.to_string()))?;
        let entry = body.data.first().ok_or_else(|| {
            ProviderFailure::InvalidResponse("empty image list".to_string())
        })?;
        fetch_as_data_uri(&self.client, &entry.url, "image/png").await
    }
}
