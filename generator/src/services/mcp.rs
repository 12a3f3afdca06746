//! Local MCP bridge adapter
//!
//! Talks to a locally running tool server that fronts a stable-diffusion
//! backend. The bridge is loose about its response shape, so the image is
//! looked up under several keys and bare base64 payloads are wrapped into a
//! data URI.

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use shared::{ProviderFailure, ProviderId};
use std::sync::OnceLock;

use crate::services::{failure_from_response, network_failure};
use crate::traits::ImageProvider;
use crate::types::EnhancedRequest;

const IMAGE_KEYS: [&str; 4] = ["image_data", "imageData", "image", "data"];

fn data_uri_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^data:image/[a-zA-Z+]+;base64,").unwrap()
    })
}

pub struct McpProvider {
    client: reqwest::Client,
    server_url: String,
}

impl McpProvider {
    pub fn new(client: reqwest::Client, server_url: String) -> Self {
        Self { client, server_url }
    }
}

#[async_trait]
impl ImageProvider for McpProvider {
    fn id(&self) -> ProviderId {
        ProviderId::McpLocal
    }

    async fn generate(&self, request: &EnhancedRequest) -> Result<String, ProviderFailure> {
        let response = self
            .client
            .post(format!("{}/api/mcp-generate", self.server_url))
            .json(&json!({
                "server_name": "stable-diffusion",
                "tool_name": "generate_image",
                "arguments": {
                    "prompt": request.prompt,
                    "negative_prompt": request.negative_prompt,
                    "width": request.width,
                    "height": request.height,
                    "steps": request.num_inference_steps,
                    "cfg_scale": request.guidance_scale,
                }
            }))
            .send()
            .await
            .map_err(network_failure)?;

        if !response.status().is_success() {
            return Err(failure_from_response(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderFailure::InvalidResponse(e.to_string()))?;

        let image = IMAGE_KEYS
            .iter()
            .find_map(|key| body.get(key).and_then(Value::as_str))
            .ok_or_else(|| {
                ProviderFailure::InvalidResponse("no image field in bridge response".to_string())
            })?;

        if data_uri_pattern().is_match(image) {
            Ok(image.to_string())
        } else {
            Ok(format!("data:image/png;base64,{image}"))
        }
    }
}
