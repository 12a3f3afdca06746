//! Replicate predictions API adapter (SDXL)
//!
//! Replicate is asynchronous: a prediction is created, then polled until it
//! settles. Polling is capped by a hard deadline so a prediction stuck in
//! `processing` cannot hold the fallback chain forever.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use shared::{ProviderFailure, ProviderId};
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::services::{failure_from_response, fetch_as_data_uri, network_failure};
use crate::traits::ImageProvider;
use crate::types::EnhancedRequest;

const DEFAULT_BASE_URL: &str = "https://api.replicate.com";
const SDXL_VERSION: &str = "39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_POLL_DEADLINE: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

pub struct ReplicateProvider {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
    poll_interval: Duration,
    poll_deadline: Duration,
}

impl ReplicateProvider {
    pub fn new(client: reqwest::Client, api_token: String) -> Self {
        Self {
            client,
            api_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_deadline: DEFAULT_POLL_DEADLINE,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override poll cadence and deadline (tests shrink both)
    pub fn with_polling(mut self, interval: Duration, deadline: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_deadline = deadline;
        self
    }

    async fn create_prediction(
        &self,
        request: &EnhancedRequest,
    ) -> Result<Prediction, ProviderFailure> {
        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .header("Authorization", format!("Token {}", self.api_token))
            .json(&json!({
                "version": SDXL_VERSION,
                "input": {
                    "prompt": request.prompt,
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
        response
            .json()
            .await
            .map_err(|e| ProviderFailure::InvalidResponse(e.to_string()))
    }

    async fn poll_prediction(&self, id: &str) -> Result<Prediction, ProviderFailure> {
        let response = self
            .client
            .get(format!("{}/v1/predictions/{id}", self.base_url))
            .header("Authorization", format!("Token {}", self.api_token))
            .send()
            .await
            .map_err(network_failure)?;

        if !response.status().is_success() {
            return Err(failure_from_response(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ProviderFailure::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ImageProvider for ReplicateProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Replicate
    }

    async fn generate(&self, request: &EnhancedRequest) -> Result<String, ProviderFailure> {
        let mut prediction = self.create_prediction(request).await?;
        let started = Instant::now();

        while prediction.status != "succeeded" && prediction.status != "failed" {
            if started.elapsed() >= self.poll_deadline {
                return Err(ProviderFailure::Timeout(self.poll_deadline.as_secs()));
            }
            sleep(self.poll_interval).await;
            debug!(prediction = %prediction.id, status = %prediction.status, "polling prediction");
            prediction = self.poll_prediction(&prediction.id).await?;
        }

        if prediction.status == "failed" {
            return Err(ProviderFailure::Server(
                prediction.error.unwrap_or_else(|| "prediction failed".to_string()),
            ));
        }

        let output_url = prediction
            .output
            .as_deref()
            .and_then(|urls| urls.first())
            .ok_or_else(|| {
                ProviderFailure::InvalidResponse("prediction succeeded without output".to_string())
            })?;
        fetch_as_data_uri(&self.client, output_url, "image/png").await
    }
}
