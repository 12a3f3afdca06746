//! Pinata pinning service

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::ProviderFailure;

use crate::traits::IpfsPinner;

const DEFAULT_BASE_URL: &str = "https://api.pinata.cloud";
const DEFAULT_GATEWAY: &str = "https://gateway.pinata.cloud/ipfs/";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinResponse {
    ipfs_hash: String,
}

pub struct PinataPinner {
    client: reqwest::Client,
    api_key: String,
    secret_key: String,
    base_url: String,
    gateway: String,
}

impl PinataPinner {
    pub fn new(client: reqwest::Client, api_key: String, secret_key: String) -> Self {
        Self {
            client,
            api_key,
            secret_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            gateway: DEFAULT_GATEWAY.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn handle(&self, response: reqwest::Response) -> Result<String, ProviderFailure> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderFailure::from_status(status, body));
        }
        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::InvalidResponse(e.to_string()))?;
        Ok(format!("{}{}", self.gateway, pinned.ipfs_hash))
    }
}

#[async_trait]
impl IpfsPinner for PinataPinner {
    async fn pin_file(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, ProviderFailure> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/pinning/pinFileToIPFS", self.base_url))
            .header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.secret_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderFailure::Network(e.to_string()))?;
        self.handle(response).await
    }

    async fn pin_json(&self, document: &Value, name: &str) -> Result<String, ProviderFailure> {
        let response = self
            .client
            .post(format!("{}/pinning/pinJSONToIPFS", self.base_url))
            .header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.secret_key)
            .json(&json!({
                "pinataContent": document,
                "pinataMetadata": { "name": name },
            }))
            .send()
            .await
            .map_err(|e| ProviderFailure::Network(e.to_string()))?;
        self.handle(response).await
    }
}
