//! Token metadata resolution over HTTP

use async_trait::async_trait;
use shared::{ProviderFailure, TokenMetadata};

use crate::traits::MetadataFetcher;

const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

pub struct HttpMetadataFetcher {
    client: reqwest::Client,
    gateway: String,
}

impl HttpMetadataFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            gateway: IPFS_GATEWAY.to_string(),
        }
    }

    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    /// Rewrite `ipfs://` URIs through the configured gateway
    fn resolve(&self, uri: &str) -> String {
        match uri.strip_prefix("ipfs://") {
            Some(cid) => format!("{}{cid}", self.gateway),
            None => uri.to_string(),
        }
    }
}

#[async_trait]
impl MetadataFetcher for HttpMetadataFetcher {
    async fn fetch(&self, uri: &str) -> Result<TokenMetadata, ProviderFailure> {
        let url = self.resolve(uri);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderFailure::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderFailure::from_status(status, body));
        }
        response
            .json()
            .await
            .map_err(|e| ProviderFailure::InvalidResponse(e.to_string()))
    }
}
