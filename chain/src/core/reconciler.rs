//! Wallet state reconciliation
//!
//! Pulls a wallet's collections and a capped sample of their minted tokens
//! from the chain into a [`ChainSnapshot`]. Reads are sequential and paced so
//! a free public RPC endpoint is not flooded; every individual read goes
//! through the retry policy and a failed read degrades its field instead of
//! failing the load. The only hard error is a malformed address.

use std::sync::Arc;
use std::time::Duration;

use shared::{CollectionRecord, TokenRecord};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::core::retry::RetryPolicy;
use crate::error::{ChainError, ChainResult};
use crate::traits::{ContractReader, MetadataFetcher};
use crate::types::ChainSnapshot;

/// Delays between consecutive reads, and the per-collection token cap
#[derive(Debug, Clone)]
pub struct PacingConfig {
    /// Before each collection after the first
    pub collection_delay: Duration,
    /// Between the collection info read and the supply read
    pub supply_delay: Duration,
    /// Before each token read
    pub token_delay: Duration,
    /// At most this many tokens are mirrored per collection
    pub max_tokens: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            collection_delay: Duration::from_millis(500),
            supply_delay: Duration::from_millis(300),
            token_delay: Duration::from_millis(400),
            max_tokens: 3,
        }
    }
}

impl PacingConfig {
    /// Zero-delay pacing for tests, cap unchanged
    pub fn immediate() -> Self {
        Self {
            collection_delay: Duration::ZERO,
            supply_delay: Duration::ZERO,
            token_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

pub struct ChainReconciler {
    reader: Arc<dyn ContractReader>,
    metadata: Arc<dyn MetadataFetcher>,
    retry: RetryPolicy,
    pacing: PacingConfig,
    explorer_base: String,
}

impl ChainReconciler {
    pub fn new(
        reader: Arc<dyn ContractReader>,
        metadata: Arc<dyn MetadataFetcher>,
        explorer_base: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            metadata,
            retry: RetryPolicy::default(),
            pacing: PacingConfig::default(),
            explorer_base: explorer_base.into(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Reconcile the wallet's factory collections and minted tokens
    ///
    /// Never errors past address validation; everything that could be read is
    /// aggregated and the message reports the counts.
    pub async fn load_user_data(&self, address: &str) -> ChainResult<ChainSnapshot> {
        if !is_valid_address(address) {
            return Err(ChainError::InvalidAddress {
                address: address.to_string(),
            });
        }

        let reader = &self.reader;
        let ids = match self
            .retry
            .run("creator_collections", || reader.creator_collections(address))
            .await
        {
            Some(ids) => ids,
            None => {
                warn!(address, "factory list call failed, returning empty snapshot");
                return Ok(ChainSnapshot {
                    message: Some(
                        "Unable to reach the chain right now; no collections loaded".to_string(),
                    ),
                    ..Default::default()
                });
            }
        };

        let mut collections = Vec::new();
        let mut tokens = Vec::new();

        for (position, collection_id) in ids.iter().copied().enumerate() {
            if position > 0 {
                sleep(self.pacing.collection_delay).await;
            }

            let info = match self
                .retry
                .run("collection_info", || reader.collection_info(collection_id))
                .await
            {
                Some(info) => info,
                None => {
                    warn!(collection_id, "collection info unavailable, skipping");
                    continue;
                }
            };

            sleep(self.pacing.supply_delay).await;
            let contract = info.contract_address.clone();
            let supply = self
                .retry
                .run("total_supply", || reader.total_supply(&contract))
                .await
                .unwrap_or(0);

            collections.push(CollectionRecord {
                id: collection_id,
                contract_address: info.contract_address.clone(),
                name: info.name.clone(),
                symbol: info.symbol,
                description: info.description,
                creator: info.creator,
                max_supply: info.max_supply,
                mint_price: info.mint_price,
                created_at: info.created_at,
                is_active: info.is_active,
                current_supply: supply,
            });

            for token_id in 1..=supply.min(self.pacing.max_tokens) {
                sleep(self.pacing.token_delay).await;

                let uri = self
                    .retry
                    .run("token_uri", || reader.token_uri(&contract, token_id))
                    .await;
                let metadata = match &uri {
                    Some(uri) => self.metadata.fetch(uri).await.ok(),
                    None => None,
                };

                let fallback_name = format!("{} #{token_id}", info.name);
                let name = metadata
                    .as_ref()
                    .and_then(|m| m.name.clone())
                    .unwrap_or_else(|| fallback_name.clone());
                let description = metadata
                    .as_ref()
                    .and_then(|m| m.description.clone())
                    .unwrap_or_else(|| format!("Token {token_id} of {}", info.name));
                let image = metadata
                    .as_ref()
                    .and_then(|m| m.image.clone())
                    .unwrap_or_default();

                tokens.push(TokenRecord {
                    id: format!("{contract}-{token_id}"),
                    name,
                    description,
                    image,
                    token_id,
                    contract_address: contract.clone(),
                    collection_id,
                    owner: address.to_string(),
                    metadata,
                    explorer_url: format!("{}/token/{contract}", self.explorer_base),
                });
            }
        }

        info!(
            address,
            collections = collections.len(),
            tokens = tokens.len(),
            "user data reconciled"
        );
        let message = Some(format!(
            "Loaded {} collections and {} NFTs from the blockchain",
            collections.len(),
            tokens.len()
        ));
        Ok(ChainSnapshot {
            collections,
            tokens,
            message,
        })
    }
}

/// `0x` plus exactly 40 hex digits
fn is_valid_address(address: &str) -> bool {
    let Some(hex_part) = address.strip_prefix("0x") else {
        return false;
    };
    hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
}
