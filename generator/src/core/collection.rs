//! Collection (batch) generation

use std::sync::Arc;
use std::time::Duration;

use shared::logging::format_timestamp;
use shared::{GenerationRequest, Rarity};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::core::orchestrator::ImageOrchestrator;
use crate::core::prompt;
use crate::error::{GeneratorError, GeneratorResult};
use crate::types::{
    CollectionOutput, CollectionRequest, FailedItem, GeneratedNft, NftAttribute, NftMetadata,
};

const DEFAULT_ITEM_DELAY: Duration = Duration::from_secs(2);
const MAX_QUANTITY: u32 = 1000;

/// Drives the fallback chain once per collection item
///
/// Items are generated sequentially with a fixed inter-item delay so the
/// keyless providers are not hammered. A failed item is skipped; the run only
/// errors when every item failed.
pub struct CollectionGenerator {
    orchestrator: Arc<ImageOrchestrator>,
    item_delay: Duration,
}

impl CollectionGenerator {
    pub fn new(orchestrator: Arc<ImageOrchestrator>) -> Self {
        Self {
            orchestrator,
            item_delay: DEFAULT_ITEM_DELAY,
        }
    }

    /// Override the inter-item delay (tests use a zero delay)
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    /// Generate a collection, tolerating per-item failures
    pub async fn generate(&self, request: &CollectionRequest) -> GeneratorResult<CollectionOutput> {
        if request.base_prompt.trim().is_empty() {
            return Err(GeneratorError::invalid_request("basePrompt is required"));
        }
        if request.name.trim().is_empty() {
            return Err(GeneratorError::invalid_request("name is required"));
        }
        if request.quantity == 0 || request.quantity > MAX_QUANTITY {
            return Err(GeneratorError::invalid_request(format!(
                "quantity must be between 1 and {MAX_QUANTITY}"
            )));
        }

        let total = request.quantity as usize;
        let variations = request.variations.clone().unwrap_or_default();
        let description = request
            .description
            .clone()
            .unwrap_or_else(|| format!("AI-generated collection: {}", request.name));

        let mut nfts = Vec::with_capacity(total);
        let mut failed = Vec::new();
        for index in 0..total {
            if index > 0 {
                sleep(self.item_delay).await;
            }

            let item_prompt = prompt::unique_prompt(&request.base_prompt, &variations, index, total);
            let mut generation = GenerationRequest::new(&item_prompt);
            if let Some(negative) = &request.negative_prompt {
                generation.negative_prompt = negative.clone();
            }

            info!(item = index + 1, total, "generating collection item");
            match self.orchestrator.try_providers(&generation).await {
                Ok(outcome) => {
                    let rarity = Rarity::for_position(index, total);
                    let edition = index as u32 + 1;
                    let metadata = NftMetadata {
                        name: format!("{} #{edition}", request.name),
                        description: format!("{description} - Edition {edition} of {total}"),
                        image: outcome.image_data.clone(),
                        attributes: vec![
                            NftAttribute {
                                trait_type: "Collection".to_string(),
                                value: request.name.clone(),
                            },
                            NftAttribute {
                                trait_type: "Edition".to_string(),
                                value: format!("{edition} / {total}"),
                            },
                            NftAttribute {
                                trait_type: "Generation Method".to_string(),
                                value: outcome.service.label().to_string(),
                            },
                            NftAttribute {
                                trait_type: "Rarity".to_string(),
                                value: rarity.to_string(),
                            },
                        ],
                        prompt: outcome.prompt.clone(),
                        generated_at: format_timestamp(),
                    };
                    nfts.push(GeneratedNft {
                        id: edition,
                        metadata,
                        image_data: outcome.image_data,
                        prompt: outcome.prompt,
                        service: outcome.service,
                    });
                }
                Err(error) => {
                    warn!(item = index + 1, total, %error, "collection item skipped");
                    failed.push(FailedItem {
                        id: index as u32 + 1,
                        error: error.to_string(),
                    });
                }
            }
        }

        if nfts.is_empty() {
            return Err(GeneratorError::EmptyCollection);
        }

        info!(
            generated = nfts.len(),
            requested = total,
            "collection generation finished"
        );
        Ok(CollectionOutput {
            name: request.name.clone(),
            description,
            total_generated: nfts.len() as u32,
            requested_quantity: request.quantity,
            base_prompt: request.base_prompt.clone(),
            nfts,
            failed,
        })
    }
}
