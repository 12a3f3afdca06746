//! Single-image fallback orchestration

use shared::{GenerationRequest, GenerationResult, ProviderId};
use tracing::{info, warn};

use crate::core::{procedural, prompt};
use crate::error::{GeneratorError, GeneratorResult};
use crate::registry::ProviderRegistry;
use crate::types::GenerationOutcome;

/// Walks the configured provider chain for one request
///
/// Providers are tried strictly in registry order and each at most once per
/// request. The first success wins; a failure is logged and the chain moves
/// on. [`ImageOrchestrator::generate`] additionally falls back to the
/// procedural renderer, so it cannot fail.
pub struct ImageOrchestrator {
    registry: ProviderRegistry,
}

impl ImageOrchestrator {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Try each configured provider once, in order
    ///
    /// Errors with [`GeneratorError::AllProvidersFailed`] when the chain is
    /// exhausted. Collection runs use this directly so a failed item can be
    /// skipped instead of masked by the procedural fallback.
    pub async fn try_providers(
        &self,
        request: &GenerationRequest,
    ) -> GeneratorResult<GenerationOutcome> {
        let enhanced = prompt::enhance_request(request);

        for provider in self.registry.providers() {
            let id = provider.id();
            info!(provider = %id, "attempting image generation");
            match provider.generate(&enhanced).await {
                Ok(image_data) => {
                    info!(provider = %id, "image generated");
                    return Ok(GenerationOutcome {
                        image_data,
                        service: id,
                        prompt: enhanced.prompt,
                    });
                }
                Err(failure) => {
                    warn!(provider = %id, error = %failure, "provider failed, falling back");
                }
            }
        }

        Err(GeneratorError::AllProvidersFailed)
    }

    /// Generate one image, always producing a `Success`
    ///
    /// Falls back to the deterministic procedural renderer when every
    /// configured provider has failed, so the `Failure` variant is never
    /// built here.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        match self.try_providers(request).await {
            Ok(outcome) => GenerationResult::Success {
                image_data: outcome.image_data,
                service: outcome.service,
                prompt: outcome.prompt,
            },
            Err(_) => {
                warn!("all providers failed, using procedural fallback");
                GenerationResult::Success {
                    image_data: procedural::render(&request.prompt, request.width, request.height),
                    service: ProviderId::Procedural,
                    prompt: prompt::enhance_prompt(&request.prompt),
                }
            }
        }
    }
}
