//! Generator-internal types

use serde::{Deserialize, Serialize};
use shared::ProviderId;

/// A [`shared::GenerationRequest`] after the one-time prompt enhancement pass
///
/// Providers only ever see this form; the enhancement is applied exactly once
/// per request, before any provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f64,
}

/// Successful outcome of one orchestration run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    /// Normalized `data:<mime>;base64,<payload>` URI
    pub image_data: String,
    pub service: ProviderId,
    /// The enhanced prompt that was sent to the provider
    pub prompt: String,
}

/// One attribute entry in NFT metadata (standard `trait_type`/`value` shape)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: String,
}

/// Metadata document for one generated collection item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<NftAttribute>,
    pub prompt: String,
    pub generated_at: String,
}

/// One successfully generated collection item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNft {
    /// 1-based position within the collection
    pub id: u32,
    pub metadata: NftMetadata,
    pub image_data: String,
    pub prompt: String,
    pub service: ProviderId,
}

/// Collection (batch) generation parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    pub base_prompt: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub variations: Option<Vec<String>>,
    #[serde(default)]
    pub negative_prompt: Option<String>,
}

/// Marker for a collection item that could not be generated
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailedItem {
    /// 1-based position within the collection
    pub id: u32,
    pub error: String,
}

/// Result of a collection run; present only when at least one item succeeded
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionOutput {
    pub name: String,
    pub description: String,
    /// Successful items only; failures are listed in `failed`
    pub total_generated: u32,
    pub requested_quantity: u32,
    pub base_prompt: String,
    pub nfts: Vec<GeneratedNft>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedItem>,
}
