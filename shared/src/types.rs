//! Core domain types used throughout the artmint system

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default negative prompt applied when the caller does not supply one
pub const DEFAULT_NEGATIVE_PROMPT: &str = "blurry, low quality, distorted, deformed, ugly";

/// Image generation providers available in the system
///
/// The fallback precedence among configured providers is fixed and owned by
/// the generator crate; this enum only identifies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    HuggingFace,
    Replicate,
    McpLocal,
    OpenAi,
    StabilityAi,
    EnhancedPollinations,
    BackupPollinations,
    /// Deterministic procedural renderer, the terminal fallback state
    Procedural,
}

impl ProviderId {
    /// Human-readable service label reported back to API callers
    pub fn label(&self) -> &'static str {
        match self {
            ProviderId::HuggingFace => "Hugging Face SDXL",
            ProviderId::Replicate => "Replicate SDXL",
            ProviderId::McpLocal => "MCP Stable Diffusion",
            ProviderId::OpenAi => "OpenAI DALL-E 3",
            ProviderId::StabilityAi => "Stability AI",
            ProviderId::EnhancedPollinations => "Enhanced Pollinations AI",
            ProviderId::BackupPollinations => "Backup Pollinations AI",
            ProviderId::Procedural => "Procedural Fallback",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::HuggingFace => write!(f, "huggingface"),
            ProviderId::Replicate => write!(f, "replicate"),
            ProviderId::McpLocal => write!(f, "mcp"),
            ProviderId::OpenAi => write!(f, "openai"),
            ProviderId::StabilityAi => write!(f, "stability"),
            ProviderId::EnhancedPollinations => write!(f, "pollinations"),
            ProviderId::BackupPollinations => write!(f, "pollinations-backup"),
            ProviderId::Procedural => write!(f, "procedural"),
        }
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(ProviderId::HuggingFace),
            "replicate" => Ok(ProviderId::Replicate),
            "mcp" | "mcp-local" => Ok(ProviderId::McpLocal),
            "openai" => Ok(ProviderId::OpenAi),
            "stability" | "stabilityai" => Ok(ProviderId::StabilityAi),
            "pollinations" => Ok(ProviderId::EnhancedPollinations),
            "pollinations-backup" => Ok(ProviderId::BackupPollinations),
            "procedural" => Ok(ProviderId::Procedural),
            _ => Err(format!("Unknown provider: {s}")),
        }
    }
}

fn default_negative_prompt() -> String {
    DEFAULT_NEGATIVE_PROMPT.to_string()
}

fn default_dimension() -> u32 {
    1024
}

fn default_steps() -> u32 {
    50
}

fn default_guidance() -> f64 {
    7.5
}

/// One image generation request, immutable once built
///
/// Serde field names match the HTTP boundary shape; all optional fields fall
/// back to the fixed defaults when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default = "default_negative_prompt")]
    pub negative_prompt: String,
    #[serde(default = "default_dimension")]
    pub width: u32,
    #[serde(default = "default_dimension")]
    pub height: u32,
    #[serde(default = "default_steps")]
    pub num_inference_steps: u32,
    #[serde(default = "default_guidance")]
    pub guidance_scale: f64,
}

impl GenerationRequest {
    /// Build a request for `prompt` with all other parameters at their defaults
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: default_negative_prompt(),
            width: default_dimension(),
            height: default_dimension(),
            num_inference_steps: default_steps(),
            guidance_scale: default_guidance(),
        }
    }
}

/// Outcome of one generation request: exactly one variant per request
///
/// `image_data` is always a self-describing `data:<mime>;base64,<payload>`
/// URI regardless of which provider produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Success {
        image_data: String,
        service: ProviderId,
        /// The enhanced prompt that was actually sent
        prompt: String,
    },
    Failure {
        error: String,
    },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }
}

/// Rarity tier, a pure function of position within a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Legendary,
    Epic,
    Rare,
    Uncommon,
    Common,
}

impl Rarity {
    /// Tier for the item at `index` (0-based) in a collection of `total`
    ///
    /// Position (index+1)/total: ≤1% Legendary, ≤5% Epic, ≤15% Rare,
    /// ≤35% Uncommon, otherwise Common.
    pub fn for_position(index: usize, total: usize) -> Self {
        let position = (index + 1) as f64 / total as f64;
        if position <= 0.01 {
            Rarity::Legendary
        } else if position <= 0.05 {
            Rarity::Epic
        } else if position <= 0.15 {
            Rarity::Rare
        } else if position <= 0.35 {
            Rarity::Uncommon
        } else {
            Rarity::Common
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rarity::Legendary => write!(f, "Legendary"),
            Rarity::Epic => write!(f, "Epic"),
            Rarity::Rare => write!(f, "Rare"),
            Rarity::Uncommon => write!(f, "Uncommon"),
            Rarity::Common => write!(f, "Common"),
        }
    }
}

/// Local mirror of a collection owned by the on-chain factory
///
/// This is a read-through cache with no write authority: all mutation happens
/// via contract transactions and the local copy is only ever overwritten by a
/// fresh read. It carries no staleness bound — supply or eligibility
/// decisions must re-read the chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    pub id: u64,
    pub contract_address: String,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub creator: String,
    pub max_supply: u64,
    /// Mint price in wei, kept as a decimal string to avoid u64 overflow
    pub mint_price: String,
    /// Unix seconds
    pub created_at: u64,
    pub is_active: bool,
    /// Refreshed on each sync; 0 when the supply read failed
    pub current_supply: u64,
}

/// Metadata document resolved from a token URI, best-effort
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Local mirror of one minted token
///
/// Identified by `(contract_address, token_id)`; authoritative state always
/// lives on-chain. Never locally deleted except by explicit user action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Composite id `"{contract_address}-{token_id}"`
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub token_id: u64,
    pub contract_address: String,
    pub collection_id: u64,
    pub owner: String,
    #[serde(default)]
    pub metadata: Option<TokenMetadata>,
    pub explorer_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"prompt":"a dragon"}"#).unwrap();

        assert_eq!(request.prompt, "a dragon");
        assert_eq!(request.negative_prompt, DEFAULT_NEGATIVE_PROMPT);
        assert_eq!(request.width, 1024);
        assert_eq!(request.height, 1024);
        assert_eq!(request.num_inference_steps, 50);
        assert_eq!(request.guidance_scale, 7.5);
    }

    #[test]
    fn test_rarity_boundaries() {
        // Position 1/100 = 0.01 sits exactly on the Legendary boundary
        assert_eq!(Rarity::for_position(0, 100), Rarity::Legendary);
        assert_eq!(Rarity::for_position(4, 100), Rarity::Epic);
        assert_eq!(Rarity::for_position(14, 100), Rarity::Rare);
        assert_eq!(Rarity::for_position(34, 100), Rarity::Uncommon);
        assert_eq!(Rarity::for_position(99, 100), Rarity::Common);
    }

    #[test]
    fn test_rarity_monotonic() {
        let total = 200;
        let mut last = Rarity::for_position(0, total);
        for index in 1..total {
            let tier = Rarity::for_position(index, total);
            // Tiers only ever move toward Common as the index grows
            let rank = |r: Rarity| match r {
                Rarity::Legendary => 0,
                Rarity::Epic => 1,
                Rarity::Rare => 2,
                Rarity::Uncommon => 3,
                Rarity::Common => 4,
            };
            assert!(rank(tier) >= rank(last));
            last = tier;
        }
    }

    #[test]
    fn test_provider_id_round_trip() {
        for provider in [
            ProviderId::HuggingFace,
            ProviderId::Replicate,
            ProviderId::McpLocal,
            ProviderId::OpenAi,
            ProviderId::StabilityAi,
            ProviderId::EnhancedPollinations,
            ProviderId::BackupPollinations,
            ProviderId::Procedural,
        ] {
            let parsed: ProviderId = provider.to_string().parse().unwrap();
            assert_eq!(parsed, provider);
        }
    }

    #[test]
    fn test_generation_result_serde_shape() {
        let result = GenerationResult::Success {
            image_data: "data:image/png;base64,AAAA".to_string(),
            service: ProviderId::Replicate,
            prompt: "a dragon, digital art".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["service"], "Replicate");
    }
}
