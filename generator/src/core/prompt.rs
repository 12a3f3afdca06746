//! Prompt enhancement and per-item prompt derivation
//!
//! All functions here are pure. Enhancement is applied exactly once per
//! request, before any provider call, independent of which provider ends up
//! serving it.

use shared::{GenerationRequest, Rarity};

use crate::types::EnhancedRequest;

/// Quality terms appended to every prompt; only the first five are used
const QUALITY_TERMS: [&str; 10] = [
    "masterpiece",
    "best quality",
    "ultra detailed",
    "high resolution",
    "8k",
    "professional",
    "award winning",
    "stunning",
    "beautiful",
    "intricate details",
];

/// Default variation phrases rotated across collection items
const DEFAULT_VARIATIONS: [&str; 15] = [
    "vibrant colors, dynamic composition",
    "soft pastels, dreamy atmosphere",
    "bold contrasts, dramatic lighting",
    "warm tones, cozy feeling",
    "cool blues and purples, mystical",
    "golden hour lighting, magical",
    "neon accents, futuristic",
    "earth tones, natural",
    "monochromatic, artistic",
    "rainbow colors, playful",
    "dark and moody, mysterious",
    "bright and cheerful, uplifting",
    "vintage style, nostalgic",
    "modern minimalist, clean",
    "ornate details, decorative",
];

/// Unique-element phrases rotated across collection items
const UNIQUE_ELEMENTS: [&str; 15] = [
    "unique pattern",
    "special glow",
    "rare texture",
    "distinctive style",
    "exclusive design",
    "one-of-a-kind details",
    "signature elements",
    "custom features",
    "individual character",
    "personal touch",
    "unique perspective",
    "special effects",
    "rare combination",
    "exclusive palette",
    "distinctive mood",
];

/// Style clause selected by keyword matching against the prompt
fn style_clause(prompt_lower: &str) -> &'static str {
    if prompt_lower.contains("dragon") || prompt_lower.contains("fantasy") {
        ", fantasy art, magical, epic, cinematic lighting, detailed scales, glowing eyes"
    } else if prompt_lower.contains("cyberpunk") || prompt_lower.contains("neon") {
        ", cyberpunk art, neon lights, futuristic cityscape, dark atmosphere, glowing signs, rain reflections"
    } else if prompt_lower.contains("portrait") || prompt_lower.contains("face") {
        ", portrait photography, detailed facial features, professional lighting, sharp focus"
    } else if prompt_lower.contains("landscape") || prompt_lower.contains("mountain") {
        ", landscape photography, dramatic lighting, vast scenery, detailed environment"
    } else if prompt_lower.contains("abstract") {
        ", abstract art, geometric patterns, vibrant colors, modern composition"
    } else if prompt_lower.contains("realistic") || prompt_lower.contains("photo") {
        ", photorealistic, detailed textures, natural lighting, high definition"
    } else {
        ", digital art, concept art, detailed illustration"
    }
}

/// Append the style clause and the first five quality terms to a prompt
pub fn enhance_prompt(original: &str) -> String {
    let clause = style_clause(&original.to_lowercase());
    format!("{original}{clause}, {}", QUALITY_TERMS[..5].join(", "))
}

/// Enhance a request's prompt, carrying the remaining parameters through
pub fn enhance_request(request: &GenerationRequest) -> EnhancedRequest {
    EnhancedRequest {
        prompt: enhance_prompt(&request.prompt),
        negative_prompt: request.negative_prompt.clone(),
        width: request.width,
        height: request.height,
        num_inference_steps: request.num_inference_steps,
        guidance_scale: request.guidance_scale,
    }
}

/// Variation phrase for the item at `index`, rotating through the list
fn variation_for(variations: &[String], index: usize) -> String {
    if variations.is_empty() {
        DEFAULT_VARIATIONS[index % DEFAULT_VARIATIONS.len()].to_string()
    } else {
        variations[index % variations.len()].clone()
    }
}

/// Unique per-item prompt: base + variation + unique element + rarity/edition
pub fn unique_prompt(base: &str, variations: &[String], index: usize, total: usize) -> String {
    let variation = variation_for(variations, index);
    let element = UNIQUE_ELEMENTS[index % UNIQUE_ELEMENTS.len()];
    let rarity = Rarity::for_position(index, total);
    format!(
        "{base}, {variation}, {element}, {rarity} rarity, edition {} of {total}",
        index + 1
    )
}
