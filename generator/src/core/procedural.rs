//! Deterministic procedural fallback renderer
//!
//! Terminal state of the fallback chain: when every configured provider has
//! failed, the caller still receives an image. Output is a seeded SVG keyed
//! by a hash of the prompt and a style bucket derived from keyword matching,
//! so the same prompt always yields the same image. This path never fails.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fmt::Write;

/// Signed 32-bit rolling hash of the prompt (seed for all placement math)
pub fn prompt_hash(prompt: &str) -> i32 {
    let mut hash: i32 = 0;
    for ch in prompt.chars() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(ch as u32 as i32);
    }
    hash
}

/// Style bucket for the procedural renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProceduralStyle {
    Dragon,
    Cyberpunk,
    Nature,
    Space,
    Abstract,
    Portrait,
    City,
    General,
}

impl ProceduralStyle {
    pub fn for_prompt(prompt: &str) -> Self {
        let lower = prompt.to_lowercase();
        if lower.contains("dragon") {
            ProceduralStyle::Dragon
        } else if lower.contains("cyberpunk") || lower.contains("neon") {
            ProceduralStyle::Cyberpunk
        } else if lower.contains("forest") || lower.contains("nature") {
            ProceduralStyle::Nature
        } else if lower.contains("space") || lower.contains("cosmic") {
            ProceduralStyle::Space
        } else if lower.contains("abstract") {
            ProceduralStyle::Abstract
        } else if lower.contains("portrait") {
            ProceduralStyle::Portrait
        } else if lower.contains("city") {
            ProceduralStyle::City
        } else {
            ProceduralStyle::General
        }
    }

    /// Four-color palette backing the layered gradients
    fn palette(&self) -> [&'static str; 4] {
        match self {
            ProceduralStyle::Dragon => ["#FF6B35", "#FF8E53", "#FF4500", "#DC143C"],
            ProceduralStyle::Cyberpunk => ["#00FFFF", "#FF1493", "#9400D3", "#00FF00"],
            ProceduralStyle::Nature => ["#228B22", "#32CD32", "#90EE90", "#006400"],
            ProceduralStyle::Space => ["#4B0082", "#8A2BE2", "#9370DB", "#191970"],
            ProceduralStyle::Abstract => ["#FF69B4", "#FFD700", "#00CED1", "#FF6347"],
            ProceduralStyle::Portrait => ["#DEB887", "#F5DEB3", "#D2B48C", "#BC8F8F"],
            ProceduralStyle::City => ["#708090", "#778899", "#B0C4DE", "#4682B4"],
            ProceduralStyle::General => ["#8B5CF6", "#EC4899", "#F59E0B", "#10B981"],
        }
    }
}

/// Render the fallback image for `prompt` as a base64 SVG data URI
pub fn render(prompt: &str, width: u32, height: u32) -> String {
    let hash = prompt_hash(prompt);
    let style = ProceduralStyle::for_prompt(prompt);
    let svg = build_svg(prompt, width, height, hash, style);
    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}

fn build_svg(prompt: &str, width: u32, height: u32, hash: i32, style: ProceduralStyle) -> String {
    let seed = hash.unsigned_abs() as u64;
    let colors = style.palette();
    let mut svg = String::new();

    let _ = write!(
        svg,
        r#"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg"><defs>"#
    );
    write_gradients(&mut svg, seed, &colors);
    write_pattern(&mut svg, seed, style);
    write_filter(&mut svg, seed);
    svg.push_str("</defs>");

    // Layered background
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="url(#grad1_{seed})"/><rect width="{width}" height="{height}" fill="url(#grad2_{seed})" opacity="0.7"/><rect width="{width}" height="{height}" fill="url(#grad3_{seed})" opacity="0.5"/>"#
    );

    write_shapes(&mut svg, seed, width, height, style);

    // Overlay effects
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="url(#pattern_{seed})" opacity="0.2"/><rect width="{width}" height="{height}" fill="none" filter="url(#filter_{seed})" opacity="0.3"/>"#
    );

    write_prompt_elements(&mut svg, prompt, width, height);

    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" font-family="Arial, sans-serif" font-size="10" fill="rgba(255,255,255,0.5)" text-anchor="end">AI Generated</text></svg>"#,
        width - 10,
        height - 10
    );
    svg
}

fn write_gradients(svg: &mut String, seed: u64, colors: &[&str; 4]) {
    let _ = write!(
        svg,
        r#"<radialGradient id="grad1_{seed}" cx="30%" cy="30%" r="70%"><stop offset="0%" style="stop-color:{c0};stop-opacity:0.9"/><stop offset="50%" style="stop-color:{c1};stop-opacity:0.6"/><stop offset="100%" style="stop-color:{c2};stop-opacity:0.3"/></radialGradient><linearGradient id="grad2_{seed}" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" style="stop-color:{c1};stop-opacity:0.8"/><stop offset="100%" style="stop-color:{c3};stop-opacity:0.4"/></linearGradient><radialGradient id="grad3_{seed}" cx="70%" cy="70%" r="50%"><stop offset="0%" style="stop-color:{c3};stop-opacity:0.7"/><stop offset="100%" style="stop-color:{c0};stop-opacity:0.2"/></radialGradient>"#,
        c0 = colors[0],
        c1 = colors[1],
        c2 = colors[2],
        c3 = colors[3],
    );
}

fn write_pattern(svg: &mut String, seed: u64, style: ProceduralStyle) {
    if style == ProceduralStyle::Cyberpunk {
        let _ = write!(
            svg,
            r#"<pattern id="pattern_{seed}" x="0" y="0" width="20" height="20" patternUnits="userSpaceOnUse"><rect width="20" height="20" fill="none"/><line x1="0" y1="10" x2="20" y2="10" stroke="rgba(0,255,255,0.3)" stroke-width="1"/><line x1="10" y1="0" x2="10" y2="20" stroke="rgba(255,0,255,0.3)" stroke-width="1"/></pattern>"#
        );
    } else {
        let _ = write!(
            svg,
            r#"<pattern id="pattern_{seed}" x="0" y="0" width="30" height="30" patternUnits="userSpaceOnUse"><circle cx="15" cy="15" r="2" fill="rgba(255,255,255,0.1)"/></pattern>"#
        );
    }
}

fn write_filter(svg: &mut String, seed: u64) {
    let _ = write!(
        svg,
        r#"<filter id="filter_{seed}"><feGaussianBlur in="SourceGraphic" stdDeviation="3"/><feColorMatrix type="saturate" values="1.5"/><feBlend mode="multiply"/></filter>"#
    );
}

/// Twelve hash-placed shapes, style-specific geometry
fn write_shapes(svg: &mut String, seed: u64, width: u32, height: u32, style: ProceduralStyle) {
    let width = width as u64;
    let height = height as u64;
    for i in 0..12u64 {
        let x = seed.wrapping_mul(i + 1).wrapping_mul(17) % width;
        let y = seed.wrapping_mul(i + 2).wrapping_mul(23) % height;
        let size = 20 + seed.wrapping_mul(i).wrapping_mul(7) % 80;
        let rotation = seed.wrapping_mul(i).wrapping_mul(13) % 360;
        let opacity = 0.2 + (i % 4) as f64 * 0.15;

        match style {
            ProceduralStyle::Cyberpunk => {
                let _ = write!(
                    svg,
                    r#"<rect x="{x}" y="{y}" width="{size}" height="{h}" fill="rgba(0,255,255,{opacity:.2})" transform="rotate({rotation} {cx} {cy})"/><circle cx="{cx}" cy="{cy}" r="3" fill="rgba(255,0,255,{glow:.2})"/>"#,
                    h = size / 4,
                    cx = x + size / 2,
                    cy = y + size / 8,
                    glow = opacity + 0.3,
                );
            }
            ProceduralStyle::Dragon => {
                let _ = write!(
                    svg,
                    r#"<ellipse cx="{x}" cy="{y}" rx="{size}" ry="{ry}" fill="rgba(255,100,50,{opacity:.2})" transform="rotate({rotation} {x} {y})"/><circle cx="{x}" cy="{y}" r="5" fill="rgba(255,200,100,{glow:.2})"/>"#,
                    ry = size / 2,
                    glow = opacity + 0.4,
                );
            }
            _ => {
                let _ = write!(
                    svg,
                    r#"<polygon points="{x},{y} {x2},{y2} {x3},{y3}" fill="rgba(255,255,255,{opacity:.2})" transform="rotate({rotation} {x2} {y2})"/>"#,
                    x2 = x + size,
                    y2 = y + size / 2,
                    x3 = x + size / 2,
                    y3 = y + size,
                );
            }
        }
    }
}

/// Prompt-keyed foreground elements (dragon silhouette, skyline, peaks)
fn write_prompt_elements(svg: &mut String, prompt: &str, width: u32, height: u32) {
    let lower = prompt.to_lowercase();
    let w = width as f64;
    let h = height as f64;

    if lower.contains("dragon") {
        let _ = write!(
            svg,
            r#"<path d="M{x0:.0} {y0:.0} Q{x1:.0} {y1:.0} {x2:.0} {y0:.0} Q{x3:.0} {y3:.0} {x4:.0} {y4:.0} Z" fill="rgba(255,150,50,0.7)" opacity="0.8"/><circle cx="{ex:.0}" cy="{ey:.0}" r="12" fill="rgba(255,50,50,0.9)"/><circle cx="{ex:.0}" cy="{ey:.0}" r="6" fill="rgba(255,200,100,1)"/>"#,
            x0 = w * 0.2,
            y0 = h * 0.4,
            x1 = w * 0.5,
            y1 = h * 0.2,
            x2 = w * 0.8,
            x3 = w * 0.7,
            y3 = h * 0.7,
            x4 = w * 0.3,
            y4 = h * 0.6,
            ex = w * 0.6,
            ey = h * 0.35,
        );
    }

    if lower.contains("city") || lower.contains("cyberpunk") {
        let _ = write!(
            svg,
            r#"<rect x="{x0:.0}" y="{y0:.0}" width="50" height="{h0:.0}" fill="rgba(100,100,255,0.8)"/><rect x="{x1:.0}" y="{y1:.0}" width="70" height="{h1:.0}" fill="rgba(150,100,255,0.8)"/><rect x="{x2:.0}" y="{y2:.0}" width="60" height="{h2:.0}" fill="rgba(200,100,255,0.8)"/><circle cx="{c0:.0}" cy="{cy0:.0}" r="3" fill="rgba(0,255,255,1)"/><circle cx="{c1:.0}" cy="{cy1:.0}" r="3" fill="rgba(255,0,255,1)"/>"#,
            x0 = w * 0.1,
            y0 = h * 0.6,
            h0 = h * 0.4,
            x1 = w * 0.3,
            y1 = h * 0.5,
            h1 = h * 0.5,
            x2 = w * 0.6,
            y2 = h * 0.7,
            h2 = h * 0.3,
            c0 = w * 0.15,
            cy0 = h * 0.5,
            c1 = w * 0.35,
            cy1 = h * 0.4,
        );
    }

    if lower.contains("mountain") {
        let _ = write!(
            svg,
            r#"<polygon points="{a0:.0},{b:.0} {a1:.0},{p1:.0} {a2:.0},{b:.0}" fill="rgba(200,200,255,0.7)"/><polygon points="{a3:.0},{b:.0} {a4:.0},{p2:.0} {a5:.0},{b:.0}" fill="rgba(180,180,255,0.8)"/>"#,
            a0 = w * 0.1,
            b = h * 0.8,
            a1 = w * 0.3,
            p1 = h * 0.3,
            a2 = w * 0.5,
            a3 = w * 0.4,
            a4 = w * 0.6,
            p2 = h * 0.2,
            a5 = w * 0.8,
        );
    }
}
