// SPDX-License-Identifier: MIT
//
// Procedural background textures.
//
// Four generators, each a pure function of (size, config, time) that
// fills a fresh `PixelBuffer`:
//
//   carbon     woven fiber: two crossing line sets plus a sparse diagonal
//   metallic   brushed metal: 45° streaks, sheen band, sparkle
//   paper      fiber: low-frequency sine noise plus grain on one color
//   halftone   dot grid, dots shrink toward the edges and pulse
//
// Only halftone is alpha-native (dots on transparency). The others are
// opaque; the caller applies `TextureConfig::opacity` when compositing.
// Random grain comes from a seeded xorshift, so a given time sample
// always produces the same pixels.

use hexhue_paint::color::Rgb;
use hexhue_paint::surface::{PixelBuffer, Viewport};
use serde::{Deserialize, Serialize};

/// Pixels per second that line patterns drift at `animation_speed = 1`.
const DRIFT_PX_PER_SEC: f64 = 12.0;

// ─── Config ──────────────────────────────────────────────────────────────────

/// Which generator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureKind {
    #[default]
    Carbon,
    Metallic,
    Paper,
    Halftone,
}

impl TextureKind {
    pub const ALL: [Self; 4] = [Self::Carbon, Self::Metallic, Self::Paper, Self::Halftone];
}

/// Texture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextureConfig {
    #[serde(rename = "type")]
    pub kind: TextureKind,
    /// Spatial scale multiplier; larger means coarser features.
    pub scale: f64,
    /// Layer opacity, applied by the compositor.
    pub opacity: f64,
    /// Animation rate multiplier; `0` is static.
    pub animation_speed: f64,
    pub base_color: Rgb,
    pub accent_color: Rgb,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            kind: TextureKind::Carbon,
            scale: 1.0,
            opacity: 0.3,
            animation_speed: 0.5,
            base_color: Rgb::new(0x1e, 0x29, 0x3b),
            accent_color: Rgb::new(0x10, 0xb9, 0x81),
        }
    }
}

impl TextureConfig {
    /// Default parameters for `kind` in the given colors.
    #[must_use]
    pub fn new(kind: TextureKind, base_color: Rgb, accent_color: Rgb) -> Self {
        Self {
            kind,
            base_color,
            accent_color,
            ..Self::default()
        }
    }
}

// ─── Sizing ──────────────────────────────────────────────────────────────────

/// Device capability class; bounds texture resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Low,
    #[default]
    Medium,
    High,
}

impl PerformanceTier {
    /// Largest texture edge for the tier.
    #[must_use]
    pub const fn max_texture_edge(self) -> u32 {
        match self {
            Self::Low => 512,
            Self::Medium => 1024,
            Self::High => 2048,
        }
    }
}

/// Texture size for a viewport: the viewport itself, scaled down (aspect
/// preserved) so the longer edge fits the tier's limit.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn get_optimal_texture_size(viewport: Viewport, tier: PerformanceTier) -> (u32, u32) {
    if viewport.is_empty() {
        return (0, 0);
    }
    let cap = f64::from(tier.max_texture_edge());
    let longest = viewport.width.max(viewport.height);
    let factor = if longest > cap { cap / longest } else { 1.0 };
    let edge = |v: f64| ((v * factor).round() as u32).clamp(1, tier.max_texture_edge());
    (edge(viewport.width), edge(viewport.height))
}

// ─── Generation ──────────────────────────────────────────────────────────────

/// Rasterize `config` at `time` seconds of animation.
#[must_use]
pub fn generate_texture(width: u32, height: u32, config: &TextureConfig, time: f64) -> PixelBuffer {
    let scale = if config.scale > 0.0 { config.scale } else { 1.0 };
    let t = time * config.animation_speed.max(0.0);
    match config.kind {
        TextureKind::Carbon => carbon(width, height, config, scale, t),
        TextureKind::Metallic => metallic(width, height, config, scale, t),
        TextureKind::Paper => paper(width, height, config, scale, t),
        TextureKind::Halftone => halftone(width, height, config, scale, t),
    }
}

fn carbon(width: u32, height: u32, config: &TextureConfig, scale: f64, t: f64) -> PixelBuffer {
    let mut buf = PixelBuffer::filled(width, height, config.base_color);
    let drift = t * DRIFT_PX_PER_SEC;
    let weft = 4.0 * scale;
    let warp = 6.0 * scale;
    let diagonal = 24.0 * scale;

    for y in 0..height {
        for x in 0..width {
            let (fx, fy) = (f64::from(x), f64::from(y));
            if (fy + drift).rem_euclid(weft) < 1.0 {
                buf.blend(x, y, config.accent_color, 0.18);
            }
            if (fx - drift * 0.5).rem_euclid(warp) < 1.0 {
                buf.blend(x, y, Rgb::BLACK, 0.25);
            }
            if (fx + fy + drift).rem_euclid(diagonal) < 1.0 {
                buf.blend(x, y, config.accent_color, 0.08);
            }
        }
    }
    buf
}

fn metallic(width: u32, height: u32, config: &TextureConfig, scale: f64, t: f64) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    let mut rng = Xorshift32::new(frame_seed(t, 0x6d65_7461));
    let streak_width = 2.0 * scale;

    for y in 0..height {
        for x in 0..width {
            let (fx, fy) = (f64::from(x), f64::from(y));
            // Streaks run along the 45° diagonal: constant along x + y.
            let across = ((fx - fy) / streak_width).floor() as i64;
            let streak = streak_noise(across);
            let sheen = ((fx + fy) / (90.0 * scale) + t).sin().mul_add(0.5, 0.5);
            let mix = streak.mul_add(0.35, sheen * 0.45);
            let mut color = config.base_color.mix(config.accent_color, mix);
            if rng.next_f64() < 0.015 {
                color = color.mix(Rgb::WHITE, rng.range(0.2, 0.6));
            }
            buf.set(x, y, color, 255);
        }
    }
    buf
}

#[allow(clippy::cast_sign_loss)]
fn paper(width: u32, height: u32, config: &TextureConfig, scale: f64, t: f64) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    let mut rng = Xorshift32::new(frame_seed(t, 0x7061_7065));
    let phase = t * 0.1;
    let [r, g, b] = config.base_color.channels();

    for y in 0..height {
        for x in 0..width {
            let (fx, fy) = (f64::from(x) / scale, f64::from(y) / scale);
            let fiber = (fx * 0.05 + phase).sin() * (fy * 0.07).cos()
                + ((fx + fy) * 0.021).sin() * 0.5;
            let grain = rng.range(-1.0, 1.0);
            let delta = fiber.mul_add(6.0, grain * 8.0);
            let channel = |c: f64| (c + delta).round().clamp(0.0, 255.0) as u8;
            buf.set(x, y, Rgb::new(channel(r), channel(g), channel(b)), 255);
        }
    }
    buf
}

fn halftone(width: u32, height: u32, config: &TextureConfig, scale: f64, t: f64) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    let spacing = 12.0 * scale;
    let (cx, cy) = (f64::from(width) / 2.0, f64::from(height) / 2.0);
    let max_dist = cx.hypot(cy).max(1.0);

    for y in 0..height {
        for x in 0..width {
            let (px, py) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
            let dot_x = ((px / spacing).floor() + 0.5) * spacing;
            let dot_y = ((py / spacing).floor() + 0.5) * spacing;
            let d = (dot_x - cx).hypot(dot_y - cy) / max_dist;
            let pulse = (t * 2.0 - d * 6.0).sin().mul_add(0.25, 0.75);
            let radius = spacing * 0.45 * d.mul_add(-0.7, 1.0) * pulse;
            if (px - dot_x).hypot(py - dot_y) <= radius {
                buf.set(x, y, config.accent_color, 255);
            }
        }
    }
    buf
}

/// Grain seed for an animation time; constant within each 1/10 s.
#[allow(clippy::cast_sign_loss)]
fn frame_seed(t: f64, salt: u32) -> u32 {
    let step = (t * 10.0).floor().rem_euclid(f64::from(u32::MAX)) as u32;
    step.wrapping_mul(0x9e37_79b9) ^ salt
}

/// Smooth 1D noise in `[0, 1]` indexed by streak.
#[allow(clippy::cast_sign_loss)]
fn streak_noise(i: i64) -> f64 {
    let mut h = (i as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    h ^= h >> 31;
    h = h.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h ^= h >> 29;
    (h >> 11) as f64 / (1u64 << 53) as f64
}

// ─── Xorshift32 ──────────────────────────────────────────────────────────────

/// Minimal deterministic PRNG for grain and sparkle.
struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    const fn next(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    /// Random f64 in [0, 1].
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next()) / f64::from(u32::MAX)
    }

    /// Random f64 in [lo, hi].
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        (hi - lo).mul_add(self.next_f64(), lo)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
