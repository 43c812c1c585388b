// SPDX-License-Identifier: MIT
//
// Per-hex color distribution.
//
// `get_hex_color` maps a hex and a `DistributionConfig` to the color,
// alpha, and intensity of that cell. Three independent draws feed it:
//
//   - color:     hex_random(hex, seed), weighted by palette weight
//   - alpha:     3-octave value noise at `noise_scale`, seed + 10
//   - intensity: hex_random(hex, seed + 1), biased by a coarser noise
//                field at `cluster_scale`, seed + 20
//
// The noise fields are coherent: neighboring hexes get similar values, so
// alpha drifts smoothly across the grid and bright cells bunch together
// instead of scattering. The whole mapping is a pure function of its
// inputs, which is what makes caching by hex coordinate valid.

use hexhue_paint::color::Rgb;
use hexhue_theme::palette::ColorPalette;
use serde::{Deserialize, Serialize};

use crate::hex::{HexCoord, hex_random};

/// Color used when the palette is empty.
pub const FALLBACK_COLOR: Rgb = Rgb::new(0x10, 0xb9, 0x81);
/// Alpha used when the palette is empty.
pub const FALLBACK_ALPHA: f64 = 0.1;
/// Intensity used when the palette is empty.
pub const FALLBACK_INTENSITY: f64 = 0.5;

const ALPHA_SEED_OFFSET: u32 = 10;
const INTENSITY_SEED_OFFSET: u32 = 1;
const CLUSTER_SEED_OFFSET: u32 = 20;
const NOISE_OCTAVES: u32 = 3;

// ─── Config ──────────────────────────────────────────────────────────────────

/// Inputs to [`get_hex_color`].
///
/// The ranges, clustering, and scales are tuning knobs with no physical
/// meaning; the defaults give a subtle, slowly varying field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    pub palette: ColorPalette,
    /// `[lo, hi]` alpha bounds.
    pub alpha_range: [f64; 2],
    /// `[lo, hi]` intensity bounds.
    pub intensity_range: [f64; 2],
    /// How strongly the cluster field biases intensity, `>= 0`.
    pub clustering: f64,
    pub animation_seed: u32,
    /// Spatial frequency of the alpha field, per hex.
    pub noise_scale: f64,
    /// Spatial frequency of the cluster field, per hex.
    pub cluster_scale: f64,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            palette: ColorPalette::empty(),
            alpha_range: [0.1, 0.4],
            intensity_range: [0.3, 1.0],
            clustering: 0.5,
            animation_seed: 0,
            noise_scale: 0.08,
            cluster_scale: 0.025,
        }
    }
}

/// The resolved look of one hex cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSample {
    pub color: Rgb,
    /// `0.0..=1.0`.
    pub alpha: f64,
    /// `0.0..=1.0`.
    pub intensity: f64,
}

impl ColorSample {
    /// What an empty palette resolves to.
    pub const FALLBACK: Self = Self {
        color: FALLBACK_COLOR,
        alpha: FALLBACK_ALPHA,
        intensity: FALLBACK_INTENSITY,
    };

    /// Alpha the cell is painted with.
    #[inline]
    #[must_use]
    pub fn fill_alpha(&self) -> f64 {
        (self.alpha * self.intensity).clamp(0.0, 1.0)
    }
}

// ─── Distribution ────────────────────────────────────────────────────────────

/// Resolve one hex.
#[must_use]
pub fn get_hex_color(hex: HexCoord, config: &DistributionConfig) -> ColorSample {
    let palette = &config.palette;
    if palette.is_empty() {
        return ColorSample::FALLBACK;
    }
    let seed = config.animation_seed;

    let color = select_weighted(palette, hex_random(hex, seed));

    let (q, r) = (f64::from(hex.q), f64::from(hex.r));
    let alpha_noise = fractal_noise(
        q * config.noise_scale,
        r * config.noise_scale,
        seed.wrapping_add(ALPHA_SEED_OFFSET),
    );
    let alpha = lerp_range(config.alpha_range, to_unit(alpha_noise));

    let random2 = hex_random(hex, seed.wrapping_add(INTENSITY_SEED_OFFSET));
    let cluster = to_unit(fractal_noise(
        q * config.cluster_scale,
        r * config.cluster_scale,
        seed.wrapping_add(CLUSTER_SEED_OFFSET),
    ));
    let bias = config.clustering.max(0.0).mul_add(cluster.mul_add(2.0, -1.0), 1.0);
    let intensity = lerp_range(config.intensity_range, (random2 * bias).clamp(0.0, 1.0));

    ColorSample {
        color,
        alpha: alpha.clamp(0.0, 1.0),
        intensity: intensity.clamp(0.0, 1.0),
    }
}

/// Pick a palette color with probability proportional to its weight.
///
/// `draw` is in `[0, 1)`. Zero total weight degrades to a uniform pick.
/// The last color catches floating-point overshoot.
fn select_weighted(palette: &ColorPalette, draw: f64) -> Rgb {
    let colors = &palette.colors;
    let last = colors[colors.len() - 1];
    let total: f64 = palette.weights.iter().map(|w| w.max(0.0)).sum();

    if total <= 0.0 {
        let index = ((draw * colors.len() as f64) as usize).min(colors.len() - 1);
        return colors[index];
    }

    let target = draw * total;
    let mut cumulative = 0.0;
    for (color, weight) in palette.iter() {
        cumulative += weight.max(0.0);
        if target < cumulative {
            return color;
        }
    }
    last
}

// ─── Noise ───────────────────────────────────────────────────────────────────

/// Smooth 2D value noise in `[-1, 1]`.
///
/// Lattice values come from [`hex_random`] on integer points and are
/// blended with smoothstep weights.
#[must_use]
pub fn value_noise(x: f64, y: f64, seed: u32) -> f64 {
    let (x0, y0) = (x.floor(), y.floor());
    let (tx, ty) = (smoothstep(x - x0), smoothstep(y - y0));
    let (ix, iy) = (x0 as i32, y0 as i32);

    let lattice = |dx: i32, dy: i32| {
        hex_random(HexCoord::new(ix.wrapping_add(dx), iy.wrapping_add(dy)), seed).mul_add(2.0, -1.0)
    };
    let top = lerp(lattice(0, 0), lattice(1, 0), tx);
    let bottom = lerp(lattice(0, 1), lattice(1, 1), tx);
    lerp(top, bottom, ty)
}

/// Three octaves of [`value_noise`], each at double the frequency and half
/// the amplitude of the last, normalized back to `[-1, 1]`.
#[must_use]
pub fn fractal_noise(x: f64, y: f64, seed: u32) -> f64 {
    let mut sum = 0.0;
    let mut norm = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    for octave in 0..NOISE_OCTAVES {
        sum += amplitude * value_noise(x * frequency, y * frequency, seed.wrapping_add(octave));
        norm += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    sum / norm
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * 2.0f64.mul_add(-t, 3.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a).mul_add(t, a)
}

#[inline]
fn lerp_range([lo, hi]: [f64; 2], t: f64) -> f64 {
    lerp(lo, hi, t)
}

/// Map noise in `[-1, 1]` to `[0, 1]`.
#[inline]
fn to_unit(n: f64) -> f64 {
    ((n + 1.0) / 2.0).clamp(0.0, 1.0)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
