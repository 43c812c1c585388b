//! Color palettes: weighted color lists and the operations that combine,
//! rank, pad, and vet them.
//!
//! A [`ColorPalette`] is two parallel lists: colors and their relative
//! weights. Weights are frequencies (pixel counts, attribute occurrences)
//! and are not normalized unless [`normalize_palette`] is called. An empty
//! palette is valid and means "nothing usable was found".

use std::collections::{HashMap, HashSet};

use hexhue_paint::color::Rgb;
use serde::{Deserialize, Serialize};

use crate::builtin::default_palette;

/// Minimum palette size guaranteed by [`ensure_minimum_colors`] by default.
pub const DEFAULT_MIN_COLORS: usize = 3;

/// How much heavier than average the top color must be for a palette to
/// count as informative.
const DOMINANCE_FACTOR: f64 = 1.5;

// ---------------------------------------------------------------------------
// ColorPalette
// ---------------------------------------------------------------------------

/// An ordered list of colors with parallel relative weights.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorPalette {
    pub colors: Vec<Rgb>,
    pub weights: Vec<f64>,
}

impl ColorPalette {
    /// The empty palette ("use fallback").
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            colors: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Build from parallel lists. Extra entries in the longer list are
    /// dropped so the lists always stay parallel.
    #[must_use]
    pub fn new(mut colors: Vec<Rgb>, mut weights: Vec<f64>) -> Self {
        let len = colors.len().min(weights.len());
        colors.truncate(len);
        weights.truncate(len);
        Self { colors, weights }
    }

    /// Every color with weight `1.0`.
    #[must_use]
    pub fn uniform(colors: Vec<Rgb>) -> Self {
        let weights = vec![1.0; colors.len()];
        Self { colors, weights }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Append one entry.
    pub fn push(&mut self, color: Rgb, weight: f64) {
        self.colors.push(color);
        self.weights.push(weight);
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// `(color, weight)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (Rgb, f64)> + '_ {
        self.colors.iter().copied().zip(self.weights.iter().copied())
    }
}

impl FromIterator<(Rgb, f64)> for ColorPalette {
    fn from_iter<I: IntoIterator<Item = (Rgb, f64)>>(iter: I) -> Self {
        let (colors, weights) = iter.into_iter().unzip();
        Self { colors, weights }
    }
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

/// Sort by weight (heaviest first) and rescale weights to sum to 1.
///
/// Ties keep their original order. A palette whose weights sum to zero
/// gets equal weights.
#[must_use]
pub fn normalize_palette(palette: &ColorPalette) -> ColorPalette {
    let mut pairs: Vec<(Rgb, f64)> = palette.iter().map(|(c, w)| (c, w.max(0.0))).collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));

    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    let count = pairs.len() as f64;
    pairs
        .into_iter()
        .map(|(c, w)| (c, if total > 0.0 { w / total } else { 1.0 / count }))
        .collect()
}

/// Pad a palette to at least `min_colors` entries.
///
/// Existing colors are duplicated cyclically. Every full pass over the
/// original colors halves the duplicate weight again: the first copies
/// carry half their source weight, the second copies a quarter, and so on.
/// An empty palette becomes the builtin default.
#[must_use]
pub fn ensure_minimum_colors(palette: &ColorPalette, min_colors: usize) -> ColorPalette {
    if palette.is_empty() {
        return default_palette();
    }

    let mut padded = palette.clone();
    let original = palette.len();
    let mut i = 0;
    while padded.len() < min_colors {
        let pass = i / original + 1;
        let factor = 0.5f64.powi(i32::try_from(pass).unwrap_or(i32::MAX));
        let source = i % original;
        padded.push(palette.colors[source], palette.weights[source] * factor);
        i += 1;
    }
    padded
}

/// Merge palettes, summing the weights of identical colors, heaviest
/// first. Ties keep first-seen order.
#[must_use]
pub fn combine_palettes(palettes: &[ColorPalette]) -> ColorPalette {
    let mut merged: Vec<(Rgb, f64)> = Vec::new();
    let mut index: HashMap<Rgb, usize> = HashMap::new();

    for (color, weight) in palettes.iter().flat_map(ColorPalette::iter) {
        match index.get(&color) {
            Some(&i) => merged[i].1 += weight,
            None => {
                index.insert(color, merged.len());
                merged.push((color, weight));
            }
        }
    }

    merged.sort_by(|a, b| b.1.total_cmp(&a.1));
    merged.into_iter().collect()
}

/// The single heaviest color (first one wins on ties).
#[must_use]
pub fn dominant_color(palette: &ColorPalette) -> Option<Rgb> {
    let mut best: Option<(Rgb, f64)> = None;
    for (color, weight) in palette.iter() {
        if best.is_none_or(|(_, w)| weight > w) {
            best = Some((color, weight));
        }
    }
    best.map(|(color, _)| color)
}

/// Quality gate for extracted palettes.
///
/// A good palette has at least two entries, at least two distinct colors,
/// nonzero total weight, and a top color clearly heavier than average
/// (flat distributions are usually noise, not a brand).
#[must_use]
pub fn is_good_palette(palette: &ColorPalette) -> bool {
    if palette.len() < 2 {
        return false;
    }

    let distinct: HashSet<Rgb> = palette.colors.iter().copied().collect();
    if distinct.len() < 2 {
        return false;
    }

    let total = palette.total_weight();
    if total <= 0.0 {
        return false;
    }

    let average = total / palette.len() as f64;
    let max = palette.weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    max > DOMINANCE_FACTOR * average
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// One entry of a palette preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub color: Rgb,
    /// Share of the palette's total weight, `0.0..=100.0`.
    pub percent: f64,
}

/// The heaviest `limit` colors with their share of the total weight, for
/// showing a user what was extracted from their logo.
#[must_use]
pub fn preview_palette(palette: &ColorPalette, limit: usize) -> Vec<Swatch> {
    normalize_palette(palette)
        .iter()
        .take(limit)
        .map(|(color, share)| Swatch {
            color,
            percent: (share * 1000.0).round() / 10.0,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
