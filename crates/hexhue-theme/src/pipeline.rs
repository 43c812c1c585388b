//! The end-to-end extraction pipeline.
//!
//! For a team: catalog palette, else the team logo. For logo bytes:
//!
//! 1. markup extraction, kept if it passes [`is_good_palette`];
//! 2. raster quantization, kept if it passes;
//! 3. whichever of the two found more colors (markup wins ties);
//! 4. the builtin default.
//!
//! Nothing here returns an error. Every failure is logged and moves on to
//! the next stage, so the worst case is the default palette.
//!
//! [`PaletteExtractor`] memoizes per `logo_ref`. The memo is owned by the
//! extractor instance, never global, so independent extractors (parallel
//! tests, multiple hosts) cannot see each other's results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::builtin::{catalog_palette, default_palette};
use crate::extract::{MAX_PALETTE_COLORS, extract_markup_bytes};
use crate::palette::{ColorPalette, is_good_palette};
use crate::quantize::quantize_image;
use crate::source::LogoSource;
use crate::team::Team;

/// Which stage produced a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteSource {
    /// Hand-tuned catalog entry for the team id.
    Catalog,
    /// Vector markup, passed the quality gate.
    Markup,
    /// Raster median cut, passed the quality gate.
    Raster,
    /// Neither passed; the larger of the two.
    BestEffort,
    /// Nothing usable; the builtin default.
    Default,
}

/// A palette with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPalette {
    pub palette: ColorPalette,
    pub source: PaletteSource,
}

impl ExtractedPalette {
    #[must_use]
    pub const fn new(palette: ColorPalette, source: PaletteSource) -> Self {
        Self { palette, source }
    }

    /// The builtin default palette.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(default_palette(), PaletteSource::Default)
    }
}

// ---------------------------------------------------------------------------
// Byte-level resolution
// ---------------------------------------------------------------------------

/// Run the markup → raster → best effort → default chain over `bytes`.
#[must_use]
pub fn resolve_palette(bytes: &[u8], max_colors: usize) -> ExtractedPalette {
    let markup = extract_markup_bytes(bytes).unwrap_or_else(|err| {
        debug!(error = %err, "markup stage skipped");
        ColorPalette::empty()
    });
    if is_good_palette(&markup) {
        return ExtractedPalette::new(truncated(markup, max_colors), PaletteSource::Markup);
    }

    let raster = quantize_image(bytes, max_colors).unwrap_or_else(|err| {
        debug!(error = %err, "raster stage skipped");
        ColorPalette::empty()
    });
    if is_good_palette(&raster) {
        return ExtractedPalette::new(raster, PaletteSource::Raster);
    }

    debug!(
        markup_colors = markup.len(),
        raster_colors = raster.len(),
        "no palette passed the quality gate"
    );
    let best = if raster.len() > markup.len() { raster } else { markup };
    if best.is_empty() {
        ExtractedPalette::fallback()
    } else {
        ExtractedPalette::new(truncated(best, max_colors), PaletteSource::BestEffort)
    }
}

fn truncated(mut palette: ColorPalette, max_colors: usize) -> ColorPalette {
    palette.colors.truncate(max_colors);
    palette.weights.truncate(max_colors);
    palette
}

// ---------------------------------------------------------------------------
// PaletteExtractor
// ---------------------------------------------------------------------------

/// Memoizing front end to the pipeline.
#[derive(Debug, Clone)]
pub struct PaletteExtractor {
    memo: HashMap<String, ExtractedPalette>,
    max_colors: usize,
}

impl Default for PaletteExtractor {
    fn default() -> Self {
        Self::new(MAX_PALETTE_COLORS)
    }
}

impl PaletteExtractor {
    #[must_use]
    pub fn new(max_colors: usize) -> Self {
        Self {
            memo: HashMap::new(),
            max_colors,
        }
    }

    /// Palette for `team`: its catalog entry if one exists, otherwise the
    /// pipeline over its logo.
    pub async fn extract_for_team<S>(&mut self, source: &S, team: &Team) -> ExtractedPalette
    where
        S: LogoSource + ?Sized,
    {
        if let Some(palette) = catalog_palette(&team.id) {
            debug!(team = %team.id, "using catalog palette");
            return ExtractedPalette::new(palette, PaletteSource::Catalog);
        }
        self.extract_logo(source, &team.logo_ref).await
    }

    /// Palette for the logo at `logo_ref`.
    ///
    /// Successful resolutions are memoized. A failed fetch returns the
    /// default palette and is not memoized, so the next call retries.
    pub async fn extract_logo<S>(&mut self, source: &S, logo_ref: &str) -> ExtractedPalette
    where
        S: LogoSource + ?Sized,
    {
        if let Some(hit) = self.memo.get(logo_ref) {
            debug!(logo_ref, "extraction memo hit");
            return hit.clone();
        }

        let bytes = match source.fetch(logo_ref).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(logo_ref, error = %err, "logo fetch failed, using default palette");
                return ExtractedPalette::fallback();
            }
        };

        let extracted = resolve_palette(&bytes, self.max_colors);
        info!(
            logo_ref,
            source = ?extracted.source,
            colors = extracted.palette.len(),
            "extracted logo palette"
        );
        self.memo.insert(logo_ref.to_owned(), extracted.clone());
        extracted
    }

    /// Memoized result for `logo_ref`, if any.
    #[must_use]
    pub fn cached(&self, logo_ref: &str) -> Option<&ExtractedPalette> {
        self.memo.get(logo_ref)
    }

    /// Forget every memoized result.
    pub fn clear_cache(&mut self) {
        self.memo.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
