//! ContrastEngine: WCAG 2.1 contrast checks and lightness adjustment.
//!
//! Measurement happens in relative luminance (the WCAG definition).
//! Adjustment happens in HSL lightness, in fixed steps, so the adjusted
//! color keeps its hue and saturation and stays recognizably the same
//! color, just lighter or darker.

use hexhue_paint::color::{Rgb, srgb_to_linear};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// AA threshold for normal text.
pub const AA_NORMAL: f64 = 4.5;
/// AA threshold for large text.
pub const AA_LARGE: f64 = 3.0;
/// AAA threshold for normal text.
pub const AAA_NORMAL: f64 = 7.0;
/// AAA threshold for large text.
pub const AAA_LARGE: f64 = 4.5;

/// Lightness points per adjustment step.
const ADJUST_STEP: f64 = 5.0;
/// Maximum adjustment steps.
const ADJUST_MAX_STEPS: u32 = 20;

/// Fallback text color on dark backgrounds.
pub const FALLBACK_ON_DARK: Rgb = Rgb::WHITE;
/// Fallback text color on light backgrounds (gray-800).
pub const FALLBACK_ON_LIGHT: Rgb = Rgb::new(0x1f, 0x29, 0x37);

const SUCCESS_BASE: Rgb = Rgb::new(0x22, 0xc5, 0x5e);
const WARNING_BASE: Rgb = Rgb::new(0xf5, 0x9e, 0x0b);
const ERROR_BASE: Rgb = Rgb::new(0xef, 0x44, 0x44);

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

/// Compute the relative luminance of a color per WCAG 2.1.
///
///   L = 0.2126 * `R_lin` + 0.7152 * `G_lin` + 0.0722 * `B_lin`
///
/// Returns a value in [0.0, 1.0] where 0 is black and 1 is white.
#[must_use]
pub fn relative_luminance(color: Rgb) -> f64 {
    let [r, g, b] = color.channels().map(|c| srgb_to_linear(c / 255.0));
    0.2126f64.mul_add(r, 0.7152f64.mul_add(g, 0.0722 * b))
}

/// Compute the WCAG 2.1 contrast ratio between two colors.
///
/// Returns a value in [1.0, 21.0], independent of argument order:
///   (`L_lighter` + 0.05) / (`L_darker` + 0.05)
#[must_use]
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG conformance level of a pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContrastLevel {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "FAIL")]
    Fail,
}

/// Result of [`check_contrast`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastResult {
    /// Contrast ratio, `>= 1`.
    pub ratio: f64,
    /// Whether the pairing meets AA.
    pub passes: bool,
    pub level: ContrastLevel,
}

/// Grade a foreground/background pairing.
#[must_use]
pub fn check_contrast(fg: Rgb, bg: Rgb, large_text: bool) -> ContrastResult {
    let ratio = contrast_ratio(fg, bg);
    let (aa, aaa) = if large_text {
        (AA_LARGE, AAA_LARGE)
    } else {
        (AA_NORMAL, AAA_NORMAL)
    };
    let level = if ratio >= aaa {
        ContrastLevel::Aaa
    } else if ratio >= aa {
        ContrastLevel::Aa
    } else {
        ContrastLevel::Fail
    };
    ContrastResult {
        ratio,
        passes: ratio >= aa,
        level,
    }
}

// ---------------------------------------------------------------------------
// Adjustment
// ---------------------------------------------------------------------------

/// Lightness adjustment ran out of budget.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ContrastError {
    #[error("contrast adjustment exhausted (best ratio {best_ratio:.2})")]
    AdjustmentExhausted { best_ratio: f64 },
}

/// Step `fg`'s HSL lightness away from `bg` until the pair reaches
/// `min_ratio`.
///
/// Lightens on dark backgrounds (luminance below 0.5) and darkens on light
/// ones, in steps of 5 points, for at most 20 steps or until the total
/// change would exceed `max_adjustment` points. A passing `fg` is returned
/// unchanged.
///
/// # Errors
///
/// [`ContrastError::AdjustmentExhausted`] if no step within budget passes.
pub fn try_adjust_for_contrast(
    fg: Rgb,
    bg: Rgb,
    min_ratio: f64,
    max_adjustment: f64,
) -> Result<Rgb, ContrastError> {
    let mut best_ratio = contrast_ratio(fg, bg);
    if best_ratio >= min_ratio {
        return Ok(fg);
    }

    let direction: f64 = if relative_luminance(bg) < 0.5 { 1.0 } else { -1.0 };
    let hsl = fg.to_hsl();
    let mut delta = 0.0;

    for _ in 0..ADJUST_MAX_STEPS {
        delta += ADJUST_STEP;
        if delta > max_adjustment {
            break;
        }
        let candidate = hsl.with_lightness(direction.mul_add(delta, hsl.l)).to_rgb();
        let ratio = contrast_ratio(candidate, bg);
        if ratio >= min_ratio {
            return Ok(candidate);
        }
        best_ratio = best_ratio.max(ratio);
    }

    Err(ContrastError::AdjustmentExhausted { best_ratio })
}

/// [`try_adjust_for_contrast`], resolving exhaustion to a fixed
/// high-contrast fallback: white on dark backgrounds, `#1f2937` on light.
#[must_use]
pub fn adjust_for_contrast(fg: Rgb, bg: Rgb, min_ratio: f64, max_adjustment: f64) -> Rgb {
    try_adjust_for_contrast(fg, bg, min_ratio, max_adjustment).unwrap_or_else(|err| {
        let fallback = fallback_for(bg);
        debug!(%fg, %bg, %fallback, error = %err, "using contrast fallback");
        fallback
    })
}

/// The fixed fallback text color for `bg`.
#[must_use]
pub fn fallback_for(bg: Rgb) -> Rgb {
    if relative_luminance(bg) < 0.5 {
        FALLBACK_ON_DARK
    } else {
        FALLBACK_ON_LIGHT
    }
}

// ---------------------------------------------------------------------------
// Semantic colors
// ---------------------------------------------------------------------------

/// Success/warning/error colors readable on a background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticColors {
    pub success: Rgb,
    pub warning: Rgb,
    pub error: Rgb,
}

/// Adjust the fixed semantic hues for AA contrast on `bg`.
#[must_use]
pub fn generate_semantic_colors(bg: Rgb) -> SemanticColors {
    let adjust = |base| adjust_for_contrast(base, bg, AA_NORMAL, 40.0);
    SemanticColors {
        success: adjust(SUCCESS_BASE),
        warning: adjust(WARNING_BASE),
        error: adjust(ERROR_BASE),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
