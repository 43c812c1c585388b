//! TokenGenerator: base colors to a full theme token set.
//!
//! A token set is fourteen named colors plus three 10-step lightness
//! scales (primary, secondary, accent). Generation is a pure function of
//! its input: unspecified tokens take fixed defaults, and equal input
//! always yields identical output.

use std::collections::BTreeMap;

use hexhue_paint::color::Rgb;
use serde::{Deserialize, Serialize};

/// Scale step names, lightest first.
pub const SCALE_STEPS: [u16; 10] = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900];

// ---------------------------------------------------------------------------
// ColorScale
// ---------------------------------------------------------------------------

/// Ten shades of one hue, indexed by [`SCALE_STEPS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<u16, Rgb>", try_from = "BTreeMap<u16, Rgb>")]
pub struct ColorScale([Rgb; 10]);

impl ColorScale {
    /// Shade for a step name (`50`, `100`, … `900`).
    #[must_use]
    pub fn get(&self, step: u16) -> Option<Rgb> {
        SCALE_STEPS
            .iter()
            .position(|&s| s == step)
            .map(|i| self.0[i])
    }

    /// `(step, shade)` pairs, lightest first.
    pub fn iter(&self) -> impl Iterator<Item = (u16, Rgb)> + '_ {
        SCALE_STEPS.iter().copied().zip(self.0.iter().copied())
    }

    #[must_use]
    pub const fn shades(&self) -> &[Rgb; 10] {
        &self.0
    }
}

impl From<ColorScale> for BTreeMap<u16, Rgb> {
    fn from(scale: ColorScale) -> Self {
        scale.iter().collect()
    }
}

impl TryFrom<BTreeMap<u16, Rgb>> for ColorScale {
    type Error = String;

    fn try_from(map: BTreeMap<u16, Rgb>) -> Result<Self, Self::Error> {
        let mut shades = [Rgb::BLACK; 10];
        for (slot, step) in shades.iter_mut().zip(SCALE_STEPS) {
            *slot = *map
                .get(&step)
                .ok_or_else(|| format!("color scale is missing step {step}"))?;
        }
        Ok(Self(shades))
    }
}

/// Expand `base` into a 10-step scale.
///
/// Hue and saturation are held; lightness targets are 95, 90, 80, 70, 60,
/// the base lightness at 500, then 10 points darker per step with floors
/// of 40, 30, 20, 10.
#[must_use]
pub fn generate_color_scale(base: Rgb) -> ColorScale {
    let hsl = base.to_hsl();
    let l = hsl.l;
    let targets = [
        95.0,
        90.0,
        80.0,
        70.0,
        60.0,
        l,
        (l - 10.0).max(40.0),
        (l - 20.0).max(30.0),
        (l - 30.0).max(20.0),
        (l - 40.0).max(10.0),
    ];
    ColorScale(targets.map(|t| hsl.with_lightness(t).to_rgb()))
}

// ---------------------------------------------------------------------------
// ThemeTokens
// ---------------------------------------------------------------------------

/// Caller-supplied tokens; `None` means "use the default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenOverrides {
    pub primary: Option<Rgb>,
    pub secondary: Option<Rgb>,
    pub accent: Option<Rgb>,
    pub bg_primary: Option<Rgb>,
    pub bg_secondary: Option<Rgb>,
    pub surface: Option<Rgb>,
    pub text: Option<Rgb>,
    pub text_muted: Option<Rgb>,
    pub text_inverse: Option<Rgb>,
    pub border: Option<Rgb>,
    pub focus_ring: Option<Rgb>,
    pub success: Option<Rgb>,
    pub warning: Option<Rgb>,
    pub error: Option<Rgb>,
}

/// The complete resolved token set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeTokens {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub bg_primary: Rgb,
    pub bg_secondary: Rgb,
    pub surface: Rgb,
    pub text: Rgb,
    pub text_muted: Rgb,
    pub text_inverse: Rgb,
    pub border: Rgb,
    pub focus_ring: Rgb,
    pub success: Rgb,
    pub warning: Rgb,
    pub error: Rgb,
    pub primary_scale: ColorScale,
    pub secondary_scale: ColorScale,
    pub accent_scale: ColorScale,
}

impl Default for ThemeTokens {
    fn default() -> Self {
        generate_theme_tokens(&TokenOverrides::default())
    }
}

impl ThemeTokens {
    /// Style variables for the token sink: `--color-<token>` for every
    /// token and `--color-<hue>-<step>` for every scale shade, as `#rrggbb`.
    #[must_use]
    pub fn css_variables(&self) -> Vec<(String, String)> {
        let named = [
            ("primary", self.primary),
            ("secondary", self.secondary),
            ("accent", self.accent),
            ("bg-primary", self.bg_primary),
            ("bg-secondary", self.bg_secondary),
            ("surface", self.surface),
            ("text", self.text),
            ("text-muted", self.text_muted),
            ("text-inverse", self.text_inverse),
            ("border", self.border),
            ("focus-ring", self.focus_ring),
            ("success", self.success),
            ("warning", self.warning),
            ("error", self.error),
        ];
        let scales = [
            ("primary", &self.primary_scale),
            ("secondary", &self.secondary_scale),
            ("accent", &self.accent_scale),
        ];

        let mut vars: Vec<(String, String)> = named
            .iter()
            .map(|(name, color)| (format!("--color-{name}"), color.to_hex()))
            .collect();
        for (hue, scale) in scales {
            vars.extend(
                scale
                    .iter()
                    .map(|(step, color)| (format!("--color-{hue}-{step}"), color.to_hex())),
            );
        }
        vars
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Built-in token defaults (dark slate theme, emerald primary).
mod defaults {
    use hexhue_paint::color::Rgb;

    pub const PRIMARY: Rgb = Rgb::new(0x10, 0xb9, 0x81);
    pub const SECONDARY: Rgb = Rgb::new(0x3b, 0x82, 0xf6);
    pub const ACCENT: Rgb = Rgb::new(0xf5, 0x9e, 0x0b);
    pub const BG_PRIMARY: Rgb = Rgb::new(0x0f, 0x17, 0x2a);
    pub const BG_SECONDARY: Rgb = Rgb::new(0x1e, 0x29, 0x3b);
    pub const SURFACE: Rgb = Rgb::new(0x33, 0x41, 0x55);
    pub const TEXT: Rgb = Rgb::new(0xf8, 0xfa, 0xfc);
    pub const TEXT_MUTED: Rgb = Rgb::new(0x94, 0xa3, 0xb8);
    pub const TEXT_INVERSE: Rgb = Rgb::new(0x0f, 0x17, 0x2a);
    pub const BORDER: Rgb = Rgb::new(0x47, 0x55, 0x69);
    pub const FOCUS_RING: Rgb = Rgb::new(0x3b, 0x82, 0xf6);
    pub const SUCCESS: Rgb = Rgb::new(0x22, 0xc5, 0x5e);
    pub const WARNING: Rgb = Rgb::new(0xf5, 0x9e, 0x0b);
    pub const ERROR: Rgb = Rgb::new(0xef, 0x44, 0x44);
}

/// Merge `overrides` over the defaults and derive the scales.
#[must_use]
pub fn generate_theme_tokens(overrides: &TokenOverrides) -> ThemeTokens {
    let primary = overrides.primary.unwrap_or(defaults::PRIMARY);
    let secondary = overrides.secondary.unwrap_or(defaults::SECONDARY);
    let accent = overrides.accent.unwrap_or(defaults::ACCENT);

    ThemeTokens {
        primary,
        secondary,
        accent,
        bg_primary: overrides.bg_primary.unwrap_or(defaults::BG_PRIMARY),
        bg_secondary: overrides.bg_secondary.unwrap_or(defaults::BG_SECONDARY),
        surface: overrides.surface.unwrap_or(defaults::SURFACE),
        text: overrides.text.unwrap_or(defaults::TEXT),
        text_muted: overrides.text_muted.unwrap_or(defaults::TEXT_MUTED),
        text_inverse: overrides.text_inverse.unwrap_or(defaults::TEXT_INVERSE),
        border: overrides.border.unwrap_or(defaults::BORDER),
        focus_ring: overrides.focus_ring.unwrap_or(defaults::FOCUS_RING),
        success: overrides.success.unwrap_or(defaults::SUCCESS),
        warning: overrides.warning.unwrap_or(defaults::WARNING),
        error: overrides.error.unwrap_or(defaults::ERROR),
        primary_scale: generate_color_scale(primary),
        secondary_scale: generate_color_scale(secondary),
        accent_scale: generate_color_scale(accent),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── generate_color_scale ────────────────────────────────────────

    #[test]
    fn scale_500_is_the_base() {
        let base = Rgb::new(0x3b, 0x82, 0xf6);
        let scale = generate_color_scale(base);
        let shade = scale.get(500).unwrap();
        // HSL round trip is within one unit per channel.
        assert!(shade.r.abs_diff(base.r) <= 1);
        assert!(shade.g.abs_diff(base.g) <= 1);
        assert!(shade.b.abs_diff(base.b) <= 1);
    }

    #[test]
    fn scale_lightness_targets() {
        let scale = generate_color_scale(Rgb::new(0xff, 0x00, 0x00)); // L = 50
        let lightness: Vec<i64> = scale
            .iter()
            .map(|(_, c)| c.to_hsl().l.round() as i64)
            .collect();
        assert_eq!(lightness, vec![95, 90, 80, 70, 60, 50, 40, 30, 20, 10]);
    }

    #[test]
    fn scale_floors_apply_to_dark_bases() {
        let scale = generate_color_scale(Rgb::new(0x33, 0x00, 0x00)); // L = 10
        let l = |step| scale.get(step).unwrap().to_hsl().l.round() as i64;
        assert_eq!(l(600), 40);
        assert_eq!(l(700), 30);
        assert_eq!(l(800), 20);
        assert_eq!(l(900), 10);
    }

    #[test]
    fn scale_keeps_hue() {
        let base = Rgb::new(0x10, 0xb9, 0x81);
        let hue = base.to_hsl().h;
        for (step, shade) in generate_color_scale(base).iter() {
            let diff = (shade.to_hsl().h - hue).abs();
            assert!(diff < 4.0, "step {step} hue drifted by {diff}");
        }
    }

    #[test]
    fn unknown_step_is_none() {
        assert_eq!(generate_color_scale(Rgb::WHITE).get(450), None);
    }

    #[test]
    fn scale_serializes_as_step_map() {
        let scale = generate_color_scale(Rgb::new(0xff, 0x00, 0x00));
        let json = serde_json::to_value(scale).unwrap();
        assert_eq!(json["500"], "#ff0000");
        let back: ColorScale = serde_json::from_value(json).unwrap();
        assert_eq!(back, scale);
    }

    // ── generate_theme_tokens ───────────────────────────────────────

    #[test]
    fn overrides_win_and_defaults_fill_in() {
        let tokens = generate_theme_tokens(&TokenOverrides {
            primary: Some(Rgb::new(0xff, 0x00, 0x00)),
            secondary: Some(Rgb::new(0x00, 0xff, 0x00)),
            accent: Some(Rgb::new(0x00, 0x00, 0xff)),
            ..TokenOverrides::default()
        });
        assert_eq!(tokens.primary.to_hex(), "#ff0000");
        assert_eq!(tokens.secondary.to_hex(), "#00ff00");
        assert_eq!(tokens.accent.to_hex(), "#0000ff");
        assert_eq!(tokens.bg_primary.to_hex(), "#0f172a");
        assert_eq!(tokens.text.to_hex(), "#f8fafc");
        assert_eq!(tokens.primary_scale.get(500), Some(Rgb::new(0xff, 0x00, 0x00)));
    }

    #[test]
    fn generation_is_referentially_transparent() {
        let overrides = TokenOverrides {
            primary: Some(Rgb::new(0x12, 0x34, 0x56)),
            ..TokenOverrides::default()
        };
        let a = serde_json::to_string(&generate_theme_tokens(&overrides)).unwrap();
        let b = serde_json::to_string(&generate_theme_tokens(&overrides)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn overrides_deserialize_from_partial_json() {
        let o: TokenOverrides = serde_json::from_str(r##"{"primary":"#ff0000"}"##).unwrap();
        assert_eq!(o.primary, Some(Rgb::new(255, 0, 0)));
        assert_eq!(o.text, None);
    }

    // ── css_variables ───────────────────────────────────────────────

    #[test]
    fn css_variables_cover_tokens_and_scales() {
        let vars = ThemeTokens::default().css_variables();
        assert_eq!(vars.len(), 14 + 3 * 10);
        assert!(vars.contains(&("--color-bg-primary".into(), "#0f172a".into())));
        assert!(vars.contains(&("--color-primary-500".into(), "#10b981".into())));
        assert!(vars.iter().any(|(name, _)| name == "--color-accent-900"));
    }
}
