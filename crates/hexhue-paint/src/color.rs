// SPDX-License-Identifier: MIT
//
// hexhue color system: 8-bit sRGB storage with HSL editing.
//
// Single-character variable names (r, g, b, h, s, l, p, q) are the
// standard mathematical convention in color science. Renaming them would
// make the code harder to compare against reference formulas.
#![allow(clippy::many_single_char_names)]
//
// Theme colors arrive as strings from everywhere: logo markup attributes,
// catalog entries, persisted settings. Everything is parsed once into `Rgb`
// and stays there. Lightness edits (contrast adjustment, color scales)
// round-trip through `Hsl`; the round trip is exact to integer precision.
//
// Conversion pipeline:
//
//   "#abc" | "#aabbcc" | "rgb(r, g, b)" | named  →  Rgb  ↔  Hsl
//                                                    │
//                                                    └→ linear sRGB (WCAG)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Significance ────────────────────────────────────────────────────────────

/// Exclusive lower bound on mean channel brightness for a brand color.
pub const MIN_SIGNIFICANT_BRIGHTNESS: f64 = 20.0;

/// Exclusive upper bound on mean channel brightness for a brand color.
pub const MAX_SIGNIFICANT_BRIGHTNESS: f64 = 235.0;

/// Saturation (`(max - min) / max`) a brand color must exceed.
pub const MIN_SIGNIFICANT_SATURATION: f64 = 0.1;

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// An 8-bit sRGB color.
///
/// Serializes as a lowercase `#rrggbb` string, which is also its `Display`
/// form, so palettes and tokens read naturally in JSON and CSS.
///
/// # Examples
///
/// ```
/// use hexhue_paint::color::Rgb;
///
/// let red: Rgb = "#f00".parse().unwrap();
/// assert_eq!(red, Rgb::new(255, 0, 0));
/// assert_eq!(red.to_hex(), "#ff0000");
///
/// let teal = Rgb::parse_css("rgb(0, 128, 128)").unwrap();
/// assert_eq!(teal, Rgb::parse_css("teal").unwrap());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB` (the `#` is optional).
    #[must_use]
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let bytes = s.as_bytes();

        match bytes.len() {
            3 => {
                let r = parse_hex_digit(bytes[0])?;
                let g = parse_hex_digit(bytes[1])?;
                let b = parse_hex_digit(bytes[2])?;
                Some(Self::new(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let r = parse_hex_byte(&bytes[0..2])?;
                let g = parse_hex_byte(&bytes[2..4])?;
                let b = parse_hex_byte(&bytes[4..6])?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    /// Parse any color value found in markup: hex, `rgb()`/`rgba()`, or a
    /// name from the small builtin keyword table.
    ///
    /// Returns `None` for `none`, `transparent`, `currentColor`, paint
    /// server references (`url(#grad)`), and anything unrecognized.
    #[must_use]
    pub fn parse_css(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if value.starts_with('#') {
            return Self::parse_hex(value);
        }

        let lower = value.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            return parse_rgb_function(args);
        }

        named_color(&lower)
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba(r, g, b, a)` with `alpha` clamped to `[0, 1]`.
    #[must_use]
    pub fn to_rgba_string(self, alpha: f64) -> String {
        let alpha = alpha.clamp(0.0, 1.0);
        format!("rgba({}, {}, {}, {alpha})", self.r, self.g, self.b)
    }

    /// Channels as `f64` in `[0, 255]`.
    #[inline]
    #[must_use]
    pub fn channels(self) -> [f64; 3] {
        [f64::from(self.r), f64::from(self.g), f64::from(self.b)]
    }

    /// Mean channel brightness, `(r + g + b) / 3`, in `[0, 255]`.
    #[inline]
    #[must_use]
    pub fn brightness(self) -> f64 {
        let [r, g, b] = self.channels();
        (r + g + b) / 3.0
    }

    /// HSV-style saturation `(max - min) / max`, `0.0` for black.
    #[must_use]
    pub fn saturation(self) -> f64 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        if max == 0 {
            return 0.0;
        }
        f64::from(max - min) / f64::from(max)
    }

    /// Whether this color is likely a brand color rather than an outline,
    /// shadow, or neutral fill.
    ///
    /// Near-black, near-white, and gray colors are rejected.
    #[must_use]
    pub fn is_significant(self) -> bool {
        let brightness = self.brightness();
        brightness > MIN_SIGNIFICANT_BRIGHTNESS
            && brightness < MAX_SIGNIFICANT_BRIGHTNESS
            && self.saturation() > MIN_SIGNIFICANT_SATURATION
    }

    /// Convert to HSL.
    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        let [r, g, b] = self.channels().map(|c| c / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if (max - min).abs() < f64::EPSILON {
            return Hsl::new(0.0, 0.0, l * 100.0);
        }

        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if (max - r).abs() < f64::EPSILON {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl::new(h * 60.0, s * 100.0, l * 100.0)
    }

    /// Increase HSL lightness by `points` (0–100 scale, clamped).
    #[must_use]
    pub fn lighten(self, points: f64) -> Self {
        let hsl = self.to_hsl();
        hsl.with_lightness(hsl.l + points).to_rgb()
    }

    /// Decrease HSL lightness by `points` (0–100 scale, clamped).
    #[must_use]
    pub fn darken(self, points: f64) -> Self {
        self.lighten(-points)
    }

    /// Linear interpolation in sRGB. `t = 0` returns `self`, `t = 1`
    /// returns `other`.
    #[must_use]
    pub fn mix(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| {
            to_u8(f64::from(a).mul_add(1.0 - t, f64::from(b) * t) / 255.0)
        };
        Self::new(lerp(self.r, other.r), lerp(self.g, other.g), lerp(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb({self})")
    }
}

/// Error for strict color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color value: {0:?}")]
pub struct ColorParseError(pub String);

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_css(s).ok_or_else(|| ColorParseError(s.to_owned()))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

// ─── Hsl ─────────────────────────────────────────────────────────────────────

/// HSL color: hue in degrees `[0, 360)`, saturation and lightness in
/// `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    #[inline]
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Copy with lightness replaced (clamped to `[0, 100]`).
    #[inline]
    #[must_use]
    pub fn with_lightness(self, l: f64) -> Self {
        Self {
            l: l.clamp(0.0, 100.0),
            ..self
        }
    }

    /// Convert to 8-bit sRGB with rounding.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        if s <= 0.0 {
            let v = to_u8(l);
            return Rgb::new(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l.mul_add(-s, l + s) };
        let p = 2.0f64.mul_add(l, -q);

        Rgb::new(
            to_u8(hue_to_channel(p, q, h + 1.0 / 3.0)),
            to_u8(hue_to_channel(p, q, h)),
            to_u8(hue_to_channel(p, q, h - 1.0 / 3.0)),
        )
    }
}

impl From<Rgb> for Hsl {
    fn from(color: Rgb) -> Self {
        color.to_hsl()
    }
}

impl From<Hsl> for Rgb {
    fn from(hsl: Hsl) -> Self {
        hsl.to_rgb()
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        ((q - p) * 6.0).mul_add(t, p)
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        ((q - p) * 6.0).mul_add(2.0 / 3.0 - t, p)
    } else {
        p
    }
}

// ─── Linearization ───────────────────────────────────────────────────────────

/// WCAG 2.1 sRGB → linear transfer for one channel in `[0, 1]`.
///
/// Uses the 0.03928 threshold from the WCAG 2.1 text (the sRGB standard
/// uses 0.04045; the difference never changes an 8-bit result).
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.039_28 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

// ─── Parsing helpers ─────────────────────────────────────────────────────────

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

/// Parse the argument list of `rgb(...)` / `rgba(...)` (closing paren
/// included). Accepts comma or whitespace separators; alpha is ignored.
fn parse_rgb_function(args: &str) -> Option<Rgb> {
    let inner = args.strip_suffix(')')?;
    let mut parts = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty());

    let mut channel = || -> Option<u8> {
        let part = parts.next()?;
        let value: f64 = if let Some(pct) = part.strip_suffix('%') {
            pct.parse::<f64>().ok()? * 2.55
        } else {
            part.parse().ok()?
        };
        value.is_finite().then(|| to_u8(value.clamp(0.0, 255.0) / 255.0))
    };

    Some(Rgb::new(channel()?, channel()?, channel()?))
}

/// Color keywords recognized in markup and class names.
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("orange", Rgb::new(255, 165, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("navy", Rgb::new(0, 0, 128)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("teal", Rgb::new(0, 128, 128)),
    ("gold", Rgb::new(255, 215, 0)),
    ("silver", Rgb::new(192, 192, 192)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("crimson", Rgb::new(220, 20, 60)),
    ("pink", Rgb::new(255, 192, 203)),
    ("lime", Rgb::new(0, 255, 0)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
];

/// Look up a lowercase color keyword.
#[must_use]
pub fn named_color(name: &str) -> Option<Rgb> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, color)| color)
}

/// Convert a float (0.0–1.0) to a u8 (0–255) with correct rounding.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(v: f64) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    v.mul_add(255.0, 0.5).clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    // ── Hex parsing ──────────────────────────────────────────────────────

    #[test]
    fn hex_parsing_rrggbb() {
        assert_eq!(Rgb::parse_hex("#ff8000"), Some(Rgb::new(255, 128, 0)));
    }

    #[test]
    fn hex_parsing_short_expands() {
        assert_eq!(Rgb::parse_hex("#abc"), Some(Rgb::new(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn hex_parsing_no_hash() {
        assert_eq!(Rgb::parse_hex("00FF00"), Some(Rgb::new(0, 255, 0)));
    }

    #[test]
    fn hex_parsing_invalid() {
        assert!(Rgb::parse_hex("#gg0000").is_none());
        assert!(Rgb::parse_hex("#12345").is_none());
        assert!(Rgb::parse_hex("").is_none());
    }

    #[test]
    fn to_hex_is_lowercase_six_digits() {
        assert_eq!(Rgb::new(0xAB, 0x0C, 0xFF).to_hex(), "#ab0cff");
    }

    // ── CSS values ───────────────────────────────────────────────────────

    #[test]
    fn css_rgb_function() {
        assert_eq!(Rgb::parse_css("rgb(200, 40, 40)"), Some(Rgb::new(200, 40, 40)));
        assert_eq!(Rgb::parse_css("RGB(1,2,3)"), Some(Rgb::new(1, 2, 3)));
        assert_eq!(Rgb::parse_css("rgba(10, 20, 30, 0.5)"), Some(Rgb::new(10, 20, 30)));
        assert_eq!(Rgb::parse_css("rgb(100%, 0%, 50%)"), Some(Rgb::new(255, 0, 128)));
    }

    #[test]
    fn css_rgb_function_rejects_garbage() {
        assert!(Rgb::parse_css("rgb(1, 2)").is_none());
        assert!(Rgb::parse_css("rgb(a, b, c)").is_none());
        assert!(Rgb::parse_css("rgb(1, 2, 3").is_none());
    }

    #[test]
    fn css_named_colors() {
        assert_eq!(Rgb::parse_css("Red"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::parse_css(" navy "), Some(Rgb::new(0, 0, 128)));
    }

    #[test]
    fn css_non_colors() {
        for value in ["none", "transparent", "currentColor", "url(#grad)", "inherit", ""] {
            assert!(Rgb::parse_css(value).is_none(), "{value} should not parse");
        }
    }

    #[test]
    fn from_str_reports_input() {
        let err = "nope".parse::<Rgb>().unwrap_err();
        assert_eq!(err, ColorParseError("nope".to_owned()));
    }

    #[test]
    fn string_conversion_uses_hex() {
        let text = String::from(Rgb::new(16, 185, 129));
        assert_eq!(text, "#10b981");
        assert_eq!(Rgb::try_from(text).unwrap(), Rgb::new(16, 185, 129));
    }

    // ── HSL ──────────────────────────────────────────────────────────────

    #[test]
    fn hsl_of_primaries() {
        let red = Rgb::new(255, 0, 0).to_hsl();
        assert!(approx_eq(red.h, 0.0, 1e-9));
        assert!(approx_eq(red.s, 100.0, 1e-9));
        assert!(approx_eq(red.l, 50.0, 1e-9));

        let green = Rgb::new(0, 255, 0).to_hsl();
        assert!(approx_eq(green.h, 120.0, 1e-9));

        let blue = Rgb::new(0, 0, 255).to_hsl();
        assert!(approx_eq(blue.h, 240.0, 1e-9));
    }

    #[test]
    fn hsl_of_gray_has_no_saturation() {
        let gray = Rgb::new(128, 128, 128).to_hsl();
        assert!(approx_eq(gray.s, 0.0, 1e-9));
        assert!(approx_eq(gray.h, 0.0, 1e-9));
    }

    #[test]
    fn hsl_roundtrip_samples() {
        for color in [
            Rgb::new(255, 0, 0),
            Rgb::new(16, 185, 129),
            Rgb::new(31, 41, 55),
            Rgb::new(250, 250, 249),
            Rgb::new(1, 2, 3),
            Rgb::BLACK,
            Rgb::WHITE,
        ] {
            assert_eq!(color.to_hsl().to_rgb(), color);
        }
    }

    #[test]
    fn hue_wraps_negative() {
        let a = Hsl::new(-120.0, 100.0, 50.0).to_rgb();
        let b = Hsl::new(240.0, 100.0, 50.0).to_rgb();
        assert_eq!(a, b);
    }

    #[test]
    fn lighten_and_darken() {
        let base = Rgb::new(59, 130, 246);
        assert!(base.lighten(10.0).to_hsl().l > base.to_hsl().l);
        assert!(base.darken(10.0).to_hsl().l < base.to_hsl().l);
        assert_eq!(base.lighten(200.0), Rgb::WHITE);
        assert_eq!(base.darken(200.0), Rgb::BLACK);
    }

    // ── Significance ─────────────────────────────────────────────────────

    #[test]
    fn gray_is_insignificant() {
        assert!(!Rgb::new(128, 128, 128).is_significant());
    }

    #[test]
    fn saturated_midtone_is_significant() {
        assert!(Rgb::new(200, 40, 40).is_significant());
    }

    #[test]
    fn extremes_are_insignificant() {
        assert!(!Rgb::new(10, 0, 0).is_significant(), "near black");
        assert!(!Rgb::new(255, 250, 240).is_significant(), "near white");
        assert!(!Rgb::BLACK.is_significant());
    }

    // ── Mixing / strings ─────────────────────────────────────────────────

    #[test]
    fn mix_endpoints() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(200, 100, 50);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(a.mix(b, 0.5), Rgb::new(100, 50, 25));
    }

    #[test]
    fn rgba_string() {
        assert_eq!(Rgb::new(1, 2, 3).to_rgba_string(0.25), "rgba(1, 2, 3, 0.25)");
        assert_eq!(Rgb::new(1, 2, 3).to_rgba_string(7.0), "rgba(1, 2, 3, 1)");
    }

    #[test]
    fn linearization_endpoints() {
        assert!(approx_eq(srgb_to_linear(0.0), 0.0, 1e-12));
        assert!(approx_eq(srgb_to_linear(1.0), 1.0, 1e-12));
        assert!(srgb_to_linear(0.5) > 0.2 && srgb_to_linear(0.5) < 0.22);
    }
}
