//! ColorExtractor: brand colors straight from vector logo markup.
//!
//! Vector logos carry their colors as attribute text, so reading them
//! beats rasterizing: every `fill` and `stroke` (as an attribute or a
//! `style` declaration) and a few color keywords in `class` names become
//! candidates. Candidates that fail [`Rgb::is_significant`] are dropped,
//! since near-black strokes, white backgrounds, and grays are almost
//! always outlines rather than brand. What survives is ranked by how
//! often it occurs.

use std::collections::HashMap;

use hexhue_paint::color::{Rgb, named_color};
use roxmltree::{Document, Node, ParsingOptions};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::palette::ColorPalette;
use crate::source::LogoSource;

/// Number of colors an extracted palette keeps.
pub const MAX_PALETTE_COLORS: usize = 6;

/// Keywords recognized as substrings of `class` attributes.
const CLASS_COLOR_KEYWORDS: &[&str] = &[
    "red", "blue", "green", "yellow", "orange", "purple", "navy", "teal", "maroon", "gold",
    "crimson",
];

/// Paint properties read from attributes and `style` declarations.
const PAINT_PROPERTIES: [&str; 2] = ["fill", "stroke"];

// ---------------------------------------------------------------------------
// Markup
// ---------------------------------------------------------------------------

/// Rank the significant colors in vector markup.
///
/// Weights are occurrence counts; ties keep document order. At most
/// [`MAX_PALETTE_COLORS`] colors are returned. Markup without usable
/// colors yields an empty palette, not an error.
///
/// # Errors
///
/// [`ExtractError::Parse`] if `markup` is not well-formed XML.
pub fn extract_markup_colors(markup: &str) -> Result<ColorPalette, ExtractError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let doc = Document::parse_with_options(markup, options)?;

    let mut counter = ColorCounter::default();
    for node in doc.descendants().filter(Node::is_element) {
        for property in PAINT_PROPERTIES {
            if let Some(value) = node.attribute(property) {
                counter.offer(Rgb::parse_css(value));
            }
        }
        if let Some(style) = node.attribute("style") {
            for value in style_paint_values(style) {
                counter.offer(Rgb::parse_css(value));
            }
        }
        if let Some(class) = node.attribute("class") {
            let class = class.to_ascii_lowercase();
            for keyword in CLASS_COLOR_KEYWORDS {
                if class.contains(keyword) {
                    counter.offer(named_color(keyword));
                }
            }
        }
    }

    let palette = counter.into_palette(MAX_PALETTE_COLORS);
    debug!(colors = palette.len(), "extracted markup colors");
    Ok(palette)
}

/// Decode `bytes` as UTF-8 markup and extract its colors.
///
/// # Errors
///
/// [`ExtractError::Encoding`] for non-text bytes, otherwise as
/// [`extract_markup_colors`].
pub fn extract_markup_bytes(bytes: &[u8]) -> Result<ColorPalette, ExtractError> {
    let markup = std::str::from_utf8(bytes)?;
    extract_markup_colors(markup)
}

/// Fetch `logo_ref` and extract its markup colors.
///
/// Never fails: fetch, encoding, and parse failures are logged and turn
/// into an empty palette so the caller falls back.
pub async fn extract_from_source<S>(source: &S, logo_ref: &str) -> ColorPalette
where
    S: LogoSource + ?Sized,
{
    let result = match source.fetch(logo_ref).await {
        Ok(bytes) => extract_markup_bytes(&bytes),
        Err(err) => Err(ExtractError::Fetch {
            logo_ref: logo_ref.to_owned(),
            source: err,
        }),
    };
    result.unwrap_or_else(|err| {
        warn!(logo_ref, error = %err, "markup extraction failed");
        ColorPalette::empty()
    })
}

/// Values of `fill:` / `stroke:` declarations in an inline style.
fn style_paint_values(style: &str) -> impl Iterator<Item = &str> {
    style.split(';').filter_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        let property = property.trim();
        PAINT_PROPERTIES
            .iter()
            .any(|p| property.eq_ignore_ascii_case(p))
            .then(|| value.trim().trim_end_matches("!important").trim_end())
    })
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Occurrence counter that remembers first-seen order.
#[derive(Default)]
struct ColorCounter {
    counts: Vec<(Rgb, f64)>,
    index: HashMap<Rgb, usize>,
}

impl ColorCounter {
    fn offer(&mut self, candidate: Option<Rgb>) {
        let Some(color) = candidate.filter(|c| c.is_significant()) else {
            return;
        };
        match self.index.get(&color) {
            Some(&i) => self.counts[i].1 += 1.0,
            None => {
                self.index.insert(color, self.counts.len());
                self.counts.push((color, 1.0));
            }
        }
    }

    fn into_palette(mut self, limit: usize) -> ColorPalette {
        self.counts.sort_by(|a, b| b.1.total_cmp(&a.1));
        self.counts.into_iter().take(limit).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticLogoSource;
    use pretty_assertions::assert_eq;

    const BRAND_RED: Rgb = Rgb::new(200, 40, 40);
    const BRAND_BLUE: Rgb = Rgb::new(40, 40, 200);

    // ── attribute sources ────────────────────────────────────────

    #[test]
    fn counts_fill_and_stroke_attributes() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
            <rect fill="#c82828"/>
            <circle fill="#c82828" stroke="#2828c8"/>
            <path stroke="#C82828"/>
        </svg>"##;
        let p = extract_markup_colors(svg).unwrap();
        assert_eq!(p.colors, vec![BRAND_RED, BRAND_BLUE]);
        assert_eq!(p.weights, vec![3.0, 1.0]);
    }

    #[test]
    fn reads_style_declarations() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
            <g style="opacity: 0.5; fill: rgb(200, 40, 40) !important; stroke:#2828c8"/>
        </svg>"##;
        let p = extract_markup_colors(svg).unwrap();
        assert_eq!(p.colors, vec![BRAND_RED, BRAND_BLUE]);
    }

    #[test]
    fn expands_short_hex() {
        let svg = r##"<svg><rect fill="#c33"/></svg>"##;
        let p = extract_markup_colors(svg).unwrap();
        assert_eq!(p.colors, vec![Rgb::new(0xcc, 0x33, 0x33)]);
    }

    #[test]
    fn reads_class_keywords() {
        let svg = r#"<svg><rect class="logo-navy shape"/><rect class="TealAccent"/></svg>"#;
        let p = extract_markup_colors(svg).unwrap();
        assert_eq!(p.colors, vec![Rgb::new(0, 0, 128), Rgb::new(0, 128, 128)]);
    }

    // ── filtering ────────────────────────────────────────────────

    #[test]
    fn drops_insignificant_colors() {
        let svg = r##"<svg>
            <rect fill="#808080"/>
            <rect fill="#000"/>
            <rect fill="white"/>
            <rect fill="none" stroke="url(#grad)"/>
            <rect fill="currentColor"/>
        </svg>"##;
        let p = extract_markup_colors(svg).unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn keeps_at_most_six_colors() {
        let fills: String = (0..8)
            .map(|i| format!(r#"<rect fill="rgb({}, 40, 40)"/>"#, 100 + i * 10))
            .collect();
        let svg = format!("<svg>{fills}</svg>");
        let p = extract_markup_colors(&svg).unwrap();
        assert_eq!(p.len(), MAX_PALETTE_COLORS);
    }

    #[test]
    fn ties_keep_document_order() {
        let svg = r##"<svg><rect fill="#2828c8"/><rect fill="#c82828"/></svg>"##;
        let p = extract_markup_colors(svg).unwrap();
        assert_eq!(p.colors, vec![BRAND_BLUE, BRAND_RED]);
    }

    // ── failures ─────────────────────────────────────────────────

    #[test]
    fn malformed_markup_is_a_parse_error() {
        let err = extract_markup_colors("<svg><rect fill=").unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[test]
    fn binary_bytes_are_an_encoding_error() {
        let err = extract_markup_bytes(&[0x89, b'P', b'N', b'G', 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ExtractError::Encoding(_)));
    }

    #[test]
    fn source_failures_become_empty_palettes() {
        let source = StaticLogoSource::new().with_logo("broken.svg", "<svg");
        let missing = pollster::block_on(extract_from_source(&source, "missing.svg"));
        let broken = pollster::block_on(extract_from_source(&source, "broken.svg"));
        assert!(missing.is_empty());
        assert!(broken.is_empty());
    }

    #[test]
    fn source_success_extracts() {
        let source =
            StaticLogoSource::new().with_logo("ok.svg", r##"<svg><rect fill="#c82828"/></svg>"##);
        let p = pollster::block_on(extract_from_source(&source, "ok.svg"));
        assert_eq!(p.colors, vec![BRAND_RED]);
    }
}
