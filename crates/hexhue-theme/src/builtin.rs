//! Builtin palettes: the fixed default and hand-tuned catalog entries.
//!
//! Catalog palettes exist for teams whose logos extract poorly (monochrome
//! marks, gradients, raster-only assets). They are consulted before any
//! extraction runs.

use hexhue_paint::color::Rgb;

use crate::palette::ColorPalette;

/// Colors of the fixed default palette.
pub const DEFAULT_PALETTE_COLORS: [Rgb; 3] = [
    Rgb::new(0x10, 0xb9, 0x81),
    Rgb::new(0x05, 0x96, 0x69),
    Rgb::new(0x34, 0xd3, 0x99),
];

/// Weights of the fixed default palette.
pub const DEFAULT_PALETTE_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// The palette used whenever nothing better is available.
#[must_use]
pub fn default_palette() -> ColorPalette {
    ColorPalette::new(DEFAULT_PALETTE_COLORS.to_vec(), DEFAULT_PALETTE_WEIGHTS.to_vec())
}

/// Hand-tuned palettes keyed by team id.
const CATALOG: &[(&str, &[(Rgb, f64)])] = &[
    (
        "harbor-hawks",
        &[
            (Rgb::new(0x0b, 0x3d, 0x91), 0.55),
            (Rgb::new(0xf2, 0xa9, 0x00), 0.30),
            (Rgb::new(0x5b, 0x8d, 0xd6), 0.15),
        ],
    ),
    (
        "ember-foxes",
        &[
            (Rgb::new(0xd9, 0x48, 0x1c), 0.55),
            (Rgb::new(0x7a, 0x1f, 0x0e), 0.27),
            (Rgb::new(0xf4, 0xb1, 0x3d), 0.18),
        ],
    ),
    (
        "glacier-owls",
        &[
            (Rgb::new(0x1f, 0x8a, 0xa8), 0.55),
            (Rgb::new(0x6c, 0x3e, 0xb8), 0.28),
            (Rgb::new(0x9a, 0xd8, 0xe8), 0.17),
        ],
    ),
    (
        "meadow-stags",
        &[
            (Rgb::new(0x2f, 0x7d, 0x32), 0.60),
            (Rgb::new(0xc6, 0x9c, 0x2d), 0.25),
            (Rgb::new(0x8b, 0x5a, 0x2b), 0.15),
        ],
    ),
];

/// Look up a hand-tuned palette for `team_id`.
#[must_use]
pub fn catalog_palette(team_id: &str) -> Option<ColorPalette> {
    CATALOG
        .iter()
        .find(|(id, _)| *id == team_id)
        .map(|(_, entries)| entries.iter().copied().collect())
}

/// Team ids with a hand-tuned palette.
pub fn catalog_team_ids() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(id, _)| *id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::is_good_palette;

    #[test]
    fn default_palette_shape() {
        let p = default_palette();
        assert_eq!(p.len(), 3);
        assert_eq!(p.weights, vec![0.5, 0.3, 0.2]);
    }

    #[test]
    fn all_catalog_entries_resolve() {
        for id in catalog_team_ids() {
            let p = catalog_palette(id);
            assert!(p.is_some(), "catalog entry '{id}' failed to resolve");
        }
    }

    #[test]
    fn catalog_palettes_pass_quality_gate() {
        for id in catalog_team_ids() {
            let p = catalog_palette(id).unwrap_or_default();
            assert!(is_good_palette(&p), "catalog palette '{id}' is not good");
        }
    }

    #[test]
    fn unknown_team_has_no_catalog_palette() {
        assert!(catalog_palette("nonexistent").is_none());
    }
}
