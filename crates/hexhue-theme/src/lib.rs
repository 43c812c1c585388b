//! # hexhue-theme: palettes, contrast, and tokens from a team logo
//!
//! Turns a logo into a weighted color palette and a palette into an
//! accessible token set.
//!
//! # Architecture
//!
//! ```text
//! Team { id, logo_ref }
//!     │
//!     ▼
//! builtin.rs:   hand-tuned catalog palette for known ids
//!     │ (miss)
//!     ▼
//! source.rs:    LogoSource::fetch(logo_ref) -> bytes (async, host-supplied)
//!     │
//!     ▼
//! extract.rs:   vector markup -> ranked fill/stroke colors
//!     │ (not good)
//!     ▼
//! quantize.rs:  raster decode -> median cut
//!     │ (not good)
//!     ▼
//! pipeline.rs:  best effort, else the default palette (memoized)
//!     │
//!     ▼
//! palette.rs:   normalize / combine / pad / dominant color
//!     │
//!     ▼
//! tokens.rs:    base colors -> ThemeTokens + 10-step scales
//! contrast.rs:  WCAG checks, lightness adjustment, semantic colors
//! ```
//!
//! Everything except [`source::LogoSource::fetch`] is synchronous and pure
//! (the extractor's memo aside). Extraction never fails outward: the worst
//! outcome is the builtin default palette.

// Single-char math variables are standard in color science.
#![allow(clippy::many_single_char_names)]
// Pixel counts and indices become weights.
#![allow(clippy::cast_precision_loss)]
// Lightness/luminance variable names are inherently similar.
#![allow(clippy::similar_names)]
// Test helpers round lightness to integers.
#![allow(clippy::cast_possible_truncation)]

pub mod builtin;
pub mod contrast;
pub mod error;
pub mod extract;
pub mod palette;
pub mod pipeline;
pub mod quantize;
pub mod source;
pub mod team;
pub mod tokens;

pub use contrast::{ContrastLevel, ContrastResult, check_contrast, contrast_ratio};
pub use error::ExtractError;
pub use palette::ColorPalette;
pub use pipeline::{ExtractedPalette, PaletteExtractor, PaletteSource};
pub use source::{FetchError, LogoSource, StaticLogoSource};
pub use team::Team;
pub use tokens::{ColorScale, ThemeTokens, TokenOverrides, generate_theme_tokens};
