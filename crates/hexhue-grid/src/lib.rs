// SPDX-License-Identifier: MIT
//
// hexhue-grid: the animated hexagon background.
//
// Module map:
//
//   hex           axial coordinates, layouts, visibility, vertices, hashing
//   distribution  per-hex color, alpha, and intensity (pure, deterministic)
//   texture       procedural texture layer and tier-based sizing
//   cache         bounded per-renderer hex color cache
//   renderer      HexRenderer state machine driving a DrawingSurface
//
// Everything below `renderer` is a pure function of its inputs. The
// renderer owns the only mutable state (layout, cache, frame clock).

// Coordinate math converts between integer hex space and float pixel space.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
// q/r/s and x/y names are standard in hex math.
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod cache;
pub mod distribution;
pub mod hex;
pub mod renderer;
pub mod texture;

pub use cache::HexColorCache;
pub use distribution::{ColorSample, DistributionConfig, get_hex_color};
pub use hex::{HexCoord, HexLayout};
pub use renderer::{FrameReport, HexRenderer, RenderState, RendererConfig};
pub use texture::{PerformanceTier, TextureConfig, TextureKind};
