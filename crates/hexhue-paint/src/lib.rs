// SPDX-License-Identifier: MIT
//
// hexhue-paint: the pixel-facing layer of hexhue.
//
//   color   → Rgb/Hsl, parsing from markup values, significance filtering
//   surface → DrawingSurface port + headless PixelBuffer raster
//   frame   → frame pacing for the animated background

pub mod color;
pub mod frame;
pub mod surface;

pub use color::{Hsl, Rgb};
pub use frame::{Animate, FrameClock, LoopConfig};
pub use surface::{DrawingSurface, PixelBuffer, Point, SurfaceError, Viewport};
