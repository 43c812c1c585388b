// SPDX-License-Identifier: MIT
//
// Drawing surfaces: the only place pixels are touched.
//
// The renderer paints through the `DrawingSurface` port: clear, fill a
// polygon, draw a pixel layer. A window, canvas, or GPU backend implements
// the port in the host; `PixelBuffer` implements it headlessly so every
// render pass is testable without a display.
//
// Design:
//
//   - Flat `Vec<u8>` RGBA, row-major. A row's pixels are contiguous, so
//     texture generation (which walks rows) is a linear scan.
//
//   - Straight (non-premultiplied) alpha. Compositing is Porter-Duff
//     "source over" in sRGB space, which matches what 2D canvas APIs do.
//
//   - Polygons are filled by scanline with the even-odd rule, sampling
//     pixel centers. Hexagons are convex, so the rule never matters in
//     practice, but arbitrary paths still behave.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;

// ─── Geometry ────────────────────────────────────────────────────────────────

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The visible area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// The four corners, clockwise from the origin.
    #[must_use]
    pub const fn corners(self) -> [Point; 4] {
        [
            Point::new(0.0, 0.0),
            Point::new(self.width, 0.0),
            Point::new(self.width, self.height),
            Point::new(0.0, self.height),
        ]
    }
}

// ─── DrawingSurface ──────────────────────────────────────────────────────────

/// A drawing context could not be acquired for this pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("drawing surface unavailable: {0}")]
    Unavailable(String),
}

/// The minimal drawing interface the renderer needs.
///
/// Only [`begin_frame`](DrawingSurface::begin_frame) has a default. Hosts
/// that lose their context (a detached canvas, a lost GPU device) report it
/// there, and the renderer skips the pass.
pub trait DrawingSurface {
    /// Current surface size in pixels.
    fn size(&self) -> Viewport;

    /// Acquire the surface for a render pass.
    fn begin_frame(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Erase everything to transparent.
    fn clear(&mut self);

    /// Fill a closed polygon with `color` at `alpha` (`0.0..=1.0`).
    fn fill_path(&mut self, points: &[Point], color: Rgb, alpha: f64);

    /// Composite a pixel layer stretched to the full surface, with every
    /// source alpha multiplied by `opacity`.
    fn draw_pixels(&mut self, pixels: &PixelBuffer, opacity: f64);
}

// ─── PixelBuffer ─────────────────────────────────────────────────────────────

/// An owned RGBA raster.
///
/// # Examples
///
/// ```
/// use hexhue_paint::color::Rgb;
/// use hexhue_paint::surface::PixelBuffer;
///
/// let mut buf = PixelBuffer::new(4, 2);
/// buf.set(1, 1, Rgb::new(255, 0, 0), 255);
/// assert_eq!(buf.get(1, 1), [255, 0, 0, 255]);
/// assert_eq!(buf.get(0, 0), [0, 0, 0, 0]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// A buffer filled with one opaque color.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let mut buf = Self::new(width, height);
        buf.fill(color, 255);
        buf
    }

    /// Wrap raw RGBA bytes. Returns `None` if the length doesn't match.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume into raw RGBA bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    /// RGBA at `(x, y)`, transparent black when out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        self.index(x, y).map_or([0; 4], |i| {
            [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
        })
    }

    /// Overwrite one pixel. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Rgb, alpha: u8) {
        if let Some(i) = self.index(x, y) {
            self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, alpha]);
        }
    }

    /// Overwrite every pixel.
    pub fn fill(&mut self, color: Rgb, alpha: u8) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, alpha]);
        }
    }

    /// Composite `color` at `alpha` over the pixel at `(x, y)`.
    pub fn blend(&mut self, x: u32, y: u32, color: Rgb, alpha: f64) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let sa = alpha.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }

        let da = f64::from(self.data[i + 3]) / 255.0;
        let out_a = da.mul_add(1.0 - sa, sa);
        if out_a < 1e-6 {
            return;
        }

        let src = [color.r, color.g, color.b];
        for (c, s) in src.into_iter().enumerate() {
            let dc = f64::from(self.data[i + c]);
            let out = f64::from(s).mul_add(sa, dc * da * (1.0 - sa)) / out_a;
            self.data[i + c] = channel(out);
        }
        self.data[i + 3] = channel(out_a * 255.0);
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl DrawingSurface for PixelBuffer {
    fn size(&self) -> Viewport {
        Viewport::new(f64::from(self.width), f64::from(self.height))
    }

    fn clear(&mut self) {
        self.data.fill(0);
    }

    fn fill_path(&mut self, points: &[Point], color: Rgb, alpha: f64) {
        if points.len() < 3 || self.width == 0 || self.height == 0 {
            return;
        }

        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let row_start = clamp_coord(min_y.floor(), self.height);
        let row_end = clamp_coord(max_y.ceil(), self.height);

        let mut crossings: Vec<f64> = Vec::with_capacity(points.len());
        for row in row_start..row_end {
            let y = f64::from(row) + 0.5;
            crossings.clear();

            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                // Half-open rule so shared vertices are counted once.
                if (a.y <= y && b.y > y) || (b.y <= y && a.y > y) {
                    let t = (y - a.y) / (b.y - a.y);
                    crossings.push((b.x - a.x).mul_add(t, a.x));
                }
            }
            crossings.sort_by(f64::total_cmp);

            for pair in crossings.chunks_exact(2) {
                // Pixel centers inside [x0, x1).
                let col_start = clamp_coord((pair[0] - 0.5).ceil(), self.width);
                let col_end = clamp_coord((pair[1] - 0.5).ceil(), self.width);
                for col in col_start..col_end {
                    self.blend(col, row, color, alpha);
                }
            }
        }
    }

    fn draw_pixels(&mut self, pixels: &PixelBuffer, opacity: f64) {
        if pixels.width == 0 || pixels.height == 0 || opacity <= 0.0 {
            return;
        }
        let opacity = opacity.min(1.0);
        let sx = f64::from(pixels.width) / f64::from(self.width.max(1));
        let sy = f64::from(pixels.height) / f64::from(self.height.max(1));

        for y in 0..self.height {
            let src_y = clamp_coord((f64::from(y) + 0.5) * sy - 0.5, pixels.height)
                .min(pixels.height - 1);
            for x in 0..self.width {
                let src_x = clamp_coord((f64::from(x) + 0.5) * sx - 0.5, pixels.width)
                    .min(pixels.width - 1);
                let [r, g, b, a] = pixels.get(src_x, src_y);
                if a == 0 {
                    continue;
                }
                let alpha = f64::from(a) / 255.0 * opacity;
                self.blend(x, y, Rgb::new(r, g, b), alpha);
            }
        }
    }
}

/// Round and clamp a channel value to `0..=255`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(v: f64) -> u8 {
    // Safe: clamp guarantees 0.0 <= value <= 255.0 before truncation.
    (v + 0.5).clamp(0.0, 255.0) as u8
}

/// Clamp a (possibly negative) pixel coordinate into `0..=limit`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_coord(v: f64, limit: u32) -> u32 {
    v.round().clamp(0.0, f64::from(limit)) as u32
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn coverage(buf: &PixelBuffer) -> usize {
        buf.as_bytes().chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    // ── Construction ─────────────────────────────────────────────

    #[test]
    fn new_is_transparent() {
        let buf = PixelBuffer::new(3, 3);
        assert_eq!(coverage(&buf), 0);
        assert_eq!(buf.as_bytes().len(), 36);
    }

    #[test]
    fn from_rgba_checks_length() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn out_of_bounds_access_is_harmless() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.set(5, 5, RED, 255);
        buf.blend(9, 0, RED, 1.0);
        assert_eq!(buf.get(5, 5), [0, 0, 0, 0]);
        assert_eq!(coverage(&buf), 0);
    }

    // ── Blending ─────────────────────────────────────────────────

    #[test]
    fn blend_over_transparent_takes_source_color() {
        let mut buf = PixelBuffer::new(1, 1);
        buf.blend(0, 0, RED, 0.5);
        assert_eq!(buf.get(0, 0), [255, 0, 0, 128]);
    }

    #[test]
    fn blend_half_over_opaque() {
        let mut buf = PixelBuffer::filled(1, 1, BLUE);
        buf.blend(0, 0, RED, 0.5);
        assert_eq!(buf.get(0, 0), [128, 0, 128, 255]);
    }

    #[test]
    fn blend_opaque_replaces() {
        let mut buf = PixelBuffer::filled(1, 1, BLUE);
        buf.blend(0, 0, RED, 1.0);
        assert_eq!(buf.get(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn blend_zero_alpha_is_noop() {
        let mut buf = PixelBuffer::filled(1, 1, BLUE);
        buf.blend(0, 0, RED, 0.0);
        assert_eq!(buf.get(0, 0), [0, 0, 255, 255]);
    }

    // ── fill_path ────────────────────────────────────────────────

    #[test]
    fn fill_square() {
        let mut buf = PixelBuffer::new(10, 10);
        let square = [
            Point::new(2.0, 2.0),
            Point::new(6.0, 2.0),
            Point::new(6.0, 6.0),
            Point::new(2.0, 6.0),
        ];
        buf.fill_path(&square, RED, 1.0);
        assert_eq!(coverage(&buf), 16);
        assert_eq!(buf.get(2, 2), [255, 0, 0, 255]);
        assert_eq!(buf.get(5, 5), [255, 0, 0, 255]);
        assert_eq!(buf.get(6, 6), [0, 0, 0, 0]);
    }

    #[test]
    fn fill_clips_to_surface() {
        let mut buf = PixelBuffer::new(4, 4);
        let huge = [
            Point::new(-100.0, -100.0),
            Point::new(100.0, -100.0),
            Point::new(100.0, 100.0),
            Point::new(-100.0, 100.0),
        ];
        buf.fill_path(&huge, BLUE, 1.0);
        assert_eq!(coverage(&buf), 16);
    }

    #[test]
    fn degenerate_paths_draw_nothing() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.fill_path(&[Point::new(0.0, 0.0), Point::new(3.0, 3.0)], RED, 1.0);
        buf.fill_path(&[], RED, 1.0);
        assert_eq!(coverage(&buf), 0);
    }

    #[test]
    fn fill_triangle_is_partial() {
        let mut buf = PixelBuffer::new(10, 10);
        let tri = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)];
        buf.fill_path(&tri, RED, 1.0);
        let covered = coverage(&buf);
        assert!(covered > 40 && covered < 60, "triangle covered {covered}");
    }

    // ── draw_pixels ──────────────────────────────────────────────

    #[test]
    fn draw_pixels_stretches_source() {
        let mut src = PixelBuffer::new(2, 1);
        src.set(0, 0, RED, 255);
        src.set(1, 0, BLUE, 255);

        let mut dst = PixelBuffer::new(4, 2);
        dst.draw_pixels(&src, 1.0);
        assert_eq!(dst.get(0, 0), [255, 0, 0, 255]);
        assert_eq!(dst.get(1, 1), [255, 0, 0, 255]);
        assert_eq!(dst.get(2, 0), [0, 0, 255, 255]);
        assert_eq!(dst.get(3, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn draw_pixels_applies_opacity() {
        let src = PixelBuffer::filled(1, 1, RED);
        let mut dst = PixelBuffer::new(2, 2);
        dst.draw_pixels(&src, 0.5);
        assert_eq!(dst.get(1, 1), [255, 0, 0, 128]);
    }

    #[test]
    fn draw_pixels_zero_opacity_is_noop() {
        let src = PixelBuffer::filled(1, 1, RED);
        let mut dst = PixelBuffer::new(2, 2);
        dst.draw_pixels(&src, 0.0);
        assert_eq!(coverage(&dst), 0);
    }

    #[test]
    fn clear_erases() {
        let mut buf = PixelBuffer::filled(3, 3, RED);
        buf.clear();
        assert_eq!(coverage(&buf), 0);
    }

    // ── Geometry ─────────────────────────────────────────────────

    #[test]
    fn viewport_corners() {
        let v = Viewport::new(8.0, 6.0);
        assert_eq!(v.corners()[2], Point::new(8.0, 6.0));
        assert!(!v.is_empty());
        assert!(Viewport::new(0.0, 6.0).is_empty());
    }

    #[test]
    fn point_distance() {
        assert!((Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }
}
