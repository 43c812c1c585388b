// SPDX-License-Identifier: MIT
//
// Axial hex coordinates and the hex <-> pixel mapping.
//
// A hex is addressed by `(q, r)`; the third cube coordinate `s = -q - r`
// is implied and only materializes while rounding. A `HexLayout` fixes
// the cell size, the pixel position of hex (0, 0), and the orientation.
//
// Orientation conventions:
//
//   - Pointy-top: rows of hexes share `r`; a hex has a vertex straight
//     above and below its center.
//   - Flat-top: columns share `q`; a hex has an edge across its top and
//     bottom.
//
// Vertex angles are measured clockwise from straight down (the +y axis in
// screen space), 60° apart, starting at 0° for pointy-top and 30° for
// flat-top. Everything here is a pure function.

use std::f64::consts::PI;

use hexhue_paint::surface::{Point, Viewport};
use serde::{Deserialize, Serialize};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Extra hexes added around the corner bounding box in
/// [`get_visible_hexes`].
const VISIBLE_MARGIN: i32 = 2;

// ─── Coordinates ─────────────────────────────────────────────────────────────

/// An axial hex coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    #[inline]
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implied third cube coordinate.
    #[inline]
    #[must_use]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }
}

/// The six neighbor offsets, starting east and going counterclockwise in
/// axial space.
pub const HEX_DIRECTIONS: [HexCoord; 6] = [
    HexCoord::new(1, 0),
    HexCoord::new(1, -1),
    HexCoord::new(0, -1),
    HexCoord::new(-1, 0),
    HexCoord::new(-1, 1),
    HexCoord::new(0, 1),
];

#[inline]
#[must_use]
pub const fn hex_add(a: HexCoord, b: HexCoord) -> HexCoord {
    HexCoord::new(a.q + b.q, a.r + b.r)
}

/// The neighbor in `direction` (taken modulo 6).
#[must_use]
pub const fn hex_neighbor(hex: HexCoord, direction: usize) -> HexCoord {
    hex_add(hex, HEX_DIRECTIONS[direction % 6])
}

#[must_use]
pub const fn hex_neighbors(hex: HexCoord) -> [HexCoord; 6] {
    [
        hex_neighbor(hex, 0),
        hex_neighbor(hex, 1),
        hex_neighbor(hex, 2),
        hex_neighbor(hex, 3),
        hex_neighbor(hex, 4),
        hex_neighbor(hex, 5),
    ]
}

/// Cube distance: `(|Δq| + |Δq + Δr| + |Δr|) / 2`.
#[must_use]
pub const fn hex_distance(a: HexCoord, b: HexCoord) -> i32 {
    let dq = a.q - b.q;
    let dr = a.r - b.r;
    (dq.abs() + (dq + dr).abs() + dr.abs()) / 2
}

/// Every hex within `radius` of `center`, `q` major. Negative radii give
/// nothing.
#[must_use]
pub fn hex_range(center: HexCoord, radius: i32) -> Vec<HexCoord> {
    let mut out = Vec::new();
    for dq in -radius..=radius {
        let lo = (-radius).max(-dq - radius);
        let hi = radius.min(-dq + radius);
        for dr in lo..=hi {
            out.push(HexCoord::new(center.q + dq, center.r + dr));
        }
    }
    out
}

/// Round fractional axial coordinates to the nearest hex.
///
/// All three cube coordinates are rounded, then whichever moved furthest
/// is recomputed from the other two, so `q + r + s == 0` holds exactly.
#[must_use]
pub fn hex_round(q: f64, r: f64) -> HexCoord {
    let s = -q - r;
    let (mut rq, mut rr, rs) = (q.round(), r.round(), s.round());
    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    HexCoord::new(rq as i32, rr as i32)
}

// ─── Layout ──────────────────────────────────────────────────────────────────

/// Maps hex space to pixel space for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexLayout {
    /// Center-to-vertex distance in pixels, `> 0`.
    pub size: f64,
    /// Pixel position of hex (0, 0).
    pub origin: Point,
    pub pointy_top: bool,
}

impl HexLayout {
    #[must_use]
    pub const fn new(size: f64, origin: Point, pointy_top: bool) -> Self {
        Self {
            size,
            origin,
            pointy_top,
        }
    }

    /// Horizontal and vertical distance between neighboring centers.
    #[must_use]
    pub fn spacing(&self) -> (f64, f64) {
        if self.pointy_top {
            (SQRT_3 * self.size, 1.5 * self.size)
        } else {
            (1.5 * self.size, SQRT_3 * self.size)
        }
    }
}

/// Pixel position of a hex center.
#[must_use]
pub fn hex_to_pixel(hex: HexCoord, layout: &HexLayout) -> Point {
    let q = f64::from(hex.q);
    let r = f64::from(hex.r);
    let (x, y) = if layout.pointy_top {
        (SQRT_3.mul_add(q, SQRT_3 / 2.0 * r), 1.5 * r)
    } else {
        (1.5 * q, (SQRT_3 / 2.0).mul_add(q, SQRT_3 * r))
    };
    Point::new(
        x.mul_add(layout.size, layout.origin.x),
        y.mul_add(layout.size, layout.origin.y),
    )
}

/// Fractional axial coordinates of a pixel.
#[must_use]
pub fn pixel_to_fractional(point: Point, layout: &HexLayout) -> (f64, f64) {
    let x = (point.x - layout.origin.x) / layout.size;
    let y = (point.y - layout.origin.y) / layout.size;
    if layout.pointy_top {
        ((SQRT_3 / 3.0).mul_add(x, -y / 3.0), 2.0 / 3.0 * y)
    } else {
        (2.0 / 3.0 * x, (SQRT_3 / 3.0).mul_add(y, -x / 3.0))
    }
}

/// The hex containing a pixel.
#[must_use]
pub fn pixel_to_hex(point: Point, layout: &HexLayout) -> HexCoord {
    let (q, r) = pixel_to_fractional(point, layout);
    hex_round(q, r)
}

/// Every hex at least partly inside `viewport`, `q` major.
///
/// The viewport corners are mapped to hex space and their bounding box is
/// padded by two hexes. Candidates are kept if their center lies inside
/// the viewport grown by one hex radius on every side, which keeps
/// partially visible edge hexes.
#[must_use]
pub fn get_visible_hexes(viewport: Viewport, layout: &HexLayout) -> Vec<HexCoord> {
    if viewport.is_empty() || layout.size <= 0.0 {
        return Vec::new();
    }

    let corners = viewport.corners().map(|c| pixel_to_hex(c, layout));
    let q_min = corners.iter().map(|h| h.q).min().unwrap_or(0) - VISIBLE_MARGIN;
    let q_max = corners.iter().map(|h| h.q).max().unwrap_or(0) + VISIBLE_MARGIN;
    let r_min = corners.iter().map(|h| h.r).min().unwrap_or(0) - VISIBLE_MARGIN;
    let r_max = corners.iter().map(|h| h.r).max().unwrap_or(0) + VISIBLE_MARGIN;

    let pad = layout.size;
    let (x_lo, x_hi) = (-pad, viewport.width + pad);
    let (y_lo, y_hi) = (-pad, viewport.height + pad);

    let mut visible = Vec::new();
    for q in q_min..=q_max {
        for r in r_min..=r_max {
            let hex = HexCoord::new(q, r);
            let c = hex_to_pixel(hex, layout);
            if (x_lo..=x_hi).contains(&c.x) && (y_lo..=y_hi).contains(&c.y) {
                visible.push(hex);
            }
        }
    }
    visible
}

/// The six corners of a hex with circumradius `radius` around `center`.
#[must_use]
pub fn hex_corners(center: Point, radius: f64, pointy_top: bool) -> [Point; 6] {
    let offset = if pointy_top { 0.0 } else { 30.0 };
    std::array::from_fn(|i| {
        let angle = (60.0f64.mul_add(i as f64, offset)) * PI / 180.0;
        Point::new(
            radius.mul_add(angle.sin(), center.x),
            radius.mul_add(angle.cos(), center.y),
        )
    })
}

/// The six corners of `hex` under `layout`.
#[must_use]
pub fn get_hex_vertices(hex: HexCoord, layout: &HexLayout) -> [Point; 6] {
    hex_corners(hex_to_pixel(hex, layout), layout.size, layout.pointy_top)
}

// ─── Hashing ─────────────────────────────────────────────────────────────────

/// Deterministic 32-bit hash of a hex and a seed.
///
/// Coordinates are spread by large odd multipliers and finished with the
/// murmur3 `fmix32` avalanche, so neighboring hexes and consecutive seeds
/// give unrelated outputs.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn hex_hash(hex: HexCoord, seed: u32) -> u32 {
    let mut h = (hex.q as u32).wrapping_mul(0x9e37_79b1)
        ^ (hex.r as u32).wrapping_mul(0x85eb_ca77)
        ^ seed.wrapping_mul(0xc2b2_ae3d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// [`hex_hash`] as a float in `[0, 1)`.
#[inline]
#[must_use]
pub fn hex_random(hex: HexCoord, seed: u32) -> f64 {
    f64::from(hex_hash(hex, seed)) / 4_294_967_296.0
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn pointy() -> HexLayout {
        HexLayout::new(10.0, Point::new(0.0, 0.0), true)
    }

    fn flat() -> HexLayout {
        HexLayout::new(10.0, Point::new(0.0, 0.0), false)
    }

    // ── hex_to_pixel / pixel_to_hex ─────────────────────────────

    #[test]
    fn origin_hex_is_at_origin() {
        let layout = HexLayout::new(12.0, Point::new(40.0, 30.0), true);
        assert_eq!(hex_to_pixel(HexCoord::new(0, 0), &layout), Point::new(40.0, 30.0));
    }

    #[test]
    fn pointy_top_axes() {
        let p = hex_to_pixel(HexCoord::new(1, 0), &pointy());
        assert!(approx_eq(p.x, 10.0 * SQRT_3) && approx_eq(p.y, 0.0));
        let p = hex_to_pixel(HexCoord::new(0, 1), &pointy());
        assert!(approx_eq(p.x, 5.0 * SQRT_3) && approx_eq(p.y, 15.0));
    }

    #[test]
    fn flat_top_axes() {
        let p = hex_to_pixel(HexCoord::new(1, 0), &flat());
        assert!(approx_eq(p.x, 15.0) && approx_eq(p.y, 5.0 * SQRT_3));
        let p = hex_to_pixel(HexCoord::new(0, 1), &flat());
        assert!(approx_eq(p.x, 0.0) && approx_eq(p.y, 10.0 * SQRT_3));
    }

    #[test]
    fn pixel_round_trip_both_orientations() {
        for layout in [pointy(), flat()] {
            for hex in hex_range(HexCoord::new(3, -2), 4) {
                assert_eq!(pixel_to_hex(hex_to_pixel(hex, &layout), &layout), hex);
            }
        }
    }

    #[test]
    fn pixel_near_center_maps_to_hex() {
        let layout = pointy();
        let center = hex_to_pixel(HexCoord::new(2, 1), &layout);
        let nudged = Point::new(center.x + 3.0, center.y - 4.0);
        assert_eq!(pixel_to_hex(nudged, &layout), HexCoord::new(2, 1));
    }

    // ── hex_round ───────────────────────────────────────────────

    #[test]
    fn round_exact_is_identity() {
        assert_eq!(hex_round(3.0, -5.0), HexCoord::new(3, -5));
    }

    #[test]
    fn round_fixes_largest_error() {
        // q and r both round 0.4 away, s only 0.2: r is recomputed.
        let h = hex_round(0.4, 0.4);
        assert_eq!(h.q + h.r + h.s(), 0);
        assert_eq!(h, HexCoord::new(0, 1));
        assert_eq!(hex_round(0.6, 0.3), HexCoord::new(1, 0));
    }

    // ── distance / range / neighbors ────────────────────────────

    #[test]
    fn distance_examples() {
        let o = HexCoord::new(0, 0);
        assert_eq!(hex_distance(o, o), 0);
        assert_eq!(hex_distance(o, HexCoord::new(3, 0)), 3);
        assert_eq!(hex_distance(o, HexCoord::new(2, -5)), 5);
        assert_eq!(hex_distance(HexCoord::new(-1, 2), HexCoord::new(2, -1)), 3);
    }

    #[test]
    fn range_sizes() {
        assert_eq!(hex_range(HexCoord::default(), 0), vec![HexCoord::default()]);
        assert_eq!(hex_range(HexCoord::default(), 1).len(), 7);
        assert_eq!(hex_range(HexCoord::default(), 3).len(), 37);
        assert!(hex_range(HexCoord::default(), -1).is_empty());
    }

    #[test]
    fn range_respects_distance() {
        let c = HexCoord::new(-2, 5);
        for h in hex_range(c, 3) {
            assert!(hex_distance(c, h) <= 3);
        }
    }

    #[test]
    fn neighbors_are_distance_one() {
        let c = HexCoord::new(4, -7);
        for n in hex_neighbors(c) {
            assert_eq!(hex_distance(c, n), 1);
        }
        assert_eq!(hex_neighbor(c, 6), hex_neighbor(c, 0));
    }

    // ── get_visible_hexes ───────────────────────────────────────

    #[test]
    fn visible_hexes_cover_every_pixel() {
        for layout in [pointy(), flat()] {
            let viewport = Viewport::new(120.0, 80.0);
            let visible = get_visible_hexes(viewport, &layout);
            for y in (0..80).step_by(7) {
                for x in (0..120).step_by(7) {
                    let hex = pixel_to_hex(Point::new(f64::from(x), f64::from(y)), &layout);
                    assert!(visible.contains(&hex), "{hex:?} missing at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn visible_hexes_exclude_far_hexes() {
        let visible = get_visible_hexes(Viewport::new(100.0, 100.0), &pointy());
        for hex in &visible {
            let c = hex_to_pixel(*hex, &pointy());
            assert!(c.x >= -10.0 && c.x <= 110.0 && c.y >= -10.0 && c.y <= 110.0);
        }
    }

    #[test]
    fn empty_viewport_has_no_hexes() {
        assert!(get_visible_hexes(Viewport::new(0.0, 50.0), &pointy()).is_empty());
    }

    // ── vertices ────────────────────────────────────────────────

    #[test]
    fn vertices_sit_on_circumradius() {
        for layout in [pointy(), flat()] {
            let hex = HexCoord::new(1, 2);
            let center = hex_to_pixel(hex, &layout);
            for v in get_hex_vertices(hex, &layout) {
                assert!(approx_eq(v.distance(center), 10.0));
            }
        }
    }

    #[test]
    fn pointy_top_has_vertex_below_center() {
        let v = get_hex_vertices(HexCoord::default(), &pointy());
        assert!(approx_eq(v[0].x, 0.0) && approx_eq(v[0].y, 10.0));
        assert!(approx_eq(v[3].x, 0.0) && approx_eq(v[3].y, -10.0));
    }

    #[test]
    fn flat_top_has_horizontal_edges() {
        let v = get_hex_vertices(HexCoord::default(), &flat());
        // Vertices at 30° and 330° share the bottom edge.
        assert!(approx_eq(v[0].y, v[5].y));
        assert!(approx_eq(v[2].y, v[3].y));
        assert!(v.iter().any(|p| approx_eq(p.x, 10.0) && approx_eq(p.y, 0.0)));
    }

    #[test]
    fn adjacent_hexes_share_vertices() {
        for layout in [pointy(), flat()] {
            let a = get_hex_vertices(HexCoord::new(0, 0), &layout);
            let b = get_hex_vertices(HexCoord::new(1, 0), &layout);
            let shared = a
                .iter()
                .filter(|p| b.iter().any(|q| p.distance(*q) < 1e-9))
                .count();
            assert_eq!(shared, 2);
        }
    }

    // ── hashing ─────────────────────────────────────────────────

    #[test]
    fn hash_is_pure() {
        let h = HexCoord::new(-3, 8);
        assert_eq!(hex_hash(h, 42), hex_hash(h, 42));
        assert_ne!(hex_hash(h, 42), hex_hash(h, 43));
        assert_ne!(hex_hash(h, 42), hex_hash(HexCoord::new(-3, 9), 42));
    }

    #[test]
    fn random_is_unit_interval() {
        for q in -20..20 {
            for seed in 0..20 {
                let v = hex_random(HexCoord::new(q, q * 3), seed);
                assert!((0.0..1.0).contains(&v));
            }
        }
    }

    #[test]
    fn random_is_roughly_uniform() {
        let n = 20_000;
        let mean = (0..n).map(|s| hex_random(HexCoord::new(5, -5), s)).sum::<f64>() / f64::from(n);
        assert!((mean - 0.5).abs() < 0.02, "mean {mean}");
    }
}
