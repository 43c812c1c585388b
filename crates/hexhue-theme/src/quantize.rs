//! ColorQuantizer: median-cut palettes from raster logos.
//!
//! The fallback for logos whose markup says nothing useful (embedded
//! bitmaps, gradients, raster-only assets). The image is decoded, shrunk
//! to at most [`SAMPLE_EDGE`] pixels per side to bound cost, and every
//! opaque, significant pixel is fed to median cut.
//!
//! Median cut keeps a list of buckets. Each round picks the bucket with
//! the widest single-channel range, sorts it along that channel, and cuts
//! it at the median. It stops once there are enough buckets or no bucket
//! can be split (one pixel, or all pixels identical). A bucket's color is
//! the rounded mean of its pixels and its weight is its pixel count.

use hexhue_paint::color::Rgb;
use image::GenericImageView;
use tracing::debug;

use crate::error::ExtractError;
use crate::palette::ColorPalette;

/// Longest edge of the sampling raster.
pub const SAMPLE_EDGE: u32 = 200;

/// Pixels at or below this alpha are treated as background.
const MIN_OPAQUE_ALPHA: u8 = 128;

/// Decode raster bytes (PNG, JPEG, GIF) and quantize them.
///
/// # Errors
///
/// [`ExtractError::Decode`] if the bytes are not a supported image.
pub fn quantize_image(bytes: &[u8], max_colors: usize) -> Result<ColorPalette, ExtractError> {
    let mut decoded = image::load_from_memory(bytes)?;
    let (width, height) = decoded.dimensions();
    if width > SAMPLE_EDGE || height > SAMPLE_EDGE {
        decoded = decoded.thumbnail(SAMPLE_EDGE, SAMPLE_EDGE);
    }
    let rgba = decoded.to_rgba8();
    debug!(
        width = rgba.width(),
        height = rgba.height(),
        "quantizing raster logo"
    );
    Ok(quantize_rgba(rgba.as_raw(), max_colors))
}

/// Quantize raw RGBA8 pixel data (row-major, 4 bytes per pixel).
///
/// A trailing partial pixel is ignored.
#[must_use]
pub fn quantize_rgba(rgba: &[u8], max_colors: usize) -> ColorPalette {
    let pixels: Vec<Rgb> = rgba
        .chunks_exact(4)
        .filter(|px| px[3] > MIN_OPAQUE_ALPHA)
        .map(|px| Rgb::new(px[0], px[1], px[2]))
        .filter(|c| c.is_significant())
        .collect();
    median_cut(pixels, max_colors)
}

/// Median-cut `pixels` into at most `max_colors` buckets, heaviest first.
#[must_use]
pub fn median_cut(pixels: Vec<Rgb>, max_colors: usize) -> ColorPalette {
    if pixels.is_empty() || max_colors == 0 {
        return ColorPalette::empty();
    }

    let mut buckets = vec![pixels];
    while buckets.len() < max_colors {
        let Some((index, channel)) = widest_splittable(&buckets) else {
            break;
        };
        let mut bucket = buckets.swap_remove(index);
        bucket.sort_by_key(|c| channel.of(*c));
        let upper = bucket.split_off(bucket.len() / 2);
        buckets.push(bucket);
        buckets.push(upper);
    }

    let mut entries: Vec<(Rgb, f64)> = buckets
        .iter()
        .map(|bucket| (mean_color(bucket), bucket.len() as f64))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    R,
    G,
    B,
}

impl Channel {
    const ALL: [Self; 3] = [Self::R, Self::G, Self::B];

    const fn of(self, c: Rgb) -> u8 {
        match self {
            Self::R => c.r,
            Self::G => c.g,
            Self::B => c.b,
        }
    }
}

/// The bucket (and channel) with the widest range that can still be
/// split. Earlier buckets and R before G before B win ties.
fn widest_splittable(buckets: &[Vec<Rgb>]) -> Option<(usize, Channel)> {
    let mut best: Option<(usize, Channel, u8)> = None;
    for (i, bucket) in buckets.iter().enumerate() {
        if bucket.len() < 2 {
            continue;
        }
        for channel in Channel::ALL {
            let range = channel_range(bucket, channel);
            if range > 0 && best.is_none_or(|(_, _, r)| range > r) {
                best = Some((i, channel, range));
            }
        }
    }
    best.map(|(i, channel, _)| (i, channel))
}

fn channel_range(bucket: &[Rgb], channel: Channel) -> u8 {
    let (min, max) = bucket
        .iter()
        .map(|&c| channel.of(c))
        .fold((u8::MAX, u8::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    max.saturating_sub(min)
}

#[allow(clippy::cast_possible_truncation)]
fn mean_color(bucket: &[Rgb]) -> Rgb {
    let len = bucket.len().max(1) as u64;
    let mean = |channel: Channel| {
        let sum: u64 = bucket.iter().map(|&c| u64::from(channel.of(c))).sum();
        ((sum + len / 2) / len).min(255) as u8
    };
    Rgb::new(mean(Channel::R), mean(Channel::G), mean(Channel::B))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
