// SPDX-License-Identifier: MIT
//
// HexRenderer: the animated background.
//
// Lifecycle:
//
//   Idle ──initialize──▶ Initialized ──start──▶ Animating ◀──start── Paused
//                                                   │                  ▲
//                                                   └──────stop────────┘
//   any ──shutdown──▶ Idle
//
// `initialize`, `resize`, `set_palette`, and `set_texture` each render one
// pass synchronously so the surface is never stale, even when paused.
// While animating, host frame callbacks go through `Animate::on_frame`;
// the `FrameClock` admits at most one pass per frame floor (~30 Hz).
//
// A pass paints the texture layer, then one filled polygon per visible
// hex. Hex colors come from the bounded cache. The animation seed only
// advances every `seed_step_ms` of animation time, so between steps every
// hex is a cache hit.

use std::time::Duration;

use hexhue_paint::frame::{Animate, FrameClock, LoopConfig};
use hexhue_paint::surface::{DrawingSurface, Point, Viewport};
use hexhue_theme::palette::ColorPalette;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::cache::HexColorCache;
use crate::distribution::{DistributionConfig, get_hex_color};
use crate::hex::{HexLayout, get_visible_hexes, hex_corners, hex_to_pixel};
use crate::texture::{PerformanceTier, TextureConfig, generate_texture, get_optimal_texture_size};

// ─── Config ──────────────────────────────────────────────────────────────────

/// Renderer tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererConfig {
    /// Hex circumradius in pixels.
    pub hex_size: f64,
    pub pointy_top: bool,
    /// Pixels shaved off each hex radius, leaving a gap between cells.
    pub cell_inset: f64,
    pub performance_tier: PerformanceTier,
    /// Whether hex colors and the texture change over time.
    pub animated: bool,
    /// Animation time per seed step (ms).
    pub seed_step_ms: u64,
    /// Seed used when not animated.
    pub static_seed: u32,
    pub frame: LoopConfig,
    /// Distribution tuning; its palette is replaced by `set_palette`.
    pub distribution: DistributionConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            hex_size: 28.0,
            pointy_top: true,
            cell_inset: 1.5,
            performance_tier: PerformanceTier::Medium,
            animated: true,
            seed_step_ms: 2000,
            static_seed: 0,
            frame: LoopConfig::default(),
            distribution: DistributionConfig::default(),
        }
    }
}

// ─── State ───────────────────────────────────────────────────────────────────

/// Where the renderer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderState {
    Idle,
    Initialized,
    Animating,
    Paused,
}

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub hexes_drawn: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub texture_drawn: bool,
    pub animation_seed: u32,
    /// The surface could not be acquired; nothing was drawn.
    pub aborted: bool,
}

// ─── HexRenderer ─────────────────────────────────────────────────────────────

/// Draws the hex background onto a [`DrawingSurface`].
#[derive(Debug)]
pub struct HexRenderer<S> {
    surface: S,
    config: RendererConfig,
    state: RenderState,
    viewport: Viewport,
    layout: Option<HexLayout>,
    texture: Option<TextureConfig>,
    cache: HexColorCache,
    clock: FrameClock,
    animation_time: Duration,
    last_report: Option<FrameReport>,
}

impl<S: DrawingSurface> HexRenderer<S> {
    #[must_use]
    pub fn new(surface: S, config: RendererConfig) -> Self {
        let clock = FrameClock::new(config.frame);
        Self {
            surface,
            config,
            state: RenderState::Idle,
            viewport: Viewport::default(),
            layout: None,
            texture: None,
            cache: HexColorCache::default(),
            clock,
            animation_time: Duration::ZERO,
            last_report: None,
        }
    }

    // ── accessors ───────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn state(&self) -> RenderState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    #[must_use]
    pub const fn layout(&self) -> Option<&HexLayout> {
        self.layout.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub const fn palette(&self) -> &ColorPalette {
        &self.config.distribution.palette
    }

    #[inline]
    #[must_use]
    pub const fn texture(&self) -> Option<&TextureConfig> {
        self.texture.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn cached_hexes(&self) -> usize {
        self.cache.len()
    }

    #[inline]
    #[must_use]
    pub const fn last_report(&self) -> Option<FrameReport> {
        self.last_report
    }

    /// Animation time elapsed while animating.
    #[inline]
    #[must_use]
    pub const fn animation_time(&self) -> Duration {
        self.animation_time
    }

    /// Animation seed for the current animation time.
    #[must_use]
    pub fn animation_seed(&self) -> u32 {
        if !self.config.animated {
            return self.config.static_seed;
        }
        let step = u128::from(self.config.seed_step_ms.max(1));
        let steps = self.animation_time.as_millis() / step;
        self.config
            .static_seed
            .wrapping_add((steps % (u128::from(u32::MAX) + 1)) as u32)
    }

    // ── transitions ─────────────────────────────────────────────

    /// Lay out the grid for `viewport` and draw the first pass.
    pub fn initialize(&mut self, viewport: Viewport) -> FrameReport {
        self.apply_viewport(viewport);
        if self.state == RenderState::Idle {
            self.transition(RenderState::Initialized);
        }
        self.render_pass()
    }

    /// Re-lay out for a new viewport. Ignored while idle.
    pub fn resize(&mut self, viewport: Viewport) -> Option<FrameReport> {
        if self.state == RenderState::Idle {
            return None;
        }
        debug!(width = viewport.width, height = viewport.height, "renderer resized");
        self.apply_viewport(viewport);
        Some(self.render_pass())
    }

    /// Replace the palette and redraw.
    pub fn set_palette(&mut self, palette: ColorPalette) -> Option<FrameReport> {
        self.config.distribution.palette = palette;
        self.cache.clear();
        self.redraw_if_active()
    }

    /// Replace (or remove) the texture layer and redraw.
    pub fn set_texture(&mut self, texture: Option<TextureConfig>) -> Option<FrameReport> {
        self.texture = texture;
        self.cache.clear();
        self.redraw_if_active()
    }

    /// Begin reacting to frame callbacks. Returns `false` while idle.
    pub fn start(&mut self) -> bool {
        match self.state {
            RenderState::Idle => {
                warn!("start ignored: renderer not initialized");
                false
            }
            RenderState::Animating => true,
            RenderState::Initialized | RenderState::Paused => {
                self.clock.reset();
                self.transition(RenderState::Animating);
                true
            }
        }
    }

    /// Stop reacting to frame callbacks; the last pass stays on screen.
    pub fn stop(&mut self) {
        if self.state == RenderState::Animating {
            self.transition(RenderState::Paused);
        }
    }

    /// Unmount: back to idle with no layout or cached colors.
    pub fn shutdown(&mut self) {
        self.layout = None;
        self.cache.clear();
        self.clock.reset();
        self.animation_time = Duration::ZERO;
        self.last_report = None;
        self.transition(RenderState::Idle);
    }

    fn transition(&mut self, next: RenderState) {
        if self.state != next {
            info!(from = ?self.state, to = ?next, "renderer state change");
            self.state = next;
        }
    }

    fn apply_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout = Some(HexLayout::new(
            self.config.hex_size,
            Point::default(),
            self.config.pointy_top,
        ));
        self.cache.clear();
    }

    fn redraw_if_active(&mut self) -> Option<FrameReport> {
        (self.state != RenderState::Idle).then(|| self.render_pass())
    }

    // ── rendering ───────────────────────────────────────────────

    /// Paint the texture layer and the hex layer once.
    ///
    /// An unavailable surface aborts the pass; the next pass retries.
    pub fn render_pass(&mut self) -> FrameReport {
        let seed = self.animation_seed();
        let mut report = FrameReport {
            animation_seed: seed,
            ..FrameReport::default()
        };
        let Some(layout) = self.layout else {
            return report;
        };

        if let Err(err) = self.surface.begin_frame() {
            warn!(error = %err, "render pass aborted");
            report.aborted = true;
            self.last_report = Some(report);
            return report;
        }
        self.surface.clear();

        if let Some(texture) = &self.texture {
            let (w, h) = get_optimal_texture_size(self.viewport, self.config.performance_tier);
            if w > 0 && h > 0 {
                let time = if self.config.animated {
                    self.animation_time.as_secs_f64()
                } else {
                    0.0
                };
                let pixels = generate_texture(w, h, texture, time);
                self.surface.draw_pixels(&pixels, texture.opacity);
                report.texture_drawn = true;
            }
        }

        self.cache.sync_seed(seed);
        self.config.distribution.animation_seed = seed;
        let radius = (layout.size - self.config.cell_inset).max(0.0);
        let distribution = &self.config.distribution;

        for hex in get_visible_hexes(self.viewport, &layout) {
            let (sample, hit) = self
                .cache
                .get_or_insert_with(hex, || get_hex_color(hex, distribution));
            if hit {
                report.cache_hits += 1;
            } else {
                report.cache_misses += 1;
            }
            let corners = hex_corners(hex_to_pixel(hex, &layout), radius, layout.pointy_top);
            self.surface.fill_path(&corners, sample.color, sample.fill_alpha());
            report.hexes_drawn += 1;
        }

        trace!(
            hexes = report.hexes_drawn,
            hits = report.cache_hits,
            misses = report.cache_misses,
            seed,
            "render pass"
        );
        self.last_report = Some(report);
        report
    }
}

impl<S: DrawingSurface> Animate for HexRenderer<S> {
    fn on_frame(&mut self, now: Duration) -> bool {
        if self.state != RenderState::Animating {
            return false;
        }
        let Some(elapsed) = self.clock.admit(now) else {
            return false;
        };
        self.animation_time += elapsed;
        self.render_pass();
        true
    }

    fn is_running(&self) -> bool {
        self.state == RenderState::Animating
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
