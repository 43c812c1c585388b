// SPDX-License-Identifier: MIT
//
// Frame pacing: the heartbeat of the animated background.
//
// The host owns the real frame callback (a vsync signal, an animation
// frame request, a compositor tick). It hands every callback timestamp to
// an `Animate` implementor. The implementor runs each timestamp through a
// `FrameClock`, which admits a frame only when at least the configured
// floor has elapsed since the last admitted one. With the default 33 ms
// floor a 60 or 120 Hz display drives the background at ~30 Hz, half or a
// quarter of the work, and the background is never the reason a frame
// drops.
//
// Timestamps are `Duration`s since an arbitrary host epoch. Only
// differences matter; a timestamp that goes backwards (host clock reset)
// re-anchors the clock instead of stalling it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Frame pacing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Minimum time between admitted frames (milliseconds).
    ///
    /// Default: 33 ms (~30 Hz).
    pub min_frame_interval_ms: u64,
}

impl LoopConfig {
    #[inline]
    #[must_use]
    pub const fn min_frame_interval(self) -> Duration {
        Duration::from_millis(self.min_frame_interval_ms)
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            min_frame_interval_ms: 33, // ~30 Hz
        }
    }
}

// ─── FrameClock ──────────────────────────────────────────────────────────────

/// Throttles host frame callbacks to the configured rate.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hexhue_paint::frame::{FrameClock, LoopConfig};
///
/// let mut clock = FrameClock::new(LoopConfig::default());
/// assert_eq!(clock.admit(Duration::from_millis(0)), Some(Duration::ZERO));
/// assert_eq!(clock.admit(Duration::from_millis(16)), None);
/// assert_eq!(clock.admit(Duration::from_millis(40)), Some(Duration::from_millis(40)));
/// ```
#[derive(Debug, Clone)]
pub struct FrameClock {
    config: LoopConfig,
    last: Option<Duration>,
}

impl FrameClock {
    #[must_use]
    pub const fn new(config: LoopConfig) -> Self {
        Self { config, last: None }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> LoopConfig {
        self.config
    }

    /// Decide whether the callback at `now` renders a frame.
    ///
    /// Returns the time elapsed since the previous admitted frame, or
    /// `None` if the frame is throttled. The first frame after construction
    /// or [`reset`](Self::reset) is always admitted with zero elapsed.
    pub fn admit(&mut self, now: Duration) -> Option<Duration> {
        let Some(last) = self.last else {
            self.last = Some(now);
            return Some(Duration::ZERO);
        };

        let Some(elapsed) = now.checked_sub(last) else {
            // Clock went backwards; re-anchor.
            self.last = Some(now);
            return Some(Duration::ZERO);
        };

        if elapsed < self.config.min_frame_interval() {
            return None;
        }
        self.last = Some(now);
        Some(elapsed)
    }

    /// Forget the last admitted frame (e.g. after a pause).
    pub const fn reset(&mut self) {
        self.last = None;
    }
}

// ─── Animate ─────────────────────────────────────────────────────────────────

/// Something driven by host frame callbacks.
pub trait Animate {
    /// Handle one host frame callback. Returns `true` if a frame was
    /// rendered.
    fn on_frame(&mut self, now: Duration) -> bool;

    /// Whether the animation wants further callbacks.
    fn is_running(&self) -> bool;
}

/// Feed a stream of host timestamps to `target` until it stops running or
/// the stream ends. Returns the number of rendered frames.
///
/// Useful for hosts whose frame source is an iterator (a vsync channel, a
/// recorded trace) and for deterministic tests.
pub fn drive<A, I>(target: &mut A, timestamps: I) -> usize
where
    A: Animate + ?Sized,
    I: IntoIterator<Item = Duration>,
{
    let mut rendered = 0;
    for now in timestamps {
        if !target.is_running() {
            break;
        }
        if target.on_frame(now) {
            rendered += 1;
        }
    }
    rendered
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    // ── LoopConfig ──────────────────────────────────────────────

    #[test]
    fn default_config_is_30fps() {
        assert_eq!(LoopConfig::default().min_frame_interval(), ms(33));
    }

    // ── FrameClock ──────────────────────────────────────────────

    #[test]
    fn first_frame_always_admitted() {
        let mut clock = FrameClock::new(LoopConfig::default());
        assert_eq!(clock.admit(ms(5000)), Some(Duration::ZERO));
    }

    #[test]
    fn frames_inside_floor_are_throttled() {
        let mut clock = FrameClock::new(LoopConfig::default());
        clock.admit(ms(0));
        assert_eq!(clock.admit(ms(16)), None);
        assert_eq!(clock.admit(ms(32)), None);
        assert_eq!(clock.admit(ms(33)), Some(ms(33)));
    }

    #[test]
    fn throttled_frames_do_not_move_anchor() {
        let mut clock = FrameClock::new(LoopConfig::default());
        clock.admit(ms(0));
        clock.admit(ms(20));
        assert_eq!(clock.admit(ms(34)), Some(ms(34)));
    }

    #[test]
    fn sixty_hz_host_renders_every_other_frame() {
        let mut clock = FrameClock::new(LoopConfig::default());
        let admitted = (0..60u32)
            .map(|i| Duration::from_micros(u64::from(i) * 16_667))
            .filter(|&t| clock.admit(t).is_some())
            .count();
        assert!((29..=31).contains(&admitted), "admitted {admitted}");
    }

    #[test]
    fn backwards_clock_reanchors() {
        let mut clock = FrameClock::new(LoopConfig::default());
        clock.admit(ms(1000));
        assert_eq!(clock.admit(ms(10)), Some(Duration::ZERO));
        assert_eq!(clock.admit(ms(20)), None);
    }

    #[test]
    fn reset_admits_next_frame() {
        let mut clock = FrameClock::new(LoopConfig::default());
        clock.admit(ms(0));
        clock.reset();
        assert_eq!(clock.admit(ms(1)), Some(Duration::ZERO));
    }

    // ── drive ───────────────────────────────────────────────────

    struct Counter {
        clock: FrameClock,
        frames: usize,
        limit: usize,
    }

    impl Animate for Counter {
        fn on_frame(&mut self, now: Duration) -> bool {
            if self.clock.admit(now).is_none() {
                return false;
            }
            self.frames += 1;
            true
        }

        fn is_running(&self) -> bool {
            self.frames < self.limit
        }
    }

    #[test]
    fn drive_stops_when_target_stops() {
        let mut counter = Counter {
            clock: FrameClock::new(LoopConfig::default()),
            frames: 0,
            limit: 3,
        };
        let rendered = drive(&mut counter, (0..100).map(|i| ms(i * 40)));
        assert_eq!(rendered, 3);
    }

    #[test]
    fn drive_counts_only_rendered_frames() {
        let mut counter = Counter {
            clock: FrameClock::new(LoopConfig::default()),
            frames: 0,
            limit: usize::MAX,
        };
        let rendered = drive(&mut counter, (0..10).map(|i| ms(i * 10)));
        // 0, 40, 80 are admitted.
        assert_eq!(rendered, 3);
    }
}
