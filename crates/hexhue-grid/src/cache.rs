// SPDX-License-Identifier: MIT
//
// Bounded per-renderer cache of resolved hex colors.
//
// Entries are only valid for one distribution input (palette, ranges,
// animation seed). The renderer clears the cache wholesale whenever the
// palette, texture, or viewport changes, and the cache clears itself when
// it sees a new animation seed. Growth is bounded: past `capacity`
// entries the oldest insertions are dropped until `retain` remain.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::distribution::ColorSample;
use crate::hex::HexCoord;

/// Default entry ceiling.
pub const MAX_CACHE_ENTRIES: usize = 5000;
/// Entries kept after an eviction.
pub const RETAINED_CACHE_ENTRIES: usize = 2500;

/// Insertion-ordered hex color cache.
#[derive(Debug, Clone)]
pub struct HexColorCache {
    entries: HashMap<HexCoord, ColorSample>,
    order: VecDeque<HexCoord>,
    seed: Option<u32>,
    capacity: usize,
    retain: usize,
}

impl Default for HexColorCache {
    fn default() -> Self {
        Self::new(MAX_CACHE_ENTRIES, RETAINED_CACHE_ENTRIES)
    }
}

impl HexColorCache {
    /// A cache holding at most `capacity` entries that trims back to
    /// `retain` (clamped to `capacity`) when full.
    #[must_use]
    pub fn new(capacity: usize, retain: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            seed: None,
            capacity,
            retain: retain.min(capacity),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.seed = None;
    }

    /// Note the animation seed about to be used. A different seed than
    /// last time invalidates every entry.
    pub fn sync_seed(&mut self, seed: u32) {
        if self.seed != Some(seed) {
            self.entries.clear();
            self.order.clear();
            self.seed = Some(seed);
        }
    }

    #[must_use]
    pub fn get(&self, hex: HexCoord) -> Option<ColorSample> {
        self.entries.get(&hex).copied()
    }

    /// Look up `hex`, computing and inserting it on a miss. The flag is
    /// `true` on a hit.
    pub fn get_or_insert_with<F>(&mut self, hex: HexCoord, resolve: F) -> (ColorSample, bool)
    where
        F: FnOnce() -> ColorSample,
    {
        if let Some(sample) = self.entries.get(&hex) {
            return (*sample, true);
        }
        let sample = resolve();
        self.insert(hex, sample);
        (sample, false)
    }

    /// Insert or replace an entry, evicting if over capacity.
    pub fn insert(&mut self, hex: HexCoord, sample: ColorSample) {
        if self.entries.insert(hex, sample).is_none() {
            self.order.push_back(hex);
        }
        if self.entries.len() > self.capacity {
            self.evict();
        }
    }

    fn evict(&mut self) {
        let before = self.entries.len();
        while self.entries.len() > self.retain {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        debug!(before, after = self.entries.len(), "evicted hex colors");
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
