//! ThemeStateStore: the single owner of the active theme.
//!
//! Holds the mode, the selected team and its palette, and the texture
//! kind, and derives [`ThemeTokens`] from them. Every setter is atomic from
//! the caller's side: state is updated, tokens are re-derived, the sink is
//! pushed if the tokens changed, and the settings are persisted, before
//! the call returns.
//!
//! # Extraction
//!
//! Extraction is the host's job (it owns the async runtime and the
//! [`LogoSource`](hexhue_theme::LogoSource)). Selecting a team hands back
//! an [`ExtractionTicket`] stamped with the store's generation; the host
//! runs the extractor and passes the result back with the ticket. A
//! result whose ticket is older than the current selection is discarded,
//! so the last selection wins no matter what order extractions resolve in.
//!
//! ```text
//! select_team(a) -> ticket(1)      select_team(b) -> ticket(2)
//!        │                                │
//!        ▼                                ▼
//!   extract(a) ...... slow ......    extract(b) ─▶ apply(ticket 2) ✓
//!        └──────────────────────────────────────▶ apply(ticket 1) ✗ stale
//! ```
//!
//! Until a result lands, team mode uses the team's declared colors.

use hexhue_grid::distribution::DistributionConfig;
use hexhue_grid::texture::{TextureConfig, TextureKind};
use hexhue_paint::color::Rgb;
use hexhue_theme::builtin::{DEFAULT_PALETTE_COLORS, DEFAULT_PALETTE_WEIGHTS, default_palette};
use hexhue_theme::contrast::{AA_LARGE, AA_NORMAL, adjust_for_contrast, generate_semantic_colors};
use hexhue_theme::palette::{DEFAULT_MIN_COLORS, ensure_minimum_colors, normalize_palette};
use hexhue_theme::{
    ColorPalette, ExtractedPalette, PaletteSource, Team, ThemeTokens, TokenOverrides,
    generate_theme_tokens,
};
use tracing::{debug, info, warn};

use crate::settings::{ConfigService, ConfigStore, ThemeMode, ThemeSettings};
use crate::sink::TokenSink;

/// Largest lightness shift (HSL points) when fixing a token's contrast.
const MAX_LIGHTNESS_SHIFT: f64 = 40.0;

/// Proof that an extraction was requested for a particular selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTicket {
    generation: u64,
    team: Team,
}

impl ExtractionTicket {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The team whose logo should be extracted.
    #[must_use]
    pub const fn team(&self) -> &Team {
        &self.team
    }
}

/// The active theme.
#[derive(Debug)]
pub struct ThemeStateStore<C, K> {
    settings: ConfigService<C>,
    sink: K,
    mode: ThemeMode,
    team: Option<Team>,
    /// The team's palette: declared colors, then the extraction result.
    palette: ColorPalette,
    /// `None` until an extraction result is applied.
    palette_source: Option<PaletteSource>,
    texture: TextureKind,
    tokens: ThemeTokens,
    generation: u64,
}

impl<C: ConfigStore, K: TokenSink> ThemeStateStore<C, K> {
    /// A store in default mode. The initial tokens are pushed immediately.
    pub fn new(settings: ConfigService<C>, mut sink: K) -> Self {
        let tokens = ThemeTokens::default();
        sink.apply(&tokens);
        Self {
            settings,
            sink,
            mode: ThemeMode::Default,
            team: None,
            palette: ColorPalette::empty(),
            palette_source: None,
            texture: TextureKind::default(),
            tokens,
            generation: 0,
        }
    }

    // ── Accessors ───────────────────────────────────────────────

    #[must_use]
    pub const fn mode(&self) -> ThemeMode {
        self.mode
    }

    #[must_use]
    pub const fn team(&self) -> Option<&Team> {
        self.team.as_ref()
    }

    #[must_use]
    pub const fn texture(&self) -> TextureKind {
        self.texture
    }

    #[must_use]
    pub const fn tokens(&self) -> &ThemeTokens {
        &self.tokens
    }

    /// Where the team palette came from, once an extraction has landed.
    #[must_use]
    pub const fn palette_source(&self) -> Option<PaletteSource> {
        self.palette_source
    }

    /// Bumped on every team selection change.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    #[must_use]
    pub const fn settings(&self) -> &ConfigService<C> {
        &self.settings
    }

    // ── Derived state ───────────────────────────────────────────

    /// The palette the background should paint with: the team palette in
    /// team mode (normalized, padded to three colors), else the default.
    #[must_use]
    pub fn active_palette(&self) -> ColorPalette {
        if self.mode == ThemeMode::Team && self.team.is_some() && !self.palette.is_empty() {
            ensure_minimum_colors(&normalize_palette(&self.palette), DEFAULT_MIN_COLORS)
        } else {
            default_palette()
        }
    }

    /// Texture parameters for the current kind, colored by the two
    /// heaviest palette colors.
    #[must_use]
    pub fn texture_config(&self) -> TextureConfig {
        let palette = self.active_palette();
        let accent = palette.colors.first().copied().unwrap_or(DEFAULT_PALETTE_COLORS[0]);
        let base = palette.colors.get(1).copied().unwrap_or(accent);
        TextureConfig::new(self.texture, base, accent)
    }

    /// Distribution parameters over the active palette.
    #[must_use]
    pub fn distribution_config(&self) -> DistributionConfig {
        DistributionConfig {
            palette: self.active_palette(),
            ..DistributionConfig::default()
        }
    }

    // ── Setters ─────────────────────────────────────────────────

    /// Switch between default and team theming.
    pub fn set_mode(&mut self, mode: ThemeMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        info!(?mode, "theme mode changed");
        self.persist();
        self.refresh_tokens();
    }

    /// Change the background texture.
    pub fn set_texture(&mut self, kind: TextureKind) {
        if self.texture == kind {
            return;
        }
        self.texture = kind;
        info!(?kind, "texture changed");
        self.persist();
    }

    /// Select a team and switch to team mode.
    ///
    /// The theme immediately uses the team's declared colors. Run the
    /// extraction for the returned ticket and hand the result to
    /// [`apply_extraction`](Self::apply_extraction).
    pub fn select_team(&mut self, team: Team) -> ExtractionTicket {
        let ticket = self.adopt_team(team);
        self.mode = ThemeMode::Team;
        info!(team = %ticket.team.id, generation = ticket.generation, "team selected");
        self.persist();
        self.refresh_tokens();
        ticket
    }

    /// Drop the team and return to default mode. Pending extractions
    /// become stale.
    pub fn clear_team(&mut self) {
        self.generation += 1;
        self.team = None;
        self.palette = ColorPalette::empty();
        self.palette_source = None;
        self.mode = ThemeMode::Default;
        info!(generation = self.generation, "team cleared");
        self.persist();
        self.refresh_tokens();
    }

    /// Apply an extraction result if `ticket` still matches the current
    /// selection. Returns whether it was applied.
    ///
    /// A result that fell back to the builtin default keeps the team's
    /// declared colors, which describe the team better than the default.
    pub fn apply_extraction(&mut self, ticket: &ExtractionTicket, result: ExtractedPalette) -> bool {
        let current = self.team.as_ref().map(|t| t.id.as_str());
        if ticket.generation != self.generation || current != Some(ticket.team.id.as_str()) {
            debug!(
                team = %ticket.team.id,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale extraction"
            );
            return false;
        }

        match result.source {
            PaletteSource::Default => {
                debug!(team = %ticket.team.id, "extraction fell back, keeping declared colors");
            }
            source => {
                debug!(team = %ticket.team.id, ?source, colors = result.palette.len(), "extraction applied");
                self.palette = result.palette;
            }
        }
        self.palette_source = Some(result.source);
        self.refresh_tokens();
        true
    }

    /// Load persisted settings, resolving the team id against `catalog`.
    ///
    /// Returns a ticket when a team was restored. Unreadable settings and
    /// unknown team ids are logged and skipped. Nothing is written back.
    pub fn restore(&mut self, catalog: &[Team]) -> Option<ExtractionTicket> {
        let saved = ThemeSettings::load(&self.settings).unwrap_or_else(|err| {
            warn!(error = %err, "failed to load theme settings, using defaults");
            ThemeSettings::default()
        });

        self.texture = saved.texture;
        self.mode = saved.mode;
        let team = saved.team_id.as_deref().and_then(|id| {
            let found = catalog.iter().find(|t| t.id == id).cloned();
            if found.is_none() {
                warn!(team = id, "persisted team not in catalog");
            }
            found
        });
        let ticket = team.map(|team| self.adopt_team(team));

        info!(
            mode = ?self.mode,
            team = ticket.as_ref().map_or("", |t| t.team.id.as_str()),
            texture = ?self.texture,
            "theme settings restored"
        );
        self.refresh_tokens();
        ticket
    }

    // ── Internals ───────────────────────────────────────────────

    fn adopt_team(&mut self, team: Team) -> ExtractionTicket {
        self.generation += 1;
        self.palette = ColorPalette::new(
            team.declared_colors().to_vec(),
            DEFAULT_PALETTE_WEIGHTS.to_vec(),
        );
        self.palette_source = None;
        self.team = Some(team.clone());
        ExtractionTicket {
            generation: self.generation,
            team,
        }
    }

    fn derive_tokens(&self) -> ThemeTokens {
        let overrides = if self.mode == ThemeMode::Team && self.team.is_some() {
            let palette = self.active_palette();
            let mut colors = palette.colors.iter().copied();
            let primary = colors.next();
            TokenOverrides {
                primary,
                secondary: colors.next(),
                accent: colors.next(),
                focus_ring: primary,
                ..TokenOverrides::default()
            }
        } else {
            TokenOverrides::default()
        };
        accessible(generate_theme_tokens(&overrides))
    }

    fn refresh_tokens(&mut self) {
        let tokens = self.derive_tokens();
        if tokens == self.tokens {
            return;
        }
        self.tokens = tokens;
        self.sink.apply(&self.tokens);
        info!(primary = %self.tokens.primary, "theme tokens pushed");
    }

    fn persist(&self) {
        let settings = ThemeSettings {
            mode: self.mode,
            team_id: self.team.as_ref().map(|t| t.id.clone()),
            texture: self.texture,
        };
        if let Err(err) = settings.save(&self.settings) {
            warn!(error = %err, "failed to persist theme settings");
        }
    }
}

/// Fix text, focus ring, and semantic colors for readability.
fn accessible(mut tokens: ThemeTokens) -> ThemeTokens {
    let bg = tokens.bg_primary;
    let fix = |fg: Rgb, bg: Rgb, ratio: f64| adjust_for_contrast(fg, bg, ratio, MAX_LIGHTNESS_SHIFT);

    tokens.text = fix(tokens.text, bg, AA_NORMAL);
    tokens.text_muted = fix(tokens.text_muted, bg, AA_NORMAL);
    tokens.text_inverse = fix(tokens.text_inverse, tokens.primary, AA_NORMAL);
    tokens.focus_ring = fix(tokens.focus_ring, bg, AA_LARGE);

    let semantic = generate_semantic_colors(bg);
    tokens.success = semantic.success;
    tokens.warning = semantic.warning;
    tokens.error = semantic.error;
    tokens
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
