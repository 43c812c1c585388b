//! # hexhue: procedural team theming
//!
//! Ties the workspace together for a host application: a
//! [`ThemeStateStore`] that owns the active theme, persists it through a
//! [`ConfigStore`], and pushes derived tokens into a [`TokenSink`].
//!
//! # Host wiring
//!
//! ```text
//! startup:   store.restore(&catalog) ──▶ Option<ExtractionTicket>
//!
//! select:    store.select_team(team) ──▶ ExtractionTicket
//!                │                              │
//!                │ tokens (declared colors)     ▼
//!                ▼                  extractor.extract_for_team(&source, ticket.team()).await
//!            TokenSink                          │
//!                ▲                              ▼
//!                └──────── store.apply_extraction(&ticket, result)
//!
//! render:    renderer.set_palette(store.active_palette())
//!            renderer.set_texture(Some(store.texture_config()))
//!            renderer.on_frame(now)   (each host frame callback)
//! ```
//!
//! The sub-crates are re-exported as [`paint`], [`theme`], and [`grid`].

pub mod settings;
pub mod sink;
pub mod store;

pub use hexhue_grid as grid;
pub use hexhue_paint as paint;
pub use hexhue_theme as theme;

pub use settings::{
    ConfigError, ConfigService, ConfigStore, FsConfigStore, MemoryConfigStore, ThemeMode,
    ThemeSettings,
};
pub use sink::{CssVariableSink, TokenSink};
pub use store::{ExtractionTicket, ThemeStateStore};
