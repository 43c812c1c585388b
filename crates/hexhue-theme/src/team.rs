//! Team catalog entries supplied by the host application.

use hexhue_paint::color::Rgb;
use serde::{Deserialize, Serialize};

/// A team the user can theme the app after.
///
/// `logo_ref` is an opaque locator (URL, asset key, path) that a
/// [`LogoSource`](crate::source::LogoSource) resolves to raw bytes. The
/// declared colors are the catalog's own idea of the brand and seed the
/// token set before any palette is extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub display_name: String,
    pub logo_ref: String,
    pub primary_color: Rgb,
    pub secondary_color: Rgb,
    pub accent_color: Rgb,
}

impl Team {
    /// The declared brand colors, primary first.
    #[must_use]
    pub const fn declared_colors(&self) -> [Rgb; 3] {
        [self.primary_color, self.secondary_color, self.accent_color]
    }
}
