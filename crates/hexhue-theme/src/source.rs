//! The logo byte-fetch port.
//!
//! Fetching is the one asynchronous step in theming. The host implements
//! [`LogoSource`] over whatever transport it has (HTTP client, asset
//! bundle, filesystem); extraction only ever sees bytes or a
//! [`FetchError`].

use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;

/// A logo could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FetchError(pub String);

/// Resolves a team's `logo_ref` to raw markup or raster bytes.
pub trait LogoSource {
    /// Fetch the bytes behind `logo_ref`.
    fn fetch(&self, logo_ref: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>>;
}

/// An in-memory [`LogoSource`] for bundled assets and fixtures.
#[derive(Debug, Clone, Default)]
pub struct StaticLogoSource {
    logos: HashMap<String, Vec<u8>>,
}

impl StaticLogoSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the bytes for `logo_ref`.
    #[must_use]
    pub fn with_logo(mut self, logo_ref: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(logo_ref, bytes);
        self
    }

    /// Register (or replace) the bytes for `logo_ref`.
    pub fn insert(&mut self, logo_ref: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.logos.insert(logo_ref.into(), bytes.into());
    }
}

impl LogoSource for StaticLogoSource {
    async fn fetch(&self, logo_ref: &str) -> Result<Vec<u8>, FetchError> {
        self.logos
            .get(logo_ref)
            .cloned()
            .ok_or_else(|| FetchError(format!("no logo registered for {logo_ref:?}")))
    }
}
