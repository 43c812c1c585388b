//! Persisted theme settings and the key/value store behind them.
//!
//! Three values survive restarts: the theme mode, the selected team id,
//! and the texture kind. Each is a JSON value under its own key in a
//! [`ConfigStore`], a raw-bytes port the host implements over whatever
//! durable storage it has. [`MemoryConfigStore`] and [`FsConfigStore`]
//! cover tests and desktop hosts.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use hexhue_grid::texture::TextureKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key for the persisted [`ThemeMode`].
pub const MODE_KEY: &str = "theme.mode";
/// Key for the persisted selected team id.
pub const TEAM_KEY: &str = "theme.team";
/// Key for the persisted [`TextureKind`].
pub const TEXTURE_KEY: &str = "theme.texture";

// ---------------------------------------------------------------------------
// Port
// ---------------------------------------------------------------------------

/// Storage port for raw setting blobs, keyed by logical name.
pub trait ConfigStore {
    /// Load a raw blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("not found")]
    NotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("other: {0}")]
    Other(String),
}

/// Serializes values as JSON and delegates storage to a [`ConfigStore`].
#[derive(Debug)]
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Load and deserialize `key`. Missing or empty keys are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Store failures other than `NotFound`, and malformed JSON.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(ConfigError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Serialize and persist `value` under `key`.
    ///
    /// # Errors
    ///
    /// Serialization or store failures.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Whether the theme follows the selected team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Default,
    Team,
}

/// Everything that is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
    pub team_id: Option<String>,
    pub texture: TextureKind,
}

impl ThemeSettings {
    /// Read every key, defaulting the missing ones.
    ///
    /// # Errors
    ///
    /// The first failing key's error.
    pub fn load<S: ConfigStore>(service: &ConfigService<S>) -> Result<Self, ConfigError> {
        Ok(Self {
            mode: service.load(MODE_KEY)?.unwrap_or_default(),
            team_id: service.load::<Option<String>>(TEAM_KEY)?.flatten(),
            texture: service.load(TEXTURE_KEY)?.unwrap_or_default(),
        })
    }

    /// Write every key.
    ///
    /// # Errors
    ///
    /// The first failing key's error.
    pub fn save<S: ConfigStore>(&self, service: &ConfigService<S>) -> Result<(), ConfigError> {
        service.save(MODE_KEY, &self.mode)?;
        service.save(TEAM_KEY, &self.team_id)?;
        service.save(TEXTURE_KEY, &self.texture)
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// Volatile in-process store.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw blob for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.borrow().get(key).cloned()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        self.get(key).ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        self.blobs.borrow_mut().insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

/// One JSON file per key under a base directory.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// A store rooted at `base`. The directory is created on first save.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// A store rooted at the platform config directory
    /// (e.g. `~/.config/hexhue`).
    ///
    /// # Errors
    ///
    /// [`ConfigError::Other`] if no home directory can be resolved.
    pub fn user_default() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("dev", "hexhue", "hexhue")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Ok(Self::new(dirs.config_dir()))
    }

    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.base)?;
        fs::write(self.path_for(key), data)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings() -> ThemeSettings {
        ThemeSettings {
            mode: ThemeMode::Team,
            team_id: Some("harbor-hawks".into()),
            texture: TextureKind::Halftone,
        }
    }

    #[test]
    fn missing_keys_load_as_defaults() {
        let service = ConfigService::new(MemoryConfigStore::new());
        assert_eq!(ThemeSettings::load(&service).unwrap(), ThemeSettings::default());
    }

    #[test]
    fn memory_round_trip() {
        let service = ConfigService::new(MemoryConfigStore::new());
        settings().save(&service).unwrap();
        assert_eq!(ThemeSettings::load(&service).unwrap(), settings());
        assert_eq!(service.store().get(MODE_KEY).unwrap(), b"\"team\"");
    }

    #[test]
    fn fs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(FsConfigStore::new(dir.path().join("nested")));
        settings().save(&service).unwrap();
        assert!(dir.path().join("nested/theme.texture.json").exists());

        let reopened = ConfigService::new(FsConfigStore::new(dir.path().join("nested")));
        assert_eq!(ThemeSettings::load(&reopened).unwrap(), settings());
    }

    #[test]
    fn fs_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(FsConfigStore::new(dir.path()));
        assert_eq!(service.load::<ThemeMode>(MODE_KEY).unwrap(), None);
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        let store = MemoryConfigStore::new();
        store.save_raw(MODE_KEY, b"{not json").unwrap();
        let service = ConfigService::new(store);
        let err = ThemeSettings::load(&service).unwrap_err();
        assert!(matches!(err, ConfigError::Serde(_)));
    }

    #[test]
    fn empty_blob_is_none() {
        let store = MemoryConfigStore::new();
        store.save_raw(TEAM_KEY, b"").unwrap();
        let service = ConfigService::new(store);
        assert_eq!(service.load::<String>(TEAM_KEY).unwrap(), None);
    }
}
