//! File-based settings persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::atomic::write_atomic;
use crate::settings::Settings;
use crate::time::{Clock, SystemClock, to_epoch_millis};

use super::{LoadResult, SettingsStore, StoreError, merge_with_defaults};

/// Current settings file format version.
///
/// Increment this when making breaking changes to the format.
const SETTINGS_FILE_VERSION: u32 = 1;

/// On-disk settings file format.
///
/// Read back with `T` as a raw JSON object, so that stored keys can be
/// merged over defaults.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile<T> {
    /// Format version for future compatibility.
    version: u32,

    /// Milliseconds since the Unix epoch when the record was saved.
    /// For debugging purposes only; not used in logic.
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_at: Option<u64>,

    /// The stored settings record.
    settings: T,
}

/// File-based implementation of [`SettingsStore`].
///
/// Stores the settings record as a JSON file with atomic write semantics
/// (see [`write_atomic`]).
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Creates a new file-based store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the settings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<LoadResult, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadResult::NotFound),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Ok(LoadResult::Corrupted {
                    reason: format!("Not UTF-8: {e}"),
                });
            }
            Err(e) => return Err(StoreError::Read(e)),
        };

        let result = match serde_json::from_str::<SettingsFile<Map<String, Value>>>(&content) {
            Ok(file) if file.version == SETTINGS_FILE_VERSION => LoadResult::Loaded(file.settings),
            Ok(file) => LoadResult::Corrupted {
                reason: format!(
                    "Incompatible version: expected {SETTINGS_FILE_VERSION}, got {}",
                    file.version
                ),
            },
            Err(e) => LoadResult::Corrupted {
                reason: format!("Invalid JSON: {e}"),
            },
        };
        Ok(result)
    }
}

impl SettingsStore for FileSettingsStore {
    async fn get(&self, defaults: &Settings) -> Result<Settings, StoreError> {
        match self.load()? {
            LoadResult::Loaded(stored) => match merge_with_defaults(defaults, stored) {
                Ok(settings) => Ok(settings),
                Err(e) => {
                    tracing::warn!("Settings file has invalid fields ({e}), using defaults");
                    Ok(defaults.clone())
                }
            },
            LoadResult::NotFound => {
                tracing::debug!("No settings file found, using defaults");
                Ok(defaults.clone())
            }
            LoadResult::Corrupted { reason } => {
                tracing::warn!("Settings file corrupted ({reason}), will overwrite on next save");
                Ok(defaults.clone())
            }
        }
    }

    async fn set(&self, settings: &Settings) -> Result<(), StoreError> {
        let file = SettingsFile {
            version: SETTINGS_FILE_VERSION,
            saved_at: Some(to_epoch_millis(SystemClock.now())),
            settings,
        };
        let content = serde_json::to_string_pretty(&file).map_err(StoreError::Serialize)?;
        write_atomic(self.path.clone(), content)
            .await
            .map_err(StoreError::Write)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write(e)),
        }
    }
}
