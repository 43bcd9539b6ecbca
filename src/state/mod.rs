//! Settings persistence.
//!
//! This module provides the key-value store abstraction the rotation
//! pipeline reads its settings from and writes them back to.

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FileSettingsStore;

use std::io;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::settings::Settings;

/// Result of reading the raw stored record.
///
/// Explicitly models all valid states to avoid ambiguity:
/// - Successfully loaded a stored record
/// - No record exists (first run or cleared)
/// - A record exists but is corrupted
#[derive(Debug, Clone)]
pub enum LoadResult {
    /// Successfully loaded the stored keys.
    Loaded(Map<String, Value>),

    /// No record exists.
    NotFound,

    /// A record exists but could not be parsed.
    /// Callers should fall back to defaults and overwrite on next save.
    Corrupted {
        /// Reason for corruption (for logging/debugging).
        reason: String,
    },
}

/// Errors that can occur during settings persistence.
///
/// A corrupted record is not an error (see [`LoadResult::Corrupted`]);
/// failing to reach the storage at all is.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the settings file.
    #[error("Failed to read settings file: {0}")]
    Read(#[source] io::Error),

    /// Failed to write or remove the settings file.
    #[error("Failed to write settings file: {0}")]
    Write(#[source] io::Error),

    /// Failed to serialize settings to JSON.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Key-value store holding the single settings record.
///
/// Implementations should:
/// - Merge stored keys over the supplied defaults, so records written by
///   older releases gain new fields automatically
/// - Use atomic writes to prevent corruption from crashes
/// - Degrade gracefully on corrupted records (return the defaults)
///
/// # Testing
///
/// Use [`mock::MockSettingsStore`] in tests to avoid filesystem dependencies.
pub trait SettingsStore: Send + Sync {
    /// Returns the stored record, with missing keys taken from `defaults`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn get(
        &self,
        defaults: &Settings,
    ) -> impl std::future::Future<Output = Result<Settings, StoreError>> + Send;

    /// Replaces the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn set(
        &self,
        settings: &Settings,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Removes the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// Overlays stored keys onto the serialized defaults.
///
/// # Errors
///
/// Returns an error if the merged record does not describe valid settings.
pub fn merge_with_defaults(
    defaults: &Settings,
    stored: Map<String, Value>,
) -> Result<Settings, serde_json::Error> {
    let mut record = serde_json::to_value(defaults)?;
    if let Value::Object(fields) = &mut record {
        fields.extend(stored);
    }
    serde_json::from_value(record)
}

/// Mock settings store for testing.
///
/// Keeps the record in memory and can be told to fail writes.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// A mock implementation of [`SettingsStore`] for testing.
    #[derive(Debug, Default)]
    pub struct MockSettingsStore {
        stored: RwLock<Option<Settings>>,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
    }

    impl MockSettingsStore {
        /// Creates an empty store.
        #[must_use]
        pub fn empty() -> Self {
            Self::default()
        }

        /// Creates a store already holding `settings`.
        #[must_use]
        pub fn with(settings: Settings) -> Self {
            Self {
                stored: RwLock::new(Some(settings)),
                ..Self::default()
            }
        }

        /// Makes every subsequent `set`/`clear` fail.
        pub fn fail_writes(&self) {
            self.fail_writes.store(true, Ordering::SeqCst);
        }

        /// Returns the stored record, if any.
        #[must_use]
        pub fn stored(&self) -> Option<Settings> {
            self.stored.read().unwrap().clone()
        }

        /// Returns the number of successful writes.
        #[must_use]
        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn check_writable(&self) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Write(io::Error::other("mock write failure")));
            }
            Ok(())
        }
    }

    impl SettingsStore for MockSettingsStore {
        async fn get(&self, defaults: &Settings) -> Result<Settings, StoreError> {
            Ok(self.stored().unwrap_or_else(|| defaults.clone()))
        }

        async fn set(&self, settings: &Settings) -> Result<(), StoreError> {
            self.check_writable()?;
            *self.stored.write().unwrap() = Some(settings.clone());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn clear(&self) -> Result<(), StoreError> {
            self.check_writable()?;
            *self.stored.write().unwrap() = None;
            Ok(())
        }
    }
}
