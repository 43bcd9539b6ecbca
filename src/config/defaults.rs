//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

use std::path::PathBuf;

/// Directory (under the platform's local data directory) holding the files.
pub const DATA_DIR: &str = "ip-rotate";

/// Default file name of the persisted settings record.
pub const STATE_FILE: &str = "ip-rotate-state.json";

/// Default file name of the installed rule table.
pub const RULES_FILE: &str = "ip-rotate-rules.json";

/// Default path of the configuration template written by `init`.
pub const CONFIG_FILE: &str = "ip-rotate.toml";

/// Directory the data files live in when no path is configured.
///
/// Falls back to the working directory if the platform has no local data
/// directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(PathBuf::new, |dir| dir.join(DATA_DIR))
}

/// Default settings file path.
#[must_use]
pub fn state_file() -> PathBuf {
    data_dir().join(STATE_FILE)
}

/// Default rule table path.
#[must_use]
pub fn rules_file() -> PathBuf {
    data_dir().join(RULES_FILE)
}
