//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use crate::settings::{Mode, SettingsPatch};

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// File locations
    #[serde(default)]
    pub storage: StorageSection,

    /// Settings written on first install and on reset
    #[serde(default)]
    pub defaults: DefaultsSection,
}

/// File locations section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    /// Path to the persisted settings record
    pub state_file: Option<String>,

    /// Path to the installed rule table
    pub rules_file: Option<String>,
}

/// Overrides for the built-in default settings.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    /// Master switch
    pub enabled: Option<bool>,

    /// Rotation interval in minutes
    pub rotation_interval_minutes: Option<u32>,

    /// Headers to rewrite
    pub header_names: Option<Vec<String>>,

    /// Generation policy: "manual", "range" or "list"
    pub mode: Option<Mode>,

    /// Address injected in manual mode
    pub manual_address: Option<String>,

    /// First bound of the random range
    pub range_from: Option<String>,

    /// Second bound of the random range
    pub range_to: Option<String>,

    /// Addresses for list mode
    pub address_list: Option<Vec<String>>,

    /// Domains exempt from rewriting
    pub excluded_domains: Option<Vec<String>>,
}

impl DefaultsSection {
    /// Converts the section into a patch over the built-in defaults.
    #[must_use]
    pub fn to_patch(&self) -> SettingsPatch {
        SettingsPatch {
            enabled: self.enabled,
            rotation_interval_minutes: self.rotation_interval_minutes,
            header_names: self.header_names.clone(),
            mode: self.mode,
            manual_address: self.manual_address.clone(),
            range_from: self.range_from.clone(),
            range_to: self.range_to.clone(),
            address_list: self.address_list.as_ref().map(|list| list.join("\n")),
            excluded_domains: self.excluded_domains.clone(),
        }
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# IP-Rotate Configuration File

[storage]
# Persisted settings record (default: <local data dir>/ip-rotate/ip-rotate-state.json)
# "~" expands to the home directory
# state_file = "~/.local/share/ip-rotate/ip-rotate-state.json"

# Installed rule table, read by the enforcement engine
# (default: <local data dir>/ip-rotate/ip-rotate-rules.json)
# rules_file = "~/.local/share/ip-rotate/ip-rotate-rules.json"

[defaults]
# Settings written on first install and restored by `ip-rotate reset`.
# Anything left out keeps its built-in default.

# Master switch (default: true)
# enabled = true

# Minutes between automatic rotations, 0 = never (default: 1)
rotation_interval_minutes = 1

# Headers to rewrite (see `ip-rotate headers`)
header_names = ["X-Forwarded-For", "X-Real-IP", "Forwarded"]

# Generation policy: "manual", "range" or "list" (default: "range")
mode = "range"

# Address injected in manual mode
# manual_address = "127.0.0.1"

# Bounds of the random range, in either order
# range_from = "0.0.0.0"
# range_to = "255.255.255.255"

# Addresses for list mode
# address_list = ["127.0.0.1", "192.168.1.1", "10.0.0.1", "8.8.8.8"]

# Domains whose requests are never rewritten
# excluded_domains = ["ignore_this_domain.com"]
"#
    .to_string()
}
