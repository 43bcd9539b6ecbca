//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::address::AddressError;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A configured path is empty.
    #[error("Invalid path for {field}: must not be empty")]
    EmptyPath {
        /// Name of the field
        field: &'static str,
    },

    /// Invalid header name in the default settings.
    #[error("Invalid header name '{name}': {reason}")]
    InvalidHeaderName {
        /// The invalid header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid range bound in the default settings.
    #[error("Invalid default for {field}: {source}")]
    InvalidAddress {
        /// Name of the field
        field: &'static str,
        /// Underlying codec error
        #[source]
        source: AddressError,
    },
}

/// Well-known field names used in errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The settings file path.
    pub const STATE_FILE: &str = "state_file";
    /// The rule table path.
    pub const RULES_FILE: &str = "rules_file";
    /// The default lower range bound.
    pub const RANGE_FROM: &str = "range_from";
    /// The default upper range bound.
    pub const RANGE_TO: &str = "range_to";
}
