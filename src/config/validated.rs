//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use http::HeaderName;

use crate::address;
use crate::settings::Settings;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Path to the persisted settings record
    pub state_file: PathBuf,

    /// Path to the installed rule table
    pub rules_file: PathBuf,

    /// Record written on first install and on reset
    pub defaults: Settings,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ state_file: {}, rules_file: {}, default_mode: {}, default_interval: {}m, \
             default_headers: {} }}",
            self.state_file.display(),
            self.rules_file.display(),
            self.defaults.mode,
            self.defaults.rotation_interval_minutes,
            self.defaults.header_names.len(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A configured path is empty
    /// - A default header name is not a valid HTTP header name
    /// - A default range bound is not a dotted-decimal IPv4 address
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let state_file = resolve_path(
            field::STATE_FILE,
            cli.state_file.as_deref(),
            toml.and_then(|t| t.storage.state_file.as_deref()),
            defaults::state_file,
        )?;

        let rules_file = resolve_path(
            field::RULES_FILE,
            cli.rules_file.as_deref(),
            toml.and_then(|t| t.storage.rules_file.as_deref()),
            defaults::rules_file,
        )?;

        let defaults = Self::resolve_defaults(toml)?;

        Ok(Self {
            state_file,
            rules_file,
            defaults,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(&expand_tilde(path))?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_defaults(toml: Option<&TomlConfig>) -> Result<Settings, ConfigError> {
        let mut settings = Settings::default();
        let Some(toml) = toml else {
            return Ok(settings);
        };

        settings.apply(toml.defaults.to_patch());

        for name in &settings.header_names {
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ConfigError::InvalidHeaderName {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        for (field, bound) in [
            (field::RANGE_FROM, &settings.range_from),
            (field::RANGE_TO, &settings.range_to),
        ] {
            address::encode(bound)
                .map_err(|source| ConfigError::InvalidAddress { field, source })?;
        }

        Ok(settings)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

/// Picks the CLI path, then the TOML path, then the built-in default.
fn resolve_path(
    field: &'static str,
    cli: Option<&Path>,
    toml: Option<&str>,
    default: fn() -> PathBuf,
) -> Result<PathBuf, ConfigError> {
    let path = match (cli, toml) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(path)) => PathBuf::from(path),
        (None, None) => return Ok(default()),
    };

    if path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath { field });
    }

    Ok(expand_tilde(&path))
}

/// Replaces a leading `~` with the home directory.
///
/// Paths without a leading `~`, or on platforms without a home directory,
/// are returned unchanged.
pub(crate) fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}
