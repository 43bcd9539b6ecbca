//! Configuration layer for IP-Rotate.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`SaveArgs`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - `--state-file`, `--rules-file`
//! 2. **TOML config file** - the `[storage]` section
//! 3. **Built-in defaults** - files under the platform's local data directory
//!
//! The `[defaults]` section has no CLI counterpart: it overrides the record
//! written on first install and on reset. The settings themselves are changed
//! at runtime with `ip-rotate save`, never through the config file.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command, ModeArg, SaveArgs};
pub use error::{ConfigError, field};
pub use toml::{DefaultsSection, StorageSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
