//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::settings::{Mode, SettingsPatch};

use super::defaults;

/// IP-Rotate: client-identity header rotation
///
/// Injects a generated IPv4 address into client-identity headers through a
/// declarative header-rewrite rule and rotates it on a timer.
#[derive(Debug, Parser)]
#[command(name = "ip-rotate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the persisted settings record
    #[arg(long = "state-file", global = true)]
    pub state_file: Option<PathBuf>,

    /// Path to the installed rule table
    #[arg(long = "rules-file", global = true)]
    pub rules_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for ip-rotate
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Print the current settings and the next rotation
    State,

    /// Update settings and rebuild the rule and schedule
    Save(SaveArgs),

    /// Generate a new address immediately
    Rotate,

    /// Restore default settings
    Reset,

    /// List the well-known client-identity headers
    Headers,

    /// Send a raw JSON message, e.g. '{"action":"rotateNow"}'
    Message {
        /// The message body
        json: String,
    },

    /// Keep rotating on the configured interval until interrupted
    Run,
}

/// Fields accepted by the `save` subcommand.
///
/// Omitted options keep their stored value.
#[derive(Debug, Default, Args)]
pub struct SaveArgs {
    /// Master switch for header rewriting
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Rotation interval in minutes (0 disables automatic rotation)
    #[arg(long = "interval", value_name = "MINUTES")]
    pub interval: Option<u32>,

    /// Header to rewrite (can be specified multiple times, replaces the set)
    #[arg(long = "header", value_name = "NAME")]
    pub headers: Vec<String>,

    /// Empty the header set (no rule is installed until headers are saved again)
    #[arg(long = "clear-headers", conflicts_with = "headers")]
    pub clear_headers: bool,

    /// Address-generation policy
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Address injected in manual mode
    #[arg(long = "manual-address", value_name = "ADDR")]
    pub manual_address: Option<String>,

    /// First bound of the random range
    #[arg(long = "range-from", value_name = "ADDR")]
    pub range_from: Option<String>,

    /// Second bound of the random range
    #[arg(long = "range-to", value_name = "ADDR")]
    pub range_to: Option<String>,

    /// Address for list mode (can be specified multiple times, replaces the list)
    #[arg(long = "list-address", value_name = "ADDR")]
    pub list_addresses: Vec<String>,

    /// Empty the address list
    #[arg(long = "clear-list", conflicts_with = "list_addresses")]
    pub clear_list: bool,

    /// Domain exempt from rewriting (can be specified multiple times, replaces the set)
    #[arg(long = "exclude-domain", value_name = "DOMAIN")]
    pub excluded_domains: Vec<String>,

    /// Empty the excluded-domain set
    #[arg(long = "clear-excluded-domains", conflicts_with = "excluded_domains")]
    pub clear_excluded_domains: bool,
}

impl SaveArgs {
    /// Converts the options into a settings patch.
    ///
    /// Repeated options that were never given leave their set untouched,
    /// unless the matching `--clear-*` flag asks for an empty one.
    #[must_use]
    pub fn into_patch(self) -> SettingsPatch {
        let replace = |items: Vec<String>, clear: bool| {
            (clear || !items.is_empty()).then_some(items)
        };

        SettingsPatch {
            enabled: self.enabled,
            rotation_interval_minutes: self.interval,
            header_names: replace(self.headers, self.clear_headers),
            mode: self.mode.map(Mode::from),
            manual_address: self.manual_address,
            range_from: self.range_from,
            range_to: self.range_to,
            address_list: replace(self.list_addresses, self.clear_list)
                .map(|list| list.join("\n")),
            excluded_domains: replace(self.excluded_domains, self.clear_excluded_domains),
        }
    }
}

/// Generation mode argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Inject a fixed address
    Manual,
    /// Pick a random address between two bounds
    Range,
    /// Pick a random entry from a list
    List,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Manual => Self::Manual,
            ModeArg::Range => Self::Range,
            ModeArg::List => Self::List,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
