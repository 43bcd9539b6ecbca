//! The persisted settings record.
//!
//! This module provides:
//! - The single configuration record ([`Settings`]) and its defaults ([`defaults`])
//! - The address-generation policy ([`Mode`])
//! - Partial updates coming from the user ([`SettingsPatch`])
//! - A display helper for the next rotation ([`RotationStatus`])
//!
//! # Persisted Layout
//!
//! The record serializes to one flat JSON object with camelCase keys.
//! `headerNames` and `excludedDomains` are stored as newline-delimited text.
//! `currentAddress` and `nextRotationTime` are caches derived by the rotation
//! pipeline; they are persisted alongside the user fields but never accepted
//! from a [`SettingsPatch`].

pub mod defaults;
mod delimited;
mod patch;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use patch::SettingsPatch;

use std::fmt;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::time::from_epoch_millis;

/// Address-generation policy. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Always inject `manual_address`.
    Manual,
    /// Inject a random address between `range_from` and `range_to`.
    #[default]
    Range,
    /// Inject a random entry of `address_list`.
    List,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Range => write!(f, "range"),
            Self::List => write!(f, "list"),
        }
    }
}

/// The full settings record.
///
/// Every user save or reset replaces it wholesale; every pipeline run reads
/// a fresh snapshot and writes back an updated one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Master on/off switch.
    pub enabled: bool,

    /// Automatic rotation period; `0` disables automatic rotation.
    pub rotation_interval_minutes: u32,

    /// Header names to overwrite, in display order.
    #[serde(with = "delimited")]
    pub header_names: Vec<String>,

    /// Active address-generation policy.
    pub mode: Mode,

    /// Address used in [`Mode::Manual`].
    pub manual_address: String,

    /// One bound of the inclusive range used in [`Mode::Range`].
    pub range_from: String,

    /// The other bound of the inclusive range used in [`Mode::Range`].
    pub range_to: String,

    /// Newline-delimited addresses used in [`Mode::List`].
    pub address_list: String,

    /// Domains whose requests are never rewritten.
    #[serde(with = "delimited")]
    pub excluded_domains: Vec<String>,

    /// Address injected by the installed rule, or a sentinel
    /// ([`defaults::DISABLED_ADDRESS`], [`defaults::UNKNOWN_ADDRESS`]).
    pub current_address: String,

    /// Next automatic rotation, in milliseconds since the Unix epoch.
    pub next_rotation_time: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: defaults::ENABLED,
            rotation_interval_minutes: defaults::ROTATION_INTERVAL_MINUTES,
            header_names: defaults::HEADER_NAMES.map(String::from).to_vec(),
            mode: Mode::default(),
            manual_address: defaults::MANUAL_ADDRESS.to_string(),
            range_from: defaults::RANGE_FROM.to_string(),
            range_to: defaults::RANGE_TO.to_string(),
            address_list: defaults::ADDRESS_LIST.to_string(),
            excluded_domains: defaults::EXCLUDED_DOMAINS.map(String::from).to_vec(),
            current_address: defaults::UNKNOWN_ADDRESS.to_string(),
            next_rotation_time: None,
        }
    }
}

impl Settings {
    /// Returns true if a header-rewrite rule should be installed.
    #[must_use]
    pub fn is_rewriting(&self) -> bool {
        self.enabled && !self.header_names.is_empty()
    }

    /// Applies a partial update, leaving absent fields and the caches untouched.
    pub fn apply(&mut self, patch: SettingsPatch) {
        patch.apply_to(self);
    }

    /// Describes when the next automatic rotation happens, relative to `now`.
    #[must_use]
    pub fn rotation_status(&self, now: SystemTime) -> RotationStatus {
        let Some(next) = self.next_rotation_time else {
            return RotationStatus::Paused;
        };

        match from_epoch_millis(next).duration_since(now) {
            Ok(remaining) if !remaining.is_zero() => RotationStatus::In(remaining),
            _ => RotationStatus::Due,
        }
    }
}

/// When the next automatic rotation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStatus {
    /// No timer is armed (manual mode, disabled, or zero interval).
    Paused,
    /// The scheduled time has been reached.
    Due,
    /// Time left until the scheduled rotation.
    In(Duration),
}

impl fmt::Display for RotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paused => write!(f, "Rotation is manual or paused."),
            Self::Due => write!(f, "Rotating now..."),
            Self::In(remaining) => {
                let secs = remaining.as_secs();
                write!(f, "Next rotation in: {}:{:02}", secs / 60, secs % 60)
            }
        }
    }
}

/// Trims entries, drops blank ones and removes case-insensitive duplicates.
///
/// The first spelling of each entry wins and order is preserved.
pub(crate) fn normalize_set<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set: Vec<String> = Vec::new();
    for item in items {
        let item = item.as_ref().trim();
        if item.is_empty() || set.iter().any(|seen| seen.eq_ignore_ascii_case(item)) {
            continue;
        }
        set.push(item.to_string());
    }
    set
}
