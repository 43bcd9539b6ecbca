//! Partial settings updates.

use serde::{Deserialize, Serialize};

use super::{Mode, Settings, delimited, normalize_set};

/// A partial update to [`Settings`], as sent by a `saveSettings` message.
///
/// Every field is optional; absent fields keep their current value. The
/// derived caches (`currentAddress`, `nextRotationTime`) have no counterpart
/// here, and unknown keys are ignored, so a client can never overwrite them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    /// New master switch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// New rotation interval in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_interval_minutes: Option<u32>,

    /// New header set (text or array).
    #[serde(with = "delimited::option", skip_serializing_if = "Option::is_none")]
    pub header_names: Option<Vec<String>>,

    /// New generation policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    /// New manual-mode address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_address: Option<String>,

    /// New lower/first range bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_from: Option<String>,

    /// New upper/second range bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_to: Option<String>,

    /// New newline-delimited address list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_list: Option<String>,

    /// New excluded-domain set (text or array).
    #[serde(with = "delimited::option", skip_serializing_if = "Option::is_none")]
    pub excluded_domains: Option<Vec<String>>,
}

impl SettingsPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(super) fn apply_to(self, settings: &mut Settings) {
        let Self {
            enabled,
            rotation_interval_minutes,
            header_names,
            mode,
            manual_address,
            range_from,
            range_to,
            address_list,
            excluded_domains,
        } = self;

        if let Some(enabled) = enabled {
            settings.enabled = enabled;
        }
        if let Some(minutes) = rotation_interval_minutes {
            settings.rotation_interval_minutes = minutes;
        }
        if let Some(headers) = header_names {
            settings.header_names = normalize_set(headers);
        }
        if let Some(mode) = mode {
            settings.mode = mode;
        }
        if let Some(address) = manual_address {
            settings.manual_address = address;
        }
        if let Some(from) = range_from {
            settings.range_from = from;
        }
        if let Some(to) = range_to {
            settings.range_to = to;
        }
        if let Some(list) = address_list {
            settings.address_list = list;
        }
        if let Some(domains) = excluded_domains {
            settings.excluded_domains = normalize_set(domains);
        }
    }
}
