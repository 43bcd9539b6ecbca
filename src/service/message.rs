//! Host events and boundary messages.

use serde::{Deserialize, Serialize};

use crate::settings::{Settings, SettingsPatch};

/// Status returned by a successful `saveSettings`.
pub const SAVED_STATUS: &str = "Settings saved and rules updated.";

/// Why the host reports an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallReason {
    /// First installation; defaults are written.
    Install,
    /// Upgrade or restart; stored settings are kept.
    Update,
}

/// A request/response message addressed by action name.
///
/// Serialized as `{"action": "<name>", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Returns the full settings record.
    GetState,
    /// Applies a partial update, then rebuilds rules and schedule.
    SaveSettings {
        /// Fields to change.
        settings: SettingsPatch,
    },
    /// Rotates immediately and returns the updated record.
    RotateNow,
    /// Restores defaults and returns the rebuilt record.
    ResetSettings,
}

/// Anything the host delivers to the rotator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The host installed or updated the rotator.
    Installed(InstallReason),
    /// A named alarm fired.
    AlarmFired(String),
    /// A boundary message arrived.
    Message(Request),
}

/// Reply to an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// The full settings record after the event.
    State(Settings),
    /// Confirmation of a save.
    Status {
        /// Human-readable status.
        status: String,
    },
    /// The event did not concern the rotator.
    Ignored,
}
