//! Error type for pipeline runs.

use thiserror::Error;

use crate::address::AddressError;
use crate::engine::EngineError;
use crate::rule::RuleError;
use crate::schedule::AlarmError;
use crate::state::StoreError;

/// Failure of an event or boundary message.
///
/// Collaborator failures are never swallowed; they surface here so the
/// caller can retry (e.g. with a later `rotateNow`).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A range bound is not a valid address.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The rule could not be built.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// The settings store failed.
    #[error("Settings store failed: {0}")]
    Store(#[from] StoreError),

    /// The rule engine rejected the update.
    #[error("Rule engine failed: {0}")]
    Engine(#[from] EngineError),

    /// The alarm service failed.
    #[error("Alarm service failed: {0}")]
    Alarm(#[from] AlarmError),
}
