//! Timer service abstraction.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// A named recurring timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    /// Alarm name.
    pub name: String,
    /// Next firing, in milliseconds since the Unix epoch.
    pub scheduled_time: u64,
    /// Time between firings.
    pub period: Duration,
}

/// Errors reported by an [`AlarmService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlarmError {
    /// Recurring alarms need a non-zero period.
    #[error("Alarm '{name}' needs a non-zero period")]
    InvalidPeriod {
        /// The alarm name
        name: String,
    },

    /// Nobody is listening for alarm firings anymore.
    #[error("Alarm service is closed")]
    Closed,
}

/// Scheduler that fires named, periodic alarms.
///
/// Firings are delivered out of band (see [`super::AlarmEvents`]); this trait
/// only manages the alarm table.
pub trait AlarmService: Send + Sync {
    /// Creates (or replaces) a recurring alarm whose first firing is one
    /// `period` from now.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError`] if the alarm cannot be armed.
    fn create(
        &self,
        name: &str,
        period: Duration,
    ) -> impl Future<Output = Result<(), AlarmError>> + Send;

    /// Cancels an alarm, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError`] if the service cannot be reached.
    fn clear(&self, name: &str) -> impl Future<Output = Result<bool, AlarmError>> + Send;

    /// Looks up an alarm.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError`] if the service cannot be reached.
    fn get(&self, name: &str) -> impl Future<Output = Result<Option<Alarm>, AlarmError>> + Send;
}
