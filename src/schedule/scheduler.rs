//! Decides whether a rotation timer should exist.

use std::time::Duration;

use crate::settings::{Mode, Settings};

use super::alarms::{Alarm, AlarmError, AlarmService};

/// Name of the rotation alarm.
pub const ALARM_NAME: &str = "ip-rotation-alarm";

/// What to do with the rotation timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDirective {
    /// No timer should exist.
    Cancel,
    /// A recurring timer with this period should exist.
    Arm {
        /// Time between rotations.
        period: Duration,
    },
}

impl ScheduleDirective {
    /// Returns true if `alarm` (the currently registered rotation alarm)
    /// already matches this directive.
    #[must_use]
    pub fn is_satisfied_by(self, alarm: Option<&Alarm>) -> bool {
        match (self, alarm) {
            (Self::Cancel, None) => true,
            (Self::Arm { period }, Some(alarm)) => alarm.period == period,
            _ => false,
        }
    }
}

/// Decides the timer for `settings`.
///
/// No timer exists while rewriting is disabled, in manual mode (the address
/// never changes), or when the interval is zero.
#[must_use]
pub fn plan(settings: &Settings) -> ScheduleDirective {
    if !settings.enabled || settings.mode == Mode::Manual || settings.rotation_interval_minutes == 0
    {
        return ScheduleDirective::Cancel;
    }

    ScheduleDirective::Arm {
        period: Duration::from_secs(u64::from(settings.rotation_interval_minutes) * 60),
    }
}

/// Reconfigures the rotation alarm and returns its next firing time.
///
/// The alarm is always cleared first, so an armed directive restarts the
/// period from now.
///
/// # Errors
///
/// Returns [`AlarmError`] if the service rejects any call.
pub async fn apply<A>(alarms: &A, directive: ScheduleDirective) -> Result<Option<u64>, AlarmError>
where
    A: AlarmService,
{
    alarms.clear(ALARM_NAME).await?;

    match directive {
        ScheduleDirective::Cancel => Ok(None),
        ScheduleDirective::Arm { period } => {
            alarms.create(ALARM_NAME, period).await?;
            next_fire_time(alarms).await
        }
    }
}

/// Reads the rotation alarm's next firing time, if it exists.
///
/// # Errors
///
/// Returns [`AlarmError`] if the service cannot be reached.
pub async fn next_fire_time<A>(alarms: &A) -> Result<Option<u64>, AlarmError>
where
    A: AlarmService,
{
    Ok(alarms
        .get(ALARM_NAME)
        .await?
        .map(|alarm| alarm.scheduled_time))
}
