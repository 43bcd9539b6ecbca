//! Rotation scheduling.
//!
//! This module provides:
//! - The pure scheduling decision ([`plan`], [`ScheduleDirective`])
//! - Applying a decision to a timer service ([`apply`], [`next_fire_time`])
//! - The timer service abstraction ([`AlarmService`], [`Alarm`])
//! - A tokio-backed timer service ([`TokioAlarmService`])

mod alarms;
mod scheduler;
mod tokio_alarms;


#[cfg(test)]
pub use alarms::mock;
pub use alarms::{Alarm, AlarmError, AlarmService};
pub use scheduler::{ALARM_NAME, ScheduleDirective, apply, next_fire_time, plan};
pub use tokio_alarms::{AlarmEvents, TokioAlarmService};
