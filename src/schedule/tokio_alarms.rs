//! Tokio-backed alarm service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::time::{Clock, SystemClock, to_epoch_millis};

use super::alarms::{Alarm, AlarmError, AlarmService};

/// Stream of alarm names, one item per firing.
pub type AlarmEvents = UnboundedReceiverStream<String>;

#[derive(Debug)]
pub(super) struct Entry {
    pub(super) alarm: Alarm,
    pub(super) generation: u64,
    pub(super) task: JoinHandle<()>,
}

type Table = Arc<Mutex<HashMap<String, Entry>>>;

/// Advances the alarm's scheduled time if `generation` still owns the entry.
///
/// Returns false once the alarm was cleared or replaced, in which case the
/// calling ticker must stop without emitting.
pub(super) fn advance(
    table: &Mutex<HashMap<String, Entry>>,
    name: &str,
    generation: u64,
    period_millis: u64,
) -> bool {
    let mut table = table.lock().unwrap_or_else(PoisonError::into_inner);
    match table.get_mut(name) {
        Some(entry) if entry.generation == generation => {
            entry.alarm.scheduled_time = entry.alarm.scheduled_time.saturating_add(period_millis);
            true
        }
        _ => false,
    }
}

/// Alarm service that runs one tokio task per alarm.
///
/// Each task sleeps for one period, advances the alarm's scheduled time and
/// then emits the alarm name on the [`AlarmEvents`] stream returned by
/// [`TokioAlarmService::new`]. Replacing or clearing an alarm aborts its task;
/// dropping the service aborts them all. Every task is tagged with a
/// generation so a tick that races a replacement never touches the new entry.
///
/// # Type Parameters
///
/// * `C` - The [`Clock`] used to report scheduled times (defaults to [`SystemClock`])
#[derive(Debug)]
pub struct TokioAlarmService<C = SystemClock> {
    clock: C,
    fired: mpsc::UnboundedSender<String>,
    table: Table,
    generations: AtomicU64,
}

impl TokioAlarmService<SystemClock> {
    /// Creates a service using the system clock, with the stream of firings.
    #[must_use]
    pub fn new() -> (Self, AlarmEvents) {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> TokioAlarmService<C> {
    /// Creates a service with a custom clock, with the stream of firings.
    #[must_use]
    pub fn with_clock(clock: C) -> (Self, AlarmEvents) {
        let (fired, events) = mpsc::unbounded_channel();
        let service = Self {
            clock,
            fired,
            table: Arc::default(),
            generations: AtomicU64::new(0),
        };
        (service, UnboundedReceiverStream::new(events))
    }

    fn table(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_ticker(&self, name: String, period: Duration, generation: u64) -> JoinHandle<()> {
        let fired = self.fired.clone();
        let table = Arc::clone(&self.table);
        let period_millis = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if !advance(&table, &name, generation, period_millis) {
                    break;
                }

                tracing::debug!("Alarm '{name}' fired");
                if fired.send(name.clone()).is_err() {
                    break;
                }
            }
        })
    }
}

impl<C: Clock> AlarmService for TokioAlarmService<C> {
    async fn create(&self, name: &str, period: Duration) -> Result<(), AlarmError> {
        if period.is_zero() {
            return Err(AlarmError::InvalidPeriod {
                name: name.to_string(),
            });
        }
        if self.fired.is_closed() {
            return Err(AlarmError::Closed);
        }

        let alarm = Alarm {
            name: name.to_string(),
            scheduled_time: to_epoch_millis(self.clock.now() + period),
            period,
        };
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let task = self.spawn_ticker(name.to_string(), period, generation);

        let entry = Entry {
            alarm,
            generation,
            task,
        };
        if let Some(previous) = self.table().insert(name.to_string(), entry) {
            previous.task.abort();
        }

        tracing::debug!("Alarm '{name}' armed every {}s", period.as_secs());
        Ok(())
    }

    async fn clear(&self, name: &str) -> Result<bool, AlarmError> {
        let Some(entry) = self.table().remove(name) else {
            return Ok(false);
        };
        entry.task.abort();
        tracing::debug!("Alarm '{name}' cleared");
        Ok(true)
    }

    async fn get(&self, name: &str) -> Result<Option<Alarm>, AlarmError> {
        Ok(self.table().get(name).map(|entry| entry.alarm.clone()))
    }
}

impl<C> Drop for TokioAlarmService<C> {
    fn drop(&mut self) {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        for entry in table.values() {
            entry.task.abort();
        }
    }
}
