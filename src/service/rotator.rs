//! Event dispatch and the rotation pipeline.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;

use crate::address;
use crate::engine::RuleEngine;
use crate::rule::{self, RuleDirective};
use crate::schedule::{self, ALARM_NAME, AlarmError, AlarmService};
use crate::settings::Settings;
use crate::state::SettingsStore;

use super::error::ServiceError;
use super::message::{Event, InstallReason, Request, Response, SAVED_STATUS};

/// Runs the rotation pipeline against its three collaborators.
///
/// Each [`Event`] is handled to completion before the next one starts: the
/// random source lives behind an async mutex that is held for the whole
/// run, so concurrently delivered events are serialized per instance.
///
/// # Type Parameters
///
/// * `S` - The [`SettingsStore`] holding the settings record
/// * `E` - The [`RuleEngine`] enforcing the header-rewrite rule
/// * `A` - The [`AlarmService`] driving automatic rotation
///
/// # Example
///
/// ```no_run
/// use ip_rotate::engine::FileRuleEngine;
/// use ip_rotate::schedule::TokioAlarmService;
/// use ip_rotate::service::{Request, Rotator};
/// use ip_rotate::state::FileSettingsStore;
///
/// # async fn example() -> Result<(), ip_rotate::service::ServiceError> {
/// let (alarms, _events) = TokioAlarmService::new();
/// let rotator = Rotator::new(
///     FileSettingsStore::new("settings.json"),
///     FileRuleEngine::new("rules.json"),
///     alarms,
/// );
/// let state = rotator.request(Request::RotateNow).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Rotator<S, E, A> {
    store: S,
    engine: E,
    alarms: A,
    defaults: Settings,
    rng: Mutex<StdRng>,
}

impl<S, E, A> Rotator<S, E, A>
where
    S: SettingsStore,
    E: RuleEngine,
    A: AlarmService,
{
    /// Creates a rotator with built-in defaults and an entropy-seeded RNG.
    #[must_use]
    pub fn new(store: S, engine: E, alarms: A) -> Self {
        Self {
            store,
            engine,
            alarms,
            defaults: Settings::default(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Sets the random source (useful for deterministic tests).
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Sets the record written on install and reset.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Settings) -> Self {
        self.defaults = defaults;
        self
    }

    /// Returns the settings store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the rule engine.
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Returns the alarm service.
    pub const fn alarms(&self) -> &A {
        &self.alarms
    }

    /// Handles a boundary message.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if any collaborator fails or the settings
    /// cannot produce a rule.
    pub async fn request(&self, request: Request) -> Result<Response, ServiceError> {
        self.handle(Event::Message(request)).await
    }

    /// Handles one event to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if any collaborator fails or the settings
    /// cannot produce a rule. Rules and timers installed by earlier runs
    /// stay in place.
    pub async fn handle(&self, event: Event) -> Result<Response, ServiceError> {
        let mut rng = self.rng.lock().await;

        match event {
            Event::Installed(reason) => self.on_installed(reason, &mut rng).await,
            Event::AlarmFired(name) => self.on_alarm(&name, &mut rng).await,
            Event::Message(Request::GetState) => {
                Ok(Response::State(self.store.get(&self.defaults).await?))
            }
            Event::Message(Request::SaveSettings { settings: patch }) => {
                let mut settings = self.store.get(&self.defaults).await?;
                settings.apply(patch);
                self.store.set(&settings).await?;
                self.refresh(settings, &mut rng).await?;
                Ok(Response::Status {
                    status: SAVED_STATUS.to_string(),
                })
            }
            Event::Message(Request::RotateNow) => {
                let settings = self.store.get(&self.defaults).await?;
                Ok(Response::State(self.refresh(settings, &mut rng).await?))
            }
            Event::Message(Request::ResetSettings) => {
                self.store.clear().await?;
                self.store.set(&self.defaults).await?;
                let settings = self.store.get(&self.defaults).await?;
                Ok(Response::State(self.refresh(settings, &mut rng).await?))
            }
        }
    }

    async fn on_installed(
        &self,
        reason: InstallReason,
        rng: &mut StdRng,
    ) -> Result<Response, ServiceError> {
        if reason == InstallReason::Install {
            tracing::info!("First install, writing default settings");
            self.store.set(&self.defaults).await?;
        }

        let settings = self.store.get(&self.defaults).await?;
        Ok(Response::State(self.refresh(settings, rng).await?))
    }

    async fn on_alarm(&self, name: &str, rng: &mut StdRng) -> Result<Response, ServiceError> {
        if name != ALARM_NAME {
            tracing::debug!("Ignoring unrelated alarm '{name}'");
            return Ok(Response::Ignored);
        }

        let settings = self.store.get(&self.defaults).await?;
        let mut settings = self.rotate(settings, rng).await?;

        let scheduled = self.reconcile_schedule(&settings).await;
        if let Ok(next) = scheduled {
            settings.next_rotation_time = next;
        }
        self.store.set(&settings).await?;
        scheduled?;

        Ok(Response::State(settings))
    }

    /// Keeps the running alarm when it still matches the stored settings,
    /// and re-applies the schedule otherwise.
    ///
    /// The record may have been rewritten by another process since the alarm
    /// was armed.
    async fn reconcile_schedule(&self, settings: &Settings) -> Result<Option<u64>, AlarmError> {
        let directive = schedule::plan(settings);
        let current = self.alarms.get(ALARM_NAME).await?;

        if directive.is_satisfied_by(current.as_ref()) {
            return Ok(current.map(|alarm| alarm.scheduled_time));
        }

        tracing::info!("Stored settings changed the rotation schedule, rescheduling");
        schedule::apply(&self.alarms, directive).await
    }

    /// Rebuilds the rule and the schedule, then persists the caches.
    ///
    /// The rule-side cache is persisted even if rescheduling fails, so the
    /// stored record always describes the installed rule.
    async fn refresh(
        &self,
        settings: Settings,
        rng: &mut StdRng,
    ) -> Result<Settings, ServiceError> {
        let mut settings = self.rotate(settings, rng).await?;

        let directive = schedule::plan(&settings);
        let scheduled = schedule::apply(&self.alarms, directive).await;
        if let Ok(next) = scheduled {
            settings.next_rotation_time = next;
            match next {
                Some(next) => tracing::debug!("Next rotation at {next} ms"),
                None => tracing::debug!("Automatic rotation off"),
            }
        }

        self.store.set(&settings).await?;
        scheduled?;
        Ok(settings)
    }

    /// Generates an address and replaces the installed rule.
    ///
    /// Returns `settings` with `current_address` updated; nothing is
    /// persisted here.
    async fn rotate(
        &self,
        mut settings: Settings,
        rng: &mut StdRng,
    ) -> Result<Settings, ServiceError> {
        let directive = if settings.is_rewriting() {
            let address = address::generate(&settings, rng)?;
            rule::build(&settings, &address)?
        } else {
            RuleDirective::Remove
        };

        let effective = directive.effective_address().to_string();
        let installs = directive.rule().is_some();
        self.engine.update_rules(directive.into_update()).await?;

        if installs {
            tracing::info!(
                "Injecting {effective} ({} mode) into {} header(s)",
                settings.mode,
                settings.header_names.len()
            );
        } else {
            tracing::info!("Header rewriting disabled, rule removed");
        }

        settings.current_address = effective;
        Ok(settings)
    }
}
