//! Application execution logic.
//!
//! This module maps subcommands onto rotator messages and contains the
//! daemon loop that feeds alarm firings to the rotator.

use std::future::Future;
use std::time::SystemTime;

use thiserror::Error;
use tokio::signal;
use tokio_stream::{Stream, StreamExt};

use ip_rotate::config::{Command, ValidatedConfig};
use ip_rotate::engine::{FileRuleEngine, RuleEngine};
use ip_rotate::schedule::{AlarmService, TokioAlarmService};
use ip_rotate::service::{Event, InstallReason, Request, Response, Rotator, ServiceError};
use ip_rotate::settings::defaults::KNOWN_HEADERS;
use ip_rotate::state::{FileSettingsStore, SettingsStore};
use ip_rotate::time::{Clock, SystemClock};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A pipeline run failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The `message` body is not a valid request.
    #[error("Invalid message: {0}")]
    InvalidMessage(#[source] serde_json::Error),

    /// A response could not be rendered as JSON.
    #[error("Failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    /// Unexpected alarm stream termination.
    #[error("Alarm stream terminated unexpectedly")]
    StreamTerminated,
}

/// Executes one subcommand.
///
/// One-shot commands run a single message through the rotator and print the
/// response. `run` starts the daemon loop, which keeps going until Ctrl+C or
/// SIGTERM.
///
/// # Errors
///
/// Returns an error if the message is malformed, the pipeline fails in a
/// one-shot command, or the alarm stream ends.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires signal
/// handling and real files.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, command: Command) -> Result<(), RunError> {
    if matches!(command, Command::Headers) {
        println!("{}", KNOWN_HEADERS.join("\n"));
        return Ok(());
    }

    let first_install = !config.state_file.exists();
    let store = FileSettingsStore::new(&config.state_file);
    let engine = FileRuleEngine::new(&config.rules_file);
    // Alarms only fire while `events` is alive; one-shot commands still arm
    // the timer so the cached next rotation stays accurate.
    let (alarms, events) = TokioAlarmService::new();
    let rotator = Rotator::new(store, engine, alarms).with_defaults(config.defaults);

    let request = match command {
        Command::Run => {
            tracing::info!("Rule table: {}", config.rules_file.display());
            let shutdown = shutdown_signal();
            return run_daemon(&rotator, events, install_reason(first_install), shutdown).await;
        }
        Command::Message { json } => {
            let request = parse_message(&json)?;
            let response = rotator.request(request).await?;
            println!("{}", to_json(&response)?);
            return Ok(());
        }
        other => match request_for(other) {
            Some(request) => request,
            None => return Ok(()),
        },
    };

    if changes_nothing(&request) {
        println!("Nothing to change. Run 'ip-rotate save --help' for the options.");
        return Ok(());
    }

    let response = rotator.request(request).await?;
    println!("{}", render(&response, SystemClock.now())?);
    Ok(())
}

/// Returns true for a save without any field to update.
fn changes_nothing(request: &Request) -> bool {
    matches!(request, Request::SaveSettings { settings } if settings.is_empty())
}

/// Maps a one-shot subcommand to its rotator message.
fn request_for(command: Command) -> Option<Request> {
    match command {
        Command::State => Some(Request::GetState),
        Command::Save(args) => Some(Request::SaveSettings {
            settings: args.into_patch(),
        }),
        Command::Rotate => Some(Request::RotateNow),
        Command::Reset => Some(Request::ResetSettings),
        Command::Init { .. } | Command::Headers | Command::Message { .. } | Command::Run => None,
    }
}

/// Parses the body of the `message` subcommand.
fn parse_message(json: &str) -> Result<Request, RunError> {
    serde_json::from_str(json).map_err(RunError::InvalidMessage)
}

/// Decides how the daemon announces itself to the rotator.
const fn install_reason(first_install: bool) -> InstallReason {
    if first_install {
        InstallReason::Install
    } else {
        InstallReason::Update
    }
}

/// Formats a response for the terminal.
///
/// Settings are printed as JSON followed by the rotation status.
fn render(response: &Response, now: SystemTime) -> Result<String, RunError> {
    match response {
        Response::State(settings) => Ok(format!(
            "{}\n{}",
            to_json(response)?,
            settings.rotation_status(now)
        )),
        Response::Status { status } => Ok(status.clone()),
        Response::Ignored => Ok("Ignored".to_string()),
    }
}

fn to_json(response: &Response) -> Result<String, RunError> {
    serde_json::to_string_pretty(response).map_err(RunError::Encode)
}

/// Runs the daemon loop.
///
/// Announces the install, then feeds every alarm name from `events` to the
/// rotator until `shutdown` completes. A failed run is logged and the loop
/// keeps going; the next firing (or a later `rotate`) retries.
///
/// # Errors
///
/// Returns [`RunError::StreamTerminated`] if the alarm stream ends.
async fn run_daemon<S, E, A, Ev, F>(
    rotator: &Rotator<S, E, A>,
    mut events: Ev,
    reason: InstallReason,
    shutdown: F,
) -> Result<(), RunError>
where
    S: SettingsStore,
    E: RuleEngine,
    A: AlarmService,
    Ev: Stream<Item = String> + Unpin,
    F: Future<Output = ()>,
{
    match rotator.handle(Event::Installed(reason)).await {
        Ok(response) => log_state(&response),
        Err(e) => tracing::error!("Initial rotation failed: {e}"),
    }

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(());
            }

            name = events.next() => {
                let Some(name) = name else {
                    return Err(RunError::StreamTerminated);
                };

                match rotator.handle(Event::AlarmFired(name)).await {
                    Ok(response) => log_state(&response),
                    Err(e) => tracing::error!("Rotation failed: {e}"),
                }
            }
        }
    }
}

fn log_state(response: &Response) {
    if let Response::State(settings) = response {
        tracing::debug!(
            "Current address {}, {}",
            settings.current_address,
            settings.rotation_status(SystemClock.now())
        );
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed, that signal source is ignored and the
/// failure logged.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
