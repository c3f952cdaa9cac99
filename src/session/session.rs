use log::{error, info, warn};
use std::time::Duration;
use thiserror::Error;

use crate::abort::AbortSignal;
use crate::config::{RadarConfig, SessionConfig};
use crate::definition::{review, DefinitionHandle, ScanDefinitionStore, StoreError};
use crate::monitor::{ProgressMonitor, WatchOutcome};
use crate::orchestrator::{ensure_start, ensure_terminate, CommandError, CommandTiming, Flow};
use crate::radar::{ConnectionError, RadarConnector, RadarControlClient, StatusCode};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(
        "error connecting to the radar data server ({0}); is the radar client running? \
         It forwards the commands to the radar"
    )]
    Connection(#[from] ConnectionError),
    #[error("definition {handle}: {source}")]
    Definition {
        handle: DefinitionHandle,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Only read and render the definitions, never contact the radar.
    pub dry_run: bool,
    /// Log live samples while a definition runs instead of sleeping.
    pub reporting: bool,
    pub report_interval: Duration,
    pub stop_on_end_of_measurement: bool,
    /// Added to every definition's duration to cover rounding on the radar.
    pub grace: Duration,
    pub start_timing: CommandTiming,
    pub terminate_timing: CommandTiming,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default(), true)
    }
}

impl SessionOptions {
    pub fn from_config(config: &SessionConfig, dry_run: bool) -> Self {
        Self {
            dry_run,
            reporting: config.reporting,
            report_interval: config.report_interval,
            stop_on_end_of_measurement: false,
            grace: config.grace,
            start_timing: CommandTiming::start(),
            terminate_timing: CommandTiming::terminate(),
        }
    }
}

/// What happened during a session.
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub handles: Vec<DefinitionHandle>,
    pub dry_run: bool,
    /// Definitions that ran for their full duration.
    pub completed: usize,
    pub aborted: bool,
    /// Definition the radar was running before the session.
    pub previous: Option<String>,
    /// Whether the radar accepted the previous definition again.
    pub restored: bool,
    /// The closing terminate was cut short by the cleanup signal.
    pub cleanup_interrupted: bool,
    /// Non-fatal command failures, in order of occurrence.
    pub command_failures: Vec<CommandError>,
}

/// Runs a list of definitions on a radar and leaves the radar running
/// whatever it ran before.
pub struct ScanSession<'a, C, S> {
    connector: &'a C,
    store: &'a S,
    radar: RadarConfig,
    options: SessionOptions,
    cleanup_signal: AbortSignal,
}

impl<'a, C, S> ScanSession<'a, C, S>
where
    C: RadarConnector,
    S: ScanDefinitionStore,
{
    pub fn new(connector: &'a C, store: &'a S, radar: RadarConfig, options: SessionOptions) -> Self {
        Self {
            connector,
            store,
            radar,
            options,
            cleanup_signal: AbortSignal::new(),
        }
    }

    /// Signal that cuts the closing terminate short. It is separate from the
    /// run signal so the abort that ended the run does not also skip the
    /// cleanup; the first terminate request is sent regardless.
    pub fn with_cleanup_signal(mut self, signal: AbortSignal) -> Self {
        self.cleanup_signal = signal;
        self
    }

    pub fn run(
        &self,
        handles: &[DefinitionHandle],
        signal: &AbortSignal,
    ) -> Result<SessionReport, SessionError> {
        let mut report = SessionReport {
            handles: handles.to_vec(),
            dry_run: self.options.dry_run,
            ..SessionReport::default()
        };

        if self.options.dry_run {
            for handle in handles {
                self.read(handle)?;
            }
            return Ok(report);
        }

        let mut client = self.connector.connect(&self.radar).map_err(|e| {
            error!("Error connecting to data server: {}", e);
            SessionError::Connection(e)
        })?;

        match client.radar_id() {
            Ok(id) => info!("Connected to radar {}", id),
            Err(e) => warn!("Could not read radar id: {}", e),
        }
        report.previous = match client.radar_status() {
            Ok(status) => status.active_definition().map(String::from),
            Err(e) => {
                warn!("Could not read radar status, nothing will be restored: {}", e);
                None
            }
        };
        info!(
            "Radar is currently running {}",
            report.previous.as_deref().unwrap_or("nothing")
        );

        let outcome = self.run_definitions(&mut client, handles, signal, &mut report);
        if signal.is_triggered() {
            info!("Scanning stopped manually");
            report.aborted = true;
        }

        self.cleanup(&mut client, &mut report);

        outcome.map(|()| report)
    }

    fn read(&self, handle: &DefinitionHandle) -> Result<u64, SessionError> {
        review(self.store, &handle.path())
            .map(|definition| definition.duration)
            .map_err(|source| SessionError::Definition {
                handle: handle.clone(),
                source,
            })
    }

    fn run_definitions(
        &self,
        client: &mut C::Client,
        handles: &[DefinitionHandle],
        signal: &AbortSignal,
        report: &mut SessionReport,
    ) -> Result<(), SessionError> {
        let monitor = ProgressMonitor {
            report_interval: self.options.report_interval,
            stop_on_end_of_measurement: self.options.stop_on_end_of_measurement,
            ..ProgressMonitor::default()
        };

        for (index, handle) in handles.iter().enumerate() {
            if signal.is_triggered() {
                break;
            }
            info!("Running {}, {} of {}", handle, index + 1, handles.len());
            let duration = self.read(handle)?;

            match ensure_start(client, handle, &self.options.start_timing, signal) {
                Ok(Flow::Confirmed { .. }) => {}
                Ok(Flow::Aborted) => break,
                Err(e) => {
                    warn!("{}", e);
                    report.command_failures.push(e);
                }
            }

            let window = Duration::from_secs(duration).saturating_add(self.options.grace);
            let interrupted = if self.options.reporting {
                monitor.watch(client, window, signal) == WatchOutcome::Aborted
            } else {
                signal.sleep(window).is_err()
            };
            if interrupted {
                break;
            }
            report.completed += 1;
        }

        Ok(())
    }

    /// Best effort: failures are logged and recorded, never returned.
    fn cleanup(&self, client: &mut C::Client, report: &mut SessionReport) {
        match ensure_terminate(client, &self.options.terminate_timing, &self.cleanup_signal) {
            Ok(Flow::Confirmed { .. }) => info!("Scan finished"),
            Ok(Flow::Aborted) => {
                warn!("Cleanup interrupted, the radar may still be measuring");
                report.cleanup_interrupted = true;
            }
            Err(e) => {
                warn!("{}", e);
                report.command_failures.push(e);
            }
        }

        if let Some(previous) = report.previous.clone() {
            info!("Installing previous definition {}", previous);
            match client.start_measurements_by_name(&previous) {
                Ok(StatusCode::Success) => report.restored = true,
                Ok(code) => warn!("Radar answered {:?} when restoring {}", code, previous),
                Err(e) => warn!("Could not restore {}: {}", previous, e),
            }
        }
    }
}
