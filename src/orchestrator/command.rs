use log::{debug, info, warn};

use super::error::CommandError;
use super::state::{CommandState, CommandTiming, Flow, Phase};
use crate::abort::AbortSignal;
use crate::definition::DefinitionHandle;
use crate::radar::{RadarControlClient, RadarError, StatusCode};

fn reply(command: &str, result: Result<StatusCode, RadarError>) -> Option<StatusCode> {
    match result {
        Ok(code) => {
            debug!("{} answered {:?}", command, code);
            Some(code)
        }
        Err(e) => {
            warn!("{} request failed: {}", command, e);
            None
        }
    }
}

/// Terminates whatever the radar is measuring, retrying until it confirms.
pub fn ensure_terminate<C>(
    client: &mut C,
    timing: &CommandTiming,
    signal: &AbortSignal,
) -> Result<Flow, CommandError>
where
    C: RadarControlClient + ?Sized,
{
    let mut state = CommandState::new("terminate");
    let budget = timing.attempt_budget();

    loop {
        debug!("Trying to terminate measurements (try {})", state.attempts + 1);
        state.enter(Phase::Requesting);
        let code = reply("terminate", client.terminate_measurements());
        if code == Some(StatusCode::Success) {
            return Ok(state.confirm(timing.settle_time, signal));
        }

        let extra = match code {
            Some(StatusCode::ZeroCalibrationPending) => {
                info!("Zero calibration cannot be terminated, waiting longer");
                timing.zero_calibration_wait
            }
            Some(StatusCode::TransmitterCalibrationPending) => {
                info!("Transmitter calibration cannot be terminated, waiting longer");
                timing.transmitter_calibration_wait
            }
            _ => std::time::Duration::ZERO,
        };

        state.enter(Phase::Polling);
        if signal.sleep(extra + timing.retry_interval).is_err() {
            info!("Waiting for termination cancelled");
            return Ok(state.abort());
        }
        state.attempts += 1;
        match client.radar_status() {
            Ok(status) => debug!("status after terminate: {:?}", status),
            Err(e) => debug!("status after terminate unavailable: {}", e),
        }

        if state.attempts >= budget {
            state.enter(Phase::TimedOut);
            return Err(CommandError::CouldNotTerminate {
                attempts: state.attempts,
                waited: state.waited(),
            });
        }
    }
}

/// Starts `definition` and waits until the radar reports it as running.
///
/// Anything already running is terminated first. Local files are uploaded,
/// anything else is taken to be a definition stored on the radar.
pub fn ensure_start<C>(
    client: &mut C,
    definition: &DefinitionHandle,
    timing: &CommandTiming,
    signal: &AbortSignal,
) -> Result<Flow, CommandError>
where
    C: RadarControlClient + ?Sized,
{
    let mut state = CommandState::new("start");
    let budget = timing.attempt_budget();
    let local = definition.is_local();

    reply("terminate", client.terminate_measurements());

    loop {
        debug!(
            "Trying to start {} (try {})",
            definition,
            state.attempts + 1
        );
        state.enter(Phase::Requesting);
        if local {
            reply(
                "start from file",
                client.start_measurements_from_local_file(&definition.path()),
            );
        } else {
            reply(
                "start by name",
                client.start_measurements_by_name(definition.as_str()),
            );
        }

        state.enter(Phase::Polling);
        if signal.sleep(timing.retry_interval).is_err() {
            info!("Waiting for {} cancelled", definition);
            return Ok(state.abort());
        }
        state.attempts += 1;

        match client.radar_status() {
            Ok(status) => {
                if let Some(active) = status.active_definition() {
                    if definition.matches_active(active) {
                        info!("Radar reports matching definition {}", active);
                        return Ok(state.confirm(timing.settle_time, signal));
                    }
                    debug!("radar still reports {}", active);
                }
            }
            Err(e) => warn!("status request failed: {}", e),
        }

        if state.attempts >= budget {
            state.enter(Phase::TimedOut);
            return Err(CommandError::CouldNotStart {
                definition: definition.to_string(),
                attempts: state.attempts,
                waited: state.waited(),
            });
        }
    }
}
