use log::debug;
use std::time::{Duration, Instant};

use crate::abort::AbortSignal;

/// Retry timing of one command. The defaults come from how long the radar
/// takes to honour a command in practice.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTiming {
    pub timeout: Duration,
    pub retry_interval: Duration,
    /// Pause after confirmation; the radar's state lags its status report.
    pub settle_time: Duration,
    pub zero_calibration_wait: Duration,
    pub transmitter_calibration_wait: Duration,
}

impl CommandTiming {
    pub fn terminate() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            retry_interval: Duration::from_millis(500),
            settle_time: Duration::from_secs(2),
            zero_calibration_wait: Duration::from_secs(1),
            transmitter_calibration_wait: Duration::from_secs(10),
        }
    }

    pub fn start() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_interval: Duration::from_secs(2),
            ..Self::terminate()
        }
    }

    /// Attempts that fit into the timeout, at least one.
    pub fn attempt_budget(&self) -> u32 {
        if self.retry_interval.is_zero() {
            return 1;
        }
        let budget = self
            .timeout
            .as_nanos()
            .div_ceil(self.retry_interval.as_nanos());
        u32::try_from(budget).unwrap_or(u32::MAX).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Requesting,
    Polling,
    Confirmed,
    TimedOut,
    Aborted,
}

/// How a command ended when it did not run out of retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Confirmed { attempts: u32 },
    Aborted,
}

/// Phase bookkeeping shared by start and terminate.
#[derive(Debug)]
pub(super) struct CommandState {
    command: &'static str,
    phase: Phase,
    pub(super) attempts: u32,
    started: Instant,
}

impl CommandState {
    pub(super) fn new(command: &'static str) -> Self {
        Self {
            command,
            phase: Phase::Idle,
            attempts: 0,
            started: Instant::now(),
        }
    }

    pub(super) fn enter(&mut self, phase: Phase) {
        debug!(
            "{}: {} -> {} (attempt {})",
            self.command,
            self.phase,
            phase,
            self.attempts + 1
        );
        self.phase = phase;
    }

    pub(super) fn waited(&self) -> Duration {
        self.started.elapsed()
    }

    pub(super) fn abort(&mut self) -> Flow {
        self.enter(Phase::Aborted);
        Flow::Aborted
    }

    /// Marks the command confirmed and lets the radar settle.
    pub(super) fn confirm(&mut self, settle: Duration, signal: &AbortSignal) -> Flow {
        self.enter(Phase::Confirmed);
        if signal.sleep(settle).is_err() {
            return self.abort();
        }
        Flow::Confirmed {
            attempts: self.attempts,
        }
    }
}
