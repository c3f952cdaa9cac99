//! Scripted radar double that records every call.

use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::client::{RadarConnector, RadarControlClient};
use super::error::{ConnectionError, RadarError};
use super::types::{ActiveDefinition, RadarStatus, Sample, StatusCode};
use crate::abort::AbortSignal;
use crate::config::RadarConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Sample,
    Status,
    RadarId,
    Terminate,
    StartByName(String),
    StartFromFile(PathBuf),
}

#[derive(Debug)]
pub struct Script {
    pub calls: Vec<Call>,
    /// Replies to terminate, `Success` once exhausted.
    pub terminate_codes: VecDeque<StatusCode>,
    pub start_code: StatusCode,
    /// What the status reports. Starts overwrite it when `accept_starts`.
    pub active: Option<String>,
    pub accept_starts: bool,
    /// Report this definition as active from the n-th status poll on.
    pub activate_after_polls: Option<(usize, String)>,
    pub sample: Option<Sample>,
    /// Trigger the signal once this many start calls have been made.
    pub abort_after_starts: Option<(usize, AbortSignal)>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            terminate_codes: VecDeque::new(),
            start_code: StatusCode::Success,
            active: None,
            accept_starts: true,
            activate_after_polls: None,
            sample: None,
            abort_after_starts: None,
        }
    }
}

impl Script {
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    fn start(&mut self, call: Call, name: String) -> StatusCode {
        self.calls.push(call);
        if self.accept_starts {
            self.active = Some(name);
        }
        let starts = self.count(|c| matches!(c, Call::StartByName(_) | Call::StartFromFile(_)));
        if let Some((after, signal)) = &self.abort_after_starts {
            if starts >= *after {
                signal.trigger();
            }
        }
        self.start_code
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedRadar {
    pub script: Rc<RefCell<Script>>,
}

impl ScriptedRadar {
    pub fn new(script: Script) -> Self {
        Self {
            script: Rc::new(RefCell::new(script)),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.borrow().calls.clone()
    }
}

pub fn sample() -> Sample {
    Sample {
        timestamp: Utc::now(),
        end_of_measurement: None,
        elevation: 85.0,
        elevation_rate: 0.0,
        azimuth: 120.0,
        azimuth_rate: 1.0,
        reflectivity: vec![-20.0, f64::NAN, -10.0],
        polarization: vec![f64::NAN, f64::NAN],
    }
}

impl RadarControlClient for ScriptedRadar {
    fn last_sample(&mut self) -> Result<Sample, RadarError> {
        let mut script = self.script.borrow_mut();
        script.calls.push(Call::Sample);
        Ok(script.sample.clone().unwrap_or_else(sample))
    }

    fn radar_status(&mut self) -> Result<RadarStatus, RadarError> {
        let mut script = self.script.borrow_mut();
        script.calls.push(Call::Status);
        let polls = script.count(|c| matches!(c, Call::Status));
        if let Some((after, name)) = script.activate_after_polls.clone() {
            if polls >= after {
                script.active = Some(name);
            }
        }
        Ok(RadarStatus {
            active_definition: script.active.clone().map(ActiveDefinition::Name),
        })
    }

    fn radar_id(&mut self) -> Result<String, RadarError> {
        self.script.borrow_mut().calls.push(Call::RadarId);
        Ok("scripted".to_string())
    }

    fn terminate_measurements(&mut self) -> Result<StatusCode, RadarError> {
        let mut script = self.script.borrow_mut();
        script.calls.push(Call::Terminate);
        Ok(script
            .terminate_codes
            .pop_front()
            .unwrap_or(StatusCode::Success))
    }

    fn start_measurements_by_name(&mut self, name: &str) -> Result<StatusCode, RadarError> {
        Ok(self
            .script
            .borrow_mut()
            .start(Call::StartByName(name.to_string()), name.to_string()))
    }

    fn start_measurements_from_local_file(
        &mut self,
        path: &Path,
    ) -> Result<StatusCode, RadarError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self
            .script
            .borrow_mut()
            .start(Call::StartFromFile(path.to_path_buf()), name))
    }
}

/// Connects to a shared [`ScriptedRadar`] and counts connection attempts.
#[derive(Debug, Default)]
pub struct ScriptedConnector {
    pub radar: ScriptedRadar,
    pub unreachable: bool,
    pub connects: Cell<usize>,
}

impl ScriptedConnector {
    pub fn new(radar: ScriptedRadar) -> Self {
        Self {
            radar,
            unreachable: false,
            connects: Cell::new(0),
        }
    }
}

impl RadarConnector for ScriptedConnector {
    type Client = ScriptedRadar;

    fn connect(&self, config: &RadarConfig) -> Result<ScriptedRadar, ConnectionError> {
        self.connects.set(self.connects.get() + 1);
        if self.unreachable {
            return Err(ConnectionError {
                address: config.address.clone(),
                port: config.port,
                reason: "connection refused".to_string(),
            });
        }
        Ok(self.radar.clone())
    }
}
