use chrono::{DateTime, Utc};
use std::path::Path;

use super::client::{RadarConnector, RadarControlClient};
use super::error::{ConnectionError, RadarError};
use super::types::{
    device_timestamp, ActiveDefinition, RadarStatus, Sample, StatusCode, DEVICE_EPOCH_UNIX,
};
use crate::config::RadarConfig;

const GATES: usize = 16;
/// Reply code of a radar that is busy with another request.
const BUSY: i32 = 2;

/// In-process stand-in for a radar: reports whatever definition it was last
/// told to run and produces a slowly changing telemetry sample.
#[derive(Debug, Clone)]
pub struct SimulatedRadar {
    id: String,
    active: Option<String>,
    running: bool,
    /// Start requests that are answered with "busy" before one succeeds.
    busy_starts: u32,
    /// Terminate replies handed out before plain success.
    terminate_codes: Vec<StatusCode>,
    ticks: u64,
}

impl SimulatedRadar {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: None,
            running: false,
            busy_starts: 0,
            terminate_codes: Vec::new(),
            ticks: 0,
        }
    }

    pub fn with_active_definition(mut self, name: impl Into<String>) -> Self {
        self.active = Some(name.into());
        self.running = true;
        self
    }

    pub fn with_busy_starts(mut self, count: u32) -> Self {
        self.busy_starts = count;
        self
    }

    /// Raw terminate reply codes handed out before plain success.
    pub fn with_terminate_codes(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.terminate_codes = codes.into_iter().map(StatusCode::from).collect();
        self
    }

    fn start(&mut self, name: String) -> StatusCode {
        if self.busy_starts > 0 {
            self.busy_starts -= 1;
            return StatusCode::from(BUSY);
        }
        log::debug!("simulated radar now running {}", name);
        self.active = Some(name);
        self.running = true;
        StatusCode::Success
    }
}

/// Current time as the radar's sample clock reports it: whole seconds since
/// 2001 plus microseconds.
fn device_clock() -> DateTime<Utc> {
    let now = Utc::now();
    let seconds = u32::try_from(now.timestamp() - DEVICE_EPOCH_UNIX).unwrap_or(u32::MAX);
    device_timestamp(seconds, now.timestamp_subsec_micros()).unwrap_or(now)
}

impl RadarControlClient for SimulatedRadar {
    fn last_sample(&mut self) -> Result<Sample, RadarError> {
        self.ticks += 1;
        let phase = (self.ticks % 60) as f64;
        let now = device_clock();
        let reflectivity = (0..GATES)
            .map(|gate| {
                if self.running && gate % 4 != 3 {
                    -40.0 + gate as f64 * 2.0 + phase / 10.0
                } else {
                    f64::NAN
                }
            })
            .collect();
        let polarization = (0..GATES)
            .map(|gate| {
                if self.running && gate % 2 == 0 {
                    -25.0 + phase / 20.0
                } else {
                    f64::NAN
                }
            })
            .collect();

        Ok(Sample {
            timestamp: now,
            end_of_measurement: if self.running { None } else { Some(now) },
            elevation: 90.0 - phase / 2.0,
            elevation_rate: if self.running { 1.0 } else { 0.0 },
            azimuth: 0.0,
            azimuth_rate: 0.0,
            reflectivity,
            polarization,
        })
    }

    fn radar_status(&mut self) -> Result<RadarStatus, RadarError> {
        Ok(RadarStatus {
            active_definition: self.active.clone().map(ActiveDefinition::Name),
        })
    }

    fn radar_id(&mut self) -> Result<String, RadarError> {
        Ok(self.id.clone())
    }

    fn terminate_measurements(&mut self) -> Result<StatusCode, RadarError> {
        if !self.terminate_codes.is_empty() {
            return Ok(self.terminate_codes.remove(0));
        }
        self.running = false;
        Ok(StatusCode::Success)
    }

    fn start_measurements_by_name(&mut self, name: &str) -> Result<StatusCode, RadarError> {
        Ok(self.start(name.to_string()))
    }

    fn start_measurements_from_local_file(
        &mut self,
        path: &Path,
    ) -> Result<StatusCode, RadarError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| RadarError::Protocol(format!("not a file: {}", path.display())))?;
        Ok(self.start(name))
    }
}

/// Hands out a fresh copy of a prepared [`SimulatedRadar`] on every connect.
#[derive(Debug, Clone)]
pub struct SimulatedConnector {
    radar: SimulatedRadar,
    reachable: bool,
}

impl SimulatedConnector {
    pub fn new(radar: SimulatedRadar) -> Self {
        Self {
            radar,
            reachable: true,
        }
    }

    /// A connector whose data server never answers.
    pub fn unreachable() -> Self {
        Self {
            radar: SimulatedRadar::new("offline"),
            reachable: false,
        }
    }
}

impl RadarConnector for SimulatedConnector {
    type Client = SimulatedRadar;

    fn connect(&self, config: &RadarConfig) -> Result<SimulatedRadar, ConnectionError> {
        if !self.reachable {
            return Err(ConnectionError {
                address: config.address.clone(),
                port: config.port,
                reason: "connection refused".to_string(),
            });
        }
        log::info!(
            "Connected to simulated radar {} as {}:{}",
            self.radar.id,
            config.address,
            config.port
        );
        Ok(self.radar.clone())
    }
}
