use std::path::Path;

use super::error::{ConnectionError, RadarError};
use super::types::{RadarStatus, Sample, StatusCode};
use crate::config::RadarConfig;

/// Commands understood by the radar's data server.
pub trait RadarControlClient {
    fn last_sample(&mut self) -> Result<Sample, RadarError>;

    fn radar_status(&mut self) -> Result<RadarStatus, RadarError>;

    fn radar_id(&mut self) -> Result<String, RadarError>;

    fn terminate_measurements(&mut self) -> Result<StatusCode, RadarError>;

    /// Starts a definition that already resides on the radar.
    fn start_measurements_by_name(&mut self, name: &str) -> Result<StatusCode, RadarError>;

    /// Uploads a local definition file and starts it.
    fn start_measurements_from_local_file(&mut self, path: &Path)
        -> Result<StatusCode, RadarError>;
}

/// Opens a control connection to a radar.
pub trait RadarConnector {
    type Client: RadarControlClient;

    fn connect(&self, config: &RadarConfig) -> Result<Self::Client, ConnectionError>;
}
