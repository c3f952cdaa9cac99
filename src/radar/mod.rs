mod client;
mod error;
mod simulated;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{RadarConnector, RadarControlClient};
pub use error::{ConnectionError, RadarError};
pub use simulated::{SimulatedConnector, SimulatedRadar};
pub use types::{device_timestamp, ActiveDefinition, RadarStatus, Sample, StatusCode};
