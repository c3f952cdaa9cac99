use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Station configuration. Every section falls back to the defaults of the
/// reference installation when omitted from the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub radar: RadarConfig,
    pub positioner: PositionerConfig,
    pub definitions: DefinitionsConfig,
    pub session: SessionConfig,
}

/// Where the radar's data server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub address: String,
    pub port: u16,
    pub password: String,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            address: "192.168.0.2".to_string(),
            port: 7000,
            password: String::new(),
        }
    }
}

/// Positioner speeds (°/s) and the azimuth of geographic north in device
/// coordinates.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PositionerConfig {
    pub scan_speed: f64,
    pub fast_speed: f64,
    pub north_offset: f64,
}

impl Default for PositionerConfig {
    fn default() -> Self {
        Self {
            scan_speed: 1.0,
            fast_speed: 5.0,
            north_offset: 22.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefinitionsConfig {
    pub workdir: PathBuf,
    /// Index into the radar's chirp program table (zero based).
    pub chirp_program: u32,
    /// Absolute calibration interval. A running calibration cannot be aborted.
    pub calibration_interval: u32,
    /// One document per sweep direction instead of a single repeating one.
    pub separate_files: bool,
    /// Lower bound for the scan time, rounded up to an even sweep count.
    #[serde(deserialize_with = "parse_duration")]
    pub duration: Duration,
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("MDF_MBF"),
            chirp_program: 7,
            calibration_interval: 1,
            separate_files: true,
            duration: Duration::from_secs(20 * 60),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub reporting: bool,
    #[serde(deserialize_with = "parse_duration")]
    pub report_interval: Duration,
    /// Extra time granted to each definition on top of its own duration.
    #[serde(deserialize_with = "parse_duration")]
    pub grace: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reporting: true,
            report_interval: Duration::from_secs(5),
            grace: Duration::from_secs(3),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

fn parse_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
