use chrono::{DateTime, Utc};

/// 2001-01-01T00:00:00Z, the epoch of the radar's sample clock.
pub(super) const DEVICE_EPOCH_UNIX: i64 = 978_307_200;

/// Converts the radar's seconds/microseconds counter into UTC.
pub fn device_timestamp(seconds: u32, micros: u32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(
        DEVICE_EPOCH_UNIX + i64::from(seconds),
        micros.checked_mul(1000)?,
    )
}

/// Reply code of start/terminate commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Success,
    /// Zero calibration running, the command cannot be honoured yet.
    ZeroCalibrationPending,
    /// Transmitter calibration running, the command cannot be honoured yet.
    TransmitterCalibrationPending,
    Failed(i32),
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            1 => StatusCode::Success,
            3 | 4 => StatusCode::ZeroCalibrationPending,
            5 => StatusCode::TransmitterCalibrationPending,
            other => StatusCode::Failed(other),
        }
    }
}

/// Definition name as reported by the radar; some firmware reports a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveDefinition {
    Name(String),
    Names(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadarStatus {
    /// Absent when no definition is loaded.
    pub active_definition: Option<ActiveDefinition>,
}

impl RadarStatus {
    pub fn has_active_definition(&self) -> bool {
        self.active_definition().is_some()
    }

    /// Name of the running definition, the first one if several are reported.
    pub fn active_definition(&self) -> Option<&str> {
        match self.active_definition.as_ref()? {
            ActiveDefinition::Name(name) => Some(name.as_str()),
            ActiveDefinition::Names(names) => names.first().map(String::as_str),
        }
    }
}

/// Latest telemetry snapshot. Missing range gates are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub end_of_measurement: Option<DateTime<Utc>>,
    pub elevation: f64,
    pub elevation_rate: f64,
    pub azimuth: f64,
    pub azimuth_rate: f64,
    /// Equivalent reflectivity (ZE) in dBZ.
    pub reflectivity: Vec<f64>,
    /// Slanted linear depolarization ratio (SLDR) in dB.
    pub polarization: Vec<f64>,
}
