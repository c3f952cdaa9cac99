use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Axis that sweeps at scan speed. The other axis holds a fixed heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "lowercase")]
pub enum ScanAxis {
    Elevation,
    Azimuth,
}

/// Scan shape, named after the definition file it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    #[strum(serialize = "SCAN_ELEVATION")]
    Elevation,
    #[strum(serialize = "SCAN_RHI")]
    Rhi,
    /// Azimuth sweep over a sector. Named after the MIRA nomenclature.
    #[strum(serialize = "SCAN_SECTOR")]
    Sector,
    #[strum(serialize = "SCAN_PPI")]
    Ppi,
}

impl ScanKind {
    pub fn of(axis: ScanAxis, once: bool) -> Self {
        match (axis, once) {
            (ScanAxis::Elevation, false) => ScanKind::Elevation,
            (ScanAxis::Elevation, true) => ScanKind::Rhi,
            (ScanAxis::Azimuth, false) => ScanKind::Sector,
            (ScanAxis::Azimuth, true) => ScanKind::Ppi,
        }
    }

    /// Prefix of the data files the radar writes while running this kind.
    pub fn default_basename(&self) -> &'static str {
        match self {
            ScanKind::Elevation => "ELEVATIONSCAN",
            ScanKind::Rhi => "RHISCAN",
            ScanKind::Sector => "SECTORSCAN",
            ScanKind::Ppi => "PPISCAN",
        }
    }
}

/// One commanded sweep in device coordinates. Angles in degrees, speeds in
/// degrees per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMove {
    pub elevation: f64,
    pub elevation_target: f64,
    pub azimuth: f64,
    pub azimuth_target: f64,
    pub elevation_speed: f64,
    pub azimuth_speed: f64,
}

impl AxisMove {
    pub fn is_single_axis(&self) -> bool {
        self.elevation == self.elevation_target || self.azimuth == self.azimuth_target
    }
}

/// Requested scan in geographic azimuth.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub elevation_init: f64,
    pub elevation_end: f64,
    pub azimuth_init: f64,
    pub azimuth_end: f64,
    /// Minimum scan time. Ignored for one-shot scans.
    pub duration: Duration,
    /// Single sweep (RHI/PPI) instead of repeating forth/back sweeps.
    pub once: bool,
}

impl ScanRequest {
    /// Single elevation sweep at a fixed azimuth.
    pub fn rhi(elevation_init: f64, elevation_end: f64, azimuth: f64) -> Self {
        Self {
            elevation_init,
            elevation_end,
            azimuth_init: azimuth,
            azimuth_end: azimuth,
            duration: Duration::ZERO,
            once: true,
        }
    }

    /// Full azimuth circle at a fixed elevation, starting at geographic north.
    pub fn ppi(elevation: f64, north_offset: f64) -> Self {
        Self {
            elevation_init: elevation,
            elevation_end: elevation,
            azimuth_init: north_offset,
            azimuth_end: 359.99 + north_offset,
            duration: Duration::ZERO,
            once: true,
        }
    }

    /// Repeated elevation sweeps at a fixed azimuth.
    pub fn elevation(
        elevation_init: f64,
        elevation_end: f64,
        azimuth: f64,
        duration: Duration,
    ) -> Self {
        Self {
            elevation_init,
            elevation_end,
            azimuth_init: azimuth,
            azimuth_end: azimuth,
            duration,
            once: false,
        }
    }

    /// Repeated azimuth sweeps over a sector at a fixed elevation.
    pub fn azimuth(azimuth_init: f64, azimuth_end: f64, elevation: f64, duration: Duration) -> Self {
        Self {
            elevation_init: elevation,
            elevation_end: elevation,
            azimuth_init,
            azimuth_end,
            duration,
            once: false,
        }
    }
}

/// Timing-correct scan ready to be written into definition documents.
/// Durations are whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanPlan {
    pub axis: ScanAxis,
    pub kind: ScanKind,
    pub once: bool,
    pub forth: AxisMove,
    pub back: AxisMove,
    /// Transit from park position to the start of the first sweep.
    pub movement_time: u64,
    pub one_scan_duration: u64,
    pub sweep_count: u32,
    pub total_duration: u64,
}

impl ScanPlan {
    /// Sweeps that make up the pattern: only the forth leg for one-shot scans.
    pub fn legs(&self) -> Vec<AxisMove> {
        if self.once {
            vec![self.forth]
        } else {
            vec![self.forth, self.back]
        }
    }

    /// How often the forth/back pair has to run to cover `sweep_count`.
    pub fn pair_repetitions(&self) -> u32 {
        self.sweep_count.div_ceil(2)
    }
}
