use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::planner::AxisMove;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid definition: {0}")]
    Invalid(String),
}

/// Frame repeat instruction: run sweeps `first..=last` `repetitions` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRepeat {
    pub first: usize,
    pub last: usize,
    pub repetitions: u32,
}

impl FrameRepeat {
    pub fn once(sweep: usize) -> Self {
        Self {
            first: sweep,
            last: sweep,
            repetitions: 1,
        }
    }
}

/// Measurement definition document as the radar consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementDefinition {
    pub chirp_program: u32,
    pub scans: Vec<AxisMove>,
    pub frames: Vec<FrameRepeat>,
    /// Measurement duration in seconds.
    pub duration: u64,
    /// Length of each data file in seconds.
    pub file_length: u64,
    pub calibration_interval: u32,
    pub basename: String,
}

impl MeasurementDefinition {
    /// Structural checks the radar would otherwise reject at start time.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.scans.is_empty() {
            return Err(StoreError::Invalid("no scans".into()));
        }
        if let Some(scan) = self.scans.iter().find(|s| !s.is_single_axis()) {
            return Err(StoreError::Invalid(format!(
                "scan moves both axes: {:?}",
                scan
            )));
        }
        for frame in &self.frames {
            if frame.first > frame.last || frame.last >= self.scans.len() {
                return Err(StoreError::Invalid(format!(
                    "frame [{}, {}] outside of {} scan(s)",
                    frame.first,
                    frame.last,
                    self.scans.len()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for MeasurementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} (chirp program {}, calibration interval {})",
            self.basename, self.chirp_program, self.calibration_interval
        )?;
        writeln!(
            f,
            "  duration {} s, file length {} s",
            self.duration, self.file_length
        )?;
        for (i, scan) in self.scans.iter().enumerate() {
            writeln!(
                f,
                "  scan {}: elv {:.2}° -> {:.2}° at {}°/s, azm {:.2}° -> {:.2}° at {}°/s",
                i,
                scan.elevation,
                scan.elevation_target,
                scan.elevation_speed,
                scan.azimuth,
                scan.azimuth_target,
                scan.azimuth_speed
            )?;
        }
        for frame in &self.frames {
            writeln!(
                f,
                "  frame: scans {}..={} x{}",
                frame.first, frame.last, frame.repetitions
            )?;
        }
        Ok(())
    }
}

/// Persistence for measurement definition documents.
pub trait ScanDefinitionStore {
    fn create(&self, path: &Path, definition: &MeasurementDefinition) -> Result<(), StoreError>;

    fn read(&self, path: &Path) -> Result<MeasurementDefinition, StoreError>;

    /// Human readable summary of a document.
    fn render(&self, definition: &MeasurementDefinition) -> String {
        definition.to_string()
    }
}
