use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanError {
    #[error(
        "scanning in elevation ({elevation_init}° to {elevation_end}°) and azimuth \
         ({azimuth_init}° to {azimuth_end}°) at the same time is not supported"
    )]
    UnsupportedGeometry {
        elevation_init: f64,
        elevation_end: f64,
        azimuth_init: f64,
        azimuth_end: f64,
    },
    #[error("{name} must be a positive number of degrees per second, got {value}")]
    InvalidSpeed { name: &'static str, value: f64 },
    #[error("a sweep over {range}° at {speed}°/s lasts less than one second")]
    DegenerateSweep { range: f64, speed: f64 },
    #[error("a scan of {sweeps} sweep(s) of {one_scan_duration} s does not fit into the schedule")]
    DurationTooLong { sweeps: f64, one_scan_duration: u64 },
}
