use log::info;

use super::error::PlanError;
use super::types::{AxisMove, ScanAxis, ScanKind, ScanPlan, ScanRequest};
use crate::config::PositionerConfig;

/// Elevation of the park position (zenith).
const ZENITH_DEG: f64 = 90.0;

/// Converts a geographic azimuth into the positioner's frame, in `[0, 360)`.
pub fn device_azimuth(angle: f64, north_offset: f64) -> f64 {
    let azimuth = ((angle - north_offset) + 360.0).rem_euclid(360.0);
    // rem_euclid may round a tiny negative remainder up to exactly 360
    if azimuth >= 360.0 {
        0.0
    } else {
        azimuth
    }
}

/// Turns a scan request into sweep commands and their timing.
pub fn plan(request: &ScanRequest, positioner: &PositionerConfig) -> Result<ScanPlan, PlanError> {
    let scan_speed = checked_speed("scan_speed", positioner.scan_speed)?;
    let fast_speed = checked_speed("fast_speed", positioner.fast_speed)?;
    let north = positioner.north_offset;
    let axis = scan_axis(request)?;

    let transit_elevation = (ZENITH_DEG - request.elevation_init).abs();
    let transit_azimuth = (request.azimuth_init - north).abs();

    let (movement, range) = match axis {
        ScanAxis::Elevation => (
            transit_elevation / scan_speed + transit_azimuth / fast_speed,
            (request.elevation_end - request.elevation_init).abs(),
        ),
        ScanAxis::Azimuth => (
            transit_elevation / fast_speed + transit_azimuth / scan_speed,
            (request.azimuth_end - request.azimuth_init).abs(),
        ),
    };

    let movement_time = movement.ceil() as u64;
    let one_scan_duration = (range / scan_speed).trunc() as u64;
    if one_scan_duration == 0 {
        return Err(PlanError::DegenerateSweep {
            range,
            speed: scan_speed,
        });
    }

    let requested = if request.once {
        1.0
    } else {
        (request.duration.as_secs_f64() / one_scan_duration as f64)
            .ceil()
            .max(1.0)
    };
    let too_long = PlanError::DurationTooLong {
        sweeps: requested,
        one_scan_duration,
    };
    let mut sweeps = requested as u64;
    // forth and back have to pair up so the positioner ends where it began
    if !request.once && sweeps % 2 != 0 {
        info!("Adding another sweep to get an even number of sweeps");
        sweeps = sweeps.checked_add(1).ok_or_else(|| too_long.clone())?;
    }
    let sweep_count = u32::try_from(sweeps).map_err(|_| too_long.clone())?;
    let total_duration = sweeps
        .checked_mul(one_scan_duration)
        .and_then(|t| t.checked_add(movement_time))
        .ok_or(too_long)?;

    let (forth, back) = sweep_moves(request, axis, scan_speed, fast_speed, north);
    let kind = ScanKind::of(axis, request.once);

    match axis {
        ScanAxis::Elevation => info!(
            "{}: {}° to {}° at {}°/s gives {} sweep(s) in {} s",
            kind,
            request.elevation_init,
            request.elevation_end,
            scan_speed,
            sweep_count,
            total_duration
        ),
        ScanAxis::Azimuth => info!(
            "{}: {}° to {}° at {}°/s gives {} sweep(s) in {} s",
            kind,
            request.azimuth_init,
            request.azimuth_end,
            scan_speed,
            sweep_count,
            total_duration
        ),
    }

    Ok(ScanPlan {
        axis,
        kind,
        once: request.once,
        forth,
        back,
        movement_time,
        one_scan_duration,
        sweep_count,
        total_duration,
    })
}

fn checked_speed(name: &'static str, value: f64) -> Result<f64, PlanError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PlanError::InvalidSpeed { name, value })
    }
}

fn scan_axis(request: &ScanRequest) -> Result<ScanAxis, PlanError> {
    if request.azimuth_init == request.azimuth_end {
        Ok(ScanAxis::Elevation)
    } else if request.elevation_init == request.elevation_end {
        Ok(ScanAxis::Azimuth)
    } else {
        Err(PlanError::UnsupportedGeometry {
            elevation_init: request.elevation_init,
            elevation_end: request.elevation_end,
            azimuth_init: request.azimuth_init,
            azimuth_end: request.azimuth_end,
        })
    }
}

fn sweep_moves(
    request: &ScanRequest,
    axis: ScanAxis,
    scan_speed: f64,
    fast_speed: f64,
    north: f64,
) -> (AxisMove, AxisMove) {
    match axis {
        ScanAxis::Elevation => {
            let heading = device_azimuth(request.azimuth_init, north);
            let forth = AxisMove {
                elevation: request.elevation_init,
                elevation_target: request.elevation_end,
                azimuth: heading,
                azimuth_target: heading,
                elevation_speed: scan_speed,
                azimuth_speed: fast_speed,
            };
            let back = AxisMove {
                elevation: request.elevation_end,
                elevation_target: request.elevation_init,
                ..forth
            };
            (forth, back)
        }
        ScanAxis::Azimuth => {
            let start = device_azimuth(request.azimuth_init, north);
            let end = device_azimuth(request.azimuth_end, north);
            let forth = AxisMove {
                elevation: request.elevation_init,
                elevation_target: request.elevation_init,
                azimuth: start,
                azimuth_target: end,
                elevation_speed: fast_speed,
                azimuth_speed: scan_speed,
            };
            let back = AxisMove {
                azimuth: end,
                azimuth_target: start,
                ..forth
            };
            (forth, back)
        }
    }
}
