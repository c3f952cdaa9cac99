use chrono::Utc;
use log::{info, warn};
use std::time::{Duration, Instant};

use super::stats::QuantityStats;
use crate::abort::AbortSignal;
use crate::radar::{RadarControlClient, Sample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    Elapsed,
    EndOfMeasurement,
    Aborted,
}

/// Periodically logs the radar's latest sample while a definition runs.
#[derive(Debug, Clone)]
pub struct ProgressMonitor {
    pub report_interval: Duration,
    /// Stop once the radar's end-of-measurement mark is older than the grace.
    pub stop_on_end_of_measurement: bool,
    pub end_of_measurement_grace: Duration,
}

impl Default for ProgressMonitor {
    fn default() -> Self {
        Self {
            report_interval: Duration::from_secs(1),
            stop_on_end_of_measurement: false,
            end_of_measurement_grace: Duration::from_secs(10),
        }
    }
}

impl ProgressMonitor {
    pub fn new(report_interval: Duration) -> Self {
        Self {
            report_interval,
            ..Self::default()
        }
    }

    /// Reports until `duration` has passed, the measurement ended (when
    /// enabled) or the signal fires.
    pub fn watch<C>(&self, client: &mut C, duration: Duration, signal: &AbortSignal) -> WatchOutcome
    where
        C: RadarControlClient + ?Sized,
    {
        let started = Instant::now();

        loop {
            if signal.is_triggered() {
                return WatchOutcome::Aborted;
            }

            let sample = match client.last_sample() {
                Ok(sample) => {
                    report(&sample);
                    Some(sample)
                }
                Err(e) => {
                    warn!("Could not fetch sample: {}", e);
                    None
                }
            };

            if started.elapsed() > duration {
                return WatchOutcome::Elapsed;
            }

            if self.stop_on_end_of_measurement {
                if let Some(end) = sample.and_then(|s| s.end_of_measurement) {
                    let now = Utc::now();
                    // negative (end still ahead) fails the conversion
                    if let Ok(since) = (now - end).to_std() {
                        if since > self.end_of_measurement_grace {
                            info!("Ending reporting as {} has passed {}", end, now);
                            return WatchOutcome::EndOfMeasurement;
                        }
                    }
                }
            }

            if signal.sleep(self.report_interval).is_err() {
                return WatchOutcome::Aborted;
            }
        }
    }
}

fn report(sample: &Sample) {
    info!("Time of sample: {}", sample.timestamp);
    info!(
        "Elevation/speed: {:.3}°, {:.3}°/s; azimuth/speed: {:.3}°, {:.3}°/s",
        sample.elevation, sample.elevation_rate, sample.azimuth, sample.azimuth_rate
    );
    report_quantity("ZE", "dBZ", &sample.reflectivity);
    report_quantity("SLDR", "dB", &sample.polarization);
}

fn report_quantity(name: &str, unit: &str, values: &[f64]) {
    let stats = QuantityStats::from_values(values);
    if stats.is_missing() {
        info!("{} min/mean/max: no valid range gates", name);
    } else {
        info!("{} min/mean/max: {} {}", name, stats, unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::testing::{sample, Call, Script, ScriptedRadar};
    use chrono::Duration as ChronoDuration;

    fn quick() -> ProgressMonitor {
        ProgressMonitor::new(Duration::from_millis(5))
    }

    #[test]
    fn stops_after_duration() {
        let mut radar = ScriptedRadar::default();
        let started = Instant::now();

        let outcome = quick().watch(&mut radar, Duration::from_millis(30), &AbortSignal::new());

        assert_eq!(outcome, WatchOutcome::Elapsed);
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert!(radar.script.borrow().count(|c| matches!(c, Call::Sample)) >= 2);
    }

    #[test]
    fn all_missing_quantities_do_not_stop_reporting() {
        let mut radar = ScriptedRadar::new(Script {
            sample: Some(Sample {
                reflectivity: vec![f64::NAN; 8],
                polarization: Vec::new(),
                ..sample()
            }),
            ..Script::default()
        });

        let outcome = quick().watch(&mut radar, Duration::from_millis(10), &AbortSignal::new());
        assert_eq!(outcome, WatchOutcome::Elapsed);
    }

    #[test]
    fn stops_once_end_of_measurement_is_long_past() {
        let mut radar = ScriptedRadar::new(Script {
            sample: Some(Sample {
                end_of_measurement: Some(Utc::now() - ChronoDuration::seconds(11)),
                ..sample()
            }),
            ..Script::default()
        });
        let monitor = ProgressMonitor {
            stop_on_end_of_measurement: true,
            ..quick()
        };

        let outcome = monitor.watch(&mut radar, Duration::from_secs(60), &AbortSignal::new());

        assert_eq!(outcome, WatchOutcome::EndOfMeasurement);
        assert_eq!(radar.calls(), vec![Call::Sample]);
    }

    #[test]
    fn recent_end_of_measurement_is_within_grace() {
        let mut radar = ScriptedRadar::new(Script {
            sample: Some(Sample {
                end_of_measurement: Some(Utc::now()),
                ..sample()
            }),
            ..Script::default()
        });
        let monitor = ProgressMonitor {
            stop_on_end_of_measurement: true,
            ..quick()
        };

        let outcome = monitor.watch(&mut radar, Duration::from_millis(20), &AbortSignal::new());
        assert_eq!(outcome, WatchOutcome::Elapsed);
    }

    #[test]
    fn end_of_measurement_ignored_unless_enabled() {
        let mut radar = ScriptedRadar::new(Script {
            sample: Some(Sample {
                end_of_measurement: Some(Utc::now() - ChronoDuration::hours(1)),
                ..sample()
            }),
            ..Script::default()
        });

        let outcome = quick().watch(&mut radar, Duration::from_millis(20), &AbortSignal::new());
        assert_eq!(outcome, WatchOutcome::Elapsed);
    }

    #[test]
    fn abort_returns_silently() {
        let mut radar = ScriptedRadar::default();
        let signal = AbortSignal::new();
        let remote = signal.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.trigger();
        });

        let started = Instant::now();
        let outcome = quick().watch(&mut radar, Duration::from_secs(30), &signal);

        assert_eq!(outcome, WatchOutcome::Aborted);
        assert!(started.elapsed() < Duration::from_secs(5));
        handle.join().ok();
    }
}
