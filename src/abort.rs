use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest uninterrupted nap taken while waiting on a signal.
const SLICE: Duration = Duration::from_millis(50);

/// Abort signal checked by every blocking loop (orchestrator, monitor, session).
/// Can be triggered from anywhere holding a clone, e.g. a Ctrl-C handler.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    flag: Arc<AtomicBool>,
}

/// Marker returned when a wait was cut short by an abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aborted;

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Sleeps for `duration`, waking early if the signal fires. A duration
    /// past what the clock can represent only ends through the signal.
    pub fn sleep(&self, duration: Duration) -> Result<(), Aborted> {
        let deadline = Instant::now().checked_add(duration);
        loop {
            if self.is_triggered() {
                return Err(Aborted);
            }
            let nap = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(());
                    }
                    (deadline - now).min(SLICE)
                }
                None => SLICE,
            };
            std::thread::sleep(nap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_completes_when_not_triggered() {
        let signal = AbortSignal::new();
        assert_eq!(signal.sleep(Duration::from_millis(5)), Ok(()));
    }

    #[test]
    fn triggered_signal_cuts_sleep_short() {
        let signal = AbortSignal::new();
        let remote = signal.clone();
        remote.trigger();

        let started = Instant::now();
        assert_eq!(signal.sleep(Duration::from_secs(10)), Err(Aborted));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn trigger_from_another_thread_wakes_sleeper() {
        let signal = AbortSignal::new();
        let remote = signal.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.trigger();
        });

        assert_eq!(signal.sleep(Duration::from_secs(10)), Err(Aborted));
        handle.join().ok();
    }

    #[test]
    fn unrepresentable_duration_waits_for_the_signal() {
        let signal = AbortSignal::new();
        let remote = signal.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.trigger();
        });

        assert_eq!(signal.sleep(Duration::MAX), Err(Aborted));
        handle.join().ok();
    }
}
