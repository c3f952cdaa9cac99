mod monitor;
mod stats;

pub use monitor::{ProgressMonitor, WatchOutcome};
pub use stats::QuantityStats;
