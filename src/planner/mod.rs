mod error;
mod planner;
mod types;

pub use error::PlanError;
pub use planner::{device_azimuth, plan};
pub use types::{AxisMove, ScanAxis, ScanKind, ScanPlan, ScanRequest};
