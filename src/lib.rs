//! Planning and execution of positioner scan patterns for a cloud radar.

pub mod abort;
pub mod config;
pub mod definition;
pub mod monitor;
pub mod orchestrator;
pub mod planner;
pub mod radar;
pub mod session;
