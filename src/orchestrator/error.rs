use std::time::Duration;
use thiserror::Error;

/// Retry budget exhausted. Not fatal: the radar may still get there, the
/// operator decides how to proceed (usually through the radar GUI).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    #[error("measurement could not be terminated after {attempts} attempt(s) in {waited:?}, use the radar GUI")]
    CouldNotTerminate { attempts: u32, waited: Duration },
    #[error("{definition} could not be started after {attempts} attempt(s) in {waited:?}, use the radar GUI")]
    CouldNotStart {
        definition: String,
        attempts: u32,
        waited: Duration,
    },
}
