mod command;
mod error;
mod state;

pub use command::{ensure_start, ensure_terminate};
pub use error::CommandError;
pub use state::{CommandTiming, Flow, Phase};
