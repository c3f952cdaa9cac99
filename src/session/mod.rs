mod session;

pub use session::{ScanSession, SessionError, SessionOptions, SessionReport};
