use thiserror::Error;

#[derive(Debug, Error)]
pub enum RadarError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected reply: {0}")]
    Protocol(String),
}

#[derive(Debug, Error)]
#[error("could not connect to {address}:{port}: {reason}")]
pub struct ConnectionError {
    pub address: String,
    pub port: u16,
    pub reason: String,
}
