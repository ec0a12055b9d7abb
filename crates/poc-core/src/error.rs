use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no generation service is reachable")]
    EndpointUnreachable,
    #[error("service returned HTTP {status}: {body}")]
    Transport { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("request aborted after {after:?}")]
    Timeout { after: Duration },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Failures of the creation call itself, shown to users as "try again".
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Network(_) | Self::Timeout { .. } | Self::MalformedResponse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
