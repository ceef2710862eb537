use indexpush_transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed {url} unreachable: HTTP {status}")]
    Unreachable { url: String, status: u16 },

    #[error("feed request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("malformed feed: {0}")]
    Parse(String),

    #[error("candidate store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
