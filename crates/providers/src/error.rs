use indexpush_transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to read service account file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid service account file: {0}")]
    InvalidKeyFile(String),

    #[error("failed to sign token request: {0}")]
    Signing(String),

    #[error("token request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("token endpoint rejected request: HTTP {status}")]
    TokenRejected { status: u16 },

    #[error("malformed token response: {0}")]
    InvalidTokenResponse(String),
}
