//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while encoding or decoding a frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("expected a text frame")]
    NonTextFrame,
}
