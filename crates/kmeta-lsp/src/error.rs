//! # Error Types
//!
//! Failures of the language-server transport. Protocol-level mistakes made
//! by the client (unknown methods, bad params) are answered over the wire and
//! never surface here.

use thiserror::Error;

/// Error raised by the server loop or the framing layer.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Reading from or writing to the client failed.
    #[error("transport io error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame arrived without a usable `Content-Length` header.
    #[error("malformed frame: {0}")]
    Frame(String),

    /// A frame body, or an outgoing message, was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
