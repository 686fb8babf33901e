//! Error taxonomy for the Mnet driver.
//!
//! Every fallible operation in the crate returns `Result<T, MnetError>`. The
//! CLI binary is the only place `anyhow` wraps this type.

use thiserror::Error;

/// The error kinds a caller of this crate can observe.
#[derive(Debug, Error)]
pub enum MnetError {
    /// The byte transport failed (I/O error, closed pipe, connect refused).
    /// The caller must reconnect.
    #[error("transport error: {0}")]
    TransportError(String),

    /// No byte arrived within the per-operation deadline.
    #[error("transport timed out after {0:?}")]
    TransportTimeout(std::time::Duration),

    /// A frame failed to parse: missing SOH/EOT, a length mismatch, a CRC
    /// mismatch, or an unstuffable byte run. Indicates desync; callers
    /// should drain to the next SOH and retry once.
    #[error("framing error: {0}")]
    FramingError(String),

    /// A well-formed frame carried a body this crate cannot decode (unknown
    /// data-type/conversion-type, truncated typed-value body, unparsable
    /// ASCII timestamp).
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A well-formed frame disagreed with the request that produced it
    /// (wrong packet type, wrong reply length).
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// The controller rejected an operation because the session has not
    /// logged in yet.
    #[error("not authenticated")]
    NotAuthenticated,
}

impl From<std::io::Error> for MnetError {
    fn from(e: std::io::Error) -> Self {
        MnetError::TransportError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MnetError>;
