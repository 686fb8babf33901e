//! The byte-transport contract the protocol core is built on top of: a
//! reliable stream of bytes with a per-operation timeout, reachable over a
//! direct serial link or a transparent TCP tunnel.

pub mod serial;
pub mod tcp;

use crate::error::MnetError;
use async_trait::async_trait;

/// A reliable byte stream with a bounded per-operation timeout. Both the
/// serial and TCP transports implement this identically; the protocol core
/// never distinguishes between them.
#[async_trait]
pub trait MnetTransport: Send {
    /// Read exactly `n` bytes, or fail with [`MnetError::TransportTimeout`]
    /// if they do not arrive before the configured deadline.
    async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, MnetError>;

    /// Write `bytes` in full.
    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), MnetError>;

    /// Close the underlying connection. Idempotent.
    async fn close(&mut self);

    /// Re-establish the connection after a transport error. Transports that
    /// cannot reconnect in place return an error; callers should construct
    /// a fresh transport instead.
    async fn reconnect(&mut self) -> Result<(), MnetError> {
        Err(MnetError::TransportError("reconnect not supported by this transport".into()))
    }
}
