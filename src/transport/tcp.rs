//! TCP tunnel transport: a `ser2net`-style bridge exposing the same byte
//! stream a direct serial link would, so the protocol core above it is
//! transport-agnostic.

use crate::error::MnetError;
use crate::transport::MnetTransport;
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[derive(Debug, Clone)]
pub struct TcpConfig {
    pub address: String,
    pub timeout: Duration,
}

impl TcpConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), timeout: Duration::from_millis(500) }
    }
}

pub struct TcpTransport {
    config: TcpConfig,
    stream: TcpStream,
}

impl TcpTransport {
    pub async fn connect(config: TcpConfig) -> Result<Self, MnetError> {
        let stream = tokio::time::timeout(config.timeout, TcpStream::connect(&config.address))
            .await
            .map_err(|_| MnetError::TransportTimeout(config.timeout))?
            .map_err(|e| MnetError::TransportError(format!("failed to connect to {}: {e}", config.address)))?;
        Ok(Self { config, stream })
    }
}

#[async_trait]
impl MnetTransport for TcpTransport {
    async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, MnetError> {
        let mut buf = vec![0u8; n];
        tokio::time::timeout(self.config.timeout, self.stream.read_exact(&mut buf))
            .await
            .map_err(|_| MnetError::TransportTimeout(self.config.timeout))??;
        Ok(buf)
    }

    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), MnetError> {
        tokio::time::timeout(self.config.timeout, self.stream.write_all(bytes))
            .await
            .map_err(|_| MnetError::TransportTimeout(self.config.timeout))??;
        Ok(())
    }

    async fn close(&mut self) {
        let _ = self.stream.shutdown().await;
    }

    async fn reconnect(&mut self) -> Result<(), MnetError> {
        let replacement = Self::connect(self.config.clone()).await?;
        self.stream = replacement.stream;
        Ok(())
    }
}
