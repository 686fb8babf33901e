//! Direct serial transport: 38 400 baud, 8 data bits, no parity, one stop
//! bit, no flow control — the only line configuration this protocol uses.

use crate::error::MnetError;
use crate::transport::MnetTransport;
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

/// Mnet's single mandated line rate.
pub const BAUD_RATE: u32 = 38_400;

/// Serial transport configuration. The baud rate and framing are fixed by
/// the protocol; only the port name and timeout vary by deployment.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port_name: String,
    pub timeout: Duration,
}

impl SerialConfig {
    pub fn new(port_name: impl Into<String>) -> Self {
        Self { port_name: port_name.into(), timeout: Duration::from_millis(500) }
    }
}

pub struct SerialTransport {
    config: SerialConfig,
    port: SerialStream,
}

impl SerialTransport {
    pub fn connect(config: SerialConfig) -> Result<Self, MnetError> {
        let port = tokio_serial::new(&config.port_name, BAUD_RATE)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .flow_control(tokio_serial::FlowControl::None)
            .timeout(config.timeout)
            .open_native_async()
            .map_err(|e| MnetError::TransportError(format!("failed to open {}: {e}", config.port_name)))?;
        Ok(Self { config, port })
    }
}

#[async_trait]
impl MnetTransport for SerialTransport {
    async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, MnetError> {
        let mut buf = vec![0u8; n];
        tokio::time::timeout(self.config.timeout, self.port.read_exact(&mut buf))
            .await
            .map_err(|_| MnetError::TransportTimeout(self.config.timeout))??;
        Ok(buf)
    }

    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), MnetError> {
        tokio::time::timeout(self.config.timeout, self.port.write_all(bytes))
            .await
            .map_err(|_| MnetError::TransportTimeout(self.config.timeout))??;
        Ok(())
    }

    async fn close(&mut self) {
        let _ = self.port.flush().await;
    }

    async fn reconnect(&mut self) -> Result<(), MnetError> {
        let replacement = Self::connect(self.config.clone())?;
        self.port = replacement.port;
        Ok(())
    }
}
