use async_trait::async_trait;
use mnet_rs::error::MnetError;
use mnet_rs::frame::{build_frame, Frame};
use mnet_rs::transport::MnetTransport;
use std::collections::VecDeque;

/// A transport that replays a scripted sequence of response frames and
/// records every frame it was asked to send.
pub struct ScriptedTransport {
    inbound: VecDeque<Vec<u8>>,
    read_buf: Vec<u8>,
    pub sent: Vec<Vec<u8>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Frame>) -> Self {
        Self {
            inbound: responses.into_iter().map(|f| build_frame(&f).unwrap()).collect(),
            read_buf: Vec::new(),
            sent: Vec::new(),
        }
    }
}

#[async_trait]
impl MnetTransport for ScriptedTransport {
    async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, MnetError> {
        while self.read_buf.len() < n {
            let next = self.inbound.pop_front().ok_or_else(|| {
                MnetError::TransportError("scripted transport ran out of responses".into())
            })?;
            self.read_buf.extend_from_slice(&next);
        }
        Ok(self.read_buf.drain(..n).collect())
    }

    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), MnetError> {
        self.sent.push(bytes.to_vec());
        Ok(())
    }

    async fn close(&mut self) {}
}

pub fn serial_response(serial: [u8; 4]) -> Frame {
    Frame {
        destination: 0x01,
        source: 0x02,
        packet_type: mnet_rs::constants::REQ_SERIAL_NUMBER,
        payload: serial.to_vec(),
    }
}
