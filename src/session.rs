//! Session bring-up and the dictionary-level operations built on top of the
//! frame, obfuscation, and typed-value codecs.
//!
//! A session owns its transport exclusively and serializes every
//! request/response pair: there is never more than one outstanding request
//! on the wire at a time.

use crate::constants::*;
use crate::error::MnetError;
use crate::frame::{build_frame, Frame};
use crate::obfuscation::{decode as obf_decode, derive_key, encode as obf_encode};
use crate::tracer::{NullTracer, Tracer};
use crate::transport::MnetTransport;
use crate::typed_value::{decode_multi, decode_typed_value, Element, Value};
use chrono::{DateTime, Utc};
use log::{debug, warn};

/// Session lifecycle state. Transitions only move forward except for an
/// explicit `close()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Disconnected,
    Connected,
    Keyed,
    LoggedIn,
    Closed,
}

/// A local node address, typically `0x01`.
const LOCAL_ADDRESS: u8 = 0x01;

pub struct Session<T: MnetTransport> {
    transport: T,
    state: State,
    serial: Option<[u8; 4]>,
    key: Option<[u8; 5]>,
    tracer: Box<dyn Tracer>,
}

impl<T: MnetTransport> Session<T> {
    /// Wrap an already-connected transport in a fresh, unkeyed session.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: State::Connected,
            serial: None,
            key: None,
            tracer: Box::new(NullTracer),
        }
    }

    /// Inject an observer for raw traffic and decoded elements.
    pub fn set_tracer(&mut self, tracer: Box<dyn Tracer>) {
        self.tracer = tracer;
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Send one frame and read back exactly one frame in response.
    async fn send_packet(&mut self, destination: u8, packet_type: u16, payload: &[u8]) -> Result<Frame, MnetError> {
        let frame = Frame { destination, source: LOCAL_ADDRESS, packet_type, payload: payload.to_vec() };
        let bytes = build_frame(&frame)?;
        debug!("tx frame type=0x{packet_type:04x} len={}", payload.len());
        self.tracer.on_tx(&bytes);
        self.transport.write_all(&bytes).await?;

        let header = self.transport.read_exact(6).await?;
        if header[0] != SOH {
            return Err(MnetError::FramingError(format!("expected SOH, found 0x{:02x}", header[0])));
        }
        let length = header[5] as usize;
        let rest = self.transport.read_exact(length + 3).await?;

        let mut raw = Vec::with_capacity(6 + length + 3);
        raw.extend_from_slice(&header);
        raw.extend_from_slice(&rest);
        self.tracer.on_rx(&raw);
        debug!("rx frame len={}", raw.len());

        crate::frame::parse_frame(&raw)
    }

    /// Lazily fetch and derive the session key if it has not been obtained
    /// yet.
    async fn ensure_keyed(&mut self, destination: u8) -> Result<(), MnetError> {
        if self.key.is_some() {
            return Ok(());
        }
        let response = self.send_packet(destination, REQ_SERIAL_NUMBER, &[]).await?;
        if response.payload.len() != 4 {
            return Err(MnetError::ProtocolError(format!(
                "expected a 4-byte serial number, got {} bytes",
                response.payload.len()
            )));
        }
        let serial = [response.payload[0], response.payload[1], response.payload[2], response.payload[3]];
        self.serial = Some(serial);
        self.key = Some(derive_key(serial));
        self.state = State::Keyed;
        Ok(())
    }

    fn key_or_err(&self) -> Result<&[u8; 5], MnetError> {
        self.key.as_ref().ok_or(MnetError::NotAuthenticated)
    }

    /// Build the 32-byte login descriptor: vendor tag, padding, login
    /// packet id, and trailer.
    fn build_login_descriptor() -> Vec<u8> {
        let mut data = Vec::with_capacity(32);
        data.extend_from_slice(&LOGIN_131_GAIA_WIND);
        data.extend_from_slice(&[0xFF, 0xFF]);
        data.extend_from_slice(&LOGIN_PACKET_ID.to_be_bytes());
        data.push(0x05);
        data.extend_from_slice(&[0x00; 6]);
        data
    }

    /// Perform the login handshake, fetching the serial number first if
    /// this is a fresh session.
    pub async fn login(&mut self, destination: u8) -> Result<(), MnetError> {
        self.ensure_keyed(destination).await?;
        let key = *self.key_or_err()?;
        let descriptor = Self::build_login_descriptor();
        let encrypted = obf_encode(&descriptor, &key);
        self.send_packet(destination, REQ_LOGIN, &encrypted).await?;
        self.state = State::LoggedIn;
        Ok(())
    }

    /// Read one dictionary entry.
    pub async fn request_data(&mut self, destination: u8, main_id: u16, sub_id: u16) -> Result<Value, MnetError> {
        self.ensure_keyed(destination).await?;
        let mut body = Vec::with_capacity(4);
        body.extend_from_slice(&main_id.to_be_bytes());
        body.extend_from_slice(&sub_id.to_be_bytes());
        let response = self.send_packet(destination, REQ_DATA, &body).await?;
        let key = *self.key_or_err()?;
        let decrypted = obf_decode(&response.payload, &key);
        let (value, _) = decode_typed_value(&decrypted, main_id)?;
        self.tracer.on_decoded_element(main_id, sub_id, &value);
        Ok(value)
    }

    /// Read several dictionary entries in one round trip.
    pub async fn request_multiple(
        &mut self,
        destination: u8,
        ids: &[(u16, u16)],
    ) -> Result<Vec<Element>, MnetError> {
        self.ensure_keyed(destination).await?;
        let mut body = Vec::with_capacity(1 + ids.len() * 4);
        body.push(ids.len() as u8);
        for (main_id, sub_id) in ids {
            body.extend_from_slice(&main_id.to_be_bytes());
            body.extend_from_slice(&sub_id.to_be_bytes());
        }
        let response = self.send_packet(destination, REQ_MULTIPLE_DATA, &body).await?;
        let key = *self.key_or_err()?;
        let decrypted = obf_decode(&response.payload, &key);
        let elements = decode_multi(&decrypted)?;
        for e in &elements {
            self.tracer.on_decoded_element(e.main_id, e.sub_id, &e.value);
        }
        Ok(elements)
    }

    /// Write a dictionary entry.
    pub async fn write_data(&mut self, destination: u8, main_id: u16, sub_id: u16, raw: &[u8]) -> Result<(), MnetError> {
        self.ensure_keyed(destination).await?;
        let mut body = Vec::with_capacity(4 + raw.len());
        body.extend_from_slice(&main_id.to_be_bytes());
        body.extend_from_slice(&sub_id.to_be_bytes());
        body.extend_from_slice(raw);
        self.send_packet(destination, REQ_WRITE_DATA, &body).await?;
        Ok(())
    }

    /// Issue a command (start/stop/reset/manual start).
    pub async fn send_command(&mut self, destination: u8, command: u16) -> Result<(), MnetError> {
        self.ensure_keyed(destination).await?;
        self.send_packet(destination, REQ_COMMAND, &command.to_be_bytes()).await?;
        Ok(())
    }

    /// Read the controller's clock. `0xC353` sub 0 always comes back as a
    /// 12-character `YYMMDDHHMMSS` ASCII string (data-type 0x09), never a
    /// typed-value timestamp, so this delegates to
    /// [`Session::get_controller_time_ascii`].
    pub async fn get_controller_time(&mut self, destination: u8) -> Result<DateTime<Utc>, MnetError> {
        self.get_controller_time_ascii(destination).await
    }

    /// Read the controller's clock as its literal 12-character
    /// `YYMMDDHHMMSS` ASCII string and parse it into a UTC instant.
    pub async fn get_controller_time_ascii(&mut self, destination: u8) -> Result<DateTime<Utc>, MnetError> {
        let text = match self.request_data(destination, MAIN_ID_CONTROLLER_TIME, 0).await? {
            Value::Text(s) => s,
            other => Err(MnetError::ProtocolError(format!("expected an ASCII clock string, got {other:?}")))?,
        };
        if text.len() != 12 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MnetError::DecodeError(format!("malformed clock string: {text:?}")));
        }
        let full = format!("20{text}");
        chrono::NaiveDateTime::parse_from_str(&full, "%Y%m%d%H%M%S")
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
            .map_err(|e| MnetError::DecodeError(format!("malformed clock string {text:?}: {e}")))
    }

    /// Set the controller's clock. `when` defaults to the current time.
    pub async fn set_controller_time(&mut self, destination: u8, when: Option<DateTime<Utc>>) -> Result<(), MnetError> {
        let when = when.unwrap_or_else(Utc::now);
        let seconds = (when - epoch()).num_seconds();
        if seconds < 0 {
            return Err(MnetError::ProtocolError("controller time must be at or after the epoch".into()));
        }
        let payload = (seconds as u32).to_be_bytes();
        self.write_data(destination, MAIN_ID_CONTROLLER_TIME, 1, &payload).await
    }

    /// Drain any partial frame left on the wire after a timeout or framing
    /// error, by discarding bytes up to (and including) the next SOH.
    pub async fn resync(&mut self) -> Result<(), MnetError> {
        loop {
            let byte = self.transport.read_exact(1).await?;
            if byte[0] == SOH {
                warn!("resynchronized to next SOH");
                return Ok(());
            }
        }
    }

    /// Close the transport and move the session to `Closed`.
    pub async fn close(&mut self) {
        self.transport.close().await;
        self.state = State::Closed;
    }
}

/// Open a session over an already-connected transport.
pub fn open<T: MnetTransport>(transport: T) -> Session<T> {
    Session::new(transport)
}
