//! Mnet frame codec: SOH | dst | src | type(2) | length | stuffed-payload |
//! CRC(2) | EOT.
//!
//! Byte stuffing doubles every `0xFF` in the logical payload before it is
//! transmitted; the `length` byte counts the *stuffed* bytes. This module
//! unstuffs eagerly, so every layer above works with logical payload bytes.

use crate::constants::{EOT, SOH};
use crate::crc::crc16_xmodem;
use crate::error::MnetError;

/// A decoded Mnet frame: addressing plus the logical (unstuffed) payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub destination: u8,
    pub source: u8,
    pub packet_type: u16,
    pub payload: Vec<u8>,
}

/// Double every `0xFF` byte in `payload`.
fn stuff(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len());
    for &b in payload {
        out.push(b);
        if b == 0xFF {
            out.push(0xFF);
        }
    }
    out
}

/// Collapse doubled `0xFF` bytes back into single bytes. An odd run of
/// `0xFF` at the end of the slice is malformed framing.
fn unstuff(stuffed: &[u8]) -> Result<Vec<u8>, MnetError> {
    let mut out = Vec::with_capacity(stuffed.len());
    let mut i = 0;
    while i < stuffed.len() {
        if stuffed[i] == 0xFF {
            if i + 1 >= stuffed.len() || stuffed[i + 1] != 0xFF {
                return Err(MnetError::FramingError(
                    "odd run of 0xFF in stuffed payload".into(),
                ));
            }
            out.push(0xFF);
            i += 2;
        } else {
            out.push(stuffed[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Serialize `frame` to its wire representation.
pub fn build_frame(frame: &Frame) -> Result<Vec<u8>, MnetError> {
    let stuffed = stuff(&frame.payload);
    if stuffed.len() > crate::constants::MAX_FRAME_PAYLOAD {
        return Err(MnetError::FramingError(format!(
            "stuffed payload of {} bytes exceeds the {}-byte frame limit",
            stuffed.len(),
            crate::constants::MAX_FRAME_PAYLOAD
        )));
    }

    let mut logical = Vec::with_capacity(5 + stuffed.len());
    logical.push(frame.destination);
    logical.push(frame.source);
    logical.extend_from_slice(&frame.packet_type.to_be_bytes());
    logical.push(stuffed.len() as u8);
    logical.extend_from_slice(&stuffed);

    let crc = crc16_xmodem(&logical);

    let mut out = Vec::with_capacity(2 + logical.len() + 2);
    out.push(SOH);
    out.extend_from_slice(&logical);
    out.extend_from_slice(&crc.to_be_bytes());
    out.push(EOT);
    Ok(out)
}

/// Parse a complete frame (SOH through EOT inclusive) out of `bytes`.
pub fn parse_frame(bytes: &[u8]) -> Result<Frame, MnetError> {
    if bytes.len() < 9 {
        return Err(MnetError::FramingError("frame shorter than the minimum header".into()));
    }
    if bytes[0] != SOH {
        return Err(MnetError::FramingError(format!("expected SOH, found 0x{:02x}", bytes[0])));
    }
    let destination = bytes[1];
    let source = bytes[2];
    let packet_type = u16::from_be_bytes([bytes[3], bytes[4]]);
    let length = bytes[5] as usize;

    let payload_start = 6;
    let payload_end = payload_start + length;
    let crc_end = payload_end + 2;
    if bytes.len() < crc_end + 1 {
        return Err(MnetError::FramingError("frame shorter than declared length".into()));
    }
    if bytes[crc_end] != EOT {
        return Err(MnetError::FramingError(format!(
            "expected EOT, found 0x{:02x}",
            bytes[crc_end]
        )));
    }

    let stuffed_payload = &bytes[payload_start..payload_end];
    let logical = &bytes[1..payload_end];
    let expected_crc = crc16_xmodem(logical);
    let received_crc = u16::from_be_bytes([bytes[payload_end], bytes[payload_end + 1]]);
    if expected_crc != received_crc {
        return Err(MnetError::FramingError(format!(
            "CRC mismatch: expected 0x{expected_crc:04x}, received 0x{received_crc:04x}"
        )));
    }

    let payload = unstuff(stuffed_payload)?;
    Ok(Frame { destination, source, packet_type, payload })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_plain_payload() {
        let frame = Frame {
            destination: 0x02,
            source: 0x01,
            packet_type: 0x0C28,
            payload: vec![0x9C, 0x43, 0x00, 0x00],
        };
        let bytes = build_frame(&frame).unwrap();
        let parsed = parse_frame(&bytes).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn wind_speed_request_matches_known_bytes() {
        let frame = Frame {
            destination: 0x02,
            source: 0x01,
            packet_type: 0x0C28,
            payload: vec![0x9C, 0x43, 0x00, 0x00],
        };
        let bytes = build_frame(&frame).unwrap();
        assert_eq!(&bytes[..10], &[0x01, 0x02, 0x01, 0x0C, 0x28, 0x04, 0x9C, 0x43, 0x00, 0x00]);
        assert_eq!(bytes.last(), Some(&0x04));
    }

    #[test]
    fn stuffs_and_unstuffs_0xff() {
        let frame = Frame {
            destination: 0x02,
            source: 0x01,
            packet_type: 0x0C28,
            payload: vec![0x9C, 0xFF, 0x43],
        };
        let bytes = build_frame(&frame).unwrap();
        // length byte counts the stuffed bytes: 9c ff ff 43 = 4
        assert_eq!(bytes[5], 4);
        let parsed = parse_frame(&bytes).unwrap();
        assert_eq!(parsed.payload, frame.payload);
    }

    #[test]
    fn empty_payload_crc_is_over_header_only() {
        let frame = Frame { destination: 0x02, source: 0x01, packet_type: 0x0C2E, payload: vec![] };
        let bytes = build_frame(&frame).unwrap();
        assert_eq!(bytes[5], 0);
        let crc = u16::from_be_bytes([bytes[6], bytes[7]]);
        assert_eq!(crc, 0x62BF);
    }

    #[test]
    fn rejects_bad_crc() {
        let frame = Frame { destination: 0x02, source: 0x01, packet_type: 0x0C28, payload: vec![1, 2] };
        let mut bytes = build_frame(&frame).unwrap();
        let last = bytes.len() - 2;
        bytes[last] ^= 0xFF;
        assert!(matches!(parse_frame(&bytes), Err(MnetError::FramingError(_))));
    }

    #[test]
    fn rejects_odd_ff_run() {
        // dst src type len=1 payload=[0xff] crc eot, with no doubling.
        let malformed = [SOH, 0x02, 0x01, 0x0C, 0x28, 0x01, 0xFF, 0x00, 0x00, EOT];
        assert!(matches!(parse_frame(&malformed), Err(MnetError::FramingError(_))));
    }
}
