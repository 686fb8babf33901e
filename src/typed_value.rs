//! Typed-value codec: the 5-byte (data-type, conversion-type,
//! conversion-value, length) header plus raw body that prefixes every
//! scalar response payload, and the multi-element aggregation framing that
//! wraps several of these for `request_multiple`.

use crate::constants::TIMESTAMP_DENY_LIST;
use crate::error::MnetError;
use chrono::{DateTime, Utc};
use nom::number::complete::{be_i16, be_i32, be_u16, be_u32};
use serde::{Deserialize, Serialize};

/// A decoded Mnet value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Instant(DateTime<Utc>),
    Absent,
}

const DATA_TYPE_ABSENT: u8 = 0x00;
const DATA_TYPE_SIGNED_8_A: u8 = 0x01;
const DATA_TYPE_SIGNED_8_B: u8 = 0x02;
const DATA_TYPE_SIGNED_16: u8 = 0x03;
const DATA_TYPE_UNSIGNED_16: u8 = 0x04;
const DATA_TYPE_SIGNED_32: u8 = 0x05;
const DATA_TYPE_TIMESTAMP: u8 = 0x06;
const DATA_TYPE_UNSIGNED_32: u8 = 0x07;
const DATA_TYPE_STRING: u8 = 0x09;
const DATA_TYPE_SIGNED_8_C: u8 = 0x0A;

const CONV_PASSTHROUGH: u16 = 0x00;
const CONV_DIVIDE_POW10: u16 = 0x01;
const CONV_DIVIDE: u16 = 0x02;
const CONV_MULTIPLY: u16 = 0x03;
const CONV_MULTIPLY_POW10: u16 = 0x04;
const CONV_DIVIDE_POW10_ALIAS: u16 = 0x05;

/// Raw numeric or textual body, before conversion scaling is applied.
enum RawBody {
    Absent,
    Integer(i64),
    Text(String),
}

fn decode_raw_body(data_type: u8, body: &[u8]) -> Result<RawBody, MnetError> {
    match data_type {
        DATA_TYPE_ABSENT => Ok(RawBody::Absent),
        DATA_TYPE_SIGNED_8_A | DATA_TYPE_SIGNED_8_B | DATA_TYPE_SIGNED_8_C => {
            let b = *body
                .first()
                .ok_or_else(|| MnetError::DecodeError("truncated signed-8 body".into()))?;
            Ok(RawBody::Integer(b as i8 as i64))
        }
        DATA_TYPE_SIGNED_16 => {
            let (_, v) = be_i16::<_, nom::error::Error<&[u8]>>(body)
                .map_err(|e| MnetError::DecodeError(format!("truncated signed-16 body: {e}")))?;
            Ok(RawBody::Integer(v as i64))
        }
        DATA_TYPE_UNSIGNED_16 => {
            let (_, v) = be_u16::<_, nom::error::Error<&[u8]>>(body)
                .map_err(|e| MnetError::DecodeError(format!("truncated unsigned-16 body: {e}")))?;
            Ok(RawBody::Integer(v as i64))
        }
        DATA_TYPE_SIGNED_32 => {
            let (_, v) = be_i32::<_, nom::error::Error<&[u8]>>(body)
                .map_err(|e| MnetError::DecodeError(format!("truncated signed-32 body: {e}")))?;
            Ok(RawBody::Integer(v as i64))
        }
        DATA_TYPE_UNSIGNED_32 | DATA_TYPE_TIMESTAMP => {
            let (_, v) = be_u32::<_, nom::error::Error<&[u8]>>(body)
                .map_err(|e| MnetError::DecodeError(format!("truncated unsigned-32 body: {e}")))?;
            Ok(RawBody::Integer(v as i64))
        }
        DATA_TYPE_STRING => {
            let trimmed = body
                .iter()
                .position(|&b| b == 0)
                .map(|i| &body[..i])
                .unwrap_or(body);
            let text = String::from_utf8_lossy(trimmed).into_owned();
            Ok(RawBody::Text(text))
        }
        other => Err(MnetError::DecodeError(format!("unknown data-type 0x{other:02x}"))),
    }
}

fn apply_conversion(raw: RawBody, conversion_type: u16, conversion_value: u16) -> Result<Value, MnetError> {
    match raw {
        RawBody::Absent => Ok(Value::Absent),
        RawBody::Text(s) => Ok(Value::Text(s)),
        RawBody::Integer(r) => {
            let v = conversion_value as i64;
            match conversion_type {
                CONV_PASSTHROUGH => Ok(Value::Integer(r)),
                CONV_DIVIDE_POW10 | CONV_DIVIDE_POW10_ALIAS => {
                    Ok(Value::Float(r as f64 / 10f64.powi(v as i32)))
                }
                CONV_DIVIDE => {
                    if v == 0 {
                        Ok(Value::Integer(r))
                    } else {
                        Ok(Value::Float(r as f64 / v as f64))
                    }
                }
                CONV_MULTIPLY => {
                    if v == 0 {
                        Ok(Value::Integer(r))
                    } else {
                        Ok(Value::Integer(r * v))
                    }
                }
                CONV_MULTIPLY_POW10 => Ok(Value::Integer(r * 10i64.pow(v as u32))),
                other => Err(MnetError::DecodeError(format!("unknown conversion-type 0x{other:02x}"))),
            }
        }
    }
}

/// Normalize a timestamp-data-type numeric into an absolute UTC instant,
/// unless `main_id` is on the deny-list of ids whose value is really a
/// magnitude despite the timestamp tag.
fn apply_timestamp_override(value: Value, data_type: u8, main_id: u16) -> Value {
    if data_type != DATA_TYPE_TIMESTAMP || TIMESTAMP_DENY_LIST.contains(&main_id) {
        return value;
    }
    match value {
        Value::Integer(seconds) if seconds >= 0 => {
            Value::Instant(crate::constants::epoch() + chrono::Duration::seconds(seconds))
        }
        other => other,
    }
}

/// Decode a single typed-value block (5-byte header + raw body) addressed
/// to `main_id`, returning the value and the number of bytes consumed.
pub fn decode_typed_value(bytes: &[u8], main_id: u16) -> Result<(Value, usize), MnetError> {
    if bytes.len() < 5 {
        return Err(MnetError::DecodeError("truncated typed-value header".into()));
    }
    let data_type = bytes[0];
    let conversion_type = bytes[1] as u16;
    let conversion_value = u16::from_be_bytes([bytes[2], bytes[3]]);
    let length = bytes[4] as usize;

    if bytes.len() < 5 + length {
        return Err(MnetError::FramingError("typed-value body overruns the available bytes".into()));
    }
    let body = &bytes[5..5 + length];

    let raw = decode_raw_body(data_type, body)?;
    let value = apply_conversion(raw, conversion_type, conversion_value)?;
    let value = apply_timestamp_override(value, data_type, main_id);
    Ok((value, 5 + length))
}

/// One element of a `request_multiple` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub main_id: u16,
    pub sub_id: u16,
    pub value: Value,
}

/// Decode a multi-element aggregation body: `count ‖ (main_id sub_id
/// typed-value)*`. Stops cleanly (without error) if a trailing element is
/// too short to hold a header, matching the controller's habit of padding
/// short replies rather than always sending a full count.
pub fn decode_multi(bytes: &[u8]) -> Result<Vec<Element>, MnetError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let count = bytes[0] as usize;
    let mut out = Vec::with_capacity(count);
    let mut offset = 1;
    for _ in 0..count {
        if bytes.len() - offset < 9 {
            break;
        }
        let main_id = u16::from_be_bytes([bytes[offset], bytes[offset + 1]]);
        let sub_id = u16::from_be_bytes([bytes[offset + 2], bytes[offset + 3]]);
        let (value, consumed) = decode_typed_value(&bytes[offset + 4..], main_id)?;
        out.push(Element { main_id, sub_id, value });
        offset += 4 + consumed;
    }
    Ok(out)
}
