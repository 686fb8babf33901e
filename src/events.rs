//! Event-stack accessor: the 100-slot ring of the controller's most recent
//! events, read in batches of up to 33 slots per round trip.

use crate::constants::{
    EVENT_FIELD_CODE, EVENT_FIELD_TEXT, EVENT_FIELD_TIMESTAMP, EVENT_STACK_SLOTS, MAIN_ID_EVENT_STACK,
};
use crate::error::MnetError;
use crate::session::Session;
use crate::transport::MnetTransport;
use crate::typed_value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the event stack. `index` 0 is the most recent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub index: u16,
    pub code: i64,
    pub timestamp: Option<DateTime<Utc>>,
    pub text: String,
}

/// A single `request_multiple` round trip can hold up to 33 events' worth
/// of fields (33 * 3 = 99 elements).
const EVENTS_PER_BATCH: u16 = 33;

/// Read up to `limit` events (most recent first), stopping early if an
/// absent slot is encountered.
pub async fn read_events<T: MnetTransport>(
    session: &mut Session<T>,
    destination: u8,
    limit: u16,
) -> Result<Vec<Event>, MnetError> {
    let limit = limit.min(EVENT_STACK_SLOTS);
    let mut events = Vec::with_capacity(limit as usize);

    let mut index = 0u16;
    while index < limit {
        let batch_end = (index + EVENTS_PER_BATCH).min(limit);
        let mut ids = Vec::with_capacity(((batch_end - index) * 3) as usize);
        for i in index..batch_end {
            let base = i * 100;
            ids.push((MAIN_ID_EVENT_STACK, base + EVENT_FIELD_CODE));
            ids.push((MAIN_ID_EVENT_STACK, base + EVENT_FIELD_TIMESTAMP));
            ids.push((MAIN_ID_EVENT_STACK, base + EVENT_FIELD_TEXT));
        }

        let elements = session.request_multiple(destination, &ids).await?;
        let mut stopped = false;
        for i in index..batch_end {
            let base = i * 100;
            let code_value = elements.iter().find(|e| e.sub_id == base + EVENT_FIELD_CODE).map(|e| &e.value);
            let code = match code_value {
                Some(Value::Integer(c)) => *c,
                Some(Value::Absent) | None => {
                    stopped = true;
                    break;
                }
                Some(other) => {
                    return Err(MnetError::DecodeError(format!(
                        "event code at index {i} was not numeric: {other:?}"
                    )))
                }
            };
            let timestamp = elements
                .iter()
                .find(|e| e.sub_id == base + EVENT_FIELD_TIMESTAMP)
                .and_then(|e| match &e.value {
                    Value::Instant(t) => Some(*t),
                    _ => None,
                });
            let text = elements
                .iter()
                .find(|e| e.sub_id == base + EVENT_FIELD_TEXT)
                .map(|e| match &e.value {
                    Value::Text(s) => s.clone(),
                    _ => String::new(),
                })
                .unwrap_or_default();

            events.push(Event { index: i, code, timestamp, text });
        }
        if stopped {
            break;
        }
        index = batch_end;
    }

    Ok(events)
}
