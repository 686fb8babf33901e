//! Observation hooks a caller can inject into a [`Session`](crate::session::Session)
//! to watch raw traffic and decoded elements without changing control flow.

use crate::typed_value::Value;

/// Injected observer for session traffic. All methods default to no-ops so
/// implementers only need to override what they care about.
pub trait Tracer: Send {
    fn on_tx(&mut self, _bytes: &[u8]) {}
    fn on_rx(&mut self, _bytes: &[u8]) {}
    fn on_decoded_element(&mut self, _main_id: u16, _sub_id: u16, _value: &Value) {}
}

/// The default tracer: observes nothing.
#[derive(Debug, Default)]
pub struct NullTracer;

impl Tracer for NullTracer {}
