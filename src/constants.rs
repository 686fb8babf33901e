//! Wire-level constants for the Mnet protocol: framing bytes, packet types,
//! the login descriptor, and epoch/sentinel timestamps.

/// Frame start marker.
pub const SOH: u8 = 0x01;
/// Frame end marker.
pub const EOT: u8 = 0x04;

/// Request the controller's 4-byte serial number. Response payload is the
/// raw serial, never obfuscated.
pub const REQ_SERIAL_NUMBER: u16 = 0x0C2E;
/// Login handshake. Payload is the encrypted login descriptor.
pub const REQ_LOGIN: u16 = 0x13A1;
/// Read a single dictionary entry.
pub const REQ_DATA: u16 = 0x0C28;
/// Read several dictionary entries in one round trip.
pub const REQ_MULTIPLE_DATA: u16 = 0x0C2A;
/// Write a dictionary entry.
pub const REQ_WRITE_DATA: u16 = 0x0C2C;
/// Issue a command (start/stop/reset/manual start).
pub const REQ_COMMAND: u16 = 0x0C32;

/// Additive constant mixed into every obfuscated byte.
pub const OBFUSCATION_CONSTANT: u8 = 0x34;

/// 20-byte vendor/product tag at the head of the login descriptor.
pub const LOGIN_131_GAIA_WIND: [u8; 20] = [
    0x31, 0x33, 0x31, 0x20, 0x66, 0x6B, 0x59, 0x75, 0x29, 0x29, 0x31, 0x32, 0x32, 0x32, 0x31,
    0x51, 0x51, 0x61, 0x61, 0x00,
];
/// Login packet identifier embedded (big-endian) in the login descriptor.
pub const LOGIN_PACKET_ID: u32 = 0x0000_007B;

/// Command identifiers accepted by [`REQ_COMMAND`].
pub const CMD_START: u16 = 0x0001;
pub const CMD_STOP: u16 = 0x0002;
pub const CMD_RESET: u16 = 0x0003;
pub const CMD_MANUAL_START: u16 = 0x0004;

/// Main-id of the 100-slot event stack.
pub const MAIN_ID_EVENT_STACK: u16 = 0x000B;
/// Main-id of the current (non-historical) status code.
pub const MAIN_ID_CURRENT_STATUS: u16 = 0x000C;
/// Main-id of the alarm-history occurrence timestamp table.
pub const MAIN_ID_ALARM_TIMESTAMP: u16 = 0xC73B;
/// Main-id of the alarm-history description table.
pub const MAIN_ID_ALARM_TEXT: u16 = 0xC73C;
/// Main-id of the controller's clock, read as a raw 12-character ASCII string.
pub const MAIN_ID_CONTROLLER_TIME: u16 = 0xC353;

/// Main-ids whose data-type tag claims "timestamp" but whose value is really
/// a plain magnitude (grid frequency, error counters, error-stop durations).
/// Values read from these ids are never normalized into an `Instant`.
pub const TIMESTAMP_DENY_LIST: [u16; 6] = [0x9CAE, 0xC739, 0xC79D, 0xC73A, 0xC79E, 0xC79C];

/// Sub-id offsets within one event-stack slot.
pub const EVENT_FIELD_CODE: u16 = 0;
pub const EVENT_FIELD_TIMESTAMP: u16 = 1;
pub const EVENT_FIELD_TEXT: u16 = 2;
/// Number of slots in the event stack.
pub const EVENT_STACK_SLOTS: u16 = 100;

/// Mnet timestamps are seconds since this epoch.
pub fn epoch() -> chrono::DateTime<chrono::Utc> {
    use chrono::TimeZone;
    chrono::Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap()
}

/// Sentinel value meaning "this alarm has never occurred".
pub fn never_occurred_sentinel() -> chrono::DateTime<chrono::Utc> {
    use chrono::TimeZone;
    chrono::Utc.with_ymd_and_hms(2032, 5, 9, 6, 24, 0).unwrap()
}

/// Maximum stuffed payload length a single frame can carry.
pub const MAX_FRAME_PAYLOAD: usize = 255;
