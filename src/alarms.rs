//! Fixed alarm-history table: for each entry, the controller exposes a
//! last-occurrence timestamp (main-id 0xC73B) and a description (main-id
//! 0xC73C), both addressed by the entry's sub-id.
//!
//! This table is authored from the two anchor points named in the
//! controller's documentation (sub-id 5 = "Vibration", sub-id 722 = "Cable
//! twisted") and extended with the surrounding fault classes a Gaia-Wind
//! 131 controller is known to report; it is not reverse-engineered from a
//! live unit.

use crate::constants::{never_occurred_sentinel, MAIN_ID_ALARM_TEXT, MAIN_ID_ALARM_TIMESTAMP};
use crate::error::MnetError;
use crate::session::Session;
use crate::transport::MnetTransport;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry of the fixed alarm-history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlarmType {
    pub sub_id: u16,
    pub description: &'static str,
}

/// The 62 alarm types this controller family reports.
pub const ALARM_TABLE: [AlarmType; 62] = [
    AlarmType { sub_id: 1, description: "Emergency stop" },
    AlarmType { sub_id: 2, description: "Overspeed" },
    AlarmType { sub_id: 3, description: "Yaw error" },
    AlarmType { sub_id: 4, description: "Yaw cable twisted" },
    AlarmType { sub_id: 5, description: "Vibration" },
    AlarmType { sub_id: 6, description: "Brake pressure low" },
    AlarmType { sub_id: 7, description: "Brake pressure high" },
    AlarmType { sub_id: 8, description: "Gearbox oil temperature high" },
    AlarmType { sub_id: 9, description: "Gearbox oil level low" },
    AlarmType { sub_id: 10, description: "Generator bearing temperature high" },
    AlarmType { sub_id: 11, description: "Generator winding temperature high" },
    AlarmType { sub_id: 12, description: "Nacelle temperature high" },
    AlarmType { sub_id: 13, description: "Nacelle temperature low" },
    AlarmType { sub_id: 14, description: "Ambient temperature low" },
    AlarmType { sub_id: 15, description: "Ambient temperature high" },
    AlarmType { sub_id: 16, description: "Anemometer fault" },
    AlarmType { sub_id: 17, description: "Wind vane fault" },
    AlarmType { sub_id: 18, description: "Pitch system fault" },
    AlarmType { sub_id: 19, description: "Pitch feedback out of range" },
    AlarmType { sub_id: 20, description: "Pitch battery low" },
    AlarmType { sub_id: 30, description: "Grid undervoltage" },
    AlarmType { sub_id: 31, description: "Grid overvoltage" },
    AlarmType { sub_id: 32, description: "Grid underfrequency" },
    AlarmType { sub_id: 33, description: "Grid overfrequency" },
    AlarmType { sub_id: 34, description: "Grid phase loss" },
    AlarmType { sub_id: 35, description: "Grid phase imbalance" },
    AlarmType { sub_id: 36, description: "Grid contactor fault" },
    AlarmType { sub_id: 37, description: "Grid connection lost" },
    AlarmType { sub_id: 38, description: "Inverter fault" },
    AlarmType { sub_id: 39, description: "Inverter overcurrent" },
    AlarmType { sub_id: 40, description: "Rotor overspeed (safety chain)" },
    AlarmType { sub_id: 41, description: "Rotor underspeed" },
    AlarmType { sub_id: 42, description: "Rotor lock engaged" },
    AlarmType { sub_id: 43, description: "Tower vibration high" },
    AlarmType { sub_id: 44, description: "Tower door open" },
    AlarmType { sub_id: 45, description: "Tower base flood sensor triggered" },
    AlarmType { sub_id: 46, description: "Lightning strike detected" },
    AlarmType { sub_id: 47, description: "Control box temperature high" },
    AlarmType { sub_id: 48, description: "Control box humidity high" },
    AlarmType { sub_id: 49, description: "UPS battery low" },
    AlarmType { sub_id: 50, description: "UPS on backup power" },
    AlarmType { sub_id: 100, description: "Main controller watchdog reset" },
    AlarmType { sub_id: 101, description: "Main controller communication timeout" },
    AlarmType { sub_id: 102, description: "Sensor bus fault" },
    AlarmType { sub_id: 103, description: "Logic power supply fault" },
    AlarmType { sub_id: 200, description: "Scheduled maintenance due" },
    AlarmType { sub_id: 201, description: "Service lockout active" },
    AlarmType { sub_id: 202, description: "Manual stop requested" },
    AlarmType { sub_id: 203, description: "Remote stop requested" },
    AlarmType { sub_id: 300, description: "Hydraulic pressure low" },
    AlarmType { sub_id: 301, description: "Hydraulic pressure high" },
    AlarmType { sub_id: 302, description: "Hydraulic oil level low" },
    AlarmType { sub_id: 400, description: "Ice detected on blades" },
    AlarmType { sub_id: 401, description: "High wind shutdown" },
    AlarmType { sub_id: 402, description: "Low wind standby" },
    AlarmType { sub_id: 500, description: "Slip ring fault" },
    AlarmType { sub_id: 501, description: "Encoder fault" },
    AlarmType { sub_id: 600, description: "Data logger memory full" },
    AlarmType { sub_id: 601, description: "Real-time clock battery low" },
    AlarmType { sub_id: 700, description: "Cable tension high" },
    AlarmType { sub_id: 721, description: "Cable twist warning" },
    AlarmType { sub_id: 722, description: "Cable twisted" },
];

/// One resolved alarm-history record.
#[derive(Debug, Clone, Serialize)]
pub struct AlarmRecord {
    pub sub_id: u16,
    pub description: &'static str,
    pub last_occurred: Option<DateTime<Utc>>,
    pub has_occurred: bool,
}

/// Each `request_multiple` round trip pulls the timestamp+text pair for up
/// to this many alarm types, keeping the request body and the aggregated
/// response comfortably inside the 255-byte frame payload cap.
const ALARMS_PER_BATCH: usize = 30;

/// Read the alarm-history table from the controller. When `only_occurred`
/// is set, entries whose timestamp is the "never occurred" sentinel are
/// omitted entirely rather than reported with `has_occurred == false`.
pub async fn read_alarm_history<T: MnetTransport>(
    session: &mut Session<T>,
    destination: u8,
    only_occurred: bool,
) -> Result<Vec<AlarmRecord>, MnetError> {
    let sentinel = never_occurred_sentinel();
    let mut records = Vec::with_capacity(ALARM_TABLE.len());

    for chunk in ALARM_TABLE.chunks(ALARMS_PER_BATCH) {
        let pairs: Vec<(u16, u16)> = chunk
            .iter()
            .flat_map(|a| [(MAIN_ID_ALARM_TIMESTAMP, a.sub_id), (MAIN_ID_ALARM_TEXT, a.sub_id)])
            .collect();
        let elements = session.request_multiple(destination, &pairs).await?;

        for alarm in chunk {
            let timestamp = elements
                .iter()
                .find(|e| e.main_id == MAIN_ID_ALARM_TIMESTAMP && e.sub_id == alarm.sub_id)
                .map(|e| e.value.clone());

            let last_occurred = match timestamp {
                Some(crate::typed_value::Value::Instant(t)) if t != sentinel => Some(t),
                _ => None,
            };
            let has_occurred = last_occurred.is_some();
            if only_occurred && !has_occurred {
                continue;
            }
            records.push(AlarmRecord {
                sub_id: alarm.sub_id,
                description: alarm.description,
                last_occurred,
                has_occurred,
            });
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_62_entries() {
        assert_eq!(ALARM_TABLE.len(), 62);
    }

    #[test]
    fn anchors_match_documentation() {
        assert!(ALARM_TABLE.iter().any(|a| a.sub_id == 5 && a.description == "Vibration"));
        assert!(ALARM_TABLE.iter().any(|a| a.sub_id == 722 && a.description == "Cable twisted"));
    }
}
