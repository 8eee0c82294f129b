//! Diagnostics exporter: flat key/value view of the latest records.
//!
//! Keys are the record field names.  For the race-control family the
//! `vehicle_number` and `sequence_number` shown are the status record's.

use std::collections::BTreeMap;

use raptor_types::{CommandRecord, MockupCommandRecord, StatusRecord};
use serde::Serialize;

/// One displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DiagnosticValue {
    U8(u8),
    U16(u16),
    Bool(bool),
}

impl From<u8> for DiagnosticValue {
    fn from(v: u8) -> Self {
        DiagnosticValue::U8(v)
    }
}

impl From<u16> for DiagnosticValue {
    fn from(v: u16) -> Self {
        DiagnosticValue::U16(v)
    }
}

impl From<bool> for DiagnosticValue {
    fn from(v: bool) -> Self {
        DiagnosticValue::Bool(v)
    }
}

impl std::fmt::Display for DiagnosticValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticValue::U8(v) => write!(f, "{v}"),
            DiagnosticValue::U16(v) => write!(f, "{v}"),
            DiagnosticValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Ordered string-keyed map handed to a visualizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiagnosticSnapshot(BTreeMap<&'static str, DiagnosticValue>);

impl DiagnosticSnapshot {
    pub fn insert(&mut self, key: &'static str, value: impl Into<DiagnosticValue>) {
        self.0.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<DiagnosticValue> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, DiagnosticValue)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

/// Race-control family: command fields plus status fields.
pub fn race_control_snapshot(command: &CommandRecord, status: &StatusRecord) -> DiagnosticSnapshot {
    let mut snap = DiagnosticSnapshot::default();

    snap.insert("flags", command.flags);
    snap.insert("position_command", command.position_command);
    snap.insert("track_position", command.track_position);
    snap.insert("laps", command.laps);
    snap.insert("laps_fraction", command.laps_fraction);

    snap.insert("vehicle_number", status.vehicle_number);
    snap.insert("sequence_number", status.sequence_number);
    snap.insert("flags_received", status.flags_received);
    snap.insert("flags_met", status.flags_met);
    snap.insert("position_command_progress", status.position_command_progress);
    snap.insert("location", status.location);
    snap.insert("ct_state", status.ct_state);
    snap.insert("sys_state", status.sys_state);

    snap
}

pub fn mockup_snapshot(command: &MockupCommandRecord) -> DiagnosticSnapshot {
    let mut snap = DiagnosticSnapshot::default();
    snap.insert("vehicle_number", command.vehicle_number);
    snap.insert("engine_ignition_command", command.engine_ignition_command);
    snap.insert("emergency_stop_command", command.emergency_stop_command);
    snap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn race_control_keys_and_defaults() {
        let snap = race_control_snapshot(&CommandRecord::default(), &StatusRecord::default());
        let keys: Vec<&str> = snap.iter().map(|(k, _)| k).collect();
        let mut expected = vec![
            "flags",
            "position_command",
            "track_position",
            "laps",
            "laps_fraction",
            "vehicle_number",
            "sequence_number",
            "flags_received",
            "flags_met",
            "position_command_progress",
            "location",
            "ct_state",
            "sys_state",
        ];
        expected.sort_unstable();
        assert_eq!(keys, expected);
        assert_eq!(snap.get("laps_fraction"), Some(DiagnosticValue::U16(0)));
        assert_eq!(snap.get("ct_state"), Some(DiagnosticValue::U8(0)));
    }

    #[test]
    fn vehicle_number_comes_from_status() {
        let command = CommandRecord {
            vehicle_number: 9,
            ..Default::default()
        };
        let status = StatusRecord {
            vehicle_number: 3,
            ..Default::default()
        };
        let snap = race_control_snapshot(&command, &status);
        assert_eq!(snap.get("vehicle_number"), Some(DiagnosticValue::U8(3)));
    }

    #[test]
    fn mockup_snapshot_serialises_flat() {
        let snap = mockup_snapshot(&MockupCommandRecord {
            vehicle_number: 12,
            engine_ignition_command: true,
            emergency_stop_command: false,
        });
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "emergency_stop_command": false,
                "engine_ignition_command": true,
                "vehicle_number": 12
            })
        );
    }

    #[test]
    fn value_display() {
        assert_eq!(DiagnosticValue::U16(65_000).to_string(), "65000");
        assert_eq!(DiagnosticValue::Bool(true).to_string(), "true");
    }
}
