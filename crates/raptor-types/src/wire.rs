//! Wire schemas as published on the bridge.
//!
//! Field names match the ROS message definitions so the structs deserialize
//! directly from rosbridge JSON.  A missing `stamp` decodes as zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ROS `builtin_interfaces/Time`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosTime {
    pub sec: i32,
    pub nanosec: u32,
}

/// Seconds outside the `i32` range saturate at its bounds.
impl From<DateTime<Utc>> for RosTime {
    fn from(dt: DateTime<Utc>) -> Self {
        let secs = dt.timestamp();
        Self {
            sec: i32::try_from(secs).unwrap_or(if secs < 0 { i32::MIN } else { i32::MAX }),
            nanosec: dt.timestamp_subsec_nanos(),
        }
    }
}

/// `iac_msgs/RaceControlHeader`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceControlHeader {
    #[serde(default)]
    pub stamp: RosTime,
    pub vehicle_number: u8,
    pub sequence_number: u8,
}

/// `iac_msgs/VehicleCommand`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleCommand {
    pub header: RaceControlHeader,
    pub flags: u8,
    pub position_command: u8,
    pub track_position: u8,
    pub laps: u8,
    pub laps_fraction: u16,
}

/// `iac_msgs/VehicleStatus`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleStatus {
    pub header: RaceControlHeader,
    pub flags_received: u8,
    pub flags_met: u8,
    pub position_command_progress: u8,
    pub location: u8,
    pub ct_state: u8,
    pub sys_state: u8,
}

/// `iac_msgs/RaptorMockupCommand`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaptorMockupCommand {
    #[serde(default)]
    pub stamp: RosTime,
    pub vehicle_number: u8,
    pub engine_ignition_command: bool,
    pub emergency_stop_command: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_status_decodes_from_rosbridge_json() {
        let json = r#"{
            "header": {"stamp": {"sec": 12, "nanosec": 500}, "vehicle_number": 7, "sequence_number": 3},
            "flags_received": 1, "flags_met": 1, "position_command_progress": 0,
            "location": 4, "ct_state": 5, "sys_state": 9
        }"#;
        let status: VehicleStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.header.stamp, RosTime { sec: 12, nanosec: 500 });
        assert_eq!(status.header.vehicle_number, 7);
        assert_eq!(status.ct_state, 5);
        assert_eq!(status.sys_state, 9);
    }

    #[test]
    fn missing_stamp_defaults_to_zero() {
        let json = r#"{"vehicle_number": 2, "engine_ignition_command": true, "emergency_stop_command": false}"#;
        let cmd: RaptorMockupCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd.stamp, RosTime::default());
        assert!(cmd.engine_ignition_command);
    }

    #[test]
    fn out_of_range_byte_is_rejected_by_decoder() {
        let json = r#"{"header": {"vehicle_number": 1, "sequence_number": 0},
            "flags": 300, "position_command": 0, "track_position": 0, "laps": 0, "laps_fraction": 0}"#;
        assert!(serde_json::from_str::<VehicleCommand>(json).is_err());
    }

    #[test]
    fn ros_time_from_datetime() {
        let dt = DateTime::from_timestamp(1_700_000_000, 250).unwrap();
        let t = RosTime::from(dt);
        assert_eq!(t.sec, 1_700_000_000);
        assert_eq!(t.nanosec, 250);
    }

    #[test]
    fn ros_time_saturates_past_2038() {
        let late = DateTime::from_timestamp(i64::from(i32::MAX) + 10, 7).unwrap();
        assert_eq!(RosTime::from(late), RosTime { sec: i32::MAX, nanosec: 7 });

        let early = DateTime::from_timestamp(i64::from(i32::MIN) - 10, 0).unwrap();
        assert_eq!(RosTime::from(early).sec, i32::MIN);
    }
}
