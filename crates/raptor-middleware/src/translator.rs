//! Wire-to-record translation.
//!
//! Every wire type implements [`WireMessage`]; its `translate` is pure and
//! total.  Header fields are flattened, stamps are dropped, and coded bytes
//! are copied verbatim without being inspected.

use raptor_types::{
    CommandRecord, InboundRecord, MessageKind, MockupCommandRecord, RaptorError,
    RaptorMockupCommand, StatusRecord, VehicleCommand, VehicleStatus,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Type-erased translator installed on a bridge: decode a JSON message body
/// and translate it into an [`InboundRecord`].
pub type TranslateFn = fn(serde_json::Value) -> Result<InboundRecord, RaptorError>;

/// A message type that travels over the bridge.
pub trait WireMessage: DeserializeOwned + Serialize + Sized {
    /// Which message kind this type is.
    const KIND: MessageKind;

    /// The flattened record this message translates into.
    type Record;

    /// Flatten into the internal record.
    fn translate(self) -> Self::Record;

    /// Translate and wrap into the type-erased [`InboundRecord`].
    fn into_inbound(self) -> InboundRecord;
}

impl WireMessage for VehicleCommand {
    const KIND: MessageKind = MessageKind::VehicleCommand;
    type Record = CommandRecord;

    fn translate(self) -> CommandRecord {
        CommandRecord {
            vehicle_number: self.header.vehicle_number,
            sequence_number: self.header.sequence_number,
            flags: self.flags,
            position_command: self.position_command,
            track_position: self.track_position,
            laps: self.laps,
            laps_fraction: self.laps_fraction,
        }
    }

    fn into_inbound(self) -> InboundRecord {
        InboundRecord::Command(self.translate())
    }
}

impl WireMessage for VehicleStatus {
    const KIND: MessageKind = MessageKind::VehicleStatus;
    type Record = StatusRecord;

    fn translate(self) -> StatusRecord {
        StatusRecord {
            vehicle_number: self.header.vehicle_number,
            sequence_number: self.header.sequence_number,
            flags_received: self.flags_received,
            flags_met: self.flags_met,
            position_command_progress: self.position_command_progress,
            location: self.location,
            ct_state: self.ct_state,
            sys_state: self.sys_state,
        }
    }

    fn into_inbound(self) -> InboundRecord {
        InboundRecord::Status(self.translate())
    }
}

impl WireMessage for RaptorMockupCommand {
    const KIND: MessageKind = MessageKind::RaptorMockupCommand;
    type Record = MockupCommandRecord;

    fn translate(self) -> MockupCommandRecord {
        MockupCommandRecord {
            vehicle_number: self.vehicle_number,
            engine_ignition_command: self.engine_ignition_command,
            emergency_stop_command: self.emergency_stop_command,
        }
    }

    fn into_inbound(self) -> InboundRecord {
        InboundRecord::MockupCommand(self.translate())
    }
}

/// Decode `value` as `M` and translate it.
pub fn decode_and_translate<M: WireMessage>(
    value: serde_json::Value,
) -> Result<InboundRecord, RaptorError> {
    let msg: M = serde_json::from_value(value)
        .map_err(|e| RaptorError::Parsing(format!("{}: {e}", M::KIND)))?;
    Ok(msg.into_inbound())
}

/// The translator for a given message kind.
pub fn translator_for(kind: MessageKind) -> TranslateFn {
    match kind {
        MessageKind::VehicleCommand => decode_and_translate::<VehicleCommand>,
        MessageKind::VehicleStatus => decode_and_translate::<VehicleStatus>,
        MessageKind::RaptorMockupCommand => decode_and_translate::<RaptorMockupCommand>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raptor_types::{RaceControlHeader, RosTime};
    use serde_json::json;

    fn header(vehicle_number: u8, sequence_number: u8) -> RaceControlHeader {
        RaceControlHeader {
            stamp: RosTime { sec: 99, nanosec: 1 },
            vehicle_number,
            sequence_number,
        }
    }

    #[test]
    fn vehicle_command_flattens_header_and_copies_payload() {
        let msg = VehicleCommand {
            header: header(8, 200),
            flags: 0xA5,
            position_command: 3,
            track_position: 17,
            laps: 42,
            laps_fraction: 65_535,
        };
        let rec = msg.translate();
        assert_eq!(
            rec,
            CommandRecord {
                vehicle_number: 8,
                sequence_number: 200,
                flags: 0xA5,
                position_command: 3,
                track_position: 17,
                laps: 42,
                laps_fraction: 65_535,
            }
        );
    }

    #[test]
    fn vehicle_status_passes_unmapped_codes_through() {
        let msg = VehicleStatus {
            header: header(1, 2),
            flags_received: 255,
            flags_met: 254,
            position_command_progress: 9,
            location: 6,
            ct_state: 250,
            sys_state: 77,
        };
        let rec = msg.translate();
        assert_eq!(rec.vehicle_number, 1);
        assert_eq!(rec.sequence_number, 2);
        assert_eq!(rec.flags_received, 255);
        assert_eq!(rec.flags_met, 254);
        assert_eq!(rec.position_command_progress, 9);
        assert_eq!(rec.location, 6);
        assert_eq!(rec.ct_state, 250);
        assert_eq!(rec.sys_state, 77);
    }

    #[test]
    fn mockup_command_copies_all_fields() {
        let msg = RaptorMockupCommand {
            stamp: RosTime::default(),
            vehicle_number: 4,
            engine_ignition_command: true,
            emergency_stop_command: true,
        };
        assert_eq!(
            msg.into_inbound(),
            InboundRecord::MockupCommand(MockupCommandRecord {
                vehicle_number: 4,
                engine_ignition_command: true,
                emergency_stop_command: true,
            })
        );
    }

    #[test]
    fn translator_for_decodes_json_body() {
        let body = json!({
            "header": {"vehicle_number": 3, "sequence_number": 1},
            "flags_received": 0, "flags_met": 0, "position_command_progress": 0,
            "location": 0, "ct_state": 12, "sys_state": 0
        });
        let rec = translator_for(MessageKind::VehicleStatus)(body).unwrap();
        match rec {
            InboundRecord::Status(s) => {
                assert_eq!(s.vehicle_number, 3);
                assert_eq!(s.ct_state, 12);
            }
            other => panic!("expected status record, got {other:?}"),
        }
    }

    #[test]
    fn translator_rejects_wrong_shape() {
        let body = json!({"vehicle_number": "seven"});
        let err = translator_for(MessageKind::RaptorMockupCommand)(body).unwrap_err();
        assert!(matches!(err, RaptorError::Parsing(_)));
        assert!(err.to_string().contains("iac_msgs/RaptorMockupCommand"));
    }
}
