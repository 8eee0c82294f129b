//! `raptor-types` – shared vocabulary of the Raptor bridge adapter.
//!
//! - [`wire`] – the externally defined message layouts (race-control and
//!   mockup families) exactly as they travel over the bridge.
//! - [`codes`] – typed views over the opaque coded bytes (`flags`,
//!   `ct_state`) that only the dispatcher interprets.
//!
//! The flattened internal records, the actuator action vocabulary and the
//! crate-wide [`RaptorError`] live at the crate root.

pub mod codes;
pub mod wire;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use codes::{CommandFlags, CtState};
pub use wire::{RaceControlHeader, RaptorMockupCommand, RosTime, VehicleCommand, VehicleStatus};

/// Identifies one wire message type known to the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Full schema: race-control command (`flags`, position, laps).
    VehicleCommand,
    /// Full schema: race-control status (`ct_state`, `sys_state`, …).
    VehicleStatus,
    /// Mockup schema: ignition + emergency-stop booleans.
    RaptorMockupCommand,
}

impl MessageKind {
    /// Fully qualified message type name as registered on the bridge.
    pub fn type_name(self) -> &'static str {
        match self {
            MessageKind::VehicleCommand => "iac_msgs/VehicleCommand",
            MessageKind::VehicleStatus => "iac_msgs/VehicleStatus",
            MessageKind::RaptorMockupCommand => "iac_msgs/RaptorMockupCommand",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Flattened race-control command: header fields promoted, stamp dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub vehicle_number: u8,
    pub sequence_number: u8,
    pub flags: u8,
    pub position_command: u8,
    pub track_position: u8,
    pub laps: u8,
    pub laps_fraction: u16,
}

impl CommandRecord {
    /// Typed view over the raw `flags` byte.
    pub fn command_flags(&self) -> CommandFlags {
        CommandFlags::from_bits(self.flags)
    }
}

/// Flattened race-control status: header fields promoted, stamp dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub vehicle_number: u8,
    pub sequence_number: u8,
    pub flags_received: u8,
    pub flags_met: u8,
    pub position_command_progress: u8,
    pub location: u8,
    pub ct_state: u8,
    pub sys_state: u8,
}

impl StatusRecord {
    /// Typed view over the raw `ct_state` byte.
    pub fn ct_state(&self) -> CtState {
        CtState::from(self.ct_state)
    }
}

/// Flattened mockup command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockupCommandRecord {
    pub vehicle_number: u8,
    pub engine_ignition_command: bool,
    pub emergency_stop_command: bool,
}

/// Any internal record a translator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InboundRecord {
    Command(CommandRecord),
    Status(StatusRecord),
    MockupCommand(MockupCommandRecord),
}

impl InboundRecord {
    /// The wire message kind this record was translated from.
    pub fn kind(&self) -> MessageKind {
        match self {
            InboundRecord::Command(_) => MessageKind::VehicleCommand,
            InboundRecord::Status(_) => MessageKind::VehicleStatus,
            InboundRecord::MockupCommand(_) => MessageKind::RaptorMockupCommand,
        }
    }
}

/// Discrete action the dispatcher can ask of a vehicle actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActuatorAction {
    StartEngine,
    StopEngine,
    /// Latches the backend's emergency-stopped state to `true`.
    EmergencyStop,
}

impl std::fmt::Display for ActuatorAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActuatorAction::StartEngine => write!(f, "start_engine"),
            ActuatorAction::StopEngine => write!(f, "stop_engine"),
            ActuatorAction::EmergencyStop => write!(f, "emergency_stop"),
        }
    }
}

/// Error type shared by every Raptor crate.
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum RaptorError {
    #[error("Bridge Parsing Error: {0}")]
    Parsing(String),

    #[error("No subscriber registered for topic {0}")]
    UnknownTopic(String),

    #[error("No translator registered for {0}")]
    NoTranslator(MessageKind),

    #[error("Actuator Fault on {backend}: {details}")]
    Actuator { backend: String, details: String },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("I/O Error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RaptorError {
    fn from(e: std::io::Error) -> Self {
        RaptorError::Io(e.to_string())
    }
}
