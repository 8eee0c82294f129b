//! Schema families.
//!
//! The sensor's pause check, storage and actuator plumbing are shared; a
//! [`SchemaFamily`] supplies only what differs between the race-control and
//! mockup message sets: which channels exist, how a record is stored, which
//! rule table applies and which keys the snapshot carries.

use raptor_types::{
    CommandRecord, InboundRecord, MessageKind, MockupCommandRecord, RaptorError, StatusRecord,
};

use crate::diagnostics::{DiagnosticSnapshot, mockup_snapshot, race_control_snapshot};
use crate::rules::{ActionSet, command_actions, mockup_actions, status_actions};

/// Topic names supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorTopics {
    pub command: String,
    /// Only the race-control family uses a status channel.
    pub status: Option<String>,
}

impl SensorTopics {
    pub fn new(command: impl Into<String>, status: Option<String>) -> Self {
        Self {
            command: command.into(),
            status,
        }
    }
}

/// One family of wire messages and its interpretation rules.
pub trait SchemaFamily: Send + Sync + 'static {
    /// Short name used in logs.
    const NAME: &'static str;

    /// The "latest value" state kept per sensor instance.
    type Latest: Default + Copy + Send + Sync + std::fmt::Debug;

    /// Wire message kinds this family consumes.
    fn message_kinds() -> &'static [MessageKind];

    /// `(topic, kind)` pairs to subscribe.
    ///
    /// # Errors
    ///
    /// Returns [`RaptorError::Config`] when a topic the family needs is
    /// missing.
    fn channels(topics: &SensorTopics) -> Result<Vec<(String, MessageKind)>, RaptorError>;

    /// Store `record` as the latest value and return the actions it calls for,
    /// or `None` if the record does not belong to this family.
    fn accept(latest: &mut Self::Latest, record: InboundRecord) -> Option<ActionSet>;

    fn snapshot(latest: &Self::Latest) -> DiagnosticSnapshot;
}

/// Full race-control schema: separate command and status channels.
#[derive(Debug, Clone, Copy, Default)]
pub struct RaceControl;

/// Latest command and status records of a race-control sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RaceControlLatest {
    pub command: CommandRecord,
    pub status: StatusRecord,
}

impl SchemaFamily for RaceControl {
    const NAME: &'static str = "race_control";
    type Latest = RaceControlLatest;

    fn message_kinds() -> &'static [MessageKind] {
        &[MessageKind::VehicleCommand, MessageKind::VehicleStatus]
    }

    fn channels(topics: &SensorTopics) -> Result<Vec<(String, MessageKind)>, RaptorError> {
        let status = topics.status.clone().ok_or_else(|| {
            RaptorError::Config("race_control schema requires a status topic".to_string())
        })?;
        Ok(vec![
            (topics.command.clone(), MessageKind::VehicleCommand),
            (status, MessageKind::VehicleStatus),
        ])
    }

    fn accept(latest: &mut RaceControlLatest, record: InboundRecord) -> Option<ActionSet> {
        match record {
            InboundRecord::Command(command) => {
                latest.command = command;
                Some(command_actions(&command))
            }
            InboundRecord::Status(status) => {
                latest.status = status;
                Some(status_actions(&status))
            }
            InboundRecord::MockupCommand(_) => None,
        }
    }

    fn snapshot(latest: &RaceControlLatest) -> DiagnosticSnapshot {
        race_control_snapshot(&latest.command, &latest.status)
    }
}

/// Mockup schema: one combined command channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mockup;

impl SchemaFamily for Mockup {
    const NAME: &'static str = "mockup";
    type Latest = MockupCommandRecord;

    fn message_kinds() -> &'static [MessageKind] {
        &[MessageKind::RaptorMockupCommand]
    }

    fn channels(topics: &SensorTopics) -> Result<Vec<(String, MessageKind)>, RaptorError> {
        Ok(vec![(topics.command.clone(), MessageKind::RaptorMockupCommand)])
    }

    fn accept(latest: &mut MockupCommandRecord, record: InboundRecord) -> Option<ActionSet> {
        match record {
            InboundRecord::MockupCommand(command) => {
                *latest = command;
                Some(mockup_actions(&command))
            }
            InboundRecord::Command(_) | InboundRecord::Status(_) => None,
        }
    }

    fn snapshot(latest: &MockupCommandRecord) -> DiagnosticSnapshot {
        mockup_snapshot(latest)
    }
}
