//! Interpretation rules: coded input to actuator actions.
//!
//! Each function is pure and looks at one record only.  The returned
//! [`ActionSet`] is ordered; the dispatcher applies it front to back.
//!
//! | Record | Condition | Actions |
//! |---|---|---|
//! | command | purple flag (bit 0) set | `EmergencyStop` |
//! | status | `ct_state == 5` | `StartEngine` |
//! | status | `ct_state == 11` | `StopEngine` |
//! | status | `ct_state == 12` | `EmergencyStop` |
//! | status | any other code | none |
//! | mockup | `emergency_stop_command` | `EmergencyStop` |
//! | mockup | `engine_ignition_command` | `StartEngine`, else `StopEngine` |

use raptor_types::{ActuatorAction, CommandRecord, CtState, MockupCommandRecord, StatusRecord};
use smallvec::{SmallVec, smallvec};

/// Actions produced by one record; never more than two.
pub type ActionSet = SmallVec<[ActuatorAction; 2]>;

/// Race-control command channel.
///
/// An absent purple bit never clears a previously latched emergency stop.
pub fn command_actions(record: &CommandRecord) -> ActionSet {
    if record.command_flags().is_purple() {
        smallvec![ActuatorAction::EmergencyStop]
    } else {
        ActionSet::new()
    }
}

/// Race-control status channel.
pub fn status_actions(record: &StatusRecord) -> ActionSet {
    match record.ct_state() {
        CtState::StartEngine => smallvec![ActuatorAction::StartEngine],
        CtState::StopEngine => smallvec![ActuatorAction::StopEngine],
        CtState::EmergencyStop => smallvec![ActuatorAction::EmergencyStop],
        CtState::Unmapped(_) => ActionSet::new(),
    }
}

/// Mockup channel.  The ignition branch always yields an action.
pub fn mockup_actions(record: &MockupCommandRecord) -> ActionSet {
    let mut actions = ActionSet::new();
    if record.emergency_stop_command {
        actions.push(ActuatorAction::EmergencyStop);
    }
    actions.push(if record.engine_ignition_command {
        ActuatorAction::StartEngine
    } else {
        ActuatorAction::StopEngine
    });
    actions
}
