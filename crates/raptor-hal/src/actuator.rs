//! Generic `VehicleActuator` trait for whatever realises engine and
//! emergency-stop control on the simulated vehicle.
//!
//! Backends implement this trait and are handed to an
//! [`ActuatorBinding`][crate::binding::ActuatorBinding].  The dispatcher only
//! ever talks to the trait, so a vehicle-dynamics model can be swapped for an
//! alternate one without touching interpretation logic.

use raptor_types::{ActuatorAction, RaptorError};

/// Engine / emergency-stop capability of a vehicle backend.
///
/// All methods take `&self`: command and status callbacks may reach the same
/// backend from different threads, and the backend keeps its own state
/// consistent.
pub trait VehicleActuator: Send + Sync {
    /// Stable identifier used in logs, e.g. `"vehicle_dynamics"`.
    fn name(&self) -> &str;

    /// Start the engine.
    ///
    /// # Errors
    ///
    /// Returns [`RaptorError::Actuator`] if the backend rejects the request.
    fn start_engine(&self) -> Result<(), RaptorError>;

    /// Stop the engine.
    ///
    /// # Errors
    ///
    /// Returns [`RaptorError::Actuator`] if the backend rejects the request.
    fn stop_engine(&self) -> Result<(), RaptorError>;

    /// Set the backend's emergency-stopped latch.
    ///
    /// # Errors
    ///
    /// Returns [`RaptorError::Actuator`] if the backend rejects the request.
    fn set_emergency_stopped(&self, stopped: bool) -> Result<(), RaptorError>;

    /// Route a single [`ActuatorAction`] to the matching method.
    fn perform(&self, action: ActuatorAction) -> Result<(), RaptorError> {
        match action {
            ActuatorAction::StartEngine => self.start_engine(),
            ActuatorAction::StopEngine => self.stop_engine(),
            ActuatorAction::EmergencyStop => self.set_emergency_stopped(true),
        }
    }
}
