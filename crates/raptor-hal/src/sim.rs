//! In-process vehicle backend for headless runs and CI.
//!
//! [`SimVehicle`] keeps the engine and emergency-stop state a real dynamics
//! model would own, and records every call it receives so tests can assert on
//! the exact sequence.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use raptor_hal::{ActuatorBinding, SimVehicle, VehicleActuator};
//! use raptor_types::ActuatorAction;
//!
//! let vehicle = Arc::new(SimVehicle::new("vehicle_dynamics"));
//! let binding = ActuatorBinding::resolve(Some(vehicle.clone() as Arc<dyn VehicleActuator>), None);
//!
//! binding.apply(ActuatorAction::StartEngine);
//! assert!(vehicle.engine_running());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use raptor_types::{ActuatorAction, RaptorError};

use crate::actuator::VehicleActuator;

/// A simulated vehicle that records commanded state.  Always succeeds.
pub struct SimVehicle {
    name: String,
    engine_running: AtomicBool,
    emergency_stopped: AtomicBool,
    calls: Mutex<Vec<ActuatorAction>>,
}

impl SimVehicle {
    /// Create a new simulated vehicle with the given identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine_running: AtomicBool::new(false),
            emergency_stopped: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn engine_running(&self) -> bool {
        self.engine_running.load(Ordering::SeqCst)
    }

    pub fn emergency_stopped(&self) -> bool {
        self.emergency_stopped.load(Ordering::SeqCst)
    }

    /// Every action received so far, in arrival order.
    pub fn calls(&self) -> Vec<ActuatorAction> {
        self.calls.lock().clone()
    }

    /// Number of times `action` was received.
    pub fn count(&self, action: ActuatorAction) -> usize {
        self.calls.lock().iter().filter(|a| **a == action).count()
    }

    /// Release the emergency-stop latch.  Nothing in the adapter ever does
    /// this; it belongs to whoever owns the vehicle.
    pub fn reset_emergency_stop(&self) {
        self.emergency_stopped.store(false, Ordering::SeqCst);
    }
}

impl VehicleActuator for SimVehicle {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_engine(&self) -> Result<(), RaptorError> {
        self.calls.lock().push(ActuatorAction::StartEngine);
        self.engine_running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop_engine(&self) -> Result<(), RaptorError> {
        self.calls.lock().push(ActuatorAction::StopEngine);
        self.engine_running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn set_emergency_stopped(&self, stopped: bool) -> Result<(), RaptorError> {
        if stopped {
            self.calls.lock().push(ActuatorAction::EmergencyStop);
        }
        self.emergency_stopped.store(stopped, Ordering::SeqCst);
        Ok(())
    }
}
