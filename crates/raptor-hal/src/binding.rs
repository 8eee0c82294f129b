//! [`ActuatorBinding`] – the one backend a sensor instance talks to.
//!
//! A vehicle may expose a primary vehicle-dynamics backend or an alternate
//! one.  The choice is made once, at construction, by
//! [`ActuatorBinding::resolve`]; afterwards every action goes to the same
//! backend.  When neither backend exists the binding is
//! [`ActuatorBinding::Unbound`] and every action is a logged no-op.

use std::sync::Arc;

use raptor_types::ActuatorAction;
use tracing::{info, warn};

use crate::actuator::VehicleActuator;

/// Which backend a bound [`ActuatorBinding`] resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The preferred vehicle-dynamics model.
    VehicleDynamics,
    /// Fallback model used when no vehicle-dynamics backend exists.
    Alternate,
}

/// Result of routing one action through a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActuationOutcome {
    /// The backend accepted the action.
    Applied,
    /// No backend is bound; nothing happened.
    Unbound,
    /// The backend rejected the action; the message is the backend's error.
    Failed(String),
}

/// Actuator target resolved at construction.
#[derive(Clone)]
pub enum ActuatorBinding {
    Bound {
        kind: BackendKind,
        actuator: Arc<dyn VehicleActuator>,
    },
    Unbound,
}

impl std::fmt::Debug for ActuatorBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActuatorBinding::Bound { kind, actuator } => f
                .debug_struct("Bound")
                .field("kind", kind)
                .field("actuator", &actuator.name())
                .finish(),
            ActuatorBinding::Unbound => f.write_str("Unbound"),
        }
    }
}

impl ActuatorBinding {
    /// Pick the primary backend if present, otherwise the alternate one.
    ///
    /// Logs one warning when the primary is missing and a second one when the
    /// alternate is missing as well.
    pub fn resolve(
        primary: Option<Arc<dyn VehicleActuator>>,
        alternate: Option<Arc<dyn VehicleActuator>>,
    ) -> Self {
        if let Some(actuator) = primary {
            return Self::Bound {
                kind: BackendKind::VehicleDynamics,
                actuator,
            };
        }
        warn!("could not find vehicle dynamics backend");

        match alternate {
            Some(actuator) => Self::Bound {
                kind: BackendKind::Alternate,
                actuator,
            },
            None => {
                warn!("could not find supported vehicle dynamics model (primary or alternate); actuator calls are disabled");
                Self::Unbound
            }
        }
    }

    /// Which backend was bound, if any.
    pub fn kind(&self) -> Option<BackendKind> {
        match self {
            Self::Bound { kind, .. } => Some(*kind),
            Self::Unbound => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound { .. })
    }

    /// Route `action` to the bound backend.
    ///
    /// Backend errors are logged and reported in the outcome; they never
    /// propagate further.
    pub fn apply(&self, action: ActuatorAction) -> ActuationOutcome {
        let Self::Bound { actuator, .. } = self else {
            return ActuationOutcome::Unbound;
        };

        match actuator.perform(action) {
            Ok(()) => {
                info!(backend = actuator.name(), action = %action, "actuator call");
                ActuationOutcome::Applied
            }
            Err(e) => {
                warn!(backend = actuator.name(), action = %action, error = %e, "actuator call failed");
                ActuationOutcome::Failed(e.to_string())
            }
        }
    }
}
