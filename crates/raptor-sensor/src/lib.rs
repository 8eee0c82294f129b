//! `raptor-sensor` – race-control command dispatch for one vehicle.
//!
//! Turns translated race-control records into engine start/stop and
//! emergency-stop calls on the vehicle's actuator, and keeps the latest
//! records for display.
//!
//! # Modules
//!
//! - [`sensor`] – [`RaptorSensor`]: attaches to a bridge, applies the pause
//!   check, stores the latest records and drives the
//!   [`ActuatorBinding`][raptor_hal::ActuatorBinding].
//! - [`family`] – [`SchemaFamily`] with the [`RaceControl`] and [`Mockup`]
//!   variants.
//! - [`rules`] – the interpretation tables from coded values to
//!   [`ActuatorAction`][raptor_types::ActuatorAction]s.
//! - [`diagnostics`] – [`DiagnosticSnapshot`] for visualizers.
//! - [`clock`] – [`SimClock`]: the host time scale, zero meaning paused.

pub mod clock;
pub mod diagnostics;
pub mod family;
pub mod rules;
pub mod sensor;

pub use clock::{SharedClock, SimClock};
pub use diagnostics::{DiagnosticSnapshot, DiagnosticValue};
pub use family::{Mockup, RaceControl, RaceControlLatest, SchemaFamily, SensorTopics};
pub use rules::ActionSet;
pub use sensor::{Actuations, BridgeAttachment, DispatchOutcome, RaptorSensor};
