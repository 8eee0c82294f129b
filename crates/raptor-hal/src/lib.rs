//! `raptor-hal` – vehicle actuator seam.
//!
//! The adapter never touches vehicle physics directly.  It talks to a
//! [`VehicleActuator`] chosen once at construction and wrapped in an
//! [`ActuatorBinding`].
//!
//! # Modules
//!
//! - [`actuator`] – the [`VehicleActuator`] capability trait.
//! - [`binding`] – [`ActuatorBinding`]: primary / fallback / unbound
//!   resolution and action routing.
//! - [`sim`] – [`SimVehicle`]: an in-process backend that records every call,
//!   for headless runs and tests.

pub mod actuator;
pub mod binding;
pub mod sim;

pub use actuator::VehicleActuator;
pub use binding::{ActuationOutcome, ActuatorBinding, BackendKind};
pub use sim::SimVehicle;
