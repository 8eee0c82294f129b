//! `raptor-middleware` – the bridge side of the adapter.
//!
//! Moves race-control messages from the bridge into typed internal records
//! without caring what the coded values mean.
//!
//! # Modules
//!
//! - [`translator`] – [`WireMessage`]: pure wire-to-record translation for
//!   every supported message type.
//! - [`bridge`] – [`BridgeTransport`], the seam the adapter consumes, and
//!   [`LocalBridge`], an in-process transport fed with rosbridge JSON frames.
//! - [`registration`] – [`RaptorBridgePlugin`]: installs one translator per
//!   message kind on supported bridges only.

pub mod bridge;
pub mod registration;
pub mod translator;

pub use bridge::{BridgeDescriptor, BridgeTransport, LocalBridge, RecordCallback, SubscriptionId};
pub use registration::{RaptorBridgePlugin, Registration};
pub use translator::{TranslateFn, WireMessage, translator_for};
