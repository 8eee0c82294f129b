//! [`RaptorSensor`] – per-vehicle dispatcher and latest-value store.
//!
//! One sensor instance serves one vehicle.  It subscribes to the family's
//! channels on a supported bridge and, for every delivered record:
//!
//! 1. discards it if the simulation clock is paused,
//! 2. stores it as the latest value for its channel,
//! 3. applies the family's rule table and calls the bound actuator.
//!
//! Engine and emergency-stop state belong to the actuator backend; the sensor
//! keeps nothing but the latest records.  In particular nothing here ever
//! clears an emergency stop.

use std::marker::PhantomData;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use raptor_hal::{ActuationOutcome, ActuatorBinding};
use raptor_middleware::{BridgeTransport, SubscriptionId};
use raptor_types::{ActuatorAction, InboundRecord, MessageKind, RaptorError};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::clock::SimClock;
use crate::diagnostics::DiagnosticSnapshot;
use crate::family::{SchemaFamily, SensorTopics};

// ────────────────────────────────────────────────────────────────────────────
// Outcomes
// ────────────────────────────────────────────────────────────────────────────

/// Actions sent to the binding, each with what the binding reported.
pub type Actuations = SmallVec<[(ActuatorAction, ActuationOutcome); 2]>;

/// What happened to one delivered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The clock was paused; the record was dropped unseen.
    Suspended,
    /// The record belongs to another schema family.
    Ignored,
    /// The record was stored and these actions were sent to the binding.
    /// An `Unbound` or `Failed` outcome means the vehicle did not act.
    Dispatched(Actuations),
}

/// Result of [`RaptorSensor::on_bridge_setup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeAttachment {
    Attached(Vec<SubscriptionId>),
    /// The bridge identity is not on the allow-list; nothing was subscribed.
    Unsupported,
}

// ────────────────────────────────────────────────────────────────────────────
// RaptorSensor
// ────────────────────────────────────────────────────────────────────────────

/// Race-control protocol adapter for one vehicle.
pub struct RaptorSensor<F: SchemaFamily> {
    topics: SensorTopics,
    binding: ActuatorBinding,
    clock: Arc<dyn SimClock>,
    latest: RwLock<F::Latest>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
    _family: PhantomData<F>,
}

impl<F: SchemaFamily> RaptorSensor<F> {
    pub fn new(topics: SensorTopics, binding: ActuatorBinding, clock: Arc<dyn SimClock>) -> Self {
        Self {
            topics,
            binding,
            clock,
            latest: RwLock::new(F::Latest::default()),
            subscriptions: Mutex::new(Vec::new()),
            _family: PhantomData,
        }
    }

    /// Wire message kinds this sensor consumes.
    pub fn message_kinds() -> &'static [MessageKind] {
        F::message_kinds()
    }

    pub fn topics(&self) -> &SensorTopics {
        &self.topics
    }

    pub fn actuator_binding(&self) -> &ActuatorBinding {
        &self.binding
    }

    /// Copy of the latest stored records.
    pub fn latest(&self) -> F::Latest {
        *self.latest.read()
    }

    /// Flat view of the latest records.  Zero-valued before any delivery.
    pub fn snapshot(&self) -> DiagnosticSnapshot {
        F::snapshot(&self.latest.read())
    }

    /// Process one delivered record.
    pub fn handle(&self, record: InboundRecord) -> DispatchOutcome {
        if self.clock.is_paused() {
            debug!(family = F::NAME, kind = %record.kind(), "simulation paused; record discarded");
            return DispatchOutcome::Suspended;
        }

        let actions = {
            let mut latest = self.latest.write();
            match F::accept(&mut latest, record) {
                Some(actions) => actions,
                None => {
                    warn!(family = F::NAME, kind = %record.kind(), "record outside schema family ignored");
                    return DispatchOutcome::Ignored;
                }
            }
        };

        let actuations = actions
            .into_iter()
            .map(|action| (action, self.binding.apply(action)))
            .collect();
        DispatchOutcome::Dispatched(actuations)
    }

    /// Subscribe this sensor to its channels on `bridge`.
    ///
    /// Subscriptions hold only a weak reference to the sensor; once the last
    /// `Arc` is dropped, deliveries become no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`RaptorError::Config`] if a required topic is missing, or
    /// [`RaptorError::NoTranslator`] if the bridge lacks a translator for one
    /// of the family's kinds.  No subscription survives a failed attach.
    pub fn on_bridge_setup(
        self: &Arc<Self>,
        bridge: &dyn BridgeTransport,
    ) -> Result<BridgeAttachment, RaptorError> {
        let descriptor = bridge.descriptor();
        if !descriptor.is_supported() {
            debug!(bridge = %descriptor, "bridge not supported; sensor not attached");
            return Ok(BridgeAttachment::Unsupported);
        }

        let channels = F::channels(&self.topics)?;
        let mut ids = Vec::with_capacity(channels.len());
        for (topic, kind) in channels {
            let sensor: Weak<Self> = Arc::downgrade(self);
            let subscribed = bridge.subscribe(
                &topic,
                kind,
                Box::new(move |record| {
                    if let Some(sensor) = sensor.upgrade() {
                        sensor.handle(record);
                    }
                }),
            );
            match subscribed {
                Ok(id) => ids.push(id),
                Err(e) => {
                    for id in ids {
                        bridge.unsubscribe(id);
                    }
                    return Err(e);
                }
            }
        }

        info!(
            bridge = %descriptor,
            family = F::NAME,
            command_topic = %self.topics.command,
            status_topic = ?self.topics.status,
            "raptor sensor attached"
        );
        self.subscriptions.lock().extend(ids.iter().copied());
        Ok(BridgeAttachment::Attached(ids))
    }

    /// Drop every subscription made by [`on_bridge_setup`](Self::on_bridge_setup).
    /// Returns how many were removed.
    pub fn detach(&self, bridge: &dyn BridgeTransport) -> usize {
        let ids: Vec<SubscriptionId> = self.subscriptions.lock().drain(..).collect();
        ids.into_iter().filter(|id| bridge.unsubscribe(*id)).count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
