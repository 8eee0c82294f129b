//! Bridge transport seam and an in-process implementation.
//!
//! A bridge owns two registries: translators (one per [`MessageKind`]) and
//! topic subscriptions.  When a message arrives on a topic, the bridge decodes
//! it with the translator registered for each subscriber's kind and hands the
//! resulting [`InboundRecord`] to the subscriber's callback.
//!
//! [`LocalBridge`] ingests rosbridge-style JSON frames:
//!
//! ```json
//! {"op": "publish", "topic": "/raptor/vehicle_status", "msg": { ... }}
//! ```
//!
//! Delivery is synchronous: callbacks run on the ingesting thread, one at a
//! time, in subscription order.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use raptor_types::{InboundRecord, MessageKind, RaptorError};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::translator::{TranslateFn, WireMessage};

// ────────────────────────────────────────────────────────────────────────────
// Bridge identity
// ────────────────────────────────────────────────────────────────────────────

/// Bridge names accepted for registration.
pub const SUPPORTED_BRIDGE_NAMES: &[&str] = &["ROS"];

/// Bridge type strings accepted for registration.
pub const SUPPORTED_BRIDGE_KINDS: &[&str] = &["ROS2", "ROS2_Bridge_GAIA"];

/// Identity of a bridge instance: its display name and its type string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
}

impl BridgeDescriptor {
    pub fn new(name: Option<&str>, kind: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            kind: kind.map(str::to_string),
        }
    }

    /// `true` when either the name or the type string is on the allow-list.
    pub fn is_supported(&self) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .is_some_and(|n| SUPPORTED_BRIDGE_NAMES.contains(&n));
        let kind_ok = self
            .kind
            .as_deref()
            .is_some_and(|k| SUPPORTED_BRIDGE_KINDS.contains(&k));
        name_ok || kind_ok
    }
}

impl std::fmt::Display for BridgeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}",
            self.name.as_deref().unwrap_or("-"),
            self.kind.as_deref().unwrap_or("-")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Transport seam
// ────────────────────────────────────────────────────────────────────────────

/// Handle returned by [`BridgeTransport::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Callback invoked with every record delivered on a subscribed topic.
pub type RecordCallback = Box<dyn Fn(InboundRecord) + Send + Sync>;

/// What a bridge must offer to the registration adapter and the sensor.
pub trait BridgeTransport: Send + Sync {
    /// Identity used to decide whether this adapter serves the bridge.
    fn descriptor(&self) -> &BridgeDescriptor;

    /// Install (or replace) the translator for `kind`.
    fn register_translator(&self, kind: MessageKind, translate: TranslateFn);

    fn has_translator(&self, kind: MessageKind) -> bool;

    /// Subscribe `callback` to `topic`, decoding messages as `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RaptorError::NoTranslator`] if no translator was registered
    /// for `kind`.
    fn subscribe(
        &self,
        topic: &str,
        kind: MessageKind,
        callback: RecordCallback,
    ) -> Result<SubscriptionId, RaptorError>;

    /// Remove a subscription.  Returns `false` if the id was unknown.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

// ────────────────────────────────────────────────────────────────────────────
// LocalBridge
// ────────────────────────────────────────────────────────────────────────────

struct Subscription {
    id: SubscriptionId,
    topic: String,
    kind: MessageKind,
    callback: Arc<dyn Fn(InboundRecord) + Send + Sync>,
}

/// In-process bridge fed with rosbridge JSON frames or typed messages.
pub struct LocalBridge {
    descriptor: BridgeDescriptor,
    translators: RwLock<HashMap<MessageKind, TranslateFn>>,
    subscriptions: RwLock<Vec<Subscription>>,
}

impl LocalBridge {
    pub fn new(descriptor: BridgeDescriptor) -> Self {
        Self {
            descriptor,
            translators: RwLock::new(HashMap::new()),
            subscriptions: RwLock::new(Vec::new()),
        }
    }

    /// Number of live subscriptions across all topics.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Message kinds that currently have a translator installed.
    pub fn translator_kinds(&self) -> Vec<MessageKind> {
        self.translators.read().keys().copied().collect()
    }

    /// Parse a rosbridge frame and deliver it.
    ///
    /// Returns the number of callbacks the message reached.  Frames whose
    /// `op` is not `"publish"` and topics nobody subscribed to reach zero
    /// callbacks; that is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RaptorError::Parsing`] for malformed JSON, a missing
    /// `topic`/`msg`, or a body that does not decode as the subscribed kind.
    pub fn ingest_frame(&self, text: &str) -> Result<usize, RaptorError> {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| RaptorError::Parsing(format!("invalid frame: {e}")))?;

        let op = json.get("op").and_then(|o| o.as_str()).unwrap_or("");
        if op != "publish" {
            debug!(op, "ignoring non-publish frame");
            return Ok(0);
        }

        let topic = json
            .get("topic")
            .and_then(|t| t.as_str())
            .ok_or_else(|| RaptorError::Parsing("publish frame without topic".to_string()))?;
        let msg = json
            .get("msg")
            .cloned()
            .ok_or_else(|| RaptorError::Parsing(format!("publish frame on {topic} without msg")))?;

        self.deliver(topic, msg)
    }

    /// Publish a typed wire message on `topic`.
    ///
    /// # Errors
    ///
    /// See [`LocalBridge::ingest_frame`].
    pub fn publish<M: WireMessage>(&self, topic: &str, msg: &M) -> Result<usize, RaptorError> {
        let value = serde_json::to_value(msg).map_err(|e| RaptorError::Parsing(e.to_string()))?;
        self.deliver(topic, value)
    }

    /// Decode `msg` for every subscriber on `topic` and call it.
    ///
    /// Each kind is decoded once.  A subscriber whose kind cannot decode the
    /// message is skipped and the rest still receive it, so command and status
    /// channels may share a topic.  Fails only when nobody could decode it.
    fn deliver(&self, topic: &str, msg: serde_json::Value) -> Result<usize, RaptorError> {
        // Snapshot the targets so callbacks run without holding the lock.
        let targets: Vec<(MessageKind, Arc<dyn Fn(InboundRecord) + Send + Sync>)> = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.topic == topic)
            .map(|s| (s.kind, Arc::clone(&s.callback)))
            .collect();

        if targets.is_empty() {
            debug!(topic, "no subscriber for topic");
            return Ok(0);
        }

        let mut decoded: Vec<(MessageKind, Option<InboundRecord>)> = Vec::with_capacity(2);
        let mut last_error = None;
        let mut delivered = 0;
        for (kind, callback) in targets {
            let record = match decoded.iter().find(|(k, _)| *k == kind) {
                Some(&(_, record)) => record,
                None => {
                    let record = match self.decode(kind, &msg) {
                        Ok(record) => Some(record),
                        Err(e) => {
                            debug!(topic, kind = %kind, error = %e, "message does not decode for subscriber; skipped");
                            last_error = Some(e);
                            None
                        }
                    };
                    decoded.push((kind, record));
                    record
                }
            };
            if let Some(record) = record {
                callback(record);
                delivered += 1;
            }
        }

        match last_error {
            Some(e) if delivered == 0 => Err(e),
            _ => Ok(delivered),
        }
    }

    fn decode(&self, kind: MessageKind, msg: &serde_json::Value) -> Result<InboundRecord, RaptorError> {
        let translate = self
            .translators
            .read()
            .get(&kind)
            .copied()
            .ok_or(RaptorError::NoTranslator(kind))?;
        translate(msg.clone())
    }
}

impl BridgeTransport for LocalBridge {
    fn descriptor(&self) -> &BridgeDescriptor {
        &self.descriptor
    }

    fn register_translator(&self, kind: MessageKind, translate: TranslateFn) {
        self.translators.write().insert(kind, translate);
    }

    fn has_translator(&self, kind: MessageKind) -> bool {
        self.translators.read().contains_key(&kind)
    }

    fn subscribe(
        &self,
        topic: &str,
        kind: MessageKind,
        callback: RecordCallback,
    ) -> Result<SubscriptionId, RaptorError> {
        if !self.has_translator(kind) {
            return Err(RaptorError::NoTranslator(kind));
        }
        let id = SubscriptionId::new();
        self.subscriptions.write().push(Subscription {
            id,
            topic: topic.to_string(),
            kind,
            callback: Arc::from(callback),
        });
        debug!(topic, kind = %kind, id = %id, "subscribed");
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscriptions.write();
        let before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() != before
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::translator_for;
    use parking_lot::Mutex;
    use raptor_types::{RaptorMockupCommand, RosTime};

    fn ros2_bridge() -> LocalBridge {
        LocalBridge::new(BridgeDescriptor::new(Some("ROS2 bridge"), Some("ROS2")))
    }

    fn collecting(bridge: &LocalBridge, topic: &str, kind: MessageKind) -> Arc<Mutex<Vec<InboundRecord>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bridge.register_translator(kind, translator_for(kind));
        bridge
            .subscribe(topic, kind, Box::new(move |rec| sink.lock().push(rec)))
            .unwrap();
        seen
    }

    #[test]
    fn descriptor_allow_list() {
        assert!(BridgeDescriptor::new(Some("ROS"), None).is_supported());
        assert!(BridgeDescriptor::new(None, Some("ROS2")).is_supported());
        assert!(BridgeDescriptor::new(Some("custom"), Some("ROS2_Bridge_GAIA")).is_supported());
        assert!(!BridgeDescriptor::new(Some("Cyber"), Some("CyberRT")).is_supported());
        assert!(!BridgeDescriptor::new(Some("ros"), Some("ros2")).is_supported());
        assert!(!BridgeDescriptor::default().is_supported());
    }

    #[test]
    fn subscribe_without_translator_fails() {
        let bridge = ros2_bridge();
        let result = bridge.subscribe("/cmd", MessageKind::VehicleCommand, Box::new(|_| {}));
        assert!(matches!(result, Err(RaptorError::NoTranslator(MessageKind::VehicleCommand))));
        assert_eq!(bridge.subscription_count(), 0);
    }

    #[test]
    fn ingest_frame_delivers_translated_record() {
        let bridge = ros2_bridge();
        let seen = collecting(&bridge, "/raptor/mockup", MessageKind::RaptorMockupCommand);

        let frame = r#"{"op":"publish","topic":"/raptor/mockup","msg":{"vehicle_number":5,"engine_ignition_command":true,"emergency_stop_command":false}}"#;
        assert_eq!(bridge.ingest_frame(frame).unwrap(), 1);

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        match seen[0] {
            InboundRecord::MockupCommand(r) => {
                assert_eq!(r.vehicle_number, 5);
                assert!(r.engine_ignition_command);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn unsubscribed_topic_and_non_publish_ops_reach_nobody() {
        let bridge = ros2_bridge();
        let seen = collecting(&bridge, "/raptor/mockup", MessageKind::RaptorMockupCommand);

        assert_eq!(bridge.ingest_frame(r#"{"op":"publish","topic":"/other","msg":{}}"#).unwrap(), 0);
        assert_eq!(bridge.ingest_frame(r#"{"op":"subscribe","topic":"/raptor/mockup"}"#).unwrap(), 0);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn malformed_frames_are_parsing_errors() {
        let bridge = ros2_bridge();
        let _seen = collecting(&bridge, "/raptor/mockup", MessageKind::RaptorMockupCommand);

        assert!(matches!(bridge.ingest_frame("not json"), Err(RaptorError::Parsing(_))));
        assert!(matches!(
            bridge.ingest_frame(r#"{"op":"publish","msg":{}}"#),
            Err(RaptorError::Parsing(_))
        ));
        assert!(matches!(
            bridge.ingest_frame(r#"{"op":"publish","topic":"/raptor/mockup"}"#),
            Err(RaptorError::Parsing(_))
        ));
        assert!(matches!(
            bridge.ingest_frame(r#"{"op":"publish","topic":"/raptor/mockup","msg":{"vehicle_number":1}}"#),
            Err(RaptorError::Parsing(_))
        ));
    }

    #[test]
    fn publish_typed_message_and_unsubscribe() {
        let bridge = ros2_bridge();
        let seen = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&seen);
        bridge.register_translator(
            MessageKind::RaptorMockupCommand,
            translator_for(MessageKind::RaptorMockupCommand),
        );
        let id = bridge
            .subscribe(
                "/m",
                MessageKind::RaptorMockupCommand,
                Box::new(move |_| *counter.lock() += 1),
            )
            .unwrap();

        let msg = RaptorMockupCommand {
            stamp: RosTime::default(),
            vehicle_number: 1,
            engine_ignition_command: false,
            emergency_stop_command: false,
        };
        assert_eq!(bridge.publish("/m", &msg).unwrap(), 1);
        assert!(bridge.unsubscribe(id));
        assert!(!bridge.unsubscribe(id));
        assert_eq!(bridge.publish("/m", &msg).unwrap(), 0);
        assert_eq!(*seen.lock(), 1);
    }

    #[test]
    fn shared_topic_delivers_to_every_subscriber_that_can_decode() {
        let bridge = ros2_bridge();
        let commands = collecting(&bridge, "/rc", MessageKind::VehicleCommand);
        let statuses = collecting(&bridge, "/rc", MessageKind::VehicleStatus);

        let status = r#"{"op":"publish","topic":"/rc","msg":{"header":{"vehicle_number":7,"sequence_number":2},"flags_received":0,"flags_met":0,"position_command_progress":0,"location":1,"ct_state":5,"sys_state":0}}"#;
        assert_eq!(bridge.ingest_frame(status).unwrap(), 1);
        assert!(commands.lock().is_empty());
        match statuses.lock().as_slice() {
            [InboundRecord::Status(r)] => assert_eq!(r.ct_state, 5),
            other => panic!("unexpected records {other:?}"),
        }

        let command = r#"{"op":"publish","topic":"/rc","msg":{"header":{"vehicle_number":7,"sequence_number":3},"flags":1,"position_command":0,"track_position":0,"laps":0,"laps_fraction":0}}"#;
        assert_eq!(bridge.ingest_frame(command).unwrap(), 1);
        assert_eq!(commands.lock().len(), 1);
        assert_eq!(statuses.lock().len(), 1);
    }

    #[test]
    fn shared_topic_fails_only_when_nobody_decodes() {
        let bridge = ros2_bridge();
        let commands = collecting(&bridge, "/rc", MessageKind::VehicleCommand);
        let statuses = collecting(&bridge, "/rc", MessageKind::VehicleStatus);

        let junk = r#"{"op":"publish","topic":"/rc","msg":{"vehicle_number":1}}"#;
        assert!(matches!(bridge.ingest_frame(junk), Err(RaptorError::Parsing(_))));
        assert!(commands.lock().is_empty());
        assert!(statuses.lock().is_empty());
    }

    #[test]
    fn callbacks_may_touch_the_bridge_during_delivery() {
        let bridge = Arc::new(ros2_bridge());
        bridge.register_translator(
            MessageKind::RaptorMockupCommand,
            translator_for(MessageKind::RaptorMockupCommand),
        );
        let inner = Arc::clone(&bridge);
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&counts);
        bridge
            .subscribe(
                "/m",
                MessageKind::RaptorMockupCommand,
                Box::new(move |_| sink.lock().push(inner.subscription_count())),
            )
            .unwrap();

        let frame = r#"{"op":"publish","topic":"/m","msg":{"vehicle_number":1,"engine_ignition_command":false,"emergency_stop_command":false}}"#;
        bridge.ingest_frame(frame).unwrap();
        assert_eq!(*counts.lock(), vec![1]);
    }
}
