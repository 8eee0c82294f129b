//! Registration adapter: installs this adapter's translators on a bridge.
//!
//! [`RaptorBridgePlugin`] carries the message kinds of one schema family.
//! Given a bridge, it checks the bridge identity against the allow-list and,
//! if it matches, installs exactly one translator per kind.  An unknown bridge
//! is not an error: nothing is installed and [`Registration::NotInstalled`]
//! is returned.

use raptor_types::MessageKind;
use tracing::{debug, info};

use crate::bridge::{BridgeDescriptor, BridgeTransport};
use crate::translator::{TranslateFn, translator_for};

/// Outcome of [`RaptorBridgePlugin::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Translators were installed for these kinds.
    Installed(Vec<MessageKind>),
    /// The bridge is not one this adapter serves.
    NotInstalled,
}

impl Registration {
    pub fn is_installed(&self) -> bool {
        matches!(self, Registration::Installed(_))
    }
}

/// Translator provider for one schema family.
#[derive(Debug, Clone)]
pub struct RaptorBridgePlugin {
    kinds: Vec<MessageKind>,
}

impl RaptorBridgePlugin {
    /// Plugin serving the given kinds.  Duplicates are dropped.
    pub fn new(kinds: impl IntoIterator<Item = MessageKind>) -> Self {
        let mut unique = Vec::new();
        for kind in kinds {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        Self { kinds: unique }
    }

    /// Full race-control family: command and status.
    pub fn race_control() -> Self {
        Self::new([MessageKind::VehicleCommand, MessageKind::VehicleStatus])
    }

    /// Mockup family: the single combined command.
    pub fn mockup() -> Self {
        Self::new([MessageKind::RaptorMockupCommand])
    }

    pub fn kinds(&self) -> &[MessageKind] {
        &self.kinds
    }

    /// The translators this plugin would install for `descriptor`, or `None`
    /// when the bridge is not supported.
    pub fn translators_for(
        &self,
        descriptor: &BridgeDescriptor,
    ) -> Option<Vec<(MessageKind, TranslateFn)>> {
        if !descriptor.is_supported() {
            return None;
        }
        Some(
            self.kinds
                .iter()
                .map(|&kind| (kind, translator_for(kind)))
                .collect(),
        )
    }

    /// Install translators on `bridge` if its identity is supported.
    pub fn register(&self, bridge: &dyn BridgeTransport) -> Registration {
        let descriptor = bridge.descriptor();
        let Some(translators) = self.translators_for(descriptor) else {
            debug!(bridge = %descriptor, "bridge not supported; no translators installed");
            return Registration::NotInstalled;
        };

        let mut installed = Vec::with_capacity(translators.len());
        for (kind, translate) in translators {
            bridge.register_translator(kind, translate);
            installed.push(kind);
        }
        info!(bridge = %descriptor, kinds = ?installed, "raptor translators installed");
        Registration::Installed(installed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::LocalBridge;

    #[test]
    fn race_control_installs_command_and_status() {
        let bridge = LocalBridge::new(BridgeDescriptor::new(None, Some("ROS2")));
        let reg = RaptorBridgePlugin::race_control().register(&bridge);
        assert_eq!(
            reg,
            Registration::Installed(vec![MessageKind::VehicleCommand, MessageKind::VehicleStatus])
        );
        assert!(bridge.has_translator(MessageKind::VehicleCommand));
        assert!(bridge.has_translator(MessageKind::VehicleStatus));
        assert!(!bridge.has_translator(MessageKind::RaptorMockupCommand));
    }

    #[test]
    fn mockup_installs_single_translator() {
        let bridge = LocalBridge::new(BridgeDescriptor::new(Some("ROS"), None));
        let reg = RaptorBridgePlugin::mockup().register(&bridge);
        assert_eq!(reg, Registration::Installed(vec![MessageKind::RaptorMockupCommand]));
        assert_eq!(bridge.translator_kinds(), vec![MessageKind::RaptorMockupCommand]);
    }

    #[test]
    fn unsupported_bridge_installs_nothing() {
        let bridge = LocalBridge::new(BridgeDescriptor::new(Some("Cyber"), Some("CyberRT")));
        let reg = RaptorBridgePlugin::race_control().register(&bridge);
        assert_eq!(reg, Registration::NotInstalled);
        assert!(!reg.is_installed());
        assert!(bridge.translator_kinds().is_empty());
        assert_eq!(bridge.subscription_count(), 0);
    }

    #[test]
    fn translators_for_is_none_for_unsupported() {
        let plugin = RaptorBridgePlugin::race_control();
        assert!(plugin.translators_for(&BridgeDescriptor::default()).is_none());
        let list = plugin
            .translators_for(&BridgeDescriptor::new(None, Some("ROS2_Bridge_GAIA")))
            .unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn duplicate_kinds_collapse() {
        let plugin = RaptorBridgePlugin::new([
            MessageKind::VehicleStatus,
            MessageKind::VehicleStatus,
            MessageKind::VehicleCommand,
        ]);
        assert_eq!(plugin.kinds(), &[MessageKind::VehicleStatus, MessageKind::VehicleCommand]);
    }
}
