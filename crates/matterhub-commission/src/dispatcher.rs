//! [`CommissioningDispatcher`] – entry point for device-lifecycle events.
//!
//! The external stack delivers events synchronously on its own callback
//! threads. Access grants happen *inside* the handler, before it
//! returns: the event's return is what unblocks the peer's next protocol
//! step, so a grant deferred past that point would lose the race against
//! the peer's own discovery traffic. The store commit itself is
//! microsecond-scale. Session establishment, by contrast, is always
//! pushed to the deferred context via the [`SessionCoordinator`].

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use matterhub_types::{CommissioningEvent, DeviceClass, EndpointId, FabricIndex, NodeId};
use tracing::{debug, info, warn};

use crate::directory::DeviceDirectory;
use crate::grant::AccessGrantProvisioner;
use crate::session::SessionCoordinator;

pub struct CommissioningDispatcher {
    provisioner: AccessGrantProvisioner,
    coordinator: Arc<SessionCoordinator>,
    directory: Arc<DeviceDirectory>,
    fabric_index: FabricIndex,
    /// Peers already granted this run. configuration-completed is the
    /// authoritative grant point when present; this set keeps the later
    /// device-added event for the same peer from double-granting.
    granted: Mutex<HashSet<NodeId>>,
}

impl CommissioningDispatcher {
    pub fn new(
        provisioner: AccessGrantProvisioner,
        coordinator: Arc<SessionCoordinator>,
        directory: Arc<DeviceDirectory>,
        fabric_index: FabricIndex,
    ) -> Self {
        Self {
            provisioner,
            coordinator,
            directory,
            fabric_index,
            granted: Mutex::new(HashSet::new()),
        }
    }

    /// Route one inbound event. Never panics on malformed input; bad
    /// events are logged and dropped.
    pub fn handle(&self, event: CommissioningEvent) {
        match event {
            CommissioningEvent::ConfigurationCompleted { device_id, success } => {
                self.on_configuration_completed(&device_id, success);
            }
            CommissioningEvent::DeviceAdded {
                device_id,
                device_class,
            } => {
                self.on_device_added(&device_id, device_class);
            }
            CommissioningEvent::EndpointAdded {
                device_id,
                endpoint_id,
                uri,
                ..
            } => {
                self.on_endpoint_added(&device_id, endpoint_id, &uri);
            }
            CommissioningEvent::DeviceRemoved { device_id } => {
                self.on_device_removed(&device_id);
            }
        }
    }

    /// First opportunity to grant: the stack has discovered the peer's
    /// endpoints but not yet registered it. The grant must complete
    /// before this handler returns.
    fn on_configuration_completed(&self, device_id: &str, success: bool) {
        if !success {
            warn!(device_id, "device configuration reported failure; no grant");
            return;
        }
        let Some(peer) = self.decode(device_id) else {
            return;
        };
        self.grant_once(peer);
    }

    /// Commissioning fully completed. Grants (if configuration-completed
    /// did not already) and queues binding setup for the deferred tick.
    fn on_device_added(&self, device_id: &str, device_class: DeviceClass) {
        if device_class != DeviceClass::Matter {
            debug!(device_id, ?device_class, "ignoring non-matter device");
            return;
        }
        let Some(peer) = self.decode(device_id) else {
            return;
        };
        self.grant_once(peer);
        self.coordinator.schedule_establish(peer, self.fabric_index);
    }

    /// Directory entries are keyed by the canonical (zero-padded,
    /// upper-hex) identity so event-recorded URIs and session-time
    /// metadata land under the same key.
    fn on_endpoint_added(&self, device_id: &str, endpoint_id: EndpointId, uri: &str) {
        if device_id.is_empty() {
            warn!("endpoint-added with empty device id dropped");
            return;
        }
        let Some(peer) = self.decode(device_id) else {
            return;
        };
        self.directory.record_endpoint(&peer.to_string(), uri);
        info!(device_id, endpoint_id, uri, "peer endpoint recorded");
    }

    fn on_device_removed(&self, device_id: &str) {
        if let Ok(peer) = NodeId::decode(device_id) {
            self.directory.remove(&peer.to_string());
            self.granted.lock().unwrap().remove(&peer);
        }
        info!(device_id, "device removed from directory");
    }

    fn decode(&self, device_id: &str) -> Option<NodeId> {
        match NodeId::decode(device_id) {
            Ok(peer) => Some(peer),
            Err(e) => {
                warn!(device_id, "dropping event: {e}");
                None
            }
        }
    }

    /// Grant access synchronously unless this peer was already granted.
    /// On failure the peer stays ungranted so a later lifecycle event can
    /// attempt the grant again (no retry from inside this callback).
    fn grant_once(&self, peer: NodeId) {
        if !self.granted.lock().unwrap().insert(peer) {
            debug!(%peer, "peer already granted; skipping");
            return;
        }
        // Vendor/product filters: any. Intentionally permissive so any
        // commissioned peer may bind.
        if self.provisioner.grant(peer, self.fabric_index, 0, 0).is_err() {
            self.granted.lock().unwrap().remove(&peer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::tests::MockClient;
    use crate::binding::BindingWriter;
    use crate::grant::tests::MockStore;
    use crate::session::tests::{BrokerMode, ManualExecutor, MockBroker};
    use matterhub_types::{AuthMode, Privilege};

    struct Fixture {
        dispatcher: CommissioningDispatcher,
        store: Arc<MockStore>,
        broker: Arc<MockBroker>,
        executor: Arc<ManualExecutor>,
        directory: Arc<DeviceDirectory>,
    }

    fn fixture() -> Fixture {
        let store = MockStore::new();
        let executor = Arc::new(ManualExecutor::default());
        let broker = MockBroker::new(BrokerMode::Succeed);
        let client = MockClient::new();
        let writer = Arc::new(BindingWriter::new(client.clone(), NodeId(0xAA), vec![1, 3]));
        let directory = Arc::new(DeviceDirectory::new());
        let coordinator = SessionCoordinator::new(
            executor.clone(),
            broker.clone(),
            writer,
            client,
            directory.clone(),
        );
        let dispatcher = CommissioningDispatcher::new(
            AccessGrantProvisioner::new(store.clone()),
            coordinator,
            directory.clone(),
            1,
        );
        Fixture {
            dispatcher,
            store,
            broker,
            executor,
            directory,
        }
    }

    #[test]
    fn configuration_completed_grants_synchronously() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::ConfigurationCompleted {
            device_id: "90034FD9068DFF14".to_string(),
            success: true,
        });

        // Entry must exist before any deferred work runs.
        let entries = f.store.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subject, NodeId(0x90034FD9068DFF14));
        assert_eq!(entries[0].fabric_index, 1);
        assert_eq!(entries[0].privilege, Privilege::Operate);
        assert_eq!(entries[0].auth_mode, AuthMode::Case);
    }

    #[test]
    fn empty_device_id_makes_no_grant_and_does_not_panic() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::ConfigurationCompleted {
            device_id: String::new(),
            success: true,
        });
        assert!(f.store.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_configuration_makes_no_grant() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::ConfigurationCompleted {
            device_id: "1234".to_string(),
            success: false,
        });
        assert!(f.store.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn malformed_device_id_makes_no_grant() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::ConfigurationCompleted {
            device_id: "ZZZZ".to_string(),
            success: true,
        });
        assert!(f.store.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn device_added_grants_and_schedules_establish() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::DeviceAdded {
            device_id: "1234".to_string(),
            device_class: DeviceClass::Matter,
        });

        assert_eq!(f.store.entries.lock().unwrap().len(), 1);
        // The grant is in-handler; establishment waits for the tick.
        assert!(f.broker.requests.lock().unwrap().is_empty());

        f.executor.run_all();
        let requests = f.broker.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].peer, NodeId(0x1234));
    }

    #[test]
    fn non_matter_device_added_is_ignored() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::DeviceAdded {
            device_id: "1234".to_string(),
            device_class: DeviceClass::Other("zigbee".to_string()),
        });

        assert!(f.store.entries.lock().unwrap().is_empty());
        f.executor.run_all();
        assert!(f.broker.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn configuration_completed_then_device_added_grants_once() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::ConfigurationCompleted {
            device_id: "1234".to_string(),
            success: true,
        });
        f.dispatcher.handle(CommissioningEvent::DeviceAdded {
            device_id: "1234".to_string(),
            device_class: DeviceClass::Matter,
        });

        // configuration-completed was authoritative; one entry only.
        assert_eq!(f.store.entries.lock().unwrap().len(), 1);

        // Binding setup still proceeds from device-added.
        f.executor.run_all();
        assert_eq!(f.broker.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn endpoint_added_records_uri_without_acl_change() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::EndpointAdded {
            device_id: "1234".to_string(),
            endpoint_id: 3,
            uri: "matter://1234/ep/3".to_string(),
            profile: "casting-videoplayer".to_string(),
            profile_version: 1,
        });

        assert!(f.store.entries.lock().unwrap().is_empty());
        // Stored under the canonical identity, not the raw event string.
        assert_eq!(
            f.directory
                .record("0000000000001234")
                .unwrap()
                .endpoint_uri
                .as_deref(),
            Some("matter://1234/ep/3")
        );
        assert!(f.directory.record("1234").is_none());
    }

    #[test]
    fn malformed_endpoint_added_id_is_dropped() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::EndpointAdded {
            device_id: "ZZZZ".to_string(),
            endpoint_id: 1,
            uri: "uri".to_string(),
            profile: "p".to_string(),
            profile_version: 1,
        });
        assert!(f.directory.device_ids().is_empty());
    }

    #[test]
    fn device_removed_clears_directory_and_grant_marker() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::DeviceAdded {
            device_id: "1234".to_string(),
            device_class: DeviceClass::Matter,
        });
        f.dispatcher.handle(CommissioningEvent::EndpointAdded {
            device_id: "1234".to_string(),
            endpoint_id: 1,
            uri: "uri".to_string(),
            profile: "p".to_string(),
            profile_version: 1,
        });

        f.dispatcher.handle(CommissioningEvent::DeviceRemoved {
            device_id: "1234".to_string(),
        });
        assert!(f.directory.record("0000000000001234").is_none());

        // Re-commissioning the same peer grants again.
        f.dispatcher.handle(CommissioningEvent::DeviceAdded {
            device_id: "1234".to_string(),
            device_class: DeviceClass::Matter,
        });
        assert_eq!(f.store.entries.lock().unwrap().len(), 2);
    }

    #[test]
    fn two_peers_in_quick_succession_keep_only_latest_pending() {
        let f = fixture();
        f.dispatcher.handle(CommissioningEvent::DeviceAdded {
            device_id: "1111".to_string(),
            device_class: DeviceClass::Matter,
        });
        f.dispatcher.handle(CommissioningEvent::DeviceAdded {
            device_id: "2222".to_string(),
            device_class: DeviceClass::Matter,
        });

        // Both peers were granted access...
        assert_eq!(f.store.entries.lock().unwrap().len(), 2);

        // ...but the single-slot coordinator services only the latest.
        f.executor.run_all();
        let requests = f.broker.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].peer, NodeId(0x2222));
    }
}
