//! [`AccessGrantProvisioner`] – commits one access-control entry per
//! newly commissioned peer.
//!
//! The entry is fully populated in memory first, then handed to the
//! store in a single create call; the store's own transactional
//! semantics guarantee that a failed grant leaves no partial entry
//! behind. A failed sub-step aborts the whole grant and names the step
//! in the returned error.
//!
//! Current policy: every grant uses privilege "operate" and auth mode
//! CASE, and call sites pass vendor/product filters of 0 (any) so any
//! commissioned peer may bind.

use std::sync::Arc;

use matterhub_fabric::{AccessControlStore, AccessGrantEntry};
use matterhub_types::{AuthMode, FabricIndex, GrantStep, HubError, NodeId, Privilege};
use tracing::{error, info};

/// Builds and submits access-control entries authorizing peers to invoke
/// operations on the gateway's exposed endpoints.
pub struct AccessGrantProvisioner {
    store: Arc<dyn AccessControlStore>,
}

impl AccessGrantProvisioner {
    pub fn new(store: Arc<dyn AccessControlStore>) -> Self {
        Self { store }
    }

    /// Grant `peer` operate-level CASE access on `fabric_index`.
    ///
    /// At-least-once semantics: granting the same peer twice commits two
    /// entries; the store is not asked to deduplicate.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::AccessControl`] naming the sub-step that
    /// failed; nothing is committed in that case.
    pub fn grant(
        &self,
        peer: NodeId,
        fabric_index: FabricIndex,
        vendor_filter: u16,
        product_filter: u16,
    ) -> Result<(), HubError> {
        let entry = build_entry(peer, fabric_index, vendor_filter, product_filter)
            .inspect_err(|e| error!(%peer, "grant aborted: {e}"))?;

        self.store
            .create_entry(&entry)
            .inspect_err(|e| error!(%peer, fabric_index, "grant commit failed: {e}"))?;

        info!(%peer, fabric_index, "access grant committed (operate/CASE)");
        Ok(())
    }
}

/// Populate the entry in memory, validating each assignment.
fn build_entry(
    peer: NodeId,
    fabric_index: FabricIndex,
    vendor_filter: u16,
    product_filter: u16,
) -> Result<AccessGrantEntry, HubError> {
    if fabric_index == 0 {
        // Fabric index 0 is reserved and never a valid grant scope.
        return Err(HubError::AccessControl {
            step: GrantStep::FabricAssign,
            details: "fabric index 0 is reserved".to_string(),
        });
    }
    if peer.0 == 0 {
        return Err(HubError::AccessControl {
            step: GrantStep::SubjectAssign,
            details: "subject address 0 is not an operational node id".to_string(),
        });
    }
    Ok(AccessGrantEntry {
        fabric_index,
        privilege: Privilege::Operate,
        auth_mode: AuthMode::Case,
        subject: peer,
        target_vendor: vendor_filter,
        target_product: product_filter,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Store double that records committed entries and can be switched
    /// into a rejecting mode.
    pub(crate) struct MockStore {
        pub entries: Mutex<Vec<AccessGrantEntry>>,
        pub reject: bool,
    }

    impl MockStore {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                entries: Mutex::new(Vec::new()),
                reject: false,
            })
        }
    }

    impl AccessControlStore for MockStore {
        fn create_entry(&self, entry: &AccessGrantEntry) -> Result<(), HubError> {
            if self.reject {
                return Err(HubError::AccessControl {
                    step: GrantStep::Commit,
                    details: "store rejected entry".to_string(),
                });
            }
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    #[test]
    fn grant_commits_operate_case_entry() {
        let store = MockStore::new();
        let provisioner = AccessGrantProvisioner::new(store.clone());

        provisioner.grant(NodeId(0x90034FD9068DFF14), 1, 0, 0).unwrap();

        let entries = store.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subject, NodeId(0x90034FD9068DFF14));
        assert_eq!(entries[0].fabric_index, 1);
        assert_eq!(entries[0].privilege, Privilege::Operate);
        assert_eq!(entries[0].auth_mode, AuthMode::Case);
        assert_eq!(entries[0].target_vendor, 0);
        assert_eq!(entries[0].target_product, 0);
    }

    #[test]
    fn granting_twice_commits_two_entries() {
        // Documents the current at-least-once contract: no implicit dedup.
        let store = MockStore::new();
        let provisioner = AccessGrantProvisioner::new(store.clone());

        provisioner.grant(NodeId(0x42), 1, 0, 0).unwrap();
        provisioner.grant(NodeId(0x42), 1, 0, 0).unwrap();

        assert_eq!(store.entries.lock().unwrap().len(), 2);
    }

    #[test]
    fn reserved_fabric_index_aborts_at_fabric_assign() {
        let store = MockStore::new();
        let provisioner = AccessGrantProvisioner::new(store.clone());

        let err = provisioner.grant(NodeId(0x42), 0, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            HubError::AccessControl {
                step: GrantStep::FabricAssign,
                ..
            }
        ));
        assert!(store.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn zero_subject_aborts_at_subject_assign() {
        let store = MockStore::new();
        let provisioner = AccessGrantProvisioner::new(store.clone());

        let err = provisioner.grant(NodeId(0), 1, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            HubError::AccessControl {
                step: GrantStep::SubjectAssign,
                ..
            }
        ));
        assert!(store.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn store_rejection_surfaces_commit_step_and_leaves_nothing() {
        let store = Arc::new(MockStore {
            entries: Mutex::new(Vec::new()),
            reject: true,
        });
        let provisioner = AccessGrantProvisioner::new(store.clone());

        let err = provisioner.grant(NodeId(0x42), 1, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            HubError::AccessControl {
                step: GrantStep::Commit,
                ..
            }
        ));
        assert!(store.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn vendor_and_product_filters_pass_through() {
        let store = MockStore::new();
        let provisioner = AccessGrantProvisioner::new(store.clone());

        provisioner.grant(NodeId(0x42), 1, 0xFFF1, 0x8001).unwrap();

        let entries = store.entries.lock().unwrap();
        assert_eq!(entries[0].target_vendor, 0xFFF1);
        assert_eq!(entries[0].target_product, 0x8001);
    }
}
