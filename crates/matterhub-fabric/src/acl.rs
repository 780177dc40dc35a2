//! Access-control store seam and the grant entry record.
//!
//! The store itself (persistence, ACL evaluation, transactionality) is
//! owned by the external stack; this crate only defines the shape of an
//! entry and the one call used to commit it.

use matterhub_types::{AuthMode, FabricIndex, HubError, NodeId, Privilege};
use serde::{Deserialize, Serialize};

/// A fully populated access-control entry, built in memory before the
/// single atomic create call.
///
/// `target_vendor` / `target_product` are capability filters; `0` means
/// "any" and is the current policy for every grant the gateway issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrantEntry {
    pub fabric_index: FabricIndex,
    pub privilege: Privilege,
    pub auth_mode: AuthMode,
    pub subject: NodeId,
    pub target_vendor: u16,
    pub target_product: u16,
}

/// The shared access-control store of the fabric stack.
///
/// Implementations must be internally thread-safe: entries are committed
/// from whatever thread the stack delivers commissioning events on.
pub trait AccessControlStore: Send + Sync {
    /// Commit one new entry scoped to `entry.fabric_index`.
    ///
    /// The call is atomic from the caller's perspective: on error no
    /// partial entry persists (the store's own transactional semantics
    /// are relied upon, not reimplemented here).
    ///
    /// # Errors
    ///
    /// Returns [`HubError::AccessControl`] when the store rejects the
    /// entry.
    fn create_entry(&self, entry: &AccessGrantEntry) -> Result<(), HubError>;
}
