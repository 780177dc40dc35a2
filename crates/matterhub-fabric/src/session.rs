//! Secure-session establishment seam.
//!
//! Session cryptography and the CASE handshake live in the external
//! stack. The orchestrator only asks for a session and observes the
//! outcome through completion callbacks, which run on whatever thread
//! the underlying transport completes on – never assume the caller's
//! thread.

use matterhub_types::{FabricIndex, NodeId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A request to establish a CASE session with one peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishRequest {
    pub peer: NodeId,
    pub fabric_index: FabricIndex,
}

/// Opaque handle to an established secure session.
///
/// Carries enough identity for logging and for addressing follow-up
/// attribute traffic; the cryptographic state stays inside the stack.
pub trait SecureSession: Send + Sync {
    fn peer(&self) -> NodeId;
    fn fabric_index(&self) -> FabricIndex;
}

/// Callback invoked when session establishment succeeds.
pub type SessionSuccess = Box<dyn FnOnce(Arc<dyn SecureSession>) + Send>;

/// Callback invoked when session establishment fails, with the peer it
/// was for and the stack's error code.
pub type SessionFailure = Box<dyn FnOnce(NodeId, u32) + Send>;

/// The external stack's session-establishment primitive.
pub trait SessionBroker: Send + Sync {
    /// Begin establishing a session with `request.peer`.
    ///
    /// Returns immediately; exactly one of the two callbacks fires later,
    /// on an unspecified thread.
    fn establish(&self, request: EstablishRequest, on_success: SessionSuccess, on_failure: SessionFailure);
}
