//! [`BindingWriter`] – asserts "peer X may reach gateway endpoints {E}"
//! on a freshly established session.
//!
//! The whole ordered endpoint list goes out in one attribute write; there
//! is no chunking or resumable state, so the list must fit the
//! transport's single-message limit (inherited constraint, not enforced
//! here). Re-invoking with the same list re-asserts the same binding
//! state, so the call is idempotent from the caller's perspective.

use std::sync::Arc;

use matterhub_fabric::{
    AttributeClient, AttributePath, AttributeValue, BindingTarget, SecureSession, BINDING_CLUSTER,
    BINDING_LIST_ATTRIBUTE,
};
use matterhub_types::{EndpointId, HubError, NodeId};
use tracing::info;

pub struct BindingWriter {
    client: Arc<dyn AttributeClient>,
    /// The gateway's own node id – the node the peer's bindings point at.
    local_node: NodeId,
    /// Gateway endpoints exposed to peers, in the order they are written.
    local_endpoints: Vec<EndpointId>,
    /// Endpoint on the peer hosting its binding cluster.
    peer_binding_endpoint: EndpointId,
}

impl BindingWriter {
    pub fn new(
        client: Arc<dyn AttributeClient>,
        local_node: NodeId,
        local_endpoints: Vec<EndpointId>,
    ) -> Self {
        Self {
            client,
            local_node,
            local_endpoints,
            peer_binding_endpoint: 1,
        }
    }

    /// Write the full binding list to the session's peer.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Transport`] when the single write does not
    /// complete; no partial binding state is assumed on the peer.
    pub fn write_bindings(&self, session: &dyn SecureSession) -> Result<(), HubError> {
        let targets: Vec<BindingTarget> = self
            .local_endpoints
            .iter()
            .map(|&endpoint| BindingTarget {
                node: self.local_node,
                endpoint,
            })
            .collect();

        let path = AttributePath {
            endpoint: self.peer_binding_endpoint,
            cluster: BINDING_CLUSTER,
            attribute: BINDING_LIST_ATTRIBUTE,
        };
        self.client
            .write_attribute(session, path, AttributeValue::Bindings(targets))?;

        info!(
            peer = %session.peer(),
            endpoints = self.local_endpoints.len(),
            "capability bindings written"
        );
        Ok(())
    }
}
