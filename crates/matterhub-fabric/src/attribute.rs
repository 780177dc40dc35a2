//! Attribute read/write transport seam.
//!
//! One trait, two calls. The stack owns message framing, retries and
//! session bookkeeping; callers address attributes by
//! endpoint/cluster/attribute path and exchange typed values.

use crate::session::SecureSession;
use matterhub_types::{EndpointId, HubError, NodeId};
use serde::{Deserialize, Serialize};

/// Binding cluster on the peer (holds the list of gateway endpoints the
/// peer may reach).
pub const BINDING_CLUSTER: u32 = 0x001E;
/// The binding-list attribute inside [`BINDING_CLUSTER`].
pub const BINDING_LIST_ATTRIBUTE: u32 = 0x0000;

/// Basic Information cluster (device metadata).
pub const BASIC_INFORMATION_CLUSTER: u32 = 0x0028;
/// Product-name attribute inside [`BASIC_INFORMATION_CLUSTER`].
pub const PRODUCT_NAME_ATTRIBUTE: u32 = 0x0003;

/// Address of one attribute instance on the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePath {
    pub endpoint: EndpointId,
    pub cluster: u32,
    pub attribute: u32,
}

/// One entry of a peer-held binding list: "you may reach `endpoint` on
/// node `node`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingTarget {
    pub node: NodeId,
    pub endpoint: EndpointId,
}

/// Attribute values the gateway reads or writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Bindings(Vec<BindingTarget>),
    Unsigned(u64),
    Text(String),
}

/// Attribute transport over an established session.
pub trait AttributeClient: Send + Sync {
    /// Write `value` to `path` on the session's peer in one message.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Transport`] when the write does not complete.
    fn write_attribute(
        &self,
        session: &dyn SecureSession,
        path: AttributePath,
        value: AttributeValue,
    ) -> Result<(), HubError>;

    /// Read the value at `path` from the session's peer.
    fn read_attribute(
        &self,
        session: &dyn SecureSession,
        path: AttributePath,
    ) -> Result<AttributeValue, HubError>;
}
