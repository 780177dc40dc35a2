//! [`SessionCoordinator`] – deferred CASE session establishment.
//!
//! Commissioning events are delivered on the external stack's own
//! callback threads, and calling back into the stack's session machinery
//! from there would re-enter its event loop. The coordinator therefore
//! only records the request and enqueues a work item on the
//! [`DeferredExecutor`]; the establish call happens on that context.
//!
//! Pending state is a single slot, most-recent-wins: scheduling a second
//! peer before the first deferred tick runs overwrites the first request,
//! which is then silently dropped. A superseded work item finds the slot
//! empty and returns. Establishment failure is logged and abandoned –
//! there is no retry path.

use std::sync::{Arc, Mutex};

use matterhub_fabric::{
    AttributeClient, AttributePath, AttributeValue, DeferredExecutor, EstablishRequest,
    SecureSession, SessionBroker, BASIC_INFORMATION_CLUSTER, PRODUCT_NAME_ATTRIBUTE,
};
use matterhub_types::{FabricIndex, HubError, NodeId};
use tracing::{debug, error, warn};

use crate::binding::BindingWriter;
use crate::directory::DeviceDirectory;

pub struct SessionCoordinator {
    pending: Mutex<Option<EstablishRequest>>,
    executor: Arc<dyn DeferredExecutor>,
    broker: Arc<dyn SessionBroker>,
    binding_writer: Arc<BindingWriter>,
    attributes: Arc<dyn AttributeClient>,
    directory: Arc<DeviceDirectory>,
}

impl SessionCoordinator {
    pub fn new(
        executor: Arc<dyn DeferredExecutor>,
        broker: Arc<dyn SessionBroker>,
        binding_writer: Arc<BindingWriter>,
        attributes: Arc<dyn AttributeClient>,
        directory: Arc<DeviceDirectory>,
    ) -> Arc<Self> {
        Arc::new(Self {
            pending: Mutex::new(None),
            executor,
            broker,
            binding_writer,
            attributes,
            directory,
        })
    }

    /// Record a pending establish request and enqueue a deferred tick.
    ///
    /// Returns immediately. An unconsumed earlier request is overwritten
    /// (and logged); its binding setup will not happen.
    pub fn schedule_establish(self: &Arc<Self>, peer: NodeId, fabric_index: FabricIndex) {
        let request = EstablishRequest { peer, fabric_index };
        let superseded = self.pending.lock().unwrap().replace(request);
        if let Some(old) = superseded {
            warn!(
                dropped = %old.peer,
                replacement = %peer,
                "pending session request superseded before its deferred tick"
            );
        }

        let this = Arc::clone(self);
        self.executor.schedule(Box::new(move || this.run_pending()));
    }

    /// The deferred tick: consume the slot and drive the broker.
    fn run_pending(self: Arc<Self>) {
        let Some(request) = self.pending.lock().unwrap().take() else {
            // This tick was superseded by a later schedule_establish.
            debug!("deferred session tick found no pending request");
            return;
        };

        let writer = Arc::clone(&self.binding_writer);
        let attributes = Arc::clone(&self.attributes);
        let directory = Arc::clone(&self.directory);
        self.broker.establish(
            request,
            Box::new(move |session| {
                if let Err(e) = writer.write_bindings(session.as_ref()) {
                    error!(peer = %session.peer(), "binding write after session establishment failed: {e}");
                    return;
                }
                // The session is the only window for attribute reads, so
                // the model-name cache is filled here; later listings
                // serve the cached value.
                let key = session.peer().to_string();
                match directory.model_name(&key, || {
                    read_product_name(attributes.as_ref(), session.as_ref())
                }) {
                    Ok(model) => debug!(peer = %session.peer(), model, "peer model name cached"),
                    Err(e) => warn!(peer = %session.peer(), "model name read failed: {e}"),
                }
            }),
            Box::new(|peer, code| {
                // Log and abandon; no retry in the current design.
                let err = HubError::Session { peer, code };
                error!("{err}; abandoned");
            }),
        );
    }
}

/// Read the peer's product name from its Basic Information cluster
/// (always hosted on endpoint 0).
fn read_product_name(
    client: &dyn AttributeClient,
    session: &dyn SecureSession,
) -> Result<String, HubError> {
    let path = AttributePath {
        endpoint: 0,
        cluster: BASIC_INFORMATION_CLUSTER,
        attribute: PRODUCT_NAME_ATTRIBUTE,
    };
    match client.read_attribute(session, path)? {
        AttributeValue::Text(name) => Ok(name),
        other => Err(HubError::Transport(format!(
            "unexpected product-name value: {other:?}"
        ))),
    }
}
