//! [`GatewayService`] – the facade the host plugin drives.
//!
//! Owns every long-lived instance explicitly (no process-wide
//! singletons): the injection engine, the app launcher, and – once the
//! external stack has come up and handed over its client interfaces –
//! the commissioning pipeline. Until that attach happens the device
//! listing reports "unavailable" rather than failing, so callers can
//! tell "not ready yet" apart from "operation failed".

use std::sync::{Arc, Mutex};

use matterhub_commission::{
    AccessGrantProvisioner, BindingWriter, CommissioningDispatcher, DeviceDirectory,
    SessionCoordinator,
};
use matterhub_fabric::{
    AccessControlStore, AttributeClient, CredentialsProvider, DeferredExecutor,
    NetworkCredentials, SessionBroker, SharedCredentials,
};
use matterhub_input::{InjectionEngine, KeyStatus};
use matterhub_types::{CecKeyCode, CommissioningEvent, EndpointId, FabricIndex, NodeId};
use serde::Serialize;
use tracing::{info, warn};

use crate::launcher::AppLauncher;

/// Whether the commissioning client behind a query was usable at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Ready,
    Unavailable,
}

/// Result of the device-listing query. An empty `device_ids` with
/// status [`Availability::Ready`] means "no devices yet"; with
/// [`Availability::Unavailable`] it means the client is not up.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceListing {
    pub status: Availability,
    pub device_ids: Vec<String>,
}

/// Client interfaces handed over by the external stack on attach.
pub struct StackClient {
    pub store: Arc<dyn AccessControlStore>,
    pub broker: Arc<dyn SessionBroker>,
    pub attributes: Arc<dyn AttributeClient>,
}

struct Pipeline {
    dispatcher: CommissioningDispatcher,
    directory: Arc<DeviceDirectory>,
}

pub struct GatewayService {
    engine: Mutex<InjectionEngine>,
    launcher: AppLauncher,
    executor: Arc<dyn DeferredExecutor>,
    credentials: Arc<SharedCredentials>,
    local_node: NodeId,
    exposed_endpoints: Vec<EndpointId>,
    fabric_index: FabricIndex,
    pipeline: Mutex<Option<Pipeline>>,
}

impl GatewayService {
    pub fn new(
        engine: InjectionEngine,
        launcher: AppLauncher,
        executor: Arc<dyn DeferredExecutor>,
        local_node: NodeId,
        exposed_endpoints: Vec<EndpointId>,
        fabric_index: FabricIndex,
    ) -> Self {
        Self {
            engine: Mutex::new(engine),
            launcher,
            executor,
            credentials: SharedCredentials::new(),
            local_node,
            exposed_endpoints,
            fabric_index,
            pipeline: Mutex::new(None),
        }
    }

    /// Wire the commissioning pipeline once the external stack is up.
    /// Replaces any previously attached client.
    pub fn attach_stack(&self, client: StackClient) {
        let directory = Arc::new(DeviceDirectory::new());
        let attributes = client.attributes;
        let writer = Arc::new(BindingWriter::new(
            Arc::clone(&attributes),
            self.local_node,
            self.exposed_endpoints.clone(),
        ));
        let coordinator = SessionCoordinator::new(
            Arc::clone(&self.executor),
            client.broker,
            writer,
            attributes,
            Arc::clone(&directory),
        );
        let dispatcher = CommissioningDispatcher::new(
            AccessGrantProvisioner::new(client.store),
            coordinator,
            Arc::clone(&directory),
            self.fabric_index,
        );
        *self.pipeline.lock().unwrap() = Some(Pipeline {
            dispatcher,
            directory,
        });
        info!("commissioning client attached");
    }

    /// Route one device-lifecycle event from the external stack.
    /// Events arriving before attach are logged and dropped.
    pub fn handle_event(&self, event: CommissioningEvent) {
        match &*self.pipeline.lock().unwrap() {
            Some(pipeline) => pipeline.dispatcher.handle(event),
            None => warn!(?event, "commissioning event before client attach; dropped"),
        }
    }

    /// The device-listing query of the command surface.
    pub fn list_devices(&self) -> DeviceListing {
        match &*self.pipeline.lock().unwrap() {
            Some(pipeline) => DeviceListing {
                status: Availability::Ready,
                device_ids: pipeline.directory.device_ids(),
            },
            None => DeviceListing {
                status: Availability::Unavailable,
                device_ids: Vec::new(),
            },
        }
    }

    /// Cached model name for one device, filled when a session to the
    /// peer was established. `None` for unknown devices or before the
    /// stack attaches.
    pub fn device_model(&self, device_id: &str) -> Option<String> {
        let key = NodeId::decode(device_id).ok()?.to_string();
        self.pipeline
            .lock()
            .unwrap()
            .as_ref()?
            .directory
            .record(&key)?
            .model_name
    }

    /// Store new Wi-Fi credentials for the stack's network driver.
    pub fn set_network_credentials(
        &self,
        ssid: impl Into<String>,
        passphrase: impl Into<String>,
    ) {
        self.credentials.set(NetworkCredentials {
            ssid: ssid.into(),
            passphrase: passphrase.into(),
        });
    }

    /// Read-side credentials handle for the external stack's
    /// network-commissioning driver.
    pub fn credentials_provider(&self) -> Arc<dyn CredentialsProvider> {
        Arc::clone(&self.credentials) as Arc<dyn CredentialsProvider>
    }

    /// The key-command surface: always acknowledged unless an
    /// app-control flow reports otherwise.
    pub fn send_key(&self, code: CecKeyCode) -> KeyStatus {
        self.engine.lock().unwrap().handle_key(code)
    }

    /// Launch an application; a failed control call reports Busy.
    pub async fn launch_app(&self, app_id: &str) -> KeyStatus {
        match self.launcher.launch(app_id).await {
            Ok(()) => KeyStatus::Success,
            Err(e) => {
                warn!(app_id, "launch failed: {e}");
                KeyStatus::Busy
            }
        }
    }

    /// Stop an application; a failed control call reports Busy.
    pub async fn stop_app(&self, app_id: &str) -> KeyStatus {
        match self.launcher.stop(app_id).await {
            Ok(()) => KeyStatus::Success,
            Err(e) => {
                warn!(app_id, "stop failed: {e}");
                KeyStatus::Busy
            }
        }
    }
}
