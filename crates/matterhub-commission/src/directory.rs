//! [`DeviceDirectory`] – per-device metadata cache.
//!
//! Producers (the external stack's event callbacks, arbitrary threads)
//! and consumers (the listing/query surface) run concurrently, so the
//! map lives behind one mutex. Endpoint URIs arrive eagerly on
//! endpoint-added events; model names are filled lazily the first time
//! they are asked for and cached after that.

use std::collections::HashMap;
use std::sync::Mutex;

use matterhub_types::HubError;
use tracing::debug;

/// Display attributes cached for one device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRecord {
    pub model_name: Option<String>,
    pub endpoint_uri: Option<String>,
}

#[derive(Default)]
pub struct DeviceDirectory {
    inner: Mutex<HashMap<String, DeviceRecord>>,
}

impl DeviceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reachable URI for a device endpoint, creating the
    /// entry if this is the first sighting of the device.
    pub fn record_endpoint(&self, device_id: &str, uri: &str) {
        let mut inner = self.inner.lock().unwrap();
        let record = inner.entry(device_id.to_string()).or_default();
        record.endpoint_uri = Some(uri.to_string());
        debug!(device_id, uri, "endpoint uri recorded");
    }

    /// Drop everything known about a device. No-ops for unknown ids.
    pub fn remove(&self, device_id: &str) {
        self.inner.lock().unwrap().remove(device_id);
    }

    /// Snapshot of cached attributes for one device.
    pub fn record(&self, device_id: &str) -> Option<DeviceRecord> {
        self.inner.lock().unwrap().get(device_id).cloned()
    }

    /// Sorted snapshot of every known device identity.
    pub fn device_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.lock().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Return the cached model name, or fetch it with `fetch`, cache the
    /// result, and return it. The fetch runs outside the lock so a slow
    /// read cannot stall event-callback producers.
    pub fn model_name(
        &self,
        device_id: &str,
        fetch: impl FnOnce() -> Result<String, HubError>,
    ) -> Result<String, HubError> {
        if let Some(record) = self.inner.lock().unwrap().get(device_id)
            && let Some(name) = &record.model_name
        {
            return Ok(name.clone());
        }

        let name = fetch()?;
        let mut inner = self.inner.lock().unwrap();
        inner
            .entry(device_id.to_string())
            .or_default()
            .model_name = Some(name.clone());
        Ok(name)
    }
}
