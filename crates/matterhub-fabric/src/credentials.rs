//! Network-credentials seam.
//!
//! The external stack's network-commissioning driver asks for the
//! current Wi-Fi credentials whenever it (re)provisions the network
//! interface; the gateway's command surface is where new credentials
//! arrive. [`CredentialsProvider`] is the read side handed to the
//! stack; [`SharedCredentials`] is the in-process store behind it.

use std::sync::{Arc, Mutex};

use tracing::info;

/// One set of Wi-Fi credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct NetworkCredentials {
    pub ssid: String,
    pub passphrase: String,
}

impl std::fmt::Debug for NetworkCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The passphrase must never reach logs.
        f.debug_struct("NetworkCredentials")
            .field("ssid", &self.ssid)
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// Read-side capability the network-commissioning driver consumes.
pub trait CredentialsProvider: Send + Sync {
    /// The most recently supplied credentials, if any.
    fn current(&self) -> Option<NetworkCredentials>;
}

/// Mutex-guarded credential store. Writers call [`SharedCredentials::set`];
/// the stack reads through the [`CredentialsProvider`] impl.
#[derive(Default)]
pub struct SharedCredentials {
    inner: Mutex<Option<NetworkCredentials>>,
}

impl SharedCredentials {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Replace the stored credentials. Later sets win.
    pub fn set(&self, credentials: NetworkCredentials) {
        info!(ssid = %credentials.ssid, "network credentials updated");
        *self.inner.lock().unwrap() = Some(credentials);
    }
}

impl CredentialsProvider for SharedCredentials {
    fn current(&self) -> Option<NetworkCredentials> {
        self.inner.lock().unwrap().clone()
    }
}
