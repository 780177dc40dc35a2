//! `matterhub-commission` – Commissioning & Access Grant Orchestration
//!
//! Reacts to device-lifecycle events from the external commissioning
//! stack and walks each newly commissioned peer through the sequence
//! that must hold before the peer may interact with the gateway:
//! access grant first, secure session next, capability bindings last.
//!
//! # Modules
//!
//! - [`grant`] – [`AccessGrantProvisioner`][grant::AccessGrantProvisioner]:
//!   builds one fully populated access-control entry per peer and commits
//!   it to the shared store in a single atomic call.
//! - [`session`] – [`SessionCoordinator`][session::SessionCoordinator]:
//!   single-slot, most-recent-wins scheduling of CASE session
//!   establishment on a deferred execution context, never inline in the
//!   event handler that asked for it.
//! - [`binding`] – [`BindingWriter`][binding::BindingWriter]: writes the
//!   full ordered list of gateway endpoints to a peer's binding attribute
//!   once a session exists.
//! - [`directory`] – [`DeviceDirectory`][directory::DeviceDirectory]:
//!   mutex-guarded per-device metadata cache (endpoint URI, model name).
//! - [`dispatcher`] – [`CommissioningDispatcher`][dispatcher::CommissioningDispatcher]:
//!   the entry point the external stack drives; sequences the components
//!   above per event.

pub mod binding;
pub mod directory;
pub mod dispatcher;
pub mod grant;
pub mod session;

pub use binding::BindingWriter;
pub use directory::{DeviceDirectory, DeviceRecord};
pub use dispatcher::CommissioningDispatcher;
pub use grant::AccessGrantProvisioner;
pub use session::SessionCoordinator;

/// Fabric index the gateway commissions peers onto unless configured
/// otherwise.
pub const DEFAULT_FABRIC_INDEX: matterhub_types::FabricIndex = 1;
