//! `matterhub-fabric` – seams over the external device-communication stack.
//!
//! The commissioning orchestrator never links against the stack directly.
//! It talks to these traits, so the real stack can be swapped for test
//! doubles without touching orchestration logic.
//!
//! # Modules
//!
//! - [`acl`] – [`AccessControlStore`][acl::AccessControlStore]: the shared
//!   access-control store the gateway commits grant entries into.
//! - [`session`] – [`SessionBroker`][session::SessionBroker]: CASE session
//!   establishment with completion callbacks, plus the opaque
//!   [`SecureSession`][session::SecureSession] handle.
//! - [`attribute`] – [`AttributeClient`][attribute::AttributeClient]:
//!   attribute read/write transport over an established session.
//! - [`executor`] – [`DeferredExecutor`][executor::DeferredExecutor]: the
//!   scheduled-work context used to move session work off the stack's
//!   event-delivery threads.
//! - [`credentials`] – [`CredentialsProvider`][credentials::CredentialsProvider]:
//!   read-side capability the stack's network-commissioning driver pulls
//!   the current Wi-Fi credentials through.

pub mod acl;
pub mod attribute;
pub mod credentials;
pub mod executor;
pub mod session;

pub use acl::{AccessControlStore, AccessGrantEntry};
pub use credentials::{CredentialsProvider, NetworkCredentials, SharedCredentials};
pub use attribute::{
    AttributeClient, AttributePath, AttributeValue, BindingTarget, BASIC_INFORMATION_CLUSTER,
    BINDING_CLUSTER, BINDING_LIST_ATTRIBUTE, PRODUCT_NAME_ATTRIBUTE,
};
pub use executor::DeferredExecutor;
pub use session::{EstablishRequest, SecureSession, SessionBroker, SessionFailure, SessionSuccess};
