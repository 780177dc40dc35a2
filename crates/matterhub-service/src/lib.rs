//! `matterhub-service` – composition layer of the gateway.
//!
//! The binary in this crate runs the service standalone (degraded:
//! queries report unavailable until a stack attaches). The embedding
//! host plugin links this library instead and drives
//! [`GatewayService`][service::GatewayService] directly – constructing
//! it, attaching the stack's client interfaces via
//! [`attach_stack`][service::GatewayService::attach_stack], and routing
//! inbound events and key commands to it.
//!
//! # Modules
//!
//! - [`config`] – the `~/.matterhub/config.toml` vault.
//! - [`executor`] – tokio-backed [`DeferredWorker`][executor::DeferredWorker].
//! - [`launcher`] – HTTP application-control client.
//! - [`service`] – the [`GatewayService`][service::GatewayService] facade.

pub mod config;
pub mod executor;
pub mod launcher;
pub mod service;
