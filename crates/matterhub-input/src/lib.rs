//! `matterhub-input` – Synthetic Input Injection
//!
//! Translates CEC-style remote key codes into low-level input-device
//! events with press/release/hold/modifier sequencing, injected through
//! a process-wide virtual input device.
//!
//! # Modules
//!
//! - [`keymap`] – the symbolic-key → Linux-key-code plan table
//!   ([`KeyPlan`][keymap::KeyPlan]: tap, modifier chord, or hold).
//! - [`device`] – the [`InputSink`][device::InputSink] seam and the
//!   `/dev/uinput` backend behind it.
//! - [`engine`] – [`InjectionEngine`][engine::InjectionEngine]: the
//!   stateful press/hold/release sequencer, including the
//!   one-held-key-at-a-time invariant.

pub mod device;
pub mod engine;
pub mod keymap;

pub use device::InputSink;
#[cfg(target_os = "linux")]
pub use device::UinputDevice;
pub use engine::{InjectionEngine, KeyStatus};
pub use keymap::{plan_for, KeyPlan};
