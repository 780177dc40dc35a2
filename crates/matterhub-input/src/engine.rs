//! [`InjectionEngine`] – press/hold/release sequencing.
//!
//! One engine instance owns the process's one virtual device, so key
//! traffic is serialised by construction; the engine itself adds no
//! lock (the command surface calls handlers one at a time).
//!
//! Per-key state machine: idle → pressed → (optionally held) → released
//! → idle. At most one key may be physically held at any moment;
//! pressing a new hold key releases the previous one first, and any
//! non-hold command releases it too.

use std::time::Duration;

use matterhub_types::{CecKeyCode, HubError};
use tracing::{error, warn};

use crate::device::InputSink;
use crate::keymap::{plan_for, KeyPlan};

/// Pause between press and release so consumers observe distinct
/// transitions.
const TAP_DELAY: Duration = Duration::from_micros(100);

/// Outcome reported on the key-command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Success,
    /// The system could not service the command (used by app-launch
    /// flows layered above the engine).
    Busy,
}

pub struct InjectionEngine {
    /// `None` when device creation failed at startup; every operation
    /// then no-ops with an error log instead of aborting the process.
    sink: Option<Box<dyn InputSink>>,
    /// The one key currently physically held, if any.
    held: Option<u16>,
}

impl InjectionEngine {
    pub fn new(sink: Option<Box<dyn InputSink>>) -> Self {
        if sink.is_none() {
            warn!("injection engine constructed without a virtual device; key commands will no-op");
        }
        Self { sink, held: None }
    }

    /// Handle one inbound key command.
    ///
    /// Always acknowledges `Success`: the command protocol has no status
    /// for "key not mapped", and a missing device is a local fault the
    /// caller cannot act on. Both cases are logged.
    pub fn handle_key(&mut self, code: CecKeyCode) -> KeyStatus {
        let Some(plan) = plan_for(code) else {
            warn!(?code, "no injection mapping for key; acknowledged without event");
            return KeyStatus::Success;
        };

        let result = match plan {
            KeyPlan::Tap(key) => self.release_held().and_then(|()| self.send_tap(key)),
            KeyPlan::Chord { modifier, key } => self
                .release_held()
                .and_then(|()| self.send_with_modifier(modifier, key)),
            KeyPlan::Hold(key) => self.press_and_hold(key),
        };
        if let Err(e) = result {
            error!(?code, "key injection failed: {e}");
        }
        KeyStatus::Success
    }

    /// idle → pressed → released → idle, sync marker after each
    /// transition.
    pub fn send_tap(&mut self, key: u16) -> Result<(), HubError> {
        self.transition(key, true)?;
        std::thread::sleep(TAP_DELAY);
        self.transition(key, false)
    }

    /// Press modifier, press main, release main, release modifier; each
    /// transition gets its own sync marker and inter-step delay.
    pub fn send_with_modifier(&mut self, modifier: u16, key: u16) -> Result<(), HubError> {
        self.transition(modifier, true)?;
        std::thread::sleep(TAP_DELAY);
        self.transition(key, true)?;
        std::thread::sleep(TAP_DELAY);
        self.transition(key, false)?;
        std::thread::sleep(TAP_DELAY);
        self.transition(modifier, false)
    }

    /// Press `key` and keep it pressed. Any previously held key is
    /// released first: at most one key is ever held.
    pub fn press_and_hold(&mut self, key: u16) -> Result<(), HubError> {
        if self.held == Some(key) {
            return Ok(());
        }
        self.release_held()?;
        self.transition(key, true)?;
        self.held = Some(key);
        Ok(())
    }

    /// Release `key`. The release event is sent even when `key` is not
    /// the tracked held key – the physical device does not track held
    /// state, so a stray release is harmless and safer than skipping it.
    pub fn release(&mut self, key: u16) -> Result<(), HubError> {
        if self.held == Some(key) {
            self.held = None;
        }
        self.transition(key, false)
    }

    fn release_held(&mut self) -> Result<(), HubError> {
        match self.held.take() {
            Some(key) => self.transition(key, false),
            None => Ok(()),
        }
    }

    fn transition(&mut self, key: u16, pressed: bool) -> Result<(), HubError> {
        let Some(sink) = self.sink.as_mut() else {
            return Err(HubError::InputDevice(
                "no virtual device attached".to_string(),
            ));
        };
        sink.emit_key(key, pressed)?;
        sink.syn()
    }
}
