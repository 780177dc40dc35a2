//! The virtual input device seam and its `/dev/uinput` backend.
//!
//! [`InputSink`] is the narrow interface the engine writes through: one
//! key transition, one synchronization marker. The Linux backend holds
//! the uinput file descriptor for the engine's whole lifetime; the
//! device is created once at construction and destroyed once on drop.

use matterhub_types::HubError;

/// Where injected events go. The engine owns exactly one sink.
pub trait InputSink: Send {
    /// Emit one key transition (`pressed` = true for press).
    fn emit_key(&mut self, code: u16, pressed: bool) -> Result<(), HubError>;

    /// Emit a synchronization marker so consumers see a complete report.
    fn syn(&mut self) -> Result<(), HubError>;
}

#[cfg(target_os = "linux")]
pub use uinput::UinputDevice;

#[cfg(target_os = "linux")]
mod uinput {
    use super::InputSink;
    use crate::keymap::mapped_key_codes;
    use matterhub_types::HubError;
    use std::fs::{File, OpenOptions};
    use std::io::Write;
    use std::os::fd::AsRawFd;
    use std::path::Path;
    use tracing::info;

    const EV_SYN: u16 = 0x00;
    const EV_KEY: u16 = 0x01;
    const SYN_REPORT: u16 = 0;
    const BUS_VIRTUAL: u16 = 0x06;

    const UINPUT_IOCTL_BASE: u8 = b'U';
    nix::ioctl_none!(ui_dev_create, UINPUT_IOCTL_BASE, 1);
    nix::ioctl_none!(ui_dev_destroy, UINPUT_IOCTL_BASE, 2);
    nix::ioctl_write_ptr!(ui_dev_setup, UINPUT_IOCTL_BASE, 3, UinputSetup);
    nix::ioctl_write_int!(ui_set_evbit, UINPUT_IOCTL_BASE, 100);
    nix::ioctl_write_int!(ui_set_keybit, UINPUT_IOCTL_BASE, 101);

    #[repr(C)]
    struct InputId {
        bustype: u16,
        vendor: u16,
        product: u16,
        version: u16,
    }

    #[repr(C)]
    pub struct UinputSetup {
        id: InputId,
        name: [u8; 80],
        ff_effects_max: u32,
    }

    /// A synthetic keyboard registered with the kernel via uinput.
    #[derive(Debug)]
    pub struct UinputDevice {
        file: File,
    }

    impl UinputDevice {
        /// Open `path` (normally `/dev/uinput`), declare the EV_KEY
        /// capability plus every key the plan table can emit, and
        /// register the device.
        ///
        /// # Errors
        ///
        /// Returns [`HubError::InputDevice`] when the node cannot be
        /// opened or any setup ioctl fails. Callers are expected to keep
        /// running without a device in that case.
        pub fn open(path: &Path) -> Result<Self, HubError> {
            let file = OpenOptions::new()
                .write(true)
                .open(path)
                .map_err(|e| HubError::InputDevice(format!("open {}: {e}", path.display())))?;
            let fd = file.as_raw_fd();

            let io_err =
                |op: &str, e: nix::Error| HubError::InputDevice(format!("{op}: {e}"));

            unsafe {
                ui_set_evbit(fd, EV_KEY as u64).map_err(|e| io_err("UI_SET_EVBIT", e))?;
                for code in mapped_key_codes() {
                    ui_set_keybit(fd, code as u64).map_err(|e| io_err("UI_SET_KEYBIT", e))?;
                }

                let mut setup = UinputSetup {
                    id: InputId {
                        bustype: BUS_VIRTUAL,
                        vendor: 0x1209,
                        product: 0x4D48,
                        version: 1,
                    },
                    name: [0; 80],
                    ff_effects_max: 0,
                };
                let label = b"matterhub virtual remote";
                setup.name[..label.len()].copy_from_slice(label);

                ui_dev_setup(fd, &setup).map_err(|e| io_err("UI_DEV_SETUP", e))?;
                ui_dev_create(fd).map_err(|e| io_err("UI_DEV_CREATE", e))?;
            }

            info!(path = %path.display(), "virtual input device created");
            Ok(Self { file })
        }

        fn push(&mut self, type_: u16, code: u16, value: i32) -> Result<(), HubError> {
            let event = libc::input_event {
                time: libc::timeval {
                    tv_sec: 0,
                    tv_usec: 0,
                },
                type_,
                code,
                value,
            };
            // input_event is plain old data; write its raw bytes.
            let bytes = unsafe {
                std::slice::from_raw_parts(
                    (&event as *const libc::input_event).cast::<u8>(),
                    std::mem::size_of::<libc::input_event>(),
                )
            };
            self.file
                .write_all(bytes)
                .map_err(|e| HubError::InputDevice(format!("event write: {e}")))
        }
    }

    impl InputSink for UinputDevice {
        fn emit_key(&mut self, code: u16, pressed: bool) -> Result<(), HubError> {
            self.push(EV_KEY, code, i32::from(pressed))
        }

        fn syn(&mut self) -> Result<(), HubError> {
            self.push(EV_SYN, SYN_REPORT, 0)
        }
    }

    impl Drop for UinputDevice {
        fn drop(&mut self) {
            // Best effort; the kernel reclaims the device on fd close
            // anyway.
            unsafe {
                let _ = ui_dev_destroy(self.file.as_raw_fd());
            }
        }
    }

}
