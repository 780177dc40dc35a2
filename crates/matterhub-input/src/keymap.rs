//! Symbolic key codes → injected device key plans.
//!
//! Each CEC code maps to a [`KeyPlan`]: a plain tap, a modifier chord
//! (channel keys are ctrl+arrow on this platform), or a hold plan for
//! transport-control keys that stay pressed until the next command.
//! Codes without a plan are acknowledged upstream but inject nothing.

use matterhub_types::CecKeyCode;

// Linux input-event key codes (input-event-codes.h).
pub const KEY_ESC: u16 = 1;
pub const KEY_1: u16 = 2;
pub const KEY_2: u16 = 3;
pub const KEY_3: u16 = 4;
pub const KEY_4: u16 = 5;
pub const KEY_5: u16 = 6;
pub const KEY_6: u16 = 7;
pub const KEY_7: u16 = 8;
pub const KEY_8: u16 = 9;
pub const KEY_9: u16 = 10;
pub const KEY_0: u16 = 11;
pub const KEY_ENTER: u16 = 28;
pub const KEY_LEFTCTRL: u16 = 29;
pub const KEY_HOME: u16 = 102;
pub const KEY_UP: u16 = 103;
pub const KEY_LEFT: u16 = 105;
pub const KEY_RIGHT: u16 = 106;
pub const KEY_DOWN: u16 = 108;
pub const KEY_MUTE: u16 = 113;
pub const KEY_VOLUMEDOWN: u16 = 114;
pub const KEY_VOLUMEUP: u16 = 115;
pub const KEY_POWER: u16 = 116;
pub const KEY_PAUSE: u16 = 119;
pub const KEY_STOP: u16 = 128;
pub const KEY_MENU: u16 = 139;
pub const KEY_BACK: u16 = 158;
pub const KEY_FORWARD: u16 = 159;
pub const KEY_REWIND: u16 = 168;
pub const KEY_PLAY: u16 = 207;
pub const KEY_FASTFORWARD: u16 = 208;
pub const KEY_FAVORITES: u16 = 364;
pub const KEY_EPG: u16 = 365;

/// How one symbolic key is realised on the virtual device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPlan {
    /// Press then release, one sync marker after each transition.
    Tap(u16),
    /// Press modifier, press key, release key, release modifier.
    Chord { modifier: u16, key: u16 },
    /// Press and stay pressed until the next command releases it.
    Hold(u16),
}

/// Look up the injection plan for `code`. `None` means the gateway has
/// no mapping for the key on this platform.
pub fn plan_for(code: CecKeyCode) -> Option<KeyPlan> {
    use CecKeyCode::*;
    use KeyPlan::*;
    Some(match code {
        Select => Tap(KEY_ENTER),
        Up => Tap(KEY_UP),
        Down => Tap(KEY_DOWN),
        Left => Tap(KEY_LEFT),
        Right => Tap(KEY_RIGHT),
        RootMenu => Tap(KEY_HOME),
        SetupMenu => Tap(KEY_MENU),
        ContentsMenu => Tap(KEY_EPG),
        FavoriteMenu => Tap(KEY_FAVORITES),
        Exit => Tap(KEY_ESC),
        Backward => Tap(KEY_BACK),
        Forward => Tap(KEY_FORWARD),
        Number0 => Tap(KEY_0),
        Number1 => Tap(KEY_1),
        Number2 => Tap(KEY_2),
        Number3 => Tap(KEY_3),
        Number4 => Tap(KEY_4),
        Number5 => Tap(KEY_5),
        Number6 => Tap(KEY_6),
        Number7 => Tap(KEY_7),
        Number8 => Tap(KEY_8),
        Number9 => Tap(KEY_9),
        ChannelUp => Chord {
            modifier: KEY_LEFTCTRL,
            key: KEY_UP,
        },
        ChannelDown => Chord {
            modifier: KEY_LEFTCTRL,
            key: KEY_DOWN,
        },
        Power => Tap(KEY_POWER),
        VolumeUp => Tap(KEY_VOLUMEUP),
        VolumeDown => Tap(KEY_VOLUMEDOWN),
        Mute => Tap(KEY_MUTE),
        Play => Tap(KEY_PLAY),
        Pause => Tap(KEY_PAUSE),
        Stop => Tap(KEY_STOP),
        Rewind => Hold(KEY_REWIND),
        FastForward => Hold(KEY_FASTFORWARD),
        // No sensible injection target on this platform.
        InputSelect | DisplayInformation => return None,
    })
}

/// Every key code any plan can emit, for device capability setup.
pub fn mapped_key_codes() -> Vec<u16> {
    let mut codes: Vec<u16> = vec![
        KEY_ESC,
        KEY_1,
        KEY_2,
        KEY_3,
        KEY_4,
        KEY_5,
        KEY_6,
        KEY_7,
        KEY_8,
        KEY_9,
        KEY_0,
        KEY_ENTER,
        KEY_LEFTCTRL,
        KEY_HOME,
        KEY_UP,
        KEY_LEFT,
        KEY_RIGHT,
        KEY_DOWN,
        KEY_MUTE,
        KEY_VOLUMEDOWN,
        KEY_VOLUMEUP,
        KEY_POWER,
        KEY_PAUSE,
        KEY_STOP,
        KEY_MENU,
        KEY_BACK,
        KEY_FORWARD,
        KEY_REWIND,
        KEY_PLAY,
        KEY_FASTFORWARD,
        KEY_FAVORITES,
        KEY_EPG,
    ];
    codes.sort_unstable();
    codes.dedup();
    codes
}
