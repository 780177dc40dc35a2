use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index of the administrative trust domain an access grant is scoped to.
pub type FabricIndex = u8;

/// Addressable logical unit exposing capability clusters on a device.
pub type EndpointId = u16;

/// 64-bit network address of a commissioned peer on the fabric.
///
/// The external stack hands device identities around as hexadecimal
/// strings; everything below the dispatcher (access-control entries,
/// session requests, binding targets) uses this numeric form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Decode the external string form of a device identity.
    ///
    /// The whole string must parse as hexadecimal: empty input and any
    /// non-hex character are rejected outright, so `"12GZ"` fails rather
    /// than truncating to `0x12` and a sign prefix like `"+1A"` fails
    /// too. Leading-zero variants of the same value (`"0A"`, `"A"`)
    /// decode to the same address.
    pub fn decode(hex: &str) -> Result<Self, HubError> {
        if hex.is_empty() {
            return Err(HubError::InvalidNodeId {
                input: String::new(),
                reason: "empty device identifier".to_string(),
            });
        }
        // from_str_radix tolerates a leading sign, which is not a hex
        // digit; every character must be checked explicitly.
        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(HubError::InvalidNodeId {
                input: hex.to_string(),
                reason: format!("'{bad}' is not a hexadecimal digit"),
            });
        }
        u64::from_str_radix(hex, 16)
            .map(NodeId)
            .map_err(|e| HubError::InvalidNodeId {
                input: hex.to_string(),
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// Permission level carried by an access-control entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Privilege {
    View = 1,
    /// Read attributes and invoke commands, short of admin control.
    Operate = 3,
    Manage = 4,
    Administer = 5,
}

/// Authentication mode an access-control entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum AuthMode {
    Pase = 1,
    /// Certificate-authenticated session establishment.
    Case = 2,
    Group = 3,
}

/// Commissioned-device class reported by the external stack.
///
/// Only [`DeviceClass::Matter`] devices are orchestrated; every other
/// class passes through the dispatcher untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Matter,
    Other(String),
}

impl DeviceClass {
    pub fn parse(s: &str) -> Self {
        match s {
            "matter" => DeviceClass::Matter,
            other => DeviceClass::Other(other.to_string()),
        }
    }
}

/// CEC-style remote key codes accepted on the key-command surface.
///
/// Discriminants are the KeypadInput cluster wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CecKeyCode {
    Select = 0x00,
    Up = 0x01,
    Down = 0x02,
    Left = 0x03,
    Right = 0x04,
    RootMenu = 0x09,
    SetupMenu = 0x0A,
    ContentsMenu = 0x0B,
    FavoriteMenu = 0x0C,
    Exit = 0x0D,
    Number0 = 0x20,
    Number1 = 0x21,
    Number2 = 0x22,
    Number3 = 0x23,
    Number4 = 0x24,
    Number5 = 0x25,
    Number6 = 0x26,
    Number7 = 0x27,
    Number8 = 0x28,
    Number9 = 0x29,
    ChannelUp = 0x30,
    ChannelDown = 0x31,
    InputSelect = 0x34,
    DisplayInformation = 0x35,
    Power = 0x40,
    VolumeUp = 0x41,
    VolumeDown = 0x42,
    Mute = 0x43,
    Play = 0x44,
    Stop = 0x45,
    Pause = 0x46,
    Rewind = 0x48,
    FastForward = 0x49,
    Forward = 0x4B,
    Backward = 0x4D,
}

impl CecKeyCode {
    /// Convert a raw KeypadInput wire value. Returns `None` for codes the
    /// gateway does not recognise at all.
    pub fn from_u8(raw: u8) -> Option<Self> {
        use CecKeyCode::*;
        Some(match raw {
            0x00 => Select,
            0x01 => Up,
            0x02 => Down,
            0x03 => Left,
            0x04 => Right,
            0x09 => RootMenu,
            0x0A => SetupMenu,
            0x0B => ContentsMenu,
            0x0C => FavoriteMenu,
            0x0D => Exit,
            0x20 => Number0,
            0x21 => Number1,
            0x22 => Number2,
            0x23 => Number3,
            0x24 => Number4,
            0x25 => Number5,
            0x26 => Number6,
            0x27 => Number7,
            0x28 => Number8,
            0x29 => Number9,
            0x30 => ChannelUp,
            0x31 => ChannelDown,
            0x34 => InputSelect,
            0x35 => DisplayInformation,
            0x40 => Power,
            0x41 => VolumeUp,
            0x42 => VolumeDown,
            0x43 => Mute,
            0x44 => Play,
            0x45 => Stop,
            0x46 => Pause,
            0x48 => Rewind,
            0x49 => FastForward,
            0x4B => Forward,
            0x4D => Backward,
            _ => return None,
        })
    }
}

/// Device-lifecycle events delivered by the external commissioning stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum CommissioningEvent {
    /// Endpoint discovery finished for a peer; fires before the stack
    /// registers the peer internally. First opportunity to grant access.
    ConfigurationCompleted { device_id: String, success: bool },
    /// Commissioning fully completed for a peer.
    DeviceAdded {
        device_id: String,
        device_class: DeviceClass,
    },
    /// A peer endpoint became known; carries its reachable URI.
    EndpointAdded {
        device_id: String,
        endpoint_id: EndpointId,
        uri: String,
        profile: String,
        profile_version: u32,
    },
    /// The peer left the fabric.
    DeviceRemoved { device_id: String },
}

/// Sub-step of access-grant provisioning that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantStep {
    Prepare,
    FabricAssign,
    PrivilegeAssign,
    AuthModeAssign,
    SubjectAssign,
    Commit,
}

/// Global error type spanning identity decoding, access-control
/// provisioning, session establishment, and input injection.
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum HubError {
    #[error("invalid device identifier '{input}': {reason}")]
    InvalidNodeId { input: String, reason: String },

    #[error("access grant failed at {step:?}: {details}")]
    AccessControl { step: GrantStep, details: String },

    #[error("session establishment with {peer} failed (code {code})")]
    Session { peer: NodeId, code: u32 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{0} unavailable")]
    Unavailable(String),

    #[error("input device fault: {0}")]
    InputDevice(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_empty_string() {
        assert!(matches!(
            NodeId::decode(""),
            Err(HubError::InvalidNodeId { .. })
        ));
    }

    #[test]
    fn decode_rejects_non_hex() {
        assert!(NodeId::decode("ZZZZ").is_err());
    }

    #[test]
    fn decode_rejects_partial_parse() {
        // Must fail entirely, never truncate to 0x12.
        assert!(NodeId::decode("12GZ").is_err());
    }

    #[test]
    fn decode_rejects_sign_prefixes() {
        // u64::from_str_radix accepts "+1A"; the codec must not.
        assert!(NodeId::decode("+1A").is_err());
        assert!(NodeId::decode("-1A").is_err());
    }

    #[test]
    fn decode_full_width_identifier() {
        let id = NodeId::decode("90034FD9068DFF14").unwrap();
        assert_eq!(id, NodeId(0x90034FD9068DFF14));
    }

    #[test]
    fn decode_ignores_leading_zero_padding() {
        assert_eq!(NodeId::decode("0A").unwrap(), NodeId::decode("A").unwrap());
        assert_eq!(
            NodeId::decode("000000000000000A").unwrap(),
            NodeId(0x0A)
        );
    }

    #[test]
    fn decode_rejects_overlong_input() {
        // 17 hex digits cannot fit a 64-bit address.
        assert!(NodeId::decode("10000000000000000").is_err());
    }

    #[test]
    fn node_id_displays_as_padded_upper_hex() {
        assert_eq!(NodeId(0x0A).to_string(), "000000000000000A");
    }

    #[test]
    fn device_class_parse() {
        assert_eq!(DeviceClass::parse("matter"), DeviceClass::Matter);
        assert_eq!(
            DeviceClass::parse("zigbee"),
            DeviceClass::Other("zigbee".to_string())
        );
    }

    #[test]
    fn cec_key_code_from_u8_roundtrip() {
        assert_eq!(CecKeyCode::from_u8(0x00), Some(CecKeyCode::Select));
        assert_eq!(CecKeyCode::from_u8(0x49), Some(CecKeyCode::FastForward));
        assert_eq!(CecKeyCode::from_u8(0xFE), None);
    }

    #[test]
    fn commissioning_event_roundtrip() {
        let event = CommissioningEvent::EndpointAdded {
            device_id: "90034FD9068DFF14".to_string(),
            endpoint_id: 3,
            uri: "matter://90034FD9068DFF14/ep/3".to_string(),
            profile: "casting-videoplayer".to_string(),
            profile_version: 1,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: CommissioningEvent = serde_json::from_str(&json).unwrap();
        match back {
            CommissioningEvent::EndpointAdded {
                device_id,
                endpoint_id,
                ..
            } => {
                assert_eq!(device_id, "90034FD9068DFF14");
                assert_eq!(endpoint_id, 3);
            }
            _ => panic!("unexpected variant"),
        }
    }

    #[test]
    fn hub_error_display() {
        let err = HubError::AccessControl {
            step: GrantStep::Commit,
            details: "store rejected entry".to_string(),
        };
        assert!(err.to_string().contains("Commit"));

        let err2 = HubError::Session {
            peer: NodeId(0x12),
            code: 50,
        };
        assert!(err2.to_string().contains("0000000000000012"));
    }
}
