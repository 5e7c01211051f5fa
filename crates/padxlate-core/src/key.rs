// Padxlate Logical Keys
// Abstract frontend controls, independent of any device encoding

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use strum::IntoEnumIterator;
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

/// A logical control as named by the frontend input configuration.
///
/// Every variant carries its historical bit-flag value. Several legacy names
/// share a flag with a canonical variant; those names resolve through
/// [`LogicalKey::from_name`] instead of being separate variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[repr(u32)]
pub enum LogicalKey {
    A = 1,
    B = 2,
    Down = 4,
    Hotkey = 8,
    Left = 16,
    LeftAnalogDown = 32,
    LeftAnalogLeft = 64,
    LeftAnalogRight = 128,
    LeftAnalogUp = 256,
    PageUp = 512,
    L2 = 1024,
    L3 = 2048,
    Right = 4096,
    RightAnalogUp = 8192,
    RightAnalogDown = 16384,
    RightAnalogLeft = 32768,
    RightAnalogRight = 65536,
    PageDown = 131072,
    R2 = 262144,
    R3 = 524288,
    Select = 1048576,
    Start = 2097152,
    Up = 4194304,
    X = 8388608,
    Y = 16777216,
}

/// Legacy names that share a flag value with a canonical key.
const ALIASES: &[(&str, LogicalKey)] = &[
    ("hotkeyenable", LogicalKey::Hotkey),
    ("leftshoulder", LogicalKey::PageUp),
    ("rightshoulder", LogicalKey::PageDown),
    ("leftthumb", LogicalKey::L2),
    ("rightthumb", LogicalKey::R2),
    ("lefttrigger", LogicalKey::L3),
    ("righttrigger", LogicalKey::R3),
    ("joystick1up", LogicalKey::LeftAnalogUp),
    ("joystick1down", LogicalKey::LeftAnalogDown),
    ("joystick1left", LogicalKey::LeftAnalogLeft),
    ("joystick1right", LogicalKey::LeftAnalogRight),
    ("joystick2up", LogicalKey::RightAnalogUp),
    ("joystick2down", LogicalKey::RightAnalogDown),
    ("joystick2left", LogicalKey::RightAnalogLeft),
    ("joystick2right", LogicalKey::RightAnalogRight),
];

fn name_table() -> &'static HashMap<&'static str, LogicalKey> {
    static NAMES: OnceLock<HashMap<&'static str, LogicalKey>> = OnceLock::new();
    NAMES.get_or_init(|| {
        let mut names: HashMap<&'static str, LogicalKey> =
            LogicalKey::iter().map(|key| (key.name(), key)).collect();
        for &(alias, key) in ALIASES {
            names.insert(alias, key);
        }
        names
    })
}

impl LogicalKey {
    /// Raw flag value
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Look up the key owning an exact flag value
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::iter().find(|key| key.bits() == bits)
    }

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Resolve a canonical name or legacy alias, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        let table = name_table();
        table
            .get(name)
            .or_else(|| table.get(name.to_ascii_lowercase().as_str()))
            .copied()
    }

    /// Legacy names that resolve to this key
    pub fn aliases(self) -> impl Iterator<Item = &'static str> {
        ALIASES
            .iter()
            .filter(move |(_, key)| *key == self)
            .map(|(alias, _)| *alias)
    }

    /// Whether this key is one of the four d-pad directions
    pub fn is_dpad(self) -> bool {
        matches!(
            self,
            LogicalKey::Up | LogicalKey::Down | LogicalKey::Left | LogicalKey::Right
        )
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogicalKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalKey::from_name(s).ok_or_else(|| format!("Unknown logical key: {}", s))
    }
}
