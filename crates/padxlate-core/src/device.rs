// Padxlate Device Configuration
// Stored logical-to-physical bindings for one input device

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::identity::{self, Identity};
use crate::{InputBinding, LogicalKey};

/// Device family of a stored configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Keyboard,
    Joystick,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Keyboard => "keyboard",
            DeviceKind::Joystick => "joystick",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keyboard" => Ok(DeviceKind::Keyboard),
            "joystick" => Ok(DeviceKind::Joystick),
            _ => Err(format!("Unknown device type: {}", s)),
        }
    }
}

/// Input configuration of a single device as persisted by the frontend.
///
/// Bindings are unique per [`LogicalKey`] and keep their declaration order.
/// Nothing in the translation layer mutates a `DeviceConfig`.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    kind: DeviceKind,
    display_name: String,
    identity: String,
    bindings: IndexMap<LogicalKey, InputBinding>,
}

impl DeviceConfig {
    /// Create a configuration without bindings
    pub fn new(kind: DeviceKind, display_name: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            kind,
            display_name: display_name.into(),
            identity: identity.into(),
            bindings: IndexMap::new(),
        }
    }

    /// Builder-style variant of [`DeviceConfig::bind`]
    pub fn with_binding(mut self, binding: InputBinding) -> Self {
        self.bind(binding);
        self
    }

    /// Store a binding, replacing any earlier binding for the same key.
    ///
    /// Returns the replaced binding.
    pub fn bind(&mut self, binding: InputBinding) -> Option<InputBinding> {
        self.bindings.insert(binding.name, binding)
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn is_keyboard(&self) -> bool {
        self.kind == DeviceKind::Keyboard
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Legacy 32-hex identity string, as stored
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Decoded identity ([`Identity::EMPTY`] when the stored string is malformed)
    pub fn product_identity(&self) -> Identity {
        identity::decode(&self.identity)
    }

    /// Binding for a logical key
    pub fn get(&self, key: LogicalKey) -> Option<&InputBinding> {
        self.bindings.get(&key)
    }

    pub fn contains(&self, key: LogicalKey) -> bool {
        self.bindings.contains_key(&key)
    }

    /// Bindings in declaration order
    pub fn bindings(&self) -> impl Iterator<Item = &InputBinding> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Display for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}
