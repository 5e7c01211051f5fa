// Padxlate Input Bindings
// One logical key bound to one physical control

use std::fmt;
use std::str::FromStr;

use strum_macros::IntoStaticStr;

use crate::LogicalKey;

/// Physical control family a binding points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum InputKind {
    /// Keyboard key (never translated)
    Key,
    Button,
    Axis,
    Hat,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "key" => Ok(InputKind::Key),
            "button" => Ok(InputKind::Button),
            "axis" => Ok(InputKind::Axis),
            "hat" => Ok(InputKind::Hat),
            _ => Err(format!("Unknown input type: {}", s)),
        }
    }
}

/// A physical control reference without the logical name attached.
///
/// Mapping database entries are matched against bindings on exactly
/// these three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicalInput {
    pub kind: InputKind,
    pub code: i64,
    pub value: i64,
}

impl PhysicalInput {
    pub fn new(kind: InputKind, code: i64, value: i64) -> Self {
        Self { kind, code, value }
    }
}

/// A logical key bound to a physical control.
///
/// `value` is a direction for axes and hats (sign or hat mask) and the
/// magnitude `1` for buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputBinding {
    pub name: LogicalKey,
    pub kind: InputKind,
    pub code: i64,
    pub value: i64,
}

impl InputBinding {
    pub fn new(name: LogicalKey, kind: InputKind, code: i64, value: i64) -> Self {
        Self {
            name,
            kind,
            code,
            value,
        }
    }

    /// Button binding with the conventional value of 1
    pub fn button(name: LogicalKey, code: i64) -> Self {
        Self::new(name, InputKind::Button, code, 1)
    }

    pub fn axis(name: LogicalKey, code: i64, value: i64) -> Self {
        Self::new(name, InputKind::Axis, code, value)
    }

    pub fn hat(name: LogicalKey, code: i64, value: i64) -> Self {
        Self::new(name, InputKind::Hat, code, value)
    }

    pub fn key(name: LogicalKey, code: i64) -> Self {
        Self::new(name, InputKind::Key, code, 1)
    }

    /// The physical part of the binding
    pub fn physical(&self) -> PhysicalInput {
        PhysicalInput::new(self.kind, self.code, self.value)
    }

    pub fn is_key(&self) -> bool {
        self.kind == InputKind::Key
    }
}

impl fmt::Display for InputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name:{} type:{} id:{} value:{}",
            self.name, self.kind, self.code, self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_parse() {
        assert_eq!("button".parse::<InputKind>(), Ok(InputKind::Button));
        assert_eq!("AXIS".parse::<InputKind>(), Ok(InputKind::Axis));
        assert!("wheel".parse::<InputKind>().is_err());
    }

    #[test]
    fn test_binding_display() {
        let binding = InputBinding::axis(LogicalKey::LeftAnalogUp, 1, -1);
        assert_eq!(binding.to_string(), "name:leftanalogup type:axis id:1 value:-1");
    }

    #[test]
    fn test_physical_ignores_name() {
        let a = InputBinding::button(LogicalKey::A, 0);
        let b = InputBinding::button(LogicalKey::B, 0);
        assert_ne!(a, b);
        assert_eq!(a.physical(), b.physical());
    }

    #[test]
    fn test_button_constructor_uses_unit_value() {
        let binding = InputBinding::button(LogicalKey::Start, 7);
        assert_eq!(binding.kind, InputKind::Button);
        assert_eq!(binding.value, 1);
        assert!(!binding.is_key());
        assert!(InputBinding::key(LogicalKey::Start, 28).is_key());
    }
}
