// Padxlate Protocol Translator
// Re-encodes stored bindings for a target emulator input backend

use std::fmt;
use std::str::FromStr;

use crate::input::{DeviceResolver, JoystickEnumerator, PnpEnumerator};
use crate::mapping::{AxisRole, ButtonRole, MappedRole, MappingDatabase};
use crate::{CanonicalRole, DeviceConfig, InputBinding, InputKind, LogicalKey};

/// Raw XInput button codes of Back and Start, which the stored
/// configuration numbers the other way round
const RAW_BACK: i64 = 6;
const RAW_START: i64 = 7;

/// Encoding a target backend expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    /// Native controller mapping numbering
    #[default]
    Mapped,
    /// Raw gamepad numbering
    Raw,
    /// Bindings as stored
    Passthrough,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Mapped => "mapped",
            Protocol::Raw => "raw",
            Protocol::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mapped" => Ok(Protocol::Mapped),
            "raw" => Ok(Protocol::Raw),
            "passthrough" => Ok(Protocol::Passthrough),
            _ => Err(format!("Unknown protocol: {}", s)),
        }
    }
}

/// Translates stored bindings using a device resolver and a mapping database.
///
/// Every operation is a pure function of the configuration and the
/// resolver's device snapshots; configurations are never modified.
pub struct Translator<'a, P, J> {
    resolver: &'a DeviceResolver<P, J>,
    mappings: &'a dyn MappingDatabase,
}

impl<'a, P: PnpEnumerator, J: JoystickEnumerator> Translator<'a, P, J> {
    pub fn new(resolver: &'a DeviceResolver<P, J>, mappings: &'a dyn MappingDatabase) -> Self {
        Self { resolver, mappings }
    }

    pub fn resolver(&self) -> &'a DeviceResolver<P, J> {
        self.resolver
    }

    /// Binding re-encoded into native mapping numbering.
    ///
    /// Falls back to [`Translator::to_raw_gamepad_code`] when the device has
    /// a mapping but none of its entries covers the binding.
    pub fn to_mapped_code(&self, cfg: &DeviceConfig, key: LogicalKey) -> Option<InputBinding> {
        let binding = *cfg.get(key)?;
        if cfg.is_keyboard() || binding.is_key() {
            return Some(binding);
        }

        let Some(mapping) = self.mappings.lookup(&cfg.product_identity()) else {
            return Some(binding);
        };

        let mut entry = mapping.find(&binding.physical());
        if entry.is_none() && !mapping.has_axis_roles() {
            // Devices whose d-pad is reported as plain buttons
            entry = dpad_role(key)
                .and_then(|role| mapping.find_button_role(binding.kind, role));
        }

        let Some(entry) = entry else {
            log::warn!(
                "{}: no native mapping entry for <{}> in mapping:\n{}",
                cfg.display_name(),
                binding,
                mapping.source
            );
            return self.to_raw_gamepad_code(cfg, key);
        };
        log::trace!("{}: {} matched {:?}", cfg.display_name(), key, entry.role);

        let (kind, code) = match entry.role {
            MappedRole::Button(role) => (InputKind::Button, role.code()),
            MappedRole::Axis(role) => (InputKind::Axis, role.code()),
        };
        Some(InputBinding::new(binding.name, kind, code, 1))
    }

    /// Binding re-encoded into raw gamepad numbering.
    ///
    /// Only XInput-capable devices are translated: Back and Start swap, and
    /// the vertical stick axes flip direction.
    pub fn to_raw_gamepad_code(&self, cfg: &DeviceConfig, key: LogicalKey) -> Option<InputBinding> {
        let binding = *cfg.get(key)?;
        if binding.is_key() || !self.resolver.is_xinput_capable(cfg) {
            return Some(binding);
        }

        let mut raw = binding;
        match raw.kind {
            InputKind::Button if raw.code == RAW_BACK => raw.code = RAW_START,
            InputKind::Button if raw.code == RAW_START => raw.code = RAW_BACK,
            InputKind::Axis if raw.code == 1 || raw.code == 3 => raw.value = -raw.value,
            _ => {}
        }
        Some(raw)
    }

    /// Canonical role of a binding on an XInput-capable device.
    ///
    /// `reverse_axis` flips which stick direction counts as positive.
    pub fn to_canonical_role(
        &self,
        cfg: &DeviceConfig,
        key: LogicalKey,
        reverse_axis: bool,
    ) -> CanonicalRole {
        let Some(binding) = cfg.get(key) else {
            return CanonicalRole::Unknown;
        };
        if binding.is_key() || !self.resolver.is_xinput_capable(cfg) {
            return CanonicalRole::Unknown;
        }

        match binding.kind {
            InputKind::Button => CanonicalRole::from_code(binding.code),
            InputKind::Hat => CanonicalRole::from_code(binding.value.saturating_add(10)),
            InputKind::Axis => axis_role(binding.code, binding.value, reverse_axis),
            InputKind::Key => CanonicalRole::Unknown,
        }
    }

    /// Every stored binding, in declaration order, encoded for `protocol`
    pub fn translate_all(&self, cfg: &DeviceConfig, protocol: Protocol) -> Vec<InputBinding> {
        cfg.bindings()
            .filter_map(|binding| match protocol {
                Protocol::Mapped => self.to_mapped_code(cfg, binding.name),
                Protocol::Raw => self.to_raw_gamepad_code(cfg, binding.name),
                Protocol::Passthrough => Some(*binding),
            })
            .collect()
    }

    /// Canonical role of every stored binding, in declaration order
    pub fn canonical_roles(
        &self,
        cfg: &DeviceConfig,
        reverse_axis: bool,
    ) -> Vec<(LogicalKey, CanonicalRole)> {
        cfg.bindings()
            .map(|binding| {
                (
                    binding.name,
                    self.to_canonical_role(cfg, binding.name, reverse_axis),
                )
            })
            .collect()
    }
}

fn dpad_role(key: LogicalKey) -> Option<ButtonRole> {
    match key {
        LogicalKey::Left => Some(ButtonRole::DpadLeft),
        LogicalKey::Right => Some(ButtonRole::DpadRight),
        LogicalKey::Up => Some(ButtonRole::DpadUp),
        LogicalKey::Down => Some(ButtonRole::DpadDown),
        _ => None,
    }
}

fn axis_role(code: i64, value: i64, reverse_axis: bool) -> CanonicalRole {
    let positive = if reverse_axis { value < 0 } else { value > 0 };
    let pick = |on_positive, otherwise| if positive { on_positive } else { otherwise };

    match code {
        c if c == AxisRole::LeftTrigger.code() => CanonicalRole::LeftTrigger,
        c if c == AxisRole::RightTrigger.code() => CanonicalRole::RightTrigger,
        0 => pick(CanonicalRole::LeftAnalogRight, CanonicalRole::LeftAnalogLeft),
        1 => pick(CanonicalRole::LeftAnalogDown, CanonicalRole::LeftAnalogUp),
        2 => pick(CanonicalRole::RightAnalogRight, CanonicalRole::RightAnalogLeft),
        3 => pick(CanonicalRole::RightAnalogDown, CanonicalRole::RightAnalogUp),
        _ => CanonicalRole::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DeviceSnapshot, NoPnp};
    use crate::mapping::GameControllerDb;
    use crate::DeviceKind;

    const XBOX360_GUID: &str = "030000005e0400008e02000014010000";
    const XBOX360_HWID: &str = r"HID\VID_045E&PID_028E&IG_00";

    fn xinput_resolver() -> DeviceResolver<DeviceSnapshot, DeviceSnapshot> {
        DeviceResolver::new(
            DeviceSnapshot::new().with_pnp(XBOX360_HWID),
            DeviceSnapshot::new(),
        )
    }

    fn pad() -> DeviceConfig {
        DeviceConfig::new(DeviceKind::Joystick, "X360", XBOX360_GUID)
            .with_binding(InputBinding::button(LogicalKey::A, 0))
            .with_binding(InputBinding::button(LogicalKey::Select, 6))
            .with_binding(InputBinding::button(LogicalKey::Start, 7))
            .with_binding(InputBinding::hat(LogicalKey::Up, 0, 1))
            .with_binding(InputBinding::hat(LogicalKey::Left, 0, 8))
            .with_binding(InputBinding::axis(LogicalKey::LeftAnalogUp, 1, -1))
            .with_binding(InputBinding::axis(LogicalKey::LeftAnalogLeft, 0, -1))
            .with_binding(InputBinding::axis(LogicalKey::L2, 2, 1))
            .with_binding(InputBinding::axis(LogicalKey::R2, 5, 1))
    }

    #[test]
    fn test_protocol_parse() {
        assert_eq!("RAW".parse::<Protocol>(), Ok(Protocol::Raw));
        assert_eq!(Protocol::default(), Protocol::Mapped);
        assert!("sdl".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_raw_swaps_back_and_start() {
        let resolver = xinput_resolver();
        let db = GameControllerDb::new();
        let translator = Translator::new(&resolver, &db);
        let cfg = pad();
        let select = translator.to_raw_gamepad_code(&cfg, LogicalKey::Select).unwrap();
        let start = translator.to_raw_gamepad_code(&cfg, LogicalKey::Start).unwrap();
        assert_eq!((select.name, select.code), (LogicalKey::Select, 7));
        assert_eq!((start.name, start.code), (LogicalKey::Start, 6));
        assert_eq!(translator.to_raw_gamepad_code(&cfg, LogicalKey::A).unwrap().code, 0);
    }

    #[test]
    fn test_raw_negates_vertical_axes() {
        let resolver = xinput_resolver();
        let db = GameControllerDb::new();
        let translator = Translator::new(&resolver, &db);
        let cfg = pad();
        let up = translator.to_raw_gamepad_code(&cfg, LogicalKey::LeftAnalogUp).unwrap();
        assert_eq!((up.code, up.value), (1, 1));
        let left = translator.to_raw_gamepad_code(&cfg, LogicalKey::LeftAnalogLeft).unwrap();
        assert_eq!((left.code, left.value), (0, -1));
    }

    #[test]
    fn test_raw_passthrough_without_xinput() {
        let resolver = DeviceResolver::new(NoPnp, DeviceSnapshot::new());
        let db = GameControllerDb::new();
        let translator = Translator::new(&resolver, &db);
        let cfg = pad();
        assert_eq!(
            translator.to_raw_gamepad_code(&cfg, LogicalKey::Start),
            cfg.get(LogicalKey::Start).copied()
        );
        assert_eq!(translator.to_raw_gamepad_code(&cfg, LogicalKey::Y), None);
    }

    #[test]
    fn test_canonical_roles() {
        let resolver = xinput_resolver();
        let db = GameControllerDb::new();
        let translator = Translator::new(&resolver, &db);
        let cfg = pad();
        let role = |key| translator.to_canonical_role(&cfg, key, false);
        assert_eq!(role(LogicalKey::A), CanonicalRole::A);
        assert_eq!(role(LogicalKey::Up), CanonicalRole::DpadUp);
        assert_eq!(role(LogicalKey::Left), CanonicalRole::DpadLeft);
        assert_eq!(role(LogicalKey::LeftAnalogUp), CanonicalRole::LeftAnalogUp);
        assert_eq!(role(LogicalKey::LeftAnalogLeft), CanonicalRole::LeftAnalogLeft);
        assert_eq!(role(LogicalKey::L2), CanonicalRole::RightAnalogRight);
        assert_eq!(role(LogicalKey::R2), CanonicalRole::RightTrigger);
        assert_eq!(role(LogicalKey::Y), CanonicalRole::Unknown);
    }

    #[test]
    fn test_canonical_roles_reversed() {
        let resolver = xinput_resolver();
        let db = GameControllerDb::new();
        let translator = Translator::new(&resolver, &db);
        let cfg = pad();
        let role = |key| translator.to_canonical_role(&cfg, key, true);
        assert_eq!(role(LogicalKey::LeftAnalogUp), CanonicalRole::LeftAnalogDown);
        assert_eq!(role(LogicalKey::LeftAnalogLeft), CanonicalRole::LeftAnalogRight);
        assert_eq!(role(LogicalKey::R2), CanonicalRole::RightTrigger);
    }

    #[test]
    fn test_axis_role_zero_value() {
        assert_eq!(axis_role(0, 0, false), CanonicalRole::LeftAnalogLeft);
        assert_eq!(axis_role(3, 0, true), CanonicalRole::RightAnalogUp);
        assert_eq!(axis_role(4, 0, false), CanonicalRole::LeftTrigger);
        assert_eq!(axis_role(6, 1, false), CanonicalRole::Unknown);
    }

    #[test]
    fn test_canonical_role_unknown_without_xinput() {
        let resolver = DeviceResolver::new(NoPnp, DeviceSnapshot::new());
        let db = GameControllerDb::new();
        let translator = Translator::new(&resolver, &db);
        assert_eq!(
            translator.to_canonical_role(&pad(), LogicalKey::A, false),
            CanonicalRole::Unknown
        );
    }

    #[test]
    fn test_button_code_outside_roles() {
        let resolver = xinput_resolver();
        let db = GameControllerDb::new();
        let translator = Translator::new(&resolver, &db);
        let cfg = pad().with_binding(InputBinding::button(LogicalKey::Hotkey, 13));
        assert_eq!(
            translator.to_canonical_role(&cfg, LogicalKey::Hotkey, false),
            CanonicalRole::Unknown
        );
    }

    #[test]
    fn test_mapped_exact_match() {
        let resolver = xinput_resolver();
        let db: GameControllerDb = format!(
            "{},X360,a:b0,back:b6,start:b7,dpup:h0.1,lefty:a1~,lefttrigger:a2",
            XBOX360_GUID
        )
        .parse()
        .unwrap();
        let translator = Translator::new(&resolver, &db);
        let cfg = pad();

        let select = translator.to_mapped_code(&cfg, LogicalKey::Select).unwrap();
        assert_eq!(select, InputBinding::button(LogicalKey::Select, 4));
        let up = translator.to_mapped_code(&cfg, LogicalKey::Up).unwrap();
        assert_eq!(up, InputBinding::button(LogicalKey::Up, 11));
        let stick = translator.to_mapped_code(&cfg, LogicalKey::LeftAnalogUp).unwrap();
        assert_eq!(stick, InputBinding::axis(LogicalKey::LeftAnalogUp, 1, 1));
        let trigger = translator.to_mapped_code(&cfg, LogicalKey::L2).unwrap();
        assert_eq!(trigger, InputBinding::axis(LogicalKey::L2, 4, 1));
    }

    #[test]
    fn test_mapped_unmatched_falls_back_to_raw() {
        let resolver = xinput_resolver();
        let db: GameControllerDb = format!("{},X360,a:b0,leftx:a0", XBOX360_GUID)
            .parse()
            .unwrap();
        let translator = Translator::new(&resolver, &db);
        let start = translator.to_mapped_code(&pad(), LogicalKey::Start).unwrap();
        assert_eq!(start, InputBinding::button(LogicalKey::Start, 6));
    }

    #[test]
    fn test_mapped_dpad_buttons_without_axes() {
        let resolver = xinput_resolver();
        let db: GameControllerDb = format!("{},Arcade,a:b0,dpleft:b13,dpup:b12", XBOX360_GUID)
            .parse()
            .unwrap();
        let translator = Translator::new(&resolver, &db);
        let cfg = DeviceConfig::new(DeviceKind::Joystick, "Arcade", XBOX360_GUID)
            .with_binding(InputBinding::button(LogicalKey::Left, 20))
            .with_binding(InputBinding::hat(LogicalKey::Up, 0, 1));
        let left = translator.to_mapped_code(&cfg, LogicalKey::Left).unwrap();
        assert_eq!(left, InputBinding::button(LogicalKey::Left, 13));
        // only entries of the binding's own physical kind qualify
        let up = translator.to_mapped_code(&cfg, LogicalKey::Up).unwrap();
        assert_eq!(up, InputBinding::hat(LogicalKey::Up, 0, 1));
    }

    #[test]
    fn test_mapped_no_dpad_retry_with_axis_roles() {
        let resolver = xinput_resolver();
        let db: GameControllerDb = format!("{},Arcade,dpleft:b13,leftx:a0", XBOX360_GUID)
            .parse()
            .unwrap();
        let translator = Translator::new(&resolver, &db);
        let cfg = DeviceConfig::new(DeviceKind::Joystick, "Arcade", XBOX360_GUID)
            .with_binding(InputBinding::button(LogicalKey::Left, 20));
        let left = translator.to_mapped_code(&cfg, LogicalKey::Left).unwrap();
        assert_eq!(left, InputBinding::button(LogicalKey::Left, 20));
    }

    #[test]
    fn test_mapped_first_declared_entry_wins() {
        let resolver = xinput_resolver();
        let db: GameControllerDb = format!("{},Pad,x:b5,y:b5", XBOX360_GUID)
            .parse()
            .unwrap();
        let translator = Translator::new(&resolver, &db);
        let cfg = DeviceConfig::new(DeviceKind::Joystick, "Pad", XBOX360_GUID)
            .with_binding(InputBinding::button(LogicalKey::Y, 5));
        let y = translator.to_mapped_code(&cfg, LogicalKey::Y).unwrap();
        assert_eq!(y, InputBinding::button(LogicalKey::Y, 2));
    }

    #[test]
    fn test_mapped_with_malformed_database_lines() {
        let resolver = xinput_resolver();
        let db: GameControllerDb = format!(
            "xinput,XInput Controller,a:b0,b:b1\n{},X360,a:b0,back:b6,leftx:a0\n",
            XBOX360_GUID
        )
        .parse()
        .unwrap();
        let translator = Translator::new(&resolver, &db);
        let select = translator.to_mapped_code(&pad(), LogicalKey::Select).unwrap();
        assert_eq!(select, InputBinding::button(LogicalKey::Select, 4));
    }

    #[test]
    fn test_mapped_without_database_entry() {
        let resolver = xinput_resolver();
        let db = GameControllerDb::new();
        let translator = Translator::new(&resolver, &db);
        let cfg = pad();
        assert_eq!(
            translator.to_mapped_code(&cfg, LogicalKey::Start),
            cfg.get(LogicalKey::Start).copied()
        );
    }

    #[test]
    fn test_translate_all_keeps_order() {
        let resolver = xinput_resolver();
        let db = GameControllerDb::new();
        let translator = Translator::new(&resolver, &db);
        let cfg = pad();
        let raw = translator.translate_all(&cfg, Protocol::Raw);
        let names: Vec<_> = raw.iter().map(|b| b.name).collect();
        let stored: Vec<_> = cfg.bindings().map(|b| b.name).collect();
        assert_eq!(names, stored);
        assert_eq!(raw[1].code, 7);

        let passthrough = translator.translate_all(&cfg, Protocol::Passthrough);
        assert_eq!(passthrough, cfg.bindings().copied().collect::<Vec<_>>());
        assert_eq!(translator.canonical_roles(&cfg, false).len(), cfg.len());
    }
}
