// Padxlate Input Layer - Enumerated Devices
// Live device descriptors and the enumeration backend traits

use crate::identity::Identity;

/// HID usage class reported by a joystick enumeration backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageClass {
    Gamepad,
    Joystick,
    /// Anything else the backend reports (wheels, flight panels, ...)
    Other,
}

impl UsageClass {
    /// Whether the resolver considers devices of this class at all
    pub fn is_game_controller(self) -> bool {
        matches!(self, UsageClass::Gamepad | UsageClass::Joystick)
    }

    /// Convert string to UsageClass
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gamepad" => Some(UsageClass::Gamepad),
            "joystick" => Some(UsageClass::Joystick),
            "other" => Some(UsageClass::Other),
            _ => None,
        }
    }
}

/// A physically attached device as seen by the joystick enumeration backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveDevice {
    /// Identity of this particular attachment
    pub instance_identity: Identity,
    /// Identity of the product model
    pub product_identity: Identity,
    pub display_name: String,
    pub usage: UsageClass,
}

impl LiveDevice {
    pub fn new(
        instance_identity: Identity,
        product_identity: Identity,
        display_name: impl Into<String>,
        usage: UsageClass,
    ) -> Self {
        Self {
            instance_identity,
            product_identity,
            display_name: display_name.into(),
            usage,
        }
    }
}

/// A present device as seen by the PNP/HID enumeration backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PnpDevice {
    /// Free-text hardware id, e.g. `HID\VID_045E&PID_028E&IG_00\...`
    pub hardware_id: String,
}

impl PnpDevice {
    pub fn new(hardware_id: impl Into<String>) -> Self {
        Self {
            hardware_id: hardware_id.into(),
        }
    }
}

/// Errors an enumeration backend may report.
///
/// The resolver never propagates these; they degrade to an empty device list.
#[derive(Debug, thiserror::Error)]
pub enum EnumerationError {
    #[error("Enumeration backend unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for enumeration backends
pub type EnumerationResult<T> = Result<T, EnumerationError>;

/// Lists hardware ids of all present PNP/HID devices
pub trait PnpEnumerator {
    fn enumerate_pnp(&self) -> EnumerationResult<Vec<PnpDevice>>;
}

/// Lists attached game controllers in a stable order
pub trait JoystickEnumerator {
    fn enumerate_joysticks(&self) -> EnumerationResult<Vec<LiveDevice>>;
}

impl<T: PnpEnumerator + ?Sized> PnpEnumerator for &T {
    fn enumerate_pnp(&self) -> EnumerationResult<Vec<PnpDevice>> {
        (**self).enumerate_pnp()
    }
}

impl<T: PnpEnumerator + ?Sized> PnpEnumerator for Box<T> {
    fn enumerate_pnp(&self) -> EnumerationResult<Vec<PnpDevice>> {
        (**self).enumerate_pnp()
    }
}

impl<T: JoystickEnumerator + ?Sized> JoystickEnumerator for &T {
    fn enumerate_joysticks(&self) -> EnumerationResult<Vec<LiveDevice>> {
        (**self).enumerate_joysticks()
    }
}

impl<T: JoystickEnumerator + ?Sized> JoystickEnumerator for Box<T> {
    fn enumerate_joysticks(&self) -> EnumerationResult<Vec<LiveDevice>> {
        (**self).enumerate_joysticks()
    }
}

/// PNP backend for platforms without a PNP query
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPnp;

impl PnpEnumerator for NoPnp {
    fn enumerate_pnp(&self) -> EnumerationResult<Vec<PnpDevice>> {
        Err(EnumerationError::Unavailable(
            "no PNP enumeration on this platform".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_class_filter() {
        assert!(UsageClass::Gamepad.is_game_controller());
        assert!(UsageClass::Joystick.is_game_controller());
        assert!(!UsageClass::Other.is_game_controller());
    }

    #[test]
    fn test_usage_class_from_str() {
        assert_eq!(UsageClass::from_str("GamePad"), Some(UsageClass::Gamepad));
        assert_eq!(UsageClass::from_str("wheel"), None);
    }

    #[test]
    fn test_no_pnp_is_unavailable() {
        let err = NoPnp.enumerate_pnp().unwrap_err();
        assert!(matches!(err, EnumerationError::Unavailable(_)));
    }

    #[test]
    fn test_boxed_enumerator_delegates() {
        let boxed: Box<dyn PnpEnumerator> = Box::new(NoPnp);
        assert!(boxed.enumerate_pnp().is_err());
    }
}
