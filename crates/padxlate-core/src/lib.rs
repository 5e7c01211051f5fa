// Padxlate Core Library
// Controller input translation for emulator input backends

pub mod binding;
pub mod device;
pub mod identity;
pub mod input;
pub mod key;
pub mod mapping;
pub mod role;
pub mod transform;

#[cfg(feature = "config")]
pub mod config;

pub use binding::{InputBinding, InputKind, PhysicalInput};
pub use device::{DeviceConfig, DeviceKind};
pub use identity::{Identity, UsbIds};
pub use input::{
    DeviceResolver, DeviceSnapshot, EnumerationError, JoystickEnumerator, LiveDevice, NoPnp,
    PnpDevice, PnpEnumerator, ResolvedJoystick, UsageClass,
};
pub use key::LogicalKey;
pub use mapping::{ControllerMapping, GameControllerDb, MappingDatabase, MappingParseError};
pub use role::CanonicalRole;
pub use transform::{Protocol, Translator};

#[cfg(feature = "evdev-backend")]
pub use input::EvdevJoysticks;

#[cfg(feature = "config")]
pub use config::ConfigError;
