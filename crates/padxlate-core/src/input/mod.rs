// Padxlate Input Layer
// Device enumeration backends and stored-identity resolution

mod device;
#[cfg(feature = "evdev-backend")]
mod evdev_backend;
pub mod hardware_id;
mod resolver;
mod snapshot;

pub use device::{
    EnumerationError, EnumerationResult, JoystickEnumerator, LiveDevice, NoPnp, PnpDevice,
    PnpEnumerator, UsageClass,
};
#[cfg(feature = "evdev-backend")]
pub use evdev_backend::EvdevJoysticks;
pub use hardware_id::{is_xinput_hardware_id, parse_usb_ids, XINPUT_MARKER};
pub use resolver::{DeviceResolver, ResolvedJoystick};
pub use snapshot::DeviceSnapshot;
