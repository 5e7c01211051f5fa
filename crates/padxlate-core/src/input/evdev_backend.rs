// Padxlate Input Layer - Evdev Joystick Backend
// Enumerates game controllers from /dev/input/event* nodes

use std::path::Path;

use evdev::{Device, EventType, Key};

use super::device::{
    EnumerationError, EnumerationResult, JoystickEnumerator, LiveDevice, UsageClass,
};
use crate::identity::{self, Identity, UsbIds};

/// Joystick enumeration backed by the kernel evdev interface.
///
/// Devices are returned in event node order (`event2` before `event10`).
/// Nodes that cannot be opened are skipped by the `evdev` crate itself,
/// so an unprivileged user simply sees fewer devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvdevJoysticks;

impl EvdevJoysticks {
    pub fn new() -> Self {
        Self
    }

    /// Usage class derived from the buttons a device reports
    fn usage_of(device: &Device) -> UsageClass {
        if !device.supported_events().contains(EventType::KEY) {
            return UsageClass::Other;
        }
        let Some(keys) = device.supported_keys() else {
            return UsageClass::Other;
        };

        if keys.contains(Key::BTN_SOUTH) {
            UsageClass::Gamepad
        } else if keys.contains(Key::BTN_TRIGGER) {
            UsageClass::Joystick
        } else {
            UsageClass::Other
        }
    }

    fn live_device(device: &Device) -> LiveDevice {
        let id = device.input_id();
        let ids = UsbIds::new(id.vendor(), id.product());
        LiveDevice::new(
            instance_identity(id.bus_type().0, ids, id.version()),
            Identity::from_usb_ids(ids),
            device.name().unwrap_or("Unknown"),
            Self::usage_of(device),
        )
    }
}

impl JoystickEnumerator for EvdevJoysticks {
    fn enumerate_joysticks(&self) -> EnumerationResult<Vec<LiveDevice>> {
        let input_dir = Path::new("/dev/input");
        if !input_dir.exists() {
            return Err(EnumerationError::Unavailable(
                "/dev/input does not exist".to_string(),
            ));
        }

        let mut nodes: Vec<_> = evdev::enumerate()
            .map(|(path, device)| (event_number(&path), device))
            .collect();
        nodes.sort_by_key(|(number, _)| *number);

        let devices: Vec<LiveDevice> = nodes
            .iter()
            .map(|(_, device)| Self::live_device(device))
            .collect();
        log::debug!("evdev: {} input device(s) found", devices.len());
        Ok(devices)
    }
}

/// Numeric suffix of an `eventN` node; unnumbered paths sort last
fn event_number(path: &Path) -> u32 {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("event"))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(u32::MAX)
}

/// Identity of the legacy string a frontend stores for this device:
/// bus, vendor, product and version as little-endian 16-bit fields,
/// each followed by two zero bytes.
fn instance_identity(bus: u16, ids: UsbIds, version: u16) -> Identity {
    let legacy: String = [bus, ids.vendor, ids.product, version]
        .iter()
        .map(|field| format!("{:04x}0000", field.swap_bytes()))
        .collect();
    identity::decode(&legacy)
}
