// Padxlate Input Layer - Device Snapshots
// Fixed device lists usable as both enumeration backends

use super::device::{
    EnumerationResult, JoystickEnumerator, LiveDevice, PnpDevice, PnpEnumerator,
};

/// A frozen picture of the attached devices.
///
/// Serves as the enumeration backend in tests, and in the CLI when devices
/// are described by a snapshot file instead of queried from the OS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSnapshot {
    pub pnp: Vec<PnpDevice>,
    pub joysticks: Vec<LiveDevice>,
}

impl DeviceSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pnp(mut self, hardware_id: impl Into<String>) -> Self {
        self.pnp.push(PnpDevice::new(hardware_id));
        self
    }

    pub fn with_joystick(mut self, device: LiveDevice) -> Self {
        self.joysticks.push(device);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pnp.is_empty() && self.joysticks.is_empty()
    }
}

impl PnpEnumerator for DeviceSnapshot {
    fn enumerate_pnp(&self) -> EnumerationResult<Vec<PnpDevice>> {
        Ok(self.pnp.clone())
    }
}

impl JoystickEnumerator for DeviceSnapshot {
    fn enumerate_joysticks(&self) -> EnumerationResult<Vec<LiveDevice>> {
        Ok(self.joysticks.clone())
    }
}
