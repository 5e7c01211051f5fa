// Padxlate Config Parser - TOML with Serde
// Parses device configurations and device snapshots from TOML files

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::identity::{self, Identity};
use crate::input::{DeviceSnapshot, LiveDevice, UsageClass};
use crate::{DeviceConfig, DeviceKind, InputBinding, InputKind, LogicalKey};

/// Configuration parser errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid device type: {0}")]
    InvalidKind(String),

    #[error("Invalid input type: {0}")]
    InvalidInputType(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid usage: {0}")]
    InvalidUsage(String),
}

/// Device file root table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevicesToml {
    #[serde(default)]
    pub device: Vec<DeviceToml>,
}

/// One `[[device]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceToml {
    #[serde(rename = "type")]
    pub kind: String,

    pub name: String,

    /// Legacy 32-hex identity; keyboards usually leave it empty
    #[serde(default)]
    pub guid: String,

    #[serde(default)]
    pub input: Vec<InputToml>,
}

/// One `[[device.input]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputToml {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub id: i64,

    #[serde(default = "default_value")]
    pub value: i64,
}

fn default_value() -> i64 {
    1
}

/// Snapshot file root table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotToml {
    #[serde(default)]
    pub pnp: Vec<PnpToml>,

    #[serde(default)]
    pub joystick: Vec<JoystickToml>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PnpToml {
    pub hardware_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoystickToml {
    pub instance: String,
    pub product: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_usage")]
    pub usage: String,
}

fn default_usage() -> String {
    "gamepad".to_string()
}

impl DevicesToml {
    /// Convert to device configurations, in file order
    pub fn to_devices(&self) -> Result<Vec<DeviceConfig>, ConfigError> {
        self.device.iter().map(DeviceToml::to_device).collect()
    }
}

impl DeviceToml {
    fn to_device(&self) -> Result<DeviceConfig, ConfigError> {
        let kind: DeviceKind = self.kind.parse().map_err(ConfigError::InvalidKind)?;
        if !self.guid.is_empty() && identity::decode(&self.guid).is_empty() {
            log::warn!(
                "Device '{}': guid '{}' is not a 32-digit hex identity",
                self.name,
                self.guid
            );
        }

        let mut device = DeviceConfig::new(kind, &self.name, &self.guid);
        let mut seen = HashSet::new();
        for input in &self.input {
            let binding = input.to_binding()?;
            if !seen.insert(binding.name) {
                log::warn!(
                    "Device '{}': duplicate binding for '{}' ignored",
                    self.name,
                    input.name
                );
                continue;
            }
            device.bind(binding);
        }
        Ok(device)
    }
}

impl InputToml {
    fn to_binding(&self) -> Result<InputBinding, ConfigError> {
        let name = LogicalKey::from_name(&self.name)
            .ok_or_else(|| ConfigError::InvalidKey(self.name.clone()))?;
        let kind: InputKind = self.kind.parse().map_err(ConfigError::InvalidInputType)?;
        Ok(InputBinding::new(name, kind, self.id, self.value))
    }
}

impl SnapshotToml {
    pub fn to_snapshot(&self) -> Result<DeviceSnapshot, ConfigError> {
        let mut snapshot = DeviceSnapshot::new();
        for pnp in &self.pnp {
            snapshot = snapshot.with_pnp(&pnp.hardware_id);
        }
        for joystick in &self.joystick {
            snapshot = snapshot.with_joystick(joystick.to_live_device()?);
        }
        Ok(snapshot)
    }
}

impl JoystickToml {
    fn to_live_device(&self) -> Result<LiveDevice, ConfigError> {
        let usage = UsageClass::from_str(&self.usage)
            .ok_or_else(|| ConfigError::InvalidUsage(self.usage.clone()))?;
        Ok(LiveDevice::new(
            parse_identity(&self.instance)?,
            parse_identity(&self.product)?,
            &self.name,
            usage,
        ))
    }
}

fn parse_identity(s: &str) -> Result<Identity, ConfigError> {
    s.parse().map_err(ConfigError::InvalidIdentity)
}

/// Parse device configurations from a TOML string
pub fn devices_from_toml(content: &str) -> Result<Vec<DeviceConfig>, ConfigError> {
    let devices: DevicesToml =
        toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
    devices.to_devices()
}

/// Load device configurations from a TOML file
pub fn load_devices<P: AsRef<Path>>(path: P) -> Result<Vec<DeviceConfig>, ConfigError> {
    let content = fs::read_to_string(path)?;
    devices_from_toml(&content)
}

/// Parse a device snapshot from a TOML string
pub fn snapshot_from_toml(content: &str) -> Result<DeviceSnapshot, ConfigError> {
    let snapshot: SnapshotToml =
        toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
    snapshot.to_snapshot()
}

/// Load a device snapshot from a TOML file
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<DeviceSnapshot, ConfigError> {
    let content = fs::read_to_string(path)?;
    snapshot_from_toml(&content)
}

/// Get the default device file path
pub fn default_devices_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("padxlate").join("devices.toml"))
}

/// Load from default location (~/.config/padxlate/devices.toml)
pub fn load_default_devices() -> Result<Vec<DeviceConfig>, ConfigError> {
    if let Some(path) = default_devices_path() {
        if path.exists() {
            return load_devices(path);
        }
    }
    // No device file yet
    Ok(Vec::new())
}
