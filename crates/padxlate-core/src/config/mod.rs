// Padxlate Config API
// Device files and device snapshot files

pub mod parser;

pub use parser::{
    default_devices_path, devices_from_toml, load_default_devices, load_devices, load_snapshot,
    snapshot_from_toml, ConfigError, DevicesToml, SnapshotToml,
};
