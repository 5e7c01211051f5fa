// Padxlate CLI
// Inspect how stored controller configurations resolve and translate

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use padxlate_core::config;
use padxlate_core::input::{DeviceResolver, JoystickEnumerator, NoPnp, PnpEnumerator};
use padxlate_core::{DeviceConfig, GameControllerDb, Protocol, Translator};

type BoxedResolver = DeviceResolver<Box<dyn PnpEnumerator>, Box<dyn JoystickEnumerator>>;

/// Controller input translation inspector
#[derive(Parser, Debug)]
#[command(name = "padxlate")]
#[command(version)]
#[command(about = "Resolve stored controller configs and show their translated bindings", long_about = None)]
struct Args {
    /// TOML device file (defaults to ~/.config/padxlate/devices.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// TOML device snapshot used instead of querying attached devices
    #[arg(short, long, value_name = "SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// gamecontrollerdb.txt file with native controller mappings
    #[arg(short, long, value_name = "DB")]
    mapping_db: Option<PathBuf>,

    /// Encoding to translate bindings into
    #[arg(short, long, default_value = "mapped", value_parser = parse_protocol)]
    protocol: Protocol,

    /// Print canonical roles instead of translated bindings
    #[arg(long)]
    roles: bool,

    /// Treat negative stick values as the positive direction (with --roles)
    #[arg(long)]
    reverse_axis: bool,

    /// List attached game controllers
    #[arg(long)]
    list_devices: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_protocol(s: &str) -> Result<Protocol, String> {
    s.parse()
}

/// Main application state
struct Application {
    devices: Vec<DeviceConfig>,
    resolver: BoxedResolver,
    mappings: GameControllerDb,
    args: Args,
}

impl Application {
    fn new(args: Args) -> Result<Self> {
        let resolver = build_resolver(args.snapshot.as_deref())?;

        let mappings = match &args.mapping_db {
            Some(path) => GameControllerDb::load(path)
                .with_context(|| format!("failed to load mapping database {}", path.display()))?,
            None => GameControllerDb::new(),
        };

        let devices = if args.list_devices {
            Vec::new()
        } else {
            load_devices(args.config.as_deref())?
        };

        Ok(Self {
            devices,
            resolver,
            mappings,
            args,
        })
    }

    /// Validate configuration
    fn validate(&self) {
        println!(
            "Configuration is valid: {} device(s), {} controller mapping(s)",
            self.devices.len(),
            self.mappings.len()
        );
    }

    /// List attached game controllers
    fn list_devices(&self) {
        let joysticks = self.resolver.joysticks();
        println!("Found {} game controller(s):", joysticks.len());
        for (index, device) in joysticks.iter().enumerate() {
            let ids = device
                .product_identity
                .pidvid_ids()
                .map(|ids| format!(" [{}]", ids))
                .unwrap_or_default();
            println!("  {}: {}{}", index, device.display_name, ids);
            println!("     instance {}", device.instance_identity);
            println!("     product  {}", device.product_identity);
        }
    }

    fn run(&self) {
        let translator = Translator::new(&self.resolver, &self.mappings);
        for cfg in &self.devices {
            print!(
                "{}",
                describe_device(
                    &translator,
                    cfg,
                    self.args.protocol,
                    self.args.roles,
                    self.args.reverse_axis
                )
            );
        }
    }
}

fn build_resolver(snapshot: Option<&Path>) -> Result<BoxedResolver> {
    if let Some(path) = snapshot {
        let snapshot = config::load_snapshot(path)
            .with_context(|| format!("failed to load device snapshot {}", path.display()))?;
        log::debug!(
            "Using snapshot with {} PNP and {} joystick entries",
            snapshot.pnp.len(),
            snapshot.joysticks.len()
        );
        return Ok(DeviceResolver::new(
            Box::new(snapshot.clone()),
            Box::new(snapshot),
        ));
    }

    Ok(DeviceResolver::new(Box::new(NoPnp), system_joysticks()))
}

#[cfg(feature = "evdev-backend")]
fn system_joysticks() -> Box<dyn JoystickEnumerator> {
    Box::new(padxlate_core::EvdevJoysticks::new())
}

#[cfg(not(feature = "evdev-backend"))]
fn system_joysticks() -> Box<dyn JoystickEnumerator> {
    log::warn!("Built without evdev support; no attached devices will be found (use --snapshot)");
    Box::new(padxlate_core::DeviceSnapshot::new())
}

fn load_devices(path: Option<&Path>) -> Result<Vec<DeviceConfig>> {
    match path {
        Some(path) => config::load_devices(path)
            .with_context(|| format!("failed to load device file {}", path.display())),
        None => {
            let default = config::default_devices_path()
                .context("no config directory on this system; pass --config")?;
            config::load_default_devices()
                .with_context(|| format!("failed to load device file {}", default.display()))
        }
    }
}

/// Resolution and translation report for one device
fn describe_device<P: PnpEnumerator, J: JoystickEnumerator>(
    translator: &Translator<'_, P, J>,
    cfg: &DeviceConfig,
    protocol: Protocol,
    roles: bool,
    reverse_axis: bool,
) -> String {
    let resolver = translator.resolver();
    let mut out = String::new();

    out.push_str(&format!("{} [{}]\n", cfg.display_name(), cfg.kind()));
    if !cfg.is_keyboard() {
        out.push_str(&format!("  identity: {}\n", cfg.product_identity()));
        match resolver.resolve_joystick(cfg) {
            Some(found) => out.push_str(&format!(
                "  attached: #{} '{}'{}\n",
                found.index,
                found.device.display_name,
                if found.matched_by_usb_ids { " (matched by usb ids)" } else { "" }
            )),
            None => out.push_str("  attached: no\n"),
        }
        out.push_str(&format!(
            "  xinput capable: {}\n",
            if resolver.is_xinput_capable(cfg) { "yes" } else { "no" }
        ));
    }

    if roles {
        for (key, role) in translator.canonical_roles(cfg, reverse_axis) {
            out.push_str(&format!("  {} -> {}\n", key, role));
        }
    } else {
        for (stored, translated) in cfg.bindings().zip(translator.translate_all(cfg, protocol)) {
            out.push_str(&format!("  {} -> {}\n", stored, translated));
        }
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let app = Application::new(args)?;

    // Handle list-devices flag (doesn't require config)
    if app.args.list_devices {
        app.list_devices();
        return Ok(());
    }

    // Handle check-config flag
    if app.args.check_config {
        app.validate();
        return Ok(());
    }

    app.run();
    Ok(())
}
