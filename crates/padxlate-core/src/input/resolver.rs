// Padxlate Input Layer - Device Identity Resolver
// Matches stored device identities against enumerated live devices

use std::collections::HashMap;

use parking_lot::Mutex;

use super::device::{JoystickEnumerator, LiveDevice, PnpDevice, PnpEnumerator};
use super::hardware_id::{is_xinput_hardware_id, parse_usb_ids};
use crate::identity::{self, Identity};
use crate::{DeviceConfig, DeviceKind};

/// A stored device configuration matched to an attached device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedJoystick {
    pub device: LiveDevice,
    /// Position among gamepad/joystick-usage devices in enumeration order
    pub index: usize,
    /// Matched through the vendor/product ids embedded in the product identity,
    /// rather than by identity equality
    pub matched_by_usb_ids: bool,
}

/// Memo key: every resolver answer depends only on these two fields
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ConfigKey {
    kind: DeviceKind,
    identity: String,
}

impl ConfigKey {
    fn of(cfg: &DeviceConfig) -> Self {
        Self {
            kind: cfg.kind(),
            identity: cfg.identity().to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct ResolverCache {
    pnp: Option<Vec<PnpDevice>>,
    /// Game-controller usage devices only, in enumeration order
    joysticks: Option<Vec<LiveDevice>>,
    xinput: HashMap<ConfigKey, bool>,
    resolved: HashMap<ConfigKey, Option<ResolvedJoystick>>,
}

/// Resolves stored device configurations against the attached devices.
///
/// Enumeration runs lazily, at most once per backend until [`invalidate`]
/// is called, and every answer is memoized per configuration. The cache
/// lock is held while a backend runs, so concurrent callers never issue
/// duplicate enumerations.
///
/// [`invalidate`]: DeviceResolver::invalidate
pub struct DeviceResolver<P, J> {
    pnp: P,
    joysticks: J,
    cache: Mutex<ResolverCache>,
}

impl<P: PnpEnumerator, J: JoystickEnumerator> DeviceResolver<P, J> {
    pub fn new(pnp: P, joysticks: J) -> Self {
        Self {
            pnp,
            joysticks,
            cache: Mutex::new(ResolverCache::default()),
        }
    }

    /// Whether the device exposes an XInput interface.
    ///
    /// Detected by finding a PNP hardware id carrying the XInput marker and
    /// the same USB vendor/product ids as the stored identity.
    pub fn is_xinput_capable(&self, cfg: &DeviceConfig) -> bool {
        let key = ConfigKey::of(cfg);
        let mut cache = self.cache.lock();
        if let Some(&capable) = cache.xinput.get(&key) {
            return capable;
        }

        let capable = self.detect_xinput(cfg, &mut cache);
        log::debug!("{}: XInput capable = {}", cfg.display_name(), capable);
        cache.xinput.insert(key, capable);
        capable
    }

    /// Find the attached device a stored configuration refers to
    pub fn resolve_joystick(&self, cfg: &DeviceConfig) -> Option<ResolvedJoystick> {
        let key = ConfigKey::of(cfg);
        let mut cache = self.cache.lock();
        if let Some(resolved) = cache.resolved.get(&key) {
            return resolved.clone();
        }

        let resolved = self.find_joystick(cfg, &mut cache);
        match &resolved {
            Some(found) => log::debug!(
                "{}: resolved to '{}' at index {}",
                cfg.display_name(),
                found.device.display_name,
                found.index
            ),
            None => log::debug!("{}: no attached device matches", cfg.display_name()),
        }
        cache.resolved.insert(key, resolved.clone());
        resolved
    }

    /// 0-based position of the resolved device among game controllers
    pub fn device_index(&self, cfg: &DeviceConfig) -> Option<usize> {
        self.resolve_joystick(cfg).map(|resolved| resolved.index)
    }

    /// Instance identity of the resolved device, or [`Identity::EMPTY`]
    pub fn instance_identity(&self, cfg: &DeviceConfig) -> Identity {
        self.resolve_joystick(cfg)
            .map(|resolved| resolved.device.instance_identity)
            .unwrap_or(Identity::EMPTY)
    }

    /// Attached game controllers, in enumeration order
    pub fn joysticks(&self) -> Vec<LiveDevice> {
        let mut cache = self.cache.lock();
        self.joystick_snapshot(&mut cache).to_vec()
    }

    /// Forget enumeration snapshots and memoized answers.
    ///
    /// Call after the set of attached devices changed.
    pub fn invalidate(&self) {
        *self.cache.lock() = ResolverCache::default();
        log::debug!("Device resolver cache invalidated");
    }

    fn detect_xinput(&self, cfg: &DeviceConfig, cache: &mut ResolverCache) -> bool {
        if cfg.is_keyboard() || !identity::is_legacy_joystick(cfg.identity()) {
            return false;
        }
        let Some(wanted) = identity::usb_ids(cfg.identity()) else {
            return false;
        };

        self.pnp_snapshot(cache)
            .iter()
            .filter(|device| is_xinput_hardware_id(&device.hardware_id))
            .filter_map(|device| parse_usb_ids(&device.hardware_id))
            .any(|ids| ids == wanted)
    }

    fn find_joystick(
        &self,
        cfg: &DeviceConfig,
        cache: &mut ResolverCache,
    ) -> Option<ResolvedJoystick> {
        if cfg.is_keyboard() || cfg.identity().is_empty() {
            return None;
        }
        let wanted = identity::usb_ids(cfg.identity());
        let product = cfg.product_identity();

        self.joystick_snapshot(cache)
            .iter()
            .enumerate()
            .find_map(|(index, device)| {
                let matched_by_usb_ids = match device.product_identity.pidvid_ids() {
                    Some(ids) if wanted == Some(ids) => true,
                    Some(_) => return None,
                    None if !product.is_empty()
                        && (product == device.product_identity
                            || product == device.instance_identity) =>
                    {
                        false
                    }
                    None => return None,
                };
                Some(ResolvedJoystick {
                    device: device.clone(),
                    index,
                    matched_by_usb_ids,
                })
            })
    }

    fn pnp_snapshot<'c>(&self, cache: &'c mut ResolverCache) -> &'c [PnpDevice] {
        cache.pnp.get_or_insert_with(|| match self.pnp.enumerate_pnp() {
            Ok(devices) => {
                log::debug!("PNP enumeration returned {} device(s)", devices.len());
                devices
            }
            Err(e) => {
                log::debug!("PNP enumeration failed, assuming no devices: {}", e);
                Vec::new()
            }
        })
    }

    fn joystick_snapshot<'c>(&self, cache: &'c mut ResolverCache) -> &'c [LiveDevice] {
        cache
            .joysticks
            .get_or_insert_with(|| match self.joysticks.enumerate_joysticks() {
                Ok(devices) => {
                    let controllers: Vec<LiveDevice> = devices
                        .into_iter()
                        .filter(|device| device.usage.is_game_controller())
                        .collect();
                    log::debug!(
                        "Joystick enumeration returned {} game controller(s)",
                        controllers.len()
                    );
                    controllers
                }
                Err(e) => {
                    log::debug!("Joystick enumeration failed, assuming no devices: {}", e);
                    Vec::new()
                }
            })
    }
}
