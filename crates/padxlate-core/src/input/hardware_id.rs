// Padxlate Input Layer - Hardware Id Parsing
// Extracts USB vendor/product tokens from PNP hardware id strings

use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

use crate::identity::UsbIds;

/// Token present in hardware ids of XInput interfaces (`&IG_00`)
pub const XINPUT_MARKER: &str = "IG_";

static USB_ID_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([VP])ID_([0-9a-fA-F]{4})").expect("USB id token pattern is valid")
});

/// Whether a hardware id belongs to an XInput interface
pub fn is_xinput_hardware_id(hardware_id: &str) -> bool {
    hardware_id.contains(XINPUT_MARKER)
}

/// Parse the `VID_xxxx` / `PID_xxxx` tokens of a hardware id.
///
/// Exactly two tokens must be present, one of each kind; anything else
/// (a missing token, a repeated token, extra tokens) yields `None`.
pub fn parse_usb_ids(hardware_id: &str) -> Option<UsbIds> {
    let tokens: SmallVec<[(&str, &str); 2]> = USB_ID_TOKEN
        .captures_iter(hardware_id)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .collect();
    if tokens.len() != 2 {
        return None;
    }

    let mut vendor = None;
    let mut product = None;
    for (kind, digits) in tokens {
        let value = u16::from_str_radix(digits, 16).ok()?;
        match kind {
            "V" => vendor = Some(value),
            _ => product = Some(value),
        }
    }

    Some(UsbIds::new(vendor?, product?))
}
