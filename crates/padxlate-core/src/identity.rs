// Padxlate Device Identity Codec
// Legacy 32-hex device identity strings and canonical 128-bit identities

use std::fmt;
use std::str::FromStr;

/// Prefix of legacy identities describing a USB joystick-class device
pub const LEGACY_JOYSTICK_MARKER: &str = "03000000";

/// Trailing bytes ("PIDVID" in ASCII) of product identities that embed
/// a USB vendor/product pair
pub const PIDVID_SUFFIX: &str = "504944564944";

const PIDVID_SUFFIX_BITS: u128 = 0x5049_4456_4944;

/// Canonical 128-bit device identity.
///
/// The text form is the lowercase `8-4-4-4-12` GUID layout. The zero value
/// is [`Identity::EMPTY`], which means "unresolvable" everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identity(u128);

impl Identity {
    pub const EMPTY: Identity = Identity(0);

    pub const fn from_u128(raw: u128) -> Self {
        Identity(raw)
    }

    pub const fn as_u128(self) -> u128 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Product identity in the layout DirectInput uses for HID devices:
    /// `PPPPVVVV-0000-0000-0000-504944564944`
    pub fn from_usb_ids(ids: UsbIds) -> Self {
        Identity(
            (u128::from(ids.product) << 112) | (u128::from(ids.vendor) << 96) | PIDVID_SUFFIX_BITS,
        )
    }

    /// 32 lowercase hex digits, no separators
    pub fn to_hex(self) -> String {
        format!("{:032x}", self.0)
    }

    /// Vendor/product pair embedded in a PIDVID-layout product identity.
    ///
    /// Returns `None` when the identity does not end with [`PIDVID_SUFFIX`].
    pub fn pidvid_ids(self) -> Option<UsbIds> {
        let hex = self.to_hex();
        if !hex.ends_with(PIDVID_SUFFIX) {
            return None;
        }
        Some(UsbIds {
            product: hex_u16(&hex[0..4])?,
            vendor: hex_u16(&hex[4..8])?,
        })
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}

impl FromStr for Identity {
    type Err = String;

    /// Parse the canonical text form; braces and dashes are optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s
            .trim()
            .trim_start_matches('{')
            .trim_end_matches('}')
            .chars()
            .filter(|c| *c != '-')
            .collect();
        if digits.len() != 32 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("Invalid identity: {}", s));
        }
        u128::from_str_radix(&digits, 16)
            .map(Identity)
            .map_err(|e| format!("Invalid identity {}: {}", s, e))
    }
}

/// USB vendor and product ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsbIds {
    pub vendor: u16,
    pub product: u16,
}

impl UsbIds {
    pub fn new(vendor: u16, product: u16) -> Self {
        Self { vendor, product }
    }
}

impl fmt::Display for UsbIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}:{:04X}", self.vendor, self.product)
    }
}

/// Reorder the 32-hex-digit groups between the legacy and canonical layouts.
///
/// The first three groups are little-endian in the legacy string, so the
/// same permutation maps in both directions.
fn swap_groups(hex: &str) -> String {
    [
        &hex[6..8],
        &hex[4..6],
        &hex[2..4],
        &hex[0..2],
        &hex[10..12],
        &hex[8..10],
        &hex[14..16],
        &hex[12..14],
        &hex[16..20],
        &hex[20..32],
    ]
    .concat()
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn hex_u16(s: &str) -> Option<u16> {
    if s.len() != 4 || !is_hex(s) {
        return None;
    }
    u16::from_str_radix(s, 16).ok()
}

/// Decode a legacy identity string.
///
/// Returns [`Identity::EMPTY`] if the string is not exactly 32 hex digits.
pub fn decode(legacy: &str) -> Identity {
    if legacy.len() != 32 || !is_hex(legacy) {
        return Identity::EMPTY;
    }
    u128::from_str_radix(&swap_groups(legacy), 16)
        .map(Identity)
        .unwrap_or(Identity::EMPTY)
}

/// Encode an identity back into the legacy layout.
///
/// Output is always lowercase hex, so `encode(decode(s))` returns `s` only
/// up to ASCII case.
pub fn encode(identity: Identity) -> String {
    swap_groups(&identity.to_hex())
}

/// Whether a legacy identity carries the USB joystick-class marker
pub fn is_legacy_joystick(legacy: &str) -> bool {
    legacy.len() >= 32 && legacy.starts_with(LEGACY_JOYSTICK_MARKER)
}

/// USB vendor/product ids stored in a legacy identity.
///
/// Vendor is read from hex offsets 10-11,8-9 and product from 18-19,16-17.
pub fn usb_ids(legacy: &str) -> Option<UsbIds> {
    let vendor = [legacy.get(10..12)?, legacy.get(8..10)?].concat();
    let product = [legacy.get(18..20)?, legacy.get(16..18)?].concat();
    Some(UsbIds {
        vendor: hex_u16(&vendor)?,
        product: hex_u16(&product)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const XBOX360: &str = "030000005e0400008e02000014010000";

    #[test]
    fn test_decode_reorders_groups() {
        let identity = decode(XBOX360);
        assert_eq!(identity.to_string(), "00000003-045e-0000-8e02-000014010000");
    }

    #[test]
    fn test_decode_group_layout() {
        let identity = decode("00112233445566778899aabbccddeeff");
        assert_eq!(identity.to_string(), "33221100-5544-7766-8899-aabbccddeeff");
    }

    #[test]
    fn test_decode_rejects_bad_length() {
        assert!(decode("").is_empty());
        assert!(decode("030000005e0400008e0200001401000").is_empty());
        assert!(decode("030000005e0400008e020000140100000").is_empty());
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        assert!(decode("030000005e0400008e0200001401000g").is_empty());
        assert!(decode("+30000005e0400008e02000014010000").is_empty());
    }

    #[test]
    fn test_decode_accepts_uppercase() {
        assert_eq!(
            decode("030000005E0400008E02000014010000"),
            decode(XBOX360)
        );
    }

    #[test]
    fn test_encode_inverts_decode() {
        for legacy in [
            XBOX360,
            "00112233445566778899aabbccddeeff",
            "ffffffffffffffffffffffffffffffff",
            "050000004c050000cc09000000810000",
        ] {
            assert_eq!(encode(decode(legacy)), legacy);
        }
        assert_eq!(
            encode(decode("030000005E0400008E02000014010000")),
            XBOX360
        );
    }

    #[test]
    fn test_identity_from_str() {
        let identity: Identity = "{00000003-045E-0000-8E02-000014010000}".parse().unwrap();
        assert_eq!(identity, decode(XBOX360));
        assert!("0000005e-0400".parse::<Identity>().is_err());
        assert!("zz000003-045e-0000-8e02-000014010000".parse::<Identity>().is_err());
    }

    #[test]
    fn test_usb_ids_from_legacy() {
        let ids = usb_ids(XBOX360).unwrap();
        assert_eq!(ids, UsbIds::new(0x045E, 0x028E));
        assert_eq!(ids.to_string(), "045E:028E");
        assert!(usb_ids("0300").is_none());
        assert!(usb_ids("03000000zz04000000000000000000").is_none());
    }

    #[test]
    fn test_legacy_joystick_marker() {
        assert!(is_legacy_joystick(XBOX360));
        assert!(!is_legacy_joystick("050000005e0400008e02000014010000"));
        assert!(!is_legacy_joystick("03000000"));
    }

    #[test]
    fn test_pidvid_identity() {
        let ids = UsbIds::new(0x045E, 0x028E);
        let identity = Identity::from_usb_ids(ids);
        assert_eq!(identity.to_string(), "028e045e-0000-0000-0000-504944564944");
        assert_eq!(identity.pidvid_ids(), Some(ids));
        assert_eq!(decode(XBOX360).pidvid_ids(), None);
    }

    #[test]
    fn test_empty_identity() {
        assert!(Identity::EMPTY.is_empty());
        assert!(decode("00000000000000000000000000000000").is_empty());
        assert_eq!(
            Identity::EMPTY.to_string(),
            "00000000-0000-0000-0000-000000000000"
        );
    }
}
