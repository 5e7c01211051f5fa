// Padxlate Canonical Roles
// Fixed controller role numbering used by role-based emulator backends

use std::fmt;

use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};

/// Controller role with a fixed numeric code.
///
/// D-pad codes are `10 + hat mask`, analog half-axes follow the same
/// `+1/+2/+4/+8` direction scheme offset by 20 and 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[repr(i32)]
pub enum CanonicalRole {
    Unknown = -1,
    A = 0,
    B = 1,
    Y = 2,
    X = 3,
    LeftShoulder = 4,
    RightShoulder = 5,
    Back = 6,
    Start = 7,
    LeftStick = 8,
    RightStick = 9,
    Guide = 10,
    DpadUp = 11,
    DpadRight = 12,
    DpadDown = 14,
    DpadLeft = 18,
    LeftAnalogUp = 21,
    LeftAnalogRight = 22,
    LeftAnalogDown = 24,
    LeftAnalogLeft = 28,
    RightAnalogUp = 31,
    RightAnalogRight = 32,
    RightAnalogDown = 34,
    RightAnalogLeft = 38,
    RightTrigger = 51,
    LeftTrigger = 52,
}

impl CanonicalRole {
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Role owning `code`, or [`CanonicalRole::Unknown`]
    pub fn from_code(code: i64) -> Self {
        Self::iter()
            .find(|role| i64::from(role.code()) == code)
            .unwrap_or(CanonicalRole::Unknown)
    }

    pub fn is_known(self) -> bool {
        self != CanonicalRole::Unknown
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for CanonicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
