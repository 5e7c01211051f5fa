// Padxlate Mapping Database
// Native controller mappings (gamecontrollerdb.txt format)

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::identity::{self, Identity};
use crate::{InputKind, PhysicalInput};

/// Mapping database parse errors
#[derive(Debug, thiserror::Error)]
pub enum MappingParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: expected 'guid,name,role:input,...'")]
    MissingFields { line: usize },

    #[error("Line {line}: invalid controller guid '{guid}'")]
    InvalidGuid { line: usize, guid: String },

    #[error("Line {line}: invalid input '{input}' for role '{role}'")]
    InvalidInput {
        line: usize,
        role: String,
        input: String,
    },
}

/// Button role numbering of the mapping database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum ButtonRole {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    Back = 4,
    Guide = 5,
    Start = 6,
    LeftStick = 7,
    RightStick = 8,
    LeftShoulder = 9,
    RightShoulder = 10,
    DpadUp = 11,
    DpadDown = 12,
    DpadLeft = 13,
    DpadRight = 14,
}

impl ButtonRole {
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Convert a mapping-line role name to ButtonRole
    pub fn from_str(s: &str) -> Option<Self> {
        let role = match s {
            "a" => ButtonRole::A,
            "b" => ButtonRole::B,
            "x" => ButtonRole::X,
            "y" => ButtonRole::Y,
            "back" => ButtonRole::Back,
            "guide" => ButtonRole::Guide,
            "start" => ButtonRole::Start,
            "leftstick" => ButtonRole::LeftStick,
            "rightstick" => ButtonRole::RightStick,
            "leftshoulder" => ButtonRole::LeftShoulder,
            "rightshoulder" => ButtonRole::RightShoulder,
            "dpup" => ButtonRole::DpadUp,
            "dpdown" => ButtonRole::DpadDown,
            "dpleft" => ButtonRole::DpadLeft,
            "dpright" => ButtonRole::DpadRight,
            _ => return None,
        };
        Some(role)
    }
}

/// Axis role numbering of the mapping database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum AxisRole {
    LeftX = 0,
    LeftY = 1,
    RightX = 2,
    RightY = 3,
    LeftTrigger = 4,
    RightTrigger = 5,
}

impl AxisRole {
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Convert a mapping-line role name to AxisRole.
    ///
    /// Half-axis prefixes (`+leftx`, `-lefty`) map to the full axis.
    pub fn from_str(s: &str) -> Option<Self> {
        let role = match s.trim_start_matches(['+', '-']) {
            "leftx" => AxisRole::LeftX,
            "lefty" => AxisRole::LeftY,
            "rightx" => AxisRole::RightX,
            "righty" => AxisRole::RightY,
            "lefttrigger" => AxisRole::LeftTrigger,
            "righttrigger" => AxisRole::RightTrigger,
            _ => return None,
        };
        Some(role)
    }
}

/// Role a physical input plays in a native mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappedRole {
    Button(ButtonRole),
    Axis(AxisRole),
}

impl MappedRole {
    /// Parse a role name; `None` for roles the translator has no use for
    /// (`platform`, `misc1`, paddles, `touchpad`, `crc`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        ButtonRole::from_str(name)
            .map(MappedRole::Button)
            .or_else(|| AxisRole::from_str(name).map(MappedRole::Axis))
    }

    pub fn is_axis(self) -> bool {
        matches!(self, MappedRole::Axis(_))
    }
}

/// One `role:input` pair of a mapping line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingEntry {
    pub physical: PhysicalInput,
    pub role: MappedRole,
}

/// Native mapping of one controller model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerMapping {
    pub name: String,
    /// Entries in the order they appear in the source line
    pub entries: Vec<MappingEntry>,
    /// The raw mapping line
    pub source: String,
}

impl ControllerMapping {
    /// Whether any entry maps to an axis role
    pub fn has_axis_roles(&self) -> bool {
        self.entries.iter().any(|entry| entry.role.is_axis())
    }

    /// First entry bound to exactly this physical input
    pub fn find(&self, physical: &PhysicalInput) -> Option<&MappingEntry> {
        self.entries.iter().find(|entry| entry.physical == *physical)
    }

    /// First entry of the given physical kind mapped to a button role
    pub fn find_button_role(&self, kind: InputKind, role: ButtonRole) -> Option<&MappingEntry> {
        self.entries
            .iter()
            .find(|entry| entry.physical.kind == kind && entry.role == MappedRole::Button(role))
    }
}

/// Source of native controller mappings
pub trait MappingDatabase {
    /// Mapping for the controller model with this decoded identity
    fn lookup(&self, identity: &Identity) -> Option<&ControllerMapping>;
}

impl<T: MappingDatabase + ?Sized> MappingDatabase for &T {
    fn lookup(&self, identity: &Identity) -> Option<&ControllerMapping> {
        (**self).lookup(identity)
    }
}

/// In-memory `gamecontrollerdb.txt` database
#[derive(Debug, Clone, Default)]
pub struct GameControllerDb {
    mappings: HashMap<Identity, ControllerMapping>,
}

impl GameControllerDb {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse database text.
    ///
    /// Blank lines and `#` comments are ignored. A later line for the same
    /// guid replaces the earlier one. Malformed lines are logged and skipped.
    pub fn parse(text: &str) -> Result<Self, MappingParseError> {
        let mut db = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Err(e) = db.insert_line(line, index + 1) {
                log::warn!("Skipping controller mapping on line {}: {}", index + 1, e);
            }
        }
        log::debug!("Loaded {} controller mapping(s)", db.len());
        Ok(db)
    }

    /// Load a database file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MappingParseError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Add a single mapping line, returning the identity it is stored under
    pub fn add_mapping(&mut self, line: &str) -> Result<Identity, MappingParseError> {
        self.insert_line(line.trim(), 1)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    fn insert_line(&mut self, line: &str, line_no: usize) -> Result<Identity, MappingParseError> {
        let (identity, mapping) = parse_line(line, line_no)?;
        if self.mappings.insert(identity, mapping).is_some() {
            log::debug!("Line {}: mapping for {} replaced", line_no, identity);
        }
        Ok(identity)
    }
}

impl MappingDatabase for GameControllerDb {
    fn lookup(&self, identity: &Identity) -> Option<&ControllerMapping> {
        self.mappings.get(identity)
    }
}

impl FromStr for GameControllerDb {
    type Err = MappingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<(Identity, ControllerMapping), MappingParseError> {
    let mut fields = line.split(',');
    let (Some(guid), Some(name)) = (fields.next(), fields.next()) else {
        return Err(MappingParseError::MissingFields { line: line_no });
    };

    let guid = guid.trim();
    let identity = identity::decode(guid);
    if identity.is_empty() {
        return Err(MappingParseError::InvalidGuid {
            line: line_no,
            guid: guid.to_string(),
        });
    }

    let mut entries = Vec::new();
    for field in fields {
        let field = field.trim();
        let Some((role_name, input)) = field.split_once(':') else {
            continue;
        };
        let Some(role) = MappedRole::from_name(role_name) else {
            log::trace!("Line {}: skipping '{}'", line_no, field);
            continue;
        };
        if input.is_empty() {
            continue;
        }
        let physical = parse_input(input).ok_or_else(|| MappingParseError::InvalidInput {
            line: line_no,
            role: role_name.to_string(),
            input: input.to_string(),
        })?;
        entries.push(MappingEntry { physical, role });
    }

    let mapping = ControllerMapping {
        name: name.trim().to_string(),
        entries,
        source: line.to_string(),
    };
    Ok((identity, mapping))
}

/// Parse `bN`, `hH.M`, `aN`, `+aN`, `-aN` with an optional trailing `~`
fn parse_input(input: &str) -> Option<PhysicalInput> {
    let (input, inverted) = match input.strip_suffix('~') {
        Some(rest) => (rest, true),
        None => (input, false),
    };

    if let Some(code) = input.strip_prefix('b') {
        return Some(PhysicalInput::new(InputKind::Button, code.parse().ok()?, 1));
    }
    if let Some(hat) = input.strip_prefix('h') {
        let (code, mask) = hat.split_once('.')?;
        return Some(PhysicalInput::new(
            InputKind::Hat,
            code.parse().ok()?,
            mask.parse().ok()?,
        ));
    }

    let (axis, sign) = match input.as_bytes().first()? {
        b'+' => (&input[1..], 1),
        b'-' => (&input[1..], -1),
        _ => (input, 1),
    };
    let code = axis.strip_prefix('a')?.parse().ok()?;
    let value = if inverted { -sign } else { sign };
    Some(PhysicalInput::new(InputKind::Axis, code, value))
}
