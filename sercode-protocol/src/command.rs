//! Command definitions
//!
//! A command is identified on the wire by a two-character raw id (e.g. `ka`)
//! and carries a two-digit hex value token (e.g. `01`):
//!
//! ```text
//! ka 01    power on
//! kf 32    volume 50
//! kz FF    abnormal_state status query
//! ```
//!
//! Each `CommandDefinition` owns the token ↔ name table for its values.
//! Encoding and decoding live in [`crate::codec`].

use core::fmt::{self, Write};

use heapless::{LinearMap, String, Vec};

use crate::error::RegistryError;
use crate::registry::RAW_ID_LEN;
use crate::rules::{is_long_name, is_raw_id, is_token, is_value_name};

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// Reserved token for a status query
pub const STATUS_TOKEN: &str = "FF";

/// Readable name of the status token
pub const STATUS_NAME: &str = "status";

/// Maximum entries in one value table
pub const MAX_VALUES: usize = 64;

/// Slider range
pub const SLIDER_MIN: u8 = 0;
pub const SLIDER_MAX: u8 = 100;

/// Static description of one command
///
/// The compiled-in table is made of these. Values are `(token, name)` pairs
/// with uppercase hex tokens and lowercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandSpec {
    /// Two lowercase alphanumerics
    pub raw_id: &'static str,
    /// Lowercase snake_case name
    pub long_name: &'static str,
    /// Value table in declaration order
    pub values: &'static [(&'static str, &'static str)],
    /// Value is a 0-100 level instead of a table entry
    pub is_slider: bool,
    /// Only the status token may be encoded
    pub read_only: bool,
}

/// One protocol command with its value tables
#[derive(Debug, Clone)]
pub struct CommandDefinition {
    pub(crate) raw_id: &'static str,
    pub(crate) long_name: &'static str,
    /// Token → name, in declaration order
    pub(crate) values: &'static [(&'static str, &'static str)],
    /// Name → token, last entry wins for repeated names
    pub(crate) inverse: LinearMap<&'static str, &'static str, MAX_VALUES>,
    pub(crate) is_slider: bool,
    pub(crate) read_only: bool,
}

impl CommandDefinition {
    /// Build a definition from a custom spec
    ///
    /// The spec must follow the same rules as the compiled-in table: a raw
    /// id of two lowercase alphanumerics, a snake_case long name that is not
    /// two characters long, uppercase two-digit hex tokens, and an
    /// `FF` → `status` entry for sliders and read-only commands.
    pub fn new(spec: CommandSpec) -> Result<Self, RegistryError> {
        if !is_raw_id(spec.raw_id) {
            return Err(RegistryError::InvalidRawId);
        }
        if !is_long_name(spec.long_name) || spec.long_name.len() == RAW_ID_LEN {
            return Err(RegistryError::InvalidLongName);
        }
        if spec.values.len() > MAX_VALUES {
            return Err(RegistryError::TooManyValues);
        }
        for &(token, name) in spec.values {
            if !is_token(token) {
                return Err(RegistryError::InvalidToken);
            }
            if !is_value_name(name) {
                return Err(RegistryError::InvalidValueName);
            }
        }
        if (spec.is_slider || spec.read_only)
            && !spec
                .values
                .iter()
                .any(|&(token, name)| token == STATUS_TOKEN && name == STATUS_NAME)
        {
            return Err(RegistryError::MissingStatus);
        }
        Ok(Self::from_validated(spec))
    }

    /// Build a definition from a spec already checked by the build script
    pub(crate) fn from_validated(spec: CommandSpec) -> Self {
        let mut inverse = LinearMap::new();
        for &(token, name) in spec.values {
            // Cannot fail: at most MAX_VALUES distinct names
            let _ = inverse.insert(name, token);
        }

        Self {
            raw_id: spec.raw_id,
            long_name: spec.long_name,
            values: spec.values,
            inverse,
            is_slider: spec.is_slider,
            read_only: spec.read_only,
        }
    }

    /// Raw two-character command id
    pub fn raw_id(&self) -> &'static str {
        self.raw_id
    }

    /// Readable command name
    pub fn long_name(&self) -> &'static str {
        self.long_name
    }

    pub fn is_slider(&self) -> bool {
        self.is_slider
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Value table entries in declaration order
    pub fn values(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.values.iter().copied()
    }

    /// Value table entries sorted by token string
    pub fn sorted_values(&self) -> Vec<(&'static str, &'static str), MAX_VALUES> {
        let mut sorted: Vec<_, MAX_VALUES> = Vec::new();
        for &entry in self.values {
            // Capacity is checked when the definition is built
            let _ = sorted.push(entry);
        }
        sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));
        sorted
    }

    /// Summary row for listings
    pub fn summary(&self) -> CommandSummary {
        CommandSummary {
            raw_id: self.raw_id,
            long_name: self.long_name,
            is_slider: self.is_slider,
            read_only: self.read_only,
        }
    }
}

impl PartialEq for CommandDefinition {
    fn eq(&self, other: &Self) -> bool {
        // Ids are unique within a registry
        self.raw_id == other.raw_id && self.long_name == other.long_name
    }
}

impl Eq for CommandDefinition {}

/// Identity and flags of a command, without its value table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CommandSummary {
    pub raw_id: &'static str,
    pub long_name: &'static str,
    pub is_slider: bool,
    pub read_only: bool,
}

/// A decoded value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize), serde(untagged))]
pub enum Value {
    /// Entry from the value table (including `status`)
    Named(&'static str),
    /// Slider level, 0-100
    Level(u8),
}

impl Value {
    /// Returns true if this is the status designation
    pub fn is_status(&self) -> bool {
        matches!(self, Value::Named(name) if *name == STATUS_NAME)
    }

    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Value::Named(name) => Some(name),
            Value::Level(_) => None,
        }
    }

    pub fn level(&self) -> Option<u8> {
        match *self {
            Value::Named(_) => None,
            Value::Level(level) => Some(level),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Named(name) => f.write_str(name),
            Value::Level(level) => write!(f, "{}", level),
        }
    }
}

/// An encoded value token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Keycode {
    /// Token from the value table
    Token(&'static str),
    /// Slider level, rendered as unpadded lowercase hex (`5`, `64`)
    Level(u8),
    /// Status token substituted for a set request on a read-only command
    ReadOnlyOverride,
}

impl Keycode {
    /// Render into a fixed-size string
    ///
    /// Returns `None` for a hand-built `Token` longer than two characters;
    /// tokens from a definition always fit.
    pub fn to_token(&self) -> Option<String<2>> {
        let mut token = String::new();
        write!(token, "{}", self).ok()?;
        Some(token)
    }

    /// Returns true if this token queries status
    pub fn is_status(&self) -> bool {
        match self {
            Keycode::Token(token) => *token == STATUS_TOKEN,
            Keycode::Level(_) => false,
            Keycode::ReadOnlyOverride => true,
        }
    }

    /// Returns true if a read-only command replaced the requested value
    pub fn is_override(&self) -> bool {
        matches!(self, Keycode::ReadOnlyOverride)
    }
}

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keycode::Token(token) => f.write_str(token),
            Keycode::Level(level) => write!(f, "{:x}", level),
            Keycode::ReadOnlyOverride => f.write_str(STATUS_TOKEN),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Keycode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
