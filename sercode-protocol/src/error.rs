//! Error types for command lookup and value translation
//!
//! Every failure is reported to the caller as one of these values. Mapping
//! them to process exit codes is left to the front end.

use core::fmt;

/// Errors from translating a raw token into a readable value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Slider token is not a hexadecimal number
    InvalidHex,
    /// Token is not in the command's value table
    UnknownToken,
}

/// Errors from translating a readable value into a raw token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Slider value is not a decimal number
    InvalidNumber,
    /// Value name is not in the command's value table
    UnknownName,
    /// Set request on a read-only command (strict policy only)
    ReadOnly,
}

/// Errors from resolving a command and translating one of its values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LookupError {
    /// No command matches the raw id or long name
    NotFound,
    /// Value decoding failed
    Decode(DecodeError),
    /// Value encoding failed
    Encode(EncodeError),
}

/// Errors from building a registry out of command specs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// More commands than the registry can hold
    TooManyCommands,
    /// A value table exceeds the per-command capacity
    TooManyValues,
    /// Two commands share a raw id
    DuplicateRawId,
    /// Two commands share a long name
    DuplicateLongName,
    /// Raw id is not two lowercase alphanumerics
    InvalidRawId,
    /// Long name is not lowercase snake_case, or is two characters long
    InvalidLongName,
    /// Value token is not two uppercase hex digits
    InvalidToken,
    /// Value name is empty or has uppercase or non-printable characters
    InvalidValueName,
    /// Slider or read-only command without an `FF` to `status` entry
    MissingStatus,
}

impl From<DecodeError> for LookupError {
    fn from(e: DecodeError) -> Self {
        LookupError::Decode(e)
    }
}

impl From<EncodeError> for LookupError {
    fn from(e: EncodeError) -> Self {
        LookupError::Encode(e)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidHex => f.write_str("token is not a hexadecimal number"),
            DecodeError::UnknownToken => f.write_str("unknown keycode"),
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::InvalidNumber => f.write_str("value is not a decimal number"),
            EncodeError::UnknownName => f.write_str("unknown value name"),
            EncodeError::ReadOnly => f.write_str("command is read-only"),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound => f.write_str("command not found"),
            LookupError::Decode(e) => write!(f, "decode failed: {}", e),
            LookupError::Encode(e) => write!(f, "encode failed: {}", e),
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::TooManyCommands => f.write_str("too many commands"),
            RegistryError::TooManyValues => f.write_str("too many values for one command"),
            RegistryError::DuplicateRawId => f.write_str("duplicate raw command id"),
            RegistryError::DuplicateLongName => f.write_str("duplicate command name"),
            RegistryError::InvalidRawId => f.write_str("raw id must be two lowercase alphanumerics"),
            RegistryError::InvalidLongName => f.write_str("invalid command name"),
            RegistryError::InvalidToken => f.write_str("token must be two uppercase hex digits"),
            RegistryError::InvalidValueName => f.write_str("invalid value name"),
            RegistryError::MissingStatus => f.write_str("status entry required"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

#[cfg(feature = "std")]
impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::NotFound => None,
            LookupError::Decode(e) => Some(e),
            LookupError::Encode(e) => Some(e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RegistryError {}
