//! RS-232 Display Control Lookup Tables
//!
//! Displays that speak this serial control protocol take a two-character
//! command id followed by a two-digit hex value token:
//!
//! ```text
//! ┌─────────┬─────┬────────┬─────┬───────┐
//! │ COMMAND │ ' ' │ SET ID │ ' ' │ VALUE │
//! │ ka      │     │ 01     │     │ 01    │
//! └─────────┴─────┴────────┴─────┴───────┘
//! ```
//!
//! This crate only translates the COMMAND and VALUE fields between their
//! raw form and readable names. It does no serial I/O and no framing.
//!
//! # Example
//!
//! ```
//! use sercode_protocol::{CommandRef, CommandRegistry, Value};
//!
//! let registry = CommandRegistry::new();
//! let power = registry.resolve(CommandRef::LongName("power")).unwrap();
//! assert_eq!(power.raw_id(), "ka");
//! assert_eq!(power.encode("on").unwrap().to_string(), "01");
//!
//! let volume = registry.resolve_str("kf").unwrap();
//! assert_eq!(volume.decode("32"), Ok(Value::Level(50)));
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod codec;
pub mod command;
pub mod error;
pub mod listing;
pub mod registry;
mod rules;
mod table;

pub use codec::ReadOnlyPolicy;
pub use command::{
    CommandDefinition, CommandSpec, CommandSummary, Keycode, Value, MAX_VALUES, SLIDER_MAX,
    SLIDER_MIN, STATUS_NAME, STATUS_TOKEN,
};
pub use error::{DecodeError, EncodeError, LookupError, RegistryError};
pub use listing::{CommandList, KeycodeList, SLIDER_RANGE_ROW, SLIDER_TOKEN_RANGE};
pub use registry::{CommandRef, CommandRegistry, MAX_COMMANDS};
