//! Tab-separated listings
//!
//! ```text
//! NAME    LONG_NAME
//! ka      power
//! kd      screen_mute
//! ...
//!
//! KEYCODE DESCRIPTION
//! FF      status
//! 00-64   0-100
//! ```
//!
//! Both listings implement `Display` and write straight into the formatter,
//! so they work without an allocator.

use core::fmt;

use crate::command::CommandDefinition;
use crate::registry::CommandRegistry;

/// Header row of the command listing
pub const COMMAND_HEADER: &str = "NAME\tLONG_NAME";

/// Header row of the keycode listing
pub const KEYCODE_HEADER: &str = "KEYCODE\tDESCRIPTION";

/// Token span of a slider level
pub const SLIDER_TOKEN_RANGE: &str = "00-64";

/// Trailing row describing the slider range
pub const SLIDER_RANGE_ROW: &str = "00-64\t0-100";

/// Every command as `raw_id\tlong_name`, in registration order
#[derive(Debug, Clone, Copy)]
pub struct CommandList<'a> {
    registry: &'a CommandRegistry,
}

impl<'a> CommandList<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self { registry }
    }
}

impl fmt::Display for CommandList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", COMMAND_HEADER)?;
        for (raw_id, long_name) in self.registry.list_all() {
            writeln!(f, "{}\t{}", raw_id, long_name)?;
        }
        Ok(())
    }
}

/// Value table of one command sorted by token
///
/// Sliders end with the synthetic [`SLIDER_RANGE_ROW`].
#[derive(Debug, Clone, Copy)]
pub struct KeycodeList<'a> {
    command: &'a CommandDefinition,
}

impl<'a> KeycodeList<'a> {
    pub fn new(command: &'a CommandDefinition) -> Self {
        Self { command }
    }
}

impl fmt::Display for KeycodeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", KEYCODE_HEADER)?;
        for (token, name) in self.command.sorted_values() {
            writeln!(f, "{}\t{}", token, name)?;
        }
        if self.command.is_slider() {
            writeln!(f, "{}", SLIDER_RANGE_ROW)?;
        }
        Ok(())
    }
}

impl CommandDefinition {
    /// Printable `KEYCODE\tDESCRIPTION` table
    pub fn keycode_list(&self) -> KeycodeList<'_> {
        KeycodeList::new(self)
    }
}
