//! Compiled-in command table
//!
//! Generated by `build.rs` from `commands.toml`.

use crate::command::CommandSpec;

include!(concat!(env!("OUT_DIR"), "/command_table.rs"));
