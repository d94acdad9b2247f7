//! Output rendering and exit codes
//!
//! Every renderer returns the full text to print, newline included, either
//! as the tab-separated tables of the protocol crate or as JSON.

use anyhow::Result;
use serde::Serialize;
use sercode_protocol::{
    CommandDefinition, CommandRegistry, CommandSummary, Keycode, LookupError, Value,
    SLIDER_TOKEN_RANGE,
};

/// Exit status for failures that are not lookup errors
pub const EXIT_FAILURE: u8 = 1;

/// Exit status when no command matches
pub const EXIT_NOT_FOUND: u8 = 2;

/// Exit status when a value cannot be encoded or decoded
pub const EXIT_CODEC: u8 = 4;

/// Map an error to the process exit status
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<LookupError>() {
        Some(LookupError::NotFound) => EXIT_NOT_FOUND,
        Some(LookupError::Decode(_)) | Some(LookupError::Encode(_)) => EXIT_CODEC,
        None => EXIT_FAILURE,
    }
}

#[derive(Serialize)]
struct EncodedOutput {
    command: &'static str,
    long_name: &'static str,
    keycode: Keycode,
    read_only_override: bool,
}

#[derive(Serialize)]
struct DecodedOutput {
    command: &'static str,
    long_name: &'static str,
    value: Value,
    status: bool,
}

#[derive(Serialize)]
struct KeycodeEntry {
    keycode: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct KeycodesOutput {
    #[serde(flatten)]
    command: CommandSummary,
    values: Vec<KeycodeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<&'static str>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// `NAME\tLONG_NAME` table of every command
pub fn render_commands(registry: &CommandRegistry, json: bool) -> Result<String> {
    if json {
        let summaries: Vec<CommandSummary> = registry.summaries().collect();
        return to_json(&summaries);
    }
    Ok(registry.command_list().to_string())
}

/// `KEYCODE\tDESCRIPTION` table of one command
pub fn render_keycodes(command: &CommandDefinition, json: bool) -> Result<String> {
    if json {
        let output = KeycodesOutput {
            command: command.summary(),
            values: command
                .sorted_values()
                .iter()
                .map(|&(keycode, description)| KeycodeEntry {
                    keycode,
                    description,
                })
                .collect(),
            range: command.is_slider().then_some(SLIDER_TOKEN_RANGE),
        };
        return to_json(&output);
    }
    Ok(command.keycode_list().to_string())
}

/// `raw_id keycode`, ready to put on the wire
pub fn render_encoded(
    command: &CommandDefinition,
    keycode: Keycode,
    json: bool,
) -> Result<String> {
    if json {
        return to_json(&EncodedOutput {
            command: command.raw_id(),
            long_name: command.long_name(),
            keycode,
            read_only_override: keycode.is_override(),
        });
    }
    Ok(format!("{} {}\n", command.raw_id(), keycode))
}

/// `long_name value`
pub fn render_decoded(command: &CommandDefinition, value: Value, json: bool) -> Result<String> {
    if json {
        return to_json(&DecodedOutput {
            command: command.raw_id(),
            long_name: command.long_name(),
            value,
            status: value.is_status(),
        });
    }
    Ok(format!("{} {}\n", command.long_name(), value))
}
