//! Build script for sercode-protocol
//!
//! - Validates commands.toml at compile time
//! - Generates the static command table included by `src/table.rs`

use std::collections::HashSet;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[path = "src/rules.rs"]
mod rules;

use rules::{is_long_name, is_raw_id, is_token, is_value_name};

/// Must match `registry::MAX_COMMANDS`
const MAX_COMMANDS: usize = 32;

/// Must match `command::MAX_VALUES`
const MAX_VALUES: usize = 64;

const STATUS_TOKEN: &str = "FF";
const STATUS_NAME: &str = "status";

/// Values of one command, shared through a named set or written inline
enum ValueSource {
    Shared(String),
    Inline(Vec<(String, String)>),
}

struct CommandEntry {
    id: String,
    name: String,
    values: ValueSource,
    slider: bool,
    read_only: bool,
}

fn main() {
    println!("cargo:rerun-if-changed=commands.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let table = load_table(Path::new("commands.toml"));

    let sets = validate_value_sets(&table);
    let commands = validate_commands(&table, &sets);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(
        out_dir.join("command_table.rs"),
        generate(&sets, &commands),
    )
    .unwrap();
}

/// Read and parse the command table
fn load_table(path: &Path) -> toml::Value {
    if !path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: commands.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The protocol crate compiles its command table from             ║\n\
            ║  commands.toml next to Cargo.toml.                               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read commands.toml                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in commands.toml                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a list of validation errors
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn is_set_ident(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase()) && is_long_name(name)
}

/// Validate one `token = name` table and collect its entries in order
fn parse_values(
    context: &str,
    table: &toml::Table,
    errors: &mut Vec<String>,
) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut names = HashSet::new();

    if table.len() > MAX_VALUES {
        errors.push(format!("{} has more than {} values", context, MAX_VALUES));
    }

    for (token, name) in table {
        if !is_token(token) {
            errors.push(format!(
                "{} token '{}' must be two uppercase hex digits",
                context, token
            ));
        }

        let name = match name {
            toml::Value::String(s) => s.clone(),
            _ => {
                errors.push(format!("{} value for '{}' must be a string", context, token));
                continue;
            }
        };

        if !is_value_name(&name) {
            errors.push(format!(
                "{} value '{}' must be lowercase without spaces",
                context, name
            ));
        }

        if !names.insert(name.clone()) {
            // Encoding picks the last token for a repeated name
            println!(
                "cargo:warning={} maps '{}' more than once, last token wins",
                context, name
            );
        }

        entries.push((token.clone(), name));
    }

    entries
}

/// Validate shared value sets
fn validate_value_sets(config: &toml::Value) -> Vec<(String, Vec<(String, String)>)> {
    let sets = match config.get("values") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            report("Invalid value sets", &["[values] must be a table".to_string()]);
            return Vec::new();
        }
        None => return Vec::new(),
    };

    let mut errors = Vec::new();
    let mut parsed = Vec::new();

    for (ident, set) in sets {
        if !is_set_ident(ident) {
            errors.push(format!("[values.{}] name must be lowercase snake_case", ident));
        }

        let set = match set {
            toml::Value::Table(t) => t,
            _ => {
                errors.push(format!("[values.{}] must be a table", ident));
                continue;
            }
        };

        let entries = parse_values(&format!("[values.{}]", ident), set, &mut errors);
        parsed.push((ident.clone(), entries));
    }

    report("Invalid value sets", &errors);
    parsed
}

/// Validate command entries against the shared value sets
fn validate_commands(
    config: &toml::Value,
    sets: &[(String, Vec<(String, String)>)],
) -> Vec<CommandEntry> {
    let commands = match config.get("command") {
        Some(toml::Value::Array(a)) if !a.is_empty() => a,
        _ => {
            report(
                "Missing commands",
                &["Missing [[command]] entries - at least one is required".to_string()],
            );
            return Vec::new();
        }
    };

    let mut errors = Vec::new();
    let mut entries = Vec::new();
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    if commands.len() > MAX_COMMANDS {
        errors.push(format!("more than {} commands defined", MAX_COMMANDS));
    }

    for (i, command) in commands.iter().enumerate() {
        let command = match command.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("command {} must be a table", i));
                continue;
            }
        };

        let id = match command.get("id") {
            Some(toml::Value::String(id)) => id.clone(),
            _ => {
                errors.push(format!("command {} missing 'id'", i));
                continue;
            }
        };
        let name = match command.get("name") {
            Some(toml::Value::String(name)) => name.clone(),
            _ => {
                errors.push(format!("command '{}' missing 'name'", id));
                continue;
            }
        };

        if !is_raw_id(&id) {
            errors.push(format!(
                "command '{}' id must be two lowercase alphanumerics",
                id
            ));
        }
        if !is_long_name(&name) {
            errors.push(format!("command '{}' name must be lowercase snake_case", id));
        }
        // Two-character references resolve as raw ids
        if name.chars().count() == 2 {
            errors.push(format!("command '{}' name '{}' is only 2 characters", id, name));
        }
        if !ids.insert(id.clone()) {
            errors.push(format!("command id '{}' is defined twice", id));
        }
        if !names.insert(name.clone()) {
            errors.push(format!("command name '{}' is defined twice", name));
        }

        let flag = |key: &str, errors: &mut Vec<String>| match command.get(key) {
            Some(toml::Value::Boolean(b)) => *b,
            Some(_) => {
                errors.push(format!("command '{}' {} must be a boolean", id, key));
                false
            }
            None => false,
        };
        let slider = flag("slider", &mut errors);
        let read_only = flag("read_only", &mut errors);

        let (values, resolved) = match command.get("values") {
            Some(toml::Value::String(set)) => {
                match sets.iter().find(|(ident, _)| ident == set) {
                    Some((_, set_entries)) => {
                        (ValueSource::Shared(set.clone()), set_entries.clone())
                    }
                    None => {
                        errors.push(format!(
                            "command '{}' references unknown value set '{}'",
                            id, set
                        ));
                        continue;
                    }
                }
            }
            Some(toml::Value::Table(t)) => {
                let inline = parse_values(&format!("command '{}'", id), t, &mut errors);
                (ValueSource::Inline(inline.clone()), inline)
            }
            _ => {
                errors.push(format!("command '{}' missing 'values'", id));
                continue;
            }
        };

        // Sliders and read-only commands still answer status queries
        if (slider || read_only)
            && !resolved
                .iter()
                .any(|(token, name)| token == STATUS_TOKEN && name == STATUS_NAME)
        {
            errors.push(format!(
                "command '{}' must map {} to '{}'",
                id, STATUS_TOKEN, STATUS_NAME
            ));
        }

        entries.push(CommandEntry {
            id,
            name,
            values,
            slider,
            read_only,
        });
    }

    report("Invalid command configuration", &errors);
    entries
}

fn static_name(ident: &str) -> String {
    format!("VALUES_{}", ident.to_uppercase())
}

fn write_values(out: &mut String, entries: &[(String, String)], indent: &str) {
    for (token, name) in entries {
        writeln!(out, "{}    ({:?}, {:?}),", indent, token, name).unwrap();
    }
}

/// Emit the Rust source for the command table
fn generate(sets: &[(String, Vec<(String, String)>)], commands: &[CommandEntry]) -> String {
    let mut out = String::new();
    writeln!(out, "// @generated by build.rs from commands.toml").unwrap();
    writeln!(out).unwrap();

    for (ident, entries) in sets {
        let used = commands
            .iter()
            .any(|c| matches!(&c.values, ValueSource::Shared(s) if s == ident));
        if !used {
            println!("cargo:warning=value set '{}' is not used by any command", ident);
            continue;
        }

        writeln!(out, "static {}: &[(&str, &str)] = &[", static_name(ident)).unwrap();
        write_values(&mut out, entries, "");
        writeln!(out, "];").unwrap();
        writeln!(out).unwrap();
    }

    writeln!(out, "pub(crate) static COMMAND_TABLE: &[CommandSpec] = &[").unwrap();
    for command in commands {
        writeln!(out, "    CommandSpec {{").unwrap();
        writeln!(out, "        raw_id: {:?},", command.id).unwrap();
        writeln!(out, "        long_name: {:?},", command.name).unwrap();
        match &command.values {
            ValueSource::Shared(ident) => {
                writeln!(out, "        values: {},", static_name(ident)).unwrap();
            }
            ValueSource::Inline(entries) => {
                writeln!(out, "        values: &[").unwrap();
                write_values(&mut out, entries, "        ");
                writeln!(out, "        ],").unwrap();
            }
        }
        writeln!(out, "        is_slider: {},", command.slider).unwrap();
        writeln!(out, "        read_only: {},", command.read_only).unwrap();
        writeln!(out, "    }},").unwrap();
    }
    writeln!(out, "];").unwrap();

    out
}
