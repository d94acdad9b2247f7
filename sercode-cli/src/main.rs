//! Command-line lookup of RS-232 display control keycodes.
//!
//! ```text
//! $ sercode encode power on
//! ka 01
//! $ sercode decode kf 32
//! volume 50
//! ```
//!
//! Exit status: 2 when the command is unknown, 4 when the value cannot be
//! translated.

mod output;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use sercode_protocol::{CommandRef, CommandRegistry, ReadOnlyPolicy};
use tracing::{debug, warn};

/// Translate display RS-232 commands between raw keycodes and names.
#[derive(Parser, Debug)]
#[command(name = "sercode")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Command reference shared by the per-command actions.
#[derive(ClapArgs, Debug)]
struct Target {
    /// Raw command id (e.g. `ka`) or long name (e.g. `power`).
    command: String,

    /// Treat COMMAND as a raw id.
    #[arg(long = "raw", conflicts_with = "long_name")]
    raw_id: bool,

    /// Treat COMMAND as a long name.
    #[arg(long = "name")]
    long_name: bool,
}

impl Target {
    fn command_ref(&self) -> CommandRef<'_> {
        if self.raw_id {
            CommandRef::RawId(&self.command)
        } else if self.long_name {
            CommandRef::LongName(&self.command)
        } else {
            CommandRef::classify(&self.command)
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// List every known command.
    List,
    /// List the keycodes of one command.
    Keycodes {
        #[command(flatten)]
        target: Target,
    },
    /// Translate a value name or level into a keycode.
    Encode {
        #[command(flatten)]
        target: Target,
        /// Value name, level (0-100) or `status`.
        value: String,
        /// Fail instead of sending a status query for read-only commands.
        #[arg(long)]
        strict: bool,
    },
    /// Translate a keycode into a value name or level.
    Decode {
        #[command(flatten)]
        target: Target,
        /// Two-digit hex keycode.
        token: String,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "sercode=debug" } else { "sercode=info" };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(registry: &CommandRegistry, args: &Args) -> Result<String> {
    match &args.command {
        Command::List => output::render_commands(registry, args.json),
        Command::Keycodes { target } => {
            let command = registry
                .resolve(target.command_ref())
                .with_context(|| format!("unknown command '{}'", target.command))?;
            debug!(
                raw_id = command.raw_id(),
                long_name = command.long_name(),
                "resolved command"
            );
            output::render_keycodes(command, args.json)
        }
        Command::Encode {
            target,
            value,
            strict,
        } => {
            let policy = if *strict {
                ReadOnlyPolicy::Reject
            } else {
                ReadOnlyPolicy::Override
            };
            let (command, keycode) = registry
                .encode(target.command_ref(), value, policy)
                .with_context(|| format!("cannot encode '{}' for '{}'", value, target.command))?;

            if keycode.is_override() {
                warn!(
                    command = command.long_name(),
                    value = %value,
                    "command is read-only, sending a status query instead"
                );
            }
            debug!(raw_id = command.raw_id(), keycode = %keycode, "encoded value");
            output::render_encoded(command, keycode, args.json)
        }
        Command::Decode { target, token } => {
            let (command, value) = registry
                .decode(target.command_ref(), token)
                .with_context(|| format!("cannot decode '{}' for '{}'", token, target.command))?;
            debug!(raw_id = command.raw_id(), value = %value, "decoded token");
            output::render_decoded(command, value, args.json)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let registry = CommandRegistry::new();
    debug!(commands = registry.len(), "command table loaded");

    let result = run(&registry, &args).and_then(|text| {
        io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("failed to write output")
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(output::exit_code(&err))
        }
    }
}
