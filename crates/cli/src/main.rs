//! footswitch - USB foot switch programming CLI
//!
//! Reads and writes the pedal configuration of PCsensor FS2007-family,
//! single pedal PCsensor and Scythe USB foot switches.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod config;
mod devices;
mod directives;
mod error;
mod output;

use anyhow::{Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CommandContext, ListArgs, ReadArgs, WriteArgs};

#[derive(Parser)]
#[command(name = "footswitch")]
#[command(about = "Program USB foot switches - PCsensor, Scythe and compatible devices")]
#[command(version)]
#[command(long_about = "
footswitch reads and writes the pedal configuration of USB foot switches.
The device keeps the configuration, so no daemon has to run afterwards.

Write options apply in command line order to the pedal selected last, e.g.
  footswitch write -p 1 -k a -p 2 -m ctrl -k c -p 3 -s hello
Scythe devices pick up new settings only after being plugged back in.
Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file
    #[arg(long, global = true, env = "FOOTSWITCH_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected foot switches
    List(ListArgs),

    /// Print the programmed pedals
    Read(ReadArgs),

    /// Program one or more pedals
    Write(WriteArgs),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> ExitCode {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(log_level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli, &matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}

/// Directives for every crate of the workspace at `level`, `warn` elsewhere.
fn default_filter(level: &str) -> String {
    [
        "footswitch",
        "footswitch_hid_common",
        "footswitch_keymap",
        "hid_pcsensor_protocol",
        "hid_scythe_protocol",
        "hid_footswitch1p_protocol",
    ]
    .iter()
    .fold(String::from("warn"), |filter, target| {
        format!("{filter},{target}={level}")
    })
}

fn context(cli: &Cli) -> Result<CommandContext> {
    let config = config::load(cli.config.as_deref())?;
    Ok(CommandContext::new(cli.json, config))
}

fn execute_command(cli: &Cli, matches: &ArgMatches) -> Result<()> {
    match &cli.command {
        Commands::List(args) => commands::list::execute(args, &context(cli)?),
        Commands::Read(args) => commands::read::execute(args, &context(cli)?),
        Commands::Write(args) => {
            let write = matches
                .subcommand_matches("write")
                .context("write arguments missing")?;
            let directives = directives::collect(args, write);
            commands::write::execute(args, &directives, &context(cli)?)
        }
        Commands::Completion { shell } => {
            completion::generate_completion(*shell);
            Ok(())
        }
    }
}
