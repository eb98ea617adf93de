//! # Botanic CLI Library
//!
//! Headless command-line driver for the botanic round engine. It stands in
//! for the presentation layer: it plants, plays hands, polls the scheduler on
//! a simulated clock, shops between rounds and records every hand.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line
//! arguments and executes the appropriate subcommand.
//!
//! ```no_run
//! use std::io;
//! let args = vec!["botanic", "sim", "--rounds", "3", "--seed", "42"];
//! let code = botanic_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `sim`: Play rounds with a greedy policy and write JSONL harvest records
//! - `catalog`: List seed and upgrade archetypes
//! - `cfg`: Display the resolved configuration

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod logging;
pub mod ui;

use cli::{BotanicCli, Commands};
use commands::{handle_catalog_command, handle_cfg_command, handle_sim_command};

pub use error::CliError;

const COMMANDS: &[&str] = &["sim", "catalog", "cfg"];

/// Main entry point for the CLI application.
///
/// Parses `args` (program name first) and dispatches to the subcommand
/// handler. Returns `0` on success and `2` on any error; help and version
/// output go to `out` with code `0`.
///
/// # Example
///
/// ```
/// use std::io;
/// let code = botanic_cli::run(["botanic", "catalog"], &mut io::sink(), &mut io::sink());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match BotanicCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_usage(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Sim {
            rounds,
            seed,
            output,
            catalog,
        } => handle_sim_command(rounds, seed, output, catalog, out, err),
        Commands::Catalog { catalog, json } => handle_catalog_command(catalog, json, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn report_usage(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }

    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err);
    let _ = writeln!(err, "Botanic CLI");
    let _ = writeln!(err, "Usage: botanic <command> [options]\n");
    let _ = writeln!(err, "Commands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    let _ = writeln!(err, "\nFor full help, run: botanic --help");
    exit_code::ERROR
}
