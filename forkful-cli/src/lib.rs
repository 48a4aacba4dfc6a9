//! Command-line interface for inspecting and exercising Forkful's preference
//! learning and ranking.
//!
//! Every command prints JSON on stdout. Options layer in the usual order:
//! command-line flags override `FORKFUL_CMDS_<COMMAND>_<FIELD>` environment
//! variables, which override configuration files.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod prefs;
mod rank;
mod store;

pub use error::CliError;

use prefs::{RecordArgs, ResetArgs, ShowArgs};
use rank::{RankArgs, ReservationsArgs};

const ARG_STORE_DIR: &str = "store-dir";
const ARG_BACKEND: &str = "backend";
const ARG_CATEGORY: &str = "category";
const ARG_PRICE: &str = "price";
const ARG_QUERY: &str = "query";
const ARG_RESTAURANTS: &str = "restaurants";
const ARG_RESERVATIONS: &str = "reservations";
const ENV_RESTAURANTS: &str = "FORKFUL_CMDS_RANK_RESTAURANTS_PATH";
const ENV_RESERVATIONS: &str = "FORKFUL_CMDS_RESERVATIONS_RESERVATIONS_PATH";

/// Run the Forkful CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, inputs
/// cannot be read, or output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Show(args) => prefs::run_show_with(args, writer),
        Command::Record(args) => prefs::run_record_with(args, writer),
        Command::Reset(args) => prefs::run_reset_with(args, writer),
        Command::Rank(args) => rank::run_rank_with(args, writer),
        Command::Reservations(args) => rank::run_reservations_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "forkful",
    about = "Learn restaurant preferences and rank listings with them",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the learned preferences.
    Show(ShowArgs),
    /// Reinforce a category and/or price tier.
    Record(RecordArgs),
    /// Forget every learned preference.
    Reset(ResetArgs),
    /// Filter and rank a restaurant listing.
    Rank(RankArgs),
    /// Filter a reservation list.
    Reservations(ReservationsArgs),
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match forkful_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_json(writer: &mut dyn Write, value: &impl Serialize) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
