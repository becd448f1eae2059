//! Command-line parsing for the box-office statistics updater.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! aggregation engine.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "boxoffice", version, about = "Yearly box-office statistics builder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch missing days (and today) for the current year, plus the previous
    /// year on January 1-2.
    Update(CommonArgs),
    /// Rebuild whole years from scratch, fetching every day.
    Backfill(BackfillArgs),
    /// Recompute totals of a stored year without fetching.
    Reconcile(YearArgs),
    /// Print a stored year's summary.
    Show(ShowArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Directory holding `{year}.json` documents (overrides BOXOFFICE_DATA_DIR).
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Pause after every fetch, in milliseconds (overrides BOXOFFICE_FETCH_DELAY_MS).
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct BackfillArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// First year to rebuild (defaults to BOXOFFICE_START_YEAR).
    #[arg(long)]
    pub from: Option<i32>,

    /// Last year to rebuild (defaults to the current year).
    #[arg(long)]
    pub to: Option<i32>,
}

#[derive(Debug, Args)]
pub struct YearArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(long)]
    pub year: i32,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Year to show (defaults to the current year).
    #[arg(long)]
    pub year: Option<i32>,

    /// Number of movies to list.
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Show one movie in detail instead of the ranking.
    #[arg(long)]
    pub movie: Option<String>,
}
