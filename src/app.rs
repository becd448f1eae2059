//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments and loads configuration
//! - wires the HTTP provider and file store into the pipeline
//! - prints run reports

use std::time::Duration;

use chrono::Datelike;
use clap::Parser;
use tracing::{info, warn};

use crate::cli::{BackfillArgs, Command, CommonArgs, ShowArgs, YearArgs};
use crate::config::Config;
use crate::data::HttpSnapshotProvider;
use crate::error::AppError;
use crate::io::{DocumentOrigin, FileYearStore};
use crate::time::{today_in, years_to_update};

pub mod pipeline;

use pipeline::{SleepPacer, SyncMode};

/// Entry point for the `boxoffice` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    // `boxoffice` alone (or with only flags) means `boxoffice update`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Update(args) => handle_update(args),
        Command::Backfill(args) => handle_backfill(args),
        Command::Reconcile(args) => handle_reconcile(args),
        Command::Show(args) => handle_show(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_update(args: CommonArgs) -> Result<(), AppError> {
    let config = config_from_args(&args)?;
    let today = today_in(config.timezone);
    let years = years_to_update(today);
    info!("Updating {years:?} (today is {today} in {})", config.timezone);

    let provider = HttpSnapshotProvider::new(&config)?;
    let store = FileYearStore::new(&config.data_dir);
    let mut pacer = SleepPacer(config.fetch_delay);

    let reports = pipeline::run_years(
        &provider,
        &store,
        &mut pacer,
        &years,
        today,
        SyncMode::Incremental,
    )?;
    print!("{}", crate::report::format_sync_reports(&reports));
    if reports.iter().any(|r| r.recovered_from_corrupt()) {
        warn!("At least one stored year was corrupt and has been rebuilt from scratch; run `backfill` for that year to restore full history");
    }
    Ok(())
}

fn handle_backfill(args: BackfillArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.common)?;
    let today = today_in(config.timezone);
    let from = args.from.unwrap_or(config.start_year);
    let to = args.to.unwrap_or(today.year()).min(today.year());
    if from > to {
        return Err(AppError::local(format!(
            "Empty year range {from}..={to} (years after {} are not available).",
            today.year()
        )));
    }
    let years: Vec<i32> = (from..=to).collect();
    info!("Backfilling {from}..={to}");

    let provider = HttpSnapshotProvider::new(&config)?;
    let store = FileYearStore::new(&config.data_dir);
    let mut pacer = SleepPacer(config.fetch_delay);

    let reports = pipeline::run_years(
        &provider,
        &store,
        &mut pacer,
        &years,
        today,
        SyncMode::Rebuild,
    )?;
    print!("{}", crate::report::format_sync_reports(&reports));
    Ok(())
}

fn handle_reconcile(args: YearArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.common)?;
    let store = FileYearStore::new(&config.data_dir);
    let report = pipeline::reconcile_year(&store, args.year)?;
    print!("{}", crate::report::format_sync_reports(&[report]));
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.common)?;
    let year = args.year.unwrap_or_else(|| today_in(config.timezone).year());
    let store = FileYearStore::new(&config.data_dir);
    let loaded = store.read(year)?;
    if let DocumentOrigin::RecoveredFromCorrupt { reason, .. } = &loaded.origin {
        return Err(AppError::local(format!(
            "Document {} is corrupt ({reason}); the next update will replace it.",
            store.path_for(year).display()
        )));
    }

    println!(
        "{}",
        crate::report::format_year_summary(&loaded.document, args.top, args.movie.as_deref())
    );
    Ok(())
}

/// Environment config with CLI overrides applied.
pub fn config_from_args(args: &CommonArgs) -> Result<Config, AppError> {
    let mut config = Config::from_env()?;
    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &CommonArgs) {
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(ms) = args.delay_ms {
        config.fetch_delay = Duration::from_millis(ms);
    }
}

/// Rewrite argv so `boxoffice` defaults to `boxoffice update`.
///
/// Rules:
/// - `boxoffice`                     -> `boxoffice update`
/// - `boxoffice --data-dir d ...`    -> `boxoffice update --data-dir d ...`
/// - `boxoffice --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("update".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "update".to_string());
    }
    argv
}
