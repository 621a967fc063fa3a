mod api;
mod cli;
mod dashboard;
mod export;
mod import;
mod models;
mod storage;
mod types;

use std::fs::File;
use std::io::{stderr, stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::api::AppState;
use crate::cli::{Cli, Commands, DashboardArgs, ExportArgs, ImportArgs};
use crate::dashboard::Dashboard;
use crate::export::export_filtered;
use crate::import::{ImportPipeline, ImportSummary, Normalizer};
use crate::storage::{DatasetStore, MemoryStore, SqliteStore};
use crate::types::CurrencyConverter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::load();

    setup_logging(parse_log_level(&cli.log_level));

    let result = run(cli).await;

    if let Err(error) = &result {
        error!("{error:#}");
    }

    result
}

async fn run(cli: Cli) -> Result<()> {
    let database = cli.database;

    match cli.command {
        Commands::Init => {
            let store = SqliteStore::open(&database)?;
            println!("Database ready at {} ({} purchases)", database.display(), store.count()?);
        }
        Commands::Import(args) => {
            let converter = CurrencyConverter::new(cli.rate)?;
            let summary = import(args.path.clone(), database, converter, args.dry_run).await?;

            write_import_summary(&summary, &args)?;
        }
        Commands::Dashboard(args) => show_dashboard(&database, &args)?,
        Commands::Api(args) => {
            let store = SqliteStore::open(&database)?;
            api::serve(AppState::new(store), args.addr()).await?;
        }
        Commands::Export(args) => export(&database, &args)?
    }

    Ok(())
}

async fn import(path: PathBuf, database: PathBuf, converter: CurrencyConverter, dry_run: bool) -> Result<ImportSummary> {
    info!("Converting CNY prices to SGD at rate {}", converter.rate());

    let pipeline = ImportPipeline::new(Normalizer::new(converter));

    //NOTE: File reading and SQLite are both blocking, so the whole run goes to the blocking pool
    let summary = tokio::task::spawn_blocking(move || -> Result<ImportSummary> {
        let timer = Instant::now();

        let summary = if dry_run {
            pipeline.run(&path, &mut MemoryStore::new())?
        } else {
            pipeline.run(&path, &mut SqliteStore::open(&database)?)?
        };

        info!("Processed {} in: {:?}", path.display(), timer.elapsed());

        Ok(summary)
    }).await??;

    Ok(summary)
}

fn show_dashboard(database: &Path, args: &DashboardArgs) -> Result<()> {
    let store = SqliteStore::open(database)?;
    let filter = args.filter.to_filter();
    let dashboard = Dashboard::new(filter.currency, args.recent, args.top);

    let mut output = BufWriter::new(stdout().lock());
    output.write_all(dashboard.render(&store, &filter)?.as_bytes())?;
    output.flush()?;

    Ok(())
}

fn export(database: &Path, args: &ExportArgs) -> Result<()> {
    let store = SqliteStore::open(database)?;
    let filter = args.filter.to_filter();

    let written = match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Unable to create [{}]", path.display()))?;
            export_filtered(&store, &filter, BufWriter::new(file))?
        }
        None => export_filtered(&store, &filter, BufWriter::new(stdout().lock()))?
    };

    info!("Exported {written} purchases");

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries command output (exports can be redirected), so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_import_summary(summary: &ImportSummary, args: &ImportArgs) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    if args.dry_run {
        writeln!(output, "Dry run: nothing was written to the database")?;
    }

    writeln!(output, "Accepted: {}", summary.accepted)?;
    writeln!(output, "Rejected: {}", summary.rejected)?;
    writeln!(output, "Written: {}", summary.written)?;

    if summary.duplicates > 0 {
        writeln!(output, "Duplicates replaced: {}", summary.duplicates)?;
    }

    let report = summary.rejection_report(args.report_limit());

    if !report.is_empty() {
        writeln!(output, "Rejections:")?;

        for rejection in report {
            writeln!(output, "  line {}: {}", rejection.line, rejection.reason)?;
        }

        let hidden = summary.rejections.len() - report.len();

        if hidden > 0 {
            writeln!(output, "  ... and {hidden} more (use --all-rejections to list them)")?;
        }
    }

    output.flush()?;

    Ok(())
}
