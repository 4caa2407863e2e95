#![allow(clippy::print_stderr)]
use crate::cli::{Args, BulkLoadArgs, Command, StatsArgs};
use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use hexaplex_ingest::{bulk_load, BulkLoadOptions, IngestError};
use hexaplex_stats::{compute_stats, root_graph_iri, StatsError, StatsOptions};
use hexaplex_storage::FileStore;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

mod cli;

#[tokio::main]
pub async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,hexaplex=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => return report_usage_error(&error),
    };
    let subcommand = match &args.command {
        Command::Bulkload(_) => "bulkload",
        Command::Stats(_) => "stats",
    };
    let result = match args.command {
        Command::Bulkload(args) => run_bulk_load(args).await,
        Command::Stats(args) => run_stats(args).await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:#}");
            if is_configuration_error(&error) {
                eprintln!();
                eprintln!("{}", help_text(Some(subcommand)));
            }
            ExitCode::FAILURE
        }
    }
}

/// Help exits with a failure code, version with success. Every other error is followed by the
/// help text.
fn report_usage_error(error: &clap::Error) -> ExitCode {
    if error.print().is_err() {
        return ExitCode::FAILURE;
    }
    match error.kind() {
        ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            ExitCode::FAILURE
        }
        _ => {
            let subcommand = std::env::args()
                .skip(1)
                .find(|arg| arg == "bulkload" || arg == "stats");
            eprintln!();
            eprintln!("{}", help_text(subcommand.as_deref()));
            ExitCode::FAILURE
        }
    }
}

fn help_text(subcommand: Option<&str>) -> String {
    let mut command = Args::command();
    command.build();
    match subcommand.and_then(|name| command.find_subcommand_mut(name)) {
        Some(subcommand) => subcommand.render_help().to_string(),
        None => command.render_help().to_string(),
    }
}

fn is_configuration_error(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<IngestError>(),
        Some(IngestError::Configuration(_))
    ) || matches!(
        error.downcast_ref::<StatsError>(),
        Some(StatsError::Configuration(_))
    )
}

async fn run_bulk_load(args: BulkLoadArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    tracing::debug!(store = %args.store.display(), "Opening store");
    let store = Arc::new(FileStore::new(&args.store));
    let mut options = BulkLoadOptions::new(args.source, args.work_dir, args.target);
    options.skip_invalid = args.skip_invalid;
    options.verify_literals = args.verify_data_types;
    options.truncate = args.truncate_target;
    options.split_bits = args.pre_split_bits;
    options.graph_template = args.graph_context;
    options.override_context = args.graph_context_override;
    options.timestamp = args.target_timestamp;
    options.max_split_size = args.max_split_size;
    if let Some(parallelism) = args.parallelism {
        options.parallelism = parallelism;
    }

    let table = options.table.clone();
    let summary = bulk_load(store, options)
        .await
        .with_context(|| format!("Bulk load into {table} failed"))?;

    eprintln!("Bulk load complete");
    eprintln!("  Files:      {}", summary.files);
    eprintln!("  Skipped:    {}", summary.skipped);
    eprintln!("  Statements: {}", summary.statements);
    eprintln!("  Records:    {}", summary.records);
    eprintln!("  Segments:   {}", summary.segments);
    eprintln!("  Loaded:     {}", summary.loaded);
    eprintln!("  Elapsed:    {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

async fn run_stats(args: StatsArgs) -> anyhow::Result<()> {
    let root_graph = root_graph_iri(&args.store, &args.source)?;
    tracing::debug!(store = %args.store.display(), %root_graph, "Opening store");
    let store = Arc::new(FileStore::new(&args.store));
    let mut options = StatsOptions::new(args.source, args.target, root_graph);
    if let Some(parallelism) = args.parallelism {
        options.parallelism = parallelism;
    }

    let table = options.table.clone();
    let target = options.target.clone();
    let records = compute_stats(store, options)
        .await
        .with_context(|| format!("Computing the statistics of {table} failed"))?;
    eprintln!("Wrote {} statistics to {target}", records.len());
    Ok(())
}
