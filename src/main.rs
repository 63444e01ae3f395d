// src/main.rs
// =============================================================================
// This is the entry point of the crawler.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Run (or resume) the crawl
// 4. Export the collected listings as CSV and print a summary
//    (an aborted run still exports what it captured)
// 5. Exit with proper code (0 = complete, 1 = partial result, 2 = error)
//
// The runtime is single-threaded: the crawler never has more
// than one request in flight.
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod extract;
mod fetch;
mod logging;
mod model;
mod sink;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::CrawlConfig;
use crawl::{Checkpoint, CheckpointFile, RunController, RunReport, RunSinks, RunState, Termination};
use fetch::HttpFetcher;
use sink::{BackupSink, DocumentStore, ResultTable};
use std::path::Path;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Crawl { args, checkpoint } => {
            let config = CrawlConfig::from_args(args)?;
            handle_crawl(config, checkpoint.map(CheckpointFile::new), None).await
        }
        Commands::Resume { checkpoint, args } => {
            let config = CrawlConfig::from_args(args)?;
            let file = CheckpointFile::new(checkpoint);
            let saved = file
                .load()
                .with_context(|| format!("reading checkpoint {}", file.path().display()))?;
            handle_crawl(config, Some(file), Some(saved)).await
        }
    }
}

// Runs one crawl and writes its outputs
//
// Parameters:
//   config: validated settings
//   checkpoint: where to keep the checkpoint, if resumability is wanted
//   saved: the checkpoint to continue from (resume only)
async fn handle_crawl(
    config: CrawlConfig,
    checkpoint: Option<CheckpointFile>,
    saved: Option<Checkpoint>,
) -> Result<i32> {
    let started = chrono::Local::now();
    let process_stamp = model::file_stamp(&started);
    // a resumed run keeps writing backups into its original run folder
    let run_stamp = saved
        .as_ref()
        .map(|c| c.run_stamp.clone())
        .unwrap_or_else(|| process_stamp.clone());

    info!(base_url = %config.base_url, run = %run_stamp, "Starting crawl");

    let fetcher = HttpFetcher::new(&config.fetch_settings()).context("building HTTP client")?;
    let sinks = RunSinks {
        backups: BackupSink::new(&config.backup_dir),
        documents: DocumentStore::new(&config.document_dir, run_stamp.clone()),
        checkpoint,
    };
    let controller = RunController::new(
        fetcher,
        config.address()?,
        config.max_page,
        run_stamp,
        sinks,
        config.politeness(),
    )?;

    let result = match saved {
        Some(saved) => {
            controller
                .resume(RunState::from_checkpoint(&saved), config.max_repeats)
                .await
        }
        None => controller.run(config.start_page, config.max_repeats).await,
    };

    let export_path = config.export_path(&process_stamp);
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(failure) => {
            export(&failure.partial.table, &export_path)?;
            return Err(failure.into());
        }
    };
    export(&outcome.table, &export_path)?;

    let elapsed = chrono::Local::now() - started;
    print_report(&outcome.report, config.json, elapsed)?;

    match outcome.report.termination {
        Termination::Completed => Ok(0),
        Termination::RepeatLimit => Ok(1),
        Termination::Aborted => Ok(2),
    }
}

fn export(table: &ResultTable, path: &Path) -> Result<()> {
    info!(path = %path.display(), rows = table.len(), "Writing export file");
    sink::write_csv(table, path)
}

// Prints the summary either as a table or JSON
fn print_report(report: &RunReport, json: bool, elapsed: chrono::Duration) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let secs = elapsed.num_seconds().max(0);
    println!();
    println!("📊 Summary (run {}):", report.run_stamp);
    println!("   ✅ Records captured:   {}", report.records);
    println!("   ⏭️  Listings skipped:   {}", report.skipped);
    println!("   🔁 Iterations / retries: {} / {}", report.repeats, report.retries);
    println!("   📄 Pages completed:    {}", report.pages_completed);
    println!("   📋 Pages outstanding:  {}", report.pages_outstanding.len());
    println!(
        "   ⏱️  Time elapsed:       {:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    );
    match report.termination {
        Termination::Completed => println!("Your query was successful!"),
        Termination::RepeatLimit => {
            println!("⚠️  Repeat limit reached, the result is partial")
        }
        Termination::Aborted => println!("❌ Run aborted, the result is partial"),
    }
    Ok(())
}
