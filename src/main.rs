//! course-sheet main entry point
//!
//! This is the command-line interface for the course spreadsheet harvester.

use clap::Parser;
use course_sheet::config::load_config_with_hash;
use course_sheet::logging::{file_layer, verbosity_directives};
use course_sheet::{Config, Pipeline, TracingReporter};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// course-sheet: a course catalogue harvester
///
/// Reads the course sitemap, fetches every listed course page and writes
/// name, start date, languages, duration and rating to a spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "course-sheet")]
#[command(version)]
#[command(about = "Harvest course pages into a spreadsheet", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Fetch the sitemap and list the courses that would be processed
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The log file location lives in the config, so load it before logging
    let (config, config_hash) = load_config_with_hash(&cli.config)?;

    setup_logging(cli.verbose, cli.quiet, config.log_file.as_deref())?;
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    if cli.dry_run {
        handle_dry_run(config).await
    } else {
        handle_run(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// With a log file configured, every event is also appended there as
/// timestamp, level and message.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(EnvFilter::new(verbosity_directives(verbose, quiet)));

    let file = match log_file {
        Some(path) => Some(file_layer(path)?),
        None => None,
    };

    tracing_subscriber::registry().with(console).with(file).init();
    Ok(())
}

/// Handles the --dry-run mode: shows which courses would be processed
async fn handle_dry_run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== course-sheet Dry Run ===\n");
    println!("Sitemap: {}", config.courses_url);
    println!("Course limit: {}", config.courses_amount);
    println!("Output: {}", config.filepath.display());
    println!("On fetch failure: {:?}", config.on_fetch_failure);
    println!(
        "Retries: {} (every {}s)",
        config.fetch.max_retries, config.fetch.retry_delay_secs
    );

    let pipeline = Pipeline::new(config, TracingReporter)?;
    let urls = pipeline.load_course_urls().await?;

    println!("\nCourses ({}):", urls.len());
    for url in &urls {
        println!("  - {}", url);
    }

    println!("\n✓ Dry run complete - no spreadsheet written");
    Ok(())
}

/// Handles the main harvest operation
async fn handle_run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    match course_sheet::run(config).await {
        Ok(summary) => {
            if let Some(path) = &summary.output_path {
                println!(
                    "✓ {} course(s) written to {}",
                    summary.rows_written,
                    path.display()
                );
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
