//! Logging setup helpers
//!
//! The console filter follows the CLI verbosity flags. The optional log
//! file receives one line per event: local timestamp, level and message.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

/// Timestamp format used in the log file
pub const LOG_FILE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `EnvFilter` directives for the console
pub fn verbosity_directives(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }

    match verbose {
        0 => "course_sheet=info,warn",
        1 => "course_sheet=debug,info",
        2 => "course_sheet=trace,debug",
        _ => "trace",
    }
}

/// Builds a layer appending info and warning events to `path`
pub fn file_layer<S>(path: &Path) -> std::io::Result<Box<dyn Layer<S> + Send + Sync + 'static>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Ok(tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(LOG_FILE_TIME_FORMAT.to_string()))
        .with_filter(EnvFilter::new("course_sheet=info,warn"))
        .boxed())
}
