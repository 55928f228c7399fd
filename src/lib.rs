//! course-sheet: a course catalogue harvester
//!
//! This crate reads a sitemap of course pages, fetches every listed course,
//! extracts a handful of fields from the rendered HTML and writes them as
//! rows of a spreadsheet.

pub mod config;
pub mod course;
pub mod crawler;
pub mod logging;
pub mod output;
pub mod reporter;

use thiserror::Error;

/// Main error type for course-sheet operations
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] crawler::SitemapError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for course-sheet operations
pub type Result<T> = std::result::Result<T, SheetError>;

// Re-export commonly used types
pub use config::Config;
pub use course::{Course, CoursePage, DEFAULT_VALUE};
pub use crawler::{run, Pipeline, RunSummary};
pub use reporter::{Reporter, TracingReporter};
