//! Configuration module for course-sheet
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use course_sheet::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Will harvest at most {} courses", config.courses_amount);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FailurePolicy, FetchConfig, NamespaceMap};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
