//! Crawler module for the sitemap-to-spreadsheet pipeline
//!
//! This module contains:
//! - HTTP fetching with fixed-delay retries
//! - Sitemap parsing
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod sitemap;

pub use coordinator::{run, Pipeline, RunSummary};
pub use fetcher::{build_http_client, fetch_with_retry, FetchOutcome, RetryPolicy};
pub use sitemap::{parse_sitemap, SitemapError, SITEMAP_PREFIX};
