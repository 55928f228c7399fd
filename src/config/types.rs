use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// XML namespace prefix to URI mapping used by sitemap queries
pub type NamespaceMap = BTreeMap<String, String>;

/// Main configuration structure for course-sheet
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Sitemap endpoint listing the course pages
    pub courses_url: String,

    /// Namespace prefixes used when querying the sitemap
    pub namespace_mapping: NamespaceMap,

    /// Maximum number of courses to process
    pub courses_amount: usize,

    /// Destination of the spreadsheet
    pub filepath: PathBuf,

    /// What to do with a course page that could not be fetched
    #[serde(default)]
    pub on_fetch_failure: FailurePolicy,

    /// Optional file that receives a copy of the log stream
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub fetch: FetchConfig,
}

/// HTTP behaviour configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Number of retries after the first failed attempt
    pub max_retries: u32,

    /// Fixed delay between attempts (seconds)
    pub retry_delay_secs: u64,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_delay_secs: 30,
            timeout_secs: 30,
            accept_invalid_certs: false,
        }
    }
}

impl FetchConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Handling of course pages whose retries were exhausted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Write a row anyway, extracted from whatever the last response returned
    #[default]
    DefaultRow,

    /// Leave the course out of the table
    Skip,
}
