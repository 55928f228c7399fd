//! Pipeline coordinator - main harvest orchestration logic
//!
//! The run is strictly sequential:
//! 1. Fetch and parse the sitemap; an empty list ends the run without output
//! 2. Start an empty table under the fixed header
//! 3. Fetch each course page in sitemap order and append its row
//! 4. Write the table once, at the end
//!
//! Nothing is written if the run stops before step 4.

use crate::config::{Config, FailurePolicy};
use crate::course::{Course, CoursePage};
use crate::crawler::fetcher::{build_http_client, fetch_with_retry, RetryPolicy};
use crate::crawler::sitemap::parse_sitemap;
use crate::output::{CourseTable, TableWriter, XlsxWriter};
use crate::reporter::{Reporter, TracingReporter};
use crate::Result;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::path::PathBuf;

/// What a finished run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Course URLs taken from the sitemap
    pub courses_listed: usize,
    /// Data rows written to the table
    pub rows_written: usize,
    /// Course pages whose retries were exhausted
    pub pages_failed: usize,
    /// Failed course pages left out of the table
    pub skipped: usize,
    /// Where the table was written, `None` when nothing was written
    pub output_path: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Drives a single harvest run
pub struct Pipeline<R: Reporter> {
    config: Config,
    client: Client,
    policy: RetryPolicy,
    reporter: R,
}

impl<R: Reporter> Pipeline<R> {
    /// Creates a pipeline with an HTTP client built from the configuration
    pub fn new(config: Config, reporter: R) -> Result<Self> {
        let client = build_http_client(&config.fetch)?;
        let policy = RetryPolicy::from(&config.fetch);

        Ok(Self {
            config,
            client,
            policy,
            reporter,
        })
    }

    /// Fetches the sitemap and returns the course URLs to process
    ///
    /// A sitemap that cannot be fetched counts as empty. Malformed XML is
    /// an error.
    pub async fn load_course_urls(&self) -> Result<Vec<String>> {
        let outcome = fetch_with_retry(
            &self.client,
            &self.config.courses_url,
            self.policy,
            &self.reporter,
        )
        .await;

        if !outcome.is_success() {
            tracing::debug!("Sitemap unavailable, treating as empty");
        }

        let urls = parse_sitemap(
            &outcome.body_or_empty(),
            &self.config.namespace_mapping,
            self.config.courses_amount,
        )?;

        tracing::info!("Sitemap lists {} course(s) to process", urls.len());
        Ok(urls)
    }

    /// Fetches one course page and extracts it
    ///
    /// Returns the course, or `None` when the page failed and the policy
    /// says to skip it, together with whether the fetch failed.
    pub async fn fetch_course(&self, url: &str) -> (Option<Course>, bool) {
        let outcome = fetch_with_retry(&self.client, url, self.policy, &self.reporter).await;
        let failed = !outcome.is_success();

        if failed && self.config.on_fetch_failure == FailurePolicy::Skip {
            tracing::debug!("Skipping unfetchable course {}", url);
            return (None, true);
        }

        let body = outcome.body_or_last();
        let page = CoursePage::parse(&body);
        (Some(Course::from_page(url, &page)), failed)
    }

    /// Fetches every course in order and collects the rows
    ///
    /// Returns the table with the number of failed and skipped pages.
    pub async fn collect_courses(&self, urls: &[String]) -> (CourseTable, usize, usize) {
        let mut table = CourseTable::new();
        let mut failed = 0;
        let mut skipped = 0;

        for (index, url) in urls.iter().enumerate() {
            tracing::debug!("[{}/{}] {}", index + 1, urls.len(), url);

            let (course, page_failed) = self.fetch_course(url).await;
            if page_failed {
                failed += 1;
            }
            match course {
                Some(course) => table.push(&course),
                None => skipped += 1,
            }
        }

        (table, failed, skipped)
    }

    /// Runs the whole pipeline and persists the table with `writer`
    pub async fn run(&self, writer: &dyn TableWriter) -> Result<RunSummary> {
        let started_at = Utc::now();
        let urls = self.load_course_urls().await?;

        let mut summary = RunSummary {
            courses_listed: urls.len(),
            rows_written: 0,
            pages_failed: 0,
            skipped: 0,
            output_path: None,
            started_at,
            finished_at: started_at,
        };

        if urls.is_empty() {
            self.reporter.info("No courses found, nothing to write");
        } else {
            let (table, failed, skipped) = self.collect_courses(&urls).await;
            writer.write(&table, &self.config.filepath)?;

            summary.rows_written = table.len();
            summary.pages_failed = failed;
            summary.skipped = skipped;
            summary.output_path = Some(self.config.filepath.clone());
        }

        summary.finished_at = Utc::now();
        self.reporter.info(&format!(
            "Run finished: {} row(s) written, {} page(s) failed, {} skipped in {}s",
            summary.rows_written,
            summary.pages_failed,
            summary.skipped,
            (summary.finished_at - summary.started_at).num_seconds()
        ));

        Ok(summary)
    }
}

/// Runs a complete harvest with tracing output and an xlsx writer
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Run completed (possibly with nothing to write)
/// * `Err(SheetError)` - Run failed, no file was written
pub async fn run(config: Config) -> Result<RunSummary> {
    let pipeline = Pipeline::new(config, TracingReporter)?;
    pipeline.run(&XlsxWriter).await
}
