//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to serve a sitemap and course pages and run
//! the full fetch → extract → write cycle end-to-end.

use calamine::{open_workbook, Reader, Xlsx};
use course_sheet::config::{Config, FailurePolicy, FetchConfig, NamespaceMap};
use course_sheet::crawler::{build_http_client, fetch_with_retry, FetchOutcome, RetryPolicy};
use course_sheet::output::XlsxWriter;
use course_sheet::{Pipeline, Reporter, SheetError, DEFAULT_VALUE};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Reporter that keeps every line for inspection
#[derive(Default)]
struct RecordingReporter {
    infos: RefCell<Vec<String>>,
    warnings: RefCell<Vec<String>>,
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, courses_amount: usize, filepath: PathBuf) -> Config {
    let mut namespace_mapping = NamespaceMap::new();
    namespace_mapping.insert("urlset".to_string(), SITEMAP_NS.to_string());

    Config {
        courses_url: format!("{}/sitemap.xml", base_url),
        namespace_mapping,
        courses_amount,
        filepath,
        on_fetch_failure: FailurePolicy::DefaultRow,
        log_file: None,
        fetch: FetchConfig {
            max_retries: 2,
            retry_delay_secs: 0, // No waiting in tests
            timeout_secs: 5,
            accept_invalid_certs: false,
        },
    }
}

fn sitemap_xml(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|url| format!("<url><loc>{}</loc></url>", url))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="{}">{}</urlset>"#,
        SITEMAP_NS, entries
    )
}

fn course_html(name: &str, rating: Option<&str>) -> String {
    let rating = rating
        .map(|r| format!(r#"<div class="ratings-text bt3-visible-xs">{}</div>"#, r))
        .unwrap_or_default();
    format!(
        r#"<html><body>
            <h1 class="title display-3-text">{}</h1>
            <div class="language-info">English</div>
            {}
            <div class="startdate rc-StartDateString caption-text">Starts Feb 2</div>
            <table><tr><td><span>Commitment</span></td><td>4 weeks</td></tr></table>
        </body></html>"#,
        name, rating
    )
}

async fn mount_sitemap(server: &MockServer, urls: &[String]) {
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_xml(urls)))
        .mount(server)
        .await;
}

async fn mount_course(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Reads every row of the Courses sheet as strings
fn read_sheet(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("Failed to open workbook");
    let range = workbook
        .worksheet_range("Courses")
        .expect("Courses sheet missing");
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

#[tokio::test]
async fn test_course_limit_keeps_sitemap_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let urls: Vec<String> = (1..=3)
        .map(|i| format!("{}/learn/course-{}", base_url, i))
        .collect();

    mount_sitemap(&mock_server, &urls).await;
    mount_course(&mock_server, "/learn/course-1", course_html("First", Some("4.1"))).await;
    mount_course(&mock_server, "/learn/course-2", course_html("Second", Some("4.2"))).await;

    // Beyond courses_amount, should never be requested
    Mock::given(method("GET"))
        .and(path("/learn/course-3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("courses.xlsx");
    let config = create_test_config(&base_url, 2, output.clone());

    let reporter = RecordingReporter::default();
    let pipeline = Pipeline::new(config, &reporter).expect("Failed to create pipeline");
    let summary = pipeline.run(&XlsxWriter).await.expect("Run failed");

    assert_eq!(summary.courses_listed, 2);
    assert_eq!(summary.rows_written, 2);
    assert_eq!(summary.output_path.as_deref(), Some(output.as_path()));

    let rows = read_sheet(&output);
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        vec!["Name", "Start Date", "Languages", "Duration", "Rating", "Url"]
    );
    assert_eq!(
        rows[1],
        vec!["First", "Feb 2", "English", "4 weeks", "4.1", urls[0].as_str()]
    );
    assert_eq!(
        rows[2],
        vec!["Second", "Feb 2", "English", "4 weeks", "4.2", urls[1].as_str()]
    );

    assert!(reporter.warnings.borrow().is_empty());
    assert!(reporter
        .infos
        .borrow()
        .iter()
        .any(|line| line.starts_with("Run finished")));
}

#[tokio::test]
async fn test_missing_rating_defaults_only_that_column() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let urls = vec![format!("{}/learn/no-rating", base_url)];

    mount_sitemap(&mock_server, &urls).await;
    mount_course(&mock_server, "/learn/no-rating", course_html("Unrated", None)).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("courses.xlsx");
    let config = create_test_config(&base_url, 10, output.clone());

    let reporter = RecordingReporter::default();
    let pipeline = Pipeline::new(config, &reporter).unwrap();
    pipeline.run(&XlsxWriter).await.expect("Run failed");

    let rows = read_sheet(&output);
    assert_eq!(
        rows[1],
        vec!["Unrated", "Feb 2", "English", "4 weeks", DEFAULT_VALUE, urls[0].as_str()]
    );
}

#[tokio::test]
async fn test_empty_sitemap_writes_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_sitemap(&mock_server, &[]).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("courses.xlsx");
    let config = create_test_config(&base_url, 10, output.clone());

    let reporter = RecordingReporter::default();
    let pipeline = Pipeline::new(config, &reporter).unwrap();
    let summary = pipeline.run(&XlsxWriter).await.expect("Run failed");

    assert_eq!(summary.courses_listed, 0);
    assert!(summary.output_path.is_none());
    assert!(!output.exists());
    assert!(reporter
        .infos
        .borrow()
        .iter()
        .any(|line| line.starts_with("Run finished")));
}

#[tokio::test]
async fn test_unreachable_sitemap_is_treated_as_empty() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("courses.xlsx");
    let config = create_test_config(&base_url, 10, output.clone());

    let reporter = RecordingReporter::default();
    let pipeline = Pipeline::new(config, &reporter).unwrap();
    let summary = pipeline.run(&XlsxWriter).await.expect("Run failed");

    assert!(summary.output_path.is_none());
    assert!(!output.exists());
    assert_eq!(reporter.warnings.borrow().len(), 3);
    assert!(reporter.warnings.borrow()[0].contains("503"));
}

#[tokio::test]
async fn test_malformed_sitemap_fails_without_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset><url>"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("courses.xlsx");
    let config = create_test_config(&base_url, 10, output.clone());

    let reporter = RecordingReporter::default();
    let pipeline = Pipeline::new(config, &reporter).unwrap();
    let result = pipeline.run(&XlsxWriter).await;

    assert!(matches!(result, Err(SheetError::Sitemap(_))));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_unfetchable_course_gets_default_row() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let urls = vec![
        format!("{}/learn/gone", base_url),
        format!("{}/learn/ok", base_url),
    ];

    mount_sitemap(&mock_server, &urls).await;
    Mock::given(method("GET"))
        .and(path("/learn/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not found</html>"))
        .expect(3)
        .mount(&mock_server)
        .await;
    mount_course(&mock_server, "/learn/ok", course_html("Fine", Some("5"))).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("courses.xlsx");
    let config = create_test_config(&base_url, 10, output.clone());

    let reporter = RecordingReporter::default();
    let pipeline = Pipeline::new(config, &reporter).unwrap();
    let summary = pipeline.run(&XlsxWriter).await.expect("Run failed");

    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.rows_written, 2);

    let rows = read_sheet(&output);
    assert_eq!(
        rows[1],
        vec![
            DEFAULT_VALUE,
            DEFAULT_VALUE,
            DEFAULT_VALUE,
            DEFAULT_VALUE,
            DEFAULT_VALUE,
            urls[0].as_str()
        ]
    );
    assert_eq!(rows[2][0], "Fine");
}

#[tokio::test]
async fn test_unfetchable_course_skipped_by_policy() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let urls = vec![
        format!("{}/learn/gone", base_url),
        format!("{}/learn/ok", base_url),
    ];

    mount_sitemap(&mock_server, &urls).await;
    Mock::given(method("GET"))
        .and(path("/learn/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_course(&mock_server, "/learn/ok", course_html("Fine", Some("5"))).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("courses.xlsx");
    let mut config = create_test_config(&base_url, 10, output.clone());
    config.on_fetch_failure = FailurePolicy::Skip;

    let reporter = RecordingReporter::default();
    let pipeline = Pipeline::new(config, &reporter).unwrap();
    let summary = pipeline.run(&XlsxWriter).await.expect("Run failed");

    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.skipped, 1);

    let rows = read_sheet(&output);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "Fine");
    assert_eq!(rows[1][5], urls[1]);
}

#[tokio::test]
async fn test_rerun_produces_identical_table() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let urls: Vec<String> = (1..=2)
        .map(|i| format!("{}/learn/c{}", base_url, i))
        .collect();

    mount_sitemap(&mock_server, &urls).await;
    mount_course(&mock_server, "/learn/c1", course_html("One", Some("4"))).await;
    mount_course(&mock_server, "/learn/c2", course_html("Two", None)).await;

    let dir = tempfile::tempdir().unwrap();
    let mut sheets = Vec::new();

    for name in ["run1.xlsx", "run2.xlsx"] {
        let output = dir.path().join(name);
        let config = create_test_config(&base_url, 10, output.clone());

        let reporter = RecordingReporter::default();
        let pipeline = Pipeline::new(config, &reporter).unwrap();
        let summary = pipeline.run(&XlsxWriter).await.expect("Run failed");
        assert_eq!(summary.rows_written, 2);

        sheets.push(read_sheet(&output));
    }

    assert_eq!(sheets[0].len(), 3);
    assert_eq!(sheets[0], sheets[1]);
}

#[tokio::test]
async fn test_listing_courses_writes_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let urls: Vec<String> = (1..=3)
        .map(|i| format!("{}/learn/c{}", base_url, i))
        .collect();

    mount_sitemap(&mock_server, &urls).await;

    // Listing only reads the sitemap
    Mock::given(method("GET"))
        .and(path("/learn/c1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("courses.xlsx");
    let config = create_test_config(&base_url, 2, output.clone());

    let reporter = RecordingReporter::default();
    let pipeline = Pipeline::new(config, &reporter).unwrap();
    let listed = pipeline.load_course_urls().await.unwrap();

    assert_eq!(listed, urls[..2].to_vec());
    assert!(!output.exists());
}

/// Serves `failures` failing responses before a successful one
async fn flaky_server(failures: u64) -> MockServer {
    let mock_server = MockServer::start().await;

    if failures > 0 {
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(failures)
            .expect(failures)
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    mock_server
}

#[tokio::test]
async fn test_retries_until_success() {
    let client = build_http_client(&FetchConfig::default()).unwrap();
    let policy = RetryPolicy {
        max_retries: 2,
        delay: Duration::from_millis(5),
    };

    for failures in 0..=2u32 {
        let mock_server = flaky_server(failures as u64).await;
        let reporter = RecordingReporter::default();

        let outcome = fetch_with_retry(
            &client,
            &format!("{}/page", mock_server.uri()),
            policy,
            &reporter,
        )
        .await;

        assert_eq!(
            outcome,
            FetchOutcome::Success {
                body: "ok".to_string(),
                retries: failures,
                waited: policy.delay * failures,
            }
        );
        assert_eq!(reporter.warnings.borrow().len(), failures as usize);
    }
}

#[tokio::test]
async fn test_exhausted_retries_return_fallback() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = build_http_client(&FetchConfig::default()).unwrap();
    let policy = RetryPolicy {
        max_retries: 2,
        delay: Duration::ZERO,
    };
    let reporter = RecordingReporter::default();

    let outcome = fetch_with_retry(
        &client,
        &format!("{}/page", mock_server.uri()),
        policy,
        &reporter,
    )
    .await;

    assert_eq!(
        outcome,
        FetchOutcome::Exhausted {
            last_status: Some(503),
            last_body: "busy".to_string(),
            retries: 2,
            waited: Duration::ZERO,
        }
    );
    assert_eq!(reporter.warnings.borrow().len(), 3);
}

#[tokio::test]
async fn test_zero_retry_budget_tries_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_http_client(&FetchConfig::default()).unwrap();
    let policy = RetryPolicy {
        max_retries: 0,
        delay: Duration::from_secs(30),
    };
    let reporter = RecordingReporter::default();

    let outcome = fetch_with_retry(
        &client,
        &format!("{}/page", mock_server.uri()),
        policy,
        &reporter,
    )
    .await;

    assert!(!outcome.is_success());
    assert_eq!(outcome.retries(), 0);
}

#[tokio::test]
async fn test_transport_errors_are_retried() {
    // Grab a free port, then release it so connections are refused
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let url = format!("http://{}/page", addr);

    let client = build_http_client(&FetchConfig::default()).unwrap();
    let policy = RetryPolicy {
        max_retries: 1,
        delay: Duration::ZERO,
    };
    let reporter = RecordingReporter::default();

    let outcome = fetch_with_retry(&client, &url, policy, &reporter).await;

    match outcome {
        FetchOutcome::Exhausted {
            last_status,
            last_body,
            retries,
            ..
        } => {
            assert_eq!(last_status, None);
            assert!(last_body.is_empty());
            assert_eq!(retries, 1);
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }
    assert_eq!(reporter.warnings.borrow().len(), 2);
}
