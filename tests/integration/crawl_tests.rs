//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a miniature StartASL site and run the
//! full crawl end-to-end against a temporary output directory, with a
//! recording video backend in place of yt-dlp.

use asl_harvest::config::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use asl_harvest::crawler::Coordinator;
use asl_harvest::output::UnitOutcome;
use asl_harvest::parse::{ListKind, VideoListClassification};
use asl_harvest::{DownloadError, HarvestError, VideoBackend};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF_BYTES: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\nbinary body\n%%EOF";

/// A backend call captured instead of downloading
#[derive(Debug, Clone)]
struct RecordedCall {
    urls: Vec<String>,
    output_dir: PathBuf,
    naming_template: String,
}

#[derive(Default)]
struct RecordingBackend {
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingBackend {
    fn calls_into(&self, dir: &Path) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.output_dir == dir)
            .cloned()
            .collect()
    }
}

impl VideoBackend for RecordingBackend {
    fn download(
        &self,
        urls: &[String],
        output_dir: &Path,
        naming_template: &str,
    ) -> Result<(), DownloadError> {
        self.calls.lock().unwrap().push(RecordedCall {
            urls: urls.to_vec(),
            output_dir: output_dir.to_path_buf(),
            naming_template: naming_template.to_string(),
        });
        Ok(())
    }
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(contents_url: String, output_dir: &Path) -> Config {
    Config {
        site: SiteConfig { contents_url },
        crawler: CrawlerConfig {
            max_concurrent_units: 2,
            request_delay_ms: 0,
            request_timeout_secs: 5,
            max_retries: 0,
            retry_delay_ms: 0,
        },
        output: OutputConfig {
            directory: output_dir.join("output").to_string_lossy().into_owned(),
            summary_path: Some(
                output_dir
                    .join("summary.md")
                    .to_string_lossy()
                    .into_owned(),
            ),
        },
        ..Config::default()
    }
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn video_list(urls: &[&str]) -> String {
    let items: String = urls
        .iter()
        .map(|url| {
            format!(r##"<li class="phrase"><a href="#" current-url="{url}">{url}</a></li>"##)
        })
        .collect();
    format!(r#"<ul class="dictionary phrase-list">{items}</ul>"#)
}

fn unit_page(title: &str, lists: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <div class="entry-content"><h1>{title}</h1><p>Practice these signs.</p>{lists}</div>
        </body></html>"#
    )
}

async fn mount_site(server: &MockServer) {
    let contents = r#"<html><body><div class="entry-content"><table>
        <tr><td>Class</td><td>Units</td></tr>
        <tr><td>ASL 1</td><td><a href="/asl1/unit-a.html">UnitA</a> <a href="/asl1/review.pdf">Review Sheet</a></td></tr>
        <tr><td>ASL 2</td><td><a href="/asl2/unit-b.html">UnitB</a> <a href="/asl2/missing.html">Missing Unit</a></td></tr>
        <tr><td>Fingerspelling</td><td><a href="/fingerspelling.html">Alphabet</a></td></tr>
    </table></div></body></html>"#;

    Mock::given(method("GET"))
        .and(path("/learn.html"))
        .respond_with(html_response(contents.to_string()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/asl1/unit-a.html"))
        .respond_with(html_response(unit_page(
            "Unit A",
            &video_list(&["https://videos.example.com/hello", "https://videos.example.com/bye"]),
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/asl1/review.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PDF_BYTES.to_vec()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/asl2/unit-b.html"))
        .respond_with(html_response(unit_page(
            "Unit B",
            &format!(
                "{}{}",
                video_list(&["https://videos.example.com/how-are-you"]),
                video_list(&[
                    "https://videos.example.com/fine",
                    "https://videos.example.com/tired"
                ]),
            ),
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/asl2/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    // The trailing fingerspelling row is never followed
    Mock::given(method("GET"))
        .and(path("/fingerspelling.html"))
        .respond_with(html_response(unit_page("Alphabet", "")))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_mirrors_site() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(format!("{}/learn.html", mock_server.uri()), temp.path());
    let backend = Arc::new(RecordingBackend::default());

    let coordinator =
        Coordinator::new(config, backend.clone()).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    let out = temp.path().join("output");

    // Class directories
    assert!(out.join("ASL_1").is_dir());
    assert!(out.join("ASL_2").is_dir());
    assert!(!out.join("Fingerspelling").exists());

    // Single list in a class containing '1' is vocabulary
    let lesson = std::fs::read_to_string(out.join("ASL_1/UnitA/lesson.md"))
        .expect("lesson.md should exist");
    assert!(lesson.contains("Practice these signs"));
    assert!(!lesson.contains("videos.example.com"));

    let vocab_calls = backend.calls_into(&out.join("ASL_1/UnitA/vocab"));
    assert_eq!(vocab_calls.len(), 1);
    assert_eq!(vocab_calls[0].urls.len(), 2);
    assert_eq!(vocab_calls[0].naming_template, "%(title)s.%(ext)s");
    assert!(!out.join("ASL_1/UnitA/phrases").exists());

    // PDF unit: exact bytes at class level, nothing else
    let pdf = std::fs::read(out.join("ASL_1/Review_Sheet.pdf")).expect("PDF should exist");
    assert_eq!(pdf, PDF_BYTES);
    assert!(!out.join("ASL_1/Review_Sheet").exists());

    // Dual list: phrases then vocab
    let phrase_calls = backend.calls_into(&out.join("ASL_2/UnitB/phrases"));
    assert_eq!(phrase_calls.len(), 1);
    assert_eq!(
        phrase_calls[0].urls,
        vec!["https://videos.example.com/how-are-you".to_string()]
    );
    assert_eq!(
        phrase_calls[0].naming_template,
        "%(autonumber)d-%(title)s.%(ext)s"
    );
    assert_eq!(backend.calls_into(&out.join("ASL_2/UnitB/vocab")).len(), 1);

    // Failed fetch produces nothing and does not stop the crawl
    assert!(!out.join("ASL_2/Missing_Unit").exists());

    assert_eq!(backend.calls.lock().unwrap().len(), 3);

    // Report
    assert_eq!(report.classes, 2);
    assert_eq!(report.units.len(), 4);
    assert_eq!(report.pdfs_saved(), 1);
    assert_eq!(report.lessons_written(), 2);
    assert_eq!(report.videos_requested(), 5);
    assert_eq!(report.failures(), 1);

    let unit_a = report
        .units
        .iter()
        .find(|unit| unit.unit_name == "UnitA")
        .expect("UnitA should be reported");
    assert!(matches!(
        unit_a.outcome,
        UnitOutcome::Processed {
            classification: VideoListClassification::SingleList(ListKind::Vocab),
            lesson_written: true,
            videos_requested: 2,
            ..
        }
    ));

    let missing = report
        .units
        .iter()
        .find(|unit| unit.unit_name == "Missing_Unit")
        .expect("Missing_Unit should be reported");
    assert_eq!(
        missing.outcome,
        UnitOutcome::FetchFailed {
            reason: "HTTP 404".to_string()
        }
    );

    let summary = std::fs::read_to_string(temp.path().join("summary.md"))
        .expect("summary should be written");
    assert!(summary.contains("- **PDFs Saved**: 1"));
}

#[tokio::test]
async fn test_rerun_into_existing_tree() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    let backend = Arc::new(RecordingBackend::default());

    for _ in 0..2 {
        let config = create_test_config(format!("{}/learn.html", mock_server.uri()), temp.path());
        let coordinator =
            Coordinator::new(config, backend.clone()).expect("Failed to create coordinator");
        let report = coordinator.run().await.expect("Crawl failed");
        assert_eq!(report.failures(), 1);
    }

    assert!(temp.path().join("output/ASL_1/UnitA/lesson.md").is_file());
}

#[tokio::test]
async fn test_contents_page_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/learn.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(format!("{}/learn.html", mock_server.uri()), temp.path());
    let coordinator = Coordinator::new(config, Arc::new(RecordingBackend::default()))
        .expect("Failed to create coordinator");

    let result = coordinator.run().await;
    assert!(matches!(
        result,
        Err(HarvestError::ContentsUnavailable { .. })
    ));
    assert!(!temp.path().join("output").exists());
}

#[tokio::test]
async fn test_page_without_table_crawls_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/learn.html"))
        .respond_with(html_response(
            r#"<html><body><div class="entry-content"><p>Under construction</p></div></body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(format!("{}/learn.html", mock_server.uri()), temp.path());
    let coordinator = Coordinator::new(config, Arc::new(RecordingBackend::default()))
        .expect("Failed to create coordinator");

    let report = coordinator.run().await.expect("Crawl failed");
    assert_eq!(report.classes, 0);
    assert!(report.units.is_empty());
}
