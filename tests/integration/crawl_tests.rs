//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use sitesift::config::{
    Config, CrawlerConfig, ExtractConfig, OutputConfig, UserAgentConfig,
    DEFAULT_IGNORED_EXTENSIONS,
};
use sitesift::crawler::{Coordinator, HttpFetcher, StopReason};
use sitesift::output::{JsonIndexWriter, PageRecord};
use sitesift::state::PageState;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server
fn create_test_config(base_url: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            seeds: vec![format!("{}/", base_url)],
            max_pages: 50,
            max_depth: 3,
            min_host_delay_seconds: 0.01, // Very short for testing
            concurrency: 5,
            request_timeout_seconds: 5,
            respect_crawl_delay: true,
            scope_domain: Some("127.0.0.1".to_string()),
            ignored_extensions: DEFAULT_IGNORED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            agent_token: None,
            contact_url: Some("https://example.com/contact".to_string()),
            contact_email: Some("test@example.com".to_string()),
        },
        extract: ExtractConfig::default(),
        output: OutputConfig::default(),
    }
}

fn fetcher(config: &Config) -> HttpFetcher {
    HttpFetcher::new(&config.user_agent, Duration::from_secs(5)).expect("Failed to build client")
}

async fn mount_html(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Paths the server was asked for, robots.txt excluded
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .filter(|p| p != "/robots.txt")
        .collect()
}

fn record_paths(records: &[PageRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| url::Url::parse(&r.url).unwrap().path().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(
        &server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{base}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="https://other.example/x">Foreign</a>
            <a href="/logo.png">Logo</a>
            </body></html>"#
        ),
    )
    .await;
    mount_html(
        &server,
        "/page1",
        r#"<html><head><title>Page 1</title></head><body>Content 1</body></html>"#.to_string(),
    )
    .await;
    mount_html(
        &server,
        "/page2",
        r#"<html><head><title>Page 2</title></head><body>Content 2</body></html>"#.to_string(),
    )
    .await;

    let config = create_test_config(&base);
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;

    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(record_paths(report.records()), vec!["/", "/page1", "/page2"]);
    assert_eq!(report.records()[1].title, "Page 1");
    assert_eq!(report.records()[1].content, "Content 1");
    assert_eq!(report.records()[1].id, format!("{}/page1", base));
    assert!(!requested_paths(&server).await.contains(&"/logo.png".to_string()));
}

#[tokio::test]
async fn test_robots_disallow() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nDisallow: /private/").await;
    mount_html(
        &server,
        "/",
        r#"<html><body><a href="/private/secret">Secret</a><a href="/public">Public</a></body></html>"#
            .to_string(),
    )
    .await;
    mount_html(
        &server,
        "/private/secret",
        r#"<html><body><a href="/leaked">Leaked</a></body></html>"#.to_string(),
    )
    .await;
    mount_html(&server, "/public", "<html><body>Public</body></html>".to_string()).await;

    let config = create_test_config(&base);
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;

    assert_eq!(record_paths(report.records()), vec!["/", "/public"]);
    assert_eq!(report.statistics.count(PageState::RobotsDenied), 1);
    assert_eq!(report.statistics.pages_visited, 3);

    let requested = requested_paths(&server).await;
    assert!(!requested.contains(&"/private/secret".to_string()));
    assert!(!requested.contains(&"/leaked".to_string()));
}

#[tokio::test]
async fn test_robots_agent_specific_group() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(
        &server,
        "User-agent: TestBot\nDisallow: /\n\nUser-agent: *\nAllow: /",
    )
    .await;
    mount_html(&server, "/", "<html><body>Home</body></html>".to_string()).await;

    let config = create_test_config(&base);
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;

    assert!(report.records().is_empty());
    assert_eq!(report.statistics.count(PageState::RobotsDenied), 1);
    assert!(requested_paths(&server).await.is_empty());
}

#[tokio::test]
async fn test_canonical_duplicate_not_indexed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><body><a href="/article">Article</a><a href="/article?ref=feed">Feed</a></body></html>"#
            .to_string(),
    )
    .await;
    // Both URLs hit the same route; wiremock's path matcher ignores the query
    mount_html(
        &server,
        "/article",
        format!(
            r#"<html><head><title>Article</title><link rel="canonical" href="{base}/article"></head>
            <body><p>Body</p><a href="/extra">Extra</a></body></html>"#
        ),
    )
    .await;
    mount_html(&server, "/extra", "<html><body>Extra</body></html>".to_string()).await;

    let config = create_test_config(&base);
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;

    let ids: Vec<&str> = report.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            format!("{}/", base),
            format!("{}/article", base),
            format!("{}/extra", base)
        ]
    );
    assert_eq!(report.statistics.count(PageState::CanonicalDuplicate), 1);
    assert_eq!(report.statistics.pages_visited, 4);
}

#[tokio::test]
async fn test_http_error_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><body><a href="/broken">Broken</a><a href="/ok">OK</a></body></html>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_html(&server, "/ok", "<html><body>Fine</body></html>".to_string()).await;

    let config = create_test_config(&base);
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;

    assert_eq!(record_paths(report.records()), vec!["/", "/ok"]);
    assert_eq!(report.statistics.count(PageState::FetchFailed), 1);
    assert_eq!(report.statistics.failed_urls.len(), 1);
    assert_eq!(report.statistics.failed_urls[0].0, format!("{}/broken", base));
    assert_eq!(report.statistics.pages_visited, 3);
}

#[tokio::test]
async fn test_non_html_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><body><a href="/api/data">Data</a></body></html>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                r#"{"links": "<a href='/hidden'>x</a>"}"#,
                "application/json",
            ),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&base);
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;

    assert_eq!(record_paths(report.records()), vec!["/"]);
    assert_eq!(report.statistics.count(PageState::ContentTypeRejected), 1);
    assert!(!requested_paths(&server).await.contains(&"/hidden".to_string()));
}

#[tokio::test]
async fn test_depth_limit() {
    let server = MockServer::start().await;
    let base = server.uri();

    let d1 = r#"<html><body><a href="/d1">1</a></body></html>"#;
    let d2 = r#"<html><body><a href="/d2">2</a></body></html>"#;
    mount_html(&server, "/", d1.to_string()).await;
    mount_html(&server, "/d1", d2.to_string()).await;
    mount_html(&server, "/d2", "<html><body>Too deep</body></html>".to_string()).await;

    let mut config = create_test_config(&base);
    config.crawler.max_depth = 1;
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;

    assert_eq!(record_paths(report.records()), vec!["/", "/d1"]);
    assert!(!requested_paths(&server).await.contains(&"/d2".to_string()));
}

#[tokio::test]
async fn test_max_pages_limit() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{i}">{i}</a>"#))
        .collect();
    mount_html(&server, "/", format!("<html><body>{links}</body></html>")).await;
    for i in 0..10 {
        mount_html(&server, &format!("/p{i}"), format!("<html><body>Page {i}</body></html>")).await;
    }

    let mut config = create_test_config(&base);
    config.crawler.max_pages = 4;
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;

    assert_eq!(report.stop_reason, StopReason::PageLimitReached);
    assert_eq!(report.statistics.pages_visited, 4);
    assert_eq!(report.records().len(), 4);
    assert_eq!(requested_paths(&server).await.len(), 4);
}

#[tokio::test]
async fn test_same_host_requests_are_spaced() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        r#"<html><body><a href="/a">A</a><a href="/b">B</a><a href="/c">C</a></body></html>"#
            .to_string(),
    )
    .await;
    for page in ["/a", "/b", "/c"] {
        mount_html(&server, page, "<html><body>x</body></html>".to_string()).await;
    }

    let mut config = create_test_config(&base);
    config.crawler.min_host_delay_seconds = 0.1;

    let start = Instant::now();
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;
    let elapsed = start.elapsed();

    // Four page fetches to one host need at least three full intervals
    assert_eq!(report.records().len(), 4);
    assert!(elapsed >= Duration::from_millis(300), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_redirect_uses_requested_url_as_id() {
    let server = MockServer::start().await;
    let base = server.uri();

    let home = r#"<html><body><a href="/old">Old</a></body></html>"#;
    mount_html(&server, "/", home.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/new"))
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/docs/new",
        r#"<html><head><title>New</title></head><body><a href="child">Child</a></body></html>"#
            .to_string(),
    )
    .await;
    mount_html(&server, "/docs/child", "<html><body>Child</body></html>".to_string()).await;

    let config = create_test_config(&base);
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;

    let ids: Vec<&str> = report.records().iter().map(|r| r.id.as_str()).collect();
    assert!(ids.contains(&format!("{}/old", base).as_str()));
    assert!(ids.contains(&format!("{}/docs/child", base).as_str()));
}

#[tokio::test]
async fn test_index_written_as_json() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><head><title>Café</title><meta name="description" content="Menu and hours"></head>
            <body><nav>Skip me</nav><main><p>{}</p></main></body></html>"#,
            "Crème ".repeat(100)
        ),
    )
    .await;

    let config = create_test_config(&base);
    let report = Coordinator::new(config.clone(), fetcher(&config)).run().await;

    let dir = TempDir::new().unwrap();
    let index_path = dir.path().join("site").join("index.json");
    let written = report
        .write_index(&JsonIndexWriter::new(&index_path))
        .expect("Failed to write index");
    assert_eq!(written, 1);

    let raw = std::fs::read_to_string(&index_path).unwrap();
    assert!(raw.contains("Café"));

    let records: Vec<PageRecord> = serde_json::from_str(&raw).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Café");
    assert_eq!(records[0].snippet, "Menu and hours");
    assert!(!records[0].content.contains("Skip me"));
    assert_eq!(records[0].id, records[0].url);

    let id = raw.find("\"id\"").unwrap();
    let snippet = raw.find("\"snippet\"").unwrap();
    assert!(id < snippet);
}
