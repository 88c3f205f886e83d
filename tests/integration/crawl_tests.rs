//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end against a temporary directory.

use ledger_crawl::config::Config;
use ledger_crawl::crawler::{run_crawl, Coordinator};
use ledger_crawl::{crawl, CrawlError, TaskState};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted in `dir`
fn create_test_config(seed: &str, dir: &Path, max_depth: u32) -> Config {
    let mut config = Config::new(seed);
    config.crawler.max_depth = max_depth;
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.output.state_file = dir.join("crawler_state.txt");
    config.output.download_root = dir.to_path_buf();
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

fn ledger_lines(config: &Config) -> Vec<String> {
    std::fs::read_to_string(&config.output.state_file)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Mounts the seed page linking to /about, /style.css and a foreign host
async fn mount_site(server: &MockServer, foreign: &MockServer) {
    let foreign_link = format!("http://localhost:{}/x", foreign.address().port());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<a href="/about">About</a>
               <link rel="stylesheet" href="/ignored.css">
               <a href="/style.css">Styles</a>
               <a href="{}">Elsewhere</a>"#,
            foreign_link
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page("<p>About us</p>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("body { color: black; }", "text/css"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_downloads_same_domain_content() {
    let mock_server = MockServer::start().await;
    let foreign_server = MockServer::start().await;
    mount_site(&mock_server, &foreign_server).await;

    // The foreign host must never be contacted
    Mock::given(method("GET"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&foreign_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 2);
    let download_dir = config.download_dir();

    let stats = crawl(config.clone()).await.expect("Crawl should succeed");

    assert_eq!(stats.count(TaskState::Downloaded), 3);
    assert_eq!(stats.count(TaskState::Failed), 0);
    assert_eq!(stats.links_off_domain, 1);

    let seed = format!("{}/", mock_server.uri());
    let mut lines = ledger_lines(&config);
    lines.sort();
    assert_eq!(
        lines,
        vec![
            seed.clone(),
            format!("{}about", seed),
            format!("{}style.css", seed),
        ]
    );

    assert!(download_dir.is_dir());
    assert_eq!(
        std::fs::read_to_string(download_dir.join("style.css")).unwrap(),
        "body { color: black; }"
    );
    assert!(std::fs::read_to_string(download_dir.join("about"))
        .unwrap()
        .contains("About us"));
    assert!(download_dir.join("127.0.0.1").exists());
}

#[tokio::test]
async fn test_second_run_downloads_nothing() {
    let mock_server = MockServer::start().await;
    let foreign_server = MockServer::start().await;
    mount_site(&mock_server, &foreign_server).await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 2);

    let first = crawl(config.clone()).await.unwrap();
    assert_eq!(first.count(TaskState::Downloaded), 3);

    // Remove a saved file; a resumed run must not bring it back
    std::fs::remove_file(config.download_dir().join("about")).unwrap();

    let second = crawl(config.clone()).await.unwrap();
    assert_eq!(second.count(TaskState::Downloaded), 0);
    assert_eq!(second.count(TaskState::Parsed), 3);
    assert_eq!(second.already_downloaded, 3);
    assert_eq!(ledger_lines(&config).len(), 3);
    assert!(!config.download_dir().join("about").exists());
}

#[tokio::test]
async fn test_fresh_run_downloads_again() {
    let mock_server = MockServer::start().await;
    let foreign_server = MockServer::start().await;
    mount_site(&mock_server, &foreign_server).await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 2);

    crawl(config.clone()).await.unwrap();
    let stats = run_crawl(config.clone(), true).await.unwrap();

    assert_eq!(stats.count(TaskState::Downloaded), 3);
    // Fresh runs still append to the existing state file
    assert_eq!(ledger_lines(&config).len(), 6);
}

#[tokio::test]
async fn test_depth_bound_respected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/level1">Next</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html_page(r#"<a href="level2">Next</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html_page(r#"<a href="/level3">Next</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Depth 3 lies beyond the bound and must never be requested
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 2);

    let stats = crawl(config).await.unwrap();

    assert_eq!(stats.count(TaskState::Downloaded), 3);
    assert_eq!(stats.count(TaskState::Skipped), 1);
    assert_eq!(stats.links_pruned, 1);
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/docs/"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html_page(r#"<a href="intro">Intro</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/intro"))
        .respond_with(html_page("<p>Welcome</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/intro"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let seed = format!("{}/docs", mock_server.uri());
    let config = create_test_config(&seed, temp_dir.path(), 2);

    let stats = crawl(config.clone()).await.unwrap();

    assert_eq!(stats.count(TaskState::Downloaded), 2);
    let lines = ledger_lines(&config);
    assert!(lines.contains(&seed));
    assert!(lines.contains(&format!("{}/docs/intro", mock_server.uri())));
}

#[tokio::test]
async fn test_seed_failure_returns_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 2);
    let state_file = config.output.state_file.clone();

    let result = crawl(config).await;

    assert!(matches!(result, Err(CrawlError::SeedUnreachable(_))));
    assert!(!state_file.exists());
}

#[tokio::test]
async fn test_broken_child_link_is_not_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/missing">Gone</a><a href="/present">Here</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/present"))
        .respond_with(html_page("<p>Still here</p>"))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 2);

    let stats = crawl(config.clone()).await.unwrap();

    assert_eq!(stats.count(TaskState::Failed), 1);
    assert_eq!(stats.count(TaskState::Downloaded), 2);
    assert!(!ledger_lines(&config)
        .iter()
        .any(|line| line.ends_with("/missing")));
}

#[tokio::test]
async fn test_torn_state_file_is_repaired() {
    let mock_server = MockServer::start().await;
    let foreign_server = MockServer::start().await;
    mount_site(&mock_server, &foreign_server).await;

    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), temp_dir.path(), 2);
    let seed = format!("{}/", mock_server.uri());

    // A crash left the last entry without its newline
    std::fs::write(
        &config.output.state_file,
        format!("{}about\n{}sty", seed, seed),
    )
    .unwrap();

    let stats = crawl(config.clone()).await.unwrap();

    assert_eq!(stats.already_downloaded, 1);
    assert_eq!(stats.count(TaskState::Downloaded), 2);

    let contents = std::fs::read_to_string(&config.output.state_file).unwrap();
    assert!(contents.ends_with('\n'));
    assert!(!contents.contains(&format!("{}sty\n", seed)));
    assert_eq!(contents.lines().count(), 3);
}

#[tokio::test]
async fn test_parallel_workers_fetch_each_page_once() {
    let mock_server = MockServer::start().await;

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/page{}">Page {}</a>"#, i, i))
        .collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&links))
        .expect(1)
        .mount(&mock_server)
        .await;

    for i in 0..20 {
        Mock::given(method("GET"))
            .and(path(format!("/page{}", i)))
            .respond_with(html_page(&links))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let temp_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), temp_dir.path(), 3);
    config.crawler.parallelism = 8;

    let stats = crawl(config.clone()).await.unwrap();

    assert_eq!(stats.count(TaskState::Downloaded), 21);
    assert_eq!(ledger_lines(&config).len(), 21);
}

#[tokio::test]
async fn test_invalid_parallelism_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = create_test_config("https://example.com", temp_dir.path(), 2);
    config.crawler.parallelism = 0;

    let result = Coordinator::from_config(config, false).await;
    assert!(matches!(result, Err(CrawlError::Config(_))));
}
