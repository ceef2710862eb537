//! End-to-end runs of the pipeline against a scripted transport

use indexpush::{Pipeline, PipelineError};
use indexpush_config::{AppConfig, ConfigLoader};
use indexpush_feed::FeedError;
use indexpush_orchestrator::REPORT_HEADER;
use indexpush_providers::{
    BAIDU_ENDPOINT, BING_ENDPOINT, DEFAULT_TOKEN_URI, GOOGLE_ENDPOINT, INDEXNOW_ENDPOINT,
};
use indexpush_transport::{MockReply, MockTransport, RequestBody};
use indexpush_types::ProviderConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

const FEED_URL: &str = "https://blog.example.com/atom.xml";
const TELEGRAM: &str = "https://api.telegram.org/";
const SERVICE_ACCOUNT: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/crates/providers/tests/fixtures/service_account.json"
);

const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example</title>
  <entry><id>https://blog.example.com/p/3</id></entry>
  <entry><id>https://blog.example.com/p/2</id></entry>
  <entry><id>https://blog.example.com/p/1</id></entry>
</feed>"#;

fn urls(ids: &[u8]) -> Vec<String> {
    ids.iter()
        .map(|i| format!("https://blog.example.com/p/{i}"))
        .collect()
}

/// Config as the legacy environment would produce it, with files under `dir`
fn config(dir: &TempDir, vars: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let mut config = AppConfig::default();
    config.store.path = dir.path().join("urls.txt");
    config.providers.google.service_account_path = dir.path().join("google_service.json");
    ConfigLoader::apply_env(&mut config, |name| vars.get(name).cloned());
    config
}

fn standard_env() -> Vec<(&'static str, &'static str)> {
    vec![
        ("RSS_URL", FEED_URL),
        ("INDEX_NOW_KEY", "nowkey,2"),
        ("BING_KEY", "bingkey"),
        ("BAIDU_KEY", "baidutoken"),
        ("BOT_TOKEN", "123:abc"),
        ("CHAT_ID", "-1001"),
    ]
}

fn feed_transport() -> MockTransport {
    MockTransport::new().reply(FEED_URL, MockReply::StatusWithBody(200, FEED.to_string()))
}

fn json_url_list(transport: &MockTransport, endpoint: &str) -> Vec<String> {
    let requests = transport.requests_to(endpoint);
    assert_eq!(requests.len(), 1, "expected exactly one request to {endpoint}");
    let RequestBody::Json(body) = &requests[0].body else {
        panic!("expected JSON body for {endpoint}");
    };
    serde_json::from_value(body["urlList"].clone()).unwrap()
}

fn delivered_text(transport: &MockTransport) -> Option<String> {
    let requests = transport.requests_to(TELEGRAM);
    let request = requests.first()?;
    let RequestBody::Form(pairs) = &request.body else {
        panic!("expected form body for sendMessage");
    };
    pairs
        .iter()
        .find(|(k, _)| k == "text")
        .map(|(_, v)| v.clone())
}

// ═══════════════════════════════════════════════════════════════════════════
// FULL RUNS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_full_run_submits_and_reports() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(feed_transport());
    let pipeline = Pipeline::new(config(&dir, &standard_env()), transport.clone());

    let report = pipeline.run().await.unwrap().expect("candidates were present");

    // Store holds the feed ids in document order, no trailing newline
    let stored = std::fs::read_to_string(dir.path().join("urls.txt")).unwrap();
    assert_eq!(stored, urls(&[3, 2, 1]).join("\n"));

    // IndexNow limited to the first two, Bing takes everything
    assert_eq!(json_url_list(&transport, INDEXNOW_ENDPOINT), urls(&[3, 2]));
    assert_eq!(json_url_list(&transport, BING_ENDPOINT), urls(&[3, 2, 1]));

    // Baidu default cap of 10 is above the list size
    let baidu = transport.requests_to(BAIDU_ENDPOINT);
    assert_eq!(baidu.len(), 1);
    assert_eq!(
        baidu[0].body,
        RequestBody::Text(format!("{}\n", urls(&[3, 2, 1]).join("\n")))
    );

    // No service account file: Google is skipped without any request
    assert!(transport.requests_to(GOOGLE_ENDPOINT).is_empty());
    assert!(transport.requests_to(DEFAULT_TOKEN_URI).is_empty());
    assert_eq!(report.len(), 4);
    assert!(report.outcome_for("indexing.googleapis.com").unwrap().is_skipped());

    let text = delivered_text(&transport).expect("report was delivered");
    assert_eq!(text, report.render());
    assert!(text.starts_with(REPORT_HEADER));
    assert!(text.contains("api.indexnow.org accepted 2 URLs ✅\n"));
    assert!(text.contains("ssl.bing.com accepted 3 URLs ✅\n"));
    assert!(text.contains("data.zz.baidu.com accepted 3 URLs ✅\n"));
    assert!(!text.contains("indexing.googleapis.com"));
    assert_eq!(text.lines().count(), 4);
}

#[tokio::test]
async fn test_unreachable_feed_stops_before_submission() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(MockTransport::new().reply(FEED_URL, MockReply::Status(503)));
    let pipeline = Pipeline::new(config(&dir, &standard_env()), transport.clone());

    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Feed(FeedError::Unreachable { status: 503, .. })
    ));
    assert_eq!(transport.request_count(), 1);
    assert!(!dir.path().join("urls.txt").exists());
}

#[tokio::test]
async fn test_empty_feed_submits_nothing() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(MockTransport::new().reply(
        FEED_URL,
        MockReply::StatusWithBody(200, "<feed></feed>".to_string()),
    ));
    let pipeline = Pipeline::new(config(&dir, &standard_env()), transport.clone());

    assert!(pipeline.run().await.unwrap().is_none());

    // HEAD + GET only
    assert_eq!(transport.request_count(), 2);
    assert!(delivered_text(&transport).is_none());
}

#[tokio::test]
async fn test_empty_bing_key_disables_bing() {
    let dir = TempDir::new().unwrap();
    let mut env = standard_env();
    env.retain(|(k, _)| *k != "BING_KEY");
    env.push(("BING_KEY", ""));

    let transport = Arc::new(feed_transport());
    let pipeline = Pipeline::new(config(&dir, &env), transport.clone());

    let report = pipeline.run().await.unwrap().unwrap();

    assert!(transport.requests_to(BING_ENDPOINT).is_empty());
    assert!(report.outcome_for("ssl.bing.com").is_none());
    assert!(!report.render().contains("ssl.bing.com"));
    assert_eq!(report.len(), 3);
}

#[tokio::test]
async fn test_all_disabled_reports_header_only() {
    let dir = TempDir::new().unwrap();
    let env = vec![("RSS_URL", FEED_URL), ("BOT_TOKEN", "t"), ("CHAT_ID", "c")];
    let transport = Arc::new(feed_transport());
    let pipeline = Pipeline::new(config(&dir, &env), transport.clone());

    let report = pipeline.run().await.unwrap().unwrap();

    assert_eq!(report.render(), format!("{REPORT_HEADER}\n"));
    assert_eq!(
        delivered_text(&transport).as_deref(),
        Some(format!("{REPORT_HEADER}\n").as_str())
    );
}

#[tokio::test]
async fn test_quota_exhausted_everywhere() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir, &standard_env());
    cfg.providers.google.service_account_path = SERVICE_ACCOUNT.into();

    let transport = Arc::new(
        feed_transport()
            .reply(
                DEFAULT_TOKEN_URI,
                MockReply::StatusWithBody(200, r#"{"access_token":"ya29.test"}"#.to_string()),
            )
            .reply(INDEXNOW_ENDPOINT, MockReply::Status(400))
            .reply(BING_ENDPOINT, MockReply::Status(400))
            .reply(BAIDU_ENDPOINT, MockReply::Status(400))
            .reply(GOOGLE_ENDPOINT, MockReply::Status(400)),
    );
    let pipeline = Pipeline::new(cfg, transport.clone());

    let report = pipeline.run().await.unwrap().unwrap();

    assert_eq!(report.len(), 4);
    assert!(report.outcomes().iter().all(|o| o.is_quota_exceeded()));

    let text = report.render();
    for host in [
        "api.indexnow.org",
        "ssl.bing.com",
        "data.zz.baidu.com",
        "indexing.googleapis.com",
    ] {
        assert!(text.contains(&format!("{host} quota exhausted ❌\n")));
    }
}

#[tokio::test]
async fn test_google_publishes_each_url() {
    let dir = TempDir::new().unwrap();
    let env = vec![("RSS_URL", FEED_URL)];
    let mut cfg = config(&dir, &env);
    cfg.providers.google.service_account_path = SERVICE_ACCOUNT.into();

    let transport = Arc::new(feed_transport().reply(
        DEFAULT_TOKEN_URI,
        MockReply::StatusWithBody(200, r#"{"access_token":"ya29.test"}"#.to_string()),
    ));
    let pipeline = Pipeline::new(cfg, transport.clone());

    let report = pipeline.run().await.unwrap().unwrap();

    let published: Vec<String> = transport
        .requests_to(GOOGLE_ENDPOINT)
        .iter()
        .map(|r| match &r.body {
            RequestBody::Json(body) => body["url"].as_str().unwrap().to_string(),
            other => panic!("unexpected body {other:?}"),
        })
        .collect();
    assert_eq!(published, urls(&[3, 2, 1]));
    assert!(report
        .render()
        .contains("indexing.googleapis.com accepted 3 URLs ✅"));
}

#[tokio::test]
async fn test_mixed_outcomes_and_failed_delivery() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(
        feed_transport()
            .reply(INDEXNOW_ENDPOINT, MockReply::Status(403))
            .reply(BING_ENDPOINT, MockReply::Status(400))
            .reply(TELEGRAM, MockReply::Status(502)),
    );
    let pipeline = Pipeline::new(config(&dir, &standard_env()), transport.clone());

    // Delivery failure does not fail the run
    let report = pipeline.run().await.unwrap().unwrap();

    let text = report.render();
    assert!(text.contains("api.indexnow.org submission failed: HTTP 403 ⚠️\n"));
    assert!(text.contains("ssl.bing.com quota exhausted ❌\n"));
    assert!(text.contains("data.zz.baidu.com accepted 3 URLs ✅\n"));
    assert_eq!(transport.requests_to(TELEGRAM).len(), 1);
}

#[tokio::test]
async fn test_without_notifier_nothing_is_sent() {
    let dir = TempDir::new().unwrap();
    let env = vec![("RSS_URL", FEED_URL), ("BING_KEY", "k")];
    let transport = Arc::new(feed_transport());
    let pipeline = Pipeline::new(config(&dir, &env), transport.clone());

    pipeline.run().await.unwrap().unwrap();

    assert!(transport.requests_to(TELEGRAM).is_empty());
}

#[test]
fn test_site_context_from_config() {
    let dir = TempDir::new().unwrap();
    let pipeline = Pipeline::new(
        config(&dir, &standard_env()),
        Arc::new(MockTransport::new()),
    );
    let site = pipeline.site().unwrap();
    assert_eq!(site.host, "blog.example.com");
    assert_eq!(site.site_url, "https://blog.example.com");
    assert_eq!(
        pipeline.config().providers.index_now,
        ProviderConfig::new("nowkey", Some(2))
    );
}
