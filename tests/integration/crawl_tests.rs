//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and drive the full
//! crawl cycle end-to-end: page walking, extraction, file downloads, and
//! metadata sidecars on disk.

use magpie::config::{Config, ExtractorConfig, MetaSelector};
use magpie::crawler::Engine;
use magpie::options::{FileOverrides, OptionOverrides, SaveDirOverrides};
use std::collections::BTreeMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with one all-pages extractor saving into
/// a per-title directory under `root`
fn create_test_config(seed: String, root: &str) -> Config {
    let mut metadata = BTreeMap::new();
    metadata.insert("title".to_string(), MetaSelector::Text("h1".to_string()));

    Config {
        pages: vec![seed],
        user_agent: Some("magpie-test/1.0".to_string()),
        options: OptionOverrides {
            save_dir: SaveDirOverrides {
                root: Some(root.to_string()),
                sub_dirs: Some(vec!["{{title}}".to_string()]),
            },
            file: FileOverrides::default(),
        },
        extractors: vec![ExtractorConfig {
            description: "all pages".to_string(),
            page_selector: Some("a.next".to_string()),
            file_selector: Some("img".to_string()),
            metadata,
            ..Default::default()
        }],
    }
}

/// Mounts a two-page site: the root links to /p1, each page carries one image
async fn mount_two_page_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><h1>Zero</h1>
            <a class="next" href="/p1">next</a>
            <img src="/img/cat.jpg">
            </body></html>"#,
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><h1>One</h1>
            <img src="/img/dog.jpg">
            </body></html>"#,
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/cat.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"CATBYTES".to_vec()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/dog.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"DOGBYTES".to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_downloads_files_and_sidecars() {
    let server = MockServer::start().await;
    mount_two_page_site(&server).await;

    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().to_str().unwrap();
    let config = create_test_config(format!("{}/", server.uri()), root);

    let mut engine = Engine::from_config(config).unwrap();
    let summary = engine.run(false).await;

    // Both pages visited exactly once (wiremock verifies the expect(1)s on drop)
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.files_saved, 2);

    // One directory and sidecar per matched page
    let zero = tmp.path().join("Zero");
    let one = tmp.path().join("One");
    assert_eq!(std::fs::read(zero.join("cat.jpg")).unwrap(), b"CATBYTES");
    assert_eq!(std::fs::read(one.join("dog.jpg")).unwrap(), b"DOGBYTES");
    assert!(zero.join("info.json").exists());
    assert!(one.join("info.json").exists());

    // The child's sidecar records its own URL under the reserved key
    let sidecar: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(one.join("info.json")).unwrap()).unwrap();
    assert_eq!(sidecar["title"], "One");
    assert_eq!(
        sidecar["url"],
        serde_json::Value::String(format!("{}/p1", server.uri()))
    );
}

#[tokio::test]
async fn test_existing_files_skipped_without_overwrite() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><h1>Zero</h1><img src="/img/cat.jpg"></body></html>"#,
        ))
        .mount(&server)
        .await;

    // With overwrite off the image may only ever be fetched once
    Mock::given(method("GET"))
        .and(path("/img/cat.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"CATBYTES".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().to_str().unwrap();

    let mut first = Engine::from_config(create_test_config(format!("{}/", server.uri()), root))
        .unwrap();
    let summary = first.run(false).await;
    assert_eq!(summary.files_saved, 1);

    // A second run over the same output directory skips the download
    let mut second = Engine::from_config(create_test_config(format!("{}/", server.uri()), root))
        .unwrap();
    let summary = second.run(false).await;
    assert_eq!(summary.files_saved, 0);
    assert_eq!(summary.files_skipped_existing, 1);

    assert_eq!(
        std::fs::read(tmp.path().join("Zero/cat.jpg")).unwrap(),
        b"CATBYTES"
    );
}

#[tokio::test]
async fn test_undersized_files_discarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><h1>Zero</h1><img src="/img/tiny.gif"><img src="/img/big.gif"></body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/tiny.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 10]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/big.gif"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 2000]))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let mut config = create_test_config(format!("{}/", server.uri()), tmp.path().to_str().unwrap());
    config.options.file.min_size = Some(1000);

    let mut engine = Engine::from_config(config).unwrap();
    let summary = engine.run(false).await;

    // The undersized file is dropped without error; the run continues
    assert_eq!(summary.files_skipped_small, 1);
    assert_eq!(summary.files_saved, 1);
    assert_eq!(summary.files_failed, 0);
    assert!(!tmp.path().join("Zero/tiny.gif").exists());
    assert!(tmp.path().join("Zero/big.gif").exists());
}

#[tokio::test]
async fn test_dry_run_walks_but_writes_nothing() {
    let server = MockServer::start().await;
    mount_two_page_site(&server).await;

    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("out");
    let config = create_test_config(
        format!("{}/", server.uri()),
        root.to_str().unwrap(),
    );

    let mut engine = Engine::from_config(config).unwrap();
    let summary = engine.run(true).await;

    // The walk is complete but the filesystem is untouched
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.files_skipped_dryrun, 2);
    assert_eq!(summary.files_saved, 0);
    assert!(!root.exists());
}

#[tokio::test]
async fn test_extractor_option_precedence_between_extractors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><h1>Zero</h1><img src="/img/cat.jpg"></body></html>"#,
        ))
        .mount(&server)
        .await;
    // Fetched by both extractors: the overriding one overwrites, the plain
    // one skips the already-present file
    Mock::given(method("GET"))
        .and(path("/img/cat.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"CATBYTES".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("cat.jpg"), b"OLD").unwrap();

    let overriding = ExtractorConfig {
        description: "overwriting".to_string(),
        file_selector: Some("img".to_string()),
        options: OptionOverrides {
            file: FileOverrides {
                overwrite: Some(true),
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    };
    let plain = ExtractorConfig {
        description: "plain".to_string(),
        file_selector: Some("img".to_string()),
        ..Default::default()
    };

    let config = Config {
        pages: vec![format!("{}/", server.uri())],
        user_agent: Some("magpie-test/1.0".to_string()),
        options: OptionOverrides {
            save_dir: SaveDirOverrides {
                root: Some(tmp.path().to_str().unwrap().to_string()),
                sub_dirs: Some(vec![]),
            },
            file: FileOverrides::default(),
        },
        extractors: vec![overriding, plain],
    };

    let mut engine = Engine::from_config(config).unwrap();
    let summary = engine.run(false).await;

    // First extractor (overwrite=true) replaced the file; second (global
    // overwrite=false) skipped it
    assert_eq!(summary.files_saved, 1);
    assert_eq!(summary.files_skipped_existing, 1);
    assert_eq!(
        std::fs::read(tmp.path().join("cat.jpg")).unwrap(),
        b"CATBYTES"
    );
}
