use std::fs;

use mediadb_core::config::Config;
use mediadb_core::types::Pagination;
use tempfile::TempDir;

#[test]
fn pagination_zero_items_is_one_page() {
    let p = Pagination::new(1, 10, 10, 0);
    assert_eq!(p.total_pages, 1, "empty result set still has one page");
    assert_eq!(p.total_items, 0);
    assert_eq!(p.page_size, 10);
}

#[test]
fn pagination_rounds_up() {
    assert_eq!(Pagination::new(1, 10, 10, 95).total_pages, 10);
    assert_eq!(Pagination::new(1, 10, 10, 100).total_pages, 10);
    assert_eq!(Pagination::new(1, 10, 10, 101).total_pages, 11);
    assert_eq!(Pagination::new(1, 10, 10, 1).total_pages, 1);
}

#[test]
fn pagination_limit_override_keeps_page_boundaries() {
    // A limit of 25 changes the reported window size but page count is
    // still derived from the requested page size.
    let p = Pagination::new(2, 10, 25, 95);
    assert_eq!(p.page_index, 2);
    assert_eq!(p.page_size, 25);
    assert_eq!(p.total_pages, 10);
}

#[test]
fn pagination_serializes_camel_case() {
    let p = Pagination::new(3, 10, 10, 21);
    let v = serde_json::to_value(&p).expect("serialize");
    assert_eq!(v["pageIndex"], 3);
    assert_eq!(v["pageSize"], 10);
    assert_eq!(v["totalItems"], 21);
    assert_eq!(v["totalPages"], 3);
}

#[test]
fn config_extracts_channels() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("config.toml");
    fs::write(
        &path,
        r#"
[[channels]]
name = "prod-eu"

[channels.elastic_search]
host = "https://search.internal"
port = 9200
user = "elastic"
password = "s3cret"

[channels.embedding]
model = "clip-vit-b-32"
dimension = 512

[[channels]]
name = "staging"

[channels.elastic_search]
host = "http://localhost"
port = 9201

[channels.embedding]
model = "minilm"
dimension = 384
"#,
    )
    .expect("write config");

    let config = Config::from_file(&path).expect("load");
    let channels = config.channels().expect("channels");
    assert_eq!(channels.len(), 2);

    let prod = &channels[0];
    assert_eq!(prod.name, "prod-eu");
    assert_eq!(prod.elastic_search.base_url(), "https://search.internal:9200");
    assert_eq!(prod.elastic_search.password.as_deref(), Some("s3cret"));
    assert_eq!(prod.embedding.dimension, 512);

    let staging = &channels[1];
    assert_eq!(staging.elastic_search.user, None, "credentials are optional");
    assert_eq!(staging.elastic_search.password, None);
    assert_eq!(staging.embedding.model, "minilm");
}

#[test]
fn config_rejects_empty_channel_list() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("config.toml");
    fs::write(&path, "channels = []\n").expect("write config");

    let config = Config::from_file(&path).expect("load");
    assert!(config.channels().is_err(), "empty channel list is an error");
}
