//! End-to-end export and listing against the mock API

use super::mock_server::{MockApi, MockServer};
use datawrapper_export::collector::{
    collect_chart_metadata, collect_export_tasks, CollectOptions, ExportFormats, MetadataOptions,
};
use datawrapper_export::exporter::{export_tasks, ExportTarget};
use datawrapper_export::numbering::ChartNumbering;
use datawrapper_export::output::write_metadata;
use serde_json::json;
use tempfile::TempDir;

/// Folder X holds a real chart and a placeholder, its child Sub one more chart
fn two_folder_api() -> MockApi {
    MockApi::new()
        .folder(
            1,
            json!({"id": 1, "name": "X", "charts": [{"id": "c1"}, {"id": "c2"}], "children": [{"id": 2}]}),
        )
        .folder(2, json!({"id": 2, "name": "Sub", "charts": [{"id": "c3"}]}))
        .chart("c1", json!({"id": "c1", "title": "Alpha", "publicVersion": 1}))
        .chart("c2", json!({"id": "c2", "title": "[ Insert title here ]"}))
        .chart("c3", json!({"id": "c3", "title": "Gamma", "publicVersion": 0}))
        .embed("c1", json!([{"id": "responsive", "code": "<iframe c1>"}]))
        .embed("c3", json!({"responsive": "<iframe c3>"}))
}

#[tokio::test]
async fn test_two_folder_export() {
    let server = MockServer::start(two_folder_api()).await;
    let client = server.client(2);
    let temp_dir = TempDir::new().unwrap();

    let options = CollectOptions::new(ExportFormats::default())
        .recursive(true)
        .publish(true);
    let tasks = collect_export_tasks(&client, 1, &options).await.unwrap();
    assert_eq!(tasks.len(), 4);

    let summary = export_tasks(&client, &tasks, &ExportTarget::new(temp_dir.path()))
        .await
        .unwrap();
    assert_eq!(summary.exported, 4);

    let base = temp_dir.path();
    assert!(base.join("c1-Alpha.svg").exists());
    assert!(base.join("c1-Alpha.png").exists());
    assert!(base.join("Sub").join("c3-Gamma.svg").exists());
    assert!(base.join("Sub").join("c3-Gamma.png").exists());
    assert!(!base.join("X").exists());

    // Placeholder never touched beyond its metadata fetch
    assert!(server.requests_to("/charts/c2/export/svg").is_empty());

    // Only the unpublished chart is published, once
    assert!(server.requests_to("/charts/c1/publish").is_empty());
    assert_eq!(server.requests_to("/charts/c3/publish").len(), 1);

    let svg = &server.requests_to("/charts/c1/export/svg")[0];
    assert_eq!(svg.query.get("plain").map(String::as_str), Some("true"));
    assert_eq!(svg.query.get("height").map(String::as_str), Some("auto"));
    let png = &server.requests_to("/charts/c1/export/png")[0];
    assert!(!png.query.contains_key("plain"));
}

#[tokio::test]
async fn test_numbered_flat_export() {
    let server = MockServer::start(two_folder_api()).await;
    let client = server.client(1);
    let temp_dir = TempDir::new().unwrap();

    let mut numbering = ChartNumbering::new();
    numbering.insert("c3", Some("7"));

    let formats = ExportFormats::from_specs(&["svg:plain"]).unwrap();
    let options = CollectOptions::new(formats)
        .recursive(true)
        .numbering(numbering);
    let tasks = collect_export_tasks(&client, 1, &options).await.unwrap();

    let target = ExportTarget::new(temp_dir.path()).with_flatten(true);
    export_tasks(&client, &tasks, &target).await.unwrap();

    assert!(temp_dir.path().join("c1-Alpha.svg").exists());
    assert!(temp_dir.path().join("7-Gamma.svg").exists());
    assert!(!temp_dir.path().join("Sub").exists());
}

#[tokio::test]
async fn test_skip_folder_export() {
    let server = MockServer::start(two_folder_api()).await;
    let client = server.client(1);

    let options = CollectOptions::new(ExportFormats::default())
        .recursive(true)
        .skip_folder("Sub");
    let tasks = collect_export_tasks(&client, 1, &options).await.unwrap();

    assert!(tasks.iter().all(|t| t.chart_id == "c1"));
    assert_eq!(server.requests_to("/folders/2").len(), 1);
    assert!(server.requests_to("/charts/c3").is_empty());
}

#[tokio::test]
async fn test_metadata_listing_to_xlsx() {
    let server = MockServer::start(two_folder_api()).await;
    let client = server.client(1);
    let temp_dir = TempDir::new().unwrap();

    let options = MetadataOptions {
        recursive: true,
        ..MetadataOptions::default()
    };
    let rows = collect_chart_metadata(&client, 1, &options).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].folder_path, "X");
    assert_eq!(rows[0].iframe_code, "<iframe c1>");
    assert_eq!(rows[1].folder_path, "X/Sub");
    assert_eq!(rows[1].iframe_code, "<iframe c3>");

    let out = temp_dir.path().join("numbering.xlsx");
    write_metadata(&out, &rows).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}
