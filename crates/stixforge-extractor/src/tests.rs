//! Integration tests for the extraction pipeline

use crate::{merge_bundles, PipelineConfig, StixPipeline};
use serde_json::json;
use std::sync::{Arc, Mutex};
use stixforge_domain::traits::{JobStatus, StatusSink};
use stixforge_domain::StixBundle;
use stixforge_llm::MockProvider;

fn pipeline(primary: MockProvider, secondary: MockProvider) -> StixPipeline<MockProvider, MockProvider> {
    StixPipeline::new(primary, secondary, PipelineConfig::default())
}

fn three_objects_json() -> String {
    json!([
        {"type": "threat-actor", "id": "threat-actor--aaa111111111", "name": "APT-0"},
        {"type": "malware", "id": "malware--bbb222222222", "name": "Emotet"},
        {"type": "relationship", "id": "relationship--ccc333333333",
         "relationship_type": "uses",
         "source_ref": "threat-actor--aaa111111111",
         "target_ref": "malware--bbb222222222"}
    ])
    .to_string()
}

#[tokio::test]
async fn test_primary_success_skips_secondary() {
    let primary = MockProvider::new(three_objects_json()).with_name("mock-primary");
    let secondary = MockProvider::new("[]").with_name("mock-secondary");
    let pipeline = pipeline(primary.clone(), secondary.clone());

    let bundle = pipeline.extract_bundle("some report", "doc-1").await;

    assert_eq!(bundle.object_count(), 3);
    assert_eq!(primary.call_count(), 1);
    assert_eq!(secondary.call_count(), 0);
}

#[tokio::test]
async fn test_fallback_on_empty_primary() {
    // Primary answers with a structurally valid but empty bundle; the
    // secondary's three objects must win, and the secondary must only be
    // consulted after the primary came up empty.
    let primary = MockProvider::new("[]").with_name("mock-primary");
    let secondary = MockProvider::new(three_objects_json()).with_name("mock-secondary");
    let pipeline = pipeline(primary.clone(), secondary.clone());

    let bundle = pipeline.extract_bundle("some report", "doc-1").await;

    assert_eq!(bundle.object_count(), 3);
    assert_eq!(primary.call_count(), 1);
    assert_eq!(secondary.call_count(), 1);
    let ids: Vec<&str> = bundle
        .objects
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"threat-actor--aaa111111111"));
    assert!(ids.contains(&"malware--bbb222222222"));
}

#[tokio::test]
async fn test_fallback_on_primary_error() {
    let primary = MockProvider::failing().with_name("mock-primary");
    let secondary = MockProvider::new(three_objects_json()).with_name("mock-secondary");
    let pipeline = pipeline(primary.clone(), secondary.clone());

    let bundle = pipeline.extract_bundle("some report", "doc-1").await;

    assert_eq!(bundle.object_count(), 3);
    assert_eq!(primary.call_count(), 1);
    assert_eq!(secondary.call_count(), 1);
}

#[tokio::test]
async fn test_both_providers_fail_yields_empty_bundle() {
    let pipeline = pipeline(
        MockProvider::failing().with_name("mock-primary"),
        MockProvider::failing().with_name("mock-secondary"),
    );

    let bundle = pipeline.extract_bundle("some report", "doc-1").await;

    assert_eq!(bundle.bundle_type, "bundle");
    assert!(bundle.id.starts_with("bundle--"));
    assert!(bundle.is_empty());
}

#[tokio::test]
async fn test_totality_over_garbage_completions() {
    // Whatever the providers emit, the result satisfies the bundle shape.
    for completion in [
        "",
        "null",
        "undefined",
        "I found no entities.",
        "{\"deeply\": {\"truncated\":",
        "[{]}",
        "42",
    ] {
        let pipeline = pipeline(
            MockProvider::new(completion),
            MockProvider::new(completion),
        );
        let bundle = pipeline.extract_bundle("text", "doc-1").await;
        assert_eq!(bundle.bundle_type, "bundle");
        assert!(bundle.id.starts_with("bundle--"));
    }
}

#[tokio::test]
async fn test_markdown_wrapped_completion_end_to_end() {
    let completion = "```json\n{\"type\":\"bundle\",\"id\":\"bundle--abc123456789\",\"objects\":[{\"type\":\"tool\",\"id\":\"tool--def123456789\"}]}\n```";
    let pipeline = pipeline(MockProvider::new(completion), MockProvider::new("[]"));

    let bundle = pipeline.extract_bundle("text", "doc-1").await;

    assert_eq!(bundle.id, "bundle--abc123456789");
    assert_eq!(bundle.object_count(), 1);
}

#[tokio::test]
async fn test_truncated_completion_end_to_end() {
    // Completion cut off mid-array: bracket repair must still recover both
    // objects through the full pipeline.
    let completion = "[{\"type\":\"malware\",\"id\":\"malware--1234567890\"},{\"type\":\"threat-actor\",\"id\":\"threat-actor--0987654321\"";
    let pipeline = pipeline(MockProvider::new(completion), MockProvider::new("[]"));

    let bundle = pipeline.extract_bundle("text", "doc-1").await;

    let ids: Vec<&str> = bundle
        .objects
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["malware--1234567890", "threat-actor--0987654321"]);
}

#[tokio::test]
async fn test_prose_preamble_with_fenced_payload() {
    let completion =
        "Sure! Here is the extraction:\n```json\n[{\"type\":\"campaign\",\"name\":\"Opaque Duck\"}]\n```\nLet me know if you need more.";
    let pipeline = pipeline(MockProvider::new(completion), MockProvider::new("[]"));

    let bundle = pipeline.extract_bundle("text", "doc-1").await;

    assert_eq!(bundle.object_count(), 1);
    assert_eq!(bundle.objects[0]["name"], "Opaque Duck");
    // The missing id was assigned during normalization.
    assert!(bundle.objects[0]["id"]
        .as_str()
        .unwrap()
        .starts_with("campaign--"));
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<(String, JobStatus)>>,
}

impl StatusSink for RecordingSink {
    fn report(&self, document_id: &str, status: JobStatus) {
        self.events
            .lock()
            .unwrap()
            .push((document_id.to_string(), status));
    }
}

#[tokio::test]
async fn test_status_reports_cover_fallback_path() {
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(MockProvider::new("[]"), MockProvider::new(three_objects_json()))
        .with_status_sink(sink.clone());

    pipeline.extract_bundle("text", "doc-42").await;

    let events = sink.events.lock().unwrap();
    let statuses: Vec<&JobStatus> = events.iter().map(|(_, s)| s).collect();
    assert_eq!(
        statuses,
        vec![
            &JobStatus::CallingPrimary,
            &JobStatus::PrimaryEmpty,
            &JobStatus::CallingSecondary,
            &JobStatus::Completed { object_count: 3 },
        ]
    );
    assert!(events.iter().all(|(id, _)| id == "doc-42"));
}

#[tokio::test]
async fn test_status_reports_on_direct_success() {
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(MockProvider::new(three_objects_json()), MockProvider::new("[]"))
        .with_status_sink(sink.clone());

    pipeline.extract_bundle("text", "doc-7").await;

    let events = sink.events.lock().unwrap();
    let statuses: Vec<&JobStatus> = events.iter().map(|(_, s)| s).collect();
    assert_eq!(
        statuses,
        vec![
            &JobStatus::CallingPrimary,
            &JobStatus::Completed { object_count: 3 },
        ]
    );
}

#[test]
fn test_merge_across_extraction_attempts() {
    let first = StixBundle::with_objects(vec![
        json!({"id": "malware--x", "name": "A"}),
    ]);
    let second = StixBundle::with_objects(vec![
        json!({"id": "malware--x", "name": "B"}),
        json!({"id": "tool--y", "name": "C"}),
    ]);

    let merged = merge_bundles(&[first, second]);

    assert_eq!(merged.object_count(), 2);
    assert_eq!(merged.objects[0], json!({"id": "malware--x", "name": "A"}));
    assert_eq!(merged.objects[1], json!({"id": "tool--y", "name": "C"}));
}

#[test]
fn test_merge_reextraction_is_reproducible() {
    // Merging the same inputs twice yields the same objects in the same
    // order (only the bundle ids differ).
    let a = StixBundle::with_objects(vec![
        json!({"id": "a--1"}),
        json!({"id": "a--2"}),
    ]);
    let b = StixBundle::with_objects(vec![
        json!({"id": "a--2"}),
        json!({"id": "b--1"}),
    ]);

    let once = merge_bundles(&[a.clone(), b.clone()]);
    let twice = merge_bundles(&[a, b]);

    assert_eq!(once.objects, twice.objects);
    assert_eq!(once.object_count(), 3);
}
