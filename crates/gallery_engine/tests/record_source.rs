use std::time::Duration;

use gallery_core::FetchError;
use gallery_engine::{
    demo_records, AirtableSource, FallbackSource, ProxiedSource, RecordSource, SourceKind,
    SourceSettings,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn remote_settings(server: &MockServer) -> SourceSettings {
    SourceSettings {
        api_url: format!("{}/v0", server.uri()),
        base_id: Some("appTEST".to_string()),
        api_token: Some("patTESTTOKEN".to_string()),
        ..SourceSettings::default()
    }
}

#[tokio::test]
async fn remote_list_preserves_order_and_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/appTEST/Imported%20Table"))
        .and(header("authorization", "Bearer patTESTTOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {"id": "recB", "fields": {"title": "Second"}, "createdTime": "2024-01-02T00:00:00.000Z"},
                {"id": "recA", "fields": {"title": "First"}, "createdTime": "2024-01-01T00:00:00.000Z"},
                {"id": "recC", "fields": {}, "createdTime": "2024-01-03T00:00:00.000Z"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = AirtableSource::new(&remote_settings(&server)).expect("source");
    assert_eq!(source.kind(), SourceKind::Remote);
    let records = source.fetch_all().await.expect("records");
    let ids: Vec<_> = records.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec!["recB", "recA", "recC"]);
    assert_eq!(records[0].fields["title"], json!("Second"));
}

#[tokio::test]
async fn remote_failure_collapses_to_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/appTEST/Imported%20Table"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let source = AirtableSource::new(&remote_settings(&server)).expect("source");
    let err = source.fetch_all().await.unwrap_err();
    assert_eq!(err, FetchError::all_records());
    assert_eq!(err.to_string(), "failed to fetch records");
}

#[tokio::test]
async fn remote_single_record_is_requested_by_encoded_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0/appTEST/Imported%20Table/rec123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rec123",
            "fields": {"Name": "Loft"},
            "createdTime": "2024-02-01T10:00:00.000Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0/appTEST/Imported%20Table/recGone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "NOT_FOUND"})))
        .mount(&server)
        .await;

    let source = AirtableSource::new(&remote_settings(&server)).expect("source");
    let record = source.fetch_one("rec123").await.expect("record");
    assert_eq!(record.id, "rec123");
    assert_eq!(record.created_time, "2024-02-01T10:00:00.000Z");

    let err = source.fetch_one("recGone").await.unwrap_err();
    assert_eq!(err, FetchError::one_record());
}

#[tokio::test]
async fn proxied_source_posts_action_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/records"))
        .and(body_json(json!({"action": "getAllRecords"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{"id": "rec1", "fields": {}, "createdTime": ""}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/records"))
        .and(body_json(json!({"action": "getRecord", "recordId": "rec9"})))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let settings = SourceSettings {
        proxy_url: Some(format!("{}/records", server.uri())),
        ..SourceSettings::default()
    };
    assert_eq!(settings.active_source(), SourceKind::Proxied);
    let source = ProxiedSource::new(&settings).expect("source");

    let records = source.fetch_all().await.expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(
        source.fetch_one("rec9").await.unwrap_err(),
        FetchError::one_record()
    );
}

#[tokio::test]
async fn fallback_serves_demo_set_and_reports_missing_ids() {
    let source = FallbackSource::new(demo_records(), Duration::ZERO, Duration::ZERO);
    assert_eq!(source.kind(), SourceKind::Fallback);

    let records = source.fetch_all().await.expect("records");
    assert_eq!(records.len(), 6);
    assert_eq!(records[0].id, "rec1");

    let record = source.fetch_one("rec4").await.expect("rec4");
    assert_eq!(record.id, "rec4");

    let err = source.fetch_one("nope").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test(start_paused = true)]
async fn fallback_waits_before_answering() {
    let source = FallbackSource::demo();
    let started = tokio::time::Instant::now();
    source.fetch_all().await.expect("records");
    assert!(started.elapsed() >= Duration::from_millis(1000));

    let started = tokio::time::Instant::now();
    source.fetch_one("rec1").await.expect("record");
    assert!(started.elapsed() >= Duration::from_millis(800));
}
