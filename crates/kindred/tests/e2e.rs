// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete Kindred route layer.
//!
//! Each test creates an isolated TestHarness with temp SQLite and a mock
//! completion adapter. Tests are independent and order-insensitive.

use axum::http::{Method, StatusCode};
use kindred_core::StorageAdapter;
use kindred_test_utils::{MockOutcome, TestHarness};
use serde_json::json;

const VALID_INSIGHT: &str = r#"{"summary":"A warm, steady friendship","pattern":"Weekly calls on Sundays","risk_score":0.15,"growth_score":0.8,"recommended_action":"Plan a weekend visit","suggested_message":"Hey! Free for a walk this weekend?"}"#;

// ---- Relationships ----

#[tokio::test]
async fn create_relationship_stores_fields_verbatim() {
    let harness = TestHarness::new().await.unwrap();

    let resp = harness
        .post_json(
            "/relationships",
            json!({"person_name": "Maya", "type": "friend", "notes": "met at university"}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["person_name"], "Maya");
    assert_eq!(resp.body["type"], "friend");
    assert_eq!(resp.body["notes"], "met at university");
    assert!(resp.body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(resp.body["created_at"].is_string());

    let listed = harness.get("/relationships").await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0], resp.body);
}

#[tokio::test]
async fn omitted_notes_stay_absent() {
    let harness = TestHarness::new().await.unwrap();
    let resp = harness
        .post_json("/relationships", json!({"person_name": "Sam"}))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body["notes"].is_null());

    let stored = harness.storage.list_relationships().await.unwrap();
    assert!(stored[0].notes.is_none());
}

#[tokio::test]
async fn missing_or_blank_name_is_rejected_without_a_row() {
    let harness = TestHarness::new().await.unwrap();

    for body in [json!({"type": "friend"}), json!({"person_name": "   "})] {
        let resp = harness.post_json("/relationships", body).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert!(resp.body["error"].as_str().unwrap().contains("person_name"));
    }
    assert!(harness.storage.list_relationships().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_body_is_a_json_400() {
    let harness = TestHarness::new().await.unwrap();
    let resp = harness.post_raw("/relationships", "{not json").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body["error"].is_string());
}

#[tokio::test]
async fn relationships_list_newest_first() {
    let harness = TestHarness::new().await.unwrap();
    for name in ["first", "second", "third"] {
        harness.seed_relationship(name).await.unwrap();
    }
    let resp = harness.get("/relationships").await;
    let names: Vec<&str> = resp
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["person_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["third", "second", "first"]);
}

#[tokio::test]
async fn get_relationship_by_id() {
    let harness = TestHarness::new().await.unwrap();
    let rel = harness.seed_relationship("Maya").await.unwrap();

    let found = harness.get(&format!("/relationships/{}", rel.id)).await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["id"], rel.id.as_str());

    let missing = harness.get("/relationships/does-not-exist").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(missing.body["error"].is_string());
}

// ---- Events ----

#[tokio::test]
async fn events_require_relationship_id() {
    let harness = TestHarness::new().await.unwrap();
    let resp = harness.get("/events").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body["error"].as_str().unwrap().contains("relationship_id"));
}

#[tokio::test]
async fn events_are_listed_newest_first_per_relationship() {
    let harness = TestHarness::new().await.unwrap();
    let rel = harness.seed_relationship("Maya").await.unwrap();
    let other = harness.seed_relationship("Sam").await.unwrap();

    for event_type in ["call", "dinner", "text"] {
        let resp = harness
            .post_json(
                "/events",
                json!({"relationship_id": rel.id, "event_type": event_type}),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK);
    }
    harness.seed_event(&other.id, "gift").await.unwrap();

    let resp = harness
        .get(&format!("/events?relationship_id={}", rel.id))
        .await;
    let types: Vec<&str> = resp
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event_type"].as_str().unwrap())
        .collect();
    assert_eq!(types, ["text", "dinner", "call"]);
}

#[tokio::test]
async fn event_for_unknown_relationship_is_404() {
    let harness = TestHarness::new().await.unwrap();
    let resp = harness
        .post_json(
            "/events",
            json!({"relationship_id": "ghost", "event_type": "call"}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_missing_type_is_400() {
    let harness = TestHarness::new().await.unwrap();
    let rel = harness.seed_relationship("Maya").await.unwrap();
    let resp = harness
        .post_json("/events", json!({"relationship_id": rel.id}))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(harness.storage.list_events(&rel.id, None).await.unwrap().is_empty());
}

// ---- Analyze ----

#[tokio::test]
async fn analyze_unknown_relationship_is_404_without_insight() {
    let harness = TestHarness::builder()
        .with_completions(vec![VALID_INSIGHT.to_string()])
        .build()
        .await
        .unwrap();

    let resp = harness
        .post_json("/analyze", json!({"relationship_id": "ghost"}))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(harness.completion.call_count().await, 0);
    assert!(harness.storage.list_insights("ghost").await.unwrap().is_empty());
}

#[tokio::test]
async fn analyze_missing_id_is_400() {
    let harness = TestHarness::new().await.unwrap();
    let resp = harness.post_json("/analyze", json!({})).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_valid_completion_stores_exactly_one_insight() {
    let harness = TestHarness::builder()
        .with_completions(vec![VALID_INSIGHT.to_string()])
        .build()
        .await
        .unwrap();
    let rel = harness.seed_relationship("Maya").await.unwrap();
    harness.seed_event(&rel.id, "call").await.unwrap();

    let resp = harness
        .post_json("/analyze", json!({"relationship_id": rel.id}))
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{:?}", resp.body);

    let expected: serde_json::Value = serde_json::from_str(VALID_INSIGHT).unwrap();
    for field in [
        "summary",
        "pattern",
        "risk_score",
        "growth_score",
        "recommended_action",
        "suggested_message",
    ] {
        assert_eq!(resp.body[field], expected[field], "field {field}");
    }
    assert_eq!(resp.body["relationship_id"], rel.id.as_str());

    let listed = harness
        .get(&format!("/insights?relationship_id={}", rel.id))
        .await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0], resp.body);

    let requests = harness.completion.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("Person: Maya"));
    assert!(requests[0].prompt.contains("call"));
}

#[tokio::test]
async fn analyze_non_json_completion_is_500_with_raw_and_no_row() {
    let prose = "Honestly, this relationship looks great to me!";
    let harness = TestHarness::builder()
        .with_completions(vec![prose.to_string()])
        .build()
        .await
        .unwrap();
    let rel = harness.seed_relationship("Maya").await.unwrap();

    let resp = harness
        .post_json("/analyze", json!({"relationship_id": rel.id}))
        .await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body["raw"], prose);
    assert!(resp.body["error"].is_string());
    assert!(harness.storage.list_insights(&rel.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn analyze_empty_completion_is_500_without_raw() {
    let harness = TestHarness::builder()
        .with_outcomes(vec![MockOutcome::NoText])
        .build()
        .await
        .unwrap();
    let rel = harness.seed_relationship("Maya").await.unwrap();

    let resp = harness
        .post_json("/analyze", json!({"relationship_id": rel.id}))
        .await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.body.get("raw").is_none());
    assert!(harness.storage.list_insights(&rel.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn analyze_upstream_failure_is_500() {
    let harness = TestHarness::builder()
        .with_outcomes(vec![MockOutcome::Error("API returned 529".into())])
        .build()
        .await
        .unwrap();
    let rel = harness.seed_relationship("Maya").await.unwrap();

    let resp = harness
        .post_json("/analyze", json!({"relationship_id": rel.id}))
        .await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.body["error"].as_str().unwrap().contains("529"));
}

#[tokio::test]
async fn insights_list_newest_first() {
    let harness = TestHarness::builder()
        .with_completions(vec![
            r#"{"summary":"older"}"#.to_string(),
            r#"{"summary":"newer"}"#.to_string(),
        ])
        .build()
        .await
        .unwrap();
    let rel = harness.seed_relationship("Maya").await.unwrap();
    for _ in 0..2 {
        let resp = harness
            .post_json("/analyze", json!({"relationship_id": rel.id}))
            .await;
        assert_eq!(resp.status, StatusCode::OK);
    }

    let resp = harness
        .get(&format!("/insights?relationship_id={}", rel.id))
        .await;
    assert_eq!(resp.body[0]["summary"], "newer");
    assert_eq!(resp.body[1]["summary"], "older");
}

#[tokio::test]
async fn insights_require_relationship_id() {
    let harness = TestHarness::new().await.unwrap();
    let resp = harness.get("/insights").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// ---- Messages ----

fn message_batch(messages: serde_json::Value) -> serde_json::Value {
    json!({
        "user_id": "u1",
        "platform": "whatsapp",
        "thread_id": "t1",
        "messages": messages
    })
}

#[tokio::test]
async fn ingest_messages_inserts_every_message() {
    let harness = TestHarness::new().await.unwrap();
    let resp = harness
        .post_json(
            "/messages",
            message_batch(json!([
                {"from_me": true, "text": "hey", "timestamp": "2026-05-01T10:00:00Z"},
                {"from_me": false, "text": "hi!", "timestamp": "2026-05-01T10:01:00Z"},
                {"from_me": true, "text": "lunch?", "timestamp": "2026-05-01T10:02:00Z"}
            ])),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({"success": true, "inserted": 3}));

    let thread = harness
        .get("/messages?user_id=u1&platform=whatsapp&thread_id=t1")
        .await;
    assert_eq!(thread.status, StatusCode::OK);
    let texts: Vec<&str> = thread
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, ["lunch?", "hi!", "hey"]);
}

#[tokio::test]
async fn empty_or_non_array_messages_are_rejected() {
    let harness = TestHarness::new().await.unwrap();

    for messages in [json!([]), json!("not a list"), json!({"text": "x"})] {
        let resp = harness.post_json("/messages", message_batch(messages)).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert!(resp.body["error"].is_string());
    }

    let thread = harness
        .storage
        .list_messages("u1", "whatsapp", "t1")
        .await
        .unwrap();
    assert!(thread.is_empty());
}

#[tokio::test]
async fn ingest_requires_thread_coordinates() {
    let harness = TestHarness::new().await.unwrap();
    let resp = harness
        .post_json(
            "/messages",
            json!({"user_id": "u1", "messages": [{"from_me": true, "text": "x", "timestamp": "t"}]}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// ---- Health and auth ----

#[tokio::test]
async fn health_is_open_and_reports_storage() {
    let harness = TestHarness::builder()
        .with_bearer_token("secret")
        .build()
        .await
        .unwrap();
    let resp = harness
        .send_with_token(Method::GET, "/health", None, None)
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "ok");
    assert_eq!(resp.body["storage"], "healthy");
}

#[tokio::test]
async fn bearer_token_guards_api_routes() {
    let harness = TestHarness::builder()
        .with_bearer_token("secret")
        .build()
        .await
        .unwrap();

    let anonymous = harness
        .send_with_token(Method::GET, "/relationships", None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["error"], "unauthorized");

    let wrong = harness
        .send_with_token(Method::GET, "/relationships", None, Some("nope"))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let authorized = harness.get("/relationships").await;
    assert_eq!(authorized.status, StatusCode::OK);
}
