//! HTTP round trips against the real router on an ephemeral port

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use common::{app_context, daily_advice_json, seeded_store, ScriptedGenerator};
use pomocoach::http::build_router;
use pomocoach::CoachError;

async fn spawn_server(ctx: Arc<pomocoach::http::AppContext>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(ctx);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn daily_advice_round_trip() {
    let gateway = Arc::new(ScriptedGenerator::new(vec![Ok(daily_advice_json())]));
    let addr = spawn_server(app_context(seeded_store(), gateway)).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/coaching/daily-advice", addr))
        .bearer_auth("deniz-token")
        .json(&serde_json::json!({"extra_context": "maths first"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["technique"], "Active Recall");
    assert!(body["steps"].as_array().unwrap().len() >= 1);
    assert!(body["generated_at"].is_string());
    assert_eq!(body["model_used"], "fake-fast");
}

#[tokio::test]
async fn missing_credential_is_401_with_machine_tag() {
    let gateway = Arc::new(ScriptedGenerator::new(vec![]));
    let addr = spawn_server(app_context(seeded_store(), gateway.clone())).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/coaching/daily-advice", addr))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "credential_missing");
    assert!(body["message"].is_string());
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn expired_credential_is_401() {
    let gateway = Arc::new(ScriptedGenerator::new(vec![]));
    let addr = spawn_server(app_context(seeded_store(), gateway)).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/coaching/daily-advice", addr))
        .bearer_auth("some-stale-token")
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "credential_invalid");
}

#[tokio::test]
async fn out_of_range_days_is_400_verbatim() {
    let gateway = Arc::new(ScriptedGenerator::new(vec![]));
    let addr = spawn_server(app_context(seeded_store(), gateway.clone())).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/coaching/weekly-report", addr))
        .bearer_auth("deniz-token")
        .json(&serde_json::json!({"days": 45}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "invalid_request");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("between 3 and 30"));
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn schema_violation_is_502_and_generic() {
    let gateway = Arc::new(ScriptedGenerator::new(vec![Ok(
        r#"{"technique": "Active Recall"}"#.to_string(),
    )]));
    let addr = spawn_server(app_context(seeded_store(), gateway)).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/coaching/daily-advice", addr))
        .bearer_auth("deniz-token")
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "schema_violation");
    // Raw model output never leaks into the client message
    assert!(!body["message"].as_str().unwrap().contains("technique"));
}

#[tokio::test]
async fn model_outage_is_503() {
    let gateway = Arc::new(ScriptedGenerator::new(vec![Err(CoachError::Unavailable(
        "connection refused".into(),
    ))]));
    let addr = spawn_server(app_context(seeded_store(), gateway)).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/coaching/motivation", addr))
        .bearer_auth("deniz-token")
        .json(&serde_json::json!({"trigger": "goal_achieved"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 503);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "unavailable");
}

#[tokio::test]
async fn unknown_session_is_404() {
    let gateway = Arc::new(ScriptedGenerator::new(vec![]));
    let addr = spawn_server(app_context(seeded_store(), gateway)).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/coaching/session-summary", addr))
        .bearer_auth("deniz-token")
        .json(&serde_json::json!({"session_id": 9999}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "data_unavailable");
}

#[tokio::test]
async fn disliked_feedback_returns_alternative_or_null_in_isolation() {
    // Gateway down: feedback must still record successfully with a null
    // alternative
    let gateway = Arc::new(ScriptedGenerator::new(vec![Err(CoachError::Unavailable(
        "down".into(),
    ))]));
    let store = seeded_store();
    let addr = spawn_server(app_context(store.clone(), gateway)).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/coaching/feedback", addr))
        .bearer_auth("deniz-token")
        .json(&serde_json::json!({
            "technique": "Pomodoro 25/5",
            "liked": false,
            "rejection_reason": "25 minutes feels too long"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["alternative"].is_null());
    assert_eq!(store.feedback_count(), 1);
}

#[tokio::test]
async fn health_route_requires_no_auth() {
    let gateway = Arc::new(ScriptedGenerator::new(vec![]));
    let addr = spawn_server(app_context(seeded_store(), gateway)).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/coaching/health", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "fake-fast");
    assert!(body["checked_at"].is_string());
}
