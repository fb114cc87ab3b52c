// Router tests for the HTTP event receiver (feature "web").
//
// Drives the Axum router directly with tower's oneshot — no sockets.
// The key property: a well-formed event always gets 200, even when the
// notification is dropped, so the pushing infrastructure never retries.

#![cfg(feature = "web")]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use tiffin::notify::{DeliveryReceipt, Dispatcher, NotificationMessage, TOPIC_ALL};
use tiffin::web::{build_router, AppState};

struct StubDispatcher {
    fail: bool,
}

#[async_trait]
impl Dispatcher for StubDispatcher {
    async fn send(&self, _message: &NotificationMessage) -> Result<DeliveryReceipt> {
        if self.fail {
            anyhow::bail!("delivery service unavailable");
        }
        Ok(DeliveryReceipt {
            message_id: "projects/test/messages/1".to_string(),
            sent_at: "2024-05-01T00:00:00Z".to_string(),
        })
    }
}

fn router(fail: bool) -> axum::Router {
    build_router(AppState {
        dispatcher: Arc::new(StubDispatcher { fail }),
        topic: TOPIC_ALL.to_string(),
    })
}

async fn post_event(app: axum::Router, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::post("/events")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let response = router(false)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn qualifying_event_returns_sent() {
    let (status, json) = post_event(
        router(false),
        r#"{"path":"meals_daily/d1","before":null,"after":{"memberName":"Alice","breakfast":1}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "sent");
    assert_eq!(json["messageId"], "projects/test/messages/1");
}

#[tokio::test]
async fn non_qualifying_event_returns_skipped() {
    let (status, json) = post_event(
        router(false),
        r#"{"path":"meals_daily/d1","before":{"breakfast":1},"after":{"breakfast":1}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "skipped");
}

#[tokio::test]
async fn delivery_failure_still_returns_200() {
    let (status, json) = post_event(
        router(true),
        r#"{"path":"expenses/e1","before":null,"after":{"category":"payment","amount":100}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], "dropped");
}

#[tokio::test]
async fn malformed_body_is_rejected_client_side() {
    let (status, _) = post_event(router(false), "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
