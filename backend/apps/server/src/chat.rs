//! Echo chat endpoint

use axum::Router;
use axum::extract::Query;
use axum::routing::get;
use chrono::Utc;
use kernel::response::ApiResponse;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct SendQuery {
    #[serde(default)]
    pub message: String,
}

/// The message as received, stamped with server time (unix millis)
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub message: String,
    pub time: i64,
}

pub fn chat_router() -> Router {
    Router::new().route("/send", get(send))
}

/// GET /api/chat/send?message=...
async fn send(Query(query): Query<SendQuery>) -> ApiResponse<ChatMessage> {
    ApiResponse::ok(
        "",
        ChatMessage {
            message: query.message,
            time: Utc::now().timestamp_millis(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = chat_router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_echo() {
        let (status, body) = get_json("/send?message=hello%20there").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "hello there");
        assert!(body["data"]["time"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_missing_message() {
        let (status, body) = get_json("/send").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "");
    }
}
