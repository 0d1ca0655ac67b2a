//! JSON response envelope
//!
//! Every endpoint answers with the same shape:
//!
//! ```json
//! { "success": true, "status": 200, "message": "OK", "data": { ... }, "timestamp": "..." }
//! ```
//!
//! Failures use the same envelope with `success: false`, no `data` and a
//! machine-readable `code` (see [`crate::error::conversions`]).

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// 200 with payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::success(200, message, Some(data))
    }

    /// 201 with payload
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::success(201, message, Some(data))
    }

    fn success(status: u16, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            status,
            message: message.into(),
            data,
            code: None,
            timestamp: Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    /// 200 without payload (logout family)
    pub fn empty(message: impl Into<String>) -> Self {
        Self::success(200, message, None)
    }

    pub fn error(status: u16, message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            success: false,
            status,
            message: message.into(),
            data: None,
            code,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.status)
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_carries_data() {
        let resp = ApiResponse::ok("Login successful", serde_json::json!({ "id": 1 }));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["status"], 200);
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("code").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn empty_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::empty("Logged out")).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["message"], "Logged out");
    }

    #[test]
    fn error_envelope_has_code() {
        let resp = ApiResponse::<()>::error(409, "Email already registered", Some("EMAIL_TAKEN".into()));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["status"], 409);
        assert_eq!(json["code"], "EMAIL_TAKEN");
    }
}
