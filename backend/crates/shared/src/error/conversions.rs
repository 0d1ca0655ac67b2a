//! Error conversions
//!
//! Rendering [`AppError`] as an HTTP response.

#![cfg(feature = "axum")]

use super::app_error::AppError;
use crate::response::ApiResponse;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Server-side details never reach the client.
        let message = if self.is_server_error() {
            self.kind().as_str().to_string()
        } else {
            self.message().to_string()
        };

        ApiResponse::<()>::error(self.status_code(), message, self.code().map(str::to_string))
            .into_response()
    }
}
