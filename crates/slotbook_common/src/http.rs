// --- File: crates/slotbook_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{HttpStatusCode, SlotbookError};

pub mod client;

/// Renders as `{"error": {"message", "code"}}`; 5xx detail goes to the log only.
impl IntoResponse for SlotbookError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            error!("Request failed with {}: {}", status_code, self);
        }

        let body = Json(json!({
            "error": {
                "message": self.public_message(),
                "code": status_code.as_u16(),
            }
        }));

        (status_code, body).into_response()
    }
}
