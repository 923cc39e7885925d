//! Response envelope.
//!
//! Every endpoint, success or failure, answers with the same shape:
//! `{statusCode, data, message, success}`.

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// The wire envelope around every response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T: Serialize> {
    pub status_code: u16,
    pub data: Option<T>,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiEnvelope<T> {
    /// Wrap a payload with an arbitrary status.
    pub fn wrap(status: StatusCode, data: T, message: &str) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                status_code: status.as_u16(),
                data: Some(data),
                message: message.to_string(),
                success: status.is_success(),
            }),
        )
    }

    /// 200 OK with a payload.
    pub fn ok(data: T, message: &str) -> (StatusCode, Json<Self>) {
        Self::wrap(StatusCode::OK, data, message)
    }

    /// 201 Created with a payload.
    pub fn created(data: T, message: &str) -> (StatusCode, Json<Self>) {
        Self::wrap(StatusCode::CREATED, data, message)
    }
}

impl ApiEnvelope<()> {
    /// A failure envelope: no payload, `success: false`.
    pub fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                status_code: status.as_u16(),
                data: None,
                message: message.to_string(),
                success: false,
            }),
        )
    }
}
