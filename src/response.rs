use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Uniform envelope returned by every endpoint, success and failure alike.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &str, data: T) -> Response {
        Self::build(StatusCode::OK, message, Some(data))
    }

    pub fn created(message: &str, data: T) -> Response {
        Self::build(StatusCode::CREATED, message, Some(data))
    }

    pub fn error(code: StatusCode, message: &str) -> Response {
        Self::build(code, message, None)
    }

    fn build(code: StatusCode, message: &str, data: Option<T>) -> Response {
        let body = ApiResponse {
            status: code.is_success(),
            code: code.as_u16(),
            message: message.to_string(),
            data,
        };
        (code, Json(body)).into_response()
    }
}
