use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub title: String,   // error code (e.g. "is_required", "range")
    pub message: String, // Human readable
}

// Wrapper to combine StatusCode and the Body
pub struct ApiResponseResult(pub StatusCode, pub serde_json::Value);

impl IntoResponse for ApiResponseResult {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

pub struct ResponseBuilder;

impl ResponseBuilder {
    pub fn success<T: Serialize>(data: T) -> ApiResponseResult {
        ApiResponseResult(StatusCode::OK, json!(data))
    }

    pub fn created<T: Serialize>(data: T) -> ApiResponseResult {
        ApiResponseResult(StatusCode::CREATED, json!(data))
    }

    pub fn no_content() -> StatusCode {
        StatusCode::NO_CONTENT
    }

    // Domain errors always carry the {"errors": <message>} payload
    pub fn error(status_code: StatusCode, message: &str) -> ApiResponseResult {
        ApiResponseResult(status_code, json!({ "errors": message }))
    }

    pub fn validation_error(details: Vec<ValidationErrorDetail>) -> ApiResponseResult {
        ApiResponseResult(
            StatusCode::BAD_REQUEST,
            json!({ "errors": "Validation failed", "fields": details }),
        )
    }
}
