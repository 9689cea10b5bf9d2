use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;

use crate::controller::{Outcome, SummaryReport};

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: String,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
    pub detail: Option<String>,
}

fn meta(status: &str, code: StatusCode, message: Option<String>, detail: Option<String>) -> ResponseMeta {
    ResponseMeta {
        status: status.to_string(),
        status_code: code.as_u16(),
        timestamp: Utc::now().to_rfc3339(),
        message,
        detail,
    }
}

pub fn success<T: Serialize>(data: T, message: String) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(data),
            meta: meta("success", StatusCode::OK, Some(message), None),
        }),
    )
}

pub fn warning<T>(status: StatusCode, message: String) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            data: None,
            meta: meta("warning", status, Some(message), None),
        }),
    )
}

pub fn error<T>(status: StatusCode, message: String, detail: Option<String>) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            data: None,
            meta: meta("error", status, Some(message), detail),
        }),
    )
}

/// Envelope for a finished pipeline run.
pub fn from_outcome(outcome: Outcome) -> (StatusCode, Json<ApiResponse<SummaryReport>>) {
    let status = outcome.status_code();
    let message = outcome.message();
    match outcome {
        Outcome::Success(report) => success(report, message),
        Outcome::Warning(_) => warning(status, message),
        Outcome::Error(err) => error(status, message, err.detail()),
    }
}
