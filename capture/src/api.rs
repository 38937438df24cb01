use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitResponseCode {
    Success,
    Error,
}

#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmitResponse {
    pub status: SubmitResponseCode,
    pub message: String,
}

impl SubmitResponse {
    pub fn recorded(count: usize) -> Self {
        SubmitResponse {
            status: SubmitResponseCode::Success,
            message: format!("{count} samples recorded."),
        }
    }
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("No data received.")]
    NoData,
    #[error("failed to decode request: {0}")]
    RequestDecodingError(String),
    #[error("request body too large: {0}")]
    RequestTooLarge(String),
    #[error("failed to parse request: {0}")]
    RequestParsingError(#[from] serde_json::Error),

    #[error("expected a list of samples, got {0}")]
    NotABatch(&'static str),
    #[error("sample {index} is a {kind}, not an object")]
    InvalidSample { index: usize, kind: &'static str },

    #[error("failed to write fingerprint log: {0}")]
    LogWriteError(#[from] std::io::Error),
}

impl CaptureError {
    /// Short label used as the `cause` of rejected batch metrics.
    pub fn cause(&self) -> &'static str {
        match self {
            CaptureError::NoData => "no_data",
            CaptureError::RequestDecodingError(_) => "decoding",
            CaptureError::RequestTooLarge(_) => "too_large",
            CaptureError::RequestParsingError(_) => "parsing",
            CaptureError::NotABatch(_) => "not_a_batch",
            CaptureError::InvalidSample { .. } => "invalid_sample",
            CaptureError::LogWriteError(_) => "log_write",
        }
    }
}

impl IntoResponse for CaptureError {
    fn into_response(self) -> Response {
        // Every failure on the submit path is reported as a client error,
        // including file-system failures.
        (
            StatusCode::BAD_REQUEST,
            Json(SubmitResponse {
                status: SubmitResponseCode::Error,
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
