use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use bytes::Bytes;
use serde_json::Value;
use tracing::instrument;

use crate::api::{CaptureError, SubmitResponse};
use crate::config::WriteMode;
use crate::prometheus::{report_received_samples, report_rejected_batch};
use crate::sample::{annotate, decode_batch};
use crate::time::TimeSource;
use crate::{router, sinks};

#[instrument(skip_all, fields(batch_size, user_agent, content_type))]
pub async fn submit(
    state: State<router::State>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SubmitResponse>, CaptureError> {
    let user_agent = headers
        .get("user-agent")
        .map_or("unknown", |v| v.to_str().unwrap_or("unknown"));
    let content_type = headers
        .get("content-type")
        .map_or("unknown", |v| v.to_str().unwrap_or("unknown"));

    tracing::Span::current().record("user_agent", user_agent);
    tracing::Span::current().record("content_type", content_type);

    match ingest(&state, body).await {
        Ok(count) => {
            tracing::info!("received {} sequential fingerprints", count);
            Ok(Json(SubmitResponse::recorded(count)))
        }
        Err(err) => {
            report_rejected_batch(err.cause());
            tracing::warn!("error receiving data: {}", err);
            Err(err)
        }
    }
}

async fn ingest(
    state: &router::State,
    body: Result<Bytes, BytesRejection>,
) -> Result<usize, CaptureError> {
    let samples = decode_batch(body.map_err(rejected_body)?)?;

    tracing::Span::current().record("batch_size", samples.len());
    report_received_samples(samples.len());

    process_samples(
        state.sink.clone(),
        state.timesource.as_ref(),
        samples,
        state.write_mode,
    )
    .await
}

// Body extraction failures get the same JSON error body as any other bad batch
fn rejected_body(rejection: BytesRejection) -> CaptureError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CaptureError::RequestTooLarge(rejection.body_text())
    } else {
        CaptureError::RequestDecodingError(rejection.body_text())
    }
}

/// Lines ready to be appended, plus the failure that stopped annotation, if any.
#[derive(Debug)]
pub struct AnnotatedBatch {
    pub lines: Vec<String>,
    pub failure: Option<CaptureError>,
}

/// Stamps and serializes samples in order, stopping at the first one that fails.
///
/// In [`WriteMode::Partial`] the lines annotated before the failure are kept so
/// they still reach the log. In [`WriteMode::Atomic`] a failure discards them.
pub fn annotate_samples(
    samples: Vec<Value>,
    timesource: &(dyn TimeSource + Send + Sync),
    mode: WriteMode,
) -> AnnotatedBatch {
    let mut lines = Vec::with_capacity(samples.len());

    for (index, sample) in samples.into_iter().enumerate() {
        match annotate(index, sample, timesource.current_time()) {
            Ok(line) => lines.push(line),
            Err(err) => {
                if mode == WriteMode::Atomic {
                    lines.clear();
                }
                return AnnotatedBatch {
                    lines,
                    failure: Some(err),
                };
            }
        }
    }

    AnnotatedBatch {
        lines,
        failure: None,
    }
}

#[instrument(skip_all, fields(samples = samples.len()))]
pub async fn process_samples(
    sink: Arc<dyn sinks::Log + Send + Sync>,
    timesource: &(dyn TimeSource + Send + Sync),
    samples: Vec<Value>,
    mode: WriteMode,
) -> Result<usize, CaptureError> {
    let AnnotatedBatch { lines, failure } = annotate_samples(samples, timesource, mode);
    let written = lines.len();

    if written > 0 {
        sink.append(lines).await?;
    }

    match failure {
        None => Ok(written),
        Some(err) => {
            if written > 0 {
                tracing::warn!("{} samples were logged before the batch failed", written);
            }
            Err(err)
        }
    }
}
