use std::future::ready;
use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::response::Html;
use axum::{
    extract,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::WriteMode;
use crate::prometheus::track_metrics;
use crate::{capture, sinks, time::TimeSource};

pub const SUBMIT_PATH: &str = "/api/submit-fingerprints";

#[derive(Clone)]
pub struct State {
    pub sink: Arc<dyn sinks::Log + Send + Sync>,
    pub timesource: Arc<dyn TimeSource + Send + Sync>,
    pub page: Arc<str>,
    pub write_mode: WriteMode,
}

async fn index(extract::State(state): extract::State<State>) -> Html<String> {
    Html(state.page.to_string())
}

async fn health() -> &'static str {
    "fp-capture"
}

pub fn router<
    TZ: TimeSource + Send + Sync + 'static,
    S: sinks::Log + Send + Sync + 'static,
>(
    timesource: TZ,
    sink: S,
    page: Arc<str>,
    static_dir: &Path,
    write_mode: WriteMode,
    max_body_bytes: usize,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let state = State {
        sink: Arc::new(sink),
        timesource: Arc::new(timesource),
        page,
        write_mode,
    };

    // The collection page may be hosted on another origin than the endpoint
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .allow_origin(AllowOrigin::mirror_request());

    let router = Router::new()
        .route("/", get(index))
        .route("/_readiness", get(health))
        .route("/_liveness", get(health))
        .route(
            SUBMIT_PATH,
            post(capture::submit).layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum::middleware::from_fn(track_metrics))
        .with_state(state);

    // Installing a global recorder when capture is used as a library (during tests etc)
    // does not work well, so the handle is only passed in by the server.
    match metrics {
        Some(recorder_handle) => {
            router.route("/metrics", get(move || ready(recorder_handle.render())))
        }
        None => router,
    }
}
