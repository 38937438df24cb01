#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use capture::config::WriteMode;
use capture::page::DEFAULT_PAGE;
use capture::router::{router, SUBMIT_PATH};
use capture::sinks::jsonl::JsonlSink;
use capture::time::TimeSource;

pub const MAX_BODY_BYTES: usize = 64 * 1024;

static TRACING_INIT: Once = Once::new();
pub fn setup_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_writer(tracing_subscriber::fmt::TestWriter::new())
            .init()
    });
}

#[derive(Clone)]
pub struct FixedTime {
    pub time: String,
}

impl TimeSource for FixedTime {
    fn current_time(&self) -> String {
        self.time.to_string()
    }
}

/// Hands out a new second on every call, to tell samples of a batch apart.
#[derive(Clone, Default)]
pub struct TickingTime {
    ticks: Arc<AtomicUsize>,
}

impl TimeSource for TickingTime {
    fn current_time(&self) -> String {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        format!("2024-05-01T10:00:{tick:02}Z")
    }
}

pub struct TestApp {
    pub router: Router,
    pub log_path: PathBuf,
    // Dropping the directory removes the log
    dir: TempDir,
}

impl TestApp {
    pub async fn new(mode: WriteMode) -> Self {
        Self::with_time(FixedTime {
            time: "2024-05-01T10:00:00Z".to_string(),
        }, mode)
        .await
    }

    pub async fn with_time<T: TimeSource + Send + Sync + 'static>(time: T, mode: WriteMode) -> Self {
        setup_tracing();
        let dir = TempDir::new().expect("failed to create temp dir");
        let log_path = dir.path().join("data").join("fingerprints.jsonl");
        Self::for_log(dir, log_path, time, mode).await
    }

    pub async fn for_log<T: TimeSource + Send + Sync + 'static>(
        dir: TempDir,
        log_path: PathBuf,
        time: T,
        mode: WriteMode,
    ) -> Self {
        let sink = JsonlSink::new(log_path.clone())
            .await
            .expect("failed to create sink");
        let static_dir = dir.path().join("static");
        let router = router(
            time,
            sink,
            Arc::from(DEFAULT_PAGE),
            &static_dir,
            mode,
            MAX_BODY_BYTES,
            None,
        );

        Self {
            router,
            log_path,
            dir,
        }
    }

    pub fn dir(&self) -> &TempDir {
        &self.dir
    }

    pub async fn submit(&self, body: impl Into<Body>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(SUBMIT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        let (status, bytes) = self.send(request).await;
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    pub fn raw_log(&self) -> String {
        std::fs::read_to_string(&self.log_path).unwrap_or_default()
    }

    pub fn log_lines(&self) -> Vec<Value> {
        self.raw_log()
            .lines()
            .map(|line| serde_json::from_str(line).expect("log line is not json"))
            .collect()
    }
}
