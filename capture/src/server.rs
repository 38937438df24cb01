use std::future::Future;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::prometheus::setup_metrics_recorder;
use crate::sinks::jsonl::JsonlSink;
use crate::sinks::print::PrintSink;
use crate::{page, router};

pub async fn serve<F>(config: Config, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let page = page::load(config.index_page.as_deref()).await?;

    let metrics = if config.export_prometheus {
        Some(setup_metrics_recorder().context("failed to install metrics recorder")?)
    } else {
        None
    };

    let app = if config.print_sink {
        tracing::warn!("print sink enabled, fingerprints will not be persisted");
        router::router(
            crate::time::SystemTime {},
            PrintSink {},
            page,
            &config.static_dir,
            config.write_mode,
            config.max_body_bytes,
            metrics,
        )
    } else {
        let sink = JsonlSink::new(config.fingerprint_log.clone())
            .await
            .context("failed to prepare fingerprint log")?;
        router::router(
            crate::time::SystemTime {},
            sink,
            page,
            &config.static_dir,
            config.write_mode,
            config.max_body_bytes,
            metrics,
        )
    };

    tracing::info!("listening on {:?}", listener.local_addr()?);
    tracing::info!(
        "config: write_mode == {:?} ; log_level == {:?}",
        config.write_mode,
        config.log_level
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server graceful shutdown completed");
    Ok(())
}
