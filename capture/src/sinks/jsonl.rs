use std::path::{Path, PathBuf};

use async_trait::async_trait;
use metrics::counter;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::api::CaptureError;
use crate::sinks::Log;

/// Appends samples to a newline-delimited JSON file.
///
/// The file is opened in append mode once per batch and all lines of the batch
/// go out in a single write. There is no lock around the file: concurrent
/// batches rely on the platform's append semantics for interleaving.
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub async fn new(path: PathBuf) -> anyhow::Result<JsonlSink> {
        info!("appending fingerprints to {}", path.display());
        ensure_parent(&path).await?;

        Ok(JsonlSink { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir).await,
        _ => Ok(()),
    }
}

#[async_trait]
impl Log for JsonlSink {
    async fn append(&self, lines: Vec<String>) -> Result<(), CaptureError> {
        if lines.is_empty() {
            return Ok(());
        }

        let count = lines.len();
        let mut buffer = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            buffer.push_str(&line);
            buffer.push('\n');
        }

        // The directory may have been removed since start-up
        ensure_parent(&self.path).await?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;

        debug!(count, "appended samples to {}", self.path.display());
        counter!("fingerprint_samples_written_total").increment(count as u64);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::JsonlSink;
    use crate::sinks::Log;

    #[tokio::test]
    async fn creates_directory_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("fingerprints.jsonl");

        let sink = JsonlSink::new(path.clone()).await.unwrap();
        assert!(path.parent().unwrap().is_dir());
        assert!(!path.exists());

        sink.append(vec![r#"{"a":1}"#.to_string()]).await.unwrap();
        sink.append(vec![r#"{"b":2}"#.to_string(), r#"{"c":3}"#.to_string()])
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"a\":1}\n{\"b\":2}\n{\"c\":3}\n");
    }

    #[tokio::test]
    async fn empty_batch_does_not_touch_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fingerprints.jsonl");

        let sink = JsonlSink::new(path.clone()).await.unwrap();
        sink.append(vec![]).await.unwrap();

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // The log path is a directory, opening it for append fails.
        let sink = JsonlSink::new(dir.path().to_path_buf()).await.unwrap();

        let res = sink.append(vec!["{}".to_string()]).await;
        assert!(res.is_err());
    }
}
