use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

/// Collection page served on `/` when no page is configured.
pub const DEFAULT_PAGE: &str = include_str!("../assets/index.html");

/// Loads the collection page markup once at start-up.
pub async fn load(path: Option<&Path>) -> anyhow::Result<Arc<str>> {
    match path {
        None => Ok(Arc::from(DEFAULT_PAGE)),
        Some(path) => {
            let page = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read index page {}", path.display()))?;
            Ok(Arc::from(page))
        }
    }
}
