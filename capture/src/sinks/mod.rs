use async_trait::async_trait;

use crate::api::CaptureError;

pub mod jsonl;
pub mod print;

/// Destination of annotated sample lines. Implementations only ever append.
#[async_trait]
pub trait Log {
    /// Appends `lines` in order, each followed by a newline.
    async fn append(&self, lines: Vec<String>) -> Result<(), CaptureError>;
}
