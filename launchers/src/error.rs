use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid device list {0:?}, expected ids or ranges such as 1-50 or 1,2,7")]
    InvalidDevices(String),
    #[error("device {0} is listed more than once")]
    DuplicateDevice(u32),
    #[error("browser {0:?} is listed more than once")]
    DuplicateBrowser(String),
    #[error("profile {0:?} is listed more than once")]
    DuplicateProfile(String),
    #[error("{0:?} cannot be used in a file name")]
    InvalidName(String),
    #[error("more than one launcher would be written to {0:?}")]
    NameCollision(String),
    #[error("wait range {min}..={max} is empty")]
    EmptyWaitRange { min: u32, max: u32 },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
