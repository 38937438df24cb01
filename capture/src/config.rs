use std::net::SocketAddr;
use std::path::PathBuf;

use envconfig::Envconfig;
use tracing::Level;

/// How a batch is persisted when one of its samples cannot be annotated.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum WriteMode {
    /// Samples before the failing one are still appended.
    #[default]
    Partial,
    /// Nothing is appended unless every sample in the batch is valid.
    Atomic,
}

impl std::str::FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_ref() {
            "partial" => Ok(WriteMode::Partial),
            "atomic" => Ok(WriteMode::Atomic),
            _ => Err(format!("Unknown write mode: {s}")),
        }
    }
}

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(default = "false")]
    pub print_sink: bool,

    #[envconfig(default = "127.0.0.1:5000")]
    pub address: SocketAddr,

    #[envconfig(default = "data/vae_pilot_fingerprints.jsonl")]
    pub fingerprint_log: PathBuf,

    #[envconfig(default = "partial")]
    pub write_mode: WriteMode,

    pub index_page: Option<PathBuf>,

    #[envconfig(default = "static")]
    pub static_dir: PathBuf,

    #[envconfig(default = "2097152")]
    pub max_body_bytes: usize,

    // Used for integration tests
    #[envconfig(default = "true")]
    pub export_prometheus: bool,

    #[envconfig(default = "info")]
    pub log_level: Level,
}
