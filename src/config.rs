use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Address the bundled classification backend listens on by default.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Base URL of the classification service
    #[arg(long, env = "GAVEL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "GAVEL_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// UI poll interval in milliseconds
    #[arg(long, env = "GAVEL_TICK_MS", default_value = "100")]
    pub tick_ms: u64,

    /// Append logs to this file (without it, interactive runs log nothing)
    #[arg(long, env = "GAVEL_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Run a one-shot connectivity check against /health and exit
    #[arg(long)]
    pub check: bool,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
