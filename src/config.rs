use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILTER: &str = "atr_analyzer=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Transport-level timeout. `None` waits for the service indefinitely;
    /// a configured value of zero means the same.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            service: ServiceConfig {
                base_url: var("ANALYZER_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout_secs: var("ANALYZER_TIMEOUT_SECS")
                    .map(|v| v.trim().parse::<u64>())
                    .transpose()
                    .context("ANALYZER_TIMEOUT_SECS must be a whole number of seconds")?
                    .filter(|secs| *secs > 0),
            },
            logging: LoggingConfig {
                filter: var("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
                log_dir: var("ANALYZER_LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_log_dir),
            },
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = base_url {
            self.service.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.service.timeout_secs = (secs > 0).then_some(secs);
        }
        self
    }
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("atr-analyzer")
        .join("logs")
}
