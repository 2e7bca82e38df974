use serde::Deserialize;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use volley_client::client::DEFAULT_TIMEOUT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read defaults file: {0}")]
    Read(#[from] std::io::Error),
    #[error("could not parse defaults file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid target url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("worker count must be at least 1")]
    NoWorkers,
    #[error("request count per worker must be at least 1")]
    NoRequests,
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Optional TOML defaults file; any field a flag doesn't override.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub workers: Option<u32>,
    pub requests: Option<u32>,
    pub timeout_ms: Option<u64>,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<FileConfig, ConfigError> {
        let mut f = File::open(path.as_ref())?;
        let mut contents = String::new();
        f.read_to_string(&mut contents)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Everything one load run needs, fixed before any worker starts.
///
/// The target stays a plain string here; the dispatcher validates it for
/// real before spawning anything.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub target: String,
    pub workers: u32,
    pub requests: u32,
    pub timeout: Duration,
    pub verbose: bool,
}

impl LoadConfig {
    /// Resolve the final config: explicit flag values win over file
    /// defaults, file defaults win over built-ins.
    pub fn resolve(
        target: String,
        defaults: &FileConfig,
        workers: Option<u32>,
        requests: Option<u32>,
        timeout_ms: Option<u64>,
        verbose: bool,
    ) -> LoadConfig {
        let timeout = timeout_ms
            .or(defaults.timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TIMEOUT);
        LoadConfig {
            target,
            workers: workers.or(defaults.workers).unwrap_or(1),
            requests: requests.or(defaults.requests).unwrap_or(1),
            timeout,
            verbose,
        }
    }
}
