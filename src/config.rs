// src/config.rs

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_URL: &str =
    "https://newzoo.com/insights/rankings/top-countries-by-smartphone-penetration-and-users/";
pub const DEFAULT_TABLE_ID: &str = "ranking";
pub const DEFAULT_OUTPUT: &str = "rankings.csv";

/// Optional override file looked up in the working directory.
pub const CONFIG_FILE: &str = "rankings.yaml";

/// Everything a run needs. Any subset may be given in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub url: String,
    pub table_id: String,
    pub output: PathBuf,
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            table_id: DEFAULT_TABLE_ID.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            fetch: FetchConfig::default(),
        }
    }
}

/// Timeout and retry policy for the single page fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Applied to connect and to the whole request of every attempt.
    pub timeout_secs: f64,
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after attempt n is `backoff_factor * 2^(n-1)` seconds.
    pub backoff_factor: f64,
    pub max_backoff_secs: f64,
    pub retry_statuses: Vec<u16>,
    pub respect_retry_after: bool,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30.0,
            max_attempts: 5,
            backoff_factor: 1.0,
            max_backoff_secs: 120.0,
            retry_statuses: vec![429, 500, 502, 503, 504],
            respect_retry_after: true,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Result<Duration> {
        secs_to_duration("fetch.timeout_secs", self.timeout_secs)
    }

    pub fn max_backoff(&self) -> Result<Duration> {
        secs_to_duration("fetch.max_backoff_secs", self.max_backoff_secs)
    }
}

fn secs_to_duration(name: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| Error::Config(format!("{} = {}: {}", name, secs, e)))
}

impl Config {
    /// Parse a (possibly partial) YAML document over the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Config =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("parsing YAML: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading {}: {}", path.display(), e)))?;
        let cfg = Self::from_yaml_str(&text)?;
        info!(path = %path.display(), "loaded config overrides");
        Ok(cfg)
    }

    /// The configured page URL, checked to be absolute http(s).
    pub fn page_url(&self) -> Result<Url> {
        let url = Url::parse(&self.url)
            .map_err(|e| Error::Config(format!("url {:?}: {}", self.url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::Config(format!("url scheme {:?} is not http(s)", other))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.page_url()?;
        if self.table_id.trim().is_empty() {
            return Err(Error::Config("table_id must not be empty".into()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::Config("output must not be empty".into()));
        }
        let f = &self.fetch;
        if f.max_attempts == 0 {
            return Err(Error::Config("fetch.max_attempts must be at least 1".into()));
        }
        for (name, v) in [
            ("fetch.timeout_secs", f.timeout_secs),
            ("fetch.backoff_factor", f.backoff_factor),
            ("fetch.max_backoff_secs", f.max_backoff_secs),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Config(format!("{} must be a non-negative number", name)));
            }
        }
        if f.timeout_secs == 0.0 {
            return Err(Error::Config("fetch.timeout_secs must be positive".into()));
        }
        f.timeout()?;
        f.max_backoff()?;
        Ok(())
    }
}
