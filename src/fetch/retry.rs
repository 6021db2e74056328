// src/fetch/retry.rs

use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::Result;

/// Exponential backoff schedule with an upper bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    factor: f64,
    max: Duration,
    respect_retry_after: bool,
}

impl Backoff {
    pub fn new(factor: f64, max: Duration, respect_retry_after: bool) -> Self {
        Self {
            factor,
            max,
            respect_retry_after,
        }
    }

    pub fn from_config(cfg: &FetchConfig) -> Result<Self> {
        Ok(Self::new(
            cfg.backoff_factor,
            cfg.max_backoff()?,
            cfg.respect_retry_after,
        ))
    }

    /// Delay to wait after the failed `attempt` (1-based).
    ///
    /// A server-supplied `Retry-After` wins over the computed value when
    /// enabled; both are capped at `max`.
    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(ra) = retry_after.filter(|_| self.respect_retry_after) {
            return ra.min(self.max);
        }
        let exp = attempt.saturating_sub(1).min(1023) as i32;
        let secs = (self.factor * 2f64.powi(exp)).min(self.max.as_secs_f64());
        Duration::from_secs_f64(secs.max(0.0))
    }
}

/// Only throttling responses carry a `Retry-After` worth waiting for.
pub fn honours_retry_after(status: u16) -> bool {
    matches!(status, 429 | 503)
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
