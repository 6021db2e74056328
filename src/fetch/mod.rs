// src/fetch/mod.rs

use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::FetchConfig;
use crate::error::{LastFailure, NetworkError, Result};

pub mod retry;

use retry::Backoff;

/// Outcome of a single GET.
enum Attempt {
    Body(String),
    RetryableStatus {
        status: u16,
        retry_after: Option<Duration>,
    },
    FatalStatus(u16),
    Transport(reqwest::Error),
}

/// HTTP client wrapped in the timeout and retry policy.
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    retry_statuses: Vec<u16>,
    backoff: Backoff,
}

impl Fetcher {
    pub fn new(cfg: &FetchConfig) -> Result<Self> {
        let timeout = cfg.timeout()?;
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(cfg.user_agent.as_str())
            .build()
            .map_err(NetworkError::Client)?;
        Ok(Self {
            client,
            max_attempts: cfg.max_attempts.max(1),
            retry_statuses: cfg.retry_statuses.clone(),
            backoff: Backoff::from_config(cfg)?,
        })
    }

    /// GET `url` and return its body text, retrying transient failures.
    pub async fn fetch(&self, url: &Url) -> std::result::Result<String, NetworkError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(%url, attempt, "GET");

            let (last, retry_after) = match self.attempt(url).await {
                Attempt::Body(text) => {
                    info!(%url, attempt, bytes = text.len(), "fetched");
                    return Ok(text);
                }
                Attempt::RetryableStatus {
                    status,
                    retry_after,
                } => (LastFailure::Status(status), retry_after),
                Attempt::FatalStatus(status) => {
                    error!(%url, status, "non-retryable status");
                    return Err(NetworkError::Status {
                        url: url.to_string(),
                        status,
                    });
                }
                Attempt::Transport(e) if is_transient(&e) => (LastFailure::Transport(e), None),
                Attempt::Transport(e) => {
                    error!(%url, error = %e, "request failed");
                    return Err(NetworkError::Transport {
                        url: url.to_string(),
                        source: e,
                    });
                }
            };

            if attempt >= self.max_attempts {
                error!(%url, attempts = attempt, last = %last, "Exhausted retries");
                return Err(NetworkError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last,
                });
            }

            let delay = self.backoff.delay(attempt, retry_after);
            warn!(
                %url,
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %last,
                "Retrying"
            );
            sleep(delay).await;
        }
    }

    async fn attempt(&self, url: &Url) -> Attempt {
        let resp = match self.client.get(url.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => return Attempt::Transport(e),
        };

        let status = resp.status();
        if status.is_success() {
            return match resp.text().await {
                Ok(text) => Attempt::Body(text),
                Err(e) => Attempt::Transport(e),
            };
        }

        let code = status.as_u16();
        if self.retry_statuses.contains(&code) {
            Attempt::RetryableStatus {
                status: code,
                retry_after: if retry::honours_retry_after(code) {
                    retry::retry_after(resp.headers())
                } else {
                    None
                },
            }
        } else {
            Attempt::FatalStatus(code)
        }
    }
}

/// Connect failures, timeouts and resets while sending or reading.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_request() || e.is_body()
}
