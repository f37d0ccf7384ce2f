//! Resilient HTTP fetching: per-attempt timeout, exponential backoff,
//! rate-limit awareness and response-shape validation.
//!
//! Failures are returned as a typed [`FetchFailure`] carrying the attempt
//! count, never as partial data.

mod retry;
mod transport;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::query::redact_key;

pub use retry::{backoff_delay, parse_retry_after, rate_limit_delay, retry_after_delay};
pub use transport::{
    HttpTransport, ReqwestTransport, ScriptedTransport, TransportError, TransportErrorKind,
    TransportResponse,
};

/// Predicate a parsed payload must satisfy before it is accepted.
pub type ShapeCheck = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub retries: u32,
    pub base_backoff: Duration,
    pub validate: Option<ShapeCheck>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 3,
            base_backoff: Duration::from_secs(1),
            validate: None,
        }
    }
}

impl FetchConfig {
    pub fn with_validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(check));
        self
    }

    pub fn total_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchConfig")
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("base_backoff", &self.base_backoff)
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: BTreeMap::new(),
            body: Some(body.into()),
        }
        .with_header("content-type", "application/json")
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }
}

/// A successful fetch and the number of attempts it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub attempts: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// HTTP 401 or 403. Never retried.
    Unauthorized,
    /// Any other 4xx except 429. Never retried.
    ClientError,
    /// Every attempt hit a recoverable error.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} after {attempts} attempt(s)")]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
    pub status: Option<u16>,
    pub attempts: u32,
}

enum Attempt<T> {
    Done(T),
    Retry {
        message: String,
        status: Option<u16>,
        delay: Duration,
    },
    Fatal(FetchFailure),
}

pub struct ResilientClient<T = ReqwestTransport> {
    transport: T,
    config: FetchConfig,
}

impl ResilientClient<ReqwestTransport> {
    pub fn with_defaults(config: FetchConfig) -> Self {
        Self::new(ReqwestTransport::new(), config)
    }
}

impl<T: HttpTransport> ResilientClient<T> {
    pub fn new(transport: T, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn fetch_json(&self, request: &FetchRequest) -> Result<Fetched<Value>, FetchFailure> {
        self.fetch_with(request, |_| true, Ok).await
    }

    pub async fn fetch<D: DeserializeOwned>(
        &self,
        request: &FetchRequest,
    ) -> Result<Fetched<D>, FetchFailure> {
        self.fetch_validated(request, |_| true).await
    }

    /// Fetches and decodes a payload that must also pass `shape`, on top of
    /// the configured validator.
    pub async fn fetch_validated<D, F>(
        &self,
        request: &FetchRequest,
        shape: F,
    ) -> Result<Fetched<D>, FetchFailure>
    where
        D: DeserializeOwned,
        F: Fn(&Value) -> bool,
    {
        self.fetch_with(request, shape, |value| {
            serde_json::from_value(value).map_err(|e| format!("unexpected response shape: {}", e))
        })
        .await
    }

    async fn fetch_with<D, S, F>(
        &self,
        request: &FetchRequest,
        shape: S,
        decode: F,
    ) -> Result<Fetched<D>, FetchFailure>
    where
        S: Fn(&Value) -> bool,
        F: Fn(Value) -> Result<D, String>,
    {
        let total = self.config.total_attempts();
        let url = redact_key(&request.url);
        let mut last_message = String::from("no attempt made");
        let mut last_status = None;

        for attempt in 0..total {
            let attempts = attempt + 1;
            debug!("Fetching {} (attempt {}/{})", url, attempts, total);

            match self.attempt(request, attempt, &shape, &decode).await {
                Attempt::Done(data) => return Ok(Fetched { data, attempts }),
                Attempt::Fatal(mut failure) => {
                    failure.attempts = attempts;
                    return Err(failure);
                }
                Attempt::Retry {
                    message,
                    status,
                    delay,
                } => {
                    if attempts < total {
                        warn!(
                            "Request to {} failed ({}), retrying in {}ms ({}/{})",
                            url,
                            message,
                            delay.as_millis(),
                            attempts,
                            total
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_message = message;
                    last_status = status;
                }
            }
        }

        Err(FetchFailure {
            kind: FailureKind::Exhausted,
            message: last_message,
            status: last_status,
            attempts: total,
        })
    }

    async fn attempt<D, S, F>(
        &self,
        request: &FetchRequest,
        attempt: u32,
        shape: &S,
        decode: &F,
    ) -> Attempt<D>
    where
        S: Fn(&Value) -> bool,
        F: Fn(Value) -> Result<D, String>,
    {
        let base = self.config.base_backoff;
        let timeout = self.config.timeout;

        let sent = tokio::time::timeout(timeout, self.transport.send(request, timeout)).await;
        let response = match sent {
            Err(_) => {
                return Attempt::Retry {
                    message: TransportError::timeout(timeout).message,
                    status: None,
                    delay: backoff_delay(base, attempt),
                };
            }
            Ok(Err(err)) => {
                return Attempt::Retry {
                    message: err.message,
                    status: None,
                    delay: backoff_delay(base, attempt),
                };
            }
            Ok(Ok(response)) => response,
        };

        let status = response.status;
        match status {
            200..=299 => match self.accept(&response.body, shape, decode) {
                Ok(data) => Attempt::Done(data),
                Err(message) => Attempt::Retry {
                    message,
                    status: Some(status),
                    delay: backoff_delay(base, attempt),
                },
            },
            429 => Attempt::Retry {
                message: "rate limited (HTTP 429)".to_string(),
                status: Some(status),
                delay: response
                    .header("retry-after")
                    .and_then(|value| retry_after_delay(value, timeout))
                    .unwrap_or_else(|| rate_limit_delay(base, attempt)),
            },
            401 | 403 => Attempt::Fatal(FetchFailure {
                kind: FailureKind::Unauthorized,
                message: format!("authentication failed (HTTP {}), check the API key", status),
                status: Some(status),
                attempts: 0,
            }),
            400..=499 => Attempt::Fatal(FetchFailure {
                kind: FailureKind::ClientError,
                message: format!("request rejected (HTTP {}): {}", status, snippet(&response.body)),
                status: Some(status),
                attempts: 0,
            }),
            _ => Attempt::Retry {
                message: format!("server error (HTTP {})", status),
                status: Some(status),
                delay: backoff_delay(base, attempt),
            },
        }
    }

    fn accept<D, S, F>(&self, body: &str, shape: &S, decode: &F) -> Result<D, String>
    where
        S: Fn(&Value) -> bool,
        F: Fn(Value) -> Result<D, String>,
    {
        let value: Value =
            serde_json::from_str(body).map_err(|e| format!("invalid JSON payload: {}", e))?;

        let configured = self.config.validate.as_ref().is_none_or(|check| check(&value));
        if !configured || !shape(&value) {
            return Err("response failed shape validation".to_string());
        }

        decode(value)
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
