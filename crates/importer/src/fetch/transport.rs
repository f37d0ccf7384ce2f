use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use super::{FetchRequest, HttpMethod};

/// Raw HTTP response. Header names are lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

/// A request that never produced an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(timeout: Duration) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("request timed out after {}ms", timeout.as_millis()),
        )
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: &FetchRequest,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::from_builder(
            reqwest::Client::builder().user_agent(concat!("golf-sync/", env!("CARGO_PKG_VERSION"))),
        )
    }

    /// Builds the client, falling back to reqwest's defaults if the builder
    /// is rejected.
    pub fn from_builder(builder: reqwest::ClientBuilder) -> Self {
        let client = match builder.build() {
            Ok(client) => client,
            Err(err) => {
                warn!("Failed to build HTTP client, using defaults: {}", err);
                reqwest::Client::new()
            }
        };
        Self { client }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &FetchRequest,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.timeout(timeout).send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(classify)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };
    TransportError::new(kind, err.to_string())
}

type Scripted = Result<TransportResponse, TransportError>;

/// Transport that serves canned responses, for offline runs and tests.
///
/// Responses are matched by the first route whose fragment appears in the
/// request URL. Each route's responses are served in order and the last one
/// repeats.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<(String, VecDeque<Scripted>, usize)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, fragment: impl Into<String>, responses: Vec<Scripted>) -> Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((fragment.into(), responses.into(), 0));
        self
    }

    /// Number of requests served by the route registered for `fragment`.
    pub fn calls(&self, fragment: &str) -> usize {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(f, _, _)| f == fragment)
            .map_or(0, |(_, _, calls)| *calls)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        request: &FetchRequest,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let Some((_, responses, calls)) = routes
            .iter_mut()
            .find(|(fragment, _, _)| request.url.contains(fragment.as_str()))
        else {
            return Ok(TransportResponse::new(404, "no scripted route"));
        };

        *calls += 1;
        match responses.len() {
            0 => Ok(TransportResponse::new(404, "route has no responses")),
            1 => responses
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(TransportResponse::new(404, ""))),
            _ => responses
                .pop_front()
                .unwrap_or_else(|| Ok(TransportResponse::new(404, ""))),
        }
    }
}
