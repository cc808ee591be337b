//! HTTP transport.
//!
//! The core talks to the server only through [`HttpTransport`], so the
//! binder and client can be exercised against a test double. The
//! production implementation is [`ReqwestTransport`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{Map, Value};

use rz_domain::error::{Error, Result};
use rz_domain::trace::TraceEvent;

/// Body of a successful GET.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Collapse into a JSON value; text bodies become a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            ResponseBody::Json(v) => v,
            ResponseBody::Text(s) => Value::String(s),
        }
    }
}

/// Trait for the request/response layer underneath the client.
///
/// Both methods take fully resolved URLs and perform exactly one round
/// trip. Neither retries.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url`. A non-success status fails with [`Error::HttpStatus`].
    /// Returns parsed JSON when `as_json`, the raw body otherwise.
    async fn get(&self, url: &str, as_json: bool) -> Result<ResponseBody>;

    /// POST `payload` as a JSON object and return the parsed JSON reply.
    ///
    /// The response status is *not* checked: an error reply with a JSON
    /// body is returned like any other.
    async fn post(&self, url: &str, payload: &Map<String, Value>) -> Result<Value>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// reqwest transport
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Created once per client and reused; the underlying `reqwest::Client`
/// keeps a connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build().map_err(from_reqwest)?;
        Ok(Self { http, timeout })
    }

    /// The configured request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, as_json: bool) -> Result<ResponseBody> {
        let start = Instant::now();
        let result = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await;
        let resp = traced("GET", url, start, result)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = resp.text().await.map_err(from_reqwest)?;
        if as_json {
            Ok(ResponseBody::Json(serde_json::from_str(&body)?))
        } else {
            Ok(ResponseBody::Text(body))
        }
    }

    async fn post(&self, url: &str, payload: &Map<String, Value>) -> Result<Value> {
        let body = serde_json::to_string(payload)?;

        let start = Instant::now();
        let result = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await;
        let resp = traced("POST", url, start, result)?;

        if !resp.status().is_success() {
            tracing::debug!(
                url,
                status = resp.status().as_u16(),
                "command returned non-success status; passing body through"
            );
        }

        let body = resp.text().await.map_err(from_reqwest)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Emit an `HttpCall` event for the attempt and convert send errors.
fn traced(
    method: &str,
    url: &str,
    start: Instant,
    result: std::result::Result<reqwest::Response, reqwest::Error>,
) -> Result<reqwest::Response> {
    let duration_ms = start.elapsed().as_millis() as u64;
    let status = match &result {
        Ok(resp) => resp.status().as_u16(),
        Err(e) => e.status().map(|s| s.as_u16()).unwrap_or(0),
    };

    TraceEvent::HttpCall {
        method: method.to_owned(),
        url: url.to_owned(),
        status,
        duration_ms,
    }
    .emit();

    result.map_err(from_reqwest)
}

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Network`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Network(e.to_string())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Test double
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
