//! HTTP transport for the Hub client.
//!
//! This module builds absolute request URLs (root-relative paths resolve
//! against the configured origin), performs credentialed requests through an
//! [`HttpExchange`], and normalizes HTTP and JSON-decode failures into the
//! shared error channel. Request logging is observational only and never
//! affects control flow.

use async_trait::async_trait;
use hublens_core::{HubConfig, HubError, HubResult};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP methods the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// The method's wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A fully-resolved request descriptor.
///
/// Built fresh per call; never cached or reused across requests.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    /// Header pairs in insertion order.
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// A raw HTTP response before JSON decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Whether the status signals success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The seam between the transport and the network.
///
/// Production uses [`ReqwestExchange`]; tests substitute the mock exchange
/// from the testing module.
#[async_trait]
pub trait HttpExchange: Send + Sync {
    /// Executes one request, returning the raw response or a connection
    /// failure. Status handling belongs to the transport, not here.
    async fn execute(&self, request: HttpRequest) -> HubResult<RawResponse>;
}

/// reqwest-backed exchange.
///
/// The cookie store carries the same-origin session cookie that
/// authenticates every Hub call after login; there is no per-request
/// credential toggle.
pub struct ReqwestExchange {
    client: reqwest::Client,
}

impl ReqwestExchange {
    /// Creates an exchange honoring the configured timeout and user agent.
    pub fn new(config: &HubConfig) -> HubResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| HubError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpExchange for ReqwestExchange {
    async fn execute(&self, request: HttpRequest) -> HubResult<RawResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(request.url.clone()),
            Method::Post => self.client.post(request.url.clone()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HubError::ConnectionFailed(format!("request timed out: {e}"))
            } else {
                HubError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| HubError::InvalidResponse(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

/// Per-request options: query pairs, header overrides, and an optional body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query pairs appended in insertion order.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query pair.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends a header pair.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets the request body.
    pub fn body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// Transport over an [`HttpExchange`].
#[derive(Clone)]
pub struct HubTransport {
    exchange: Arc<dyn HttpExchange>,
    config: HubConfig,
}

impl HubTransport {
    /// Creates a transport over the given exchange.
    pub fn new(exchange: Arc<dyn HttpExchange>, config: HubConfig) -> Self {
        Self { exchange, config }
    }

    /// Creates a reqwest-backed transport.
    pub fn from_config(config: HubConfig) -> HubResult<Self> {
        let exchange = Arc::new(ReqwestExchange::new(&config)?);
        Ok(Self::new(exchange, config))
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Builds an absolute request URL.
    ///
    /// A `base` starting with `/` resolves against the configured origin and
    /// fails with [`HubError::OriginNotConfigured`] when there is none; any
    /// other `base` must already be absolute and bypasses the origin. Query
    /// pairs are appended URL-encoded in insertion order; an empty query map
    /// leaves the URL untouched.
    pub fn build_url(&self, base: &str, query: &[(String, String)]) -> HubResult<Url> {
        let mut url = if base.starts_with('/') {
            let origin = self
                .config
                .origin
                .as_ref()
                .ok_or(HubError::OriginNotConfigured)?;
            origin
                .join(base)
                .map_err(|e| HubError::InvalidUrl(format!("{base}: {e}")))?
        } else {
            Url::parse(base).map_err(|e| HubError::InvalidUrl(format!("{base}: {e}")))?
        };

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issues a GET against `base` (origin-relative or absolute).
    pub async fn get(&self, base: &str, options: RequestOptions) -> HubResult<Value> {
        let url = self.build_url(base, &options.query)?;
        self.request(Method::Get, url, options.headers, options.body)
            .await
    }

    /// Issues a POST against `base` (origin-relative or absolute).
    pub async fn post(&self, base: &str, options: RequestOptions) -> HubResult<Value> {
        let url = self.build_url(base, &options.query)?;
        self.request(Method::Post, url, options.headers, options.body)
            .await
    }

    /// Executes a request and decodes the body.
    ///
    /// A body that is not valid JSON decodes to `Value::Null` rather than
    /// erroring. A failure status maps to [`HubError::Http`] carrying the
    /// server's `errorMessage` field, or a decode-failure indicator when the
    /// error body itself was unreadable.
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> HubResult<Value> {
        debug!(method = method.as_str(), url = %url, "hub request");
        let request = HttpRequest {
            method,
            url: url.clone(),
            headers,
            body,
        };

        let response = match self.exchange.execute(request).await {
            Ok(response) => response,
            Err(error) => {
                debug!(url = %url, error = %error, "hub request did not complete");
                return Err(error);
            }
        };

        let decoded: Value = serde_json::from_str(&response.body).unwrap_or(Value::Null);

        if !response.is_success() {
            let message = decoded
                .get("errorMessage")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    if decoded.is_null() {
                        "unreadable error body".to_string()
                    } else {
                        "request rejected".to_string()
                    }
                });
            debug!(url = %url, status = response.status, "hub request rejected");
            return Err(HubError::Http {
                status: response.status,
                message,
            });
        }

        debug!(url = %url, status = response.status, "hub request ok");
        Ok(decoded)
    }
}
