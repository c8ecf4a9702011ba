//! Testing harness for the Hub client.
//!
//! Provides a scripted [`MockExchange`] plus builders for configs, clients,
//! and link-carrying resources, so operation tests can assert on both
//! results and the exact requests that were (or were not) issued.

use crate::client::HubClient;
use crate::traits::PermissionGate;
use crate::transport::{HttpExchange, HttpRequest, RawResponse};
use async_trait::async_trait;
use hublens_core::{HubConfig, HubError, HubResult, Resource};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use url::Url;

/// Scripted HTTP exchange.
///
/// Routes are matched by URL prefix (longest prefix wins, so a canned
/// collection and one of its members can coexist). Every executed request is
/// recorded for verification, including requests that matched no route.
#[derive(Default)]
pub struct MockExchange {
    routes: Mutex<Vec<(String, HubResult<RawResponse>)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` as JSON with status 200 for URLs under `url_prefix`.
    pub fn respond_json(&self, url_prefix: &str, body: Value) {
        self.respond_status(url_prefix, 200, &body.to_string());
    }

    /// Serves a raw body with the given status for URLs under `url_prefix`.
    pub fn respond_status(&self, url_prefix: &str, status: u16, body: &str) {
        self.routes.lock().unwrap().push((
            url_prefix.to_string(),
            Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
        ));
    }

    /// Fails requests under `url_prefix` before any HTTP response exists.
    pub fn fail_with(&self, url_prefix: &str, error: HubError) {
        self.routes
            .lock()
            .unwrap()
            .push((url_prefix.to_string(), Err(error)));
    }

    /// Every request executed so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpExchange for MockExchange {
    async fn execute(&self, request: HttpRequest) -> HubResult<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let routes = self.routes.lock().unwrap();
        let url = request.url.as_str();
        routes
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| {
                Err(HubError::Http {
                    status: 404,
                    message: format!("no mock route for {url}"),
                })
            })
    }
}

/// Permission gate that refuses every origin.
pub struct DenyingPermissionGate;

#[async_trait]
impl PermissionGate for DenyingPermissionGate {
    async fn request_url(&self, origin: &str) -> HubResult<()> {
        Err(HubError::PermissionDenied(origin.to_string()))
    }
}

/// Creates a config pointing at the given origin.
pub fn test_config(origin: &str) -> HubConfig {
    HubConfig::with_origin(Url::parse(origin).expect("valid test origin"))
}

/// Creates a client over a fresh [`MockExchange`], returning both.
pub fn mock_client(origin: &str) -> (HubClient, Arc<MockExchange>) {
    let exchange = Arc::new(MockExchange::new());
    let client = HubClient::with_exchange(test_config(origin), exchange.clone());
    (client, exchange)
}

/// Builds a resource whose link collection carries the given relations.
pub fn resource_with_links(links: &[(&str, &str)]) -> Resource {
    let entries: Vec<Value> = links
        .iter()
        .map(|(rel, href)| json!({ "rel": rel, "href": href }))
        .collect();
    Resource::new(json!({ "meta": { "links": entries } }))
}

/// Wraps items in the paged-collection shape.
pub fn collection(items: Vec<Value>) -> Value {
    json!({ "totalCount": items.len(), "items": items })
}
