//! Client configuration.
//!
//! The Hub origin is injected here by whatever owns its lifecycle (a config
//! file, a host preference store); the client only ever reads it. An unset
//! origin is an explicit state, not an empty-string sentinel, and every
//! origin-relative operation fails fast against it.

use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for a Hub client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Base URL for origin-relative requests. `None` means not configured.
    #[serde(default)]
    pub origin: Option<Url>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Page-size override applied to list fetches, requesting "all" rows in
    /// one page. Result sets beyond this cap are truncated by the server.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// User-Agent header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10000
}

fn default_user_agent() -> String {
    format!("hublens/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            origin: None,
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            user_agent: default_user_agent(),
        }
    }
}

impl HubConfig {
    /// Creates a configuration pointing at the given origin.
    pub fn with_origin(origin: Url) -> Self {
        Self {
            origin: Some(origin),
            ..Self::default()
        }
    }

    /// The configured origin rendered without a trailing slash, for
    /// composing display URLs.
    pub fn origin_str(&self) -> Option<String> {
        self.origin
            .as_ref()
            .map(|origin| origin.as_str().trim_end_matches('/').to_string())
    }
}
