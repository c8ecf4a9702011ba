//! # hublens-client
//!
//! Client façade over the Hub software-composition-analysis REST API.
//!
//! The Hub follows the HATEOAS convention: every resource embeds a link
//! collection keyed by relation name, and this crate discovers, follows,
//! paginates, and gracefully degrades across those links to reconstruct
//! cross-resource graphs (components → BOM entries → policy violations /
//! vulnerabilities / reference projects). Session and telemetry operations
//! sit alongside on the same transport.

pub mod client;
pub mod components;
pub mod resolver;
pub mod session;
pub mod telemetry;
pub mod testing;
pub mod traits;
pub mod transport;

pub use client::HubClient;
pub use components::COMPONENT_SEARCH_PATH;
pub use resolver::PAGE_SIZE_PARAM;
pub use session::{CURRENT_USER_PATH, SECURITY_CHECK_PATH, SECURITY_LOGOUT_PATH};
pub use telemetry::{
    ChannelTelemetrySink, NullTelemetrySink, PhoneHomePayload, TelemetrySink, PRODUCT_NAME,
};
pub use traits::{OpenPermissionGate, PermissionGate};
pub use transport::{
    HttpExchange, HttpRequest, HubTransport, Method, RawResponse, ReqwestExchange, RequestOptions,
};

// Re-export the domain vocabulary so most callers need only this crate.
pub use hublens_core::{relations, HubConfig, HubError, HubResult, Page, Resource};
