//! Collaborator interfaces.
//!
//! The client core treats its host's capabilities as collaborators behind
//! traits: a permission gate consulted before login, and the telemetry sink
//! defined in the telemetry module. The origin's lifecycle (set/cleared) is
//! likewise owned outside the core, which only reads the injected config.

use async_trait::async_trait;
use hublens_core::HubResult;

/// Capability grant gating login.
///
/// Hosts with scoped authority (a browser extension requesting host
/// permissions) implement this against their permission API; any failure
/// propagates as a login failure.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Requests access to the given origin. `Ok(())` grants; an error
    /// aborts the login before any HTTP is issued.
    async fn request_url(&self, origin: &str) -> HubResult<()>;
}

/// Permission gate for hosts with ambient authority: always grants.
pub struct OpenPermissionGate;

#[async_trait]
impl PermissionGate for OpenPermissionGate {
    async fn request_url(&self, _origin: &str) -> HubResult<()> {
        Ok(())
    }
}
