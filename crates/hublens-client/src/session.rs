//! Session operations.
//!
//! Login state is inferred, never stored: the client is "connected" exactly
//! when the current-user probe succeeds with a non-empty body. Login and
//! logout only check that their HTTP call did not fail; response bodies are
//! not inspected.

use crate::client::HubClient;
use crate::transport::RequestOptions;
use hublens_core::{HubError, HubResult, Resource};
use tracing::{debug, info, instrument};
use url::form_urlencoded;

/// Identity probe path.
pub const CURRENT_USER_PATH: &str = "/api/v1/currentuser";

/// Form-login path.
pub const SECURITY_CHECK_PATH: &str = "/j_spring_security_check";

/// Logout path.
pub const SECURITY_LOGOUT_PATH: &str = "/j_spring_security_logout";

impl HubClient {
    /// Fetches the currently authenticated user, soft-failing to `None`.
    ///
    /// A JSON `null` body counts as "no user".
    pub async fn current_user(&self) -> Option<Resource> {
        match self.transport().get(CURRENT_USER_PATH, RequestOptions::new()).await {
            Ok(value) if !value.is_null() => Some(Resource::new(value)),
            Ok(_) => None,
            Err(error) => {
                debug!(error = %error, "current user probe failed");
                None
            }
        }
    }

    /// Whether an authenticated session is active.
    pub async fn is_connected(&self) -> bool {
        self.current_user().await.is_some()
    }

    /// Logs in with form credentials.
    ///
    /// Fails fast with [`HubError::OriginNotConfigured`] before any I/O when
    /// no origin is set. The permission gate must then grant access to the
    /// origin; a denial aborts the login with no HTTP issued. Finally posts
    /// `j_username`/`j_password` form-urlencoded to the security-check path.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> HubResult<()> {
        let origin = self
            .config()
            .origin
            .clone()
            .ok_or(HubError::OriginNotConfigured)?;

        self.permissions().request_url(origin.as_str()).await?;

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("j_username", username)
            .append_pair("j_password", password)
            .finish();
        self.transport()
            .post(
                SECURITY_CHECK_PATH,
                RequestOptions::new()
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(body),
            )
            .await?;

        info!(origin = %origin, "logged in");
        Ok(())
    }

    /// Ends the session.
    pub async fn logout(&self) -> HubResult<()> {
        self.transport()
            .get(SECURITY_LOGOUT_PATH, RequestOptions::new())
            .await?;
        info!("logged out");
        Ok(())
    }
}
