//! Error types shared across the hublens crates.
//!
//! Hard failures travel through [`HubError`]; soft failures (absent
//! relations, transient fetch problems) are collapsed to `None` or an empty
//! collection before they reach a caller and never appear here.

use thiserror::Error;

/// Errors that can occur while talking to the Hub.
#[derive(Error, Debug, Clone)]
pub enum HubError {
    /// No Hub origin has been configured; every origin-relative operation
    /// fails fast with this before any I/O.
    #[error("Hub origin is not configured")]
    OriginNotConfigured,

    /// The permission collaborator refused access to the origin.
    #[error("permission request for {0} was denied")]
    PermissionDenied(String),

    /// A request URL could not be built or parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request never produced an HTTP response.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a failure status. `message` carries the
    /// server-supplied `errorMessage` field, or a decode-failure indicator
    /// when the error body was not parseable JSON.
    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body violated the wire contract.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A client-side failure that is not the server's fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HubError {
    /// Returns the HTTP status code if this is a server-reported failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            HubError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for Hub operations.
pub type HubResult<T> = Result<T, HubError>;
