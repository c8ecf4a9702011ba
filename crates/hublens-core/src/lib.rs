//! # hublens-core
//!
//! Domain vocabulary for the hublens Hub client.
//!
//! This crate defines the opaque resource model with its embedded link
//! collection, the paged-collection shape, the shared error channel, and
//! client configuration. The HTTP client itself lives in `hublens-client`.

pub mod config;
pub mod error;
pub mod relations;
pub mod resource;

pub use config::HubConfig;
pub use error::{HubError, HubResult};
pub use resource::{Page, Resource};
