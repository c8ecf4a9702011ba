//! HATEOAS relation resolution.
//!
//! Under the link convention, absence of a relation means the operation is
//! not offered for that resource, a legitimate state rather than an error. The
//! resolver therefore soft-fails: absent relations and transport failures
//! both collapse to `None` (or an empty list) at the boundary, and neither
//! ever aborts a larger composed graph read. The internal
//! [`RelationOutcome`] keeps the two cases apart for tests.

use crate::client::HubClient;
use crate::transport::RequestOptions;
use hublens_core::{HubError, Page, Resource};
use serde_json::Value;
use tracing::{debug, trace};

/// Query parameter carrying the page-size override on relation fetches.
pub const PAGE_SIZE_PARAM: &str = "limit";

/// Internal result of resolving one relation.
#[derive(Debug)]
pub(crate) enum RelationOutcome {
    /// The relation was present and its target fetched.
    Resolved(Value),
    /// The resource does not offer the relation (no link, or no target URL).
    Absent,
    /// The relation was present but the fetch failed.
    Failed(HubError),
}

impl HubClient {
    /// Resolves `rel` on `resource`, keeping absence and failure distinct.
    pub(crate) async fn resolve_relation(
        &self,
        resource: &Resource,
        rel: &str,
    ) -> RelationOutcome {
        let url = match resource.links_for(rel) {
            None => return RelationOutcome::Absent,
            // First URL is authoritative; a present relation with no
            // target offers nothing to fetch.
            Some(urls) => match urls.into_iter().next() {
                None => return RelationOutcome::Absent,
                Some(url) => url,
            },
        };

        let options = RequestOptions::new()
            .query(PAGE_SIZE_PARAM, &self.config().page_size.to_string());
        match self.transport().get(&url, options).await {
            Ok(value) => RelationOutcome::Resolved(value),
            Err(error) => RelationOutcome::Failed(error),
        }
    }

    /// Fetches the resource behind the named relation.
    ///
    /// Returns `None` without touching the network when the relation is
    /// absent, and `None` on any transport failure. Callers treat `None` as
    /// "no data", never "broken".
    pub async fn get_relation(&self, resource: &Resource, rel: &str) -> Option<Value> {
        match self.resolve_relation(resource, rel).await {
            RelationOutcome::Resolved(value) => Some(value),
            RelationOutcome::Absent => {
                trace!(rel, "relation not offered");
                None
            }
            RelationOutcome::Failed(error) => {
                debug!(rel, error = %error, "relation fetch failed");
                None
            }
        }
    }

    /// Fetches a list relation.
    ///
    /// Returns `[]` exactly when [`HubClient::get_relation`] returns `None`;
    /// otherwise the collection's `items` verbatim.
    pub async fn get_list_relation(&self, resource: &Resource, rel: &str) -> Vec<Resource> {
        match self.get_relation(resource, rel).await {
            None => Vec::new(),
            Some(value) => Page::from_value(&value).items,
        }
    }
}
