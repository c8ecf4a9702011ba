//! The opaque Hub resource model.
//!
//! Every Hub response is JSON whose schema the client deliberately does not
//! pin down. [`Resource`] wraps the raw value and exposes only the parts the
//! client contractually depends on: the embedded link collection keyed by
//! relation name, and field reads by key. Everything else stays opaque.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A server-returned resource.
///
/// Resources are immutable once received; the only permitted writes are
/// local decorations via [`Resource::set_field`] (a resolved details URL, an
/// originating project name). They live for the duration of one composed
/// operation and are then discarded. There is no cache and no identity map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Value);

impl Resource {
    /// Wraps a raw JSON value.
    pub fn new(value: Value) -> Self {
        Resource(value)
    }

    /// Returns every URL the resource offers for `rel`, in document order.
    ///
    /// `None` means the resource does not offer the relation at all, a
    /// legitimate state under the link convention, distinct from a present
    /// relation with an empty target list. The lookup is case-sensitive.
    pub fn links_for(&self, rel: &str) -> Option<Vec<String>> {
        let links = self.link_collection()?;
        let mut urls = Vec::new();
        let mut present = false;
        for entry in links {
            if entry.get("rel").and_then(Value::as_str) != Some(rel) {
                continue;
            }
            present = true;
            match entry.get("href") {
                Some(Value::String(href)) => urls.push(href.clone()),
                Some(Value::Array(hrefs)) => {
                    urls.extend(hrefs.iter().filter_map(Value::as_str).map(String::from));
                }
                _ => {}
            }
        }
        if present {
            Some(urls)
        } else {
            None
        }
    }

    /// Returns the first URL for `rel`, which is authoritative for
    /// singular relations.
    pub fn link(&self, rel: &str) -> Option<String> {
        self.links_for(rel)?.into_iter().next()
    }

    /// Reads a top-level field without committing to a schema.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Reads a top-level string field.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Attaches a locally-derived field to the resource.
    ///
    /// Decoration only; decorated resources are never sent back to the
    /// server. A non-object resource is left untouched.
    pub fn set_field(&mut self, key: &str, value: Value) {
        if let Value::Object(map) = &mut self.0 {
            map.insert(key.to_string(), value);
        }
    }

    /// Whether the underlying value is JSON `null`.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Borrows the raw value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwraps into the raw value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Locates the embedded link collection.
    ///
    /// The Hub keys it as `meta.links`; older responses use `_meta.links`.
    fn link_collection(&self) -> Option<&Vec<Value>> {
        for meta_key in ["meta", "_meta"] {
            if let Some(links) = self
                .0
                .get(meta_key)
                .and_then(|meta| meta.get("links"))
                .and_then(Value::as_array)
            {
                return Some(links);
            }
        }
        None
    }
}

impl From<Value> for Resource {
    fn from(value: Value) -> Self {
        Resource(value)
    }
}

/// The paged-collection shape returned by list fetches.
///
/// A missing `items` field reads as an empty page; callers never see an
/// error from a malformed collection body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<Resource>,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<u64>,
}

impl Page {
    /// Extracts the page from a raw response body, tolerating any shape.
    pub fn from_value(value: &Value) -> Page {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}
