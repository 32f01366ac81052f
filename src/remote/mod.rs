//! Client-side mirrors of remote REST collections.
//!
//! Every operation follows the same shape: raise the collection's `loading`
//! flag, await the API call, lower the flag, then either apply the result or
//! log the failure and hand it back to the caller. Nothing is retried.
//! Overlapping calls on the same collection are neither deduplicated nor
//! cancelled, so a slower earlier response can overwrite a later one; callers
//! that need ordering must serialize their own calls.

mod collection;
mod lookbook;

pub use collection::RemoteCollection;
pub use lookbook::*;

use crate::error::RemoteError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::future::Future;

/// A record owned by a remote service.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Payload for creating a new record (no id yet).
    type Draft: Send;

    fn id(&self) -> &str;
}

/// Partial update body: top-level fields replace the record's fields.
pub type ResourcePatch = Map<String, Value>;

/// Pagination and filtering for list calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            filters: BTreeMap::new(),
        }
    }

    pub fn filter(mut self, key: &str, value: &str) -> Self {
        self.filters.insert(key.to_string(), value.to_string());
        self
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<R> {
    pub items: Vec<R>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<R> Page<R> {
    pub fn all(items: Vec<R>) -> Self {
        let total = Some(items.len() as u64);
        Self { items, total }
    }
}

/// CRUD boundary of a remote resource. Each call returns the full record as
/// the backend now stores it.
pub trait ResourceApi<R: Resource>: Send + Sync {
    fn list(&self, query: &ListQuery) -> impl Future<Output = Result<Page<R>, RemoteError>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = Result<R, RemoteError>> + Send;

    fn create(&self, draft: R::Draft) -> impl Future<Output = Result<R, RemoteError>> + Send;

    fn update(
        &self,
        id: &str,
        patch: ResourcePatch,
    ) -> impl Future<Output = Result<R, RemoteError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
