use super::{ListQuery, Resource, ResourceApi, ResourcePatch};
use crate::error::RemoteError;
use parking_lot::{RwLock, RwLockWriteGuard};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug)]
struct CollectionState<R> {
    items: Vec<R>,
    current: Option<R>,
    total: Option<u64>,
    loading: bool,
}

impl<R> Default for CollectionState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
            total: None,
            loading: false,
        }
    }
}

/// Local mirror of one remote collection. Clones share state, so a view can
/// observe `is_loading` while a call is in flight.
#[derive(Debug)]
pub struct RemoteCollection<R> {
    name: &'static str,
    state: Arc<RwLock<CollectionState<R>>>,
}

impl<R> Clone for RemoteCollection<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: Arc::clone(&self.state),
        }
    }
}

impl<R: Resource> RemoteCollection<R> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(RwLock::new(CollectionState::default())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn items(&self) -> Vec<R> {
        self.state.read().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<R> {
        self.state.read().items.iter().find(|r| r.id() == id).cloned()
    }

    /// Record most recently fetched by id.
    pub fn current(&self) -> Option<R> {
        self.state.read().current.clone()
    }

    pub fn total(&self) -> Option<u64> {
        self.state.read().total
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Replaces the local items with one page from the API.
    pub async fn fetch<A: ResourceApi<R>>(
        &self,
        api: &A,
        query: &ListQuery,
    ) -> Result<Vec<R>, RemoteError> {
        let page = self
            .track("list", api.list(query), |state, page| {
                state.items = page.items.clone();
                state.total = page.total;
            })
            .await?;
        Ok(page.items)
    }

    /// Fetches one record, makes it `current` and refreshes it in `items`.
    pub async fn fetch_one<A: ResourceApi<R>>(&self, api: &A, id: &str) -> Result<R, RemoteError> {
        self.track("get", api.get(id), |state, record| {
            upsert(&mut state.items, record);
            state.current = Some(record.clone());
        })
        .await
    }

    pub async fn create<A: ResourceApi<R>>(
        &self,
        api: &A,
        draft: R::Draft,
    ) -> Result<R, RemoteError> {
        self.track("create", api.create(draft), |state, record| {
            state.items.push(record.clone());
            state.total = state.total.map(|t| t + 1);
        })
        .await
    }

    pub async fn update<A: ResourceApi<R>>(
        &self,
        api: &A,
        id: &str,
        patch: ResourcePatch,
    ) -> Result<R, RemoteError> {
        self.track("update", api.update(id, patch), |state, record| {
            upsert(&mut state.items, record);
            if state.current.as_ref().is_some_and(|c| c.id() == record.id()) {
                state.current = Some(record.clone());
            }
        })
        .await
    }

    pub async fn delete<A: ResourceApi<R>>(&self, api: &A, id: &str) -> Result<(), RemoteError> {
        self.track("delete", api.delete(id), |state, _| {
            let before = state.items.len();
            state.items.retain(|r| r.id() != id);
            if state.items.len() < before {
                state.total = state.total.map(|t| t.saturating_sub(1));
            }
            if state.current.as_ref().is_some_and(|c| c.id() == id) {
                state.current = None;
            }
        })
        .await
    }

    async fn track<T, F, A>(&self, op: &'static str, call: F, apply: A) -> Result<T, RemoteError>
    where
        F: Future<Output = Result<T, RemoteError>>,
        A: FnOnce(&mut CollectionState<R>, &T),
    {
        let mut in_flight = InFlight::raise(&self.state);
        let result = call.await;

        let mut state = in_flight.land();
        match &result {
            Ok(value) => {
                apply(&mut *state, value);
                debug!(collection = self.name, op, items = state.items.len(), "remote call applied");
            }
            Err(e) => warn!(collection = self.name, op, error = %e, "remote call failed"),
        }
        result
    }
}

/// Holds `loading` up for one call. Dropping it before [`InFlight::land`]
/// (the caller abandoned the future) still lowers the flag.
struct InFlight<'a, R> {
    state: &'a RwLock<CollectionState<R>>,
    landed: bool,
}

impl<'a, R> InFlight<'a, R> {
    fn raise(state: &'a RwLock<CollectionState<R>>) -> Self {
        state.write().loading = true;
        Self {
            state,
            landed: false,
        }
    }

    fn land(&mut self) -> RwLockWriteGuard<'a, CollectionState<R>> {
        self.landed = true;
        let lock: &'a RwLock<CollectionState<R>> = self.state;
        let mut state = lock.write();
        state.loading = false;
        state
    }
}

impl<R> Drop for InFlight<'_, R> {
    fn drop(&mut self) {
        if !self.landed {
            self.state.write().loading = false;
        }
    }
}

fn upsert<R: Resource>(items: &mut Vec<R>, record: &R) {
    match items.iter_mut().find(|r| r.id() == record.id()) {
        Some(existing) => *existing = record.clone(),
        None => items.push(record.clone()),
    }
}
