//! Common test utilities: graph builders, a mock lookbook backend and
//! storage backends that misbehave on purpose.
use canvas_store::error::{PersistenceError, RemoteError};
use canvas_store::graph::GraphStore;
use canvas_store::model::{CanvasEdge, CanvasNode};
use canvas_store::persistence::StateStorage;
use canvas_store::remote::*;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Creates a plain node of a generic kind.
#[allow(dead_code)]
pub fn node(id: &str) -> CanvasNode {
    CanvasNode::new(id, "imageGen")
}

#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> CanvasEdge {
    CanvasEdge::new(format!("{}-{}", source, target), source, target)
}

/// A -> B -> C chain plus A -> C.
#[allow(dead_code)]
pub fn create_chain_graph() -> (Vec<CanvasNode>, Vec<CanvasEdge>) {
    (
        vec![node("A"), node("B"), node("C")],
        vec![edge("A", "B"), edge("B", "C"), edge("A", "C")],
    )
}

/// Asserts that every edge endpoint and every selected id exists.
#[allow(dead_code)]
pub fn assert_consistent(graph: &GraphStore) {
    assert!(
        graph.validate().is_empty(),
        "dangling edges: {:?}",
        graph.validate()
    );
    for id in graph.selection().selected_nodes() {
        assert!(graph.node(id).is_some(), "selected node '{}' is gone", id);
    }
    for id in graph.selection().selected_edges() {
        assert!(graph.edge(id).is_some(), "selected edge '{}' is gone", id);
    }
}

/// Storage whose writes always fail.
#[allow(dead_code)]
pub struct FailingStorage;

impl StateStorage for FailingStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(None)
    }

    fn write(&self, key: &str, _payload: &str) -> Result<(), PersistenceError> {
        Err(PersistenceError::Io {
            key: key.to_string(),
            source: std::io::Error::other("disk full"),
        })
    }

    fn remove(&self, _key: &str) -> Result<(), PersistenceError> {
        Ok(())
    }
}

// --- Mock lookbook backend ---

type Probe = Box<dyn Fn() + Send>;

/// In-memory stand-in for the lookbook service.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockLookbookApi {
    pub lookbooks: Mutex<Vec<Lookbook>>,
    pub garments: Mutex<Vec<Garment>>,
    pub colorways: Mutex<Vec<Colorway>>,
    pub outfits: Mutex<Vec<Outfit>>,
    failure: Mutex<Option<RemoteError>>,
    probe: Mutex<Option<Probe>>,
    stalled: AtomicBool,
    next_id: AtomicU64,
}

#[allow(dead_code)]
impl MockLookbookApi {
    /// Makes every following call fail with `error`.
    pub fn fail_with(&self, error: RemoteError) {
        *self.failure.lock() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// Runs `probe` inside every call, while the caller's loading flag is up.
    pub fn set_probe<F: Fn() + Send + 'static>(&self, probe: F) {
        *self.probe.lock() = Some(Box::new(probe));
    }

    /// Makes every following call wait forever, like a request that never
    /// gets a response.
    pub fn stall(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    async fn respond(&self) -> Result<(), RemoteError> {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.enter()
    }

    fn enter(&self) -> Result<(), RemoteError> {
        if let Some(probe) = self.probe.lock().as_ref() {
            probe();
        }
        match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Ties each resource to its table in the mock and to its draft conversion.
pub trait MockRecord: Resource + Serialize + DeserializeOwned {
    const PREFIX: &'static str;
    fn table(api: &MockLookbookApi) -> &Mutex<Vec<Self>>;
    fn from_draft(id: String, draft: Self::Draft) -> Self;
}

impl MockRecord for Lookbook {
    const PREFIX: &'static str = "lb";
    fn table(api: &MockLookbookApi) -> &Mutex<Vec<Self>> {
        &api.lookbooks
    }
    fn from_draft(id: String, d: LookbookDraft) -> Self {
        Lookbook {
            id,
            name: d.name,
            description: d.description,
            season: d.season,
            outfit_ids: Vec::new(),
        }
    }
}

impl MockRecord for Garment {
    const PREFIX: &'static str = "gm";
    fn table(api: &MockLookbookApi) -> &Mutex<Vec<Self>> {
        &api.garments
    }
    fn from_draft(id: String, d: GarmentDraft) -> Self {
        Garment {
            id,
            name: d.name,
            category: d.category,
            colorway_ids: d.colorway_ids,
            image_url: d.image_url,
        }
    }
}

impl MockRecord for Colorway {
    const PREFIX: &'static str = "cw";
    fn table(api: &MockLookbookApi) -> &Mutex<Vec<Self>> {
        &api.colorways
    }
    fn from_draft(id: String, d: ColorwayDraft) -> Self {
        Colorway {
            id,
            name: d.name,
            colors: d.colors,
        }
    }
}

impl MockRecord for Outfit {
    const PREFIX: &'static str = "of";
    fn table(api: &MockLookbookApi) -> &Mutex<Vec<Self>> {
        &api.outfits
    }
    fn from_draft(id: String, d: OutfitDraft) -> Self {
        Outfit {
            id,
            name: d.name,
            garment_ids: d.garment_ids,
            lookbook_id: d.lookbook_id,
        }
    }
}

impl<R: MockRecord> ResourceApi<R> for MockLookbookApi {
    async fn list(&self, query: &ListQuery) -> Result<Page<R>, RemoteError> {
        self.respond().await?;
        let all = R::table(self).lock().clone();
        let total = all.len() as u64;
        let items = match (query.page, query.per_page) {
            (Some(page), Some(per_page)) => all
                .into_iter()
                .skip((page.saturating_sub(1) * per_page) as usize)
                .take(per_page as usize)
                .collect(),
            _ => all,
        };
        Ok(Page {
            items,
            total: Some(total),
        })
    }

    async fn get(&self, id: &str) -> Result<R, RemoteError> {
        self.respond().await?;
        R::table(self)
            .lock()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))
    }

    async fn create(&self, draft: R::Draft) -> Result<R, RemoteError> {
        self.respond().await?;
        let record = R::from_draft(self.fresh_id(R::PREFIX), draft);
        R::table(self).lock().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, patch: ResourcePatch) -> Result<R, RemoteError> {
        self.respond().await?;
        let mut table = R::table(self).lock();
        let existing = table
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        let mut value =
            serde_json::to_value(&*existing).map_err(|e| RemoteError::Decode(e.to_string()))?;
        if let Some(object) = value.as_object_mut() {
            object.extend(patch);
        }
        let updated: R =
            serde_json::from_value(value).map_err(|e| RemoteError::Decode(e.to_string()))?;
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.respond().await?;
        let mut table = R::table(self).lock();
        let before = table.len();
        table.retain(|r| r.id() != id);
        if table.len() == before {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
