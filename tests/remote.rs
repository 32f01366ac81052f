mod common;

use canvas_store::error::RemoteError;
use canvas_store::remote::*;
use common::*;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tokio_test::block_on;
use tokio_test::task;

fn store() -> LookbookStore<MockLookbookApi> {
    LookbookStore::new(MockLookbookApi::default())
}

fn draft(name: &str) -> LookbookDraft {
    LookbookDraft {
        name: name.to_string(),
        season: Some("SS26".to_string()),
        ..LookbookDraft::default()
    }
}

#[test]
fn test_create_appends_record() {
    let store = store();

    let created = block_on(store.create_lookbook(draft("Resort"))).unwrap();

    assert_eq!(created.name, "Resort");
    assert_eq!(store.lookbooks().items(), vec![created]);
    assert!(!store.is_loading());
}

#[test]
fn test_failed_create_leaves_collection_unchanged() {
    let store = store();
    block_on(store.create_lookbook(draft("Kept"))).unwrap();
    let before = store.lookbooks().items();

    store.api().fail_with(RemoteError::Backend {
        status: 500,
        message: "boom".to_string(),
    });
    let result = block_on(store.create_lookbook(draft("Lost")));

    assert!(matches!(result, Err(RemoteError::Backend { status: 500, .. })));
    assert!(!store.lookbooks().is_loading());
    assert_eq!(store.lookbooks().items(), before);
}

#[test]
fn test_loading_flag_is_raised_during_call() {
    let store = store();
    let observed = Arc::new(Mutex::new(Vec::new()));
    let garments = store.garments().clone();
    let lookbooks = store.lookbooks().clone();
    let sink = Arc::clone(&observed);
    store
        .api()
        .set_probe(move || sink.lock().push((garments.is_loading(), lookbooks.is_loading())));

    block_on(store.fetch_garments(&ListQuery::default())).unwrap();

    // Only the garments collection was busy.
    assert_eq!(*observed.lock(), vec![(true, false)]);
    assert!(!store.garments().is_loading());
}

#[test]
fn test_fetch_replaces_items_with_page() {
    let store = store();
    for name in ["a", "b", "c"] {
        block_on(store.create_colorway(ColorwayDraft {
            name: name.to_string(),
            colors: vec!["#000000".to_string()],
        }))
        .unwrap();
    }

    let page = block_on(store.fetch_colorways(&ListQuery::page(2, 2))).unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(store.colorways().len(), 1);
    assert_eq!(store.colorways().items()[0].name, "c");
    assert_eq!(store.colorways().total(), Some(3));
}

#[test]
fn test_update_refreshes_item_and_current() {
    let store = store();
    let garment = block_on(store.create_garment(GarmentDraft {
        name: "Trench".to_string(),
        category: "outerwear".to_string(),
        ..GarmentDraft::default()
    }))
    .unwrap();
    block_on(store.fetch_garment(&garment.id)).unwrap();

    let mut patch = ResourcePatch::new();
    patch.insert("name".to_string(), json!("Long Trench"));
    let updated = block_on(store.update_garment(&garment.id, patch)).unwrap();

    assert_eq!(updated.name, "Long Trench");
    assert_eq!(store.garments().find(&garment.id), Some(updated.clone()));
    assert_eq!(store.garments().current(), Some(updated));
}

#[test]
fn test_delete_removes_item() {
    let store = store();
    let outfit = block_on(store.create_outfit(OutfitDraft {
        name: "Look 1".to_string(),
        lookbook_id: Some("lb-1".to_string()),
        ..OutfitDraft::default()
    }))
    .unwrap();
    assert_eq!(store.outfits_in("lb-1").len(), 1);

    block_on(store.delete_outfit(&outfit.id)).unwrap();

    assert!(store.outfits().is_empty());
    assert!(matches!(
        block_on(store.delete_outfit(&outfit.id)),
        Err(RemoteError::NotFound(_))
    ));
}

#[test]
fn test_failed_fetch_keeps_previous_items() {
    let store = store();
    block_on(store.create_lookbook(draft("One"))).unwrap();
    block_on(store.fetch_lookbooks(&ListQuery::default())).unwrap();

    store.api().fail_with(RemoteError::Network("offline".to_string()));
    assert!(block_on(store.fetch_lookbooks(&ListQuery::default())).is_err());
    assert_eq!(store.lookbooks().len(), 1);

    store.api().recover();
    assert!(block_on(store.fetch_lookbook("missing")).is_err());
    assert!(store.lookbooks().current().is_none());
}

#[test]
fn test_abandoned_call_lowers_loading_flag() {
    let store = store();
    block_on(store.create_garment(GarmentDraft {
        name: "Blazer".to_string(),
        category: "outerwear".to_string(),
        ..GarmentDraft::default()
    }))
    .unwrap();
    store.api().stall();

    let query = ListQuery::default();
    let mut pending = task::spawn(store.fetch_garments(&query));
    assert!(pending.poll().is_pending());
    assert!(store.garments().is_loading());

    drop(pending);

    assert!(!store.garments().is_loading());
    assert!(!store.is_loading());
    assert_eq!(store.garments().len(), 1);
}
