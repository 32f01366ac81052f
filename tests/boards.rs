mod common;

use canvas_store::prelude::*;
use common::*;

#[test]
fn test_board_round_trip_through_save() {
    let mut store = CanvasStore::in_memory();
    let look = store.create_board("Look A", Category::Fashion);
    let other = store.create_board("Teaser", Category::Video);

    store.open_board(&look.id).unwrap();
    let (nodes, edges) = create_chain_graph();
    store.load_graph(nodes.clone(), edges.clone()).unwrap();
    store.save_current_board().unwrap();

    store.open_board(&other.id).unwrap();
    assert!(store.nodes().is_empty());

    store.open_board(&look.id).unwrap();
    assert_eq!(store.nodes(), nodes.as_slice());
    assert_eq!(store.edges(), edges.as_slice());
}

#[test]
fn test_unsaved_edits_do_not_reach_board() {
    let mut store = CanvasStore::in_memory();
    let board = store.create_board("Draft", Category::Image);
    store.open_board(&board.id).unwrap();

    store.add_node(node("A")).unwrap();

    assert!(store.board_registry().board(&board.id).unwrap().nodes.is_empty());
    store.open_board(&board.id).unwrap();
    assert!(store.nodes().is_empty());
}

#[test]
fn test_create_board_defaults() {
    let mut store = CanvasStore::in_memory();
    let board = store.create_board("Fresh", Category::Story);

    assert!(!board.id.is_empty());
    assert_eq!(board.viewport, Viewport::default());
    assert_eq!(board.viewport.zoom, 1.0);
    assert!(board.nodes.is_empty() && board.edges.is_empty());
    assert_eq!(board.created_at, board.updated_at);
    assert!(store.current_board().is_none());
    assert_eq!(store.boards().len(), 1);
}

#[test]
fn test_update_board_refreshes_active_mirror() {
    let mut store = CanvasStore::in_memory();
    let board = store.create_board("Old", Category::Audio);
    store.open_board(&board.id).unwrap();

    let updated = store.update_board(&board.id, BoardPatch::rename("New")).unwrap();

    assert_eq!(updated.name, "New");
    assert!(updated.updated_at >= board.updated_at);
    assert_eq!(store.current_board(), Some(&updated));
    assert_eq!(store.board_registry().board(&board.id), Some(&updated));
}

#[test]
fn test_update_unknown_board_fails() {
    let mut store = CanvasStore::in_memory();
    assert_eq!(
        store.update_board("nope", BoardPatch::rename("x")),
        Err(BoardError::BoardNotFound("nope".to_string()))
    );
}

#[test]
fn test_save_without_active_board_fails() {
    let mut store = CanvasStore::in_memory();
    assert_eq!(store.save_current_board(), Err(BoardError::NoActiveBoard));
}

#[test]
fn test_switching_boards_clears_selection() {
    let mut store = CanvasStore::in_memory();
    let first = store.create_board("One", Category::Image);
    store.update_board(&first.id, BoardPatch::graph(vec![node("A")], Vec::new()))
        .unwrap();
    store.open_board(&first.id).unwrap();
    store.set_selected_nodes(vec!["A".to_string()]);

    store.open_board(&first.id).unwrap();

    assert!(store.selection().is_empty());
}

#[test]
fn test_delete_active_board_resets_graph() {
    let mut store = CanvasStore::in_memory();
    let board = store.create_board("Gone", Category::Mesh3d);
    store.open_board(&board.id).unwrap();
    store.add_node(node("A")).unwrap();
    store.set_selected_nodes(vec!["A".to_string()]);

    let removed = store.delete_board(&board.id).unwrap();

    assert_eq!(removed.id, board.id);
    assert!(store.current_board().is_none());
    assert!(store.nodes().is_empty());
    assert!(store.selection().is_empty());
    assert!(store.delete_board(&board.id).is_none());
}

#[test]
fn test_delete_inactive_board_keeps_graph() {
    let mut store = CanvasStore::in_memory();
    let active = store.create_board("Active", Category::Image);
    let other = store.create_board("Other", Category::Image);
    store.open_board(&active.id).unwrap();
    store.add_node(node("A")).unwrap();

    store.delete_board(&other.id);

    assert_eq!(store.current_board().map(|b| b.id.as_str()), Some(active.id.as_str()));
    assert_eq!(store.nodes().len(), 1);
}

#[test]
fn test_duplicate_board_copies_graph() {
    let mut store = CanvasStore::in_memory();
    let board = store.create_board("Source", Category::Fashion);
    let (nodes, edges) = create_chain_graph();
    store.update_board(&board.id, BoardPatch::graph(nodes, edges)).unwrap();

    let copy = store.duplicate_board(&board.id, "Copy").unwrap();

    assert_ne!(copy.id, board.id);
    assert_eq!(copy.name, "Copy");
    assert_eq!(copy.nodes.len(), 3);
    assert_eq!(copy.edges.len(), 3);
    assert_eq!(store.boards().len(), 2);
    assert_eq!(
        store
            .board_registry()
            .boards_in_category(Category::Fashion)
            .count(),
        2
    );
}
