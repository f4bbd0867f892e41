use rusqlite::Connection;
use taskflow_core::db::open_db_in_memory;
use taskflow_core::{
    resolve_sortable_drop, Block, DocumentStore, DropOutcome, PositionalDrag,
    SqliteDocumentRepository,
};
use uuid::Uuid;

fn open_store(conn: &Connection) -> DocumentStore<SqliteDocumentRepository<'_>> {
    DocumentStore::open(SqliteDocumentRepository::try_new(conn).unwrap())
}

fn seed_three(store: &mut DocumentStore<SqliteDocumentRepository<'_>>) -> (Block, Block, Block) {
    let a = Block::heading("a");
    let b = Block::paragraph("b");
    let c = Block::todo("c");
    store.add_block(a.clone(), None);
    store.add_block(b.clone(), None);
    store.add_block(c.clone(), None);
    (a, b, c)
}

fn order(store: &DocumentStore<SqliteDocumentRepository<'_>>) -> Vec<Uuid> {
    store.blocks().iter().map(|block| block.id).collect()
}

#[test]
fn sortable_drop_relocates_source_to_target_position() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (a, b, c) = seed_three(&mut store);

    let outcome = resolve_sortable_drop(&mut store, a.id, c.id);

    assert_eq!(outcome, DropOutcome::Moved { from: 0, to: 2 });
    assert_eq!(order(&store), vec![b.id, c.id, a.id]);
}

#[test]
fn sortable_drop_moves_backwards_too() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (a, b, c) = seed_three(&mut store);

    let outcome = resolve_sortable_drop(&mut store, c.id, a.id);

    assert_eq!(outcome, DropOutcome::Moved { from: 2, to: 0 });
    assert_eq!(order(&store), vec![c.id, a.id, b.id]);
}

#[test]
fn sortable_drop_with_vanished_source_is_cancelled() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (_, b, _) = seed_three(&mut store);
    let before = order(&store);

    let outcome = resolve_sortable_drop(&mut store, Uuid::new_v4(), b.id);

    assert_eq!(outcome, DropOutcome::Cancelled);
    assert_eq!(order(&store), before);
}

#[test]
fn sortable_drop_with_vanished_target_is_cancelled() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (a, _, _) = seed_three(&mut store);
    let before = order(&store);

    let outcome = resolve_sortable_drop(&mut store, a.id, Uuid::new_v4());

    assert_eq!(outcome, DropOutcome::Cancelled);
    assert_eq!(order(&store), before);
}

#[test]
fn sortable_drop_onto_itself_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (a, _, _) = seed_three(&mut store);
    let before = order(&store);

    let outcome = resolve_sortable_drop(&mut store, a.id, a.id);

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(order(&store), before);
}

#[test]
fn positional_drag_cannot_begin_out_of_range() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    seed_three(&mut store);

    assert!(PositionalDrag::begin(&store, 3).is_none());
}

#[test]
fn positional_drag_moves_the_captured_block() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (a, b, c) = seed_three(&mut store);

    let drag = PositionalDrag::begin(&store, 0).unwrap();
    assert_eq!(drag.source(), a.id);

    let outcome = drag.complete(&mut store, 2).unwrap();

    assert_eq!(outcome, DropOutcome::Moved { from: 0, to: 2 });
    assert_eq!(order(&store), vec![b.id, c.id, a.id]);
}

#[test]
fn positional_drag_tracks_identity_through_mid_drag_insertion() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (a, b, c) = seed_three(&mut store);

    let drag = PositionalDrag::begin(&store, 1).unwrap();
    assert_eq!(drag.source(), b.id);

    // A block inserted at the front shifts every position mid-drag.
    let late = Block::paragraph("late arrival");
    store.add_block(late.clone(), Some(0));

    let outcome = drag.complete(&mut store, 0).unwrap();

    assert_eq!(outcome, DropOutcome::Moved { from: 2, to: 0 });
    assert_eq!(order(&store), vec![b.id, late.id, a.id, c.id]);
}

#[test]
fn positional_drag_cancels_when_source_is_removed_mid_drag() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (a, b, c) = seed_three(&mut store);

    let drag = PositionalDrag::begin(&store, 0).unwrap();
    store.remove_block(a.id);

    let outcome = drag.complete(&mut store, 1).unwrap();

    assert_eq!(outcome, DropOutcome::Cancelled);
    assert_eq!(order(&store), vec![b.id, c.id]);
}

#[test]
fn positional_drag_clamps_drop_position_after_mid_drag_removal() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let (a, b, c) = seed_three(&mut store);

    let drag = PositionalDrag::begin(&store, 0).unwrap();
    store.remove_block(c.id);

    let outcome = drag.complete(&mut store, 9).unwrap();

    assert_eq!(outcome, DropOutcome::Moved { from: 0, to: 1 });
    assert_eq!(order(&store), vec![b.id, a.id]);
}

#[test]
fn positional_drag_onto_current_position_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    seed_three(&mut store);
    let before = order(&store);

    let drag = PositionalDrag::begin(&store, 1).unwrap();
    let outcome = drag.complete(&mut store, 1).unwrap();

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(order(&store), before);
}

#[test]
fn abandoned_positional_drag_is_a_complete_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    seed_three(&mut store);
    let before = order(&store);

    let drag = PositionalDrag::begin(&store, 2).unwrap();
    drop(drag);

    assert_eq!(order(&store), before);
}
