use super::*;

fn entity(id: EntityId, x: i32, y: i32) -> Entity {
    Entity {
        id,
        kind: EntityKind::Block,
        cell: Cell::new(x, y),
        color_class: 0,
        status: EntityStatus::Added,
    }
}

// =============================================================
// insert / remove
// =============================================================

#[test]
fn new_store_is_empty() {
    let store: EntityStore<u32> = EntityStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert!(store.is_consistent());
}

#[test]
fn insert_indexes_by_id_and_cell() {
    let mut store: EntityStore<u32> = EntityStore::new();
    let displaced = store.insert(entity(7, 1, 1));
    assert!(displaced.is_empty());
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(7).map(|e| e.cell), Some(Cell::new(1, 1)));
    assert_eq!(store.id_at(Cell::new(1, 1)), Some(7));
    assert_eq!(store.at(Cell::new(1, 1)).map(|e| e.id), Some(7));
    assert!(store.is_consistent());
}

#[test]
fn insert_same_id_displaces_previous_slot() {
    let mut store: EntityStore<u32> = EntityStore::new();
    store.insert(entity(7, 1, 1));
    store.attach(7, 100);
    let displaced = store.insert(entity(7, 2, 2));
    assert_eq!(displaced.len(), 1);
    assert_eq!(displaced[0].drawable, Some(100));
    assert_eq!(store.len(), 1);
    assert_eq!(store.id_at(Cell::new(1, 1)), None);
    assert_eq!(store.id_at(Cell::new(2, 2)), Some(7));
    assert!(store.is_consistent());
}

#[test]
fn insert_into_occupied_cell_evicts_occupant() {
    let mut store: EntityStore<u32> = EntityStore::new();
    store.insert(entity(1, 0, 0));
    let displaced = store.insert(entity(2, 0, 0));
    assert_eq!(displaced.len(), 1);
    assert_eq!(displaced[0].entity.id, 1);
    assert!(!store.contains(1));
    assert_eq!(store.id_at(Cell::new(0, 0)), Some(2));
    assert!(store.is_consistent());
}

#[test]
fn remove_clears_cell_and_returns_drawable() {
    let mut store: EntityStore<u32> = EntityStore::new();
    store.insert(entity(7, 1, 1));
    assert_eq!(store.attach(7, 5), None);
    let slot = store.remove(7).expect("slot");
    assert_eq!(slot.drawable, Some(5));
    assert!(store.is_empty());
    assert_eq!(store.id_at(Cell::new(1, 1)), None);
    assert!(store.is_consistent());
}

#[test]
fn remove_unknown_is_none() {
    let mut store: EntityStore<u32> = EntityStore::new();
    store.insert(entity(1, 0, 0));
    assert!(store.remove(99).is_none());
    assert_eq!(store.len(), 1);
}

// =============================================================
// relocate / status / attach
// =============================================================

#[test]
fn relocate_moves_cell_entry() {
    let mut store: EntityStore<u32> = EntityStore::new();
    store.insert(entity(1, 0, 0));
    assert!(store.relocate(1, Cell::new(2, 1)).is_none());
    assert_eq!(store.id_at(Cell::new(0, 0)), None);
    assert_eq!(store.id_at(Cell::new(2, 1)), Some(1));
    assert_eq!(store.get(1).map(|e| e.cell), Some(Cell::new(2, 1)));
    assert!(store.is_consistent());
}

#[test]
fn relocate_onto_occupied_cell_evicts() {
    let mut store: EntityStore<u32> = EntityStore::new();
    store.insert(entity(1, 0, 0));
    store.insert(entity(2, 1, 0));
    let evicted = store.relocate(1, Cell::new(1, 0)).expect("evicted");
    assert_eq!(evicted.entity.id, 2);
    assert_eq!(store.len(), 1);
    assert!(store.is_consistent());
}

#[test]
fn relocate_same_cell_or_unknown_is_noop() {
    let mut store: EntityStore<u32> = EntityStore::new();
    store.insert(entity(1, 0, 0));
    assert!(store.relocate(1, Cell::new(0, 0)).is_none());
    assert!(store.relocate(9, Cell::new(3, 3)).is_none());
    assert_eq!(store.id_at(Cell::new(3, 3)), None);
    assert!(store.is_consistent());
}

#[test]
fn set_status_known_and_unknown() {
    let mut store: EntityStore<u32> = EntityStore::new();
    store.insert(entity(1, 0, 0));
    assert!(store.set_status(1, EntityStatus::Selected));
    assert_eq!(store.get(1).map(|e| e.status), Some(EntityStatus::Selected));
    assert!(!store.set_status(2, EntityStatus::Selected));
}

#[test]
fn attach_unknown_returns_none_and_drops_nothing() {
    let mut store: EntityStore<u32> = EntityStore::new();
    assert_eq!(store.attach(1, 5), None);
    assert!(store.slot(1).is_none());
}

#[test]
fn sorted_entities_orders_by_id() {
    let mut store: EntityStore<u32> = EntityStore::new();
    store.insert(entity(9, 0, 0));
    store.insert(entity(2, 1, 0));
    store.insert(entity(5, 2, 0));
    let ids: Vec<EntityId> = store.sorted_entities().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 5, 9]);
}

#[test]
fn many_operations_keep_index_consistent() {
    let mut store: EntityStore<u32> = EntityStore::new();
    for id in 0..20u64 {
        let x = i32::try_from(id % 4).unwrap_or(0);
        let y = i32::try_from(id % 3).unwrap_or(0);
        store.insert(entity(id, x, y));
        assert!(store.is_consistent());
    }
    for id in (0..20u64).step_by(3) {
        store.remove(id);
        store.relocate(id + 1, Cell::new(5, 5));
        assert!(store.is_consistent());
    }
}
