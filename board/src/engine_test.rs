#![allow(clippy::float_cmp)]

use wire::{EntityId, EntityKind, EntityStatus, EntityUpdate, PlayerId, PlayerStatus, PlayerUpdate};

use super::*;
use crate::scene::Scene;

// =============================================================
// Helpers
// =============================================================

fn engine() -> Engine<Scene> {
    Engine::new(Scene::new(), 310.0, 310.0)
}

fn board_3x3() -> Engine<Scene> {
    let mut engine = engine();
    engine.set_board_type(3, 3);
    engine
}

fn ent(id: EntityId, x: i32, y: i32, status: EntityStatus) -> EntityUpdate {
    EntityUpdate {
        id,
        status,
        kind: EntityKind::Block,
        grid_x: Some(x),
        grid_y: Some(y),
        color_class: 0,
    }
}

fn bare(id: EntityId, status: EntityStatus) -> EntityUpdate {
    EntityUpdate {
        id,
        status,
        kind: EntityKind::Block,
        grid_x: None,
        grid_y: None,
        color_class: 0,
    }
}

fn player(id: PlayerId, status: PlayerStatus, score: Option<i64>) -> PlayerUpdate {
    PlayerUpdate { id, status, name: None, score }
}

fn rect_of(engine: &Engine<Scene>, id: EntityId) -> RectSpec {
    let handle = engine.drawable(id).expect("drawable");
    engine.surface().rect(handle).expect("live rect").clone()
}

fn live_drawables(engine: &Engine<Scene>) -> usize {
    engine.surface().rect_count()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_engine_is_empty_and_provisional() {
    let engine = engine();
    assert_eq!(engine.entity_count(), 0);
    assert!(engine.players().is_empty());
    assert!(!engine.grid().is_ready());
    assert_eq!(engine.surface().size(), (310.0, 310.0));
    assert_eq!(engine.stats(), EngineStats::default());
}

#[test]
fn set_board_type_computes_grid() {
    let engine = board_3x3();
    assert!(engine.grid().is_ready());
    assert_eq!(engine.grid().cell_width, 100.0);
    assert_eq!(engine.grid().cell_height, 100.0);
}

// =============================================================
// Added
// =============================================================

#[test]
fn added_creates_entity_and_drawable() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(7, 1, 1, EntityStatus::Added)]);
    assert_eq!(engine.entity_count(), 1);
    assert_eq!(engine.entity_at(Cell::new(1, 1)).map(|e| e.id), Some(7));
    let rect = rect_of(&engine, 7);
    assert_eq!(rect.x, 110.0);
    assert_eq!(rect.y, 110.0);
    assert_eq!(rect.width, 80.0);
    assert_eq!(rect.height, 80.0);
    assert_eq!(rect.alpha, 1.0);
    assert_eq!(rect.fill, "red");
}

#[test]
fn duplicate_added_is_idempotent() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(7, 1, 1, EntityStatus::Added)]);
    engine.apply_entity_updates(&[ent(7, 1, 1, EntityStatus::Added)]);
    assert_eq!(engine.entity_count(), 1);
    assert_eq!(live_drawables(&engine), 1);
    assert_eq!(engine.surface().created(), 1);
    assert_eq!(engine.stats().duplicate_adds, 1);
}

#[test]
fn duplicate_added_in_one_batch_is_idempotent() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(7, 1, 1, EntityStatus::Added), ent(7, 2, 2, EntityStatus::Added)]);
    assert_eq!(engine.entity_count(), 1);
    assert_eq!(engine.entity(7).map(|e| e.cell), Some(Cell::new(1, 1)));
    assert_eq!(engine.surface().created(), 1);
}

#[test]
fn added_without_cell_is_dropped_and_batch_continues() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[
        bare(1, EntityStatus::Added),
        ent(2, 0, 0, EntityStatus::Added),
    ]);
    assert!(engine.entity(1).is_none());
    assert!(engine.entity(2).is_some());
    assert_eq!(engine.stats().dropped_updates, 1);
}

#[test]
fn added_into_occupied_cell_evicts_previous_occupant() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(1, 0, 0, EntityStatus::Added), ent(2, 0, 0, EntityStatus::Added)]);
    assert_eq!(engine.entity_count(), 1);
    assert_eq!(engine.entity_at(Cell::new(0, 0)).map(|e| e.id), Some(2));
    assert_eq!(live_drawables(&engine), 1);
    assert_eq!(engine.surface().destroyed(), 1);
    assert_eq!(engine.stats().evicted, 1);
    assert!(engine.is_consistent());
}

#[test]
fn color_class_selects_palette_entry() {
    let mut engine = board_3x3();
    let mut update = ent(1, 0, 0, EntityStatus::Added);
    update.color_class = 4;
    let mut out_of_range = ent(2, 1, 0, EntityStatus::Added);
    out_of_range.color_class = 77;
    engine.apply_entity_updates(&[update, out_of_range]);
    assert_eq!(rect_of(&engine, 1).fill, "orange");
    assert_eq!(rect_of(&engine, 2).fill, "black");
}

// =============================================================
// Present / Selected
// =============================================================

#[test]
fn selected_restyles_without_new_drawable() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(7, 1, 1, EntityStatus::Added)]);
    engine.apply_entity_updates(&[ent(7, 1, 1, EntityStatus::Selected)]);
    assert_eq!(engine.surface().created(), 1);
    let rect = rect_of(&engine, 7);
    assert_eq!(rect.alpha, 0.5);
    assert_eq!(rect.x, 125.0);
    assert_eq!(rect.y, 125.0);
    assert_eq!(rect.width, 50.0);
    assert_eq!(rect.height, 50.0);
    assert_eq!(engine.entity(7).map(|e| e.status), Some(EntityStatus::Selected));
}

#[test]
fn present_after_selected_restores_full_size() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(7, 1, 1, EntityStatus::Added), ent(7, 1, 1, EntityStatus::Selected)]);
    engine.apply_entity_updates(&[bare(7, EntityStatus::Present)]);
    let rect = rect_of(&engine, 7);
    assert_eq!(rect.alpha, 1.0);
    assert_eq!(rect.width, 80.0);
    assert_eq!(engine.entity(7).map(|e| e.cell), Some(Cell::new(1, 1)));
}

#[test]
fn present_for_unknown_entity_self_heals() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(4, 2, 0, EntityStatus::Present)]);
    assert_eq!(engine.entity(4).map(|e| e.status), Some(EntityStatus::Present));
    assert_eq!(engine.entity_at(Cell::new(2, 0)).map(|e| e.id), Some(4));
    assert_eq!(live_drawables(&engine), 1);
    assert_eq!(engine.stats().healed_inserts, 1);
}

#[test]
fn selected_for_unknown_entity_self_heals_as_selected() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(4, 2, 0, EntityStatus::Selected)]);
    assert_eq!(rect_of(&engine, 4).alpha, 0.5);
}

#[test]
fn presence_for_unknown_entity_without_cell_is_dropped() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[bare(4, EntityStatus::Selected)]);
    assert_eq!(engine.entity_count(), 0);
    assert_eq!(engine.stats().dropped_updates, 1);
    assert_eq!(engine.stats().healed_inserts, 0);
}

#[test]
fn presence_with_new_cell_moves_entity() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(7, 0, 0, EntityStatus::Added)]);
    engine.apply_entity_updates(&[ent(7, 2, 1, EntityStatus::Present)]);
    assert!(engine.entity_at(Cell::new(0, 0)).is_none());
    assert_eq!(engine.entity_at(Cell::new(2, 1)).map(|e| e.id), Some(7));
    let rect = rect_of(&engine, 7);
    assert_eq!(rect.x, 210.0);
    assert_eq!(rect.y, 110.0);
    assert_eq!(engine.surface().created(), 1);
    assert!(engine.is_consistent());
}

#[test]
fn move_onto_occupied_cell_evicts() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(1, 0, 0, EntityStatus::Added), ent(2, 1, 0, EntityStatus::Added)]);
    engine.apply_entity_updates(&[ent(1, 1, 0, EntityStatus::Present)]);
    assert_eq!(engine.entity_count(), 1);
    assert!(engine.entity(2).is_none());
    assert_eq!(live_drawables(&engine), 1);
    assert!(engine.is_consistent());
}

// =============================================================
// Removed
// =============================================================

#[test]
fn removed_unknown_is_noop() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(1, 0, 0, EntityStatus::Added)]);
    engine.apply_entity_updates(&[bare(99, EntityStatus::Removed)]);
    assert_eq!(engine.entity_count(), 1);
    assert_eq!(engine.stats().unknown_removals, 1);
    assert!(engine.is_consistent());
}

#[test]
fn removed_twice_is_noop_second_time() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(1, 0, 0, EntityStatus::Added)]);
    engine.apply_entity_updates(&[bare(1, EntityStatus::Removed), bare(1, EntityStatus::Removed)]);
    assert_eq!(engine.entity_count(), 0);
    assert_eq!(engine.surface().destroyed(), 1);
    assert_eq!(engine.stats().unknown_removals, 1);
}

#[test]
fn removed_before_added_then_added_keeps_entity() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[bare(5, EntityStatus::Removed)]);
    engine.apply_entity_updates(&[ent(5, 1, 2, EntityStatus::Added)]);
    assert_eq!(engine.entity_count(), 1);
}

// =============================================================
// Scenario
// =============================================================

#[test]
fn add_select_remove_scenario() {
    let mut engine = engine();
    engine.set_board_type(3, 3);

    engine.apply_entity_updates(&[ent(7, 1, 1, EntityStatus::Added)]);
    assert_eq!(engine.entity_count(), 1);
    assert_eq!(engine.entity_at(Cell::new(1, 1)).map(|e| e.id), Some(7));
    let plain = rect_of(&engine, 7);

    engine.apply_entity_updates(&[bare(7, EntityStatus::Selected)]);
    assert_eq!(engine.entity_count(), 1);
    let selected = rect_of(&engine, 7);
    assert!(selected.width < plain.width);
    assert!(selected.x > plain.x);
    assert!(selected.alpha < plain.alpha);
    assert_eq!(engine.surface().created(), 1);

    engine.apply_entity_updates(&[bare(7, EntityStatus::Removed)]);
    assert_eq!(engine.entity_count(), 0);
    assert!(engine.entity_at(Cell::new(1, 1)).is_none());
    assert_eq!(live_drawables(&engine), 0);
    assert!(engine.is_consistent());
}

// =============================================================
// Deferred placement
// =============================================================

#[test]
fn entities_before_board_type_are_deferred() {
    let mut engine = engine();
    engine.apply_entity_updates(&[ent(1, 0, 0, EntityStatus::Added), ent(2, 2, 2, EntityStatus::Selected)]);
    assert_eq!(engine.entity_count(), 2);
    assert_eq!(live_drawables(&engine), 0);
    assert!(engine.drawable(1).is_none());
    assert!(engine.hit(Point::new(5.0, 5.0)).is_none());

    engine.set_board_type(3, 3);
    assert_eq!(live_drawables(&engine), 2);
    assert_eq!(rect_of(&engine, 1).x, 10.0);
    assert_eq!(rect_of(&engine, 2).x, 225.0);
    assert_eq!(engine.hit(Point::new(5.0, 5.0)).map(|h| h.entity_id), Some(1));
}

#[test]
fn removal_of_deferred_entity_releases_nothing() {
    let mut engine = engine();
    engine.apply_entity_updates(&[ent(1, 0, 0, EntityStatus::Added)]);
    engine.apply_entity_updates(&[bare(1, EntityStatus::Removed)]);
    engine.set_board_type(3, 3);
    assert_eq!(engine.surface().created(), 0);
    assert_eq!(engine.surface().destroyed(), 0);
}

#[test]
fn new_board_type_repositions_existing_drawables() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(1, 1, 1, EntityStatus::Added)]);
    engine.set_board_type(6, 6);
    assert_eq!(engine.grid().cell_width, 50.0);
    assert_eq!(rect_of(&engine, 1).x, 60.0);
    assert_eq!(engine.surface().created(), 1);
}

// =============================================================
// Resize
// =============================================================

#[test]
fn resize_with_no_entities_is_fine() {
    let mut engine = board_3x3();
    engine.resize(610.0, 310.0);
    assert_eq!(engine.grid().cell_width, 200.0);
    assert_eq!(engine.surface().size(), (610.0, 310.0));
    assert_eq!(live_drawables(&engine), 0);
}

#[test]
fn resize_repositions_every_entity() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(1, 1, 1, EntityStatus::Added), ent(2, 2, 0, EntityStatus::Selected)]);
    engine.resize(610.0, 610.0);
    let one = rect_of(&engine, 1);
    assert_eq!((one.x, one.y, one.width, one.height), (210.0, 210.0, 180.0, 180.0));
    let two = rect_of(&engine, 2);
    assert_eq!((two.x, two.y, two.width, two.height), (450.0, 50.0, 100.0, 100.0));
    assert_eq!(engine.surface().created(), 2);
}

#[test]
fn resize_twice_is_idempotent() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(1, 1, 1, EntityStatus::Added), ent(2, 2, 0, EntityStatus::Selected)]);
    engine.resize(987.5, 641.25);
    let grid = *engine.grid();
    let rects = (rect_of(&engine, 1), rect_of(&engine, 2));
    engine.resize(987.5, 641.25);
    assert_eq!(*engine.grid(), grid);
    assert_eq!((rect_of(&engine, 1), rect_of(&engine, 2)), rects);
}

#[test]
fn resize_before_board_type_keeps_deferring() {
    let mut engine = engine();
    engine.apply_entity_updates(&[ent(1, 0, 0, EntityStatus::Added)]);
    engine.resize(500.0, 500.0);
    assert_eq!(live_drawables(&engine), 0);
    engine.set_board_type(7, 5);
    assert_eq!(live_drawables(&engine), 1);
}

// =============================================================
// Spatial consistency
// =============================================================

#[test]
fn spatial_index_matches_entities_after_mixed_batches() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[
        ent(1, 0, 0, EntityStatus::Added),
        ent(2, 1, 0, EntityStatus::Added),
        ent(3, 2, 0, EntityStatus::Added),
        ent(2, 1, 1, EntityStatus::Selected),
        bare(3, EntityStatus::Removed),
        ent(4, 0, 0, EntityStatus::Present),
        bare(9, EntityStatus::Removed),
    ]);
    assert!(engine.is_consistent());
    for entity in engine.entities() {
        assert_eq!(engine.entity_at(entity.cell).map(|e| e.id), Some(entity.id));
    }
    assert_eq!(live_drawables(&engine), engine.entity_count());
}

// =============================================================
// set_entity_status / hit
// =============================================================

#[test]
fn set_entity_status_restyles_live_entity() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(7, 1, 1, EntityStatus::Added)]);
    assert!(engine.set_entity_status(7, EntityStatus::Selected));
    assert_eq!(rect_of(&engine, 7).alpha, 0.5);
    assert!(!engine.set_entity_status(8, EntityStatus::Selected));
}

#[test]
fn hit_resolves_pointer_to_entity() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(7, 1, 1, EntityStatus::Added)]);
    let hit = engine.hit(Point::new(150.0, 150.0)).expect("hit");
    assert_eq!(hit.entity_id, 7);
    assert!(engine.hit(Point::new(250.0, 250.0)).is_none());
}

// =============================================================
// Players
// =============================================================

#[test]
fn player_scenario_add_update_remove() {
    let mut engine = board_3x3();
    engine.apply_player_updates(&[player(3, PlayerStatus::Added, None)]);
    engine.apply_player_updates(&[player(3, PlayerStatus::Updated, Some(5))]);
    assert_eq!(engine.players().len(), 1);
    assert_eq!(engine.players()[0].score, 5);
    assert_eq!(engine.players()[0].ordinal, 0);
    assert_eq!(engine.surface().roster()[0].text, "Player 3: 5");

    engine.apply_player_updates(&[player(3, PlayerStatus::Removed, None)]);
    assert!(engine.players().is_empty());
    assert!(engine.surface().roster().is_empty());
}

#[test]
fn unknown_player_update_then_removal_never_corrupts() {
    let mut engine = board_3x3();
    engine.apply_player_updates(&[player(1, PlayerStatus::Added, None)]);
    engine.apply_player_updates(&[
        player(8, PlayerStatus::Updated, Some(2)),
        player(8, PlayerStatus::Removed, None),
        player(8, PlayerStatus::Removed, None),
    ]);
    assert_eq!(engine.players().len(), 1);
    assert_eq!(engine.players()[0].id, 1);
    assert_eq!(engine.players()[0].ordinal, 0);
}

#[test]
fn roster_lines_follow_ordinals() {
    let mut engine = board_3x3();
    engine.apply_player_updates(&[
        player(9, PlayerStatus::Added, Some(1)),
        player(2, PlayerStatus::Present, Some(4)),
    ]);
    let lines = engine.surface().roster();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "Player 2: 4");
    assert_eq!(lines[1].text, "Player 9: 1");
    assert!(lines[1].y > lines[0].y);
}

#[test]
fn unchanged_player_batch_does_not_redraw() {
    let mut engine = board_3x3();
    engine.apply_player_updates(&[player(1, PlayerStatus::Added, None)]);
    let presents = engine.surface().presents();
    engine.apply_player_updates(&[player(1, PlayerStatus::Present, None)]);
    assert_eq!(engine.surface().presents(), presents);
}

#[test]
fn player_updates_do_not_touch_entities() {
    let mut engine = board_3x3();
    engine.apply_entity_updates(&[ent(1, 0, 0, EntityStatus::Added)]);
    engine.apply_player_updates(&[player(1, PlayerStatus::Removed, None)]);
    assert_eq!(engine.entity_count(), 1);
}

// =============================================================
// Helpers under test
// =============================================================

#[test]
fn color_for_palette_and_fallback() {
    assert_eq!(color_for(0), "red");
    assert_eq!(color_for(1), "blue");
    assert_eq!(color_for(3), "gray");
    assert_eq!(color_for(5), "black");
}
