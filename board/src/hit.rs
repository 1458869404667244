#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use wire::EntityId;

use crate::geometry::{Cell, GridInfo, Point, cell_of};
use crate::store::EntityStore;

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub entity_id: EntityId,
    pub cell: Cell,
}

/// Which entity (if any) occupies the cell under `point`.
///
/// Pointers outside the board, over empty cells, or before the board type is
/// known all yield `None`.
#[must_use]
pub fn hit_test<H>(point: Point, grid: &GridInfo, store: &EntityStore<H>) -> Option<Hit> {
    let cell = cell_of(point, grid)?;
    let entity_id = store.id_at(cell)?;
    Some(Hit { entity_id, cell })
}
