//! Entity store: the id → entity mapping and the cell → id spatial index.
//!
//! The id map is the source of truth. The spatial index is a derived
//! acceleration structure; every method that changes an entity's cell updates
//! both maps before returning, so callers never observe them out of step.
//!
//! Each slot also carries the entity's drawable handle (generic `H`) so the
//! engine can release it when the entity leaves. The store never touches the
//! handle beyond holding it.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use wire::{EntityId, EntityKind, EntityStatus};

use crate::geometry::Cell;

/// Canonical client-side view of one board entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub cell: Cell,
    pub color_class: u32,
    pub status: EntityStatus,
}

/// An entity plus the drawable attached to it, if placement has happened.
#[derive(Debug)]
pub struct Slot<H> {
    pub entity: Entity,
    pub drawable: Option<H>,
}

/// In-memory store of live entities.
pub struct EntityStore<H> {
    slots: HashMap<EntityId, Slot<H>>,
    cells: HashMap<Cell, EntityId>,
}

impl<H> EntityStore<H> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { slots: HashMap::new(), cells: HashMap::new() }
    }

    /// Insert an entity without a drawable.
    ///
    /// Returns every slot displaced to make room: a previous slot with the
    /// same id, and any other entity occupying the target cell.
    pub fn insert(&mut self, entity: Entity) -> Vec<Slot<H>> {
        let mut displaced = Vec::new();
        if let Some(old) = self.remove(entity.id) {
            displaced.push(old);
        }
        if let Some(occupant) = self.cells.get(&entity.cell).copied() {
            if let Some(old) = self.remove(occupant) {
                displaced.push(old);
            }
        }
        self.cells.insert(entity.cell, entity.id);
        self.slots.insert(entity.id, Slot { entity, drawable: None });
        displaced
    }

    /// Remove an entity by id, clearing its cell. Returns the slot if it was present.
    pub fn remove(&mut self, id: EntityId) -> Option<Slot<H>> {
        let slot = self.slots.remove(&id)?;
        if self.cells.get(&slot.entity.cell) == Some(&id) {
            self.cells.remove(&slot.entity.cell);
        }
        Some(slot)
    }

    /// Move a live entity to `cell`.
    ///
    /// Returns the slot of any other entity evicted from the target cell.
    /// Unknown ids and same-cell moves are no-ops.
    pub fn relocate(&mut self, id: EntityId, cell: Cell) -> Option<Slot<H>> {
        let old_cell = self.slots.get(&id)?.entity.cell;
        if old_cell == cell {
            return None;
        }
        let evicted = match self.cells.get(&cell).copied() {
            Some(occupant) if occupant != id => self.remove(occupant),
            _ => None,
        };
        if self.cells.get(&old_cell) == Some(&id) {
            self.cells.remove(&old_cell);
        }
        self.cells.insert(cell, id);
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.entity.cell = cell;
        }
        evicted
    }

    /// Overwrite an entity's status. Returns `false` for unknown ids.
    pub fn set_status(&mut self, id: EntityId, status: EntityStatus) -> bool {
        let Some(slot) = self.slots.get_mut(&id) else {
            return false;
        };
        slot.entity.status = status;
        true
    }

    /// Attach a drawable, returning the one it replaces.
    pub fn attach(&mut self, id: EntityId, drawable: H) -> Option<H> {
        let slot = self.slots.get_mut(&id)?;
        slot.drawable.replace(drawable)
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(&id).map(|slot| &slot.entity)
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(&id)
    }

    /// The slot for `id`, including its drawable.
    #[must_use]
    pub fn slot(&self, id: EntityId) -> Option<&Slot<H>> {
        self.slots.get(&id)
    }

    /// Id of the entity occupying `cell`, if any.
    #[must_use]
    pub fn id_at(&self, cell: Cell) -> Option<EntityId> {
        self.cells.get(&cell).copied()
    }

    /// The entity occupying `cell`, if any.
    #[must_use]
    pub fn at(&self, cell: Cell) -> Option<&Entity> {
        self.id_at(cell).and_then(|id| self.get(id))
    }

    /// All live slots, in no particular order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot<H>> {
        self.slots.values()
    }

    /// All live slots with mutable access to their drawables.
    pub fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot<H>> {
        self.slots.values_mut()
    }

    /// Live entities sorted by id.
    #[must_use]
    pub fn sorted_entities(&self) -> Vec<&Entity> {
        let mut entities: Vec<&Entity> = self.slots.values().map(|slot| &slot.entity).collect();
        entities.sort_by_key(|e| e.id);
        entities
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Check that the spatial index and the id map describe the same board:
    /// every live entity's cell points back at it and no cell entry is stale.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.cells.len() == self.slots.len()
            && self
                .slots
                .values()
                .all(|slot| self.cells.get(&slot.entity.cell) == Some(&slot.entity.id))
    }
}

impl<H> Default for EntityStore<H> {
    fn default() -> Self {
        Self::new()
    }
}
