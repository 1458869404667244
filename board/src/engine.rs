use wire::{EntityId, EntityKind, EntityStatus, EntityUpdate, PlayerUpdate};

use crate::consts::{
    ENTITY_COLORS, ENTITY_STROKE, ENTITY_STROKE_WIDTH, FALLBACK_COLOR, NORMAL_ALPHA, ROSTER_LEFT,
    ROSTER_LINE_HEIGHT, ROSTER_TOP, SELECTED_ALPHA,
};
use crate::geometry::{Cell, GridInfo, Point, size_and_offset_for};
use crate::hit::{self, Hit};
use crate::roster::{Player, Roster, RosterChange};
use crate::store::{Entity, EntityStore, Slot};
use crate::surface::{RectSpec, Surface, TextLine};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Counters for protocol anomalies the engine recovered from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// `Added` for an id that was already live.
    pub duplicate_adds: u64,
    /// `Present`/`Selected` for an unknown id, inserted as if added.
    pub healed_inserts: u64,
    /// `Removed` for an unknown id.
    pub unknown_removals: u64,
    /// Updates dropped for missing required fields.
    pub dropped_updates: u64,
    /// Entities displaced because another entity claimed their cell.
    pub evicted: u64,
}

/// Reconciliation engine: canonical entity and player state plus the drawables
/// that mirror it on a [`Surface`].
///
/// Every inbound change funnels through here. Batches are applied in element
/// order and no single element can abort the rest of its batch.
pub struct Engine<S: Surface> {
    surface: S,
    grid: GridInfo,
    entities: EntityStore<S::Handle>,
    roster: Roster,
    stats: EngineStats,
}

impl<S: Surface> Engine<S> {
    /// Create an engine drawing on `surface`, provisionally sized `width` × `height`.
    #[must_use]
    pub fn new(mut surface: S, width: f64, height: f64) -> Self {
        surface.set_size(width, height);
        Self {
            surface,
            grid: GridInfo::provisional(width, height),
            entities: EntityStore::new(),
            roster: Roster::new(),
            stats: EngineStats::default(),
        }
    }

    // --- Data inputs ---

    /// Fix the logical board dimensions and re-place every entity.
    ///
    /// Entities that arrived before the dimensions get their drawables here.
    pub fn set_board_type(&mut self, rows: u32, cols: u32) {
        self.grid = self.grid.with_dimensions(rows, cols);
        log::debug!("board type {rows}x{cols}, cell {}x{}", self.grid.cell_width, self.grid.cell_height);
        self.place_all();
        self.surface.present();
    }

    /// Resize the surface and reposition every live drawable.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.grid = self.grid.with_surface(width, height);
        self.surface.set_size(width, height);
        self.place_all();
        self.surface.present();
    }

    /// Apply an entity batch in element order.
    pub fn apply_entity_updates(&mut self, batch: &[EntityUpdate]) {
        if batch.is_empty() {
            return;
        }
        for update in batch {
            self.apply_entity_update(update);
        }
        self.surface.present();
    }

    /// Apply a player batch in element order. The roster text is redrawn at
    /// most once, and only if something visible changed.
    pub fn apply_player_updates(&mut self, batch: &[PlayerUpdate]) {
        let mut changed = false;
        for update in batch {
            changed |= self.roster.apply(update) != RosterChange::Unchanged;
        }
        if changed {
            let lines = self.roster_lines();
            self.surface.set_roster(&lines);
            self.surface.present();
        }
    }

    /// Overwrite a live entity's status and restyle its drawable in place.
    ///
    /// Returns `false` for unknown ids.
    pub fn set_entity_status(&mut self, id: EntityId, status: EntityStatus) -> bool {
        if !self.entities.set_status(id, status) {
            return false;
        }
        self.place(id);
        self.surface.present();
        true
    }

    // --- Queries ---

    /// Entity under a surface point, if any.
    #[must_use]
    pub fn hit(&self, point: Point) -> Option<Hit> {
        hit::hit_test(point, &self.grid, &self.entities)
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    #[must_use]
    pub fn entity_at(&self, cell: Cell) -> Option<&Entity> {
        self.entities.at(cell)
    }

    /// Live entities sorted by id.
    #[must_use]
    pub fn entities(&self) -> Vec<&Entity> {
        self.entities.sorted_entities()
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The drawable attached to `id`, if it has been placed.
    #[must_use]
    pub fn drawable(&self, id: EntityId) -> Option<&S::Handle> {
        self.entities.slot(id).and_then(|slot| slot.drawable.as_ref())
    }

    /// Players in roster order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        self.roster.players()
    }

    #[must_use]
    pub fn grid(&self) -> &GridInfo {
        &self.grid
    }

    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Whether the spatial index agrees with the id map.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.entities.is_consistent()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Roster text lines in roster order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn roster_lines(&self) -> Vec<TextLine> {
        self.roster
            .players()
            .iter()
            .map(|p| TextLine {
                text: format!("{}: {}", p.name, p.score),
                x: ROSTER_LEFT,
                y: ROSTER_TOP + p.ordinal as f64 * ROSTER_LINE_HEIGHT,
            })
            .collect()
    }

    // --- Entity reconciliation ---

    fn apply_entity_update(&mut self, update: &EntityUpdate) {
        match update.status {
            EntityStatus::Added => {
                if self.entities.contains(update.id) {
                    log::debug!("ignoring duplicate add for entity {}", update.id);
                    self.stats.duplicate_adds += 1;
                    return;
                }
                self.insert(update);
            }
            EntityStatus::Present | EntityStatus::Selected => {
                if self.entities.contains(update.id) {
                    self.refresh(update);
                } else if self.insert(update) {
                    log::info!("{:?} for unknown entity {}, inserted", update.status, update.id);
                    self.stats.healed_inserts += 1;
                }
            }
            EntityStatus::Removed => {
                if !self.remove(update.id) {
                    log::debug!("removal for unknown entity {}", update.id);
                    self.stats.unknown_removals += 1;
                }
            }
        }
    }

    /// Insert a new entity. Returns `false` if the update lacks a cell.
    fn insert(&mut self, update: &EntityUpdate) -> bool {
        let (Some(x), Some(y)) = (update.grid_x, update.grid_y) else {
            log::warn!("dropping {:?} for entity {}: no cell", update.status, update.id);
            self.stats.dropped_updates += 1;
            return false;
        };
        let displaced = self.entities.insert(Entity {
            id: update.id,
            kind: update.kind,
            cell: Cell::new(x, y),
            color_class: update.color_class,
            status: update.status,
        });
        for slot in displaced {
            self.evict(slot);
        }
        self.place(update.id);
        true
    }

    /// Apply a presence update to a live entity: optional move, new status, restyle.
    fn refresh(&mut self, update: &EntityUpdate) {
        if let (Some(x), Some(y)) = (update.grid_x, update.grid_y) {
            if let Some(slot) = self.entities.relocate(update.id, Cell::new(x, y)) {
                self.evict(slot);
            }
        }
        self.entities.set_status(update.id, update.status);
        self.place(update.id);
    }

    fn remove(&mut self, id: EntityId) -> bool {
        let Some(slot) = self.entities.remove(id) else {
            return false;
        };
        self.release(slot);
        true
    }

    fn evict(&mut self, slot: Slot<S::Handle>) {
        log::warn!("entity {} evicted from cell {:?}", slot.entity.id, slot.entity.cell);
        self.stats.evicted += 1;
        self.release(slot);
    }

    fn release(&mut self, slot: Slot<S::Handle>) {
        if let Some(handle) = slot.drawable {
            self.surface.destroy_rect(handle);
        }
    }

    // --- Placement ---

    /// Create or reposition one entity's drawable. Deferred until the grid is ready.
    fn place(&mut self, id: EntityId) {
        if !self.grid.is_ready() {
            return;
        }
        let Some(slot) = self.entities.slot(id) else {
            return;
        };
        let spec = rect_for(&slot.entity, &self.grid);
        match &slot.drawable {
            Some(handle) => self.surface.update_rect(handle, &spec),
            None => {
                let handle = self.surface.create_rect(&spec);
                if let Some(stale) = self.entities.attach(id, handle) {
                    self.surface.destroy_rect(stale);
                }
            }
        }
    }

    /// Re-place every live entity against the current grid.
    fn place_all(&mut self) {
        if !self.grid.is_ready() {
            log::debug!("deferring placement of {} entities until board type is known", self.entities.len());
            return;
        }
        let grid = self.grid;
        let surface = &mut self.surface;
        for slot in self.entities.slots_mut() {
            let spec = rect_for(&slot.entity, &grid);
            match &slot.drawable {
                Some(handle) => surface.update_rect(handle, &spec),
                None => slot.drawable = Some(surface.create_rect(&spec)),
            }
        }
    }
}

/// Pixel rectangle for an entity under `grid`.
#[must_use]
pub fn rect_for(entity: &Entity, grid: &GridInfo) -> RectSpec {
    let origin = grid.cell_origin(entity.cell);
    let cell_box = size_and_offset_for(entity.status, grid);
    let alpha = if entity.status == EntityStatus::Selected { SELECTED_ALPHA } else { NORMAL_ALPHA };
    match entity.kind {
        EntityKind::Block => RectSpec {
            x: origin.x + cell_box.x_offset,
            y: origin.y + cell_box.y_offset,
            width: cell_box.width,
            height: cell_box.height,
            fill: color_for(entity.color_class),
            stroke: ENTITY_STROKE,
            stroke_width: ENTITY_STROKE_WIDTH,
            alpha,
        },
    }
}

/// Fill color for a color class.
#[must_use]
pub fn color_for(color_class: u32) -> &'static str {
    usize::try_from(color_class).map_or(FALLBACK_COLOR, |idx| ENTITY_COLORS.get(idx).copied().unwrap_or(FALLBACK_COLOR))
}
