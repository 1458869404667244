//! Selection controller: local toggle of an entity's selection state.
//!
//! A toggle is optimistic. The drawable is restyled immediately and the caller
//! emits a select intent; the server answers with a confirming update through
//! the normal update stream, which overrides whatever was guessed here.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use wire::{EntityId, EntityStatus};

use crate::engine::Engine;
use crate::geometry::Point;
use crate::surface::Surface;

/// Selection state of one entity as far as the local user is concerned.
///
/// `Added` and `Removed` are lifecycle states owned by the engine and map to
/// [`SelectionState::Present`] here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Present,
    Selected,
}

impl SelectionState {
    #[must_use]
    pub fn from_status(status: EntityStatus) -> Self {
        if status == EntityStatus::Selected { Self::Selected } else { Self::Present }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Present => Self::Selected,
            Self::Selected => Self::Present,
        }
    }

    #[must_use]
    pub fn status(self) -> EntityStatus {
        match self {
            Self::Present => EntityStatus::Present,
            Self::Selected => EntityStatus::Selected,
        }
    }
}

/// Outcome of a successful local toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub entity_id: EntityId,
    pub from: SelectionState,
    pub to: SelectionState,
}

/// Resolves pointer input to entities and flips their selection.
#[derive(Debug, Default)]
pub struct SelectionController {
    toggles: u64,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the entity under `point`, restyling it on the engine's surface.
    ///
    /// Returns `None` when nothing occupies the resolved cell; that is a
    /// silent no-op, not an error.
    pub fn toggle_at<S: Surface>(&mut self, engine: &mut Engine<S>, point: Point) -> Option<Toggle> {
        let hit = engine.hit(point)?;
        let from = SelectionState::from_status(engine.entity(hit.entity_id)?.status);
        let to = from.toggled();
        if !engine.set_entity_status(hit.entity_id, to.status()) {
            return None;
        }
        self.toggles += 1;
        log::debug!("entity {} {from:?} -> {to:?}", hit.entity_id);
        Some(Toggle { entity_id: hit.entity_id, from, to })
    }

    /// Number of local toggles applied so far.
    #[must_use]
    pub fn toggles(&self) -> u64 {
        self.toggles
    }
}
