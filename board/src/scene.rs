//! Retained scene: an in-memory [`Surface`] that remembers every live drawable.
//!
//! Used directly as the headless surface (CLI, tests) and wrapped by the
//! canvas renderer, which repaints from it on `present`.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::BTreeMap;

use crate::surface::{RectSpec, Surface, TextLine};

/// Handle to a rectangle held by a [`Scene`].
///
/// Deliberately neither `Clone` nor `Copy`: the engine holds exactly one per entity.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct DrawableId(u32);

impl DrawableId {
    /// Raw numeric id, for diagnostics.
    #[must_use]
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Retained drawables and counters.
#[derive(Debug, Default)]
pub struct Scene {
    width: f64,
    height: f64,
    next_id: u32,
    rects: BTreeMap<u32, RectSpec>,
    roster: Vec<TextLine>,
    created: usize,
    destroyed: usize,
    presents: usize,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current geometry of a live rectangle.
    #[must_use]
    pub fn rect(&self, handle: &DrawableId) -> Option<&RectSpec> {
        self.rects.get(&handle.0)
    }

    /// Live rectangles in creation order.
    pub fn rects(&self) -> impl Iterator<Item = &RectSpec> {
        self.rects.values()
    }

    #[must_use]
    pub fn rect_count(&self) -> usize {
        self.rects.len()
    }

    #[must_use]
    pub fn roster(&self) -> &[TextLine] {
        &self.roster
    }

    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Total rectangles ever created.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }

    /// Total rectangles ever destroyed.
    #[must_use]
    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    /// Number of `present` calls so far.
    #[must_use]
    pub fn presents(&self) -> usize {
        self.presents
    }
}

impl Surface for Scene {
    type Handle = DrawableId;

    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn create_rect(&mut self, spec: &RectSpec) -> DrawableId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.rects.insert(id, spec.clone());
        self.created += 1;
        DrawableId(id)
    }

    fn update_rect(&mut self, handle: &DrawableId, spec: &RectSpec) {
        if let Some(rect) = self.rects.get_mut(&handle.0) {
            rect.clone_from(spec);
        } else {
            log::warn!("update for released drawable {}", handle.0);
        }
    }

    fn destroy_rect(&mut self, handle: DrawableId) {
        if self.rects.remove(&handle.0).is_some() {
            self.destroyed += 1;
        }
    }

    fn set_roster(&mut self, lines: &[TextLine]) {
        self.roster = lines.to_vec();
    }

    fn present(&mut self) {
        self.presents += 1;
    }
}
