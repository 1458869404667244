//! Input model: raw mouse/touch samples and their normalization to a single point.
//!
//! The browser adapter copies whatever coordinates an event exposes into a
//! [`PointerSample`]; [`normalize`] then maps one of them into the drawing
//! surface's own coordinate space, so hit-testing never needs to know whether
//! the user clicked or tapped, or where the surface sits on the page.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;

/// Coordinates reported by one mouse event or one touch point.
///
/// Each field is `None` when the event does not carry that coordinate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Position relative to the surface's padding edge.
    pub offset: Option<Point>,
    /// Viewport-relative position.
    pub client: Option<Point>,
    /// Document-relative position.
    pub page: Option<Point>,
}

/// Where the drawing surface's top-left corner sits, in viewport and document space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceOrigin {
    pub client: Point,
    pub page: Point,
}

/// A pointer-down event before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse(PointerSample),
    Touch {
        /// Touches currently on the surface.
        touches: Vec<PointerSample>,
        /// Touches that changed in this event.
        changed: Vec<PointerSample>,
    },
}

/// Collapse a pointer event into one surface-relative point.
///
/// Touch events use the first active touch, falling back to the first changed
/// touch. Within a sample the preference is the surface-relative offset, then
/// client coordinates less `origin.client`, then page coordinates less
/// `origin.page`.
#[must_use]
pub fn normalize(input: &PointerInput, origin: SurfaceOrigin) -> Option<Point> {
    let sample = match input {
        PointerInput::Mouse(sample) => sample,
        PointerInput::Touch { touches, changed } => touches.first().or_else(|| changed.first())?,
    };
    sample_point(sample, origin)
}

fn sample_point(sample: &PointerSample, origin: SurfaceOrigin) -> Option<Point> {
    sample
        .offset
        .or_else(|| sample.client.map(|p| relative(p, origin.client)))
        .or_else(|| sample.page.map(|p| relative(p, origin.page)))
}

fn relative(point: Point, origin: Point) -> Point {
    Point::new(point.x - origin.x, point.y - origin.y)
}
