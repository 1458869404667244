//! Render adapter seam: the drawing surface the engine paints through.
//!
//! The engine only ever creates, updates and destroys rectangles and replaces
//! the roster text block. Drawable handles are owned values; `destroy_rect`
//! consumes the handle so nothing can keep using it afterwards.

/// A filled, stroked rectangle in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RectSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub stroke_width: f64,
    pub alpha: f64,
}

/// One line of roster text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// A drawing surface with rectangle and text primitives.
pub trait Surface {
    /// Handle to one live rectangle.
    type Handle;

    /// The surface was resized to `width` × `height` pixels.
    fn set_size(&mut self, width: f64, height: f64);

    fn create_rect(&mut self, spec: &RectSpec) -> Self::Handle;

    fn update_rect(&mut self, handle: &Self::Handle, spec: &RectSpec);

    /// Release a rectangle. The handle is consumed.
    fn destroy_rect(&mut self, handle: Self::Handle);

    /// Replace the roster text block.
    fn set_roster(&mut self, lines: &[TextLine]);

    /// Make pending changes visible.
    fn present(&mut self);
}
