//! Rendering: paints the retained scene to a 2D canvas.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! [`CanvasSurface`] forwards every drawable operation to an inner [`Scene`]
//! and repaints the whole canvas from it on `present`, so the engine sees the
//! same [`Surface`] contract in the browser and in native tests.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::ROSTER_FONT;
use crate::scene::{DrawableId, Scene};
use crate::surface::{RectSpec, Surface, TextLine};

/// A canvas element plus the scene it mirrors.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scene: Scene,
}

impl CanvasSurface {
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx, scene: Scene::new() }
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

impl Surface for CanvasSurface {
    type Handle = DrawableId;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn set_size(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
        self.scene.set_size(width, height);
    }

    fn create_rect(&mut self, spec: &RectSpec) -> DrawableId {
        self.scene.create_rect(spec)
    }

    fn update_rect(&mut self, handle: &DrawableId, spec: &RectSpec) {
        self.scene.update_rect(handle, spec);
    }

    fn destroy_rect(&mut self, handle: DrawableId) {
        self.scene.destroy_rect(handle);
    }

    fn set_roster(&mut self, lines: &[TextLine]) {
        self.scene.set_roster(lines);
    }

    fn present(&mut self) {
        self.scene.present();
        if let Err(e) = draw(&self.ctx, &self.scene) {
            log::error!("canvas repaint failed: {e:?}");
        }
    }
}

/// Clear the canvas and draw every live rectangle, then the roster.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene) -> Result<(), JsValue> {
    let (width, height) = scene.size();
    ctx.clear_rect(0.0, 0.0, width, height);

    for rect in scene.rects() {
        draw_rect(ctx, rect);
    }

    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str("black");
    ctx.set_font(ROSTER_FONT);
    for line in scene.roster() {
        ctx.fill_text(&line.text, line.x, line.y)?;
    }
    Ok(())
}

fn draw_rect(ctx: &CanvasRenderingContext2d, rect: &RectSpec) {
    ctx.save();
    ctx.set_global_alpha(rect.alpha);
    ctx.set_fill_style_str(rect.fill);
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.set_stroke_style_str(rect.stroke);
    ctx.set_line_width(rect.stroke_width);
    ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.restore();
}
