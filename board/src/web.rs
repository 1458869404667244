//! Browser bootstrap: canvas, WebSocket and DOM listeners around one [`Session`].
//!
//! The host page calls `runApp(containerId, wsUrl)` and keeps the returned
//! [`App`] alive; dropping it detaches every listener. All callbacks borrow
//! the shared session one event at a time.

#[cfg(test)]
#[path = "web_test.rs"]
mod web_test;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, CloseEvent, Document, Element, HtmlCanvasElement, MessageEvent, MouseEvent, TouchEvent,
    TouchList, WebSocket, Window,
};

use crate::consts::RESIZE_SETTLE_MS;
use crate::engine::Engine;
use crate::geometry::Point;
use crate::input::{PointerInput, PointerSample, SurfaceOrigin, normalize};
use crate::render::CanvasSurface;
use crate::session::{Link, SendError, Session};
use crate::settle::Settle;

/// Fatal environment failures at startup.
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    #[error("canvas unsupported")]
    CanvasUnsupported,
    #[error("realtime channel unsupported")]
    RealtimeUnsupported,
    #[error("container element not found: {0}")]
    MissingContainer(String),
}

impl From<BootError> for JsValue {
    fn from(err: BootError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Outbound link over a browser WebSocket.
pub struct SocketLink {
    ws: WebSocket,
}

impl Link for SocketLink {
    fn send(&mut self, text: &str) -> Result<(), SendError> {
        if self.ws.ready_state() != WebSocket::OPEN {
            return Err(SendError::Closed);
        }
        self.ws.send_with_str(text).map_err(|e| SendError::Transport(format!("{e:?}")))
    }
}

type Shared = Rc<RefCell<Session<CanvasSurface, SocketLink>>>;

struct Handlers {
    message: Closure<dyn FnMut(MessageEvent)>,
    close: Closure<dyn FnMut(CloseEvent)>,
    mouse_down: Closure<dyn FnMut(MouseEvent)>,
    touch_start: Closure<dyn FnMut(TouchEvent)>,
    resize: Closure<dyn FnMut()>,
}

/// A running board viewer. Keep it alive for as long as the board is shown.
#[wasm_bindgen]
pub struct App {
    session: Shared,
    window: Window,
    canvas: HtmlCanvasElement,
    container: Element,
    ws: WebSocket,
    settle_timer: Rc<RefCell<Option<Timeout>>>,
    handlers: Handlers,
}

/// Create the canvas inside `container_id`, connect to `ws_url` and start listening.
///
/// # Errors
///
/// Returns an error string if the container is missing, the 2D canvas is not
/// available, or the browser has no WebSocket support.
#[wasm_bindgen(js_name = runApp)]
pub fn run_app(container_id: &str, ws_url: &str) -> Result<App, JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already installed: {e}")));
    }

    let window = web_sys::window().ok_or(BootError::CanvasUnsupported)?;
    let document = window.document().ok_or(BootError::CanvasUnsupported)?;
    let container = document
        .get_element_by_id(container_id)
        .ok_or_else(|| BootError::MissingContainer(container_id.to_owned()))?;

    let (canvas, ctx) = create_canvas(&document)?;
    container.append_child(&canvas)?;

    if !js_sys::Reflect::has(&window, &JsValue::from_str("WebSocket"))? {
        return Err(BootError::RealtimeUnsupported.into());
    }
    let ws = WebSocket::new(ws_url).map_err(|e| {
        log::error!("websocket connect failed: {e:?}");
        BootError::RealtimeUnsupported
    })?;

    let (width, height) = viewport_size(&window, &container);
    let engine = Engine::new(CanvasSurface::new(canvas.clone(), ctx), width, height);
    let session: Shared = Rc::new(RefCell::new(Session::new(engine, SocketLink { ws: ws.clone() })));
    let settle_timer = Rc::new(RefCell::new(None));

    let handlers = Handlers {
        message: on_message(&session),
        close: on_close(&session),
        mouse_down: on_mouse_down(&session, &window, &canvas),
        touch_start: on_touch_start(&session, &window, &canvas),
        resize: on_resize(&session, &window, &container, &settle_timer),
    };

    ws.set_onmessage(Some(handlers.message.as_ref().unchecked_ref()));
    ws.set_onclose(Some(handlers.close.as_ref().unchecked_ref()));
    canvas.add_event_listener_with_callback("mousedown", handlers.mouse_down.as_ref().unchecked_ref())?;
    canvas.add_event_listener_with_callback("touchstart", handlers.touch_start.as_ref().unchecked_ref())?;
    window.add_event_listener_with_callback("resize", handlers.resize.as_ref().unchecked_ref())?;

    log::info!("board viewer started: {ws_url}");
    Ok(App { session, window, canvas, container, ws, settle_timer, handlers })
}

#[wasm_bindgen]
impl App {
    /// Resize immediately to the window's current size.
    pub fn resize(&self) {
        let (width, height) = viewport_size(&self.window, &self.container);
        let mut session = self.session.borrow_mut();
        session.on_resize(width, height, js_sys::Date::now());
        session.flush_resize();
    }

    #[wasm_bindgen(js_name = isConnected)]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.session.borrow().is_connected()
    }

    #[wasm_bindgen(js_name = entityCount)]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.session.borrow().engine().entity_count()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        let detach = [
            (self.canvas.unchecked_ref::<web_sys::EventTarget>(), "mousedown", self.handlers.mouse_down.as_ref()),
            (self.canvas.unchecked_ref(), "touchstart", self.handlers.touch_start.as_ref()),
            (self.window.unchecked_ref(), "resize", self.handlers.resize.as_ref()),
        ];
        for (target, event, callback) in detach {
            if let Err(e) = target.remove_event_listener_with_callback(event, callback.unchecked_ref()) {
                log::warn!("failed to detach {event} listener: {e:?}");
            }
        }
        drop(self.settle_timer.borrow_mut().take());
        if let Err(e) = self.ws.close() {
            log::warn!("websocket close failed: {e:?}");
        }
    }
}

// =============================================================
// Setup helpers
// =============================================================

fn create_canvas(document: &Document) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), BootError> {
    let canvas = document
        .create_element("canvas")
        .map_err(|_| BootError::CanvasUnsupported)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| BootError::CanvasUnsupported)?;
    let ctx = canvas
        .get_context("2d")
        .map_err(|_| BootError::CanvasUnsupported)?
        .ok_or(BootError::CanvasUnsupported)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| BootError::CanvasUnsupported)?;
    Ok((canvas, ctx))
}

/// Drawing surface size: the window's inner size, or the container's client
/// size on an axis the window cannot report.
fn viewport_size(window: &Window, container: &Element) -> (f64, f64) {
    (
        surface_extent(js_number(window.inner_width(), "innerWidth"), container.client_width()),
        surface_extent(js_number(window.inner_height(), "innerHeight"), container.client_height()),
    )
}

fn js_number(value: Result<JsValue, JsValue>, name: &str) -> Option<f64> {
    match value {
        Ok(value) => value.as_f64(),
        Err(e) => {
            log::warn!("window.{name} unavailable: {e:?}");
            None
        }
    }
}

fn surface_extent(measured: Option<f64>, fallback: i32) -> f64 {
    match measured {
        Some(px) if px.is_finite() && px > 0.0 => px,
        _ => f64::from(fallback.max(0)),
    }
}

/// The canvas's top-left corner in viewport and document coordinates.
fn surface_origin(window: &Window, canvas: &HtmlCanvasElement) -> SurfaceOrigin {
    let rect = canvas.get_bounding_client_rect();
    let client = Point::new(rect.left(), rect.top());
    let scroll = Point::new(window.scroll_x().unwrap_or(0.0), window.scroll_y().unwrap_or(0.0));
    page_origin(client, scroll)
}

fn page_origin(client: Point, scroll: Point) -> SurfaceOrigin {
    SurfaceOrigin { client, page: Point::new(client.x + scroll.x, client.y + scroll.y) }
}

// =============================================================
// Event handlers
// =============================================================

fn on_message(session: &Shared) -> Closure<dyn FnMut(MessageEvent)> {
    let session = Rc::clone(session);
    Closure::new(move |event: MessageEvent| match event.data().as_string() {
        Some(text) => session.borrow_mut().on_message(&text),
        None => log::warn!("ignoring non-text websocket frame"),
    })
}

fn on_close(session: &Shared) -> Closure<dyn FnMut(CloseEvent)> {
    let session = Rc::clone(session);
    Closure::new(move |event: CloseEvent| {
        if session.borrow_mut().on_close() {
            log::warn!("connection closed (code {})", event.code());
        }
    })
}

fn on_mouse_down(session: &Shared, window: &Window, canvas: &HtmlCanvasElement) -> Closure<dyn FnMut(MouseEvent)> {
    let session = Rc::clone(session);
    let window = window.clone();
    let canvas = canvas.clone();
    Closure::new(move |event: MouseEvent| {
        let input = PointerInput::Mouse(mouse_sample(&event));
        if let Some(point) = normalize(&input, surface_origin(&window, &canvas)) {
            session.borrow_mut().on_pointer(point);
        }
    })
}

fn on_touch_start(session: &Shared, window: &Window, canvas: &HtmlCanvasElement) -> Closure<dyn FnMut(TouchEvent)> {
    let session = Rc::clone(session);
    let window = window.clone();
    let canvas = canvas.clone();
    Closure::new(move |event: TouchEvent| {
        event.prevent_default();
        let input = PointerInput::Touch {
            touches: touch_samples(&event.touches()),
            changed: touch_samples(&event.changed_touches()),
        };
        if let Some(point) = normalize(&input, surface_origin(&window, &canvas)) {
            session.borrow_mut().on_pointer(point);
        }
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn on_resize(
    session: &Shared,
    window: &Window,
    container: &Element,
    timer: &Rc<RefCell<Option<Timeout>>>,
) -> Closure<dyn FnMut()> {
    let session = Rc::clone(session);
    let window = window.clone();
    let container = container.clone();
    let timer = Rc::clone(timer);
    Closure::new(move || {
        let (width, height) = viewport_size(&window, &container);
        session.borrow_mut().on_resize(width, height, js_sys::Date::now());

        let session = Rc::clone(&session);
        // Replacing the previous timeout cancels it.
        *timer.borrow_mut() = Some(Timeout::new(RESIZE_SETTLE_MS as u32, move || {
            let mut session = session.borrow_mut();
            if let Settle::Wait(_) = session.settle(js_sys::Date::now()) {
                session.flush_resize();
            }
        }));
    })
}

// =============================================================
// Event conversion
// =============================================================

// Listeners sit on the canvas itself, so a mouse event's offset is already surface-relative.
fn mouse_sample(event: &MouseEvent) -> PointerSample {
    PointerSample {
        offset: Some(Point::new(f64::from(event.offset_x()), f64::from(event.offset_y()))),
        client: Some(Point::new(f64::from(event.client_x()), f64::from(event.client_y()))),
        page: Some(Point::new(f64::from(event.page_x()), f64::from(event.page_y()))),
    }
}

fn touch_samples(list: &TouchList) -> Vec<PointerSample> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|touch| PointerSample {
            client: Some(Point::new(f64::from(touch.client_x()), f64::from(touch.client_y()))),
            page: Some(Point::new(f64::from(touch.page_x()), f64::from(touch.page_y()))),
            ..PointerSample::default()
        })
        .collect()
}
