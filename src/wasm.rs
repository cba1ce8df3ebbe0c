//! WebAssembly bindings for the universe views.
//!
//! Provides the browser host (`requestAnimationFrame` + `performance.now()`),
//! a canvas 2D surface, and JS-facing wrappers around [`AnimationView`] and
//! [`Universe`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent};

use crate::{
    animation::FrameHost,
    engine::{CellCoordinates, Engine, Universe},
    interaction::{ClickEvent, Modifiers},
    render::{
        BoundingRect, PointerInput, RasterBackend, RasterSurface, RenderBackend, RenderError,
        SceneBackend, SoftwareRenderer,
    },
    schema::{BackendKind, Color, ViewConfig},
    view::AnimationView,
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

fn to_js(error: RenderError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_config(config_json: &str) -> Result<ViewConfig, JsValue> {
    let config: ViewConfig = if config_json.trim().is_empty() {
        ViewConfig::default()
    } else {
        serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?
    };
    config
        .validate()
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;
    Ok(config)
}

// ============================================================================
// Browser host
// ============================================================================

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Frame host backed by `requestAnimationFrame`.
///
/// The callback is created once per view and reused for every request.
pub struct BrowserHost {
    window: web_sys::Window,
    performance: Option<web_sys::Performance>,
    callback: FrameCallback,
}

impl BrowserHost {
    fn new(callback: FrameCallback) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No global window"))?;
        let performance = window.performance();
        Ok(Self {
            window,
            performance,
            callback,
        })
    }
}

impl FrameHost for BrowserHost {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            log::warn!("Frame requested before the frame callback was installed");
            return None;
        };
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| log::error!("requestAnimationFrame failed: {e:?}"))
            .ok()
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::error!("cancelAnimationFrame failed: {e:?}");
        }
    }

    fn now(&self) -> f64 {
        match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        }
    }
}

// ============================================================================
// Canvas surface
// ============================================================================

/// [`RasterSurface`] over a canvas 2D context.
pub struct Canvas2d {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Canvas2d {
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Unexpected 2d context type"))?;
        Ok(Self {
            context,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }
}

impl RasterSurface for Canvas2d {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn set_fill_color(&mut self, color: Color) {
        self.context.set_fill_style_str(&color.to_string());
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.fill_rect(x, y, width, height);
    }
}

// ============================================================================
// Animation view
// ============================================================================

type BrowserView = AnimationView<Universe, Box<dyn RenderBackend>, BrowserHost>;

/// WebAssembly wrapper for one mounted, animated universe view.
#[wasm_bindgen]
pub struct WasmAnimation {
    view: Rc<RefCell<Option<BrowserView>>>,
    callback: FrameCallback,
    canvas: HtmlCanvasElement,
    /// Container the canvas was appended to, when the view created it.
    container: Option<HtmlElement>,
}

#[wasm_bindgen]
impl WasmAnimation {
    /// Mount a view drawing into an existing canvas.
    ///
    /// # Arguments
    /// * `canvas` - Target canvas; its `width`/`height` attributes are the logical size
    /// * `config_json` - JSON `ViewConfig`, or an empty string for defaults
    #[wasm_bindgen(js_name = onCanvas)]
    pub fn on_canvas(canvas: HtmlCanvasElement, config_json: &str) -> Result<WasmAnimation, JsValue> {
        let config = parse_config(config_json)?;
        Self::mount(config, canvas, None)
    }

    /// Mount a view into a container element, creating a canvas sized to it.
    #[wasm_bindgen(js_name = inContainer)]
    pub fn in_container(container: HtmlElement, config_json: &str) -> Result<WasmAnimation, JsValue> {
        let config = parse_config(config_json)?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;

        let width = match container.client_width() {
            w if w > 0 => w as u32,
            _ => config.surface.width,
        };
        let height = match container.client_height() {
            h if h > 0 => h as u32,
            _ => config.surface.height,
        };
        canvas.set_width(width);
        canvas.set_height(height);
        container.append_child(&canvas)?;

        Self::mount(config, canvas, Some(container))
    }

    fn mount(
        config: ViewConfig,
        canvas: HtmlCanvasElement,
        container: Option<HtmlElement>,
    ) -> Result<WasmAnimation, JsValue> {
        let universe = Universe::new(
            config.universe.width,
            config.universe.height,
            config.universe.seed,
        );
        let surface = Canvas2d::from_canvas(&canvas)?;

        let backend: Box<dyn RenderBackend> = match config.backend {
            BackendKind::Raster => {
                let mut backend = RasterBackend::new(config.palette);
                backend.initialize(surface, &universe).map_err(to_js)?;
                Box::new(backend)
            }
            BackendKind::Scene => {
                let mut backend = SceneBackend::new(config.palette, config.field_of_view);
                backend
                    .initialize(SoftwareRenderer::new(surface), &universe)
                    .map_err(to_js)?;
                Box::new(backend)
            }
        };

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let host = BrowserHost::new(callback.clone())?;
        let view = AnimationView::mount(universe, backend, host, &config).map_err(to_js)?;
        let view = Rc::new(RefCell::new(Some(view)));

        // The callback only holds a weak reference, so the view and its host
        // (which owns the callback) do not keep each other alive.
        let weak: Weak<RefCell<Option<BrowserView>>> = Rc::downgrade(&view);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_timestamp: f64| {
            let Some(view) = weak.upgrade() else {
                return;
            };
            let mut slot = view.borrow_mut();
            if let Some(view) = slot.as_mut() {
                if let Err(e) = view.on_animation_frame() {
                    log::error!("Frame failed, animation stopped: {e}");
                }
            }
        }) as Box<dyn FnMut(f64)>));

        Ok(WasmAnimation {
            view,
            callback,
            canvas,
            container,
        })
    }

    fn with_view<T>(
        &self,
        f: impl FnOnce(&mut BrowserView) -> Result<T, RenderError>,
    ) -> Result<T, JsValue> {
        let mut slot = self.view.borrow_mut();
        let view = slot
            .as_mut()
            .ok_or_else(|| JsValue::from_str("View has been unmounted"))?;
        f(view).map_err(to_js)
    }

    /// Start the animation loop. Returns whether the state changed.
    #[wasm_bindgen]
    pub fn start(&self) -> Result<bool, JsValue> {
        self.with_view(|view| Ok(view.start()))
    }

    /// Pause the animation loop. Returns whether the state changed.
    #[wasm_bindgen]
    pub fn pause(&self) -> Result<bool, JsValue> {
        self.with_view(|view| Ok(view.pause()))
    }

    #[wasm_bindgen(js_name = isPaused)]
    pub fn is_paused(&self) -> Result<bool, JsValue> {
        self.with_view(|view| Ok(view.is_paused()))
    }

    /// Play/pause toggle. Returns `true` if now running.
    #[wasm_bindgen(js_name = togglePlayback)]
    pub fn toggle_playback(&self) -> Result<bool, JsValue> {
        self.with_view(|view| Ok(view.toggle_playback()))
    }

    /// Kill every cell and redraw.
    #[wasm_bindgen]
    pub fn clear(&self) -> Result<(), JsValue> {
        self.with_view(|view| view.clear().map(|_| ()))
    }

    /// Re-randomize the universe and redraw.
    #[wasm_bindgen]
    pub fn reset(&self) -> Result<(), JsValue> {
        self.with_view(|view| view.reset().map(|_| ()))
    }

    /// Canvas click handler: alt inserts a glider, shift a pulsar, otherwise
    /// the clicked cell is toggled.
    #[wasm_bindgen(js_name = handleClick)]
    pub fn handle_click(&self, event: &MouseEvent) -> Result<(), JsValue> {
        let rect = self.canvas.get_bounding_client_rect();
        let click = ClickEvent {
            pointer: PointerInput {
                client_x: event.client_x() as f64,
                client_y: event.client_y() as f64,
                bounds: BoundingRect {
                    left: rect.left(),
                    top: rect.top(),
                    width: rect.width(),
                    height: rect.height(),
                },
            },
            modifiers: Modifiers {
                alt: event.alt_key(),
                shift: event.shift_key(),
            },
        };
        self.with_view(|view| view.click(&click).map(|_| ()))
    }

    /// Latest / mean / min / max frame rate as a JS object.
    #[wasm_bindgen(js_name = frameRate)]
    pub fn frame_rate(&self) -> Result<JsValue, JsValue> {
        let stats = self.with_view(|view| Ok(view.frame_rate()))?;
        serde_wasm_bindgen::to_value(&stats)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Tear the view down: pause, drop the backend, and remove a canvas this
    /// view created. Safe to call more than once.
    #[wasm_bindgen]
    pub fn unmount(&mut self) -> Result<(), JsValue> {
        let view = self.view.borrow_mut().take();
        if let Some(view) = view {
            drop(view.unmount());
        }
        self.callback.borrow_mut().take();
        if let Some(container) = self.container.take() {
            container.remove_child(&self.canvas)?;
        }
        Ok(())
    }
}

// ============================================================================
// Universe
// ============================================================================

/// WebAssembly wrapper exposing the engine directly.
#[wasm_bindgen]
pub struct WasmUniverse {
    universe: Universe,
}

#[wasm_bindgen]
impl WasmUniverse {
    /// Create a random universe. Pass `undefined` as `seed` for OS entropy.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u16, height: u16, seed: Option<u64>) -> WasmUniverse {
        WasmUniverse {
            universe: Universe::new(width, height, seed),
        }
    }

    #[wasm_bindgen]
    pub fn width(&self) -> u16 {
        self.universe.width()
    }

    #[wasm_bindgen]
    pub fn height(&self) -> u16 {
        self.universe.height()
    }

    #[wasm_bindgen]
    pub fn tick(&mut self) {
        self.universe.tick();
    }

    /// Cell states, one byte per cell, row-major.
    #[wasm_bindgen]
    pub fn cells(&self) -> Vec<u8> {
        self.universe.cell_bytes().to_vec()
    }

    /// Changed cells as flat `[row, column, row, column, ...]` slots.
    #[wasm_bindgen(js_name = changedCells)]
    pub fn changed_cells(&self) -> Vec<u16> {
        self.universe.changed_cells_raw().to_vec()
    }

    /// Number of changed (row, column) pairs.
    #[wasm_bindgen(js_name = changedCellsLength)]
    pub fn changed_cells_length(&self) -> usize {
        self.universe.changed_cells_count()
    }

    #[wasm_bindgen(js_name = clearChangedCells)]
    pub fn clear_changed_cells(&mut self) {
        self.universe.clear_changed_cells();
    }

    #[wasm_bindgen(js_name = toggleCell)]
    pub fn toggle_cell(&mut self, row: u16, column: u16) -> Result<(), JsValue> {
        let CellCoordinates(row, column) = self.checked(row, column)?;
        self.universe.toggle_cell(row, column);
        Ok(())
    }

    #[wasm_bindgen(js_name = insertGlider)]
    pub fn insert_glider(&mut self, row: u16, column: u16) -> Result<(), JsValue> {
        let CellCoordinates(row, column) = self.checked(row, column)?;
        self.universe.insert_glider(row, column);
        Ok(())
    }

    #[wasm_bindgen(js_name = insertPulsar)]
    pub fn insert_pulsar(&mut self, row: u16, column: u16) -> Result<(), JsValue> {
        let CellCoordinates(row, column) = self.checked(row, column)?;
        self.universe.insert_pulsar(row, column);
        Ok(())
    }

    fn checked(&self, row: u16, column: u16) -> Result<CellCoordinates, JsValue> {
        self.universe
            .check_bounds(row, column)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) {
        Engine::clear(&mut self.universe);
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.universe.reset();
    }

    /// Text rendering of the current generation.
    #[wasm_bindgen]
    pub fn render(&self) -> String {
        self.universe.render()
    }
}
