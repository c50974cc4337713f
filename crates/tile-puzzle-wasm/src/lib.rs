//! WebAssembly image puzzle component.
//!
//! Renders an image as a CSS grid of draggable tiles that the player
//! restores by swapping pairs. The host page attaches an [`ImagePuzzle`] to
//! a container element and forwards DOM events to it:
//!
//! ```js
//! const puzzle = new ImagePuzzle("puzzle");
//! puzzle.set_src("photo.jpg");
//! host.addEventListener("dragstart", e => puzzle.handle_drag_start(e));
//! host.addEventListener("dragenter", e => puzzle.handle_drag_enter(e));
//! host.addEventListener("dragover", e => puzzle.handle_drag_over(e));
//! host.addEventListener("dragleave", e => puzzle.handle_drag_leave(e));
//! host.addEventListener("drop", e => puzzle.handle_drop(e));
//! new ResizeObserver(() => puzzle.resize(host.clientWidth, host.clientHeight)).observe(host);
//! host.addEventListener("componentStateChanged", e => console.log(e.detail.state));
//! ```
//!
//! All puzzle semantics live in `tile-puzzle-core`; this crate is DOM glue,
//! image loading and gesture translation.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use tile_puzzle_core::config::DEFAULT_BORDER_COLOR;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Document, DragEvent, HtmlElement};

mod component;
mod loader;
mod render;

pub use component::{ComponentState, LoadRequest, NaturalSize, PuzzleComponent, Snapshot};

/// Event dispatched on the host element whenever the lifecycle state
/// changes; `detail.state` carries the new state tag.
pub const STATE_CHANGED_EVENT: &str = "componentStateChanged";

// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

pub(crate) struct Inner {
    pub(crate) document: Document,
    pub(crate) host: HtmlElement,
    pub(crate) component: PuzzleComponent,
}

/// The image puzzle controller, attached to a host element.
#[wasm_bindgen]
pub struct ImagePuzzle {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl ImagePuzzle {
    /// Attach a puzzle to the element with the given id.
    ///
    /// No `componentStateChanged` event is dispatched for the initial
    /// state (listeners cannot be attached yet); read [`Self::state`]
    /// after construction instead.
    #[wasm_bindgen(constructor)]
    pub fn new(host_id: &str) -> Result<ImagePuzzle, JsValue> {
        let document = web_sys::window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;

        let host = document
            .get_element_by_id(host_id)
            .ok_or("Host element not found")?
            .dyn_into::<HtmlElement>()?;

        render::ensure_stylesheet(&document)?;

        let mut component = PuzzleComponent::new();
        component.resized(host.client_width() as f64, host.client_height() as f64);

        let inner = Rc::new(RefCell::new(Inner {
            document,
            host,
            component,
        }));
        {
            let mut inner_mut = inner.borrow_mut();
            inner_mut.component.take_state_change();
            let _ = render::render(&inner_mut.document, &inner_mut.host, &inner_mut.component);
        }
        Ok(ImagePuzzle { inner })
    }

    /// Set or replace the image source. Empty/whitespace clears the puzzle;
    /// a changed source starts a fresh load (stale completions of older
    /// loads are discarded).
    pub fn set_src(&self, value: &str) {
        let request = self.inner.borrow_mut().component.set_src(value);
        if let Some(request) = request {
            let _ = loader::start_load(&self.inner, &request.src, request.generation);
        }
        sync(&self.inner);
    }

    /// Set the desired piece count; values outside [4, 64] fall back to the
    /// default of 16.
    pub fn set_desired_piece_count(&self, value: &str) {
        self.inner
            .borrow_mut()
            .component
            .set_desired_piece_count(value);
        sync(&self.inner);
    }

    /// Set the tile border color; anything the document's CSS parser
    /// rejects falls back to "white".
    pub fn set_border_color(&self, value: &str) {
        let resolved = {
            let inner = self.inner.borrow();
            resolve_color(&inner.document, value)
        };
        self.inner.borrow_mut().component.set_border_color(resolved);
        sync(&self.inner);
    }

    /// Host container resize notification; recomputes display size and
    /// styling only, the arrangement is untouched.
    pub fn resize(&self, width: f64, height: f64) {
        self.inner.borrow_mut().component.resized(width, height);
        sync(&self.inner);
    }

    /// Re-scramble the current puzzle.
    pub fn shuffle(&self) {
        self.inner.borrow_mut().component.shuffle();
        sync(&self.inner);
    }

    /// Snap every tile back to its home position.
    pub fn solve(&self) {
        self.inner.borrow_mut().component.solve();
        sync(&self.inner);
    }

    pub fn is_solved(&self) -> bool {
        self.inner.borrow().component.state() == ComponentState::Solved
    }

    /// Current lifecycle state tag.
    pub fn state(&self) -> String {
        self.inner.borrow().component.state().tag().to_string()
    }

    /// Read-only snapshot as JSON.
    pub fn get_state_json(&self) -> String {
        serde_json::to_string(&self.inner.borrow().component.snapshot()).unwrap_or_default()
    }

    /// Read-only snapshot as a plain JS object.
    pub fn get_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.inner.borrow().component.snapshot())
            .unwrap_or(JsValue::NULL)
    }

    /// dragstart: record the dragged tile in the event's data transfer.
    pub fn handle_drag_start(&self, event: &DragEvent) {
        let Some(target) = event_target(event) else {
            return;
        };
        if let Some(transfer) = event.data_transfer() {
            let _ = transfer.set_data("text", &target.id());
            transfer.set_effect_allowed("move");
        }
    }

    /// dragenter: accept the drop and mark the hovered tile.
    pub fn handle_drag_enter(&self, event: &DragEvent) {
        event.prevent_default();
        if let Some(transfer) = event.data_transfer() {
            transfer.set_drop_effect("move");
        }
        if let Some(target) = event_target(event) {
            let _ = target.class_list().add_1(render::DRAG_HOVER_CLASS);
        }
    }

    /// dragover: must be cancelled for the element to accept drops.
    pub fn handle_drag_over(&self, event: &DragEvent) {
        event.prevent_default();
    }

    /// dragleave: clear the hover mark.
    pub fn handle_drag_leave(&self, event: &DragEvent) {
        if let Some(target) = event_target(event) {
            let _ = target.class_list().remove_1(render::DRAG_HOVER_CLASS);
        }
    }

    /// drop: swap the dragged tile with the drop target.
    pub fn handle_drop(&self, event: &DragEvent) {
        event.prevent_default();
        let Some(target) = event_target(event) else {
            return;
        };
        let _ = target.class_list().remove_1(render::DRAG_HOVER_CLASS);

        let Some(transfer) = event.data_transfer() else {
            return;
        };
        let Ok(source_id) = transfer.get_data("text") else {
            return;
        };
        let target_id = target.id();

        let effect = self
            .inner
            .borrow_mut()
            .component
            .drop_piece(&source_id, &target_id);
        sync(&self.inner);

        if let Some(effect) = effect {
            if !effect.now_solved {
                self.replay_moved_animation(&source_id, &target_id);
            }
        }
    }
}

impl ImagePuzzle {
    /// Restart the tile-moved animation on the two freshly rendered tiles.
    fn replay_moved_animation(&self, source_id: &str, target_id: &str) {
        let inner = self.inner.borrow();
        for id in [source_id, target_id] {
            if let Some(tile) = inner
                .document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = tile
                    .style()
                    .set_property("animation", render::PIECE_MOVED_ANIMATION);
            }
        }
    }
}

/// Re-render and, when the lifecycle state changed, notify the host page.
///
/// The event is dispatched only after every borrow of the shared state has
/// been released: listeners run synchronously and may re-enter any mutating
/// entry point.
pub(crate) fn sync(inner: &Rc<RefCell<Inner>>) {
    let (host, changed) = {
        let mut inner_mut = inner.borrow_mut();
        let changed = inner_mut.component.take_state_change();
        let _ = render::render(&inner_mut.document, &inner_mut.host, &inner_mut.component);
        (inner_mut.host.clone(), changed)
    };
    if let Some(state) = changed {
        emit_state_changed(&host, state);
    }
}

fn emit_state_changed(host: &HtmlElement, state: ComponentState) {
    #[derive(Serialize)]
    struct Detail<'a> {
        state: &'a str,
    }

    let init = CustomEventInit::new();
    init.set_bubbles(true);
    init.set_composed(true);
    init.set_cancelable(true);
    init.set_detail(
        &serde_wasm_bindgen::to_value(&Detail { state: state.tag() }).unwrap_or(JsValue::NULL),
    );

    if let Ok(event) = CustomEvent::new_with_event_init_dict(STATE_CHANGED_EVENT, &init) {
        let _ = host.dispatch_event(&event);
    }
}

fn event_target(event: &DragEvent) -> Option<HtmlElement> {
    event
        .target()
        .and_then(|target| target.dyn_into::<HtmlElement>().ok())
}

/// Resolve a candidate border color against the document's CSS parser;
/// unresolvable values fall back to the default.
fn resolve_color(document: &Document, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return DEFAULT_BORDER_COLOR.to_string();
    }

    let probe = document
        .create_element("span")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let Some(probe) = probe else {
        return DEFAULT_BORDER_COLOR.to_string();
    };

    // Invalid colors are rejected by the CSS parser, leaving the property
    // empty.
    let style = probe.style();
    let _ = style.set_property("color", trimmed);
    match style.get_property_value("color") {
        Ok(resolved) if !resolved.is_empty() => trimmed.to_string(),
        _ => DEFAULT_BORDER_COLOR.to_string(),
    }
}
