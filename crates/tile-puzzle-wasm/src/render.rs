//! DOM rendering for the puzzle component.
//!
//! The component re-renders from scratch on every state change: placeholder
//! text for the no-source/loading/error states, or a CSS grid of draggable
//! tile `<div>`s whose inline styles carry the sprite geometry.

use crate::component::{ComponentState, PuzzleComponent};
use tile_puzzle_core::{BorderSides, PieceId, PieceStyle};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

/// CSS class applied to a tile while a dragged tile hovers over it.
pub const DRAG_HOVER_CLASS: &str = "drag_hover";

/// Animation shorthand replayed on the two tiles of an unsolved swap.
pub const PIECE_MOVED_ANIMATION: &str = "piece_moved_frames 250ms";

/// Animation shorthand applied to every tile when the puzzle is solved.
pub const PUZZLE_SOLVED_ANIMATION: &str = "puzzle_solved_frames 3s";

const STYLE_ELEMENT_ID: &str = "tile-puzzle-style";

const STYLESHEET: &str = "\
#puzzle_grid { display: grid; place-items: center; }\n\
#puzzle_grid div:hover { filter: hue-rotate(90deg); touch-action: none; cursor: move; }\n\
.drag_hover { filter: hue-rotate(90deg); }\n\
[draggable=true] { -webkit-user-drag: element; -webkit-user-select: none; }\n\
@keyframes piece_moved_frames { to { transform: rotate(360deg); } }\n\
@keyframes puzzle_solved_frames {\n\
  0%, 7% { transform: rotateZ(0) scale(1); }\n\
  15% { transform: rotateZ(-15deg) scale(0.9); }\n\
  20% { transform: rotateZ(10deg) scale(0.8); }\n\
  25% { transform: rotateZ(-10deg) scale(0.7); }\n\
  30% { transform: rotateZ(6deg) scale(0.8); }\n\
  35% { transform: rotateZ(-4deg) scale(0.9); }\n\
  40%, 100% { transform: rotateZ(0) scale(1); }\n\
}\n";

/// Inject the component stylesheet once per document.
pub fn ensure_stylesheet(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return Ok(());
    }
    let style = document.create_element("style")?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(STYLESHEET));
    document
        .head()
        .ok_or("No document head")?
        .append_child(&style)?;
    Ok(())
}

/// Render the component into the host element.
pub fn render(
    document: &Document,
    host: &HtmlElement,
    component: &PuzzleComponent,
) -> Result<(), JsValue> {
    host.set_inner_html("");
    match component.state() {
        ComponentState::NoSource => {
            render_placeholder(document, host, "No image source has been set")
        }
        ComponentState::Loading => render_placeholder(document, host, "Image is loading ..."),
        ComponentState::Error => render_placeholder(document, host, "Error: unable to load image"),
        ComponentState::Unsolved | ComponentState::Solved => render_grid(document, host, component),
    }
}

fn render_placeholder(document: &Document, host: &HtmlElement, message: &str) -> Result<(), JsValue> {
    let paragraph = document.create_element("p")?;
    paragraph.set_text_content(Some(message));
    host.append_child(&paragraph)?;
    Ok(())
}

fn render_grid(
    document: &Document,
    host: &HtmlElement,
    component: &PuzzleComponent,
) -> Result<(), JsValue> {
    let (Some(board), Some(src)) = (component.board(), component.src()) else {
        return Ok(());
    };
    let display = component.display();
    let grid = board.grid();

    let grid_el = document.create_element("span")?.dyn_into::<HtmlElement>()?;
    grid_el.set_id("puzzle_grid");
    let css = grid_el.style();
    css.set_property(
        "grid-template",
        &format!("repeat({}, 1fr) / repeat({}, 1fr)", grid.rows, grid.cols),
    )?;
    css.set_property("width", &px(display.width))?;
    css.set_property("height", &px(display.height))?;

    for pos in board.positions() {
        let tile = document.create_element("div")?.dyn_into::<HtmlElement>()?;
        // The DOM id names the grid position; the occupying piece only
        // shows through the sprite styling.
        tile.set_id(&PieceId::home(pos).dom_id());
        tile.set_attribute("draggable", "true")?;
        apply_piece_style(
            &tile,
            &board.style_for(pos, display),
            src,
            component.border_color(),
        )?;
        grid_el.append_child(&tile)?;
    }

    host.append_child(&grid_el)?;
    Ok(())
}

fn apply_piece_style(
    tile: &HtmlElement,
    style: &PieceStyle,
    src: &str,
    border_color: &str,
) -> Result<(), JsValue> {
    let css = tile.style();
    css.set_property("width", &px(style.width))?;
    css.set_property("height", &px(style.height))?;
    css.set_property("background-image", &format!("url('{}')", src))?;
    css.set_property("background-position-x", &px(style.background_x))?;
    css.set_property("background-position-y", &px(style.background_y))?;
    css.set_property(
        "background-size",
        &format!("{} {}", px(style.background_width), px(style.background_height)),
    )?;
    css.set_property("border-color", border_color)?;
    css.set_property("border-width", &px(style.border_px))?;
    css.set_property("border-style", &border_style(&style.border_sides))?;
    if style.solved_animation {
        css.set_property("animation", PUZZLE_SOLVED_ANIMATION)?;
    }
    Ok(())
}

/// CSS `border-style` shorthand: top, right, bottom, left.
fn border_style(sides: &BorderSides) -> String {
    fn edge(visible: bool) -> &'static str {
        if visible {
            "solid"
        } else {
            "hidden"
        }
    }
    format!(
        "{} {} {} {}",
        edge(sides.top),
        edge(sides.right),
        edge(sides.bottom),
        edge(sides.left)
    )
}

fn px(value: f64) -> String {
    format!("{}px", value)
}
