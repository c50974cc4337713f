//! Grid layout calculation and piece styling.
//!
//! Everything here is a pure function over image/container geometry; nothing
//! mutates state, so it can be re-run on every resize or render.

use crate::{GridDimensions, Position};
use serde::{Deserialize, Serialize};

/// Border thickness in px around each tile while the puzzle is unsolved.
pub const BORDER_PX: f64 = 2.0;

/// Size at which the scaled image is displayed, in px.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Which edges of a tile draw a visible border.
///
/// Interior edges are hidden so adjacent tiles appear seamless; only the
/// outer edge of the grid is outlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderSides {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

/// Derived presentation data for one tile sprite.
///
/// Fully recomputable from grid dimensions, display size and the solved
/// flag; holds no state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceStyle {
    /// Tile size in px, border excluded.
    pub width: f64,
    pub height: f64,
    /// Background sprite offset in px (non-positive).
    pub background_x: f64,
    pub background_y: f64,
    /// Size the full image is stretched to behind the sprite window.
    pub background_width: f64,
    pub background_height: f64,
    /// Border thickness in px; 0 when the puzzle is solved.
    pub border_px: f64,
    pub border_sides: BorderSides,
    /// Play the solved celebration animation.
    pub solved_animation: bool,
}

/// Compute row/column counts for an image of the given size cut into
/// roughly `desired_pieces` square-ish tiles.
///
/// Target piece area is `width * height / desired_pieces`; the longer image
/// axis gets `floor(axis / sqrt(area))` tiles and the other axis takes the
/// remainder. Callers validate `desired_pieces` into `[4, 64]` beforehand
/// (see [`crate::config`]); computed dimensions are clamped to at least 1 so
/// a degenerate container cannot produce an empty grid.
pub fn compute_grid(image_width: f64, image_height: f64, desired_pieces: u32) -> GridDimensions {
    let desired = desired_pieces.max(1);
    let side = (image_width * image_height / desired as f64).sqrt();

    if image_height > image_width {
        let rows = ((image_height / side) as u32).max(1);
        let cols = (desired / rows).max(1);
        GridDimensions::new(rows, cols)
    } else {
        let cols = ((image_width / side) as u32).max(1);
        let rows = (desired / cols).max(1);
        GridDimensions::new(rows, cols)
    }
}

/// Scale an image to best fit a container while preserving aspect ratio.
///
/// An image smaller than the container in both dimensions is scaled up to
/// fill the container width; an oversized image is scaled down to fit the
/// width. In either case the height is then clamped to the container, with
/// the width re-derived from the aspect ratio. Pure; never mutates the
/// image.
pub fn compute_display_size(
    natural_width: f64,
    natural_height: f64,
    container_width: f64,
    container_height: f64,
) -> DisplaySize {
    let aspect_ratio = natural_width / natural_height;

    let mut width = natural_width;
    let mut height = natural_height;

    if height < container_height && width < container_width {
        width = container_width;
        height = width / aspect_ratio;
    }

    if width > container_width {
        width = container_width;
        height = width / aspect_ratio;
    }

    if height > container_height {
        height = container_height;
        width = height * aspect_ratio;
    }

    DisplaySize::new(width, height)
}

/// Compute the style for the tile whose home is `home`.
///
/// The sprite window is offset by whole tiles from the image origin, and the
/// full image is sized so that `cols x rows` tiles (minus their borders)
/// exactly tile it. Border sides are visible only on the outer edge of the
/// grid, keyed by the piece's home coordinates so the outline travels with
/// the piece while scrambled.
pub fn compute_piece_style(
    home: Position,
    grid: GridDimensions,
    display: DisplaySize,
    solved: bool,
) -> PieceStyle {
    let border = if solved { 0.0 } else { BORDER_PX };
    let rows = grid.rows as f64;
    let cols = grid.cols as f64;

    let width = display.width / cols - border * 2.0;
    let height = display.height / rows - border * 2.0;

    PieceStyle {
        width,
        height,
        background_x: -(home.col as f64 - 1.0) * width,
        background_y: -(home.row as f64 - 1.0) * height,
        background_width: display.width - border * 2.0 * cols,
        background_height: display.height - border * 2.0 * rows,
        border_px: border,
        border_sides: BorderSides {
            top: home.row == 1,
            right: home.col == grid.cols,
            bottom: home.row == grid.rows,
            left: home.col == 1,
        },
        solved_animation: solved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_size_close(actual: DisplaySize, width: f64, height: f64) {
        assert!(
            (actual.width - width).abs() < 1e-9 && (actual.height - height).abs() < 1e-9,
            "expected {}x{}, got {}x{}",
            width,
            height,
            actual.width,
            actual.height
        );
    }

    #[test]
    fn test_compute_grid_landscape() {
        // 400x300 into 16 pieces: side = sqrt(7500) ~ 86.6 -> 4 cols, 4 rows
        let grid = compute_grid(400.0, 300.0, 16);
        assert_eq!(grid, GridDimensions::new(4, 4));
    }

    #[test]
    fn test_compute_grid_portrait() {
        let grid = compute_grid(300.0, 400.0, 16);
        assert_eq!(grid, GridDimensions::new(4, 4));
    }

    #[test]
    fn test_compute_grid_wide_image_gets_more_columns() {
        let grid = compute_grid(800.0, 200.0, 16);
        assert!(grid.cols > grid.rows);
        assert!(grid.piece_count() >= 4);
    }

    #[test]
    fn test_compute_grid_degenerate_size_clamps_to_one() {
        let grid = compute_grid(0.0, 0.0, 16);
        assert!(grid.rows >= 1 && grid.cols >= 1);
    }

    #[test]
    fn test_display_size_scales_down_to_container() {
        // Image 800x600 in a 400x600 container: width capped to 400,
        // height derived as 300, which fits.
        let size = compute_display_size(800.0, 600.0, 400.0, 600.0);
        assert_size_close(size, 400.0, 300.0);
    }

    #[test]
    fn test_display_size_scales_up_small_image() {
        // 100x50 in 400x400: fill width, height follows the aspect ratio.
        let size = compute_display_size(100.0, 50.0, 400.0, 400.0);
        assert_eq!(size, DisplaySize::new(400.0, 200.0));
    }

    #[test]
    fn test_display_size_clamps_height_after_scale_up() {
        // 100x100 in 400x200: filling the width overflows the height, so
        // the height wins and the width is re-derived.
        let size = compute_display_size(100.0, 100.0, 400.0, 200.0);
        assert_eq!(size, DisplaySize::new(200.0, 200.0));
    }

    #[test]
    fn test_display_size_exact_fit_unchanged() {
        let size = compute_display_size(400.0, 300.0, 400.0, 300.0);
        assert_eq!(size, DisplaySize::new(400.0, 300.0));
    }

    #[test]
    fn test_piece_style_geometry() {
        let grid = GridDimensions::new(4, 4);
        let display = DisplaySize::new(400.0, 300.0);
        let style = compute_piece_style(Position::new(2, 3), grid, display, false);

        assert_eq!(style.border_px, BORDER_PX);
        assert_eq!(style.width, 400.0 / 4.0 - 4.0);
        assert_eq!(style.height, 300.0 / 4.0 - 4.0);
        assert_eq!(style.background_x, -2.0 * style.width);
        assert_eq!(style.background_y, -1.0 * style.height);
        assert_eq!(style.background_width, 400.0 - 4.0 * 4.0);
        assert_eq!(style.background_height, 300.0 - 4.0 * 4.0);
        assert!(!style.solved_animation);
    }

    #[test]
    fn test_piece_style_border_sides() {
        let grid = GridDimensions::new(3, 3);
        let display = DisplaySize::new(300.0, 300.0);

        let corner = compute_piece_style(Position::new(1, 1), grid, display, false);
        assert!(corner.border_sides.top && corner.border_sides.left);
        assert!(!corner.border_sides.bottom && !corner.border_sides.right);

        let center = compute_piece_style(Position::new(2, 2), grid, display, false);
        assert!(
            !center.border_sides.top
                && !center.border_sides.right
                && !center.border_sides.bottom
                && !center.border_sides.left
        );

        let far_corner = compute_piece_style(Position::new(3, 3), grid, display, false);
        assert!(far_corner.border_sides.bottom && far_corner.border_sides.right);
    }

    #[test]
    fn test_piece_style_solved_drops_border_and_animates() {
        let grid = GridDimensions::new(4, 4);
        let display = DisplaySize::new(400.0, 400.0);
        let style = compute_piece_style(Position::new(1, 1), grid, display, true);

        assert_eq!(style.border_px, 0.0);
        assert_eq!(style.width, 100.0);
        assert_eq!(style.background_width, 400.0);
        assert!(style.solved_animation);
    }
}
