//! Core engine for image swap puzzles.
//!
//! An image is cut into a grid of tiles; the player restores it by swapping
//! pairs of tiles. This crate owns everything with real invariants: grid
//! dimensioning from an image's size and a desired piece count
//! ([`compute_grid`]), display-size fitting ([`compute_display_size`]),
//! guaranteed-unsolved scrambling ([`Scrambler`]), and the board state with
//! incremental out-of-place tracking ([`Board`]). Image loading, DOM
//! rendering and drag-and-drop wiring live in the companion WASM crate.

mod board;
pub mod config;
mod layout;
mod scramble;

pub use board::{Board, SwapEffect};
pub use layout::{
    compute_display_size, compute_grid, compute_piece_style, BorderSides, DisplaySize, PieceStyle,
    BORDER_PX,
};
pub use scramble::{Scramble, Scrambler};

use serde::{Deserialize, Serialize};

/// A grid cell, identified by 1-indexed row and column.
///
/// Every position holds exactly one piece at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Identity of a puzzle piece: the position it occupies when solved.
///
/// Stable across re-layouts with the same grid dimensions. The id doubles as
/// the DOM id of the piece's sprite (`p_<row>_<col>`), which is what the
/// drag-and-drop adapter passes around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(Position);

impl PieceId {
    /// The piece that belongs at `position`.
    pub const fn home(position: Position) -> Self {
        Self(position)
    }

    /// Where this piece sits when the puzzle is solved.
    pub const fn home_position(&self) -> Position {
        self.0
    }

    /// DOM id string for this piece, `p_<row>_<col>`.
    pub fn dom_id(&self) -> String {
        format!("p_{}_{}", self.0.row, self.0.col)
    }

    /// Parse a `p_<row>_<col>` DOM id back into a piece id.
    pub fn from_dom_id(id: &str) -> Option<Self> {
        let rest = id.strip_prefix("p_")?;
        let (row, col) = rest.split_once('_')?;
        let row = row.parse().ok()?;
        let col = col.parse().ok()?;
        Some(Self(Position::new(row, col)))
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dom_id())
    }
}

/// Row and column counts of the puzzle grid.
///
/// Recomputed only when the image identity or the desired piece count
/// changes, never on a plain resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: u32,
    pub cols: u32,
}

impl GridDimensions {
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Total number of pieces in the grid.
    pub const fn piece_count(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    /// Row-major index of a position; positions are 1-indexed.
    pub const fn index_of(&self, pos: Position) -> usize {
        ((pos.row - 1) * self.cols + (pos.col - 1)) as usize
    }

    /// Position at a row-major index.
    pub const fn position_at(&self, index: usize) -> Position {
        let index = index as u32;
        Position::new(index / self.cols + 1, index % self.cols + 1)
    }

    /// Whether the position lies inside this grid.
    pub const fn contains(&self, pos: Position) -> bool {
        pos.row >= 1 && pos.row <= self.rows && pos.col >= 1 && pos.col <= self.cols
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let cols = self.cols;
        (1..=self.rows).flat_map(move |row| (1..=cols).map(move |col| Position::new(row, col)))
    }
}

impl std::fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
