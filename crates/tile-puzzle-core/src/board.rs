//! Puzzle board state: piece assignment, displaced-set tracking, swap and
//! solve operations.

use crate::layout::{compute_piece_style, DisplaySize, PieceStyle};
use crate::scramble::Scrambler;
use crate::{GridDimensions, PieceId, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of a swap, for callers deciding what to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapEffect {
    /// The overall solved/unsolved status flipped during this swap.
    pub solved_changed: bool,
    /// The board is solved after the swap.
    pub now_solved: bool,
}

/// The puzzle board: which piece sits in each grid position.
///
/// Invariants:
/// - the assignment is always a permutation of the identity arrangement
///   (every piece appears in exactly one position);
/// - `displaced` is always exactly the set of positions whose assigned
///   piece is not their home piece, maintained incrementally on every
///   mutation rather than recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    grid: GridDimensions,
    assignment: Vec<PieceId>,
    displaced: HashSet<Position>,
}

impl Board {
    /// Create a board scrambled into a guaranteed-unsolved arrangement.
    ///
    /// Initialization never leaves the puzzle pre-solved (for any grid with
    /// at least 2 pieces).
    pub fn scrambled(grid: GridDimensions, scrambler: &mut Scrambler) -> Self {
        let scramble = scrambler.scramble(grid);
        Self {
            grid,
            assignment: scramble.assignment,
            displaced: scramble.displaced,
        }
    }

    /// Create a board in the solved arrangement.
    pub fn solved(grid: GridDimensions) -> Self {
        Self {
            grid,
            assignment: grid.positions().map(PieceId::home).collect(),
            displaced: HashSet::new(),
        }
    }

    pub fn grid(&self) -> GridDimensions {
        self.grid
    }

    /// The piece currently occupying `pos`.
    pub fn piece_at(&self, pos: Position) -> PieceId {
        self.assignment[self.grid.index_of(pos)]
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.grid.positions()
    }

    pub fn is_solved(&self) -> bool {
        self.displaced.is_empty()
    }

    /// Number of positions holding a piece other than their home piece.
    pub fn displaced_count(&self) -> usize {
        self.displaced.len()
    }

    /// Whether the piece at `pos` is out of place.
    pub fn is_displaced(&self, pos: Position) -> bool {
        self.displaced.contains(&pos)
    }

    /// Exchange the pieces at two positions.
    ///
    /// `swap(p, p)` is a valid no-op. The displaced set is updated per
    /// position in O(1); swapping on a solved board is permitted and
    /// transitions it back to unsolved. Returns the swap outcome, including
    /// whether the solved status flipped.
    pub fn swap(&mut self, a: Position, b: Position) -> SwapEffect {
        let was_solved = self.is_solved();

        let ia = self.grid.index_of(a);
        let ib = self.grid.index_of(b);
        self.assignment.swap(ia, ib);
        self.update_displaced(a);
        self.update_displaced(b);

        let now_solved = self.is_solved();
        SwapEffect {
            solved_changed: now_solved != was_solved,
            now_solved,
        }
    }

    fn update_displaced(&mut self, pos: Position) {
        if self.piece_at(pos) == PieceId::home(pos) {
            self.displaced.remove(&pos);
        } else {
            self.displaced.insert(pos);
        }
    }

    /// Snap every piece back to its home position. Idempotent.
    pub fn solve(&mut self) {
        for (index, slot) in self.assignment.iter_mut().enumerate() {
            *slot = PieceId::home(self.grid.position_at(index));
        }
        self.displaced.clear();
    }

    /// Re-scramble in place against the current grid dimensions.
    pub fn shuffle(&mut self, scrambler: &mut Scrambler) {
        let scramble = scrambler.scramble(self.grid);
        self.assignment = scramble.assignment;
        self.displaced = scramble.displaced;
    }

    /// Styling for the tile currently shown at `pos`.
    ///
    /// The sprite window and border sides follow the occupying piece's home
    /// coordinates. Pure: re-layout after a resize is just calling this
    /// with the new display size; assignment and displaced set are never
    /// touched by layout changes.
    pub fn style_for(&self, pos: Position, display: DisplaySize) -> PieceStyle {
        compute_piece_style(
            self.piece_at(pos).home_position(),
            self.grid,
            display,
            self.is_solved(),
        )
    }
}
