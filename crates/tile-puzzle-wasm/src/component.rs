//! Component state management for the image puzzle.
//!
//! Pure Rust with no DOM access, so everything here is unit-testable on any
//! target. The [`crate::ImagePuzzle`] controller feeds it attribute values,
//! load completions, resize notifications and drop gestures.

use serde::{Deserialize, Serialize};
use tile_puzzle_core::config::{self, DEFAULT_BORDER_COLOR, DEFAULT_PIECE_COUNT};
use tile_puzzle_core::{
    compute_display_size, compute_grid, Board, DisplaySize, PieceId, PieceStyle, Scrambler,
    SwapEffect,
};

/// Externally visible lifecycle state, reported through the
/// `componentStateChanged` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentState {
    /// No image source configured; a distinct display state, not a failure.
    NoSource,
    /// A load request for the current source is in flight.
    Loading,
    /// The current source failed to load; a new source is required to retry.
    Error,
    /// Image loaded, at least one tile out of place.
    Unsolved,
    /// Image loaded and every tile is home.
    Solved,
}

impl ComponentState {
    /// Event-payload tag for this state.
    pub fn tag(&self) -> &'static str {
        match self {
            ComponentState::NoSource => "no_image_source_set",
            ComponentState::Loading => "image_loading",
            ComponentState::Error => "error_loading",
            ComponentState::Unsolved => "image_loaded",
            ComponentState::Solved => "puzzle_solved",
        }
    }
}

/// Natural (intrinsic) pixel size of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NaturalSize {
    pub width: f64,
    pub height: f64,
}

/// A load the caller should start, tagged with its request generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub src: String,
    pub generation: u64,
}

/// Loading progress for the current source.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LoadPhase {
    Pending,
    Failed,
    Ready(NaturalSize),
}

/// One entry of the read-only state snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPiece {
    /// Position id (`p_<row>_<col>`), which is also the tile's DOM id.
    pub position: String,
    /// Id of the piece currently shown at this position.
    pub piece: String,
    pub style: PieceStyle,
}

/// Read-only snapshot of the component for the host page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: String,
    pub rows: u32,
    pub cols: u32,
    pub solved: bool,
    pub displaced: usize,
    pub pieces: Vec<SnapshotPiece>,
}

/// The puzzle component: configuration, image lifecycle and board.
///
/// Grid dimensions are recomputed only when the image source or the desired
/// piece count changes; a resize recomputes the display size and styling
/// only. Image-load completions carry a request generation and are discarded
/// when a newer request has superseded them.
pub struct PuzzleComponent {
    src: Option<String>,
    desired_pieces: u32,
    border_color: String,
    load: LoadPhase,
    generation: u64,
    container: DisplaySize,
    display: DisplaySize,
    board: Option<Board>,
    scrambler: Scrambler,
    last_notified: Option<ComponentState>,
}

impl Default for PuzzleComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleComponent {
    pub fn new() -> Self {
        Self::with_scrambler(Scrambler::new())
    }

    /// Create a component with a specific scrambler, for reproducibility.
    pub fn with_scrambler(scrambler: Scrambler) -> Self {
        Self {
            src: None,
            desired_pieces: DEFAULT_PIECE_COUNT,
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            load: LoadPhase::Pending,
            generation: 0,
            container: DisplaySize::default(),
            display: DisplaySize::default(),
            board: None,
            scrambler,
            last_notified: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ComponentState {
        if self.src.is_none() {
            return ComponentState::NoSource;
        }
        match (&self.load, &self.board) {
            (LoadPhase::Pending, _) => ComponentState::Loading,
            (LoadPhase::Failed, _) => ComponentState::Error,
            (LoadPhase::Ready(_), Some(board)) if board.is_solved() => ComponentState::Solved,
            (LoadPhase::Ready(_), _) => ComponentState::Unsolved,
        }
    }

    /// The current state, if it differs from the last one taken.
    ///
    /// Each lifecycle transition is reported exactly once; callers turn the
    /// report into a `componentStateChanged` dispatch.
    pub fn take_state_change(&mut self) -> Option<ComponentState> {
        let state = self.state();
        if self.last_notified == Some(state) {
            return None;
        }
        self.last_notified = Some(state);
        Some(state)
    }

    /// Apply the image-source attribute.
    ///
    /// Returns the load to start, if any. A cleared source drops the board;
    /// any change invalidates in-flight loads by advancing the request
    /// generation. Setting the same source again is a no-op (a failed
    /// source is only retried via a different one).
    pub fn set_src(&mut self, raw: &str) -> Option<LoadRequest> {
        let src = config::convert_src(raw);
        if src == self.src {
            return None;
        }

        self.generation += 1;
        self.src = src;
        self.board = None;

        match &self.src {
            Some(src) => {
                self.load = LoadPhase::Pending;
                Some(LoadRequest {
                    src: src.clone(),
                    generation: self.generation,
                })
            }
            None => None,
        }
    }

    /// Apply a completed image load.
    ///
    /// Returns false (and changes nothing) when the completion is stale,
    /// i.e. a newer source has been requested since this load started.
    pub fn image_loaded(&mut self, generation: u64, natural: NaturalSize) -> bool {
        if generation != self.generation || self.src.is_none() {
            return false;
        }
        self.load = LoadPhase::Ready(natural);
        self.refit_display();
        self.rebuild_board();
        true
    }

    /// Apply a failed image load; stale failures are discarded too.
    pub fn image_failed(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.src.is_none() {
            return false;
        }
        self.load = LoadPhase::Failed;
        self.board = None;
        true
    }

    /// Apply the desired-piece-count attribute; out-of-range or
    /// non-numeric values fall back to the default. A changed count
    /// re-cuts and re-scrambles a loaded puzzle.
    pub fn set_desired_piece_count(&mut self, raw: &str) {
        let desired = config::convert_piece_count(raw);
        if desired == self.desired_pieces {
            return;
        }
        self.desired_pieces = desired;
        if matches!(self.load, LoadPhase::Ready(_)) && self.board.is_some() {
            self.rebuild_board();
        }
    }

    /// Store the already-resolved border color (CSS resolution happens in
    /// the DOM layer, which owns a CSS parser).
    pub fn set_border_color(&mut self, resolved: String) {
        self.border_color = resolved;
    }

    /// Host container resize: refit the display size, leaving grid
    /// dimensions, assignment and displaced set untouched.
    pub fn resized(&mut self, width: f64, height: f64) {
        self.container = DisplaySize::new(width, height);
        self.refit_display();
    }

    /// Re-scramble the current board; no-op while nothing is loaded.
    pub fn shuffle(&mut self) {
        if let Some(board) = &mut self.board {
            board.shuffle(&mut self.scrambler);
        }
    }

    /// Snap every tile home; no-op while nothing is loaded.
    pub fn solve(&mut self) {
        if let Some(board) = &mut self.board {
            board.solve();
        }
    }

    /// Translate a drop gesture (source and target tile DOM ids) into a
    /// swap. Returns `None` for unknown ids or when nothing is loaded.
    pub fn drop_piece(&mut self, source_id: &str, target_id: &str) -> Option<SwapEffect> {
        let board = self.board.as_mut()?;
        let a = PieceId::from_dom_id(source_id)?.home_position();
        let b = PieceId::from_dom_id(target_id)?.home_position();
        if !board.grid().contains(a) || !board.grid().contains(b) {
            return None;
        }
        Some(board.swap(a, b))
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn desired_pieces(&self) -> u32 {
        self.desired_pieces
    }

    pub fn border_color(&self) -> &str {
        &self.border_color
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Read-only snapshot for the host page.
    pub fn snapshot(&self) -> Snapshot {
        let (rows, cols, solved, displaced, pieces) = match &self.board {
            Some(board) => (
                board.grid().rows,
                board.grid().cols,
                board.is_solved(),
                board.displaced_count(),
                board
                    .positions()
                    .map(|pos| SnapshotPiece {
                        position: PieceId::home(pos).dom_id(),
                        piece: board.piece_at(pos).dom_id(),
                        style: board.style_for(pos, self.display),
                    })
                    .collect(),
            ),
            None => (0, 0, false, 0, Vec::new()),
        };
        Snapshot {
            state: self.state().tag().to_string(),
            rows,
            cols,
            solved,
            displaced,
            pieces,
        }
    }

    fn refit_display(&mut self) {
        if let LoadPhase::Ready(natural) = self.load {
            self.display = compute_display_size(
                natural.width,
                natural.height,
                self.container.width,
                self.container.height,
            );
        }
    }

    /// Re-cut the grid from the current display size and scramble. Called
    /// only when the image or the desired piece count changes.
    fn rebuild_board(&mut self) {
        let grid = compute_grid(self.display.width, self.display.height, self.desired_pieces);
        self.board = Some(Board::scrambled(grid, &mut self.scrambler));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_puzzle_core::Position;

    fn loaded_component() -> PuzzleComponent {
        let mut component = PuzzleComponent::with_scrambler(Scrambler::with_seed(42));
        component.resized(400.0, 600.0);
        let request = component.set_src("photo.png").expect("load should start");
        assert!(component.image_loaded(request.generation, natural(800.0, 600.0)));
        component
    }

    fn natural(width: f64, height: f64) -> NaturalSize {
        NaturalSize { width, height }
    }

    fn assert_display_close(actual: DisplaySize, width: f64, height: f64) {
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
    fn test_initial_state_is_no_source() {
        let component = PuzzleComponent::with_scrambler(Scrambler::with_seed(1));
        assert_eq!(component.state(), ComponentState::NoSource);
        assert_eq!(component.state().tag(), "no_image_source_set");
        assert!(component.board().is_none());
    }

    #[test]
    fn test_blank_src_means_no_source() {
        let mut component = PuzzleComponent::with_scrambler(Scrambler::with_seed(1));
        assert_eq!(component.set_src("   "), None);
        assert_eq!(component.state(), ComponentState::NoSource);
    }

    #[test]
    fn test_set_src_starts_loading() {
        let mut component = PuzzleComponent::with_scrambler(Scrambler::with_seed(1));
        let request = component.set_src("photo.png").unwrap();
        assert_eq!(request.src, "photo.png");
        assert_eq!(component.state(), ComponentState::Loading);
        assert_eq!(component.state().tag(), "image_loading");
    }

    #[test]
    fn test_load_completion_builds_scrambled_board() {
        let component = loaded_component();

        assert_eq!(component.state(), ComponentState::Unsolved);
        // 800x600 in 400x600 fits to 400x300; 16 pieces cut into 4x4.
        assert_display_close(component.display(), 400.0, 300.0);
        let board = component.board().unwrap();
        assert_eq!(board.grid().piece_count(), 16);
        assert!(!board.is_solved());
    }

    #[test]
    fn test_stale_load_completion_is_discarded() {
        let mut component = PuzzleComponent::with_scrambler(Scrambler::with_seed(1));
        component.resized(400.0, 400.0);

        let first = component.set_src("a.png").unwrap();
        let second = component.set_src("b.png").unwrap();
        assert!(second.generation > first.generation);

        // The superseded completion must not be applied.
        assert!(!component.image_loaded(first.generation, natural(100.0, 100.0)));
        assert_eq!(component.state(), ComponentState::Loading);

        assert!(component.image_loaded(second.generation, natural(100.0, 100.0)));
        assert_eq!(component.state(), ComponentState::Unsolved);
    }

    #[test]
    fn test_clearing_src_invalidates_inflight_load() {
        let mut component = PuzzleComponent::with_scrambler(Scrambler::with_seed(1));
        let request = component.set_src("a.png").unwrap();
        component.set_src("");

        assert!(!component.image_loaded(request.generation, natural(100.0, 100.0)));
        assert_eq!(component.state(), ComponentState::NoSource);
    }

    #[test]
    fn test_load_failure_is_terminal_until_new_source() {
        let mut component = PuzzleComponent::with_scrambler(Scrambler::with_seed(1));
        let request = component.set_src("missing.png").unwrap();
        assert!(component.image_failed(request.generation));
        assert_eq!(component.state(), ComponentState::Error);

        // Same source again: no retry.
        assert_eq!(component.set_src("missing.png"), None);
        assert_eq!(component.state(), ComponentState::Error);

        // A different source starts a fresh attempt.
        let retry = component.set_src("other.png").unwrap();
        assert_eq!(component.state(), ComponentState::Loading);
        assert!(retry.generation > request.generation);
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut component = PuzzleComponent::with_scrambler(Scrambler::with_seed(1));
        let first = component.set_src("a.png").unwrap();
        let _second = component.set_src("b.png").unwrap();

        assert!(!component.image_failed(first.generation));
        assert_eq!(component.state(), ComponentState::Loading);
    }

    #[test]
    fn test_invalid_piece_count_uses_default() {
        let mut component = PuzzleComponent::with_scrambler(Scrambler::with_seed(1));
        component.set_desired_piece_count("3");
        assert_eq!(component.desired_pieces(), 16);
        component.set_desired_piece_count("not a number");
        assert_eq!(component.desired_pieces(), 16);
        component.set_desired_piece_count("64");
        assert_eq!(component.desired_pieces(), 64);
    }

    #[test]
    fn test_piece_count_change_recuts_and_rescrambles() {
        let mut component = loaded_component();
        let before = component.board().unwrap().grid();

        component.set_desired_piece_count("64");
        let after = component.board().unwrap().grid();

        assert_ne!(before, after);
        assert!(after.piece_count() > before.piece_count());
        assert_eq!(component.state(), ComponentState::Unsolved);
    }

    #[test]
    fn test_resize_keeps_assignment_and_grid() {
        let mut component = loaded_component();
        let grid = component.board().unwrap().grid();
        let pieces: Vec<_> = {
            let board = component.board().unwrap();
            board.positions().map(|pos| board.piece_at(pos)).collect()
        };

        component.resized(200.0, 200.0);

        let board = component.board().unwrap();
        assert_eq!(board.grid(), grid);
        let after: Vec<_> = board.positions().map(|pos| board.piece_at(pos)).collect();
        assert_eq!(after, pieces);
        assert_display_close(component.display(), 200.0, 150.0);
    }

    #[test]
    fn test_drop_swaps_and_reports_solved_transition() {
        let mut component = loaded_component();
        component.solve();
        assert_eq!(component.state(), ComponentState::Solved);
        assert_eq!(component.state().tag(), "puzzle_solved");

        // Dragging a tile out of a solved puzzle unsolves it.
        let effect = component.drop_piece("p_1_1", "p_2_2").unwrap();
        assert!(effect.solved_changed);
        assert!(!effect.now_solved);
        assert_eq!(component.state(), ComponentState::Unsolved);

        // Swapping the pair back solves it again in the same call.
        let effect = component.drop_piece("p_1_1", "p_2_2").unwrap();
        assert!(effect.solved_changed);
        assert!(effect.now_solved);
        assert_eq!(component.state(), ComponentState::Solved);
    }

    #[test]
    fn test_drop_rejects_unknown_ids() {
        let mut component = loaded_component();
        assert_eq!(component.drop_piece("garbage", "p_1_1"), None);
        assert_eq!(component.drop_piece("p_1_1", "p_99_99"), None);
    }

    #[test]
    fn test_drop_before_load_is_ignored() {
        let mut component = PuzzleComponent::with_scrambler(Scrambler::with_seed(1));
        assert_eq!(component.drop_piece("p_1_1", "p_1_2"), None);
    }

    #[test]
    fn test_shuffle_unsolves() {
        let mut component = loaded_component();
        component.solve();
        component.shuffle();
        assert_eq!(component.state(), ComponentState::Unsolved);
    }

    #[test]
    fn test_state_change_reported_once_per_transition() {
        let mut component = PuzzleComponent::with_scrambler(Scrambler::with_seed(1));
        component.resized(400.0, 400.0);

        assert_eq!(component.take_state_change(), Some(ComponentState::NoSource));
        assert_eq!(component.take_state_change(), None);

        // The controller swallows the construction-time report (no listener
        // can be attached that early); the first observable transition is
        // the one triggered by the host's own call.
        let request = component.set_src("a.png").unwrap();
        assert_eq!(component.take_state_change(), Some(ComponentState::Loading));
        assert_eq!(component.take_state_change(), None);

        assert!(component.image_loaded(request.generation, natural(100.0, 100.0)));
        assert_eq!(component.take_state_change(), Some(ComponentState::Unsolved));

        // A swap that doesn't flip solvedness reports nothing.
        component.shuffle();
        assert_eq!(component.take_state_change(), None);

        component.solve();
        assert_eq!(component.take_state_change(), Some(ComponentState::Solved));
        assert_eq!(component.take_state_change(), None);
    }

    #[test]
    fn test_snapshot_reflects_board() {
        let component = loaded_component();
        let snapshot = component.snapshot();

        assert_eq!(snapshot.state, "image_loaded");
        assert_eq!(snapshot.rows, 4);
        assert_eq!(snapshot.cols, 4);
        assert!(!snapshot.solved);
        assert_eq!(snapshot.pieces.len(), 16);
        assert!(snapshot.displaced > 0);

        let board = component.board().unwrap();
        let first = &snapshot.pieces[0];
        assert_eq!(first.position, "p_1_1");
        assert_eq!(first.piece, board.piece_at(Position::new(1, 1)).dom_id());
    }

    #[test]
    fn test_snapshot_json_serializes() {
        let component = loaded_component();
        let json = serde_json::to_string(&component.snapshot()).unwrap();
        assert!(json.contains("\"state\":\"image_loaded\""));
    }
}
