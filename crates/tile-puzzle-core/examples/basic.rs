//! Basic example of using the tile puzzle engine.

use tile_puzzle_core::{compute_display_size, compute_grid, Board, PieceId, Scrambler};

fn main() {
    // Fit an 800x600 image into a 400x600 viewport
    let display = compute_display_size(800.0, 600.0, 400.0, 600.0);
    println!("Display size: {}x{}", display.width, display.height);

    // Cut it into ~16 pieces
    let grid = compute_grid(display.width, display.height, 16);
    println!("Grid: {} ({} pieces)\n", grid, grid.piece_count());

    // Scramble and show the arrangement
    let mut scrambler = Scrambler::new();
    let mut board = Board::scrambled(grid, &mut scrambler);

    println!("Scrambled ({} pieces out of place):", board.displaced_count());
    print_board(&board);

    // Swap two displaced tiles, then give up and solve
    let positions: Vec<_> = board.positions().collect();
    board.swap(positions[0], positions[1]);
    println!(
        "\nAfter one swap: {} out of place, solved = {}",
        board.displaced_count(),
        board.is_solved()
    );

    board.solve();
    println!("\nSolved ({} out of place):", board.displaced_count());
    print_board(&board);
}

fn print_board(board: &tile_puzzle_core::Board) {
    let grid = board.grid();
    for row in 1..=grid.rows {
        for col in 1..=grid.cols {
            let piece = board.piece_at(tile_puzzle_core::Position::new(row, col));
            let marker = if piece == PieceId::home(tile_puzzle_core::Position::new(row, col)) {
                ' '
            } else {
                '*'
            };
            print!("{:>6}{}", piece.dom_id(), marker);
        }
        println!();
    }
}
