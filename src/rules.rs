//! The Game of Life transition rule (B3/S23) and the per-generation driver.

use crate::board::GameBoard;

/// Whether a cell lives in the next generation.
///
/// A live cell survives with two or three live neighbors; a dead cell is
/// born with exactly three. Boards take the rule as a parameter, so variant
/// rules drop in without touching the kernels.
pub fn conway_cell_rules(alive: bool, alive_neighbors: u8) -> bool {
    if alive {
        alive_neighbors == 2 || alive_neighbors == 3
    } else {
        alive_neighbors == 3
    }
}

/// Advance the board one generation: run the rule over the committed
/// generation, then finalize (halo exchange, eviction and buffer flip where
/// the board kind has them).
pub fn run_generation(board: &mut dyn GameBoard) {
    board.iterate_current_generation_board(&conway_cell_rules);
    board.finish_current_generation();
}
