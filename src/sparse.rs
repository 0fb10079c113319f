//! The flat alive-list board.
//!
//! Stores nothing but the set of alive coordinates. That makes it the most
//! direct way to carry cells from the reader to the writer — which is its
//! job: it is the input/output fixture of the test suite. It cannot run the
//! simulation kernel, because a bare alive-list has no cheap way to find the
//! dead cells that need a birth check.

use std::collections::BTreeSet;

use crate::board::{GameBoard, RuleFn};
use crate::coord::{Coord, Unit};

/// A board that is only the ordered set of its alive cells.
#[derive(Default)]
pub struct AliveSetBoard {
    alive_cells: BTreeSet<Coord>,
}

impl AliveSetBoard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameBoard for AliveSetBoard {
    fn clear(&mut self) {
        self.alive_cells.clear();
    }

    fn is_empty(&self) -> bool {
        self.alive_cells.is_empty()
    }

    fn get_cell(&self, position: Coord) -> bool {
        self.alive_cells.contains(&position)
    }

    fn get_current_cell(&self, position: Coord) -> bool {
        // Single-generation storage: committed and being-written coincide.
        self.alive_cells.contains(&position)
    }

    fn set_cell(&mut self, position: Coord, alive: bool) {
        if alive {
            self.alive_cells.insert(position);
        } else {
            self.alive_cells.remove(&position);
        }
    }

    fn maximum_board_length(&self) -> Unit {
        Unit::MAX
    }

    fn finish_current_generation(&mut self) {}

    fn iterate_current_generation_board(&mut self, _rule: RuleFn<'_>) {
        // Intentionally a no-op; see the module docs.
    }

    fn iterate_current_generation_alive_cells(
        &self,
        offset: Coord,
        visitor: &mut dyn FnMut(Coord),
    ) {
        for cell in &self.alive_cells {
            visitor(Coord::new(cell.x + offset.x, cell.y + offset.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_clears_cells() {
        let mut board = AliveSetBoard::new();
        board.create_cell(Coord::new(4, -2));
        board.set_cell(Coord::new(0, 0), true);
        assert!(board.get_cell(Coord::new(4, -2)));
        assert!(!board.is_empty());

        board.set_cell(Coord::new(4, -2), false);
        assert!(!board.get_cell(Coord::new(4, -2)));

        board.clear();
        assert!(board.is_empty());
        assert!(!board.get_cell(Coord::new(0, 0)));
    }

    #[test]
    fn iterates_in_row_major_order_with_offset() {
        let mut board = AliveSetBoard::new();
        for &(x, y) in &[(5, 1), (-2, 3), (0, 1)] {
            board.create_cell(Coord::new(x, y));
        }

        let mut seen = Vec::new();
        board.iterate_current_generation_alive_cells(Coord::new(10, 10), &mut |coord| {
            seen.push(coord)
        });
        assert_eq!(
            seen,
            vec![Coord::new(10, 11), Coord::new(15, 11), Coord::new(8, 13)]
        );
    }
}
