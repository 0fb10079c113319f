//! A fixed-size bit-packed board tile.
//!
//! The tile covers an N×N interior plus a one-cell padding ring on every
//! side. The padding mirrors the border cells of adjacent tiles, so the
//! neighbor-count kernel needs no edge special-casing. Cell storage is two
//! word-packed bit arrays — the committed generation and the one being
//! written — selected by a parity flag that flips each generation.

use tracing::warn;

use crate::board::{GameBoard, RuleFn};
use crate::coord::{Coord, Unit, from_1d_index, to_1d_index};

/// Width of the padding ring. Widening it would need a corner-exchange
/// story, so it stays fixed.
pub const TILE_PADDING: Unit = 1;

/// Word-packed square bit array.
#[derive(Clone)]
struct BitGrid {
    words: Vec<u64>,
}

impl BitGrid {
    fn with_bits(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(64)],
        }
    }

    #[inline]
    fn get(&self, index: usize) -> bool {
        (self.words[index >> 6] >> (index & 63)) & 1 == 1
    }

    #[inline]
    fn set(&mut self, index: usize, value: bool) {
        let mask = 1u64 << (index & 63);
        let word = &mut self.words[index >> 6];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    #[inline]
    fn any_set(&self) -> bool {
        self.words.iter().any(|&word| word != 0)
    }

    fn reset(&mut self) {
        self.words.fill(0);
    }
}

/// A fixed-size double-buffered grid of cells.
pub struct GridTile {
    grid_size: Unit,
    padded_size: Unit,
    grids: [BitGrid; 2],
    /// Selects the committed buffer; the other one is being written.
    phase: bool,
}

impl GridTile {
    /// Create an empty tile with an interior of `grid_size` × `grid_size`
    /// cells.
    pub fn new(grid_size: Unit) -> Self {
        assert!(grid_size > 0, "tile grid size must be positive");
        let padded_size = grid_size + 2 * TILE_PADDING;
        let bits = (padded_size * padded_size) as usize;
        Self {
            grid_size,
            padded_size,
            grids: [BitGrid::with_bits(bits), BitGrid::with_bits(bits)],
            phase: false,
        }
    }

    #[inline]
    fn committed(&self) -> &BitGrid {
        &self.grids[self.phase as usize]
    }

    #[inline]
    fn writing(&self) -> &BitGrid {
        &self.grids[!self.phase as usize]
    }

    #[inline]
    fn writing_mut(&mut self) -> &mut BitGrid {
        &mut self.grids[!self.phase as usize]
    }

    #[inline]
    fn committed_and_writing_mut(&mut self) -> (&BitGrid, &mut BitGrid) {
        let (low, high) = self.grids.split_at_mut(1);
        if self.phase {
            (&high[0], &mut low[0])
        } else {
            (&low[0], &mut high[0])
        }
    }

    /// Whether a position falls inside the interior or the padding ring.
    #[inline]
    fn in_padded_bounds(&self, position: Coord) -> bool {
        position.x >= -TILE_PADDING
            && position.y >= -TILE_PADDING
            && position.x < self.grid_size + TILE_PADDING
            && position.y < self.grid_size + TILE_PADDING
    }

    #[inline]
    fn in_interior(&self, position: Coord) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.grid_size
            && position.y < self.grid_size
    }
}

/// Number of live cells in the one-wide column at `x` spanning rows
/// `y - 1 ..= y + 1`.
#[inline]
fn column_sum(grid: &BitGrid, x: Unit, y: Unit, column_size: Unit) -> u8 {
    let above = to_1d_index(Coord::new(x, y - 1), column_size, TILE_PADDING);
    let mid = to_1d_index(Coord::new(x, y), column_size, TILE_PADDING);
    let below = to_1d_index(Coord::new(x, y + 1), column_size, TILE_PADDING);
    grid.get(above) as u8 + grid.get(mid) as u8 + grid.get(below) as u8
}

impl GameBoard for GridTile {
    fn clear(&mut self) {
        self.phase = false;
        self.grids[0].reset();
        self.grids[1].reset();
    }

    fn is_empty(&self) -> bool {
        // Both generations and the padding ring count: a set padding bit is
        // a live cell about to spill in from a neighbor.
        !self.grids[0].any_set() && !self.grids[1].any_set()
    }

    fn get_cell(&self, position: Coord) -> bool {
        if !self.in_padded_bounds(position) {
            return false;
        }
        self.committed()
            .get(to_1d_index(position, self.padded_size, TILE_PADDING))
    }

    fn get_current_cell(&self, position: Coord) -> bool {
        if !self.in_padded_bounds(position) {
            return false;
        }
        self.writing()
            .get(to_1d_index(position, self.padded_size, TILE_PADDING))
    }

    fn set_cell(&mut self, position: Coord, alive: bool) {
        if !self.in_padded_bounds(position) {
            // A caller defect, not a data error: the position should have
            // been mapped into this tile's local space already.
            warn!(
                "cell write at ({}, {}) dropped: outside tile of size {}",
                position.x, position.y, self.grid_size
            );
            return;
        }
        let index = to_1d_index(position, self.padded_size, TILE_PADDING);
        self.writing_mut().set(index, alive);
    }

    fn create_cell(&mut self, position: Coord) {
        if !self.in_interior(position) {
            warn!(
                "cell at ({}, {}) cannot be created: outside the bounds of this board, size {}",
                position.x, position.y, self.grid_size
            );
            return;
        }
        let index = to_1d_index(position, self.padded_size, TILE_PADDING);
        self.writing_mut().set(index, true);
    }

    fn maximum_board_length(&self) -> Unit {
        self.grid_size
    }

    fn finish_current_generation(&mut self) {
        self.phase = !self.phase;
    }

    fn iterate_current_generation_board(&mut self, rule: RuleFn<'_>) {
        let grid_size = self.grid_size;
        let column_size = self.padded_size;
        let (current, next) = self.committed_and_writing_mut();

        for y in 0..grid_size {
            // Slide a 3×3 window across the row as three column sums; the
            // padding ring keeps x - 1 and x + 1 in bounds at the edges.
            let mut left = column_sum(current, -1, y, column_size);
            let mut mid = column_sum(current, 0, y, column_size);
            for x in 0..grid_size {
                let right = column_sum(current, x + 1, y, column_size);
                let index = to_1d_index(Coord::new(x, y), column_size, TILE_PADDING);
                let alive = current.get(index);
                let neighbors = left + mid + right - alive as u8;
                next.set(index, rule(alive, neighbors));
                left = mid;
                mid = right;
            }
        }
    }

    fn iterate_current_generation_alive_cells(
        &self,
        offset: Coord,
        visitor: &mut dyn FnMut(Coord),
    ) {
        let column_size = self.padded_size;
        for (word_index, &word) in self.committed().words.iter().enumerate() {
            let mut bits = word;
            while bits != 0 {
                let bit = bits.trailing_zeros() as usize;
                let local = from_1d_index((word_index << 6) + bit, column_size, TILE_PADDING);
                // Padding bits mirror neighbors' cells; only interior cells
                // belong to this tile.
                if self.in_interior(local) {
                    visitor(Coord::new(local.x + offset.x, local.y + offset.y));
                }
                bits &= bits - 1;
            }
        }
    }
}
