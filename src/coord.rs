//! Board coordinates and the pure index-mapping helpers shared by every
//! board kind.

use std::cmp::Ordering;

/// World units. Cell positions live anywhere in the signed 64-bit plane.
pub type Unit = i64;

/// A position on a board.
///
/// Ordering is row-major: a coordinate on a lower row sorts first, ties
/// broken by column. This is the traversal order of every ordered container
/// keyed by `Coord`, and therefore the order alive cells are written out in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: Unit,
    pub y: Unit,
}

impl Coord {
    pub const ZERO: Coord = Coord { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: Unit, y: Unit) -> Self {
        Self { x, y }
    }
}

impl Ord for Coord {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Coord {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Convert a coordinate into a 1-D index of a padded square grid.
///
/// `column_size` is the padded edge length; coordinates in
/// `[-padding, column_size - padding)` on both axes map into
/// `[0, column_size²)`.
#[inline]
pub fn to_1d_index(coord: Coord, column_size: Unit, padding: Unit) -> usize {
    debug_assert!(
        coord.x + padding >= 0
            && coord.y + padding >= 0
            && coord.x + padding < column_size
            && coord.y + padding < column_size,
        "coord ({}, {}) outside padded grid of column size {column_size}",
        coord.x,
        coord.y,
    );
    ((coord.x + padding) + column_size * (coord.y + padding)) as usize
}

/// Inverse of [`to_1d_index`].
#[inline]
pub fn from_1d_index(index: usize, column_size: Unit, padding: Unit) -> Coord {
    let index = index as Unit;
    Coord::new(index % column_size - padding, index / column_size - padding)
}

/// Split a global position into the owning tile coordinate and the local
/// coordinate within that tile.
///
/// Floor division keeps the decomposition correct for negative positions:
/// `(-1, -1)` with `grid_size` 8 belongs to tile `(-1, -1)` at local
/// `(7, 7)`, never to tile `(0, 0)`.
#[inline]
pub fn split_tile_local(position: Coord, grid_size: Unit) -> (Coord, Coord) {
    let tile = Coord::new(
        position.x.div_euclid(grid_size),
        position.y.div_euclid(grid_size),
    );
    let local = Coord::new(
        position.x.rem_euclid(grid_size),
        position.y.rem_euclid(grid_size),
    );
    (tile, local)
}
