//! The sparse multi-tile board.
//!
//! A `TileGraph` stitches fixed-size sub-boards into one logically unbounded
//! board. Entries live in an ordered map keyed by tile coordinate; each
//! entry owns its sub-board and keeps four cardinal neighbor links. Links
//! are stored as tile coordinates and resolved through the map, so evicting
//! an entry can never leave a dangling reference — the inbound links are
//! cleared in the same operation that removes it.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::warn;

use crate::board::{BoardFactory, BoxedBoard, GameBoard, RuleFn};
use crate::coord::{Coord, Unit, split_tile_local};

/// Below this many occupied tiles the kernel pass stays serial; the rayon
/// fan-out only pays for itself once there is real per-generation work.
const PARALLEL_KERNEL_MIN_TILES: usize = 16;

/// The four cardinal link slots of a graph entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Tile-coordinate offset of the neighbor in this direction. North is
    /// toward decreasing y.
    #[inline]
    const fn offset(self) -> (Unit, Unit) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// The opposite direction, used to keep links symmetric.
    #[inline]
    const fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// The border cell at position `i` along this tile's edge facing `dir`.
#[inline]
fn edge_cell(dir: Direction, i: Unit, grid_size: Unit) -> Coord {
    match dir {
        Direction::North => Coord::new(i, 0),
        Direction::South => Coord::new(i, grid_size - 1),
        Direction::East => Coord::new(grid_size - 1, i),
        Direction::West => Coord::new(0, i),
    }
}

/// Where that border cell lands in the neighbor's padding ring.
#[inline]
fn halo_cell(dir: Direction, i: Unit, grid_size: Unit) -> Coord {
    match dir {
        Direction::North => Coord::new(i, grid_size),
        Direction::South => Coord::new(i, -1),
        Direction::East => Coord::new(-1, i),
        Direction::West => Coord::new(grid_size, i),
    }
}

struct GridEntry {
    board: BoxedBoard,
    /// Cardinal neighbor links, indexed by `Direction`. `None` means no
    /// neighboring entry has been hooked up on that side yet.
    neighbors: [Option<Coord>; 4],
}

impl GridEntry {
    fn new(board: BoxedBoard) -> Self {
        Self {
            board,
            neighbors: [None; 4],
        }
    }
}

/// A board composed of many sub-boards over the full coordinate plane.
pub struct TileGraph {
    factory: Option<BoardFactory>,
    /// Edge length of every sub-board, probed from the factory once.
    grid_size: Unit,
    entries: BTreeMap<Coord, GridEntry>,
}

impl TileGraph {
    /// Create an empty graph that builds sub-boards with `factory`.
    pub fn new(factory: BoardFactory) -> Self {
        // The factory knows the sub-board size; make one and ask it.
        let grid_size = factory().maximum_board_length();
        Self {
            factory: Some(factory),
            grid_size,
            entries: BTreeMap::new(),
        }
    }

    /// Convenience constructor stitching [`crate::tile::GridTile`]s of the
    /// given size.
    pub fn of_tiles(tile_size: Unit) -> Self {
        Self::new(Box::new(move || {
            Box::new(crate::tile::GridTile::new(tile_size)) as BoxedBoard
        }))
    }

    /// A graph with no way to build sub-boards. It stays valid but inert:
    /// every mutating call is a no-op and every read reports dead.
    pub fn inert() -> Self {
        warn!("TileGraph built without a sub-board factory; the board is inert");
        Self {
            factory: None,
            grid_size: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Number of live entries in the tile map. Exposed so callers (and the
    /// eviction tests) can observe the map growing and draining.
    pub fn tile_count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn split(&self, position: Coord) -> (Coord, Coord) {
        split_tile_local(position, self.grid_size)
    }

    /// Insert an entry at `tile_coord` if absent, then make sure all four
    /// cardinal neighbors exist and are symmetrically linked.
    fn create_and_hook_up(&mut self, tile_coord: Coord) {
        let Some(factory) = &self.factory else {
            return;
        };
        self.entries
            .entry(tile_coord)
            .or_insert_with(|| GridEntry::new(factory()));
        self.hook_up(tile_coord);
    }

    /// Populate every missing neighbor link of `tile_coord`, creating the
    /// neighboring entries (possibly empty) where needed. Eagerly creating
    /// the frontier means a linked neighbor always resolves while the
    /// entry lives.
    fn hook_up(&mut self, tile_coord: Coord) {
        for dir in Direction::ALL {
            let missing = self
                .entries
                .get(&tile_coord)
                .is_some_and(|entry| entry.neighbors[dir.index()].is_none());
            if !missing {
                continue;
            }

            let (dx, dy) = dir.offset();
            let neighbor_coord = Coord::new(tile_coord.x + dx, tile_coord.y + dy);
            if !self.entries.contains_key(&neighbor_coord) {
                let Some(factory) = &self.factory else {
                    return;
                };
                self.entries
                    .insert(neighbor_coord, GridEntry::new(factory()));
            }

            if let Some(entry) = self.entries.get_mut(&tile_coord) {
                entry.neighbors[dir.index()] = Some(neighbor_coord);
            }
            if let Some(neighbor) = self.entries.get_mut(&neighbor_coord) {
                neighbor.neighbors[dir.reverse().index()] = Some(tile_coord);
            }
        }
    }

    /// True when the link is unset, or points at an entry whose board has no
    /// live cells. A missing link means no neighbor, which is as empty as it
    /// gets.
    fn link_is_empty(&self, link: Option<Coord>) -> bool {
        link.and_then(|coord| self.entries.get(&coord))
            .is_none_or(|entry| entry.board.is_empty())
    }

    /// Remove an entry and clear every inbound link to it.
    fn evict(&mut self, tile_coord: Coord, links: [Option<Coord>; 4]) {
        self.entries.remove(&tile_coord);
        for dir in Direction::ALL {
            if let Some(neighbor_coord) = links[dir.index()]
                && let Some(neighbor) = self.entries.get_mut(&neighbor_coord)
            {
                neighbor.neighbors[dir.reverse().index()] = None;
            }
        }
    }

    /// Push this entry's four border lines and four corner cells of the
    /// generation being written into the matching padding positions of its
    /// neighbors.
    fn copy_edges_to_neighbors(&mut self, tile_coord: Coord) {
        let grid_size = self.grid_size;
        let Some(entry) = self.entries.get(&tile_coord) else {
            return;
        };
        let links = entry.neighbors;

        for dir in Direction::ALL {
            let Some(neighbor_coord) = links[dir.index()] else {
                continue;
            };
            let values: Vec<bool> = {
                let Some(entry) = self.entries.get(&tile_coord) else {
                    return;
                };
                (0..grid_size)
                    .map(|i| entry.board.get_current_cell(edge_cell(dir, i, grid_size)))
                    .collect()
            };
            let Some(neighbor) = self.entries.get_mut(&neighbor_coord) else {
                continue;
            };
            for (i, value) in values.into_iter().enumerate() {
                neighbor
                    .board
                    .set_cell(halo_cell(dir, i as Unit, grid_size), value);
            }
        }

        // Corner cells cross into the diagonal neighbors, which hold no
        // direct link; each is reached through either adjacent cardinal
        // neighbor.
        use Direction::{East, North, South, West};
        let n = grid_size;
        self.copy_corner(tile_coord, North, West, Coord::new(0, 0), Coord::new(n, n));
        self.copy_corner(tile_coord, North, East, Coord::new(n - 1, 0), Coord::new(-1, n));
        self.copy_corner(
            tile_coord,
            South,
            East,
            Coord::new(n - 1, n - 1),
            Coord::new(-1, -1),
        );
        self.copy_corner(tile_coord, South, West, Coord::new(0, n - 1), Coord::new(n, -1));
    }

    /// Copy one corner cell into the diagonal neighbor between `first` and
    /// `second`. The diagonal is resolved by following whichever adjacent
    /// link already knows it; when neither does, the exchange is skipped for
    /// this generation and repaired once the diagonal entry exists.
    fn copy_corner(
        &mut self,
        tile_coord: Coord,
        first: Direction,
        second: Direction,
        source: Coord,
        target: Coord,
    ) {
        let Some(entry) = self.entries.get(&tile_coord) else {
            return;
        };
        let (Some(via_a), Some(via_b)) = (
            entry.neighbors[first.index()],
            entry.neighbors[second.index()],
        ) else {
            return;
        };

        let through_first = self
            .entries
            .get(&via_a)
            .and_then(|neighbor| neighbor.neighbors[second.index()]);
        let through_second = self
            .entries
            .get(&via_b)
            .and_then(|neighbor| neighbor.neighbors[first.index()]);
        debug_assert!(
            through_first.is_none() || through_second.is_none() || through_first == through_second,
            "diagonal neighbor links disagree around tile ({}, {})",
            tile_coord.x,
            tile_coord.y,
        );
        let Some(diagonal_coord) = through_first.or(through_second) else {
            return;
        };

        let value = entry.board.get_current_cell(source);
        if let Some(diagonal) = self.entries.get_mut(&diagonal_coord) {
            diagonal.board.set_cell(target, value);
        }
    }

    #[cfg(test)]
    fn assert_links_symmetric(&self) {
        for (&coord, entry) in &self.entries {
            for dir in Direction::ALL {
                if let Some(neighbor_coord) = entry.neighbors[dir.index()] {
                    let back = self
                        .entries
                        .get(&neighbor_coord)
                        .map(|neighbor| neighbor.neighbors[dir.reverse().index()]);
                    assert_eq!(
                        back,
                        Some(Some(coord)),
                        "asymmetric link {coord:?} -> {neighbor_coord:?}"
                    );
                }
            }
        }
    }
}

impl GameBoard for TileGraph {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn is_empty(&self) -> bool {
        // A truly empty graph has evicted every entry.
        self.entries.is_empty()
    }

    fn get_cell(&self, position: Coord) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let (tile_coord, local) = self.split(position);
        self.entries
            .get(&tile_coord)
            .is_some_and(|entry| entry.board.get_cell(local))
    }

    fn get_current_cell(&self, position: Coord) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let (tile_coord, local) = self.split(position);
        self.entries
            .get(&tile_coord)
            .is_some_and(|entry| entry.board.get_current_cell(local))
    }

    fn set_cell(&mut self, position: Coord, alive: bool) {
        if self.factory.is_none() {
            return;
        }
        let (tile_coord, local) = self.split(position);
        if !self.entries.contains_key(&tile_coord) {
            // Clearing a cell nobody stores is a no-op; only a live cell is
            // worth allocating a tile for.
            if !alive {
                return;
            }
            self.create_and_hook_up(tile_coord);
        }
        if let Some(entry) = self.entries.get_mut(&tile_coord) {
            entry.board.set_cell(local, alive);
        }
    }

    fn create_cell(&mut self, position: Coord) {
        if self.factory.is_none() {
            return;
        }
        let (tile_coord, local) = self.split(position);
        if !self.entries.contains_key(&tile_coord) {
            self.create_and_hook_up(tile_coord);
        }
        if let Some(entry) = self.entries.get_mut(&tile_coord) {
            entry.board.create_cell(local);
        }
    }

    fn maximum_board_length(&self) -> Unit {
        // The practical limit is tile memory, not coordinate space.
        Unit::MAX
    }

    /// Two ordered passes. First, walk the entries present at the start of
    /// the pass: evict any entry that is empty along with its whole
    /// neighborhood, otherwise re-ensure its links and push its edges into
    /// its neighbors' padding. Only then flip every surviving sub-board.
    /// The passes cannot merge — eviction needs neighbor occupancy before
    /// the copies run, and no board may flip until every neighbor has
    /// deposited its edge into it.
    fn finish_current_generation(&mut self) {
        let coords: Vec<Coord> = self.entries.keys().copied().collect();
        for tile_coord in coords {
            let Some(entry) = self.entries.get(&tile_coord) else {
                continue;
            };
            let board_empty = entry.board.is_empty();
            let links = entry.neighbors;

            if board_empty && links.iter().all(|&link| self.link_is_empty(link)) {
                self.evict(tile_coord, links);
            } else {
                if !board_empty {
                    self.hook_up(tile_coord);
                }
                self.copy_edges_to_neighbors(tile_coord);
            }
        }

        for entry in self.entries.values_mut() {
            entry.board.finish_current_generation();
        }
    }

    fn iterate_current_generation_board(&mut self, rule: RuleFn<'_>) {
        let mut boards: Vec<&mut BoxedBoard> = Vec::new();
        for entry in self.entries.values_mut() {
            if !entry.board.is_empty() {
                boards.push(&mut entry.board);
            }
        }

        // Each sub-board reads only its own committed buffer and writes only
        // its own next buffer, so the kernel pass is free to fan out.
        if boards.len() >= PARALLEL_KERNEL_MIN_TILES {
            boards
                .par_iter_mut()
                .for_each(|board| board.iterate_current_generation_board(rule));
        } else {
            for board in boards {
                board.iterate_current_generation_board(rule);
            }
        }
    }

    fn iterate_current_generation_alive_cells(
        &self,
        offset: Coord,
        visitor: &mut dyn FnMut(Coord),
    ) {
        for (tile_coord, entry) in &self.entries {
            if entry.board.is_empty() {
                continue;
            }
            let child_offset = Coord::new(
                tile_coord.x * self.grid_size + offset.x,
                tile_coord.y * self.grid_size + offset.y,
            );
            entry
                .board
                .iterate_current_generation_alive_cells(child_offset, visitor);
        }
    }
}
