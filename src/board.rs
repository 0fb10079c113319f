//! The shared board contract.
//!
//! Every board kind — a single fixed tile, the sparse multi-tile graph, or
//! the flat alive-list — exposes the same object-safe surface, so the graph
//! can stitch any of them together as sub-units and the I/O layer can stay
//! oblivious to the representation behind it.

use crate::coord::{Coord, Unit};

/// The transition rule: `(alive now, live neighbor count) -> alive next`.
///
/// `Sync` lets the graph fan the kernel pass out across tiles.
pub type RuleFn<'a> = &'a (dyn Fn(bool, u8) -> bool + Sync);

/// A game board holding two generations of cells: the committed generation
/// being read, and the one being written. Boards double-buffer so the two
/// never alias; `finish_current_generation` commits the written one.
pub trait GameBoard: Send {
    /// Remove every cell and reset generation state for a new game.
    fn clear(&mut self);

    /// True when the board holds no information at all. For padded boards
    /// this includes halo cells and both generations, because a set padding
    /// bit means a live cell is spilling across a boundary.
    fn is_empty(&self) -> bool;

    /// Read a cell from the last committed generation. Positions the board
    /// does not cover read as dead.
    fn get_cell(&self, position: Coord) -> bool;

    /// Read a cell from the generation currently being written.
    fn get_current_cell(&self, position: Coord) -> bool;

    /// Write a cell into the generation currently being written.
    fn set_cell(&mut self, position: Coord, alive: bool);

    /// Create a live cell. Unlike `set_cell`, this is the loader's entry
    /// point and only targets the board's interior.
    fn create_cell(&mut self, position: Coord) {
        self.set_cell(position, true);
    }

    /// The board's edge length, which doubles as the tile span when the
    /// board is used as a sub-unit of a graph.
    fn maximum_board_length(&self) -> Unit;

    /// Swap the committed and being-written generations.
    fn finish_current_generation(&mut self);

    /// Run the transition rule over every cell of the committed generation,
    /// writing results into the generation being written.
    fn iterate_current_generation_board(&mut self, rule: RuleFn<'_>);

    /// Visit every alive cell of the committed generation, translated by
    /// `offset`. The board drives the iteration so callers never depend on
    /// its internal layout, and no intermediate collection is built.
    fn iterate_current_generation_alive_cells(
        &self,
        offset: Coord,
        visitor: &mut dyn FnMut(Coord),
    );
}

/// An owned board of any kind.
pub type BoxedBoard = Box<dyn GameBoard>;

/// Creates the sub-boards a graph stitches together.
pub type BoardFactory = Box<dyn Fn() -> BoxedBoard + Send + Sync>;
