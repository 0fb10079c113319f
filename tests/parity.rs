//! Tile-size independence: the same absolute pattern must evolve
//! identically on graphs of different tile sizes and on one large single
//! tile, and the parallel kernel pass must match the serial one.

use std::collections::HashSet;

use patch_life::{Coord, GameBoard, GridTile, TileGraph, run_generation};
use rand::RngCore;
use rand::SeedableRng;

fn seed_cells(board: &mut dyn GameBoard, cells: &[(i64, i64)]) {
    for &(x, y) in cells {
        board.create_cell(Coord::new(x, y));
    }
    board.finish_current_generation();
}

fn collect_live(board: &dyn GameBoard) -> HashSet<(i64, i64)> {
    let mut out = HashSet::new();
    board.iterate_current_generation_alive_cells(Coord::ZERO, &mut |cell| {
        out.insert((cell.x, cell.y));
    });
    out
}

fn run_steps(board: &mut dyn GameBoard, steps: u64) {
    for _ in 0..steps {
        run_generation(board);
    }
}

#[test]
fn straddling_pentomino_is_tile_size_independent() {
    // The R-pentomino sits right on the boundaries of the small tilings.
    let pentomino = [(8, 7), (9, 7), (7, 8), (8, 8), (8, 9)];
    let steps = 6;

    let mut single = GridTile::new(64);
    seed_cells(&mut single, &pentomino);
    run_steps(&mut single, steps);
    let reference = collect_live(&single);
    assert!(!reference.is_empty());

    for tile_size in [4, 8, 16] {
        let mut graph = TileGraph::of_tiles(tile_size);
        seed_cells(&mut graph, &pentomino);
        run_steps(&mut graph, steps);
        assert_eq!(
            collect_live(&graph),
            reference,
            "tile size {tile_size} diverged from the single-tile board"
        );
    }
}

fn random_soup(seed: u64, density: f64) -> Vec<(i64, i64)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;
    let mut cells = Vec::new();
    for y in 8..40 {
        for x in 8..40 {
            if rng.next_u64() <= threshold {
                cells.push((x, y));
            }
        }
    }
    cells
}

#[test]
fn random_soups_match_across_representations() {
    for (seed, density) in [(0xA1, 0.10), (0xB2, 0.42), (0xC3, 0.83)] {
        let soup = random_soup(seed, density);
        let steps = 6;

        let mut single = GridTile::new(64);
        seed_cells(&mut single, &soup);
        run_steps(&mut single, steps);

        let mut graph = TileGraph::of_tiles(8);
        seed_cells(&mut graph, &soup);
        run_steps(&mut graph, steps);

        assert_eq!(
            collect_live(&graph),
            collect_live(&single),
            "live-set mismatch for seed {seed:#x} density {density}"
        );
    }
}

#[test]
fn parallel_kernel_matches_serial() {
    // A wide soup over 4-cell tiles keeps well over the fan-out threshold of
    // occupied tiles per generation.
    let mut cells = Vec::new();
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xD37E_A515);
    for y in -24..=24 {
        for x in -24..=24 {
            if rng.next_u64() < u64::MAX / 3 {
                cells.push((x, y));
            }
        }
    }

    let run = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("build thread pool");
        pool.install(|| {
            let mut graph = TileGraph::of_tiles(4);
            seed_cells(&mut graph, &cells);
            run_steps(&mut graph, 8);
            collect_live(&graph)
        })
    };

    assert_eq!(run(1), run(4));
}
