//! Round-trips through the Life 1.06 reader and writer.

use std::collections::HashSet;

use patch_life::{AliveSetBoard, Coord, GameBoard, TileGraph, io, run_generation};
use rand::Rng;
use rand::SeedableRng;

fn collect_live(board: &dyn GameBoard) -> HashSet<(i64, i64)> {
    let mut out = HashSet::new();
    board.iterate_current_generation_alive_cells(Coord::ZERO, &mut |cell| {
        out.insert((cell.x, cell.y));
    });
    out
}

fn write_to_string(board: &dyn GameBoard) -> String {
    let mut out = Vec::new();
    io::write_board(&mut out, board).expect("in-memory write cannot fail");
    String::from_utf8(out).expect("writer emits UTF-8")
}

fn random_coords(seed: u64, count: usize) -> HashSet<(i64, i64)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut coords = HashSet::new();
    while coords.len() < count {
        coords.insert((
            rng.random_range(-1000..1000),
            rng.random_range(-1000..1000),
        ));
    }
    coords
}

#[test]
fn alive_list_round_trip_preserves_any_coordinate_set() {
    for seed in [1u64, 2, 3] {
        let coords = random_coords(seed, 200);

        let mut board = AliveSetBoard::new();
        for &(x, y) in &coords {
            board.create_cell(Coord::new(x, y));
        }

        let text = write_to_string(&board);
        let mut reloaded = AliveSetBoard::new();
        io::read_board(text.as_bytes(), &mut reloaded).expect("reload cannot fail");

        assert_eq!(collect_live(&reloaded), coords, "seed {seed}");
    }
}

#[test]
fn tile_graph_round_trip_preserves_any_coordinate_set() {
    let coords = random_coords(7, 150);

    let mut board = TileGraph::of_tiles(16);
    for &(x, y) in &coords {
        board.create_cell(Coord::new(x, y));
    }
    board.finish_current_generation();

    let text = write_to_string(&board);
    let mut reloaded = TileGraph::of_tiles(16);
    io::read_board(text.as_bytes(), &mut reloaded).expect("reload cannot fail");

    assert_eq!(collect_live(&reloaded), coords);
    assert_eq!(collect_live(&reloaded), collect_live(&board));
}

#[test]
fn round_trip_survives_a_change_of_tile_size() {
    let coords = random_coords(11, 100);

    let mut board = TileGraph::of_tiles(5);
    for &(x, y) in &coords {
        board.create_cell(Coord::new(x, y));
    }
    board.finish_current_generation();

    let mut reloaded = TileGraph::of_tiles(64);
    io::read_board(write_to_string(&board).as_bytes(), &mut reloaded)
        .expect("reload cannot fail");
    assert_eq!(collect_live(&reloaded), coords);
}

#[test]
fn load_run_and_save_a_blinker() {
    let input = "#Life 1.06\n0 0\n1 0\n2 0\n";

    let mut board = TileGraph::of_tiles(4);
    io::read_board(input.as_bytes(), &mut board).expect("load cannot fail");

    run_generation(&mut board);

    // Traversal is tile order then row-major, which for this pattern is
    // globally sorted.
    assert_eq!(write_to_string(&board), "#Life 1.06\n1 -1\n1 0\n1 1\n");

    run_generation(&mut board);
    assert_eq!(collect_live(&board), HashSet::from([(0, 0), (1, 0), (2, 0)]));
}

#[test]
fn reader_commits_the_loaded_generation() {
    let mut board = TileGraph::of_tiles(8);
    io::read_board("3 4\n".as_bytes(), &mut board).expect("load cannot fail");
    assert!(board.get_cell(Coord::new(3, 4)));
}

#[test]
fn garbage_ends_the_read_but_keeps_earlier_cells() {
    let mut board = AliveSetBoard::new();
    io::read_board("1 2\n3 4\nnot cells\n5 6\n".as_bytes(), &mut board)
        .expect("read cannot fail");
    assert_eq!(collect_live(&board), HashSet::from([(1, 2), (3, 4)]));
}
