use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patch_life::{
    AliveSetBoard, BoxedBoard, GridTile, TileGraph, Unit, io, run_generation,
};

#[derive(Parser, Debug)]
#[command(name = "patch-life")]
#[command(about = "Run Conway's Game of Life over an unbounded tiled board")]
struct Cli {
    /// Life 1.06 input file (reads stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output file (writes stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of generations to simulate
    #[arg(long, default_value = "10")]
    generations: u64,

    /// Board representation
    #[arg(long, value_enum, default_value = "graph")]
    board: BoardKind,

    /// Sub-tile edge length for the tiled boards
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(i64).range(1..))]
    tile_size: Unit,

    /// Worker threads for the kernel pass (0 = auto-detect)
    #[arg(long, default_value = "0")]
    threads: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BoardKind {
    /// Sparse multi-tile graph, unbounded coordinates
    Graph,
    /// One fixed tile; cells outside it are dropped
    Tile,
    /// Flat alive-list; input/output only, no simulation
    Sparse,
}

fn build_board(kind: BoardKind, tile_size: Unit) -> BoxedBoard {
    match kind {
        BoardKind::Graph => Box::new(TileGraph::of_tiles(tile_size)),
        BoardKind::Tile => Box::new(GridTile::new(tile_size)),
        BoardKind::Sparse => Box::new(AliveSetBoard::new()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patch_life=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("failed to configure the kernel thread pool")?;
    }

    let mut board = build_board(cli.board, cli.tile_size);

    match &cli.input {
        Some(path) => io::read_board_from_path(path, board.as_mut())
            .with_context(|| format!("failed to load board from {}", path.display()))?,
        None => io::read_board_from_stdin(board.as_mut()).context("failed to load board")?,
    }

    info!("running {} generations", cli.generations);
    for _ in 0..cli.generations {
        run_generation(board.as_mut());
    }

    match &cli.output {
        Some(path) => io::write_board_to_path(path, board.as_ref())
            .with_context(|| format!("failed to write board to {}", path.display()))?,
        None => io::write_board_to_stdout(board.as_ref()).context("failed to write board")?,
    }

    Ok(())
}
