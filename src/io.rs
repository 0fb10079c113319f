//! Reading and writing boards in the Life 1.06 coordinate-list dialect.
//!
//! The format is an optional `#Life 1.06` header line followed by one alive
//! cell per line as two whitespace-separated signed integers. The reader is
//! forgiving the way the original tooling is: the first line that does not
//! parse as two integers simply ends the data, it is not an error.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::board::GameBoard;
use crate::coord::{Coord, Unit};

/// Header line emitted by the writer and skipped by the reader.
pub const LIFE_HEADER: &str = "#Life 1.06";

#[derive(Debug, Error)]
pub enum BoardIoError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("board I/O failed: {0}")]
    Io(#[from] io::Error),
}

fn parse_cell_line(line: &str) -> Option<Coord> {
    let mut parts = line.split_whitespace();
    let x = parts.next()?.parse::<Unit>().ok()?;
    let y = parts.next()?.parse::<Unit>().ok()?;
    Some(Coord::new(x, y))
}

/// Populate `board` from a Life 1.06 stream.
///
/// Cells land in the generation being written; the loaded generation is
/// committed with one finalize before returning, so the board is ready to
/// be read and simulated.
pub fn read_board<R: BufRead>(mut reader: R, board: &mut dyn GameBoard) -> Result<(), BoardIoError> {
    let mut line = String::new();
    let mut first_line = true;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let content = line.trim();
        if first_line {
            first_line = false;
            if content == LIFE_HEADER {
                continue;
            }
        }
        match parse_cell_line(content) {
            Some(cell) => board.create_cell(cell),
            None => break,
        }
    }

    board.finish_current_generation();
    Ok(())
}

pub fn read_board_from_path(
    path: impl AsRef<Path>,
    board: &mut dyn GameBoard,
) -> Result<(), BoardIoError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| BoardIoError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_board(BufReader::new(file), board)
}

pub fn read_board_from_stdin(board: &mut dyn GameBoard) -> Result<(), BoardIoError> {
    read_board(io::stdin().lock(), board)
}

/// Write the committed generation of `board` as Life 1.06: the header, then
/// one `x y` line per alive cell in the board's traversal order.
pub fn write_board<W: Write>(mut writer: W, board: &dyn GameBoard) -> Result<(), BoardIoError> {
    writeln!(writer, "{LIFE_HEADER}")?;

    let mut write_error: Option<io::Error> = None;
    board.iterate_current_generation_alive_cells(Coord::ZERO, &mut |cell| {
        if write_error.is_none()
            && let Err(error) = writeln!(writer, "{} {}", cell.x, cell.y)
        {
            write_error = Some(error);
        }
    });

    match write_error {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

pub fn write_board_to_path(
    path: impl AsRef<Path>,
    board: &dyn GameBoard,
) -> Result<(), BoardIoError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| BoardIoError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_board(&mut writer, board)?;
    writer.flush()?;
    Ok(())
}

pub fn write_board_to_stdout(board: &dyn GameBoard) -> Result<(), BoardIoError> {
    write_board(io::stdout().lock(), board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::AliveSetBoard;

    fn load(input: &str) -> AliveSetBoard {
        let mut board = AliveSetBoard::new();
        read_board(input.as_bytes(), &mut board).expect("in-memory read cannot fail");
        board
    }

    fn alive(board: &AliveSetBoard) -> Vec<(Unit, Unit)> {
        let mut cells = Vec::new();
        board.iterate_current_generation_alive_cells(Coord::ZERO, &mut |cell| {
            cells.push((cell.x, cell.y))
        });
        cells
    }

    #[test]
    fn reads_with_and_without_header() {
        let with = load("#Life 1.06\n0 1\n-2 3\n");
        let without = load("0 1\n-2 3\n");
        assert_eq!(alive(&with), alive(&without));
        assert_eq!(alive(&with), vec![(0, 1), (-2, 3)]);
    }

    #[test]
    fn first_unparsable_line_ends_the_data() {
        let board = load("1 1\n2 2\noops\n3 3\n");
        assert_eq!(alive(&board), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn blank_line_ends_the_data() {
        let board = load("1 1\n\n2 2\n");
        assert_eq!(alive(&board), vec![(1, 1)]);
    }

    #[test]
    fn empty_input_loads_an_empty_board() {
        assert!(load("").is_empty());
        assert!(load(LIFE_HEADER).is_empty());
    }

    #[test]
    fn writer_emits_header_and_cells() {
        let board = load("5 -7\n0 0\n");
        let mut out = Vec::new();
        write_board(&mut out, &board).expect("in-memory write cannot fail");
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "#Life 1.06\n5 -7\n0 0\n");
    }

    #[test]
    fn missing_file_surfaces_the_path() {
        let mut board = AliveSetBoard::new();
        let error = read_board_from_path("definitely/not/here.life", &mut board)
            .expect_err("the file does not exist");
        assert!(matches!(error, BoardIoError::Open { .. }));
        assert!(error.to_string().contains("definitely/not/here.life"));
    }
}
