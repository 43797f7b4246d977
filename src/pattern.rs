//! Plaintext patterns: rectangular grids of alive/dead markers.

use thiserror::Error;

use crate::Coord;
use crate::cell::Cell;
use crate::population::Population;
use crate::viewport::Viewport;

pub const ALIVE: char = '*';
pub const DEAD: char = '.';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("Grid width must be positive")]
    ZeroWidth,

    #[error("{len} markers don't split into rows of {width}")]
    Ragged { len: usize, width: usize },

    #[error("Unrecognized marker '{got}' at row {row}, column {col}")]
    UnknownMarker { got: char, row: usize, col: usize },

    #[error("Pattern runs off the edge of the world")]
    Overflow,
}

/// Parse a row-major run of `width` markers per row, with no line breaks.
///
/// `*` is alive, a space or `.` is dead. The marker at row `r`, column `c` becomes the cell
/// `(offset.0 + c, offset.1 + r)`.
///
/// ```
/// use sparselife::pattern::parse_grid;
///
/// let cells = parse_grid(" * ** ", 3, (10, 0)).unwrap();
/// assert_eq!(cells.len(), 3);
/// ```
pub fn parse_grid(
    markers: &str,
    width: usize,
    offset: (Coord, Coord),
) -> Result<Vec<Cell>, PatternError> {
    if width == 0 {
        return Err(PatternError::ZeroWidth);
    }

    let len = markers.chars().count();
    if len % width != 0 {
        return Err(PatternError::Ragged { len, width });
    }

    let mut cells = Vec::new();

    for (i, m) in markers.chars().enumerate() {
        let (row, col) = (i / width, i % width);

        match m {
            '*' => cells.push(place(offset, row, col)?),
            ' ' | '.' => {}
            got => return Err(PatternError::UnknownMarker { got, row, col }),
        }
    }

    Ok(cells)
}

/// Parse the plaintext `.cells` format.
///
/// Lines starting with `!` are comments. `O` or `*` is alive and `.` is dead. Lines may have
/// different lengths; missing markers are dead.
///
/// See: https://conwaylife.com/wiki/Plaintext
pub fn parse_plaintext(text: &str, offset: (Coord, Coord)) -> Result<Vec<Cell>, PatternError> {
    let mut cells = Vec::new();

    let rows = text.lines().filter(|l| !l.starts_with('!'));

    for (row, line) in rows.enumerate() {
        for (col, m) in line.chars().enumerate() {
            match m {
                'O' | '*' => cells.push(place(offset, row, col)?),
                '.' | ' ' => {}
                got => return Err(PatternError::UnknownMarker { got, row, col }),
            }
        }
    }

    Ok(cells)
}

fn place((dx, dy): (Coord, Coord), row: usize, col: usize) -> Result<Cell, PatternError> {
    let x = Coord::try_from(col)
        .ok()
        .and_then(|c| dx.checked_add(c))
        .ok_or(PatternError::Overflow)?;
    let y = Coord::try_from(row)
        .ok()
        .and_then(|r| dy.checked_add(r))
        .ok_or(PatternError::Overflow)?;

    Ok(Cell::new(x, y))
}

/// Draw the part of `population` inside `viewport`, one line per row, [`ALIVE`] for living cells
/// and [`DEAD`] for everything else.
pub fn to_plaintext(population: &Population, viewport: Viewport) -> String {
    let mut out = String::new();

    if viewport.is_empty() {
        return out;
    }

    // sorted row-major, the same order we walk the window in
    let mut alive = population.visible_in(viewport).into_iter().peekable();

    for y in viewport.min_y..=viewport.max_y {
        for x in viewport.min_x..=viewport.max_x {
            if alive.next_if_eq(&Cell::new(x, y)).is_some() {
                out.push(ALIVE);
            } else {
                out.push(DEAD);
            }
        }

        out.push('\n');
    }

    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grid_with_offset() {
        let cells = parse_grid(concat!("  *", "* *"), 3, (30, 5));

        assert_eq!(cells, Ok(vec![Cell::new(32, 5), Cell::new(30, 6), Cell::new(32, 6)]));
    }

    #[test]
    fn grid_errors() {
        assert_eq!(parse_grid("**", 0, (0, 0)), Err(PatternError::ZeroWidth));
        assert_eq!(
            parse_grid("***", 2, (0, 0)),
            Err(PatternError::Ragged { len: 3, width: 2 })
        );
        assert_eq!(
            parse_grid("*.#*", 2, (0, 0)),
            Err(PatternError::UnknownMarker {
                got: '#',
                row: 1,
                col: 0
            })
        );
        assert_eq!(
            parse_grid(" *", 2, (Coord::MAX, 0)),
            Err(PatternError::Overflow)
        );
    }

    #[test]
    fn plaintext() {
        let text = "!Name: Glider\n!\n.O\n..O\r\nOOO\n";

        let cells = parse_plaintext(text, (0, 0)).unwrap();

        assert_eq!(
            cells,
            [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)].map(Cell::from)
        );
    }

    #[test]
    fn plaintext_unknown_marker() {
        assert_eq!(
            parse_plaintext("..\n.x", (0, 0)),
            Err(PatternError::UnknownMarker {
                got: 'x',
                row: 1,
                col: 1
            })
        );
    }

    #[test]
    fn plaintext_window() {
        let p = Population::new([(0, 0), (1, 1), (5, 5)]);

        let s = to_plaintext(&p, Viewport::new(0, 0, 2, 1));

        assert_eq!(s, "*..\n.*.\n");
        assert_eq!(to_plaintext(&p, Viewport::new(1, 0, 0, 0)), "");
    }
}
