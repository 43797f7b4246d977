use core::cmp::Ordering;
use core::fmt;

use crate::Coord;

/// A living cell with this many neighbors or fewer dies, as if by solitude.
pub const SOLITUDE_DEATH_COUNT: u8 = 1;

/// A living cell with this many neighbors or more dies, as if by overpopulation.
pub const OVERPOPULATION_DEATH_COUNT: u8 = 4;

/// A dead cell with *exactly* this many neighbors comes to life. Crowded areas never breed.
pub const BIRTH_COUNT: u8 = 3;

/// Offsets of the Moore neighborhood, row by row starting from the top left.
const NEIGHBORHOOD: [(Coord, Coord); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A single lattice position.
///
/// Cells are plain values: two cells at the same position are the same cell. Equality and
/// hashing only look at `(x, y)`, and ordering is row-major (`y` first, then `x`), which is the
/// order rows are drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    x: Coord,
    y: Coord,
}

impl Cell {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub const fn x(&self) -> Coord {
        self.x
    }

    pub const fn y(&self) -> Coord {
        self.y
    }

    /// The eight cells at Chebyshev distance 1.
    ///
    /// # Panics
    ///
    /// If any neighbor lies outside the `i64` range. The lattice is treated as unbounded, so
    /// reaching the edge of the integer width is unrecoverable.
    pub fn neighbors(&self) -> [Cell; 8] {
        NEIGHBORHOOD.map(|(dx, dy)| Cell::new(shift(self.x, dx), shift(self.y, dy)))
    }

    /// The same cell moved by `(dx, dy)`.
    ///
    /// # Panics
    ///
    /// On `i64` overflow.
    pub fn translate(&self, dx: Coord, dy: Coord) -> Cell {
        Cell::new(shift(self.x, dx), shift(self.y, dy))
    }
}

fn shift(v: Coord, d: Coord) -> Coord {
    match v.checked_add(d) {
        Some(v) => v,
        None => panic!("coordinate {v} overflowed when shifted by {d}"),
    }
}

/// Decide whether a *living* cell stays alive given its number of living neighbors.
///
/// Only call this for a cell that is currently alive. Whether a dead cell comes to life is a
/// different rule, see [`is_born`].
pub const fn survives(living_neighbors: u8) -> bool {
    // rule: one or no neighbors, death by solitude
    if living_neighbors <= SOLITUDE_DEATH_COUNT {
        return false;
    }

    // rule: four or more neighbors, death by overpopulation
    if living_neighbors >= OVERPOPULATION_DEATH_COUNT {
        return false;
    }

    true
}

/// Decide whether a *dead* cell comes to life given its number of living neighbors.
pub const fn is_born(living_neighbors: u8) -> bool {
    living_neighbors == BIRTH_COUNT
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(Coord, Coord)> for Cell {
    fn from((x, y): (Coord, Coord)) -> Self {
        Cell::new(x, y)
    }
}

impl From<Cell> for (Coord, Coord) {
    fn from(cell: Cell) -> Self {
        (cell.x, cell.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
