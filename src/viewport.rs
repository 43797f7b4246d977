use crate::Coord;
use crate::cell::Cell;

/// An inclusive rectangle of simulation space.
///
/// A viewport with `min_x > max_x` or `min_y > max_y` is inverted. Inverted viewports are
/// allowed and contain no cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub min_x: Coord,
    pub min_y: Coord,
    pub max_x: Coord,
    pub max_y: Coord,
}

impl Viewport {
    pub const fn new(min_x: Coord, min_y: Coord, max_x: Coord, max_y: Coord) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A `width` by `height` window whose top left corner is `(x, y)`.
    ///
    /// A zero width or height yields an inverted (empty) viewport. Sizes that would run past the
    /// end of the lattice are clamped to it.
    pub fn from_origin(x: Coord, y: Coord, width: u64, height: u64) -> Self {
        fn far_edge(lo: Coord, len: u64) -> Coord {
            match len.checked_sub(1) {
                None => lo.saturating_sub(1),
                Some(d) => lo.saturating_add_unsigned(d),
            }
        }

        Self::new(x, y, far_edge(x, width), far_edge(y, height))
    }

    /// The tight bounding box of `cells`, or `None` if there are none.
    pub fn bounding<'a, I>(cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut cells = cells.into_iter();
        let first = cells.next()?;

        let mut b = Self::new(first.x(), first.y(), first.x(), first.y());
        for c in cells {
            b.min_x = b.min_x.min(c.x());
            b.min_y = b.min_y.min(c.y());
            b.max_x = b.max_x.max(c.x());
            b.max_y = b.max_y.max(c.y());
        }

        Some(b)
    }

    pub const fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub const fn contains(&self, cell: Cell) -> bool {
        self.min_x <= cell.x()
            && cell.x() <= self.max_x
            && self.min_y <= cell.y()
            && cell.y() <= self.max_y
    }

    /// Number of columns covered, `0` when empty.
    pub fn width(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.max_x.abs_diff(self.min_x).saturating_add(1)
        }
    }

    /// Number of rows covered, `0` when empty.
    pub fn height(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.max_y.abs_diff(self.min_y).saturating_add(1)
        }
    }

    /// Move the window by `(dx, dy)`, stopping at the edge of the lattice.
    pub fn translate(&self, dx: Coord, dy: Coord) -> Self {
        Self::new(
            self.min_x.saturating_add(dx),
            self.min_y.saturating_add(dy),
            self.max_x.saturating_add(dx),
            self.max_y.saturating_add(dy),
        )
    }

    /// The midpoint of the window, rounding towards the top left.
    pub fn center(&self) -> Cell {
        Cell::new(midpoint(self.min_x, self.max_x), midpoint(self.min_y, self.max_y))
    }
}

fn midpoint(a: Coord, b: Coord) -> Coord {
    // i128 so the sum can't overflow
    ((a as i128 + b as i128).div_euclid(2)) as Coord
}
