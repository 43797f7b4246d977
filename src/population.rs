use hashbrown::HashSet;
use tracing::debug;
use tracing::trace;

use crate::Coord;
use crate::cell;
use crate::cell::Cell;
use crate::viewport::Viewport;

/// The living cells of one generation on an unbounded lattice.
///
/// Only living cells are stored, so the cost of a [`step`](Population::step) grows with the
/// population rather than with any grid area.
#[derive(Debug, Clone, Default)]
pub struct Population {
    /// Every living cell. Anything not in here is dead.
    living: HashSet<Cell>,

    /// Number of steps taken since construction
    generation: u64,
}

impl Population {
    /// Create a population from a starting set of living cells. Duplicates collapse.
    pub fn new<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let living: HashSet<Cell> = cells.into_iter().map(Into::<Cell>::into).collect();
        trace!(population = living.len(), "seeded population");

        Self {
            living,
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.living.len()
    }

    pub fn is_empty(&self) -> bool {
        self.living.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.living.contains(&cell)
    }

    /// Iterate over the living cells, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.living.iter().copied()
    }

    /// Count the living neighbors of `cell`, whether or not `cell` itself is alive.
    pub fn living_neighbors(&self, cell: Cell) -> u8 {
        cell.neighbors()
            .iter()
            .filter(|n| self.living.contains(*n))
            .count() as u8
    }

    /// Tight bounding box of the living cells, `None` if there are none.
    pub fn bounds(&self) -> Option<Viewport> {
        Viewport::bounding(&self.living)
    }

    /// Advance one generation.
    ///
    /// The next generation is computed entirely against the current one and then swapped in, so
    /// no rule is ever evaluated against a half-updated set.
    ///
    /// # Panics
    ///
    /// If a living cell sits on the edge of the `i64` lattice.
    pub fn step(&mut self) {
        let next = self.next_generation();

        debug!(
            generation = self.generation + 1,
            before = self.living.len(),
            after = next.living.len(),
            survivors = next.survivors,
            births = next.births,
            "stepped"
        );

        self.living = next.living;
        self.generation += 1;
    }

    /// Advance `n` generations.
    pub fn advance(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Every living cell with `min_x <= x <= max_x` and `min_y <= y <= max_y`, in row-major order.
    ///
    /// An inverted window contains nothing and returns an empty list.
    pub fn visible(&self, min_x: Coord, min_y: Coord, max_x: Coord, max_y: Coord) -> Vec<Cell> {
        self.visible_in(Viewport::new(min_x, min_y, max_x, max_y))
    }

    /// Like [`visible`](Population::visible), for a [`Viewport`].
    pub fn visible_in(&self, viewport: Viewport) -> Vec<Cell> {
        if viewport.is_empty() {
            return Vec::new();
        }

        let mut cells: Vec<Cell> = self
            .living
            .iter()
            .copied()
            .filter(|&c| viewport.contains(c))
            .collect();

        // Hash set order isn't stable across generations, rows are
        cells.sort_unstable();

        cells
    }

    #[cfg(not(feature = "parallel"))]
    fn next_generation(&self) -> NextGeneration {
        self.next_generation_seq()
    }

    #[cfg(feature = "parallel")]
    fn next_generation(&self) -> NextGeneration {
        self.next_generation_par()
    }

    #[cfg_attr(feature = "parallel", allow(dead_code))]
    fn next_generation_seq(&self) -> NextGeneration {
        let mut living = HashSet::with_capacity(self.living.len());

        // Dead cells touching at least one living cell. A set, so that a dead cell bordering
        // several living ones is only considered once.
        let mut candidates = HashSet::new();

        for &cell in &self.living {
            let mut n = 0;

            for neighbor in cell.neighbors() {
                if self.living.contains(&neighbor) {
                    n += 1;
                } else {
                    candidates.insert(neighbor);
                }
            }

            if cell::survives(n) {
                living.insert(cell);
            }
        }

        let survivors = living.len();

        for candidate in candidates {
            if cell::is_born(self.living_neighbors(candidate)) {
                living.insert(candidate);
            }
        }

        let births = living.len() - survivors;

        NextGeneration {
            living,
            survivors,
            births,
        }
    }

    /// Same rules as `next_generation_seq`, with each pass spread over the rayon pool. Every
    /// pass only reads `self.living`.
    #[cfg(feature = "parallel")]
    fn next_generation_par(&self) -> NextGeneration {
        use rayon::prelude::*;

        let mut living: HashSet<Cell> = self
            .living
            .par_iter()
            .copied()
            .filter(|&c| cell::survives(self.living_neighbors(c)))
            .collect();

        let candidates: HashSet<Cell> = self
            .living
            .par_iter()
            .flat_map_iter(|c| c.neighbors())
            .filter(|n| !self.living.contains(n))
            .collect();

        let births: Vec<Cell> = candidates
            .par_iter()
            .copied()
            .filter(|&c| cell::is_born(self.living_neighbors(c)))
            .collect();

        let survivors = living.len();
        let n_births = births.len();
        living.extend(births);

        NextGeneration {
            living,
            survivors,
            births: n_births,
        }
    }
}

/// A computed but not yet committed generation.
struct NextGeneration {
    living: HashSet<Cell>,
    survivors: usize,
    births: usize,
}

impl<C: Into<Cell>> FromIterator<C> for Population {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<C: Into<Cell>> Extend<C> for Population {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        self.living.extend(iter.into_iter().map(Into::<Cell>::into));
    }
}
