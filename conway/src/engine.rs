// engine.rs - Generation step for Conway's Game of Life (B3/S23, bounded grid)

use tracing::trace;

use crate::grid::{Cell, Grid};

/// The eight (row, col) deltas of the Moore neighbourhood.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (0, 1),
    (0, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
];

/// Computes successive generations from a grid snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Engine {
    offsets: [(isize, isize); 8],
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            offsets: NEIGHBOR_OFFSETS,
        }
    }
}

impl Engine {
    /// Uses `offsets` as the neighbourhood instead of [`NEIGHBOR_OFFSETS`].
    pub fn new(offsets: [(isize, isize); 8]) -> Self {
        Self { offsets }
    }

    pub fn offsets(&self) -> &[(isize, isize); 8] {
        &self.offsets
    }

    /// Returns the next generation of `grid`.
    ///
    /// Every next state is computed from the unmodified input, the result is a
    /// fresh grid of the same dimensions.
    pub fn step(&self, grid: &Grid) -> Grid {
        let (rows, cols) = (grid.rows(), grid.cols());
        let mut next = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            for col in 0..cols {
                let current = grid.get(row, col).unwrap_or_default();
                let count = self.live_neighbors(grid, row, col);
                next.push(next_state(current, count));
            }
        }

        let next = Grid::from_cells(rows, cols, next);
        trace!(
            before = grid.live_count(),
            after = next.live_count(),
            "stepped {rows}x{cols} grid"
        );
        next
    }

    /// Counts live cells around (`row`, `col`). Neighbours outside the grid
    /// count as dead, there is no wraparound.
    pub fn live_neighbors(&self, grid: &Grid, row: usize, col: usize) -> u8 {
        self.offsets
            .iter()
            .filter_map(|&(dr, dc)| {
                let r = row.checked_add_signed(dr)?;
                let c = col.checked_add_signed(dc)?;
                grid.get(r, c)
            })
            .filter(|cell| cell.is_alive())
            .count() as u8
    }
}

/// Advances `grid` one generation with the standard neighbourhood.
pub fn step(grid: &Grid) -> Grid {
    Engine::default().step(grid)
}

fn next_state(current: Cell, neighbors: u8) -> Cell {
    match (current, neighbors) {
        (_, n) if n < 2 || n > 3 => Cell::Dead, // Under/overpopulation
        (Cell::Dead, 3) => Cell::Alive,         // Birth
        (Cell::Alive, _) => Cell::Alive,        // Survival on 2 or 3
        (Cell::Dead, _) => Cell::Dead,
    }
}
