// patterns.rs - Named starting patterns placed on a grid

use crate::errors::{GridError, SimulationError};
use crate::grid::Grid;

/// A named arrangement of live cells, relative to its own top-left corner.
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Block",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "Toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "Glider",
        cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
    },
];

impl Pattern {
    /// Looks a pattern up by name, ignoring ASCII case.
    pub fn find(name: &str) -> Result<&'static Pattern, SimulationError> {
        PATTERNS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SimulationError::UnknownPattern(name.to_string()))
    }

    /// Bounding box as (height, width).
    pub fn extent(&self) -> (usize, usize) {
        self.cells.iter().fold((0, 0), |(h, w), &(r, c)| {
            (h.max(r + 1), w.max(c + 1))
        })
    }

    /// Builds an otherwise empty `rows` x `cols` grid with this pattern centered.
    pub fn place_centered(&self, rows: usize, cols: usize) -> Result<Grid, GridError> {
        let (height, width) = self.extent();
        if height > rows || width > cols {
            return Err(GridError::PatternTooLarge {
                height,
                width,
                rows,
                cols,
            });
        }

        let top = (rows - height) / 2;
        let left = (cols - width) / 2;
        let cells: Vec<(usize, usize)> = self
            .cells
            .iter()
            .map(|&(r, c)| (top + r, left + c))
            .collect();

        Grid::with_live_cells(rows, cols, &cells)
    }
}
