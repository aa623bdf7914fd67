// grid.rs - Grid types for Conway's Game of Life

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::errors::GridError;

/// Alive probability of the reference random fill (a draw above 0.8 on [0, 1)).
pub const DEFAULT_ALIVE_PROBABILITY: f64 = 0.2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    pub fn toggled(self) -> Cell {
        match self {
            Cell::Dead => Cell::Alive,
            Cell::Alive => Cell::Dead,
        }
    }

    fn from_char(value: char) -> Result<Cell, GridError> {
        match value {
            '.' => Ok(Cell::Dead),
            'O' | '#' | '*' => Ok(Cell::Alive),
            _ => Err(GridError::InvalidCell(value)),
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }
}

/// A fixed-size rectangular snapshot of cells, stored row-major.
///
/// Operations that "change" a grid return a new one and leave `self` untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every cell dead.
    pub fn empty(rows: usize, cols: usize) -> Result<Grid, GridError> {
        let mut cells = allocate(rows, cols)?;
        cells.resize(rows * cols, Cell::Dead);
        Ok(Grid { rows, cols, cells })
    }

    /// Creates a grid where each cell is independently alive with `alive_probability`.
    ///
    /// # Arguments
    /// * `alive_probability` - Must lie in `[0, 1]`.
    /// * `rng` - Source of randomness, seed it for reproducible grids.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        alive_probability: f64,
        rng: &mut R,
    ) -> Result<Grid, GridError> {
        check_dimensions(rows, cols)?;
        // Also rejects NaN
        if !(0.0..=1.0).contains(&alive_probability) {
            return Err(GridError::InvalidParameter(alive_probability));
        }

        let mut cells = allocate(rows, cols)?;
        cells.extend((0..rows * cols).map(|_| Cell::from(rng.gen_bool(alive_probability))));

        Ok(Grid { rows, cols, cells })
    }

    /// Creates an empty grid with the given cells alive.
    pub fn with_live_cells(
        rows: usize,
        cols: usize,
        live: &[(usize, usize)],
    ) -> Result<Grid, GridError> {
        let mut grid = Grid::empty(rows, cols)?;
        for &(row, col) in live {
            let idx = grid.index(row, col)?;
            grid.cells[idx] = Cell::Alive;
        }
        Ok(grid)
    }

    /// Returns a copy of this grid with the cell at (`row`, `col`) flipped.
    pub fn toggle_cell(&self, row: usize, col: usize) -> Result<Grid, GridError> {
        let idx = self.index(row, col)?;
        let mut next = self.clone();
        next.cells[idx] = next.cells[idx].toggled();
        Ok(next)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).ok().map(|idx| self.cells[idx])
    }

    /// Out-of-range coordinates count as dead.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(Cell::is_alive)
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Coordinates of every live cell in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(move |(idx, _)| (idx / cols, idx % cols))
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols)
    }

    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Grid {
        debug_assert_eq!(cells.len(), rows * cols);
        Grid { rows, cols, cells }
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds(row, col));
        }
        Ok(row * self.cols + col)
    }
}

/// Returns the cell count, rejecting zero sizes and products that overflow.
fn check_dimensions(rows: usize, cols: usize) -> Result<usize, GridError> {
    match rows.checked_mul(cols) {
        Some(len) if rows > 0 && cols > 0 => Ok(len),
        _ => Err(GridError::InvalidDimension(rows, cols)),
    }
}

/// Empty buffer with room for every cell. Sizes the allocator refuses are
/// reported as `InvalidDimension` instead of aborting.
fn allocate(rows: usize, cols: usize) -> Result<Vec<Cell>, GridError> {
    let len = check_dimensions(rows, cols)?;
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(len)
        .map_err(|_| GridError::InvalidDimension(rows, cols))?;
    Ok(cells)
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parses one line per row, `.` for dead and `O`, `#` or `*` for alive.
    /// Surrounding whitespace on each line is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let rows = lines.len();
        let cols = lines.first().map_or(0, |line| line.chars().count());
        let mut cells = allocate(rows, cols)?;
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(GridError::Jagged {
                    row,
                    expected: cols,
                    found,
                });
            }
            for c in line.chars() {
                cells.push(Cell::from_char(c)?);
            }
        }

        Ok(Grid { rows, cols, cells })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for cell in row {
                let c = if cell.is_alive() { 'O' } else { '.' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn when_creating_an_empty_grid_every_cell_is_dead() {
        let grid = Grid::empty(3, 4).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.live_count(), 0);
        assert_eq!(grid.iter_rows().count(), 3);
        assert!(grid.iter_rows().all(|row| row.len() == 4));
    }

    #[test]
    fn when_creating_a_grid_with_a_zero_dimension_it_fails() {
        assert_eq!(Grid::empty(0, 5), Err(GridError::InvalidDimension(0, 5)));
        assert_eq!(Grid::empty(5, 0), Err(GridError::InvalidDimension(5, 0)));

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            Grid::random(0, 5, 0.5, &mut rng),
            Err(GridError::InvalidDimension(0, 5))
        );
    }

    #[test]
    fn when_the_cell_count_overflows_creating_a_grid_fails() {
        assert_eq!(
            Grid::empty(usize::MAX, 2),
            Err(GridError::InvalidDimension(usize::MAX, 2))
        );
        assert_eq!(
            Grid::empty(2, usize::MAX),
            Err(GridError::InvalidDimension(2, usize::MAX))
        );
        // Fits in usize but no allocator hands out that much.
        assert_eq!(
            Grid::empty(usize::MAX, 1),
            Err(GridError::InvalidDimension(usize::MAX, 1))
        );

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            Grid::random(usize::MAX, 3, 0.5, &mut rng),
            Err(GridError::InvalidDimension(usize::MAX, 3))
        );
    }

    #[test]
    fn when_the_probability_is_out_of_range_random_fails() {
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(
            Grid::random(4, 4, 1.5, &mut rng),
            Err(GridError::InvalidParameter(1.5))
        );
        assert_eq!(
            Grid::random(4, 4, -0.1, &mut rng),
            Err(GridError::InvalidParameter(-0.1))
        );
        assert!(Grid::random(4, 4, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn when_the_probability_is_zero_or_one_the_grid_is_uniform() {
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(Grid::random(6, 6, 0.0, &mut rng).unwrap().live_count(), 0);
        assert_eq!(Grid::random(6, 6, 1.0, &mut rng).unwrap().live_count(), 36);
    }

    #[test]
    fn when_seeded_random_grids_are_reproducible_and_near_the_requested_density() {
        let a = Grid::random(100, 100, 0.2, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = Grid::random(100, 100, 0.2, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(a, b);
        let density = a.live_count() as f64 / 10_000.0;
        assert!((0.17..0.23).contains(&density), "density was {density}");
    }

    #[test]
    fn when_toggling_a_cell_a_new_grid_is_returned_and_the_input_is_untouched() {
        let grid = Grid::empty(3, 3).unwrap();
        let toggled = grid.toggle_cell(1, 2).unwrap();

        assert!(toggled.is_alive(1, 2));
        assert_eq!(toggled.live_count(), 1);
        assert_eq!(grid.live_count(), 0);

        let back = toggled.toggle_cell(1, 2).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn when_toggling_outside_the_grid_it_fails() {
        let grid = Grid::empty(3, 3).unwrap();

        assert_eq!(grid.toggle_cell(3, 0), Err(GridError::OutOfBounds(3, 0)));
        assert_eq!(grid.toggle_cell(0, 3), Err(GridError::OutOfBounds(0, 3)));
    }

    #[test]
    fn when_reading_outside_the_grid_cells_are_dead() {
        let grid = Grid::with_live_cells(2, 2, &[(0, 0), (1, 1)]).unwrap();

        assert_eq!(grid.get(2, 0), None);
        assert!(!grid.is_alive(0, 5));
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn when_parsing_text_the_grid_matches_and_displays_back() {
        let text = "\
            .O.
            .O.
            .#.";
        let grid: Grid = text.parse().unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), vec![(0, 1), (1, 1), (2, 1)]);
        assert_eq!(grid.to_string(), ".O.\n.O.\n.O.\n");
    }

    #[test]
    fn when_parsing_malformed_text_it_fails() {
        assert_eq!("".parse::<Grid>(), Err(GridError::InvalidDimension(0, 0)));
        assert_eq!(
            "...\n..\n...".parse::<Grid>(),
            Err(GridError::Jagged { row: 1, expected: 3, found: 2 })
        );
        assert_eq!("..x".parse::<Grid>(), Err(GridError::InvalidCell('x')));
    }
}
