// errors.rs - Error types for grids, simulations and config

use quick_error::quick_error;

quick_error! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum GridError {
        InvalidDimension(rows: usize, cols: usize) {
            display("invalid grid dimension: {rows}x{cols}")
        }
        InvalidParameter(probability: f64) {
            display("alive probability must lie in [0, 1], got {probability}")
        }
        OutOfBounds(row: usize, col: usize) {
            display("cell ({row}, {col}) is outside the grid")
        }
        Jagged { row: usize, expected: usize, found: usize } {
            display("row {row} has {found} cells, expected {expected}")
        }
        InvalidCell(c: char) {
            display("invalid cell character: {c:?}")
        }
        PatternTooLarge { height: usize, width: usize, rows: usize, cols: usize } {
            display("a {height}x{width} pattern does not fit a {rows}x{cols} grid")
        }
    }
}

quick_error! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum SimulationError {
        Grid(err: GridError) {
            from()
            source(err)
            display("{}", err)
        }
        UnknownPattern(name: String) {
            display("unknown pattern: {name}")
        }
        InvalidConfig(reason: String) {
            display("{reason}")
        }
        Closed {
            display("simulation is no longer running")
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum ConfigError {
        Io(err: std::io::Error) {
            from()
            source(err)
            display("failed to read config: {}", err)
        }
        Json(err: serde_json::Error) {
            from()
            source(err)
            display("failed to parse config: {}", err)
        }
        Invalid(reason: String) {
            display("invalid config: {reason}")
        }
    }
}
