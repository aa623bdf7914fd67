//! # conway
//!
//! Conway's Game of Life on a bounded grid: the generation step, a
//! run/pause/step scheduler, and a tokio task that drives it on a timer.

pub mod config;
pub mod engine;
pub mod errors;
pub mod grid;
pub mod patterns;
pub mod runtime;
pub mod scheduler;

pub use config::SimulationConfig;
pub use engine::{Engine, step};
pub use errors::{ConfigError, GridError, SimulationError};
pub use grid::{Cell, Grid};
pub use patterns::{PATTERNS, Pattern};
pub use runtime::{Frame, FrameObserver, SimulationHandle, spawn};
pub use scheduler::{Cadence, GridObserver, Request, RunState, Scheduler, Speed, TickToken, Timer};
