// scheduler.rs - Run/pause/step state machine driving repeated generations

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::engine::Engine;
use crate::errors::{GridError, SimulationError};
use crate::grid::Grid;
use crate::patterns::Pattern;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    #[default]
    Normal,
    Fast,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

/// Delay between generations for each [`Speed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    pub normal: Duration,
    pub fast: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            normal: Duration::from_millis(1000),
            fast: Duration::from_millis(100),
        }
    }
}

impl Cadence {
    pub fn delay(&self, speed: Speed) -> Duration {
        match speed {
            Speed::Normal => self.normal,
            Speed::Fast => self.fast,
        }
    }
}

/// Identifies one armed tick. Only the most recently armed token may advance
/// the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickToken(u64);

/// Something that calls [`Scheduler::tick`] with `token` once `delay` has passed.
pub trait Timer {
    fn arm(&mut self, delay: Duration, token: TickToken);
    fn cancel(&mut self);
}

/// Receives every grid the scheduler publishes.
pub trait GridObserver {
    fn on_grid_changed(&mut self, grid: &Grid, generation: u64);

    fn on_run_state_changed(&mut self, _state: RunState, _speed: Speed) {}
}

/// Commands a UI surface may issue, one per scheduler operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    Start,
    Stop,
    Step,
    SetSpeed(Speed),
    Clear,
    Randomize(f64),
    ToggleCell { row: usize, col: usize },
    LoadPattern(String),
    Reset(Grid),
}

pub struct Scheduler<T: Timer, O: GridObserver> {
    engine: Engine,
    grid: Grid,
    generation: u64,
    state: RunState,
    speed: Speed,
    cadence: Cadence,
    armed: Option<TickToken>,
    next_token: u64,
    timer: T,
    observer: O,
}

impl<T: Timer, O: GridObserver> Scheduler<T, O> {
    pub fn new(grid: Grid, cadence: Cadence, timer: T, observer: O) -> Self {
        Self {
            engine: Engine::default(),
            grid,
            generation: 0,
            state: RunState::Stopped,
            speed: Speed::Normal,
            cadence,
            armed: None,
            next_token: 0,
            timer,
            observer,
        }
    }

    /// Steps with `engine` instead of the standard neighbourhood.
    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// Creates a stopped scheduler over an empty grid sized by `config`.
    /// Fails if `config` does not validate.
    pub fn from_config(
        config: &SimulationConfig,
        timer: T,
        observer: O,
    ) -> Result<Self, SimulationError> {
        config
            .validate()
            .map_err(|err| SimulationError::InvalidConfig(err.to_string()))?;
        let grid = Grid::empty(config.rows, config.cols)?;
        let mut scheduler = Self::new(grid, config.cadence(), timer, observer);
        scheduler.speed = config.initial_speed;
        Ok(scheduler)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Re-sends the current grid and run state to the observer.
    pub fn publish(&mut self) {
        self.observer.on_run_state_changed(self.state, self.speed);
        self.observer.on_grid_changed(&self.grid, self.generation);
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        info!(generation = self.generation, "simulation started");
        self.state = RunState::Running;
        self.observer.on_run_state_changed(self.state, self.speed);
        self.arm_next();
    }

    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        info!(generation = self.generation, "simulation stopped");
        self.state = RunState::Stopped;
        self.armed = None;
        self.timer.cancel();
        self.observer.on_run_state_changed(self.state, self.speed);
    }

    /// Timer callback. Returns whether the grid advanced.
    ///
    /// The run state and token are read now, not when the tick was armed, so a
    /// tick that outlived a `stop()` does nothing.
    pub fn tick(&mut self, token: TickToken) -> bool {
        if !self.is_running() {
            debug!(?token, "ignoring tick while stopped");
            return false;
        }
        if self.armed != Some(token) {
            debug!(?token, armed = ?self.armed, "ignoring stale tick");
            return false;
        }

        self.armed = None;
        self.advance();
        debug!(generation = self.generation, "tick");
        self.arm_next();
        true
    }

    /// Advances one generation without touching the run state or the timer.
    pub fn single_step(&mut self) {
        self.advance();
    }

    /// Takes effect from the next armed tick.
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
        self.observer.on_run_state_changed(self.state, self.speed);
    }

    /// Replaces the grid and zeroes the generation counter. A running
    /// simulation keeps running against the new grid.
    pub fn reset(&mut self, grid: Grid) {
        info!(rows = grid.rows(), cols = grid.cols(), "grid reset");
        self.grid = grid;
        self.generation = 0;
        self.observer.on_grid_changed(&self.grid, self.generation);
    }

    pub fn clear(&mut self) -> Result<(), SimulationError> {
        let grid = Grid::empty(self.grid.rows(), self.grid.cols())?;
        self.reset(grid);
        Ok(())
    }

    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        alive_probability: f64,
        rng: &mut R,
    ) -> Result<(), SimulationError> {
        let grid = Grid::random(self.grid.rows(), self.grid.cols(), alive_probability, rng)?;
        self.reset(grid);
        Ok(())
    }

    /// Flips one cell. The generation counter is unchanged.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> Result<(), SimulationError> {
        self.grid = self.grid.toggle_cell(row, col)?;
        self.observer.on_grid_changed(&self.grid, self.generation);
        Ok(())
    }

    pub fn load_pattern(&mut self, name: &str) -> Result<(), SimulationError> {
        let grid = Pattern::find(name)?.place_centered(self.grid.rows(), self.grid.cols())?;
        self.reset(grid);
        Ok(())
    }

    pub fn handle(&mut self, request: Request) -> Result<(), SimulationError> {
        match request {
            Request::Start => self.start(),
            Request::Stop => self.stop(),
            Request::Step => self.single_step(),
            Request::SetSpeed(speed) => self.set_speed(speed),
            Request::Clear => self.clear()?,
            Request::Randomize(p) => self.randomize(p, &mut rand::thread_rng())?,
            Request::ToggleCell { row, col } => self.toggle_cell(row, col)?,
            Request::LoadPattern(name) => self.load_pattern(&name)?,
            Request::Reset(grid) => self.reset(grid),
        }
        Ok(())
    }

    fn advance(&mut self) {
        self.generation += 1;
        self.grid = self.engine.step(&self.grid);
        self.observer.on_grid_changed(&self.grid, self.generation);
    }

    fn arm_next(&mut self) {
        let token = TickToken(self.next_token);
        self.next_token += 1;
        self.armed = Some(token);
        self.timer.arm(self.cadence.delay(self.speed), token);
    }
}
