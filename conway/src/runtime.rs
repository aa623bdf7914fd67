// runtime.rs - Tokio task that owns a scheduler and fires its ticks

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::errors::SimulationError;
use crate::grid::Grid;
use crate::scheduler::{GridObserver, Request, RunState, Scheduler, Speed, TickToken, Timer};

/// Everything a renderer needs to draw one update.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub grid: Grid,
    pub generation: u64,
    pub state: RunState,
    pub speed: Speed,
}

impl Frame {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            generation: 0,
            state: RunState::Stopped,
            speed: Speed::Normal,
        }
    }
}

/// Publishes into a `watch` channel, so readers always see the latest frame.
pub struct FrameObserver {
    frames: watch::Sender<Frame>,
}

impl FrameObserver {
    pub fn channel(initial: Frame) -> (Self, watch::Receiver<Frame>) {
        let (frames, rx) = watch::channel(initial);
        (Self { frames }, rx)
    }
}

impl GridObserver for FrameObserver {
    fn on_grid_changed(&mut self, grid: &Grid, generation: u64) {
        self.frames.send_modify(|frame| {
            frame.grid = grid.clone();
            frame.generation = generation;
        });
    }

    fn on_run_state_changed(&mut self, state: RunState, speed: Speed) {
        self.frames.send_modify(|frame| {
            frame.state = state;
            frame.speed = speed;
        });
    }
}

/// Holds at most one pending deadline, polled by the actor loop.
#[derive(Debug, Default)]
pub struct DeadlineTimer {
    pending: Option<(Instant, TickToken)>,
}

impl Timer for DeadlineTimer {
    fn arm(&mut self, delay: Duration, token: TickToken) {
        self.pending = Some((Instant::now() + delay, token));
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}

impl DeadlineTimer {
    fn fired(&mut self) {
        self.pending = None;
    }
}

struct Envelope {
    request: Request,
    reply: Option<oneshot::Sender<Result<(), SimulationError>>>,
}

/// Cheap to clone. The simulation ends when the last handle is dropped.
#[derive(Clone, Debug)]
pub struct SimulationHandle {
    commands: mpsc::UnboundedSender<Envelope>,
}

impl SimulationHandle {
    /// Queues `request` without waiting. Failures are logged by the simulation.
    pub fn submit(&self, request: Request) -> Result<(), SimulationError> {
        self.commands
            .send(Envelope {
                request,
                reply: None,
            })
            .map_err(|_| SimulationError::Closed)
    }

    /// Queues `request` and waits for its outcome.
    pub async fn request(&self, request: Request) -> Result<(), SimulationError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Envelope {
                request,
                reply: Some(tx),
            })
            .map_err(|_| SimulationError::Closed)?;
        rx.await.map_err(|_| SimulationError::Closed)?
    }
}

/// Spawns a simulation on the current tokio runtime.
///
/// The observer immediately receives the initial empty grid. An invalid
/// `config` is rejected before anything is spawned.
pub fn spawn<O>(
    config: &SimulationConfig,
    observer: O,
) -> Result<SimulationHandle, SimulationError>
where
    O: GridObserver + Send + 'static,
{
    let scheduler = Scheduler::from_config(config, DeadlineTimer::default(), observer)?;
    let (commands, rx) = mpsc::unbounded_channel();

    info!(rows = config.rows, cols = config.cols, "spawning simulation");
    tokio::spawn(run(scheduler, rx));

    Ok(SimulationHandle { commands })
}

async fn run<O: GridObserver>(
    mut scheduler: Scheduler<DeadlineTimer, O>,
    mut commands: mpsc::UnboundedReceiver<Envelope>,
) {
    scheduler.publish();

    loop {
        let pending = scheduler.timer().pending;

        tokio::select! {
            envelope = commands.recv() => {
                let Some(Envelope { request, reply }) = envelope else {
                    break;
                };
                let result = scheduler.handle(request);
                match reply {
                    Some(reply) => {
                        let _ = reply.send(result);
                    }
                    None => {
                        if let Err(err) = result {
                            warn!("request failed: {err}");
                        }
                    }
                }
            }
            token = due(pending) => {
                scheduler.timer_mut().fired();
                scheduler.tick(token);
            }
        }
    }

    scheduler.stop();
    info!(generation = scheduler.generation(), "simulation closed");
}

async fn due(pending: Option<(Instant, TickToken)>) -> TickToken {
    match pending {
        Some((deadline, token)) => {
            sleep_until(deadline).await;
            token
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GridError;

    fn frames(config: &SimulationConfig) -> (SimulationHandle, watch::Receiver<Frame>) {
        let empty = Grid::empty(config.rows, config.cols).unwrap();
        let (observer, rx) = FrameObserver::channel(Frame::new(empty));
        (spawn(config, observer).unwrap(), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn when_started_generations_follow_the_normal_cadence() {
        let (handle, rx) = frames(&SimulationConfig::default());
        handle.request(Request::LoadPattern("Blinker".into())).await.unwrap();
        handle.request(Request::Start).await.unwrap();

        tokio::time::sleep(Duration::from_millis(950)).await;
        assert_eq!(rx.borrow().generation, 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(rx.borrow().generation, 1);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(rx.borrow().generation, 3);
        assert_eq!(rx.borrow().state, RunState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn when_fast_the_cadence_is_ten_times_quicker() {
        let (handle, rx) = frames(&SimulationConfig::default());
        handle.request(Request::SetSpeed(Speed::Fast)).await.unwrap();
        handle.request(Request::Start).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1050)).await;
        assert_eq!(rx.borrow().generation, 10);
        assert_eq!(rx.borrow().speed, Speed::Fast);
    }

    #[tokio::test(start_paused = true)]
    async fn when_stopped_no_further_generations_happen() {
        let (handle, rx) = frames(&SimulationConfig::default());
        handle.request(Request::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle.request(Request::Stop).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(rx.borrow().generation, 1);
        assert_eq!(rx.borrow().state, RunState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn when_a_request_fails_the_error_is_returned() {
        let (handle, _rx) = frames(&SimulationConfig::default());

        assert_eq!(
            handle.request(Request::ToggleCell { row: 28, col: 0 }).await,
            Err(SimulationError::Grid(GridError::OutOfBounds(28, 0)))
        );
        assert!(handle.submit(Request::Randomize(3.0)).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn when_the_config_is_invalid_nothing_is_spawned() {
        let config = SimulationConfig {
            normal_delay_ms: 0,
            alive_probability: 7.0,
            ..SimulationConfig::default()
        };
        let (observer, rx) = FrameObserver::channel(Frame::new(Grid::empty(28, 28).unwrap()));

        let result = spawn(&config, observer);

        assert!(matches!(result, Err(SimulationError::InvalidConfig(_))));
        // The observer was dropped with the rejected scheduler.
        assert!(rx.has_changed().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn when_every_handle_is_dropped_the_simulation_ends() {
        let (handle, mut rx) = frames(&SimulationConfig::default());
        handle.request(Request::Start).await.unwrap();
        drop(handle);

        while rx.changed().await.is_ok() {}
        assert_eq!(rx.borrow().state, RunState::Stopped);
        assert_eq!(rx.borrow().generation, 0);
    }
}
