// main.rs - egui front end for the Game of Life simulation
// The simulation runs as a tokio task; this window only sends requests and draws frames.

use eframe::egui;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use conway::{Frame, FrameObserver, Grid, SimulationConfig};

mod ui;

use ui::GameOfLife;

/// Path of an optional JSON file with a `SimulationConfig`.
const CONFIG_ENV: &str = "CONWAY_CONFIG";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config();
    let runtime = tokio::runtime::Runtime::new()?;

    let initial = Frame::new(Grid::empty(config.rows, config.cols)?);
    let (observer, frames) = FrameObserver::channel(initial);
    let simulation = {
        let _enter = runtime.enter();
        conway::spawn(&config, observer)?
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([640.0, 820.0]),
        ..Default::default()
    };

    info!("Creating app...");
    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |_cc| Box::new(GameOfLife::new(simulation, frames, &config))),
    )?;

    Ok(())
}

fn load_config() -> SimulationConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return SimulationConfig::default();
    };
    SimulationConfig::load(&path).unwrap_or_else(|err| {
        warn!("{err}, falling back to defaults");
        SimulationConfig::default()
    })
}
