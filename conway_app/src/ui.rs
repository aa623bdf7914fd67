// ui.rs - Controls and grid painting for the Game of Life window
// Every button maps to one simulation Request; the grid shown is the latest published Frame.

use std::time::Duration;

use conway::{Frame, PATTERNS, Request, RunState, SimulationConfig, SimulationHandle, Speed};
use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};
use tokio::sync::watch;
use tracing::error;

pub struct GameOfLife {
    simulation: SimulationHandle,
    frames: watch::Receiver<Frame>,
    pub alive_probability: f64,
    pub live_color: Color32,
    pub dead_color: Color32,
    pub selected_pattern: usize,
}

impl GameOfLife {
    pub fn new(
        simulation: SimulationHandle,
        frames: watch::Receiver<Frame>,
        config: &SimulationConfig,
    ) -> Self {
        Self {
            simulation,
            frames,
            alive_probability: config.alive_probability,
            live_color: Color32::from_rgb(255, 192, 203),
            dead_color: Color32::from_rgb(40, 40, 40),
            selected_pattern: 0,
        }
    }

    fn send(&self, request: Request) {
        if let Err(err) = self.simulation.submit(request) {
            error!("failed to send request: {err}");
        }
    }
}

impl eframe::App for GameOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let frame = self.frames.borrow().clone();
        let running = frame.state == RunState::Running;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life");

            // Controls
            ui.horizontal(|ui| {
                let button_text = if running { "⏸ Pause" } else { "▶ Start" };
                if ui.button(button_text).clicked() {
                    self.send(if running { Request::Stop } else { Request::Start });
                }

                if ui.button("⏭ Step").clicked() {
                    self.send(Request::Step);
                }

                if ui.button("⏹ Clear").clicked() {
                    self.send(Request::Clear);
                }

                if ui.button("🎲 Random").clicked() {
                    self.send(Request::Randomize(self.alive_probability));
                }

                ui.separator();

                let mut fast = frame.speed == Speed::Fast;
                if ui.checkbox(&mut fast, "10x Speed").changed() {
                    self.send(Request::SetSpeed(if fast { Speed::Fast } else { Speed::Normal }));
                }

                ui.separator();

                ui.label(format!("Generation: {}", frame.generation));
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Pattern:");
                egui::ComboBox::from_id_source("pattern_selector")
                    .selected_text(PATTERNS[self.selected_pattern].name)
                    .show_ui(ui, |ui| {
                        for (i, pattern) in PATTERNS.iter().enumerate() {
                            ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                        }
                    });

                if ui.button("Apply Pattern").clicked() {
                    let name = PATTERNS[self.selected_pattern].name.to_string();
                    self.send(Request::LoadPattern(name));
                }

                ui.separator();

                ui.label("Density:");
                ui.add(egui::Slider::new(&mut self.alive_probability, 0.0..=1.0));
            });

            ui.horizontal(|ui| {
                ui.label("Live:");
                ui.color_edit_button_srgba(&mut self.live_color);
                ui.label("Dead:");
                ui.color_edit_button_srgba(&mut self.dead_color);
            });

            ui.separator();

            ui.label(
                "Click cells to toggle them alive/dead. Use Start/Pause to run the simulation.",
            );

            ui.separator();

            let grid = &frame.grid;
            let box_size = 18.0;
            let spacing = 1.0;
            let pitch = box_size + spacing;

            let start_pos = ui.cursor().min;
            let total_size = Vec2::new(
                pitch * grid.cols() as f32 - spacing,
                pitch * grid.rows() as f32 - spacing,
            );

            let (response, painter) = ui.allocate_painter(total_size, egui::Sense::click());

            painter.rect_filled(
                Rect::from_min_size(start_pos, total_size),
                0.0,
                Color32::BLACK,
            );

            for (row, cells) in grid.iter_rows().enumerate() {
                for (col, cell) in cells.iter().enumerate() {
                    let x = start_pos.x + col as f32 * pitch;
                    let y = start_pos.y + row as f32 * pitch;
                    let rect = Rect::from_min_size(egui::pos2(x, y), Vec2::splat(box_size));

                    let cell_color = if cell.is_alive() {
                        self.live_color
                    } else {
                        self.dead_color
                    };

                    painter.rect_filled(rect, 1.0, cell_color);
                    painter.rect_stroke(rect, 1.0, Stroke::new(0.2, Color32::from_gray(60)));
                }
            }

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let offset = pos - start_pos;
                    let row = (offset.y / pitch) as usize;
                    let col = (offset.x / pitch) as usize;
                    self.send(Request::ToggleCell { row, col });
                }
            }

            ui.separator();

            let total = grid.rows() * grid.cols();
            let live_cells = grid.live_count();

            ui.horizontal(|ui| {
                ui.label(format!("Live cells: {}", live_cells));
                ui.label(format!("Dead cells: {}", total - live_cells));
                ui.label(format!(
                    "Population: {:.1}%",
                    (live_cells as f32 / total as f32) * 100.0
                ));
            });
        });

        // Frames arrive from the simulation task, keep polling for them
        if running {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
