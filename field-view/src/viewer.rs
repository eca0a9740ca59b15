//! Interactive repellent-forces viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation and drives it:
//! it steps the [`FieldSimulator`] on a fixed cadence, forwards button and
//! parameter input to it, and samples its force field into an image.

use std::ops::RangeInclusive;
use std::time::Duration;

use eframe::App;
use field_core::{config::Config, error::FieldError, simulator::FieldSimulator};

use crate::field_image::field_to_color_image;

/// Cells per axis of the sampled field image.
pub const FIELD_RESOLUTION: usize = 100;

/// On-screen edge length of the field image, in points.
pub const DISPLAY_SIZE: f32 = 500.0;

/// Accepted range of the friction input.
pub const FRICTION_INPUT_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Accepted range of the wall and dot force inputs.
pub const FORCE_INPUT_RANGE: RangeInclusive<f64> = 0.0..=99.99;

/// Target time between automatic steps: 22 ticks per second.
pub const TICK_INTERVAL: f64 = (1000 / 22) as f64 / 1000.0;

/// Main application state for the viewer.
///
/// The typical per-frame update is:
/// 1. Handle button presses and parameter input.
/// 2. If `running` and at least `tick_interval` has passed, call [`Viewer::tick`].
/// 3. If anything changed, resample the field and upload it as a texture.
///
/// ### Fields
/// - `sim` - The simulation being driven.
/// - `rng` - Random source for adding and removing dots.
///
/// - `running` - Whether the simulation auto-advances.
/// - `tick_interval` - Target time between automatic steps (seconds).
/// - `last_tick_time` - egui time stamp of the last step.
/// - `last_tick_dt` - Measured interval between the last two steps (display only).
///
/// - `friction_input`, `wall_force_input`, `point_force_input` - Values in the
///   parameter inputs. They reach the simulator only when "Set" is pressed.
///
/// - `show_dots` - Overlay dot positions on the field image.
/// - `field_dirty` - The field image is stale and must be resampled.
/// - `texture` - Uploaded field image.
/// - `step_error` - Fault from the most recent step, if it failed.
/// - `sample_error` - Fault from the most recent field sampling, if it failed.
pub struct Viewer {
    sim: FieldSimulator,
    rng: rand::rngs::ThreadRng,

    running: bool,
    tick_interval: f64,
    last_tick_time: f64,
    last_tick_dt: f64,

    friction_input: f64,
    wall_force_input: f64,
    point_force_input: f64,

    show_dots: bool,
    field_dirty: bool,
    texture: Option<egui::TextureHandle>,
    step_error: Option<FieldError>,
    sample_error: Option<FieldError>,
}

impl Viewer {
    /// Creates a running viewer with no dots and the given parameters.
    pub fn new(cfg: Config) -> Self {
        Self {
            sim: FieldSimulator::new(cfg),
            rng: rand::rng(),
            running: true,
            tick_interval: TICK_INTERVAL,
            last_tick_time: 0.0,
            last_tick_dt: 0.0,
            friction_input: cfg.friction,
            wall_force_input: cfg.wall_force,
            point_force_input: cfg.point_force,
            show_dots: false,
            field_dirty: true,
            texture: None,
            step_error: None,
            sample_error: None,
        }
    }

    /// Advances the simulation by one step.
    ///
    /// A degenerate configuration (two coinciding dots) leaves the dots where
    /// they are; the fault is logged once and shown in the status bar until a
    /// step succeeds again.
    fn tick(&mut self) {
        match self.sim.step() {
            Ok(()) => self.step_error = None,
            Err(err) => Self::report(&mut self.step_error, err),
        }
        self.field_dirty = true;
    }

    /// Records `err` in `slot`, logging it only when it differs from the
    /// fault already held there.
    ///
    /// Step and sampling faults use separate slots, so a success on one path
    /// never makes a persisting fault on the other look new.
    fn report(slot: &mut Option<FieldError>, err: FieldError) {
        if *slot != Some(err) {
            log::warn!("{}", err);
        }
        *slot = Some(err);
    }

    fn add_dot(&mut self) {
        let id = self.sim.add_point(&mut self.rng);
        log::info!("added dot {} ({} total)", id, self.sim.len());
        self.field_dirty = true;
    }

    fn remove_dot(&mut self) {
        if self.sim.remove_random_point(&mut self.rng).is_some() {
            log::info!("removed a dot ({} left)", self.sim.len());
            self.field_dirty = true;
        }
    }

    fn remove_offscreen_dots(&mut self) {
        let removed = self.sim.remove_out_of_bounds_points();
        log::info!("removed {} offscreen dots", removed);
        self.field_dirty = true;
    }

    fn clear(&mut self) {
        self.sim.clear();
        self.step_error = None;
        self.sample_error = None;
        self.field_dirty = true;
    }

    fn apply_friction(&mut self) {
        log::info!("friction = {}", self.friction_input);
        self.sim.set_friction(self.friction_input);
    }

    fn apply_wall_force(&mut self) {
        log::info!("wall force = {}", self.wall_force_input);
        self.sim.set_wall_force(self.wall_force_input);
        self.field_dirty = true;
    }

    fn apply_point_force(&mut self) {
        log::info!("dot force = {}", self.point_force_input);
        self.sim.set_point_force(self.point_force_input);
        self.field_dirty = true;
    }

    /// Samples the field over the display grid.
    ///
    /// ### Returns
    /// `None` if a sample location hit a dot exactly; the previous image is
    /// kept in that case.
    fn render_field(&mut self) -> Option<egui::ColorImage> {
        match self.sim.sample_grid(FIELD_RESOLUTION) {
            Ok(grid) => {
                self.sample_error = None;
                Some(field_to_color_image(&grid))
            }
            Err(err) => {
                Self::report(&mut self.sample_error, err);
                None
            }
        }
    }

    /// Resamples the field if needed and uploads it to the GPU.
    ///
    /// Linear filtering gives the bilinear upscale from
    /// [`FIELD_RESOLUTION`] to [`DISPLAY_SIZE`].
    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.field_dirty && self.texture.is_some() {
            return;
        }
        self.field_dirty = false;

        let Some(image) = self.render_field() else {
            return;
        };
        if let Some(texture) = &mut self.texture {
            texture.set(image, egui::TextureOptions::LINEAR);
        } else {
            self.texture =
                Some(ctx.load_texture("force_field", image, egui::TextureOptions::LINEAR));
        }
    }

    /// Helper to draw a labeled `f64` [`egui::DragValue`] with a "Set" button.
    ///
    /// ### Returns
    /// `true` if the button was clicked.
    fn labeled_setter(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f64,
        range: RangeInclusive<f64>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
            ui.button("Set").clicked()
        })
        .inner
    }

    /// Builds the top panel (run controls and dot management).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.tick();
                }

                ui.separator();

                if ui.button("Add Dot").clicked() {
                    self.add_dot();
                }
                if ui.button("Remove Random Dot").clicked() {
                    self.remove_dot();
                }
                if ui.button("Remove Offscreen Dots").clicked() {
                    self.remove_offscreen_dots();
                }
                if ui.button("Clear").clicked() {
                    self.clear();
                }

                ui.separator();
                ui.checkbox(&mut self.show_dots, "Show dots");
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("tick last = {:.3} s", self.last_tick_dt));
                ui.separator();
                ui.label(format!("dots = {}", self.sim.len()));
                for err in self.step_error.iter().chain(self.sample_error.iter()) {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err.to_string());
                }
            });
        });
    }

    /// Builds the right-hand panel with the three simulation parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Parameters");

                ui.separator();
                if Self::labeled_setter(
                    ui,
                    "Dot Friction",
                    &mut self.friction_input,
                    FRICTION_INPUT_RANGE,
                    0.01,
                ) {
                    self.apply_friction();
                }
                if Self::labeled_setter(
                    ui,
                    "Repellent force of wall",
                    &mut self.wall_force_input,
                    FORCE_INPUT_RANGE,
                    0.1,
                ) {
                    self.apply_wall_force();
                }
                if Self::labeled_setter(
                    ui,
                    "Repellent force of dots",
                    &mut self.point_force_input,
                    FORCE_INPUT_RANGE,
                    0.1,
                ) {
                    self.apply_point_force();
                }

                ui.separator();
                let cfg = self.sim.config();
                ui.label(format!("active friction = {}", cfg.friction));
                ui.label(format!("active wall force = {}", cfg.wall_force));
                ui.label(format!("active dot force = {}", cfg.point_force));
            });
    }

    /// Builds the central panel holding the field image.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        // Auto-run simulation if requested.
        if self.running {
            let now = ctx.input(|i| i.time);
            let elapsed = now - self.last_tick_time;
            if elapsed >= self.tick_interval {
                if self.last_tick_time > 0.0 {
                    self.last_tick_dt = elapsed;
                }
                self.tick();
                self.last_tick_time = now;
            }
            ctx.request_repaint_after(Duration::from_secs_f64(self.tick_interval));
        }

        self.refresh_texture(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(texture) = &self.texture else {
                return;
            };
            let response = ui.add(
                egui::Image::new(texture)
                    .fit_to_exact_size(egui::vec2(DISPLAY_SIZE, DISPLAY_SIZE)),
            );

            if self.show_dots {
                let rect = response.rect;
                let painter = ui.painter_at(rect);
                for p in self.sim.points() {
                    let screen = egui::pos2(
                        rect.min.x + p.pos.x as f32 * rect.width(),
                        rect.min.y + p.pos.y as f32 * rect.height(),
                    );
                    painter.circle_filled(screen, 3.0, egui::Color32::WHITE);
                }
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
