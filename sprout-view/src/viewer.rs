//! Interactive growing-plant viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`GrowingPlant`] and
//! implements [`eframe::App`] to drive it from the egui frame clock,
//! forward clicks as leaf taps, and paint the composed scene.

use eframe::App;
use glam::Vec2;
use rand::Rng;
use sprout_core::{
    Color, Config, DrawCommand, GrowingPlant, Seed, ThemeOptions,
    config::{
        DEFAULT_BASE_LEAF_RADIUS, DEFAULT_LEAF_COLORS, DEFAULT_MAX_LEAVES_PER_RING,
        DEFAULT_MIN_LEAVES_PER_RING, DEFAULT_RING_COUNT_FACTOR, DEFAULT_RING_SPACING,
    },
    interaction::Feedback,
    scene::{DEFAULT_HEIGHT, DEFAULT_WIDTH},
};

/// Seconds a tap acknowledgement ring stays on screen.
const FLASH_SECONDS: f64 = 0.2;

/// Editable copy of the leaf theme, applied by rebuilding the plant.
#[derive(Clone, Debug, PartialEq)]
struct ThemeDraft {
    base_leaf_radius: f32,
    max_leaves_per_ring: u32,
    min_leaves_per_ring: u32,
    ring_spacing: f32,
    ring_count_factor: u32,
}

impl Default for ThemeDraft {
    fn default() -> Self {
        Self {
            base_leaf_radius: DEFAULT_BASE_LEAF_RADIUS,
            max_leaves_per_ring: DEFAULT_MAX_LEAVES_PER_RING,
            min_leaves_per_ring: DEFAULT_MIN_LEAVES_PER_RING,
            ring_spacing: DEFAULT_RING_SPACING,
            ring_count_factor: DEFAULT_RING_COUNT_FACTOR,
        }
    }
}

impl ThemeDraft {
    fn to_options(&self) -> ThemeOptions {
        ThemeOptions {
            leaf_colors: DEFAULT_LEAF_COLORS.to_vec(),
            base_leaf_radius: Some(self.base_leaf_radius),
            max_leaves_per_ring: Some(self.max_leaves_per_ring),
            min_leaves_per_ring: Some(self.min_leaves_per_ring),
            ring_spacing: Some(self.ring_spacing),
            ring_count_factor: Some(self.ring_count_factor),
        }
    }
}

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions (progress, seed, theme, taps).
/// 2. Call [`GrowingPlant::tick`] with the egui clock.
/// 3. Paint the scene and any tap acknowledgement.
/// 4. Request another frame only while the plant or a flash needs one.
///
/// ### Fields
/// - `plant` - The plant being displayed.
/// - `cfg` - Tuning used whenever the plant is rebuilt.
/// - `theme` - Theme values edited in the side panel.
///
/// - `rng` - Random number generator used by the "Reseed" button.
///
/// - `seed` - Seed shown in the seed field.
/// - `progress` - Progress shown on the slider and sent to the plant.
/// - `zoom` - Zoom factor for canvas-to-screen mapping.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `last_tap` - Key of the most recently tapped leaf (for the status bar).
/// - `flash` - Canvas position and expiry time of the acknowledgement ring.
pub struct Viewer {
    plant: GrowingPlant,
    cfg: Config,
    theme: ThemeDraft,

    rng: rand::rngs::ThreadRng,

    seed: i64,
    progress: f64,
    zoom: f32,
    pan: egui::Vec2,

    last_tap: Option<String>,
    flash: Option<(Vec2, f64)>,
}

impl Viewer {
    /// Creates a viewer showing the default seed with no progress.
    ///
    /// ### Returns
    /// A fully-initialized [`Viewer`], or the error that prevented the
    /// plant from being built.
    pub fn new() -> sprout_core::Result<Self> {
        let cfg = Config::default();
        let theme = ThemeDraft::default();
        let seed = Seed::for_user(0);
        let plant = GrowingPlant::new(
            seed,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            Some(&theme.to_options()),
            cfg.clone(),
        )?;

        Ok(Self {
            plant,
            cfg,
            theme,
            rng: rand::rng(),
            seed: seed.0,
            progress: 0.0,
            zoom: 1.5,
            pan: egui::vec2(0.0, 0.0),
            last_tap: None,
            flash: None,
        })
    }

    /// Sends a new progress value to the plant.
    fn set_progress(&mut self, progress: f64) {
        self.progress = progress;
        self.plant.set_progress(progress);
    }

    /// Switches the plant to `seed`, keeping its growth.
    fn reseed(&mut self, seed: i64) {
        self.seed = seed;
        if let Err(err) = self.plant.reseed(Seed(seed)) {
            tracing::error!(%err, seed, "reseed failed");
        }
        self.last_tap = None;
        self.flash = None;
    }

    /// Rebuilds the plant with the edited theme and replays the current
    /// progress, so the new plant grows back in.
    fn apply_theme(&mut self) {
        match GrowingPlant::new(
            Seed(self.seed),
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            Some(&self.theme.to_options()),
            self.cfg.clone(),
        ) {
            Ok(plant) => {
                self.plant = plant;
                self.plant.set_progress(self.progress);
                self.last_tap = None;
                self.flash = None;
            }
            Err(err) => tracing::error!(%err, "theme rejected"),
        }
    }

    /// Advances the plant to `now` and collects tap acknowledgements.
    fn step_frame(&mut self, now: f64) {
        self.plant.tick(now);
        for feedback in self.plant.drain_feedback() {
            match feedback {
                Feedback::Haptic { leaf_key, at } => {
                    tracing::info!(leaf = %leaf_key, "leaf tapped");
                    self.last_tap = Some(leaf_key);
                    self.flash = Some((at, now + FLASH_SECONDS));
                }
            }
        }
        if self.flash.is_some_and(|(_, until)| now >= until) {
            self.flash = None;
        }
    }

    /// Canvas center in canvas coordinates.
    fn canvas_center(&self) -> Vec2 {
        let (w, h) = self.plant.size();
        Vec2::new(w, h) * 0.5
    }

    /// Converts a canvas position to screen-space.
    ///
    /// The canvas center is placed at the rect center, then scaled by
    /// `zoom` and offset by `pan`. Both spaces have y pointing down.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        let d = (p - self.canvas_center()) * self.zoom;
        egui::pos2(center.x + d.x + self.pan.x, center.y + d.y + self.pan.y)
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (p.y - center.y - self.pan.y) / self.zoom;
        self.canvas_center() + Vec2::new(x, y)
    }

    /// Helper to draw a labeled `u32` [`egui::DragValue`].
    fn labeled_drag_u32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (progress, seed, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let ceiling = self.cfg.progress_ceiling;
                let mut progress = self.progress;
                if ui
                    .add(egui::Slider::new(&mut progress, 0.0..=ceiling * 1.2).text("Progress"))
                    .changed()
                {
                    self.set_progress(progress);
                }

                if ui.button("+100").clicked() {
                    self.set_progress(self.progress + 100.0);
                }

                if ui.button("Reset progress").clicked() {
                    self.set_progress(0.0);
                }

                ui.separator();

                let mut seed = self.seed;
                if ui
                    .add(egui::DragValue::new(&mut seed).prefix("seed = "))
                    .changed()
                {
                    self.reseed(seed);
                }

                if ui.button("Reseed").clicked() {
                    let seed = self.rng.random_range(1..2_147_483_647);
                    self.reseed(seed);
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.25..=6.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (growth, scene counts, last tap).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        let scene = self.plant.scene();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("growth = {:.3}", scene.growth));
                ui.separator();
                ui.label(format!("strokes = {}", scene.stroke_count()));
                ui.label(format!("leaves = {}", scene.leaf_count()));
                ui.label(format!("bursts = {}", self.plant.bursts().len()));
                ui.separator();
                if let Some(key) = &self.last_tap {
                    ui.label(format!("last tap = {key}"));
                }
            });
        });
    }

    /// Builds the right-hand panel for theme parameters.
    fn ui_theme_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("theme_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Theme");

                ui.separator();
                ui.label("Leaves");
                Self::labeled_drag_f32(
                    ui,
                    "base_leaf_radius:",
                    &mut self.theme.base_leaf_radius,
                    1.0..=40.0,
                    0.2,
                );
                Self::labeled_drag_u32(
                    ui,
                    "min_leaves_per_ring:",
                    &mut self.theme.min_leaves_per_ring,
                    1..=32,
                    1.0,
                );
                Self::labeled_drag_u32(
                    ui,
                    "max_leaves_per_ring:",
                    &mut self.theme.max_leaves_per_ring,
                    1..=32,
                    1.0,
                );

                ui.separator();
                ui.label("Rings");
                Self::labeled_drag_f32(
                    ui,
                    "ring_spacing:",
                    &mut self.theme.ring_spacing,
                    1.0..=40.0,
                    0.2,
                );
                Self::labeled_drag_u32(
                    ui,
                    "ring_count_factor:",
                    &mut self.theme.ring_count_factor,
                    1..=4,
                    1.0,
                );

                ui.separator();
                if ui.button("Apply").clicked() {
                    self.apply_theme();
                }
                if ui.button("Reset theme to default").clicked() {
                    self.theme = ThemeDraft::default();
                    self.apply_theme();
                }
            });
    }

    /// Paints one scene command.
    fn paint_command(&self, painter: &egui::Painter, rect: egui::Rect, cmd: &DrawCommand) {
        match cmd {
            DrawCommand::Leaf {
                center,
                radius,
                color,
            }
            | DrawCommand::Particle {
                center,
                radius,
                color,
            } => {
                if *radius > 0.0 {
                    painter.circle_filled(
                        self.world_to_screen(*center, rect),
                        radius * self.zoom,
                        color32(*color),
                    );
                }
            }
            DrawCommand::Stroke {
                from,
                to,
                width,
                color,
            } => {
                painter.line_segment(
                    [
                        self.world_to_screen(*from, rect),
                        self.world_to_screen(*to, rect),
                    ],
                    egui::Stroke::new(width * self.zoom, color32(*color)),
                );
            }
        }
    }

    /// Builds the central panel where the plant is drawn and tapped.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Clicks become taps, resolved on this frame's tick.
            if response.clicked()
                && let Some(pos) = response.interact_pointer_pos()
            {
                let world = self.screen_to_world(pos, rect);
                self.plant.enqueue_tap(world);
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.25, 6.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            let now = ctx.input(|i| i.time);
            self.step_frame(now);

            for cmd in &self.plant.scene().commands {
                self.paint_command(&painter, rect, cmd);
            }

            if let Some((at, _)) = self.flash {
                painter.circle_stroke(
                    self.world_to_screen(at, rect),
                    14.0 * self.zoom,
                    egui::Stroke::new(2.0, egui::Color32::WHITE),
                );
            }

            if self.plant.needs_frame() || self.flash.is_some() {
                ctx.request_repaint();
            }
        });
    }
}

fn color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_theme_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
