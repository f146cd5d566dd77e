/*
 * Application Module
 *
 * This module defines the viewer model and its update loop.
 * The flock advances on a fixed timestep: frame time accumulates and is
 * spent in whole ticks, so the simulation speed does not depend on the
 * render rate. Pausing drops the accumulated time.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use std::time::Duration;
use tracing::{info, warn};

use flocking::{Bounds, Flock, FlockConfig};

use crate::renderer;
use crate::ui;

// Fraction of the monitor the window covers
const WINDOW_FRACTION: f32 = 0.8;
// Frame time beyond this is dropped instead of replayed as a burst of ticks
const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

// Viewer-only settings; none of these affect the flock itself
pub struct ViewerSettings {
    pub ticks_per_second: f32,
    pub paused: bool,
    pub show_debug: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            ticks_per_second: 60.0,
            paused: false,
            show_debug: false,
        }
    }
}

impl ViewerSettings {
    pub fn ticks_per_second_range() -> std::ops::RangeInclusive<f32> {
        1.0..=240.0
    }
}

pub struct Model {
    pub flock: Flock,
    // Working copy edited by the panel; applied by rebuilding the flock
    pub config: FlockConfig,
    pub settings: ViewerSettings,
    pub egui: Egui,
    pub last_error: Option<String>,
    pub fps: f32,
    // Cleared once the agent size comes from a file or the panel
    pub agent_size_follows_window: bool,
    accumulator: Duration,
}

pub fn model(app: &App) -> Model {
    let (window_width, window_height) = match app.primary_monitor() {
        Some(monitor) => {
            let size = monitor.size();
            (
                size.width as f32 * WINDOW_FRACTION,
                size.height as f32 * WINDOW_FRACTION,
            )
        }
        None => (1024.0, 768.0),
    };

    let window_id = app
        .new_window()
        .title("Boid Flocking Simulation")
        .size(window_width as u32, window_height as u32)
        .view(renderer::view)
        .resized(resized)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to build the main window");

    let window = app.window(window_id).expect("window was just created");
    let egui = Egui::from_window(&window);
    let (width, height) = window.inner_size_points();
    let bounds = Bounds::new(width as f64, height as f64);

    let loaded = std::env::args().nth(1).and_then(|path| load_config(&path));
    let mut agent_size_follows_window = loaded.is_none();
    let config = loaded.unwrap_or_else(|| window_config(bounds));

    let (flock, config) = match Flock::new(bounds, config.clone()) {
        Ok(flock) => (flock, config),
        Err(err) => {
            warn!(error = %err, "configuration rejected, starting with defaults");
            agent_size_follows_window = true;
            let fallback = window_config(bounds);
            let flock = Flock::new(bounds, fallback.clone())
                .expect("default configuration is valid");
            (flock, fallback)
        }
    };

    info!(
        population = flock.len(),
        width = bounds.width,
        height = bounds.height,
        "viewer started"
    );

    Model {
        flock,
        config,
        settings: ViewerSettings::default(),
        egui,
        last_error: None,
        fps: 0.0,
        agent_size_follows_window,
        accumulator: Duration::ZERO,
    }
}

// Defaults scaled to the window
fn window_config(bounds: Bounds) -> FlockConfig {
    FlockConfig {
        population_size: 150,
        agent_size: bounds.scaled_agent_size(),
        ..FlockConfig::default()
    }
}

fn load_config(path: &str) -> Option<FlockConfig> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path, error = %err, "could not read configuration file");
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(config) => {
            info!(path, "loaded configuration file");
            Some(config)
        }
        Err(err) => {
            warn!(path, error = %err, "could not parse configuration file");
            None
        }
    }
}

pub fn update(_app: &App, model: &mut Model, update: Update) {
    let since_last = update.since_last.as_secs_f32();
    if since_last > 0.0 {
        model.fps = 1.0 / since_last;
    }

    let agent_size = model.config.agent_size;
    let rebuild = ui::update_ui(
        &mut model.egui,
        &mut model.config,
        &mut model.settings,
        &model.flock.stats(),
        model.fps,
        model.last_error.as_deref(),
    );

    if model.config.agent_size != agent_size {
        model.agent_size_follows_window = false;
    }

    if rebuild {
        let bounds = model.flock.bounds();
        rebuild_flock(model, bounds);
    }

    if model.settings.paused {
        model.accumulator = Duration::ZERO;
        return;
    }

    model.accumulator += update.since_last.min(MAX_FRAME_TIME);
    let step = Duration::from_secs_f32(1.0 / model.settings.ticks_per_second);

    while model.accumulator >= step {
        model.flock.tick();
        model.accumulator -= step;
    }
}

// The working config is kept even when rejected, so the panel shows what failed
fn rebuild_flock(model: &mut Model, bounds: Bounds) {
    match Flock::new(bounds, model.config.clone()) {
        Ok(flock) => {
            info!(population = flock.len(), "flock rebuilt");
            model.flock = flock;
            model.last_error = None;
        }
        Err(err) => {
            warn!(error = %err, "configuration rejected, keeping the running flock");
            model.last_error = Some(err.to_string());
        }
    }
}

// The environment always matches the window, and so does a derived agent size
pub fn resized(_app: &App, model: &mut Model, size: Vec2) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let bounds = Bounds::new(size.x as f64, size.y as f64);
    if model.agent_size_follows_window {
        model.config.agent_size = bounds.scaled_agent_size();
    }
    rebuild_flock(model, bounds);
}

pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
