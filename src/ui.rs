/*
 * UI Module
 *
 * This module contains the egui tuning panel and the on-canvas debug text.
 * The panel edits a working copy of the flock configuration. Any edit (or
 * the Reset button) asks the app to rebuild the flock, since a running
 * flock never changes its configuration.
 */

use nannou_egui::{egui, Egui};

use flocking::params::VISION_RADIUS_FACTOR;
use flocking::{FlockConfig, FlockStats};

use crate::app::ViewerSettings;

// Show the panel and return whether the flock should be rebuilt
pub fn update_ui(
    egui: &mut Egui,
    config: &mut FlockConfig,
    settings: &mut ViewerSettings,
    stats: &FlockStats,
    fps: f32,
    last_error: Option<&str>,
) -> bool {
    let before = config.clone();
    let mut reset = false;

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                ui.add(
                    egui::Slider::new(&mut config.population_size, FlockConfig::population_range())
                        .text("Population"),
                );
                ui.add(
                    egui::Slider::new(&mut config.agent_size, FlockConfig::agent_size_range())
                        .text("Agent Size"),
                );
                let speed_range = config.initial_speed_range();
                ui.add(
                    egui::Slider::new(&mut config.initial_speed, speed_range)
                        .text("Initial Speed"),
                );

                if ui.button("Reset Flock").clicked() {
                    reset = true;
                }
            });

            ui.collapsing("Vision", |ui| {
                let mut custom_radius = config.vision_radius.is_some();
                ui.checkbox(&mut custom_radius, "Custom Vision Radius");

                if custom_radius {
                    let default_radius = config.agent_size * VISION_RADIUS_FACTOR;
                    let radius = config.vision_radius.get_or_insert(default_radius);
                    ui.add(
                        egui::Slider::new(radius, FlockConfig::vision_radius_range())
                            .text("Vision Radius"),
                    );
                } else {
                    config.vision_radius = None;
                    ui.label(format!("Vision Radius: {:.1}", config.vision_radius()));
                }

                ui.add(
                    egui::Slider::new(&mut config.vision_angle, FlockConfig::vision_angle_range())
                        .text("Blind Cone Half-Angle"),
                );
            });

            ui.collapsing("Flocking Behavior", |ui| {
                let weights = &mut config.weights;
                ui.add(
                    egui::Slider::new(&mut weights.separation, FlockConfig::weight_range())
                        .text("Separation Weight"),
                );
                ui.add(
                    egui::Slider::new(&mut weights.alignment, FlockConfig::weight_range())
                        .text("Alignment Weight"),
                );
                ui.add(
                    egui::Slider::new(&mut weights.cohesion, FlockConfig::weight_range())
                        .text("Cohesion Weight"),
                );
                ui.add(
                    egui::Slider::new(&mut weights.avoidance, FlockConfig::weight_range())
                        .text("Avoidance Weight"),
                );
            });

            ui.collapsing("Steering Limits", |ui| {
                ui.add(
                    egui::Slider::new(&mut config.max_impulse, FlockConfig::max_impulse_range())
                        .text("Max Impulse"),
                );
                let steering_range = config.max_steering_range();
                ui.add(
                    egui::Slider::new(&mut config.max_steering, steering_range)
                        .text("Max Steering"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut config.separation_coefficient,
                        FlockConfig::separation_coefficient_range(),
                    )
                    .text("Separation Coefficient"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut config.danger_coefficient,
                        FlockConfig::danger_coefficient_range(),
                    )
                    .text("Danger Coefficient"),
                );
                ui.add(
                    egui::Slider::new(&mut config.approach_factor, FlockConfig::approach_factor_range())
                        .text("Approach Factor"),
                );
            });

            ui.collapsing("Performance", |ui| {
                ui.checkbox(&mut config.parallel, "Parallel Decide Phase");
                ui.add(
                    egui::Slider::new(
                        &mut settings.ticks_per_second,
                        ViewerSettings::ticks_per_second_range(),
                    )
                    .text("Ticks per Second"),
                );

                ui.separator();

                ui.label(format!("FPS: {:.1}", fps));
                ui.label(format!("Tick: {}", stats.tick));
                ui.label(format!("Mean Speed: {:.2}", stats.mean_speed));
            });

            if let Some(error) = last_error {
                ui.colored_label(egui::Color32::RED, error);
            }

            ui.checkbox(&mut settings.show_debug, "Show Debug Info");
            ui.checkbox(&mut settings.paused, "Pause Simulation");
        });

    reset || *config != before
}

// Draw the stats panel in the top-right corner, clear of the controls window
pub fn draw_debug_info(
    draw: &nannou::Draw,
    stats: &FlockStats,
    fps: f32,
    population: usize,
    window_rect: nannou::geom::Rect,
) {
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 220.0;

    let lines = [
        format!("FPS: {:.1}", fps),
        format!("Tick: {}", stats.tick),
        format!("Boids: {}", population),
        format!("Replaced last tick: {}", stats.replaced_last_tick),
        format!("Replaced total: {}", stats.replaced_total),
        format!("Mean speed: {:.2}", stats.mean_speed),
    ];

    let panel_height = line_height * lines.len() as f32 + margin;
    draw.rect()
        .x_y(
            window_rect.right() - panel_width / 2.0,
            window_rect.top() - panel_height / 2.0,
        )
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width + margin;
    let text_y = window_rect.top() - margin;

    for (i, text) in lines.iter().enumerate() {
        draw.text(text)
            .x_y(text_x + 80.0, text_y - i as f32 * line_height)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
