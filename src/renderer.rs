/*
 * Renderer Module
 *
 * This module draws the flock snapshot, the environment bounds and any
 * obstacles. The simulation uses a y-down frame with the origin at the
 * top-left corner; nannou draws y-up around the window center, so every
 * point goes through `to_screen` and every heading is mirrored.
 *
 * The debug overlay follows the first boid: its vision radius, the edges of
 * its rear blind cone and the four impulses from the last decide phase.
 */

use nannou::prelude::*;
use std::f64::consts::PI;
use tracing::warn;

use flocking::{AgentView, Boid, Bounds, SteeringImpulses, Vector2};

use crate::app::Model;
use crate::ui;

// Impulses are drawn at this many pixels per unit, capped at ARROW_CAP units
const ARROW_SCALE: f64 = 100.0;
const ARROW_CAP: f64 = 0.5;
const OBSTACLE_RADIUS: f32 = 4.0;

fn to_screen(point: Vector2, bounds: Bounds) -> Point2 {
    pt2(
        (point.x - bounds.width / 2.0) as f32,
        (bounds.height / 2.0 - point.y) as f32,
    )
}

pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let bounds = model.flock.bounds();

    draw.rect()
        .xy(to_screen(Vector2::new(bounds.width / 2.0, bounds.height / 2.0), bounds))
        .w_h(bounds.width as f32, bounds.height as f32)
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.3, 0.3, 0.3, 1.0));

    for &obstacle in &model.flock.config().obstacles {
        draw.ellipse()
            .xy(to_screen(obstacle, bounds))
            .radius(OBSTACLE_RADIUS)
            .color(ORANGE);
    }

    for agent in model.flock.agents() {
        draw_agent(&draw, &agent, bounds);
    }

    if model.settings.show_debug {
        if let (Some(first), Some(impulses)) =
            (model.flock.boids().first(), model.flock.impulses().first())
        {
            draw_overlay(&draw, first, impulses, bounds);
        }
        ui::draw_debug_info(
            &draw,
            &model.flock.stats(),
            model.fps,
            model.flock.len(),
            app.window_rect(),
        );
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        warn!(error = ?err, "failed to draw the flock");
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        warn!(error = ?err, "failed to draw the controls");
    }
}

// A triangle pointing along the heading
fn draw_agent(draw: &Draw, agent: &AgentView, bounds: Bounds) {
    let size = agent.size as f32;
    let points = [
        pt2(size, 0.0),
        pt2(-size, size / 2.0),
        pt2(-size, -size / 2.0),
    ];

    draw.polygon()
        .color(rgb(220u8, 220, 220))
        .points(points)
        .xy(to_screen(agent.position.into(), bounds))
        .rotate(-agent.heading as f32);
}

fn draw_overlay(draw: &Draw, boid: &Boid, impulses: &SteeringImpulses, bounds: Bounds) {
    let position = boid.position();
    let center = to_screen(position, bounds);

    draw.ellipse()
        .xy(center)
        .radius(boid.vision_radius() as f32)
        .no_fill()
        .stroke(rgba(0.4, 0.4, 1.0, 0.8))
        .stroke_weight(1.0);

    // Blind cone edges, centered on the direction straight behind
    let behind = boid.heading() + PI;
    for side in [-1.0, 1.0] {
        let edge = Vector2::from_angle(behind + side * boid.vision_angle()) * boid.vision_radius();
        draw.line()
            .start(center)
            .end(to_screen(position + edge, bounds))
            .color(rgba(1.0, 0.3, 0.3, 0.8))
            .stroke_weight(1.0);
    }

    let arrows = [
        (impulses.separation, RED),
        (impulses.alignment, GREEN),
        (impulses.cohesion, BLUE),
        (impulses.avoidance, YELLOW),
    ];

    for (impulse, color) in arrows {
        if impulse.is_zero() {
            continue;
        }
        let tip = position + impulse.limit(ARROW_CAP) * ARROW_SCALE;
        draw.arrow()
            .start(center)
            .end(to_screen(tip, bounds))
            .color(color)
            .stroke_weight(2.0);
    }
}
