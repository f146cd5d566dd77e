/*
 * Boid Flocking Viewer
 *
 * Opens a window the size of the simulated environment and drives a flock
 * at a fixed tick rate. A side panel edits the flock configuration; any
 * change rebuilds the flock from scratch.
 *
 * Usage: flocking [config.json]
 * The optional JSON document may set any subset of the configuration fields.
 * Set RUST_LOG (for example RUST_LOG=flocking=debug) to see simulation events.
 */

mod app;
mod renderer;
mod ui;

fn main() {
    init_tracing();
    nannou::app(app::model).update(app::update).run();
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
