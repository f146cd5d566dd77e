/*
 * Boid Flocking Simulation - Module Definitions
 *
 * This file defines the module structure of the flocking core.
 * The core has no windowing or rendering dependencies; the viewer binary
 * drives a `Flock` and draws its snapshots.
 */

// Re-export key components for easier access
pub use boid::{Boid, Decision};
pub use debug::FlockStats;
pub use error::ConfigurationError;
pub use flock::{AgentView, Flock};
pub use params::{Bounds, FlockConfig, RuleWeights};
pub use rules::SteeringImpulses;
pub use vector::Vector2;
pub use vision::can_see;

// Define modules
pub mod boid;
pub mod debug;
pub mod error;
pub mod flock;
pub mod params;
pub mod rules;
pub mod vector;
pub mod vision;
