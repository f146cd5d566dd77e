/*
 * Simulation Parameters Module
 *
 * This module defines the configuration a flock is built from: population,
 * agent size, vision, rule weights and the tunable steering constants.
 * A configuration is fixed once a flock exists; changing a parameter means
 * building a new flock. Every field has a default, and a partial serialized
 * document fills the rest from those defaults.
 */

use std::f64::consts::{FRAC_PI_4, PI};

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::vector::Vector2;

// Vision radius as a multiple of agent size when none is given
pub const VISION_RADIUS_FACTOR: f64 = 4.0;

// Agent size scaled to an environment: its shorter side over this
pub const AGENT_SIZE_DIVISOR: f64 = 150.0;

// Environment extent; the playable area is [0, width] x [0, height]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn scaled_agent_size(&self) -> f64 {
        self.width.min(self.height) / AGENT_SIZE_DIVISOR
    }

    pub fn contains(&self, point: Vector2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        positive("bounds width", self.width)?;
        positive("bounds height", self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleWeights {
    pub separation: f64,
    pub alignment: f64,
    pub cohesion: f64,
    pub avoidance: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            separation: 1.0,
            alignment: 1.4,
            cohesion: 1.0,
            avoidance: 1.7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    pub population_size: usize,
    pub agent_size: f64,
    // Cap on velocity magnitude and on every impulse
    pub max_impulse: f64,
    // Cap on alignment and cohesion impulses before weighting
    pub max_steering: f64,
    // Half-angle of the rear blind cone, in radians
    pub vision_angle: f64,
    // Defaults to VISION_RADIUS_FACTOR * agent_size
    pub vision_radius: Option<f64>,
    pub weights: RuleWeights,
    // Extra clearance added to the summed sizes of two boids
    pub separation_coefficient: f64,
    // How far past a plain reflection a boundary pushes a boid
    pub danger_coefficient: f64,
    // Outer edge of the point-impulse ramp, as a multiple of vision radius
    pub approach_factor: f64,
    pub initial_speed: f64,
    pub obstacles: Vec<Vector2>,
    // Compute decisions on the rayon pool
    pub parallel: bool,
    pub seed: Option<u64>,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            population_size: 5,
            agent_size: 6.0,
            max_impulse: 5.0,
            max_steering: 0.1,
            vision_angle: FRAC_PI_4,
            vision_radius: None,
            weights: RuleWeights::default(),
            separation_coefficient: 0.0,
            danger_coefficient: 2.0,
            approach_factor: 1.0,
            initial_speed: 1.0,
            obstacles: Vec::new(),
            parallel: true,
            seed: None,
        }
    }
}

impl FlockConfig {
    pub fn vision_radius(&self) -> f64 {
        self.vision_radius
            .unwrap_or(self.agent_size * VISION_RADIUS_FACTOR)
    }

    pub fn approach_radius(&self) -> f64 {
        self.vision_radius() * self.approach_factor
    }

    // Reject any configuration a flock cannot run with
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.population_size == 0 {
            return Err(ConfigurationError::EmptyPopulation);
        }
        self.validate_agent()
    }

    // Everything except the population size, which explicit placements override
    pub(crate) fn validate_agent(&self) -> Result<(), ConfigurationError> {
        positive("agent size", self.agent_size)?;
        positive("vision radius", self.vision_radius())?;
        positive("max impulse", self.max_impulse)?;
        positive("max steering", self.max_steering)?;
        positive("initial speed", self.initial_speed)?;

        if !(self.vision_angle > 0.0 && self.vision_angle < PI) {
            return Err(ConfigurationError::VisionAngleOutOfRange(self.vision_angle));
        }

        non_negative("separation weight", self.weights.separation)?;
        non_negative("alignment weight", self.weights.alignment)?;
        non_negative("cohesion weight", self.weights.cohesion)?;
        non_negative("avoidance weight", self.weights.avoidance)?;
        non_negative("separation coefficient", self.separation_coefficient)?;

        if !(self.danger_coefficient >= 1.0 && self.danger_coefficient.is_finite()) {
            return Err(ConfigurationError::DangerCoefficientTooSmall(
                self.danger_coefficient,
            ));
        }
        if !(self.approach_factor >= 0.5 && self.approach_factor.is_finite()) {
            return Err(ConfigurationError::ApproachFactorTooSmall(self.approach_factor));
        }

        not_above_max_impulse("max steering", self.max_steering, self.max_impulse)?;
        not_above_max_impulse("initial speed", self.initial_speed, self.max_impulse)?;

        if let Some(index) = self
            .obstacles
            .iter()
            .position(|o| !(o.x.is_finite() && o.y.is_finite()))
        {
            return Err(ConfigurationError::NonFiniteObstacle { index });
        }

        Ok(())
    }

    // Ranges for the viewer's sliders
    pub fn population_range() -> std::ops::RangeInclusive<usize> {
        1..=2000
    }

    pub fn weight_range() -> std::ops::RangeInclusive<f64> {
        0.0..=3.0
    }

    pub fn max_impulse_range() -> std::ops::RangeInclusive<f64> {
        0.5..=20.0
    }

    // Neither may exceed the current max impulse
    pub fn max_steering_range(&self) -> std::ops::RangeInclusive<f64> {
        0.01..=self.max_impulse.min(2.0)
    }

    pub fn initial_speed_range(&self) -> std::ops::RangeInclusive<f64> {
        0.1..=self.max_impulse
    }

    pub fn vision_angle_range() -> std::ops::RangeInclusive<f64> {
        0.05..=(PI - 0.05)
    }

    pub fn agent_size_range() -> std::ops::RangeInclusive<f64> {
        1.0..=20.0
    }

    pub fn vision_radius_range() -> std::ops::RangeInclusive<f64> {
        4.0..=200.0
    }

    pub fn separation_coefficient_range() -> std::ops::RangeInclusive<f64> {
        0.0..=30.0
    }

    pub fn danger_coefficient_range() -> std::ops::RangeInclusive<f64> {
        1.0..=5.0
    }

    pub fn approach_factor_range() -> std::ops::RangeInclusive<f64> {
        0.5..=4.0
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::Negative { name, value })
    }
}

fn not_above_max_impulse(
    name: &'static str,
    value: f64,
    max_impulse: f64,
) -> Result<(), ConfigurationError> {
    if value <= max_impulse {
        Ok(())
    } else {
        Err(ConfigurationError::ExceedsMaxImpulse {
            name,
            value,
            max_impulse,
        })
    }
}
