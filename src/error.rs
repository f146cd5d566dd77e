/*
 * Error Module
 *
 * The flock surfaces a single error kind: a configuration it refuses to
 * build from. Numerical degeneracies inside a tick are resolved by policy
 * (zero vectors, clamping, cull/replace) and never reach the caller.
 */

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("population size must be at least 1")]
    EmptyPopulation,

    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("vision angle must lie strictly between 0 and π, got {0}")]
    VisionAngleOutOfRange(f64),

    #[error("danger coefficient must be at least 1, got {0}")]
    DangerCoefficientTooSmall(f64),

    #[error("approach factor must be at least 0.5, got {0}")]
    ApproachFactorTooSmall(f64),

    #[error("{name} ({value}) exceeds max impulse ({max_impulse})")]
    ExceedsMaxImpulse {
        name: &'static str,
        value: f64,
        max_impulse: f64,
    },

    #[error("obstacle {index} has a non-finite coordinate")]
    NonFiniteObstacle { index: usize },
}
