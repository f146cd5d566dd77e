/*
 * Boid Module
 *
 * This module defines the Boid struct and its decision step.
 * Each tick a boid looks at the rest of the flock through its vision model
 * and weighs four steering rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 * 4. Avoidance: Keep clear of the environment edges and obstacles
 *
 * Deciding never mutates anything; the flock commits every decision only
 * after all boids have decided.
 */

use std::f64::consts::TAU;

use rand::Rng;

use crate::params::{Bounds, FlockConfig, RuleWeights};
use crate::rules::{self, SteeringImpulses};
use crate::vector::Vector2;
use crate::vision;

#[derive(Clone, Debug)]
pub struct Boid {
    id: u64,
    position: Vector2,
    velocity: Vector2,
    size: f64,
    vision_radius: f64,
    vision_angle: f64,
    max_impulse: f64,
    max_steering: f64,
    weights: RuleWeights,
    separation_coefficient: f64,
    danger_coefficient: f64,
    approach_radius: f64,
}

// Outcome of one decide pass: the new velocity and the raw impulses behind it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub velocity: Vector2,
    pub impulses: SteeringImpulses,
}

impl Boid {
    pub fn new(id: u64, position: Vector2, velocity: Vector2, config: &FlockConfig) -> Self {
        Self {
            id,
            position,
            velocity: velocity.limit(config.max_impulse),
            size: config.agent_size,
            vision_radius: config.vision_radius(),
            vision_angle: config.vision_angle,
            max_impulse: config.max_impulse,
            max_steering: config.max_steering,
            weights: config.weights,
            separation_coefficient: config.separation_coefficient,
            danger_coefficient: config.danger_coefficient,
            approach_radius: config.approach_radius(),
        }
    }

    // Uniformly placed within bounds, heading in a uniformly random direction
    pub fn random<R: Rng + ?Sized>(
        id: u64,
        bounds: &Bounds,
        config: &FlockConfig,
        rng: &mut R,
    ) -> Self {
        let x = rng.gen_range(0.0..bounds.width);
        let y = rng.gen_range(0.0..bounds.height);
        let angle = rng.gen_range(0.0..TAU);
        let velocity = Vector2::from_angle(angle) * config.initial_speed;

        Self::new(id, Vector2::new(x, y), velocity, config)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    // Facing direction, derived from velocity only at the point of output
    pub fn heading(&self) -> f64 {
        self.velocity.heading()
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn vision_radius(&self) -> f64 {
        self.vision_radius
    }

    pub fn vision_angle(&self) -> f64 {
        self.vision_angle
    }

    pub fn max_impulse(&self) -> f64 {
        self.max_impulse
    }

    pub fn max_steering(&self) -> f64 {
        self.max_steering
    }

    pub fn weights(&self) -> &RuleWeights {
        &self.weights
    }

    pub fn separation_coefficient(&self) -> f64 {
        self.separation_coefficient
    }

    pub fn danger_coefficient(&self) -> f64 {
        self.danger_coefficient
    }

    pub fn approach_radius(&self) -> f64 {
        self.approach_radius
    }

    pub fn can_see(&self, target: Vector2) -> bool {
        vision::can_see(
            self.position,
            self.heading(),
            self.vision_radius,
            self.vision_angle,
            target,
        )
    }

    // Compute this tick's velocity from an unmodified view of the flock.
    // `flock` may contain this boid; it is skipped by id.
    pub fn decide(&self, flock: &[Boid], bounds: &Bounds, obstacles: &[Vector2]) -> Decision {
        let impulses = rules::steer(self, flock, bounds, obstacles);
        let velocity = impulses.compose(self.velocity, &self.weights, self.max_impulse);

        Decision { velocity, impulses }
    }

    // Decide and commit in one step. `flock` must be a snapshot separate from
    // this boid, so nothing it reads can change underneath it.
    pub fn apply_rules(
        &mut self,
        flock: &[Boid],
        bounds: &Bounds,
        obstacles: &[Vector2],
    ) -> SteeringImpulses {
        let decision = self.decide(flock, bounds, obstacles);
        self.commit(&decision);
        decision.impulses
    }

    pub(crate) fn commit(&mut self, decision: &Decision) {
        self.velocity = decision.velocity;
    }

    // Straight Euler step, one unit of time per tick
    pub fn update_position(&mut self) {
        self.position = self.position + self.velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> FlockConfig {
        FlockConfig::default()
    }

    #[test]
    fn construction_clamps_velocity_and_copies_constants() {
        let config = FlockConfig {
            vision_radius: Some(40.0),
            ..config()
        };
        let boid = Boid::new(3, Vector2::new(1.0, 2.0), Vector2::new(30.0, 40.0), &config);
        assert_eq!(boid.id(), 3);
        assert!((boid.speed() - config.max_impulse).abs() < 1e-12);
        assert_eq!(boid.vision_radius(), 40.0);
        assert_eq!(boid.approach_radius(), 40.0);
        assert_eq!(boid.size(), config.agent_size);
    }

    #[test]
    fn random_boids_start_inside_bounds_with_initial_speed() {
        let bounds = Bounds::new(300.0, 200.0);
        let config = config();
        let mut rng = StdRng::seed_from_u64(11);
        for id in 0..200 {
            let boid = Boid::random(id, &bounds, &config, &mut rng);
            assert!(bounds.contains(boid.position()));
            assert!((boid.speed() - config.initial_speed).abs() < 1e-12);
        }
    }

    #[test]
    fn lone_boid_keeps_its_velocity() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let mut boid = Boid::new(0, Vector2::new(500.0, 500.0), Vector2::new(0.6, -0.8), &config());
        let snapshot = vec![boid.clone()];
        let impulses = boid.apply_rules(&snapshot, &bounds, &[]);

        assert_eq!(impulses, SteeringImpulses::default());
        assert_eq!(boid.velocity(), Vector2::new(0.6, -0.8));
    }

    #[test]
    fn decide_does_not_mutate() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let config = config();
        let flock = vec![
            Boid::new(0, Vector2::new(500.0, 500.0), Vector2::new(1.0, 0.0), &config),
            Boid::new(1, Vector2::new(508.0, 500.0), Vector2::new(0.0, 1.0), &config),
        ];
        let decision = flock[0].decide(&flock, &bounds, &[]);

        assert_eq!(flock[0].velocity(), Vector2::new(1.0, 0.0));
        assert_ne!(decision.velocity, flock[0].velocity());
    }

    #[test]
    fn update_position_integrates_velocity() {
        let mut boid = Boid::new(0, Vector2::new(10.0, 10.0), Vector2::new(1.5, -0.5), &config());
        boid.update_position();
        boid.update_position();
        assert_eq!(boid.position(), Vector2::new(13.0, 9.0));
    }
}
