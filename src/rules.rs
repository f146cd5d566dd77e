/*
 * Steering Rules Module
 *
 * The four rules each turn one boid's view of the flock into an impulse,
 * the velocity change that rule wants this tick:
 * - separation: push away from neighbors crowding closer than the sum of sizes
 * - alignment: turn towards the average velocity of visible neighbors
 * - cohesion: approach the average position of visible neighbors
 * - avoidance: approach safety points mirrored off visible edges and obstacles
 *
 * All directional reasoning stays in vector space. Angles appear only inside
 * the vision test, never in an average.
 *
 * Every rule reads the same unmodified state and does a single pass over its
 * inputs; the composer applies the weighted results afterwards.
 *
 * Separation and avoidance are capped only by the max impulse, so a crowded
 * or endangered boid can always brake and turn. Alignment and cohesion are
 * held to the gentler max steering cap.
 */

use crate::boid::Boid;
use crate::params::{Bounds, RuleWeights};
use crate::vector::Vector2;

// Raw per-rule impulses from one decide pass
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SteeringImpulses {
    pub separation: Vector2,
    pub alignment: Vector2,
    pub cohesion: Vector2,
    pub avoidance: Vector2,
}

impl SteeringImpulses {
    // Apply each impulse in turn, scaled by its weight, clamping the running
    // velocity to `max_impulse` after every application
    pub fn compose(&self, velocity: Vector2, weights: &RuleWeights, max_impulse: f64) -> Vector2 {
        [
            (self.separation, weights.separation),
            (self.alignment, weights.alignment),
            (self.cohesion, weights.cohesion),
            (self.avoidance, weights.avoidance),
        ]
        .into_iter()
        .fold(velocity, |velocity, (impulse, weight)| {
            (velocity + impulse * weight).limit(max_impulse)
        })
    }
}

pub fn steer(boid: &Boid, flock: &[Boid], bounds: &Bounds, obstacles: &[Vector2]) -> SteeringImpulses {
    SteeringImpulses {
        separation: separation(boid, flock),
        alignment: alignment(boid, flock),
        cohesion: cohesion(boid, flock),
        avoidance: avoidance(boid, bounds, obstacles),
    }
}

// Every other boid inside this boid's field of view
pub fn visible_neighbors<'a>(boid: &'a Boid, flock: &'a [Boid]) -> impl Iterator<Item = &'a Boid> + 'a {
    flock
        .iter()
        .filter(move |other| other.id() != boid.id() && boid.can_see(other.position()))
}

// Turn `average` into a desired velocity at the current speed, expressed as
// a change from the current velocity, capped at `cap`
fn steer_towards(boid: &Boid, average: Vector2, cap: f64) -> Vector2 {
    if average.is_zero() {
        return Vector2::ZERO;
    }
    let desired = average.with_length(boid.speed());
    (desired - boid.velocity()).limit(cap)
}

pub fn separation(boid: &Boid, flock: &[Boid]) -> Vector2 {
    let mut sum = Vector2::ZERO;
    let mut count = 0;

    for other in visible_neighbors(boid, flock) {
        let desired_separation = boid.size() + other.size() + boid.separation_coefficient();
        let away = boid.position() - other.position();

        if away.length() < desired_separation {
            // Coincident boids contribute no direction
            sum += away.normalize() * desired_separation;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2::ZERO;
    }
    steer_towards(boid, sum / count as f64, boid.max_impulse())
}

pub fn alignment(boid: &Boid, flock: &[Boid]) -> Vector2 {
    let mut sum = Vector2::ZERO;
    let mut count = 0;

    for other in visible_neighbors(boid, flock) {
        sum += other.velocity();
        count += 1;
    }

    if count == 0 {
        return Vector2::ZERO;
    }
    steer_towards(boid, sum / count as f64, boid.max_steering())
}

pub fn cohesion(boid: &Boid, flock: &[Boid]) -> Vector2 {
    let mut sum = Vector2::ZERO;
    let mut count = 0;

    for other in visible_neighbors(boid, flock) {
        sum += other.position();
        count += 1;
    }

    if count == 0 {
        return Vector2::ZERO;
    }
    point_impulse(boid, sum / count as f64).limit(boid.max_steering())
}

pub fn avoidance(boid: &Boid, bounds: &Bounds, obstacles: &[Vector2]) -> Vector2 {
    let position = boid.position();

    // Nearest point on each edge
    let edges = [
        Vector2::new(0.0, position.y),
        Vector2::new(bounds.width, position.y),
        Vector2::new(position.x, 0.0),
        Vector2::new(position.x, bounds.height),
    ];

    let mut sum = Vector2::ZERO;
    let mut count = 0;

    for &danger in edges.iter().chain(obstacles) {
        if boid.can_see(danger) {
            sum += safety_point(boid, danger);
            count += 1;
        }
    }

    if count == 0 {
        return Vector2::ZERO;
    }
    point_impulse(boid, sum / count as f64)
}

// The danger point mirrored through the boid, pushed out by the danger coefficient
pub fn safety_point(boid: &Boid, danger: Vector2) -> Vector2 {
    let position = boid.position();
    position + (position - danger) * boid.danger_coefficient()
}

// Impulse towards a single target point.
// Inside half the vision radius the boid has arrived and gets nothing; up to
// the approach radius the impulse ramps from zero to full speed so the boid
// eases in instead of overshooting; beyond that it heads straight for the
// target at its current speed.
pub fn point_impulse(boid: &Boid, target: Vector2) -> Vector2 {
    let offset = target - boid.position();
    let distance = offset.length();
    let arrival_radius = boid.vision_radius() / 2.0;
    let approach_radius = boid.approach_radius();

    if distance < arrival_radius {
        return Vector2::ZERO;
    }

    let speed = boid.speed();
    let impulse = if distance < approach_radius {
        let ramp = (distance - arrival_radius) / (approach_radius - arrival_radius);
        offset.with_length(speed * ramp)
    } else {
        offset.with_length(speed)
    };

    impulse.limit(boid.max_impulse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FlockConfig;

    const BOUNDS: Bounds = Bounds {
        width: 1000.0,
        height: 1000.0,
    };

    fn boid(id: u64, x: f64, y: f64, vx: f64, vy: f64) -> Boid {
        Boid::new(id, Vector2::new(x, y), Vector2::new(vx, vy), &FlockConfig::default())
    }

    fn boid_with(config: &FlockConfig, id: u64, x: f64, y: f64, vx: f64, vy: f64) -> Boid {
        Boid::new(id, Vector2::new(x, y), Vector2::new(vx, vy), config)
    }

    #[test]
    fn rules_are_zero_without_visible_neighbors() {
        let me = boid(0, 500.0, 500.0, 1.0, 0.0);
        // One behind (blind cone) and one out of range
        let flock = vec![
            me.clone(),
            boid(1, 495.0, 500.0, 1.0, 0.0),
            boid(2, 600.0, 500.0, -1.0, 0.0),
        ];
        assert_eq!(visible_neighbors(&me, &flock).count(), 0);
        assert_eq!(separation(&me, &flock), Vector2::ZERO);
        assert_eq!(alignment(&me, &flock), Vector2::ZERO);
        assert_eq!(cohesion(&me, &flock), Vector2::ZERO);
        assert_eq!(avoidance(&me, &BOUNDS, &[]), Vector2::ZERO);
    }

    #[test]
    fn separation_pushes_away_from_crowding_neighbor() {
        let me = boid(0, 500.0, 500.0, 0.0, 1.0);
        let flock = vec![me.clone(), boid(1, 505.0, 500.0, 0.0, 1.0)];
        let impulse = separation(&me, &flock);

        // desired (-1, 0) minus current (0, 1), not held to max steering
        assert_eq!(impulse, Vector2::new(-1.0, -1.0));
        assert!(impulse.length() > me.max_steering());
    }

    #[test]
    fn separation_brakes_head_on_approach() {
        let me = boid(0, 500.0, 500.0, 1.0, 0.0);
        let flock = vec![me.clone(), boid(1, 510.0, 500.0, -1.0, 0.0)];
        let impulse = separation(&me, &flock);

        // Full reversal: desired (-1, 0) minus current (1, 0)
        assert_eq!(impulse, Vector2::new(-2.0, 0.0));

        let config = FlockConfig {
            max_impulse: 1.5,
            initial_speed: 1.0,
            ..FlockConfig::default()
        };
        let me = boid_with(&config, 0, 500.0, 500.0, 1.0, 0.0);
        let flock = vec![me.clone(), boid_with(&config, 1, 510.0, 500.0, -1.0, 0.0)];
        assert!((separation(&me, &flock).length() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn separation_ignores_neighbors_beyond_summed_sizes() {
        // Threshold is 6 + 6 + 0 = 12
        let me = boid(0, 500.0, 500.0, 1.0, 0.0);
        let flock = vec![me.clone(), boid(1, 513.0, 500.0, 1.0, 0.0)];
        assert_eq!(separation(&me, &flock), Vector2::ZERO);

        let config = FlockConfig {
            separation_coefficient: 2.0,
            ..FlockConfig::default()
        };
        let me = boid_with(&config, 0, 500.0, 500.0, 1.0, 0.0);
        let flock = vec![me.clone(), boid_with(&config, 1, 513.0, 500.0, 1.0, 0.0)];
        assert!(separation(&me, &flock).x < 0.0);
    }

    #[test]
    fn separation_survives_coincident_neighbor() {
        let me = boid(0, 500.0, 500.0, 1.0, 0.0);
        let flock = vec![me.clone(), boid(1, 500.0, 500.0, 0.0, 1.0)];
        let impulse = separation(&me, &flock);
        assert!(impulse.x.is_finite() && impulse.y.is_finite());
        assert_eq!(impulse, Vector2::ZERO);
    }

    #[test]
    fn alignment_turns_towards_neighbor_heading() {
        let me = boid(0, 500.0, 500.0, 1.0, 0.0);
        let flock = vec![me.clone(), boid(1, 515.0, 505.0, 0.0, 2.0)];
        let impulse = alignment(&me, &flock);

        // desired (0, 1) minus current (1, 0), capped at max steering
        let expected = Vector2::new(-1.0, 1.0).with_length(0.1);
        assert!((impulse.x - expected.x).abs() < 1e-12);
        assert!((impulse.y - expected.y).abs() < 1e-12);
    }

    #[test]
    fn alignment_with_matching_heading_is_zero() {
        let me = boid(0, 500.0, 500.0, 1.0, 0.0);
        let flock = vec![me.clone(), boid(1, 515.0, 500.0, 3.0, 0.0)];
        assert_eq!(alignment(&me, &flock), Vector2::ZERO);
    }

    #[test]
    fn cohesion_waits_inside_arrival_radius() {
        // Arrival radius is half of 24
        let me = boid(0, 500.0, 500.0, 1.0, 0.0);
        let flock = vec![me.clone(), boid(1, 511.0, 500.0, 1.0, 0.0)];
        assert_eq!(cohesion(&me, &flock), Vector2::ZERO);
    }

    #[test]
    fn cohesion_heads_for_center_of_visible_neighbors() {
        let me = boid(0, 500.0, 500.0, 0.0, 1.0);
        let flock = vec![
            me.clone(),
            boid(1, 520.0, 510.0, 0.0, 1.0),
            boid(2, 520.0, 490.0, 0.0, 1.0),
        ];
        let impulse = cohesion(&me, &flock);
        assert!(impulse.x > 0.0);
        assert!(impulse.y.abs() < 1e-12);
    }

    #[test]
    fn point_impulse_ramps_between_arrival_and_approach() {
        let config = FlockConfig {
            vision_radius: Some(40.0),
            approach_factor: 1.5,
            ..FlockConfig::default()
        };
        let me = boid_with(&config, 0, 0.0, 0.0, 2.0, 0.0);

        assert_eq!(point_impulse(&me, Vector2::new(19.9, 0.0)), Vector2::ZERO);

        // Arrival at 20, approach at 60: 40 is halfway up the ramp
        let halfway = point_impulse(&me, Vector2::new(0.0, 40.0));
        assert!((halfway.length() - 1.0).abs() < 1e-12);
        assert!((halfway.y - 1.0).abs() < 1e-12);

        let far = point_impulse(&me, Vector2::new(-100.0, 0.0));
        assert!((far.x + 2.0).abs() < 1e-12);
    }

    #[test]
    fn avoidance_pushes_back_from_wall_ahead() {
        // Heading straight at the top edge, 15 units away
        let me = boid(0, 500.0, 15.0, 0.0, -2.0);
        let impulse = avoidance(&me, &BOUNDS, &[]);

        // Safety point (500, 45) sits 30 away, past the approach radius
        assert!(impulse.x.abs() < 1e-12);
        assert!((impulse.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn avoidance_ignores_wall_behind() {
        let me = boid(0, 500.0, 10.0, 0.0, 2.0);
        assert_eq!(avoidance(&me, &BOUNDS, &[]), Vector2::ZERO);
    }

    #[test]
    fn avoidance_steers_around_visible_obstacle() {
        let me = boid(0, 500.0, 500.0, 1.5, 0.0);
        let obstacles = [Vector2::new(510.0, 500.0)];
        let impulse = avoidance(&me, &BOUNDS, &obstacles);
        assert!(impulse.x < 0.0);

        assert_eq!(safety_point(&me, obstacles[0]), Vector2::new(480.0, 500.0));
    }

    #[test]
    fn compose_clamps_after_every_application() {
        let impulses = SteeringImpulses {
            separation: Vector2::new(10.0, 0.0),
            alignment: Vector2::ZERO,
            cohesion: Vector2::new(0.0, 10.0),
            avoidance: Vector2::ZERO,
        };
        let weights = RuleWeights::default();
        let velocity = impulses.compose(Vector2::new(1.0, 0.0), &weights, 5.0);

        // (11, 0) clamps to (5, 0) before cohesion adds (0, 10)
        let expected = Vector2::new(5.0, 10.0).limit(5.0);
        assert!((velocity.x - expected.x).abs() < 1e-12);
        assert!((velocity.y - expected.y).abs() < 1e-12);
        assert!(velocity.length() <= 5.0 + 1e-12);
    }

    #[test]
    fn compose_with_zero_impulses_keeps_velocity() {
        let velocity = Vector2::new(-0.3, 2.0);
        let composed = SteeringImpulses::default().compose(velocity, &RuleWeights::default(), 5.0);
        assert_eq!(composed, velocity);
    }
}
