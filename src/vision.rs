/*
 * Vision Module
 *
 * Decides whether a boid can perceive a point. A point is visible when it
 * lies within the vision radius and outside the rear blind cone, whose
 * half-angle is the boid's vision angle.
 *
 * Directions are compared through atan2(sin, cos) of the bearing difference,
 * which always yields the signed minimal angle in (-π, π]. Subtracting raw
 * angles would wrap around at ±π and skew every comparison near the back.
 */

use std::f64::consts::PI;

use crate::vector::Vector2;

// Signed minimal difference `a - b`, in (-π, π]
pub fn angle_between(a: f64, b: f64) -> f64 {
    let delta = a - b;
    delta.sin().atan2(delta.cos())
}

pub fn can_see(
    position: Vector2,
    heading: f64,
    vision_radius: f64,
    vision_angle: f64,
    target: Vector2,
) -> bool {
    let offset = target - position;
    let distance = offset.length();

    if distance > vision_radius {
        return false;
    }

    // Bearing is undefined for a coincident point
    if distance == 0.0 {
        return true;
    }

    let bearing = offset.heading();
    angle_between(bearing, heading).abs() <= PI - vision_angle
}
