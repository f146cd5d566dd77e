/*
 * Vector Module
 *
 * A small 2D value type used for positions, velocities and impulses.
 * Every operation returns a new vector; operands are never mutated.
 * Normalizing or limiting the zero vector yields the zero vector.
 */

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    // Unit vector pointing along `angle` (radians from the positive x-axis)
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Vector2) -> f64 {
        (other - *self).length()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    // Same direction with length 1, or zero for the zero vector
    pub fn normalize(&self) -> Self {
        let length = self.length();
        if length == 0.0 {
            Self::ZERO
        } else {
            Self::new(self.x / length, self.y / length)
        }
    }

    // Same direction scaled to `length`
    pub fn with_length(&self, length: f64) -> Self {
        self.normalize() * length
    }

    // Clamp the magnitude to `max`, keeping the direction
    pub fn limit(&self, max: f64) -> Self {
        let length = self.length();
        if length > max && length > 0.0 {
            *self * (max / length)
        } else {
            *self
        }
    }

    // Angle of the vector in (-π, π]; zero for the zero vector
    pub fn heading(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, other: Vector2) {
        *self = *self + other;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, scalar: f64) -> Vector2 {
        Vector2::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f64> for Vector2 {
    type Output = Vector2;

    fn div(self, divisor: f64) -> Vector2 {
        Vector2::new(self.x / divisor, self.y / divisor)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vector2::new(x, y)
    }
}

impl From<Vector2> for (f64, f64) {
    fn from(v: Vector2) -> Self {
        (v.x, v.y)
    }
}
