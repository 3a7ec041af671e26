//! Spatial and common types

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A 2D vector in surface coordinates (y grows downward)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `degrees`, measured clockwise from +x
    pub fn from_degrees(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self {
            x: radians.cos(),
            y: radians.sin(),
        }
    }

    pub fn from_array(arr: [f64; 2]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
        }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// An axis-aligned rectangle given by its top-left corner and extent
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `size` x `size` square centered on `center`
    pub fn centered(center: Vec2, size: f64) -> Self {
        Self {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            width: size,
            height: size,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// An inclusive numeric range `[min, max]`.
///
/// A span whose bounds are equal is a constant. Bounds supplied out of order
/// are swapped on construction, so `min <= max` holds whenever both bounds
/// are comparable. NaN bounds are kept as given.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// A span that always yields `value`
    pub const fn constant(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

impl From<f64> for Span {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl From<(f64, f64)> for Span {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_from_degrees() {
        let right = Vec2::from_degrees(0.0);
        assert!((right.x - 1.0).abs() < 1e-9);
        assert!(right.y.abs() < 1e-9);

        let down = Vec2::from_degrees(90.0);
        assert!(down.x.abs() < 1e-9);
        assert!((down.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_vec2_ops() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);
        assert_eq!(b - a, Vec2::new(3.0, 4.0));
        assert_eq!(a + b, Vec2::new(5.0, 8.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_rect_centered() {
        let rect = Rect::centered(Vec2::new(10.0, 10.0), 4.0);
        assert_eq!(rect, Rect::new(8.0, 8.0, 4.0, 4.0));
        assert_eq!(rect.center(), Vec2::new(10.0, 10.0));
        assert!(rect.contains(Vec2::new(12.0, 8.0)));
        assert!(!rect.contains(Vec2::new(12.1, 8.0)));
    }

    #[test]
    fn test_span_swaps_reversed_bounds() {
        let span = Span::new(10.0, 2.0);
        assert_eq!(span.min, 2.0);
        assert_eq!(span.max, 10.0);
    }

    #[test]
    fn test_span_constant() {
        let span = Span::from(5.0);
        assert_eq!(span.width(), 0.0);
        assert_eq!(span.midpoint(), 5.0);
        assert!(span.contains(5.0));
    }
}
