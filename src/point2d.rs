use std::ops::{Add, Sub, Mul, Div};

/// A point (or vector) in viewport coordinates. Origin top-left, y grows downward.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Point2D { x, y }
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, other: Point2D) -> Point2D {
        Point2D { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, other: Point2D) -> Point2D {
        Point2D { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f32> for Point2D {
    type Output = Point2D;
    fn mul(self, scalar: f32) -> Point2D {
        Point2D { x: self.x * scalar, y: self.y * scalar }
    }
}

impl Div<f32> for Point2D {
    type Output = Point2D;
    fn div(self, scalar: f32) -> Point2D {
        Point2D { x: self.x / scalar, y: self.y / scalar }
    }
}

#[inline(always)]
pub fn dot2(a: Point2D, b: Point2D) -> f32 {
    a.x * b.x + a.y * b.y
}

#[inline(always)]
pub fn perp(vec: Point2D) -> Point2D {
    Point2D { x: vec.y, y: -vec.x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perp_is_orthogonal() {
        let v = Point2D::new(3.0, -7.5);
        assert_eq!(dot2(v, perp(v)), 0.0);
    }

    #[test]
    fn arithmetic() {
        let a = Point2D::new(1.0, 2.0);
        let b = Point2D::new(4.0, 8.0);
        assert_eq!(b - a, Point2D::new(3.0, 6.0));
        assert_eq!((a + b) * 2.0, Point2D::new(10.0, 20.0));
        assert_eq!(b / 4.0, Point2D::new(1.0, 2.0));
    }
}
