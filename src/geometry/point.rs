//! 2D point type in the shared planar projection.

use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 2D point (or vector) with floating-point coordinates.
///
/// # Example
/// ```
/// use radar_coverage::Point;
///
/// let a = Point::new(3.0, 0.0);
/// let b = Point::new(0.0, 4.0);
/// assert_eq!((b - a).length(), 5.0);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: CoordF,
    pub y: CoordF,
}

impl Point {
    /// Create a new point with the given coordinates.
    #[inline]
    pub const fn new(x: CoordF, y: CoordF) -> Self {
        Self { x, y }
    }

    /// Create a point at the origin (0, 0).
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Point at `distance` from `origin` along `bearing`.
    ///
    /// Bearings are mathematical angles in radians: 0 points along +x and
    /// angles grow counter-clockwise.
    #[inline]
    pub fn from_polar(origin: Point, bearing: CoordF, distance: CoordF) -> Self {
        Self {
            x: origin.x + distance * bearing.cos(),
            y: origin.y + distance * bearing.sin(),
        }
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(&self, other: &Point) -> CoordF {
        self.x * other.x + self.y * other.y
    }

    /// 2D pseudo-cross product.
    /// Positive if `other` is counter-clockwise from `self`.
    #[inline]
    pub fn cross(&self, other: &Point) -> CoordF {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length_squared(&self) -> CoordF {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean length of this point as a vector.
    #[inline]
    pub fn length(&self) -> CoordF {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance_squared(&self, other: &Point) -> CoordF {
        (*other - *self).length_squared()
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> CoordF {
        self.distance_squared(other).sqrt()
    }

    /// Linear interpolation: `self * (1 - t) + other * t`.
    #[inline]
    pub fn lerp(&self, other: &Point, t: CoordF) -> Self {
        *self * (1.0 - t) + *other * t
    }

    /// Perpendicular distance from this point to the segment `a`-`b`.
    pub fn distance_to_segment(&self, a: Point, b: Point) -> CoordF {
        let ab = b - a;
        let len_sq = ab.length_squared();
        if len_sq == 0.0 {
            return self.distance(&a);
        }
        let t = ((*self - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
        self.distance(&(a + ab * t))
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Mul<CoordF> for Point {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: CoordF) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl From<(CoordF, CoordF)> for Point {
    #[inline]
    fn from((x, y): (CoordF, CoordF)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (CoordF, CoordF) {
    #[inline]
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}
