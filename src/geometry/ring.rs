//! Ring type for closed boundaries.
//!
//! A ring is the ordered vertex list of a closed polygon. The closing edge
//! from the last point back to the first is implicit and never stored.
//! Positive signed area (shoelace formula) means counter-clockwise winding:
//! outer boundaries are counter-clockwise, holes clockwise.

use super::{BoundingBox, Point};
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, Index};

/// A closed polygon boundary defined by a sequence of points.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Create a new empty ring.
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a ring from a vector of points.
    #[inline]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Create a ring with the given capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consume the ring and return its points.
    #[inline]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the ring.
    #[inline]
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Iterate over the edges `(p[i], p[i+1])`, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        let count = if n < 2 { 0 } else { n };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Calculate the signed area of the ring.
    /// Positive for counter-clockwise (outer), negative for clockwise (hole).
    /// Uses the shoelace formula.
    pub fn signed_area(&self) -> CoordF {
        if self.points.len() < 3 {
            return 0.0;
        }

        let sum: CoordF = self.edges().map(|(a, b)| a.cross(&b)).sum();
        sum / 2.0
    }

    /// Calculate the unsigned area of the ring.
    #[inline]
    pub fn area(&self) -> CoordF {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Ensure the ring is counter-clockwise by reversing if necessary.
    pub fn make_counter_clockwise(&mut self) {
        if self.is_clockwise() {
            self.reverse();
        }
    }

    /// Ensure the ring is clockwise by reversing if necessary.
    pub fn make_clockwise(&mut self) {
        if self.is_counter_clockwise() {
            self.reverse();
        }
    }

    /// Reverse the winding of the ring.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Return a reversed copy of the ring.
    pub fn reversed(&self) -> Self {
        let mut result = self.clone();
        result.reverse();
        result
    }

    /// Calculate the perimeter (total edge length, closing edge included).
    pub fn perimeter(&self) -> CoordF {
        self.edges().map(|(a, b)| a.distance(&b)).sum()
    }

    /// Calculate the area centroid of the ring.
    /// Falls back to the vertex average for degenerate rings.
    pub fn centroid(&self) -> Point {
        if self.points.is_empty() {
            return Point::zero();
        }

        let area = self.signed_area();
        if area == 0.0 {
            let sum = self
                .points
                .iter()
                .fold(Point::zero(), |acc, p| acc + *p);
            return sum * (1.0 / self.points.len() as CoordF);
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        for (a, b) in self.edges() {
            let cross = a.cross(&b);
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }

        Point::new(cx / (6.0 * area), cy / (6.0 * area))
    }

    /// Get the bounding box of the ring.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Check if a point is inside the ring using the ray casting algorithm.
    ///
    /// Points exactly on the boundary are classified by whatever the
    /// crossing test yields there; callers must not rely on either answer.
    pub fn contains_point(&self, p: &Point) -> bool {
        if self.points.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = self.points.len() - 1;

        for i in 0..self.points.len() {
            let pi = &self.points[i];
            let pj = &self.points[j];

            if ((pi.y > p.y) != (pj.y > p.y))
                && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    /// Check if this ring is usable for boolean operations
    /// (at least 3 points and non-zero area).
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 3 && self.signed_area() != 0.0
    }

    /// Create an axis-aligned rectangle (counter-clockwise).
    pub fn rectangle(min: Point, max: Point) -> Self {
        Self::from_points(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ])
    }

    /// Create a counter-clockwise circle approximation with `segments` vertices.
    pub fn circle(center: Point, radius: CoordF, segments: usize) -> Self {
        if segments < 3 {
            return Self::new();
        }

        (0..segments)
            .map(|i| {
                let angle = 2.0 * std::f64::consts::PI * i as CoordF / segments as CoordF;
                Point::from_polar(center, angle, radius)
            })
            .collect()
    }
}

impl fmt::Debug for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ring({} points)", self.points.len())
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ring[")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "]")
    }
}

impl Deref for Ring {
    type Target = [Point];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl Index<usize> for Ring {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl FromIterator<Point> for Ring {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Ring {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ring {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl From<Vec<Point>> for Ring {
    fn from(points: Vec<Point>) -> Self {
        Self::from_points(points)
    }
}

/// Type alias for a collection of rings.
pub type Rings = Vec<Ring>;
