//! Region type: one outer boundary with zero or more holes.

use super::{BoundingBox, Point, Ring};
use crate::CoordF;
use serde::{Deserialize, Serialize};

/// A connected covered area: an outer ring plus interior blind spots.
///
/// The outer ring is counter-clockwise, holes are clockwise. Each hole lies
/// inside the outer ring and is disjoint from the other holes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// The outer boundary.
    pub outer: Ring,
    /// Blind spots inside the outer boundary.
    pub holes: Vec<Ring>,
}

impl Region {
    /// Create a region with only an outer boundary.
    #[inline]
    pub fn new(outer: Ring) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Create a region with an outer boundary and holes.
    #[inline]
    pub fn with_holes(outer: Ring, holes: Vec<Ring>) -> Self {
        Self { outer, holes }
    }

    #[inline]
    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    #[inline]
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    /// Covered area: outer area minus hole areas.
    pub fn area(&self) -> CoordF {
        let holes_area: CoordF = self.holes.iter().map(|h| h.area()).sum();
        self.outer.area() - holes_area
    }

    /// Total boundary length (outer plus all holes).
    pub fn perimeter(&self) -> CoordF {
        let holes_perim: CoordF = self.holes.iter().map(|h| h.perimeter()).sum();
        self.outer.perimeter() + holes_perim
    }

    /// Total number of vertices across outer and holes.
    pub fn vertex_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(|h| h.len()).sum::<usize>()
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.outer.bounding_box()
    }

    /// Check if a point is covered (inside the outer ring and not inside any hole).
    pub fn contains_point(&self, p: &Point) -> bool {
        self.outer.contains_point(p) && !self.holes.iter().any(|h| h.contains_point(p))
    }

    /// Check orientation conventions: outer counter-clockwise, holes clockwise.
    pub fn is_canonical(&self) -> bool {
        self.outer.is_counter_clockwise() && self.holes.iter().all(|h| h.is_clockwise())
    }
}

impl From<Ring> for Region {
    fn from(outer: Ring) -> Self {
        Self::new(outer)
    }
}

/// Possibly-disconnected coverage with possibly-nested blind spots.
pub type CoverageMap = Vec<Region>;
