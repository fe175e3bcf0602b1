//! Polygon boolean operations behind the [`ClippingEngine`] seam.
//!
//! The coverage pipeline never clips polygons itself. It hands rings to a
//! [`ClippingEngine`] and gets back a flat set of closed rings: outer
//! boundaries counter-clockwise (positive area), holes clockwise (negative
//! area). [`GeoClipper`] is the default engine, built on geo-clipper for
//! boolean and offset operations and on geo for Ramer-Douglas-Peucker
//! simplification.
//!
//! Unit tests of the classifier and orchestrator can swap in a stub engine.

use crate::classify::classify_rings;
use crate::geometry::{CoverageMap, Point, Ring, Rings};
use crate::{CoordF, Result};
use geo::{Coord as GeoCoord, LineString, MultiPolygon, Polygon as GeoPolygon, Simplify};
use geo_clipper::{Clipper, EndType, JoinType};

/// Default fixed-point factor for geo-clipper (three decimal places).
pub const DEFAULT_CLIPPER_SCALE: CoordF = 1000.0;

/// Join type for offset corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetJoinType {
    /// Square corners
    Square,
    /// Round corners
    #[default]
    Round,
    /// Mitered corners
    Miter,
}

impl From<OffsetJoinType> for JoinType {
    fn from(jt: OffsetJoinType) -> Self {
        match jt {
            OffsetJoinType::Square => JoinType::Square,
            OffsetJoinType::Round => JoinType::Round(0.25),
            OffsetJoinType::Miter => JoinType::Miter(2.0),
        }
    }
}

/// Polygon-boolean capability consumed by the coverage pipeline.
///
/// Inputs are simple rings of any winding. Outputs are flat ring sets,
/// outer boundaries counter-clockwise and holes clockwise, under the
/// non-zero fill rule.
pub trait ClippingEngine: Send + Sync {
    /// Union of all `rings`.
    fn union(&self, rings: &[Ring]) -> Result<Rings>;

    /// Area covered by both `subject` and `clip`.
    fn intersection(&self, subject: &[Ring], clip: &[Ring]) -> Result<Rings>;

    /// Area covered by `subject` but not by `clip`.
    fn difference(&self, subject: &[Ring], clip: &[Ring]) -> Result<Rings>;

    /// Area covered by exactly one of `subject` and `clip`.
    fn xor(&self, subject: &[Ring], clip: &[Ring]) -> Result<Rings>;

    /// Grow (positive `delta`) or shrink (negative `delta`) the rings.
    fn offset(&self, rings: &[Ring], delta: CoordF, join_type: OffsetJoinType) -> Result<Rings>;

    /// Reduce vertex count, keeping every kept vertex within `tolerance`
    /// of the original boundary.
    fn simplify(&self, ring: &Ring, tolerance: CoordF) -> Result<Ring>;
}

/// geo-clipper / geo backed engine.
#[derive(Debug, Clone, Copy)]
pub struct GeoClipper {
    scale: CoordF,
}

impl Default for GeoClipper {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoClipper {
    pub fn new() -> Self {
        Self {
            scale: DEFAULT_CLIPPER_SCALE,
        }
    }

    /// Engine with a custom fixed-point factor; coordinates are rounded to
    /// `1 / scale` inside geo-clipper.
    pub fn with_scale(scale: CoordF) -> Self {
        Self { scale }
    }

    #[inline]
    pub fn scale(&self) -> CoordF {
        self.scale
    }
}

impl ClippingEngine for GeoClipper {
    fn union(&self, rings: &[Ring]) -> Result<Rings> {
        let mut valid = counter_clockwise_rings(rings);
        match valid.len() {
            0 => Ok(Vec::new()),
            1 => Ok(valid),
            _ => {
                let first = valid.remove(0);
                let subject = ring_to_geo(&first);
                let clip = rings_to_geo_multi(&valid);
                Ok(geo_multi_to_rings(&subject.union(&clip, self.scale)))
            }
        }
    }

    fn intersection(&self, subject: &[Ring], clip: &[Ring]) -> Result<Rings> {
        let subject = counter_clockwise_rings(subject);
        let clip = counter_clockwise_rings(clip);
        if subject.is_empty() || clip.is_empty() {
            return Ok(Vec::new());
        }

        let result = rings_to_geo_multi(&subject).intersection(&rings_to_geo_multi(&clip), self.scale);
        Ok(geo_multi_to_rings(&result))
    }

    fn difference(&self, subject: &[Ring], clip: &[Ring]) -> Result<Rings> {
        let subject = counter_clockwise_rings(subject);
        let clip = counter_clockwise_rings(clip);
        if subject.is_empty() {
            return Ok(Vec::new());
        }
        if clip.is_empty() {
            return Ok(subject);
        }

        let result = rings_to_geo_multi(&subject).difference(&rings_to_geo_multi(&clip), self.scale);
        Ok(geo_multi_to_rings(&result))
    }

    fn xor(&self, subject: &[Ring], clip: &[Ring]) -> Result<Rings> {
        let subject = counter_clockwise_rings(subject);
        let clip = counter_clockwise_rings(clip);
        if subject.is_empty() {
            return Ok(clip);
        }
        if clip.is_empty() {
            return Ok(subject);
        }

        let result = rings_to_geo_multi(&subject).xor(&rings_to_geo_multi(&clip), self.scale);
        Ok(geo_multi_to_rings(&result))
    }

    fn offset(&self, rings: &[Ring], delta: CoordF, join_type: OffsetJoinType) -> Result<Rings> {
        let rings = counter_clockwise_rings(rings);
        if rings.is_empty() {
            return Ok(Vec::new());
        }

        let result = rings_to_geo_multi(&rings).offset(
            delta,
            join_type.into(),
            EndType::ClosedPolygon,
            self.scale,
        );
        Ok(geo_multi_to_rings(&result))
    }

    fn simplify(&self, ring: &Ring, tolerance: CoordF) -> Result<Ring> {
        if ring.len() < 3 || tolerance <= 0.0 {
            return Ok(ring.clone());
        }

        let simplified = closed_line_string(ring).simplify(&tolerance);
        Ok(open_ring(simplified.coords()))
    }
}

// ============================================================================
// Structured convenience operations
// ============================================================================

/// Union `rings` and classify the result into regions.
pub fn union_all(engine: &dyn ClippingEngine, rings: &[Ring]) -> Result<CoverageMap> {
    Ok(classify_rings(engine.union(rings)?))
}

/// Intersect two ring sets and classify the result into regions.
pub fn intersect(engine: &dyn ClippingEngine, a: &[Ring], b: &[Ring]) -> Result<CoverageMap> {
    Ok(classify_rings(engine.intersection(a, b)?))
}

/// Subtract `b` from `a` and classify the result into regions.
pub fn subtract(engine: &dyn ClippingEngine, a: &[Ring], b: &[Ring]) -> Result<CoverageMap> {
    Ok(classify_rings(engine.difference(a, b)?))
}

// ============================================================================
// Conversions
// ============================================================================

/// Drop degenerate rings and orient the rest counter-clockwise so that
/// overlapping inputs never cancel under the non-zero fill rule.
fn counter_clockwise_rings(rings: &[Ring]) -> Rings {
    rings
        .iter()
        .filter(|r| r.is_valid())
        .map(|r| {
            let mut r = r.clone();
            r.make_counter_clockwise();
            r
        })
        .collect()
}

/// Ring as a geo LineString with the closing coordinate repeated.
fn closed_line_string(ring: &Ring) -> LineString<f64> {
    let mut coords: Vec<GeoCoord<f64>> = ring
        .points()
        .iter()
        .map(|p| GeoCoord { x: p.x, y: p.y })
        .collect();

    if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(*first);
        }
    }

    LineString::new(coords)
}

fn ring_to_geo(ring: &Ring) -> GeoPolygon<f64> {
    GeoPolygon::new(closed_line_string(ring), vec![])
}

fn rings_to_geo_multi(rings: &[Ring]) -> MultiPolygon<f64> {
    MultiPolygon::new(rings.iter().map(ring_to_geo).collect())
}

/// Ring from geo coordinates, removing the closing duplicate if present.
fn open_ring<'a>(coords: impl Iterator<Item = &'a GeoCoord<f64>>) -> Ring {
    let mut points: Vec<Point> = coords.map(|c| Point::new(c.x, c.y)).collect();

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    Ring::from_points(points)
}

/// Flatten geo polygons into the engine's ring contract:
/// exteriors counter-clockwise, interiors clockwise.
fn geo_multi_to_rings(multi: &MultiPolygon<f64>) -> Rings {
    let mut rings = Vec::new();

    for poly in &multi.0 {
        let mut outer = open_ring(poly.exterior().coords());
        outer.make_counter_clockwise();
        rings.push(outer);

        for interior in poly.interiors() {
            let mut hole = open_ring(interior.coords());
            hole.make_clockwise();
            rings.push(hole);
        }
    }

    rings.retain(|r| r.is_valid());
    rings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: CoordF, y: CoordF, size: CoordF) -> Ring {
        Ring::rectangle(Point::new(x, y), Point::new(x + size, y + size))
    }

    fn total_signed_area(rings: &[Ring]) -> CoordF {
        rings.iter().map(|r| r.signed_area()).sum()
    }

    #[test]
    fn test_union_overlapping() {
        let engine = GeoClipper::new();
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 0.0, 10.0);

        let result = engine.union(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(result.len(), 1);

        let area = total_signed_area(&result);
        assert!((area - 150.0).abs() < 1e-6);
        assert!(area < a.area() + b.area());
        assert!(area > a.area().max(b.area()));
    }

    #[test]
    fn test_union_disjoint() {
        let engine = GeoClipper::new();
        let result = engine
            .union(&[square(0.0, 0.0, 10.0), square(20.0, 0.0, 10.0)])
            .unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.is_counter_clockwise()));
        assert!((total_signed_area(&result) - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_union_mixed_winding_does_not_cancel() {
        let engine = GeoClipper::new();
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 0.0, 10.0).reversed();

        let result = engine.union(&[a, b]).unwrap();
        assert!((total_signed_area(&result) - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_union_frame_has_hole() {
        // Four bars around an empty 10x10 center
        let engine = GeoClipper::new();
        let bars = vec![
            Ring::rectangle(Point::new(0.0, 0.0), Point::new(30.0, 10.0)),
            Ring::rectangle(Point::new(0.0, 20.0), Point::new(30.0, 30.0)),
            Ring::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 30.0)),
            Ring::rectangle(Point::new(20.0, 0.0), Point::new(30.0, 30.0)),
        ];

        let result = engine.union(&bars).unwrap();
        let outers: Vec<_> = result.iter().filter(|r| r.is_counter_clockwise()).collect();
        let holes: Vec<_> = result.iter().filter(|r| r.is_clockwise()).collect();

        assert_eq!(outers.len(), 1);
        assert_eq!(holes.len(), 1);
        assert!((holes[0].area() - 100.0).abs() < 1e-6);
        assert!((total_signed_area(&result) - 800.0).abs() < 1e-6);
    }

    #[test]
    fn test_union_single_and_empty() {
        let engine = GeoClipper::new();
        assert!(engine.union(&[]).unwrap().is_empty());

        let single = engine.union(&[square(0.0, 0.0, 10.0).reversed()]).unwrap();
        assert_eq!(single.len(), 1);
        assert!(single[0].is_counter_clockwise());
    }

    #[test]
    fn test_union_skips_degenerate_rings() {
        let engine = GeoClipper::new();
        let degenerate = Ring::from_points(vec![Point::new(1.0, 1.0); 4]);
        let result = engine.union(&[degenerate, square(0.0, 0.0, 10.0)]).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_intersection() {
        let engine = GeoClipper::new();
        let result = engine
            .intersection(&[square(0.0, 0.0, 10.0)], &[square(5.0, 0.0, 10.0)])
            .unwrap();
        assert!((total_signed_area(&result) - 50.0).abs() < 1e-6);

        let none = engine
            .intersection(&[square(0.0, 0.0, 10.0)], &[square(20.0, 0.0, 10.0)])
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_difference_creates_hole() {
        let engine = GeoClipper::new();
        let result = engine
            .difference(&[square(0.0, 0.0, 20.0)], &[square(5.0, 5.0, 10.0)])
            .unwrap();

        assert_eq!(result.len(), 2);
        assert!((total_signed_area(&result) - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_xor() {
        let engine = GeoClipper::new();
        let result = engine
            .xor(&[square(0.0, 0.0, 10.0)], &[square(5.0, 0.0, 10.0)])
            .unwrap();
        assert!((total_signed_area(&result) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_offset_grow_and_shrink() {
        let engine = GeoClipper::new();
        let base = square(0.0, 0.0, 20.0);

        let grown = engine.offset(&[base.clone()], 1.0, OffsetJoinType::Square).unwrap();
        assert!(total_signed_area(&grown) > base.area());

        let shrunk = engine.offset(&[base.clone()], -2.0, OffsetJoinType::Miter).unwrap();
        assert!((total_signed_area(&shrunk) - 256.0).abs() < 1e-3);

        let gone = engine.offset(&[square(0.0, 0.0, 2.0)], -2.0, OffsetJoinType::Round).unwrap();
        assert!(gone.is_empty());
    }

    #[test]
    fn test_simplify_removes_collinear_points() {
        let engine = GeoClipper::new();
        let ring = Ring::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.1),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);

        let simplified = engine.simplify(&ring, 1.0).unwrap();
        assert_eq!(simplified.len(), 4);
        assert!(simplified.is_counter_clockwise());

        let again = engine.simplify(&simplified, 1.0).unwrap();
        assert_eq!(again, simplified);
    }

    #[test]
    fn test_simplify_zero_tolerance_is_identity() {
        let engine = GeoClipper::new();
        let ring = Ring::circle(Point::zero(), 10.0, 12);
        assert_eq!(engine.simplify(&ring, 0.0).unwrap(), ring);
    }

    #[test]
    fn test_structured_helpers() {
        let engine = GeoClipper::new();
        let map = subtract(&engine, &[square(0.0, 0.0, 20.0)], &[square(5.0, 5.0, 10.0)]).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[0].hole_count(), 1);

        let map = union_all(&engine, &[square(0.0, 0.0, 10.0), square(20.0, 0.0, 10.0)]).unwrap();
        assert_eq!(map.len(), 2);

        let map = intersect(&engine, &[square(0.0, 0.0, 10.0)], &[square(5.0, 5.0, 10.0)]).unwrap();
        assert_eq!(map.len(), 1);
        assert!((map[0].area() - 25.0).abs() < 1e-6);
    }
}
