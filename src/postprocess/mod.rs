//! Boundary post-processing: simplification and smoothing.
//!
//! Both transforms apply to every outer ring and every hole of every region,
//! simplification first. Simplification is delegated to the clipping engine;
//! smoothing is corner-cutting subdivision done here.

use crate::clipper::ClippingEngine;
use crate::geometry::{CoverageMap, Region, Ring};
use crate::CoordF;
use log::warn;

/// Simplify `ring` within `tolerance`.
///
/// Refuses to degenerate: if the simplified ring has fewer than 3 vertices,
/// or the engine fails, the original ring is returned unchanged.
pub fn simplify_ring(engine: &dyn ClippingEngine, ring: &Ring, tolerance: CoordF) -> Ring {
    if ring.len() < 3 || tolerance <= 0.0 {
        return ring.clone();
    }

    match engine.simplify(ring, tolerance) {
        Ok(simplified) if simplified.len() >= 3 => simplified,
        Ok(_) => ring.clone(),
        Err(e) => {
            warn!("simplify failed, keeping original ring: {}", e);
            ring.clone()
        }
    }
}

/// Corner-cutting subdivision.
///
/// Each iteration replaces every edge `(p0, p1)` with `0.75 p0 + 0.25 p1` and
/// `0.25 p0 + 0.75 p1`, doubling the vertex count. Zero iterations, or a
/// ring with fewer than 3 vertices, returns the ring unchanged. Winding is
/// preserved.
pub fn smooth_ring(ring: &Ring, iterations: usize) -> Ring {
    if ring.len() < 3 || iterations == 0 {
        return ring.clone();
    }

    let mut result = ring.clone();
    for _ in 0..iterations {
        let mut smoothed = Ring::with_capacity(result.len() * 2);
        for (p0, p1) in result.edges() {
            smoothed.push(p0 * 0.75 + p1 * 0.25);
            smoothed.push(p0 * 0.25 + p1 * 0.75);
        }
        result = smoothed;
    }

    result
}

fn map_rings(map: &CoverageMap, f: impl Fn(&Ring) -> Ring) -> CoverageMap {
    map.iter()
        .map(|region| Region::with_holes(f(&region.outer), region.holes.iter().map(&f).collect()))
        .collect()
}

/// Simplify every ring of every region.
pub fn simplify_map(engine: &dyn ClippingEngine, map: &CoverageMap, tolerance: CoordF) -> CoverageMap {
    map_rings(map, |ring| simplify_ring(engine, ring, tolerance))
}

/// Smooth every ring of every region.
pub fn smooth_map(map: &CoverageMap, iterations: usize) -> CoverageMap {
    map_rings(map, |ring| smooth_ring(ring, iterations))
}

/// Simplify (if `tolerance > 0`) then smooth (if `iterations > 0`).
pub fn post_process(
    engine: &dyn ClippingEngine,
    map: CoverageMap,
    tolerance: CoordF,
    iterations: usize,
) -> CoverageMap {
    let mut map = map;
    if tolerance > 0.0 {
        map = simplify_map(engine, &map, tolerance);
    }
    if iterations > 0 {
        map = smooth_map(&map, iterations);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::GeoClipper;
    use crate::coverage::{generate_coverage, Sensor};
    use crate::geometry::Point;
    use crate::terrain::{TerrainModel, TerrainObstacle};
    use crate::Error;

    struct FailingEngine;

    impl ClippingEngine for FailingEngine {
        fn union(&self, _: &[Ring]) -> crate::Result<Vec<Ring>> {
            Err(Error::Clipping("unavailable".into()))
        }
        fn intersection(&self, _: &[Ring], _: &[Ring]) -> crate::Result<Vec<Ring>> {
            Err(Error::Clipping("unavailable".into()))
        }
        fn difference(&self, _: &[Ring], _: &[Ring]) -> crate::Result<Vec<Ring>> {
            Err(Error::Clipping("unavailable".into()))
        }
        fn xor(&self, _: &[Ring], _: &[Ring]) -> crate::Result<Vec<Ring>> {
            Err(Error::Clipping("unavailable".into()))
        }
        fn offset(
            &self,
            _: &[Ring],
            _: CoordF,
            _: crate::clipper::OffsetJoinType,
        ) -> crate::Result<Vec<Ring>> {
            Err(Error::Clipping("unavailable".into()))
        }
        fn simplify(&self, _: &Ring, _: CoordF) -> crate::Result<Ring> {
            Err(Error::Clipping("unavailable".into()))
        }
    }

    fn square() -> Ring {
        Ring::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0))
    }

    #[test]
    fn test_smooth_zero_iterations_is_identity() {
        let ring = Ring::circle(Point::zero(), 5.0, 7);
        assert_eq!(smooth_ring(&ring, 0), ring);
    }

    #[test]
    fn test_smooth_doubles_vertices() {
        let ring = square();
        assert_eq!(smooth_ring(&ring, 1).len(), 8);
        assert_eq!(smooth_ring(&ring, 3).len(), 32);
    }

    #[test]
    fn test_smooth_cuts_corners() {
        let smoothed = smooth_ring(&square(), 1);
        assert_eq!(smoothed[0], Point::new(2.5, 0.0));
        assert_eq!(smoothed[1], Point::new(7.5, 0.0));

        // Each corner loses a 2.5 x 2.5 right triangle
        assert!((smoothed.area() - (100.0 - 4.0 * 3.125)).abs() < 1e-9);
        assert!(smoothed.is_counter_clockwise());
    }

    #[test]
    fn test_smooth_preserves_hole_winding() {
        let hole = square().reversed();
        assert!(smooth_ring(&hole, 2).is_clockwise());
    }

    #[test]
    fn test_smooth_degenerate_unchanged() {
        let line = Ring::from_points(vec![Point::zero(), Point::new(1.0, 0.0)]);
        assert_eq!(smooth_ring(&line, 3), line);
    }

    #[test]
    fn test_simplify_refuses_degenerate_result() {
        // A sliver triangle collapses below 3 vertices at this tolerance.
        let engine = GeoClipper::new();
        let sliver = Ring::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 0.5),
        ]);

        assert_eq!(simplify_ring(&engine, &sliver, 5.0), sliver);
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let engine = GeoClipper::new();
        let ring = smooth_ring(&Ring::circle(Point::zero(), 100.0, 36), 2);

        let once = simplify_ring(&engine, &ring, 2.0);
        let twice = simplify_ring(&engine, &once, 2.0);
        assert!(once.len() < ring.len());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_simplify_keeps_dropped_vertices_within_tolerance() {
        let mut terrain = TerrainModel::new();
        terrain
            .add_obstacle(TerrainObstacle::new(Point::new(50.0, 0.0), 20.0, 20.0, 1000.0))
            .unwrap();
        let sensor = Sensor::new(1, Point::zero(), 10.0, 100.0);
        let ring = generate_coverage(&sensor, &terrain, 180);

        let engine = GeoClipper::new();
        let tolerance = 3.0;
        let simplified = simplify_ring(&engine, &ring, tolerance);
        assert!(simplified.len() < ring.len());

        for p in &ring {
            let nearest = simplified
                .edges()
                .map(|(a, b)| p.distance_to_segment(a, b))
                .fold(CoordF::INFINITY, CoordF::min);
            assert!(nearest <= tolerance + 1e-9, "{:?} is {} from the boundary", p, nearest);
        }
    }

    #[test]
    fn test_simplify_engine_failure_keeps_ring() {
        let ring = Ring::circle(Point::zero(), 100.0, 36);
        assert_eq!(simplify_ring(&FailingEngine, &ring, 2.0), ring);
    }

    #[test]
    fn test_post_process_touches_holes() {
        let engine = GeoClipper::new();
        let outer = Ring::rectangle(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let hole = Ring::rectangle(Point::new(40.0, 40.0), Point::new(60.0, 60.0)).reversed();
        let map = vec![Region::with_holes(outer, vec![hole])];

        let processed = post_process(&engine, map, 1.0, 1);
        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].outer.len(), 8);
        assert_eq!(processed[0].holes[0].len(), 8);
        assert!(processed[0].is_canonical());
    }

    #[test]
    fn test_post_process_noop() {
        let engine = GeoClipper::new();
        let map = vec![Region::new(Ring::circle(Point::zero(), 10.0, 16))];
        assert_eq!(post_process(&engine, map.clone(), 0.0, 0), map);
    }
}
