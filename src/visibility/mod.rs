//! Visible-range ray casting.
//!
//! For one sensor and one bearing, binary-search the largest range whose
//! sight line is unobstructed. The search assumes visibility is monotonic in
//! range along a fixed bearing: anything closer than a visible point is
//! itself visible. This holds for a single occluder but not for every terrain
//! (a far peak can be visible behind a valley that hides nearer ground), so
//! the result is an approximation of the true visibility boundary.

use crate::geometry::Point;
use crate::terrain::TerrainModel;
use crate::CoordF;

/// Search stops once the bracket is narrower than this fraction of the maximum range.
pub const RANGE_TOLERANCE: CoordF = 0.01;

/// Maximum unobstructed range along `bearing`, within 1% of `max_range`.
///
/// Returns the last range known to be visible, in `[0, max_range]`.
/// A non-positive or non-finite `max_range` yields `0.0`.
pub fn max_visible_range(
    terrain: &TerrainModel,
    origin: Point,
    height: CoordF,
    bearing: CoordF,
    max_range: CoordF,
    target_height: CoordF,
) -> CoordF {
    max_visible_range_with_tolerance(
        terrain,
        origin,
        height,
        bearing,
        max_range,
        target_height,
        RANGE_TOLERANCE,
    )
}

/// [`max_visible_range`] with an explicit tolerance fraction.
///
/// Smaller fractions give finer boundaries at the cost of more sight-line
/// tests (roughly `log2(1 / tolerance)` per bearing).
pub fn max_visible_range_with_tolerance(
    terrain: &TerrainModel,
    origin: Point,
    height: CoordF,
    bearing: CoordF,
    max_range: CoordF,
    target_height: CoordF,
    tolerance: CoordF,
) -> CoordF {
    if !(max_range.is_finite() && max_range > 0.0) || !(tolerance > 0.0) {
        return 0.0;
    }

    let epsilon = max_range * tolerance;
    let mut lo = 0.0;
    let mut hi = max_range;

    while hi - lo > epsilon {
        let mid = (lo + hi) / 2.0;
        // Bracket is down to adjacent floats
        if mid <= lo || mid >= hi {
            break;
        }
        let target = Point::from_polar(origin, bearing, mid);

        if terrain.is_blocked(origin, height, target, target_height) {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    lo
}
