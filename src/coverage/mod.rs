//! Per-sensor coverage polygon generation.
//!
//! A sensor's footprint is built by sampling the visible range at evenly
//! spaced bearings across its azimuth span and joining the resulting
//! vertices into a ring. Sector sensors close the ring through their own
//! position; omnidirectional sensors close it through the range samples alone.

use crate::geometry::{Point, Ring};
use crate::terrain::TerrainModel;
use crate::visibility::max_visible_range;
use crate::{CoordF, SensorId};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Default number of bearings sampled per sensor.
pub const DEFAULT_RAY_COUNT: usize = 72;

/// Spans within this many radians of a full turn count as omnidirectional.
const FULL_CIRCLE_TOLERANCE: CoordF = 0.01;

/// Sensor parameters in the planar frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    #[serde(default)]
    pub name: String,
    pub position: Point,
    /// Antenna height above local ground.
    pub antenna_height: CoordF,
    /// Maximum detection range.
    pub range: CoordF,
    /// Start of the azimuth span (radians, counter-clockwise from +x).
    #[serde(default)]
    pub azimuth_start: CoordF,
    /// End of the azimuth span; `start + 2π` is omnidirectional.
    #[serde(default = "full_circle")]
    pub azimuth_end: CoordF,
}

fn full_circle() -> CoordF {
    TAU
}

impl Sensor {
    /// Create an omnidirectional sensor.
    pub fn new(id: SensorId, position: Point, antenna_height: CoordF, range: CoordF) -> Self {
        Self {
            id,
            name: format!("Sensor {}", id),
            position,
            antenna_height,
            range,
            azimuth_start: 0.0,
            azimuth_end: TAU,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restrict the sensor to the sector `[start, end)`.
    pub fn with_azimuth(mut self, start: CoordF, end: CoordF) -> Self {
        self.azimuth_start = start;
        self.azimuth_end = end;
        self
    }

    #[inline]
    pub fn azimuth_span(&self) -> CoordF {
        self.azimuth_end - self.azimuth_start
    }

    /// Check if the span covers a full turn.
    #[inline]
    pub fn is_omnidirectional(&self) -> bool {
        (self.azimuth_span() - TAU).abs() < FULL_CIRCLE_TOLERANCE
    }

    /// Check if the sensor can produce a non-degenerate footprint.
    #[inline]
    pub fn has_valid_range(&self) -> bool {
        self.range.is_finite() && self.range > 0.0
    }
}

/// Coverage ring for a ground-level target (target height zero).
pub fn generate_coverage(sensor: &Sensor, terrain: &TerrainModel, ray_count: usize) -> Ring {
    generate_coverage_with_target(sensor, terrain, ray_count, 0.0)
}

/// Coverage ring for targets at `target_height`.
///
/// Bearings are `start + i * span / ray_count` for `i in 0..ray_count`, so a
/// full circle is tiled without a duplicate endpoint. A sector sensor gets its
/// own position appended as the closing vertex.
///
/// A sensor with non-positive range yields a degenerate ring (all vertices
/// at the sensor position); callers must drop it before boolean operations.
pub fn generate_coverage_with_target(
    sensor: &Sensor,
    terrain: &TerrainModel,
    ray_count: usize,
    target_height: CoordF,
) -> Ring {
    let omni = sensor.is_omnidirectional();
    let mut ring = Ring::with_capacity(ray_count + usize::from(!omni));

    if ray_count == 0 {
        return ring;
    }

    let step = sensor.azimuth_span() / ray_count as CoordF;

    for i in 0..ray_count {
        let bearing = sensor.azimuth_start + i as CoordF * step;
        let range = max_visible_range(
            terrain,
            sensor.position,
            sensor.antenna_height,
            bearing,
            sensor.range,
            target_height,
        );
        ring.push(Point::from_polar(sensor.position, bearing, range));
    }

    if !omni {
        ring.push(sensor.position);
    }

    ring
}
