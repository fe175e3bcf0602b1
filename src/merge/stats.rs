//! Aggregate statistics over a coverage map.

use crate::geometry::CoverageMap;
use crate::CoordF;
use serde::{Deserialize, Serialize};

/// Summary numbers for a merged coverage map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageStats {
    /// Number of disjoint regions.
    pub region_count: usize,
    /// Number of blind spots across all regions.
    pub total_hole_count: usize,
    /// Covered area (outer areas minus hole areas).
    pub total_area: CoordF,
    /// Length of all boundaries, holes included.
    pub total_perimeter: CoordF,
}

impl CoverageStats {
    pub fn compute(map: &CoverageMap) -> Self {
        map.iter().fold(
            Self {
                region_count: map.len(),
                ..Self::default()
            },
            |mut stats, region| {
                stats.total_hole_count += region.hole_count();
                stats.total_area += region.area();
                stats.total_perimeter += region.perimeter();
                stats
            },
        )
    }
}
