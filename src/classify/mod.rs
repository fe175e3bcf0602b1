//! Classification of raw union output into regions.
//!
//! A clipping engine returns a flat list of rings. Positive signed area marks
//! an outer boundary, negative a hole, zero a degenerate ring. Each hole is
//! attached to the first outer (in input order) whose boundary contains the
//! hole's first vertex.
//!
//! Ownership is decided from that single vertex. A hole whose first vertex
//! sits exactly on an outer boundary, or inside a different outer's hole,
//! can be attached to the wrong region or to none. Union output from a
//! well-behaved engine never produces either case.

use crate::geometry::{CoverageMap, Region, Ring};
use log::debug;

/// Group `rings` into regions: one per outer ring, holes attached by containment.
///
/// Every outer yields exactly one region, in input order. Holes contained in
/// no outer are dropped. Holes are normalized to clockwise winding.
pub fn classify_rings(rings: Vec<Ring>) -> CoverageMap {
    let mut outers: Vec<Region> = Vec::new();
    let mut holes: Vec<Ring> = Vec::new();
    let mut degenerate = 0usize;

    for ring in rings {
        let area = ring.signed_area();
        if area > 0.0 {
            outers.push(Region::new(ring));
        } else if area < 0.0 {
            holes.push(ring);
        } else {
            degenerate += 1;
        }
    }

    let mut orphans = 0usize;
    for mut hole in holes {
        let owner = hole
            .first()
            .and_then(|anchor| outers.iter_mut().find(|r| r.outer.contains_point(anchor)));

        match owner {
            Some(region) => {
                hole.make_clockwise();
                region.holes.push(hole);
            }
            None => orphans += 1,
        }
    }

    if degenerate > 0 || orphans > 0 {
        debug!(
            "classify: dropped {} degenerate ring(s) and {} orphan hole(s)",
            degenerate, orphans
        );
    }

    outers
}
