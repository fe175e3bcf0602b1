//! Planar geometry primitives shared by the coverage pipeline.
//!
//! - [`Point`]: 2D value type with vector arithmetic
//! - [`Ring`]: closed boundary, closing edge implicit
//! - [`Region`]: one outer ring plus holes
//! - [`CoverageMap`]: a collection of regions
//! - [`BoundingBox`]: axis-aligned extent

mod bounding_box;
mod point;
mod region;
mod ring;

pub use bounding_box::BoundingBox;
pub use point::Point;
pub use region::{CoverageMap, Region};
pub use ring::{Ring, Rings};
