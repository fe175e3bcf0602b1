//! Terrain-aware sensor coverage generation and merging.
//!
//! The pipeline runs leaves first:
//!
//! 1. [`terrain`] answers elevation and line-of-sight queries.
//! 2. [`visibility`] binary-searches the maximum unobstructed range along a bearing.
//! 3. [`coverage`] sweeps bearings over a sensor's azimuth span into a [`Ring`].
//! 4. [`clipper`] unions the per-sensor rings (geo-clipper, non-zero fill).
//! 5. [`classify`] sorts the raw union output into outer boundaries and holes.
//! 6. [`postprocess`] simplifies and smooths every boundary.
//! 7. [`merge`] owns sensors and terrain and memoizes the merged [`CoverageMap`].
//!
//! # Example
//! ```
//! use radar_coverage::{CoverageMergeManager, Point, Sensor, TerrainObstacle};
//!
//! let mut manager = CoverageMergeManager::new();
//! manager
//!     .add_obstacle(TerrainObstacle::new(Point::new(50.0, 0.0), 20.0, 20.0, 1000.0))
//!     .unwrap();
//! manager.add_sensor(Sensor::new(1, Point::new(0.0, 0.0), 10.0, 100.0));
//!
//! let stats = manager.stats();
//! assert_eq!(stats.region_count, 1);
//! ```

pub mod classify;
pub mod clipper;
pub mod config;
pub mod coverage;
pub mod geometry;
pub mod merge;
pub mod postprocess;
pub mod terrain;
pub mod visibility;

pub use classify::classify_rings;
pub use clipper::{ClippingEngine, GeoClipper, OffsetJoinType};
pub use config::{CoverageConfig, Scenario};
pub use coverage::{generate_coverage, Sensor};
pub use geometry::{BoundingBox, CoverageMap, Point, Region, Ring};
pub use merge::{CoverageMergeManager, CoverageStats, SharedCoverageManager};
pub use terrain::{TerrainModel, TerrainObstacle};
pub use visibility::max_visible_range;

/// Floating-point coordinate type (planar projection units, typically meters).
pub type CoordF = f64;

/// Sensor identifier.
pub type SensorId = u32;

/// Error type for coverage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid terrain obstacle: {0}")]
    InvalidObstacle(String),

    #[error("Clipping engine failure: {0}")]
    Clipping(String),
}

/// Result type for coverage operations.
pub type Result<T> = std::result::Result<T, Error>;
