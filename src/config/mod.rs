//! Coverage generation settings and scenario loading.
//!
//! [`CoverageConfig`] collects the generation parameters the merge manager
//! exposes. [`Scenario`] bundles a config with sensor and obstacle records,
//! already projected into the planar frame, and loads from JSON.

use crate::clipper::DEFAULT_CLIPPER_SCALE;
use crate::coverage::{Sensor, DEFAULT_RAY_COUNT};
use crate::merge::CoverageMergeManager;
use crate::terrain::{
    TerrainObstacle, DEFAULT_CURVATURE_FACTOR, DEFAULT_LOS_SAMPLES, EARTH_RADIUS,
};
use crate::{CoordF, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Generation parameters for a merge cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Bearings sampled per sensor.
    pub ray_count: usize,

    /// Simplification tolerance (0 disables simplification).
    pub simplify_tolerance: CoordF,

    /// Corner-cutting iterations (0 disables smoothing).
    pub smooth_iterations: usize,

    /// Height of the targets the coverage is computed for.
    pub target_height: CoordF,

    /// Line-of-sight path subdivisions.
    pub los_samples: usize,

    /// Earth radius used for the curvature drop.
    pub earth_radius: CoordF,

    /// Scale applied to the curvature drop.
    pub curvature_factor: CoordF,

    /// Fixed-point factor for the clipping engine.
    pub clipper_scale: CoordF,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            ray_count: DEFAULT_RAY_COUNT,
            simplify_tolerance: 5.0,
            smooth_iterations: 1,
            target_height: 0.0,
            los_samples: DEFAULT_LOS_SAMPLES,
            earth_radius: EARTH_RADIUS,
            curvature_factor: DEFAULT_CURVATURE_FACTOR,
            clipper_scale: DEFAULT_CLIPPER_SCALE,
        }
    }
}

impl CoverageConfig {
    /// Load a config from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.ray_count < 3 {
            return Err(Error::Config(format!(
                "ray_count must be at least 3, got {}",
                self.ray_count
            )));
        }
        if !(self.simplify_tolerance >= 0.0) {
            return Err(Error::Config(
                "simplify_tolerance must be non-negative".to_string(),
            ));
        }
        if !self.target_height.is_finite() {
            return Err(Error::Config("target_height must be finite".to_string()));
        }
        if self.los_samples == 0 {
            return Err(Error::Config("los_samples must be positive".to_string()));
        }
        if !(self.earth_radius > 0.0) {
            return Err(Error::Config("earth_radius must be positive".to_string()));
        }
        if !(self.curvature_factor >= 0.0) {
            return Err(Error::Config(
                "curvature_factor must be non-negative".to_string(),
            ));
        }
        if !(self.clipper_scale > 0.0) {
            return Err(Error::Config("clipper_scale must be positive".to_string()));
        }
        Ok(())
    }
}

/// Sensors, terrain, and settings for one coverage computation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: CoverageConfig,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
    #[serde(default)]
    pub obstacles: Vec<TerrainObstacle>,
}

impl Scenario {
    /// Load a scenario from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a scenario from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Validate the config, obstacle shapes, and sensor id uniqueness.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;

        for obstacle in &self.obstacles {
            obstacle.validate()?;
        }

        let mut seen = HashSet::new();
        for sensor in &self.sensors {
            if !seen.insert(sensor.id) {
                return Err(Error::Config(format!("duplicate sensor id {}", sensor.id)));
            }
        }
        Ok(())
    }

    /// Build a merge manager backed by [`GeoClipper`](crate::clipper::GeoClipper).
    pub fn into_manager(self) -> Result<CoverageMergeManager> {
        self.validate()?;

        let mut manager = CoverageMergeManager::with_config(self.config)?;

        for obstacle in self.obstacles {
            manager.add_obstacle(obstacle)?;
        }
        for sensor in self.sensors {
            manager.add_sensor(sensor);
        }

        Ok(manager)
    }
}
