//! Coverage merge orchestration.
//!
//! [`CoverageMergeManager`] owns the sensor set, the terrain model and the
//! generation settings, and memoizes the merged coverage map. Every mutation
//! marks the cached result stale; the next read recomputes it in full:
//!
//! 1. one coverage ring per sensor (in parallel, terrain is read-only)
//! 2. union of all non-degenerate rings through the clipping engine
//! 3. classification into regions
//! 4. simplification and smoothing
//!
//! Several mutations between two reads cost a single recomputation.

mod stats;

pub use stats::CoverageStats;

use crate::classify::classify_rings;
use crate::clipper::{ClippingEngine, GeoClipper};
use crate::config::CoverageConfig;
use crate::coverage::{generate_coverage_with_target, Sensor};
use crate::geometry::{CoverageMap, Ring};
use crate::postprocess::post_process;
use crate::terrain::{TerrainModel, TerrainObstacle};
use crate::{CoordF, Result, SensorId};
use log::{debug, info, warn};
use parking_lot::{Mutex, MutexGuard};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Cache state of the merged result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageState {
    /// The cached result reflects the current sensors, terrain and settings.
    Fresh,
    /// A mutation happened since the last computation.
    Stale,
}

/// Output of one merge cycle.
#[derive(Debug, Clone)]
struct MergeResult {
    individual: Vec<Ring>,
    merged: CoverageMap,
    stats: CoverageStats,
}

/// Owner of sensors and terrain, producing a memoized merged coverage map.
pub struct CoverageMergeManager {
    terrain: TerrainModel,
    sensors: Vec<Sensor>,
    config: CoverageConfig,
    engine: Box<dyn ClippingEngine>,
    /// The engine is a [`GeoClipper`] built from `config.clipper_scale`.
    owns_default_engine: bool,
    cache: Option<MergeResult>,
    recompute_count: u64,
}

impl Default for CoverageMergeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CoverageMergeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoverageMergeManager")
            .field("terrain", &self.terrain)
            .field("sensors", &self.sensors.len())
            .field("config", &self.config)
            .field("state", &self.state())
            .field("recompute_count", &self.recompute_count)
            .finish()
    }
}

impl CoverageMergeManager {
    /// Manager with default settings and the [`GeoClipper`] engine.
    pub fn new() -> Self {
        let mut manager = Self::with_engine(Box::new(GeoClipper::new()));
        manager.owns_default_engine = true;
        manager
    }

    /// Manager with default settings and a custom clipping engine.
    pub fn with_engine(engine: Box<dyn ClippingEngine>) -> Self {
        Self {
            terrain: TerrainModel::new(),
            sensors: Vec::new(),
            config: CoverageConfig::default(),
            engine,
            owns_default_engine: false,
            cache: None,
            recompute_count: 0,
        }
    }

    /// Manager with validated settings and the [`GeoClipper`] engine.
    pub fn with_config(config: CoverageConfig) -> Result<Self> {
        let mut manager = Self::new();
        manager.set_config(config)?;
        Ok(manager)
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Current cache state.
    pub fn state(&self) -> CoverageState {
        if self.cache.is_some() {
            CoverageState::Fresh
        } else {
            CoverageState::Stale
        }
    }

    #[inline]
    pub fn is_stale(&self) -> bool {
        self.cache.is_none()
    }

    /// Force the next read to recompute.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Number of full recomputations performed so far.
    #[inline]
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    // ------------------------------------------------------------------
    // Terrain
    // ------------------------------------------------------------------

    #[inline]
    pub fn terrain(&self) -> &TerrainModel {
        &self.terrain
    }

    /// Mutable terrain access; marks the result stale.
    pub fn terrain_mut(&mut self) -> &mut TerrainModel {
        self.invalidate();
        &mut self.terrain
    }

    pub fn add_obstacle(&mut self, obstacle: TerrainObstacle) -> Result<()> {
        self.terrain.add_obstacle(obstacle)?;
        self.invalidate();
        Ok(())
    }

    pub fn clear_obstacles(&mut self) {
        self.terrain.clear_obstacles();
        self.invalidate();
    }

    // ------------------------------------------------------------------
    // Sensors
    // ------------------------------------------------------------------

    #[inline]
    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn sensor(&self, id: SensorId) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.id == id)
    }

    pub fn add_sensor(&mut self, sensor: Sensor) {
        if self.sensor(sensor.id).is_some() {
            warn!("sensor id {} added more than once", sensor.id);
        }
        self.sensors.push(sensor);
        self.invalidate();
    }

    /// Replace the first sensor with `id`. Returns `false` if none matched.
    pub fn update_sensor(&mut self, id: SensorId, sensor: Sensor) -> bool {
        match self.sensors.iter_mut().find(|s| s.id == id) {
            Some(slot) => {
                *slot = sensor;
                self.invalidate();
                true
            }
            None => false,
        }
    }

    /// Remove every sensor with `id`. Returns how many were removed.
    pub fn remove_sensor(&mut self, id: SensorId) -> usize {
        let before = self.sensors.len();
        self.sensors.retain(|s| s.id != id);
        let removed = before - self.sensors.len();
        if removed > 0 {
            self.invalidate();
        }
        removed
    }

    pub fn clear_sensors(&mut self) {
        self.sensors.clear();
        self.invalidate();
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    #[inline]
    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    /// Replace all settings after validation. Terrain sampling settings are
    /// pushed into the terrain model, and a default engine is rebuilt with
    /// the new `clipper_scale`. A custom engine is left as is.
    pub fn set_config(&mut self, config: CoverageConfig) -> Result<()> {
        config.validate()?;
        self.terrain.set_los_samples(config.los_samples);
        self.terrain.set_earth_radius(config.earth_radius);
        self.terrain.set_curvature_factor(config.curvature_factor);
        if self.owns_default_engine {
            self.engine = Box::new(GeoClipper::with_scale(config.clipper_scale));
        }
        self.config = config;
        self.invalidate();
        Ok(())
    }

    /// Apply one field change through [`set_config`](Self::set_config), so
    /// an invalid value leaves the manager untouched.
    fn update_config(&mut self, change: impl FnOnce(&mut CoverageConfig)) -> Result<()> {
        let mut config = self.config.clone();
        change(&mut config);
        self.set_config(config)
    }

    pub fn set_ray_count(&mut self, ray_count: usize) -> Result<()> {
        self.update_config(|c| c.ray_count = ray_count)
    }

    pub fn set_simplify_tolerance(&mut self, tolerance: CoordF) -> Result<()> {
        self.update_config(|c| c.simplify_tolerance = tolerance)
    }

    pub fn set_smooth_iterations(&mut self, iterations: usize) -> Result<()> {
        self.update_config(|c| c.smooth_iterations = iterations)
    }

    pub fn set_target_height(&mut self, height: CoordF) -> Result<()> {
        self.update_config(|c| c.target_height = height)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Per-sensor coverage rings, in sensor order.
    ///
    /// Degenerate rings (e.g. from a non-positive range) are listed here but
    /// excluded from the union.
    pub fn individual_coverages(&mut self) -> &[Ring] {
        &self.ensure_fresh().individual
    }

    /// The merged, classified and post-processed coverage map.
    pub fn merged_coverage(&mut self) -> &CoverageMap {
        &self.ensure_fresh().merged
    }

    /// Statistics of the merged coverage map.
    pub fn stats(&mut self) -> CoverageStats {
        self.ensure_fresh().stats
    }

    fn ensure_fresh(&mut self) -> &MergeResult {
        let result = match self.cache.take() {
            Some(result) => result,
            None => {
                self.recompute_count += 1;
                self.recompute()
            }
        };
        self.cache.insert(result)
    }

    fn recompute(&self) -> MergeResult {
        let started = Instant::now();
        let ray_count = self.config.ray_count;
        let target_height = self.config.target_height;
        let terrain = &self.terrain;

        let individual: Vec<Ring> = self
            .sensors
            .par_iter()
            .map(|sensor| generate_coverage_with_target(sensor, terrain, ray_count, target_height))
            .collect();

        let valid: Vec<Ring> = self
            .sensors
            .iter()
            .zip(&individual)
            .filter_map(|(sensor, ring)| {
                if ring.is_valid() {
                    Some(ring.clone())
                } else {
                    debug!(
                        "sensor {} produced a degenerate coverage ring ({} points), skipping",
                        sensor.id,
                        ring.len()
                    );
                    None
                }
            })
            .collect();

        let merged = match self.engine.union(&valid) {
            Ok(rings) => classify_rings(rings),
            Err(e) => {
                warn!("coverage union failed, merged map is empty: {}", e);
                Vec::new()
            }
        };

        let merged = post_process(
            self.engine.as_ref(),
            merged,
            self.config.simplify_tolerance,
            self.config.smooth_iterations,
        );
        let stats = CoverageStats::compute(&merged);

        info!(
            "coverage merged: {} sensors -> {} regions, {} holes, area {:.1} in {:?}",
            self.sensors.len(),
            stats.region_count,
            stats.total_hole_count,
            stats.total_area,
            started.elapsed()
        );

        MergeResult {
            individual,
            merged,
            stats,
        }
    }
}

/// Thread-safe handle: one mutex serializes mutations and recompute-on-read.
#[derive(Clone, Debug)]
pub struct SharedCoverageManager {
    inner: Arc<Mutex<CoverageMergeManager>>,
}

impl SharedCoverageManager {
    pub fn new(manager: CoverageMergeManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Lock the manager for a batch of mutations or reads.
    pub fn lock(&self) -> MutexGuard<'_, CoverageMergeManager> {
        self.inner.lock()
    }

    /// Snapshot of the merged coverage map.
    pub fn merged_coverage(&self) -> CoverageMap {
        self.inner.lock().merged_coverage().clone()
    }

    pub fn stats(&self) -> CoverageStats {
        self.inner.lock().stats()
    }
}
