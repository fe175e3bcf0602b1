//! Terrain occlusion model.
//!
//! Terrain is a set of localized elevation bumps ([`TerrainObstacle`]) and an
//! optional base elevation function. Overlapping features combine by max
//! ("tallest feature wins"), not by sum.
//!
//! Line-of-sight is decided by sampling: the segment between two positions
//! is marched at a fixed number of interior points and the terrain height at
//! each one is compared with the sight line, which is linearly interpolated
//! between the endpoint heights and lowered by an Earth-curvature drop.

use crate::geometry::{BoundingBox, Point};
use crate::{CoordF, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default number of segments a line-of-sight test divides the path into.
pub const DEFAULT_LOS_SAMPLES: usize = 40;

/// Mean Earth radius (m).
pub const EARTH_RADIUS: CoordF = 6_371_000.0;

/// Default scale applied to the curvature drop.
pub const DEFAULT_CURVATURE_FACTOR: CoordF = 0.5;

/// Gaussian falloff exponent of an obstacle's elevation profile.
const OBSTACLE_FALLOFF: CoordF = 3.0;

/// Segments shorter than this are never blocked.
const MIN_SIGHT_DISTANCE: CoordF = 1e-6;

/// Base elevation as a function of planar `(x, y)`.
pub type ElevationFn = Arc<dyn Fn(CoordF, CoordF) -> CoordF + Send + Sync>;

/// An elliptical terrain bump with a Gaussian height profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainObstacle {
    /// Peak position.
    pub center: Point,
    /// Ellipse radius along x.
    pub rx: CoordF,
    /// Ellipse radius along y.
    pub ry: CoordF,
    /// Peak height.
    pub height: CoordF,
    /// Optional label, carried through for presentation.
    #[serde(default)]
    pub name: Option<String>,
}

impl TerrainObstacle {
    pub fn new(center: Point, rx: CoordF, ry: CoordF, height: CoordF) -> Self {
        Self {
            center,
            rx,
            ry,
            height,
            name: None,
        }
    }

    /// Attach a label to the obstacle.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Height contributed at `p`.
    ///
    /// `height * exp(-3 d²)` where `d²` is the squared distance to the center
    /// normalized per axis by the radii; exactly zero once `d² >= 1`.
    pub fn elevation_at(&self, p: &Point) -> CoordF {
        let dx = (p.x - self.center.x) / self.rx;
        let dy = (p.y - self.center.y) / self.ry;
        let dist_sq = dx * dx + dy * dy;

        if dist_sq >= 1.0 {
            return 0.0;
        }

        self.height * (-OBSTACLE_FALLOFF * dist_sq).exp()
    }

    /// Bounding box of the obstacle's ellipse.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_min_max(
            Point::new(self.center.x - self.rx, self.center.y - self.ry),
            Point::new(self.center.x + self.rx, self.center.y + self.ry),
        )
    }

    /// Reject shapes the elevation formula cannot evaluate.
    pub fn validate(&self) -> Result<()> {
        if !(self.rx > 0.0 && self.ry > 0.0) {
            return Err(Error::InvalidObstacle(format!(
                "radii must be positive, got ({}, {})",
                self.rx, self.ry
            )));
        }
        if !self.height.is_finite() || !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Err(Error::InvalidObstacle(
                "center and height must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Elevation field and line-of-sight oracle.
#[derive(Clone)]
pub struct TerrainModel {
    obstacles: Vec<TerrainObstacle>,
    base_elevation: Option<ElevationFn>,
    los_samples: usize,
    earth_radius: CoordF,
    curvature_factor: CoordF,
}

impl Default for TerrainModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TerrainModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerrainModel")
            .field("obstacles", &self.obstacles.len())
            .field("base_elevation", &self.base_elevation.is_some())
            .field("los_samples", &self.los_samples)
            .field("earth_radius", &self.earth_radius)
            .field("curvature_factor", &self.curvature_factor)
            .finish()
    }
}

impl TerrainModel {
    /// Flat terrain with default sampling and curvature settings.
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            base_elevation: None,
            los_samples: DEFAULT_LOS_SAMPLES,
            earth_radius: EARTH_RADIUS,
            curvature_factor: DEFAULT_CURVATURE_FACTOR,
        }
    }

    /// Add an obstacle after validating its shape.
    pub fn add_obstacle(&mut self, obstacle: TerrainObstacle) -> Result<()> {
        obstacle.validate()?;
        self.obstacles.push(obstacle);
        Ok(())
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    #[inline]
    pub fn obstacles(&self) -> &[TerrainObstacle] {
        &self.obstacles
    }

    /// Install a base elevation function, combined with obstacles by max.
    pub fn set_base_elevation<F>(&mut self, f: F)
    where
        F: Fn(CoordF, CoordF) -> CoordF + Send + Sync + 'static,
    {
        self.base_elevation = Some(Arc::new(f));
    }

    pub fn clear_base_elevation(&mut self) {
        self.base_elevation = None;
    }

    #[inline]
    pub fn los_samples(&self) -> usize {
        self.los_samples
    }

    /// Number of segments a sight line is divided into; `n - 1` interior
    /// points are tested.
    pub fn set_los_samples(&mut self, samples: usize) {
        self.los_samples = samples;
    }

    #[inline]
    pub fn earth_radius(&self) -> CoordF {
        self.earth_radius
    }

    pub fn set_earth_radius(&mut self, radius: CoordF) {
        self.earth_radius = radius;
    }

    #[inline]
    pub fn curvature_factor(&self) -> CoordF {
        self.curvature_factor
    }

    pub fn set_curvature_factor(&mut self, factor: CoordF) {
        self.curvature_factor = factor;
    }

    /// Terrain height at `p`: the maximum over the base function and every obstacle.
    pub fn elevation(&self, p: &Point) -> CoordF {
        let base = self
            .base_elevation
            .as_ref()
            .map_or(0.0, |f| f(p.x, p.y));

        self.obstacles
            .iter()
            .map(|obs| obs.elevation_at(p))
            .fold(base, CoordF::max)
    }

    /// Curvature drop of the sight line at `distance` from the observer.
    #[inline]
    pub fn curvature_drop(&self, distance: CoordF) -> CoordF {
        distance * distance / (2.0 * self.earth_radius) * self.curvature_factor
    }

    /// Check whether terrain blocks the sight line from `(from, from_height)`
    /// to `(to, to_height)`.
    ///
    /// Only interior samples are tested; the endpoints themselves never block.
    /// Zero-length segments are never blocked.
    pub fn is_blocked(
        &self,
        from: Point,
        from_height: CoordF,
        to: Point,
        to_height: CoordF,
    ) -> bool {
        let delta = to - from;
        let total_dist = delta.length();

        if total_dist < MIN_SIGHT_DISTANCE || self.los_samples == 0 {
            return false;
        }

        let n = self.los_samples as CoordF;
        let step = delta * (1.0 / n);

        for i in 1..self.los_samples {
            let progress = i as CoordF / n;
            let sample = from + step * i as CoordF;

            let sight_height = from_height * (1.0 - progress) + to_height * progress;
            let effective = sight_height - self.curvature_drop(progress * total_dist);

            if self.elevation(&sample) > effective {
                return true;
            }
        }

        false
    }
}
