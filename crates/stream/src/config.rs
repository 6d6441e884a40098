use glam::IVec3;
use serde::{Deserialize, Serialize};
use seascape_common::{Bounds, ConfigError, ensure_positive};

use crate::tree::QuadTree;

/// LOD engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Number of LOD levels. The deepest node depth is `max_depth - 1`.
    pub max_depth: u32,
    /// Refine distance of the deepest level. Each shallower level doubles it.
    pub lod_zero_range: f32,
    /// Footprint of depth 0. Must be square.
    pub root: Bounds,
    /// World units per unit of sampled height.
    pub height_scale: f32,
    /// Samples per axis when fitting a node's height range.
    pub fit_samples: u32,
    /// Fraction of the fitted height span added above the sampled max.
    pub height_margin: f32,
    /// Tiles allocated up front by the tile pool.
    pub initial_tiles: u32,
    /// Tiles added each time the pool runs dry.
    pub tile_grow: u32,
    /// Share of each LOD ring, measured inward from its outer edge, used to
    /// morph towards the parent level. In `(0, 1]`.
    pub blend_width: f32,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            lod_zero_range: 32.0,
            root: Bounds::new(IVec3::new(-2048, 0, -2048), IVec3::new(4096, 512, 4096)),
            height_scale: 64.0,
            fit_samples: 4,
            height_margin: 0.05,
            initial_tiles: 64,
            tile_grow: 16,
            blend_width: 0.25,
        }
    }
}

impl LodConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::invalid("max_depth", "need at least one LOD level"));
        }
        let nodes = QuadTree::capacity_for(self.max_depth);
        if nodes > u32::MAX as u64 {
            return Err(ConfigError::TreeTooDeep {
                max_depth: self.max_depth,
                nodes,
            });
        }
        let size = self.root.size;
        if size.x <= 0 || size.x != size.z {
            return Err(ConfigError::invalid(
                "root",
                format!("footprint must be a positive square, got {}x{}", size.x, size.z),
            ));
        }
        let halvings = self.max_depth - 1;
        if halvings >= 31 || size.x % (1 << halvings) != 0 {
            return Err(ConfigError::RootNotDivisible {
                size: size.x,
                levels: halvings,
            });
        }
        ensure_positive("lod_zero_range", self.lod_zero_range)?;
        ensure_positive("height_scale", self.height_scale)?;
        if self.fit_samples < 2 {
            return Err(ConfigError::invalid(
                "fit_samples",
                "need at least two samples per axis to cover a footprint",
            ));
        }
        if !(self.height_margin.is_finite() && self.height_margin >= 0.0) {
            return Err(ConfigError::invalid("height_margin", "must be finite and non-negative"));
        }
        if self.tile_grow == 0 {
            return Err(ConfigError::invalid("tile_grow", "pool must be able to grow"));
        }
        if !(self.blend_width > 0.0 && self.blend_width <= 1.0) {
            return Err(ConfigError::invalid("blend_width", "must lie in (0, 1]"));
        }
        Ok(())
    }
}
