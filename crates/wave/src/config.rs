use glam::Vec2;
use serde::{Deserialize, Serialize};
use seascape_common::{ConfigError, ensure_positive, ensure_power_of_two};

/// Periodic ripple injection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseConfig {
    /// Ticks between injections. Zero disables impulses.
    pub period: u32,
    /// Ripples injected per trigger.
    pub count: u32,
    /// Ripple radius range, in cells.
    pub min_radius: f32,
    pub max_radius: f32,
    /// Peak amplitude range. The sign is drawn separately.
    pub min_amplitude: f32,
    pub max_amplitude: f32,
}

impl Default for ImpulseConfig {
    fn default() -> Self {
        Self {
            period: 8,
            count: 1,
            min_radius: 2.0,
            max_radius: 6.0,
            min_amplitude: 0.25,
            max_amplitude: 0.75,
        }
    }
}

/// Wave simulator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Cells per tile side, including the edge shared with neighbours.
    pub tile_resolution: u32,
    /// Tiles per domain side.
    pub tiles_per_side: u32,
    /// Block size of the Z-order layout inside each tile.
    pub block_size: u32,
    /// World units between adjacent cells (`dcd`).
    pub cell_spacing: f32,
    /// Seconds per tick (`dt`).
    pub timestep: f32,
    /// Propagation constant (`C`).
    pub damping: f32,
    /// Symmetric clamp applied to every written cell.
    pub ceiling: f32,
    pub ticks_per_frame: u32,
    pub seed: u64,
    /// World `(x, z)` of grid cell `(0, 0)`.
    pub origin: Vec2,
    pub impulse: ImpulseConfig,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            tile_resolution: 64,
            tiles_per_side: 4,
            block_size: 8,
            cell_spacing: 4.0,
            timestep: 0.1,
            damping: 20.0,
            ceiling: 4.0,
            ticks_per_frame: 1,
            seed: 42,
            origin: Vec2::new(-504.0, -504.0),
            impulse: ImpulseConfig::default(),
        }
    }
}

impl WaveConfig {
    /// `R = C * dt / dcd`.
    pub fn courant(&self) -> f32 {
        self.damping * self.timestep / self.cell_spacing
    }

    /// Cells per side of the whole domain. Neighbouring tiles share an edge.
    pub fn grid_side(&self) -> u32 {
        self.tiles_per_side * (self.tile_resolution - 1) + 1
    }

    /// World-space edge length of the simulated domain.
    pub fn world_extent(&self) -> f32 {
        (self.grid_side() - 1) as f32 * self.cell_spacing
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_power_of_two("tile resolution", self.tile_resolution)?;
        if self.tile_resolution < 4 {
            return Err(ConfigError::InvalidParameter {
                name: "tile_resolution",
                reason: format!("need at least 4 cells per tile, got {}", self.tile_resolution),
            });
        }
        ensure_power_of_two("block size", self.block_size)?;
        if self.block_size > self.tile_resolution {
            return Err(ConfigError::InvalidParameter {
                name: "block_size",
                reason: format!(
                    "block {} is larger than tile resolution {}",
                    self.block_size, self.tile_resolution
                ),
            });
        }
        if self.tiles_per_side == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "tiles_per_side",
                reason: "need at least one tile".into(),
            });
        }
        self.tiles_per_side
            .checked_mul(self.tile_resolution - 1)
            .filter(|&cells| cells < u16::MAX as u32)
            .ok_or(ConfigError::CoordinateOutOfRange {
                x: self.tiles_per_side,
                y: self.tile_resolution,
            })?;
        ensure_positive("cell_spacing", self.cell_spacing)?;
        ensure_positive("timestep", self.timestep)?;
        ensure_positive("damping", self.damping)?;
        ensure_positive("ceiling", self.ceiling)?;
        if self.ticks_per_frame == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "ticks_per_frame",
                reason: "must advance at least one tick".into(),
            });
        }
        if !self.origin.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "origin",
                reason: format!("{:?} is not finite", self.origin),
            });
        }
        self.impulse.validate()
    }
}

impl ImpulseConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.period == 0 {
            return Ok(());
        }
        ensure_positive("impulse.min_radius", self.min_radius)?;
        ensure_positive("impulse.max_radius", self.max_radius)?;
        if self.min_radius > self.max_radius {
            return Err(ConfigError::InvalidParameter {
                name: "impulse radius",
                reason: format!("min {} > max {}", self.min_radius, self.max_radius),
            });
        }
        if !(self.min_amplitude.is_finite() && self.max_amplitude.is_finite())
            || self.min_amplitude < 0.0
            || self.min_amplitude > self.max_amplitude
        {
            return Err(ConfigError::InvalidParameter {
                name: "impulse amplitude",
                reason: format!(
                    "expected 0 <= min <= max, got {}..{}",
                    self.min_amplitude, self.max_amplitude
                ),
            });
        }
        Ok(())
    }
}
