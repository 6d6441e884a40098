use glam::{UVec2, Vec2};
use seascape_common::{ConfigError, TileLayout};

use crate::buffer::PingPong;
use crate::impulse::Impulse;

/// One square tile of the simulation domain with its own ping-pong pair.
///
/// A tile's border row/column is duplicated in its neighbour. Only the
/// strict interior (`1..res-1` on both axes) is written by the tile itself;
/// border cells are written by the simulator's edge pass.
#[derive(Debug, Clone)]
pub struct WaveTile {
    coord: UVec2,
    origin: UVec2,
    layout: TileLayout,
    buffers: PingPong,
}

impl WaveTile {
    pub fn new(coord: UVec2, resolution: u32, block: u32) -> Result<Self, ConfigError> {
        let layout = TileLayout::new(resolution, block)?;
        Ok(Self {
            coord,
            origin: coord * (resolution - 1),
            layout,
            buffers: PingPong::new(layout.len()),
        })
    }

    /// Tile coordinate in the tile grid.
    pub fn coord(&self) -> UVec2 {
        self.coord
    }

    /// Global cell of local `(0, 0)`.
    pub fn origin(&self) -> UVec2 {
        self.origin
    }

    pub fn resolution(&self) -> u32 {
        self.layout.side()
    }

    #[inline]
    pub fn current_at(&self, local: UVec2) -> f32 {
        self.buffers.current()[self.layout.pixel_index(local.x, local.y)]
    }

    /// Value one tick behind current (still held by the next buffer).
    #[inline]
    pub fn previous_at(&self, local: UVec2) -> f32 {
        self.buffers.next()[self.layout.pixel_index(local.x, local.y)]
    }

    #[inline]
    pub fn write_next(&mut self, local: UVec2, value: f32) {
        let i = self.layout.pixel_index(local.x, local.y);
        self.buffers.next_mut()[i] = value;
    }

    /// Add the part of `impulse` that falls on this tile to the current buffer,
    /// less `offset` on every covered cell.
    pub fn apply_impulse(&mut self, impulse: &Impulse, offset: f32, ceiling: f32) {
        let res = self.resolution();
        let origin = self.origin.as_vec2();
        let local_center = impulse.center - origin;
        if local_center.x + impulse.radius < 0.0 || local_center.y + impulse.radius < 0.0 {
            return;
        }
        let (x0, x1) = impulse.cell_span(local_center.x, res);
        let (y0, y1) = impulse.cell_span(local_center.y, res);
        let layout = self.layout;
        let current = self.buffers.current_mut();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let cell = origin + Vec2::new(x as f32, y as f32);
                if impulse.covers(cell) {
                    let i = layout.pixel_index(x, y);
                    let bump = impulse.contribution(cell) - offset;
                    current[i] = (current[i] + bump).clamp(-ceiling, ceiling);
                }
            }
        }
    }

    /// Explicit finite-difference step for every strictly interior cell.
    pub fn propagate_interior(&mut self, r2: f32, ceiling: f32) {
        let res = self.resolution();
        let layout = self.layout;
        let (cur, next) = self.buffers.split_mut();
        for y in 1..res - 1 {
            for x in 1..res - 1 {
                let c = layout.pixel_index(x, y);
                let laplacian = cur[layout.pixel_index(x, y + 1)]
                    + cur[layout.pixel_index(x, y - 1)]
                    + cur[layout.pixel_index(x + 1, y)]
                    + cur[layout.pixel_index(x - 1, y)]
                    - 4.0 * cur[c];
                next[c] = wave_step(cur[c], next[c], r2, laplacian, ceiling);
            }
        }
    }

    pub fn swap(&mut self) {
        self.buffers.swap();
    }

    pub fn clear(&mut self) {
        self.buffers.clear();
    }

    /// Settled values in local row-major order.
    pub fn rows(&self) -> impl Iterator<Item = f32> + '_ {
        let res = self.resolution();
        (0..res).flat_map(move |y| (0..res).map(move |x| self.current_at(UVec2::new(x, y))))
    }
}

/// `clamp(2c - p + R²·∇², ±ceiling)`. The clamp is a numerical guard, not physics.
#[inline]
pub fn wave_step(current: f32, previous: f32, r2: f32, laplacian: f32, ceiling: f32) -> f32 {
    (2.0 * current - previous + r2 * laplacian).clamp(-ceiling, ceiling)
}

/// Open boundary update for an edge cell with inward neighbour `inward`.
#[inline]
pub fn absorbing_step(current: f32, previous: f32, inward: f32, r: f32) -> f32 {
    (2.0 * current + (r - 1.0) * previous + 2.0 * r * r * (inward - current)) / (r + 1.0)
}
