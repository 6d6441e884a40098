use glam::UVec2;
use rayon::prelude::*;
use seascape_common::ConfigError;
use std::f32::consts::FRAC_1_SQRT_2;

use crate::config::WaveConfig;
use crate::impulse::{Impulse, impulses_for_tick};
use crate::tile::{WaveTile, absorbing_step, wave_step};

/// Where a tick currently is. Consumers may only read between ticks
/// (`Idle` before the first tick, `Settled` after each one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    Idle,
    ApplyImpulses,
    Propagate,
    PropagateBoundaries,
    Settled,
}

/// Tiled, double-buffered 2D wave simulation.
///
/// The domain is `tiles_per_side²` tiles. Adjacent tiles duplicate their
/// shared edge, and the edge pass writes the same value into every copy, so
/// the domain reads as one seamless grid of `grid_side()²` cells.
///
/// Given the same config, the same number of ticks produces bit-identical
/// buffers regardless of how rayon schedules the per-tile work.
pub struct WaveSimulator {
    config: WaveConfig,
    tiles: Vec<WaveTile>,
    /// Global cells on any tile border, including the domain edges.
    border_cells: Vec<UVec2>,
    side: u32,
    tick: u64,
    phase: TickPhase,
}

impl WaveSimulator {
    pub fn new(config: WaveConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let n = config.tiles_per_side;
        let tiles = (0..n)
            .flat_map(|ty| (0..n).map(move |tx| UVec2::new(tx, ty)))
            .map(|coord| WaveTile::new(coord, config.tile_resolution, config.block_size))
            .collect::<Result<Vec<_>, _>>()?;

        let side = config.grid_side();
        let stride = config.tile_resolution - 1;
        let border_cells = (0..side)
            .flat_map(|y| (0..side).map(move |x| UVec2::new(x, y)))
            .filter(|g| g.x % stride == 0 || g.y % stride == 0)
            .collect();

        let courant = config.courant();
        if courant > FRAC_1_SQRT_2 {
            tracing::warn!(
                courant,
                "courant number above 1/sqrt(2); amplitudes will sit on the ceiling clamp"
            );
        }
        tracing::info!(side, tiles = n * n, courant, "wave simulator ready");

        Ok(Self {
            config,
            tiles,
            border_cells,
            side,
            tick: 0,
            phase: TickPhase::Idle,
        })
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    /// Completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    /// Cells per domain side.
    pub fn grid_side(&self) -> u32 {
        self.side
    }

    pub fn tiles(&self) -> &[WaveTile] {
        &self.tiles
    }

    /// Settled height of global cell `(x, y)`.
    pub fn height_at(&self, x: u32, y: u32) -> f32 {
        let (tile, local) = self.owner(UVec2::new(x, y));
        self.tiles[tile].current_at(local)
    }

    fn previous_at(&self, g: UVec2) -> f32 {
        let (tile, local) = self.owner(g);
        self.tiles[tile].previous_at(local)
    }

    /// Canonical tile holding global cell `g`, plus its local coordinate.
    fn owner(&self, g: UVec2) -> (usize, UVec2) {
        let stride = self.config.tile_resolution - 1;
        let last = self.config.tiles_per_side - 1;
        let t = UVec2::new((g.x / stride).min(last), (g.y / stride).min(last));
        (self.tile_index(t), g - t * stride)
    }

    fn tile_index(&self, t: UVec2) -> usize {
        (t.y * self.config.tiles_per_side + t.x) as usize
    }

    /// Tiles along one axis that store coordinate `c` (one, or two on a seam).
    fn axis_owners(&self, c: u32) -> [Option<u32>; 2] {
        let stride = self.config.tile_resolution - 1;
        let t = c / stride;
        let primary = (t < self.config.tiles_per_side).then_some(t);
        let shared = (c % stride == 0 && t > 0).then(|| t - 1);
        [primary, shared]
    }

    /// Every `(tile, local)` that stores global cell `g`.
    fn sharing_tiles(&self, g: UVec2) -> [Option<(usize, UVec2)>; 4] {
        let stride = self.config.tile_resolution - 1;
        let xs = self.axis_owners(g.x);
        let ys = self.axis_owners(g.y);
        let mut out = [None; 4];
        let mut n = 0;
        for ty in ys.into_iter().flatten() {
            for tx in xs.into_iter().flatten() {
                let t = UVec2::new(tx, ty);
                out[n] = Some((self.tile_index(t), g - t * stride));
                n += 1;
            }
        }
        out
    }

    /// Advance every tick scheduled for one frame.
    pub fn step_frame(&mut self) {
        for _ in 0..self.config.ticks_per_frame {
            self.step();
        }
    }

    /// Advance one tick: impulses, interior, boundaries, swap.
    pub fn step(&mut self) {
        let _span = tracing::trace_span!("wave_tick", tick = self.tick).entered();
        let ceiling = self.config.ceiling;

        self.phase = TickPhase::ApplyImpulses;
        let impulses =
            impulses_for_tick(&self.config.impulse, self.config.seed, self.tick, self.side);
        if !impulses.is_empty() {
            tracing::debug!(tick = self.tick, count = impulses.len(), "injecting impulses");
            let side = self.side;
            let balanced: Vec<(Impulse, f32)> =
                impulses.into_iter().map(|i| (i, i.grid_mean(side))).collect();
            self.tiles.par_iter_mut().for_each(|tile| {
                for (impulse, offset) in &balanced {
                    tile.apply_impulse(impulse, *offset, ceiling);
                }
            });
        }

        self.phase = TickPhase::Propagate;
        let r = self.config.courant();
        let r2 = r * r;
        self.tiles
            .par_iter_mut()
            .for_each(|tile| tile.propagate_interior(r2, ceiling));

        self.phase = TickPhase::PropagateBoundaries;
        self.propagate_boundaries(r, ceiling);

        self.tiles.iter_mut().for_each(WaveTile::swap);
        self.tick += 1;
        self.phase = TickPhase::Settled;
    }

    /// Add a ripple to the settled buffer between ticks. Like scheduled
    /// impulses it adds no net volume.
    pub fn splash(&mut self, impulse: Impulse) {
        let ceiling = self.config.ceiling;
        let offset = impulse.grid_mean(self.side);
        self.tiles
            .par_iter_mut()
            .for_each(|tile| tile.apply_impulse(&impulse, offset, ceiling));
    }

    /// Edge pass. Values are computed in parallel from read-only buffers, then
    /// scattered into every tile that stores the cell.
    fn propagate_boundaries(&mut self, r: f32, ceiling: f32) {
        let updates: Vec<(UVec2, f32)> = self
            .border_cells
            .par_iter()
            .map(|&g| (g, self.border_value(g, r, ceiling)))
            .collect();

        for (g, value) in updates {
            for (tile, local) in self.sharing_tiles(g).into_iter().flatten() {
                self.tiles[tile].write_next(local, value);
            }
        }
    }

    fn border_value(&self, g: UVec2, r: f32, ceiling: f32) -> f32 {
        let last = self.side - 1;
        let current = self.height_at(g.x, g.y);
        let previous = self.previous_at(g);
        let on_x_edge = g.x == 0 || g.x == last;
        let on_y_edge = g.y == 0 || g.y == last;

        let inward_x = || {
            let x = if g.x == 0 { 1 } else { last - 1 };
            absorbing_step(current, previous, self.height_at(x, g.y), r)
        };
        let inward_y = || {
            let y = if g.y == 0 { 1 } else { last - 1 };
            absorbing_step(current, previous, self.height_at(g.x, y), r)
        };

        let value = match (on_x_edge, on_y_edge) {
            (false, false) => {
                // Seam between tiles: plain stencil, same term order as the
                // tile interior so both sides agree bit for bit.
                let laplacian = self.height_at(g.x, g.y + 1)
                    + self.height_at(g.x, g.y - 1)
                    + self.height_at(g.x + 1, g.y)
                    + self.height_at(g.x - 1, g.y)
                    - 4.0 * current;
                return wave_step(current, previous, r * r, laplacian, ceiling);
            }
            (true, false) => inward_x(),
            (false, true) => inward_y(),
            // Corner: mean of both open-boundary updates.
            (true, true) => 0.5 * (inward_x() + inward_y()),
        };
        value.clamp(-ceiling, ceiling)
    }

    /// Zero both buffers and rewind to tick 0.
    pub fn reset(&mut self) {
        self.tiles.iter_mut().for_each(WaveTile::clear);
        self.tick = 0;
        self.phase = TickPhase::Idle;
        tracing::debug!("wave simulator reset");
    }

    /// Settled buffer in global row-major order.
    pub fn snapshot(&self) -> Vec<f32> {
        (0..self.side)
            .flat_map(|y| (0..self.side).map(move |x| self.height_at(x, y)))
            .collect()
    }

    /// `(min, max)` of the settled buffer.
    pub fn extrema(&self) -> (f32, f32) {
        self.tiles
            .iter()
            .flat_map(WaveTile::rows)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// FNV-1a over the tick and the settled buffer, for determinism checks.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&self.tick.to_le_bytes());
        for v in self.snapshot() {
            mix(&v.to_bits().to_le_bytes());
        }
        h
    }
}
