use glam::Vec2;
use serde::{Deserialize, Serialize};
use seascape_common::{HeightSample, HeightSampler};

use crate::simulator::WaveSimulator;

/// Reconstruction filter used between grid cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// 4×4 Catmull-Rom with an analytic gradient.
    #[default]
    CatmullRom,
    /// 2×2 bilinear. Cheaper, but heights and gradients differ from the
    /// bicubic surface (gradients are piecewise constant per cell).
    Bilinear,
}

/// Read view of the simulator's settled buffer.
///
/// Heights are divided by the ceiling, so they land in `[-1, 1]`. Positions
/// whose stencil would leave the grid (one cell of margin on every side)
/// return a flat zero sample.
pub struct WaveSampler<'a> {
    sim: &'a WaveSimulator,
    interpolation: Interpolation,
}

impl<'a> WaveSampler<'a> {
    pub fn new(sim: &'a WaveSimulator, interpolation: Interpolation) -> Self {
        Self { sim, interpolation }
    }

    /// Continuous grid coordinate of a world position.
    fn to_grid(&self, world_x: f32, world_z: f32) -> Vec2 {
        let config = self.sim.config();
        (Vec2::new(world_x, world_z) - config.origin) / config.cell_spacing
    }

    /// Integer cell and fractional offset, when the full stencil fits.
    fn cell(&self, grid: Vec2) -> Option<(u32, u32, Vec2)> {
        if !grid.is_finite() {
            return None;
        }
        let base = grid.floor();
        let last_base = self.sim.grid_side() as f32 - 3.0;
        if base.x < 1.0 || base.y < 1.0 || base.x > last_base || base.y > last_base {
            return None;
        }
        Some((base.x as u32, base.y as u32, grid - base))
    }

    fn catmull_rom(&self, x: u32, y: u32, t: Vec2) -> (f32, Vec2) {
        let (wx, dx) = catmull_rom_weights(t.x);
        let (wy, dy) = catmull_rom_weights(t.y);
        let mut h = 0.0;
        let mut grad = Vec2::ZERO;
        for (j, (&wyj, &dyj)) in wy.iter().zip(&dy).enumerate() {
            for (i, (&wxi, &dxi)) in wx.iter().zip(&dx).enumerate() {
                let p = self.sim.height_at(x + i as u32 - 1, y + j as u32 - 1);
                h += wxi * wyj * p;
                grad.x += dxi * wyj * p;
                grad.y += wxi * dyj * p;
            }
        }
        (h, grad)
    }

    fn bilinear(&self, x: u32, y: u32, t: Vec2) -> (f32, Vec2) {
        let p00 = self.sim.height_at(x, y);
        let p10 = self.sim.height_at(x + 1, y);
        let p01 = self.sim.height_at(x, y + 1);
        let p11 = self.sim.height_at(x + 1, y + 1);
        let bottom = p00 + (p10 - p00) * t.x;
        let top = p01 + (p11 - p01) * t.x;
        let h = bottom + (top - bottom) * t.y;
        let grad = Vec2::new(
            (1.0 - t.y) * (p10 - p00) + t.y * (p11 - p01),
            (1.0 - t.x) * (p01 - p00) + t.x * (p11 - p10),
        );
        (h, grad)
    }
}

/// Catmull-Rom weights for taps `-1, 0, 1, 2` and their derivatives in `t`.
fn catmull_rom_weights(t: f32) -> ([f32; 4], [f32; 4]) {
    let t2 = t * t;
    let t3 = t2 * t;
    let w = [
        0.5 * (-t3 + 2.0 * t2 - t),
        0.5 * (3.0 * t3 - 5.0 * t2 + 2.0),
        0.5 * (-3.0 * t3 + 4.0 * t2 + t),
        0.5 * (t3 - t2),
    ];
    let d = [
        0.5 * (-3.0 * t2 + 4.0 * t - 1.0),
        0.5 * (9.0 * t2 - 10.0 * t),
        0.5 * (-9.0 * t2 + 8.0 * t + 1.0),
        0.5 * (3.0 * t2 - 2.0 * t),
    ];
    (w, d)
}

impl HeightSampler for WaveSampler<'_> {
    fn sample(&self, world_x: f32, world_z: f32) -> HeightSample {
        let Some((x, y, t)) = self.cell(self.to_grid(world_x, world_z)) else {
            return self.neutral();
        };
        let (h, grad) = match self.interpolation {
            Interpolation::CatmullRom => self.catmull_rom(x, y, t),
            Interpolation::Bilinear => self.bilinear(x, y, t),
        };
        let config = self.sim.config();
        HeightSample {
            height: (h / config.ceiling).clamp(-1.0, 1.0),
            gradient: grad / (config.ceiling * config.cell_spacing),
        }
    }

    fn neutral(&self) -> HeightSample {
        HeightSample::flat(0.0)
    }
}

impl WaveSimulator {
    /// Sampler over the settled buffer using Catmull-Rom interpolation.
    pub fn sampler(&self) -> WaveSampler<'_> {
        WaveSampler::new(self, Interpolation::CatmullRom)
    }
}
