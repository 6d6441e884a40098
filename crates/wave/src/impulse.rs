use glam::Vec2;
use std::f32::consts::PI;

use crate::config::ImpulseConfig;
use crate::rng::TickRng;

/// Ring frequency of the ripple profile. At this value the windowed cosine
/// integrates to zero over the disc.
const RING_FREQUENCY: f32 = 1.144;

/// A radial ripple added to the settled buffer before propagation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impulse {
    /// Center in global grid cells.
    pub center: Vec2,
    /// Radius in cells.
    pub radius: f32,
    /// Signed peak height.
    pub amplitude: f32,
}

impl Impulse {
    /// Whether `cell` lies strictly inside the ripple's disc.
    pub fn covers(&self, cell: Vec2) -> bool {
        cell.distance(self.center) < self.radius
    }

    /// Windowed cosine: full amplitude at the center, a trough ring of the
    /// opposite sign, zero at the rim.
    pub fn contribution(&self, cell: Vec2) -> f32 {
        let d = cell.distance(self.center);
        if d >= self.radius {
            return 0.0;
        }
        let u = d / self.radius;
        let window = 0.5 * (1.0 + (PI * u).cos());
        self.amplitude * (RING_FREQUENCY * PI * u).cos() * window
    }

    /// Mean contribution over the covered cells of a `side²` grid.
    ///
    /// Subtracting it from every covered cell makes the ripple add no net
    /// volume, including when the disc is clipped by the domain edge.
    pub fn grid_mean(&self, side: u32) -> f32 {
        let (x0, x1) = self.cell_span(self.center.x, side);
        let (y0, y1) = self.cell_span(self.center.y, side);
        let mut sum = 0.0;
        let mut count = 0u32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let cell = Vec2::new(x as f32, y as f32);
                if self.covers(cell) {
                    sum += self.contribution(cell);
                    count += 1;
                }
            }
        }
        if count == 0 { 0.0 } else { sum / count as f32 }
    }

    /// Inclusive cell range touched along one axis, clipped to `[0, side)`.
    pub fn cell_span(&self, axis_center: f32, side: u32) -> (u32, u32) {
        let lo = (axis_center - self.radius).floor().max(0.0) as u32;
        let hi = ((axis_center + self.radius).ceil().max(0.0) as u32).min(side - 1);
        (lo, hi)
    }
}

/// Ripples scheduled for `tick`.
///
/// Draws come from a generator built from `(seed, tick)` alone, so the result
/// is the same however the ticks before it were scheduled.
pub fn impulses_for_tick(config: &ImpulseConfig, seed: u64, tick: u64, side: u32) -> Vec<Impulse> {
    if config.period == 0 || tick % config.period as u64 != 0 {
        return Vec::new();
    }
    let mut rng = TickRng::new(seed, tick);
    let extent = (side - 1) as f32;
    (0..config.count)
        .map(|_| {
            let center = Vec2::new(rng.range(0.0, extent), rng.range(0.0, extent));
            let radius = rng.range(config.min_radius, config.max_radius);
            let magnitude = rng.range(config.min_amplitude, config.max_amplitude);
            let amplitude = if rng.coin() { magnitude } else { -magnitude };
            Impulse {
                center,
                radius,
                amplitude,
            }
        })
        .collect()
}
