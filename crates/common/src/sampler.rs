use glam::Vec2;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Height and slope at a world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightSample {
    /// Normalized height; the range depends on the producer.
    pub height: f32,
    /// `(d/dx, d/dz)` of the normalized height per world unit.
    pub gradient: Vec2,
}

impl HeightSample {
    pub const fn flat(height: f32) -> Self {
        Self {
            height,
            gradient: Vec2::ZERO,
        }
    }
}

/// Capability: "given world `(x, z)`, return a height and its gradient".
///
/// Implementations never fail. Positions outside the backing domain return the
/// sampler's neutral value with a zero gradient.
pub trait HeightSampler: Send + Sync {
    fn sample(&self, world_x: f32, world_z: f32) -> HeightSample;

    /// Value returned for positions the sampler cannot answer.
    fn neutral(&self) -> HeightSample;
}

/// Tuning for [`ProceduralSampler`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProceduralConfig {
    pub seed: u32,
    /// Noise frequency in cycles per world unit.
    pub frequency: f64,
    pub octaves: usize,
    /// Finite-difference step for the gradient, in world units.
    pub gradient_step: f32,
}

impl Default for ProceduralConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            frequency: 1.0 / 512.0,
            octaves: 5,
            gradient_step: 1.0,
        }
    }
}

/// Fractal Perlin heightfield with heights in `[0, 1]`.
pub struct ProceduralSampler {
    noise: Fbm<Perlin>,
    gradient_step: f32,
}

impl ProceduralSampler {
    pub fn new(config: ProceduralConfig) -> Self {
        let noise = Fbm::<Perlin>::new(config.seed)
            .set_octaves(config.octaves.max(1))
            .set_frequency(config.frequency);
        Self {
            noise,
            gradient_step: config.gradient_step.max(f32::EPSILON),
        }
    }

    fn height(&self, x: f32, z: f32) -> f32 {
        let n = self.noise.get([x as f64, z as f64]) as f32;
        (0.5 + 0.5 * n).clamp(0.0, 1.0)
    }
}

impl Default for ProceduralSampler {
    fn default() -> Self {
        Self::new(ProceduralConfig::default())
    }
}

impl HeightSampler for ProceduralSampler {
    fn sample(&self, world_x: f32, world_z: f32) -> HeightSample {
        if !world_x.is_finite() || !world_z.is_finite() {
            return self.neutral();
        }
        let h = self.gradient_step;
        let dx = self.height(world_x + h, world_z) - self.height(world_x - h, world_z);
        let dz = self.height(world_x, world_z + h) - self.height(world_x, world_z - h);
        HeightSample {
            height: self.height(world_x, world_z),
            gradient: Vec2::new(dx, dz) / (2.0 * h),
        }
    }

    fn neutral(&self) -> HeightSample {
        HeightSample::flat(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heights_stay_normalized() {
        let sampler = ProceduralSampler::default();
        for i in 0..200 {
            let x = i as f32 * 37.3 - 3000.0;
            let z = i as f32 * -11.9 + 500.0;
            let s = sampler.sample(x, z);
            assert!((0.0..=1.0).contains(&s.height), "height {} at ({x}, {z})", s.height);
            assert!(s.gradient.is_finite());
        }
    }

    #[test]
    fn same_seed_same_surface() {
        let a = ProceduralSampler::default();
        let b = ProceduralSampler::default();
        assert_eq!(a.sample(123.4, -56.7), b.sample(123.4, -56.7));
    }

    #[test]
    fn non_finite_input_is_neutral() {
        let sampler = ProceduralSampler::default();
        assert_eq!(sampler.sample(f32::NAN, 0.0), sampler.neutral());
        assert_eq!(sampler.sample(0.0, f32::INFINITY), HeightSample::flat(0.5));
    }

    #[test]
    fn gradient_tracks_finite_difference() {
        let sampler = ProceduralSampler::default();
        let (x, z) = (301.0, -77.0);
        let s = sampler.sample(x, z);
        let e = 4.0;
        let ahead = sampler.sample(x + e, z).height;
        let behind = sampler.sample(x - e, z).height;
        let coarse = (ahead - behind) / (2.0 * e);
        assert!((s.gradient.x - coarse).abs() < 0.01);
    }
}
