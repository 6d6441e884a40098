use bytemuck::{Pod, Zeroable};

use crate::simulator::WaveSimulator;

/// Two-channel 8-bit texel: red carries crests, green carries troughs.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rg8 {
    pub r: u8,
    pub g: u8,
}

/// Map a height in `[-ceiling, ceiling]` to a texel.
pub fn encode_height(value: f32, ceiling: f32) -> Rg8 {
    let t = (value / ceiling).clamp(-1.0, 1.0);
    let level = |x: f32| (x * 255.0).round() as u8;
    if t >= 0.0 {
        Rg8 { r: level(t), g: 0 }
    } else {
        Rg8 { r: 0, g: level(-t) }
    }
}

/// Reinterpret texels as raw bytes for upload or dumping.
pub fn as_bytes(texels: &[Rg8]) -> &[u8] {
    bytemuck::cast_slice(texels)
}

impl WaveSimulator {
    /// Settled buffer as a `grid_side()²` row-major image.
    pub fn render_visualization(&self) -> Vec<Rg8> {
        let ceiling = self.config().ceiling;
        self.snapshot()
            .into_iter()
            .map(|v| encode_height(v, ceiling))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ImpulseConfig, WaveConfig};
    use crate::impulse::Impulse;
    use glam::Vec2;

    #[test]
    fn encodes_sign_into_channels() {
        assert_eq!(encode_height(0.0, 4.0), Rg8 { r: 0, g: 0 });
        assert_eq!(encode_height(4.0, 4.0), Rg8 { r: 255, g: 0 });
        assert_eq!(encode_height(-2.0, 4.0), Rg8 { r: 0, g: 128 });
        assert_eq!(encode_height(-40.0, 4.0), Rg8 { r: 0, g: 255 });
    }

    #[test]
    fn bytes_are_interleaved() {
        let texels = [Rg8 { r: 1, g: 2 }, Rg8 { r: 3, g: 4 }];
        assert_eq!(as_bytes(&texels), &[1, 2, 3, 4]);
    }

    #[test]
    fn image_covers_the_grid() {
        let mut sim = WaveSimulator::new(WaveConfig {
            tile_resolution: 8,
            tiles_per_side: 2,
            block_size: 2,
            impulse: ImpulseConfig {
                period: 0,
                ..ImpulseConfig::default()
            },
            ..WaveConfig::default()
        })
        .unwrap();
        sim.splash(Impulse {
            center: Vec2::new(7.0, 7.0),
            radius: 3.0,
            amplitude: 4.0,
        });
        let image = sim.render_visualization();
        let side = sim.grid_side() as usize;
        assert_eq!(image.len(), side * side);
        assert_eq!(image[7 * side + 7], Rg8 { r: 255, g: 0 });
        assert_eq!(image[0], Rg8::default());
    }
}
