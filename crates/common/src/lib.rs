//! Shared types for the seascape core.
//!
//! # Invariants
//! - Node identity is footprint + depth; height fits never change identity.
//! - Morton helpers accept 16-bit coordinates only.
//! - Samplers never fail; out-of-domain positions yield a neutral sample.

pub mod bounds;
pub mod camera;
pub mod error;
pub mod sampler;
pub mod spatial;

pub use bounds::{Bounds, Quadrant};
pub use camera::{CameraInfo, Frustum};
pub use error::{ConfigError, ensure_positive, ensure_power_of_two};
pub use sampler::{HeightSample, HeightSampler, ProceduralConfig, ProceduralSampler};
pub use spatial::{
    TileLayout, box_distance_squared, box_intersects_sphere, checked_morton_code_2d,
    decode_morton_2d, deinterleave_bits, interleave_bits, morton_code_2d,
};

pub fn crate_info() -> &'static str {
    "seascape-common v0.1.0"
}
