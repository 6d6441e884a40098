//! Wave simulation: tiled finite-difference height field with open edges.
//!
//! # Invariants
//! - Every settled value lies in `[-ceiling, ceiling]`.
//! - Cells shared by two or four tiles hold bit-identical values.
//! - Same config and tick count give the same buffers, whatever the thread count.
//! - Impulses for a tick depend only on `(seed, tick)`.

pub mod buffer;
pub mod config;
pub mod impulse;
pub mod rng;
pub mod sampler;
pub mod simulator;
pub mod tile;
pub mod visualize;

pub use buffer::PingPong;
pub use config::{ImpulseConfig, WaveConfig};
pub use impulse::{Impulse, impulses_for_tick};
pub use rng::TickRng;
pub use sampler::{Interpolation, WaveSampler};
pub use simulator::{TickPhase, WaveSimulator};
pub use tile::{WaveTile, absorbing_step, wave_step};
pub use visualize::{Rg8, as_bytes, encode_height};

pub fn crate_info() -> &'static str {
    "seascape-wave v0.1.0"
}
