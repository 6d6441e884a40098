//! Developer tooling: read-only inspectors over LOD selections and wave state.
//!
//! # Invariants
//! - Inspectors never mutate what they look at.

mod inspector;

pub use inspector::{LodInspector, LodSummary, WaveInspector, WaveSummary};

pub fn crate_info() -> &'static str {
    "seascape-tools v0.1.0"
}
