//! Streaming: quadtree LOD selection, load/unload diffing, tile pool handoff.
//!
//! # Invariants
//! - The tree is rebuilt from the root every frame; nodes live for one frame.
//! - Node identity is footprint + depth, so height refits never cause churn.
//! - Every resident node holds exactly one tile, and no tile is shared.

mod config;
mod diff;
mod error;
mod frame;
mod pool;
mod select;
mod timing;
mod tree;

pub use config::LodConfig;
pub use diff::{LodDiff, diff};
pub use error::StreamError;
pub use frame::{FramePipeline, FrameReport, SeascapeConfig};
pub use pool::{BlendRange, LodStats, LodStreamer, TileAssignment, TileHandle, TilePool};
pub use select::{LodSelector, VisibleNode, expand, lod_distances};
pub use timing::{FrameTimer, StageTimings};
pub use tree::{HeightFit, NodeIndex, QuadTree, TreeNode};

pub fn crate_info() -> &'static str {
    "seascape-stream v0.1.0"
}
