use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::config::LodConfig;
use crate::diff::{LodDiff, diff};
use crate::select::VisibleNode;

/// Opaque slot in the external tile pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileHandle(pub u32);

/// Free list of tile slots that grows when it runs dry.
#[derive(Debug, Clone)]
pub struct TilePool {
    free: Vec<TileHandle>,
    total: u32,
    grow_by: u32,
}

impl TilePool {
    pub fn new(initial: u32, grow_by: u32) -> Self {
        Self {
            // Reversed so handles are handed out lowest first.
            free: (0..initial).rev().map(TileHandle).collect(),
            total: initial,
            grow_by: grow_by.max(1),
        }
    }

    /// Pop a free tile. Second value is true when the pool had to grow.
    pub fn acquire(&mut self) -> (TileHandle, bool) {
        if let Some(tile) = self.free.pop() {
            return (tile, false);
        }
        let tile = TileHandle(self.total);
        let start = self.total + 1;
        self.total += self.grow_by;
        self.free.extend((start..self.total).rev().map(TileHandle));
        tracing::warn!(
            total = self.total,
            added = self.grow_by,
            "tile pool exhausted, growing; raise initial_tiles for this LOD setup"
        );
        (tile, true)
    }

    pub fn release(&mut self, tile: TileHandle) {
        debug_assert!(tile.0 < self.total, "released foreign tile {tile:?}");
        self.free.push(tile);
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}

/// Distance band over which a node morphs towards its parent level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendRange {
    pub near: f32,
    pub far: f32,
}

impl BlendRange {
    /// `far` is the refine distance of the parent depth (the root uses twice
    /// its own); `near` sits `blend_width` of the ring inside `far`.
    pub fn for_depth(depth: u32, distances: &[f32], blend_width: f32) -> Self {
        let d = depth as usize;
        let own = distances.get(d).copied().unwrap_or(0.0);
        let far = match d.checked_sub(1) {
            Some(parent) => distances.get(parent).copied().unwrap_or(own * 2.0),
            None => own * 2.0,
        };
        Self {
            near: far - (far - own) * blend_width,
            far,
        }
    }

    /// 0 inside `near`, 1 at `far` and beyond.
    pub fn morph_factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// A node handed to the external populate stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileAssignment {
    pub node: VisibleNode,
    pub tile: TileHandle,
    pub blend: BlendRange,
}

/// Per-frame streaming statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LodStats {
    pub loaded_this_frame: usize,
    pub unloaded_this_frame: usize,
    pub resident: usize,
    pub pool_total: u32,
    pub pool_free: usize,
    /// Times the pool grew this frame.
    pub pool_grown: usize,
    /// Bookkeeping desyncs since creation.
    pub desyncs: u64,
    pub apply_time: Duration,
}

/// Tracks which nodes are resident and which tile each one holds.
pub struct LodStreamer {
    pool: TilePool,
    assignments: HashMap<VisibleNode, TileHandle>,
    loaded: Vec<VisibleNode>,
    distances: Vec<f32>,
    blend_width: f32,
    stats: LodStats,
}

impl LodStreamer {
    pub fn new(config: &LodConfig, distances: Vec<f32>) -> Self {
        let pool = TilePool::new(config.initial_tiles, config.tile_grow);
        let stats = LodStats {
            pool_total: pool.total(),
            pool_free: pool.available(),
            ..LodStats::default()
        };
        Self {
            pool,
            assignments: HashMap::new(),
            loaded: Vec::new(),
            distances,
            blend_width: config.blend_width,
            stats,
        }
    }

    /// Diff `visible` against the resident set and apply the result.
    pub fn update(&mut self, visible: &[VisibleNode]) -> (LodDiff, Vec<TileAssignment>) {
        let changes = diff(&self.loaded, visible);
        let assignments = self.apply(&changes);
        (changes, assignments)
    }

    /// Release tiles of unloaded nodes, then hand tiles to loaded ones.
    pub fn apply(&mut self, changes: &LodDiff) -> Vec<TileAssignment> {
        let _span = tracing::info_span!("lod_apply").entered();
        let start = Instant::now();
        let mut desyncs = 0;
        let mut grown = 0;

        let mut unloaded = HashSet::with_capacity(changes.to_unload.len());
        for node in &changes.to_unload {
            match self.assignments.remove(node) {
                Some(tile) => {
                    tracing::debug!(
                        position = ?node.bounds.position,
                        depth = node.depth,
                        ?tile,
                        "unloading node"
                    );
                    self.pool.release(tile);
                    unloaded.insert(*node);
                }
                None => {
                    desyncs += 1;
                    tracing::error!(
                        position = ?node.bounds.position,
                        depth = node.depth,
                        "unload of a node without a tile; loaded set has drifted"
                    );
                }
            }
        }
        self.loaded.retain(|n| !unloaded.contains(n));

        let mut assignments = Vec::with_capacity(changes.to_load.len());
        for node in &changes.to_load {
            if let Some(tile) = self.assignments.get(node) {
                desyncs += 1;
                tracing::error!(
                    position = ?node.bounds.position,
                    depth = node.depth,
                    ?tile,
                    "load of a node that already holds a tile"
                );
                continue;
            }
            let (tile, grew) = self.pool.acquire();
            grown += usize::from(grew);
            tracing::debug!(
                position = ?node.bounds.position,
                depth = node.depth,
                ?tile,
                "loading node"
            );
            self.assignments.insert(*node, tile);
            self.loaded.push(*node);
            assignments.push(TileAssignment {
                node: *node,
                tile,
                blend: BlendRange::for_depth(node.depth, &self.distances, self.blend_width),
            });
        }

        self.stats = LodStats {
            loaded_this_frame: assignments.len(),
            unloaded_this_frame: unloaded.len(),
            resident: self.loaded.len(),
            pool_total: self.pool.total(),
            pool_free: self.pool.available(),
            pool_grown: grown,
            desyncs: self.stats.desyncs + desyncs,
            apply_time: start.elapsed(),
        };
        tracing::trace!(
            loaded = self.stats.loaded_this_frame,
            unloaded = self.stats.unloaded_this_frame,
            resident = self.stats.resident,
            "tile assignments applied"
        );
        debug_assert!(desyncs == 0, "{desyncs} tile bookkeeping desync(s) this frame");
        assignments
    }

    /// Resident nodes in load order.
    pub fn loaded(&self) -> &[VisibleNode] {
        &self.loaded
    }

    pub fn tile_for(&self, node: &VisibleNode) -> Option<TileHandle> {
        self.assignments.get(node).copied()
    }

    pub fn is_loaded(&self, node: &VisibleNode) -> bool {
        self.assignments.contains_key(node)
    }

    pub fn stats(&self) -> &LodStats {
        &self.stats
    }

    pub fn pool(&self) -> &TilePool {
        &self.pool
    }
}
