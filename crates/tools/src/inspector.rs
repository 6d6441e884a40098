use glam::Vec3;
use seascape_common::CameraInfo;
use seascape_stream::VisibleNode;
use seascape_wave::WaveSimulator;

/// Inspector over one frame's visible set.
pub struct LodInspector;

impl LodInspector {
    pub fn summary(visible: &[VisibleNode], camera: &CameraInfo) -> LodSummary {
        let depth_count = visible.iter().map(|n| n.depth as usize + 1).max().unwrap_or(0);
        let mut per_depth = vec![0; depth_count];
        for node in visible {
            per_depth[node.depth as usize] += 1;
        }
        LodSummary {
            nodes: visible.len(),
            per_depth,
            area: visible.iter().map(|n| n.bounds.footprint_area()).sum(),
            in_view: visible.iter().filter(|n| camera.may_see(&n.bounds)).count(),
        }
    }

    /// The node whose footprint holds world `(x, z)`.
    pub fn node_at(visible: &[VisibleNode], position: Vec3) -> Option<VisibleNode> {
        visible.iter().copied().find(|n| {
            let min = n.bounds.min();
            let max = n.bounds.max();
            (min.x..max.x).contains(&position.x) && (min.z..max.z).contains(&position.z)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LodSummary {
    pub nodes: usize,
    /// Node count indexed by depth.
    pub per_depth: Vec<usize>,
    /// Covered footprint area in square world units.
    pub area: i64,
    /// Nodes inside the camera frustum (all of them without one).
    pub in_view: usize,
}

impl std::fmt::Display for LodSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LOD: nodes={} in_view={} area={} per_depth={:?}",
            self.nodes, self.in_view, self.area, self.per_depth
        )
    }
}

/// Inspector over the wave simulation's settled buffer.
pub struct WaveInspector;

impl WaveInspector {
    pub fn summary(sim: &WaveSimulator) -> WaveSummary {
        let snapshot = sim.snapshot();
        let (min, max) = sim.extrema();
        let mean_square =
            snapshot.iter().map(|&v| (v as f64) * (v as f64)).sum::<f64>() / snapshot.len() as f64;
        WaveSummary {
            tick: sim.tick(),
            seed: sim.config().seed,
            side: sim.grid_side(),
            min,
            max,
            rms: mean_square.sqrt() as f32,
            hash: sim.state_hash(),
        }
    }

    /// Settled height of a global cell, if it exists.
    pub fn probe(sim: &WaveSimulator, x: u32, y: u32) -> Option<f32> {
        let side = sim.grid_side();
        (x < side && y < side).then(|| sim.height_at(x, y))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveSummary {
    pub tick: u64,
    pub seed: u64,
    pub side: u32,
    pub min: f32,
    pub max: f32,
    pub rms: f32,
    pub hash: u64,
}

impl std::fmt::Display for WaveSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Wave: tick={} seed={} grid={}x{} min={:.4} max={:.4} rms={:.4} hash={:016x}",
            self.tick, self.seed, self.side, self.side, self.min, self.max, self.rms, self.hash
        )
    }
}
