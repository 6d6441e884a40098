use seascape_common::{Bounds, CameraInfo, ConfigError, HeightSampler, box_intersects_sphere};

use crate::config::LodConfig;
use crate::tree::{HeightFit, NodeIndex, QuadTree};

/// One resident LOD cell. Identity is footprint + depth; the fitted height
/// range does not take part in equality or hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibleNode {
    pub bounds: Bounds,
    pub depth: u32,
}

/// Per-depth refine distances: the last entry is `base`, each shallower
/// level doubles the one below it.
pub fn lod_distances(num_lods: u32, base: f32) -> Vec<f32> {
    let mut distances = vec![base; num_lods as usize];
    for i in (0..distances.len().saturating_sub(1)).rev() {
        distances[i] = distances[i + 1] * 2.0;
    }
    distances
}

/// Walk the tree from a freshly cleared root and return the visible set.
///
/// Uses an explicit stack. A node is refined when the camera lies within its
/// depth's distance of the node's box; otherwise, or at the deepest level, it
/// is emitted as visible. Output order is depth-first, SW before NW, NE, SE.
pub fn expand(
    tree: &mut QuadTree,
    camera: &CameraInfo,
    distances: &[f32],
    sampler: &dyn HeightSampler,
    fit: &HeightFit,
) -> Vec<VisibleNode> {
    assert!(
        distances.len() >= tree.max_depth() as usize,
        "need {} LOD distances, got {}",
        tree.max_depth(),
        distances.len()
    );
    tree.clear();
    let deepest = tree.max_depth().saturating_sub(1);

    let mut visible = Vec::new();
    let mut stack = vec![NodeIndex::ROOT];
    while let Some(index) = stack.pop() {
        let node = *tree.node(index);
        let refine = node.depth < deepest
            && box_intersects_sphere(
                node.bounds.min(),
                node.bounds.max(),
                camera.position,
                distances[node.depth as usize],
            );
        if refine {
            let children = tree.expand_node(index, sampler, fit);
            stack.extend(children.iter().rev());
        } else {
            visible.push(VisibleNode {
                bounds: node.bounds,
                depth: node.depth,
            });
        }
    }

    tracing::trace!(nodes = tree.len(), visible = visible.len(), "lod expansion complete");
    visible
}

/// Owns the per-frame tree and the derived distance table.
#[derive(Debug, Clone)]
pub struct LodSelector {
    tree: QuadTree,
    distances: Vec<f32>,
    fit: HeightFit,
}

impl LodSelector {
    pub fn new(config: &LodConfig) -> Result<Self, ConfigError> {
        let tree = QuadTree::from_config(config)?;
        Ok(Self {
            tree,
            distances: lod_distances(config.max_depth, config.lod_zero_range),
            fit: HeightFit::from_config(config),
        })
    }

    pub fn select(&mut self, camera: &CameraInfo, sampler: &dyn HeightSampler) -> Vec<VisibleNode> {
        let _span = tracing::info_span!("lod_select").entered();
        expand(&mut self.tree, camera, &self.distances, sampler, &self.fit)
    }

    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    pub fn tree(&self) -> &QuadTree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec3, Vec3};
    use seascape_common::{HeightSample, box_distance_squared};
    use std::collections::HashSet;

    struct Flat;

    impl HeightSampler for Flat {
        fn sample(&self, _x: f32, _z: f32) -> HeightSample {
            HeightSample::flat(0.0)
        }

        fn neutral(&self) -> HeightSample {
            HeightSample::flat(0.0)
        }
    }

    fn config(max_depth: u32) -> LodConfig {
        LodConfig {
            max_depth,
            lod_zero_range: 32.0,
            root: Bounds::new(IVec3::new(-2048, 0, -2048), IVec3::new(4096, 512, 4096)),
            ..LodConfig::default()
        }
    }

    fn per_depth(visible: &[VisibleNode], max_depth: u32) -> Vec<usize> {
        let mut counts = vec![0; max_depth as usize];
        for node in visible {
            counts[node.depth as usize] += 1;
        }
        counts
    }

    #[test]
    fn distances_double_towards_the_root() {
        assert_eq!(lod_distances(4, 32.0), vec![256.0, 128.0, 64.0, 32.0]);
        assert_eq!(lod_distances(1, 5.0), vec![5.0]);
        assert!(lod_distances(0, 5.0).is_empty());
        for n in 1..12 {
            let d = lod_distances(n, 3.5);
            assert_eq!(d[n as usize - 1], 3.5);
            for w in d.windows(2) {
                assert!(w[0] > w[1]);
                assert_eq!(w[0], w[1] * 2.0);
            }
        }
    }

    #[test]
    fn camera_at_origin_builds_rings() {
        let mut selector = LodSelector::new(&config(4)).unwrap();
        assert_eq!(selector.distances(), &[256.0, 128.0, 64.0, 32.0]);
        let visible = selector.select(&CameraInfo::at(Vec3::ZERO), &Flat);
        // Depth 1 all touch the origin; of the 16 depth-2 cells only the four
        // meeting at the origin lie within 64 units.
        assert_eq!(per_depth(&visible, 4), vec![0, 0, 12, 16]);
        for node in &visible {
            assert_eq!(node.bounds.footprint_size(), 4096 >> node.depth);
        }
        let touching_origin = visible
            .iter()
            .filter(|n| box_distance_squared(n.bounds.min(), n.bounds.max(), Vec3::ZERO) == 0.0)
            .count();
        assert_eq!(touching_origin, 4);
        assert!(
            visible
                .iter()
                .filter(|n| n.depth == 2)
                .all(|n| box_distance_squared(n.bounds.min(), n.bounds.max(), Vec3::ZERO) > 64.0 * 64.0)
        );
    }

    #[test]
    fn deeper_trees_nest_one_ring_per_level() {
        let mut selector = LodSelector::new(&config(6)).unwrap();
        let visible = selector.select(&CameraInfo::at(Vec3::ZERO), &Flat);
        assert_eq!(per_depth(&visible, 6), vec![0, 0, 12, 12, 12, 16]);
    }

    #[test]
    fn visible_set_tiles_the_root_exactly() {
        let cfg = config(6);
        let mut selector = LodSelector::new(&cfg).unwrap();
        let camera = CameraInfo::at(Vec3::new(300.0, 10.0, -700.0));
        let visible = selector.select(&camera, &Flat);

        let area: i64 = visible.iter().map(|n| n.bounds.footprint_area()).sum();
        assert_eq!(area, cfg.root.footprint_area());
        for (i, a) in visible.iter().enumerate() {
            assert!(cfg.root.contains_footprint(&a.bounds));
            for b in &visible[i + 1..] {
                assert!(!a.bounds.overlaps_footprint(&b.bounds));
            }
        }
    }

    #[test]
    fn stopped_nodes_are_out_of_range() {
        let mut selector = LodSelector::new(&config(6)).unwrap();
        let camera = CameraInfo::at(Vec3::new(300.0, 10.0, -700.0));
        let visible = selector.select(&camera, &Flat);
        let distances = selector.distances().to_vec();
        let deepest = 5;
        assert!(visible.iter().any(|n| n.depth == deepest));
        for node in visible.iter().filter(|n| n.depth < deepest) {
            let d2 = box_distance_squared(node.bounds.min(), node.bounds.max(), camera.position);
            let r = distances[node.depth as usize];
            assert!(d2 > r * r, "{node:?} should have been refined");
        }
    }

    #[test]
    fn same_camera_gives_same_set() {
        let mut selector = LodSelector::new(&config(5)).unwrap();
        let camera = CameraInfo::at(Vec3::new(-123.0, 0.0, 456.0));
        let a = selector.select(&camera, &Flat);
        let b = selector.select(&camera, &Flat);
        assert_eq!(a, b);
        let unique: HashSet<_> = a.iter().collect();
        assert_eq!(unique.len(), a.len());
    }

    #[test]
    fn far_camera_keeps_the_root() {
        let mut selector = LodSelector::new(&config(4)).unwrap();
        let visible = selector.select(&CameraInfo::at(Vec3::new(1.0e5, 0.0, 0.0)), &Flat);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].depth, 0);
        assert_eq!(selector.tree().len(), 1);
    }

    #[test]
    fn single_level_never_refines() {
        let mut selector = LodSelector::new(&config(1)).unwrap();
        let visible = selector.select(&CameraInfo::at(Vec3::ZERO), &Flat);
        assert_eq!(visible.len(), 1);
    }
}
