use seascape_common::{Bounds, ConfigError, HeightSampler};

use crate::config::LodConfig;

/// Index of a node in the [`QuadTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const ROOT: NodeIndex = NodeIndex(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TreeNode {
    pub bounds: Bounds,
    pub depth: u32,
    /// SW, NW, NE, SE. All `None` on a leaf.
    pub children: [Option<NodeIndex>; 4],
}

impl TreeNode {
    fn leaf(bounds: Bounds, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            children: [None; 4],
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// How a node's vertical range is fitted from the height sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightFit {
    /// Samples per axis, corners included.
    pub samples: u32,
    pub scale: f32,
    /// Fraction of the sampled span added above the max. The span is never
    /// taken as less than `scale`, so flat samples still get headroom.
    pub margin: f32,
}

impl HeightFit {
    pub fn from_config(config: &LodConfig) -> Self {
        Self {
            samples: config.fit_samples,
            scale: config.height_scale,
            margin: config.height_margin,
        }
    }

    /// `bounds` with its `y` range replaced by the sampled min/max.
    pub fn fit(&self, bounds: Bounds, sampler: &dyn HeightSampler) -> Bounds {
        let min = bounds.min();
        let extent = bounds.max() - min;
        let steps = (self.samples.max(2) - 1) as f32;
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for j in 0..self.samples.max(2) {
            for i in 0..self.samples.max(2) {
                let x = min.x + extent.x * i as f32 / steps;
                let z = min.z + extent.z * j as f32 / steps;
                let h = sampler.sample(x, z).height * self.scale;
                lo = lo.min(h);
                hi = hi.max(h);
            }
        }
        hi += (hi - lo).max(self.scale) * self.margin;
        bounds.with_height_range(lo, hi)
    }
}

/// Arena quadtree rebuilt from the root every frame.
///
/// Capacity is the node count of a full tree of `max_depth` levels below the
/// root; going past it is a contract violation and panics.
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<TreeNode>,
    root: Bounds,
    max_depth: u32,
    capacity: usize,
}

/// Nodes reserved up front. Larger trees grow on demand up to their capacity.
const INITIAL_RESERVE: usize = 4096;

impl QuadTree {
    pub fn new(root: Bounds, max_depth: u32) -> Result<Self, ConfigError> {
        let capacity = Self::capacity_for(max_depth);
        if capacity > u32::MAX as u64 {
            return Err(ConfigError::TreeTooDeep {
                max_depth,
                nodes: capacity,
            });
        }
        let capacity = capacity as usize;
        let mut nodes = Vec::with_capacity(capacity.min(INITIAL_RESERVE));
        nodes.push(TreeNode::leaf(root, 0));
        Ok(Self {
            nodes,
            root,
            max_depth,
            capacity,
        })
    }

    pub fn from_config(config: &LodConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(config.root, config.max_depth)
    }

    /// `sum_{i=0}^{max_depth} 4^i`, saturating.
    pub fn capacity_for(max_depth: u32) -> u64 {
        let mut total: u64 = 0;
        let mut level: u64 = 1;
        for _ in 0..=max_depth {
            total = total.saturating_add(level);
            level = level.saturating_mul(4);
        }
        total
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_bounds(&self) -> Bounds {
        self.root
    }

    pub fn node(&self, index: NodeIndex) -> &TreeNode {
        &self.nodes[index.index()]
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Drop everything but the root. Keeps the allocation.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0] = TreeNode::leaf(self.root, 0);
    }

    /// Split `parent` into its four quadrants, fitting each child's height
    /// range from `sampler`. Returns the children in SW, NW, NE, SE order.
    pub fn expand_node(
        &mut self,
        parent: NodeIndex,
        sampler: &dyn HeightSampler,
        fit: &HeightFit,
    ) -> [NodeIndex; 4] {
        let node = self.nodes[parent.index()];
        assert!(node.is_leaf(), "node {parent:?} is already expanded");
        assert!(
            self.nodes.len() + 4 <= self.capacity,
            "quadtree capacity {} exceeded",
            self.capacity
        );

        let first = self.nodes.len() as u32;
        for child in node.bounds.quadrants() {
            self.nodes
                .push(TreeNode::leaf(fit.fit(child, sampler), node.depth + 1));
        }
        let children = [0, 1, 2, 3].map(|i| NodeIndex(first + i));
        self.nodes[parent.index()].children = children.map(Some);
        children
    }
}
