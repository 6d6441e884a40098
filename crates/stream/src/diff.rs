use std::collections::HashSet;

use crate::select::VisibleNode;

/// Load/unload work between two frames' node sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LodDiff {
    /// Visible now, not loaded before. In visible-set order.
    pub to_load: Vec<VisibleNode>,
    /// Loaded before, no longer visible. In loaded-set order.
    pub to_unload: Vec<VisibleNode>,
}

impl LodDiff {
    pub fn is_empty(&self) -> bool {
        self.to_load.is_empty() && self.to_unload.is_empty()
    }

    /// Total nodes that change residency.
    pub fn churn(&self) -> usize {
        self.to_load.len() + self.to_unload.len()
    }
}

/// Hashed set differences `loaded - visible` and `visible - loaded`.
pub fn diff(loaded: &[VisibleNode], visible: &[VisibleNode]) -> LodDiff {
    let loaded_set: HashSet<&VisibleNode> = loaded.iter().collect();
    let visible_set: HashSet<&VisibleNode> = visible.iter().collect();

    let to_unload = loaded
        .iter()
        .filter(|n| !visible_set.contains(n))
        .copied()
        .collect();
    let to_load = visible
        .iter()
        .filter(|n| !loaded_set.contains(n))
        .copied()
        .collect();
    LodDiff { to_load, to_unload }
}
