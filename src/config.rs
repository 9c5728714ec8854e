use crate::error::{Result, VPTreeError};
use crate::select::SelectingMode;

/// Parameters a tree is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VPTreeConfig {
    /// Maximum number of children of an internal node, at least 2.
    pub tree_ways: usize,
    /// Maximum number of elements stored in a leaf, at least 1.
    pub leaf_capacity: usize,
    pub selecting_mode: SelectingMode,
    /// Seed for vantage point selection. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for VPTreeConfig {
    fn default() -> Self {
        VPTreeConfig {
            tree_ways: 2,
            leaf_capacity: 1,
            selecting_mode: SelectingMode::Random,
            seed: None,
        }
    }
}

impl VPTreeConfig {
    pub fn new(tree_ways: usize, leaf_capacity: usize, selecting_mode: SelectingMode) -> Self {
        VPTreeConfig {
            tree_ways,
            leaf_capacity,
            selecting_mode,
            seed: None,
        }
    }

    pub fn with_tree_ways(mut self, tree_ways: usize) -> Self {
        self.tree_ways = tree_ways;
        self
    }

    pub fn with_leaf_capacity(mut self, leaf_capacity: usize) -> Self {
        self.leaf_capacity = leaf_capacity;
        self
    }

    pub fn with_selecting_mode(mut self, selecting_mode: SelectingMode) -> Self {
        self.selecting_mode = selecting_mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tree_ways < 2 {
            return Err(VPTreeError::InvalidConfiguration(format!(
                "tree_ways must be at least 2, got {}",
                self.tree_ways
            )));
        }
        if self.leaf_capacity < 1 {
            return Err(VPTreeError::InvalidConfiguration(
                "leaf_capacity must be at least 1, got 0".to_string(),
            ));
        }
        Ok(())
    }
}
