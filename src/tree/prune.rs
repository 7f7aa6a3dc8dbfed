//! Post-hoc pruning by sample count.
//!
//! A pruned node keeps its split in the fitted topology,
//! so the exported graph still shows the full tree,
//! but prediction stops at it.
use log::{debug, info};

use super::dtree::DecisionTree;


/// What [`DecisionTree::prune`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pruning {
    /// The threshold was raised and `n_new_leaves` splits were cut.
    Applied {
        /// The new stored level.
        min_samples_leaf: usize,
        /// Branches turned into leaves.
        n_new_leaves: usize,
    },
    /// The stored level `current` is not below the requested one.
    AlreadyPruned {
        /// The stored level, left unchanged.
        current: usize,
    },
}


impl DecisionTree {
    /// Returns a copy of `self` in which every node routed at most
    /// `min_samples_leaf` training samples is a leaf.
    ///
    /// Pruning is monotonic: if `min_samples_leaf` does not exceed the
    /// level stored in the tree, the copy is identical to `self`.
    pub fn prune(&self, min_samples_leaf: usize) -> (Self, Pruning) {
        let current = self.min_samples_leaf;
        if current >= min_samples_leaf {
            info!("Decision tree is pruned at an equal or higher level.");
            return (self.clone(), Pruning::AlreadyPruned { current });
        }

        let mut tree = self.clone();
        tree.min_samples_leaf = min_samples_leaf;

        let mut n_new_leaves = 0;
        tree.nodes.iter_mut()
            .filter(|node| node.n_samples <= min_samples_leaf)
            .for_each(|node| {
                if !node.is_leaf() { n_new_leaves += 1; }
                node.left_child = None;
                node.right_child = None;
            });

        debug!(
            "pruned at min_samples_leaf = {min_samples_leaf}, \
             {n_new_leaves} split(s) turned into leaves"
        );

        (tree, Pruning::Applied { min_samples_leaf, n_new_leaves })
    }
}


/// Prune `tree` at `min_samples_leaf`. See [`DecisionTree::prune`].
pub fn prune(tree: &DecisionTree, min_samples_leaf: usize)
    -> (DecisionTree, Pruning)
{
    tree.prune(min_samples_leaf)
}
