//! Defines the decision tree model.
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::criterion::Criterion;
use super::node::{NodeType, TreeNode};
use crate::classifier::Classifier;
use crate::error::{DatathonError, Result};
use crate::Sample;


/// A trained classification tree in the flat layout:
/// node `0` is the root and the children of a node are indices
/// into the same node array.
///
/// The tree is built elsewhere and handed over through
/// [`DecisionTree::from_nodes`] or a JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeParts")]
pub struct DecisionTree {
    pub(super) nodes: Vec<TreeNode>,
    pub(super) classes: Vec<f64>,
    pub(super) n_features: usize,
    pub(super) criterion: Criterion,
    pub(super) min_samples_leaf: usize,
}


/// Unchecked fields read by `serde`,
/// validated before becoming a [`DecisionTree`].
#[derive(Deserialize)]
struct TreeParts {
    nodes: Vec<TreeNode>,
    classes: Vec<f64>,
    n_features: usize,
    criterion: Criterion,
    min_samples_leaf: usize,
}


impl TryFrom<TreeParts> for DecisionTree {
    type Error = DatathonError;
    fn try_from(parts: TreeParts) -> Result<Self> {
        let tree = Self {
            nodes: parts.nodes,
            classes: parts.classes,
            n_features: parts.n_features,
            criterion: parts.criterion,
            min_samples_leaf: parts.min_samples_leaf,
        };
        tree.validate()?;
        Ok(tree)
    }
}


impl DecisionTree {
    /// Build a tree from its nodes.
    ///
    /// The parent links are derived from the children,
    /// the impurities are computed with [`Criterion::Gini`],
    /// and `min_samples_leaf` starts at `1`.
    pub fn from_nodes(
        mut nodes: Vec<TreeNode>,
        classes: Vec<f64>,
        n_features: usize,
    ) -> Result<Self>
    {
        let n_nodes = nodes.len();
        let mut parents = vec![None; n_nodes];

        for (i, node) in nodes.iter().enumerate() {
            let children = match (node.left_child, node.right_child) {
                (None, None) => continue,
                (Some(l), Some(r)) => [(l, NodeType::Left), (r, NodeType::Right)],
                _ => {
                    return Err(invalid(format!("node {i} has a single child")));
                },
            };
            for (child, side) in children {
                if child == 0 || child >= n_nodes {
                    return Err(invalid(format!(
                        "node {i} points to an invalid child {child}"
                    )));
                }
                if parents[child].is_some() {
                    return Err(invalid(format!(
                        "node {child} has more than one parent"
                    )));
                }
                parents[child] = Some((i, side));
            }
        }

        for (node, parent) in nodes.iter_mut().zip(parents) {
            let (parent_node, node_type) = match parent {
                Some((p, side)) => (Some(p), side),
                None => (None, NodeType::Root),
            };
            node.parent_node = parent_node;
            node.node_type = node_type;
        }

        let mut tree = Self {
            nodes,
            classes,
            n_features,
            criterion: Criterion::default(),
            min_samples_leaf: 1,
        };
        tree.update_impurity();
        tree.validate()?;
        Ok(tree)
    }


    /// Set the impurity measure and recompute the node impurities.
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self.update_impurity();
        self
    }


    /// Set the `min_samples_leaf` the tree was trained with.
    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }


    fn update_impurity(&mut self) {
        let criterion = self.criterion;
        self.nodes.iter_mut()
            .for_each(|node| {
                node.impurity = criterion.impurity(&node.value);
            });
    }


    /// Check that the node arrays describe a binary tree rooted at `0`.
    fn validate(&self) -> Result<()> {
        let n_nodes = self.nodes.len();
        let n_classes = self.classes.len();
        if n_nodes == 0 {
            return Err(invalid("the tree has no node".into()));
        }
        if n_classes == 0 {
            return Err(invalid("the tree has no class".into()));
        }
        if self.n_features == 0 {
            return Err(invalid("the tree has no feature".into()));
        }

        let mut sides = HashSet::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.value.len() != n_classes {
                return Err(invalid(format!(
                    "node {i} holds {} class weights, expected {n_classes}",
                    node.value.len()
                )));
            }

            match (i, node.parent_node, node.node_type) {
                (0, None, NodeType::Root) => {},
                (0, _, _) => {
                    return Err(invalid("node 0 must be the root".into()));
                },
                (_, Some(p), side) if p < n_nodes && p != i && side != NodeType::Root => {
                    if !sides.insert((p, side)) {
                        return Err(invalid(format!(
                            "node {p} has two {side:?} children"
                        )));
                    }
                    let parent = &self.nodes[p];
                    if parent.feature >= self.n_features || !parent.threshold.is_finite() {
                        return Err(invalid(format!(
                            "node {p} has an invalid split"
                        )));
                    }
                },
                _ => {
                    return Err(invalid(format!("node {i} has no valid parent")));
                },
            }

            match (node.left_child, node.right_child) {
                (None, None) => {},
                (Some(l), Some(r)) => {
                    for (child, side) in [(l, NodeType::Left), (r, NodeType::Right)] {
                        let linked = self.nodes.get(child)
                            .is_some_and(|c| {
                                c.parent_node == Some(i) && c.node_type == side
                            });
                        if !linked {
                            return Err(invalid(format!(
                                "child {child} of node {i} does not point back"
                            )));
                        }
                    }
                },
                _ => {
                    return Err(invalid(format!("node {i} has a single child")));
                },
            }
        }

        // Every parent chain must reach the root.
        for i in 0..n_nodes {
            let mut current = i;
            let mut steps = 0;
            while let Some(p) = self.nodes[current].parent_node {
                current = p;
                steps += 1;
                if steps > n_nodes {
                    return Err(invalid(format!(
                        "node {i} is part of a cycle"
                    )));
                }
            }
        }
        Ok(())
    }


    /// Returns the nodes.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes[..]
    }


    /// Returns the `i`-th node.
    pub fn node(&self, i: usize) -> Option<&TreeNode> {
        self.nodes.get(i)
    }


    /// Number of nodes, `tree_.node_count`.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }


    /// Returns the class labels, indexed like the node values.
    pub fn classes(&self) -> &[f64] {
        &self.classes[..]
    }


    /// Number of classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }


    /// Number of features seen while fitting.
    pub fn n_features(&self) -> usize {
        self.n_features
    }


    /// Impurity criterion used for the labels.
    pub fn criterion(&self) -> Criterion {
        self.criterion
    }


    /// The largest sample count of a node turned into a leaf.
    pub fn min_samples_leaf(&self) -> usize {
        self.min_samples_leaf
    }


    /// Left child per node, `None` for leaves.
    pub fn children_left(&self) -> Vec<Option<usize>> {
        self.nodes.iter().map(|n| n.left_child).collect()
    }


    /// Right child per node, `None` for leaves.
    pub fn children_right(&self) -> Vec<Option<usize>> {
        self.nodes.iter().map(|n| n.right_child).collect()
    }


    /// Training sample count per node.
    pub fn n_node_samples(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.n_samples).collect()
    }


    /// Children per node in the fitted tree,
    /// ignoring any pruning.
    pub fn fitted_children(&self) -> Vec<[Option<usize>; 2]> {
        let mut children = vec![[None, None]; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            match (node.parent_node, node.node_type) {
                (Some(p), NodeType::Left) => children[p][0] = Some(i),
                (Some(p), NodeType::Right) => children[p][1] = Some(i),
                _ => {},
            }
        }
        children
    }


    /// Nodes reachable from the root when predicting,
    /// in depth-first order, with their depth.
    fn reachable(&self) -> Vec<(usize, usize)> {
        let mut stack = vec![(0, 0)];
        let mut visited = Vec::with_capacity(self.nodes.len());
        while let Some((i, depth)) = stack.pop() {
            visited.push((i, depth));
            let node = &self.nodes[i];
            if let (Some(l), Some(r)) = (node.left_child, node.right_child) {
                stack.push((r, depth + 1));
                stack.push((l, depth + 1));
            }
        }
        visited
    }


    /// Number of leaves reachable when predicting.
    pub fn n_leaves(&self) -> usize {
        self.reachable()
            .into_iter()
            .filter(|&(i, _)| self.nodes[i].is_leaf())
            .count()
    }


    /// Depth of the tree as used for prediction.
    pub fn depth(&self) -> usize {
        self.reachable()
            .into_iter()
            .map(|(_, depth)| depth)
            .max()
            .unwrap_or(0)
    }


    /// Write the tree to a JSON file.
    pub fn to_json_file<P>(&self, path: P) -> Result<()>
        where P: AsRef<Path>
    {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }


    /// Read a tree from a JSON file written by [`Self::to_json_file`].
    pub fn from_json_file<P>(path: P) -> Result<Self>
        where P: AsRef<Path>
    {
        let file = File::open(path)?;
        let tree = serde_json::from_reader(BufReader::new(file))?;
        Ok(tree)
    }
}


fn invalid(message: String) -> DatathonError {
    DatathonError::InvalidTree(message)
}


impl Classifier for DecisionTree {
    fn predict(&self, sample: &Sample, row: usize) -> Result<f64> {
        let (n_sample, n_feature) = sample.shape();
        if n_feature != self.n_features {
            return Err(DatathonError::InvalidSample(format!(
                "the tree expects {} features, got {n_feature}",
                self.n_features
            )));
        }
        if row >= n_sample {
            return Err(DatathonError::InvalidInput(
                "row".into(),
                format!("{row} is out of range for {n_sample} examples"),
            ));
        }

        let features = sample.features();
        let mut node = &self.nodes[0];
        while let (Some(l), Some(r)) = (node.left_child, node.right_child) {
            let x = features[node.feature][row];
            node = if x <= node.threshold {
                &self.nodes[l]
            } else {
                &self.nodes[r]
            };
        }
        Ok(self.classes[node.majority_class()])
    }


    fn predict_all(&self, sample: &Sample) -> Result<Vec<f64>> {
        let n_sample = sample.shape().0;
        (0..n_sample).into_par_iter()
            .map(|row| self.predict(sample, row))
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Feature;

    //     0: x <= 0.5
    //    /           \
    //  1: [3, 0]   2: y <= 1.5
    //              /          \
    //          3: [0, 2]    4: [1, 0]
    fn toy_tree() -> DecisionTree {
        let nodes = vec![
            TreeNode::branch(0, 0.5, vec![4.0, 2.0], 1, 2),
            TreeNode::leaf(vec![3.0, 0.0]),
            TreeNode::branch(1, 1.5, vec![1.0, 2.0], 3, 4),
            TreeNode::leaf(vec![0.0, 2.0]),
            TreeNode::leaf(vec![1.0, 0.0]),
        ];
        DecisionTree::from_nodes(nodes, vec![-1.0, 1.0], 2).unwrap()
    }

    #[test]
    fn parents_are_linked() {
        let tree = toy_tree();
        assert_eq!(tree.node(2).unwrap().parent_node(), Some(0));
        assert_eq!(tree.node(2).unwrap().node_type(), NodeType::Right);
        assert_eq!(tree.node(3).unwrap().node_type(), NodeType::Left);
        assert_eq!(tree.fitted_children()[2], [Some(3), Some(4)]);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn impurity_follows_the_criterion() {
        let tree = toy_tree();
        let root = tree.node(0).unwrap().impurity();
        assert!((root - (1.0 - (4.0f64 / 9.0) - (1.0 / 9.0))).abs() < 1e-12);

        let tree = tree.with_criterion(Criterion::Entropy);
        assert!((tree.node(0).unwrap().impurity() - 0.918_295_8).abs() < 1e-6);
    }

    #[test]
    fn predicts_by_walking_the_splits() {
        let tree = toy_tree();
        let x = Feature::from_vals("x", vec![0.0, 1.0, 1.0]);
        let y = Feature::from_vals("y", vec![9.0, 1.0, 2.0]);
        let sample = Sample::from_columns(vec![x, y], Vec::new()).unwrap();

        assert_eq!(tree.predict_all(&sample).unwrap(), vec![-1.0, 1.0, -1.0]);
        assert!(tree.predict(&sample, 3).is_err());
    }

    #[test]
    fn rejects_malformed_trees() {
        let single_child = vec![
            TreeNode { right_child: None, ..TreeNode::branch(0, 0.5, vec![1.0], 1, 1) },
            TreeNode::leaf(vec![1.0]),
        ];
        assert!(DecisionTree::from_nodes(single_child, vec![0.0], 1).is_err());

        let shared_child = vec![
            TreeNode::branch(0, 0.5, vec![1.0], 1, 1),
            TreeNode::leaf(vec![1.0]),
        ];
        assert!(DecisionTree::from_nodes(shared_child, vec![0.0], 1).is_err());

        let out_of_range = vec![TreeNode::branch(0, 0.5, vec![1.0], 1, 2)];
        assert!(DecisionTree::from_nodes(out_of_range, vec![0.0], 1).is_err());

        let orphan = vec![TreeNode::leaf(vec![1.0]), TreeNode::leaf(vec![1.0])];
        assert!(DecisionTree::from_nodes(orphan, vec![0.0], 1).is_err());

        let wrong_classes = vec![TreeNode::leaf(vec![1.0, 2.0])];
        assert!(DecisionTree::from_nodes(wrong_classes, vec![0.0], 1).is_err());

        let bad_feature = vec![
            TreeNode::branch(3, 0.5, vec![2.0], 1, 2),
            TreeNode::leaf(vec![1.0]),
            TreeNode::leaf(vec![1.0]),
        ];
        assert!(DecisionTree::from_nodes(bad_feature, vec![0.0], 1).is_err());

        assert!(DecisionTree::from_nodes(Vec::new(), vec![0.0], 1).is_err());
    }

    #[test]
    fn json_round_trip_keeps_the_tree() {
        let tree = toy_tree().with_min_samples_leaf(2);
        let json = serde_json::to_string(&tree).unwrap();
        let back: DecisionTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn json_with_broken_links_is_rejected() {
        let mut tree = toy_tree();
        tree.nodes[3].parent_node = Some(1);
        let json = serde_json::to_string(&tree).unwrap();
        assert!(serde_json::from_str::<DecisionTree>(&json).is_err());
    }
}
