//! A node of the flat decision tree representation.
use serde::{Serialize, Deserialize};
use std::fmt;


/// Position of a node below its parent in the fitted tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// The root, which has no parent.
    Root,
    /// The child taken when the split test holds.
    Left,
    /// The child taken otherwise.
    Right,
}


/// A node of a [`DecisionTree`](super::DecisionTree).
///
/// `left_child` and `right_child` drive prediction;
/// a node without children is a leaf.
/// `parent_node` and `node_type` record the fitted topology
/// and are never touched by pruning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub(crate) feature: usize,
    pub(crate) threshold: f64,
    pub(crate) impurity: f64,
    pub(crate) n_samples: usize,
    pub(crate) value: Vec<f64>,
    pub(crate) left_child: Option<usize>,
    pub(crate) right_child: Option<usize>,
    pub(crate) parent_node: Option<usize>,
    pub(crate) node_type: NodeType,
}


impl TreeNode {
    /// A leaf holding the per-class sample weights `value`.
    /// The sample count defaults to the rounded sum of `value`.
    pub fn leaf(value: Vec<f64>) -> Self {
        let n_samples = value.iter().sum::<f64>().round() as usize;
        Self {
            feature: 0,
            threshold: 0f64,
            impurity: 0f64,
            n_samples,
            value,
            left_child: None,
            right_child: None,
            parent_node: None,
            node_type: NodeType::Root,
        }
    }


    /// A split sending `x[feature] <= threshold` to `left`
    /// and the rest to `right`.
    pub fn branch(
        feature: usize,
        threshold: f64,
        value: Vec<f64>,
        left: usize,
        right: usize,
    ) -> Self
    {
        let mut node = Self::leaf(value);
        node.feature = feature;
        node.threshold = threshold;
        node.left_child = Some(left);
        node.right_child = Some(right);
        node
    }


    /// Override the number of training samples routed to this node.
    pub fn with_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }


    /// Index of the feature tested at a branch.
    pub fn feature(&self) -> usize {
        self.feature
    }


    /// Split threshold; a sample goes left when its feature is `<=` this.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }


    /// Impurity of the node value.
    pub fn impurity(&self) -> f64 {
        self.impurity
    }


    /// Number of training samples routed to this node.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }


    /// Per-class sample weights.
    pub fn value(&self) -> &[f64] {
        &self.value[..]
    }


    /// Child taken when the test holds; `None` at a leaf.
    pub fn left_child(&self) -> Option<usize> {
        self.left_child
    }


    /// Child taken otherwise; `None` at a leaf.
    pub fn right_child(&self) -> Option<usize> {
        self.right_child
    }


    /// Parent in the fitted tree.
    pub fn parent_node(&self) -> Option<usize> {
        self.parent_node
    }


    /// Position below the parent.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }


    /// Returns `true` if prediction stops at this node.
    pub fn is_leaf(&self) -> bool {
        self.left_child.is_none() && self.right_child.is_none()
    }


    /// Index of the class with the largest weight.
    /// Ties go to the smallest index.
    pub fn majority_class(&self) -> usize {
        self.value.iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(arg, max), (i, &v)| {
                if v > max { (i, v) } else { (arg, max) }
            })
            .0
    }
}


impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.left_child, self.right_child) {
            (Some(left), Some(right)) => write!(
                f,
                "[{} <= {}] yes={left},no={right},samples={}",
                self.feature, self.threshold, self.n_samples,
            ),
            _ => write!(
                f,
                "leaf={:?},samples={}",
                self.value, self.n_samples,
            ),
        }
    }
}
