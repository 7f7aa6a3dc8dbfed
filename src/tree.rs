//! A trained decision tree stored as flat node arrays,
//! its pruning, and its DOT export.

pub mod criterion;
pub mod node;
pub mod dtree;
pub mod prune;
pub mod export;


pub use criterion::Criterion;
pub use node::{NodeType, TreeNode};
pub use dtree::DecisionTree;
pub use prune::{prune, Pruning};
pub use export::{export_graphviz, ExportOptions};
