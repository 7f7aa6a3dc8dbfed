//! DOT graphs of decision trees.
//!
//! [`create_graph`] exports a [`DecisionTree`](crate::tree::DecisionTree)
//! to a [`DotGraph`] that can be recolored, written to a file,
//! or rendered with Graphviz.

pub mod dot;
mod parser;
pub mod render;


pub use dot::{Attributes, DotEdge, DotGraph, DotNode};
pub use render::{create_graph, parse_value_counts, recolor_by_class_proportion};
