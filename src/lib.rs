#![warn(missing_docs)]

//! 
//! Helpers for running datathons on tabular data.
//! 
//! This crate provides four tools around decision trees
//! and two-feature classifiers.
//! 
//! - `make_colormap`
//!     Builds a piecewise-linear colormap from a sequence of colors
//!     and break points.
//! 
//! - `plot_model_pred_2d`
//!     Draws the decision surface of a classifier over two features,
//!     overlaid with the labeled examples, on any `plotters` backend.
//! 
//! - `create_graph`
//!     Exports a decision tree to a DOT graph,
//!     optionally recolored by the class proportion of each node.
//! 
//! - `prune`
//!     Turns every split that saw too few training examples into a leaf,
//!     while the exported graph keeps the full tree.
//! 
//! ```
//! use datathon::prelude::*;
//! 
//! let colormap = make_colormap(&[
//!     Segment::Color(Rgb::new(1.0, 0.0, 0.0)),
//!     Segment::Stop(0.5),
//!     Segment::Color(Rgb::new(0.0, 0.0, 1.0)),
//! ]).unwrap();
//! assert_eq!(colormap.color_at(0.0), Rgb::new(1.0, 0.0, 0.0));
//! ```

pub mod error;
pub mod constants;
pub mod sample;
pub mod classifier;
pub mod color;
pub mod tree;
pub mod graph;
pub mod surface;
pub mod prelude;


pub use error::{DatathonError, Result};
pub use sample::{Feature, Sample};
pub use classifier::Classifier;


pub use color::{make_colormap, ColorLookup, Colormap, Coolwarm, Segment};
pub use color::{Rgb, Rgba};

pub use surface::{plot_model_pred_2d, ClassifiedGrid, SurfacePlot};

pub use graph::{create_graph, DotGraph};

pub use tree::{prune, DecisionTree, Pruning, TreeNode};
