//! Decision surfaces of classifiers over two features.
//!
//! [`ClassifiedGrid`] evaluates a [`Classifier`](crate::Classifier)
//! on a dense grid spanning the observed feature ranges,
//! and [`plot_model_pred_2d`] draws it with `plotters`,
//! together with the labeled examples and a color bar.

pub mod grid;
pub mod plot;


pub use grid::ClassifiedGrid;
pub use plot::{default_colormap, plot_model_pred_2d, SurfacePlot};
