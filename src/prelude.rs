//! Exports the helpers, the models, and the traits they work with.
//! 
pub use crate::error::{
    DatathonError,
    Result,
};


pub use crate::sample::{
    Sample,
    Feature,
};


pub use crate::classifier::Classifier;


pub use crate::color::{
    // Colormap trait
    ColorLookup,

    // Custom gradients
    make_colormap,
    Colormap,
    ColorStop,
    Segment,

    // Fixed colormaps
    Coolwarm,

    Rgb,
    Rgba,
};


pub use crate::surface::{
    plot_model_pred_2d,
    ClassifiedGrid,
    SurfacePlot,
};


pub use crate::graph::{
    create_graph,
    DotGraph,
    DotNode,
};


pub use crate::tree::{
    prune,
    Pruning,

    DecisionTree,
    TreeNode,
    Criterion,
    ExportOptions,
    export_graphviz,
};
