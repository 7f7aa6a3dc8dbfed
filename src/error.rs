//! Errors
//!
//! Error type shared by every helper in this crate.
use thiserror::Error;

/// A specialized `Result` whose error is [`DatathonError`].
pub type Result<T> = std::result::Result<T, DatathonError>;

/// Errors raised by the datathon helpers.
#[derive(Debug, Error)]
pub enum DatathonError {
    /// The color sequence given to `make_colormap` is malformed.
    #[error("Invalid colormap sequence: {0}")]
    InvalidColormap(String),
    /// The sample does not have the shape an operation requires.
    #[error("Invalid sample: {0}")]
    InvalidSample(String),
    /// The node arrays do not describe a binary tree.
    #[error("Invalid decision tree: {0}")]
    InvalidTree(String),
    /// First value is the name of the parameter, second is the reason.
    #[error("Invalid value passed for {0}: {1}")]
    InvalidInput(String, String),
    /// A node label does not carry a `value = [...]` count list.
    #[error("Node {node} has a malformed label {label:?}")]
    MalformedLabel {
        /// Identifier of the offending node.
        node: String,
        /// The label text.
        label: String,
    },
    /// The DOT text could not be parsed.
    #[error("DOT syntax error at byte {offset}: {message}")]
    DotSyntax {
        /// Byte offset into the DOT text.
        offset: usize,
        /// What the parser expected.
        message: String,
    },
    /// The classifier failed to predict.
    #[error("Prediction failed: {0}")]
    Predict(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The drawing backend failed.
    #[error("Plotting failed: {0}")]
    Plot(String),
    /// Graphviz exited with an error.
    #[error("Graphviz `dot` failed: {0}")]
    Render(String),
    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// (De)serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Error raised by `polars` while reading a data frame.
    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

impl DatathonError {
    /// Wrap an error raised by a classifier.
    pub fn predict<E>(error: E) -> Self
        where E: Into<Box<dyn std::error::Error + Send + Sync>>
    {
        Self::Predict(error.into())
    }
}
