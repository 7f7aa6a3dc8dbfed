//! Export of a [`DecisionTree`] to the DOT language.
//!
//! The layout follows the widespread `export_graphviz` format:
//! one box per node labeled with its split, impurity, sample count
//! and per-class weights, and the two edges below the root
//! labeled `True` and `False`.
use super::dtree::DecisionTree;
use crate::color::class_palette;
use crate::constants::DEFAULT_EXPORT_PRECISION;
use crate::error::{DatathonError, Result};


/// Options of [`export_graphviz`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    feature_names: Option<Vec<String>>,
    filled: bool,
    rounded: bool,
    precision: usize,
}


impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            feature_names: None,
            filled: false,
            rounded: false,
            precision: DEFAULT_EXPORT_PRECISION,
        }
    }
}


impl ExportOptions {
    /// Names used in the split labels instead of `X[i]`.
    pub fn feature_names<S: ToString>(mut self, names: &[S]) -> Self {
        let names = names.iter().map(|s| s.to_string()).collect();
        self.feature_names = Some(names);
        self
    }


    /// Fill each node with the color of its majority class,
    /// lighter when the node is impure.
    pub fn filled(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }


    /// Draw boxes with rounded corners in Helvetica.
    pub fn rounded(mut self, rounded: bool) -> Self {
        self.rounded = rounded;
        self
    }


    /// Number of decimal places of thresholds and impurities.
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}


/// Returns the DOT description of `tree`.
///
/// The fitted topology is exported, so splits removed by pruning
/// are still drawn.
pub fn export_graphviz(tree: &DecisionTree, options: &ExportOptions)
    -> Result<String>
{
    if let Some(names) = &options.feature_names {
        if names.len() != tree.n_features() {
            return Err(DatathonError::InvalidInput(
                "feature_names".into(),
                format!(
                    "got {} names for {} features",
                    names.len(), tree.n_features()
                ),
            ));
        }
    }

    let palette = class_palette(tree.n_classes());
    let children = tree.fitted_children();

    let mut dot = String::from("digraph Tree {\n");
    dot.push_str(&default_node_statement(options));
    if options.rounded {
        dot.push_str("edge [fontname=\"helvetica\"] ;\n");
    }

    let mut stack = vec![0];
    while let Some(i) = stack.pop() {
        let label = node_label(tree, i, children[i][0].is_some(), options);
        let fill = if options.filled {
            format!(", fillcolor=\"{}\"", node_color(tree.nodes()[i].value(), &palette))
        } else {
            String::new()
        };
        dot.push_str(&format!("{i} [label=\"{label}\"{fill}] ;\n"));

        if let Some(parent) = tree.nodes()[i].parent_node() {
            dot.push_str(&edge_statement(parent, i, children[parent]));
        }

        if let [Some(left), Some(right)] = children[i] {
            stack.push(right);
            stack.push(left);
        }
    }

    dot.push('}');
    Ok(dot)
}


fn default_node_statement(options: &ExportOptions) -> String {
    let mut attributes = vec!["shape=box".to_string()];
    let style = match (options.filled, options.rounded) {
        (true, true) => Some("filled, rounded"),
        (true, false) => Some("filled"),
        (false, true) => Some("rounded"),
        (false, false) => None,
    };
    if let Some(style) = style {
        attributes.push(format!("style=\"{style}\""));
        attributes.push("color=\"black\"".to_string());
    }
    if options.rounded {
        attributes.push("fontname=\"helvetica\"".to_string());
    }
    format!("node [{}] ;\n", attributes.join(", "))
}


fn edge_statement(parent: usize, child: usize, siblings: [Option<usize>; 2])
    -> String
{
    if parent != 0 {
        return format!("{parent} -> {child} ;\n");
    }
    let (angle, head) = if siblings[0] == Some(child) {
        (45, "True")
    } else {
        (-45, "False")
    };
    format!(
        "{parent} -> {child} \
         [labeldistance=2.5, labelangle={angle}, headlabel=\"{head}\"] ;\n"
    )
}


fn node_label(
    tree: &DecisionTree,
    i: usize,
    is_split: bool,
    options: &ExportOptions,
) -> String
{
    let node = &tree.nodes()[i];
    let precision = options.precision;
    let mut lines = Vec::with_capacity(4);

    if is_split {
        let feature = match &options.feature_names {
            Some(names) => names[node.feature()].replace('"', "\\\""),
            None => format!("X[{}]", node.feature()),
        };
        let threshold = format_number(node.threshold(), precision);
        lines.push(format!("{feature} <= {threshold}"));
    }
    lines.push(format!(
        "{} = {}",
        tree.criterion(), format_number(node.impurity(), precision)
    ));
    lines.push(format!("samples = {}", node.n_samples()));

    let value = node.value()
        .iter()
        .map(|&v| format_count(v, precision))
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("value = [{value}]"));

    lines.join("\\n")
}


/// The majority class color blended with white by the node purity.
fn node_color(value: &[f64], palette: &[[u8; 3]]) -> String {
    let total = value.iter().sum::<f64>();
    if total <= 0f64 || palette.is_empty() {
        return "#ffffff".to_string();
    }

    let mut proportions = value.iter()
        .map(|v| v / total)
        .enumerate()
        .collect::<Vec<_>>();
    proportions.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (class, first) = proportions[0];
    let alpha = match proportions.get(1) {
        Some(&(_, second)) if second < 1f64 => (first - second) / (1f64 - second),
        _ => 0f64,
    };

    let [r, g, b] = palette[class]
        .map(|c| (alpha * c as f64 + (1f64 - alpha) * 255f64).round() as u8);
    format!("#{r:02x}{g:02x}{b:02x}")
}


/// `v` rounded to `precision` places, without trailing zeros.
fn format_number(v: f64, precision: usize) -> String {
    let mut s = format!("{v:.precision$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').len();
        s.truncate(trimmed);
        if s.ends_with('.') { s.push('0'); }
    }
    s
}


/// Integral weights are printed as integers.
fn format_count(v: f64, precision: usize) -> String {
    if v.is_finite() && v.fract() == 0f64 {
        format!("{}", v as i64)
    } else {
        format_number(v, precision)
    }
}
