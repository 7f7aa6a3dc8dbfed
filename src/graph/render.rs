//! Building, recoloring, and rendering tree graphs.
use log::debug;

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use super::dot::{DotGraph, DotNode};
use crate::color::{ColorLookup, Coolwarm, Rgba};
use crate::error::{DatathonError, Result};
use crate::tree::{export_graphviz, DecisionTree, ExportOptions};


/// Returns the DOT graph of `tree`, with filled and rounded nodes.
///
/// When `cmap` is given, every labeled node is refilled
/// by the share of the second class among its training samples,
/// looked up in the [`Coolwarm`] colormap.
/// The table itself only switches the recoloring on:
/// [`ColorLookup::sample`] of any colormap produces a suitable one.
///
/// This only builds the graph; it does not rasterize it.
/// Producing an image is the separate step [`DotGraph::render_png`],
/// which needs the Graphviz `dot` executable.
///
/// ```no_run
/// use datathon::prelude::*;
///
/// # fn run(tree: &DecisionTree) -> datathon::Result<()> {
/// let cmap = Coolwarm::default().sample(256);
/// let graph = create_graph(tree, Some(&["x", "y"][..]), Some(&cmap[..]))?;
/// graph.render_png("tree.png")?;
/// # Ok(())
/// # }
/// ```
pub fn create_graph(
    tree: &DecisionTree,
    feature_names: Option<&[&str]>,
    cmap: Option<&[Rgba]>,
) -> Result<DotGraph>
{
    let mut options = ExportOptions::default()
        .filled(true)
        .rounded(true);
    if let Some(names) = feature_names {
        options = options.feature_names(names);
    }

    let dot = export_graphviz(tree, &options)?;
    let mut graph = DotGraph::parse(&dot)?;

    if cmap.is_some() {
        if tree.n_classes() < 2 {
            return Err(DatathonError::InvalidInput(
                "cmap".into(),
                format!(
                    "recoloring needs at least 2 classes, the tree has {}",
                    tree.n_classes()
                ),
            ));
        }
        let n_colored = recolor_by_class_proportion(
            &mut graph, &Coolwarm::default(), Some(tree)
        )?;
        debug!("recolored {n_colored} of {} nodes", graph.nodes().len());
    }
    Ok(graph)
}


/// Fill every labeled node of `graph` with `lookup`
/// at the proportion of the second class, and return the number of
/// recolored nodes.
///
/// The class counts of a node whose id is an index of `tree`
/// are read from the tree. Otherwise they are parsed from
/// the `value = [...]` part of the label.
/// Nodes without a label are skipped.
pub fn recolor_by_class_proportion<L>(
    graph: &mut DotGraph,
    lookup: &L,
    tree: Option<&DecisionTree>,
) -> Result<usize>
    where L: ColorLookup + ?Sized
{
    let mut n_colored = 0;
    for node in graph.nodes_mut() {
        let Some(label) = node.label() else { continue; };

        let counts = match tree_counts(tree, node) {
            Some(counts) => counts,
            None => parse_value_counts(node.id(), label)?,
        };
        let proportion = second_class_proportion(node, &counts)?;

        let [r, g, b] = lookup.color_at(proportion).to_u8_ceil();
        node.set_fill_color(format!("#{r:02x}{g:02x}{b:02x}"));
        n_colored += 1;
    }
    Ok(n_colored)
}


fn tree_counts(tree: Option<&DecisionTree>, node: &DotNode)
    -> Option<Vec<f64>>
{
    let index = node.id().parse::<usize>().ok()?;
    tree?.node(index).map(|n| n.value().to_vec())
}


fn second_class_proportion(node: &DotNode, counts: &[f64]) -> Result<f64> {
    let total = counts.iter().sum::<f64>();
    if counts.len() < 2 || total <= 0f64 {
        return Err(DatathonError::InvalidInput(
            "value".into(),
            format!(
                "node {} has counts {counts:?}, \
                 expected at least 2 classes and a positive total",
                node.id()
            ),
        ));
    }
    Ok(counts[1] / total)
}


/// Parse the per-class counts of a label of the form
/// `"... value = [a, b, ...]"`.
///
/// `node` names the node in the error.
pub fn parse_value_counts(node: &str, label: &str) -> Result<Vec<f64>> {
    let malformed = || DatathonError::MalformedLabel {
        node: node.to_string(),
        label: label.to_string(),
    };

    let (_, rest) = label.split_once("value = [").ok_or_else(malformed)?;
    let (list, _) = rest.split_once(']').ok_or_else(malformed)?;

    list.split(',')
        .map(|count| count.trim().parse::<f64>().map_err(|_| malformed()))
        .collect()
}


impl DotGraph {
    /// Render the graph to a PNG file with the Graphviz `dot` executable.
    pub fn render_png<P>(&self, path: P) -> Result<()>
        where P: AsRef<Path>
    {
        let mut child = Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(path.as_ref())
            .stdin(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(self.to_string().as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let message = String::from_utf8_lossy(&output.stderr);
            return Err(DatathonError::Render(format!(
                "{} ({})", message.trim(), output.status
            )));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_read_from_the_label() {
        let label = "X[0] <= 0.5\\ngini = 0.375\\nsamples = 4\\nvalue = [3, 1]";
        assert_eq!(parse_value_counts("0", label).unwrap(), vec![3.0, 1.0]);

        let fractional = "gini = 0.0\\nsamples = 2\\nvalue = [0.25, 0.75]";
        assert_eq!(parse_value_counts("1", fractional).unwrap(), vec![0.25, 0.75]);
    }

    #[test]
    fn malformed_labels_are_errors() {
        for label in ["samples = 4", "value = [3, 1", "value = [3, x]"] {
            let err = parse_value_counts("7", label).unwrap_err();
            assert!(matches!(err, DatathonError::MalformedLabel { ref node, .. } if node == "7"));
        }
    }

    #[test]
    fn nodes_without_labels_are_skipped() {
        let mut graph = DotGraph::parse(
            "digraph { a [label=\"value = [1, 3]\"] ; b ; c [label=\"\"] ; }"
        ).unwrap();
        let n = recolor_by_class_proportion(&mut graph, &Coolwarm::default(), None)
            .unwrap();
        assert_eq!(n, 1);
        assert!(graph.node("a").unwrap().fill_color().is_some());
        assert!(graph.node("b").unwrap().fill_color().is_none());
        assert!(graph.node("c").unwrap().fill_color().is_none());
    }

    #[test]
    fn single_class_counts_are_rejected() {
        let mut graph = DotGraph::parse("digraph { a [label=\"value = [4]\"] }")
            .unwrap();
        let result = recolor_by_class_proportion(&mut graph, &Coolwarm::default(), None);
        assert!(result.is_err());
    }
}
