//! A mutable in-memory DOT graph.
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use super::parser;
use crate::error::Result;


/// Ordered `key = value` pairs of a DOT statement.
///
/// Values are kept as written between the quotes,
/// so escape sequences such as `\n` survive a round trip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);


impl Attributes {
    /// An empty attribute list.
    pub fn new() -> Self {
        Self(Vec::new())
    }


    /// Returns the value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }


    /// Set `key` to the raw DOT text `value`,
    /// replacing an existing entry in place.
    pub fn set_raw<K, V>(&mut self, key: K, value: V)
        where K: Into<String>,
              V: Into<String>,
    {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => { *v = value; },
            None => { self.0.push((key, value)); },
        }
    }


    /// Set `key` to `value`, escaping double quotes.
    pub fn set<K, V>(&mut self, key: K, value: V)
        where K: Into<String>,
              V: AsRef<str>,
    {
        self.set_raw(key, value.as_ref().replace('"', "\\\""));
    }


    /// Iterate over `(key, raw value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }


    /// Returns `true` if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }


    pub(super) fn extend(&mut self, other: Attributes) {
        other.0.into_iter()
            .for_each(|(k, v)| self.set_raw(k, v));
    }
}


/// A node statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotNode {
    id: String,
    attributes: Attributes,
}


impl DotNode {
    /// A node without attributes.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into(), attributes: Attributes::new() }
    }


    /// Node identifier.
    pub fn id(&self) -> &str {
        &self.id
    }


    /// Returns the label, if the node carries a non-empty one.
    pub fn label(&self) -> Option<&str> {
        self.attributes.get("label")
            .filter(|label| !label.is_empty())
    }


    /// Returns the `fillcolor` attribute.
    pub fn fill_color(&self) -> Option<&str> {
        self.attributes.get("fillcolor")
    }


    /// Set the `fillcolor` attribute.
    pub fn set_fill_color<S: AsRef<str>>(&mut self, color: S) {
        self.attributes.set("fillcolor", color);
    }


    /// Attributes of this node.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }


    /// Mutable attributes of this node.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}


/// An edge statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotEdge {
    pub(super) from: String,
    pub(super) to: String,
    pub(super) attributes: Attributes,
}


impl DotEdge {
    /// The tail node id.
    pub fn source(&self) -> &str {
        &self.from
    }


    /// The head node id.
    pub fn target(&self) -> &str {
        &self.to
    }


    /// Edge attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}


/// A DOT graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotGraph {
    pub(super) name: Option<String>,
    pub(super) directed: bool,
    pub(super) strict: bool,
    pub(super) graph_attributes: Attributes,
    pub(super) node_defaults: Attributes,
    pub(super) edge_defaults: Attributes,
    pub(super) nodes: Vec<DotNode>,
    pub(super) edges: Vec<DotEdge>,
}


impl DotGraph {
    /// An empty graph.
    pub fn new(name: Option<String>, directed: bool) -> Self {
        Self {
            name,
            directed,
            strict: false,
            graph_attributes: Attributes::new(),
            node_defaults: Attributes::new(),
            edge_defaults: Attributes::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }


    /// Parse DOT text.
    ///
    /// Subgraphs, ports and HTML labels are not supported.
    pub fn parse(dot: &str) -> Result<Self> {
        parser::parse(dot)
    }


    /// Graph identifier, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }


    /// Returns `true` for a `digraph`.
    pub fn is_directed(&self) -> bool {
        self.directed
    }


    /// Returns the node statements in order of appearance.
    pub fn nodes(&self) -> &[DotNode] {
        &self.nodes[..]
    }


    /// Mutable node statements, in order of appearance.
    pub fn nodes_mut(&mut self) -> &mut [DotNode] {
        &mut self.nodes[..]
    }


    /// Returns the node named `id`.
    pub fn node(&self, id: &str) -> Option<&DotNode> {
        self.nodes.iter().find(|n| n.id == id)
    }


    /// Returns the node named `id`, mutably.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut DotNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }


    /// Edge statements in order of appearance.
    pub fn edges(&self) -> &[DotEdge] {
        &self.edges[..]
    }


    /// Attributes set by `node [...]` statements.
    pub fn node_defaults(&self) -> &Attributes {
        &self.node_defaults
    }


    /// Attributes set by `edge [...]` statements.
    pub fn edge_defaults(&self) -> &Attributes {
        &self.edge_defaults
    }


    /// Attributes of the graph itself.
    pub fn graph_attributes(&self) -> &Attributes {
        &self.graph_attributes
    }


    /// Append a node statement, or merge its attributes
    /// into the existing node with the same id.
    pub fn add_node(&mut self, node: DotNode) {
        match self.node_mut(&node.id) {
            Some(existing) => existing.attributes.extend(node.attributes),
            None => self.nodes.push(node),
        }
    }


    /// Append an edge statement. Chains like `a -> b -> c` are one edge per link.
    pub fn add_edge<S, T>(&mut self, from: S, to: T, attributes: Attributes)
        where S: Into<String>,
              T: Into<String>,
    {
        self.edges.push(DotEdge { from: from.into(), to: to.into(), attributes });
    }


    /// Write the graph to a DOT file.
    pub fn write_dot<P>(&self, path: P) -> Result<()>
        where P: AsRef<Path>
    {
        let mut f = File::create(path)?;
        f.write_all(self.to_string().as_bytes())?;
        Ok(())
    }
}


/// Words that cannot be used as bare identifiers.
pub(super) const KEYWORDS: [&str; 6] = [
    "node", "edge", "graph", "digraph", "subgraph", "strict",
];


/// Quote `id` unless it is a plain identifier or a number.
fn quoted(id: &str) -> String {
    let is_identifier = id.chars().next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let is_numeral = !id.is_empty()
        && id.parse::<f64>().is_ok()
        && id.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-'));

    let is_keyword = KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(id));

    if (is_identifier && !is_keyword) || is_numeral {
        id.to_string()
    } else {
        format!("\"{id}\"")
    }
}


fn write_attributes(f: &mut fmt::Formatter<'_>, attributes: &Attributes)
    -> fmt::Result
{
    if attributes.is_empty() { return Ok(()); }

    let list = attributes.iter()
        .map(|(k, v)| format!("{}={}", quoted(k), quoted(v)))
        .collect::<Vec<_>>()
        .join(", ");
    write!(f, " [{list}]")
}


impl fmt::Display for DotGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strict { write!(f, "strict ")?; }
        let (kind, op) = if self.directed { ("digraph", "->") } else { ("graph", "--") };
        match &self.name {
            Some(name) => writeln!(f, "{kind} {} {{", quoted(name))?,
            None => writeln!(f, "{kind} {{")?,
        }

        for (keyword, attributes) in [
            ("graph", &self.graph_attributes),
            ("node", &self.node_defaults),
            ("edge", &self.edge_defaults),
        ] {
            if !attributes.is_empty() {
                write!(f, "{keyword}")?;
                write_attributes(f, attributes)?;
                writeln!(f, " ;")?;
            }
        }

        for node in &self.nodes {
            write!(f, "{}", quoted(&node.id))?;
            write_attributes(f, &node.attributes)?;
            writeln!(f, " ;")?;
        }
        for edge in &self.edges {
            write!(f, "{} {op} {}", quoted(&edge.from), quoted(&edge.to))?;
            write_attributes(f, &edge.attributes)?;
            writeln!(f, " ;")?;
        }
        write!(f, "}}")
    }
}
