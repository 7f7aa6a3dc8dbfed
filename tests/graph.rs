use datathon::prelude::*;
use datathon::graph::recolor_by_class_proportion;
use datathon::DatathonError;


//                 0: x <= 5.0   [6, 4]
//               /                      \
//      1: y <= 2.0   [5, 1]       2: y <= 7.0   [1, 3]
//      /          \               /          \
//  3: [5, 0]   4: [0, 1]      5: [1, 0]   6: [0, 3]
fn toy_tree() -> DecisionTree {
    let nodes = vec![
        TreeNode::branch(0, 5.0, vec![6.0, 4.0], 1, 2),
        TreeNode::branch(1, 2.0, vec![5.0, 1.0], 3, 4),
        TreeNode::branch(1, 7.0, vec![1.0, 3.0], 5, 6),
        TreeNode::leaf(vec![5.0, 0.0]),
        TreeNode::leaf(vec![0.0, 1.0]),
        TreeNode::leaf(vec![1.0, 0.0]),
        TreeNode::leaf(vec![0.0, 3.0]),
    ];
    DecisionTree::from_nodes(nodes, vec![-1.0, 1.0], 2).unwrap()
}


fn coolwarm_hex(proportion: f64) -> String {
    let [r, g, b] = Coolwarm::default().color_at(proportion).to_u8_ceil();
    format!("#{r:02x}{g:02x}{b:02x}")
}


#[test]
fn without_colormap_the_exporter_colors_stay() {
    let tree = toy_tree();
    let graph = create_graph(&tree, None, None).unwrap();

    let options = ExportOptions::default().filled(true).rounded(true);
    let exported = DotGraph::parse(&export_graphviz(&tree, &options).unwrap())
        .unwrap();

    assert_eq!(graph, exported);
    assert_eq!(graph.nodes().len(), 7);
    assert_eq!(graph.edges().len(), 6);
    // alpha = (0.6 - 0.4) / (1 - 0.4) over the orange of the first class.
    assert_eq!(graph.node("0").unwrap().fill_color(), Some("#f6d5bd"));
    assert_eq!(graph.node("3").unwrap().fill_color(), Some("#e58139"));
    assert_eq!(graph.node("6").unwrap().fill_color(), Some("#399de5"));
}


#[test]
fn colormap_recolors_by_second_class_share() {
    let tree = toy_tree();
    let cmap = Coolwarm::default().sample(256);
    let graph = create_graph(&tree, None, Some(&cmap[..])).unwrap();

    let expected = [
        (0, 0.4), (1, 1.0 / 6.0), (2, 0.75), (3, 0.0), (4, 1.0), (5, 0.0), (6, 1.0),
    ];
    for (id, proportion) in expected {
        let node = graph.node(&id.to_string()).unwrap();
        assert_eq!(node.fill_color(), Some(coolwarm_hex(proportion).as_str()), "node {id}");
    }

    // Colors are rounded up.
    let [r, _, _] = Coolwarm::default().color_at(0.0).channels();
    let hex = coolwarm_hex(0.0);
    assert_eq!(u8::from_str_radix(&hex[1..3], 16).unwrap(), (255.0 * r).ceil() as u8);
}


#[test]
fn feature_names_label_the_splits() {
    let graph = create_graph(&toy_tree(), Some(&["width", "height"][..]), None)
        .unwrap();
    let root = graph.node("0").unwrap().label().unwrap();
    assert!(root.starts_with("width <= 5.0"));
    assert!(root.ends_with("value = [6, 4]"));
    assert!(graph.node("1").unwrap().label().unwrap().starts_with("height <= 2.0"));

    assert!(create_graph(&toy_tree(), Some(&["width"][..]), None).is_err());
}


#[test]
fn single_class_trees_cannot_be_recolored() {
    let nodes = vec![TreeNode::leaf(vec![4.0])];
    let tree = DecisionTree::from_nodes(nodes, vec![1.0], 1).unwrap();
    let cmap = Coolwarm::default().sample(8);

    assert!(create_graph(&tree, None, None).is_ok());
    let err = create_graph(&tree, None, Some(&cmap[..])).unwrap_err();
    assert!(matches!(err, DatathonError::InvalidInput(..)));
}


#[test]
fn foreign_graphs_are_recolored_from_their_labels() {
    let dot = "digraph Tree {\n\
        node [shape=box] ;\n\
        a [label=\"gini = 0.5\\nsamples = 4\\nvalue = [1, 3]\"] ;\n\
        b ;\n\
        a -> b ;\n\
        }";
    let mut graph = DotGraph::parse(dot).unwrap();
    let n = recolor_by_class_proportion(&mut graph, &Coolwarm::default(), None)
        .unwrap();
    assert_eq!(n, 1);
    assert_eq!(graph.node("a").unwrap().fill_color(), Some(coolwarm_hex(0.75).as_str()));
    assert_eq!(graph.node("b").unwrap().fill_color(), None);

    let mut broken = DotGraph::parse("digraph { a [label=\"samples = 4\"] }").unwrap();
    let err = recolor_by_class_proportion(&mut broken, &Coolwarm::default(), None)
        .unwrap_err();
    assert!(matches!(err, DatathonError::MalformedLabel { .. }));
}


#[test]
fn graph_text_round_trips() {
    let cmap = Coolwarm::default().sample(256);
    let graph = create_graph(&toy_tree(), None, Some(&cmap[..])).unwrap();
    let again = DotGraph::parse(&graph.to_string()).unwrap();
    assert_eq!(graph, again);

    let path = std::env::temp_dir().join("datathon_graph_round_trip.dot");
    graph.write_dot(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(DotGraph::parse(&text).unwrap(), graph);
    let _ = std::fs::remove_file(&path);
}


#[test]
fn rendering_is_a_separate_step() {
    let dir = std::env::temp_dir().join("datathon-render-step");
    let _ = std::fs::remove_dir_all(&dir);

    let graph = create_graph(&toy_tree(), None, None).unwrap();
    assert!(!dir.exists());

    // Fails either way: without Graphviz, or on the missing directory.
    let err = graph.render_png(dir.join("tree.png")).unwrap_err();
    assert!(
        matches!(err, DatathonError::Io(_) | DatathonError::Render(_)),
        "{err}"
    );
}
