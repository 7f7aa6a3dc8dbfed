use datathon::prelude::*;


use log::{Level, LevelFilter, Log, Metadata, Record};
use polars::prelude::*;

use std::sync::{Mutex, Once};


// Toy tree over the features x and y (classes -1 / +1).
//
//                 0: x <= 5.0   [6, 4]
//               /                      \
//      1: y <= 2.0   [5, 1]       2: y <= 7.0   [1, 3]
//      /          \               /          \
//  3: [5, 0]   4: [0, 1]      5: [1, 0]   6: [0, 3]
//
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


/// Keeps every log record emitted by the tests of this file.
struct Recorder(Mutex<Vec<(Level, String)>>);


impl Log for Recorder {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut records = self.0.lock().unwrap();
        records.push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}


static RECORDER: Recorder = Recorder(Mutex::new(Vec::new()));
static INIT: Once = Once::new();


fn recorder() -> &'static Recorder {
    INIT.call_once(|| {
        log::set_logger(&RECORDER).unwrap();
        log::set_max_level(LevelFilter::Info);
    });
    &RECORDER
}


fn sample() -> Sample {
    let x = Series::new("x", &[8.0, 1.0, 1.0, 9.0]);
    let y = Series::new("y", &[3.0, 1.0, 4.0, 8.0]);
    let target = Series::new("class", &[1_i64, -1, 1, 1]);

    let df = DataFrame::new(vec![x, y]).unwrap();
    Sample::from_dataframe(df, target).unwrap()
}


#[test]
fn decreasing_threshold_is_a_no_op() {
    let (once, outcome) = prune(&toy_tree(), 2);
    assert_eq!(
        outcome,
        Pruning::Applied { min_samples_leaf: 2, n_new_leaves: 0 }
    );
    assert_eq!(once.min_samples_leaf(), 2);

    let (twice, outcome) = prune(&once, 1);
    assert_eq!(outcome, Pruning::AlreadyPruned { current: 2 });
    assert_eq!(twice, once);

    let (thrice, outcome) = prune(&once, 2);
    assert_eq!(outcome, Pruning::AlreadyPruned { current: 2 });
    assert_eq!(thrice, once);
}


#[test]
fn increasing_threshold_cuts_small_nodes() {
    let (once, _) = prune(&toy_tree(), 2);
    let (twice, outcome) = prune(&once, 5);

    assert_eq!(
        outcome,
        Pruning::Applied { min_samples_leaf: 5, n_new_leaves: 1 }
    );
    assert_eq!(twice.min_samples_leaf(), 5);

    for (i, &n) in twice.n_node_samples().iter().enumerate() {
        if n <= 5 {
            assert_eq!(twice.children_left()[i], None, "node {i}");
            assert_eq!(twice.children_right()[i], None, "node {i}");
        }
    }
    assert_eq!(twice.children_left()[0], Some(1));
    assert_eq!(twice.children_left()[1], Some(3));
    assert_eq!(twice.n_leaves(), 3);

    // The fitted topology is still complete.
    assert_eq!(twice.fitted_children()[2], [Some(5), Some(6)]);
}


#[test]
fn nothing_under_the_threshold_keeps_the_children() {
    let nodes = vec![
        TreeNode::branch(0, 0.5, vec![4.0, 4.0], 1, 2),
        TreeNode::leaf(vec![3.0, 1.0]),
        TreeNode::leaf(vec![1.0, 3.0]),
    ];
    let tree = DecisionTree::from_nodes(nodes, vec![-1.0, 1.0], 1).unwrap();
    let (pruned, outcome) = prune(&tree, 3);
    assert_eq!(
        outcome,
        Pruning::Applied { min_samples_leaf: 3, n_new_leaves: 0 }
    );
    assert_eq!(pruned.children_left(), tree.children_left());
    assert_eq!(pruned.children_right(), tree.children_right());
}


#[test]
fn pruned_tree_predicts_with_its_new_leaves() {
    let sample = sample();
    let tree = toy_tree();
    assert_eq!(tree.predict_all(&sample).unwrap(), vec![-1.0, -1.0, 1.0, 1.0]);

    let (pruned, _) = tree.prune(5);
    assert_eq!(pruned.predict_all(&sample).unwrap(), vec![1.0, -1.0, 1.0, 1.0]);
}


#[test]
fn pruning_leaves_the_graph_intact() {
    let tree = toy_tree();
    let (pruned, _) = tree.prune(5);

    let before = create_graph(&tree, None, None).unwrap();
    let after = create_graph(&pruned, None, None).unwrap();
    assert_eq!(before.nodes().len(), 7);
    assert_eq!(before, after);
}


#[test]
fn lower_threshold_logs_the_notice() {
    let recorder = recorder();
    let (once, _) = prune(&toy_tree(), 3);
    let (_, outcome) = prune(&once, 1);
    assert_eq!(outcome, Pruning::AlreadyPruned { current: 3 });

    let records = recorder.0.lock().unwrap();
    let notice = "Decision tree is pruned at an equal or higher level.";
    assert!(
        records.iter().any(|(level, msg)| *level == Level::Info && msg == notice),
        "{records:?}"
    );
}
