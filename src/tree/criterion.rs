//! Impurity measures reported in the tree labels.
use serde::{Serialize, Deserialize};
use std::fmt;


/// Impurity measure of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Criterion {
    /// Gini impurity `1 - sum p_k^2`.
    #[default]
    Gini,
    /// Entropy `- sum p_k log2 p_k`.
    Entropy,
}


impl Criterion {
    /// Impurity of the per-class weights `value`.
    /// Returns `0` for an empty node.
    pub fn impurity(&self, value: &[f64]) -> f64 {
        let total = value.iter().sum::<f64>();
        if total <= 0f64 { return 0f64; }

        let proportions = value.iter().map(|v| v / total);
        match self {
            Criterion::Gini => {
                1f64 - proportions.map(|p| p * p).sum::<f64>()
            },
            Criterion::Entropy => {
                proportions.filter(|&p| p > 0f64)
                    .map(|p| -p * p.log2())
                    .sum::<f64>()
            },
        }
    }
}


impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Criterion::Gini => "gini",
            Criterion::Entropy => "entropy",
        };
        write!(f, "{name}")
    }
}
