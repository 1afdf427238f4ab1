use itertools::Itertools;
use serde::Serialize;

use crate::data_structs::{
    MethCode,
    Pattern,
};
use crate::tools::dmtree::assign::ClusterAssignment;
use crate::tools::dmtree::label::{
    DmrLabel,
    Polarity,
};

/// Per-node DMR support, as reported next to the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    pub id:         String,
    pub depth:      usize,
    pub weight:     f64,
    /// DMRs hypomethylated on the left side of the node.
    pub n_direct:   usize,
    /// DMRs hypomethylated on the right side of the node.
    pub n_reversed: usize,
    pub left:       Vec<String>,
    pub right:      Vec<String>,
}

/// Left and right children of a per-cluster node encoding: a hypo-sided
/// divider separates hypo from intermediate clusters, a hyper-sided one
/// intermediate from hyper clusters. `clusters` names every encoding
/// position.
pub fn children_of(
    encoding: &Pattern,
    clusters: &[String],
) -> (Vec<String>, Vec<String>) {
    let (left, right) = if encoding.has(MethCode::Hyper) {
        (MethCode::Intermediate, MethCode::Hyper)
    }
    else {
        (MethCode::Hypo, MethCode::Intermediate)
    };
    let side = |code: MethCode| {
        encoding
            .codes()
            .iter()
            .zip(clusters)
            .filter(|(c, _)| **c == code)
            .map(|(_, name)| name.clone())
            .collect_vec()
    };
    (side(left), side(right))
}

/// Counts direct and reversed support of every node over the labels of a
/// whole table.
pub fn summarize(
    assignment: &ClusterAssignment,
    labels: &[Vec<DmrLabel>],
) -> Vec<NodeSummary> {
    let counts = labels
        .iter()
        .flatten()
        .counts_by(|label| (label.node, label.polarity));

    let clusters = assignment.encoding_clusters();
    assignment
        .nodes()
        .iter()
        .zip(assignment.encodings())
        .enumerate()
        .map(|(idx, (node, encoding))| {
            let (left, right) = children_of(encoding, &clusters);
            NodeSummary {
                id: encoding.to_string(),
                depth: node.depth,
                weight: node.weight,
                n_direct: counts
                    .get(&(idx, Polarity::Direct))
                    .copied()
                    .unwrap_or(0),
                n_reversed: counts
                    .get(&(idx, Polarity::Reversed))
                    .copied()
                    .unwrap_or(0),
                left,
                right,
            }
        })
        .collect()
}
