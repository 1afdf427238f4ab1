use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::data_structs::{
    MethCode,
    Pattern,
};
use crate::tools::dmtree::builder::{
    SplitNode,
    TreeNode,
};

/// Prefix of cluster identifiers (`G0`, `G1`, ...).
pub const CLUSTER_PREFIX: &str = "G";

pub fn cluster_name(idx: usize) -> String { format!("{}{}", CLUSTER_PREFIX, idx) }

/// Partition of the groups into clusters of identical tree fingerprints.
///
/// The fingerprint of a group is the concatenation, in discovery order, of
/// its code in every node divider. Distinct fingerprints sorted
/// lexicographically are numbered `G0`, `G1`, ... .
///
/// Per-node encodings list clusters by name (`G0, G1, G10, G2, ...`), the
/// order in which the cluster table and supervised DMR tables carry them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    nodes:          Vec<TreeNode>,
    fingerprints:   Vec<String>,
    cluster_of:     Vec<usize>,
    n_clusters:     usize,
    /// Cluster index of every encoding position.
    encoding_order: Vec<usize>,
    /// Per node: the code of every cluster, clusters in name order.
    encodings:      Vec<Pattern>,
}

impl ClusterAssignment {
    pub fn from_tree(root: &SplitNode) -> Self {
        let nodes = root.flatten();
        let n_groups = root.divider().len();
        Self::from_valid_nodes(nodes, n_groups)
    }

    /// Assigns clusters from a flat node list. `Ok(None)` when the list is
    /// empty, which is what a failed root split produces.
    pub fn try_from_nodes(nodes: Vec<TreeNode>) -> anyhow::Result<Option<Self>> {
        let n_groups = match nodes.first() {
            Some(node) => node.pattern.len(),
            None => return Ok(None),
        };
        anyhow::ensure!(
            nodes
                .iter()
                .all(|node| node.pattern.len() == n_groups),
            "Tree node patterns differ in length"
        );
        Ok(Some(Self::from_valid_nodes(nodes, n_groups)))
    }

    fn from_valid_nodes(
        nodes: Vec<TreeNode>,
        n_groups: usize,
    ) -> Self {
        let fingerprints = (0..n_groups)
            .map(|group| {
                nodes
                    .iter()
                    .map(|node| {
                        node.pattern
                            .get(group)
                            .unwrap_or_default()
                            .as_char()
                    })
                    .collect::<String>()
            })
            .collect_vec();

        let distinct = fingerprints
            .iter()
            .sorted()
            .dedup()
            .collect_vec();
        let cluster_of = fingerprints
            .iter()
            .map(|fp| {
                distinct
                    .binary_search(&fp)
                    .unwrap_or_default()
            })
            .collect_vec();
        let n_clusters = distinct.len();

        let encoding_order = (0..n_clusters)
            .sorted_by_key(|cluster| cluster_name(*cluster))
            .collect_vec();
        // Members of a cluster share their code at every node, so the first
        // member represents the cluster.
        let representatives = encoding_order
            .iter()
            .map(|cluster| {
                cluster_of
                    .iter()
                    .position(|c| c == cluster)
                    .unwrap_or_default()
            })
            .collect_vec();
        let encodings = nodes
            .iter()
            .map(|node| {
                Pattern::new(
                    representatives
                        .iter()
                        .map(|g| {
                            node.pattern
                                .get(*g)
                                .unwrap_or(MethCode::Absent)
                        })
                        .collect(),
                )
            })
            .collect_vec();

        debug!(
            "{} groups assigned to {} clusters over {} tree nodes",
            n_groups,
            n_clusters,
            nodes.len()
        );

        Self {
            nodes,
            fingerprints,
            cluster_of,
            n_clusters,
            encoding_order,
            encodings,
        }
    }

    pub fn nodes(&self) -> &[TreeNode] { &self.nodes }

    pub fn n_groups(&self) -> usize { self.cluster_of.len() }

    pub fn n_clusters(&self) -> usize { self.n_clusters }

    pub fn fingerprint(
        &self,
        group: usize,
    ) -> Option<&str> {
        self.fingerprints
            .get(group)
            .map(String::as_str)
    }

    /// Cluster index of every group, in group order.
    pub fn cluster_indices(&self) -> &[usize] { &self.cluster_of }

    pub fn cluster_id(
        &self,
        group: usize,
    ) -> Option<String> {
        self.cluster_of
            .get(group)
            .map(|c| cluster_name(*c))
    }

    /// `G<idx>` of every group, in group order.
    pub fn cluster_ids(&self) -> Vec<String> {
        self.cluster_of
            .iter()
            .map(|c| cluster_name(*c))
            .collect()
    }

    /// Groups of cluster `cluster`, ascending.
    pub fn members(
        &self,
        cluster: usize,
    ) -> Vec<usize> {
        self.cluster_of
            .iter()
            .positions(|c| *c == cluster)
            .collect()
    }

    /// Per-cluster codes of every node, in node order.
    pub fn encodings(&self) -> &[Pattern] { &self.encodings }

    /// Cluster index behind every position of an encoding.
    pub fn encoding_order(&self) -> &[usize] { &self.encoding_order }

    /// `G<idx>` names in encoding order: the group columns a supervised DMR
    /// table must have.
    pub fn encoding_clusters(&self) -> Vec<String> {
        self.encoding_order
            .iter()
            .map(|c| cluster_name(*c))
            .collect()
    }

    /// Identifier of node `node` used in DMR tree labels: its per-cluster
    /// encoding in wire form.
    pub fn node_id(
        &self,
        node: usize,
    ) -> Option<String> {
        self.encodings
            .get(node)
            .map(|e| e.to_string())
    }
}
