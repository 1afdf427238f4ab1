use itertools::Itertools;

use crate::data_structs::MethCode;
use crate::tools::dmtree::assign::ClusterAssignment;
use crate::tools::dmtree::builder::{
    Branch,
    SplitNode,
};

/// Renders the split tree in Newick notation.
///
/// Leaves are named `<cluster>_<group name>`. Every split becomes a clade
/// with the node weight as its branch length; the groups of a branch that
/// was not split further are collected into one clade, and groups absent
/// from a divider hang directly below that split.
pub fn to_newick(
    root: &SplitNode,
    assignment: &ClusterAssignment,
    names: &[String],
) -> anyhow::Result<String> {
    let n_groups = root.divider().len();
    anyhow::ensure!(
        names.len() == n_groups,
        "Got {} group names for {} groups",
        names.len(),
        n_groups
    );
    anyhow::ensure!(
        assignment.n_groups() == n_groups,
        "Cluster assignment covers {} groups, tree has {}",
        assignment.n_groups(),
        n_groups
    );

    let labels = assignment
        .cluster_ids()
        .into_iter()
        .zip(names.iter())
        .map(|(cluster, name)| escape(&format!("{}_{}", cluster, name)))
        .collect_vec();
    let members = (0..n_groups).collect_vec();
    Ok(format!("{};", subtree(root, &members, &labels)))
}

fn subtree(
    node: &SplitNode,
    members: &[usize],
    labels: &[String],
) -> String {
    let code_of = |g: usize| {
        node.divider()
            .get(g)
            .unwrap_or(MethCode::Absent)
    };

    let mut parts = Vec::new();
    for value in MethCode::BRANCHES {
        let part = members
            .iter()
            .copied()
            .filter(|g| code_of(*g) == value)
            .collect_vec();
        if part.is_empty() {
            continue;
        }
        match node.child(value) {
            Some(Branch::Split(child)) => parts.push(subtree(child, &part, labels)),
            _ => parts.push(clade(&part, labels)),
        }
    }
    parts.extend(
        members
            .iter()
            .filter(|g| code_of(**g).is_absent())
            .map(|g| labels[*g].clone()),
    );

    format!("({}):{}", parts.join(","), node.weight())
}

fn clade(
    part: &[usize],
    labels: &[String],
) -> String {
    match part {
        [single] => labels[*single].clone(),
        _ => format!("({})", part.iter().map(|g| &labels[*g]).join(",")),
    }
}

fn escape(label: &str) -> String {
    const RESERVED: &[char] = &['(', ')', '[', ']', ',', ':', ';', '\''];
    if label.contains(RESERVED) || label.contains(char::is_whitespace) {
        format!("'{}'", label.replace('\'', "''"))
    }
    else {
        label.to_string()
    }
}
