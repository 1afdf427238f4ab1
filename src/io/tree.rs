use std::io::Write;

use itertools::Itertools;

use crate::data_structs::MethCode;
use crate::tools::dmtree::{
    ClusterAssignment,
    NodeSummary,
    TreeNode,
};

/// Writes the group to cluster table: `ID`, `Group`, then the group's code
/// in every tree node, one column per node named by its per-cluster
/// encoding.
pub fn write_clusters<W: Write>(
    sink: W,
    assignment: &ClusterAssignment,
    names: &[String],
) -> anyhow::Result<()> {
    anyhow::ensure!(
        names.len() == assignment.n_groups(),
        "Got {} group names for {} groups",
        names.len(),
        assignment.n_groups()
    );
    let mut writer = csv::WriterBuilder::default()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(sink);

    let header = ["ID".to_string(), "Group".to_string()]
        .into_iter()
        .chain(
            assignment
                .encodings()
                .iter()
                .map(|e| e.to_string()),
        )
        .collect_vec();
    writer.write_record(&header)?;

    for (group, (name, cluster)) in names
        .iter()
        .zip(assignment.cluster_ids())
        .enumerate()
    {
        let codes = assignment.nodes().iter().map(|node| {
            node.pattern
                .get(group)
                .unwrap_or(MethCode::Absent)
                .to_string()
        });
        writer.write_record([name.clone(), cluster].into_iter().chain(codes))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the node list `(pattern, depth, weight)` as a JSON array.
pub fn write_nodes_json<W: Write>(
    sink: W,
    nodes: &[TreeNode],
) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(sink, nodes)?;
    Ok(())
}

/// Writes per-node DMR support as a tab-separated table.
pub fn write_node_summary<W: Write>(
    sink: W,
    summary: &[NodeSummary],
) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::default()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(sink);
    writer.write_record([
        "node",
        "depth",
        "weight",
        "#DMRs_hypo_in_left",
        "#DMRs_hypo_in_right",
        "Left_Child",
        "Right_Child",
    ])?;
    for node in summary {
        writer.write_record([
            node.id.clone(),
            node.depth.to_string(),
            node.weight.to_string(),
            node.n_direct.to_string(),
            node.n_reversed.to_string(),
            node.left.join(","),
            node.right.join(","),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_newick<W: Write>(
    mut sink: W,
    newick: &str,
) -> anyhow::Result<()> {
    writeln!(sink, "{}", newick)?;
    Ok(())
}
