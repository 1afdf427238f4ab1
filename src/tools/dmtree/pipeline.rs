use itertools::Itertools;
use log::{
    info,
    warn,
};

use crate::data_structs::{
    DmrRecord,
    DmrTable,
    MethCode,
    Pattern,
};
use crate::tools::dmtree::assign::ClusterAssignment;
use crate::tools::dmtree::builder::{
    DivisiveClusterBuilder,
    SplitNode,
    TreeNode,
};
use crate::tools::dmtree::config::DmTreeConfig;
use crate::tools::dmtree::label::{
    DmTreeLabeler,
    LabelMode,
};
use crate::tools::dmtree::newick::to_newick;
use crate::tools::dmtree::summary::{
    summarize,
    NodeSummary,
};

/// Clustering entry point: prefilter, canonicalize, aggregate, split and
/// assign clusters.
#[derive(Debug, Clone)]
pub struct DmTree {
    config: DmTreeConfig,
}

impl DmTree {
    pub fn try_new(config: DmTreeConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DmTreeConfig { &self.config }

    /// Whether a DMR is clear enough to drive the clustering: both
    /// extremes carried by at least `min_n0` groups and a large enough
    /// mean difference.
    pub fn passes_prefilter(
        &self,
        record: &DmrRecord,
    ) -> bool {
        record.pattern.count(MethCode::Hypo) >= self.config.min_n0
            && record.pattern.count(MethCode::Hyper) >= self.config.min_n0
            && record.weight() > self.config.min_abs_meandiff
    }

    /// Canonical pattern and weight of every DMR passing the prefilter.
    pub fn weighted_patterns(
        &self,
        table: &DmrTable,
    ) -> Vec<(Pattern, f64)> {
        table
            .iter()
            .filter(|record| self.passes_prefilter(record))
            .map(|record| (record.pattern.canonicalize(), record.weight()))
            .collect_vec()
    }

    fn grow_tree(
        &self,
        config: &DmTreeConfig,
        table: &DmrTable,
    ) -> anyhow::Result<Option<SplitNode>> {
        let entries = self.weighted_patterns(table);
        info!(
            "{} of {} DMRs pass the clustering prefilter",
            entries.len(),
            table.len()
        );
        DivisiveClusterBuilder::try_new(config)?.build(entries)
    }

    /// Clusters the groups of `table`. `Ok(None)` when no significant
    /// pattern exists, in which case the groups stay unclustered.
    pub fn cluster(
        &self,
        table: &DmrTable,
    ) -> anyhow::Result<Option<DmTreeResult>> {
        match self.grow_tree(&self.config, table)? {
            Some(tree) => {
                let assignment = ClusterAssignment::from_tree(&tree);
                info!(
                    "DMTree: {} nodes, depth {}, {} clusters",
                    tree.n_nodes(),
                    tree.max_depth(),
                    assignment.n_clusters()
                );
                Ok(Some(DmTreeResult { tree, assignment }))
            },
            None => {
                warn!("No cluster found. Check the data or lower the clustering thresholds");
                Ok(None)
            },
        }
    }

    /// Fully resolved tree for visualization: no weight floor and splits
    /// continue past `min_n_samples`.
    pub fn exhaustive_tree(
        &self,
        table: &DmrTable,
    ) -> anyhow::Result<Option<SplitNode>> {
        self.grow_tree(&self.config.exhaustive(), table)
    }
}

/// A discovered tree with its cluster assignment.
#[derive(Debug, Clone)]
pub struct DmTreeResult {
    tree:       SplitNode,
    assignment: ClusterAssignment,
}

impl DmTreeResult {
    pub fn tree(&self) -> &SplitNode { &self.tree }

    pub fn nodes(&self) -> &[TreeNode] { self.assignment.nodes() }

    pub fn assignment(&self) -> &ClusterAssignment { &self.assignment }

    pub fn labeler(
        &self,
        mode: LabelMode,
    ) -> DmTreeLabeler {
        DmTreeLabeler::new(&self.assignment, mode)
    }

    /// `DMTree` label column of `table`.
    pub fn label(
        &self,
        table: &DmrTable,
        mode: LabelMode,
    ) -> anyhow::Result<Vec<String>> {
        self.labeler(mode).label_column(table)
    }

    /// Per-node support counts over `table`.
    pub fn summary(
        &self,
        table: &DmrTable,
        mode: LabelMode,
    ) -> anyhow::Result<Vec<NodeSummary>> {
        let labels = self.labeler(mode).label_table(table)?;
        Ok(summarize(&self.assignment, &labels))
    }

    pub fn newick(
        &self,
        names: &[String],
    ) -> anyhow::Result<String> {
        to_newick(&self.tree, &self.assignment, names)
    }
}
