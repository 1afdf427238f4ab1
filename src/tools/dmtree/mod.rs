//! DMTree: divisive clustering of groups by recurring DMR patterns.
//!
//! The workflow runs in stages:
//!
//! 1. every DMR pattern is canonicalized ([`Pattern::canonicalize`]),
//! 2. patterns are aggregated by summed `|meandiff|` ([`aggregate()`]),
//! 3. [`DivisiveClusterBuilder`] recursively picks splitting patterns,
//! 4. [`ClusterAssignment`] turns the split list into `G<idx>` clusters,
//! 5. [`DmTreeLabeler`] marks every DMR with the nodes it supports.
//!
//! [`DmTree`] bundles stages 1-4 behind a [`DmTreeConfig`].
//!
//! [`Pattern::canonicalize`]: crate::data_structs::Pattern::canonicalize
mod aggregate;
mod assign;
mod builder;
mod config;
mod label;
mod newick;
mod pipeline;
mod summary;

pub use aggregate::{
    aggregate,
    WeightedPattern,
};
pub use assign::{
    cluster_name,
    ClusterAssignment,
    CLUSTER_PREFIX,
};
pub use builder::{
    Branch,
    DivisiveClusterBuilder,
    SplitNode,
    TreeNode,
};
pub use config::DmTreeConfig;
pub use label::{
    DmTreeLabeler,
    DmrLabel,
    LabelMode,
    Polarity,
};
pub use newick::to_newick;
pub use pipeline::{
    DmTree,
    DmTreeResult,
};
pub use summary::{
    children_of,
    summarize,
    NodeSummary,
};
