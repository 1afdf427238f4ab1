//! Boundary I/O of the DMTree workflow.
//!
//! - [`DmrTableReader`] loads the tab-separated DMR table produced by the
//!   segmentation step.
//! - [`write_labeled_dmrs`] writes that table back with the `DMTree` label
//!   column appended; [`write_processed_dmrs`] also appends per-code
//!   counts, means and member groups.
//! - [`write_clusters`], [`write_nodes_json`], [`write_node_summary`] and
//!   [`write_newick`] serialize the clustering for report and plot
//!   consumers.
mod dmr;
mod tree;

pub use dmr::{
    write_labeled_dmrs,
    write_processed_dmrs,
    DmrTableReader,
    DMTREE_COL,
};
pub use tree::{
    write_clusters,
    write_newick,
    write_node_summary,
    write_nodes_json,
};
