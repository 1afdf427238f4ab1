pub use crate::data_structs::{
    CodeSummary,
    DmrRecord,
    DmrTable,
    MethCode,
    Pattern,
};
pub use crate::io::{
    write_clusters,
    write_labeled_dmrs,
    write_processed_dmrs,
    write_newick,
    write_node_summary,
    write_nodes_json,
    DmrTableReader,
};
pub use crate::tools::dmtree::{
    ClusterAssignment,
    DivisiveClusterBuilder,
    DmTree,
    DmTreeConfig,
    DmTreeLabeler,
    DmTreeResult,
    LabelMode,
    SplitNode,
    TreeNode,
};
