//! Analytical tools built on the core data structures.
//!
//! - [`dmtree`]: divisive clustering of groups by recurring methylation
//!   difference patterns, cluster assignment and DMR tree labeling.
pub mod dmtree;
