//! # dmtree
//!
//! `dmtree` discovers a hierarchical clustering of samples (or sample
//! groups) from the differentially methylated regions (DMRs) found between
//! them. Every DMR carries a per-group direction code (hypo, intermediate,
//! hyper, or absent); recurring code patterns, weighted by the DMRs' mean
//! methylation difference, drive a greedy top-down split of the groups
//! into clusters. The discovered tree is then re-applied to any DMR table
//! to label each DMR with the splits it supports.
//!
//! ## Structure
//!
//! * [`data_structs`]: methylation codes ([`MethCode`]), code patterns
//!   ([`Pattern`]) and DMR records ([`DmrRecord`], [`DmrTable`]).
//! * [`tools`]: the clustering engine ([`tools::dmtree`]): pattern
//!   aggregation, the divisive split builder, cluster assignment, DMR tree
//!   labeling and Newick rendering.
//! * [`io`]: reading the segmentation DMR table and writing the cluster,
//!   node and label tables.
//! * [`utils`]: helper macros.
//!
//! ## Usage
//!
//! ```no_run
//! use std::fs::File;
//! use dmtree::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let dmrs = DmrTableReader::default().read_path("DMRs-unsupervised.tsv")?;
//!     let dmtree = DmTree::try_new(DmTreeConfig::default())?;
//!
//!     match dmtree.cluster(&dmrs)? {
//!         Some(result) => {
//!             let names: Vec<String> =
//!                 (0..dmrs.n_groups()).map(|i| format!("Sample{}", i)).collect();
//!             write_clusters(File::create("clusters.tsv")?, result.assignment(), &names)?;
//!
//!             let labels = result.label(&dmrs, LabelMode::Unsupervised)?;
//!             write_labeled_dmrs(File::create("DMRs-labeled.tsv")?, &dmrs, &labels)?;
//!             println!("{}", result.newick(&names)?);
//!         },
//!         None => println!("No cluster found"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Thresholds are configured with [`DmTreeConfig`]; with no pattern heavy
//! enough to split the groups, [`DmTree::cluster`] returns `None` and the
//! groups stay unclustered.

pub mod data_structs;
pub mod io;
pub mod prelude;
pub mod tools;
pub mod utils;

#[allow(unused_imports)]
use prelude::*;
