use std::borrow::Cow;
use std::fmt::Display;

use itertools::Itertools;
use log::info;
use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::{
    DmrTable,
    MethCode,
    Pattern,
};
use crate::tools::dmtree::assign::ClusterAssignment;

/// Which layout the labeled DMR table has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelMode {
    /// One code per group (sample); compared with the node dividers.
    Unsupervised,
    /// One code per discovered cluster, e.g. from re-testing the clusters
    /// as groups; compared with the per-cluster node encodings. Columns
    /// follow [`ClusterAssignment::encoding_clusters`].
    Supervised,
}

/// How a DMR's direction aligns with a divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Divider matched as is.
    Direct,
    /// Divider matched with hypo and hyper exchanged.
    Reversed,
}

impl Polarity {
    pub fn tag(self) -> char {
        match self {
            Polarity::Direct => 'P',
            Polarity::Reversed => 'N',
        }
    }
}

/// Support of a DMR for one tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DmrLabel {
    pub node:     usize,
    pub polarity: Polarity,
}

/// Re-applies the discovered tree to a DMR table.
#[derive(Debug, Clone)]
pub struct DmTreeLabeler {
    mode:     LabelMode,
    dividers: Vec<Pattern>,
    node_ids: Vec<String>,
}

impl DmTreeLabeler {
    pub fn new(
        assignment: &ClusterAssignment,
        mode: LabelMode,
    ) -> Self {
        let dividers = match mode {
            LabelMode::Unsupervised => assignment
                .nodes()
                .iter()
                .map(|node| node.pattern.clone())
                .collect_vec(),
            LabelMode::Supervised => assignment.encodings().to_vec(),
        };
        let node_ids = assignment
            .encodings()
            .iter()
            .map(Pattern::to_string)
            .collect_vec();
        Self {
            mode,
            dividers,
            node_ids,
        }
    }

    pub fn mode(&self) -> LabelMode { self.mode }

    /// Pattern length the labeled table must have.
    pub fn width(&self) -> usize {
        self.dividers
            .first()
            .map(Pattern::len)
            .unwrap_or(0)
    }

    pub fn node_ids(&self) -> &[String] { &self.node_ids }

    /// Every node the pattern supports, in node order, direct before
    /// reversed.
    pub fn labels_of(
        &self,
        pattern: &Pattern,
    ) -> Vec<DmrLabel> {
        let canonical = match self.mode {
            LabelMode::Unsupervised => Some(pattern.canonicalize()),
            LabelMode::Supervised => None,
        };
        let mut labels = Vec::new();
        for (node, divider) in self.dividers.iter().enumerate() {
            let reversed = divider.swapped();
            let (direct, inverse) = match &canonical {
                Some(canonical) => {
                    (divider.covers(canonical), reversed.covers(pattern))
                },
                None => (
                    divider.covers(&align_to(pattern, divider)),
                    reversed.covers(&align_to(pattern, &reversed)),
                ),
            };
            if direct {
                labels.push(DmrLabel {
                    node,
                    polarity: Polarity::Direct,
                });
            }
            if inverse {
                labels.push(DmrLabel {
                    node,
                    polarity: Polarity::Reversed,
                });
            }
        }
        labels
    }

    /// Label tokens `P<id>,`/`N<id>,` concatenated. Labels of nodes this
    /// labeler does not know are skipped.
    pub fn format(
        &self,
        labels: &[DmrLabel],
    ) -> String {
        labels
            .iter()
            .filter_map(|label| {
                self.node_ids.get(label.node).map(|id| {
                    LabelToken {
                        polarity: label.polarity,
                        id:       id.as_str(),
                    }
                    .to_string()
                })
            })
            .collect()
    }

    /// Labels of every DMR of `table`, in table order.
    pub fn label_table(
        &self,
        table: &DmrTable,
    ) -> anyhow::Result<Vec<Vec<DmrLabel>>> {
        anyhow::ensure!(
            table.is_empty() || table.n_groups() == self.width(),
            "DMR table has {} groups, tree dividers have {} ({:?} mode)",
            table.n_groups(),
            self.width(),
            self.mode
        );
        let labels = table
            .records()
            .par_iter()
            .map(|record| self.labels_of(&record.pattern))
            .collect::<Vec<_>>();
        info!(
            "{} of {} DMRs support at least one tree node",
            labels.iter().filter(|l| !l.is_empty()).count(),
            labels.len()
        );
        Ok(labels)
    }

    /// The `DMTree` column of `table`.
    pub fn label_column(
        &self,
        table: &DmrTable,
    ) -> anyhow::Result<Vec<String>> {
        Ok(self
            .label_table(table)?
            .iter()
            .map(|labels| self.format(labels))
            .collect())
    }
}

/// Folds the extreme the divider lacks into intermediate, so that a
/// one-sided divider is compared against the same side of the DMR.
fn align_to<'a>(
    pattern: &'a Pattern,
    divider: &Pattern,
) -> Cow<'a, Pattern> {
    match (divider.has(MethCode::Hypo), divider.has(MethCode::Hyper)) {
        (true, true) => Cow::Borrowed(pattern),
        (false, true) => Cow::Owned(pattern.fold(MethCode::Hypo, MethCode::Intermediate)),
        _ => Cow::Owned(pattern.fold(MethCode::Hyper, MethCode::Intermediate)),
    }
}

struct LabelToken<'a> {
    polarity: Polarity,
    id:       &'a str,
}

impl Display for LabelToken<'_> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}{},", self.polarity.tag(), self.id)
    }
}
