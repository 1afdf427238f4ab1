use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::enums::MethCode;
use crate::data_structs::pattern::Pattern;
use crate::getter_fn;

/// One candidate differentially methylated region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmrRecord {
    pub chr:      String,
    pub start:    u64,
    pub end:      u64,
    pub meandiff: f64,
    /// Mean methylation of every group, in group order.
    pub means:    Vec<f64>,
    pub pattern:  Pattern,
    /// Untouched input row, written back next to the tree labels.
    #[serde(skip)]
    pub raw:      Vec<String>,
}

/// Per-code counts and mean methylation levels of a DMR.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CodeSummary {
    pub n_hypo:     usize,
    pub n_int:      usize,
    pub n_hyper:    usize,
    pub mean_hypo:  Option<f64>,
    pub mean_int:   Option<f64>,
    pub mean_hyper: Option<f64>,
}

impl DmrRecord {
    pub fn new(
        chr: impl Into<String>,
        start: u64,
        end: u64,
        meandiff: f64,
        means: Vec<f64>,
        pattern: Pattern,
    ) -> Self {
        Self {
            chr: chr.into(),
            start,
            end,
            meandiff,
            means,
            pattern,
            raw: Vec::new(),
        }
    }

    /// Absolute mean difference, the DMR's contribution to a pattern's
    /// aggregated weight.
    pub fn weight(&self) -> f64 { self.meandiff.abs() }

    pub fn length(&self) -> u64 { self.end.saturating_sub(self.start) + 1 }

    /// Mean of [`DmrRecord::means`] over the groups carrying `code`.
    pub fn mean_of(
        &self,
        code: MethCode,
    ) -> Option<f64> {
        let (sum, n) = self
            .pattern
            .codes()
            .iter()
            .zip(self.means.iter())
            .filter(|(c, _)| **c == code)
            .fold((0.0, 0usize), |(s, n), (_, m)| (s + m, n + 1));
        if n == 0 {
            None
        }
        else {
            Some(sum / n as f64)
        }
    }

    pub fn code_summary(&self) -> CodeSummary {
        CodeSummary {
            n_hypo:     self.pattern.count(MethCode::Hypo),
            n_int:      self.pattern.count(MethCode::Intermediate),
            n_hyper:    self.pattern.count(MethCode::Hyper),
            mean_hypo:  self.mean_of(MethCode::Hypo),
            mean_int:   self.mean_of(MethCode::Intermediate),
            mean_hyper: self.mean_of(MethCode::Hyper),
        }
    }

    /// Sorted names of the groups carrying `code`.
    pub fn members(
        &self,
        code: MethCode,
        names: &[String],
    ) -> Vec<String> {
        self.pattern
            .codes()
            .iter()
            .zip(names.iter())
            .filter(|(c, _)| **c == code)
            .map(|(_, name)| name.clone())
            .sorted()
            .collect()
    }
}

/// DMR records sharing one group layout.
#[derive(Debug, Clone, Default)]
pub struct DmrTable {
    header:   Vec<String>,
    records:  Vec<DmrRecord>,
    n_groups: usize,
}

impl DmrTable {
    getter_fn!(header, Vec<String>);
    getter_fn!(records, Vec<DmrRecord>);

    /// Builds a table, checking that every pattern (and every non-empty
    /// means vector) has the same length.
    pub fn try_new(
        header: Vec<String>,
        records: Vec<DmrRecord>,
    ) -> anyhow::Result<Self> {
        let n_groups = records
            .first()
            .map(|r| r.pattern.len())
            .unwrap_or(0);
        for (idx, record) in records.iter().enumerate() {
            anyhow::ensure!(
                record.pattern.len() == n_groups,
                "DMR {} ({}:{}-{}) has pattern {} of length {}, expected {}",
                idx,
                record.chr,
                record.start,
                record.end,
                record.pattern,
                record.pattern.len(),
                n_groups
            );
            anyhow::ensure!(
                record.means.is_empty() || record.means.len() == n_groups,
                "DMR {} ({}:{}-{}) has {} group means, expected {}",
                idx,
                record.chr,
                record.start,
                record.end,
                record.means.len(),
                n_groups
            );
        }
        Ok(Self {
            header,
            records,
            n_groups,
        })
    }

    pub fn from_records(records: Vec<DmrRecord>) -> anyhow::Result<Self> {
        Self::try_new(Vec::new(), records)
    }

    pub fn n_groups(&self) -> usize { self.n_groups }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, DmrRecord> { self.records.iter() }

    pub fn into_records(self) -> Vec<DmrRecord> { self.records }
}
