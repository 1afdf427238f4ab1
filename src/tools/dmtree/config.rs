use serde::{
    Deserialize,
    Serialize,
};

use crate::with_field_fn;

/// Thresholds of the DMTree clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmTreeConfig {
    /// Floor on the aggregated weight of a splitting pattern.
    pub min_sum_dmrs:     f64,
    /// Floor on [`Pattern::num_vs`](crate::data_structs::Pattern::num_vs)
    /// of a splitting pattern.
    pub min_n_samples:    usize,
    /// Keep splitting past `min_n_samples` while some pattern still has
    /// both sides represented.
    pub full_tree:        bool,
    /// A DMR enters clustering only if at least this many groups are hypo
    /// and at least this many are hyper.
    pub min_n0:           usize,
    /// A DMR enters clustering only if `|meandiff|` exceeds this.
    pub min_abs_meandiff: f64,
}

impl DmTreeConfig {
    with_field_fn!(min_sum_dmrs, f64);
    with_field_fn!(min_n_samples, usize);
    with_field_fn!(full_tree, bool);
    with_field_fn!(min_n0, usize);
    with_field_fn!(min_abs_meandiff, f64);

    pub fn new(
        min_sum_dmrs: f64,
        min_n_samples: usize,
        full_tree: bool,
    ) -> Self {
        Self {
            min_sum_dmrs,
            min_n_samples,
            full_tree,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.min_n_samples > 0,
            "min_n_samples must be positive, otherwise splits may never shrink"
        );
        anyhow::ensure!(
            self.min_sum_dmrs.is_finite() && self.min_sum_dmrs >= 0.0,
            "min_sum_dmrs must be a non-negative number, got {}",
            self.min_sum_dmrs
        );
        anyhow::ensure!(
            self.min_abs_meandiff.is_finite() && self.min_abs_meandiff >= 0.0,
            "min_abs_meandiff must be a non-negative number, got {}",
            self.min_abs_meandiff
        );
        Ok(())
    }

    /// Configuration of the fully resolved tree rendered next to the
    /// clustering: no weight floor and `full_tree` enabled.
    pub fn exhaustive(&self) -> Self {
        self.clone()
            .with_min_sum_dmrs(0.0)
            .with_full_tree(true)
    }
}

impl Default for DmTreeConfig {
    fn default() -> Self {
        Self {
            min_sum_dmrs:     100.0,
            min_n_samples:    3,
            full_tree:        false,
            min_n0:           2,
            min_abs_meandiff: 0.5,
        }
    }
}
