//! Divisive (top-down) clustering of groups by recurring DMR patterns.
//!
//! Every accepted split picks the heaviest aggregated pattern passing the
//! thresholds as a divider, partitions the groups of the current scope by
//! their code in the divider (hypo, intermediate, hyper) and recurses into
//! each part with every pattern masked to that part. Each child scope is a
//! strict subset of its parent's, so the tree is at most N levels deep.
use log::{
    debug,
    trace,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::{
    MethCode,
    Pattern,
};
use crate::tools::dmtree::aggregate::{
    aggregate,
    WeightedPattern,
};
use crate::tools::dmtree::config::DmTreeConfig;

/// Flat record of an accepted split, as handed to report and plot
/// consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub pattern: Pattern,
    pub depth:   usize,
    pub weight:  f64,
}

/// Outcome of the recursion below one branch of a split.
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    /// No pattern passed the thresholds in this scope.
    Leaf,
    Split(Box<SplitNode>),
}

impl Branch {
    pub fn as_split(&self) -> Option<&SplitNode> {
        match self {
            Branch::Leaf => None,
            Branch::Split(node) => Some(node),
        }
    }

    pub fn is_leaf(&self) -> bool { matches!(self, Branch::Leaf) }
}

/// An accepted split together with the recursion result of its three
/// branches.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitNode {
    divider:  Pattern,
    depth:    usize,
    weight:   f64,
    /// Indexed by branch value: hypo, intermediate, hyper.
    children: [Branch; 3],
}

impl SplitNode {
    pub fn divider(&self) -> &Pattern { &self.divider }

    pub fn depth(&self) -> usize { self.depth }

    pub fn weight(&self) -> f64 { self.weight }

    pub fn children(&self) -> &[Branch; 3] { &self.children }

    /// Branch holding the groups whose divider code is `value`. `None` for
    /// [`MethCode::Absent`], which never labels a branch.
    pub fn child(
        &self,
        value: MethCode,
    ) -> Option<&Branch> {
        match value {
            MethCode::Hypo => Some(&self.children[0]),
            MethCode::Intermediate => Some(&self.children[1]),
            MethCode::Hyper => Some(&self.children[2]),
            MethCode::Absent => None,
        }
    }

    /// Whether none of the branches was split further.
    pub fn is_terminal(&self) -> bool {
        self.children.iter().all(Branch::is_leaf)
    }

    pub fn n_nodes(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(Branch::as_split)
            .map(SplitNode::n_nodes)
            .sum::<usize>()
    }

    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .filter_map(Branch::as_split)
            .map(SplitNode::max_depth)
            .max()
            .unwrap_or(self.depth)
    }

    /// Pre-order list of all splits: this node, then the hypo, intermediate
    /// and hyper subtrees.
    pub fn flatten(&self) -> Vec<TreeNode> {
        let mut out = Vec::with_capacity(self.n_nodes());
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(
        &self,
        out: &mut Vec<TreeNode>,
    ) {
        out.push(TreeNode {
            pattern: self.divider.clone(),
            depth:   self.depth,
            weight:  self.weight,
        });
        for child in self.children.iter().filter_map(Branch::as_split) {
            child.flatten_into(out);
        }
    }
}

/// Recursive splitter driven by [`DmTreeConfig`] thresholds.
#[derive(Debug, Clone)]
pub struct DivisiveClusterBuilder {
    min_sum_dmrs:  f64,
    min_n_samples: usize,
    full_tree:     bool,
}

impl DivisiveClusterBuilder {
    pub fn try_new(config: &DmTreeConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            min_sum_dmrs:  config.min_sum_dmrs,
            min_n_samples: config.min_n_samples,
            full_tree:     config.full_tree,
        })
    }

    /// Builds the split tree of a table of (canonical pattern, weight)
    /// entries.
    ///
    /// Returns `Ok(None)` when no pattern is heavier than `min_sum_dmrs`
    /// with `num_vs >= min_n_samples`, i.e. no cluster structure can be
    /// discovered. Fails if the patterns disagree in length.
    pub fn build<I>(
        &self,
        table: I,
    ) -> anyhow::Result<Option<SplitNode>>
    where
        I: IntoIterator<Item = (Pattern, f64)>, {
        let entries = table.into_iter().collect::<Vec<_>>();
        let n_groups = match entries.first() {
            Some((pattern, _)) => pattern.len(),
            None => {
                debug!("Empty pattern table, nothing to split");
                return Ok(None);
            },
        };
        if let Some((pattern, _)) = entries
            .iter()
            .find(|(pattern, _)| pattern.len() != n_groups)
        {
            anyhow::bail!(
                "Pattern {} has length {}, expected {} groups",
                pattern,
                pattern.len(),
                n_groups
            );
        }

        let ranked = aggregate(entries);
        let divider = ranked.iter().find(|candidate| {
            candidate.weight > self.min_sum_dmrs
                && candidate.pattern.num_vs() >= self.min_n_samples
        });

        match divider {
            Some(divider) => {
                debug!(
                    "Root split {} (weight {:.3}) among {} patterns",
                    divider.pattern,
                    divider.weight,
                    ranked.len()
                );
                let scope = Pattern::full_scope(n_groups);
                Ok(Some(self.split(&scope, divider, &ranked, 0)))
            },
            None => {
                debug!(
                    "No pattern passes weight > {} and num_vs >= {}",
                    self.min_sum_dmrs, self.min_n_samples
                );
                Ok(None)
            },
        }
    }

    /// Emits a node for `divider` and recurses into its three branches.
    fn split(
        &self,
        scope: &Pattern,
        divider: &WeightedPattern,
        ranked: &[WeightedPattern],
        depth: usize,
    ) -> SplitNode {
        let children = MethCode::BRANCHES.map(|value| {
            let child_scope = divider.pattern.mask(&divider.pattern, value);
            debug_assert!(child_scope.count_nonzero() < scope.count_nonzero());
            let child_table = ranked
                .iter()
                .map(|entry| (entry.pattern.mask(&divider.pattern, value), entry.weight));
            self.grow(&child_scope, child_table, depth + 1)
        });

        SplitNode {
            divider: divider.pattern.clone(),
            depth,
            weight: divider.weight,
            children,
        }
    }

    fn grow<I>(
        &self,
        scope: &Pattern,
        table: I,
        depth: usize,
    ) -> Branch
    where
        I: IntoIterator<Item = (Pattern, f64)>, {
        // With a single group left no pattern can have two sides.
        if scope.count_nonzero() < 2 {
            return Branch::Leaf;
        }

        let ranked = aggregate(table);
        let divider = self
            .scan(&ranked, |p| p.num_vs() >= self.min_n_samples)
            .or_else(|| {
                if self.full_tree {
                    self.scan(&ranked, |p| p.num_vs() != 0)
                }
                else {
                    None
                }
            });

        match divider {
            Some(divider) => {
                debug!(
                    "Split at depth {}: {} (weight {:.3})",
                    depth, divider.pattern, divider.weight
                );
                Branch::Split(Box::new(self.split(scope, divider, &ranked, depth)))
            },
            None => {
                trace!("Leaf at depth {} for scope {}", depth, scope);
                Branch::Leaf
            },
        }
    }

    /// First candidate accepted by `accept`, in ranked order. Reaching a
    /// candidate lighter than `min_sum_dmrs` ends the scan.
    fn scan<'r, F>(
        &self,
        ranked: &'r [WeightedPattern],
        accept: F,
    ) -> Option<&'r WeightedPattern>
    where
        F: Fn(&Pattern) -> bool, {
        for candidate in ranked {
            if candidate.weight < self.min_sum_dmrs {
                return None;
            }
            if accept(&candidate.pattern) {
                return Some(candidate);
            }
        }
        None
    }
}
