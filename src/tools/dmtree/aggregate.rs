use std::cmp::Ordering;

use hashbrown::HashMap;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::Pattern;

/// A distinct pattern with the summed weight of every entry sharing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPattern {
    pub pattern: Pattern,
    pub weight:  f64,
}

impl WeightedPattern {
    pub fn new(
        pattern: Pattern,
        weight: f64,
    ) -> Self {
        Self { pattern, weight }
    }

    /// Descending weight, equal weights in ascending pattern order.
    fn rank(
        &self,
        other: &Self,
    ) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| self.pattern.cmp(&other.pattern))
    }
}

/// Groups entries by exact pattern equality and sums their weights.
///
/// The result is ranked by descending summed weight; exact ties are broken
/// by ascending (lexicographic) pattern order, so the ranking never depends
/// on input order.
pub fn aggregate<I>(entries: I) -> Vec<WeightedPattern>
where
    I: IntoIterator<Item = (Pattern, f64)>, {
    let mut sums: HashMap<Pattern, f64> = HashMap::new();
    for (pattern, weight) in entries {
        *sums.entry(pattern).or_insert(0.0) += weight;
    }
    let mut ranked = sums
        .into_iter()
        .map(|(pattern, weight)| WeightedPattern::new(pattern, weight))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| a.rank(b));
    ranked
}
