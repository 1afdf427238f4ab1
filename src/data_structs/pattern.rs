use std::fmt::Display;
use std::str::FromStr;

use anyhow::Context;
use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::enums::MethCode;

/// Separator of per-group codes in the wire representation.
pub const PATTERN_SEP: char = '|';
/// Marker the segmentation step writes for comparisons it could not settle.
pub const TO_BE_CONFIRMED: &str = "TBC";

/// Ordered per-group methylation direction codes of one DMR (or of a tree
/// node divider).
///
/// The wire form is the `|`-joined string of single digit codes, e.g.
/// `1|1|3|3`. Ordering is lexicographic over the codes, which for patterns
/// of equal length is identical to the ordering of their wire strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pattern(Vec<MethCode>);

impl Pattern {
    pub fn new(codes: Vec<MethCode>) -> Self { Self(codes) }

    /// Scope covering all `n` groups. Used as the divider of the root call.
    pub fn full_scope(n: usize) -> Self {
        Self(vec![MethCode::Intermediate; n])
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn codes(&self) -> &[MethCode] { &self.0 }

    pub fn get(
        &self,
        idx: usize,
    ) -> Option<MethCode> {
        self.0.get(idx).copied()
    }

    pub fn count(
        &self,
        code: MethCode,
    ) -> usize {
        self.0
            .iter()
            .filter(|c| **c == code)
            .count()
    }

    pub fn count_nonzero(&self) -> usize {
        self.0
            .iter()
            .filter(|c| !c.is_absent())
            .count()
    }

    pub fn has(
        &self,
        code: MethCode,
    ) -> bool {
        self.0.contains(&code)
    }

    /// Median of the hypo, intermediate and hyper counts.
    ///
    /// A pattern passes the `min_n_samples` gate only when at least two of
    /// the three codes are carried by that many groups.
    pub fn num_vs(&self) -> usize {
        let mut counts = [
            self.count(MethCode::Hypo),
            self.count(MethCode::Intermediate),
            self.count(MethCode::Hyper),
        ];
        counts.sort_unstable();
        counts[1]
    }

    /// Replaces every `from` code with `to`.
    pub fn fold(
        &self,
        from: MethCode,
        to: MethCode,
    ) -> Self {
        Self(
            self.0
                .iter()
                .map(|c| if *c == from { to } else { *c })
                .collect(),
        )
    }

    /// Keeps only the dominant extreme: the minority one is folded into
    /// intermediate. Ties fold hyper.
    pub fn canonicalize(&self) -> Self {
        if self.count(MethCode::Hyper) > self.count(MethCode::Hypo) {
            self.fold(MethCode::Hypo, MethCode::Intermediate)
        }
        else {
            self.fold(MethCode::Hyper, MethCode::Intermediate)
        }
    }

    /// Keeps the code at every position where `divider` equals `value` and
    /// forces [`MethCode::Absent`] elsewhere.
    pub fn mask(
        &self,
        divider: &Pattern,
        value: MethCode,
    ) -> Self {
        debug_assert_eq!(self.len(), divider.len());
        Self(
            self.0
                .iter()
                .zip(divider.0.iter())
                .map(|(c, d)| if *d == value { *c } else { MethCode::Absent })
                .collect(),
        )
    }

    /// Hypo and hyper exchanged.
    pub fn swapped(&self) -> Self {
        Self(self.0.iter().map(|c| c.swapped()).collect())
    }

    /// Whether `other` agrees with `self` at every nonzero position of
    /// `self`. A divider without any nonzero position covers nothing.
    pub fn covers(
        &self,
        other: &Pattern,
    ) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut any = false;
        for (d, c) in self.0.iter().zip(other.0.iter()) {
            if d.is_absent() {
                continue;
            }
            if d != c {
                return false;
            }
            any = true;
        }
        any
    }

    /// Decodes a raw comparison string of the segmentation step.
    ///
    /// Raw codes are `0..=4`: `0` and `4` are the outer extremes and are
    /// mapped to hypo and hyper, the rest keep their value. The raw string
    /// is oriented by the sign of the mean difference, so a positive
    /// `meandiff` swaps hypo and hyper. Returns `None` for rows marked
    /// [`TO_BE_CONFIRMED`].
    pub fn from_raw_comparison(
        raw: &str,
        meandiff: f64,
    ) -> anyhow::Result<Option<Self>> {
        let raw = raw.trim();
        if raw == TO_BE_CONFIRMED {
            return Ok(None);
        }
        let codes = raw
            .split(PATTERN_SEP)
            .map(|s| {
                let value: u8 = s
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid raw code '{}' in '{}'", s, raw))?;
                match value {
                    0 => Ok(MethCode::Hypo),
                    4 => Ok(MethCode::Hyper),
                    v => MethCode::try_from(v),
                }
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let pattern = Self(codes);
        if meandiff > 0.0 {
            Ok(Some(pattern.swapped()))
        }
        else {
            Ok(Some(pattern))
        }
    }

    /// Codes as a compact digit string without separators.
    pub fn to_digits(&self) -> String {
        self.0.iter().map(|c| c.as_char()).collect()
    }
}

impl From<Vec<MethCode>> for Pattern {
    fn from(value: Vec<MethCode>) -> Self { Self(value) }
}

impl FromStr for Pattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            anyhow::bail!("Empty pattern");
        }
        let codes = s
            .split(PATTERN_SEP)
            .map(MethCode::from_str)
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("Malformed pattern '{}'", s))?;
        Ok(Self(codes))
    }
}

impl Display for Pattern {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(&PATTERN_SEP.to_string()))
    }
}

impl Serialize for Pattern {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        Pattern::from_str(&s).map_err(serde::de::Error::custom)
    }
}
