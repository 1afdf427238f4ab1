use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

/// Per-group methylation direction code, as emitted by the segmentation
/// step and used in every DMTree pattern.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum MethCode {
    /// Not significant, or masked out of the current scope.
    #[default]
    Absent       = 0,
    /// Lower methylation relative to the comparison.
    Hypo         = 1,
    /// Neither extreme.
    Intermediate = 2,
    /// Higher methylation relative to the comparison.
    Hyper        = 3,
}

impl MethCode {
    /// All codes which may label a branch of a split.
    pub const BRANCHES: [MethCode; 3] =
        [MethCode::Hypo, MethCode::Intermediate, MethCode::Hyper];

    /// Exchanges hypo and hyper, leaving the other codes untouched.
    pub fn swapped(self) -> Self {
        match self {
            MethCode::Hypo => MethCode::Hyper,
            MethCode::Hyper => MethCode::Hypo,
            other => other,
        }
    }

    pub fn is_absent(self) -> bool { self == MethCode::Absent }

    pub fn as_char(self) -> char {
        match self {
            MethCode::Absent => '0',
            MethCode::Hypo => '1',
            MethCode::Intermediate => '2',
            MethCode::Hyper => '3',
        }
    }
}

impl TryFrom<char> for MethCode {
    type Error = anyhow::Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '0' => Ok(MethCode::Absent),
            '1' => Ok(MethCode::Hypo),
            '2' => Ok(MethCode::Intermediate),
            '3' => Ok(MethCode::Hyper),
            other => anyhow::bail!("Invalid methylation code '{}'", other),
        }
    }
}

impl TryFrom<u8> for MethCode {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MethCode::Absent),
            1 => Ok(MethCode::Hypo),
            2 => Ok(MethCode::Intermediate),
            3 => Ok(MethCode::Hyper),
            other => anyhow::bail!("Invalid methylation code {}", other),
        }
    }
}

impl From<MethCode> for u8 {
    fn from(value: MethCode) -> Self { value as u8 }
}

impl FromStr for MethCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => MethCode::try_from(c),
            _ => anyhow::bail!("Invalid methylation code '{}'", s),
        }
    }
}

impl Display for MethCode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for MethCode {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MethCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        MethCode::from_str(&s).map_err(serde::de::Error::custom)
    }
}
