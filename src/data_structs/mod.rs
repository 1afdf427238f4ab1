//! Core data types of the DMTree workflow.
//!
//! - [`MethCode`]: the per-group ternary direction code (plus "absent").
//! - [`Pattern`]: an ordered code vector with the canonicalization,
//!   masking and divider-matching operations the clustering engine is
//!   built on.
//! - [`DmrRecord`] / [`DmrTable`]: candidate DMRs as delivered by the
//!   segmentation step, validated to share one group layout.
pub mod dmr;
pub mod enums;
pub mod pattern;

pub use dmr::{
    CodeSummary,
    DmrRecord,
    DmrTable,
};
pub use enums::MethCode;
pub use pattern::{
    Pattern,
    PATTERN_SEP,
    TO_BE_CONFIRMED,
};
