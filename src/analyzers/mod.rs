//! Per-row scoring and grouped aggregation.
//!
//! This module turns extracted rows into per-candidate scores under one of
//! several formulas, picks a winner per row, and aggregates winners and mean
//! scores per group before the results are written out.

pub mod aggregate;
pub mod analyzer;
pub mod formula;
pub mod score;
pub mod types;
pub mod utility;
