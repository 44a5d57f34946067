//! Data types used by the scoring and aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzers::formula::Formula;

/// One temperature/humidity measurement for a single candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature: f64,
    pub humidity: f64,
}

/// A single observation extracted from a dataset.
///
/// `readings` follows the canonical candidate order of the dataset layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub number: usize,
    pub group: String,
    pub readings: Vec<Reading>,
    pub reference: Option<Reading>,
}

/// How per-candidate scores are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Lowest formula value wins.
    Lowest,
    /// Highest formula value wins.
    Highest,
    /// Score is the distance to the reference's formula value; smallest wins.
    ClosestToReference,
}

impl Metric {
    /// Returns `true` if score `a` is strictly better than `b`.
    pub fn better(self, a: f64, b: f64) -> bool {
        match self {
            Metric::Lowest | Metric::ClosestToReference => a < b,
            Metric::Highest => a > b,
        }
    }

    pub fn needs_reference(self) -> bool {
        matches!(self, Metric::ClosestToReference)
    }
}

/// A [`Row`] after scoring with one formula.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub number: usize,
    pub group: String,
    pub scores: Vec<f64>,
    pub reference_score: Option<f64>,
    /// Index into `scores` of the winning candidate.
    pub best: usize,
    /// Whether the winner beat the reference. `None` when there is no
    /// reference or the metric already measures against it.
    pub beats_reference: Option<bool>,
}

/// Aggregated statistics for one candidate within a group.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateStatistics {
    pub candidate: String,
    pub times_best: usize,
    pub times_better_than_reference: Option<usize>,
    pub mean_score: f64,
    pub score_stddev: f64,
}

/// Aggregated statistics for one group of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStatistics {
    pub group: String,
    pub rows: usize,
    pub reference_mean_score: Option<f64>,
    pub candidates: Vec<CandidateStatistics>,
}

/// One line of a statistics CSV.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatisticsRecord {
    pub group: String,
    pub candidate: String,
    pub rows: usize,
    pub times_best: usize,
    pub times_better_than_reference: Option<usize>,
    pub mean_score: f64,
    pub score_stddev: f64,
}

impl GroupStatistics {
    /// Flattens a group into one record per candidate, in canonical order.
    pub fn records(&self) -> impl Iterator<Item = StatisticsRecord> + '_ {
        self.candidates.iter().map(|c| StatisticsRecord {
            group: self.group.clone(),
            candidate: c.candidate.clone(),
            rows: self.rows,
            times_best: c.times_best,
            times_better_than_reference: c.times_better_than_reference,
            mean_score: c.mean_score,
            score_stddev: c.score_stddev,
        })
    }
}

/// Result of analyzing one dataset with one formula.
#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub dataset: String,
    pub output_file: String,
    pub formula: Formula,
    pub rows: usize,
    pub groups: Vec<GroupStatistics>,
    pub overall_winner: Option<String>,
}

/// Summary entry for the per-formula index listing.
#[derive(Debug, Serialize)]
pub struct DatasetIndexEntry {
    pub(crate) dataset: String,
    pub(crate) output_file: String,
    pub(crate) rows: usize,
    pub(crate) groups: usize,
    pub(crate) overall_winner: Option<String>,
}

/// Top-level index written as `<formula>/index.json`.
#[derive(Debug, Serialize)]
pub struct FormulaIndex {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) formula: Formula,
    pub(crate) datasets: Vec<DatasetIndexEntry>,
}
