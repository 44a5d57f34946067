//! Writes analysis results under `<output_dir>/<formula>/`: one statistics CSV
//! per dataset and an [`INDEX_FILE`] listing the datasets of that formula.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analyzers::formula::Formula;
use crate::analyzers::types::{DatasetReport, GroupStatistics};
use csv::WriterBuilder;

/// Name of the per-formula index written next to the statistics files.
pub const INDEX_FILE: &str = "index.json";

/// Logs group statistics using Rust's debug pretty-print format.
pub fn print_pretty(groups: &[GroupStatistics]) {
    debug!("{:#?}", groups);
}

/// Returns `<output_dir>/<formula>`, creating it if needed.
pub fn formula_dir(output_dir: &Path, formula: Formula) -> Result<PathBuf> {
    let dir = output_dir.join(formula.as_str());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory '{}'", dir.display()))?;
    Ok(dir)
}

/// Writes group statistics as a CSV file, one row per group and candidate.
///
/// An existing file is replaced. The header is written even when there are no groups.
pub fn write_statistics(path: &Path, groups: &[GroupStatistics]) -> Result<()> {
    debug!(path = %path.display(), groups = groups.len(), "Writing statistics CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating '{}'", path.display()))?;

    writer.write_record([
        "group",
        "candidate",
        "rows",
        "times_best",
        "times_better_than_reference",
        "mean_score",
        "score_stddev",
    ])?;
    for group in groups {
        for record in group.records() {
            writer.serialize(record)?;
        }
    }
    writer.flush()?;

    Ok(())
}

/// Serializes a value as pretty-printed JSON to `path`.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("writing '{}'", path.display()))?;
    Ok(())
}

/// Writes each report's statistics into its formula directory.
pub fn write_report(output_dir: &Path, report: &DatasetReport) -> Result<PathBuf> {
    let dir = formula_dir(output_dir, report.formula)?;
    let path = dir.join(&report.output_file);
    write_statistics(&path, &report.groups)?;
    print_pretty(&report.groups);
    info!(
        dataset = %report.dataset,
        formula = %report.formula,
        path = %path.display(),
        "Statistics saved"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::{CandidateStatistics, StatisticsRecord};
    use std::fs;

    fn group() -> GroupStatistics {
        GroupStatistics {
            group: "all".to_string(),
            rows: 3,
            reference_mean_score: Some(41.0),
            candidates: vec![
                CandidateStatistics {
                    candidate: "south-glass".to_string(),
                    times_best: 2,
                    times_better_than_reference: Some(1),
                    mean_score: 40.5,
                    score_stddev: 0.5,
                },
                CandidateStatistics {
                    candidate: "west-glass".to_string(),
                    times_best: 1,
                    times_better_than_reference: Some(1),
                    mean_score: 42.0,
                    score_stddev: 1.0,
                },
            ],
        }
    }

    #[test]
    fn test_formula_dir_created() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = formula_dir(&tmp.path().join("nested"), Formula::HeatIndex).unwrap();
        assert!(dir.is_dir());
        assert!(dir.ends_with("nested/heat_index"));
    }

    #[test]
    fn test_write_statistics_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stats.csv");
        write_statistics(&path, &[group()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "group,candidate,rows,times_best,times_better_than_reference,mean_score,score_stddev"
        );
        assert_eq!(lines[1], "all,south-glass,3,2,1,40.5,0.5");

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let records: Vec<StatisticsRecord> = rdr.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(records[1].candidate, "west-glass");
        assert_eq!(records[1].times_better_than_reference, Some(1));
    }

    #[test]
    fn test_write_statistics_overwrites_and_keeps_header_when_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stats.csv");
        write_statistics(&path, &[group()]).unwrap();
        write_statistics(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("group,"));
    }

    #[test]
    fn test_missing_reference_comparison_is_blank() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("glass.csv");
        let mut g = group();
        for c in &mut g.candidates {
            c.times_better_than_reference = None;
        }
        write_statistics(&path, &[g]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().nth(1), Some("all,south-glass,3,2,,40.5,0.5"));
    }

    #[test]
    fn test_write_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("index.json");
        write_json(&path, &serde_json::json!({ "formula": Formula::Mean })).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["formula"], "mean");
    }
}
