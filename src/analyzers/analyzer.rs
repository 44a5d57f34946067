use crate::analyzers::aggregate::{aggregate, overall_winner};
use crate::analyzers::formula::Formula;
use crate::analyzers::score::score_rows;
use crate::analyzers::types::{DatasetIndexEntry, DatasetReport, FormulaIndex, Row};
use crate::config::{DatasetConfig, RunConfig};
use crate::inspect::audit;
use crate::loader::{extract_rows, load_table};
use crate::output::{INDEX_FILE, formula_dir, write_json, write_report};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Scores already-extracted rows with one formula and aggregates them.
pub fn analyze_rows(
    dataset: &DatasetConfig,
    rows: &[Row],
    formula: Formula,
) -> Result<DatasetReport> {
    let scored = score_rows(rows, formula, dataset.metric)
        .with_context(|| format!("scoring dataset '{}' with {formula}", dataset.name))?;

    let names = dataset.candidate_names();
    for row in &scored {
        debug!(
            dataset = %dataset.name,
            %formula,
            row = row.number,
            group = %row.group,
            best = %names[row.best],
            score = row.scores[row.best],
            reference_score = ?row.reference_score,
            beats_reference = ?row.beats_reference,
            "Row scored"
        );
    }

    let groups = aggregate(&names, &scored);
    let overall_winner = overall_winner(&groups);

    for group in &groups {
        info!(
            dataset = %dataset.name,
            %formula,
            group = %group.group,
            rows = group.rows,
            reference_mean_score = ?group.reference_mean_score,
            "Group aggregated"
        );
    }

    Ok(DatasetReport {
        dataset: dataset.name.clone(),
        output_file: dataset.output_file.clone(),
        formula,
        rows: rows.len(),
        groups,
        overall_winner,
    })
}

/// Loads one dataset and analyzes it with every formula.
///
/// Nothing is written; errors surface before any output exists.
#[tracing::instrument(skip_all, fields(dataset = %dataset.name, input = %dataset.input.display()))]
pub fn analyze_dataset(dataset: &DatasetConfig, formulas: &[Formula]) -> Result<Vec<DatasetReport>> {
    let table = load_table(&dataset.input)
        .with_context(|| format!("loading '{}'", dataset.input.display()))?;

    audit(&table).log(&dataset.name);

    let rows = extract_rows(&table, dataset)
        .with_context(|| format!("reading dataset '{}'", dataset.name))?;

    formulas
        .iter()
        .map(|&formula| analyze_rows(dataset, &rows, formula))
        .collect()
}

/// Analyzes every dataset of `config`, then writes all statistics and one
/// index per formula directory.
///
/// All datasets are computed before the first file is written, so a data
/// error leaves no partial output behind.
#[tracing::instrument(skip_all, fields(output_dir = %config.output_dir.display()))]
pub fn run(config: &RunConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;

    let mut reports = Vec::new();
    for dataset in &config.datasets {
        info!(dataset = %dataset.name, "Starting analysis");
        reports.extend(analyze_dataset(dataset, &config.formulas)?);
    }

    let mut written = Vec::new();
    for &formula in &config.formulas {
        let mut datasets = Vec::new();
        for report in reports.iter().filter(|r| r.formula == formula) {
            written.push(write_report(&config.output_dir, report)?);
            datasets.push(DatasetIndexEntry {
                dataset: report.dataset.clone(),
                output_file: report.output_file.clone(),
                rows: report.rows,
                groups: report.groups.len(),
                overall_winner: report.overall_winner.clone(),
            });
        }

        let index = FormulaIndex {
            generated_at: chrono::Utc::now(),
            formula,
            datasets,
        };
        let path = formula_dir(&config.output_dir, formula)?.join(INDEX_FILE);
        write_json(&path, &index)?;
        written.push(path);
    }

    info!(files = written.len(), "Analysis complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::Reading;

    fn rows() -> Vec<Row> {
        let r = |t: f64, h: f64| Reading {
            temperature: t,
            humidity: h,
        };
        vec![
            Row {
                number: 1,
                group: "s1".into(),
                readings: vec![r(20.0, 40.0), r(22.0, 42.0), r(24.0, 44.0)],
                reference: Some(r(30.0, 50.0)),
            },
            Row {
                number: 2,
                group: "s1".into(),
                readings: vec![r(26.0, 40.0), r(22.0, 42.0), r(24.0, 44.0)],
                reference: Some(r(20.0, 30.0)),
            },
        ]
    }

    #[test]
    fn test_analyze_rows_directions() {
        let dataset = DatasetConfig::directions("unused.csv", false);
        let report = analyze_rows(&dataset, &rows(), Formula::Mean).unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(report.groups.len(), 1);
        let g = &report.groups[0];
        assert_eq!(g.candidates[0].times_best, 1);
        assert_eq!(g.candidates[1].times_best, 1);
        assert_eq!(g.candidates[0].times_better_than_reference, Some(1));
        assert_eq!(g.candidates[1].times_better_than_reference, Some(0));
        assert_eq!(report.overall_winner.as_deref(), Some("south-glass"));
    }

    #[test]
    fn test_analyze_rows_is_deterministic() {
        let dataset = DatasetConfig::glassbox("g", "unused.csv");
        for formula in Formula::ALL {
            let a = analyze_rows(&dataset, &rows(), formula).unwrap();
            let b = analyze_rows(&dataset, &rows(), formula).unwrap();
            assert_eq!(a.groups, b.groups);
            assert_eq!(a.overall_winner, b.overall_winner);
        }
    }
}
