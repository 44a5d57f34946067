use crate::analyzers::formula::Formula;
use crate::analyzers::types::{Metric, Row, ScoredRow};
use crate::analyzers::utility::best_index;
use crate::error::DataError;

/// Scores every candidate of `row` with `formula` and picks the winner under `metric`.
///
/// With [`Metric::ClosestToReference`] each candidate's score is the absolute
/// difference between its formula value and the reference's.
pub fn score_row(row: &Row, formula: Formula, metric: Metric) -> Result<ScoredRow, DataError> {
    let reference_score = row.reference.map(|r| formula.apply(r));

    let scores: Vec<f64> = match metric {
        Metric::ClosestToReference => {
            let reference =
                reference_score.ok_or(DataError::MissingReference { row: row.number })?;
            row.readings
                .iter()
                .map(|r| (formula.apply(*r) - reference).abs())
                .collect()
        }
        Metric::Lowest | Metric::Highest => {
            row.readings.iter().map(|r| formula.apply(*r)).collect()
        }
    };

    let best = best_index(&scores, metric).ok_or(DataError::NoCandidates { row: row.number })?;

    let beats_reference = match metric {
        Metric::ClosestToReference => None,
        Metric::Lowest | Metric::Highest => {
            reference_score.map(|reference| metric.better(scores[best], reference))
        }
    };

    Ok(ScoredRow {
        number: row.number,
        group: row.group.clone(),
        scores,
        reference_score,
        best,
        beats_reference,
    })
}

/// Scores all rows, stopping at the first error.
pub fn score_rows(rows: &[Row], formula: Formula, metric: Metric) -> Result<Vec<ScoredRow>, DataError> {
    rows.iter().map(|r| score_row(r, formula, metric)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::Reading;

    fn reading(temperature: f64, humidity: f64) -> Reading {
        Reading {
            temperature,
            humidity,
        }
    }

    fn row(readings: Vec<Reading>, reference: Option<Reading>) -> Row {
        Row {
            number: 1,
            group: "all".to_string(),
            readings,
            reference,
        }
    }

    #[test]
    fn test_lowest_mean_wins_and_beats_north() {
        let r = row(
            vec![reading(30.0, 60.0), reading(20.0, 50.0), reading(25.0, 55.0)],
            Some(reading(26.0, 58.0)),
        );
        let scored = score_row(&r, Formula::Mean, Metric::Lowest).unwrap();

        assert_eq!(scored.scores, vec![45.0, 35.0, 40.0]);
        assert_eq!(scored.best, 1);
        assert_eq!(scored.reference_score, Some(42.0));
        assert_eq!(scored.beats_reference, Some(true));
    }

    #[test]
    fn test_reference_comparison_is_strict() {
        let r = row(vec![reading(10.0, 20.0)], Some(reading(20.0, 10.0)));
        let scored = score_row(&r, Formula::Mean, Metric::Lowest).unwrap();
        assert_eq!(scored.beats_reference, Some(false));
    }

    #[test]
    fn test_highest_metric() {
        let r = row(vec![reading(10.0, 10.0), reading(40.0, 40.0)], Some(reading(50.0, 50.0)));
        let scored = score_row(&r, Formula::Mean, Metric::Highest).unwrap();
        assert_eq!(scored.best, 1);
        assert_eq!(scored.beats_reference, Some(false));
    }

    #[test]
    fn test_closest_to_reference_uses_absolute_difference() {
        let r = row(
            vec![reading(30.0, 50.0), reading(20.0, 40.0), reading(22.0, 50.0)],
            Some(reading(24.0, 50.0)),
        );
        let scored = score_row(&r, Formula::SimpleHeatIndex, Metric::ClosestToReference).unwrap();

        // env = 24 + 16.5 - 0.7 = 39.8
        let expected = [6.0, 7.3, 2.0];
        for (got, want) in scored.scores.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9);
        }
        assert_eq!(scored.best, 2);
        assert_eq!(scored.beats_reference, None);
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let r = row(
            vec![reading(20.0, 40.0), reading(10.0, 50.0), reading(40.0, 20.0)],
            None,
        );
        let scored = score_row(&r, Formula::Mean, Metric::Lowest).unwrap();
        assert_eq!(scored.best, 0);
        assert_eq!(scored.beats_reference, None);
    }

    #[test]
    fn test_closest_without_reference_fails() {
        let r = row(vec![reading(1.0, 1.0)], None);
        let err = score_row(&r, Formula::Mean, Metric::ClosestToReference).unwrap_err();
        assert!(matches!(err, DataError::MissingReference { row: 1 }));
    }

    #[test]
    fn test_no_candidates_fails() {
        let r = row(vec![], None);
        let err = score_row(&r, Formula::Mean, Metric::Lowest).unwrap_err();
        assert!(matches!(err, DataError::NoCandidates { row: 1 }));
    }

    #[test]
    fn test_winner_is_never_worse_than_any_candidate() {
        let rows: Vec<Row> = (0..20)
            .map(|i| {
                let f = i as f64;
                row(
                    vec![
                        reading(20.0 + (f * 1.7) % 9.0, 40.0 + (f * 3.1) % 20.0),
                        reading(22.0 + (f * 2.3) % 7.0, 35.0 + (f * 1.3) % 25.0),
                        reading(19.0 + (f * 0.9) % 11.0, 45.0 + (f * 2.9) % 15.0),
                    ],
                    Some(reading(25.0, 50.0)),
                )
            })
            .collect();

        for formula in Formula::ALL {
            for metric in [Metric::Lowest, Metric::Highest, Metric::ClosestToReference] {
                for scored in score_rows(&rows, formula, metric).unwrap() {
                    let best = scored.scores[scored.best];
                    for &s in &scored.scores {
                        assert!(!metric.better(s, best), "{formula} {metric:?}: {s} beats {best}");
                    }
                }
            }
        }
    }
}
