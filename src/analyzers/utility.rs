use crate::analyzers::types::Metric;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Index of the best value under `metric`. Ties go to the earliest index.
/// Returns `None` for empty input.
pub fn best_index(values: &[f64], metric: Metric) -> Option<usize> {
    let mut iter = values.iter().enumerate();
    let (mut best, mut best_value) = iter.next().map(|(i, v)| (i, *v))?;
    for (i, &v) in iter {
        if metric.better(v, best_value) {
            best = i;
            best_value = v;
        }
    }
    Some(best)
}
