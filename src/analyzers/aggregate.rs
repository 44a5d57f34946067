use crate::analyzers::types::{CandidateStatistics, GroupStatistics, ScoredRow};
use crate::analyzers::utility::{mean, stddev};
use std::collections::HashMap;

#[derive(Default)]
struct GroupAccumulator {
    rows: usize,
    wins: Vec<usize>,
    reference_wins: Vec<usize>,
    compared_to_reference: bool,
    score_series: Vec<Vec<f64>>,
    reference_series: Vec<f64>,
}

impl GroupAccumulator {
    fn new(candidates: usize) -> Self {
        Self {
            wins: vec![0; candidates],
            reference_wins: vec![0; candidates],
            score_series: vec![Vec::new(); candidates],
            ..Default::default()
        }
    }

    fn push(&mut self, row: &ScoredRow) {
        self.rows += 1;
        self.wins[row.best] += 1;

        if let Some(beats) = row.beats_reference {
            self.compared_to_reference = true;
            if beats {
                self.reference_wins[row.best] += 1;
            }
        }

        for (series, score) in self.score_series.iter_mut().zip(&row.scores) {
            series.push(*score);
        }

        if let Some(reference) = row.reference_score {
            self.reference_series.push(reference);
        }
    }

    fn finish(self, group: String, candidates: &[String]) -> GroupStatistics {
        let candidates = candidates
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let avg = mean(&self.score_series[i]);
                CandidateStatistics {
                    candidate: name.clone(),
                    times_best: self.wins[i],
                    times_better_than_reference: self
                        .compared_to_reference
                        .then_some(self.reference_wins[i]),
                    mean_score: avg,
                    score_stddev: stddev(&self.score_series[i], avg),
                }
            })
            .collect();

        GroupStatistics {
            group,
            rows: self.rows,
            reference_mean_score: (!self.reference_series.is_empty())
                .then(|| mean(&self.reference_series)),
            candidates,
        }
    }
}

/// Groups scored rows by their group label and aggregates wins and scores.
///
/// Groups come out in the order they are first encountered; candidates keep
/// the order of `candidates`, which must match the order of each row's scores.
pub fn aggregate(candidates: &[String], rows: &[ScoredRow]) -> Vec<GroupStatistics> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, GroupAccumulator> = HashMap::new();

    for row in rows {
        let acc = groups.entry(row.group.clone()).or_insert_with(|| {
            order.push(row.group.clone());
            GroupAccumulator::new(candidates.len())
        });
        acc.push(row);
    }

    order
        .into_iter()
        .filter_map(|name| {
            let acc = groups.remove(&name)?;
            Some(acc.finish(name, candidates))
        })
        .collect()
}

/// Total wins per candidate across all groups, in candidate order.
pub fn total_wins(groups: &[GroupStatistics]) -> Vec<(String, usize)> {
    let mut totals: Vec<(String, usize)> = Vec::new();
    for group in groups {
        for (i, c) in group.candidates.iter().enumerate() {
            match totals.get_mut(i) {
                Some((_, wins)) => *wins += c.times_best,
                None => totals.push((c.candidate.clone(), c.times_best)),
            }
        }
    }
    totals
}

/// Candidate with the most wins overall. Ties go to the first declared.
pub fn overall_winner(groups: &[GroupStatistics]) -> Option<String> {
    let mut best: Option<(String, usize)> = None;
    for (name, wins) in total_wins(groups) {
        if wins == 0 {
            continue;
        }
        match &best {
            Some((_, top)) if *top >= wins => {}
            _ => best = Some((name, wins)),
        }
    }
    best.map(|(name, _)| name)
}
