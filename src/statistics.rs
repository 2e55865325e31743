//! Empirical analysis of selector behaviour.
//!
//! Runs many independently seeded selectors in parallel (rayon) and tallies
//! what they pick, which is how the selection policies are tuned: compare the
//! observed frequencies with the normalised weights, and count how often a
//! policy repeated itself immediately.

use crate::error::Result;
use crate::selector::WeightedSelector;
use log::debug;
use rayon::prelude::*;

/// Pick counts gathered over many trials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickStatistics {
    /// How often each index was picked.
    pub counts: Vec<usize>,
    /// Total picks over all trials.
    pub picks: usize,
    /// Picks that returned the same index as the pick right before them.
    pub immediate_repeats: usize,
}

impl PickStatistics {
    /// Relative frequency of each index.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn frequencies(&self) -> Vec<f64> {
        match self.picks {
            0 => vec![0.0; self.counts.len()],
            picks => self
                .counts
                .iter()
                .map(|&count| count as f64 / picks as f64)
                .collect(),
        }
    }

    /// Largest absolute gap between observed frequencies and `expected`.
    #[must_use]
    pub fn max_deviation(&self, expected: &[f64]) -> f64 {
        self.frequencies()
            .iter()
            .zip(expected)
            .map(|(observed, expected)| (observed - expected).abs())
            .fold(0.0, f64::max)
    }

    fn merge(mut self, other: Self) -> Self {
        if other.counts.len() > self.counts.len() {
            self.counts.resize(other.counts.len(), 0);
        }
        for (total, count) in self.counts.iter_mut().zip(&other.counts) {
            *total += count;
        }
        self.picks += other.picks;
        self.immediate_repeats += other.immediate_repeats;
        self
    }
}

/// Run `trials` selectors, built by `make(trial)`, for `picks` picks each.
///
/// The trial number is handed to `make` so that callers can derive a seed
/// from it and get reproducible totals.
///
/// # Errors
///
/// The first construction or pick error any trial hit.
pub fn pick_frequencies<S, F>(make: F, trials: u64, picks: usize) -> Result<PickStatistics>
where
    S: WeightedSelector,
    F: Fn(u64) -> Result<S> + Sync,
{
    let per_trial = (0..trials)
        .into_par_iter()
        .map(|trial| run_trial(make(trial)?, picks))
        .collect::<Result<Vec<_>>>()?;

    let stats = per_trial.into_iter().fold(
        PickStatistics {
            counts: Vec::new(),
            picks: 0,
            immediate_repeats: 0,
        },
        PickStatistics::merge,
    );
    debug!(
        "Tallied {} picks over {trials} trials ({} immediate repeats)",
        stats.picks, stats.immediate_repeats
    );
    Ok(stats)
}

/// Weights scaled to sum to one. All-zero weights stay zero.
#[must_use]
pub fn normalise(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter().map(|w| w / total).collect()
    } else {
        vec![0.0; weights.len()]
    }
}

fn run_trial<S: WeightedSelector>(mut selector: S, picks: usize) -> Result<PickStatistics> {
    let mut counts = vec![0; selector.len()];
    let mut immediate_repeats = 0;
    let mut last = None;
    for _ in 0..picks {
        let index = selector.pick_index()?;
        counts[index] += 1;
        if last == Some(index) {
            immediate_repeats += 1;
        }
        last = Some(index);
    }
    Ok(PickStatistics {
        counts,
        picks,
        immediate_repeats,
    })
}
