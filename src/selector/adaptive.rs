//! Adaptive feedback selector (Tenney's dissonant-counterpoint algorithm).
//!
//! Every item carries a counter of how many picks have passed since it was
//! last chosen. The draw weight of item `i` is
//!
//! ```text
//! probability[i] = base_weight[i] * counter[i] ^ curvature
//! ```
//!
//! After a pick the chosen counter drops to zero and every other counter
//! grows by one, so recently heard items are suppressed and long-silent
//! items become ever more likely. `curvature` sets how steeply that
//! pressure builds: `1.0` is linear, larger values favour the longest
//! silence more aggressively.
//!
//! A zero counter always yields probability zero, whatever the curvature.
//! With `curvature == 0` this makes picks uniform over every item except the
//! previous one, instead of treating `0^0` as one.
//!
//! Counters are measured against the longest silence among items with a
//! nonzero base weight before the curvature is applied. Every growth term
//! then lies in `[0, 1]`, so steep curvatures and long runs never overflow,
//! and the draw distribution is the one given by the formula above.

use super::{check_index, resolve_range, shift_previous, WeightedSelector};
use crate::error::{Error, Result};
use crate::random;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::Rng;
use std::ops::{Index, RangeBounds};

/// Curvature used when the caller has no preference.
pub const DEFAULT_CURVATURE: f64 = 1.0;

/// Selector whose weights grow with the time since each item was last chosen.
#[derive(Debug, Clone)]
pub struct AdaptiveSelector<T, R = StdRng> {
    contents: Vec<T>,
    base_weights: Vec<f64>,
    curvature: f64,
    counters: Vec<u64>,
    probabilities: Vec<f64>,
    previous_index: Option<usize>,
    rng: R,
}

impl<T> AdaptiveSelector<T> {
    /// Selector with unit base weights, seeded from system entropy.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a negative or non-finite curvature.
    pub fn new(contents: Vec<T>, curvature: f64) -> Result<Self> {
        Self::with_rng(contents, curvature, random::seeded_rng(None))
    }

    /// Selector with unit base weights and a reproducible pick sequence.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a negative or non-finite curvature.
    pub fn seeded(contents: Vec<T>, curvature: f64, seed: u64) -> Result<Self> {
        Self::with_rng(contents, curvature, random::seeded_rng(Some(seed)))
    }
}

impl<T, R: Rng> AdaptiveSelector<T, R> {
    /// Selector with unit base weights drawing from `rng`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a negative or non-finite curvature.
    pub fn with_rng(contents: Vec<T>, curvature: f64, rng: R) -> Result<Self> {
        let base_weights = vec![1.0; contents.len()];
        Self::with_weights(contents, base_weights, curvature, rng)
    }

    /// Selector with explicit per-item base weights.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the weight vector length differs from
    /// the contents, a weight is negative or non-finite, or the curvature is
    /// negative or non-finite.
    pub fn with_weights(
        contents: Vec<T>,
        base_weights: Vec<f64>,
        curvature: f64,
        rng: R,
    ) -> Result<Self> {
        validate_curvature(curvature)?;
        validate_base_weights(&base_weights, contents.len())?;
        debug!(
            "Adaptive selector over {} items, curvature {curvature}",
            contents.len()
        );
        let mut selector = Self {
            counters: vec![1; contents.len()],
            probabilities: Vec::with_capacity(contents.len()),
            contents,
            base_weights,
            curvature,
            previous_index: None,
            rng,
        };
        selector.refresh_probabilities();
        Ok(selector)
    }

    #[must_use]
    pub fn curvature(&self) -> f64 {
        self.curvature
    }

    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for a negative or non-finite curvature.
    pub fn set_curvature(&mut self, curvature: f64) -> Result<()> {
        validate_curvature(curvature)?;
        self.curvature = curvature;
        self.refresh_probabilities();
        Ok(())
    }

    #[must_use]
    pub fn base_weights(&self) -> &[f64] {
        &self.base_weights
    }

    /// Replace the base weights. Every counter restarts at one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] on a length mismatch or a negative or
    /// non-finite weight.
    pub fn set_base_weights(&mut self, base_weights: Vec<f64>) -> Result<()> {
        validate_base_weights(&base_weights, self.contents.len())?;
        self.base_weights = base_weights;
        self.reset_counters();
        Ok(())
    }

    /// Picks elapsed since each item was last chosen.
    #[must_use]
    pub fn counters(&self) -> &[u64] {
        &self.counters
    }

    /// Current draw weights: `base_weight * (counter / longest)^curvature`,
    /// where `longest` is the largest counter among items with a nonzero
    /// base weight.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Forget the pick history: every counter back to one.
    pub fn reset_counters(&mut self) {
        self.counters.iter_mut().for_each(|c| *c = 1);
        self.refresh_probabilities();
    }

    /// Replace every item. Base weights return to one, counters restart and
    /// the previous pick is forgotten.
    pub fn set_contents(&mut self, contents: Vec<T>) {
        debug!("Adaptive selector contents replaced ({} items)", contents.len());
        self.base_weights = vec![1.0; contents.len()];
        self.counters = vec![1; contents.len()];
        self.contents = contents;
        self.previous_index = None;
        self.refresh_probabilities();
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.contents.get(index)
    }

    /// Replace the item at `index`, keeping its base weight and counter.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `index < len`.
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        check_index(index, self.contents.len())?;
        Ok(std::mem::replace(&mut self.contents[index], item))
    }

    /// Remove the item at `index` along with its base weight and counter.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `index < len`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        check_index(index, self.contents.len())?;
        let mut removed = self.remove_range(index..index + 1)?;
        Ok(removed.remove(0))
    }

    /// Remove a span of items along with their base weights and counters.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the range does not fit the contents.
    pub fn remove_range(&mut self, range: impl RangeBounds<usize>) -> Result<Vec<T>> {
        let range = resolve_range(range, self.contents.len())?;
        let removed: Vec<T> = self.contents.drain(range.clone()).collect();
        self.base_weights.drain(range.clone());
        self.counters.drain(range.clone());
        self.previous_index = shift_previous(self.previous_index, &range);
        self.refresh_probabilities();
        Ok(removed)
    }

    fn refresh_probabilities(&mut self) {
        let curvature = self.curvature;
        let longest = self
            .base_weights
            .iter()
            .zip(&self.counters)
            .filter(|(&weight, _)| weight > 0.0)
            .map(|(_, &count)| count)
            .max()
            .unwrap_or(0);
        self.probabilities = self
            .base_weights
            .iter()
            .zip(&self.counters)
            .map(|(&weight, &count)| match weight {
                w if w > 0.0 => w * growth(count, longest, curvature),
                _ => 0.0,
            })
            .collect();
    }
}

impl<T, R: Rng> WeightedSelector for AdaptiveSelector<T, R> {
    type Item = T;

    fn contents(&self) -> &[T] {
        &self.contents
    }

    fn selection_weights(&self) -> &[f64] {
        &self.probabilities
    }

    fn previous_index(&self) -> Option<usize> {
        self.previous_index
    }

    /// A single item is returned every time; feedback needs an alternative.
    fn pick_index(&mut self) -> Result<usize> {
        let index = match self.contents.len() {
            0 => return Err(Error::invalid_state("cannot pick from an empty selector")),
            1 => 0,
            _ => random::weighted_index(&mut self.rng, &self.probabilities)
                .ok_or_else(|| Error::invalid_state("every probability is zero"))?,
        };

        for (i, counter) in self.counters.iter_mut().enumerate() {
            *counter = if i == index { 0 } else { counter.saturating_add(1) };
        }
        self.refresh_probabilities();
        self.previous_index = Some(index);
        trace!("Adaptive selector picked index {index}");
        Ok(index)
    }
}

impl<T, R> Index<usize> for AdaptiveSelector<T, R> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.contents[index]
    }
}

/// `(count / longest) ^ curvature`, pinned to zero for a just-picked item.
/// Callers guarantee `count <= longest` for weighted items.
#[allow(clippy::cast_precision_loss)]
fn growth(count: u64, longest: u64, curvature: f64) -> f64 {
    match count {
        0 => 0.0,
        count => (count as f64 / longest.max(count) as f64).powf(curvature),
    }
}

fn validate_curvature(curvature: f64) -> Result<()> {
    if curvature.is_finite() && curvature >= 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "curvature {curvature} must be finite and non-negative"
        )))
    }
}

fn validate_base_weights(weights: &[f64], len: usize) -> Result<()> {
    if weights.len() != len {
        return Err(Error::invalid_argument(format!(
            "{} weights given for {len} items",
            weights.len()
        )));
    }
    match weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
        Some(bad) => Err(Error::invalid_argument(format!(
            "weight {bad} must be finite and non-negative"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(len: usize, curvature: f64) -> AdaptiveSelector<usize> {
        AdaptiveSelector::seeded((0..len).collect(), curvature, 23).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let s = selector(4, 2.0);
        assert_eq!(s.counters(), &[1, 1, 1, 1]);
        assert_eq!(s.base_weights(), &[1.0; 4]);
        assert_eq!(s.probabilities(), &[1.0; 4]);
        assert_eq!(s.previous_index(), None);
    }

    #[test]
    fn test_reset_law_after_pick() {
        let mut s = selector(5, 1.5);
        for _ in 0..200 {
            let before = s.counters().to_vec();
            let picked = s.pick_index().unwrap();
            for (i, (&after, &was)) in s.counters().iter().zip(&before).enumerate() {
                if i == picked {
                    assert_eq!(after, 0);
                } else {
                    assert_eq!(after, was + 1);
                }
            }
            assert_eq!(s.probabilities()[picked], 0.0);
        }
    }

    #[test]
    fn test_never_repeats_immediately() {
        for curvature in [0.0, 0.5, 1.0, 4.0] {
            let mut s = selector(3, curvature);
            let mut last = s.pick_index().unwrap();
            for _ in 0..500 {
                let next = s.pick_index().unwrap();
                assert_ne!(next, last, "curvature {curvature}");
                last = next;
            }
        }
    }

    #[test]
    fn test_probabilities_follow_growth_function() {
        let mut s = AdaptiveSelector::with_weights(
            vec!['a', 'b', 'c'],
            vec![1.0, 2.0, 0.5],
            2.0,
            random::seeded_rng(Some(1)),
        )
        .unwrap();
        let picked = s.pick_index().unwrap();
        for i in 0..3 {
            let expected = if i == picked {
                0.0
            } else {
                s.base_weights()[i]
            };
            assert!((s.probabilities()[i] - expected).abs() < 1e-12);
        }

        // Counters now differ, so the ratio to the longest silence shows.
        let second = s.pick_index().unwrap();
        let counters = s.counters().to_vec();
        let longest = *counters.iter().max().unwrap() as f64;
        for i in 0..3 {
            let expected = s.base_weights()[i] * (counters[i] as f64 / longest).powi(2);
            assert!((s.probabilities()[i] - expected).abs() < 1e-12);
        }
        assert_eq!(s.probabilities()[second], 0.0);
    }

    #[test]
    fn test_long_silence_wins_with_high_curvature() {
        let mut s = selector(4, 20.0);
        let history = s.pick_many(40).unwrap();
        // With steep curvature the oldest item dominates, giving a near-cycle.
        for window in history.windows(4) {
            let mut distinct = window.to_vec();
            distinct.sort_unstable();
            distinct.dedup();
            assert!(distinct.len() >= 3, "window {window:?}");
        }
    }

    #[test]
    fn test_single_item_always_returned() {
        let mut s = selector(1, 1.0);
        assert_eq!(s.pick_many(5).unwrap(), vec![0; 5]);
        assert!(matches!(selector(0, 1.0).pick(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_zero_base_weights_leave_nothing_to_pick() {
        let mut s = AdaptiveSelector::with_weights(
            vec![1, 2],
            vec![0.0, 0.0],
            1.0,
            random::seeded_rng(Some(2)),
        )
        .unwrap();
        assert!(matches!(s.pick_index(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_parameter_validation() {
        assert!(matches!(
            AdaptiveSelector::seeded(vec![1], -1.0, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(AdaptiveSelector::seeded(vec![1], f64::INFINITY, 0).is_err());

        let mut s = selector(3, 1.0);
        assert!(s.set_base_weights(vec![1.0, 1.0]).is_err());
        assert!(s.set_base_weights(vec![1.0, -1.0, 1.0]).is_err());
        assert!(s.set_curvature(-0.1).is_err());
        assert_eq!(s.curvature(), 1.0);
    }

    #[test]
    fn test_set_base_weights_resets_counters() {
        let mut s = selector(3, 1.0);
        s.pick_many(4).unwrap();
        s.set_base_weights(vec![3.0, 2.0, 1.0]).unwrap();
        assert_eq!(s.counters(), &[1, 1, 1]);
        assert_eq!(s.probabilities(), &[3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_set_curvature_recomputes() {
        let mut s = selector(3, 1.0);
        s.pick_many(3).unwrap();
        s.set_curvature(2.0).unwrap();
        let longest = *s.counters().iter().max().unwrap();
        let expected: Vec<f64> = s
            .counters()
            .iter()
            .map(|&c| growth(c, longest, 2.0))
            .collect();
        assert_eq!(s.probabilities(), expected.as_slice());
    }

    #[test]
    fn test_reset_counters() {
        let mut s = selector(3, 1.0);
        s.pick_many(5).unwrap();
        s.reset_counters();
        assert_eq!(s.counters(), &[1, 1, 1]);
    }

    #[test]
    fn test_set_contents_resets_everything() {
        let mut s = selector(3, 1.0);
        s.pick().unwrap();
        s.set_contents(vec![9, 8, 7, 6]);
        assert_eq!(s.counters(), &[1; 4]);
        assert_eq!(s.base_weights().len(), 4);
        assert_eq!(s.previous_index(), None);
    }

    #[test]
    fn test_remove_keeps_vectors_aligned() {
        let mut s = AdaptiveSelector::with_weights(
            vec!['a', 'b', 'c', 'd'],
            vec![1.0, 2.0, 3.0, 4.0],
            1.0,
            random::seeded_rng(Some(3)),
        )
        .unwrap();
        assert_eq!(s.remove(1).unwrap(), 'b');
        assert_eq!(s.base_weights(), &[1.0, 3.0, 4.0]);
        assert_eq!(s.remove_range(1..).unwrap(), vec!['c', 'd']);
        assert_eq!(s.contents(), &['a']);
        assert_eq!(s.counters().len(), 1);
        assert_eq!(s.probabilities().len(), 1);
        assert!(s.remove(3).is_err());
        assert!(matches!(s.remove(usize::MAX), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_indexed_set_and_get() {
        let mut s = selector(3, 1.0);
        assert_eq!(s.set(1, 42).unwrap(), 1);
        assert_eq!(s[1], 42);
        assert_eq!(s.get(3), None);
    }

    #[test]
    fn test_steep_curvature_over_long_runs() {
        for curvature in [120.0, 400.0, 2000.0] {
            let mut s = AdaptiveSelector::with_weights(
                (0..10).collect(),
                vec![0.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 0.5, 1.0, 1.0],
                curvature,
                random::seeded_rng(Some(31)),
            )
            .unwrap();
            let mut last = None;
            for pick in 0..600 {
                let index = s
                    .pick_index()
                    .unwrap_or_else(|err| panic!("curvature {curvature}, pick {pick}: {err}"));
                assert_ne!(index, 0, "zero base weight picked");
                assert_ne!(Some(index), last, "curvature {curvature}, pick {pick}");
                assert!(s.probabilities().iter().all(|p| p.is_finite()));
                last = Some(index);
            }
        }
    }

    #[test]
    fn test_steep_curvature_with_few_items() {
        let mut s = AdaptiveSelector::seeded(vec![1, 2, 3], 2000.0, 1).unwrap();
        let picks = s.pick_many(500).unwrap();
        assert!(picks.windows(2).all(|pair| pair[0] != pair[1]));

        let mut s = AdaptiveSelector::with_weights(
            vec![0, 1, 2],
            vec![0.0, 1.0, 1.0],
            120.0,
            random::seeded_rng(Some(4)),
        )
        .unwrap();
        let picks = s.pick_many(1000).unwrap();
        assert!(picks.iter().all(|&item| item != 0));
        assert!(picks.windows(2).all(|pair| pair[0] != pair[1]));
    }
}
