//! Positional-decay selector.
//!
//! Item `i` is drawn with weight `decay_rate^i`, so the front of the
//! collection is favoured and the tail fades out geometrically. The weights
//! belong to positions, not to items: the positional transformations below
//! (append, prepend, rotate, mirror, shuffle) move items through a fixed
//! weight landscape without ever touching it.

use super::{check_index, resolve_range, shift_previous, WeightedSelector};
use crate::error::{Error, Result};
use crate::random;
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::{Index, RangeBounds};

/// Decay rate used when the caller has no preference.
pub const DEFAULT_DECAY_RATE: f64 = 0.75;

/// Direction of a one-step cyclic rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// The first item moves to the end.
    Left,
    /// The last item moves to the front.
    Right,
}

/// Selector whose weights decay geometrically with position.
#[derive(Debug, Clone)]
pub struct DecaySelector<T, R = StdRng> {
    contents: Vec<T>,
    weights: Vec<f64>,
    decay_rate: f64,
    previous_index: Option<usize>,
    rng: R,
}

impl<T> DecaySelector<T> {
    /// Selector seeded from system entropy.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `decay_rate` is outside `(0, 1]`.
    pub fn new(contents: Vec<T>, decay_rate: f64) -> Result<Self> {
        Self::with_rng(contents, decay_rate, random::seeded_rng(None))
    }

    /// Selector with a reproducible pick sequence.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `decay_rate` is outside `(0, 1]`.
    pub fn seeded(contents: Vec<T>, decay_rate: f64, seed: u64) -> Result<Self> {
        Self::with_rng(contents, decay_rate, random::seeded_rng(Some(seed)))
    }
}

impl<T, R: Rng> DecaySelector<T, R> {
    /// Selector drawing from a caller-supplied generator.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `decay_rate` is outside `(0, 1]`.
    pub fn with_rng(contents: Vec<T>, decay_rate: f64, rng: R) -> Result<Self> {
        validate_decay_rate(decay_rate)?;
        let weights = geometric_weights(decay_rate, contents.len());
        debug!(
            "Decay selector over {} items, decay rate {decay_rate}",
            contents.len()
        );
        Ok(Self {
            contents,
            weights,
            decay_rate,
            previous_index: None,
            rng,
        })
    }

    #[must_use]
    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// Change the decay rate and regenerate the weights.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `decay_rate` is outside `(0, 1]`.
    pub fn set_decay_rate(&mut self, decay_rate: f64) -> Result<()> {
        validate_decay_rate(decay_rate)?;
        self.decay_rate = decay_rate;
        self.regenerate_weights();
        Ok(())
    }

    /// Positional weights, `weights[i] == decay_rate^i`.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Replace every item, regenerating the weights and forgetting the last pick.
    pub fn set_contents(&mut self, contents: Vec<T>) {
        debug!("Decay selector contents replaced ({} items)", contents.len());
        self.contents = contents;
        self.previous_index = None;
        self.regenerate_weights();
    }

    /// Pick an index different from the previous one.
    ///
    /// The draw uses the normal weights restricted to every index except
    /// [`WeightedSelector::previous_index`], so with no previous pick this is
    /// an ordinary pick.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] when the selector is empty, or when a previous
    /// pick exists and no other item has a nonzero weight (always the case
    /// for a single item).
    pub fn pick_index_no_repeat(&mut self) -> Result<usize> {
        let Some(previous) = self.previous_index else {
            return self.pick_index();
        };
        let index = random::weighted_index_excluding(&mut self.rng, &self.weights, previous)
            .ok_or_else(|| {
                Error::invalid_state(format!(
                    "no item other than index {previous} can be picked from {} items",
                    self.contents.len()
                ))
            })?;
        trace!("Decay selector picked index {index} (no repeat)");
        self.previous_index = Some(index);
        Ok(index)
    }

    /// Item form of [`DecaySelector::pick_index_no_repeat`].
    ///
    /// # Errors
    ///
    /// Same as [`DecaySelector::pick_index_no_repeat`].
    pub fn pick_no_repeat(&mut self) -> Result<&T> {
        let index = self.pick_index_no_repeat()?;
        Ok(&self.contents[index])
    }

    /// Drop the first item and push `item` onto the end.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] on an empty selector.
    pub fn append(&mut self, item: T) -> Result<()> {
        self.append_keeping_first_n(item, 0)
            .map_err(|_| Error::invalid_state("cannot append to an empty selector"))
    }

    /// Drop the item at `keep` and push `item` onto the end, leaving the
    /// first `keep` items in place.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `keep < len`.
    pub fn append_keeping_first_n(&mut self, item: T, keep: usize) -> Result<()> {
        check_index(keep, self.contents.len())?;
        self.contents.remove(keep);
        self.contents.push(item);
        Ok(())
    }

    /// Drop the last item and insert `item` at the front.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] on an empty selector.
    pub fn prepend(&mut self, item: T) -> Result<()> {
        if self.contents.pop().is_none() {
            return Err(Error::invalid_state("cannot prepend to an empty selector"));
        }
        self.contents.insert(0, item);
        Ok(())
    }

    /// Rotate the contents by one position.
    pub fn rotate(&mut self, rotation: Rotation) {
        if self.contents.is_empty() {
            return;
        }
        match rotation {
            Rotation::Left => self.contents.rotate_left(1),
            Rotation::Right => self.contents.rotate_right(1),
        }
    }

    /// Swap item `index` with its mirror image `len - 1 - index`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `index < len`.
    pub fn mirror(&mut self, index: usize) -> Result<()> {
        let len = self.contents.len();
        check_index(index, len)?;
        self.contents.swap(index, len - 1 - index);
        Ok(())
    }

    /// Mirror a random index from the first half, never the pivot.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] with fewer than two items.
    pub fn mirror_random(&mut self) -> Result<()> {
        let len = self.contents.len();
        if len < 2 {
            return Err(Error::invalid_state(format!(
                "mirroring needs at least two items, have {len}"
            )));
        }
        let index = self.rng.gen_range(0..len / 2);
        self.mirror(index)
    }

    /// Uniformly permute the contents.
    pub fn shuffle(&mut self) {
        self.contents.shuffle(&mut self.rng);
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.contents.get(index)
    }

    /// Replace the item at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `index < len`.
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        check_index(index, self.contents.len())?;
        Ok(std::mem::replace(&mut self.contents[index], item))
    }

    /// Remove the item at `index`; the weights shrink with the contents.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `index < len`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        check_index(index, self.contents.len())?;
        let item = self.contents.remove(index);
        self.previous_index = shift_previous(self.previous_index, &(index..index + 1));
        self.regenerate_weights();
        Ok(item)
    }

    /// Remove a span of items.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the range does not fit the contents.
    pub fn remove_range(&mut self, range: impl RangeBounds<usize>) -> Result<Vec<T>> {
        let range = resolve_range(range, self.contents.len())?;
        let removed: Vec<T> = self.contents.drain(range.clone()).collect();
        self.previous_index = shift_previous(self.previous_index, &range);
        self.regenerate_weights();
        Ok(removed)
    }

    fn regenerate_weights(&mut self) {
        self.weights = geometric_weights(self.decay_rate, self.contents.len());
        if self.weights.last().is_some_and(|&w| w == 0.0) {
            warn!(
                "Decay rate {} underflows to zero weight within {} items",
                self.decay_rate,
                self.contents.len()
            );
        }
    }
}

impl<T, R: Rng> WeightedSelector for DecaySelector<T, R> {
    type Item = T;

    fn contents(&self) -> &[T] {
        &self.contents
    }

    fn selection_weights(&self) -> &[f64] {
        &self.weights
    }

    fn previous_index(&self) -> Option<usize> {
        self.previous_index
    }

    fn pick_index(&mut self) -> Result<usize> {
        if self.contents.is_empty() {
            return Err(Error::invalid_state("cannot pick from an empty selector"));
        }
        let index = random::weighted_index(&mut self.rng, &self.weights)
            .ok_or_else(|| Error::invalid_state("every weight is zero"))?;
        trace!("Decay selector picked index {index}");
        self.previous_index = Some(index);
        Ok(index)
    }
}

impl<T, R> Index<usize> for DecaySelector<T, R> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.contents[index]
    }
}

fn validate_decay_rate(decay_rate: f64) -> Result<()> {
    if decay_rate > 0.0 && decay_rate <= 1.0 {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "decay rate {decay_rate} outside (0, 1]"
        )))
    }
}

/// `[1, r, r^2, ...]`, `len` entries.
fn geometric_weights(rate: f64, len: usize) -> Vec<f64> {
    std::iter::successors(Some(1.0), |w| Some(w * rate))
        .take(len)
        .collect()
}
