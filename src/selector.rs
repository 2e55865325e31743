//! Weighted stochastic selectors.
//!
//! Both selectors own an ordered collection and a parallel weight vector of
//! the same length, and both remember the index of their last pick. They
//! differ in where the weights come from:
//!
//! - [`DecaySelector`] - fixed positional weights `decay_rate^i`
//! - [`AdaptiveSelector`] - weights grown from "picks since last chosen"
//!   counters (Tenney's dissonant-counterpoint algorithm)
//!
//! The [`WeightedSelector`] trait is the seam a renderer programs against.

use crate::error::{Error, Result};
use std::ops::{Bound, Range, RangeBounds};

pub mod adaptive;
pub mod decay;

pub use adaptive::AdaptiveSelector;
pub use decay::{DecaySelector, Rotation};

/// Common surface of the selector family.
pub trait WeightedSelector {
    /// Item type held by the selector.
    type Item;

    /// The ordered collection being selected from.
    fn contents(&self) -> &[Self::Item];

    /// The weights the next draw uses, one per item.
    fn selection_weights(&self) -> &[f64];

    /// Index of the last pick, `None` before the first pick or after the
    /// contents were replaced.
    fn previous_index(&self) -> Option<usize>;

    /// Draw an index and update the selector's state.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] when the selector is empty or no item can be drawn.
    fn pick_index(&mut self) -> Result<usize>;

    /// Draw one item.
    ///
    /// # Errors
    ///
    /// Same as [`WeightedSelector::pick_index`].
    fn pick(&mut self) -> Result<&Self::Item> {
        let index = self.pick_index()?;
        Ok(&self.contents()[index])
    }

    /// `n` successive picks, in the order they were made.
    ///
    /// # Errors
    ///
    /// The first failing pick's error.
    fn pick_many(&mut self, n: usize) -> Result<Vec<Self::Item>>
    where
        Self::Item: Clone,
    {
        (0..n).map(|_| self.pick().cloned()).collect()
    }

    /// The item at [`WeightedSelector::previous_index`].
    fn previous_result(&self) -> Option<&Self::Item> {
        self.previous_index().and_then(|i| self.contents().get(i))
    }

    fn len(&self) -> usize {
        self.contents().len()
    }

    fn is_empty(&self) -> bool {
        self.contents().is_empty()
    }
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "index {index} out of range for {len} items"
        )))
    }
}

/// Turn any range expression into a concrete, bounds-checked `Range`.
pub(crate) fn resolve_range(range: impl RangeBounds<usize>, len: usize) -> Result<Range<usize>> {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    if start > end || end > len {
        return Err(Error::invalid_argument(format!(
            "range {start}..{end} out of range for {len} items"
        )));
    }
    Ok(start..end)
}

/// Where the previous pick ends up once `removed` is cut out of the contents.
pub(crate) fn shift_previous(previous: Option<usize>, removed: &Range<usize>) -> Option<usize> {
    previous.and_then(|p| match p {
        p if p < removed.start => Some(p),
        p if p >= removed.end => Some(p - removed.len()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_range_forms() {
        assert_eq!(resolve_range(1..3, 5).unwrap(), 1..3);
        assert_eq!(resolve_range(1..=3, 5).unwrap(), 1..4);
        assert_eq!(resolve_range(..2, 5).unwrap(), 0..2);
        assert_eq!(resolve_range(3.., 5).unwrap(), 3..5);
        assert_eq!(resolve_range(.., 0).unwrap(), 0..0);
    }

    #[test]
    fn test_resolve_range_rejects_out_of_bounds() {
        assert!(matches!(resolve_range(2..6, 5), Err(Error::InvalidArgument(_))));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = resolve_range(3..1, 5);
        assert!(reversed.is_err());
    }

    #[test]
    fn test_shift_previous() {
        let removed = 2..4;
        assert_eq!(shift_previous(Some(1), &removed), Some(1));
        assert_eq!(shift_previous(Some(2), &removed), None);
        assert_eq!(shift_previous(Some(3), &removed), None);
        assert_eq!(shift_previous(Some(5), &removed), Some(3));
        assert_eq!(shift_previous(None, &removed), None);
    }

    #[test]
    fn test_check_index() {
        assert!(check_index(0, 1).is_ok());
        assert!(matches!(check_index(1, 1), Err(Error::InvalidArgument(_))));
    }
}
