//! Address spaces a [`WindowNavigator`](super::WindowNavigator) can walk.
//!
//! - [`Elements`] - addressed by element count; windows near the end shrink
//! - [`Durations`] - addressed by ticks; windows near the end are padded
//!   with a [`Slice::Filler`] so they always span the full window size

use crate::error::{Error, Result};
use std::fmt::Debug;

/// Integer unit of the duration address space.
pub type Ticks = u64;

/// Anything with a length in ticks.
pub trait Timed {
    fn ticks(&self) -> Ticks;
}

impl Timed for Ticks {
    fn ticks(&self) -> Ticks {
        *self
    }
}

impl<T> Timed for (T, Ticks) {
    fn ticks(&self) -> Ticks {
        self.1
    }
}

/// Address arithmetic and edge policy of a navigable sequence.
pub trait Addressing {
    /// What one advance emits.
    type Window: Clone + Debug;

    /// Sequence length in address units.
    fn length(&self) -> u64;

    /// Window of nominal size `size` starting at `head < length`, applying
    /// this address space's edge policy at the end of the sequence.
    fn window(&self, head: u64, size: u64) -> Self::Window;

    /// Window of exactly `size` units starting at `head`, continuing from
    /// address zero whenever the end of the sequence is reached.
    fn wrapped_window(&self, head: u64, size: u64) -> Self::Window;
}

/// Count-addressed sequence. Trailing windows shrink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elements<T> {
    items: Vec<T>,
}

impl<T> Elements<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<Vec<T>> for Elements<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T: Clone + Debug> Addressing for Elements<T> {
    type Window = Vec<T>;

    fn length(&self) -> u64 {
        self.items.len() as u64
    }

    #[allow(clippy::cast_possible_truncation)]
    fn window(&self, head: u64, size: u64) -> Vec<T> {
        let start = head as usize;
        let end = head.saturating_add(size).min(self.length()) as usize;
        self.items[start..end].to_vec()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn wrapped_window(&self, head: u64, size: u64) -> Vec<T> {
        let len = self.length();
        (0..size)
            .map(|k| self.items[((head + k) % len) as usize].clone())
            .collect()
    }
}

/// One piece of a duration window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slice<T> {
    /// Part of a sequence item. `offset` is how far into the item the piece
    /// starts; a piece cut at either window edge is shorter than its item.
    Piece { item: T, offset: Ticks, ticks: Ticks },
    /// Padding after the end of the sequence.
    Filler { ticks: Ticks },
}

impl<T> Slice<T> {
    #[must_use]
    pub const fn ticks(&self) -> Ticks {
        match self {
            Self::Piece { ticks, .. } | Self::Filler { ticks } => *ticks,
        }
    }

    #[must_use]
    pub const fn is_filler(&self) -> bool {
        matches!(self, Self::Filler { .. })
    }
}

/// Total ticks spanned by a duration window.
#[must_use]
pub fn window_ticks<T>(window: &[Slice<T>]) -> Ticks {
    window.iter().map(Slice::ticks).sum()
}

/// Duration-addressed sequence. Trailing windows are padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Durations<T> {
    items: Vec<T>,
    onsets: Vec<Ticks>,
    total: Ticks,
}

impl<T: Timed> Durations<T> {
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when an item lasts zero ticks or the total
    /// length overflows.
    pub fn new(items: Vec<T>) -> Result<Self> {
        let mut onsets = Vec::with_capacity(items.len());
        let mut total: Ticks = 0;
        for (i, item) in items.iter().enumerate() {
            let ticks = item.ticks();
            if ticks == 0 {
                return Err(Error::invalid_argument(format!(
                    "item {i} lasts zero ticks"
                )));
            }
            onsets.push(total);
            total = total
                .checked_add(ticks)
                .ok_or_else(|| Error::invalid_argument("total duration overflows"))?;
        }
        Ok(Self {
            items,
            onsets,
            total,
        })
    }
}

impl<T> Durations<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Start of every item, in ticks from the beginning of the sequence.
    #[must_use]
    pub fn onsets(&self) -> &[Ticks] {
        &self.onsets
    }

    #[must_use]
    pub fn total(&self) -> Ticks {
        self.total
    }
}

impl<T: Timed + Clone> Durations<T> {
    /// Pieces of every item overlapping `[start, end)`, with `end <= total`.
    fn pieces(&self, start: Ticks, end: Ticks) -> Vec<Slice<T>> {
        let first = self
            .onsets
            .partition_point(|&onset| onset <= start)
            .saturating_sub(1);
        self.items[first..]
            .iter()
            .zip(&self.onsets[first..])
            .take_while(|(_, &onset)| onset < end)
            .filter_map(|(item, &onset)| {
                let from = start.max(onset);
                let to = end.min(onset + item.ticks());
                (to > from).then(|| Slice::Piece {
                    item: item.clone(),
                    offset: from - onset,
                    ticks: to - from,
                })
            })
            .collect()
    }
}

impl<T: Timed + Clone + Debug> Addressing for Durations<T> {
    type Window = Vec<Slice<T>>;

    fn length(&self) -> u64 {
        self.total
    }

    fn window(&self, head: u64, size: u64) -> Vec<Slice<T>> {
        let end = head.saturating_add(size);
        let mut slices = self.pieces(head, end.min(self.total));
        if end > self.total {
            slices.push(Slice::Filler {
                ticks: end - self.total.max(head),
            });
        }
        slices
    }

    fn wrapped_window(&self, head: u64, size: u64) -> Vec<Slice<T>> {
        let mut slices = Vec::new();
        let mut at = head;
        let mut remaining = size;
        while remaining > 0 {
            let span = remaining.min(self.total - at);
            slices.extend(self.pieces(at, at + span));
            remaining -= span;
            at = 0;
        }
        slices
    }
}
