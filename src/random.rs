//! Random draws shared by the selectors and the navigator.
//!
//! Nothing in this crate touches a global generator. Every selector and
//! navigator owns its own `R: Rng`, and these helpers only borrow it.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build the default generator, pinned to `seed` when one is given.
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Biased coin: `true` with probability `p`.
///
/// The extremes never consult the generator, so `p = 1.0` is always `true`
/// and `p = 0.0` is always `false`.
pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    match p {
        p if p <= 0.0 => false,
        p if p >= 1.0 => true,
        p => rng.gen_bool(p),
    }
}

/// Uniform step count in `[1, max_steps]`.
pub fn step_count<R: Rng + ?Sized>(rng: &mut R, max_steps: u64) -> u64 {
    rng.gen_range(1..=max_steps.max(1))
}

/// Draw an index with probability proportional to `weights[i]`.
///
/// Returns `None` when there is nothing to draw from: an empty slice, an
/// all-zero slice, or a slice holding a negative, infinite or NaN weight.
/// Finite weights whose sum overflows are rescaled by the largest one.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    if weights.iter().any(|w| !w.is_finite()) {
        return None;
    }
    let distribution = if weights.iter().sum::<f64>().is_finite() {
        WeightedIndex::<f64>::new(weights)
    } else {
        let largest = weights.iter().copied().fold(0.0, f64::max);
        WeightedIndex::<f64>::new(weights.iter().map(|w| w / largest))
    };
    distribution.ok().map(|distribution| distribution.sample(rng))
}

/// Like [`weighted_index`], conditioned on the result differing from `excluded`.
///
/// Zeroing the excluded weight gives the same distribution as redrawing until
/// the index changes, but always terminates.
pub fn weighted_index_excluding<R: Rng + ?Sized>(
    rng: &mut R,
    weights: &[f64],
    excluded: usize,
) -> Option<usize> {
    let masked: Vec<f64> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| if i == excluded { 0.0 } else { w })
        .collect();
    weighted_index(rng, &masked)
}
