//! Random-walk window navigator.
//!
//! A [`WindowNavigator`] keeps a cursor (the *head*) over an addressable
//! sequence and, on every [`advance`](WindowNavigator::advance), nudges it by
//! a biased random walk and emits the window starting there. Successive
//! windows overlap, so a slowly moving head yields a looping, gradually
//! drifting texture.
//!
//! ## State machine
//!
//! ```text
//! Initial --advance--> Active --advance--> Active | Exhausted
//! ```
//!
//! - With [`FirstCall::Hold`] the first advance emits the window at the
//!   initial head without moving it.
//! - A [`Boundary::Bounded`] navigator enters `Exhausted` as soon as the head
//!   leaves `[0, length)` and then only ever returns [`Error::Exhausted`].
//! - A [`Boundary::Cyclic`] navigator wraps the head modulo the length and
//!   never exhausts.
//!
//! ## Address spaces
//!
//! The walk itself is shared; the [`Addressing`] strategy supplies the length
//! and the edge policy. [`Elements`] shrinks trailing windows, [`Durations`]
//! pads them with filler.

pub mod addressing;

pub use addressing::{window_ticks, Addressing, Durations, Elements, Slice, Ticks, Timed};

use crate::error::{Error, Result};
use crate::random;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Behaviour of the very first advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstCall {
    /// Emit the window at the initial head without moving.
    #[default]
    Hold,
    /// Move before emitting, like every later advance.
    Move,
}

/// What happens when the head leaves the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Stop with [`Error::Exhausted`].
    #[default]
    Bounded,
    /// Wrap the head around and keep going forever.
    Cyclic,
}

/// Longest wrapped window, in laps of the whole sequence.
pub const MAX_WRAPPED_LAPS: u64 = 64;

/// Lifecycle of a navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initial,
    Active,
    Exhausted,
}

/// Every recognised navigator option, validated once at construction.
///
/// Sizes are in the address units of the navigator's [`Addressing`]:
/// elements for [`Elements`], ticks for [`Durations`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub window_size: u64,
    /// Smallest head movement.
    pub step_size: u64,
    /// Each move is `1..=max_steps` steps, uniformly drawn.
    pub max_steps: u64,
    /// Chance that an advance leaves the head where it is.
    pub repetition_chance: f64,
    /// Chance that a move goes forward rather than backward.
    pub forward_bias: f64,
    /// Initial head position.
    pub head: u64,
    pub first_call: FirstCall,
    pub boundary: Boundary,
    /// Cyclic navigators only: windows crossing the end of the sequence
    /// continue from its start instead of shrinking or padding.
    pub wrap_windows: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            window_size: 4,
            step_size: 1,
            max_steps: 1,
            repetition_chance: 0.0,
            forward_bias: 1.0,
            head: 0,
            first_call: FirstCall::Hold,
            boundary: Boundary::Bounded,
            wrap_windows: false,
        }
    }
}

impl NavigatorConfig {
    /// Check every option against a sequence of `length` address units.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] naming the first offending option.
    pub fn validate(&self, length: u64) -> Result<()> {
        if length == 0 {
            return Err(Error::invalid_argument("cannot navigate an empty sequence"));
        }
        if i64::try_from(length).is_err() {
            return Err(Error::invalid_argument(format!(
                "sequence length {length} too large"
            )));
        }
        for (name, value) in [
            ("window_size", self.window_size),
            ("step_size", self.step_size),
            ("max_steps", self.max_steps),
        ] {
            if value == 0 {
                return Err(Error::invalid_argument(format!("{name} must be at least 1")));
            }
        }
        for (name, value) in [
            ("repetition_chance", self.repetition_chance),
            ("forward_bias", self.forward_bias),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_argument(format!(
                    "{name} {value} outside [0, 1]"
                )));
            }
        }
        if self.head >= length {
            return Err(Error::invalid_argument(format!(
                "head {} outside [0, {length})",
                self.head
            )));
        }
        if self.wrap_windows && self.boundary != Boundary::Cyclic {
            return Err(Error::invalid_argument(
                "wrap_windows needs a cyclic boundary",
            ));
        }
        if self.wrap_windows {
            let limit = length.saturating_mul(MAX_WRAPPED_LAPS);
            if self.window_size > limit {
                return Err(Error::invalid_argument(format!(
                    "wrapped window_size {} exceeds {MAX_WRAPPED_LAPS} laps of {length}",
                    self.window_size
                )));
            }
        }
        Ok(())
    }
}

/// Biased random walk over an [`Addressing`] strategy.
#[derive(Debug, Clone)]
pub struct WindowNavigator<A: Addressing, R = StdRng> {
    addressing: A,
    config: NavigatorConfig,
    head: i64,
    phase: Phase,
    current_window: Option<A::Window>,
    rng: R,
}

/// Navigator over a count-addressed sequence.
pub type ElementNavigator<T, R = StdRng> = WindowNavigator<Elements<T>, R>;

/// Navigator over a duration-addressed sequence.
pub type DurationNavigator<T, R = StdRng> = WindowNavigator<Durations<T>, R>;

impl<A: Addressing> WindowNavigator<A> {
    /// Navigator seeded from system entropy.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the configuration does not fit the sequence.
    pub fn new(addressing: A, config: NavigatorConfig) -> Result<Self> {
        Self::with_rng(addressing, config, random::seeded_rng(None))
    }

    /// Navigator with a reproducible walk.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the configuration does not fit the sequence.
    pub fn seeded(addressing: A, config: NavigatorConfig, seed: u64) -> Result<Self> {
        Self::with_rng(addressing, config, random::seeded_rng(Some(seed)))
    }
}

impl<A: Addressing, R: Rng> WindowNavigator<A, R> {
    /// Navigator drawing from a caller-supplied generator.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the configuration does not fit the sequence.
    pub fn with_rng(addressing: A, config: NavigatorConfig, rng: R) -> Result<Self> {
        config.validate(addressing.length())?;
        debug!(
            "Navigator over {} units: window {}, step {}x1..={}, {:?}",
            addressing.length(),
            config.window_size,
            config.step_size,
            config.max_steps,
            config.boundary
        );
        Ok(Self {
            head: to_signed(config.head),
            addressing,
            config,
            phase: Phase::Initial,
            current_window: None,
            rng,
        })
    }

    #[must_use]
    pub fn addressing(&self) -> &A {
        &self.addressing
    }

    #[must_use]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Current head. Only an exhausted navigator reports a value outside
    /// `[0, length)`.
    #[must_use]
    pub fn head(&self) -> i64 {
        self.head
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn length(&self) -> u64 {
        self.addressing.length()
    }

    /// Last emitted window, if any.
    #[must_use]
    pub fn current_window(&self) -> Option<&A::Window> {
        self.current_window.as_ref()
    }

    /// Move the head and start over: the next advance is a first call again.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] unless `head < length`.
    pub fn set_head(&mut self, head: u64) -> Result<()> {
        let length = self.length();
        if head >= length {
            return Err(Error::invalid_argument(format!(
                "head {head} outside [0, {length})"
            )));
        }
        self.head = to_signed(head);
        self.phase = Phase::Initial;
        self.current_window = None;
        Ok(())
    }

    /// Return to the configured initial head.
    pub fn reset(&mut self) {
        self.head = to_signed(self.config.head);
        self.phase = Phase::Initial;
        self.current_window = None;
    }

    /// The last emitted window, without advancing.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] before the first advance.
    pub fn peek(&self) -> Result<&A::Window> {
        self.current_window
            .as_ref()
            .ok_or_else(|| Error::invalid_state("no window emitted yet"))
    }

    /// Walk the head and emit the window it lands on.
    ///
    /// # Errors
    ///
    /// [`Error::Exhausted`] once a bounded navigator's head leaves the sequence.
    pub fn advance(&mut self) -> Result<A::Window> {
        match self.phase {
            Phase::Exhausted => return Err(Error::Exhausted),
            Phase::Initial if self.config.first_call == FirstCall::Hold => {}
            Phase::Initial | Phase::Active => self.walk(),
        }

        let length = to_signed(self.length());
        if !(0..length).contains(&self.head) {
            match self.config.boundary {
                Boundary::Bounded => {
                    debug!("Navigator exhausted at head {}", self.head);
                    self.phase = Phase::Exhausted;
                    return Err(Error::Exhausted);
                }
                Boundary::Cyclic => self.head = self.head.rem_euclid(length),
            }
        }
        self.phase = Phase::Active;

        let head = self.head.unsigned_abs();
        let window = if self.config.wrap_windows {
            self.addressing.wrapped_window(head, self.config.window_size)
        } else {
            self.addressing.window(head, self.config.window_size)
        };
        trace!("Navigator emitted window at head {head}");
        self.current_window = Some(window.clone());
        Ok(window)
    }

    /// `n` successive advances, in emission order.
    ///
    /// # Errors
    ///
    /// The first failing advance's error; the windows emitted before it are
    /// still reflected in the navigator's state.
    pub fn advance_n(&mut self, n: usize) -> Result<Vec<A::Window>> {
        (0..n).map(|_| self.advance()).collect()
    }

    /// Advance until the navigator exhausts, returning every window emitted.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] for a cyclic navigator, or when a repetition
    /// chance of one would keep the head from ever moving.
    pub fn advance_all(&mut self) -> Result<Vec<A::Window>> {
        if self.config.boundary == Boundary::Cyclic {
            return Err(Error::invalid_state("a cyclic navigator never exhausts"));
        }
        if self.config.repetition_chance >= 1.0 {
            return Err(Error::invalid_state(
                "repetition chance of one never moves the head",
            ));
        }
        let mut windows = Vec::new();
        loop {
            match self.advance() {
                Ok(window) => windows.push(window),
                Err(Error::Exhausted) => return Ok(windows),
                Err(err) => return Err(err),
            }
        }
    }

    fn walk(&mut self) {
        if random::coin_flip(&mut self.rng, self.config.repetition_chance) {
            trace!("Navigator repeats at head {}", self.head);
            return;
        }
        let steps = random::step_count(&mut self.rng, self.config.max_steps);
        let distance = to_signed(steps.saturating_mul(self.config.step_size));
        self.head = if random::coin_flip(&mut self.rng, self.config.forward_bias) {
            self.head.saturating_add(distance)
        } else {
            self.head.saturating_sub(distance)
        };
    }
}

/// Bounded navigators end at exhaustion; cyclic ones never end.
impl<A: Addressing, R: Rng> Iterator for WindowNavigator<A, R> {
    type Item = A::Window;

    fn next(&mut self) -> Option<A::Window> {
        self.advance().ok()
    }
}

fn to_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(window_size: u64) -> NavigatorConfig {
        NavigatorConfig {
            window_size,
            ..NavigatorConfig::default()
        }
    }

    fn elements(len: usize, config: NavigatorConfig) -> ElementNavigator<usize> {
        WindowNavigator::seeded(Elements::new((0..len).collect()), config, 11).unwrap()
    }

    #[test]
    fn test_shrink_boundary_sequence() {
        let mut nav = elements(6, config(3));
        let expected: Vec<Vec<usize>> = vec![
            vec![0, 1, 2],
            vec![1, 2, 3],
            vec![2, 3, 4],
            vec![3, 4, 5],
            vec![4, 5],
            vec![5],
        ];
        for window in expected {
            assert_eq!(nav.advance().unwrap(), window);
        }
        assert_eq!(nav.advance(), Err(Error::Exhausted));
        assert_eq!(nav.phase(), Phase::Exhausted);
        assert_eq!(nav.advance(), Err(Error::Exhausted));
    }

    #[test]
    fn test_move_first_call_skips_initial_window() {
        let mut nav = elements(
            6,
            NavigatorConfig {
                first_call: FirstCall::Move,
                ..config(3)
            },
        );
        assert_eq!(nav.advance().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_backward_walk_exhausts_below_zero() {
        let mut nav = elements(
            5,
            NavigatorConfig {
                forward_bias: 0.0,
                head: 2,
                ..config(2)
            },
        );
        let windows = nav.advance_all().unwrap();
        assert_eq!(windows, vec![vec![2, 3], vec![1, 2], vec![0, 1]]);
        assert_eq!(nav.head(), -1);
    }

    #[test]
    fn test_forward_bias_extremes() {
        for (bias, forward) in [(1.0, true), (0.0, false)] {
            let mut nav = elements(
                1_000,
                NavigatorConfig {
                    forward_bias: bias,
                    max_steps: 3,
                    head: 500,
                    ..config(4)
                },
            );
            nav.advance().unwrap();
            let mut last = nav.head();
            for _ in 0..50 {
                nav.advance().unwrap();
                assert_eq!(nav.head() > last, forward);
                assert!((nav.head() - last).abs() <= 3);
                last = nav.head();
            }
        }
    }

    #[test]
    fn test_full_repetition_never_moves() {
        let mut nav = elements(
            10,
            NavigatorConfig {
                repetition_chance: 1.0,
                first_call: FirstCall::Move,
                head: 4,
                ..config(3)
            },
        );
        let first = nav.advance().unwrap();
        for _ in 0..20 {
            assert_eq!(&nav.advance().unwrap(), nav.peek().unwrap());
            assert_eq!(nav.peek().unwrap(), &first);
            assert_eq!(nav.head(), 4);
        }
        assert!(matches!(nav.advance_all(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_peek_before_advance_fails() {
        let mut nav = elements(4, config(2));
        assert!(matches!(nav.peek(), Err(Error::InvalidState(_))));
        let window = nav.advance().unwrap();
        assert_eq!(nav.peek().unwrap(), &window);
    }

    #[test]
    fn test_cyclic_never_exhausts() {
        let mut nav = elements(
            5,
            NavigatorConfig {
                boundary: Boundary::Cyclic,
                forward_bias: 0.5,
                max_steps: 4,
                ..config(2)
            },
        );
        let windows = nav.advance_n(500).unwrap();
        assert_eq!(windows.len(), 500);
        assert!((0..5).contains(&nav.head()));
        assert!(matches!(nav.advance_all(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_cyclic_wraps_head() {
        let mut nav = elements(
            4,
            NavigatorConfig {
                boundary: Boundary::Cyclic,
                head: 3,
                first_call: FirstCall::Move,
                ..config(2)
            },
        );
        assert_eq!(nav.advance().unwrap(), vec![0, 1]);
        assert_eq!(nav.head(), 0);
    }

    #[test]
    fn test_cyclic_wrapped_windows_cross_the_seam() {
        let mut nav = elements(
            4,
            NavigatorConfig {
                boundary: Boundary::Cyclic,
                wrap_windows: true,
                head: 2,
                ..config(3)
            },
        );
        assert_eq!(nav.advance().unwrap(), vec![2, 3, 0]);
        assert_eq!(nav.advance().unwrap(), vec![3, 0, 1]);
    }

    #[test]
    fn test_advance_n_composes() {
        let cfg = NavigatorConfig {
            forward_bias: 0.7,
            repetition_chance: 0.2,
            max_steps: 2,
            boundary: Boundary::Cyclic,
            ..config(3)
        };
        let mut whole = elements(12, cfg.clone());
        let mut split = elements(12, cfg);
        let mut pieces = split.advance_n(7).unwrap();
        pieces.extend(split.advance_n(5).unwrap());
        assert_eq!(whole.advance_n(12).unwrap(), pieces);
    }

    #[test]
    fn test_set_head_restarts() {
        let mut nav = elements(6, config(3));
        nav.advance_all().unwrap();
        assert_eq!(nav.phase(), Phase::Exhausted);

        nav.set_head(2).unwrap();
        assert_eq!(nav.phase(), Phase::Initial);
        assert!(nav.peek().is_err());
        assert_eq!(nav.advance().unwrap(), vec![2, 3, 4]);
        assert!(nav.set_head(6).is_err());

        nav.reset();
        assert_eq!(nav.advance().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_iterator_stops_at_exhaustion() {
        let nav = elements(4, config(2));
        let windows: Vec<Vec<usize>> = nav.collect();
        assert_eq!(windows, vec![vec![0, 1], vec![1, 2], vec![2, 3], vec![3]]);
    }

    #[test]
    fn test_config_validation() {
        let items = || Elements::new(vec![1, 2, 3]);
        let bad = [
            NavigatorConfig { window_size: 0, ..config(1) },
            NavigatorConfig { step_size: 0, ..config(1) },
            NavigatorConfig { max_steps: 0, ..config(1) },
            NavigatorConfig { repetition_chance: 1.5, ..config(1) },
            NavigatorConfig { forward_bias: -0.1, ..config(1) },
            NavigatorConfig { forward_bias: f64::NAN, ..config(1) },
            NavigatorConfig { head: 3, ..config(1) },
            NavigatorConfig { wrap_windows: true, ..config(1) },
        ];
        for cfg in bad {
            let result = WindowNavigator::seeded(items(), cfg.clone(), 0);
            assert!(matches!(result, Err(Error::InvalidArgument(_))), "{cfg:?}");
        }
        let empty = WindowNavigator::seeded(Elements::<u8>::new(vec![]), config(1), 0);
        assert!(empty.is_err());
    }

    #[test]
    fn test_wrapped_window_size_is_capped() {
        let wrapped = |window_size| NavigatorConfig {
            window_size,
            boundary: Boundary::Cyclic,
            wrap_windows: true,
            ..NavigatorConfig::default()
        };
        for window_size in [u64::MAX, 3 * MAX_WRAPPED_LAPS + 1] {
            let elements = Elements::new(vec![1, 2, 3]);
            let result = WindowNavigator::seeded(elements, wrapped(window_size), 0);
            assert!(matches!(result, Err(Error::InvalidArgument(_))), "{window_size}");
        }

        let durations = Durations::new(vec![2u64, 2]).unwrap();
        assert!(WindowNavigator::seeded(durations, wrapped(u64::MAX), 0).is_err());

        let elements = Elements::new(vec![1, 2, 3]);
        let mut longest =
            WindowNavigator::seeded(elements, wrapped(3 * MAX_WRAPPED_LAPS), 0).unwrap();
        assert_eq!(longest.advance().unwrap().len(), 192);

        // Unwrapped windows clip at the end instead, so any size is fine.
        let mut unwrapped = WindowNavigator::seeded(
            Elements::new(vec![1, 2, 3]),
            NavigatorConfig { boundary: Boundary::Cyclic, ..config(u64::MAX) },
            0,
        )
        .unwrap();
        assert_eq!(unwrapped.advance().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_duration_windows_are_padded() {
        let durations = Durations::new(vec![4u64, 4, 4]).unwrap();
        let mut nav = WindowNavigator::seeded(
            durations,
            NavigatorConfig {
                step_size: 2,
                ..config(6)
            },
            5,
        )
        .unwrap();
        let windows = nav.advance_all().unwrap();
        assert_eq!(windows.len(), 6);
        for window in &windows {
            assert_eq!(window_ticks(window), 6);
        }
        assert!(windows.last().unwrap().iter().any(Slice::is_filler));
        assert!(!windows[0].iter().any(Slice::is_filler));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let cfg: NavigatorConfig =
            serde_json::from_str(r#"{"window_size": 8, "boundary": "cyclic", "first_call": "move"}"#)
                .unwrap();
        assert_eq!(cfg.window_size, 8);
        assert_eq!(cfg.boundary, Boundary::Cyclic);
        assert_eq!(cfg.first_call, FirstCall::Move);
        assert_eq!(cfg.step_size, 1);
        assert_eq!(cfg.forward_bias, 1.0);
    }
}
