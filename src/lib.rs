//! Stochastic building blocks for algorithmic composition.
//!
//! Core modules:
//! - [`selector`] - Weighted selectors (positional decay, adaptive feedback)
//! - [`navigator`] - Random-walk window navigator over element or duration sequences
//! - [`statistics`] - Parallel empirical analysis of selector behaviour
//!
//! ### Supporting Modules
//!
//! - [`random`] - Biased coin flips, weighted draws, seedable generators
//! - [`error`] - Error taxonomy shared by every operation
//! - [`config`] - JSON configuration for the command-line tool
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! Nothing here knows about notation. Selectors return items, navigators
//! return windows; turning those into a score is the caller's job.
//!
//! ## Quick Start Example
//!
//! ```
//! use aleator::navigator::{Elements, NavigatorConfig, WindowNavigator};
//! use aleator::selector::{AdaptiveSelector, DecaySelector, WeightedSelector};
//!
//! // Front-weighted picks: item i carries weight 0.75^i.
//! let mut decay = DecaySelector::seeded(vec!["C", "D", "E", "F"], 0.75, 1)?;
//! let first = *decay.pick()?;
//! assert!(["C", "D", "E", "F"].contains(&first));
//!
//! // Tenney's selector never repeats the previous pick.
//! let mut tenney = AdaptiveSelector::seeded(vec![60, 62, 64, 65, 67], 1.0, 2)?;
//! let melody = tenney.pick_many(16)?;
//! assert!(melody.windows(2).all(|pair| pair[0] != pair[1]));
//!
//! // A window creeping forward one element at a time.
//! let config = NavigatorConfig { window_size: 3, ..NavigatorConfig::default() };
//! let mut navigator = WindowNavigator::seeded(Elements::new(vec![0, 1, 2, 3, 4, 5]), config, 3)?;
//! assert_eq!(navigator.advance()?, vec![0, 1, 2]);
//! assert_eq!(navigator.advance()?, vec![1, 2, 3]);
//! # Ok::<(), aleator::Error>(())
//! ```
//!
//! ## Randomness
//!
//! Every selector and navigator owns its generator. The `new` constructors
//! seed from system entropy, `seeded` pins a reproducible sequence, and
//! `with_rng` accepts any [`rand::Rng`].
//!
//! ## Error Handling
//!
//! Library functions return [`Result`] with an [`Error`] that is one of
//! `InvalidArgument`, `InvalidState` or `Exhausted`. The binary wraps them in
//! `anyhow` for context.
//!
//! ## Logging
//!
//! The library logs through the `log` facade: `debug` for construction and
//! exhaustion, `trace` for every pick and advance.

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod navigator;
pub mod random;
pub mod selector;
pub mod statistics;

pub use error::{Error, Result};
