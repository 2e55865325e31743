//! # Aleator - Algorithmic Composition Utilities
//!
//! Command-line driver for the `aleator` library: draw from weighted
//! selectors, walk random windows over a sequence, and measure how the
//! selection policies behave over many runs.
//!
//! ## Usage
//!
//! ```bash
//! # Eight picks, favouring the front of the list, never repeating
//! aleator pick C D E F G -n 8 --no-repeat
//!
//! # Overlapping windows drifting mostly forward
//! aleator walk C D E F G A B --window-size 3 --forward-bias 0.8
//!
//! # Duration windows padded at the end (`_:k` is k ticks of filler)
//! aleator walk q:4 e:2 e:2 h:8 --durations --window-size 6 --step-size 2
//! ```

use aleator::cli::{self, Command, Policy};
use aleator::config::RuntimeConfig;
use aleator::navigator::{
    Addressing, Boundary, Durations, Elements, FirstCall, NavigatorConfig, Slice, Ticks,
    WindowNavigator,
};
use aleator::selector::{AdaptiveSelector, DecaySelector, WeightedSelector};
use aleator::{completion, random, statistics};
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use rand::rngs::StdRng;

/// Main entry point for the Aleator CLI.
///
/// Initializes logging, loads configuration, parses arguments and routes each
/// command to the library.
///
/// # Logging
///
/// Controlled via `RUST_LOG`:
/// - `RUST_LOG=debug aleator walk ...` - Construction and exhaustion events
/// - `RUST_LOG=aleator::selector=trace aleator pick ...` - Every pick
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    let mut config = RuntimeConfig::load(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    debug!("Running with {config:?}");

    match args.command {
        Command::Pick {
            items,
            policy,
            count,
            decay_rate,
            curvature,
            weights,
            no_repeat,
        } => {
            let rng = random::seeded_rng(config.seed);
            let picks = match policy {
                Policy::Decay => {
                    let rate = decay_rate.unwrap_or(config.selector.decay_rate);
                    let mut selector = DecaySelector::with_rng(items, rate, rng)?;
                    if no_repeat || config.selector.no_repeat {
                        (0..count)
                            .map(|_| selector.pick_no_repeat().cloned())
                            .collect::<Result<Vec<_>, _>>()?
                    } else {
                        selector.pick_many(count)?
                    }
                }
                Policy::Adaptive => {
                    let curvature = curvature.unwrap_or(config.selector.curvature);
                    let weights = weights.unwrap_or_else(|| vec![1.0; items.len()]);
                    AdaptiveSelector::with_weights(items, weights, curvature, rng)?
                        .pick_many(count)?
                }
            };
            info!("Picked {} items with {policy:?} policy", picks.len());
            for item in picks {
                println!("{item}");
            }
        }
        Command::Walk {
            items,
            windows,
            window_size,
            step_size,
            max_steps,
            repetition_chance,
            forward_bias,
            head,
            move_first,
            cyclic,
            wrap,
            durations,
        } => {
            let defaults = config.navigator.clone();
            let navigator_config = NavigatorConfig {
                window_size: window_size.unwrap_or(defaults.window_size),
                step_size: step_size.unwrap_or(defaults.step_size),
                max_steps: max_steps.unwrap_or(defaults.max_steps),
                repetition_chance: repetition_chance.unwrap_or(defaults.repetition_chance),
                forward_bias: forward_bias.unwrap_or(defaults.forward_bias),
                head: head.unwrap_or(defaults.head),
                first_call: if move_first { FirstCall::Move } else { defaults.first_call },
                boundary: if cyclic { Boundary::Cyclic } else { defaults.boundary },
                wrap_windows: wrap || defaults.wrap_windows,
            };
            let rng = random::seeded_rng(config.seed);

            if durations {
                let timed = items
                    .iter()
                    .map(String::as_str)
                    .map(parse_timed)
                    .collect::<Result<Vec<_>>>()?;
                let navigator =
                    WindowNavigator::with_rng(Durations::new(timed)?, navigator_config, rng)?;
                for window in run_walk(navigator, windows)? {
                    println!("{}", format_slices(&window));
                }
            } else {
                let navigator =
                    WindowNavigator::with_rng(Elements::new(items), navigator_config, rng)?;
                for window in run_walk(navigator, windows)? {
                    println!("{}", window.join(" "));
                }
            }
        }
        Command::Stats {
            items,
            policy,
            trials,
            picks,
            decay_rate,
            curvature,
        } => {
            let base_seed = config.seed.unwrap_or_else(rand::random);
            let (stats, expected) = match policy {
                Policy::Decay => {
                    let rate = decay_rate.unwrap_or(config.selector.decay_rate);
                    let probe = DecaySelector::seeded(items.clone(), rate, base_seed)?;
                    let expected = statistics::normalise(probe.weights());
                    let stats = statistics::pick_frequencies(
                        |trial| {
                            let seed = base_seed.wrapping_add(trial);
                            DecaySelector::seeded(items.clone(), rate, seed)
                        },
                        trials,
                        picks,
                    )?;
                    (stats, Some(expected))
                }
                Policy::Adaptive => {
                    let curvature = curvature.unwrap_or(config.selector.curvature);
                    let stats = statistics::pick_frequencies(
                        |trial| {
                            let seed = base_seed.wrapping_add(trial);
                            AdaptiveSelector::seeded(items.clone(), curvature, seed)
                        },
                        trials,
                        picks,
                    )?;
                    (stats, None)
                }
            };

            for (i, (item, observed)) in items.iter().zip(stats.frequencies()).enumerate() {
                match &expected {
                    Some(expected) => {
                        println!("{item}\t{observed:.4}\t(expected {:.4})", expected[i]);
                    }
                    None => println!("{item}\t{observed:.4}"),
                }
            }
            println!(
                "picks: {}, immediate repeats: {}",
                stats.picks, stats.immediate_repeats
            );
        }
        Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            let shell = completion::shell_to_completion_shell(shell);
            completion::generate_completions(shell, &mut cmd);
        }
    }

    Ok(())
}

/// Emit `limit` windows, or everything until exhaustion when no limit is given.
fn run_walk<A: Addressing>(
    mut navigator: WindowNavigator<A, StdRng>,
    limit: Option<usize>,
) -> Result<Vec<A::Window>> {
    match limit {
        Some(n) => Ok(navigator.take(n).collect()),
        None if navigator.config().boundary == Boundary::Cyclic => {
            anyhow::bail!("A cyclic walk never ends; pass --windows to limit it")
        }
        None => navigator
            .advance_all()
            .context("Failed to walk the sequence"),
    }
}

/// `label:ticks`, or a bare tick count that doubles as its own label.
fn parse_timed(item: &str) -> Result<(String, Ticks)> {
    let (label, ticks) = item.rsplit_once(':').unwrap_or((item, item));
    let ticks = ticks
        .parse()
        .with_context(|| format!("Invalid duration in '{item}', expected label:ticks"))?;
    Ok((label.to_string(), ticks))
}

fn format_slices(window: &[Slice<(String, Ticks)>]) -> String {
    window
        .iter()
        .map(|slice| match slice {
            Slice::Piece {
                item: (label, _),
                offset: 0,
                ticks,
            } => format!("{label}:{ticks}"),
            Slice::Piece {
                item: (label, _),
                offset,
                ticks,
            } => format!("{label}+{offset}:{ticks}"),
            Slice::Filler { ticks } => format!("_:{ticks}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
