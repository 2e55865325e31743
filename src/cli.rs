//! # Command-Line Interface Module
//!
//! Defines the `aleator` command line with Clap derive macros. The tool is a
//! thin driver over the library, handy for auditioning parameter choices
//! before wiring a selector or navigator into a renderer.
//!
//! ## Commands
//!
//! - `pick`: Draw items with a decay or adaptive selector
//! - `walk`: Emit windows from a random-walk navigator
//! - `stats`: Estimate selection frequencies over many seeded runs
//! - `completion`: Generate shell completion scripts
//!
//! ## Examples
//!
//! ```bash
//! aleator pick C D E F G --count 8 --no-repeat
//! aleator walk C D E F G A B --window-size 3 --forward-bias 0.8
//! aleator walk q:4 e:2 e:2 h:8 --durations --window-size 6 --step-size 2
//! aleator stats C D E F --policy adaptive --trials 500
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Selection policy
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default)]
pub enum Policy {
    /// Fixed positional weights decaying geometrically with index
    #[default]
    Decay,
    /// Tenney's feedback weights growing with time since last pick
    Adaptive,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "aleator")]
#[command(about = "Aleator: weighted selectors and random-walk windows for algorithmic composition")]
#[command(version)]
pub struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "ALEATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pick items with a weighted selector
    ///
    /// Prints one picked item per line. The decay policy favours items near
    /// the front of the list; the adaptive policy favours whatever has gone
    /// unpicked the longest.
    Pick {
        /// Items to select from, in positional order
        #[arg(required = true)]
        items: Vec<String>,

        /// Selection policy
        #[arg(long, value_enum, default_value_t = Policy::Decay)]
        policy: Policy,

        /// Number of picks
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Decay rate in (0, 1] for the decay policy
        #[arg(long)]
        decay_rate: Option<f64>,

        /// Curvature (>= 0) for the adaptive policy
        #[arg(long)]
        curvature: Option<f64>,

        /// Comma-separated base weights for the adaptive policy
        #[arg(long, value_delimiter = ',')]
        weights: Option<Vec<f64>>,

        /// Never pick the same item twice in a row (decay policy)
        #[arg(long)]
        no_repeat: bool,
    },

    /// Walk a window across the items
    ///
    /// Prints one window per line. A bounded walk runs until the head leaves
    /// the sequence unless --windows caps it; a cyclic walk needs --windows.
    Walk {
        /// Items to walk over. With --durations each item is `label:ticks`
        /// or a plain tick count
        #[arg(required = true)]
        items: Vec<String>,

        /// Number of windows to emit
        #[arg(short = 'n', long)]
        windows: Option<usize>,

        /// Window size in elements (ticks with --durations)
        #[arg(long)]
        window_size: Option<u64>,

        /// Smallest head movement
        #[arg(long)]
        step_size: Option<u64>,

        /// Largest number of steps per move
        #[arg(long)]
        max_steps: Option<u64>,

        /// Chance in [0, 1] that the head stays put
        #[arg(long)]
        repetition_chance: Option<f64>,

        /// Chance in [0, 1] that a move goes forward
        #[arg(long)]
        forward_bias: Option<f64>,

        /// Initial head position
        #[arg(long)]
        head: Option<u64>,

        /// Move the head before emitting the first window
        #[arg(long)]
        move_first: bool,

        /// Wrap the head around instead of stopping at the ends
        #[arg(long)]
        cyclic: bool,

        /// With --cyclic, let windows continue across the end of the sequence
        #[arg(long, requires = "cyclic")]
        wrap: bool,

        /// Address the items by duration instead of by count
        #[arg(long)]
        durations: bool,
    },

    /// Estimate how often each item gets picked
    ///
    /// Runs many independently seeded selectors in parallel and prints the
    /// observed frequency of each item, next to the expected frequency for
    /// the decay policy.
    Stats {
        /// Items to select from
        #[arg(required = true)]
        items: Vec<String>,

        /// Selection policy
        #[arg(long, value_enum, default_value_t = Policy::Decay)]
        policy: Policy,

        /// Number of independent selectors
        #[arg(long, default_value = "1000")]
        trials: u64,

        /// Picks per selector
        #[arg(long, default_value = "100")]
        picks: usize,

        /// Decay rate in (0, 1] for the decay policy
        #[arg(long)]
        decay_rate: Option<f64>,

        /// Curvature (>= 0) for the adaptive policy
        #[arg(long)]
        curvature: Option<f64>,
    },

    /// Generate shell completions
    ///
    /// Usage: aleator completion bash > ~/.local/share/bash-completion/completions/aleator
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_pick() {
        let args = Args::try_parse_from([
            "aleator", "--seed", "4", "pick", "a", "b", "c", "-n", "5", "--policy", "adaptive",
            "--weights", "1,2,3",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(4));
        match args.command {
            Command::Pick { items, policy, count, weights, .. } => {
                assert_eq!(items, vec!["a", "b", "c"]);
                assert_eq!(policy, Policy::Adaptive);
                assert_eq!(count, 5);
                assert_eq!(weights, Some(vec![1.0, 2.0, 3.0]));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_wrap_requires_cyclic() {
        assert!(Args::try_parse_from(["aleator", "walk", "a", "--wrap"]).is_err());
        assert!(Args::try_parse_from(["aleator", "walk", "a", "--wrap", "--cyclic"]).is_ok());
    }

    #[test]
    fn test_items_are_required() {
        assert!(Args::try_parse_from(["aleator", "pick"]).is_err());
    }
}
