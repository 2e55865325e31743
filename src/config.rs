//! # Configuration Module
//!
//! Default parameters for the `aleator` command-line tool, read from a JSON
//! file. Every field is optional; anything missing falls back to the library
//! defaults, and command-line flags override whatever the file says.
//!
//! ## File Location
//!
//! Unless `--config` names a file, the platform-standard config directory is
//! consulted:
//! - Linux: `~/.config/aleator/config.json`
//! - macOS: `~/Library/Application Support/aleator/config.json`
//! - Windows: `%APPDATA%\aleator\config.json`
//!
//! ## Example
//!
//! ```json
//! {
//!   "seed": 42,
//!   "selector": { "decay_rate": 0.6, "no_repeat": true },
//!   "navigator": { "window_size": 3, "forward_bias": 0.8, "boundary": "cyclic" }
//! }
//! ```

use crate::navigator::NavigatorConfig;
use crate::selector::adaptive::DEFAULT_CURVATURE;
use crate::selector::decay::DEFAULT_DECAY_RATE;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the platform-appropriate config file path.
///
/// The file is not required to exist.
///
/// # Errors
///
/// Fails when the platform has no config directory.
///
/// # Examples
///
/// ```no_run
/// use aleator::config::get_config_path;
///
/// let path = get_config_path()?;
/// println!("Config location: {}", path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system config directory. Pass --config to name a file explicitly."
        )
    })?;
    Ok(config_dir.join("aleator").join("config.json"))
}

/// Selector defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    pub decay_rate: f64,
    pub curvature: f64,
    pub no_repeat: bool,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            decay_rate: DEFAULT_DECAY_RATE,
            curvature: DEFAULT_CURVATURE,
            no_repeat: false,
        }
    }
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Seed for every generator; `None` draws from system entropy.
    pub seed: Option<u64>,
    pub selector: SelectorSettings,
    pub navigator: NavigatorConfig,
}

impl RuntimeConfig {
    /// Read a configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid configuration JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the configuration to run with.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// when a file is present there and built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Fails when the chosen file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match get_config_path() {
            Ok(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}
