//! Startup configuration.
//!
//! [`EngineConfig`] is loaded once, validated, and turned into an immutable
//! [`RuleTable`] plus grid and clock settings. Every field has a default, so a
//! TOML file only needs the keys it changes:
//!
//! ```toml
//! size = 24
//! rule = "amoeba"
//! transition = "decay_on_death"
//! alive = "non_zero"
//! reset = { biased = { alive_probability = 0.25 } }
//! frequency_hz = 10.0
//! seed = 42
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::automaton::grid::{MAX_SIDE, MIN_SIDE};
use crate::automaton::neighborhood::AlivePredicate;
use crate::automaton::rule::{RuleTable, TransitionPolicy};
use crate::error::ConfigError;

pub const DEFAULT_SIZE: usize = 20;
pub const DEFAULT_RULE: &str = "4/4/5/M";
pub const DEFAULT_FREQUENCY_HZ: f64 = 5.0;
pub const DEFAULT_ALIVE_PROBABILITY: f64 = 0.3;

/// How `reset` assigns states.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Alive with probability `alive_probability`, in a uniform state `[1, S-1]`; otherwise dead.
    Biased { alive_probability: f64 },
    /// Uniform over `[0, S-1]`, no dead bias.
    Uniform,
}

impl Default for ResetPolicy {
    fn default() -> Self {
        ResetPolicy::Biased {
            alive_probability: DEFAULT_ALIVE_PROBABILITY,
        }
    }
}

impl ResetPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            ResetPolicy::Biased { alive_probability } if !(0.0..=1.0).contains(&alive_probability) => {
                Err(ConfigError::AliveProbability(alive_probability))
            }
            _ => Ok(()),
        }
    }
}

/// How neighbor lookups cross the grid boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapStrategy {
    /// `(coord + delta) mod N` on every lookup.
    #[default]
    Modular,
    /// Copy the generation into a padded buffer with opposite planes in its border.
    Halo,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Side length `N` of the cubic grid.
    pub size: usize,
    /// Preset name or `survival/spawn/states/neighborhood` notation.
    pub rule: String,
    pub transition: TransitionPolicy,
    pub alive: AlivePredicate,
    pub reset: ResetPolicy,
    pub wrap: WrapStrategy,
    /// Ticks per second issued by the simulation clock.
    pub frequency_hz: f64,
    /// Worker threads per tick; 0 lets rayon pick.
    pub worker_threads: usize,
    /// Seed for reset randomness; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            size: DEFAULT_SIZE,
            rule: DEFAULT_RULE.to_string(),
            transition: TransitionPolicy::default(),
            alive: AlivePredicate::default(),
            reset: ResetPolicy::default(),
            wrap: WrapStrategy::default(),
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            worker_threads: 0,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(Arc::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: Arc::new(e),
        })?;
        EngineConfig::from_toml_str(&text)
    }

    /// The rule this configuration describes, with its transition and alive options applied.
    pub fn rule_table(&self) -> Result<RuleTable, ConfigError> {
        Ok(RuleTable::resolve(&self.rule)?
            .with_policy(self.transition)
            .with_alive_predicate(self.alive))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&self.size) {
            return Err(ConfigError::GridSize {
                size: self.size,
                min: MIN_SIDE,
                max: MAX_SIDE,
            });
        }
        self.rule_table()?;
        self.reset.validate()?;
        validate_frequency(self.frequency_hz)
    }
}

pub(crate) fn validate_frequency(frequency_hz: f64) -> Result<(), ConfigError> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Frequency(frequency_hz))
    }
}
