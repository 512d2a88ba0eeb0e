use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bounds::{BoundsPolicy, IgnoreFraction, SkipRounding};
use crate::consts::DEFAULT_IGNORE_FRACTION;
use crate::enhance::EnhanceOptions;
use crate::error::{ContrastError, Result};
use crate::parallel::Executor;

/// File-level configuration for an enhancement run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Fraction of pixels ignored at each tail (0.0..0.5).
    pub ignore_fraction: f64,
    /// Whole ignore percentage (0..=49); takes precedence over
    /// `ignore_fraction` and keeps the skip count in integer arithmetic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_percent: Option<u32>,
    pub rounding: SkipRounding,
    pub policy: BoundsPolicy,
    /// Worker threads; 0 = one per logical CPU.
    pub threads: usize,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            ignore_fraction: DEFAULT_IGNORE_FRACTION,
            ignore_percent: None,
            rounding: SkipRounding::default(),
            policy: BoundsPolicy::default(),
            threads: 0,
        }
    }
}

impl EnhanceConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ContrastError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ContrastError::Config(e.to_string()))
    }

    /// Validated enhancement options.
    pub fn options(&self) -> Result<EnhanceOptions> {
        let ignore_fraction = match self.ignore_percent {
            Some(percent) => IgnoreFraction::from_percent(percent)?,
            None => IgnoreFraction::new(self.ignore_fraction)?,
        };
        Ok(EnhanceOptions {
            ignore_fraction,
            rounding: self.rounding,
            policy: self.policy,
        })
    }

    pub fn executor(&self) -> Result<Executor> {
        Executor::new(self.threads)
    }
}
