//! Configuration parameters for solution construction and local search.

use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::local_search::IntraRouteOptimizer;

/// Configuration settings for building and improving solutions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optimizer applied to single routes
    pub optimizer: IntraRouteOptimizer,
    /// GRASP restricted candidate list cutoff in `[0, 1]`; drawn per construction when `None`
    pub grasp_alpha: Option<f64>,
    /// Size of the per-node candidate lists; unrestricted when `None`
    pub granularity: Option<usize>,
    /// Seed of the random number generator; seeded from entropy when `None`
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            optimizer: IntraRouteOptimizer::TwoOpt,
            grasp_alpha: None,
            granularity: None,
            seed: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the intra-route optimizer.
    pub fn with_optimizer(mut self, optimizer: IntraRouteOptimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Set a fixed GRASP alpha.
    pub fn with_grasp_alpha(mut self, alpha: f64) -> Self {
        self.grasp_alpha = Some(alpha);
        self
    }

    /// Set the granularity parameter.
    pub fn with_granularity(mut self, g: usize) -> Self {
        self.granularity = Some(g);
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate a JSON configuration. Missing fields take their default.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(alpha) = self.grasp_alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(Error::invalid_config(format!(
                    "grasp_alpha must be in [0, 1], found {}",
                    alpha
                )));
            }
        }
        if self.granularity == Some(0) {
            return Err(Error::invalid_config("granularity must be positive"));
        }
        Ok(())
    }

    /// Random number generator for this configuration.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}
