//! Optimizer configuration.

use serde::{Deserialize, Serialize};

/// Step rule for the edge-length optimizer.
///
/// Each call moves every dynamic rest distance by
/// `-learning_rate * min(objective, max_error_scale) * gradient`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub learning_rate: f64,
    /// Cap on the error factor so a large miss cannot produce an unbounded step.
    pub max_error_scale: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            max_error_scale: 1.0,
        }
    }
}

impl OptimizerConfig {
    /// Multiplier applied to the gradient for an objective of `objective`.
    pub fn step_scale(&self, objective: f64) -> f64 {
        self.learning_rate * objective.min(self.max_error_scale)
    }
}

/// Settings for optimizing a joint against a whole path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptimizerConfig {
    /// Number of motor phases sampled over one revolution.
    pub resolution: usize,
    pub step: OptimizerConfig,
}

impl Default for PathOptimizerConfig {
    fn default() -> Self {
        Self {
            resolution: 10,
            step: OptimizerConfig::default(),
        }
    }
}
