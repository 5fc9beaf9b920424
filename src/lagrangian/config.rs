//! Subgradient hyperparameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration of the Lagrangian subgradient loop.
///
/// # Examples
///
/// ```
/// use u_kstsp::lagrangian::SubgradientConfig;
///
/// let config = SubgradientConfig::default()
///     .with_pi(2.0)
///     .with_max_iterations(50);
/// assert_eq!(config.initial_multiplier, 1.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgradientConfig {
    /// Step multiplier of the Polyak rule.
    pub pi: f64,

    /// Starting value of every multiplier.
    pub initial_multiplier: f64,

    /// Iteration cap.
    pub max_iterations: usize,

    /// Largest multiplier change still counted as converged.
    pub tolerance: f64,

    /// Factor applied to `pi` after every iteration (1.0 keeps it fixed).
    pub pi_decay: f64,
}

impl Default for SubgradientConfig {
    fn default() -> Self {
        Self {
            pi: 1.0,
            initial_multiplier: 1.0,
            max_iterations: 1000,
            tolerance: 1e-5,
            pi_decay: 1.0,
        }
    }
}

impl SubgradientConfig {
    pub fn with_pi(mut self, pi: f64) -> Self {
        self.pi = pi;
        self
    }

    pub fn with_initial_multiplier(mut self, value: f64) -> Self {
        self.initial_multiplier = value;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_pi_decay(mut self, decay: f64) -> Self {
        self.pi_decay = decay;
        self
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.pi.is_finite() && self.pi > 0.0) {
            return Err(Error::invalid_input(format!(
                "pi must be positive, got {}",
                self.pi
            )));
        }
        if !(self.initial_multiplier.is_finite() && self.initial_multiplier >= 0.0) {
            return Err(Error::invalid_input(format!(
                "initial multiplier must be non-negative, got {}",
                self.initial_multiplier
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::invalid_input("max iterations must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(Error::invalid_input(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        if !(self.pi_decay > 0.0 && self.pi_decay <= 1.0) {
            return Err(Error::invalid_input(format!(
                "pi decay must be in (0, 1], got {}",
                self.pi_decay
            )));
        }
        Ok(())
    }
}
