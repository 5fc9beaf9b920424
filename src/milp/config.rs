//! Per-session solver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default wall-clock budget for one optimization: 30 minutes.
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 30.0 * 60.0;

/// Configuration of one solver context.
///
/// Created per run and handed to every model built in that run; nothing is
/// shared between sessions.
///
/// # Examples
///
/// ```
/// use u_kstsp::milp::SolverConfig;
///
/// let config = SolverConfig::new("ksTSP")
///     .with_time_limit_secs(60.0)
///     .with_verbose(true);
/// assert_eq!(config.name, "ksTSP");
/// assert!(config.lazy_constraints);
/// assert_eq!(config.time_limit().unwrap().as_secs(), 60);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Model name, used in logs and error context.
    pub name: String,

    /// Log every solve round at info level instead of debug.
    pub verbose: bool,

    /// Consult the cut supplier on integer candidates.
    pub lazy_constraints: bool,

    /// Wall-clock budget in seconds; non-positive or non-finite disables it.
    pub time_limit_secs: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            name: "model".to_string(),
            verbose: false,
            lazy_constraints: true,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
        }
    }
}

impl SolverConfig {
    /// Creates a configuration with default values and the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Same settings under another model name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Set verbose logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable or disable lazy constraint callbacks.
    pub fn with_lazy_constraints(mut self, enable: bool) -> Self {
        self.lazy_constraints = enable;
        self
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit_secs(mut self, secs: f64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// The time limit, if enabled.
    pub fn time_limit(&self) -> Option<Duration> {
        if self.time_limit_secs.is_finite() && self.time_limit_secs > 0.0 {
            Some(Duration::from_secs_f64(self.time_limit_secs))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert!(!config.verbose);
        assert!(config.lazy_constraints);
        assert_eq!(config.time_limit(), Some(Duration::from_secs(1800)));
    }

    #[test]
    fn test_disabled_time_limit() {
        assert!(SolverConfig::new("a").with_time_limit_secs(0.0).time_limit().is_none());
        assert!(SolverConfig::new("a").with_time_limit_secs(-5.0).time_limit().is_none());
        assert!(SolverConfig::new("a")
            .with_time_limit_secs(f64::INFINITY)
            .time_limit()
            .is_none());
    }

    #[test]
    fn test_renamed_keeps_settings() {
        let base = SolverConfig::new("a")
            .with_lazy_constraints(false)
            .with_time_limit_secs(5.0);
        let other = base.renamed("b");
        assert_eq!(other.name, "b");
        assert!(!other.lazy_constraints);
        assert_eq!(other.time_limit_secs, 5.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SolverConfig::new("x").with_verbose(true);
        let json = serde_json::to_string(&config).expect("serialize");
        let back: SolverConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, config);
    }
}
