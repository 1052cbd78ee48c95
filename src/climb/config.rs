//! Hill-climbing configuration.

use crate::error::ConfigError;
use crate::search::check_min;

/// Configuration for the hill-climbing parameter sweep.
///
/// The sweep has no natural end besides finding an optimal candidate, so
/// `max_rounds` always bounds it.
///
/// # Examples
///
/// ```
/// use u_genetic::climb::ClimbConfig;
///
/// let config = ClimbConfig::default()
///     .with_max_rounds(50)
///     .with_max_parameter(64)
///     .with_time_limit_ms(60_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClimbConfig {
    /// Maximum number of inner searches, including the first.
    pub max_rounds: usize,

    /// Upper bound on the parameter; requested values are clamped to
    /// `1..=max_parameter`.
    pub max_parameter: usize,

    /// Optional wall-clock limit in milliseconds, checked between rounds.
    pub time_limit_ms: Option<u64>,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            max_rounds: 100,
            max_parameter: 10_000,
            time_limit_ms: None,
        }
    }
}

impl ClimbConfig {
    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }

    pub fn with_max_parameter(mut self, n: usize) -> Self {
        self.max_parameter = n;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_min("max_rounds", self.max_rounds, 1)?;
        check_min("max_parameter", self.max_parameter, 1)?;
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }

    pub(crate) fn clamp(&self, parameter: usize) -> usize {
        parameter.clamp(1, self.max_parameter)
    }
}
