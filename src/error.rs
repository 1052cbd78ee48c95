//! Error types.
//!
//! The engine has two failure surfaces: an invalid configuration, and a
//! problem whose `create` callback never yields a feasible genome within the
//! configured attempt budget. Non-convergence is not an error; it is reported
//! through [`StopReason`](crate::search::StopReason) on the result.

use thiserror::Error;

/// A configuration parameter is out of range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be at least {min}, got {value}")]
    TooSmall {
        name: &'static str,
        min: usize,
        value: usize,
    },

    #[error("{name} must be in {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },

    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,
}

/// Failure of a search or climb run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("no feasible candidate produced after {attempts} create attempts")]
    NoFeasibleCandidate { attempts: usize },
}

pub type Result<T> = std::result::Result<T, SearchError>;
