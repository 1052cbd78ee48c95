//! Search configuration.
//!
//! [`SearchConfig`] holds all parameters that control the search loop.

use crate::error::ConfigError;

/// Configuration for the search loop.
///
/// Every run is bounded by `max_generations`; `time_limit_ms` adds an
/// optional wall-clock bound on top.
///
/// # Defaults
///
/// ```
/// use u_genetic::search::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.max_age, Some(50));
/// assert_eq!(config.max_generations, 100_000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_genetic::search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_max_age(30)
///     .with_pool_size(8)
///     .with_history_size(25)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Generations a parent may survive without strict improvement before it
    /// stagnates and is retired.
    ///
    /// `Some(0)` retires a parent on its first failed child. `None` lets
    /// parents age forever, leaving escapes to the `create` strategy.
    pub max_age: Option<usize>,

    /// Number of active parents in pool mode.
    ///
    /// [`search_to_target`](super::SearchRunner::search_to_target) always
    /// uses a single parent and ignores this value.
    pub pool_size: usize,

    /// Capacity of the historical pool of distinct-fitness champions.
    ///
    /// Kept small so crossover sampling stays cheap. Typical range: 10–40.
    pub history_size: usize,

    /// Children produced and scored per generation.
    ///
    /// With the `parallel` feature and `parallel = true`, children of one
    /// generation are scored concurrently; acceptance stays sequential.
    pub children_per_generation: usize,

    /// Lower bound on any available strategy's selection weight.
    pub min_strategy_weight: f64,

    /// Maximum number of generations. Always enforced.
    pub max_generations: usize,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked between generations, so a run may overshoot by one
    /// generation's worth of work.
    pub time_limit_ms: Option<u64>,

    /// How many consecutive infeasible `create` calls are tolerated while
    /// building an initial parent.
    pub max_create_attempts: usize,

    /// Whether to score children in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_age: Some(50),
            pool_size: 1,
            history_size: 20,
            children_per_generation: 1,
            min_strategy_weight: 0.02,
            max_generations: 100_000,
            time_limit_ms: None,
            max_create_attempts: 10_000,
            parallel: true,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_max_age(mut self, age: usize) -> Self {
        self.max_age = Some(age);
        self
    }

    /// Parents never stagnate.
    pub fn with_unlimited_age(mut self) -> Self {
        self.max_age = None;
        self
    }

    pub fn with_pool_size(mut self, n: usize) -> Self {
        self.pool_size = n;
        self
    }

    pub fn with_history_size(mut self, n: usize) -> Self {
        self.history_size = n;
        self
    }

    pub fn with_children_per_generation(mut self, n: usize) -> Self {
        self.children_per_generation = n;
        self
    }

    /// Sets the strategy weight floor, clamped to `[0, 1]`.
    pub fn with_min_strategy_weight(mut self, w: f64) -> Self {
        self.min_strategy_weight = w.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_max_create_attempts(mut self, n: usize) -> Self {
        self.max_create_attempts = n;
        self
    }

    /// Enables or disables parallel scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for quick feasibility checks.
    ///
    /// - Max age: 20, Generations: 10 000, Time limit: 5s
    pub fn fast() -> Self {
        Self {
            max_age: Some(20),
            max_generations: 10_000,
            time_limit_ms: Some(5_000),
            ..Self::default()
        }
    }

    /// Preset with moderate patience and budget.
    ///
    /// - Max age: 50, Pool size: 5, Generations: 100 000, Time limit: 30s
    pub fn balanced() -> Self {
        Self {
            pool_size: 5,
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// Preset for hard problems: patient parents, wide pools, long budget.
    ///
    /// - Max age: 200, Pool size: 10, History: 40, Children: 4
    /// - Generations: 1 000 000, Time limit: 120s
    pub fn thorough() -> Self {
        Self {
            max_age: Some(200),
            pool_size: 10,
            history_size: 40,
            children_per_generation: 4,
            max_generations: 1_000_000,
            time_limit_ms: Some(120_000),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_min("pool_size", self.pool_size, 1)?;
        check_min("history_size", self.history_size, 1)?;
        check_min("children_per_generation", self.children_per_generation, 1)?;
        check_min("max_generations", self.max_generations, 1)?;
        check_min("max_create_attempts", self.max_create_attempts, 1)?;
        if !(0.0..=1.0).contains(&self.min_strategy_weight) {
            return Err(ConfigError::OutOfRange {
                name: "min_strategy_weight",
                range: "[0, 1]",
                value: self.min_strategy_weight,
            });
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }
}

pub(crate) fn check_min(name: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::TooSmall { name, min, value });
    }
    Ok(())
}
