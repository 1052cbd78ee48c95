//! Adaptive strategy selection.
//!
//! Each producing strategy (create, mutate, crossover) keeps a running count
//! of attempts and successes for the current run. The next strategy is drawn
//! by roulette wheel over the smoothed success rates, so strategies that are
//! currently productive get picked more often without fixed probabilities.
//!
//! # Weighting
//!
//! ```text
//! r_s = (successes_s + a_s) / (attempts_s + b_s)
//! w_s = max(r_s, min_weight * max_t r_t)
//! ```
//!
//! The priors `(a_s, b_s)` are Create `(3, 4)`, Mutate `(1, 2)` and
//! Crossover `(1, 2)`: on an empty history Create is the most likely draw,
//! which seeds diversity before any evidence exists. A strategy with a
//! sustained success rate above 0.75 overtakes an untried Create.
//!
//! The floor is relative to the best available rate. Late in a run every
//! rate decays toward zero, and a fixed floor would then flatten the wheel
//! into a uniform draw; scaling it keeps the leader ahead while every
//! available strategy stays selectable.

use super::types::Strategy;
use rand::Rng;

const PRIOR_SUCCESSES: [f64; 3] = [3.0, 1.0, 1.0];
const PRIOR_ATTEMPTS: [f64; 3] = [4.0, 2.0, 2.0];

/// Attempt and success counters for one strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyStats {
    /// Children produced with this strategy.
    pub attempts: usize,
    /// Children the runner credited as a success.
    pub successes: usize,
}

impl StrategyStats {
    fn record(&mut self, success: bool) {
        self.attempts += 1;
        if success {
            self.successes += 1;
        }
    }
}

/// Picks the strategy for the next child from observed success rates.
///
/// # Examples
///
/// ```
/// use u_genetic::search::{Strategy, StrategySelector};
///
/// let mut selector = StrategySelector::new(0.02);
/// for _ in 0..100 {
///     selector.record_outcome(Strategy::Mutate, true);
/// }
/// let p = selector.probabilities(true);
/// assert!(p[1] > p[2]);
/// assert!(p[2] > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct StrategySelector {
    stats: [StrategyStats; 3],
    min_weight: f64,
}

impl StrategySelector {
    /// Creates a selector with no history.
    ///
    /// `min_weight` is the floor, as a fraction of the best available rate,
    /// applied to every available strategy's weight; values below
    /// `f64::EPSILON` are raised to it.
    pub fn new(min_weight: f64) -> Self {
        Self {
            stats: [StrategyStats::default(); 3],
            min_weight: min_weight.max(f64::EPSILON),
        }
    }

    /// Clears all counters.
    pub fn reset(&mut self) {
        self.stats = [StrategyStats::default(); 3];
    }

    /// Records whether a child produced by `strategy` succeeded.
    ///
    /// [`Strategy::None`] is ignored.
    pub fn record_outcome(&mut self, strategy: Strategy, success: bool) {
        if let Some(i) = strategy.index() {
            self.stats[i].record(success);
        }
    }

    /// Counters for `strategy` (all zero for [`Strategy::None`]).
    pub fn stats(&self, strategy: Strategy) -> StrategyStats {
        strategy
            .index()
            .map(|i| self.stats[i])
            .unwrap_or_default()
    }

    /// Counters for create, mutate and crossover, in that order.
    pub fn all_stats(&self) -> [StrategyStats; 3] {
        self.stats
    }

    /// Smoothed success rate of `strategy`, in (0, 1].
    pub fn success_rate(&self, strategy: Strategy) -> f64 {
        match strategy.index() {
            Some(i) => {
                let s = &self.stats[i];
                (s.successes as f64 + PRIOR_SUCCESSES[i]) / (s.attempts as f64 + PRIOR_ATTEMPTS[i])
            }
            None => 0.0,
        }
    }

    /// Selection probabilities for create, mutate and crossover.
    ///
    /// Crossover is exactly 0 when `crossover_available` is false and
    /// strictly positive otherwise. The entries sum to 1.
    pub fn probabilities(&self, crossover_available: bool) -> [f64; 3] {
        let weights = self.weights(crossover_available);
        let total: f64 = weights.iter().sum();
        weights.map(|w| w / total)
    }

    /// Draws the strategy for the next child.
    pub fn select<R: Rng>(&self, crossover_available: bool, rng: &mut R) -> Strategy {
        let weights = self.weights(crossover_available);
        Strategy::PRODUCING[roulette_select(&weights, rng)]
    }

    fn weights(&self, crossover_available: bool) -> [f64; 3] {
        let available = if crossover_available { 3 } else { 2 };
        let rates = Strategy::PRODUCING.map(|s| self.success_rate(s));
        let top = rates[..available].iter().copied().fold(0.0, f64::max);
        let floor = self.min_weight * top;

        let mut weights = rates.map(|r| r.max(floor));
        if !crossover_available {
            weights[2] = 0.0;
        }
        weights
    }
}

/// Roulette wheel over non-negative weights.
fn roulette_select<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }

    let mut roll = rng.random_range(0.0..total);
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        roll -= w;
        if roll <= 0.0 {
            return i;
        }
    }
    weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
}
