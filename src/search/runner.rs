//! Search loop execution.
//!
//! [`SearchRunner`] drives the search: build parents → pick a strategy →
//! produce and score children → accept or age → repeat, until the target is
//! met or a budget runs out.

use super::acceptance::{AcceptancePolicy, Outcome};
use super::config::SearchConfig;
use super::pool::HistoricalPool;
use super::strategy::{StrategySelector, StrategyStats};
use super::types::{is_better, Candidate, Fitness, SearchProblem, Strategy};
use crate::error::{Result, SearchError};
use crate::random::rng_from;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How many parents the loop keeps active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// One parent. Crossover partners come from the historical pool.
    Single,
    /// `pool_size` parents visited round-robin, each with its own age.
    /// Crossover partners come from the other active parents.
    Pool,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The best candidate satisfies [`SearchProblem::is_optimal`].
    TargetReached,
    /// `max_generations` was exhausted.
    GenerationLimit,
    /// `time_limit_ms` elapsed.
    TimeLimit,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Result of a search run.
///
/// Not reaching the target is not an error: the best candidate found is
/// returned either way and [`stop_reason`](Self::stop_reason) says why the
/// run ended. Callers that need optimality must check it.
#[derive(Debug, Clone)]
pub struct SearchResult<G, F> {
    /// The best candidate found during the entire run.
    pub best: Candidate<G, F>,

    /// Number of generations executed.
    pub generations: usize,

    /// Number of times the best-so-far strictly improved.
    pub improvements: usize,

    pub stop_reason: StopReason,

    /// Final counters for create, mutate and crossover.
    pub strategy_stats: [StrategyStats; 3],

    /// Best fitness after the initial parents, then after each improvement.
    pub fitness_history: Vec<F>,

    /// Wall-clock duration of the run.
    pub elapsed_ms: u64,
}

impl<G, F> SearchResult<G, F> {
    pub fn reached_target(&self) -> bool {
        self.stop_reason == StopReason::TargetReached
    }
}

/// Executes the search loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = SearchConfig::default().with_seed(42);
/// let result = SearchRunner::search_to_target(&problem, &target, &config)?;
/// println!("Best fitness: {:?}", result.best.fitness());
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Searches with a single parent until `optimal` is reached or a budget
    /// runs out.
    pub fn search_to_target<P: SearchProblem>(
        problem: &P,
        optimal: &P::Fitness,
        config: &SearchConfig,
    ) -> Result<SearchResult<P::Gene, P::Fitness>> {
        Self::run_with_cancel(problem, optimal, config, SearchMode::Single, None)
    }

    /// Searches with `config.pool_size` active parents.
    ///
    /// Suited to variable-length genomes: crossover pairs two active parents
    /// whose lengths may differ.
    pub fn search_with_pool<P: SearchProblem>(
        problem: &P,
        optimal: &P::Fitness,
        config: &SearchConfig,
    ) -> Result<SearchResult<P::Gene, P::Fitness>> {
        Self::run_with_cancel(problem, optimal, config, SearchMode::Pool, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the loop stops
    /// before the next generation and returns the best candidate so far.
    pub fn run_with_cancel<P: SearchProblem>(
        problem: &P,
        optimal: &P::Fitness,
        config: &SearchConfig,
        mode: SearchMode,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult<P::Gene, P::Fitness>> {
        config.validate()?;

        let mut rng = rng_from(config.seed);
        let start = Instant::now();
        let deadline = config
            .time_limit_ms
            .map(|ms| start + Duration::from_millis(ms));

        let parent_count = match mode {
            SearchMode::Single => 1,
            SearchMode::Pool => config.pool_size,
        };

        let mut selector = StrategySelector::new(config.min_strategy_weight);
        let mut policy = AcceptancePolicy::new(config.max_age, config.history_size);

        // 1. Initial parents
        let mut parents = Vec::with_capacity(parent_count);
        let first = generate_parent(problem, &mut rng, config.max_create_attempts)?;
        policy.offer(&first);
        let mut best = first.clone();
        parents.push(first);
        while parents.len() < parent_count {
            let parent = generate_parent(problem, &mut rng, config.max_create_attempts)?;
            policy.offer(&parent);
            if is_better(parent.fitness(), best.fitness()) {
                best = parent.clone();
            }
            parents.push(parent);
        }
        problem.display(&best);
        log::debug!(
            "search started: {:?} mode, {} parent(s), initial best {:?}",
            mode,
            parents.len(),
            best.fitness()
        );

        let mut fitness_history = vec![best.fitness().clone()];
        let mut generations = 0usize;
        let mut improvements = 0usize;
        let mut index = 0usize;

        // 2. Main loop
        let stop_reason = loop {
            if problem.is_optimal(best.fitness(), optimal) {
                break StopReason::TargetReached;
            }
            if generations >= config.max_generations {
                break StopReason::GenerationLimit;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break StopReason::TimeLimit;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    break StopReason::Cancelled;
                }
            }
            generations += 1;
            index = (index + 1) % parents.len();

            let crossover_available = problem.supports_crossover() && policy.pool().len() >= 2;

            // Produce children
            let mut drafts = Vec::with_capacity(config.children_per_generation);
            for _ in 0..config.children_per_generation {
                let strategy = selector.select(crossover_available, &mut rng);
                match produce(problem, strategy, &parents, index, policy.pool(), &mut rng) {
                    Some(genes) if !genes.is_empty() => drafts.push((strategy, genes)),
                    _ => selector.record_outcome(strategy, false),
                }
            }
            if drafts.is_empty() {
                continue;
            }

            // Score, then accept sequentially
            let mut children = evaluate(problem, drafts, config.parallel);
            let chosen = best_index(&children);
            for (i, c) in children.iter().enumerate() {
                if i != chosen {
                    selector.record_outcome(c.strategy(), false);
                }
            }
            let child = children.swap_remove(chosen);
            let strategy = child.strategy();
            let beats_best = is_better(child.fitness(), best.fitness());

            // Create only earns credit for a new overall best.
            let outcome = policy.apply(&mut parents[index], child, &mut rng);
            let success = match strategy {
                Strategy::Create => outcome.is_replacement() && beats_best,
                _ => outcome.is_replacement(),
            };
            selector.record_outcome(strategy, success);

            if outcome == Outcome::NeedsFresh {
                match generate_parent(problem, &mut rng, config.max_create_attempts) {
                    Ok(fresh) => {
                        log::trace!("parent {index} restarted from a fresh candidate");
                        policy.offer(&fresh);
                        parents[index] = fresh;
                    }
                    Err(err) => {
                        log::warn!("restart failed ({err}), keeping parent {index}");
                        parents[index].reset_age();
                    }
                }
            }

            if is_better(parents[index].fitness(), best.fitness()) {
                best = parents[index].clone();
                improvements += 1;
                fitness_history.push(best.fitness().clone());
                log::debug!(
                    "generation {generations}: new best {:?} via {:?}",
                    best.fitness(),
                    best.strategy()
                );
                problem.display(&best);
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "search finished: {stop_reason:?} after {generations} generations ({elapsed_ms} ms), best {:?}",
            best.fitness()
        );

        Ok(SearchResult {
            best,
            generations,
            improvements,
            stop_reason,
            strategy_stats: selector.all_stats(),
            fitness_history,
            elapsed_ms,
        })
    }
}

/// Calls `create` until it yields a non-empty genome, then scores it.
fn generate_parent<P: SearchProblem, R: Rng>(
    problem: &P,
    rng: &mut R,
    max_attempts: usize,
) -> Result<Candidate<P::Gene, P::Fitness>> {
    for _ in 0..max_attempts {
        if let Some(genes) = problem.create(rng) {
            if !genes.is_empty() {
                let fitness = problem.fitness(&genes);
                return Ok(Candidate::new(genes, fitness, Strategy::Create));
            }
        }
    }
    Err(SearchError::NoFeasibleCandidate {
        attempts: max_attempts,
    })
}

/// Produces a child genome with `strategy`, or `None` if the strategy could
/// not produce one this time.
fn produce<P: SearchProblem, R: Rng>(
    problem: &P,
    strategy: Strategy,
    parents: &[Candidate<P::Gene, P::Fitness>],
    index: usize,
    pool: &HistoricalPool<P::Gene, P::Fitness>,
    rng: &mut R,
) -> Option<Vec<P::Gene>> {
    let parent = &parents[index];
    match strategy {
        Strategy::Create => problem.create(rng),
        Strategy::Mutate => Some(problem.mutate(parent.genes(), rng)),
        Strategy::Crossover => {
            let partner = if parents.len() > 1 {
                let mut j = rng.random_range(0..parents.len() - 1);
                if j >= index {
                    j += 1;
                }
                &parents[j]
            } else {
                pool.sample_excluding(parent.fitness(), rng)?
            };
            problem.crossover(parent.genes(), partner.genes(), rng)
        }
        Strategy::None => None,
    }
}

/// Scores drafted genomes, in parallel when enabled.
fn evaluate<P: SearchProblem>(
    problem: &P,
    drafts: Vec<(Strategy, Vec<P::Gene>)>,
    parallel: bool,
) -> Vec<Candidate<P::Gene, P::Fitness>> {
    #[cfg(feature = "parallel")]
    if parallel && drafts.len() > 1 {
        return drafts
            .into_par_iter()
            .map(|(strategy, genes)| {
                let fitness = problem.fitness(&genes);
                Candidate::new(genes, fitness, strategy)
            })
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    drafts
        .into_iter()
        .map(|(strategy, genes)| {
            let fitness = problem.fitness(&genes);
            Candidate::new(genes, fitness, strategy)
        })
        .collect()
}

/// Index of the first strictly best child.
fn best_index<G, F: Fitness>(children: &[Candidate<G, F>]) -> usize {
    let mut chosen = 0;
    for (i, c) in children.iter().enumerate().skip(1) {
        if is_better(c.fitness(), children[chosen].fitness()) {
            chosen = i;
        }
    }
    chosen
}

// ============================================================================
// Tests
// ============================================================================
