//! Hill-climbing execution loop.

use super::config::ClimbConfig;
use super::types::ClimbProblem;
use crate::error::Result;
use crate::search::{Candidate, StopReason};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a hill-climbing sweep.
#[derive(Debug, Clone)]
pub struct ClimbResult<G, F> {
    /// The best candidate adopted during the sweep.
    pub best: Candidate<G, F>,

    /// The parameter that produced `best`.
    pub parameter: usize,

    /// Number of inner searches run.
    pub rounds: usize,

    /// Why the sweep ended. [`StopReason::GenerationLimit`] means
    /// `max_rounds` was exhausted.
    pub stop_reason: StopReason,

    /// `(parameter, fitness)` of every round's candidate, in order.
    pub trail: Vec<(usize, F)>,

    /// Wall-clock duration of the sweep.
    pub elapsed_ms: u64,
}

impl<G, F> ClimbResult<G, F> {
    /// Whether the sweep ended on a candidate accepted by
    /// [`ClimbProblem::is_optimal`].
    pub fn optimal(&self) -> bool {
        self.stop_reason == StopReason::TargetReached
    }
}

/// Executes the hill-climbing parameter sweep.
///
/// Starting from `start_parameter`, repeatedly runs
/// [`ClimbProblem::optimize`]. An optimal child ends the sweep; an improving
/// child becomes the new best; the next parameter always comes from
/// [`ClimbProblem::next_parameter`] applied to the current best.
pub struct HillClimber;

impl HillClimber {
    pub fn climb<P: ClimbProblem>(
        problem: &P,
        start_parameter: usize,
        config: &ClimbConfig,
    ) -> Result<ClimbResult<P::Gene, P::Fitness>> {
        Self::climb_with_cancel(problem, start_parameter, config, None)
    }

    /// Runs the sweep with an optional cancellation token, checked between
    /// rounds.
    pub fn climb_with_cancel<P: ClimbProblem>(
        problem: &P,
        start_parameter: usize,
        config: &ClimbConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<ClimbResult<P::Gene, P::Fitness>> {
        config.validate()?;

        let start = Instant::now();
        let deadline = config
            .time_limit_ms
            .map(|ms| start + Duration::from_millis(ms));

        let mut parameter = config.clamp(start_parameter);
        let mut best = problem.optimize(parameter)?;
        let mut best_parameter = parameter;
        let mut trail = vec![(parameter, best.fitness().clone())];
        let mut rounds = 1usize;
        problem.display(&best, parameter);
        log::debug!("climb round 1 at {parameter}: {:?}", best.fitness());

        let stop_reason = loop {
            if problem.is_optimal(&best) {
                break StopReason::TargetReached;
            }
            if rounds >= config.max_rounds {
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

            parameter = config.clamp(problem.next_parameter(&best));
            let child = problem.optimize(parameter)?;
            rounds += 1;
            trail.push((parameter, child.fitness().clone()));
            log::debug!("climb round {rounds} at {parameter}: {:?}", child.fitness());

            if problem.is_optimal(&child) || problem.is_improvement(&best, &child) {
                best = child;
                best_parameter = parameter;
                problem.display(&best, parameter);
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "climb finished: {stop_reason:?} after {rounds} rounds ({elapsed_ms} ms), parameter {best_parameter}"
        );

        Ok(ClimbResult {
            best,
            parameter: best_parameter,
            rounds,
            stop_reason,
            trail,
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchConfig, SearchProblem, SearchRunner, Strategy};
    use rand::Rng;
    use std::cell::RefCell;

    // ---- Synthetic sweep: optimize(p) returns a candidate "using" p - 1 positions ----

    struct Shrinking {
        target: usize,
        seen: RefCell<Vec<usize>>,
    }

    impl ClimbProblem for Shrinking {
        type Gene = u8;
        type Fitness = i64;

        fn optimize(&self, parameter: usize) -> Result<Candidate<u8, i64>> {
            self.seen.borrow_mut().push(parameter);
            let used = parameter.saturating_sub(1).max(1);
            Ok(Candidate::new(vec![0; used], -(used as i64), Strategy::Create))
        }

        fn is_improvement(&self, best: &Candidate<u8, i64>, child: &Candidate<u8, i64>) -> bool {
            child.len() < best.len()
        }

        fn is_optimal(&self, child: &Candidate<u8, i64>) -> bool {
            child.len() <= self.target
        }

        fn next_parameter(&self, best: &Candidate<u8, i64>) -> usize {
            best.len()
        }
    }

    #[test]
    fn test_climb_shrinks_to_target() {
        let problem = Shrinking {
            target: 3,
            seen: RefCell::new(Vec::new()),
        };
        let result = HillClimber::climb(&problem, 10, &ClimbConfig::default()).unwrap();

        assert!(result.optimal());
        assert!(result.best.len() <= 3);
        let seen = problem.seen.borrow();
        for w in seen.windows(2) {
            assert!(w[1] <= w[0], "parameter should never grow: {seen:?}");
        }
        assert_eq!(result.trail.len(), result.rounds);
    }

    #[test]
    fn test_climb_round_limit() {
        let problem = Shrinking {
            target: 0,
            seen: RefCell::new(Vec::new()),
        };
        let config = ClimbConfig::default().with_max_rounds(4);
        let result = HillClimber::climb(&problem, 100, &config).unwrap();

        assert_eq!(result.stop_reason, StopReason::GenerationLimit);
        assert_eq!(result.rounds, 4);
        assert!(!result.optimal());
    }

    #[test]
    fn test_start_parameter_clamped() {
        let problem = Shrinking {
            target: 1,
            seen: RefCell::new(Vec::new()),
        };
        let config = ClimbConfig::default().with_max_parameter(5);
        let result = HillClimber::climb(&problem, 1_000, &config).unwrap();
        assert_eq!(problem.seen.borrow()[0], 5);
        assert!(result.optimal());
    }

    #[test]
    fn test_cancelled_before_second_round() {
        let problem = Shrinking {
            target: 0,
            seen: RefCell::new(Vec::new()),
        };
        let cancel = Arc::new(AtomicBool::new(true));
        let result =
            HillClimber::climb_with_cancel(&problem, 10, &ClimbConfig::default(), Some(cancel))
                .unwrap();
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.rounds, 1);
    }

    // ---- Climb over a real inner search: shortest all-true genome ----

    struct Ones {
        len: usize,
    }

    impl SearchProblem for Ones {
        type Gene = bool;
        type Fitness = usize;

        fn create<R: Rng>(&self, rng: &mut R) -> Option<Vec<bool>> {
            Some((0..self.len).map(|_| rng.random_bool(0.5)).collect())
        }

        fn mutate<R: Rng>(&self, genes: &[bool], rng: &mut R) -> Vec<bool> {
            let mut child = genes.to_vec();
            let i = rng.random_range(0..child.len());
            child[i] = !child[i];
            child
        }

        fn fitness(&self, genes: &[bool]) -> usize {
            genes.iter().filter(|&&b| b).count()
        }
    }

    struct ShortestOnes;

    impl ClimbProblem for ShortestOnes {
        type Gene = bool;
        type Fitness = usize;

        fn optimize(&self, parameter: usize) -> Result<Candidate<bool, usize>> {
            let config = SearchConfig::default().with_seed(parameter as u64);
            let result = SearchRunner::search_to_target(&Ones { len: parameter }, &parameter, &config)?;
            Ok(result.best)
        }

        fn is_improvement(&self, best: &Candidate<bool, usize>, child: &Candidate<bool, usize>) -> bool {
            *child.fitness() == child.len() && child.len() < best.len()
        }

        fn is_optimal(&self, child: &Candidate<bool, usize>) -> bool {
            *child.fitness() == child.len() && child.len() <= 4
        }

        fn next_parameter(&self, best: &Candidate<bool, usize>) -> usize {
            best.len() - 1
        }
    }

    #[test]
    fn test_climb_over_search() {
        let result = HillClimber::climb(&ShortestOnes, 8, &ClimbConfig::default()).unwrap();
        assert!(result.optimal());
        assert_eq!(*result.best.fitness(), result.best.len());
        assert!(result.parameter <= 4);
    }
}
