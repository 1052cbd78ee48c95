//! Age-based acceptance.
//!
//! A child replaces its parent only on strict improvement. Otherwise the
//! parent ages by one generation. Once it reaches `max_age` it stagnates:
//! a worse child may take over with a probability that shrinks as the child
//! outranks more of the historical pool, and failing that the parent is
//! retired in favour of the pool's best champion.
//!
//! # Escape probability
//!
//! ```text
//! p(escape) = exp(-(pool entries strictly worse than the child) / pool size)
//! ```
//!
//! A child worse than every champion escapes with probability 1; a child
//! better than all of them but the parent with probability close to `1/e`.

use super::pool::HistoricalPool;
use super::types::{is_better, Candidate, Fitness};
use rand::Rng;

/// The acceptance decision for one parent/child pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The child is strictly better and takes the parent slot with age 0.
    Replace,
    /// The parent stays and ages by one.
    KeepParentAgeIncrement,
    /// The parent stagnated and a strictly worse child took the slot with
    /// age 0, moving the search off the exhausted optimum.
    AcceptWorse,
    /// The parent stagnated and was swapped for the pool's best champion.
    ReplaceFromPool,
}

/// What [`AcceptancePolicy::apply`] did to the parent slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The decision was carried out.
    Applied(Decision),
    /// The parent stagnated with an empty pool; the caller must install a
    /// freshly created candidate.
    NeedsFresh,
}

impl Outcome {
    /// Whether the child took the parent slot by improving on it.
    pub fn is_replacement(self) -> bool {
        self == Outcome::Applied(Decision::Replace)
    }
}

/// Compares children against parents and maintains the historical pool.
#[derive(Debug, Clone)]
pub struct AcceptancePolicy<G, F> {
    max_age: Option<usize>,
    pool: HistoricalPool<G, F>,
}

impl<G: Clone, F: Fitness> AcceptancePolicy<G, F> {
    /// Creates a policy. `max_age: None` means parents never stagnate.
    pub fn new(max_age: Option<usize>, history_size: usize) -> Self {
        Self {
            max_age,
            pool: HistoricalPool::new(history_size),
        }
    }

    pub fn max_age(&self) -> Option<usize> {
        self.max_age
    }

    /// The champions seen so far, best first.
    pub fn pool(&self) -> &HistoricalPool<G, F> {
        &self.pool
    }

    /// Offers a candidate to the historical pool directly.
    pub fn offer(&mut self, candidate: &Candidate<G, F>) -> bool {
        self.pool.offer(candidate.clone())
    }

    /// Decides what should happen to `parent` given `child`.
    ///
    /// Rules, in order:
    /// 1. `child > parent` → [`Decision::Replace`]
    /// 2. `parent.age < max_age` → [`Decision::KeepParentAgeIncrement`]
    /// 3. otherwise → [`Decision::ReplaceFromPool`]
    ///
    /// A tie is never an improvement. In case 3, [`apply`](Self::apply)
    /// first lets a worse child escape with [`escape_probability`].
    ///
    /// [`escape_probability`]: Self::escape_probability
    pub fn decide(&self, parent: &Candidate<G, F>, child: &Candidate<G, F>) -> Decision {
        if is_better(child.fitness(), parent.fitness()) {
            Decision::Replace
        } else if !self.is_stagnant(parent) {
            Decision::KeepParentAgeIncrement
        } else {
            Decision::ReplaceFromPool
        }
    }

    /// Whether `parent` has reached `max_age`.
    pub fn is_stagnant(&self, parent: &Candidate<G, F>) -> bool {
        matches!(self.max_age, Some(max_age) if parent.age() >= max_age)
    }

    /// Chance that a stagnated `parent` hands its slot to `child`.
    ///
    /// Zero unless the child is strictly worse than the parent and the pool
    /// is non-empty.
    pub fn escape_probability(&self, parent: &Candidate<G, F>, child: &Candidate<G, F>) -> f64 {
        if self.pool.is_empty() || !is_better(parent.fitness(), child.fitness()) {
            return 0.0;
        }
        let outranked = self
            .pool
            .iter()
            .filter(|e| is_better(child.fitness(), e.fitness()))
            .count();
        (-(outranked as f64) / self.pool.len() as f64).exp()
    }

    /// Decides and carries out the decision on `parent` in place.
    pub fn apply<R: Rng>(
        &mut self,
        parent: &mut Candidate<G, F>,
        child: Candidate<G, F>,
        rng: &mut R,
    ) -> Outcome {
        let decision = self.decide(parent, &child);
        match decision {
            Decision::Replace => {
                self.pool.offer(child.clone());
                *parent = child;
                parent.reset_age();
            }
            Decision::KeepParentAgeIncrement => parent.increment_age(),
            Decision::AcceptWorse | Decision::ReplaceFromPool => {
                if rng.random_bool(self.escape_probability(parent, &child)) {
                    log::trace!(
                        "parent {:?} aged out, continuing from worse child {:?}",
                        parent.fitness(),
                        child.fitness()
                    );
                    *parent = child;
                    parent.reset_age();
                    return Outcome::Applied(Decision::AcceptWorse);
                }
                let Some(champion) = self.pool.best() else {
                    return Outcome::NeedsFresh;
                };
                log::trace!(
                    "parent {:?} aged out, resuming from {:?}",
                    parent.fitness(),
                    champion.fitness()
                );
                *parent = champion.clone();
                parent.reset_age();
                return Outcome::Applied(Decision::ReplaceFromPool);
            }
        }
        Outcome::Applied(decision)
    }
}
