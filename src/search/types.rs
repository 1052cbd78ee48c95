//! Core type definitions for the search engine.
//!
//! [`Candidate`] is the unit the engine moves around; [`SearchProblem`] is the
//! contract between the generic engine and a domain. Everything the engine
//! knows about a domain goes through that trait.

use rand::Rng;
use std::cmp::Ordering;

/// Marker trait for fitness values.
///
/// **Greater is better.** Domains that minimize reverse their ordering
/// (negate a number, or implement `PartialOrd` backwards on a wrapper).
///
/// The ordering is expected to be total over the values a domain actually
/// produces. When `partial_cmp` returns `None` (e.g. `NaN`), the pair is
/// never treated as an improvement.
pub trait Fitness: PartialOrd + Clone + std::fmt::Debug + Send + Sync + 'static {}

impl<T> Fitness for T where T: PartialOrd + Clone + std::fmt::Debug + Send + Sync + 'static {}

/// Returns `true` when `a` is strictly better than `b`.
#[inline]
pub(crate) fn is_better<F: Fitness>(a: &F, b: &F) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Greater))
}

/// Returns `true` when `a` and `b` compare equal.
#[inline]
pub(crate) fn is_same<F: Fitness>(a: &F, b: &F) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Equal))
}

/// How a candidate was produced.
///
/// Recorded for statistics only; the engine never branches on a
/// candidate's strategy when deciding acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Not produced by a strategy (e.g. handed in by a caller).
    #[default]
    None,
    /// A fresh genome from [`SearchProblem::create`].
    Create,
    /// A perturbation of the parent via [`SearchProblem::mutate`].
    Mutate,
    /// A recombination via [`SearchProblem::crossover`].
    Crossover,
}

impl Strategy {
    /// The strategies that can produce a child, in selector order.
    pub const PRODUCING: [Strategy; 3] = [Strategy::Create, Strategy::Mutate, Strategy::Crossover];

    /// Index into per-strategy tables, `None` for [`Strategy::None`].
    pub(crate) fn index(self) -> Option<usize> {
        match self {
            Strategy::None => None,
            Strategy::Create => Some(0),
            Strategy::Mutate => Some(1),
            Strategy::Crossover => Some(2),
        }
    }
}

/// An evaluated genome.
///
/// Genes and fitness are fixed at construction. The only mutable part is
/// `age`, which the acceptance policy advances while the candidate holds a
/// parent slot and resets when it is reinstated.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<G, F> {
    genes: Vec<G>,
    fitness: F,
    strategy: Strategy,
    age: usize,
}

impl<G, F> Candidate<G, F> {
    /// Creates a candidate with age 0.
    pub fn new(genes: Vec<G>, fitness: F, strategy: Strategy) -> Self {
        Self {
            genes,
            fitness,
            strategy,
            age: 0,
        }
    }

    /// The genome.
    pub fn genes(&self) -> &[G] {
        &self.genes
    }

    /// The score computed at construction.
    pub fn fitness(&self) -> &F {
        &self.fitness
    }

    /// The strategy that produced this candidate.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Generations survived as parent without strict improvement.
    pub fn age(&self) -> usize {
        self.age
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the genome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Consumes the candidate and returns its genome.
    pub fn into_genes(self) -> Vec<G> {
        self.genes
    }

    pub(crate) fn increment_age(&mut self) {
        self.age += 1;
    }

    pub(crate) fn reset_age(&mut self) {
        self.age = 0;
    }
}

/// Defines a search problem.
///
/// The engine drives the search; the domain supplies genome construction,
/// perturbation, recombination and scoring.
///
/// # Infeasibility
///
/// [`create`](SearchProblem::create) may return `None` (or an empty genome)
/// when the domain's constraints cannot be satisfied on this draw. The engine
/// retries with a fresh call instead of failing.
///
/// # Thread Safety
///
/// `SearchProblem` must be `Send + Sync` because several children of one
/// generation may be scored in parallel with rayon. Scoring must only read
/// shared domain data.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_genetic::search::SearchProblem;
///
/// struct OneMax(usize);
///
/// impl SearchProblem for OneMax {
///     type Gene = bool;
///     type Fitness = usize;
///
///     fn create<R: Rng>(&self, rng: &mut R) -> Option<Vec<bool>> {
///         Some((0..self.0).map(|_| rng.random_bool(0.5)).collect())
///     }
///
///     fn mutate<R: Rng>(&self, genes: &[bool], rng: &mut R) -> Vec<bool> {
///         let mut child = genes.to_vec();
///         let i = rng.random_range(0..child.len());
///         child[i] = !child[i];
///         child
///     }
///
///     fn fitness(&self, genes: &[bool]) -> usize {
///         genes.iter().filter(|&&b| b).count()
///     }
/// }
/// ```
pub trait SearchProblem: Send + Sync {
    /// A single unit of the genome.
    type Gene: Clone + Send + Sync;

    /// The score type. Greater is better.
    type Fitness: Fitness;

    /// Produces a random genome, or `None` when none is feasible right now.
    fn create<R: Rng>(&self, rng: &mut R) -> Option<Vec<Self::Gene>>;

    /// Produces a genome a small step away from `genes`.
    ///
    /// Must not fail. A domain that cannot apply the change it drew should
    /// fall back to a smaller one (e.g. dropping the offending gene).
    fn mutate<R: Rng>(&self, genes: &[Self::Gene], rng: &mut R) -> Vec<Self::Gene>;

    /// Scores a genome. Must be deterministic.
    fn fitness(&self, genes: &[Self::Gene]) -> Self::Fitness;

    /// Combines two genomes, which may differ in length.
    ///
    /// The default returns `None`, meaning crossover is not supported.
    fn crossover<R: Rng>(
        &self,
        _genes: &[Self::Gene],
        _partner: &[Self::Gene],
        _rng: &mut R,
    ) -> Option<Vec<Self::Gene>> {
        None
    }

    /// Whether the engine may select [`Strategy::Crossover`].
    fn supports_crossover(&self) -> bool {
        false
    }

    /// Whether `fitness` satisfies the search target.
    ///
    /// The default is `fitness >= target`. Domains with discrete scores that
    /// must hit the target exactly override this with equality.
    fn is_optimal(&self, fitness: &Self::Fitness, target: &Self::Fitness) -> bool {
        matches!(
            fitness.partial_cmp(target),
            Some(Ordering::Greater | Ordering::Equal)
        )
    }

    /// Observes each new best candidate. Must not affect the search.
    fn display(&self, _candidate: &Candidate<Self::Gene, Self::Fitness>) {}
}
