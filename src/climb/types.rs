//! Core trait for the hill-climbing parameter sweep.

use crate::error::Result;
use crate::search::{Candidate, Fitness};

/// Defines a parameter sweep over a structural control value.
///
/// The typical parameter is the maximum genome length: each call to
/// [`optimize`](ClimbProblem::optimize) runs a complete search with genomes
/// of that length, and [`next_parameter`](ClimbProblem::next_parameter)
/// shrinks it to the number of positions the best candidate actually uses.
///
/// # Examples
///
/// ```ignore
/// impl ClimbProblem for MinimalCircuit {
///     type Gene = Node;
///     type Fitness = usize;
///
///     fn optimize(&self, max_len: usize) -> Result<Candidate<Node, usize>> {
///         let problem = CircuitProblem::new(&self.rules, max_len);
///         let result = SearchRunner::search_to_target(&problem, &self.rules.len(), &self.search)?;
///         Ok(result.best)
///     }
///
///     fn is_improvement(&self, best: &Candidate<Node, usize>, child: &Candidate<Node, usize>) -> bool {
///         *child.fitness() == self.rules.len() && used(child) < used(best)
///     }
///
///     fn is_optimal(&self, child: &Candidate<Node, usize>) -> bool {
///         *child.fitness() == self.rules.len() && used(child) <= self.expected
///     }
///
///     fn next_parameter(&self, best: &Candidate<Node, usize>) -> usize {
///         used(best)
///     }
/// }
/// ```
pub trait ClimbProblem {
    /// Gene type of the candidates the inner search produces.
    type Gene: Clone;

    /// Fitness type of the candidates the inner search produces.
    type Fitness: Fitness;

    /// Runs a full search at `parameter` and returns its best candidate.
    ///
    /// Each call should start from a fresh random population so repeated
    /// calls at one parameter explore different regions.
    fn optimize(&self, parameter: usize) -> Result<Candidate<Self::Gene, Self::Fitness>>;

    /// Whether `child` should replace `best`.
    fn is_improvement(
        &self,
        best: &Candidate<Self::Gene, Self::Fitness>,
        child: &Candidate<Self::Gene, Self::Fitness>,
    ) -> bool;

    /// Whether `candidate` ends the sweep.
    fn is_optimal(&self, candidate: &Candidate<Self::Gene, Self::Fitness>) -> bool;

    /// The parameter for the next round, derived from the current best.
    fn next_parameter(&self, best: &Candidate<Self::Gene, Self::Fitness>) -> usize;

    /// Observes each adopted best and the parameter that produced it.
    fn display(&self, _best: &Candidate<Self::Gene, Self::Fitness>, _parameter: usize) {}
}
