//! Historical pool of distinct-fitness champions.
//!
//! The pool remembers the best candidates seen in a run, one per fitness
//! value, ordered best to worst. It supplies crossover partners and the
//! restart point when the current parent stagnates.

use super::types::{is_better, is_same, Candidate, Fitness};
use rand::Rng;

/// Bounded, fitness-deduplicated collection of candidates.
///
/// Two candidates with equal fitness are the same entry here regardless of
/// their genes: the first one offered wins.
#[derive(Debug, Clone)]
pub struct HistoricalPool<G, F> {
    entries: Vec<Candidate<G, F>>,
    capacity: usize,
}

impl<G: Clone, F: Fitness> HistoricalPool<G, F> {
    /// Creates an empty pool holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Offers a candidate to the pool.
    ///
    /// Returns `false` if an entry with equal fitness already exists, or if
    /// the pool is full and the candidate is not better than the worst entry.
    /// Otherwise inserts it in order, evicting the worst entry on overflow.
    pub fn offer(&mut self, candidate: Candidate<G, F>) -> bool {
        if self
            .entries
            .iter()
            .any(|e| is_same(e.fitness(), candidate.fitness()))
        {
            return false;
        }
        if self.entries.len() >= self.capacity {
            match self.entries.last() {
                Some(worst) if is_better(candidate.fitness(), worst.fitness()) => {}
                _ => return false,
            }
        }

        let pos = self
            .entries
            .iter()
            .position(|e| is_better(candidate.fitness(), e.fitness()))
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, candidate);
        self.entries.truncate(self.capacity);
        true
    }

    /// Whether an entry with this fitness is present.
    pub fn contains_fitness(&self, fitness: &F) -> bool {
        self.entries.iter().any(|e| is_same(e.fitness(), fitness))
    }

    /// The entry with the highest fitness.
    pub fn best(&self) -> Option<&Candidate<G, F>> {
        self.entries.first()
    }

    /// The entry with the lowest fitness; the next to be evicted.
    pub fn worst(&self) -> Option<&Candidate<G, F>> {
        self.entries.last()
    }

    /// The entry at `index`, counting from the best.
    pub fn get(&self, index: usize) -> Option<&Candidate<G, F>> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries from best to worst.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate<G, F>> {
        self.entries.iter()
    }

    /// A uniformly random entry.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<&Candidate<G, F>> {
        if self.entries.is_empty() {
            return None;
        }
        Some(&self.entries[rng.random_range(0..self.entries.len())])
    }

    /// A uniformly random entry whose fitness differs from `fitness`.
    pub fn sample_excluding<R: Rng>(&self, fitness: &F, rng: &mut R) -> Option<&Candidate<G, F>> {
        let others: Vec<&Candidate<G, F>> = self
            .entries
            .iter()
            .filter(|e| !is_same(e.fitness(), fitness))
            .collect();
        if others.is_empty() {
            return None;
        }
        Some(others[rng.random_range(0..others.len())])
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
