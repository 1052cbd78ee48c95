//! Generic gene-sequence operators.
//!
//! Building blocks for [`SearchProblem`](super::SearchProblem) callbacks.
//! They work on any `Clone` gene type and do not assume both parents have
//! the same length, so they suit variable-length genomes.
//!
//! # Crossover Operators
//!
//! - [`single_point_crossover`]: head of one parent, tail of the other; each
//!   parent is cut at its own point, so the child length varies
//! - [`uniform_crossover`]: per-position coin flip over the shared prefix,
//!   remainder from the longer parent
//!
//! # Mutation Operators
//!
//! - [`swap_mutation`]: exchange two random positions: O(1)
//! - [`replace_mutation`]: overwrite one random position with a new gene: O(1)
//! - [`invert_mutation`]: reverse a random segment: O(n)

use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Single-point crossover for sequences of possibly different lengths.
///
/// Picks a cut point in each parent independently and returns
/// `parent1[..cut1] ++ parent2[cut2..]`. Returns `None` when the result would
/// be empty.
///
/// # Complexity
/// O(n) time, O(n) space
pub fn single_point_crossover<T: Clone, R: Rng>(
    parent1: &[T],
    parent2: &[T],
    rng: &mut R,
) -> Option<Vec<T>> {
    let cut1 = rng.random_range(0..=parent1.len());
    let cut2 = rng.random_range(0..=parent2.len());
    let child: Vec<T> = parent1[..cut1]
        .iter()
        .chain(&parent2[cut2..])
        .cloned()
        .collect();
    if child.is_empty() {
        None
    } else {
        Some(child)
    }
}

/// Uniform crossover.
///
/// Each position of the shared prefix is taken from either parent with equal
/// probability. Positions beyond the shorter parent come from the longer one.
///
/// # Complexity
/// O(n) time, O(n) space
pub fn uniform_crossover<T: Clone, R: Rng>(parent1: &[T], parent2: &[T], rng: &mut R) -> Vec<T> {
    let shared = parent1.len().min(parent2.len());
    let longer = if parent1.len() >= parent2.len() {
        parent1
    } else {
        parent2
    };
    let mut child = Vec::with_capacity(longer.len());
    for i in 0..shared {
        if rng.random_bool(0.5) {
            child.push(parent1[i].clone());
        } else {
            child.push(parent2[i].clone());
        }
    }
    child.extend_from_slice(&longer[shared..]);
    child
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Swap mutation: exchange two random positions.
///
/// # Complexity
/// O(1)
pub fn swap_mutation<T, R: Rng>(genes: &mut [T], rng: &mut R) {
    let n = genes.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    genes.swap(i, j);
}

/// Replace mutation: overwrite one random position with `make(index, rng)`.
///
/// The factory receives the position so that position-dependent genes
/// (e.g. a node that may only reference earlier nodes) can be rebuilt.
///
/// # Complexity
/// O(1) plus the cost of `make`
pub fn replace_mutation<T, R, M>(genes: &mut [T], rng: &mut R, mut make: M)
where
    R: Rng,
    M: FnMut(usize, &mut R) -> T,
{
    if genes.is_empty() {
        return;
    }
    let i = rng.random_range(0..genes.len());
    genes[i] = make(i, rng);
}

/// Invert mutation: reverse a random segment.
///
/// # Complexity
/// O(n) worst case for segment reversal
pub fn invert_mutation<T, R: Rng>(genes: &mut [T], rng: &mut R) {
    let n = genes.len();
    if n < 2 {
        return;
    }
    let (start, end) = random_segment(n, rng);
    genes[start..=end].reverse();
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
///
/// # Panics
/// Panics if `n == 0`.
pub fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    // ---- Single-point crossover ----

    #[test]
    fn test_single_point_genes_come_from_parents() {
        let mut rng = create_rng(42);
        let p1 = vec![1, 1, 1, 1];
        let p2 = vec![2, 2, 2, 2, 2, 2, 2];

        for _ in 0..200 {
            if let Some(child) = single_point_crossover(&p1, &p2, &mut rng) {
                assert!(!child.is_empty());
                assert!(child.len() <= p1.len() + p2.len());
                // every 1 precedes every 2
                let first_two = child.iter().position(|&g| g == 2).unwrap_or(child.len());
                assert!(child[first_two..].iter().all(|&g| g == 2), "{child:?}");
            }
        }
    }

    #[test]
    fn test_single_point_varies_length() {
        let mut rng = create_rng(7);
        let p1: Vec<u8> = (0..5).collect();
        let p2: Vec<u8> = (10..20).collect();
        let lengths: std::collections::HashSet<usize> = (0..200)
            .filter_map(|_| single_point_crossover(&p1, &p2, &mut rng))
            .map(|c| c.len())
            .collect();
        assert!(lengths.len() > 3, "expected varied lengths: {lengths:?}");
    }

    #[test]
    fn test_single_point_empty_parents() {
        let mut rng = create_rng(42);
        let empty: Vec<u8> = Vec::new();
        assert!(single_point_crossover(&empty, &empty, &mut rng).is_none());
    }

    // ---- Uniform crossover ----

    #[test]
    fn test_uniform_length_is_longer_parent() {
        let mut rng = create_rng(42);
        let p1 = vec!['a'; 3];
        let p2 = vec!['b'; 6];
        for _ in 0..50 {
            let child = uniform_crossover(&p1, &p2, &mut rng);
            assert_eq!(child.len(), 6);
            assert_eq!(&child[3..], &['b', 'b', 'b']);
        }
    }

    #[test]
    fn test_uniform_identical_parents() {
        let mut rng = create_rng(42);
        let p = vec![1, 2, 3];
        assert_eq!(uniform_crossover(&p, &p, &mut rng), p);
    }

    // ---- Mutations ----

    #[test]
    fn test_swap_preserves_multiset() {
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let mut genes: Vec<usize> = (0..10).collect();
            swap_mutation(&mut genes, &mut rng);
            let mut sorted = genes.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_swap_single_element() {
        let mut rng = create_rng(42);
        let mut genes = vec![0];
        swap_mutation(&mut genes, &mut rng);
        assert_eq!(genes, vec![0]);
    }

    #[test]
    fn test_replace_passes_position() {
        let mut rng = create_rng(42);
        let mut genes = vec![0usize; 8];
        for _ in 0..20 {
            replace_mutation(&mut genes, &mut rng, |i, _| i + 100);
        }
        for (i, &g) in genes.iter().enumerate() {
            assert!(g == 0 || g == i + 100);
        }
        assert!(genes.iter().any(|&g| g != 0));
    }

    #[test]
    fn test_replace_empty_is_noop() {
        let mut rng = create_rng(42);
        let mut genes: Vec<u8> = Vec::new();
        replace_mutation(&mut genes, &mut rng, |_, _| 1);
        assert!(genes.is_empty());
    }

    #[test]
    fn test_invert_changes_eventually() {
        let mut rng = create_rng(42);
        let original = vec![0, 1, 2, 3, 4];
        let mut changed = false;
        for _ in 0..100 {
            let mut genes = original.clone();
            invert_mutation(&mut genes, &mut rng);
            if genes != original {
                changed = true;
                break;
            }
        }
        assert!(changed, "invert should change the sequence eventually");
    }

    #[test]
    fn test_random_segment_bounds() {
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let (start, end) = random_segment(10, &mut rng);
            assert!(start <= end);
            assert!(end < 10);
        }
    }
}
