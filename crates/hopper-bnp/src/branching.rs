// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Ryan-Foster Branching
//!
//! After column generation has converged, every item pair `(i, j)` gets its
//! co-occurrence
//!
//! ```text
//! z_ij = sum of lambda_k over generated columns k containing i and j
//! ```
//!
//! Singletons never hold a pair and are skipped. The pair whose `z_ij` is
//! closest to one half is the branching candidate. When the closest
//! distance is one half itself, every pair is either always or never packed
//! together and the master solution is integral.

use crate::pool::ColumnPool;
use hopper_core::num::tolerance::Tolerance;
use hopper_model::node::ItemPair;

/// Dense symmetric matrix of pairwise co-occurrence values.
#[derive(Clone, Debug, PartialEq)]
pub struct CoOccurrence {
    n: usize,
    z: Vec<f64>,
}

impl CoOccurrence {
    /// Accumulates `z` from the generated columns of `pool` and the master
    /// values `values`, indexed by column.
    pub fn from_solution(pool: &ColumnPool, values: &[f64], tolerance: Tolerance) -> Self {
        let n = pool.num_items();
        let mut z = vec![0.0; n * n];
        for (j, column) in pool.generated() {
            let value = values[j.get()];
            if tolerance.is_zero(value) {
                continue;
            }
            let items = column.items();
            for (a, first) in items.iter().enumerate() {
                for second in &items[a + 1..] {
                    z[first.get() * n + second.get()] += value;
                }
            }
        }
        Self { n, z }
    }

    /// `z` for the pair; symmetric in its arguments.
    #[inline]
    pub fn get(&self, pair: ItemPair) -> f64 {
        let (i, j) = pair.as_raw();
        self.z[i * self.n + j]
    }

    #[inline]
    pub fn num_items(&self) -> usize {
        self.n
    }
}

/// What the converged master solution calls for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BranchingDecision {
    /// Branch on `pair`, whose co-occurrence is `z`.
    Branch { pair: ItemPair, z: f64 },
    /// Every pair is fully together or fully apart.
    Integral,
}

impl std::fmt::Display for BranchingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Branch { pair, z } => write!(f, "Branch({}, z: {:.4})", pair, z),
            Self::Integral => write!(f, "Integral"),
        }
    }
}

/// Picks the Ryan-Foster branching pair.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BranchingSelector {
    tolerance: Tolerance,
}

impl BranchingSelector {
    #[inline]
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// Scans pairs in ascending `(i, j)` order and keeps the first pair
    /// with minimal `|z - 0.5|`; a later pair replaces it only when it is
    /// closer by more than `ε`.
    ///
    /// Instances with fewer than two items have no pair and are integral.
    pub fn select(&self, z: &CoOccurrence) -> BranchingDecision {
        let n = z.num_items();
        let mut best_delta = f64::INFINITY;
        let mut best: Option<(ItemPair, f64)> = None;

        for i in 0..n {
            for j in (i + 1)..n {
                let pair = ItemPair::from_raw(i, j);
                let value = z.get(pair);
                let delta = (value - 0.5).abs();
                if self.tolerance.is_less(delta, best_delta) {
                    best_delta = delta;
                    best = Some((pair, value));
                }
            }
        }

        match best {
            Some((pair, value)) if !self.tolerance.is_equal(best_delta, 0.5) => {
                BranchingDecision::Branch { pair, z: value }
            }
            _ => BranchingDecision::Integral,
        }
    }

    /// Convenience wrapper building the co-occurrence matrix first.
    pub fn select_from(&self, pool: &ColumnPool, values: &[f64]) -> BranchingDecision {
        self.select(&CoOccurrence::from_solution(pool, values, self.tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopper_model::index::ItemIndex;

    fn pool_with(columns: &[&[usize]], n: usize) -> ColumnPool {
        let mut pool = ColumnPool::with_singletons(n);
        for items in columns {
            pool.insert_items(items.iter().copied().map(ItemIndex::new));
        }
        pool
    }

    #[test]
    fn test_co_occurrence_ignores_singletons() {
        let pool = pool_with(&[&[0, 1], &[0, 1, 2]], 3);
        // Singletons carry large values that must not leak into z.
        let values = [0.7, 0.7, 0.7, 0.25, 0.5];
        let z = CoOccurrence::from_solution(&pool, &values, Tolerance::default());
        assert_eq!(z.get(ItemPair::from_raw(0, 1)), 0.75);
        assert_eq!(z.get(ItemPair::from_raw(1, 0)), 0.75);
        assert_eq!(z.get(ItemPair::from_raw(0, 2)), 0.5);
        assert_eq!(z.get(ItemPair::from_raw(1, 2)), 0.5);
    }

    #[test]
    fn test_selects_pair_closest_to_one_half() {
        let pool = pool_with(&[&[0, 1], &[1, 2]], 3);
        let values = [0.0, 0.0, 0.0, 0.8, 0.4];
        let decision = BranchingSelector::default().select_from(&pool, &values);
        assert_eq!(
            decision,
            BranchingDecision::Branch {
                pair: ItemPair::from_raw(1, 2),
                z: 0.4
            }
        );
    }

    #[test]
    fn test_ties_go_to_the_first_pair() {
        let pool = pool_with(&[&[0, 1], &[2, 3]], 4);
        let values = [0.5, 0.5, 0.5, 0.5, 0.5, 0.5];
        let decision = BranchingSelector::default().select_from(&pool, &values);
        match decision {
            BranchingDecision::Branch { pair, .. } => assert_eq!(pair, ItemPair::from_raw(0, 1)),
            other => panic!("unexpected {}", other),
        }

        // A later pair closer only within epsilon does not win either.
        let values = [0.5, 0.5, 0.5, 0.5, 0.5 + 1e-9, 0.5];
        let decision = BranchingSelector::default().select_from(&pool, &values);
        match decision {
            BranchingDecision::Branch { pair, .. } => assert_eq!(pair, ItemPair::from_raw(0, 1)),
            other => panic!("unexpected {}", other),
        }
    }

    #[test]
    fn test_integral_solution() {
        let pool = pool_with(&[&[0, 1]], 3);
        let values = [0.0, 0.0, 1.0, 1.0];
        assert_eq!(
            BranchingSelector::default().select_from(&pool, &values),
            BranchingDecision::Integral
        );

        // Values off by solver noise still count as integral.
        let values = [0.0, 0.0, 1.0, 1.0 - 1e-9];
        assert_eq!(
            BranchingSelector::default().select_from(&pool, &values),
            BranchingDecision::Integral
        );
    }

    #[test]
    fn test_fewer_than_two_items() {
        let pool = ColumnPool::with_singletons(1);
        assert_eq!(
            BranchingSelector::default().select_from(&pool, &[1.0]),
            BranchingDecision::Integral
        );
    }

    #[test]
    fn test_selected_pair_is_strictly_fractional() {
        let pool = pool_with(&[&[0, 1], &[0, 2], &[1, 2]], 3);
        let values = [0.0, 0.0, 0.0, 0.5, 0.5, 0.5];
        match BranchingSelector::default().select_from(&pool, &values) {
            BranchingDecision::Branch { z, .. } => assert!(z > 0.0 && z < 1.0),
            other => panic!("unexpected {}", other),
        }
    }
}
