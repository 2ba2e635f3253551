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

//! # Restricted Master Problem
//!
//! The LP relaxation of the set-partitioning formulation over the columns
//! currently in the pool:
//!
//! ```text
//! min  sum_j M * lambda_j
//! s.t. sum_{j : i in column_j} lambda_j = 1      for every item i
//!      0 <= lambda_j <= u_j
//! ```
//!
//! `M` is the configurable cost scale. The reported objective is divided by
//! `M`, so it always counts bins.
//!
//! `u_j` is the node overlay: `+inf` unless the column violates a branching
//! decision of the current node, in which case it is `0`. Singletons are
//! never restricted. The overlay lives in the LP only and is recomputed by
//! `apply_node_bounds` at the start of every node.

use crate::pool::{Column, ColumnPool};
use hopper_core::num::tolerance::Tolerance;
use hopper_lp::{
    engine::{EngineError, LpEngine, LpSolution, LpStatus},
    program::LinearProgram,
};
use hopper_model::{
    index::{ColumnIndex, ItemIndex},
    node::BranchNode,
    packing::Packing,
};

/// Upper bound of a generated column under the decisions of `node`.
///
/// `0` if the column holds both items of a separate pair or exactly one
/// item of a together pair, `+inf` otherwise.
pub fn node_upper_bound(column: &Column, node: &BranchNode) -> f64 {
    let violates_separate = node.separate().iter().any(|&p| column.contains_both(p));
    let violates_together = node.together().iter().any(|&p| column.splits(p));
    if violates_separate || violates_together {
        0.0
    } else {
        f64::INFINITY
    }
}

/// The answer of the last master solve.
#[derive(Clone, Debug, PartialEq)]
pub enum MasterStatus {
    /// Optimal, with the objective in bins.
    Optimal(f64),
    Infeasible,
}

/// The restricted master problem, kept in sync with a `ColumnPool`.
#[derive(Clone, Debug)]
pub struct MasterProblem {
    program: LinearProgram,
    cost_scale: f64,
    solution: Option<LpSolution>,
}

impl MasterProblem {
    /// Builds the master over every column currently in `pool`.
    ///
    /// # Panics
    ///
    /// Panics if `cost_scale` is not strictly positive and finite.
    pub fn new(pool: &ColumnPool, cost_scale: f64) -> Self {
        assert!(
            cost_scale.is_finite() && cost_scale > 0.0,
            "called `MasterProblem::new` with invalid cost scale: {}",
            cost_scale
        );
        let mut master = Self {
            program: LinearProgram::new(vec![1.0; pool.num_items()]),
            cost_scale,
            solution: None,
        };
        for (_, column) in pool.iter() {
            master.add_column(column);
        }
        master
    }

    /// Appends a column with cost `M`, unit coverage of its items and
    /// bounds `[0, +inf)`. Invalidates the last solution.
    pub fn add_column(&mut self, column: &Column) -> ColumnIndex {
        let entries = column.items().iter().map(|i| (i.get(), 1.0)).collect();
        let j = self
            .program
            .add_column(self.cost_scale, f64::INFINITY, entries);
        self.solution = None;
        ColumnIndex::new(j)
    }

    /// Recomputes the bound overlay for `node`. Returns the number of
    /// suppressed columns.
    pub fn apply_node_bounds(&mut self, pool: &ColumnPool, node: &BranchNode) -> usize {
        debug_assert_eq!(pool.len(), self.program.num_columns());

        let mut suppressed = 0;
        for (j, column) in pool.generated() {
            let upper_bound = node_upper_bound(column, node);
            if upper_bound == 0.0 {
                suppressed += 1;
            }
            self.program.set_upper_bound(j.get(), upper_bound);
        }
        self.solution = None;
        suppressed
    }

    /// Solves the LP and keeps the solution for later queries.
    pub fn solve<L>(&mut self, engine: &mut L) -> Result<MasterStatus, EngineError>
    where
        L: LpEngine + ?Sized,
    {
        self.solution = None;
        match engine.solve_lp(&self.program)? {
            LpStatus::Optimal(solution) => {
                let expected = self.program.num_columns();
                if solution.primal().len() != expected {
                    return Err(EngineError::MalformedResponse {
                        expected,
                        found: solution.primal().len(),
                    });
                }
                let objective = solution.objective() / self.cost_scale;
                self.solution = Some(solution);
                Ok(MasterStatus::Optimal(objective))
            }
            LpStatus::Infeasible => Ok(MasterStatus::Infeasible),
        }
    }

    /// The cost `M` of every column.
    #[inline]
    pub fn cost_scale(&self) -> f64 {
        self.cost_scale
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.program.num_columns()
    }

    /// The current upper bound of a column.
    #[inline]
    pub fn upper_bound(&self, column: ColumnIndex) -> f64 {
        self.program.columns()[column.get()].upper_bound()
    }

    /// The LP handed to the engine.
    #[inline]
    pub fn program(&self) -> &LinearProgram {
        &self.program
    }

    /// `true` if the last solve produced an optimal solution that is still
    /// current.
    #[inline]
    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    /// Objective of the current solution, in bins.
    #[inline]
    pub fn objective(&self) -> Option<f64> {
        self.solution
            .as_ref()
            .map(|s| s.objective() / self.cost_scale)
    }

    /// Dual price per item of the current solution, on the scale of `M`.
    #[inline]
    pub fn duals(&self) -> Option<&[f64]> {
        self.solution.as_ref().map(|s| s.duals())
    }

    /// The value of every column in the current solution.
    #[inline]
    pub fn fractional_solution(&self) -> Option<&[f64]> {
        self.solution.as_ref().map(|s| s.primal())
    }

    /// The value of one column in the current solution.
    #[inline]
    pub fn value(&self, column: ColumnIndex) -> Option<f64> {
        self.fractional_solution().map(|v| v[column.get()])
    }

    /// Columns with a non-zero value, as `(column, items, value)`.
    pub fn active_bins<'a>(
        &'a self,
        pool: &'a ColumnPool,
        tolerance: Tolerance,
    ) -> Vec<(ColumnIndex, &'a [ItemIndex], f64)> {
        let Some(values) = self.fractional_solution() else {
            return Vec::new();
        };
        pool.iter()
            .zip(values)
            .filter(|&(_, &v)| !tolerance.is_zero(v))
            .map(|((j, column), &v)| (j, column.items(), v))
            .collect()
    }

    /// Reads the current solution as a packing: every column with value
    /// above one half becomes a bin. Meaningful once the solution is known
    /// to be integral.
    pub fn integral_packing(&self, pool: &ColumnPool) -> Option<Packing> {
        let values = self.fractional_solution()?;
        let bins = pool
            .iter()
            .zip(values)
            .filter(|&(_, &v)| v > 0.5)
            .map(|((_, column), _)| column.items().to_vec())
            .collect();
        Some(Packing::new(bins))
    }

    /// Renders the value of every column.
    #[inline]
    pub fn solution_report(&self) -> SolutionReport<'_> {
        SolutionReport { master: self }
    }

    /// Renders the items of every column with a non-zero value.
    #[inline]
    pub fn bin_report<'a>(&'a self, pool: &'a ColumnPool, tolerance: Tolerance) -> BinReport<'a> {
        BinReport {
            master: self,
            pool,
            tolerance,
        }
    }
}

/// `Display` adapter printing the column values of the master solution on
/// one line.
#[derive(Clone, Copy, Debug)]
pub struct SolutionReport<'a> {
    master: &'a MasterProblem,
}

impl std::fmt::Display for SolutionReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(values) = self.master.fractional_solution() else {
            return write!(f, "<no solution>");
        };
        for (k, v) in values.iter().enumerate() {
            if k > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", v)?;
        }
        Ok(())
    }
}

/// `Display` adapter printing one line per used column: `Bin j: items`.
#[derive(Clone, Copy, Debug)]
pub struct BinReport<'a> {
    master: &'a MasterProblem,
    pool: &'a ColumnPool,
    tolerance: Tolerance,
}

impl std::fmt::Display for BinReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (j, items, _) in self.master.active_bins(self.pool, self.tolerance) {
            write!(f, "Bin {}:", j.get())?;
            for item in items {
                write!(f, " {}", item.get())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopper_model::node::ItemPair;

    fn ii(i: usize) -> ItemIndex {
        ItemIndex::new(i)
    }

    /// An engine that answers with fixed values.
    struct FixedLp {
        primal: Vec<f64>,
        duals: Vec<f64>,
    }

    impl LpEngine for FixedLp {
        fn name(&self) -> &str {
            "FixedLp"
        }

        fn solve_lp(&mut self, program: &LinearProgram) -> Result<LpStatus, EngineError> {
            let objective = program.objective_at(&self.primal);
            Ok(LpStatus::Optimal(LpSolution::new(
                objective,
                self.primal.clone(),
                self.duals.clone(),
            )))
        }
    }

    fn pool_with(columns: &[&[usize]], n: usize) -> ColumnPool {
        let mut pool = ColumnPool::with_singletons(n);
        for items in columns {
            pool.insert_items(items.iter().copied().map(ii));
        }
        pool
    }

    #[test]
    fn test_node_upper_bound_rules() {
        let pool = pool_with(&[&[0, 1], &[1, 2]], 3);
        let c01 = pool.column(ColumnIndex::new(3));
        let c12 = pool.column(ColumnIndex::new(4));

        let root = BranchNode::root();
        assert_eq!(node_upper_bound(c01, &root), f64::INFINITY);

        let sep = root.child_separate(ItemPair::from_raw(0, 1));
        assert_eq!(node_upper_bound(c01, &sep), 0.0);
        assert_eq!(node_upper_bound(c12, &sep), f64::INFINITY);

        let tog = root.child_together(ItemPair::from_raw(0, 1));
        assert_eq!(node_upper_bound(c01, &tog), f64::INFINITY);
        assert_eq!(node_upper_bound(c12, &tog), 0.0);
    }

    #[test]
    fn test_overlay_is_reset_per_node() {
        let pool = pool_with(&[&[0, 1]], 3);
        let mut master = MasterProblem::new(&pool, 1.0);
        let c01 = ColumnIndex::new(3);

        let sep = BranchNode::root().child_separate(ItemPair::from_raw(0, 1));
        assert_eq!(master.apply_node_bounds(&pool, &sep), 1);
        assert_eq!(master.upper_bound(c01), 0.0);

        assert_eq!(master.apply_node_bounds(&pool, &BranchNode::root()), 0);
        assert_eq!(master.upper_bound(c01), f64::INFINITY);

        // Singletons are never restricted.
        let tog = BranchNode::root().child_together(ItemPair::from_raw(0, 2));
        master.apply_node_bounds(&pool, &tog);
        assert_eq!(master.upper_bound(ColumnIndex::new(0)), f64::INFINITY);
        assert_eq!(master.upper_bound(c01), 0.0);
    }

    #[test]
    fn test_objective_is_reported_in_bins() {
        let pool = pool_with(&[&[0, 1]], 3);
        let mut master = MasterProblem::new(&pool, 100.0);
        let mut engine = FixedLp {
            primal: vec![0.0, 0.0, 1.0, 1.0],
            duals: vec![50.0, 50.0, 100.0],
        };
        assert_eq!(master.solve(&mut engine), Ok(MasterStatus::Optimal(2.0)));
        assert_eq!(master.objective(), Some(2.0));
        assert_eq!(master.duals(), Some(&[50.0, 50.0, 100.0][..]));
        assert_eq!(master.value(ColumnIndex::new(3)), Some(1.0));

        // Adding a column invalidates the solution.
        let mut grown = pool.clone();
        grown.insert_items([ii(1), ii(2)]);
        master.add_column(grown.column(ColumnIndex::new(4)));
        assert!(!master.has_solution());
        assert_eq!(master.num_columns(), 5);
    }

    #[test]
    fn test_malformed_answer_is_rejected() {
        let pool = pool_with(&[], 2);
        let mut master = MasterProblem::new(&pool, 1.0);
        let mut engine = FixedLp {
            primal: vec![1.0],
            duals: vec![1.0, 1.0],
        };
        assert_eq!(
            master.solve(&mut engine),
            Err(EngineError::MalformedResponse {
                expected: 2,
                found: 1
            })
        );
        assert!(!master.has_solution());
    }

    #[test]
    fn test_reports_and_packing() {
        let pool = pool_with(&[&[0, 1]], 3);
        let mut master = MasterProblem::new(&pool, 1.0);
        let mut engine = FixedLp {
            primal: vec![0.0, 0.0, 1.0, 1.0],
            duals: vec![0.5, 0.5, 1.0],
        };
        master.solve(&mut engine).unwrap();
        let tol = Tolerance::default();

        let active = master.active_bins(&pool, tol);
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].0, ColumnIndex::new(2));
        assert_eq!(active[1].1, &[ii(0), ii(1)]);

        assert_eq!(master.solution_report().to_string(), "0 0 1 1");
        assert_eq!(
            master.bin_report(&pool, tol).to_string(),
            "Bin 2: 2\nBin 3: 0 1\n"
        );

        let packing = master.integral_packing(&pool).unwrap();
        assert_eq!(packing.num_bins(), 2);
        assert_eq!(packing.bin_of(ii(1)), packing.bin_of(ii(0)));
    }
}
