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

//! # Pricing Subproblem
//!
//! Finds the bin pattern of most negative reduced cost under the current
//! dual prices:
//!
//! ```text
//! min  M - sum_i pi_i * x_i
//! s.t. sum_i w_i * x_i <= C
//!      x_a + x_b <= 1          for every separate pair (a, b)
//!      x_a  = x_b              for every together pair (a, b)
//!      x_i in {0, 1}
//! ```
//!
//! The rows depend on the node only and are built once per node. Each
//! iteration replaces the objective and solves again.

use fixedbitset::FixedBitSet;
use hopper_core::num::tolerance::Tolerance;
use hopper_lp::{
    engine::{EngineError, IpEngine, IpStatus},
    program::BinaryProgram,
};
use hopper_model::{
    node::BranchNode,
    problem::{ProblemData, Weight},
};

/// The answer of one pricing round.
#[derive(Clone, Debug, PartialEq)]
pub enum PricingOutcome {
    /// No pattern satisfies the capacity and the node decisions.
    Infeasible,
    /// The best pattern has a reduced cost of at least `-ε`; the master is
    /// optimal over all patterns allowed at this node.
    Converged { reduced_cost: f64 },
    /// A pattern with a reduced cost below `-ε`.
    Improving {
        members: FixedBitSet,
        reduced_cost: f64,
    },
}

impl std::fmt::Display for PricingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Infeasible => write!(f, "Infeasible"),
            Self::Converged { reduced_cost } => write!(f, "Converged({:.6})", reduced_cost),
            Self::Improving {
                members,
                reduced_cost,
            } => write!(
                f,
                "Improving({:.6}, {} items)",
                reduced_cost,
                members.count_ones(..)
            ),
        }
    }
}

/// The pricing model of one branch node.
#[derive(Clone, Debug)]
pub struct PricingSubproblem {
    program: BinaryProgram,
    num_items: usize,
    tolerance: Tolerance,
}

impl PricingSubproblem {
    /// Builds the node-fixed rows: capacity, then one row per separate
    /// pair, then one per together pair.
    pub fn new<W>(
        data: &ProblemData<W>,
        node: &BranchNode,
        tolerance: Tolerance,
        threads: usize,
    ) -> Self
    where
        W: Weight,
    {
        let n = data.num_items();
        let mut program = BinaryProgram::new(n);
        program.set_threads(threads);

        let capacity_row = data.weights_f64().iter().copied().enumerate().collect();
        program.add_less_or_equal(capacity_row, data.capacity_f64());

        for pair in node.separate() {
            let (a, b) = pair.as_raw();
            program.add_less_or_equal(vec![(a, 1.0), (b, 1.0)], 1.0);
        }
        for pair in node.together() {
            let (a, b) = pair.as_raw();
            program.add_equal(vec![(a, 1.0), (b, -1.0)], 0.0);
        }

        Self {
            program,
            num_items: n,
            tolerance,
        }
    }

    /// The binary program as last submitted.
    #[inline]
    pub fn program(&self) -> &BinaryProgram {
        &self.program
    }

    /// Prices with `duals` against columns of cost `cost_scale`.
    ///
    /// The reduced cost is reported in bins (divided by `cost_scale`) and
    /// compared against `-ε` on that scale.
    pub fn price<E>(
        &mut self,
        duals: &[f64],
        cost_scale: f64,
        engine: &mut E,
    ) -> Result<PricingOutcome, EngineError>
    where
        E: IpEngine + ?Sized,
    {
        if duals.len() != self.num_items {
            return Err(EngineError::MalformedResponse {
                expected: self.num_items,
                found: duals.len(),
            });
        }

        let coefficients: Vec<f64> = duals.iter().map(|&pi| -pi).collect();
        self.program.set_objective(cost_scale, &coefficients);

        let solution = match engine.solve_ip(&self.program)? {
            IpStatus::Optimal(solution) => solution,
            IpStatus::Infeasible => return Ok(PricingOutcome::Infeasible),
        };
        if solution.values().len() != self.num_items {
            return Err(EngineError::MalformedResponse {
                expected: self.num_items,
                found: solution.values().len(),
            });
        }

        let reduced_cost = solution.objective() / cost_scale;
        if !self.tolerance.is_less(reduced_cost, 0.0) {
            return Ok(PricingOutcome::Converged { reduced_cost });
        }

        let mut members = FixedBitSet::with_capacity(self.num_items);
        for i in solution.selected() {
            members.insert(i);
        }
        if members.is_clear() {
            // The empty pattern costs a full bin; a negative value here is
            // solver noise.
            return Ok(PricingOutcome::Converged { reduced_cost });
        }

        Ok(PricingOutcome::Improving {
            members,
            reduced_cost,
        })
    }
}
