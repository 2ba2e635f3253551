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

//! HiGHS backend for both engine traits, built on `good_lp`.
//!
//! `good_lp` consumes a model when solving it, so every call translates the
//! request into a fresh backend model. The request types themselves are
//! long-lived; only this translation is repeated.

use crate::{
    engine::{EngineError, IpEngine, IpSolution, IpStatus, LpEngine, LpSolution, LpStatus},
    program::{BinaryProgram, LinearProgram, RowSense},
};
use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable,
    constraint,
    solvers::{
        DualValues, SolutionWithDual,
        highs::{HighsProblem, highs},
    },
    variable,
};

/// Tolerance used to decide which sign convention the backend reported
/// its row duals in.
const DUAL_SIGN_TOLERANCE: f64 = 1e-7;

/// A HiGHS solving engine.
///
/// LP solves run on one thread with the console log off. Binary programs
/// carry their own thread hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighsEngine;

impl HighsEngine {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl std::fmt::Display for HighsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HighsEngine")
    }
}

/// Silences the backend and applies the thread count.
fn configure(mut problem: HighsProblem, threads: usize) -> HighsProblem {
    let threads = u32::try_from(threads.max(1)).unwrap_or(u32::MAX);
    problem.set_verbose(false);
    problem.set_threads(threads)
}

#[inline]
fn map_resolution_error(err: ResolutionError) -> EngineError {
    match err {
        ResolutionError::Unbounded => EngineError::Unbounded,
        other => EngineError::Backend(other.to_string()),
    }
}

#[inline]
fn linear_expression(terms: &[(usize, f64)], vars: &[Variable]) -> Expression {
    let mut expr = Expression::with_capacity(terms.len());
    for &(j, coef) in terms {
        expr.add_mul(coef, vars[j]);
    }
    expr
}

/// Flips the duals into the `c - A^T y` convention when the backend used
/// the opposite one. Decided on the column with the largest positive value,
/// whose reduced cost is zero under the correct convention.
fn normalize_dual_signs(program: &LinearProgram, primal: &[f64], duals: &mut [f64]) {
    let Some((j, _)) = primal
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > DUAL_SIGN_TOLERANCE)
        .max_by(|a, b| a.1.total_cmp(b.1))
    else {
        return;
    };

    let column = &program.columns()[j];
    let ay: f64 = column
        .entries()
        .iter()
        .map(|&(row, coef)| coef * duals[row])
        .sum();
    let scale = column.cost().abs().max(1.0);
    let direct = (column.cost() - ay).abs();
    let flipped = (column.cost() + ay).abs();

    if direct > DUAL_SIGN_TOLERANCE * scale && flipped <= DUAL_SIGN_TOLERANCE * scale {
        for y in duals.iter_mut() {
            *y = -*y;
        }
    }
}

impl LpEngine for HighsEngine {
    fn name(&self) -> &str {
        "HighsEngine"
    }

    fn solve_lp(&mut self, program: &LinearProgram) -> Result<LpStatus, EngineError> {
        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = program
            .columns()
            .iter()
            .map(|c| {
                let def = variable().min(0.0);
                if c.upper_bound().is_finite() {
                    vars.add(def.max(c.upper_bound()))
                } else {
                    vars.add(def)
                }
            })
            .collect();

        let mut objective = Expression::with_capacity(xs.len());
        for (column, &x) in program.columns().iter().zip(&xs) {
            objective.add_mul(column.cost(), x);
        }

        let mut model = configure(vars.minimise(objective).using(highs), 1);
        let rows: Vec<Constraint> = program
            .row_terms()
            .iter()
            .zip(program.rhs())
            .map(|(terms, &rhs)| constraint::eq(linear_expression(terms, &xs), rhs))
            .collect();
        let refs: Vec<_> = rows.into_iter().map(|c| model.add_constraint(c)).collect();

        let mut solution = match model.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => return Ok(LpStatus::Infeasible),
            Err(e) => return Err(map_resolution_error(e)),
        };

        let primal: Vec<f64> = xs.iter().map(|&x| solution.value(x)).collect();
        if primal.iter().any(|v| !v.is_finite()) {
            return Err(EngineError::Numerical(
                "non-finite primal value".to_string(),
            ));
        }

        let mut duals: Vec<f64> = {
            let dual_values = solution.compute_dual();
            refs.into_iter().map(|r| dual_values.dual(r)).collect()
        };
        if duals.len() != program.num_rows() {
            return Err(EngineError::MalformedResponse {
                expected: program.num_rows(),
                found: duals.len(),
            });
        }
        normalize_dual_signs(program, &primal, &mut duals);

        let objective = program.objective_at(&primal);
        Ok(LpStatus::Optimal(LpSolution::new(objective, primal, duals)))
    }
}

impl IpEngine for HighsEngine {
    fn name(&self) -> &str {
        "HighsEngine"
    }

    fn solve_ip(&mut self, program: &BinaryProgram) -> Result<IpStatus, EngineError> {
        let mut vars = ProblemVariables::new();
        let xs: Vec<Variable> = (0..program.num_variables())
            .map(|_| vars.add(variable().binary()))
            .collect();

        let mut objective = Expression::with_capacity(xs.len());
        for (&coef, &x) in program.objective().iter().zip(&xs) {
            objective.add_mul(coef, x);
        }

        let mut model = configure(vars.minimise(objective).using(highs), program.threads());
        for row in program.rows() {
            let lhs = linear_expression(&row.terms, &xs);
            let c = match row.sense {
                RowSense::LessOrEqual => constraint::leq(lhs, row.rhs),
                RowSense::Equal => constraint::eq(lhs, row.rhs),
            };
            model.add_constraint(c);
        }

        let solution = match model.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => return Ok(IpStatus::Infeasible),
            Err(e) => return Err(map_resolution_error(e)),
        };

        // Snap to exact binaries; HiGHS reports within its integrality tolerance.
        let values: Vec<f64> = xs
            .iter()
            .map(|&x| if solution.value(x) > 0.5 { 1.0 } else { 0.0 })
            .collect();
        let objective = program.objective_at(&values);
        Ok(IpStatus::Optimal(IpSolution::new(objective, values)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn optimal_lp(status: LpStatus) -> LpSolution {
        match status {
            LpStatus::Optimal(s) => s,
            LpStatus::Infeasible => panic!("expected an optimal LP"),
        }
    }

    fn optimal_ip(status: IpStatus) -> IpSolution {
        match status {
            IpStatus::Optimal(s) => s,
            IpStatus::Infeasible => panic!("expected an optimal IP"),
        }
    }

    #[test]
    fn test_lp_prefers_the_covering_column() {
        // Two rows, two singletons and one column covering both.
        let mut lp = LinearProgram::new(vec![1.0, 1.0]);
        lp.add_column(1.0, f64::INFINITY, vec![(0, 1.0)]);
        lp.add_column(1.0, f64::INFINITY, vec![(1, 1.0)]);
        lp.add_column(1.0, f64::INFINITY, vec![(0, 1.0), (1, 1.0)]);

        let s = optimal_lp(HighsEngine::new().solve_lp(&lp).unwrap());
        assert!((s.objective() - 1.0).abs() < EPS);
        assert!((s.primal()[2] - 1.0).abs() < EPS);

        // The basic column prices out at zero, the others are non-negative.
        let y = s.duals();
        assert!((1.0 - y[0] - y[1]).abs() < EPS);
        assert!(1.0 - y[0] > -EPS);
        assert!(1.0 - y[1] > -EPS);
    }

    #[test]
    fn test_lp_respects_zero_upper_bound() {
        let mut lp = LinearProgram::new(vec![1.0, 1.0]);
        lp.add_column(1.0, f64::INFINITY, vec![(0, 1.0)]);
        lp.add_column(1.0, f64::INFINITY, vec![(1, 1.0)]);
        lp.add_column(1.0, 0.0, vec![(0, 1.0), (1, 1.0)]);

        let s = optimal_lp(HighsEngine::new().solve_lp(&lp).unwrap());
        assert!((s.objective() - 2.0).abs() < EPS);
        assert!(s.primal()[2].abs() < EPS);
        assert!((s.duals()[0] - 1.0).abs() < EPS);
        assert!((s.duals()[1] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_lp_reports_infeasibility() {
        let mut lp = LinearProgram::new(vec![1.0]);
        lp.add_column(1.0, 0.0, vec![(0, 1.0)]);
        assert_eq!(HighsEngine::new().solve_lp(&lp), Ok(LpStatus::Infeasible));
    }

    #[test]
    fn test_ip_knapsack() {
        // max 3a + 2b + 2c s.t. 4a + 3b + 3c <= 6  ->  b = c = 1.
        let mut ip = BinaryProgram::new(3);
        ip.add_less_or_equal(vec![(0, 4.0), (1, 3.0), (2, 3.0)], 6.0);
        ip.set_objective(1.0, &[-3.0, -2.0, -2.0]);

        let s = optimal_ip(HighsEngine::new().solve_ip(&ip).unwrap());
        assert_eq!(s.values(), &[0.0, 1.0, 1.0]);
        assert!((s.objective() + 3.0).abs() < EPS);
        assert_eq!(s.selected().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_ip_thread_hint_does_not_change_the_answer() {
        let mut ip = BinaryProgram::new(3);
        ip.add_less_or_equal(vec![(0, 4.0), (1, 3.0), (2, 3.0)], 6.0);
        ip.set_objective(1.0, &[-3.0, -2.0, -2.0]);
        ip.set_threads(4);

        let mut engine = HighsEngine::new();
        let s = optimal_ip(engine.solve_ip(&ip).unwrap());
        assert_eq!(s.values(), &[0.0, 1.0, 1.0]);
        assert_eq!(engine.to_string(), "HighsEngine");
    }

    #[test]
    fn test_ip_equality_and_conflict_rows() {
        // a = b, b + c <= 1; c is the most attractive on its own.
        let mut ip = BinaryProgram::new(3);
        ip.add_equal(vec![(0, 1.0), (1, -1.0)], 0.0);
        ip.add_less_or_equal(vec![(1, 1.0), (2, 1.0)], 1.0);
        ip.set_objective(0.0, &[-1.0, -1.0, -1.5]);

        let s = optimal_ip(HighsEngine::new().solve_ip(&ip).unwrap());
        assert_eq!(s.values(), &[1.0, 1.0, 0.0]);
        assert!((s.objective() + 2.0).abs() < EPS);
    }

    #[test]
    fn test_ip_reports_infeasibility() {
        let mut ip = BinaryProgram::new(1);
        ip.add_equal(vec![(0, 2.0)], 1.0);
        assert_eq!(HighsEngine::new().solve_ip(&ip), Ok(IpStatus::Infeasible));
    }

    #[test]
    fn test_dual_sign_normalisation() {
        let mut lp = LinearProgram::new(vec![1.0]);
        lp.add_column(2.0, f64::INFINITY, vec![(0, 1.0)]);

        let mut duals = vec![-2.0];
        normalize_dual_signs(&lp, &[1.0], &mut duals);
        assert_eq!(duals, vec![2.0]);

        let mut duals = vec![2.0];
        normalize_dual_signs(&lp, &[1.0], &mut duals);
        assert_eq!(duals, vec![2.0]);
    }
}
