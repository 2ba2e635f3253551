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

//! Engine traits and their response types.
//!
//! Both traits are blocking: a call returns once the backend has an answer.
//! An engine may be reused for any number of calls and keeps no state that
//! affects later answers.

use crate::program::{BinaryProgram, LinearProgram};

/// A failure inside a solving engine.
///
/// Infeasibility is not an error; it is reported through the status types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The backend stopped without a trustworthy answer (numerical trouble,
    /// iteration or time limit inside the backend).
    Numerical(String),
    /// The objective is unbounded below.
    Unbounded,
    /// The backend reported a failure of its own.
    Backend(String),
    /// The backend returned an answer of the wrong shape.
    MalformedResponse { expected: usize, found: usize },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numerical(msg) => write!(f, "Numerical failure: {}", msg),
            Self::Unbounded => write!(f, "The problem is unbounded"),
            Self::Backend(msg) => write!(f, "Backend failure: {}", msg),
            Self::MalformedResponse { expected, found } => write!(
                f,
                "Malformed engine response: expected {} values, found {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for EngineError {}

/// An optimal answer to a `LinearProgram`.
///
/// Dual prices follow the reduced-cost convention `d_j = c_j - a_j^T y`:
/// every column with a positive value has `d_j = 0` and, at optimality,
/// no column has `d_j < 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct LpSolution {
    objective: f64,
    primal: Vec<f64>,
    duals: Vec<f64>,
}

impl LpSolution {
    pub fn new(objective: f64, primal: Vec<f64>, duals: Vec<f64>) -> Self {
        Self {
            objective,
            primal,
            duals,
        }
    }

    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Value per column, in column order.
    #[inline]
    pub fn primal(&self) -> &[f64] {
        &self.primal
    }

    /// Dual price per row, in row order.
    #[inline]
    pub fn duals(&self) -> &[f64] {
        &self.duals
    }
}

/// The answer of an `LpEngine`.
#[derive(Clone, Debug, PartialEq)]
pub enum LpStatus {
    Optimal(LpSolution),
    Infeasible,
}

impl std::fmt::Display for LpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimal(s) => write!(f, "Optimal({})", s.objective),
            Self::Infeasible => write!(f, "Infeasible"),
        }
    }
}

/// An optimal answer to a `BinaryProgram`.
#[derive(Clone, Debug, PartialEq)]
pub struct IpSolution {
    objective: f64,
    values: Vec<f64>,
}

impl IpSolution {
    pub fn new(objective: f64, values: Vec<f64>) -> Self {
        Self { objective, values }
    }

    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Value per variable. Binary up to the engine's integrality tolerance.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Positions of the variables set to one.
    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > 0.5)
            .map(|(j, _)| j)
    }
}

/// The answer of an `IpEngine`.
#[derive(Clone, Debug, PartialEq)]
pub enum IpStatus {
    Optimal(IpSolution),
    Infeasible,
}

impl std::fmt::Display for IpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimal(s) => write!(f, "Optimal({})", s.objective),
            Self::Infeasible => write!(f, "Infeasible"),
        }
    }
}

/// Solves continuous linear programs.
pub trait LpEngine {
    /// Returns the name of the engine.
    fn name(&self) -> &str;
    /// Solves `program` to optimality.
    fn solve_lp(&mut self, program: &LinearProgram) -> Result<LpStatus, EngineError>;
}

/// Solves binary integer programs.
pub trait IpEngine {
    /// Returns the name of the engine.
    fn name(&self) -> &str;
    /// Solves `program` to optimality, honouring its thread hint.
    fn solve_ip(&mut self, program: &BinaryProgram) -> Result<IpStatus, EngineError>;
}

impl<E> LpEngine for &mut E
where
    E: LpEngine + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn solve_lp(&mut self, program: &LinearProgram) -> Result<LpStatus, EngineError> {
        (**self).solve_lp(program)
    }
}

impl<E> IpEngine for &mut E
where
    E: IpEngine + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn solve_ip(&mut self, program: &BinaryProgram) -> Result<IpStatus, EngineError> {
        (**self).solve_ip(program)
    }
}

impl std::fmt::Debug for dyn LpEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LpEngine({})", self.name())
    }
}

impl std::fmt::Debug for dyn IpEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IpEngine({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_reads_binary_values() {
        let s = IpSolution::new(-0.5, vec![1.0, 0.0, 0.999_999, 1e-9]);
        assert_eq!(s.selected().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_error_display() {
        let e = EngineError::MalformedResponse {
            expected: 3,
            found: 2,
        };
        assert_eq!(
            e.to_string(),
            "Malformed engine response: expected 3 values, found 2"
        );
        assert_eq!(EngineError::Unbounded.to_string(), "The problem is unbounded");
    }

    #[test]
    fn test_status_display() {
        let s = LpStatus::Optimal(LpSolution::new(2.0, vec![], vec![]));
        assert_eq!(s.to_string(), "Optimal(2)");
        assert_eq!(IpStatus::Infeasible.to_string(), "Infeasible");
    }
}
