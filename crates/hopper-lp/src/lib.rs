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

//! # Hopper LP
//!
//! Contracts for the external solving engines the branch-and-price core
//! talks to, and a HiGHS backend for them.
//!
//! The core never builds a solver model itself. It describes a problem with
//! one of two request types and hands it to an engine:
//!
//! - `program::LinearProgram`: nonnegative continuous variables with
//!   per-variable upper bounds, equality rows, a minimisation objective.
//!   Answered with primal values and one dual price per row.
//! - `program::BinaryProgram`: binary variables, `<=` and `=` rows, a
//!   minimisation objective with a constant term, and a thread-count hint.
//!   Answered with primal values.
//!
//! Infeasibility is an ordinary answer (`LpStatus::Infeasible`,
//! `IpStatus::Infeasible`); everything else that goes wrong in an engine is
//! an `EngineError`.

pub mod engine;
pub mod highs;
pub mod program;
