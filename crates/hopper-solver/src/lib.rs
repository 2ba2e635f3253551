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

//! Hopper‑Solver: tree search for branch‑and‑price bin packing
//!
//! A reference driver around `hopper_bnp::engine::BranchAndPrice`. It owns
//! traversal order and node creation, the parts the engine leaves to its
//! caller.
//!
//! Core flow
//! - Build a `hopper_model::problem::ProblemData<W>`.
//! - Call `tree::TreeSearch::solve` for a HiGHS-backed run, or
//!   `TreeSearch::run` with your own engine and monitors.
//! - Read the best packing, the root bound and the termination reason from
//!   `result::TreeSearchOutcome`.
//!
//! Module map
//! - `tree`: depth-first search, together branch first.
//! - `monitor`: tree search monitors.
//! - `result`: outcome and termination reasons.
//! - `stats`: search counters.

pub mod monitor;
pub mod result;
pub mod stats;
pub mod tree;
