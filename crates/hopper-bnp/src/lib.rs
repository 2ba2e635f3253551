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

//! Hopper‑BnP: branch‑and‑price nodes for bin packing
//!
//! Computes, for one node of a branch-and-bound tree over the
//! one-dimensional bin packing problem, the column generation lower bound
//! and, when that bound is fractional, the Ryan-Foster pair to branch on.
//! Tree traversal belongs to the caller (see `hopper_solver`).
//!
//! Core flow
//! - Build a `hopper_model::problem::ProblemData<W>`.
//! - Create an `engine::BranchAndPrice` with an LP and an IP engine
//!   (`BranchAndPrice::highs` uses HiGHS for both).
//! - Call `solve(node)` for every node the driver visits; the returned
//!   `result::NodeOutcome` says whether to branch, and on which pair.
//!
//! Design highlights
//! - One column pool per engine, shared by every node: columns are never
//!   deleted, only suppressed through master upper bounds.
//! - The pricing model is built once per node; each round swaps only the
//!   objective.
//! - Monitors observe and stop the loop without touching it.
//! - The incumbent sits behind `incumbent::IncumbentStore`, so engines on
//!   several threads can share one bound.
//!
//! Module map
//! - `engine`: the per-node column generation loop.
//! - `pool`: columns and the append-only pool.
//! - `master`: restricted master LP and its node bound overlay.
//! - `pricing`: the knapsack pricing program.
//! - `branching`: co-occurrence and pair selection.
//! - `incumbent`: local and shared incumbent stores.
//! - `monitor`: column generation monitors.
//! - `result`, `error`, `config`, `stats`: outcomes, failures, settings,
//!   counters.

pub mod branching;
pub mod config;
pub mod engine;
pub mod error;
pub mod incumbent;
pub mod master;
pub mod monitor;
pub mod pool;
pub mod pricing;
pub mod result;
pub mod stats;
