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

//! # Hopper Model
//!
//! **The domain model of the one-dimensional Bin Packing Problem.**
//!
//! This crate is the data interchange layer between whoever owns an instance
//! (a file, a generator, a test) and the branch-and-price engine. Nothing in
//! here talks to a solver.
//!
//! ## Architecture
//!
//! * **`index`**: `ItemIndex` and `ColumnIndex`, distinct index types for the
//!   two index spaces of the engine.
//! * **`problem`**: `ProblemData` (immutable, validated) and
//!   `ProblemDataBuilder` (mutable, for construction).
//! * **`loading`**: `ProblemLoader`, reading whitespace-delimited instances.
//! * **`node`**: `ItemPair` and `BranchNode`, the pairwise separate/together
//!   decisions a tree driver hands to the engine.
//! * **`packing`**: `Packing`, an integral assignment of items to bins.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: an `ItemIndex` cannot be used where a `ColumnIndex` is
//!     expected.
//! 2.  **Fail-Fast**: builders reject non-positive weights and capacities, so
//!     the engine never has to.
//! 3.  **Read-Only Sharing**: `ProblemData` is never mutated after `build`;
//!     the engine only borrows it.

pub mod index;
pub mod loading;
pub mod node;
pub mod packing;
pub mod problem;
