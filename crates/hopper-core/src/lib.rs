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

//! # Hopper Core
//!
//! Small building blocks shared by every crate of the hopper bin packing
//! stack.
//!
//! ## Modules
//!
//! - `num`: tolerance-aware comparisons of floating point values. Every
//!   decision the column generation engine takes on solver output (pruning,
//!   reduced cost sign, branching distance, incumbent updates) goes through
//!   a single `Tolerance` so the same `ε` is applied everywhere.
//! - `utils`: phantom-tagged, strongly typed indices (`TypedIndex<T>`), used
//!   to keep item indices and column indices apart at compile time.

pub mod num;
pub mod utils;
