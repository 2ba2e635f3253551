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

use hopper_core::num::tolerance::Tolerance;

/// Settings of a `BranchAndPrice` engine.
///
/// | Field | Default | Semantics |
/// | :--- | :--- | :--- |
/// | `tolerance` | `1e-6` | One `ε` for pruning, reduced-cost sign, branching distance and incumbent updates. |
/// | `cost_scale` | `1.0` | Objective coefficient `M` of every master column. Reported objectives are divided by it. |
/// | `pricing_threads` | `1` | Thread hint for the pricing engine. One keeps runs reproducible. |
/// | `validate_nodes` | `true` | Reject nodes whose pairs reference unknown items before touching any model. |
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchAndPriceConfig {
    tolerance: Tolerance,
    cost_scale: f64,
    pricing_threads: usize,
    validate_nodes: bool,
}

impl Default for BranchAndPriceConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            cost_scale: 1.0,
            pricing_threads: 1,
            validate_nodes: true,
        }
    }
}

impl BranchAndPriceConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the column cost `M`.
    ///
    /// # Panics
    ///
    /// Panics if `cost_scale` is not strictly positive and finite.
    #[inline]
    pub fn with_cost_scale(mut self, cost_scale: f64) -> Self {
        assert!(
            cost_scale.is_finite() && cost_scale > 0.0,
            "called `BranchAndPriceConfig::with_cost_scale` with invalid value: {}",
            cost_scale
        );
        self.cost_scale = cost_scale;
        self
    }

    #[inline]
    pub fn with_pricing_threads(mut self, threads: usize) -> Self {
        self.pricing_threads = threads.max(1);
        self
    }

    #[inline]
    pub fn with_node_validation(mut self, yes: bool) -> Self {
        self.validate_nodes = yes;
        self
    }

    #[inline]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    #[inline]
    pub fn cost_scale(&self) -> f64 {
        self.cost_scale
    }

    #[inline]
    pub fn pricing_threads(&self) -> usize {
        self.pricing_threads
    }

    #[inline]
    pub fn validate_nodes(&self) -> bool {
        self.validate_nodes
    }
}

impl std::fmt::Display for BranchAndPriceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BranchAndPriceConfig(tolerance: {}, cost_scale: {}, pricing_threads: {})",
            self.tolerance, self.cost_scale, self.pricing_threads
        )
    }
}
