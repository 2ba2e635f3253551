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

use crate::stats::TreeSearchStatistics;
use hopper_model::packing::Packing;

/// Why the tree search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// Every open node was explored or pruned, or the incumbent met the
    /// rounded-up root bound.
    OptimalityProven,
    /// The tree was exhausted, but some nodes could not be split further,
    /// so the best packing is not known to be optimal.
    Exhausted,
    /// The node limit was reached with open nodes left.
    NodeLimit,
    /// A monitor asked to stop.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OptimalityProven => write!(f, "OptimalityProven"),
            Self::Exhausted => write!(f, "Exhausted"),
            Self::NodeLimit => write!(f, "NodeLimit"),
            Self::Aborted(reason) => write!(f, "Aborted({})", reason),
        }
    }
}

/// Result of a tree search.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSearchOutcome {
    best: Option<Packing>,
    root_bound: Option<f64>,
    termination_reason: TerminationReason,
    statistics: TreeSearchStatistics,
}

impl TreeSearchOutcome {
    #[inline]
    pub fn new(
        best: Option<Packing>,
        root_bound: Option<f64>,
        termination_reason: TerminationReason,
        statistics: TreeSearchStatistics,
    ) -> Self {
        Self {
            best,
            root_bound,
            termination_reason,
            statistics,
        }
    }

    /// The best packing found.
    #[inline]
    pub fn best(&self) -> Option<&Packing> {
        self.best.as_ref()
    }

    /// Number of bins of the best packing.
    #[inline]
    pub fn best_num_bins(&self) -> Option<usize> {
        self.best.as_ref().map(Packing::num_bins)
    }

    /// The column generation bound of the root node, in bins.
    #[inline]
    pub fn root_bound(&self) -> Option<f64> {
        self.root_bound
    }

    #[inline]
    pub fn is_proven_optimal(&self) -> bool {
        self.termination_reason == TerminationReason::OptimalityProven && self.best.is_some()
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &TreeSearchStatistics {
        &self.statistics
    }

    /// Consumes the outcome and returns the best packing.
    #[inline]
    pub fn into_best(self) -> Option<Packing> {
        self.best
    }
}

impl std::fmt::Display for TreeSearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let best = match self.best_num_bins() {
            Some(bins) => format!("{} bins", bins),
            None => "none".to_string(),
        };
        let bound = match self.root_bound {
            Some(b) => format!("{:.4}", b),
            None => "-".to_string(),
        };
        write!(
            f,
            "TreeSearchOutcome(best: {}, root_bound: {}, termination: {})",
            best, bound, self.termination_reason
        )
    }
}
