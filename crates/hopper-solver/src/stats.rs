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

use std::time::Duration;

/// Statistics collected during a tree search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeSearchStatistics {
    /// Nodes handed to the branch-and-price engine.
    pub nodes_explored: u64,
    /// The deepest node solved.
    pub max_depth: u64,
    /// Nodes that produced two children.
    pub branchings: u64,
    /// Nodes whose master solution was integral.
    pub integral_nodes: u64,
    /// Nodes pruned against the incumbent.
    pub prunings_bound: u64,
    /// Nodes whose master or pricing problem was infeasible.
    pub infeasible_nodes: u64,
    /// Nodes whose branching pair was already decided, so they could not be
    /// split further.
    pub stalled_nodes: u64,
    /// Strict improvements of the incumbent.
    pub incumbent_updates: u64,
    /// Columns in the pool at the end of the search.
    pub columns_generated: u64,
    /// Total time spent in the search.
    pub time_total: Duration,
}

impl TreeSearchStatistics {
    #[inline]
    pub fn on_node_explored(&mut self, depth: usize) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    #[inline]
    pub fn on_branching(&mut self) {
        self.branchings = self.branchings.saturating_add(1);
    }

    #[inline]
    pub fn on_integral(&mut self, improved: bool) {
        self.integral_nodes = self.integral_nodes.saturating_add(1);
        if improved {
            self.incumbent_updates = self.incumbent_updates.saturating_add(1);
        }
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_infeasible(&mut self) {
        self.infeasible_nodes = self.infeasible_nodes.saturating_add(1);
    }

    #[inline]
    pub fn on_stalled(&mut self) {
        self.stalled_nodes = self.stalled_nodes.saturating_add(1);
    }

    #[inline]
    pub fn set_columns_generated(&mut self, columns: usize) {
        self.columns_generated = columns as u64;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for TreeSearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tree Search Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Branchings:           {}", self.branchings)?;
        writeln!(f, "  Integral nodes:       {}", self.integral_nodes)?;
        writeln!(f, "  Incumbent updates:    {}", self.incumbent_updates)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Infeasible nodes:     {}", self.infeasible_nodes)?;
        writeln!(f, "  Stalled nodes:        {}", self.stalled_nodes)?;
        writeln!(f, "  Columns generated:    {}", self.columns_generated)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
