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

/// Counters of one node's column generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGenerationStatistics {
    /// Depth of the node being solved.
    pub depth: usize,
    /// Master LP solves.
    pub master_solves: u64,
    /// Pricing solves.
    pub pricing_solves: u64,
    /// Columns added to the pool.
    pub columns_added: u64,
    /// Generated columns suppressed by the node's decisions.
    pub columns_suppressed: u64,
    /// Master objective (in bins) after the latest solve.
    pub last_objective: Option<f64>,
    /// Reduced cost (in bins) of the latest pricing answer.
    pub last_reduced_cost: Option<f64>,
    /// Wall time spent on the node so far.
    pub time_total: Duration,
}

impl Default for ColumnGenerationStatistics {
    fn default() -> Self {
        Self {
            depth: 0,
            master_solves: 0,
            pricing_solves: 0,
            columns_added: 0,
            columns_suppressed: 0,
            last_objective: None,
            last_reduced_cost: None,
            time_total: Duration::ZERO,
        }
    }
}

impl ColumnGenerationStatistics {
    #[inline]
    pub fn for_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    #[inline]
    pub fn on_master_solved(&mut self, objective: Option<f64>) {
        self.master_solves = self.master_solves.saturating_add(1);
        self.last_objective = objective;
    }

    #[inline]
    pub fn on_pricing_solved(&mut self, reduced_cost: Option<f64>) {
        self.pricing_solves = self.pricing_solves.saturating_add(1);
        self.last_reduced_cost = reduced_cost;
    }

    #[inline]
    pub fn on_column_added(&mut self) {
        self.columns_added = self.columns_added.saturating_add(1);
    }

    #[inline]
    pub fn set_columns_suppressed(&mut self, count: usize) {
        self.columns_suppressed = count as u64;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for ColumnGenerationStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Column Generation Statistics:")?;
        writeln!(f, "  Depth:                {}", self.depth)?;
        writeln!(f, "  Master solves:        {}", self.master_solves)?;
        writeln!(f, "  Pricing solves:       {}", self.pricing_solves)?;
        writeln!(f, "  Columns added:        {}", self.columns_added)?;
        writeln!(f, "  Columns suppressed:   {}", self.columns_suppressed)?;
        match self.last_objective {
            Some(obj) => writeln!(f, "  Last objective:       {:.6}", obj)?,
            None => writeln!(f, "  Last objective:       -")?,
        }
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

/// Counters over the whole lifetime of an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStatistics {
    /// Calls to `solve` that returned an outcome.
    pub nodes_solved: u64,
    /// Calls to `solve` that ended in an error or an abort.
    pub nodes_failed: u64,
    /// Nodes pruned by the incumbent bound.
    pub prunings_bound: u64,
    /// Nodes whose pricing problem was infeasible.
    pub pricing_infeasible: u64,
    /// Nodes whose master problem was infeasible.
    pub master_infeasible: u64,
    /// Nodes that ended with an integral master solution.
    pub integral_nodes: u64,
    /// Nodes that returned a branching pair.
    pub branching_nodes: u64,
    /// Times the incumbent was lowered.
    pub incumbent_updates: u64,
    /// Pricing answers that repeated a pooled column.
    pub duplicate_columns: u64,
    /// Master LP solves over all nodes.
    pub master_solves: u64,
    /// Pricing solves over all nodes.
    pub pricing_solves: u64,
    /// Total time spent inside `solve`.
    pub time_total: Duration,
}

impl EngineStatistics {
    #[inline]
    pub fn on_node_solved(&mut self, node: &ColumnGenerationStatistics) {
        self.nodes_solved = self.nodes_solved.saturating_add(1);
        self.accumulate(node);
    }

    /// A node that did not finish still spent its solves and time.
    #[inline]
    pub fn on_node_failed(&mut self, node: &ColumnGenerationStatistics) {
        self.nodes_failed = self.nodes_failed.saturating_add(1);
        self.accumulate(node);
    }

    #[inline]
    fn accumulate(&mut self, node: &ColumnGenerationStatistics) {
        self.master_solves = self.master_solves.saturating_add(node.master_solves);
        self.pricing_solves = self.pricing_solves.saturating_add(node.pricing_solves);
        self.time_total = self.time_total.saturating_add(node.time_total);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pricing_infeasible(&mut self) {
        self.pricing_infeasible = self.pricing_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_master_infeasible(&mut self) {
        self.master_infeasible = self.master_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_integral(&mut self, improved: bool) {
        self.integral_nodes = self.integral_nodes.saturating_add(1);
        if improved {
            self.incumbent_updates = self.incumbent_updates.saturating_add(1);
        }
    }

    #[inline]
    pub fn on_branching(&mut self) {
        self.branching_nodes = self.branching_nodes.saturating_add(1);
    }

    #[inline]
    pub fn on_duplicate_column(&mut self) {
        self.duplicate_columns = self.duplicate_columns.saturating_add(1);
    }
}

impl std::fmt::Display for EngineStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Branch-and-Price Engine Statistics:")?;
        writeln!(f, "  Nodes solved:         {}", self.nodes_solved)?;
        writeln!(f, "  Nodes failed:         {}", self.nodes_failed)?;
        writeln!(f, "  Branching nodes:      {}", self.branching_nodes)?;
        writeln!(f, "  Integral nodes:       {}", self.integral_nodes)?;
        writeln!(f, "  Incumbent updates:    {}", self.incumbent_updates)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Pricing infeasible:   {}", self.pricing_infeasible)?;
        writeln!(f, "  Master infeasible:    {}", self.master_infeasible)?;
        writeln!(f, "  Duplicate columns:    {}", self.duplicate_columns)?;
        writeln!(f, "  Master solves:        {}", self.master_solves)?;
        writeln!(f, "  Pricing solves:       {}", self.pricing_solves)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_counters() {
        let mut stats = ColumnGenerationStatistics::for_depth(3);
        stats.on_master_solved(Some(2.5));
        stats.on_pricing_solved(Some(-0.5));
        stats.on_column_added();
        stats.on_master_solved(Some(2.0));
        assert_eq!(stats.depth, 3);
        assert_eq!(stats.master_solves, 2);
        assert_eq!(stats.pricing_solves, 1);
        assert_eq!(stats.columns_added, 1);
        assert_eq!(stats.last_objective, Some(2.0));
    }

    #[test]
    fn test_engine_accumulates_nodes() {
        let mut node = ColumnGenerationStatistics::default();
        node.on_master_solved(None);
        node.on_pricing_solved(None);
        node.set_total_time(Duration::from_millis(5));

        let mut engine = EngineStatistics::default();
        engine.on_node_solved(&node);
        engine.on_node_solved(&node);
        engine.on_integral(true);
        engine.on_integral(false);
        engine.on_node_failed(&node);

        assert_eq!(engine.nodes_solved, 2);
        assert_eq!(engine.nodes_failed, 1);
        assert_eq!(engine.master_solves, 3);
        assert_eq!(engine.integral_nodes, 2);
        assert_eq!(engine.incumbent_updates, 1);
        assert_eq!(engine.time_total, Duration::from_millis(15));
    }

    #[test]
    fn test_display_mentions_counters() {
        let s = EngineStatistics::default().to_string();
        assert!(s.contains("Nodes solved:         0"));
        let s = ColumnGenerationStatistics::default().to_string();
        assert!(s.contains("Last objective:       -"));
    }
}
