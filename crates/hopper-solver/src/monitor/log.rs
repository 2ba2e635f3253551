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

use crate::{monitor::tree_search_monitor::TreeSearchMonitor, stats::TreeSearchStatistics};
use hopper_bnp::result::NodeOutcome;
use hopper_model::{node::BranchNode, packing::Packing};
use std::time::{Duration, Instant};

const RULE_WIDTH: usize = 84;

/// Prints a progress table of the tree search to stdout.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    best_bins: Option<usize>,
}

impl LogMonitor {
    pub fn new(log_interval: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            best_bins: None,
        }
    }

    #[inline(always)]
    fn print_header(&self, num_items: usize) {
        println!("Branch-and-price search over {} items", num_items);
        println!(
            "{:<9} | {:<10} | {:<7} | {:<12} | {:<22} | {:<10}",
            "Elapsed", "Nodes", "Depth", "Best Bins", "Last Outcome", "Pruned"
        );
        println!("{}", "-".repeat(RULE_WIDTH));
    }

    #[inline(always)]
    fn log_line(&mut self, node: &BranchNode, outcome: &NodeOutcome, stats: &TreeSearchStatistics) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();

        let best_field = match self.best_bins {
            Some(bins) => bins.to_string(),
            None => "Inf".to_string(),
        };
        let elapsed_field = format!("{:.1}s", elapsed);

        println!(
            "{:<9} | {:<10} | {:<7} | {:<12} | {:<22} | {:<10}",
            elapsed_field,
            stats.nodes_explored,
            node.depth(),
            best_field,
            outcome.to_string(),
            stats.prunings_bound
        );

        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(log_interval: {}s)", self.log_interval.as_secs())
    }
}

impl TreeSearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, num_items: usize, _statistics: &TreeSearchStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_bins = None;
        self.print_header(num_items);
    }

    fn on_node_solved(
        &mut self,
        node: &BranchNode,
        outcome: &NodeOutcome,
        statistics: &TreeSearchStatistics,
    ) {
        if node.is_root() || self.last_log_time.elapsed() >= self.log_interval {
            self.log_line(node, outcome, statistics);
        }
    }

    fn on_incumbent(&mut self, packing: &Packing, _statistics: &TreeSearchStatistics) {
        self.best_bins = Some(packing.num_bins());
    }

    fn on_exit_search(&mut self, statistics: &TreeSearchStatistics) {
        println!("{}", "-".repeat(RULE_WIDTH));
        println!(
            "Search finished after {} nodes in {:.2?}.",
            statistics.nodes_explored, statistics.time_total
        );
    }
}
