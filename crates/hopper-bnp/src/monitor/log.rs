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

use crate::{
    monitor::column_generation_monitor::ColumnGenerationMonitor, pool::Column,
    result::NodeOutcome, stats::ColumnGenerationStatistics,
};
use hopper_model::node::BranchNode;
use std::time::{Duration, Instant};

const RULE_WIDTH: usize = 78;

/// Prints a progress table of the column generation to stdout.
///
/// One line per master solve, at most one per `log_interval`; the node
/// outcome is always printed.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Option<Instant>,
    log_interval: Duration,
}

impl LogMonitor {
    pub fn new(log_interval: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: None,
            log_interval,
        }
    }

    #[inline(always)]
    fn print_header(&self, node: &BranchNode) {
        println!("{}", node);
        println!(
            "{:<9} | {:<8} | {:<16} | {:<16} | {:<8} | {:<7}",
            "Elapsed", "Iter", "Objective", "Reduced Cost", "Columns", "Depth"
        );
        println!("{}", "-".repeat(RULE_WIDTH));
    }

    #[inline(always)]
    fn log_line(&mut self, objective: Option<f64>, stats: &ColumnGenerationStatistics) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();

        let objective_field = match objective {
            Some(obj) => format!("{:.6}", obj),
            None => "Infeasible".to_string(),
        };
        let reduced_cost_field = match stats.last_reduced_cost {
            Some(rc) => format!("{:.6}", rc),
            None => "-".to_string(),
        };
        let elapsed_field = format!("{:.1}s", elapsed);

        println!(
            "{:<9} | {:<8} | {:<16} | {:<16} | {:<8} | {:<7}",
            elapsed_field,
            stats.master_solves,
            objective_field,
            reduced_cost_field,
            stats.columns_added,
            stats.depth
        );

        self.last_log_time = Some(now);
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}ms)",
            self.log_interval.as_millis()
        )
    }
}

impl ColumnGenerationMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_node(&mut self, node: &BranchNode, _statistics: &ColumnGenerationStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = None;
        self.print_header(node);
    }

    fn on_master_solved(&mut self, objective: Option<f64>, statistics: &ColumnGenerationStatistics) {
        let due = self
            .last_log_time
            .is_none_or(|t| t.elapsed() >= self.log_interval);
        if due {
            self.log_line(objective, statistics);
        }
    }

    fn on_column_added(
        &mut self,
        _column: &Column,
        _reduced_cost: f64,
        _statistics: &ColumnGenerationStatistics,
    ) {
    }

    fn on_prune(&mut self, bound: f64, incumbent: f64, _statistics: &ColumnGenerationStatistics) {
        println!("Pruned: bound {:.6} cannot beat incumbent {}", bound, incumbent);
    }

    fn on_exit_node(&mut self, outcome: &NodeOutcome, statistics: &ColumnGenerationStatistics) {
        println!("{}", "-".repeat(RULE_WIDTH));
        println!(
            "Node finished: {} after {} master solves in {:.2?}.",
            outcome, statistics.master_solves, statistics.time_total
        );
    }
}
