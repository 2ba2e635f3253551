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
    monitor::column_generation_monitor::{ColumnGenerationMonitor, SearchCommand},
    pool::Column,
    result::NodeOutcome,
    stats::ColumnGenerationStatistics,
};
use hopper_model::node::BranchNode;
use std::time::{Duration, Instant};

/// A monitor that terminates column generation after a wall-clock budget.
///
/// The clock starts at the first node the monitor sees and is not reset
/// between nodes, so one instance reused across a tree search bounds the
/// whole search. Call `reset` to start over.
#[derive(Clone, Debug)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
}

impl TimeLimitMonitor {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit,
            start_time: None,
        }
    }

    /// Forgets the start time; the next node restarts the clock.
    #[inline]
    pub fn reset(&mut self) {
        self.start_time = None;
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl ColumnGenerationMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_node(&mut self, _node: &BranchNode, _statistics: &ColumnGenerationStatistics) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
    }

    fn on_master_solved(
        &mut self,
        _objective: Option<f64>,
        _statistics: &ColumnGenerationStatistics,
    ) {
    }

    fn on_column_added(
        &mut self,
        _column: &Column,
        _reduced_cost: f64,
        _statistics: &ColumnGenerationStatistics,
    ) {
    }

    fn on_prune(&mut self, _bound: f64, _incumbent: f64, _statistics: &ColumnGenerationStatistics) {
    }

    fn on_exit_node(&mut self, _outcome: &NodeOutcome, _statistics: &ColumnGenerationStatistics) {}

    fn search_command(&mut self, _statistics: &ColumnGenerationStatistics) -> SearchCommand {
        if let Some(start) = self.start_time
            && start.elapsed() > self.time_limit
        {
            return SearchCommand::Terminate(format!(
                "Time limit of {:.2?} exceeded",
                self.time_limit
            ));
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_monitor_continues() {
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO);
        let stats = ColumnGenerationStatistics::default();
        // The clock has not started yet.
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
    }

    #[test]
    fn test_expired_budget_terminates() {
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO);
        let stats = ColumnGenerationStatistics::default();
        monitor.on_enter_node(&BranchNode::root(), &stats);
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(
            monitor.search_command(&stats),
            SearchCommand::Terminate(_)
        ));

        monitor.reset();
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
    }

    #[test]
    fn test_generous_budget_continues() {
        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(3600));
        let stats = ColumnGenerationStatistics::default();
        monitor.on_enter_node(&BranchNode::root(), &stats);
        assert_eq!(monitor.search_command(&stats), SearchCommand::Continue);
    }
}
