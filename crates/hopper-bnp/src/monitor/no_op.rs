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

/// A no-operation monitor that ignores every event and always answers
/// `Continue`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor;

impl NoOperationMonitor {
    /// Creates a new `NoOperationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl ColumnGenerationMonitor for NoOperationMonitor {
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_node(&mut self, _node: &BranchNode, _statistics: &ColumnGenerationStatistics) {}

    #[inline(always)]
    fn on_master_solved(
        &mut self,
        _objective: Option<f64>,
        _statistics: &ColumnGenerationStatistics,
    ) {
    }

    #[inline(always)]
    fn on_column_added(
        &mut self,
        _column: &Column,
        _reduced_cost: f64,
        _statistics: &ColumnGenerationStatistics,
    ) {
    }

    #[inline(always)]
    fn on_prune(&mut self, _bound: f64, _incumbent: f64, _statistics: &ColumnGenerationStatistics) {
    }

    #[inline(always)]
    fn on_exit_node(&mut self, _outcome: &NodeOutcome, _statistics: &ColumnGenerationStatistics) {}

    #[inline(always)]
    fn search_command(&mut self, _statistics: &ColumnGenerationStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}
