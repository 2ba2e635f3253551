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
use hopper_bnp::{monitor::column_generation_monitor::SearchCommand, result::NodeOutcome};
use hopper_model::{node::BranchNode, packing::Packing};

/// A tree search monitor that does nothing.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor;

impl NoOperationMonitor {
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl TreeSearchMonitor for NoOperationMonitor {
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _num_items: usize, _statistics: &TreeSearchStatistics) {}

    #[inline(always)]
    fn on_node_solved(
        &mut self,
        _node: &BranchNode,
        _outcome: &NodeOutcome,
        _statistics: &TreeSearchStatistics,
    ) {
    }

    #[inline(always)]
    fn on_incumbent(&mut self, _packing: &Packing, _statistics: &TreeSearchStatistics) {}

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &TreeSearchStatistics) {}

    #[inline(always)]
    fn search_command(&mut self, _statistics: &TreeSearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}
