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

//! Tree search monitoring interface
//!
//! Lifecycle: enter → (command poll → node solved → [incumbent])* → exit

use crate::stats::TreeSearchStatistics;
use hopper_bnp::{monitor::column_generation_monitor::SearchCommand, result::NodeOutcome};
use hopper_model::{node::BranchNode, packing::Packing};

/// Trait for observing and controlling a tree search.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, num_items: usize, statistics: &TreeSearchStatistics);
    /// Called after the engine finished a node.
    fn on_node_solved(
        &mut self,
        node: &BranchNode,
        outcome: &NodeOutcome,
        statistics: &TreeSearchStatistics,
    );
    /// Called when a strictly better packing was found.
    fn on_incumbent(&mut self, packing: &Packing, statistics: &TreeSearchStatistics);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &TreeSearchStatistics);
    /// Called before every node to determine the next action.
    fn search_command(&mut self, _statistics: &TreeSearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
