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

//! Column generation monitoring interface
//!
//! Lifecycle of one `solve` call:
//! enter → (master solved → [prune] → column added)* → exit
//!
//! `search_command` is polled after every master solve; a `Terminate`
//! answer aborts the node with `BranchAndPriceError::Aborted`.

use crate::{pool::Column, result::NodeOutcome, stats::ColumnGenerationStatistics};
use hopper_model::node::BranchNode;

/// What the engine should do next.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Trait for observing and controlling the column generation of a node.
pub trait ColumnGenerationMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called once the node's bounds are applied, before the first solve.
    fn on_enter_node(&mut self, node: &BranchNode, statistics: &ColumnGenerationStatistics);
    /// Called after every master solve. `objective` is `None` when the
    /// master is infeasible.
    fn on_master_solved(&mut self, objective: Option<f64>, statistics: &ColumnGenerationStatistics);
    /// Called after pricing produced a new column.
    fn on_column_added(
        &mut self,
        column: &Column,
        reduced_cost: f64,
        statistics: &ColumnGenerationStatistics,
    );
    /// Called when the node is pruned by the incumbent.
    fn on_prune(&mut self, bound: f64, incumbent: f64, statistics: &ColumnGenerationStatistics);
    /// Called when the node is done.
    fn on_exit_node(&mut self, outcome: &NodeOutcome, statistics: &ColumnGenerationStatistics);
    /// Called to determine the next action.
    fn search_command(&mut self, _statistics: &ColumnGenerationStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}

impl std::fmt::Debug for dyn ColumnGenerationMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ColumnGenerationMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn ColumnGenerationMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ColumnGenerationMonitor({})", self.name())
    }
}
