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

//! Monitoring combinators for column generation
//!
//! Provides `CompositeMonitor`, a fan-out monitor that forwards every event
//! to its children.
//!
//! Behavior
//! - Events are dispatched to child monitors in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` response;
//!   put stricter stop conditions first.

use crate::{
    monitor::column_generation_monitor::{ColumnGenerationMonitor, SearchCommand},
    pool::Column,
    result::NodeOutcome,
    stats::ColumnGenerationStatistics,
};
use hopper_model::node::BranchNode;

/// A monitor that aggregates multiple monitors and forwards events to all
/// of them.
#[derive(Default)]
pub struct CompositeMonitor<'a> {
    monitors: Vec<Box<dyn ColumnGenerationMonitor + 'a>>,
}

impl<'a> CompositeMonitor<'a> {
    /// Creates a new empty `CompositeMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Adds a monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: ColumnGenerationMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn ColumnGenerationMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    /// Builder-style variant of `add_monitor`.
    #[inline(always)]
    pub fn with<M>(mut self, monitor: M) -> Self
    where
        M: ColumnGenerationMonitor + 'a,
    {
        self.add_monitor(monitor);
        self
    }

    /// Returns the monitors contained in the composite.
    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn ColumnGenerationMonitor + 'a>] {
        &self.monitors
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a> FromIterator<Box<dyn ColumnGenerationMonitor + 'a>> for CompositeMonitor<'a> {
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn ColumnGenerationMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.monitors.iter().map(|m| m.name()))
            .finish()
    }
}

impl ColumnGenerationMonitor for CompositeMonitor<'_> {
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    #[inline(always)]
    fn on_enter_node(&mut self, node: &BranchNode, statistics: &ColumnGenerationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_node(node, statistics);
        }
    }

    #[inline(always)]
    fn on_master_solved(&mut self, objective: Option<f64>, statistics: &ColumnGenerationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_master_solved(objective, statistics);
        }
    }

    #[inline(always)]
    fn on_column_added(
        &mut self,
        column: &Column,
        reduced_cost: f64,
        statistics: &ColumnGenerationStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_column_added(column, reduced_cost, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(&mut self, bound: f64, incumbent: f64, statistics: &ColumnGenerationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_prune(bound, incumbent, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_node(&mut self, outcome: &NodeOutcome, statistics: &ColumnGenerationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_node(outcome, statistics);
        }
    }

    #[inline(always)]
    fn search_command(&mut self, statistics: &ColumnGenerationStatistics) -> SearchCommand {
        for monitor in &mut self.monitors {
            let cmd = monitor.search_command(statistics);
            if !matches!(cmd, SearchCommand::Continue) {
                return cmd;
            }
        }
        SearchCommand::Continue
    }
}
