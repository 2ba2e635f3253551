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

//! Depth-first branch-and-price search.
//!
//! `TreeSearch` drives a `BranchAndPrice` engine over the Ryan-Foster tree:
//! every node returning a pair spawns a "together" and a "separate" child,
//! and the together child is explored first. Everything else a node can
//! answer closes it.
//!
//! The search stops early once the incumbent meets the rounded-up root
//! bound, since no node below the root can do better than that.

use crate::{
    monitor::{no_op::NoOperationMonitor, tree_search_monitor::TreeSearchMonitor},
    result::{TerminationReason, TreeSearchOutcome},
    stats::TreeSearchStatistics,
};
use hopper_bnp::{
    config::BranchAndPriceConfig,
    engine::BranchAndPrice,
    error::BranchAndPriceError,
    incumbent::IncumbentStore,
    monitor::{
        column_generation_monitor::{ColumnGenerationMonitor, SearchCommand},
        no_op::NoOperationMonitor as NoOperationColumnMonitor,
    },
    result::NodeOutcome,
};
use hopper_lp::engine::{IpEngine, LpEngine};
use hopper_model::{
    node::BranchNode,
    problem::{ProblemData, Weight},
};

/// A depth-first tree search over branch-and-price nodes.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TreeSearch {
    node_limit: Option<u64>,
    config: BranchAndPriceConfig,
}

impl TreeSearch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops after `limit` nodes.
    #[inline]
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// The engine configuration used by `solve`.
    #[inline]
    pub fn with_config(mut self, config: BranchAndPriceConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    #[inline]
    pub fn config(&self) -> &BranchAndPriceConfig {
        &self.config
    }

    /// Solves `data` with a fresh HiGHS-backed engine and no monitoring.
    pub fn solve<W>(&self, data: &ProblemData<W>) -> Result<TreeSearchOutcome, BranchAndPriceError>
    where
        W: Weight,
    {
        let mut engine = BranchAndPrice::highs(data).with_config(self.config);
        self.run(
            &mut engine,
            &mut NoOperationMonitor::new(),
            &mut NoOperationColumnMonitor::new(),
        )
    }

    /// Runs the search on an existing engine. The engine keeps its pool and
    /// incumbent afterwards, so a second run starts warm.
    ///
    /// Engine failures end the search with `Err`; a stop request from
    /// either monitor ends it with `TerminationReason::Aborted`.
    pub fn run<W, L, P, I, T, C>(
        &self,
        engine: &mut BranchAndPrice<'_, W, L, P, I>,
        monitor: &mut T,
        column_monitor: &mut C,
    ) -> Result<TreeSearchOutcome, BranchAndPriceError>
    where
        W: Weight,
        L: LpEngine,
        P: IpEngine,
        I: IncumbentStore,
        T: TreeSearchMonitor + ?Sized,
        C: ColumnGenerationMonitor + ?Sized,
    {
        let start_time = std::time::Instant::now();
        let tolerance = engine.config().tolerance();
        let mut stats = TreeSearchStatistics::default();
        let mut stack = vec![BranchNode::root()];
        let mut root_bound = None;
        let mut stalled = false;

        monitor.on_enter_search(engine.data().num_items(), &stats);

        let termination_reason = loop {
            let Some(node) = stack.pop() else {
                break if stalled {
                    TerminationReason::Exhausted
                } else {
                    TerminationReason::OptimalityProven
                };
            };

            if self
                .node_limit
                .is_some_and(|limit| stats.nodes_explored >= limit)
            {
                break TerminationReason::NodeLimit;
            }
            if let SearchCommand::Terminate(reason) = monitor.search_command(&stats) {
                break TerminationReason::Aborted(reason);
            }

            let before = engine.incumbent_value();
            let outcome = match engine.solve_with_monitor(&node, column_monitor) {
                Ok(outcome) => outcome,
                Err(BranchAndPriceError::Aborted(reason)) => {
                    break TerminationReason::Aborted(reason);
                }
                Err(e) => return Err(e),
            };

            stats.on_node_explored(node.depth());
            if node.is_root() {
                root_bound = engine.master().objective();
            }

            match &outcome {
                NodeOutcome::Branch(pair) => {
                    // Singletons stay available under a together decision,
                    // so the engine can hand back a pair the node already
                    // fixed. Splitting it again would loop forever.
                    if node.together().contains(pair) || node.separate().contains(pair) {
                        stats.on_stalled();
                        stalled = true;
                    } else {
                        stats.on_branching();
                        stack.push(node.child_separate(*pair));
                        stack.push(node.child_together(*pair));
                    }
                }
                NodeOutcome::Integral(packing) => {
                    let improved = tolerance.is_less(engine.incumbent_value(), before);
                    stats.on_integral(improved);
                    if improved {
                        monitor.on_incumbent(packing, &stats);
                    }
                }
                NodeOutcome::Pruned { .. } => stats.on_pruning_bound(),
                NodeOutcome::PricingInfeasible | NodeOutcome::MasterInfeasible => {
                    stats.on_infeasible()
                }
            }
            monitor.on_node_solved(&node, &outcome, &stats);

            if let Some(bound) = root_bound
                && tolerance.is_greater_or_equal(tolerance.ceil(bound), engine.incumbent_value())
            {
                break TerminationReason::OptimalityProven;
            }
        };

        stats.set_columns_generated(engine.pool().len());
        stats.set_total_time(start_time.elapsed());
        monitor.on_exit_search(&stats);

        Ok(TreeSearchOutcome::new(
            engine.best_packing(),
            root_bound,
            termination_reason,
            stats,
        ))
    }
}

impl std::fmt::Display for TreeSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.node_limit {
            Some(limit) => write!(f, "TreeSearch(node_limit: {})", limit),
            None => write!(f, "TreeSearch(node_limit: none)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::log::LogMonitor;
    use hopper_bnp::monitor::iteration_limit::IterationLimitMonitor;
    use hopper_model::{packing::Packing, problem::ProblemDataBuilder};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    const EPS: f64 = 1e-6;

    fn data(capacity: u32, weights: &[u32]) -> ProblemData<u32> {
        ProblemDataBuilder::new(capacity)
            .with_items(weights.iter().copied())
            .build()
            .expect("valid instance")
    }

    /// Fewest bins by dynamic programming over item subsets.
    fn optimum(capacity: u32, weights: &[u32]) -> usize {
        let n = weights.len();
        let full = (1usize << n) - 1;
        let fits: Vec<bool> = (0..=full)
            .map(|mask| {
                let w: u32 = (0..n)
                    .filter(|i| mask & (1 << i) != 0)
                    .map(|i| weights[i])
                    .sum();
                w <= capacity
            })
            .collect();

        let mut best = vec![usize::MAX; full + 1];
        best[0] = 0;
        for mask in 1..=full {
            // Fix the lowest item so every bin is enumerated once.
            let low = mask & mask.wrapping_neg();
            let rest = mask ^ low;
            let mut sub = rest;
            loop {
                let bin = sub | low;
                if fits[bin] && best[mask ^ bin] != usize::MAX {
                    best[mask] = best[mask].min(best[mask ^ bin] + 1);
                }
                if sub == 0 {
                    break;
                }
                sub = (sub - 1) & rest;
            }
        }
        best[full]
    }

    /// Stops after a fixed number of nodes.
    struct StopAfter(u64);

    impl TreeSearchMonitor for StopAfter {
        fn name(&self) -> &str {
            "StopAfter"
        }
        fn on_enter_search(&mut self, _: usize, _: &TreeSearchStatistics) {}
        fn on_node_solved(&mut self, _: &BranchNode, _: &NodeOutcome, _: &TreeSearchStatistics) {}
        fn on_incumbent(&mut self, _: &Packing, _: &TreeSearchStatistics) {}
        fn on_exit_search(&mut self, _: &TreeSearchStatistics) {}
        fn search_command(&mut self, statistics: &TreeSearchStatistics) -> SearchCommand {
            if statistics.nodes_explored >= self.0 {
                SearchCommand::Terminate("enough".to_string())
            } else {
                SearchCommand::Continue
            }
        }
    }

    #[test]
    fn test_small_instance_is_solved_at_the_root() {
        let data = data(5, &[2, 3, 5]);
        let outcome = TreeSearch::new().solve(&data).expect("solve");

        assert!(outcome.is_proven_optimal());
        assert_eq!(outcome.best_num_bins(), Some(2));
        assert!((outcome.root_bound().expect("bound") - 2.0).abs() <= EPS);
        assert_eq!(outcome.statistics().nodes_explored, 1);
        assert!(outcome.best().expect("packing").is_feasible_for(&data));
    }

    #[test]
    fn test_symmetric_instance_needs_two_bins() {
        let data = data(10, &[4, 4, 4, 6]);
        let outcome = TreeSearch::new().solve(&data).expect("solve");

        assert_eq!(outcome.best_num_bins(), Some(2));
        assert!(outcome.best().expect("packing").is_feasible_for(&data));
        assert!(outcome.is_proven_optimal());
    }

    #[test]
    fn test_random_instances_match_the_optimum() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10 {
            let n = rng.random_range(3..=8);
            let weights: Vec<u32> = (0..n).map(|_| rng.random_range(1..=10)).collect();
            let data = data(10, &weights);
            let expected = optimum(10, &weights);

            let outcome = TreeSearch::new().solve(&data).expect("solve");
            let bound = outcome.root_bound().expect("bound");
            assert!(bound <= expected as f64 + EPS, "{:?}", weights);

            if let Some(best) = outcome.best() {
                assert!(best.is_feasible_for(&data));
                assert!(best.num_bins() >= expected);
            }
            if outcome.is_proven_optimal() {
                assert_eq!(outcome.best_num_bins(), Some(expected), "{:?}", weights);
            }
        }
    }

    #[test]
    fn test_node_limit_stops_before_the_root() {
        let data = data(5, &[2, 3, 5]);
        let outcome = TreeSearch::new()
            .with_node_limit(0)
            .solve(&data)
            .expect("solve");

        assert_eq!(outcome.termination_reason(), &TerminationReason::NodeLimit);
        assert_eq!(outcome.statistics().nodes_explored, 0);
        assert!(outcome.best().is_none());
        assert!(outcome.root_bound().is_none());
    }

    #[test]
    fn test_tree_monitor_can_abort() {
        let data = data(10, &[4, 4, 4, 6]);
        let mut engine = BranchAndPrice::highs(&data);
        let outcome = TreeSearch::new()
            .run(
                &mut engine,
                &mut StopAfter(0),
                &mut NoOperationColumnMonitor::new(),
            )
            .expect("run");

        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("enough".to_string())
        );
        assert!(!outcome.is_proven_optimal());
    }

    #[test]
    fn test_column_monitor_abort_ends_the_search() {
        let data = data(5, &[2, 3, 5]);
        let mut engine = BranchAndPrice::highs(&data);
        let outcome = TreeSearch::new()
            .run(
                &mut engine,
                &mut NoOperationMonitor::new(),
                &mut IterationLimitMonitor::new(1),
            )
            .expect("run");

        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::Aborted(_)
        ));
        assert_eq!(outcome.statistics().nodes_explored, 0);
    }

    #[test]
    fn test_logging_run_reaches_the_same_answer() {
        let data = data(10, &[3, 7, 5, 5, 2, 8, 6, 4]);
        let mut engine = BranchAndPrice::highs(&data);
        let outcome = TreeSearch::new()
            .run(
                &mut engine,
                &mut LogMonitor::new(Duration::ZERO),
                &mut NoOperationColumnMonitor::new(),
            )
            .expect("run");

        assert_eq!(outcome.best_num_bins(), Some(optimum(10, &[3, 7, 5, 5, 2, 8, 6, 4])));
        assert_eq!(
            outcome.statistics().columns_generated,
            engine.pool().len() as u64
        );
    }
}
