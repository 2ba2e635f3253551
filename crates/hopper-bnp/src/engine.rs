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

//! Branch-and-price engine for one-dimensional bin packing.
//!
//! `BranchAndPrice` owns everything that outlives a single tree node: the
//! column pool, the restricted master problem built over it, the solving
//! engines and the incumbent. Each call to `solve` runs the column
//! generation of one node and reports what the tree driver should do next.
//!
//! Per node the engine
//!
//! 1. validates the node and overlays its decisions onto the master bounds,
//! 2. alternates master solves and pricing rounds until pricing finds no
//!    improving pattern (or repeats one it already knows),
//! 3. prunes against the incumbent after every master solve on non-root
//!    nodes,
//! 4. inspects the converged solution and either returns a branching pair
//!    or records an integral packing as the new incumbent.
//!
//! The pool grows monotonically across nodes; columns that violate the
//! decisions of the current node are suppressed through their upper bound
//! and come back once the driver moves elsewhere in the tree.

use crate::{
    branching::{BranchingDecision, BranchingSelector},
    config::BranchAndPriceConfig,
    error::BranchAndPriceError,
    incumbent::{IncumbentStore, LocalIncumbent},
    master::{BinReport, MasterProblem, MasterStatus, SolutionReport},
    monitor::{
        column_generation_monitor::{ColumnGenerationMonitor, SearchCommand},
        no_op::NoOperationMonitor,
    },
    pool::{ColumnPool, Insertion},
    pricing::{PricingOutcome, PricingSubproblem},
    result::NodeOutcome,
    stats::{ColumnGenerationStatistics, EngineStatistics},
};
use hopper_lp::{
    engine::{EngineError, IpEngine, LpEngine},
    highs::HighsEngine,
};
use hopper_model::{
    index::{ColumnIndex, ItemIndex},
    node::BranchNode,
    packing::Packing,
    problem::{ProblemData, Weight},
};

/// The node engine of a branch-and-price search.
///
/// `L` solves the master LP, `P` solves the pricing program and `I` holds
/// the incumbent. The problem data is borrowed for the engine's lifetime.
pub struct BranchAndPrice<'a, W, L, P, I = LocalIncumbent>
where
    W: Weight,
    L: LpEngine,
    P: IpEngine,
    I: IncumbentStore,
{
    data: &'a ProblemData<W>,
    config: BranchAndPriceConfig,
    pool: ColumnPool,
    master: MasterProblem,
    lp: L,
    ip: P,
    incumbent: I,
    stats: EngineStatistics,
}

impl<'a, W> BranchAndPrice<'a, W, HighsEngine, HighsEngine, LocalIncumbent>
where
    W: Weight,
{
    /// An engine solving both the master and the pricing problem with
    /// HiGHS.
    pub fn highs(data: &'a ProblemData<W>) -> Self {
        Self::new(data, HighsEngine::new(), HighsEngine::new())
    }
}

impl<'a, W, L, P> BranchAndPrice<'a, W, L, P, LocalIncumbent>
where
    W: Weight,
    L: LpEngine,
    P: IpEngine,
{
    /// Creates an engine with the default configuration and an engine-owned
    /// incumbent. The pool starts with one singleton column per item.
    pub fn new(data: &'a ProblemData<W>, lp: L, ip: P) -> Self {
        let config = BranchAndPriceConfig::default();
        let pool = ColumnPool::with_singletons(data.num_items());
        let master = MasterProblem::new(&pool, config.cost_scale());
        Self {
            data,
            config,
            pool,
            master,
            lp,
            ip,
            incumbent: LocalIncumbent::new(),
            stats: EngineStatistics::default(),
        }
    }
}

impl<'a, W, L, P, I> BranchAndPrice<'a, W, L, P, I>
where
    W: Weight,
    L: LpEngine,
    P: IpEngine,
    I: IncumbentStore,
{
    /// Replaces the configuration. The master is rebuilt over the current
    /// pool, so a changed cost scale takes effect immediately.
    pub fn with_config(mut self, config: BranchAndPriceConfig) -> Self {
        self.master = MasterProblem::new(&self.pool, config.cost_scale());
        self.config = config;
        self
    }

    /// Replaces the incumbent store, e.g. with a `SharedIncumbent` handle.
    pub fn with_incumbent<J>(self, incumbent: J) -> BranchAndPrice<'a, W, L, P, J>
    where
        J: IncumbentStore,
    {
        BranchAndPrice {
            data: self.data,
            config: self.config,
            pool: self.pool,
            master: self.master,
            lp: self.lp,
            ip: self.ip,
            incumbent,
            stats: self.stats,
        }
    }

    /// Solves one node without monitoring.
    #[inline]
    pub fn solve(&mut self, node: &BranchNode) -> Result<NodeOutcome, BranchAndPriceError> {
        self.solve_with_monitor(node, &mut NoOperationMonitor::new())
    }

    /// Solves one node, reporting progress to `monitor`.
    ///
    /// Returns `Err` on engine failures, invalid nodes and monitor
    /// termination requests. The pool and the master keep every column
    /// generated before the error.
    pub fn solve_with_monitor<M>(
        &mut self,
        node: &BranchNode,
        monitor: &mut M,
    ) -> Result<NodeOutcome, BranchAndPriceError>
    where
        M: ColumnGenerationMonitor + ?Sized,
    {
        if self.config.validate_nodes() {
            node.validate(self.data.num_items())?;
        }

        let session = NodeSession::new(self, node, monitor);
        session.run()
    }

    #[inline]
    pub fn data(&self) -> &ProblemData<W> {
        self.data
    }

    #[inline]
    pub fn config(&self) -> &BranchAndPriceConfig {
        &self.config
    }

    /// The column pool shared by every node solved so far.
    #[inline]
    pub fn pool(&self) -> &ColumnPool {
        &self.pool
    }

    /// The master problem as left by the last solve.
    #[inline]
    pub fn master(&self) -> &MasterProblem {
        &self.master
    }

    #[inline]
    pub fn incumbent(&self) -> &I {
        &self.incumbent
    }

    /// The incumbent objective in bins, `+inf` while none is known.
    #[inline]
    pub fn incumbent_value(&self) -> f64 {
        self.incumbent.upper_bound()
    }

    /// A copy of the best packing found so far.
    #[inline]
    pub fn best_packing(&self) -> Option<Packing> {
        self.incumbent.snapshot()
    }

    /// Counters over the engine's lifetime.
    #[inline]
    pub fn statistics(&self) -> &EngineStatistics {
        &self.stats
    }

    /// The value of every column in the last master solution.
    #[inline]
    pub fn fractional_solution(&self) -> Option<&[f64]> {
        self.master.fractional_solution()
    }

    /// The columns with a non-zero value in the last master solution.
    #[inline]
    pub fn active_bins(&self) -> Vec<(ColumnIndex, &[ItemIndex], f64)> {
        self.master.active_bins(&self.pool, self.config.tolerance())
    }

    #[inline]
    pub fn solution_report(&self) -> SolutionReport<'_> {
        self.master.solution_report()
    }

    #[inline]
    pub fn bin_report(&self) -> BinReport<'_> {
        self.master.bin_report(&self.pool, self.config.tolerance())
    }
}

impl<W, L, P, I> std::fmt::Debug for BranchAndPrice<'_, W, L, P, I>
where
    W: Weight,
    L: LpEngine,
    P: IpEngine,
    I: IncumbentStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BranchAndPrice")
            .field("data", &self.data)
            .field("config", &self.config)
            .field("pool", &self.pool)
            .field("lp", &self.lp.name())
            .field("ip", &self.ip.name())
            .field("incumbent", &self.incumbent.upper_bound())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<W, L, P, I> std::fmt::Display for BranchAndPrice<'_, W, L, P, I>
where
    W: Weight,
    L: LpEngine,
    P: IpEngine,
    I: IncumbentStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BranchAndPrice(items: {}, columns: {}, incumbent: {}, lp: {}, ip: {})",
            self.data.num_items(),
            self.pool.len(),
            self.incumbent.upper_bound(),
            self.lp.name(),
            self.ip.name()
        )
    }
}

/// Per-node state of one `solve` call.
struct NodeSession<'s, 'a, W, L, P, I, M>
where
    W: Weight,
    L: LpEngine,
    P: IpEngine,
    I: IncumbentStore,
    M: ColumnGenerationMonitor + ?Sized,
{
    engine: &'s mut BranchAndPrice<'a, W, L, P, I>,
    node: &'s BranchNode,
    monitor: &'s mut M,
    pricing: PricingSubproblem,
    stats: ColumnGenerationStatistics,
    start_time: std::time::Instant,
}

impl<'s, 'a, W, L, P, I, M> NodeSession<'s, 'a, W, L, P, I, M>
where
    W: Weight,
    L: LpEngine,
    P: IpEngine,
    I: IncumbentStore,
    M: ColumnGenerationMonitor + ?Sized,
{
    fn new(
        engine: &'s mut BranchAndPrice<'a, W, L, P, I>,
        node: &'s BranchNode,
        monitor: &'s mut M,
    ) -> Self {
        let pricing = PricingSubproblem::new(
            engine.data,
            node,
            engine.config.tolerance(),
            engine.config.pricing_threads(),
        );
        Self {
            engine,
            node,
            monitor,
            pricing,
            stats: ColumnGenerationStatistics::for_depth(node.depth()),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> Result<NodeOutcome, BranchAndPriceError> {
        let suppressed = self
            .engine
            .master
            .apply_node_bounds(&self.engine.pool, self.node);
        self.stats.set_columns_suppressed(suppressed);
        self.monitor.on_enter_node(self.node, &self.stats);

        let result = self.generate_columns().and_then(|converged| match converged {
            Some(outcome) => Ok(outcome),
            None => self.branch(),
        });

        self.stats.set_total_time(self.start_time.elapsed());
        match &result {
            Ok(outcome) => {
                self.engine.stats.on_node_solved(&self.stats);
                self.record(outcome);
                self.monitor.on_exit_node(outcome, &self.stats);
            }
            Err(_) => self.engine.stats.on_node_failed(&self.stats),
        }
        result
    }

    /// Runs the master/pricing exchange. `Ok(None)` means the master
    /// converged and the node is ready for branching; `Ok(Some(_))` ends
    /// the node early.
    fn generate_columns(&mut self) -> Result<Option<NodeOutcome>, BranchAndPriceError> {
        let tolerance = self.engine.config.tolerance();

        loop {
            let objective = match self.engine.master.solve(&mut self.engine.lp)? {
                MasterStatus::Optimal(objective) => Some(objective),
                MasterStatus::Infeasible => None,
            };
            self.stats.on_master_solved(objective);
            self.monitor.on_master_solved(objective, &self.stats);

            let Some(objective) = objective else {
                return Ok(Some(NodeOutcome::MasterInfeasible));
            };

            if !self.node.is_root() {
                let incumbent = self.engine.incumbent.upper_bound();
                if tolerance.is_greater_or_equal(tolerance.ceil(objective), incumbent) {
                    self.monitor.on_prune(objective, incumbent, &self.stats);
                    return Ok(Some(NodeOutcome::Pruned { bound: objective }));
                }
            }

            if let SearchCommand::Terminate(reason) = self.monitor.search_command(&self.stats) {
                return Err(BranchAndPriceError::Aborted(reason));
            }

            let num_items = self.engine.pool.num_items();
            let duals = self
                .engine
                .master
                .duals()
                .ok_or(EngineError::MalformedResponse {
                    expected: num_items,
                    found: 0,
                })?;
            let cost_scale = self.engine.master.cost_scale();
            let outcome = self
                .pricing
                .price(duals, cost_scale, &mut self.engine.ip)?;

            match outcome {
                PricingOutcome::Infeasible => {
                    self.stats.on_pricing_solved(None);
                    return Ok(Some(NodeOutcome::PricingInfeasible));
                }
                PricingOutcome::Converged { reduced_cost } => {
                    self.stats.on_pricing_solved(Some(reduced_cost));
                    return Ok(None);
                }
                PricingOutcome::Improving {
                    members,
                    reduced_cost,
                } => {
                    self.stats.on_pricing_solved(Some(reduced_cost));
                    match self.engine.pool.insert(members) {
                        Insertion::Inserted(index) => {
                            let column = self.engine.pool.column(index);
                            let added = self.engine.master.add_column(column);
                            debug_assert_eq!(added, index);
                            self.stats.on_column_added();
                            self.monitor
                                .on_column_added(column, reduced_cost, &self.stats);
                        }
                        Insertion::Existing(_) => {
                            // A pooled pattern priced as improving again; the
                            // master solution is still current and taken as
                            // converged.
                            self.engine.stats.on_duplicate_column();
                            return Ok(None);
                        }
                    }
                }
            }
        }
    }

    /// Reads the converged master solution.
    fn branch(&mut self) -> Result<NodeOutcome, BranchAndPriceError> {
        let num_columns = self.engine.master.num_columns();
        let values = self
            .engine
            .master
            .fractional_solution()
            .ok_or(EngineError::MalformedResponse {
                expected: num_columns,
                found: 0,
            })?;

        let selector = BranchingSelector::new(self.engine.config.tolerance());
        match selector.select_from(&self.engine.pool, values) {
            BranchingDecision::Branch { pair, .. } => Ok(NodeOutcome::Branch(pair)),
            BranchingDecision::Integral => {
                let packing = self
                    .engine
                    .master
                    .integral_packing(&self.engine.pool)
                    .ok_or(EngineError::MalformedResponse {
                        expected: num_columns,
                        found: 0,
                    })?;
                Ok(NodeOutcome::Integral(packing))
            }
        }
    }

    /// Updates the engine counters and the incumbent for a finished node.
    fn record(&mut self, outcome: &NodeOutcome) {
        let stats = &mut self.engine.stats;
        match outcome {
            NodeOutcome::Branch(_) => stats.on_branching(),
            NodeOutcome::Pruned { .. } => stats.on_pruning_bound(),
            NodeOutcome::PricingInfeasible => stats.on_pricing_infeasible(),
            NodeOutcome::MasterInfeasible => stats.on_master_infeasible(),
            NodeOutcome::Integral(packing) => {
                let improved = self.engine.incumbent.try_install(packing);
                stats.on_integral(improved);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        branching::CoOccurrence,
        incumbent::SharedIncumbent,
        monitor::{composite::CompositeMonitor, iteration_limit::IterationLimitMonitor},
        pool::Column,
    };
    use hopper_core::num::tolerance::Tolerance;
    use hopper_lp::{
        engine::{IpSolution, IpStatus, LpSolution, LpStatus},
        program::{BinaryProgram, LinearProgram},
    };
    use hopper_model::{node::ItemPair, problem::ProblemDataBuilder};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    const EPS: f64 = 1e-6;

    fn data(capacity: u32, weights: &[u32]) -> ProblemData<u32> {
        ProblemDataBuilder::new(capacity)
            .with_items(weights.iter().copied())
            .build()
            .expect("valid instance")
    }

    fn packing(bins: &[&[usize]]) -> Packing {
        Packing::new(
            bins.iter()
                .map(|b| b.iter().map(|&i| ItemIndex::new(i)).collect())
                .collect(),
        )
    }

    fn assert_partition<W, L, P, I>(engine: &BranchAndPrice<'_, W, L, P, I>)
    where
        W: Weight,
        L: LpEngine,
        P: IpEngine,
        I: IncumbentStore,
    {
        let values = engine.fractional_solution().expect("solution");
        for i in 0..engine.pool().num_items() {
            let coverage: f64 = engine
                .pool()
                .iter()
                .zip(values)
                .filter(|((_, c), _)| c.contains(ItemIndex::new(i)))
                .map(|(_, &v)| v)
                .sum();
            assert!(
                (coverage - 1.0).abs() <= EPS,
                "item {} covered {} times",
                i,
                coverage
            );
        }
    }

    /// Keeps every singleton at one and prices each item at the column cost.
    struct SingletonLp;

    impl LpEngine for SingletonLp {
        fn name(&self) -> &str {
            "SingletonLp"
        }

        fn solve_lp(&mut self, program: &LinearProgram) -> Result<LpStatus, EngineError> {
            let n = program.num_rows();
            let primal: Vec<f64> = (0..program.num_columns())
                .map(|j| if j < n { 1.0 } else { 0.0 })
                .collect();
            let cost = program.columns().first().map_or(1.0, |c| c.cost());
            Ok(LpStatus::Optimal(LpSolution::new(
                program.objective_at(&primal),
                primal,
                vec![cost; n],
            )))
        }
    }

    /// Answers every pricing round with the same pattern.
    struct RepeatPattern(Vec<usize>);

    impl IpEngine for RepeatPattern {
        fn name(&self) -> &str {
            "RepeatPattern"
        }

        fn solve_ip(&mut self, program: &BinaryProgram) -> Result<IpStatus, EngineError> {
            let mut x = vec![0.0; program.num_variables()];
            for &i in &self.0 {
                x[i] = 1.0;
            }
            Ok(IpStatus::Optimal(IpSolution::new(program.objective_at(&x), x)))
        }
    }

    /// Finds no pattern at all.
    struct NoPattern;

    impl IpEngine for NoPattern {
        fn name(&self) -> &str {
            "NoPattern"
        }

        fn solve_ip(&mut self, _: &BinaryProgram) -> Result<IpStatus, EngineError> {
            Ok(IpStatus::Infeasible)
        }
    }

    /// Fails every solve.
    struct Broken;

    impl LpEngine for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        fn solve_lp(&mut self, _: &LinearProgram) -> Result<LpStatus, EngineError> {
            Err(EngineError::Numerical("singular basis".to_string()))
        }
    }

    impl IpEngine for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        fn solve_ip(&mut self, _: &BinaryProgram) -> Result<IpStatus, EngineError> {
            Err(EngineError::Backend("license expired".to_string()))
        }
    }

    /// Records every master objective of the node.
    #[derive(Default)]
    struct ObjectiveRecorder {
        objectives: Vec<f64>,
        columns: usize,
        exits: usize,
    }

    impl ColumnGenerationMonitor for ObjectiveRecorder {
        fn name(&self) -> &str {
            "ObjectiveRecorder"
        }
        fn on_enter_node(&mut self, _: &BranchNode, _: &ColumnGenerationStatistics) {}
        fn on_master_solved(&mut self, objective: Option<f64>, _: &ColumnGenerationStatistics) {
            if let Some(obj) = objective {
                self.objectives.push(obj);
            }
        }
        fn on_column_added(&mut self, _: &Column, rc: f64, _: &ColumnGenerationStatistics) {
            assert!(rc < 0.0);
            self.columns += 1;
        }
        fn on_prune(&mut self, _: f64, _: f64, _: &ColumnGenerationStatistics) {}
        fn on_exit_node(&mut self, _: &NodeOutcome, _: &ColumnGenerationStatistics) {
            self.exits += 1;
        }
    }

    #[test]
    fn test_small_instance_is_integral_at_the_root() {
        let data = data(5, &[2, 3, 5]);
        let mut engine = BranchAndPrice::highs(&data);

        let outcome = engine.solve(&BranchNode::root()).expect("solve");
        let NodeOutcome::Integral(found) = &outcome else {
            panic!("expected an integral outcome, got {}", outcome);
        };
        assert_eq!(found, &packing(&[&[0, 1], &[2]]));
        assert_eq!(outcome.as_sentinel(), (-1, -1));

        assert!((engine.master().objective().expect("objective") - 2.0).abs() <= EPS);
        assert_eq!(engine.incumbent_value(), 2.0);
        assert_eq!(engine.best_packing().as_ref(), Some(found));
        assert_eq!(engine.statistics().integral_nodes, 1);
        assert_eq!(engine.statistics().incumbent_updates, 1);
        assert!(engine.pool().len() > 3);
        assert_partition(&engine);
    }

    #[test]
    fn test_symmetric_instance_reaches_two_bins() {
        let data = data(10, &[4, 4, 4, 6]);
        let mut engine = BranchAndPrice::highs(&data);

        let outcome = engine.solve(&BranchNode::root()).expect("solve");
        assert!((engine.master().objective().expect("objective") - 2.0).abs() <= EPS);
        assert_partition(&engine);

        match outcome {
            NodeOutcome::Branch(pair) => {
                let light = [(0, 1), (0, 2), (1, 2)].map(|(i, j)| ItemPair::from_raw(i, j));
                assert!(light.contains(&pair), "unexpected pair {}", pair);
                let z = CoOccurrence::from_solution(
                    engine.pool(),
                    engine.fractional_solution().expect("solution"),
                    Tolerance::default(),
                );
                let value = z.get(pair);
                assert!(value > EPS && value < 1.0 - EPS);
                assert!(engine.incumbent_value().is_infinite());
            }
            NodeOutcome::Integral(found) => {
                assert_eq!(found.num_bins(), 2);
                assert!(found.is_feasible_for(&data));
            }
            other => panic!("unexpected outcome {}", other),
        }
    }

    #[test]
    fn test_separated_pair_keeps_singletons() {
        let data = data(5, &[5, 5]);
        let mut engine = BranchAndPrice::highs(&data);
        let node = BranchNode::root().child_separate(ItemPair::from_raw(0, 1));

        let outcome = engine.solve(&node).expect("solve");
        assert_eq!(outcome, NodeOutcome::Integral(packing(&[&[0], &[1]])));
        assert!((engine.master().objective().expect("objective") - 2.0).abs() <= EPS);
        assert_eq!(engine.pool().len(), 2);
    }

    #[test]
    fn test_objective_never_increases_within_a_node() {
        let data = data(10, &[3, 7, 5, 5, 2, 8, 6, 4]);
        let mut engine = BranchAndPrice::highs(&data);
        let mut recorder = ObjectiveRecorder::default();

        engine
            .solve_with_monitor(&BranchNode::root(), &mut recorder)
            .expect("solve");

        assert!(!recorder.objectives.is_empty());
        for window in recorder.objectives.windows(2) {
            assert!(window[1] <= window[0] + EPS, "{:?}", recorder.objectives);
        }
        assert_eq!(recorder.columns, engine.pool().len() - data.num_items());
        assert_eq!(recorder.exits, 1);
    }

    #[test]
    fn test_pool_only_grows_across_nodes() {
        let data = data(10, &[4, 4, 4, 6, 3, 7]);
        let mut engine = BranchAndPrice::highs(&data);
        let root = BranchNode::root();

        engine.solve(&root).expect("root");
        let mut size = engine.pool().len();

        let pair = ItemPair::from_raw(0, 1);
        for node in [root.child_together(pair), root.child_separate(pair)] {
            engine.solve(&node).expect("child");
            assert!(engine.pool().len() >= size);
            size = engine.pool().len();
            assert_partition(&engine);
        }
        assert_eq!(engine.statistics().nodes_solved, 3);
    }

    #[test]
    fn test_separated_columns_are_suppressed() {
        let data = data(5, &[2, 3, 5]);
        let mut engine = BranchAndPrice::highs(&data);
        engine.solve(&BranchNode::root()).expect("root");

        let pair = ItemPair::from_raw(0, 1);
        let outcome = engine
            .solve(&BranchNode::root().child_separate(pair))
            .expect("child");

        // {0, 1} is the only two-item pattern; with it gone the node needs
        // three bins and cannot beat the incumbent of two.
        let NodeOutcome::Pruned { bound } = outcome else {
            panic!("expected pruning, got {}", outcome);
        };
        assert!((bound - 3.0).abs() <= EPS);
        for (j, column) in engine.pool().generated() {
            if column.contains_both(pair) {
                assert_eq!(engine.master().upper_bound(j), 0.0);
            }
        }
        assert_eq!(engine.statistics().prunings_bound, 1);
    }

    #[test]
    fn test_root_is_never_pruned() {
        let data = data(5, &[2, 3, 5]);
        let mut incumbent = LocalIncumbent::new();
        assert!(incumbent.try_install(&packing(&[&[0, 1, 2]])));

        let mut engine = BranchAndPrice::highs(&data).with_incumbent(incumbent);
        let outcome = engine.solve(&BranchNode::root()).expect("solve");

        assert!(matches!(outcome, NodeOutcome::Integral(_)));
        // Two bins do not beat the planted single bin.
        assert_eq!(engine.incumbent_value(), 1.0);
        assert_eq!(engine.statistics().incumbent_updates, 0);
        assert_eq!(engine.statistics().prunings_bound, 0);

        let child = BranchNode::root().child_together(ItemPair::from_raw(0, 1));
        let outcome = engine.solve(&child).expect("child");
        assert!(matches!(outcome, NodeOutcome::Pruned { .. }));
    }

    #[test]
    fn test_invalid_node_is_rejected() {
        let data = data(5, &[2, 3, 5]);
        let mut engine = BranchAndPrice::highs(&data);
        let node = BranchNode::new(false, vec![ItemPair::from_raw(0, 7)], Vec::new());

        let err = engine.solve(&node).expect_err("invalid node");
        assert!(matches!(err, BranchAndPriceError::InvalidNode(_)));
        assert_eq!(engine.statistics().nodes_solved, 0);
        assert!(!engine.master().has_solution());
    }

    #[test]
    fn test_monitor_can_abort_a_node() {
        let data = data(5, &[2, 3, 5]);
        let mut engine = BranchAndPrice::highs(&data);
        let mut monitor = CompositeMonitor::new().with(IterationLimitMonitor::new(1));

        let err = engine
            .solve_with_monitor(&BranchNode::root(), &mut monitor)
            .expect_err("aborted");
        assert_eq!(
            err,
            BranchAndPriceError::Aborted("Iteration limit of 1 master solves reached".to_string())
        );
        assert_eq!(engine.pool().len(), 3);
        assert!(engine.incumbent_value().is_infinite());
        assert_eq!(engine.statistics().nodes_solved, 0);
        assert_eq!(engine.statistics().nodes_failed, 1);
    }

    #[test]
    fn test_infeasible_pricing_ends_the_node() {
        let data = data(5, &[2, 3, 5]);
        let mut engine = BranchAndPrice::new(&data, SingletonLp, NoPattern);

        let outcome = engine.solve(&BranchNode::root()).expect("solve");
        assert_eq!(outcome, NodeOutcome::PricingInfeasible);
        assert_eq!(outcome.as_sentinel(), (-1, -1));
        assert_eq!(outcome.branching_pair(), None);

        assert_eq!(engine.statistics().pricing_infeasible, 1);
        assert_eq!(engine.statistics().nodes_solved, 1);
        assert_eq!(engine.pool().len(), 3);
        assert!(engine.incumbent_value().is_infinite());
    }

    #[test]
    fn test_master_failure_reaches_the_caller() {
        let data = data(5, &[2, 3, 5]);
        let mut engine = BranchAndPrice::new(&data, Broken, NoPattern);

        let err = engine.solve(&BranchNode::root()).expect_err("engine error");
        assert_eq!(
            err,
            BranchAndPriceError::Engine(EngineError::Numerical("singular basis".to_string()))
        );
        assert_eq!(engine.statistics().nodes_solved, 0);
        assert_eq!(engine.statistics().nodes_failed, 1);
        assert!(!engine.master().has_solution());
    }

    #[test]
    fn test_pricing_failure_reaches_the_caller() {
        let data = data(5, &[2, 3, 5]);
        let mut engine = BranchAndPrice::new(&data, SingletonLp, Broken);

        let err = engine.solve(&BranchNode::root()).expect_err("engine error");
        assert_eq!(
            err,
            BranchAndPriceError::Engine(EngineError::Backend("license expired".to_string()))
        );
        assert_eq!(engine.statistics().master_solves, 1);
        assert_eq!(engine.statistics().nodes_failed, 1);
    }

    #[test]
    fn test_repeated_pattern_counts_as_converged() {
        let data = data(5, &[2, 3, 5]);
        let mut engine = BranchAndPrice::new(&data, SingletonLp, RepeatPattern(vec![0, 1]));

        let outcome = engine.solve(&BranchNode::root()).expect("solve");

        // {0, 1} is inserted once; the second answer repeats it and the
        // singleton solution is read as final.
        assert_eq!(engine.pool().len(), 4);
        assert_eq!(engine.statistics().duplicate_columns, 1);
        assert_eq!(engine.statistics().master_solves, 2);
        assert_eq!(engine.statistics().pricing_solves, 2);
        assert_eq!(outcome, NodeOutcome::Integral(packing(&[&[0], &[1], &[2]])));
        assert_eq!(engine.incumbent_value(), 3.0);
    }

    #[test]
    fn test_single_item_is_integral() {
        let data = data(5, &[4]);
        let mut engine = BranchAndPrice::highs(&data);
        let outcome = engine.solve(&BranchNode::root()).expect("solve");
        assert_eq!(outcome, NodeOutcome::Integral(packing(&[&[0]])));
    }

    #[test]
    fn test_cost_scale_does_not_change_the_bound() {
        let data = data(10, &[3, 7, 5, 5, 2, 8, 6, 4]);

        let mut plain = BranchAndPrice::highs(&data);
        plain.solve(&BranchNode::root()).expect("plain");

        let mut scaled = BranchAndPrice::highs(&data)
            .with_config(BranchAndPriceConfig::new().with_cost_scale(100.0));
        scaled.solve(&BranchNode::root()).expect("scaled");

        let a = plain.master().objective().expect("objective");
        let b = scaled.master().objective().expect("objective");
        assert!((a - b).abs() <= 1e-5, "{} vs {}", a, b);
    }

    #[test]
    fn test_engines_share_an_incumbent() {
        let first = data(5, &[2, 3, 5]);
        let second = data(5, &[2, 3, 5]);
        let shared = Arc::new(SharedIncumbent::new());

        let mut a = BranchAndPrice::highs(&first).with_incumbent(Arc::clone(&shared));
        a.solve(&BranchNode::root()).expect("a");
        assert_eq!(shared.upper_bound(), 2.0);

        // The second engine sees the bound and prunes a non-root node.
        let mut b = BranchAndPrice::highs(&second).with_incumbent(Arc::clone(&shared));
        let outcome = b
            .solve(&BranchNode::root().child_separate(ItemPair::from_raw(0, 1)))
            .expect("b");
        assert!(matches!(outcome, NodeOutcome::Pruned { .. }));
    }

    #[test]
    fn test_random_instances_satisfy_invariants() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..8 {
            let n = rng.random_range(2..=9);
            let weights: Vec<u32> = (0..n).map(|_| rng.random_range(1..=10)).collect();
            let data = data(10, &weights);
            let mut engine = BranchAndPrice::highs(&data);

            let outcome = engine.solve(&BranchNode::root()).expect("solve");
            let objective = engine.master().objective().expect("objective");
            let total: u32 = weights.iter().sum();
            assert!(objective >= f64::from(total) / 10.0 - EPS);
            assert!(objective <= n as f64 + EPS);
            assert_partition(&engine);

            match outcome {
                NodeOutcome::Integral(found) => {
                    assert!(found.is_feasible_for(&data));
                    assert!((found.num_bins() as f64 - objective).abs() <= EPS);
                }
                NodeOutcome::Branch(pair) => {
                    let z = CoOccurrence::from_solution(
                        engine.pool(),
                        engine.fractional_solution().expect("solution"),
                        Tolerance::default(),
                    );
                    let value = z.get(pair);
                    assert!(value > EPS && value < 1.0 - EPS);
                }
                other => panic!("unexpected root outcome {}", other),
            }
        }
    }

    #[test]
    fn test_reports_render_the_solution() {
        let data = data(5, &[2, 3, 5]);
        let mut engine = BranchAndPrice::highs(&data);
        engine.solve(&BranchNode::root()).expect("solve");

        let bins = engine.bin_report().to_string();
        assert!(bins.contains("0 1"));
        assert_eq!(engine.active_bins().len(), 2);
        assert!(!engine.solution_report().to_string().is_empty());
        assert!(engine.to_string().starts_with("BranchAndPrice(items: 3"));
    }
}
