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

//! Branch-and-bound over guest groupings.
//!
//! This module implements a stateful search engine that places guests one
//! at a time, in arrival order, into trips. Every node either opens a new
//! trip for the next guest or lets the guest join an open one. The state is
//! mutated in place and restored through a trail; pending decisions live on
//! a frame-structured stack.
//!
//! At every node the engine:
//! 1. finds the trips that can no longer change and checks that they can
//!    still be given vehicles without overlap,
//! 2. bounds the objective from below by the committed wait plus the wait
//!    a pending together partner forces on its trip,
//! 3. asks the `DecisionBuilder` for the placements of the next guest.
//!
//! At a leaf, the vehicle scheduler assigns every trip and the grouping
//! becomes the new local best if it improves on it.
//!
//! The engine prunes a branch if its bound is at least the local best, or
//! strictly above the bound of the `IncumbentStore`. Leaving ties to the
//! local search keeps the result of parallel runs independent of timing.

use crate::{
    branching::decision::{Decision, DecisionBuilder, Placement},
    encoder::Encoding,
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    propagator::Propagator,
    result::{BnbSolverOutcome, BnbTerminationReason},
    scheduler::{TripSpec, VehicleScheduler},
    solution::Solution,
    stack::SearchStack,
    state::{PartialTrip, SearchState},
    stats::BnbSolverStatistics,
    trail::SearchTrail,
};
use tracing::{debug, trace};

/// The branch-and-bound engine. It owns the reusable search structures;
/// the order of exploration is delegated to a `DecisionBuilder`.
#[derive(Clone, Debug, Default)]
pub struct BnbSolver {
    trail: SearchTrail,
    stack: SearchStack,
    scheduler: VehicleScheduler,
    specs: Vec<TripSpec>,
}

impl BnbSolver {
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
            scheduler: VehicleScheduler::new(),
            specs: Vec::new(),
        }
    }

    /// Creates a solver with storage preallocated for the given instance size.
    ///
    /// # Note
    ///
    /// The solver grows its storage on demand; preallocating only moves the
    /// allocations to construction time.
    #[inline]
    pub fn preallocated(num_guests: usize, num_vehicles: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_guests),
            stack: SearchStack::preallocated(num_guests),
            scheduler: VehicleScheduler::preallocated(num_vehicles, num_guests),
            specs: Vec::with_capacity(num_guests),
        }
    }

    /// Searches the whole tree as a standalone, single-threaded solver.
    #[inline]
    pub fn solve<B, S>(&mut self, encoding: &Encoding, builder: &mut B, monitor: S) -> BnbSolverOutcome
    where
        B: DecisionBuilder,
        S: TreeSearchMonitor,
    {
        self.solve_internal(encoding, &[], builder, monitor, NoSharedIncumbent::new())
    }

    /// Searches the whole tree, pruning against and publishing to `incumbent`.
    #[inline]
    pub fn solve_with_incumbent<B, S>(
        &mut self,
        encoding: &Encoding,
        builder: &mut B,
        monitor: S,
        incumbent: &SharedIncumbent,
    ) -> BnbSolverOutcome
    where
        B: DecisionBuilder,
        S: TreeSearchMonitor,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(encoding, &[], builder, monitor, backing)
    }

    /// Searches only the subtree below `prefix`, the placements of the
    /// first `prefix.len()` guests in arrival order.
    ///
    /// A prefix that violates a constraint yields an infeasible outcome.
    #[inline]
    pub fn solve_with_prefix<B, S>(
        &mut self,
        encoding: &Encoding,
        prefix: &[Placement],
        builder: &mut B,
        monitor: S,
    ) -> BnbSolverOutcome
    where
        B: DecisionBuilder,
        S: TreeSearchMonitor,
    {
        self.solve_internal(encoding, prefix, builder, monitor, NoSharedIncumbent::new())
    }

    /// Searches the subtree below `prefix`, sharing bounds through `incumbent`.
    #[inline]
    pub fn solve_with_prefix_and_incumbent<B, S>(
        &mut self,
        encoding: &Encoding,
        prefix: &[Placement],
        builder: &mut B,
        monitor: S,
        incumbent: &SharedIncumbent,
    ) -> BnbSolverOutcome
    where
        B: DecisionBuilder,
        S: TreeSearchMonitor,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(encoding, prefix, builder, monitor, backing)
    }

    #[inline(always)]
    fn solve_internal<B, S, I>(
        &mut self,
        encoding: &Encoding,
        prefix: &[Placement],
        builder: &mut B,
        mut monitor: S,
        incumbent: I,
    ) -> BnbSolverOutcome
    where
        B: DecisionBuilder,
        S: TreeSearchMonitor,
        I: IncumbentStore,
    {
        let session =
            BnbSolverSearchSession::new(self, encoding, prefix, builder, &mut monitor, incumbent);
        let outcome = session.run();
        self.reset();
        outcome
    }

    /// Clears the logical state of the trail and stack, keeping their capacity.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
        self.specs.clear();
    }
}

#[inline]
fn trip_spec(encoding: &Encoding, trip: &PartialTrip) -> TripSpec {
    let pinned = if trip.carries_pair() {
        encoding.pinned_vehicle()
    } else {
        None
    };
    TripSpec::new(trip.max_arrival(), trip.len(), pinned)
}

/// A single search run.
struct BnbSolverSearchSession<'a, B, S, I> {
    solver: &'a mut BnbSolver,
    encoding: &'a Encoding,
    prefix: &'a [Placement],
    builder: &'a mut B,
    monitor: &'a mut S,
    incumbent: I,
    state: SearchState,
    best_key: i64,
    shared_bound: i64,
    best_solution: Option<Solution>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<B, S, I> std::fmt::Display for BnbSolverSearchSession<'_, B, S, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchSession(best_key: {}, state: {}, nodes: {})",
            self.best_key, self.state, self.stats.nodes_explored
        )
    }
}

impl<'a, B, S, I> BnbSolverSearchSession<'a, B, S, I>
where
    B: DecisionBuilder,
    S: TreeSearchMonitor,
    I: IncumbentStore,
{
    #[inline]
    fn new(
        solver: &'a mut BnbSolver,
        encoding: &'a Encoding,
        prefix: &'a [Placement],
        builder: &'a mut B,
        monitor: &'a mut S,
        incumbent: I,
    ) -> Self {
        let shared_bound = incumbent.upper_bound();
        Self {
            solver,
            encoding,
            prefix,
            builder,
            monitor,
            incumbent,
            state: SearchState::new(encoding.num_guests()),
            best_key: i64::MAX,
            shared_bound,
            best_solution: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome {
        self.monitor.on_enter_search(self.encoding, &self.stats);

        if !self.initialize() {
            self.stats.set_total_time(self.start_time.elapsed());
            self.monitor.on_exit_search(&self.stats);
            return self.finalize_result(BnbTerminationReason::InfeasibilityProven);
        }

        let termination_reason = loop {
            self.shared_bound = self.incumbent.upper_bound();
            self.monitor.on_step(&self.state, &self.stats);
            self.stats.on_step();

            if let SearchCommand::Terminate(msg) =
                self.monitor.search_command(&self.state, &self.stats)
            {
                break BnbTerminationReason::Aborted(msg);
            }

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break if self.best_solution.is_some() {
                        BnbTerminationReason::OptimalityProven
                    } else {
                        BnbTerminationReason::InfeasibilityProven
                    };
                }
                self.backtrack_step();
            } else {
                self.process_next_decision();
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    fn finalize_result(self, reason: BnbTerminationReason) -> BnbSolverOutcome {
        match (reason, self.best_solution) {
            (BnbTerminationReason::OptimalityProven, Some(solution)) => {
                BnbSolverOutcome::optimal(solution, self.stats)
            }
            (BnbTerminationReason::Aborted(msg), best) => {
                BnbSolverOutcome::aborted(best, msg, self.stats)
            }
            _ => BnbSolverOutcome::infeasible(self.stats),
        }
    }

    /// Applies the prefix, pushes the root frame and expands the root.
    ///
    /// Returns `false` if the prefix itself is infeasible.
    fn initialize(&mut self) -> bool {
        let n = self.encoding.num_guests();
        self.solver.trail.ensure_capacity(n);
        self.solver.stack.ensure_capacity(n);

        for &placement in self.prefix {
            if self.state.is_complete() {
                return false;
            }
            let Some(decision) = Decision::try_place(self.encoding, &self.state, placement) else {
                return false;
            };
            // Prefix placements sit below the root frame and are never undone.
            self.solver
                .trail
                .apply_decision(&mut self.state, &decision);
        }
        self.solver.trail.reset();

        self.solver.trail.push_frame(&self.state);
        self.solver.stack.push_frame();
        self.stats.on_node_explored();
        self.expand_node();
        true
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    #[inline(always)]
    fn is_dominated(&self, key: i64) -> bool {
        key >= self.best_key || key > self.shared_bound
    }

    #[inline(always)]
    fn prune(&mut self, reason: PruneReason) {
        match reason {
            PruneReason::Infeasible => self.stats.on_pruning_infeasible(),
            PruneReason::BoundDominated => self.stats.on_pruning_bound(),
        }
        trace!(reason = %reason, depth = self.state.next_position(), "pruned");
        self.monitor.on_prune(&self.state, reason, &self.stats);
    }

    #[inline(always)]
    fn process_next_decision(&mut self) {
        let Some(decision) = self.solver.stack.pop() else {
            return;
        };
        self.stats.on_decision_generated();

        let wait = self
            .state
            .committed_wait()
            .saturating_add(decision.wait_delta());
        let trips = self.state.num_trips() + usize::from(decision.opens_trip());
        if self.is_dominated(self.encoding.objective_key(wait, trips)) {
            self.prune(PruneReason::BoundDominated);
            return;
        }

        self.descend(decision);
    }

    #[inline(always)]
    fn descend(&mut self, decision: Decision) {
        self.solver.trail.push_frame(&self.state);
        self.solver
            .trail
            .apply_decision(&mut self.state, &decision);
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats
            .on_depth_update(self.solver.stack.depth() as u64);
        self.monitor
            .on_descend(&self.state, decision, &self.stats);

        self.expand_node();
    }

    /// Checks the current node and enqueues its children.
    ///
    /// A node that fails a check simply gets no children; the main loop
    /// backtracks out of it on the next step.
    fn expand_node(&mut self) {
        if self.state.is_complete() {
            self.handle_complete_solution();
            return;
        }

        let propagator = Propagator::new(self.encoding);
        let closed = propagator.count_closed(&self.state);
        if closed > self.state.closed_trips() {
            self.state.set_closed_trips(closed);
            if !self.schedule_closed_trips() {
                self.prune(PruneReason::Infeasible);
                return;
            }
        }

        let bound_wait = self
            .state
            .committed_wait()
            .saturating_add(propagator.remaining_wait_bound(&self.state));
        let lower_bound = self
            .encoding
            .objective_key(bound_wait, self.state.num_trips());
        self.monitor
            .on_lower_bound_computed(&self.state, lower_bound, &self.stats);
        if self.is_dominated(lower_bound) {
            self.prune(PruneReason::BoundDominated);
            return;
        }

        let decisions = self.builder.next_decisions(self.encoding, &self.state);
        let count_before = self.solver.stack.num_entries();
        self.solver.stack.extend(decisions);
        let added = self.solver.stack.num_entries() - count_before;
        self.monitor
            .on_decisions_enqueued(&self.state, added, &self.stats);
    }

    /// Returns `true` if the closed trips can be given vehicles.
    fn schedule_closed_trips(&mut self) -> bool {
        let propagator = Propagator::new(self.encoding);
        let next_arrival = self.encoding.arrival(self.state.next_position());
        let encoding = self.encoding;
        self.solver.specs.clear();
        self.solver.specs.extend(
            self.state
                .trips()
                .iter()
                .filter(|t| propagator.is_closed(t, Some(next_arrival)))
                .map(|t| trip_spec(encoding, t)),
        );
        self.solver
            .scheduler
            .schedule(encoding.capacities(), encoding.round_trip(), &self.solver.specs)
            .is_some()
    }

    fn handle_complete_solution(&mut self) {
        let key = self
            .encoding
            .objective_key(self.state.committed_wait(), self.state.num_trips());
        if self.is_dominated(key) {
            self.prune(PruneReason::BoundDominated);
            return;
        }

        let encoding = self.encoding;
        self.solver.specs.clear();
        self.solver
            .specs
            .extend(self.state.trips().iter().map(|t| trip_spec(encoding, t)));

        let Some(vehicles) = self.solver.scheduler.schedule(
            encoding.capacities(),
            encoding.round_trip(),
            &self.solver.specs,
        ) else {
            self.prune(PruneReason::Infeasible);
            return;
        };

        let solution = Solution::from_state(encoding, &self.state, vehicles);
        debug!(
            key,
            total_wait = solution.total_wait(),
            trips = solution.num_trips(),
            nodes = self.stats.nodes_explored,
            "found improving solution"
        );
        self.best_key = key;
        self.incumbent.on_solution_found(&solution);
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&solution, &self.stats);
        self.best_solution = Some(solution);
    }
}
