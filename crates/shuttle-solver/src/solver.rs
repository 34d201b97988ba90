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

//! # Orchestrated Solver
//!
//! Runs the complete pipeline for one model: encoding, pre-checks, the
//! branch-and-bound search (on one thread or several), plan construction,
//! verification and, for infeasible instances, diagnosis.
//!
//! ## Parallel search
//!
//! With more than one worker the tree is cut into the subtrees below every
//! feasible placement of the first `split_depth` guests. Workers take the
//! subtrees round-robin and share a `SharedIncumbent` to prune strictly
//! worse branches. Each subtree keeps its own first-found best, and the
//! merge picks the smallest `(objective key, subtree index)`, so the plan
//! equals the one a single worker returns.
//!
//! ## Usage
//!
//! ```rust
//! use shuttle_model::model::ModelBuilder;
//! use shuttle_solver::{config::SolverBuilder, solver::Solver};
//!
//! let mut builder = ModelBuilder::new([4]);
//! builder
//!     .set_max_wait(30)
//!     .add_guest("a", "Ada", 0)
//!     .add_guest("b", "Bo", 20);
//! let model = builder.build().unwrap();
//!
//! let solver = Solver::new(SolverBuilder::new().with_num_workers(2).build());
//! let plan = solver.solve(&model).into_proven().unwrap();
//! assert_eq!(plan.total_wait(), 20);
//! assert_eq!(plan.trips_used(), 1);
//! ```

use crate::{
    builder::build_plan,
    config::SolverConfig,
    diagnosis::{DiagnosisLimits, diagnose},
    outcome::SolverOutcome,
    stats::{SolveStatistics, SolveStatisticsBuilder},
};
use shuttle_bnb::{
    bnb::BnbSolver,
    branching::{decision::Placement, join_first::JoinFirstBuilder},
    encoder::Encoding,
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeSearchMonitor, interrupt::InterruptMonitor, log::LogSearchMonitor,
        time_limit::TimeLimitMonitor,
    },
    partition::enumerate_prefixes,
    propagator::Propagator,
    result::{BnbTerminationReason, SolverResult},
    solution::Solution,
    stats::BnbSolverStatistics,
};
use shuttle_model::{infeasibility::InfeasibilityReason, model::Model, plan::Plan};
use std::{sync::Arc, time::Instant};
use tracing::{debug, error, info, warn};

/// What the search phase hands to the conclusion phase.
#[derive(Debug)]
struct SearchReport {
    best: Option<Solution>,
    /// `None` if the whole tree was explored.
    abort_reason: Option<String>,
    statistics: BnbSolverStatistics,
    workers_used: usize,
}

/// The result of searching one subtree.
#[derive(Debug)]
struct SubtreeRun {
    index: usize,
    result: SolverResult,
    reason: BnbTerminationReason,
    statistics: BnbSolverStatistics,
}

#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    #[inline]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves `model` to proven optimality, unless a configured limit or the
    /// interrupt flag stops it first.
    pub fn solve(&self, model: &Model) -> SolverOutcome {
        let start_time = Instant::now();
        let deadline = self
            .config
            .time_limit()
            .and_then(|limit| start_time.checked_add(limit));

        info!(
            guests = model.num_guests(),
            vehicles = model.num_vehicles(),
            workers = self.config.num_workers(),
            tie_break = %self.config.tie_break(),
            "solve started"
        );

        let outcome = self.solve_internal(model, start_time, deadline);

        let stats = outcome.statistics();
        info!(
            result = %outcome.result(),
            nodes = stats.nodes_explored,
            workers = stats.workers_used,
            elapsed = ?stats.solve_duration,
            "solve finished"
        );
        outcome
    }

    fn solve_internal(
        &self,
        model: &Model,
        start_time: Instant,
        deadline: Option<Instant>,
    ) -> SolverOutcome {
        if model.num_guests() == 0 {
            return SolverOutcome::optimal(
                Plan::empty(),
                Self::statistics(&BnbSolverStatistics::default(), 1, start_time),
            );
        }

        let encoding = Encoding::new(model, self.config.tie_break());
        if let Some(reason) = Propagator::new(&encoding).precheck() {
            debug!(%reason, "precheck proved infeasibility");
            return SolverOutcome::infeasible(
                reason,
                Self::statistics(&BnbSolverStatistics::default(), 1, start_time),
            );
        }

        let report = if self.config.num_workers() > 1 {
            self.search_parallel(&encoding, deadline)
        } else {
            self.search_sequential(&encoding, deadline)
        };
        self.conclude(model, report, start_time, deadline)
    }

    /// The monitors every search run gets: the deadline and the interrupt flag.
    fn limit_monitor(&self, deadline: Option<Instant>) -> CompositeSearchMonitor<'static> {
        let mut monitor = CompositeSearchMonitor::with_capacity(3);
        if let Some(deadline) = deadline {
            monitor.add_monitor(TimeLimitMonitor::until(deadline));
        }
        if let Some(flag) = self.config.interrupt() {
            monitor.add_monitor(InterruptMonitor::new(Arc::clone(flag)));
        }
        monitor
    }

    fn search_sequential(&self, encoding: &Encoding, deadline: Option<Instant>) -> SearchReport {
        let n = encoding.num_guests();
        let mut solver = BnbSolver::preallocated(n, encoding.num_vehicles());
        let mut builder = JoinFirstBuilder::preallocated(n);
        let monitor = self
            .limit_monitor(deadline)
            .with_monitor(LogSearchMonitor::default());

        let (result, reason, statistics) = solver
            .solve(encoding, &mut builder, monitor)
            .into_parts();
        SearchReport {
            best: result.into_solution(),
            abort_reason: match reason {
                BnbTerminationReason::Aborted(msg) => Some(msg),
                _ => None,
            },
            statistics,
            workers_used: 1,
        }
    }

    fn search_parallel(&self, encoding: &Encoding, deadline: Option<Instant>) -> SearchReport {
        let prefixes = enumerate_prefixes(
            encoding,
            self.config.split_depth(),
            &mut JoinFirstBuilder::new(),
        );
        let num_workers = self.config.num_workers().min(prefixes.len()).max(1);
        debug!(
            subtrees = prefixes.len(),
            workers = num_workers,
            "split search tree"
        );

        let incumbent = SharedIncumbent::new();
        let mut runs: Vec<SubtreeRun> = std::thread::scope(|scope| {
            let prefixes = &prefixes;
            let incumbent = &incumbent;
            let handles: Vec<_> = (0..num_workers)
                .map(|worker| {
                    scope.spawn(move || {
                        self.run_worker(encoding, prefixes, worker, num_workers, incumbent, deadline)
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });
        runs.sort_by_key(|run| run.index);

        let mut statistics = BnbSolverStatistics::default();
        for run in &runs {
            statistics.absorb(&run.statistics);
        }

        let abort_reason = runs
            .iter()
            .find_map(|run| match &run.reason {
                BnbTerminationReason::Aborted(msg) => Some(msg.clone()),
                _ => None,
            })
            .or_else(|| (runs.len() < prefixes.len()).then(|| "search stopped".to_string()));

        let best = runs
            .into_iter()
            .filter_map(|run| {
                let index = run.index;
                run.result.into_solution().map(|s| (s.key(), index, s))
            })
            .min_by_key(|&(key, index, _)| (key, index))
            .map(|(_, _, solution)| solution);

        SearchReport {
            best,
            abort_reason,
            statistics,
            workers_used: num_workers,
        }
    }

    /// Solves the subtrees `worker`, `worker + stride`, ... in order.
    ///
    /// Stops after the first aborted subtree; the remaining ones are left
    /// unexplored.
    fn run_worker(
        &self,
        encoding: &Encoding,
        prefixes: &[Vec<Placement>],
        worker: usize,
        stride: usize,
        incumbent: &SharedIncumbent,
        deadline: Option<Instant>,
    ) -> Vec<SubtreeRun> {
        let n = encoding.num_guests();
        let mut solver = BnbSolver::preallocated(n, encoding.num_vehicles());
        let mut builder = JoinFirstBuilder::preallocated(n);
        let mut runs = Vec::new();

        for (index, prefix) in prefixes.iter().enumerate().skip(worker).step_by(stride) {
            let (result, reason, statistics) = solver
                .solve_with_prefix_and_incumbent(
                    encoding,
                    prefix,
                    &mut builder,
                    self.limit_monitor(deadline),
                    incumbent,
                )
                .into_parts();
            let aborted = matches!(reason, BnbTerminationReason::Aborted(_));
            runs.push(SubtreeRun {
                index,
                result,
                reason,
                statistics,
            });
            if aborted {
                break;
            }
        }

        debug!(worker, subtrees = runs.len(), "worker finished");
        runs
    }

    fn conclude(
        &self,
        model: &Model,
        report: SearchReport,
        start_time: Instant,
        deadline: Option<Instant>,
    ) -> SolverOutcome {
        let SearchReport {
            best,
            abort_reason,
            statistics,
            workers_used,
        } = report;

        let plan = match best.map(|solution| build_plan(&solution)) {
            Some(plan) => match plan.verify(model) {
                Ok(()) => Some(plan),
                Err(violation) => {
                    error!(%violation, "plan failed verification");
                    return SolverOutcome::verification_failed(
                        violation,
                        Self::statistics(&statistics, workers_used, start_time),
                    );
                }
            },
            None => None,
        };

        match (plan, abort_reason) {
            (Some(plan), None) => SolverOutcome::optimal(
                plan,
                Self::statistics(&statistics, workers_used, start_time),
            ),
            (plan, Some(reason)) => {
                warn!(%reason, has_plan = plan.is_some(), "search stopped before completion");
                SolverOutcome::aborted(
                    plan,
                    reason,
                    Self::statistics(&statistics, workers_used, start_time),
                )
            }
            (None, None) => {
                let reason = if self.config.diagnose() {
                    let limits = DiagnosisLimits::new(deadline, self.config.interrupt().cloned());
                    diagnose(model, &limits)
                } else {
                    InfeasibilityReason::NoFeasibleAssignment
                };
                SolverOutcome::infeasible(
                    reason,
                    Self::statistics(&statistics, workers_used, start_time),
                )
            }
        }
    }

    #[inline]
    fn statistics(
        search: &BnbSolverStatistics,
        workers_used: usize,
        start_time: Instant,
    ) -> SolveStatistics {
        SolveStatisticsBuilder::new()
            .search(search)
            .workers_used(workers_used)
            .solve_duration(start_time.elapsed())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SolverBuilder,
        outcome::{SolveResult, TerminationReason},
    };
    use shuttle_model::model::ModelBuilder;
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };

    fn staggered_model() -> Model {
        let mut mb = ModelBuilder::new([3, 3, 2]);
        mb.set_max_wait(25).set_round_trip(30);
        for (i, arrival) in [0, 4, 9, 15, 22, 30, 41, 47, 55].into_iter().enumerate() {
            mb.add_guest(format!("g{i}"), format!("Guest {i}"), arrival);
        }
        mb.add_incompatible_pair("g1", "g2")
            .set_together("g3", "g5", None);
        mb.build().unwrap()
    }

    #[test]
    fn test_empty_model_is_optimal_with_no_trips() {
        let model = ModelBuilder::new([2]).build().unwrap();
        let outcome = Solver::default().solve(&model);
        assert_eq!(outcome.result(), &SolveResult::Optimal(Plan::empty()));
    }

    #[test]
    fn test_precheck_short_circuits() {
        let mut mb = ModelBuilder::new([1, 1]);
        mb.add_guest("a", "A", 0)
            .add_guest("b", "B", 0)
            .set_together("a", "b", None);
        let outcome = Solver::default().solve(&mb.build().unwrap());
        assert_eq!(
            outcome.result(),
            &SolveResult::Infeasible(InfeasibilityReason::CapacityInsufficient)
        );
        assert_eq!(outcome.statistics().nodes_explored, 0);
    }

    #[test]
    fn test_parallel_equals_sequential() {
        let model = staggered_model();
        let sequential = Solver::default().solve(&model);
        for workers in [2, 3, 8] {
            let config = SolverBuilder::new()
                .with_num_workers(workers)
                .with_split_depth(3)
                .build();
            let parallel = Solver::new(config).solve(&model);
            assert!(parallel.is_optimal());
            assert_eq!(parallel.result(), sequential.result(), "workers = {workers}");
        }
    }

    #[test]
    fn test_disabled_diagnosis_reports_generic_reason() {
        let mut mb = ModelBuilder::new([2]);
        mb.add_guest("a", "A", 0)
            .add_guest("b", "B", 0)
            .add_incompatible_pair("a", "b");
        let model = mb.build().unwrap();

        let diagnosed = Solver::default().solve(&model);
        assert_eq!(
            diagnosed.result(),
            &SolveResult::Infeasible(InfeasibilityReason::VehicleReuseConflict)
        );

        let config = SolverBuilder::new().with_diagnosis(false).build();
        let plain = Solver::new(config).solve(&model);
        assert_eq!(
            plain.result(),
            &SolveResult::Infeasible(InfeasibilityReason::NoFeasibleAssignment)
        );
    }

    #[test]
    fn test_raised_interrupt_stops_immediately() {
        let flag = Arc::new(AtomicBool::new(false));
        flag.store(true, Ordering::Relaxed);
        let config = SolverBuilder::new().with_interrupt(flag).build();
        let outcome = Solver::new(config).solve(&staggered_model());
        assert_eq!(outcome.result(), &SolveResult::Unknown);
        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::Aborted(_)
        ));
    }

    #[test]
    fn test_unverifiable_solution_is_withheld() {
        use shuttle_bnb::solution::SolvedTrip;
        use shuttle_model::{
            index::{GuestIndex, VehicleIndex},
            objective::Objective,
            verify::PlanViolation,
        };

        let mut mb = ModelBuilder::new([2]);
        mb.set_max_wait(10)
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 10);
        let model = mb.build().unwrap();

        // Guest b is on no trip.
        let trip = SolvedTrip::new(0, VehicleIndex::new(0), [GuestIndex::new(0)].into_iter().collect());
        let report = SearchReport {
            best: Some(Solution::new(0, Objective::new(0, 1), vec![trip])),
            abort_reason: None,
            statistics: BnbSolverStatistics::default(),
            workers_used: 1,
        };

        let outcome = Solver::default().conclude(&model, report, Instant::now(), None);
        assert_eq!(outcome.result(), &SolveResult::Unknown);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::VerificationFailed(PlanViolation::GuestMissing {
                guest: GuestIndex::new(1)
            })
        );
    }

    #[test]
    fn test_zero_time_limit_is_not_proven() {
        let config = SolverBuilder::new()
            .with_time_limit(Duration::ZERO)
            .with_num_workers(2)
            .build();
        let outcome = Solver::new(config).solve(&staggered_model());
        assert!(!outcome.is_optimal());
        assert!(outcome.into_proven().is_err());
    }
}
