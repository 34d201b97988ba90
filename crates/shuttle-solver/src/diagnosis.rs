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

//! Classifying why an instance has no plan.
//!
//! Each relaxation lifts one family of restrictions. The first relaxed copy
//! that becomes feasible names the restriction to blame. Relaxations are
//! tried in the order of [`Relaxation::ALL`], each with a feasibility search
//! that stops at the first plan.

use shuttle_bnb::{
    bnb::BnbSolver,
    branching::join_first::JoinFirstBuilder,
    encoder::Encoding,
    monitor::{
        composite::CompositeSearchMonitor, interrupt::InterruptMonitor,
        solution_limit::SolutionLimitMonitor, time_limit::TimeLimitMonitor,
    },
    propagator::Propagator,
    result::SolverResult,
};
use shuttle_model::{
    infeasibility::InfeasibilityReason, model::Model, objective::TieBreak, relax::Relaxation,
};
use std::{
    sync::{Arc, atomic::AtomicBool},
    time::Instant,
};
use tracing::debug;

/// The reason reported when `relaxation` is the first to restore feasibility.
#[inline]
pub fn attributed_reason(relaxation: Relaxation) -> InfeasibilityReason {
    match relaxation {
        Relaxation::Window => InfeasibilityReason::WindowTooTight,
        Relaxation::Capacity => InfeasibilityReason::CapacityInsufficient,
        Relaxation::Pin | Relaxation::VehicleReuse => InfeasibilityReason::VehicleReuseConflict,
    }
}

/// Limits shared by the feasibility searches of one diagnosis.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisLimits {
    deadline: Option<Instant>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl DiagnosisLimits {
    #[inline]
    pub fn new(deadline: Option<Instant>, interrupt: Option<Arc<AtomicBool>>) -> Self {
        Self {
            deadline,
            interrupt,
        }
    }

    fn monitor(&self) -> CompositeSearchMonitor<'static> {
        let mut monitor = CompositeSearchMonitor::with_capacity(3);
        monitor.add_monitor(SolutionLimitMonitor::new(1));
        if let Some(deadline) = self.deadline {
            monitor.add_monitor(TimeLimitMonitor::until(deadline));
        }
        if let Some(flag) = &self.interrupt {
            monitor.add_monitor(InterruptMonitor::new(Arc::clone(flag)));
        }
        monitor
    }
}

/// Classifies an infeasible `model`.
///
/// Returns `NoFeasibleAssignment` if no single relaxation restores
/// feasibility, or if the limits stop a feasibility search before it
/// decides.
pub fn diagnose(model: &Model, limits: &DiagnosisLimits) -> InfeasibilityReason {
    let mut solver = BnbSolver::preallocated(model.num_guests(), model.num_vehicles());
    let mut builder = JoinFirstBuilder::preallocated(model.num_guests());

    for relaxation in Relaxation::ALL {
        if relaxation == Relaxation::Pin && model.together().and_then(|r| r.vehicle()).is_none() {
            continue;
        }

        let relaxed = model.relaxed(relaxation);
        let encoding = Encoding::new(&relaxed, TieBreak::WaitOnly);
        if let Some(reason) = Propagator::new(&encoding).precheck() {
            debug!(%relaxation, %reason, "relaxation still fails the precheck");
            continue;
        }

        let outcome = solver.solve(&encoding, &mut builder, limits.monitor());
        match outcome.result() {
            SolverResult::Optimal(_) | SolverResult::Feasible(_) => {
                debug!(%relaxation, "relaxation restores feasibility");
                return attributed_reason(relaxation);
            }
            SolverResult::Infeasible => {
                debug!(%relaxation, "relaxation is still infeasible");
            }
            SolverResult::Unknown => {
                debug!(%relaxation, reason = %outcome.termination_reason(), "diagnosis stopped");
                break;
            }
        }
    }

    InfeasibilityReason::NoFeasibleAssignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuttle_model::model::ModelBuilder;

    fn diagnose_unlimited(model: &Model) -> InfeasibilityReason {
        diagnose(model, &DiagnosisLimits::default())
    }

    #[test]
    fn test_spread_beyond_window_on_single_vehicle() {
        let mut mb = ModelBuilder::new([4]);
        mb.set_max_wait(90)
            .set_round_trip(700)
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 600);
        assert_eq!(
            diagnose_unlimited(&mb.build().unwrap()),
            InfeasibilityReason::WindowTooTight
        );
    }

    #[test]
    fn test_simultaneous_trips_on_single_vehicle() {
        let mut mb = ModelBuilder::new([2]);
        mb.add_guest("a", "A", 0)
            .add_guest("b", "B", 0)
            .add_incompatible_pair("a", "b");
        assert_eq!(
            diagnose_unlimited(&mb.build().unwrap()),
            InfeasibilityReason::VehicleReuseConflict
        );
    }

    #[test]
    fn test_crowd_larger_than_fleet() {
        // Three guests at once, two seats, and no time to come back.
        let mut mb = ModelBuilder::new([2]);
        mb.add_guest("a", "A", 0)
            .add_guest("b", "B", 0)
            .add_guest("c", "C", 0);
        assert_eq!(
            diagnose_unlimited(&mb.build().unwrap()),
            InfeasibilityReason::CapacityInsufficient
        );
    }

    #[test]
    fn test_pinned_vehicle_busy() {
        // The pair must ride vehicle 0, which is still out with c's trip.
        let mut mb = ModelBuilder::new([1, 2]);
        mb.set_max_wait(0)
            .set_round_trip(100)
            .add_guest("c", "C", 0)
            .add_guest("a", "A", 50)
            .add_guest("b", "B", 50)
            .add_guest("d", "D", 50)
            .set_together("a", "b", Some(1))
            .add_incompatible_pair("a", "d")
            .add_incompatible_pair("b", "d");
        let model = mb.build().unwrap();
        assert_eq!(diagnose_unlimited(&model), InfeasibilityReason::VehicleReuseConflict);
    }

    #[test]
    fn test_expired_deadline_gives_generic_reason() {
        let mut mb = ModelBuilder::new([2]);
        mb.add_guest("a", "A", 0)
            .add_guest("b", "B", 0)
            .add_incompatible_pair("a", "b");
        let limits = DiagnosisLimits::new(Some(Instant::now()), None);
        assert_eq!(
            diagnose(&mb.build().unwrap(), &limits),
            InfeasibilityReason::NoFeasibleAssignment
        );
    }

    #[test]
    fn test_attribution_table() {
        assert_eq!(
            attributed_reason(Relaxation::Window),
            InfeasibilityReason::WindowTooTight
        );
        assert_eq!(
            attributed_reason(Relaxation::Capacity),
            InfeasibilityReason::CapacityInsufficient
        );
        assert_eq!(
            attributed_reason(Relaxation::Pin),
            InfeasibilityReason::VehicleReuseConflict
        );
        assert_eq!(
            attributed_reason(Relaxation::VehicleReuse),
            InfeasibilityReason::VehicleReuseConflict
        );
    }
}
