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

//! End-to-end scenarios through the public solver API.

use rstest::rstest;
use serde_json::json;
use shuttle_model::{
    index::{GuestIndex, VehicleIndex},
    infeasibility::InfeasibilityReason,
    model::{Model, ModelBuilder},
};
use shuttle_solver::{
    api::{SolveRequest, SolveStatus, solve_request},
    config::{SolverBuilder, SolverConfig},
    outcome::{SolveError, SolveResult},
    solver::Solver,
};
use std::time::Duration;

fn solve(model: &Model) -> SolveResult {
    Solver::default().solve(model).result().clone()
}

#[test]
fn everyone_arriving_at_once_shares_one_trip() {
    let mut mb = ModelBuilder::new([9]);
    mb.set_max_wait(90).set_round_trip(240);
    for i in 0..9 {
        mb.add_guest(format!("g{i}"), format!("Guest {i}"), 0);
    }
    let model = mb.build().unwrap();

    let plan = Solver::default().solve(&model).into_proven().unwrap();
    assert_eq!(plan.trips_used(), 1);
    assert_eq!(plan.total_wait(), 0);
    assert_eq!(plan.trips()[0].departure(), 0);
    assert_eq!(plan.trips()[0].len(), 9);
}

#[rstest]
#[case::vehicle_back_in_time(600, true)]
#[case::short_round_trip(240, true)]
#[case::vehicle_still_out(601, false)]
#[case::long_round_trip(700, false)]
fn arrivals_far_apart(#[case] round_trip: i64, #[case] feasible: bool) {
    let mut mb = ModelBuilder::new([4]);
    mb.set_max_wait(90)
        .set_round_trip(round_trip)
        .add_guest("a", "A", 0)
        .add_guest("b", "B", 600);
    let result = solve(&mb.build().unwrap());

    if feasible {
        let SolveResult::Optimal(plan) = result else {
            panic!("expected an optimal plan, got {result}");
        };
        assert_eq!(plan.trips_used(), 2);
        assert_eq!(plan.total_wait(), 0);
        assert_eq!(plan.trips()[0].vehicle(), plan.trips()[1].vehicle());
    } else {
        assert_eq!(
            result,
            SolveResult::Infeasible(InfeasibilityReason::WindowTooTight)
        );
    }
}

#[test]
fn pinned_pair_on_single_seat_vehicle() {
    let mut mb = ModelBuilder::new([1, 4]);
    mb.set_max_wait(90)
        .add_guest("a", "A", 0)
        .add_guest("b", "B", 10)
        .set_together("a", "b", Some(0));
    assert_eq!(
        solve(&mb.build().unwrap()),
        SolveResult::Infeasible(InfeasibilityReason::CapacityInsufficient)
    );
}

#[rstest]
#[case::one_vehicle(1)]
#[case::two_vehicles(2)]
fn incompatible_pair_arriving_together(#[case] num_vehicles: usize) {
    let mut mb = ModelBuilder::new(vec![2; num_vehicles]);
    mb.set_max_wait(0)
        .add_guest("a", "A", 0)
        .add_guest("b", "B", 0)
        .add_incompatible_pair("a", "b");
    let result = solve(&mb.build().unwrap());

    match num_vehicles {
        1 => assert_eq!(
            result,
            SolveResult::Infeasible(InfeasibilityReason::VehicleReuseConflict)
        ),
        _ => {
            let SolveResult::Optimal(plan) = result else {
                panic!("expected an optimal plan, got {result}");
            };
            assert_eq!(plan.trips_used(), 2);
            assert_eq!(plan.total_wait(), 0);
            assert_ne!(plan.trips()[0].vehicle(), plan.trips()[1].vehicle());
        }
    }
}

#[test]
fn incompatible_pair_spaced_by_round_trip_shares_the_vehicle() {
    let mut mb = ModelBuilder::new([2]);
    mb.set_max_wait(0)
        .set_round_trip(30)
        .add_guest("a", "A", 0)
        .add_guest("b", "B", 30)
        .add_incompatible_pair("a", "b");
    let plan = Solver::default()
        .solve(&mb.build().unwrap())
        .into_proven()
        .unwrap();
    assert_eq!(plan.trips_used(), 2);
    assert!(
        plan.trips()
            .iter()
            .all(|t| t.vehicle() == VehicleIndex::new(0))
    );
}

#[test]
fn pinned_pair_rides_the_pinned_vehicle() {
    let mut mb = ModelBuilder::new([4, 4, 4]);
    mb.set_max_wait(20)
        .set_round_trip(15)
        .add_guest("a", "A", 0)
        .add_guest("b", "B", 5)
        .add_guest("c", "C", 12)
        .add_guest("d", "D", 22)
        .set_together("b", "d", Some(2));
    let model = mb.build().unwrap();
    let plan = Solver::default().solve(&model).into_proven().unwrap();

    let b = model.find_guest("b").unwrap();
    let d = model.find_guest("d").unwrap();
    let trip = plan.trip_of(b).unwrap();
    assert!(trip.guests().contains(&d));
    assert_eq!(trip.vehicle(), VehicleIndex::new(2));
    assert!(plan.verify(&model).is_ok());
}

#[test]
fn guest_after_horizon_is_window_too_tight() {
    let mut mb = ModelBuilder::new([4]);
    mb.set_max_wait(30)
        .set_time_horizon(Some(100))
        .add_guest("a", "A", 0)
        .add_guest("b", "B", 101);
    assert_eq!(
        solve(&mb.build().unwrap()),
        SolveResult::Infeasible(InfeasibilityReason::WindowTooTight)
    );
}

#[test]
fn waiting_for_a_partner_is_charged() {
    // a waits for its partner c; b fits on the same trip.
    let mut mb = ModelBuilder::new([3]);
    mb.set_max_wait(40)
        .add_guest("a", "A", 0)
        .add_guest("b", "B", 10)
        .add_guest("c", "C", 40)
        .set_together("a", "c", None);
    let plan = Solver::default()
        .solve(&mb.build().unwrap())
        .into_proven()
        .unwrap();
    assert_eq!(plan.trips_used(), 1);
    assert_eq!(plan.total_wait(), 40 + 30);
    assert_eq!(
        plan.trips()[0].guests(),
        &[GuestIndex::new(0), GuestIndex::new(1), GuestIndex::new(2)]
    );
}

#[test]
fn zero_time_limit_reports_timeout() {
    let mut mb = ModelBuilder::new([3, 3]);
    mb.set_max_wait(20).set_round_trip(25);
    for i in 0..12 {
        mb.add_guest(format!("g{i:02}"), format!("Guest {i}"), i * 7);
    }
    let model = mb.build().unwrap();
    let config = SolverBuilder::new().with_time_limit(Duration::ZERO).build();

    let outcome = Solver::new(config).solve(&model);
    assert_eq!(outcome.result(), &SolveResult::Unknown);
    match outcome.into_proven() {
        Err(SolveError::Timeout { best, reason }) => {
            assert!(best.is_none());
            assert_eq!(reason, "time limit reached");
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[test]
fn json_round_trip_through_solve_request() {
    let request: SolveRequest = serde_json::from_value(json!({
        "num_vehicles": 2,
        "capacity_per_vehicle": 3,
        "max_wait": 15,
        "round_trip": 60,
        "guests": [
            { "id": "ann", "name": "Ann", "arrival": 0 },
            { "id": "ben", "name": "Ben", "arrival": 5 },
            { "id": "cal", "name": "Cal", "arrival": 12 },
            { "id": "dee", "name": "Dee", "arrival": 14 }
        ],
        "incompatible_pairs": [["ann", "cal"]]
    }))
    .unwrap();

    let response = solve_request(&request, &SolverConfig::default()).unwrap();
    assert_eq!(response.status, SolveStatus::Ok);
    let plan = response.plan.unwrap();
    assert!(plan.proven_optimal);
    assert_eq!(plan.num_guests, 4);
    assert_eq!(
        plan.trips.iter().map(|t| t.num_guests).sum::<usize>(),
        4
    );
    assert_eq!(
        plan.total_wait,
        plan.trips
            .iter()
            .flat_map(|t| t.guests.iter().map(|g| g.wait))
            .sum::<i64>()
    );
    for trip in &plan.trips {
        assert!(trip.arrival_window[1] - trip.arrival_window[0] <= 15);
        assert_eq!(trip.departure, trip.arrival_window[1]);
    }
}

#[test]
fn malformed_json_request_never_reaches_the_solver() {
    let request: SolveRequest = serde_json::from_value(json!({
        "num_vehicles": 1,
        "capacity_per_vehicle": 2,
        "max_wait": 15,
        "guests": [
            { "id": "a", "arrival": 0 },
            { "id": "a", "arrival": 5 }
        ]
    }))
    .unwrap();
    let err = solve_request(&request, &SolverConfig::default()).unwrap_err();
    assert_eq!(err.field(), "guests.id");
}
