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

//! Turns a search solution into the plan handed to callers.
//!
//! Trips are listed by departure. Trips that depart together keep the order
//! in which the search opened them, and are renumbered from zero.

use shuttle_bnb::solution::Solution;
use shuttle_model::{
    index::TripIndex,
    plan::{Plan, PlannedTrip},
};

/// Builds the plan for `solution`.
pub fn build_plan(solution: &Solution) -> Plan {
    let mut order: Vec<usize> = (0..solution.num_trips()).collect();
    order.sort_by_key(|&t| solution.trips()[t].departure());

    let trips = order
        .into_iter()
        .enumerate()
        .map(|(index, t)| {
            let trip = &solution.trips()[t];
            PlannedTrip::new(
                TripIndex::new(index),
                trip.vehicle(),
                trip.departure(),
                trip.guests().iter().copied(),
            )
        })
        .collect();

    Plan::new(trips, solution.objective())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuttle_bnb::solution::SolvedTrip;
    use shuttle_model::{
        index::{GuestIndex, VehicleIndex},
        objective::Objective,
    };

    fn trip(departure: i64, vehicle: usize, guests: &[usize]) -> SolvedTrip {
        SolvedTrip::new(
            departure,
            VehicleIndex::new(vehicle),
            guests.iter().map(|&g| GuestIndex::new(g)).collect(),
        )
    }

    #[test]
    fn test_trips_sorted_by_departure_and_renumbered() {
        let solution = Solution::new(
            0,
            Objective::new(15, 3),
            vec![trip(30, 0, &[2]), trip(10, 1, &[0, 1]), trip(30, 1, &[3])],
        );
        let plan = build_plan(&solution);

        let departures: Vec<i64> = plan.trips().iter().map(|t| t.departure()).collect();
        assert_eq!(departures, vec![10, 30, 30]);
        for (i, t) in plan.trips().iter().enumerate() {
            assert_eq!(t.index(), TripIndex::new(i));
        }
        // Equal departures keep their creation order.
        assert_eq!(plan.trips()[1].guests(), &[GuestIndex::new(2)]);
        assert_eq!(plan.trips()[2].guests(), &[GuestIndex::new(3)]);
        assert_eq!(plan.objective(), Objective::new(15, 3));
    }

    #[test]
    fn test_empty_solution_gives_empty_plan() {
        let plan = build_plan(&Solution::new(0, Objective::default(), Vec::new()));
        assert_eq!(plan, Plan::empty());
    }

    #[test]
    fn test_guest_order_is_kept() {
        let solution = Solution::new(0, Objective::new(0, 1), vec![trip(5, 0, &[4, 1])]);
        let plan = build_plan(&solution);
        assert_eq!(
            plan.trips()[0].guests(),
            &[GuestIndex::new(4), GuestIndex::new(1)]
        );
    }
}
