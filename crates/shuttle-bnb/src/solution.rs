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

use crate::{encoder::Encoding, state::SearchState};
use shuttle_model::{
    index::{GuestIndex, VehicleIndex},
    model::Minutes,
    objective::Objective,
};
use smallvec::SmallVec;

/// One trip of a complete grouping, in model terms.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SolvedTrip {
    departure: Minutes,
    vehicle: VehicleIndex,
    guests: SmallVec<GuestIndex, 8>,
}

impl SolvedTrip {
    #[inline]
    pub fn new(departure: Minutes, vehicle: VehicleIndex, guests: SmallVec<GuestIndex, 8>) -> Self {
        Self {
            departure,
            vehicle,
            guests,
        }
    }

    #[inline]
    pub fn departure(&self) -> Minutes {
        self.departure
    }

    #[inline]
    pub fn vehicle(&self) -> VehicleIndex {
        self.vehicle
    }

    /// Guests of the trip, in arrival order.
    #[inline]
    pub fn guests(&self) -> &[GuestIndex] {
        &self.guests
    }
}

/// A complete grouping found by the search.
///
/// Trips are stored in the order the search created them, which is the
/// order of their first guest's arrival.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    key: i64,
    objective: Objective,
    trips: Vec<SolvedTrip>,
}

impl Solution {
    #[inline]
    pub fn new(key: i64, objective: Objective, trips: Vec<SolvedTrip>) -> Self {
        Self {
            key,
            objective,
            trips,
        }
    }

    /// Extracts the solution from a complete search state.
    ///
    /// `vehicles[t]` is the vehicle serving trip `t` of the state.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the state is not complete or `vehicles`
    /// does not have one entry per trip.
    pub fn from_state(encoding: &Encoding, state: &SearchState, vehicles: &[VehicleIndex]) -> Self {
        debug_assert!(
            state.is_complete(),
            "called `Solution::from_state` with an incomplete state: {} of {} guests placed",
            state.next_position(),
            state.num_guests()
        );
        debug_assert_eq!(
            vehicles.len(),
            state.num_trips(),
            "called `Solution::from_state` with {} vehicles for {} trips",
            vehicles.len(),
            state.num_trips()
        );

        let trips = state
            .trips()
            .iter()
            .zip(vehicles)
            .map(|(trip, &vehicle)| {
                SolvedTrip::new(
                    trip.max_arrival(),
                    vehicle,
                    trip.members().iter().map(|&p| encoding.guest_at(p)).collect(),
                )
            })
            .collect();

        let objective = Objective::new(state.committed_wait(), state.num_trips());
        Self {
            key: encoding.objective_key(objective.total_wait(), objective.trips_used()),
            objective,
            trips,
        }
    }

    /// The single integer the search minimizes.
    #[inline]
    pub fn key(&self) -> i64 {
        self.key
    }

    #[inline]
    pub fn objective(&self) -> Objective {
        self.objective
    }

    #[inline]
    pub fn total_wait(&self) -> Minutes {
        self.objective.total_wait()
    }

    #[inline]
    pub fn trips(&self) -> &[SolvedTrip] {
        &self.trips
    }

    #[inline]
    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }

    /// Consumes the solution and returns its trips.
    #[inline]
    pub fn into_trips(self) -> Vec<SolvedTrip> {
        self.trips
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution(key: {}, total_wait: {}, trips: {})",
            self.key,
            self.objective.total_wait(),
            self.trips.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trail::SearchTrail;
    use shuttle_model::{index::TripIndex, model::ModelBuilder, objective::TieBreak};

    #[test]
    fn test_from_state_maps_positions_back_to_guests() {
        let mut mb = ModelBuilder::new([3, 3]);
        mb.set_max_wait(20)
            .add_guest("late", "L", 15)
            .add_guest("early", "E", 0)
            .add_guest("mid", "M", 5);
        let enc = Encoding::new(&mb.build().unwrap(), TieBreak::FewerTrips);

        let mut state = SearchState::new(3);
        let mut trail = SearchTrail::new();
        trail.push_frame(&state);
        trail.apply_open(&mut state, 0, false, None);
        trail.push_frame(&state);
        trail.apply_join(&mut state, TripIndex::new(0), 5, false, None);
        trail.push_frame(&state);
        trail.apply_open(&mut state, 15, false, None);

        let solution = Solution::from_state(
            &enc,
            &state,
            &[VehicleIndex::new(1), VehicleIndex::new(0)],
        );
        assert_eq!(solution.total_wait(), 5);
        assert_eq!(solution.num_trips(), 2);
        // 5 * (3 + 1) + 2
        assert_eq!(solution.key(), 22);
        assert_eq!(
            solution.trips()[0].guests(),
            &[GuestIndex::new(1), GuestIndex::new(2)]
        );
        assert_eq!(solution.trips()[0].departure(), 5);
        assert_eq!(solution.trips()[1].vehicle(), VehicleIndex::new(0));
    }
}
