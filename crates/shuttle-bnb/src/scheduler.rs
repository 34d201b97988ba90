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

//! Trip-to-vehicle assignment for a fixed grouping.
//!
//! Once the guests of a trip are fixed, so is its departure. What remains
//! is an interval assignment problem: every trip occupies a vehicle for
//! `[departure, departure + round_trip)`, and trips on one vehicle must not
//! overlap. The scheduler walks the trips by departure and tries, for each,
//! the vehicle that has been free the longest first.
//!
//! With a uniform fleet the first choice never fails if any does. With
//! mixed capacities or a pinned vehicle it can, so the scheduler backtracks.
//! Two free vehicles of equal capacity are interchangeable for every later
//! trip, so only one of them is tried; the pinned vehicle is always tried on
//! its own.

use shuttle_model::{index::VehicleIndex, model::Minutes};
use smallvec::SmallVec;

/// A trip as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripSpec {
    pub departure: Minutes,
    pub size: usize,
    /// The vehicle this trip must use, if any.
    pub pinned: Option<VehicleIndex>,
}

impl TripSpec {
    #[inline]
    pub fn new(departure: Minutes, size: usize, pinned: Option<VehicleIndex>) -> Self {
        Self {
            departure,
            size,
            pinned,
        }
    }
}

impl std::fmt::Display for TripSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.pinned {
            Some(v) => write!(
                f,
                "TripSpec(departure: {}, size: {}, pinned: {})",
                self.departure, self.size, v
            ),
            None => write!(
                f,
                "TripSpec(departure: {}, size: {})",
                self.departure, self.size
            ),
        }
    }
}

/// Exact backtracking assignment of trips to vehicles.
///
/// The scheduler owns its buffers so that repeated calls during a search do
/// not allocate once they have grown to the instance size.
#[derive(Debug, Clone, Default)]
pub struct VehicleScheduler {
    order: Vec<usize>,
    free_at: Vec<Minutes>,
    assignment: Vec<VehicleIndex>,
    pinned_vehicle: Option<usize>,
}

impl VehicleScheduler {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn preallocated(num_vehicles: usize, num_trips: usize) -> Self {
        Self {
            order: Vec::with_capacity(num_trips),
            free_at: Vec::with_capacity(num_vehicles),
            assignment: Vec::with_capacity(num_trips),
            pinned_vehicle: None,
        }
    }

    /// Assigns every trip to a vehicle.
    ///
    /// Returns the vehicle of each trip, in the order of `trips`, or `None`
    /// if no assignment keeps every vehicle's trips apart by `round_trip`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shuttle_bnb::scheduler::{TripSpec, VehicleScheduler};
    ///
    /// let mut scheduler = VehicleScheduler::new();
    /// let trips = [TripSpec::new(0, 3, None), TripSpec::new(100, 3, None)];
    /// assert!(scheduler.schedule(&[4], 240, &trips).is_none());
    /// assert!(scheduler.schedule(&[4, 4], 240, &trips).is_some());
    /// ```
    pub fn schedule(
        &mut self,
        capacities: &[usize],
        round_trip: Minutes,
        trips: &[TripSpec],
    ) -> Option<&[VehicleIndex]> {
        self.order.clear();
        self.order.extend(0..trips.len());
        self.order.sort_by(|&a, &b| {
            trips[a]
                .departure
                .cmp(&trips[b].departure)
                .then_with(|| a.cmp(&b))
        });

        self.free_at.clear();
        self.free_at.resize(capacities.len(), Minutes::MIN);
        self.assignment.clear();
        self.assignment.resize(trips.len(), VehicleIndex::new(0));
        self.pinned_vehicle = trips.iter().find_map(|t| t.pinned).map(|v| v.get());

        if self.assign(0, capacities, round_trip, trips) {
            Some(self.assignment.as_slice())
        } else {
            None
        }
    }

    fn assign(
        &mut self,
        k: usize,
        capacities: &[usize],
        round_trip: Minutes,
        trips: &[TripSpec],
    ) -> bool {
        let Some(&t) = self.order.get(k) else {
            return true;
        };
        let trip = trips[t];

        let mut candidates: SmallVec<usize, 8> = (0..capacities.len())
            .filter(|&v| {
                capacities[v] >= trip.size
                    && self.free_at[v] <= trip.departure
                    && trip.pinned.is_none_or(|p| p.get() == v)
            })
            .collect();
        candidates.sort_by_key(|&v| (self.free_at[v], capacities[v], v));

        let mut tried: SmallVec<usize, 8> = SmallVec::new();
        for v in candidates {
            if self.pinned_vehicle != Some(v) {
                if tried.contains(&capacities[v]) {
                    continue;
                }
                tried.push(capacities[v]);
            }

            let previous = self.free_at[v];
            self.free_at[v] = trip.departure.saturating_add(round_trip);
            self.assignment[t] = VehicleIndex::new(v);
            if self.assign(k + 1, capacities, round_trip, trips) {
                return true;
            }
            self.free_at[v] = previous;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> VehicleIndex {
        VehicleIndex::new(i)
    }

    #[test]
    fn test_single_vehicle_reused_after_round_trip() {
        let mut s = VehicleScheduler::new();
        let trips = [
            TripSpec::new(240, 2, None),
            TripSpec::new(0, 2, None),
            TripSpec::new(480, 1, None),
        ];
        assert_eq!(s.schedule(&[2], 240, &trips), Some(&[v(0), v(0), v(0)][..]));
    }

    #[test]
    fn test_overlap_on_single_vehicle_is_infeasible() {
        let mut s = VehicleScheduler::preallocated(1, 2);
        let trips = [TripSpec::new(0, 1, None), TripSpec::new(239, 1, None)];
        assert!(s.schedule(&[5], 240, &trips).is_none());
    }

    #[test]
    fn test_backtracks_over_mixed_capacities() {
        // Giving the first trip to the small vehicle leaves nothing big
        // enough for the third one.
        let mut s = VehicleScheduler::new();
        let trips = [
            TripSpec::new(0, 2, None),
            TripSpec::new(5, 2, None),
            TripSpec::new(12, 4, None),
        ];
        assert_eq!(s.schedule(&[4, 2], 10, &trips), Some(&[v(0), v(1), v(0)][..]));
    }

    #[test]
    fn test_pinned_trip_gets_its_vehicle() {
        let mut s = VehicleScheduler::new();
        let trips = [TripSpec::new(0, 1, None), TripSpec::new(0, 2, Some(v(0)))];
        assert_eq!(s.schedule(&[3, 3], 60, &trips), Some(&[v(1), v(0)][..]));
    }

    #[test]
    fn test_trip_larger_than_fleet_is_infeasible() {
        let mut s = VehicleScheduler::new();
        assert!(s.schedule(&[2, 3], 60, &[TripSpec::new(0, 4, None)]).is_none());
    }

    #[test]
    fn test_no_trips() {
        let mut s = VehicleScheduler::new();
        assert_eq!(s.schedule(&[2], 60, &[]), Some(&[][..]));
    }
}
