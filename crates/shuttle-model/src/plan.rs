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

//! The output plan.
//!
//! A [`Plan`] is an ordered list of [`PlannedTrip`]s plus the objective it
//! achieves. Nothing here enforces feasibility; use [`Plan::verify`] to
//! re-check a plan against its model before handing it out.

use crate::{
    index::{GuestIndex, TripIndex, VehicleIndex},
    model::{Minutes, Model},
    objective::Objective,
    verify::PlanViolation,
};
use smallvec::SmallVec;

/// One dispatch of one vehicle carrying a fixed group of guests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlannedTrip {
    index: TripIndex,
    vehicle: VehicleIndex,
    departure: Minutes,
    guests: SmallVec<GuestIndex, 8>,
}

impl PlannedTrip {
    pub fn new<I>(index: TripIndex, vehicle: VehicleIndex, departure: Minutes, guests: I) -> Self
    where
        I: IntoIterator<Item = GuestIndex>,
    {
        Self {
            index,
            vehicle,
            departure,
            guests: guests.into_iter().collect(),
        }
    }

    #[inline]
    pub fn index(&self) -> TripIndex {
        self.index
    }

    #[inline]
    pub fn vehicle(&self) -> VehicleIndex {
        self.vehicle
    }

    #[inline]
    pub fn departure(&self) -> Minutes {
        self.departure
    }

    /// Guests on board, in `(arrival, id)` order.
    #[inline]
    pub fn guests(&self) -> &[GuestIndex] {
        &self.guests
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.guests.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.guests.is_empty()
    }

    /// Earliest and latest arrival among the guests, or `None` for an empty trip.
    pub fn arrival_window(&self, model: &Model) -> Option<(Minutes, Minutes)> {
        let arrivals = self.guests.iter().map(|&g| model.guest_arrival(g));
        let min = arrivals.clone().min()?;
        let max = arrivals.max()?;
        Some((min, max))
    }

    /// The half-open interval `[departure, departure + round_trip)` during
    /// which the vehicle is unavailable.
    #[inline]
    pub fn busy_interval(&self, round_trip: Minutes) -> (Minutes, Minutes) {
        (self.departure, self.departure.saturating_add(round_trip))
    }

    /// How long `guest` waits on this trip.
    #[inline]
    pub fn wait_of(&self, model: &Model, guest: GuestIndex) -> Minutes {
        self.departure - model.guest_arrival(guest)
    }
}

impl std::fmt::Display for PlannedTrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PlannedTrip(index: {}, vehicle: {}, departure: {}, guests: {})",
            self.index.get(),
            self.vehicle.get(),
            self.departure,
            self.guests.len()
        )
    }
}

/// A complete assignment of guests to trips and trips to vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Plan {
    trips: Vec<PlannedTrip>,
    objective: Objective,
}

impl Plan {
    #[inline]
    pub fn new(trips: Vec<PlannedTrip>, objective: Objective) -> Self {
        Self { trips, objective }
    }

    /// The plan for an instance without guests.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn trips(&self) -> &[PlannedTrip] {
        &self.trips
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
    pub fn trips_used(&self) -> usize {
        self.objective.trips_used()
    }

    /// Finds the trip carrying `guest`.
    pub fn trip_of(&self, guest: GuestIndex) -> Option<&PlannedTrip> {
        self.trips.iter().find(|t| t.guests.contains(&guest))
    }

    /// Mechanically re-checks every plan invariant against `model`.
    ///
    /// # Errors
    ///
    /// Returns the first [`PlanViolation`] found.
    #[inline]
    pub fn verify(&self, model: &Model) -> Result<(), PlanViolation> {
        crate::verify::verify_plan(model, self)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Plan Summary")?;
        writeln!(f, "   Total Wait: {}", self.total_wait())?;
        writeln!(f, "   Trips Used: {}", self.trips_used())?;
        writeln!(f)?;

        if self.trips.is_empty() {
            writeln!(f, "   (No trips)")?;
            return Ok(());
        }

        writeln!(
            f,
            "   {:<6} | {:<8} | {:<10} | {:<7}",
            "Trip", "Vehicle", "Departure", "Guests"
        )?;
        writeln!(f, "   {:-<6}-+-{:-<8}-+-{:-<10}-+-{:-<7}", "", "", "", "")?;
        for trip in &self.trips {
            writeln!(
                f,
                "   {:<6} | {:<8} | {:<10} | {:<7}",
                trip.index.get(),
                trip.vehicle.get(),
                trip.departure,
                trip.guests.len()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;

    fn g(i: usize) -> GuestIndex {
        GuestIndex::new(i)
    }

    #[test]
    fn test_trip_accessors() {
        let mut builder = ModelBuilder::new([4]);
        builder
            .add_guest("a", "A", 5)
            .add_guest("b", "B", 20)
            .set_max_wait(30);
        let model = builder.build().unwrap();

        let trip = PlannedTrip::new(TripIndex::new(0), VehicleIndex::new(0), 20, [g(0), g(1)]);
        assert_eq!(trip.len(), 2);
        assert_eq!(trip.arrival_window(&model), Some((5, 20)));
        assert_eq!(trip.wait_of(&model, g(0)), 15);
        assert_eq!(trip.busy_interval(240), (20, 260));

        let plan = Plan::new(vec![trip.clone()], Objective::new(15, 1));
        assert_eq!(plan.trip_of(g(1)), Some(&trip));
        assert_eq!(plan.total_wait(), 15);
        assert_eq!(plan.trips_used(), 1);
    }

    #[test]
    fn test_empty_plan_display() {
        let text = Plan::empty().to_string();
        assert!(text.contains("Total Wait: 0"));
        assert!(text.contains("(No trips)"));
    }
}
