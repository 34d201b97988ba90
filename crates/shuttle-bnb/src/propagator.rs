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

//! Local feasibility checks for the grouping search.
//!
//! The propagator answers three questions about a partial grouping:
//!
//! - may the next guest join a given trip, or open a new one,
//! - which trips can no longer change (they are *closed*),
//! - how much wait is already unavoidable for the guests on board.
//!
//! Join checks run cheapest first: incompatibility, then capacity, then the
//! arrival window. A trip that carries one member of the together pair
//! keeps a seat reserved for the other member and must still be able to
//! take them within the window.
//!
//! `precheck` rejects instances that are infeasible for structural reasons
//! before any search starts.

use crate::{
    encoder::Encoding,
    state::{PartialTrip, SearchState},
};
use shuttle_model::{index::TripIndex, infeasibility::InfeasibilityReason, model::Minutes};

/// Why a placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The guest may not share a trip with someone on board, or with the partner the trip awaits.
    Incompatible,
    /// The trip has no seat left, counting the seat reserved for a pending partner.
    Capacity,
    /// The trip's arrival spread would exceed the maximum wait.
    Window,
    /// The guest's partner is already placed in another trip.
    Together,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Incompatible => write!(f, "Incompatible"),
            Rejection::Capacity => write!(f, "Capacity"),
            Rejection::Window => write!(f, "Window"),
            Rejection::Together => write!(f, "Together"),
        }
    }
}

/// Read-only view of an [`Encoding`] that answers feasibility questions.
#[derive(Debug, Clone, Copy)]
pub struct Propagator<'a> {
    encoding: &'a Encoding,
}

impl<'a> Propagator<'a> {
    #[inline(always)]
    pub fn new(encoding: &'a Encoding) -> Self {
        Self { encoding }
    }

    /// Checks the instance for infeasibility that needs no search.
    ///
    /// Returns the reason for the first failing check:
    /// 1. an arrival after the planning horizon, or a together pair whose
    ///    arrivals are further apart than the maximum wait, is a window problem;
    /// 2. a together pair that is also incompatible can never be placed;
    /// 3. a together pair that does not fit the vehicle it may use is a capacity problem.
    pub fn precheck(&self) -> Option<InfeasibilityReason> {
        let enc = self.encoding;
        let n = enc.num_guests();

        if let Some(horizon) = enc.time_horizon()
            && enc.arrivals().iter().any(|&a| a > horizon)
        {
            return Some(InfeasibilityReason::WindowTooTight);
        }

        if let Some((a, b)) = (0..n).find_map(|p| enc.pending_partner(p).map(|q| (p, q))) {
            if enc.arrival(b) - enc.arrival(a) > enc.max_wait() {
                return Some(InfeasibilityReason::WindowTooTight);
            }
            if enc.conflicts(a, b) {
                return Some(InfeasibilityReason::NoFeasibleAssignment);
            }
            if enc.capacity_limit(true) < 2 {
                return Some(InfeasibilityReason::CapacityInsufficient);
            }
        }

        None
    }

    /// Checks whether the guest at `position` may join `trip_index`.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] that applies, checked in the order
    /// together, incompatible, capacity, window.
    pub fn admits_join(
        &self,
        state: &SearchState,
        trip_index: TripIndex,
        position: usize,
    ) -> Result<(), Rejection> {
        let enc = self.encoding;
        let trip = state.trip(trip_index);
        let partner = enc.partner(position);

        // A placed partner pins the guest to its trip.
        if let Some(q) = partner
            && q < position
            && state.trip_of(q) != Some(trip_index)
        {
            return Err(Rejection::Together);
        }
        let pending = enc.pending_partner(position);

        if trip.members().iter().any(|&m| enc.conflicts(m, position)) {
            return Err(Rejection::Incompatible);
        }
        if let Some(q) = trip.awaiting()
            && q != position
            && enc.conflicts(q, position)
        {
            return Err(Rejection::Incompatible);
        }
        if let Some(q) = pending
            && trip.members().iter().any(|&m| enc.conflicts(m, q))
        {
            return Err(Rejection::Incompatible);
        }

        let awaiting_after = match partner {
            Some(_) => pending,
            None => trip.awaiting(),
        };
        let seats = trip.len() + 1 + usize::from(awaiting_after.is_some());
        if seats > enc.capacity_limit(trip.carries_pair() || partner.is_some()) {
            return Err(Rejection::Capacity);
        }

        let arrival = enc.arrival(position);
        let max_wait = enc.max_wait();
        if arrival - trip.min_arrival() > max_wait {
            return Err(Rejection::Window);
        }
        if let Some(q) = pending
            && enc.arrival(q) - trip.min_arrival() > max_wait
        {
            return Err(Rejection::Window);
        }

        Ok(())
    }

    /// Checks whether the guest at `position` may open a new trip.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::Together`] if the guest's partner is already
    /// placed, and a capacity or window rejection if a trip started by the
    /// guest could never take its pending partner.
    pub fn admits_open(&self, position: usize) -> Result<(), Rejection> {
        let enc = self.encoding;
        match enc.partner(position) {
            None => Ok(()),
            Some(q) if q < position => Err(Rejection::Together),
            Some(q) => {
                if enc.capacity_limit(true) < 2 {
                    Err(Rejection::Capacity)
                } else if enc.arrival(q) - enc.arrival(position) > enc.max_wait() {
                    Err(Rejection::Window)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Returns `true` if no guest arriving at `next_arrival` or later can join `trip`.
    ///
    /// A trip still waiting for the together partner is never closed.
    /// `next_arrival` is `None` once every guest is placed, which closes
    /// every trip.
    #[inline]
    pub fn is_closed(&self, trip: &PartialTrip, next_arrival: Option<Minutes>) -> bool {
        if trip.awaiting().is_some() {
            return false;
        }
        if trip.len() >= self.encoding.capacity_limit(trip.carries_pair()) {
            return true;
        }
        next_arrival.is_none_or(|a| a - trip.min_arrival() > self.encoding.max_wait())
    }

    /// Counts the closed trips of `state`.
    #[inline]
    pub fn count_closed(&self, state: &SearchState) -> usize {
        let next_arrival = (!state.is_complete()).then(|| self.encoding.arrival(state.next_position()));
        state
            .trips()
            .iter()
            .filter(|t| self.is_closed(t, next_arrival))
            .count()
    }

    /// Wait that the guests already on board will accumulate no matter how
    /// the search continues.
    ///
    /// Only trips awaiting the together partner contribute: they cannot
    /// depart before the partner arrives.
    #[inline]
    pub fn remaining_wait_bound(&self, state: &SearchState) -> Minutes {
        state
            .trips()
            .iter()
            .filter_map(|t| {
                t.awaiting().map(|q| {
                    (self.encoding.arrival(q) - t.max_arrival()).saturating_mul(t.len() as Minutes)
                })
            })
            .fold(0, Minutes::saturating_add)
    }
}
