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

use crate::{encoder::Encoding, propagator::Propagator, state::SearchState};
use shuttle_model::{index::TripIndex, model::Minutes};
use std::iter::FusedIterator;

/// Where the next guest goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placement {
    /// Join the existing trip with this index.
    Join(TripIndex),
    /// Open a new trip.
    Open,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::Join(trip) => write!(f, "Join({})", trip.get()),
            Placement::Open => write!(f, "Open"),
        }
    }
}

/// A placement of the next guest together with everything needed to apply it.
///
/// Decisions are only created through [`Decision::try_join`] and
/// [`Decision::try_open`], which run the propagator checks, so every
/// decision on the stack is locally feasible.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decision {
    wait_delta: Minutes,
    arrival: Minutes,
    position: usize,
    awaiting: Option<usize>,
    placement: Placement,
    carries_pair: bool,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decision(position: {}, placement: {}, wait_delta: {})",
            self.position, self.placement, self.wait_delta
        )
    }
}

impl Decision {
    /// Tries to let the next guest join `trip_index`.
    ///
    /// Returns `None` if the propagator rejects the join.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the state is complete or `trip_index` is not a trip of `state`.
    #[inline]
    pub fn try_join(
        encoding: &Encoding,
        state: &SearchState,
        trip_index: TripIndex,
    ) -> Option<Self> {
        let position = state.next_position();
        debug_assert!(
            position < encoding.num_guests(),
            "called `Decision::try_join` with position out of bounds: the len is {} but the index is {}",
            encoding.num_guests(),
            position
        );
        debug_assert!(
            trip_index.get() < state.num_trips(),
            "called `Decision::try_join` with trip index out of bounds: the len is {} but the index is {}",
            state.num_trips(),
            trip_index.get()
        );

        Propagator::new(encoding)
            .admits_join(state, trip_index, position)
            .ok()?;

        let trip = state.trip(trip_index);
        let arrival = encoding.arrival(position);
        let wait_delta = (arrival - trip.max_arrival()).saturating_mul(trip.len() as Minutes);
        let partner = encoding.partner(position);
        let awaiting = match partner {
            Some(q) if q > position => Some(q),
            Some(_) => None,
            None => trip.awaiting(),
        };

        Some(Self {
            wait_delta,
            arrival,
            position,
            awaiting,
            placement: Placement::Join(trip_index),
            carries_pair: partner.is_some(),
        })
    }

    /// Tries to let the next guest open a new trip.
    ///
    /// Returns `None` if the guest must join its partner or the new trip
    /// could never take the partner.
    #[inline]
    pub fn try_open(encoding: &Encoding, state: &SearchState) -> Option<Self> {
        let position = state.next_position();
        debug_assert!(
            position < encoding.num_guests(),
            "called `Decision::try_open` with position out of bounds: the len is {} but the index is {}",
            encoding.num_guests(),
            position
        );

        Propagator::new(encoding).admits_open(position).ok()?;

        Some(Self {
            wait_delta: 0,
            arrival: encoding.arrival(position),
            position,
            awaiting: encoding.pending_partner(position),
            placement: Placement::Open,
            carries_pair: encoding.partner(position).is_some(),
        })
    }

    /// Builds the decision for an explicit placement, if it is admissible.
    #[inline]
    pub fn try_place(
        encoding: &Encoding,
        state: &SearchState,
        placement: Placement,
    ) -> Option<Self> {
        match placement {
            Placement::Join(trip_index) if trip_index.get() < state.num_trips() => {
                Self::try_join(encoding, state, trip_index)
            }
            Placement::Join(_) => None,
            Placement::Open => Self::try_open(encoding, state),
        }
    }

    /// Sorted position of the guest this decision places.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Extra wait charged to the guests already on the joined trip.
    #[inline]
    pub fn wait_delta(&self) -> Minutes {
        self.wait_delta
    }

    #[inline]
    pub fn arrival(&self) -> Minutes {
        self.arrival
    }

    /// Returns `true` if the placed guest belongs to the together pair.
    #[inline]
    pub fn carries_pair(&self) -> bool {
        self.carries_pair
    }

    /// Partner the target trip awaits after this decision is applied.
    #[inline]
    pub fn awaiting(&self) -> Option<usize> {
        self.awaiting
    }

    /// Returns `true` if this decision opens a new trip.
    #[inline]
    pub fn opens_trip(&self) -> bool {
        matches!(self.placement, Placement::Open)
    }
}

/// Generates the admissible decisions for the next guest of a state.
///
/// The solver pushes the decisions in the order they are yielded and pops
/// them last-in-first-out, so the last decision yielded is explored first.
pub trait DecisionBuilder {
    type DecisionIterator<'a>: Iterator<Item = Decision> + FusedIterator + 'a
    where
        Self: 'a;

    fn name(&self) -> &str;

    fn next_decisions<'a>(
        &'a mut self,
        encoding: &'a Encoding,
        state: &'a SearchState,
    ) -> Self::DecisionIterator<'a>;
}

/// Collects the admissible decisions for the next guest.
///
/// A guest whose together partner is already placed has exactly one
/// candidate: the partner's trip. Otherwise the candidates are a new trip
/// followed by every open trip in creation order.
#[inline]
pub(crate) fn collect_candidates(
    encoding: &Encoding,
    state: &SearchState,
    buffer: &mut Vec<Decision>,
) {
    buffer.clear();
    let position = state.next_position();
    if position >= encoding.num_guests() {
        return;
    }

    if let Some(partner) = encoding.partner(position)
        && partner < position
    {
        if let Some(trip) = state.trip_of(partner)
            && let Some(decision) = Decision::try_join(encoding, state, trip)
        {
            buffer.push(decision);
        }
        return;
    }

    buffer.extend(Decision::try_open(encoding, state));
    buffer.extend(
        (0..state.num_trips())
            .filter_map(|t| Decision::try_join(encoding, state, TripIndex::new(t))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trail::SearchTrail;
    use shuttle_model::{model::ModelBuilder, objective::TieBreak};

    fn encoding(max_wait: i64) -> Encoding {
        let mut builder = ModelBuilder::new([3]);
        builder
            .set_max_wait(max_wait)
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 10)
            .add_guest("c", "C", 20)
            .add_guest("d", "D", 50)
            .set_together("b", "d", None)
            .add_incompatible_pair("a", "c");
        Encoding::new(&builder.build().unwrap(), TieBreak::FewerTrips)
    }

    fn apply(trail: &mut SearchTrail, state: &mut SearchState, decision: Decision) {
        trail.push_frame(state);
        trail.apply_decision(state, &decision);
    }

    #[test]
    fn test_join_charges_wait_to_members_on_board() {
        let enc = encoding(60);
        let mut state = SearchState::new(4);
        let mut trail = SearchTrail::new();
        let open = Decision::try_open(&enc, &state).unwrap();
        apply(&mut trail, &mut state, open);

        let join = Decision::try_join(&enc, &state, TripIndex::new(0)).unwrap();
        assert_eq!(join.wait_delta(), 10);
        assert_eq!(join.awaiting(), Some(3));
        assert!(join.carries_pair());
    }

    #[test]
    fn test_open_is_rejected_when_partner_cannot_make_it() {
        let enc = encoding(30);
        let mut state = SearchState::new(4);
        let mut trail = SearchTrail::new();
        let open = Decision::try_open(&enc, &state).unwrap();
        apply(&mut trail, &mut state, open);
        // b at 10 awaits d at 50; 40 > 30 so b cannot open a trip on its own.
        assert!(Decision::try_open(&enc, &state).is_none());
    }

    #[test]
    fn test_partner_is_forced_into_the_same_trip() {
        let mut builder = ModelBuilder::new([4]);
        builder
            .set_max_wait(60)
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 5)
            .add_guest("c", "C", 10)
            .set_together("a", "c", None);
        let enc = Encoding::new(&builder.build().unwrap(), TieBreak::FewerTrips);
        let mut state = SearchState::new(3);
        let mut trail = SearchTrail::new();
        let mut buffer = Vec::new();

        let open = Decision::try_open(&enc, &state).unwrap();
        apply(&mut trail, &mut state, open);
        let open = Decision::try_open(&enc, &state).unwrap();
        apply(&mut trail, &mut state, open);

        collect_candidates(&enc, &state, &mut buffer);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer[0].placement(), Placement::Join(TripIndex::new(0)));
        assert_eq!(buffer[0].awaiting(), None);
    }

    #[test]
    fn test_try_place_rejects_unknown_trip() {
        let enc = encoding(60);
        let state = SearchState::new(4);
        assert!(Decision::try_place(&enc, &state, Placement::Join(TripIndex::new(0))).is_none());
        assert!(Decision::try_place(&enc, &state, Placement::Open).is_some());
    }
}
