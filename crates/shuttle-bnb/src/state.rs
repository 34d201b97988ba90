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

//! Search state for the grouping search.
//!
//! `SearchState` holds the partial grouping of the first `next_position`
//! guests (in sorted order) into trips. Trips are kept in creation order,
//! which is also the order of their first member, so every set partition of
//! the guests corresponds to exactly one state.
//!
//! Key responsibilities:
//! - Track, per trip, the running `min_arrival`, `max_arrival` and members.
//! - Track whether a trip carries the together pair and which partner it still awaits.
//! - Maintain the committed total wait of all placed guests.
//!
//! Mutations are `pub(crate)` and go through the trail, which records what
//! is needed to undo them.

use shuttle_model::{index::TripIndex, model::Minutes};
use smallvec::SmallVec;

/// A trip under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialTrip {
    min_arrival: Minutes,
    max_arrival: Minutes,
    members: SmallVec<usize, 8>,
    carries_pair: bool,
    awaiting: Option<usize>,
}

impl PartialTrip {
    /// Arrival of the first member.
    #[inline]
    pub fn min_arrival(&self) -> Minutes {
        self.min_arrival
    }

    /// Arrival of the last member, which is also the departure if nobody else joins.
    #[inline]
    pub fn max_arrival(&self) -> Minutes {
        self.max_arrival
    }

    /// Sorted positions of the members.
    #[inline]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` if a member of the together pair is on board.
    #[inline]
    pub fn carries_pair(&self) -> bool {
        self.carries_pair
    }

    /// Position of the together partner that still has to board, if any.
    #[inline]
    pub fn awaiting(&self) -> Option<usize> {
        self.awaiting
    }
}

impl std::fmt::Display for PartialTrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PartialTrip(members: {}, window: [{}, {}])",
            self.members.len(),
            self.min_arrival,
            self.max_arrival
        )
    }
}

/// The mutable state of one search.
#[derive(Debug, Clone)]
pub struct SearchState {
    trips: Vec<PartialTrip>,
    trip_of: Vec<TripIndex>,
    committed_wait: Minutes,
    next_position: usize,
    closed_trips: usize,
}

impl SearchState {
    /// Creates an empty state for `num_guests` guests.
    #[inline]
    pub fn new(num_guests: usize) -> Self {
        Self {
            trips: Vec::with_capacity(num_guests),
            trip_of: vec![TripIndex::new(0); num_guests],
            committed_wait: 0,
            next_position: 0,
            closed_trips: 0,
        }
    }

    #[inline]
    pub fn num_guests(&self) -> usize {
        self.trip_of.len()
    }

    /// The sorted position of the next guest to place; equals the number of placed guests.
    #[inline]
    pub fn next_position(&self) -> usize {
        self.next_position
    }

    /// Returns `true` once every guest is placed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.next_position == self.trip_of.len()
    }

    #[inline]
    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }

    #[inline]
    pub fn trips(&self) -> &[PartialTrip] {
        &self.trips
    }

    /// Returns the trip at `trip_index`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `trip_index` is out of bounds.
    #[inline]
    pub fn trip(&self, trip_index: TripIndex) -> &PartialTrip {
        debug_assert!(
            trip_index.get() < self.trips.len(),
            "called `SearchState::trip` with trip index out of bounds: the len is {} but the index is {}",
            self.trips.len(),
            trip_index.get()
        );
        &self.trips[trip_index.get()]
    }

    /// Trip of an already placed position.
    #[inline]
    pub fn trip_of(&self, position: usize) -> Option<TripIndex> {
        (position < self.next_position).then(|| self.trip_of[position])
    }

    /// Total wait committed by the placed guests, measured against the
    /// current `max_arrival` of their trips.
    #[inline]
    pub fn committed_wait(&self) -> Minutes {
        self.committed_wait
    }

    /// Number of trips known to be final, as last recorded by the search.
    #[inline]
    pub fn closed_trips(&self) -> usize {
        self.closed_trips
    }

    #[inline]
    pub(crate) fn set_closed_trips(&mut self, closed: usize) {
        self.closed_trips = closed;
    }

    /// Places the next guest into a new trip.
    #[inline]
    pub(crate) fn open_trip(&mut self, arrival: Minutes, carries_pair: bool, awaiting: Option<usize>) {
        let position = self.next_position;
        debug_assert!(
            position < self.num_guests(),
            "called `SearchState::open_trip` with position out of bounds: the len is {} but the index is {}",
            self.num_guests(),
            position
        );
        debug_assert!(
            self.trips.last().is_none_or(|t| t.max_arrival <= arrival),
            "called `SearchState::open_trip` with an arrival earlier than an open trip"
        );

        self.trip_of[position] = TripIndex::new(self.trips.len());
        let mut members = SmallVec::new();
        members.push(position);
        self.trips.push(PartialTrip {
            min_arrival: arrival,
            max_arrival: arrival,
            members,
            carries_pair,
            awaiting,
        });
        self.next_position += 1;
    }

    /// Places the next guest into an existing trip and charges the extra
    /// wait of the members already on board.
    #[inline]
    pub(crate) fn join_trip(
        &mut self,
        trip_index: TripIndex,
        arrival: Minutes,
        carries_pair: bool,
        awaiting: Option<usize>,
    ) {
        let position = self.next_position;
        debug_assert!(
            position < self.num_guests(),
            "called `SearchState::join_trip` with position out of bounds: the len is {} but the index is {}",
            self.num_guests(),
            position
        );
        debug_assert!(
            trip_index.get() < self.trips.len(),
            "called `SearchState::join_trip` with trip index out of bounds: the len is {} but the index is {}",
            self.trips.len(),
            trip_index.get()
        );

        let trip = &mut self.trips[trip_index.get()];
        debug_assert!(
            arrival >= trip.max_arrival,
            "called `SearchState::join_trip` with an arrival earlier than the trip's last member"
        );
        let delay = arrival - trip.max_arrival;
        self.committed_wait = self
            .committed_wait
            .saturating_add(delay.saturating_mul(trip.members.len() as Minutes));
        trip.max_arrival = arrival;
        trip.members.push(position);
        trip.carries_pair |= carries_pair;
        trip.awaiting = awaiting;

        self.trip_of[position] = trip_index;
        self.next_position += 1;
    }

    /// Reverts the last `open_trip`.
    #[inline]
    pub(crate) fn undo_open(&mut self) {
        debug_assert!(
            self.next_position > 0 && !self.trips.is_empty(),
            "called `SearchState::undo_open` on an empty state"
        );
        self.trips.pop();
        self.next_position -= 1;
    }

    /// Reverts the last `join_trip`, restoring the given previous values.
    #[inline]
    pub(crate) fn undo_join(
        &mut self,
        trip_index: TripIndex,
        old_max_arrival: Minutes,
        old_committed_wait: Minutes,
        old_carries_pair: bool,
        old_awaiting: Option<usize>,
    ) {
        debug_assert!(
            self.next_position > 0,
            "called `SearchState::undo_join` on an empty state"
        );
        let trip = &mut self.trips[trip_index.get()];
        trip.members.pop();
        trip.max_arrival = old_max_arrival;
        trip.carries_pair = old_carries_pair;
        trip.awaiting = old_awaiting;
        self.committed_wait = old_committed_wait;
        self.next_position -= 1;
    }
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(placed: {}/{}, trips: {}, committed_wait: {})",
            self.next_position,
            self.num_guests(),
            self.trips.len(),
            self.committed_wait
        )
    }
}
