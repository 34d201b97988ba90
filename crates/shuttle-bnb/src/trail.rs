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

//! Undo log for the grouping search.
//!
//! Every placement of a guest is applied to the [`SearchState`] through the
//! trail, which records what is needed to revert it. Frames mark the
//! boundaries of decision levels; `backtrack` reverts a whole level at once.

use crate::{
    branching::decision::{Decision, Placement},
    state::SearchState,
};
use shuttle_model::{index::TripIndex, model::Minutes};

/// A single placement recorded on the trail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TrailEntry {
    /// The guest opened a new trip.
    Opened,
    /// The guest joined `trip`; the remaining fields are the values before the join.
    Joined {
        trip: TripIndex,
        old_max_arrival: Minutes,
        old_wait: Minutes,
        old_carries_pair: bool,
        old_awaiting: Option<usize>,
    },
}

impl std::fmt::Display for TrailEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrailEntry::Opened => write!(f, "TrailEntry(opened)"),
            TrailEntry::Joined {
                trip,
                old_max_arrival,
                old_wait,
                ..
            } => write!(
                f,
                "TrailEntry(joined: {}, old_max: {}, old_wait: {})",
                trip.get(),
                old_max_arrival,
                old_wait
            ),
        }
    }
}

/// Boundary of one decision level on the trail.
///
/// Besides the start index of its entries, a frame stores the number of
/// closed trips at the time it was pushed, so the closed-trip watermark is
/// restored together with the placements.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameEntry {
    previous_closed_trips: usize,
    entry_start_index: usize,
}

impl FrameEntry {
    #[inline(always)]
    pub fn new(previous_closed_trips: usize, entry_start_index: usize) -> Self {
        Self {
            previous_closed_trips,
            entry_start_index,
        }
    }

    #[inline]
    pub fn previous_closed_trips(&self) -> usize {
        self.previous_closed_trips
    }

    #[inline]
    pub fn entry_start_index(&self) -> usize {
        self.entry_start_index
    }
}

impl std::fmt::Display for FrameEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FrameEntry(prev_closed_trips: {}, entry_start_index: {})",
            self.previous_closed_trips, self.entry_start_index
        )
    }
}

/// A linear undo log with frame markers.
///
/// Typical usage:
/// 1. Call `push_frame(state)` before descending into a child,
/// 2. apply the child's placement with `apply_open` or `apply_join`,
/// 3. call `backtrack(state)` to return to the parent.
#[derive(Debug, Clone, Default)]
pub struct SearchTrail {
    entries: Vec<TrailEntry>,
    frames: Vec<FrameEntry>,
}

impl SearchTrail {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a trail with room for one entry per guest and one extra frame.
    #[inline]
    pub fn preallocated(num_guests: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_guests),
            frames: Vec::with_capacity(num_guests + 1),
        }
    }

    pub fn ensure_capacity(&mut self, num_guests: usize) {
        if self.entries.capacity() < num_guests {
            self.entries.reserve(num_guests - self.entries.len());
        }
        if self.frames.capacity() < num_guests + 1 {
            self.frames.reserve((num_guests + 1) - self.frames.len());
        }
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current depth of the trail, that is the number of frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Opens a new decision level.
    #[inline]
    pub fn push_frame(&mut self, state: &SearchState) {
        self.frames
            .push(FrameEntry::new(state.closed_trips(), self.entries.len()));
    }

    /// Places the next guest into a new trip.
    #[inline]
    pub fn apply_open(
        &mut self,
        state: &mut SearchState,
        arrival: Minutes,
        carries_pair: bool,
        awaiting: Option<usize>,
    ) {
        self.entries.push(TrailEntry::Opened);
        state.open_trip(arrival, carries_pair, awaiting);
    }

    /// Places the next guest into `trip`.
    ///
    /// # Panics
    ///
    /// Panics if `trip` is not a trip of `state`.
    #[inline]
    pub fn apply_join(
        &mut self,
        state: &mut SearchState,
        trip: TripIndex,
        arrival: Minutes,
        carries_pair: bool,
        awaiting: Option<usize>,
    ) {
        let current = state.trip(trip);
        self.entries.push(TrailEntry::Joined {
            trip,
            old_max_arrival: current.max_arrival(),
            old_wait: state.committed_wait(),
            old_carries_pair: current.carries_pair(),
            old_awaiting: current.awaiting(),
        });
        state.join_trip(trip, arrival, carries_pair, awaiting);
    }

    /// Applies a decision built for the current state.
    #[inline]
    pub fn apply_decision(&mut self, state: &mut SearchState, decision: &Decision) {
        debug_assert_eq!(
            decision.position(),
            state.next_position(),
            "called `SearchTrail::apply_decision` with a decision for position {} but the next position is {}",
            decision.position(),
            state.next_position()
        );
        match decision.placement() {
            Placement::Open => self.apply_open(
                state,
                decision.arrival(),
                decision.carries_pair(),
                decision.awaiting(),
            ),
            Placement::Join(trip) => self.apply_join(
                state,
                trip,
                decision.arrival(),
                decision.carries_pair(),
                decision.awaiting(),
            ),
        }
    }

    /// Reverts every placement of the topmost frame and pops it.
    pub fn backtrack(&mut self, state: &mut SearchState) {
        let Some(frame) = self.frames.pop() else {
            return;
        };

        while self.entries.len() > frame.entry_start_index {
            let Some(entry) = self.entries.pop() else {
                break;
            };
            Self::undo_entry(state, entry);
        }
        state.set_closed_trips(frame.previous_closed_trips);
    }

    /// Reverts every recorded placement and drops all frames.
    pub fn clear(&mut self, state: &mut SearchState) {
        while let Some(entry) = self.entries.pop() {
            Self::undo_entry(state, entry);
        }
        if let Some(first) = self.frames.first() {
            state.set_closed_trips(first.previous_closed_trips);
        }
        self.frames.clear();
    }

    /// Resets the trail without touching any state.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    #[inline]
    pub fn iter_entries(&self) -> std::slice::Iter<'_, TrailEntry> {
        self.entries.iter()
    }

    #[inline]
    fn undo_entry(state: &mut SearchState, entry: TrailEntry) {
        match entry {
            TrailEntry::Opened => state.undo_open(),
            TrailEntry::Joined {
                trip,
                old_max_arrival,
                old_wait,
                old_carries_pair,
                old_awaiting,
            } => state.undo_join(
                trip,
                old_max_arrival,
                old_wait,
                old_carries_pair,
                old_awaiting,
            ),
        }
    }
}

impl std::fmt::Display for SearchTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(depth: {}, entries: {})",
            self.frames.len(),
            self.entries.len()
        )
    }
}
