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

//! Separation-first branching.
//!
//! The mirror image of `join_first`: a new trip is explored before any
//! join. Mostly useful to cross-check the search, since both orders must
//! agree on the optimum.

use crate::{
    branching::decision::{Decision, DecisionBuilder, collect_candidates},
    encoder::Encoding,
    state::SearchState,
};

/// Yields the joins in creation order followed by `Open`, so the solver
/// explores the new trip first.
#[derive(Debug, Clone, Default)]
pub struct OpenFirstBuilder {
    buffer: Vec<Decision>,
}

impl OpenFirstBuilder {
    #[inline]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }
}

impl DecisionBuilder for OpenFirstBuilder {
    type DecisionIterator<'a>
        = std::iter::Copied<std::slice::Iter<'a, Decision>>
    where
        Self: 'a;

    fn name(&self) -> &str {
        "OpenFirstBuilder"
    }

    fn next_decisions<'a>(
        &'a mut self,
        encoding: &'a Encoding,
        state: &'a SearchState,
    ) -> Self::DecisionIterator<'a> {
        collect_candidates(encoding, state, &mut self.buffer);
        if self.buffer.first().is_some_and(Decision::opens_trip) {
            self.buffer.rotate_left(1);
        }
        self.buffer.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{branching::decision::Placement, trail::SearchTrail};
    use shuttle_model::{index::TripIndex, model::ModelBuilder, objective::TieBreak};

    #[test]
    fn test_open_is_yielded_last() {
        let mut mb = ModelBuilder::new([5]);
        mb.set_max_wait(100)
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 1);
        let enc = Encoding::new(&mb.build().unwrap(), TieBreak::FewerTrips);

        let mut state = SearchState::new(2);
        let mut trail = SearchTrail::new();
        trail.push_frame(&state);
        trail.apply_open(&mut state, 0, false, None);

        let mut builder = OpenFirstBuilder::new();
        let placements: Vec<Placement> = builder
            .next_decisions(&enc, &state)
            .map(|d| d.placement())
            .collect();
        assert_eq!(
            placements,
            vec![Placement::Join(TripIndex::new(0)), Placement::Open]
        );
    }
}
