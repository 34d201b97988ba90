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

//! Grouping-first branching.
//!
//! Explores joining the most recently opened trip first and opening a new
//! trip last. Grouping guests early tends to reach low-trip solutions fast,
//! which gives the bound something to work with.

use crate::{
    branching::decision::{Decision, DecisionBuilder, collect_candidates},
    encoder::Encoding,
    state::SearchState,
};

/// Yields `Open` first, then the joins in creation order, so the solver
/// pops the newest join first and the new trip last.
#[derive(Debug, Clone, Default)]
pub struct JoinFirstBuilder {
    buffer: Vec<Decision>,
}

impl JoinFirstBuilder {
    #[inline]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    #[inline]
    pub fn preallocated(num_guests: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(num_guests + 1),
        }
    }
}

impl DecisionBuilder for JoinFirstBuilder {
    type DecisionIterator<'a>
        = std::iter::Copied<std::slice::Iter<'a, Decision>>
    where
        Self: 'a;

    fn name(&self) -> &str {
        "JoinFirstBuilder"
    }

    fn next_decisions<'a>(
        &'a mut self,
        encoding: &'a Encoding,
        state: &'a SearchState,
    ) -> Self::DecisionIterator<'a> {
        collect_candidates(encoding, state, &mut self.buffer);
        self.buffer.iter().copied()
    }
}
