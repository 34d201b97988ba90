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

use crate::branching::decision::Decision;

/// A frame-structured LIFO stack of pending decisions.
///
/// Decisions are stored linearly; `frames` marks where each decision level
/// begins. Popping a frame truncates the entries back to that start.
#[derive(Clone, Debug, Default)]
pub struct SearchStack {
    entries: Vec<Decision>,
    frames: Vec<usize>,
}

impl SearchStack {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Preallocates for `num_guests` levels of at most `num_guests + 1` decisions each.
    #[inline]
    pub fn preallocated(num_guests: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_guests.saturating_mul(num_guests + 1)),
            frames: Vec::with_capacity(num_guests + 1),
        }
    }

    #[inline]
    pub fn ensure_capacity(&mut self, num_guests: usize) {
        let entry_capacity = num_guests.saturating_mul(num_guests + 1);
        if self.entries.capacity() < entry_capacity {
            self.entries.reserve(entry_capacity - self.entries.len());
        }
        if self.frames.capacity() < num_guests + 1 {
            self.frames.reserve(num_guests + 1 - self.frames.len());
        }
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current search depth, that is the number of frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Marks the start of a new decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Pops the current frame and drops its remaining decisions.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        let start = self.frames.pop()?;
        self.entries.truncate(start);
        Some(())
    }

    #[inline]
    pub fn push(&mut self, decision: Decision) {
        self.entries.push(decision);
    }

    #[inline]
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Decision>,
    {
        self.entries.extend(iter);
    }

    /// Pops the next decision of the current level.
    #[inline]
    pub fn pop(&mut self) -> Option<Decision> {
        match self.frames.last() {
            Some(&start) if self.entries.len() > start => self.entries.pop(),
            _ => None,
        }
    }

    /// Clears all entries and frames, keeping the allocations.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    /// Returns `true` if the current level has no remaining decisions.
    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() == start,
            None => true,
        }
    }

    #[inline]
    pub fn current_frame_entries(&self) -> &[Decision] {
        match self.frames.last() {
            Some(&start) => &self.entries[start..],
            None => &[],
        }
    }
}

impl std::fmt::Display for SearchStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStack(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SearchState;
    use shuttle_model::{model::ModelBuilder, objective::TieBreak};

    fn open_decision() -> Decision {
        let mut mb = ModelBuilder::new([2]);
        mb.add_guest("a", "A", 0);
        let enc = crate::encoder::Encoding::new(&mb.build().unwrap(), TieBreak::FewerTrips);
        Decision::try_open(&enc, &SearchState::new(1)).unwrap()
    }

    #[test]
    fn test_new_stack_is_empty() {
        let s = SearchStack::preallocated(4);
        assert_eq!(s.num_entries(), 0);
        assert_eq!(s.depth(), 0);
        assert!(s.is_empty());
        assert!(s.is_current_level_empty());
        assert!(s.current_frame_entries().is_empty());
        assert_eq!(s.to_string(), "SearchStack(entries: 0, frames: 0)");
    }

    #[test]
    fn test_pop_stays_within_current_frame() {
        let d = open_decision();
        let mut s = SearchStack::new();
        s.push_frame();
        s.extend([d, d]);
        s.push_frame();
        assert!(s.is_current_level_empty());
        assert_eq!(s.pop(), None);

        s.push(d);
        assert_eq!(s.current_frame_entries().len(), 1);
        assert_eq!(s.pop(), Some(d));
        assert_eq!(s.pop(), None);

        assert!(s.pop_frame().is_some());
        assert_eq!(s.depth(), 1);
        assert_eq!(s.current_frame_entries().len(), 2);
    }

    #[test]
    fn test_pop_frame_truncates_and_reset_clears() {
        let d = open_decision();
        let mut s = SearchStack::new();
        s.push_frame();
        s.push(d);
        s.push_frame();
        s.extend([d, d, d]);
        assert_eq!(s.num_entries(), 4);

        s.pop_frame();
        assert_eq!(s.num_entries(), 1);

        s.reset();
        assert!(s.is_empty());
        assert_eq!(s.pop_frame(), None);
    }
}
