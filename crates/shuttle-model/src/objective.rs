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

//! Objective values and the tie-break rule between equal total waits.

use crate::model::Minutes;

/// How plans with the same total wait are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TieBreak {
    /// Prefer the plan that uses fewer trips.
    #[default]
    FewerTrips,
    /// Compare total wait only; the first plan found in exploration order wins.
    WaitOnly,
}

impl std::fmt::Display for TieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieBreak::FewerTrips => write!(f, "fewer_trips"),
            TieBreak::WaitOnly => write!(f, "wait_only"),
        }
    }
}

/// The two quantities a plan is judged by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Objective {
    total_wait: Minutes,
    trips_used: usize,
}

impl Objective {
    #[inline]
    pub const fn new(total_wait: Minutes, trips_used: usize) -> Self {
        Self {
            total_wait,
            trips_used,
        }
    }

    #[inline]
    pub const fn total_wait(&self) -> Minutes {
        self.total_wait
    }

    #[inline]
    pub const fn trips_used(&self) -> usize {
        self.trips_used
    }

    /// Collapses the objective into a single integer that orders plans.
    ///
    /// With [`TieBreak::FewerTrips`] the key is `total_wait * (n + 1) + trips`,
    /// which is lexicographic in `(total_wait, trips)` because a plan never
    /// has more than `n` trips. With [`TieBreak::WaitOnly`] the key is the
    /// total wait. The arithmetic saturates instead of overflowing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shuttle_model::objective::{Objective, TieBreak};
    ///
    /// let a = Objective::new(10, 3).key(TieBreak::FewerTrips, 4);
    /// let b = Objective::new(10, 2).key(TieBreak::FewerTrips, 4);
    /// let c = Objective::new(9, 4).key(TieBreak::FewerTrips, 4);
    /// assert!(c < b && b < a);
    /// assert_eq!(Objective::new(10, 3).key(TieBreak::WaitOnly, 4), 10);
    /// ```
    #[inline]
    pub fn key(&self, tie_break: TieBreak, num_guests: usize) -> i64 {
        match tie_break {
            TieBreak::WaitOnly => self.total_wait,
            TieBreak::FewerTrips => self
                .total_wait
                .saturating_mul(num_guests as i64 + 1)
                .saturating_add(self.trips_used as i64),
        }
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Objective(total_wait: {}, trips_used: {})",
            self.total_wait, self.trips_used
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fewer_trips_key_is_lexicographic() {
        let n = 5;
        let mut objectives = vec![
            Objective::new(3, 5),
            Objective::new(2, 5),
            Objective::new(3, 1),
            Objective::new(0, 5),
            Objective::new(2, 1),
        ];
        let mut by_key = objectives.clone();
        by_key.sort_by_key(|o| o.key(TieBreak::FewerTrips, n));
        objectives.sort_by_key(|o| (o.total_wait(), o.trips_used()));
        assert_eq!(by_key, objectives);
    }

    #[test]
    fn test_wait_only_ignores_trips() {
        assert_eq!(
            Objective::new(7, 1).key(TieBreak::WaitOnly, 3),
            Objective::new(7, 3).key(TieBreak::WaitOnly, 3)
        );
    }

    #[test]
    fn test_key_saturates() {
        let key = Objective::new(i64::MAX / 2, 1).key(TieBreak::FewerTrips, 10);
        assert_eq!(key, i64::MAX);
    }
}
