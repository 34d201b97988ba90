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

//! Incumbent sharing for parallel search
//!
//! `SharedIncumbent` holds the best solution any worker has found. Its
//! objective key is mirrored in an `AtomicI64` so that workers can read the
//! bound on every step without locking; the solution itself lives behind a
//! `Mutex` and is the source of truth.
//!
//! The search talks to it through `IncumbentStore`:
//! - `NoSharedIncumbent`: single worker. The bound is always `i64::MAX`.
//! - `SharedIncumbentAdapter<'a>`: reads the shared bound and offers every
//!   new local best for installation.
//!
//! The shared bound only prunes branches that are *strictly* worse. Ties are
//! left to each worker so that the merged result does not depend on which
//! worker got there first.

use crate::solution::Solution;
use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicI64, Ordering},
};

/// A concurrent holder for the best solution found so far.
#[derive(Debug)]
pub struct SharedIncumbent {
    upper_bound: AtomicI64,
    solution: Mutex<Option<Solution>>,
}

impl Default for SharedIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SharedIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(upper_bound: {})", self.upper_bound())
    }
}

impl SharedIncumbent {
    /// Creates an incumbent with no solution; the bound is `i64::MAX`.
    #[inline]
    pub fn new() -> Self {
        Self {
            upper_bound: AtomicI64::new(i64::MAX),
            solution: Mutex::new(None),
        }
    }

    /// Objective key of the installed solution, or `i64::MAX`.
    #[inline]
    pub fn upper_bound(&self) -> i64 {
        self.upper_bound.load(Ordering::Relaxed)
    }

    /// Returns a copy of the installed solution, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Solution> {
        self.solution
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `candidate` if its key is strictly lower than the current one.
    ///
    /// Returns `true` if the candidate was installed.
    pub fn try_install(&self, candidate: &Solution) -> bool {
        let key = candidate.key();
        if key >= self.upper_bound() {
            return false;
        }

        let mut guard = self
            .solution
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Re-check against the locked value; the atomic is only a hint.
        if let Some(current) = guard.as_ref()
            && key >= current.key()
        {
            return false;
        }

        *guard = Some(candidate.clone());
        self.upper_bound.store(key, Ordering::Relaxed);
        true
    }
}

/// Source of the external upper bound a search prunes against.
pub trait IncumbentStore {
    /// Current external bound. Branches strictly above it are pruned.
    fn upper_bound(&self) -> i64;
    /// Notifies the store that the search found a new local best.
    fn on_solution_found(&self, solution: &Solution);
}

/// A store for a single, isolated search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSharedIncumbent;

impl NoSharedIncumbent {
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl IncumbentStore for NoSharedIncumbent {
    #[inline(always)]
    fn upper_bound(&self) -> i64 {
        i64::MAX
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Solution) {}
}

/// A store backed by a [`SharedIncumbent`].
#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
pub struct SharedIncumbentAdapter<'a> {
    inner: &'a SharedIncumbent,
}

impl<'a> SharedIncumbentAdapter<'a> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent) -> Self {
        Self { inner }
    }
}

impl IncumbentStore for SharedIncumbentAdapter<'_> {
    #[inline(always)]
    fn upper_bound(&self) -> i64 {
        self.inner.upper_bound()
    }

    #[inline(always)]
    fn on_solution_found(&self, solution: &Solution) {
        self.inner.try_install(solution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuttle_model::objective::Objective;
    use std::{sync::Arc, thread};

    fn solution(key: i64) -> Solution {
        Solution::new(key, Objective::new(key, 1), Vec::new())
    }

    #[test]
    fn test_initial_state() {
        let inc = SharedIncumbent::new();
        assert_eq!(inc.upper_bound(), i64::MAX);
        assert!(inc.snapshot().is_none());
    }

    #[test]
    fn test_only_strictly_better_is_installed() {
        let inc = SharedIncumbent::new();
        assert!(inc.try_install(&solution(10)));
        assert!(!inc.try_install(&solution(10)));
        assert!(!inc.try_install(&solution(11)));
        assert!(inc.try_install(&solution(4)));
        assert_eq!(inc.upper_bound(), 4);
        assert_eq!(inc.snapshot().map(|s| s.key()), Some(4));
    }

    #[test]
    fn test_concurrent_installs_keep_the_minimum() {
        let inc = Arc::new(SharedIncumbent::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let inc = Arc::clone(&inc);
                thread::spawn(move || {
                    for k in (0..50).rev() {
                        inc.try_install(&solution(k * 8 + i));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(inc.upper_bound(), 0);
        assert_eq!(inc.snapshot().map(|s| s.key()), Some(0));
    }

    #[test]
    fn test_adapters() {
        let inc = SharedIncumbent::new();
        let adapter = SharedIncumbentAdapter::new(&inc);
        adapter.on_solution_found(&solution(7));
        assert_eq!(adapter.upper_bound(), 7);
        assert_eq!(NoSharedIncumbent::new().upper_bound(), i64::MAX);
    }
}
