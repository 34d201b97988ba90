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

//! Wall-clock limit for tree search
//!
//! `TimeLimitMonitor` stops the search once a deadline passes. The clock is
//! read on the first step and then every `clock_check_mask + 1` steps.

use crate::{
    encoder::Encoding,
    monitor::tree_search_monitor::{SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Limit {
    Relative(Duration),
    Absolute(Instant),
}

/// A monitor that terminates the search after a duration or at a deadline.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    limit: Limit,
    deadline: Option<Instant>,
    clock_check_mask: u64,
}

impl TimeLimitMonitor {
    const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    /// Stops the search `time_limit` after it starts.
    #[inline]
    pub fn new(time_limit: Duration) -> Self {
        Self {
            limit: Limit::Relative(time_limit),
            deadline: None,
            clock_check_mask: Self::DEFAULT_CLOCK_CHECK_MASK,
        }
    }

    /// Stops the search at `deadline`, no matter when it starts.
    #[inline]
    pub fn until(deadline: Instant) -> Self {
        Self {
            limit: Limit::Absolute(deadline),
            deadline: Some(deadline),
            clock_check_mask: Self::DEFAULT_CLOCK_CHECK_MASK,
        }
    }

    /// Sets how often the clock is read. `mask` should be one less than a power of two.
    #[inline]
    pub fn with_clock_check_mask(mut self, mask: u64) -> Self {
        self.clock_check_mask = mask;
        self
    }
}

impl std::fmt::Display for TimeLimitMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.limit {
            Limit::Relative(d) => write!(f, "TimeLimitMonitor(limit: {:.2?})", d),
            Limit::Absolute(_) => write!(f, "TimeLimitMonitor(deadline)"),
        }
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _encoding: &Encoding, _statistics: &BnbSolverStatistics) {
        self.deadline = match self.limit {
            Limit::Relative(d) => Instant::now().checked_add(d),
            Limit::Absolute(deadline) => Some(deadline),
        };
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {}

    fn search_command(
        &mut self,
        _state: &SearchState,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        let steps = statistics.steps;
        if steps != 1 && steps & self.clock_check_mask != 0 {
            return SearchCommand::Continue;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                SearchCommand::Terminate("time limit reached".to_string())
            }
            _ => SearchCommand::Continue,
        }
    }
}
