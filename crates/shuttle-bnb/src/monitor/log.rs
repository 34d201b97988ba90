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

use crate::{
    branching::decision::Decision, encoder::Encoding,
    monitor::tree_search_monitor::TreeSearchMonitor, solution::Solution, state::SearchState,
    stats::BnbSolverStatistics,
};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Emits periodic progress lines through `tracing`.
///
/// A line is logged on descent whenever the node counter hits the mask and
/// at least `log_interval` has passed since the previous line.
#[derive(Debug, Clone)]
pub struct LogSearchMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_key: Option<i64>,
}

impl LogSearchMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            best_key: None,
        }
    }

    fn log_line(&mut self, state: &SearchState, stats: &BnbSolverStatistics) {
        let now = Instant::now();
        info!(
            elapsed = ?now.duration_since(self.start_time),
            nodes = stats.nodes_explored,
            depth = state.next_position(),
            trips = state.num_trips(),
            best = ?self.best_key,
            backtracks = stats.backtracks,
            pruned = stats.prunings_bound + stats.prunings_infeasible,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogSearchMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogSearchMonitor(log_interval: {:.2?}, clock_check_mask: {})",
            self.log_interval, self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogSearchMonitor {
    fn name(&self) -> &str {
        "LogSearchMonitor"
    }

    fn on_enter_search(&mut self, encoding: &Encoding, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_key = None;
        debug!(
            guests = encoding.num_guests(),
            vehicles = encoding.num_vehicles(),
            "search started"
        );
    }

    fn on_descend(
        &mut self,
        state: &SearchState,
        _decision: Decision,
        stats: &BnbSolverStatistics,
    ) {
        if (stats.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(state, stats);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution, _stats: &BnbSolverStatistics) {
        self.best_key = Some(solution.key());
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        info!(
            nodes = statistics.nodes_explored,
            solutions = statistics.solutions_found,
            best = ?self.best_key,
            elapsed = ?statistics.time_total,
            "search finished"
        );
    }
}
