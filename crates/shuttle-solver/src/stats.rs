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

use shuttle_bnb::stats::BnbSolverStatistics;
use std::time::Duration;

/// Statistics of one call to [`crate::solver::Solver::solve`].
///
/// The search counters are summed over every subtree and worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveStatistics {
    /// Number of nodes expanded.
    pub nodes_explored: u64,
    /// Number of backtracks.
    pub backtracks: u64,
    /// Number of nodes cut because a constraint or the fleet schedule failed.
    pub prunings_infeasible: u64,
    /// Number of nodes cut by the objective bound.
    pub prunings_bound: u64,
    /// Number of improving solutions found.
    pub solutions_found: u64,
    /// Number of worker threads that ran.
    pub workers_used: usize,
    /// Wall time of the whole solve, diagnosis included.
    pub solve_duration: Duration,
}

impl Default for SolveStatistics {
    fn default() -> Self {
        Self {
            nodes_explored: 0,
            backtracks: 0,
            prunings_infeasible: 0,
            prunings_bound: 0,
            solutions_found: 0,
            workers_used: 1,
            solve_duration: Duration::ZERO,
        }
    }
}

impl std::fmt::Display for SolveStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solve Statistics:")?;
        writeln!(f, "  Nodes Explored: {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks: {}", self.backtracks)?;
        writeln!(f, "  Prunings (infeasible): {}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound): {}", self.prunings_bound)?;
        writeln!(f, "  Solutions Found: {}", self.solutions_found)?;
        writeln!(f, "  Workers Used: {}", self.workers_used)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for `SolveStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveStatisticsBuilder {
    search: BnbSolverStatistics,
    workers_used: usize,
    solve_duration: Duration,
}

impl Default for SolveStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolveStatisticsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            search: BnbSolverStatistics::default(),
            workers_used: 1,
            solve_duration: Duration::ZERO,
        }
    }

    /// Adds the counters of one search run.
    #[inline]
    pub fn search(mut self, search: &BnbSolverStatistics) -> Self {
        self.search.absorb(search);
        self
    }

    #[inline]
    pub fn workers_used(mut self, workers_used: usize) -> Self {
        self.workers_used = workers_used;
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: Duration) -> Self {
        self.solve_duration = solve_duration;
        self
    }

    #[inline]
    pub fn build(self) -> SolveStatistics {
        SolveStatistics {
            nodes_explored: self.search.nodes_explored,
            backtracks: self.search.backtracks,
            prunings_infeasible: self.search.prunings_infeasible,
            prunings_bound: self.search.prunings_bound,
            solutions_found: self.search.solutions_found,
            workers_used: self.workers_used,
            solve_duration: self.solve_duration,
        }
    }
}
