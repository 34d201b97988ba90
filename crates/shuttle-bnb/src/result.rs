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

use crate::{solution::Solution, stats::BnbSolverStatistics};

/// What a search run established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult {
    /// The search space is exhausted without a solution.
    Infeasible,
    /// The solution is optimal within the explored space.
    Optimal(Solution),
    /// A solution was found, but the search stopped before proving optimality.
    Feasible(Solution),
    /// The search stopped before finding any solution.
    Unknown,
}

impl SolverResult {
    /// Returns the solution, if the result carries one.
    #[inline]
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn into_solution(self) -> Option<Solution> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(s) => write!(f, "Optimal(key={})", s.key()),
            SolverResult::Feasible(s) => write!(f, "Feasible(key={})", s.key()),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Why a search run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BnbTerminationReason {
    OptimalityProven,
    InfeasibilityProven,
    /// A monitor stopped the search; the string says which and why.
    Aborted(String),
}

impl std::fmt::Display for BnbTerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BnbTerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            BnbTerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            BnbTerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of one search run after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome {
    result: SolverResult,
    termination_reason: BnbTerminationReason,
    statistics: BnbSolverStatistics,
}

impl BnbSolverOutcome {
    #[inline]
    pub fn optimal(solution: Solution, statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Optimal(solution),
            termination_reason: BnbTerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: BnbTerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(solution: Option<Solution>, reason: R, statistics: BnbSolverStatistics) -> Self
    where
        R: Into<String>,
    {
        let result = match solution {
            Some(s) => SolverResult::Feasible(s),
            None => SolverResult::Unknown,
        };
        Self {
            result,
            termination_reason: BnbTerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    #[inline]
    pub fn result(&self) -> &SolverResult {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &BnbTerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_parts(self) -> (SolverResult, BnbTerminationReason, BnbSolverStatistics) {
        (self.result, self.termination_reason, self.statistics)
    }
}

impl std::fmt::Display for BnbSolverOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BnbSolverOutcome(result: {}, termination: {})",
            self.result, self.termination_reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuttle_model::objective::Objective;

    #[test]
    fn test_aborted_without_solution_is_unknown() {
        let outcome =
            BnbSolverOutcome::aborted(None, "time limit", BnbSolverStatistics::default());
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(
            outcome.termination_reason(),
            &BnbTerminationReason::Aborted("time limit".to_string())
        );
    }

    #[test]
    fn test_aborted_with_solution_is_feasible() {
        let s = Solution::new(3, Objective::new(3, 1), Vec::new());
        let outcome =
            BnbSolverOutcome::aborted(Some(s.clone()), "stop", BnbSolverStatistics::default());
        assert_eq!(outcome.result().solution(), Some(&s));
        assert!(matches!(outcome.result(), SolverResult::Feasible(_)));
    }
}
