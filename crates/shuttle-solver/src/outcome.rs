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

//! What a solve returns.

use crate::stats::SolveStatistics;
use shuttle_model::{infeasibility::InfeasibilityReason, plan::Plan, verify::PlanViolation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    /// A plan whose optimality has been proven.
    Optimal(Plan),
    /// A valid plan found before the search was stopped.
    Feasible(Plan),
    /// No plan exists.
    Infeasible(InfeasibilityReason),
    /// The search was stopped before finding a plan or proving there is none,
    /// or the plan it found was rejected on re-verification.
    Unknown,
}

impl std::fmt::Display for SolveResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveResult::Optimal(plan) => write!(f, "Optimal({})", plan.objective()),
            SolveResult::Feasible(plan) => write!(f, "Feasible({})", plan.objective()),
            SolveResult::Infeasible(reason) => write!(f, "Infeasible({})", reason),
            SolveResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    OptimalityProven,
    InfeasibilityProven,
    /// A time limit or interrupt stopped the search. The string says which.
    Aborted(String),
    /// The search produced a plan that broke a constraint on re-verification.
    VerificationFailed(PlanViolation),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(msg) => write!(f, "Aborted: {}", msg),
            TerminationReason::VerificationFailed(violation) => {
                write!(f, "Verification Failed: {}", violation)
            }
        }
    }
}

/// The error a caller that only accepts proven results sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("no feasible plan: {0}")]
    Infeasible(InfeasibilityReason),
    #[error("search stopped before optimality was proven: {reason}")]
    Timeout { best: Option<Plan>, reason: String },
    #[error("solver produced an invalid plan: {0}")]
    InvalidPlan(PlanViolation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome {
    result: SolveResult,
    reason: TerminationReason,
    statistics: SolveStatistics,
}

impl SolverOutcome {
    #[inline]
    pub fn new(result: SolveResult, reason: TerminationReason, statistics: SolveStatistics) -> Self {
        Self {
            result,
            reason,
            statistics,
        }
    }

    #[inline]
    pub fn optimal(plan: Plan, statistics: SolveStatistics) -> Self {
        Self::new(
            SolveResult::Optimal(plan),
            TerminationReason::OptimalityProven,
            statistics,
        )
    }

    #[inline]
    pub fn infeasible(reason: InfeasibilityReason, statistics: SolveStatistics) -> Self {
        Self::new(
            SolveResult::Infeasible(reason),
            TerminationReason::InfeasibilityProven,
            statistics,
        )
    }

    /// An outcome for a stopped search; `Feasible` if a plan exists, else `Unknown`.
    #[inline]
    pub fn aborted<R>(plan: Option<Plan>, reason: R, statistics: SolveStatistics) -> Self
    where
        R: Into<String>,
    {
        let result = match plan {
            Some(plan) => SolveResult::Feasible(plan),
            None => SolveResult::Unknown,
        };
        Self::new(result, TerminationReason::Aborted(reason.into()), statistics)
    }

    /// An outcome for a search whose plan failed re-verification.
    /// The plan is withheld.
    #[inline]
    pub fn verification_failed(violation: PlanViolation, statistics: SolveStatistics) -> Self {
        Self::new(
            SolveResult::Unknown,
            TerminationReason::VerificationFailed(violation),
            statistics,
        )
    }

    #[inline]
    pub fn result(&self) -> &SolveResult {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.reason
    }

    #[inline]
    pub fn statistics(&self) -> &SolveStatistics {
        &self.statistics
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolveResult::Optimal(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, SolveResult::Infeasible(_))
    }

    #[inline]
    pub fn has_plan(&self) -> bool {
        self.plan().is_some()
    }

    /// The plan, proven or not.
    #[inline]
    pub fn plan(&self) -> Option<&Plan> {
        match &self.result {
            SolveResult::Optimal(plan) | SolveResult::Feasible(plan) => Some(plan),
            _ => None,
        }
    }

    /// Returns the plan only if it is proven optimal.
    ///
    /// # Errors
    ///
    /// `SolveError::Infeasible` if no plan exists, `SolveError::Timeout`
    /// (with the best plan found, if any) if the search was stopped early,
    /// and `SolveError::InvalidPlan` if the found plan failed re-verification.
    pub fn into_proven(self) -> Result<Plan, SolveError> {
        let reason = match self.reason {
            TerminationReason::Aborted(msg) => msg,
            TerminationReason::VerificationFailed(violation) => {
                return Err(SolveError::InvalidPlan(violation));
            }
            other => other.to_string(),
        };
        match self.result {
            SolveResult::Optimal(plan) => Ok(plan),
            SolveResult::Infeasible(reason) => Err(SolveError::Infeasible(reason)),
            SolveResult::Feasible(plan) => Err(SolveError::Timeout {
                best: Some(plan),
                reason,
            }),
            SolveResult::Unknown => Err(SolveError::Timeout { best: None, reason }),
        }
    }

    #[inline]
    pub fn into_parts(self) -> (SolveResult, TerminationReason, SolveStatistics) {
        (self.result, self.reason, self.statistics)
    }
}

impl std::fmt::Display for SolverOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        writeln!(f, "Termination: {}", self.reason)?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuttle_model::objective::Objective;

    #[test]
    fn test_proven_plan_passes_through() {
        let plan = Plan::new(Vec::new(), Objective::new(0, 0));
        let outcome = SolverOutcome::optimal(plan.clone(), SolveStatistics::default());
        assert!(outcome.is_optimal());
        assert_eq!(outcome.into_proven(), Ok(plan));
    }

    #[test]
    fn test_timeout_keeps_best_plan() {
        let plan = Plan::new(Vec::new(), Objective::new(5, 1));
        let outcome =
            SolverOutcome::aborted(Some(plan.clone()), "time limit reached", SolveStatistics::default());
        assert!(outcome.has_plan());
        assert!(!outcome.is_optimal());
        assert_eq!(
            outcome.into_proven(),
            Err(SolveError::Timeout {
                best: Some(plan),
                reason: "time limit reached".to_string()
            })
        );
    }

    #[test]
    fn test_aborted_without_plan_is_unknown() {
        let outcome = SolverOutcome::aborted(None, "interrupted", SolveStatistics::default());
        assert_eq!(outcome.result(), &SolveResult::Unknown);
        assert!(matches!(
            outcome.into_proven(),
            Err(SolveError::Timeout { best: None, .. })
        ));
    }

    #[test]
    fn test_failed_verification_is_not_a_timeout() {
        let violation = PlanViolation::TripCountMismatch {
            reported: 2,
            actual: 1,
        };
        let outcome =
            SolverOutcome::verification_failed(violation.clone(), SolveStatistics::default());
        assert_eq!(outcome.result(), &SolveResult::Unknown);
        assert!(!outcome.has_plan());
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::VerificationFailed(violation.clone())
        );
        assert_eq!(outcome.into_proven(), Err(SolveError::InvalidPlan(violation)));
    }

    #[test]
    fn test_infeasible_maps_to_error() {
        let outcome = SolverOutcome::infeasible(
            InfeasibilityReason::WindowTooTight,
            SolveStatistics::default(),
        );
        assert!(outcome.is_infeasible());
        let err = outcome.into_proven().unwrap_err();
        assert_eq!(err.to_string(), "no feasible plan: window too tight");
    }
}
