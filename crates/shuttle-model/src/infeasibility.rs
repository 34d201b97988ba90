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

/// Why an instance has no feasible plan, as far as it can be told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfeasibilityReason {
    /// A grouping forced by the rules spans more than `max_wait`, or a guest
    /// arrives after the planning horizon.
    WindowTooTight,
    /// No vehicle has enough seats for a grouping the rules force.
    CapacityInsufficient,
    /// Pinned or forced trips need the same vehicle at overlapping times.
    VehicleReuseConflict,
    /// No single cause could be isolated.
    NoFeasibleAssignment,
}

impl InfeasibilityReason {
    /// The human-readable reason reported to callers.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            InfeasibilityReason::WindowTooTight => "window too tight",
            InfeasibilityReason::CapacityInsufficient => "capacity insufficient",
            InfeasibilityReason::VehicleReuseConflict => "vehicle reuse conflict",
            InfeasibilityReason::NoFeasibleAssignment => "no feasible assignment",
        }
    }
}

impl std::fmt::Display for InfeasibilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            InfeasibilityReason::WindowTooTight.to_string(),
            "window too tight"
        );
        assert_eq!(
            InfeasibilityReason::CapacityInsufficient.to_string(),
            "capacity insufficient"
        );
        assert_eq!(
            InfeasibilityReason::VehicleReuseConflict.to_string(),
            "vehicle reuse conflict"
        );
        assert_eq!(
            InfeasibilityReason::NoFeasibleAssignment.to_string(),
            "no feasible assignment"
        );
    }
}
