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

//! Structural input errors.
//!
//! Everything in here is detected before a search starts. A `MalformedInput`
//! means the instance is not well-formed, which is a different thing from an
//! instance that is well-formed but has no feasible plan.

/// The pairing rule a [`MalformedInput`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// The optional must-ride-together rule.
    Together,
    /// One of the incompatible pairs.
    Incompatible,
}

impl RuleKind {
    /// The request field the rule is read from.
    #[inline]
    pub const fn field(&self) -> &'static str {
        match self {
            RuleKind::Together => "must_ride_together",
            RuleKind::Incompatible => "incompatible_pairs",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}

/// A structural defect in the caller's input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedInput {
    #[error("guest at position {position} has an empty id")]
    EmptyGuestId { position: usize },
    #[error("guest id `{id}` appears more than once")]
    DuplicateGuestId { id: String },
    #[error("guest `{id}` has negative arrival {arrival}")]
    NegativeArrival { id: String, arrival: i64 },
    #[error("the fleet must contain at least one vehicle")]
    NoVehicles,
    #[error("vehicle {vehicle} has non-positive capacity {capacity}")]
    NonPositiveCapacity { vehicle: usize, capacity: i64 },
    #[error("expected {num_vehicles} vehicle capacities but got {capacities}")]
    CapacityCountMismatch {
        num_vehicles: usize,
        capacities: usize,
    },
    #[error("neither `vehicle_capacities` nor `capacity_per_vehicle` was given")]
    MissingCapacity,
    #[error("max_wait must be non-negative, got {max_wait}")]
    NegativeMaxWait { max_wait: i64 },
    #[error("round_trip must be positive, got {round_trip}")]
    NonPositiveRoundTrip { round_trip: i64 },
    #[error("time_horizon must be non-negative, got {horizon}")]
    NegativeTimeHorizon { horizon: i64 },
    #[error("{rule} references unknown guest `{id}`")]
    UnknownGuest { rule: RuleKind, id: String },
    #[error("{rule} pairs guest `{id}` with itself")]
    SelfPairedRule { rule: RuleKind, id: String },
    #[error("incompatible pair (`{first}`, `{second}`) is listed more than once")]
    DuplicateIncompatiblePair { first: String, second: String },
    #[error("pinned vehicle {vehicle} is out of range for a fleet of {num_vehicles}")]
    PinnedVehicleOutOfRange { vehicle: i64, num_vehicles: usize },
}

impl MalformedInput {
    /// Returns the name of the input field that caused the error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shuttle_model::err::MalformedInput;
    ///
    /// let err = MalformedInput::NonPositiveRoundTrip { round_trip: 0 };
    /// assert_eq!(err.field(), "round_trip");
    /// ```
    pub fn field(&self) -> &'static str {
        match self {
            MalformedInput::EmptyGuestId { .. } | MalformedInput::DuplicateGuestId { .. } => {
                "guests.id"
            }
            MalformedInput::NegativeArrival { .. } => "guests.arrival",
            MalformedInput::NoVehicles => "num_vehicles",
            MalformedInput::NonPositiveCapacity { .. }
            | MalformedInput::CapacityCountMismatch { .. } => "vehicle_capacities",
            MalformedInput::MissingCapacity => "capacity_per_vehicle",
            MalformedInput::NegativeMaxWait { .. } => "max_wait",
            MalformedInput::NonPositiveRoundTrip { .. } => "round_trip",
            MalformedInput::NegativeTimeHorizon { .. } => "time_horizon",
            MalformedInput::UnknownGuest { rule, .. }
            | MalformedInput::SelfPairedRule { rule, .. } => rule.field(),
            MalformedInput::DuplicateIncompatiblePair { .. } => "incompatible_pairs",
            MalformedInput::PinnedVehicleOutOfRange { .. } => "must_ride_together.vehicle_index",
        }
    }
}
