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

//! JSON-facing request and response types.
//!
//! A [`SolveRequest`] carries the caller's raw input. [`solve_request`]
//! validates it into a [`Model`], solves it and reports the outcome as a
//! flat [`SolveResponse`] whose `status` is `ok`, `infeasible` or
//! `timeout`.

use crate::{
    config::{SolverBuilder, SolverConfig},
    outcome::{SolveResult, SolverOutcome, TerminationReason},
    solver::Solver,
};
use serde::{Deserialize, Serialize};
use shuttle_model::{
    err::MalformedInput,
    index::GuestIndex,
    model::{DEFAULT_ROUND_TRIP, Model, ModelBuilder},
    objective::TieBreak,
    plan::Plan,
};

fn default_round_trip() -> i64 {
    DEFAULT_ROUND_TRIP
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInput {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub arrival: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TogetherInput {
    pub guest_a: String,
    pub guest_b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_index: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakInput {
    FewerTrips,
    WaitOnly,
}

impl From<TieBreakInput> for TieBreak {
    fn from(value: TieBreakInput) -> Self {
        match value {
            TieBreakInput::FewerTrips => TieBreak::FewerTrips,
            TieBreakInput::WaitOnly => TieBreak::WaitOnly,
        }
    }
}

/// One problem instance as the caller sends it.
///
/// `vehicle_capacities` wins over `capacity_per_vehicle` when both are given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub num_vehicles: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_capacities: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_per_vehicle: Option<i64>,
    pub max_wait: i64,
    #[serde(default = "default_round_trip")]
    pub round_trip: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_horizon: Option<i64>,
    pub guests: Vec<GuestInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_ride_together: Option<TogetherInput>,
    #[serde(default)]
    pub incompatible_pairs: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_break: Option<TieBreakInput>,
}

impl SolveRequest {
    /// The per-vehicle capacities, resolved from either capacity field.
    ///
    /// # Errors
    ///
    /// `CapacityCountMismatch` if `vehicle_capacities` has the wrong length,
    /// `MissingCapacity` if neither field is present.
    pub fn capacities(&self) -> Result<Vec<i64>, MalformedInput> {
        match (&self.vehicle_capacities, self.capacity_per_vehicle) {
            (Some(capacities), _) if capacities.len() != self.num_vehicles => {
                Err(MalformedInput::CapacityCountMismatch {
                    num_vehicles: self.num_vehicles,
                    capacities: capacities.len(),
                })
            }
            (Some(capacities), _) => Ok(capacities.clone()),
            (None, Some(capacity)) => Ok(vec![capacity; self.num_vehicles]),
            (None, None) => Err(MalformedInput::MissingCapacity),
        }
    }

    /// Validates the request into a [`Model`].
    ///
    /// # Errors
    ///
    /// The first [`MalformedInput`] found.
    pub fn to_model(&self) -> Result<Model, MalformedInput> {
        let mut builder = ModelBuilder::new(self.capacities()?);
        builder
            .set_max_wait(self.max_wait)
            .set_round_trip(self.round_trip)
            .set_time_horizon(self.time_horizon);
        for guest in &self.guests {
            builder.add_guest(guest.id.as_str(), guest.name.as_str(), guest.arrival);
        }
        if let Some(rule) = &self.must_ride_together {
            builder.set_together(rule.guest_a.as_str(), rule.guest_b.as_str(), rule.vehicle_index);
        }
        for (a, b) in &self.incompatible_pairs {
            builder.add_incompatible_pair(a.as_str(), b.as_str());
        }
        builder.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    Ok,
    Infeasible,
    Timeout,
    /// The solver failed internally; no plan is reported.
    Error,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Ok => write!(f, "ok"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Timeout => write!(f, "timeout"),
            SolveStatus::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestReport {
    pub id: String,
    pub name: String,
    pub arrival: i64,
    pub wait: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripReport {
    pub trip_index: usize,
    pub vehicle_index: usize,
    pub vehicle_capacity: usize,
    pub departure: i64,
    pub arrival_window: [i64; 2],
    pub num_guests: usize,
    /// Sorted by `(arrival, id)`.
    pub guests: Vec<GuestReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanReport {
    pub num_guests: usize,
    pub num_vehicles: usize,
    pub vehicle_capacities: Vec<usize>,
    pub max_wait: i64,
    pub round_trip: i64,
    pub total_wait: i64,
    pub trips_used: usize,
    pub proven_optimal: bool,
    pub trips: Vec<TripReport>,
}

impl PlanReport {
    pub fn new(model: &Model, plan: &Plan, proven_optimal: bool) -> Self {
        let trips = plan
            .trips()
            .iter()
            .map(|trip| {
                let mut guests: Vec<GuestIndex> = trip.guests().to_vec();
                guests.sort_by(|&a, &b| {
                    let (ga, gb) = (model.guest(a), model.guest(b));
                    (ga.arrival(), ga.id()).cmp(&(gb.arrival(), gb.id()))
                });
                let (min, max) = trip
                    .arrival_window(model)
                    .unwrap_or((trip.departure(), trip.departure()));
                TripReport {
                    trip_index: trip.index().get(),
                    vehicle_index: trip.vehicle().get(),
                    vehicle_capacity: model.vehicle_capacity(trip.vehicle()),
                    departure: trip.departure(),
                    arrival_window: [min, max],
                    num_guests: trip.len(),
                    guests: guests
                        .into_iter()
                        .map(|g| {
                            let guest = model.guest(g);
                            GuestReport {
                                id: guest.id().to_string(),
                                name: guest.name().to_string(),
                                arrival: guest.arrival(),
                                wait: trip.wait_of(model, g),
                            }
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            num_guests: model.num_guests(),
            num_vehicles: model.num_vehicles(),
            vehicle_capacities: model.vehicle_capacities().to_vec(),
            max_wait: model.max_wait(),
            round_trip: model.round_trip(),
            total_wait: plan.total_wait(),
            trips_used: plan.trips_used(),
            proven_optimal,
            trips,
        }
    }
}

/// The answer to a [`SolveRequest`].
///
/// `ok` always carries a proven-optimal plan, `infeasible` a reason,
/// `timeout` a reason plus the best plan found, if any, and `error` the
/// constraint a found plan broke on re-verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub status: SolveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub plan: Option<PlanReport>,
}

impl SolveResponse {
    /// Reports `outcome`, a solve of `model`.
    pub fn from_outcome(model: &Model, outcome: &SolverOutcome) -> Self {
        let stopped = match outcome.termination_reason() {
            TerminationReason::Aborted(msg) => msg.clone(),
            TerminationReason::VerificationFailed(violation) => {
                return Self {
                    status: SolveStatus::Error,
                    reason: Some(format!("plan failed verification: {violation}")),
                    plan: None,
                };
            }
            other => other.to_string(),
        };
        match outcome.result() {
            SolveResult::Optimal(plan) => Self {
                status: SolveStatus::Ok,
                reason: None,
                plan: Some(PlanReport::new(model, plan, true)),
            },
            SolveResult::Feasible(plan) => Self {
                status: SolveStatus::Timeout,
                reason: Some(stopped),
                plan: Some(PlanReport::new(model, plan, false)),
            },
            SolveResult::Infeasible(reason) => Self {
                status: SolveStatus::Infeasible,
                reason: Some(reason.to_string()),
                plan: None,
            },
            SolveResult::Unknown => Self {
                status: SolveStatus::Timeout,
                reason: Some(stopped),
                plan: None,
            },
        }
    }
}

/// Validates, solves and reports a single request.
///
/// A `tie_break` in the request overrides the one in `config`.
///
/// # Errors
///
/// Returns [`MalformedInput`] if the request is not well-formed; the solver
/// never starts in that case.
pub fn solve_request(
    request: &SolveRequest,
    config: &SolverConfig,
) -> Result<SolveResponse, MalformedInput> {
    let model = request.to_model()?;
    let config = match request.tie_break {
        Some(tie_break) => SolverBuilder::from(config.clone())
            .with_tie_break(tie_break.into())
            .build(),
        None => config.clone(),
    };
    let outcome = Solver::new(config).solve(&model);
    Ok(SolveResponse::from_outcome(&model, &outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> SolveRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_are_filled_in() {
        let req = request(json!({
            "num_vehicles": 2,
            "capacity_per_vehicle": 4,
            "max_wait": 30,
            "guests": [{ "id": "a", "arrival": 0 }]
        }));
        assert_eq!(req.round_trip, DEFAULT_ROUND_TRIP);
        assert_eq!(req.capacities(), Ok(vec![4, 4]));
        assert!(req.incompatible_pairs.is_empty());
        assert_eq!(req.guests[0].name, "");
    }

    #[test]
    fn test_capacity_fields() {
        let mut req = request(json!({
            "num_vehicles": 2,
            "vehicle_capacities": [3],
            "capacity_per_vehicle": 4,
            "max_wait": 0,
            "guests": []
        }));
        assert_eq!(
            req.capacities(),
            Err(MalformedInput::CapacityCountMismatch {
                num_vehicles: 2,
                capacities: 1
            })
        );
        req.vehicle_capacities = Some(vec![3, 5]);
        assert_eq!(req.capacities(), Ok(vec![3, 5]));
        req.vehicle_capacities = None;
        req.capacity_per_vehicle = None;
        assert_eq!(req.capacities(), Err(MalformedInput::MissingCapacity));
    }

    #[test]
    fn test_malformed_request_is_rejected() {
        let req = request(json!({
            "num_vehicles": 1,
            "capacity_per_vehicle": 2,
            "max_wait": 10,
            "round_trip": 0,
            "guests": [{ "id": "a", "name": "A", "arrival": 0 }]
        }));
        let err = solve_request(&req, &SolverConfig::default()).unwrap_err();
        assert_eq!(err.field(), "round_trip");
    }

    #[test]
    fn test_ok_response_shape() {
        let req = request(json!({
            "num_vehicles": 1,
            "vehicle_capacities": [3],
            "max_wait": 30,
            "round_trip": 60,
            "guests": [
                { "id": "b", "name": "Bea", "arrival": 10 },
                { "id": "a", "name": "Al", "arrival": 10 },
                { "id": "c", "name": "Cy", "arrival": 0 }
            ]
        }));
        let response = solve_request(&req, &SolverConfig::default()).unwrap();
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], "ok");
        assert_eq!(value["total_wait"], 10);
        assert_eq!(value["trips_used"], 1);
        assert_eq!(value["proven_optimal"], true);
        assert_eq!(value["num_guests"], 3);
        assert_eq!(value["vehicle_capacities"], json!([3]));
        assert!(value.get("reason").is_none());

        let trip = &value["trips"][0];
        assert_eq!(trip["departure"], 10);
        assert_eq!(trip["arrival_window"], json!([0, 10]));
        assert_eq!(trip["vehicle_capacity"], 3);
        let ids: Vec<&str> = trip["guests"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(trip["guests"][0]["wait"], 10);
    }

    #[test]
    fn test_infeasible_response_shape() {
        let req = request(json!({
            "num_vehicles": 1,
            "capacity_per_vehicle": 1,
            "max_wait": 10,
            "guests": [
                { "id": "a", "arrival": 0 },
                { "id": "b", "arrival": 0 }
            ],
            "must_ride_together": { "guest_a": "a", "guest_b": "b", "vehicle_index": 0 }
        }));
        let response = solve_request(&req, &SolverConfig::default()).unwrap();
        assert_eq!(response.status, SolveStatus::Infeasible);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["reason"], "capacity insufficient");
        assert!(value.get("trips").is_none());
    }

    #[test]
    fn test_request_tie_break_overrides_config() {
        // The first zero-wait grouping found uses three trips; {a,c},{b,d} uses two.
        let mut value = json!({
            "num_vehicles": 3,
            "capacity_per_vehicle": 2,
            "max_wait": 0,
            "guests": [
                { "id": "a", "arrival": 0 },
                { "id": "b", "arrival": 0 },
                { "id": "c", "arrival": 0 },
                { "id": "d", "arrival": 0 }
            ],
            "incompatible_pairs": [["a", "b"], ["a", "d"]]
        });
        let fewer = solve_request(&request(value.clone()), &SolverConfig::default()).unwrap();
        assert_eq!(fewer.plan.unwrap().trips_used, 2);

        value["tie_break"] = json!("wait_only");
        let wait_only = solve_request(&request(value), &SolverConfig::default()).unwrap();
        let plan = wait_only.plan.unwrap();
        assert_eq!(plan.total_wait, 0);
        assert_eq!(plan.trips_used, 3);
    }

    #[test]
    fn test_failed_verification_is_reported_as_error() {
        use crate::stats::SolveStatistics;
        use shuttle_model::verify::PlanViolation;

        let model = request(json!({
            "num_vehicles": 1,
            "capacity_per_vehicle": 2,
            "max_wait": 0,
            "guests": [{ "id": "a", "arrival": 0 }]
        }))
        .to_model()
        .unwrap();
        let outcome = SolverOutcome::verification_failed(
            PlanViolation::TotalWaitMismatch {
                reported: 0,
                actual: 5,
            },
            SolveStatistics::default(),
        );

        let response = SolveResponse::from_outcome(&model, &outcome);
        assert_eq!(response.status, SolveStatus::Error);
        assert!(response.plan.is_none());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(
            value["reason"],
            "plan failed verification: plan reports total wait 0 but the trips add up to 5"
        );
    }

    #[test]
    fn test_response_round_trips_through_json() {
        let response = SolveResponse {
            status: SolveStatus::Timeout,
            reason: Some("time limit reached".to_string()),
            plan: None,
        };
        let text = serde_json::to_string(&response).unwrap();
        assert_eq!(text, r#"{"status":"timeout","reason":"time limit reached"}"#);
        let back: SolveResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back, response);
    }
}
