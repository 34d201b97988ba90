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

//! Mechanical re-verification of a [`Plan`] against its [`Model`].

use crate::{
    index::{GuestIndex, TripIndex, VehicleIndex},
    model::{Minutes, Model},
    plan::Plan,
};

/// A broken plan invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanViolation {
    #[error("plan has {trips} trips for {guests} guests")]
    TooManyTrips { trips: usize, guests: usize },
    #[error("trip at position {position} carries index {index}")]
    TripIndexMismatch { position: usize, index: TripIndex },
    #[error("{trip} carries no guests")]
    EmptyTrip { trip: TripIndex },
    #[error("{trip} uses unknown {vehicle}")]
    UnknownVehicle { trip: TripIndex, vehicle: VehicleIndex },
    #[error("{trip} carries unknown {guest}")]
    UnknownGuest { trip: TripIndex, guest: GuestIndex },
    #[error("{guest} is not on any trip")]
    GuestMissing { guest: GuestIndex },
    #[error("{guest} is on more than one trip")]
    GuestRepeated { guest: GuestIndex },
    #[error("{trip} carries {size} guests but its vehicle seats {capacity}")]
    CapacityExceeded {
        trip: TripIndex,
        size: usize,
        capacity: usize,
    },
    #[error("{trip} departs at {departure} but its last guest arrives at {expected}")]
    DepartureMismatch {
        trip: TripIndex,
        departure: Minutes,
        expected: Minutes,
    },
    #[error("{trip} spans {spread} minutes of arrivals, more than max_wait {max_wait}")]
    WindowExceeded {
        trip: TripIndex,
        spread: Minutes,
        max_wait: Minutes,
    },
    #[error("{trip} departs at {departure}, after the horizon {horizon}")]
    HorizonExceeded {
        trip: TripIndex,
        departure: Minutes,
        horizon: Minutes,
    },
    #[error("{vehicle} serves {first} and {second} at overlapping times")]
    Overlap {
        vehicle: VehicleIndex,
        first: TripIndex,
        second: TripIndex,
    },
    #[error("{first} and {second} must ride together")]
    TogetherSplit { first: GuestIndex, second: GuestIndex },
    #[error("{trip} must use {expected} but uses {actual}")]
    PinViolated {
        trip: TripIndex,
        expected: VehicleIndex,
        actual: VehicleIndex,
    },
    #[error("{first} and {second} are incompatible but share {trip}")]
    IncompatibleShared {
        trip: TripIndex,
        first: GuestIndex,
        second: GuestIndex,
    },
    #[error("plan reports total wait {reported} but the trips add up to {actual}")]
    TotalWaitMismatch { reported: Minutes, actual: Minutes },
    #[error("plan reports {reported} trips used but lists {actual}")]
    TripCountMismatch { reported: usize, actual: usize },
}

pub(crate) fn verify_plan(model: &Model, plan: &Plan) -> Result<(), PlanViolation> {
    let num_guests = model.num_guests();
    let trips = plan.trips();
    if trips.len() > num_guests {
        return Err(PlanViolation::TooManyTrips {
            trips: trips.len(),
            guests: num_guests,
        });
    }

    let mut trip_of: Vec<Option<usize>> = vec![None; num_guests];
    let mut total_wait: Minutes = 0;

    for (position, trip) in trips.iter().enumerate() {
        let index = trip.index();
        if index.get() != position {
            return Err(PlanViolation::TripIndexMismatch { position, index });
        }
        if trip.is_empty() {
            return Err(PlanViolation::EmptyTrip { trip: index });
        }
        let vehicle = trip.vehicle();
        if vehicle.get() >= model.num_vehicles() {
            return Err(PlanViolation::UnknownVehicle {
                trip: index,
                vehicle,
            });
        }

        let mut earliest = Minutes::MAX;
        let mut latest = Minutes::MIN;
        for &guest in trip.guests() {
            let slot = trip_of
                .get_mut(guest.get())
                .ok_or(PlanViolation::UnknownGuest { trip: index, guest })?;
            if slot.is_some() {
                return Err(PlanViolation::GuestRepeated { guest });
            }
            *slot = Some(position);
            let arrival = model.guest_arrival(guest);
            earliest = earliest.min(arrival);
            latest = latest.max(arrival);
            total_wait = total_wait.saturating_add(trip.departure() - arrival);
        }

        let capacity = model.vehicle_capacity(vehicle);
        if trip.len() > capacity {
            return Err(PlanViolation::CapacityExceeded {
                trip: index,
                size: trip.len(),
                capacity,
            });
        }
        if trip.departure() != latest {
            return Err(PlanViolation::DepartureMismatch {
                trip: index,
                departure: trip.departure(),
                expected: latest,
            });
        }
        if latest - earliest > model.max_wait() {
            return Err(PlanViolation::WindowExceeded {
                trip: index,
                spread: latest - earliest,
                max_wait: model.max_wait(),
            });
        }
        if let Some(horizon) = model.time_horizon()
            && trip.departure() > horizon
        {
            return Err(PlanViolation::HorizonExceeded {
                trip: index,
                departure: trip.departure(),
                horizon,
            });
        }
    }

    if let Some(missing) = trip_of.iter().position(Option::is_none) {
        return Err(PlanViolation::GuestMissing {
            guest: GuestIndex::new(missing),
        });
    }
    let trip_position = |guest: GuestIndex| trip_of[guest.get()].unwrap_or(usize::MAX);

    if let Some(rule) = model.together() {
        let position = trip_position(rule.first());
        if position != trip_position(rule.second()) {
            return Err(PlanViolation::TogetherSplit {
                first: rule.first(),
                second: rule.second(),
            });
        }
        if let Some(expected) = rule.vehicle() {
            let trip = &trips[position];
            if trip.vehicle() != expected {
                return Err(PlanViolation::PinViolated {
                    trip: trip.index(),
                    expected,
                    actual: trip.vehicle(),
                });
            }
        }
    }

    for &(first, second) in model.incompatible_pairs() {
        let position = trip_position(first);
        if position == trip_position(second) {
            return Err(PlanViolation::IncompatibleShared {
                trip: trips[position].index(),
                first,
                second,
            });
        }
    }

    let mut by_vehicle: Vec<Vec<(Minutes, TripIndex)>> = vec![Vec::new(); model.num_vehicles()];
    for trip in trips {
        by_vehicle[trip.vehicle().get()].push((trip.departure(), trip.index()));
    }
    for (vehicle, busy) in by_vehicle.iter_mut().enumerate() {
        busy.sort_unstable();
        for pair in busy.windows(2) {
            let (first_departure, first) = pair[0];
            let (second_departure, second) = pair[1];
            if second_departure < first_departure.saturating_add(model.round_trip()) {
                return Err(PlanViolation::Overlap {
                    vehicle: VehicleIndex::new(vehicle),
                    first,
                    second,
                });
            }
        }
    }

    if plan.total_wait() != total_wait {
        return Err(PlanViolation::TotalWaitMismatch {
            reported: plan.total_wait(),
            actual: total_wait,
        });
    }
    if plan.trips_used() != trips.len() {
        return Err(PlanViolation::TripCountMismatch {
            reported: plan.trips_used(),
            actual: trips.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::ModelBuilder, objective::Objective, plan::PlannedTrip};

    fn g(i: usize) -> GuestIndex {
        GuestIndex::new(i)
    }

    fn t(i: usize) -> TripIndex {
        TripIndex::new(i)
    }

    fn v(i: usize) -> VehicleIndex {
        VehicleIndex::new(i)
    }

    fn model() -> Model {
        let mut builder = ModelBuilder::new([2, 1]);
        builder
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 10)
            .add_guest("c", "C", 100)
            .set_max_wait(30)
            .set_round_trip(60)
            .set_together("a", "b", Some(0))
            .add_incompatible_pair("b", "c");
        builder.build().unwrap()
    }

    fn valid_plan() -> Plan {
        Plan::new(
            vec![
                PlannedTrip::new(t(0), v(0), 10, [g(0), g(1)]),
                PlannedTrip::new(t(1), v(0), 100, [g(2)]),
            ],
            Objective::new(10, 2),
        )
    }

    #[test]
    fn test_valid_plan_passes() {
        assert_eq!(valid_plan().verify(&model()), Ok(()));
    }

    #[test]
    fn test_missing_guest_detected() {
        let plan = Plan::new(
            vec![PlannedTrip::new(t(0), v(0), 10, [g(0), g(1)])],
            Objective::new(10, 1),
        );
        assert_eq!(
            plan.verify(&model()),
            Err(PlanViolation::GuestMissing { guest: g(2) })
        );
    }

    #[test]
    fn test_repeated_guest_detected() {
        let plan = Plan::new(
            vec![
                PlannedTrip::new(t(0), v(0), 10, [g(0), g(1)]),
                PlannedTrip::new(t(1), v(1), 100, [g(2), g(1)]),
            ],
            Objective::new(10, 2),
        );
        assert_eq!(
            plan.verify(&model()),
            Err(PlanViolation::GuestRepeated { guest: g(1) })
        );
    }

    #[test]
    fn test_capacity_detected() {
        let plan = Plan::new(
            vec![
                PlannedTrip::new(t(0), v(1), 10, [g(0), g(1)]),
                PlannedTrip::new(t(1), v(0), 100, [g(2)]),
            ],
            Objective::new(10, 2),
        );
        assert!(matches!(
            plan.verify(&model()),
            Err(PlanViolation::CapacityExceeded { size: 2, capacity: 1, .. })
        ));
    }

    #[test]
    fn test_window_and_departure_detected() {
        let plan = Plan::new(
            vec![
                PlannedTrip::new(t(0), v(0), 5, [g(0), g(1)]),
                PlannedTrip::new(t(1), v(1), 100, [g(2)]),
            ],
            Objective::new(5, 2),
        );
        assert!(matches!(
            plan.verify(&model()),
            Err(PlanViolation::DepartureMismatch { expected: 10, .. })
        ));

        let plan = Plan::new(
            vec![PlannedTrip::new(t(0), v(0), 100, [g(0), g(1), g(2)])],
            Objective::new(190, 1),
        );
        assert!(matches!(
            plan.verify(&model()),
            Err(PlanViolation::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_overlap_detected() {
        let mut builder = ModelBuilder::new([1]);
        builder
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 30)
            .set_round_trip(60);
        let model = builder.build().unwrap();
        let plan = Plan::new(
            vec![
                PlannedTrip::new(t(0), v(0), 0, [g(0)]),
                PlannedTrip::new(t(1), v(0), 30, [g(1)]),
            ],
            Objective::new(0, 2),
        );
        assert_eq!(
            plan.verify(&model),
            Err(PlanViolation::Overlap {
                vehicle: v(0),
                first: t(0),
                second: t(1)
            })
        );
    }

    #[test]
    fn test_back_to_back_trips_do_not_overlap() {
        let mut builder = ModelBuilder::new([1]);
        builder
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 60)
            .set_round_trip(60);
        let model = builder.build().unwrap();
        let plan = Plan::new(
            vec![
                PlannedTrip::new(t(0), v(0), 0, [g(0)]),
                PlannedTrip::new(t(1), v(0), 60, [g(1)]),
            ],
            Objective::new(0, 2),
        );
        assert_eq!(plan.verify(&model), Ok(()));
    }

    #[test]
    fn test_pairing_rules_detected() {
        let plan = Plan::new(
            vec![
                PlannedTrip::new(t(0), v(1), 10, [g(1)]),
                PlannedTrip::new(t(1), v(0), 100, [g(0), g(2)]),
            ],
            Objective::new(100, 2),
        );
        assert!(matches!(
            plan.verify(&model()),
            Err(PlanViolation::WindowExceeded { spread: 100, .. })
        ));

        let plan = Plan::new(
            vec![
                PlannedTrip::new(t(0), v(1), 0, [g(0)]),
                PlannedTrip::new(t(1), v(0), 10, [g(1)]),
                PlannedTrip::new(t(2), v(0), 100, [g(2)]),
            ],
            Objective::new(0, 3),
        );
        assert_eq!(
            plan.verify(&model()),
            Err(PlanViolation::TogetherSplit {
                first: g(0),
                second: g(1)
            })
        );

        let plan = Plan::new(
            vec![
                PlannedTrip::new(t(0), v(1), 10, [g(0), g(1)]),
                PlannedTrip::new(t(1), v(0), 100, [g(2)]),
            ],
            Objective::new(10, 2),
        );
        // Vehicle 1 seats one guest, so capacity trips before the pin.
        assert!(matches!(
            plan.verify(&model()),
            Err(PlanViolation::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_incompatible_detected() {
        let mut builder = ModelBuilder::new([3]);
        builder
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 0)
            .set_max_wait(10)
            .add_incompatible_pair("a", "b");
        let model = builder.build().unwrap();
        let plan = Plan::new(
            vec![PlannedTrip::new(t(0), v(0), 0, [g(0), g(1)])],
            Objective::new(0, 1),
        );
        assert_eq!(
            plan.verify(&model),
            Err(PlanViolation::IncompatibleShared {
                trip: t(0),
                first: g(0),
                second: g(1)
            })
        );
    }

    #[test]
    fn test_objective_mismatch_detected() {
        let plan = Plan::new(valid_plan().trips().to_vec(), Objective::new(11, 2));
        assert_eq!(
            plan.verify(&model()),
            Err(PlanViolation::TotalWaitMismatch {
                reported: 11,
                actual: 10
            })
        );
    }
}
