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
    err::{MalformedInput, RuleKind},
    index::{GuestIndex, VehicleIndex},
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Time is measured in whole minutes on a single caller-defined axis.
pub type Minutes = i64;

/// The round trip duration used when the caller does not give one.
pub const DEFAULT_ROUND_TRIP: Minutes = 240;

/// A person that needs exactly one seat on exactly one trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guest {
    id: String,
    name: String,
    arrival: Minutes,
}

impl Guest {
    /// The caller-supplied unique identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name, carried through to the response untouched.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minute at which the guest shows up at the pickup point.
    #[inline]
    pub fn arrival(&self) -> Minutes {
        self.arrival
    }
}

impl std::fmt::Display for Guest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Guest(id: {}, arrival: {})", self.id, self.arrival)
    }
}

/// Two guests that must share a trip, optionally on a fixed vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TogetherRule {
    first: GuestIndex,
    second: GuestIndex,
    vehicle: Option<VehicleIndex>,
}

impl TogetherRule {
    #[inline]
    pub fn first(&self) -> GuestIndex {
        self.first
    }

    #[inline]
    pub fn second(&self) -> GuestIndex {
        self.second
    }

    /// The vehicle the shared trip has to use, if any.
    #[inline]
    pub fn vehicle(&self) -> Option<VehicleIndex> {
        self.vehicle
    }

    /// Returns the other member of the pair, or `None` if `guest` is not part of it.
    #[inline]
    pub fn partner_of(&self, guest: GuestIndex) -> Option<GuestIndex> {
        if guest == self.first {
            Some(self.second)
        } else if guest == self.second {
            Some(self.first)
        } else {
            None
        }
    }
}

/// The immutable, validated problem instance.
///
/// Guests are kept in the order the caller supplied them; `GuestIndex`
/// refers to that order. Incompatible pairs are normalized so that the
/// smaller index comes first and stored sorted, which makes the model
/// independent of the order in which rules were declared.
///
/// Construction goes through [`ModelBuilder`].
#[derive(Clone)]
pub struct Model {
    guests: Vec<Guest>,
    capacities: Vec<usize>,
    max_wait: Minutes,
    round_trip: Minutes,
    time_horizon: Option<Minutes>,
    together: Option<TogetherRule>,
    incompatible: Vec<(GuestIndex, GuestIndex)>,
    lookup: FxHashMap<String, GuestIndex>,
}

impl Model {
    /// Returns the number of guests in the model.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shuttle_model::model::ModelBuilder;
    ///
    /// let mut builder = ModelBuilder::new([4]);
    /// builder.add_guest("a", "Ada", 0).add_guest("b", "Bob", 10);
    /// let model = builder.build().unwrap();
    /// assert_eq!(model.num_guests(), 2);
    /// ```
    #[inline]
    pub fn num_guests(&self) -> usize {
        self.guests.len()
    }

    /// Returns the number of vehicles in the fleet.
    #[inline]
    pub fn num_vehicles(&self) -> usize {
        self.capacities.len()
    }

    #[inline]
    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    /// Returns the guest at `guest_index`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `guest_index` is out of bounds.
    #[inline]
    pub fn guest(&self, guest_index: GuestIndex) -> &Guest {
        let index = guest_index.get();
        debug_assert!(
            index < self.num_guests(),
            "called `Model::guest` with guest index out of bounds: the len is {} but the index is {}",
            self.num_guests(),
            index
        );
        &self.guests[index]
    }

    /// Returns the arrival minute of the guest at `guest_index`.
    #[inline]
    pub fn guest_arrival(&self, guest_index: GuestIndex) -> Minutes {
        self.guest(guest_index).arrival
    }

    /// Looks up a guest by its caller-supplied id.
    #[inline]
    pub fn find_guest(&self, id: &str) -> Option<GuestIndex> {
        self.lookup.get(id).copied()
    }

    #[inline]
    pub fn vehicle_capacities(&self) -> &[usize] {
        &self.capacities
    }

    /// Returns the seat count of the vehicle at `vehicle_index`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `vehicle_index` is out of bounds.
    #[inline]
    pub fn vehicle_capacity(&self, vehicle_index: VehicleIndex) -> usize {
        let index = vehicle_index.get();
        debug_assert!(
            index < self.num_vehicles(),
            "called `Model::vehicle_capacity` with vehicle index out of bounds: the len is {} but the index is {}",
            self.num_vehicles(),
            index
        );
        self.capacities[index]
    }

    /// The largest seat count in the fleet.
    #[inline]
    pub fn max_capacity(&self) -> usize {
        self.capacities.iter().copied().max().unwrap_or(0)
    }

    /// Maximum allowed gap between the first and the last arrival of a trip.
    #[inline]
    pub fn max_wait(&self) -> Minutes {
        self.max_wait
    }

    /// How long a vehicle is busy after it departs.
    #[inline]
    pub fn round_trip(&self) -> Minutes {
        self.round_trip
    }

    /// Latest allowed departure, if the instance has one.
    #[inline]
    pub fn time_horizon(&self) -> Option<Minutes> {
        self.time_horizon
    }

    #[inline]
    pub fn together(&self) -> Option<&TogetherRule> {
        self.together.as_ref()
    }

    /// Incompatible pairs, normalized and sorted.
    #[inline]
    pub fn incompatible_pairs(&self) -> &[(GuestIndex, GuestIndex)] {
        &self.incompatible
    }

    /// Returns `true` if the two guests may never share a trip.
    pub fn are_incompatible(&self, a: GuestIndex, b: GuestIndex) -> bool {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.incompatible.binary_search(&key).is_ok()
    }

    /// Difference between the latest and the earliest arrival, zero without guests.
    pub fn arrival_spread(&self) -> Minutes {
        let min = self.guests.iter().map(|g| g.arrival).min();
        let max = self.guests.iter().map(|g| g.arrival).max();
        match (min, max) {
            (Some(min), Some(max)) => max - min,
            _ => 0,
        }
    }

    pub(crate) fn with_parts(
        &self,
        capacities: Vec<usize>,
        max_wait: Minutes,
        time_horizon: Option<Minutes>,
        together: Option<TogetherRule>,
    ) -> Model {
        Model {
            guests: self.guests.clone(),
            capacities,
            max_wait,
            round_trip: self.round_trip,
            time_horizon,
            together,
            incompatible: self.incompatible.clone(),
            lookup: self.lookup.clone(),
        }
    }

    pub(crate) fn unpinned_together(&self) -> Option<TogetherRule> {
        self.together.map(|rule| TogetherRule {
            vehicle: None,
            ..rule
        })
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("guests", &self.guests)
            .field("capacities", &self.capacities)
            .field("max_wait", &self.max_wait)
            .field("round_trip", &self.round_trip)
            .field("time_horizon", &self.time_horizon)
            .field("together", &self.together)
            .field("incompatible", &self.incompatible)
            .finish()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model(num_guests: {}, num_vehicles: {}, max_wait: {}, round_trip: {})",
            self.num_guests(),
            self.num_vehicles(),
            self.max_wait,
            self.round_trip
        )
    }
}

/// Mutable staging area for a [`Model`].
///
/// Setters accept raw, unchecked values (signed integers and string ids)
/// so that every structural defect surfaces as a [`MalformedInput`] from
/// [`ModelBuilder::build`] instead of at the call site.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    guests: Vec<(String, String, i64)>,
    capacities: Vec<i64>,
    max_wait: i64,
    round_trip: i64,
    time_horizon: Option<i64>,
    together: Option<(String, String, Option<i64>)>,
    incompatible: Vec<(String, String)>,
}

impl ModelBuilder {
    /// Creates a builder for the given fleet.
    ///
    /// Defaults: no guests, `max_wait = 0`, `round_trip = 240`, no horizon
    /// and no pairing rules.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shuttle_model::model::ModelBuilder;
    ///
    /// let model = ModelBuilder::new([9, 4]).build().unwrap();
    /// assert_eq!(model.num_vehicles(), 2);
    /// assert_eq!(model.round_trip(), 240);
    /// ```
    pub fn new<I>(capacities: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        Self {
            guests: Vec::new(),
            capacities: capacities.into_iter().collect(),
            max_wait: 0,
            round_trip: DEFAULT_ROUND_TRIP,
            time_horizon: None,
            together: None,
            incompatible: Vec::new(),
        }
    }

    #[inline]
    pub fn num_guests(&self) -> usize {
        self.guests.len()
    }

    /// Appends a guest. Its `GuestIndex` is the number of guests added before it.
    pub fn add_guest(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        arrival: i64,
    ) -> &mut Self {
        self.guests.push((id.into(), name.into(), arrival));
        self
    }

    pub fn set_max_wait(&mut self, max_wait: i64) -> &mut Self {
        self.max_wait = max_wait;
        self
    }

    pub fn set_round_trip(&mut self, round_trip: i64) -> &mut Self {
        self.round_trip = round_trip;
        self
    }

    pub fn set_time_horizon(&mut self, horizon: Option<i64>) -> &mut Self {
        self.time_horizon = horizon;
        self
    }

    /// Sets the must-ride-together rule, replacing any previous one.
    pub fn set_together(
        &mut self,
        first: impl Into<String>,
        second: impl Into<String>,
        vehicle: Option<i64>,
    ) -> &mut Self {
        self.together = Some((first.into(), second.into(), vehicle));
        self
    }

    pub fn add_incompatible_pair(
        &mut self,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> &mut Self {
        self.incompatible.push((first.into(), second.into()));
        self
    }

    /// Validates the staged data and freezes it into a [`Model`].
    ///
    /// # Errors
    ///
    /// Returns the first [`MalformedInput`] found, checking the fleet,
    /// then guests, then scalar parameters, then pairing rules.
    pub fn build(self) -> Result<Model, MalformedInput> {
        if self.capacities.is_empty() {
            return Err(MalformedInput::NoVehicles);
        }
        let mut capacities = Vec::with_capacity(self.capacities.len());
        for (vehicle, &capacity) in self.capacities.iter().enumerate() {
            if capacity < 1 {
                return Err(MalformedInput::NonPositiveCapacity { vehicle, capacity });
            }
            capacities.push(capacity as usize);
        }

        let mut lookup = FxHashMap::default();
        lookup.reserve(self.guests.len());
        let mut guests = Vec::with_capacity(self.guests.len());
        for (position, (id, name, arrival)) in self.guests.into_iter().enumerate() {
            if id.is_empty() {
                return Err(MalformedInput::EmptyGuestId { position });
            }
            if arrival < 0 {
                return Err(MalformedInput::NegativeArrival { id, arrival });
            }
            if lookup.insert(id.clone(), GuestIndex::new(position)).is_some() {
                return Err(MalformedInput::DuplicateGuestId { id });
            }
            guests.push(Guest { id, name, arrival });
        }

        if self.max_wait < 0 {
            return Err(MalformedInput::NegativeMaxWait {
                max_wait: self.max_wait,
            });
        }
        if self.round_trip <= 0 {
            return Err(MalformedInput::NonPositiveRoundTrip {
                round_trip: self.round_trip,
            });
        }
        if let Some(horizon) = self.time_horizon
            && horizon < 0
        {
            return Err(MalformedInput::NegativeTimeHorizon { horizon });
        }

        let resolve = |rule: RuleKind,
                       a: &str,
                       b: &str|
         -> Result<(GuestIndex, GuestIndex), MalformedInput> {
            let first = *lookup.get(a).ok_or_else(|| MalformedInput::UnknownGuest {
                rule,
                id: a.to_string(),
            })?;
            let second = *lookup.get(b).ok_or_else(|| MalformedInput::UnknownGuest {
                rule,
                id: b.to_string(),
            })?;
            if first == second {
                return Err(MalformedInput::SelfPairedRule {
                    rule,
                    id: a.to_string(),
                });
            }
            Ok((first, second))
        };

        let together = match &self.together {
            None => None,
            Some((a, b, vehicle)) => {
                let (first, second) = resolve(RuleKind::Together, a, b)?;
                let vehicle = match *vehicle {
                    None => None,
                    Some(v) if v >= 0 && (v as usize) < capacities.len() => {
                        Some(VehicleIndex::new(v as usize))
                    }
                    Some(v) => {
                        return Err(MalformedInput::PinnedVehicleOutOfRange {
                            vehicle: v,
                            num_vehicles: capacities.len(),
                        });
                    }
                };
                Some(TogetherRule {
                    first,
                    second,
                    vehicle,
                })
            }
        };

        let mut seen = FxHashSet::default();
        let mut incompatible = Vec::with_capacity(self.incompatible.len());
        for (a, b) in &self.incompatible {
            let (first, second) = resolve(RuleKind::Incompatible, a, b)?;
            let key = if first < second {
                (first, second)
            } else {
                (second, first)
            };
            if !seen.insert(key) {
                return Err(MalformedInput::DuplicateIncompatiblePair {
                    first: a.clone(),
                    second: b.clone(),
                });
            }
            incompatible.push(key);
        }
        incompatible.sort_unstable();

        Ok(Model {
            guests,
            capacities,
            max_wait: self.max_wait,
            round_trip: self.round_trip,
            time_horizon: self.time_horizon,
            together,
            incompatible,
            lookup,
        })
    }
}

impl std::fmt::Display for ModelBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ModelBuilder(num_guests: {}, num_vehicles: {})",
            self.guests.len(),
            self.capacities.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(i: usize) -> GuestIndex {
        GuestIndex::new(i)
    }

    fn three_guests() -> ModelBuilder {
        let mut builder = ModelBuilder::new([4, 2]);
        builder
            .add_guest("a", "Ada", 0)
            .add_guest("b", "Bob", 15)
            .add_guest("c", "Cy", 30)
            .set_max_wait(60);
        builder
    }

    #[test]
    fn test_build_valid_model() {
        let mut builder = three_guests();
        builder
            .set_together("a", "c", Some(1))
            .add_incompatible_pair("c", "b");
        let model = builder.build().expect("valid model");

        assert_eq!(model.num_guests(), 3);
        assert_eq!(model.num_vehicles(), 2);
        assert_eq!(model.max_capacity(), 4);
        assert_eq!(model.vehicle_capacity(VehicleIndex::new(1)), 2);
        assert_eq!(model.guest_arrival(g(1)), 15);
        assert_eq!(model.find_guest("c"), Some(g(2)));
        assert_eq!(model.arrival_spread(), 30);

        let rule = model.together().expect("rule");
        assert_eq!(rule.partner_of(g(0)), Some(g(2)));
        assert_eq!(rule.partner_of(g(1)), None);
        assert_eq!(rule.vehicle(), Some(VehicleIndex::new(1)));

        assert_eq!(model.incompatible_pairs(), &[(g(1), g(2))]);
        assert!(model.are_incompatible(g(2), g(1)));
        assert!(!model.are_incompatible(g(0), g(1)));
    }

    #[test]
    fn test_incompatible_pairs_are_order_independent() {
        let mut first = three_guests();
        first
            .add_incompatible_pair("a", "b")
            .add_incompatible_pair("c", "b");
        let mut second = three_guests();
        second
            .add_incompatible_pair("b", "c")
            .add_incompatible_pair("b", "a");

        let first = first.build().unwrap();
        let second = second.build().unwrap();
        assert_eq!(first.incompatible_pairs(), second.incompatible_pairs());
    }

    #[test]
    fn test_empty_fleet_rejected() {
        let err = ModelBuilder::new(std::iter::empty()).build().unwrap_err();
        assert_eq!(err, MalformedInput::NoVehicles);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = ModelBuilder::new([3, 0]).build().unwrap_err();
        assert_eq!(
            err,
            MalformedInput::NonPositiveCapacity {
                vehicle: 1,
                capacity: 0
            }
        );
    }

    #[test]
    fn test_guest_defects_rejected() {
        let mut builder = ModelBuilder::new([1]);
        builder.add_guest("", "nobody", 0);
        assert_eq!(
            builder.build().unwrap_err(),
            MalformedInput::EmptyGuestId { position: 0 }
        );

        let mut builder = ModelBuilder::new([1]);
        builder.add_guest("a", "A", 0).add_guest("a", "A again", 5);
        assert_eq!(
            builder.build().unwrap_err(),
            MalformedInput::DuplicateGuestId { id: "a".into() }
        );

        let mut builder = ModelBuilder::new([1]);
        builder.add_guest("a", "A", -1);
        assert_eq!(
            builder.build().unwrap_err(),
            MalformedInput::NegativeArrival {
                id: "a".into(),
                arrival: -1
            }
        );
    }

    #[test]
    fn test_scalar_defects_rejected() {
        let mut builder = three_guests();
        builder.set_max_wait(-1);
        assert_eq!(builder.build().unwrap_err().field(), "max_wait");

        let mut builder = three_guests();
        builder.set_round_trip(0);
        assert_eq!(builder.build().unwrap_err().field(), "round_trip");

        let mut builder = three_guests();
        builder.set_time_horizon(Some(-5));
        assert_eq!(builder.build().unwrap_err().field(), "time_horizon");
    }

    #[test]
    fn test_rule_defects_rejected() {
        let mut builder = three_guests();
        builder.set_together("a", "zed", None);
        assert_eq!(
            builder.build().unwrap_err(),
            MalformedInput::UnknownGuest {
                rule: RuleKind::Together,
                id: "zed".into()
            }
        );

        let mut builder = three_guests();
        builder.add_incompatible_pair("b", "b");
        assert_eq!(
            builder.build().unwrap_err(),
            MalformedInput::SelfPairedRule {
                rule: RuleKind::Incompatible,
                id: "b".into()
            }
        );

        let mut builder = three_guests();
        builder.set_together("a", "b", Some(2));
        assert_eq!(
            builder.build().unwrap_err(),
            MalformedInput::PinnedVehicleOutOfRange {
                vehicle: 2,
                num_vehicles: 2
            }
        );

        let mut builder = three_guests();
        builder
            .add_incompatible_pair("a", "b")
            .add_incompatible_pair("b", "a");
        assert!(matches!(
            builder.build().unwrap_err(),
            MalformedInput::DuplicateIncompatiblePair { .. }
        ));
    }

    #[test]
    fn test_empty_guest_list_is_well_formed() {
        let model = ModelBuilder::new([5]).build().unwrap();
        assert_eq!(model.num_guests(), 0);
        assert_eq!(model.arrival_spread(), 0);
    }

    #[test]
    fn test_display() {
        let model = three_guests().build().unwrap();
        assert_eq!(
            format!("{}", model),
            "Model(num_guests: 3, num_vehicles: 2, max_wait: 60, round_trip: 240)"
        );
    }
}
