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

//! Search encoding of a problem instance.
//!
//! The search never looks at guests in caller order. `Encoding` sorts them by
//! `(arrival, id)` and renames them to *positions* `0..n` in that order; all
//! search structures are indexed by position. It also flattens the pairing
//! rules into O(1) lookups:
//!
//! - a dense `n × n` incompatibility bit matrix,
//! - a partner table for the together rule,
//! - the seat limit a trip has depending on whether it carries the pinned pair.
//!
//! The encoding owns everything it needs and is `Sync`, so parallel workers
//! can share one instance by reference.

use fixedbitset::FixedBitSet;
use shuttle_model::{
    index::{GuestIndex, VehicleIndex},
    model::{Minutes, Model},
    objective::{Objective, TieBreak},
};

/// Flattened, position-indexed view of a [`Model`].
#[derive(Debug, Clone)]
pub struct Encoding {
    order: Vec<GuestIndex>,
    position_of: Vec<usize>,
    arrivals: Vec<Minutes>,
    partner: Vec<Option<usize>>,
    conflicts: FixedBitSet,
    capacities: Vec<usize>,
    max_capacity: usize,
    pinned_vehicle: Option<VehicleIndex>,
    max_wait: Minutes,
    round_trip: Minutes,
    time_horizon: Option<Minutes>,
    tie_break: TieBreak,
}

impl Encoding {
    /// Builds the encoding of `model` under the given tie-break rule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shuttle_bnb::encoder::Encoding;
    /// # use shuttle_model::{model::ModelBuilder, objective::TieBreak};
    ///
    /// let mut builder = ModelBuilder::new([4]);
    /// builder
    ///     .add_guest("late", "L", 30)
    ///     .add_guest("b", "B", 0)
    ///     .add_guest("a", "A", 0);
    /// let model = builder.build().unwrap();
    /// let encoding = Encoding::new(&model, TieBreak::FewerTrips);
    /// assert_eq!(encoding.guest_at(0).get(), 2); // "a" before "b" at minute 0
    /// assert_eq!(encoding.arrival(2), 30);
    /// ```
    pub fn new(model: &Model, tie_break: TieBreak) -> Self {
        let n = model.num_guests();

        let mut order: Vec<GuestIndex> = (0..n).map(GuestIndex::new).collect();
        order.sort_by(|&a, &b| {
            let (ga, gb) = (model.guest(a), model.guest(b));
            ga.arrival()
                .cmp(&gb.arrival())
                .then_with(|| ga.id().cmp(gb.id()))
        });

        let mut position_of = vec![0; n];
        for (position, guest) in order.iter().enumerate() {
            position_of[guest.get()] = position;
        }
        let arrivals = order.iter().map(|&g| model.guest_arrival(g)).collect();

        let mut partner = vec![None; n];
        let mut pinned_vehicle = None;
        if let Some(rule) = model.together() {
            let a = position_of[rule.first().get()];
            let b = position_of[rule.second().get()];
            partner[a] = Some(b);
            partner[b] = Some(a);
            pinned_vehicle = rule.vehicle();
        }

        let mut conflicts = FixedBitSet::with_capacity(n * n);
        for &(first, second) in model.incompatible_pairs() {
            let a = position_of[first.get()];
            let b = position_of[second.get()];
            conflicts.insert(a * n + b);
            conflicts.insert(b * n + a);
        }

        Self {
            order,
            position_of,
            arrivals,
            partner,
            conflicts,
            capacities: model.vehicle_capacities().to_vec(),
            max_capacity: model.max_capacity(),
            pinned_vehicle,
            max_wait: model.max_wait(),
            round_trip: model.round_trip(),
            time_horizon: model.time_horizon(),
            tie_break,
        }
    }

    #[inline]
    pub fn num_guests(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn num_vehicles(&self) -> usize {
        self.capacities.len()
    }

    /// Returns the guest placed at sorted `position`.
    #[inline]
    pub fn guest_at(&self, position: usize) -> GuestIndex {
        debug_assert!(
            position < self.num_guests(),
            "called `Encoding::guest_at` with position out of bounds: the len is {} but the index is {}",
            self.num_guests(),
            position
        );
        self.order[position]
    }

    /// Returns the sorted position of `guest`.
    #[inline]
    pub fn position_of(&self, guest: GuestIndex) -> usize {
        self.position_of[guest.get()]
    }

    #[inline]
    pub fn arrival(&self, position: usize) -> Minutes {
        debug_assert!(
            position < self.num_guests(),
            "called `Encoding::arrival` with position out of bounds: the len is {} but the index is {}",
            self.num_guests(),
            position
        );
        self.arrivals[position]
    }

    #[inline]
    pub fn arrivals(&self) -> &[Minutes] {
        &self.arrivals
    }

    /// Together-rule partner of `position`, if it has one.
    #[inline]
    pub fn partner(&self, position: usize) -> Option<usize> {
        self.partner[position]
    }

    /// Partner of `position` that is placed after it in sorted order.
    #[inline]
    pub fn pending_partner(&self, position: usize) -> Option<usize> {
        self.partner[position].filter(|&q| q > position)
    }

    /// Returns `true` if the guests at positions `a` and `b` may not share a trip.
    #[inline]
    pub fn conflicts(&self, a: usize, b: usize) -> bool {
        self.conflicts.contains(a * self.num_guests() + b)
    }

    #[inline]
    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    #[inline]
    pub fn pinned_vehicle(&self) -> Option<VehicleIndex> {
        self.pinned_vehicle
    }

    /// Seat limit of a trip. A trip carrying the together pair is bound to the
    /// pinned vehicle if there is one; every other trip may use the largest
    /// vehicle of the fleet.
    #[inline]
    pub fn capacity_limit(&self, carries_pair: bool) -> usize {
        match (carries_pair, self.pinned_vehicle) {
            (true, Some(vehicle)) => self.capacities[vehicle.get()],
            _ => self.max_capacity,
        }
    }

    #[inline]
    pub fn max_wait(&self) -> Minutes {
        self.max_wait
    }

    #[inline]
    pub fn round_trip(&self) -> Minutes {
        self.round_trip
    }

    #[inline]
    pub fn time_horizon(&self) -> Option<Minutes> {
        self.time_horizon
    }

    #[inline]
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Single integer that orders objectives under this encoding's tie-break.
    #[inline]
    pub fn objective_key(&self, total_wait: Minutes, trips: usize) -> i64 {
        Objective::new(total_wait, trips).key(self.tie_break, self.num_guests())
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Encoding(num_guests: {}, num_vehicles: {}, tie_break: {})",
            self.num_guests(),
            self.num_vehicles(),
            self.tie_break
        )
    }
}
