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

//! Relaxed copies of a model.
//!
//! Each relaxation removes exactly one family of restrictions. Solving the
//! relaxed copy tells which restriction is responsible when the original
//! instance turns out to be infeasible.

use crate::model::Model;

/// A single restriction to lift from a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relaxation {
    /// Widens `max_wait` to the full arrival spread and drops the horizon.
    Window,
    /// Gives every vehicle a seat for every guest.
    Capacity,
    /// Keeps the together rule but drops its pinned vehicle.
    Pin,
    /// Repeats the fleet once per guest so no vehicle ever has to be reused.
    VehicleReuse,
}

impl Relaxation {
    /// Every relaxation, in the order causes are attributed.
    pub const ALL: [Relaxation; 4] = [
        Relaxation::Window,
        Relaxation::Capacity,
        Relaxation::Pin,
        Relaxation::VehicleReuse,
    ];
}

impl std::fmt::Display for Relaxation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Relaxation::Window => "window",
            Relaxation::Capacity => "capacity",
            Relaxation::Pin => "pin",
            Relaxation::VehicleReuse => "vehicle_reuse",
        };
        f.write_str(name)
    }
}

impl Model {
    /// Returns a copy of the model with `relaxation` applied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use shuttle_model::{model::ModelBuilder, relax::Relaxation};
    ///
    /// let mut builder = ModelBuilder::new([2]);
    /// builder.add_guest("a", "A", 0).add_guest("b", "B", 600).set_max_wait(90);
    /// let model = builder.build().unwrap();
    /// assert_eq!(model.relaxed(Relaxation::Window).max_wait(), 600);
    /// assert_eq!(model.relaxed(Relaxation::VehicleReuse).num_vehicles(), 2);
    /// ```
    pub fn relaxed(&self, relaxation: Relaxation) -> Model {
        match relaxation {
            Relaxation::Window => self.with_parts(
                self.vehicle_capacities().to_vec(),
                self.max_wait().max(self.arrival_spread()),
                None,
                self.together().copied(),
            ),
            Relaxation::Capacity => {
                let seats = self.num_guests().max(1);
                let capacities = self
                    .vehicle_capacities()
                    .iter()
                    .map(|&c| c.max(seats))
                    .collect();
                self.with_parts(
                    capacities,
                    self.max_wait(),
                    self.time_horizon(),
                    self.together().copied(),
                )
            }
            Relaxation::Pin => self.with_parts(
                self.vehicle_capacities().to_vec(),
                self.max_wait(),
                self.time_horizon(),
                self.unpinned_together(),
            ),
            Relaxation::VehicleReuse => {
                let copies = self.num_guests().max(1);
                let capacities = self
                    .vehicle_capacities()
                    .iter()
                    .copied()
                    .cycle()
                    .take(self.num_vehicles() * copies)
                    .collect();
                self.with_parts(
                    capacities,
                    self.max_wait(),
                    self.time_horizon(),
                    self.together().copied(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{index::VehicleIndex, model::ModelBuilder};

    fn model() -> Model {
        let mut builder = ModelBuilder::new([1, 3]);
        builder
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 50)
            .add_guest("c", "C", 200)
            .set_max_wait(10)
            .set_time_horizon(Some(100))
            .set_together("a", "b", Some(0));
        builder.build().unwrap()
    }

    #[test]
    fn test_window_relaxation() {
        let relaxed = model().relaxed(Relaxation::Window);
        assert_eq!(relaxed.max_wait(), 200);
        assert_eq!(relaxed.time_horizon(), None);
        assert_eq!(relaxed.vehicle_capacities(), &[1, 3]);
    }

    #[test]
    fn test_capacity_relaxation() {
        let relaxed = model().relaxed(Relaxation::Capacity);
        assert_eq!(relaxed.vehicle_capacities(), &[3, 3]);
        assert_eq!(relaxed.max_wait(), 10);
    }

    #[test]
    fn test_pin_relaxation_keeps_pair() {
        let relaxed = model().relaxed(Relaxation::Pin);
        let rule = relaxed.together().expect("rule kept");
        assert_eq!(rule.vehicle(), None);
        assert_eq!(rule.first(), model().together().unwrap().first());
    }

    #[test]
    fn test_vehicle_reuse_relaxation_repeats_fleet() {
        let relaxed = model().relaxed(Relaxation::VehicleReuse);
        assert_eq!(relaxed.vehicle_capacities(), &[1, 3, 1, 3, 1, 3]);
        assert_eq!(
            relaxed.together().unwrap().vehicle(),
            Some(VehicleIndex::new(0))
        );
    }
}
