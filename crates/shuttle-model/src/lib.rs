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

//! # Shuttle Model
//!
//! **The domain model for the shuttle trip optimizer.**
//!
//! Guests arrive at a pickup point over time and have to be carried away by
//! a small, reusable fleet. This crate describes such an instance and the
//! plans that answer it. It is the data interchange layer between the
//! caller and the search engine (`shuttle_bnb`).
//!
//! ## Architecture
//!
//! * **`index`**: strongly-typed `GuestIndex`, `VehicleIndex` and `TripIndex`.
//! * **`model`**: the immutable `Model` and its validating `ModelBuilder`.
//! * **`err`**: `MalformedInput`, the structural input errors.
//! * **`objective`**: the objective pair and the configurable tie-break.
//! * **`plan`**: the output `Plan`.
//! * **`verify`**: mechanical re-verification of a plan against its model.
//! * **`relax`**: relaxed model copies used to explain infeasibility.
//! * **`infeasibility`**: the reasons reported for infeasible instances.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: indices are distinct types.
//! 2.  **Fail-Fast**: the builder rejects malformed input before any search starts.
//! 3.  **Trust but verify**: plans are plain data and can always be re-checked.

pub mod err;
pub mod index;
pub mod infeasibility;
pub mod model;
pub mod objective;
pub mod plan;
pub mod relax;
pub mod verify;
