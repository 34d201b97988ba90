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

//! # Shuttle Solver
//!
//! **The entry point of the shuttle trip optimizer.**
//!
//! This crate drives `shuttle_bnb` end to end. It checks a model, searches
//! it on one or more threads, turns the best grouping into a verified
//! `Plan`, and classifies infeasible instances.
//!
//! ## Architecture
//!
//! * **`solver`**: the `Solver` orchestrator (sequential or parallel search).
//! * **`config`**: `SolverConfig` and its `SolverBuilder`.
//! * **`builder`**: conversion of search solutions into plans.
//! * **`diagnosis`**: infeasibility classification through relaxations.
//! * **`outcome`**: `SolverOutcome`, `SolveResult` and `SolveError`.
//! * **`stats`**: aggregated solve statistics.
//! * **`api`**: serde request/response types and `solve_request`.

pub mod api;
pub mod builder;
pub mod config;
pub mod diagnosis;
pub mod outcome;
pub mod solver;
pub mod stats;
