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

//! Shuttle-BnB: branch-and-bound for shuttle trip planning
//!
//! Places guests into trips one at a time, in arrival order, and proves the
//! resulting plan optimal. Vehicles are assigned by an exact scheduler that
//! runs whenever trips can no longer change, so groupings that no fleet can
//! serve are cut early.
//!
//! Core flow
//! - Provide a `shuttle_model::model::Model` and encode it with
//!   `encoder::Encoding`, choosing the tie-break.
//! - Run `propagator::Propagator::precheck` to catch trivially infeasible
//!   instances.
//! - Choose a `branching::decision::DecisionBuilder` (decision ordering).
//! - Run `bnb::BnbSolver` on the whole tree, or split it with
//!   `partition::enumerate_prefixes` and solve the subtrees in parallel
//!   against a shared `incumbent::SharedIncumbent`.
//!
//! Design highlights
//! - Decisions are checked by the propagator before they reach the stack;
//!   the engine never applies an infeasible placement.
//! - Tight inner loop: state is mutated in place and restored via a trail.
//! - Deterministic given a deterministic builder. Ties are pruned only
//!   against the local best, so subtree results merged by
//!   `(key, subtree index)` equal the sequential result.
//!
//! Module map
//! - `bnb`: the solver engine and session orchestration.
//! - `branching`: decisions and decision builders.
//! - `encoder`: arrival-ordered view of a model.
//! - `propagator`: feasibility rules, trip closure and the wait bound.
//! - `scheduler`: exact vehicle assignment for a set of trips.
//! - `monitor`: tree-search monitors (log, limits, interrupt, composite).
//! - `partition`: subtree prefixes for parallel search.
//! - `incumbent`: the best solution shared between threads.
//! - `result`, `solution`, `stats`: outcomes and counters.

pub mod bnb;
pub mod branching;
pub mod encoder;
pub mod incumbent;
pub mod monitor;
pub mod partition;
pub mod propagator;
pub mod result;
pub mod scheduler;
pub mod solution;
pub mod stack;
pub mod state;
pub mod stats;
pub mod trail;
