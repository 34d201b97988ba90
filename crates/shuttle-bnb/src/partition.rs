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

//! Splitting the search tree into independent subtrees.
//!
//! A prefix fixes the placements of the first few guests. The prefixes of a
//! given depth partition the tree: every complete grouping extends exactly
//! one of them. They are listed in the order a sequential search would
//! explore them, so merging per-prefix results by `(key, prefix index)`
//! reproduces the sequential answer.

use crate::{
    branching::decision::{Decision, DecisionBuilder, Placement},
    encoder::Encoding,
    state::SearchState,
    trail::SearchTrail,
};

/// Lists every feasible placement sequence of the first
/// `min(depth, num_guests)` guests, in sequential exploration order.
///
/// Returns a single empty prefix if `depth` is zero or there are no guests,
/// and no prefix at all if no guest sequence of that length is feasible.
pub fn enumerate_prefixes<B>(encoding: &Encoding, depth: usize, builder: &mut B) -> Vec<Vec<Placement>>
where
    B: DecisionBuilder,
{
    let depth = depth.min(encoding.num_guests());
    let mut state = SearchState::new(encoding.num_guests());
    let mut trail = SearchTrail::preallocated(depth);
    let mut current = Vec::with_capacity(depth);
    let mut prefixes = Vec::new();
    extend_prefixes(
        encoding,
        depth,
        builder,
        &mut state,
        &mut trail,
        &mut current,
        &mut prefixes,
    );
    prefixes
}

fn extend_prefixes<B>(
    encoding: &Encoding,
    depth: usize,
    builder: &mut B,
    state: &mut SearchState,
    trail: &mut SearchTrail,
    current: &mut Vec<Placement>,
    prefixes: &mut Vec<Vec<Placement>>,
) where
    B: DecisionBuilder,
{
    if current.len() == depth {
        prefixes.push(current.clone());
        return;
    }

    let decisions: Vec<Decision> = builder.next_decisions(encoding, state).collect();
    // The engine pops the last yielded decision first.
    for decision in decisions.into_iter().rev() {
        trail.push_frame(state);
        trail.apply_decision(state, &decision);
        current.push(decision.placement());

        extend_prefixes(encoding, depth, builder, state, trail, current, prefixes);

        current.pop();
        trail.backtrack(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::{join_first::JoinFirstBuilder, open_first::OpenFirstBuilder};
    use shuttle_model::{index::TripIndex, model::ModelBuilder, objective::TieBreak};

    fn encoding() -> Encoding {
        let mut mb = ModelBuilder::new([3, 3]);
        mb.set_max_wait(30)
            .add_guest("a", "A", 0)
            .add_guest("b", "B", 5)
            .add_guest("c", "C", 10)
            .add_incompatible_pair("a", "c");
        Encoding::new(&mb.build().unwrap(), TieBreak::FewerTrips)
    }

    #[test]
    fn test_zero_depth_is_the_whole_tree() {
        let enc = encoding();
        let prefixes = enumerate_prefixes(&enc, 0, &mut JoinFirstBuilder::new());
        assert_eq!(prefixes, vec![Vec::<Placement>::new()]);
    }

    #[test]
    fn test_prefixes_follow_exploration_order() {
        let enc = encoding();
        let prefixes = enumerate_prefixes(&enc, 2, &mut JoinFirstBuilder::new());
        assert_eq!(
            prefixes,
            vec![
                vec![Placement::Open, Placement::Join(TripIndex::new(0))],
                vec![Placement::Open, Placement::Open],
            ]
        );
    }

    #[test]
    fn test_depth_is_capped_and_infeasible_branches_dropped() {
        let enc = encoding();
        let prefixes = enumerate_prefixes(&enc, 10, &mut OpenFirstBuilder::new());
        assert!(prefixes.iter().all(|p| p.len() == 3));
        // c never joins the trip that carries a.
        assert!(!prefixes.contains(&vec![
            Placement::Open,
            Placement::Join(TripIndex::new(0)),
            Placement::Join(TripIndex::new(0)),
        ]));
        // Open/Open/Open, Open/Open/Join(1), Open/Join(0)/Open.
        assert_eq!(prefixes.len(), 3);
        assert_eq!(prefixes[0], vec![Placement::Open; 3]);
    }

    #[test]
    fn test_no_guests_gives_one_empty_prefix() {
        let enc = Encoding::new(&ModelBuilder::new([1]).build().unwrap(), TieBreak::WaitOnly);
        let prefixes = enumerate_prefixes(&enc, 3, &mut JoinFirstBuilder::new());
        assert_eq!(prefixes.len(), 1);
        assert!(prefixes[0].is_empty());
    }
}
