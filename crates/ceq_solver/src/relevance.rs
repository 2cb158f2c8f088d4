//! Connected-unknown closure over the equation hypergraph.
//!
//! Each equation links the unknown symbols it mentions (knowns do not
//! propagate connectivity). Starting from the target unknowns, the
//! closure grows until no equation adds a new symbol, which is a fixed
//! point after at most one pass per equation.

use ceq_ast::{Context, Equation, SymbolId};
use std::collections::BTreeSet;

/// Unknowns reachable from `targets` through shared equations.
pub fn connected_unknowns(
    ctx: &Context,
    eqs: &[Equation],
    targets: &BTreeSet<SymbolId>,
    knowns: &BTreeSet<SymbolId>,
) -> BTreeSet<SymbolId> {
    let edges: Vec<BTreeSet<SymbolId>> = eqs
        .iter()
        .map(|eq| {
            eq.free_symbols(ctx)
                .into_iter()
                .filter(|s| !knowns.contains(s))
                .collect()
        })
        .collect();

    let mut relevant: BTreeSet<SymbolId> = targets.clone();
    loop {
        let before = relevant.len();
        for edge in &edges {
            if !edge.is_disjoint(&relevant) {
                relevant.extend(edge.iter().copied());
            }
        }
        if relevant.len() == before {
            return relevant;
        }
    }
}
