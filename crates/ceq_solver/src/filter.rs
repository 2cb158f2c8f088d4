//! Consistency filtering before any solving starts.
//!
//! `clear_zero_denominators` rewrites `fraction = 0` equations to
//! `numerator = 0` so a structural zero denominator cannot poison the
//! solve. `filter_relevant` then substitutes the known values into each
//! equation to decide its fate: identities are dropped, contradictions
//! abort, and equations whose remaining symbols never touch the
//! relevant set are discarded. Kept equations are the originals, not
//! the substituted forms; solving runs with knowns symbolic.

use crate::capability::AlgebraCapability;
use crate::error::SolveError;
use ceq_ast::{substitute_map, Context, Equation, ExprId, SymbolId};
use ceq_engine::simplify::{poly_to_expr, to_ratfunc};
use ceq_engine::EqClass;
use num_traits::Zero;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

fn is_literal_zero(ctx: &Context, id: ExprId) -> bool {
    ctx.as_number(id).map_or(false, |n| n.is_zero())
}

/// Rewrite `expr = 0` (or `0 = expr`) to `numerator(expr) = 0` when the
/// expression normalizes to a genuine fraction. Equations the rewrite
/// does not apply to pass through untouched.
pub fn clear_zero_denominators(ctx: &mut Context, eqs: &[Equation]) -> Vec<Equation> {
    eqs.iter()
        .map(|eq| {
            let side = if is_literal_zero(ctx, eq.rhs) {
                eq.lhs
            } else if is_literal_zero(ctx, eq.lhs) {
                eq.rhs
            } else {
                return *eq;
            };
            match to_ratfunc(ctx, side) {
                Ok(rf) if !rf.is_polynomial() => {
                    let num = poly_to_expr(ctx, &rf.num);
                    let zero = ctx.num(0);
                    Equation::new(num, zero)
                }
                _ => *eq,
            }
        })
        .collect()
}

/// Keep the equations that constrain the relevant unknowns once knowns
/// are substituted; fail fast on anything provably or undecidably
/// wrong.
pub fn filter_relevant<C: AlgebraCapability>(
    ctx: &mut Context,
    cap: &C,
    eqs: &[Equation],
    relevant: &BTreeSet<SymbolId>,
    knowns: &BTreeMap<SymbolId, ExprId>,
) -> Result<Vec<Equation>, SolveError> {
    let mut kept = Vec::new();
    for eq in eqs {
        let substituted = Equation::new(
            substitute_map(ctx, eq.lhs, knowns),
            substitute_map(ctx, eq.rhs, knowns),
        );
        match cap.classify(ctx, substituted) {
            EqClass::Identity => {}
            EqClass::Contradiction | EqClass::Undefined => {
                return Err(SolveError::InconsistentSystem {
                    equation: ctx.display_eq(*eq).to_string(),
                });
            }
            EqClass::Constraint(free) => {
                if free.is_empty() {
                    return Err(SolveError::UnprovenResidual {
                        equation: ctx.display_eq(*eq).to_string(),
                    });
                }
                if !free.is_disjoint(relevant) {
                    kept.push(*eq);
                }
            }
        }
    }
    debug!(kept = kept.len(), total = eqs.len(), "equations filtered");
    Ok(kept)
}
