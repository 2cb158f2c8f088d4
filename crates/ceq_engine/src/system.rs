//! Simultaneous solving by repeated isolation and substitution.
//!
//! One unknown is isolated per step, every root opens a branch, and the
//! root is substituted into the remaining equations before recursing on
//! the remaining unknowns. A branch dies when substitution turns an
//! equation into a contradiction or divides by zero. Assignments that
//! survive are checked once more against the untouched input equations,
//! which is what discards extraneous roots such as the zero of a
//! factored quadratic that sits on a denominator elsewhere.

use crate::isolate::{solve_for, IsolationKind};
use crate::simplify::{classify_equation, safe_simplify, EqClass};
use ceq_ast::{compare_expr, substitute_symbol, Context, Equation, ExprId, SymbolId};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// One consistent set of values, one expression per unknown.
pub type Assignment = BTreeMap<SymbolId, ExprId>;

/// Solve `eqs` for all of `unknowns`, other symbols acting as
/// parameters. Returns every verified assignment; empty when the system
/// is unsolvable by isolation or has no consistent real solution.
pub fn solve_system(ctx: &mut Context, eqs: &[Equation], unknowns: &[SymbolId]) -> Vec<Assignment> {
    let raw = solve_rec(ctx, eqs.to_vec(), unknowns.to_vec());
    let mut verified = Vec::new();
    for assignment in raw {
        if assignment.len() == unknowns.len() && verify(ctx, eqs, &assignment, unknowns) {
            if !verified.contains(&assignment) {
                verified.push(assignment);
            }
        }
    }
    sort_assignments(ctx, &mut verified, unknowns);
    debug!(
        solutions = verified.len(),
        unknowns = unknowns.len(),
        "system solve finished"
    );
    verified
}

fn solve_rec(ctx: &mut Context, eqs: Vec<Equation>, unknowns: Vec<SymbolId>) -> Vec<Assignment> {
    if unknowns.is_empty() {
        return if residuals_hold(ctx, &eqs) {
            vec![Assignment::new()]
        } else {
            Vec::new()
        };
    }

    let pivot = match best_pivot(ctx, &eqs, &unknowns) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let (eq_idx, sym, roots) = pivot;
    trace!(
        symbol = ctx.sym_name(sym),
        roots = roots.len(),
        "pivot chosen"
    );

    let rest_unknowns: Vec<SymbolId> = unknowns.iter().copied().filter(|u| *u != sym).collect();
    let mut out = Vec::new();
    'roots: for root in roots {
        let mut branch_eqs = Vec::with_capacity(eqs.len() - 1);
        for (i, eq) in eqs.iter().enumerate() {
            if i == eq_idx {
                continue;
            }
            let substituted = eq.substitute(ctx, sym, root);
            match classify_equation(ctx, substituted) {
                EqClass::Identity => {}
                EqClass::Contradiction | EqClass::Undefined => continue 'roots,
                EqClass::Constraint(_) => branch_eqs.push(substituted),
            }
        }
        for mut sub in solve_rec(ctx, branch_eqs, rest_unknowns.clone()) {
            let mut value = root;
            for (&bound, &bound_value) in &sub {
                value = substitute_symbol(ctx, value, bound, bound_value);
            }
            sub.insert(sym, safe_simplify(ctx, value));
            out.push(sub);
        }
    }
    out
}

/// Cheapest isolation across every equation and unknown: linear before
/// quadratic before function inversion, then smaller equations, then
/// symbol name.
fn best_pivot(
    ctx: &mut Context,
    eqs: &[Equation],
    unknowns: &[SymbolId],
) -> Option<(usize, SymbolId, Vec<ExprId>)> {
    let mut best: Option<(IsolationKind, usize, String, usize, SymbolId, Vec<ExprId>)> = None;
    for (i, eq) in eqs.iter().enumerate() {
        for &sym in unknowns {
            if !eq.contains_symbol(ctx, sym) {
                continue;
            }
            let iso = match solve_for(ctx, *eq, sym) {
                Ok(iso) => iso,
                Err(_) => continue,
            };
            let key = (
                iso.kind,
                eq.node_count(ctx),
                ctx.sym_name(sym).to_string(),
            );
            let better = match &best {
                None => true,
                Some((k, n, name, ..)) => key < (*k, *n, name.clone()),
            };
            if better {
                best = Some((key.0, key.1, key.2, i, sym, iso.roots));
            }
        }
    }
    best.map(|(_, _, _, i, sym, roots)| (i, sym, roots))
}

/// With every unknown bound, leftover equations may still mention
/// parameters. Those are accepted as given facts; only a provable
/// contradiction or an undefined value kills the branch.
fn residuals_hold(ctx: &mut Context, eqs: &[Equation]) -> bool {
    eqs.iter().all(|eq| {
        !matches!(
            classify_equation(ctx, *eq),
            EqClass::Contradiction | EqClass::Undefined
        )
    })
}

/// Check one assignment against the untouched input system.
fn verify(
    ctx: &mut Context,
    eqs: &[Equation],
    assignment: &Assignment,
    unknowns: &[SymbolId],
) -> bool {
    for eq in eqs {
        let mut checked = *eq;
        for (&sym, &value) in assignment {
            checked = checked.substitute(ctx, sym, value);
        }
        match classify_equation(ctx, checked) {
            EqClass::Identity => {}
            EqClass::Contradiction | EqClass::Undefined => return false,
            EqClass::Constraint(free) => {
                // Parameter-only residuals are undecidable here and
                // accepted; anything still tied to an unknown is not a
                // solution.
                if unknowns.iter().any(|u| free.contains(u)) {
                    return false;
                }
            }
        }
    }
    true
}

/// Deterministic order: compare the value of each unknown structurally.
fn sort_assignments(ctx: &Context, assignments: &mut [Assignment], unknowns: &[SymbolId]) {
    assignments.sort_by(|a, b| {
        for sym in unknowns {
            let ord = match (a.get(sym), b.get(sym)) {
                (Some(&x), Some(&y)) => compare_expr(ctx, x, y),
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}
