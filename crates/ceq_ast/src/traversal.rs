//! Expression tree traversal utilities.
//!
//! Counting and collection walk iteratively with an explicit stack so
//! deep trees cannot overflow the call stack. Substitution is recursive
//! but rebuilds only the spine that actually changed, returning the
//! original id untouched subtrees.

use crate::expression::{Context, Expr, ExprId};
use crate::symbol::SymbolId;
use std::collections::BTreeSet;

/// Count all nodes in an expression tree (tree expansion, no sharing).
pub fn count_all_nodes(ctx: &Context, root: ExprId) -> usize {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        count += 1;
        push_children(ctx.get(id), &mut stack);
    }
    count
}

/// Collect the free symbols of an expression.
///
/// Function names are interned in the same table as variables but are
/// not free symbols; only `Variable` leaves count. The result is a
/// `BTreeSet` so iteration order is deterministic.
pub fn free_symbols(ctx: &Context, root: ExprId) -> BTreeSet<SymbolId> {
    let mut out = BTreeSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = ctx.get(id);
        if let Expr::Variable(sym) = node {
            out.insert(*sym);
        }
        push_children(node, &mut stack);
    }
    out
}

/// Whether `sym` occurs free anywhere in the tree.
pub fn contains_symbol(ctx: &Context, root: ExprId, sym: SymbolId) -> bool {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = ctx.get(id);
        if matches!(node, Expr::Variable(s) if *s == sym) {
            return true;
        }
        push_children(node, &mut stack);
    }
    false
}

#[inline]
fn push_children(node: &Expr, stack: &mut Vec<ExprId>) {
    match node {
        Expr::Add(l, r) | Expr::Sub(l, r) | Expr::Mul(l, r) | Expr::Div(l, r) | Expr::Pow(l, r) => {
            stack.push(*l);
            stack.push(*r);
        }
        Expr::Neg(e) => stack.push(*e),
        Expr::Function(_, args) => stack.extend(args),
        // Leaves have no children
        Expr::Number(_) | Expr::Constant(_) | Expr::Variable(_) => {}
    }
}

/// Replace every free occurrence of `sym` with `replacement`.
///
/// Returns the original id when nothing changed, so callers can detect
/// no-op substitutions by id comparison.
pub fn substitute_symbol(
    ctx: &mut Context,
    root: ExprId,
    sym: SymbolId,
    replacement: ExprId,
) -> ExprId {
    let expr = ctx.get(root).clone();
    match expr {
        Expr::Variable(s) if s == sym => replacement,
        Expr::Number(_) | Expr::Constant(_) | Expr::Variable(_) => root,
        Expr::Add(l, r) => rebuild2(ctx, root, l, r, sym, replacement, Expr::Add),
        Expr::Sub(l, r) => rebuild2(ctx, root, l, r, sym, replacement, Expr::Sub),
        Expr::Mul(l, r) => rebuild2(ctx, root, l, r, sym, replacement, Expr::Mul),
        Expr::Div(l, r) => rebuild2(ctx, root, l, r, sym, replacement, Expr::Div),
        Expr::Pow(l, r) => rebuild2(ctx, root, l, r, sym, replacement, Expr::Pow),
        Expr::Neg(e) => {
            let ne = substitute_symbol(ctx, e, sym, replacement);
            if ne == e {
                root
            } else {
                ctx.add(Expr::Neg(ne))
            }
        }
        Expr::Function(name, args) => {
            let mut changed = false;
            let mut new_args = Vec::with_capacity(args.len());
            for arg in args {
                let na = substitute_symbol(ctx, arg, sym, replacement);
                changed |= na != arg;
                new_args.push(na);
            }
            if changed {
                ctx.add(Expr::Function(name, new_args))
            } else {
                root
            }
        }
    }
}

fn rebuild2(
    ctx: &mut Context,
    root: ExprId,
    l: ExprId,
    r: ExprId,
    sym: SymbolId,
    replacement: ExprId,
    make: fn(ExprId, ExprId) -> Expr,
) -> ExprId {
    let nl = substitute_symbol(ctx, l, sym, replacement);
    let nr = substitute_symbol(ctx, r, sym, replacement);
    if nl == l && nr == r {
        root
    } else {
        ctx.add(make(nl, nr))
    }
}

/// Apply a whole known-value map in one walk per binding.
///
/// Bindings are applied in map order; values are expressions, so a
/// binding may itself reference other symbols (compound knowns).
pub fn substitute_map(
    ctx: &mut Context,
    root: ExprId,
    map: &std::collections::BTreeMap<SymbolId, ExprId>,
) -> ExprId {
    let mut out = root;
    for (&sym, &value) in map {
        out = substitute_symbol(ctx, out, sym, value);
    }
    out
}
