//! Equations as `lhs = rhs` pairs of expression ids.

use crate::expression::{Context, Expr, ExprId};
use crate::symbol::SymbolId;
use crate::traversal;
use std::collections::BTreeSet;

/// One relation between two expressions.
///
/// Equations are plain value pairs; all structure lives in the owning
/// `Context`. Two equations compare equal exactly when both sides were
/// hash-consed to the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Equation {
    pub lhs: ExprId,
    pub rhs: ExprId,
}

impl Equation {
    pub fn new(lhs: ExprId, rhs: ExprId) -> Self {
        Self { lhs, rhs }
    }

    /// Free symbols of both sides combined.
    pub fn free_symbols(&self, ctx: &Context) -> BTreeSet<SymbolId> {
        let mut out = traversal::free_symbols(ctx, self.lhs);
        out.extend(traversal::free_symbols(ctx, self.rhs));
        out
    }

    /// Whether `sym` occurs on either side.
    pub fn contains_symbol(&self, ctx: &Context, sym: SymbolId) -> bool {
        traversal::contains_symbol(ctx, self.lhs, sym)
            || traversal::contains_symbol(ctx, self.rhs, sym)
    }

    /// Node count of both sides (tree expansion).
    pub fn node_count(&self, ctx: &Context) -> usize {
        traversal::count_all_nodes(ctx, self.lhs) + traversal::count_all_nodes(ctx, self.rhs)
    }

    /// `lhs - rhs` as a single expression.
    pub fn as_difference(&self, ctx: &mut Context) -> ExprId {
        ctx.add(Expr::Sub(self.lhs, self.rhs))
    }

    /// Replace `sym` with `replacement` on both sides.
    pub fn substitute(&self, ctx: &mut Context, sym: SymbolId, replacement: ExprId) -> Equation {
        Equation {
            lhs: traversal::substitute_symbol(ctx, self.lhs, sym, replacement),
            rhs: traversal::substitute_symbol(ctx, self.rhs, sym, replacement),
        }
    }
}
