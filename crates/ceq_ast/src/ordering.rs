//! Structural ordering of expressions.
//!
//! Gives a total order that is stable across runs: variables compare by
//! name rather than interning order, so result lists sorted with this
//! come out the same no matter how symbols were registered.

use crate::expression::{Constant, Context, Expr, ExprId};
use std::cmp::Ordering;

fn kind_rank(e: &Expr) -> u8 {
    match e {
        Expr::Number(_) => 0,
        Expr::Constant(_) => 1,
        Expr::Variable(_) => 2,
        Expr::Add(..) => 3,
        Expr::Sub(..) => 4,
        Expr::Mul(..) => 5,
        Expr::Div(..) => 6,
        Expr::Pow(..) => 7,
        Expr::Neg(_) => 8,
        Expr::Function(..) => 9,
    }
}

/// Total order on expressions: numbers < constants < variables < compound.
pub fn compare_expr(ctx: &Context, a: ExprId, b: ExprId) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let (ea, eb) = (ctx.get(a), ctx.get(b));
    match kind_rank(ea).cmp(&kind_rank(eb)) {
        Ordering::Equal => {}
        ord => return ord,
    }
    match (ea, eb) {
        (Expr::Number(x), Expr::Number(y)) => x.cmp(y),
        (Expr::Constant(x), Expr::Constant(y)) => constant_rank(*x).cmp(&constant_rank(*y)),
        (Expr::Variable(x), Expr::Variable(y)) => ctx.sym_name(*x).cmp(ctx.sym_name(*y)),
        (Expr::Add(la, ra), Expr::Add(lb, rb))
        | (Expr::Sub(la, ra), Expr::Sub(lb, rb))
        | (Expr::Mul(la, ra), Expr::Mul(lb, rb))
        | (Expr::Div(la, ra), Expr::Div(lb, rb))
        | (Expr::Pow(la, ra), Expr::Pow(lb, rb)) => {
            compare_expr(ctx, *la, *lb).then_with(|| compare_expr(ctx, *ra, *rb))
        }
        (Expr::Neg(x), Expr::Neg(y)) => compare_expr(ctx, *x, *y),
        (Expr::Function(fa, argsa), Expr::Function(fb, argsb)) => ctx
            .sym_name(*fa)
            .cmp(ctx.sym_name(*fb))
            .then_with(|| argsa.len().cmp(&argsb.len()))
            .then_with(|| {
                for (&x, &y) in argsa.iter().zip(argsb) {
                    match compare_expr(ctx, x, y) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                }
                Ordering::Equal
            }),
        _ => unreachable!("kind ranks matched"),
    }
}

fn constant_rank(c: Constant) -> u8 {
    match c {
        Constant::Pi => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_before_variables() {
        let mut ctx = Context::new();
        let one = ctx.num(1);
        let x = ctx.var("x");
        assert_eq!(compare_expr(&ctx, one, x), Ordering::Less);
    }

    #[test]
    fn test_variables_by_name_not_intern_order() {
        let mut ctx = Context::new();
        let z = ctx.var("z");
        let a = ctx.var("a");
        assert_eq!(compare_expr(&ctx, a, z), Ordering::Less);
        assert_eq!(compare_expr(&ctx, z, a), Ordering::Greater);
    }

    #[test]
    fn test_compound_recursive() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let y = ctx.var("y");
        let xy = ctx.add(Expr::Add(x, y));
        let yx = ctx.add(Expr::Add(y, x));
        assert_eq!(compare_expr(&ctx, xy, yx), Ordering::Less);
        assert_eq!(compare_expr(&ctx, xy, xy), Ordering::Equal);
    }
}
