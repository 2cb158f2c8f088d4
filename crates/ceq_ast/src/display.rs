//! Precedence-aware textual form of expressions and equations.
//!
//! The output is stable for a given tree shape, which makes it usable
//! as a deterministic tie-breaker when two results score the same.

use crate::eq::Equation;
use crate::expression::{Constant, Context, Expr, ExprId};
use num_traits::Signed;
use std::fmt;

// Binding strengths, loosest to tightest.
const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_NEG: u8 = 3;
const PREC_POW: u8 = 4;
const PREC_ATOM: u8 = 5;

/// Borrowing display adapter for one expression.
pub struct DisplayExpr<'a> {
    pub ctx: &'a Context,
    pub id: ExprId,
}

impl fmt::Display for DisplayExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(self.ctx, self.id, PREC_ADD, f)
    }
}

/// Borrowing display adapter for one equation, printed `lhs = rhs`.
pub struct DisplayEquation<'a> {
    pub ctx: &'a Context,
    pub eq: Equation,
}

impl fmt::Display for DisplayEquation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {}",
            DisplayExpr { ctx: self.ctx, id: self.eq.lhs },
            DisplayExpr { ctx: self.ctx, id: self.eq.rhs }
        )
    }
}

impl Context {
    pub fn display(&self, id: ExprId) -> DisplayExpr<'_> {
        DisplayExpr { ctx: self, id }
    }

    pub fn display_eq(&self, eq: Equation) -> DisplayEquation<'_> {
        DisplayEquation { ctx: self, eq }
    }
}

fn prec_of(ctx: &Context, id: ExprId) -> u8 {
    match ctx.get(id) {
        Expr::Number(n) => {
            if n.is_negative() {
                // A negative fraction carries both a minus and a
                // division, so products and quotients must fence it.
                if n.is_integer() {
                    PREC_NEG
                } else {
                    PREC_ADD
                }
            } else if n.is_integer() {
                PREC_ATOM
            } else {
                PREC_MUL
            }
        }
        Expr::Constant(_) | Expr::Variable(_) | Expr::Function(..) => PREC_ATOM,
        Expr::Add(..) | Expr::Sub(..) => PREC_ADD,
        Expr::Mul(..) | Expr::Div(..) => PREC_MUL,
        Expr::Neg(_) => PREC_NEG,
        Expr::Pow(..) => PREC_POW,
    }
}

fn write_expr(ctx: &Context, id: ExprId, min_prec: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let prec = prec_of(ctx, id);
    let parens = prec < min_prec;
    if parens {
        f.write_str("(")?;
    }
    match ctx.get(id) {
        Expr::Number(n) => {
            if n.is_integer() {
                write!(f, "{}", n.numer())?;
            } else {
                write!(f, "{}/{}", n.numer(), n.denom())?;
            }
        }
        Expr::Constant(Constant::Pi) => f.write_str("pi")?,
        Expr::Variable(sym) => f.write_str(ctx.sym_name(*sym))?,
        Expr::Add(l, r) => {
            write_expr(ctx, *l, PREC_ADD, f)?;
            f.write_str(" + ")?;
            // Right side needs one more level so `a + (b + c)` keeps shape.
            write_expr(ctx, *r, PREC_ADD + 1, f)?;
        }
        Expr::Sub(l, r) => {
            write_expr(ctx, *l, PREC_ADD, f)?;
            f.write_str(" - ")?;
            write_expr(ctx, *r, PREC_ADD + 1, f)?;
        }
        Expr::Mul(l, r) => {
            write_expr(ctx, *l, PREC_MUL, f)?;
            f.write_str("*")?;
            write_expr(ctx, *r, PREC_MUL + 1, f)?;
        }
        Expr::Div(l, r) => {
            write_expr(ctx, *l, PREC_MUL, f)?;
            f.write_str("/")?;
            write_expr(ctx, *r, PREC_MUL + 1, f)?;
        }
        Expr::Neg(e) => {
            f.write_str("-")?;
            write_expr(ctx, *e, PREC_NEG, f)?;
        }
        Expr::Pow(b, e) => {
            write_expr(ctx, *b, PREC_POW + 1, f)?;
            f.write_str("^")?;
            // Right-associative: the exponent binds at pow level itself.
            write_expr(ctx, *e, PREC_POW, f)?;
        }
        Expr::Function(name, args) => {
            f.write_str(ctx.sym_name(*name))?;
            f.write_str("(")?;
            for (i, &arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_expr(ctx, arg, PREC_ADD, f)?;
            }
            f.write_str(")")?;
        }
    }
    if parens {
        f.write_str(")")?;
    }
    Ok(())
}
