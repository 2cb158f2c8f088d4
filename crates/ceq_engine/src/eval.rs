//! Numeric evaluation of closed-form expressions.
//!
//! Symbolic results stay exact until the very end; this is the very
//! end. [`eval_partial`] substitutes whatever bindings are available
//! and folds the numeric parts, leaving free parameters in place.
//! [`eval_f64`] goes all the way to a float: every symbol must be
//! bound, and any non-finite intermediate (division by zero, square
//! root of a negative) is an error rather than a NaN that silently
//! propagates.

use crate::error::EngineError;
use crate::simplify::safe_simplify;
use ceq_ast::{substitute_map, BuiltinFn, Constant, Context, Expr, ExprId, SymbolId};
use num_traits::ToPrimitive;
use std::collections::BTreeMap;

/// Substitute `bindings` and fold what becomes numeric. Symbols left
/// unbound stay in the result as parameters; this never fails.
pub fn eval_partial(
    ctx: &mut Context,
    id: ExprId,
    bindings: &BTreeMap<SymbolId, ExprId>,
) -> ExprId {
    let substituted = substitute_map(ctx, id, bindings);
    safe_simplify(ctx, substituted)
}

pub fn eval_f64(
    ctx: &Context,
    id: ExprId,
    bindings: &BTreeMap<SymbolId, f64>,
) -> Result<f64, EngineError> {
    let value = eval_inner(ctx, id, bindings)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::NonFinite)
    }
}

fn eval_inner(
    ctx: &Context,
    id: ExprId,
    bindings: &BTreeMap<SymbolId, f64>,
) -> Result<f64, EngineError> {
    let value = match ctx.get(id) {
        Expr::Number(n) => n.to_f64().ok_or(EngineError::NonFinite)?,
        Expr::Constant(Constant::Pi) => std::f64::consts::PI,
        Expr::Variable(sym) => {
            *bindings
                .get(sym)
                .ok_or_else(|| EngineError::UnboundSymbol {
                    symbol: ctx.sym_name(*sym).to_string(),
                })?
        }
        Expr::Add(l, r) => eval_inner(ctx, *l, bindings)? + eval_inner(ctx, *r, bindings)?,
        Expr::Sub(l, r) => eval_inner(ctx, *l, bindings)? - eval_inner(ctx, *r, bindings)?,
        Expr::Mul(l, r) => eval_inner(ctx, *l, bindings)? * eval_inner(ctx, *r, bindings)?,
        Expr::Div(l, r) => {
            let den = eval_inner(ctx, *r, bindings)?;
            if den == 0.0 {
                return Err(EngineError::NonFinite);
            }
            eval_inner(ctx, *l, bindings)? / den
        }
        Expr::Neg(e) => -eval_inner(ctx, *e, bindings)?,
        Expr::Pow(b, e) => {
            let base = eval_inner(ctx, *b, bindings)?;
            let exp = eval_inner(ctx, *e, bindings)?;
            base.powf(exp)
        }
        Expr::Function(name, args) => {
            let builtin =
                ctx.builtin_of(*name)
                    .ok_or_else(|| EngineError::UnknownFunction {
                        symbol: ctx.sym_name(*name).to_string(),
                    })?;
            let a0 = eval_inner(ctx, args[0], bindings)?;
            match builtin {
                BuiltinFn::Sin => a0.sin(),
                BuiltinFn::Cos => a0.cos(),
                BuiltinFn::Tan => a0.tan(),
                BuiltinFn::Asin => a0.asin(),
                BuiltinFn::Acos => a0.acos(),
                BuiltinFn::Atan => a0.atan(),
                BuiltinFn::Atan2 => a0.atan2(eval_inner(ctx, args[1], bindings)?),
                BuiltinFn::Sqrt => {
                    if a0 < 0.0 {
                        return Err(EngineError::NonFinite);
                    }
                    a0.sqrt()
                }
            }
        }
    };
    Ok(value)
}
