//! Normalization between expressions and rational-function form.
//!
//! `to_ratfunc` flattens an expression into a [`RatFunc`] over opaque
//! atoms, applying the rewrites that decide the residuals this engine
//! cares about:
//!
//! * `cos(u)^2` becomes `1 - sin(u)^2`, so Pythagorean combinations
//!   collapse;
//! * `sqrt(u)^2` becomes `u`;
//! * `sqrt` of a perfect-square monomial loses the radical, taking the
//!   nonnegative branch (symbols under even powers are treated as
//!   magnitudes);
//! * a power atom raised to a power folds when the total exponent is an
//!   integer.
//!
//! `ratfunc_to_expr` rebuilds a deterministic expression, and
//! `safe_simplify` wraps the round trip with a fall-back to the input
//! when normalization is undefined.

use crate::error::EngineError;
use crate::poly::{Mono, Poly};
use crate::ratfunc::RatFunc;
use ceq_ast::{free_symbols, BuiltinFn, Context, Equation, Expr, ExprId, SymbolId};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::collections::BTreeSet;

/// What an equation says once normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EqClass {
    /// Both sides are identically equal.
    Identity,
    /// The difference is a nonzero constant.
    Contradiction,
    /// Normalization divides by an identically zero expression.
    Undefined,
    /// A genuine constraint; carries the free symbols that remain.
    Constraint(BTreeSet<SymbolId>),
}

/// Normalize an expression into rational-function form.
pub fn to_ratfunc(ctx: &mut Context, id: ExprId) -> Result<RatFunc, EngineError> {
    let rf = rf_of(ctx, id)?;
    contract(ctx, &rf)
}

/// Normalize and rebuild as an expression.
pub fn normalize(ctx: &mut Context, id: ExprId) -> Result<ExprId, EngineError> {
    let rf = to_ratfunc(ctx, id)?;
    Ok(ratfunc_to_expr(ctx, &rf))
}

/// Normalize, keeping the input untouched when normalization fails.
pub fn safe_simplify(ctx: &mut Context, id: ExprId) -> ExprId {
    normalize(ctx, id).unwrap_or(id)
}

/// Classify `lhs = rhs` by normalizing the difference of its sides.
pub fn classify_equation(ctx: &mut Context, eq: Equation) -> EqClass {
    let diff = eq.as_difference(ctx);
    match to_ratfunc(ctx, diff) {
        Err(_) => EqClass::Undefined,
        Ok(rf) => {
            if rf.is_zero() {
                EqClass::Identity
            } else if rf.num.as_constant().is_some() {
                EqClass::Contradiction
            } else {
                let mut syms = BTreeSet::new();
                for atom in rf.num.atoms() {
                    syms.extend(free_symbols(ctx, atom));
                }
                EqClass::Constraint(syms)
            }
        }
    }
}

fn rf_of(ctx: &mut Context, id: ExprId) -> Result<RatFunc, EngineError> {
    let expr = ctx.get(id).clone();
    match expr {
        Expr::Number(n) => Ok(RatFunc::constant(n)),
        Expr::Constant(_) | Expr::Variable(_) => Ok(RatFunc::from_poly(Poly::from_atom(id))),
        Expr::Add(l, r) => {
            let (a, b) = (rf_of(ctx, l)?, rf_of(ctx, r)?);
            a.add(&b)
        }
        Expr::Sub(l, r) => {
            let (a, b) = (rf_of(ctx, l)?, rf_of(ctx, r)?);
            a.sub(&b)
        }
        Expr::Mul(l, r) => {
            let (a, b) = (rf_of(ctx, l)?, rf_of(ctx, r)?);
            a.mul(&b)
        }
        Expr::Div(l, r) => {
            let (a, b) = (rf_of(ctx, l)?, rf_of(ctx, r)?);
            a.div(&b)
        }
        Expr::Neg(e) => Ok(rf_of(ctx, e)?.neg()),
        Expr::Pow(b, e) => {
            if let Some(n) = ctx.as_number(e).cloned() {
                if n.is_integer() {
                    if let Some(i) = n.to_integer().to_i64() {
                        return rf_of(ctx, b)?.pow_i(i);
                    }
                }
                // Non-integer rational exponent stays an opaque atom over
                // the normalized base.
                let nb = normalize(ctx, b)?;
                let atom = ctx.add(Expr::Pow(nb, e));
                return Ok(RatFunc::from_poly(Poly::from_atom(atom)));
            }
            let nb = normalize(ctx, b)?;
            let ne = normalize(ctx, e)?;
            let atom = ctx.add(Expr::Pow(nb, ne));
            Ok(RatFunc::from_poly(Poly::from_atom(atom)))
        }
        Expr::Function(name, args) => {
            let mut nargs = Vec::with_capacity(args.len());
            for arg in args {
                nargs.push(normalize(ctx, arg)?);
            }
            if ctx.builtin_of(name) == Some(BuiltinFn::Sqrt) {
                return sqrt_rf(ctx, nargs[0]);
            }
            let atom = ctx.add(Expr::Function(name, nargs));
            Ok(RatFunc::from_poly(Poly::from_atom(atom)))
        }
    }
}

/// Square root with monomial extraction.
fn sqrt_rf(ctx: &mut Context, arg: ExprId) -> Result<RatFunc, EngineError> {
    let rf = rf_of(ctx, arg)?;
    if let Some(c) = rf.as_constant() {
        if c.is_zero() {
            return Ok(RatFunc::constant(BigRational::zero()));
        }
        if let Some(s) = rational_sqrt(&c) {
            return Ok(RatFunc::constant(s));
        }
    } else if rf.is_polynomial() {
        if let Some((mono, coeff)) = rf.num.single_term() {
            if coeff.is_positive() {
                return Ok(sqrt_of_term(ctx, mono.clone(), coeff.clone()));
            }
        }
    }
    let atom = ctx.call(BuiltinFn::Sqrt, vec![arg]);
    Ok(RatFunc::from_poly(Poly::from_atom(atom)))
}

/// `sqrt(coeff * mono)` for positive `coeff`: square factors move out of
/// the radical, the rest stays under a smaller one.
fn sqrt_of_term(ctx: &mut Context, mono: Mono, coeff: BigRational) -> RatFunc {
    let mut outside = Mono::unit();
    let mut inside = Mono::unit();
    for (atom, exp) in mono.iter() {
        outside = outside.mul(&Mono::atom_pow(atom, exp / 2));
        inside = inside.mul(&Mono::atom_pow(atom, exp % 2));
    }
    let (coeff_out, coeff_in) = match rational_sqrt(&coeff) {
        Some(s) => (s, BigRational::one()),
        None => (BigRational::one(), coeff),
    };
    let mut out = Poly::zero();
    if inside.is_unit() && coeff_in.is_one() {
        out.add_term(outside, coeff_out);
        return RatFunc::from_poly(out);
    }
    let mut radicand = Poly::zero();
    radicand.add_term(inside, coeff_in);
    let inner = poly_to_expr(ctx, &radicand);
    let atom = ctx.call(BuiltinFn::Sqrt, vec![inner]);
    out.add_term(outside.mul(&Mono::atom(atom)), coeff_out);
    RatFunc::from_poly(out)
}

/// Exact square root of a nonnegative rational, if it has one.
fn rational_sqrt(r: &BigRational) -> Option<BigRational> {
    use num_integer::Roots;
    if r.is_negative() {
        return None;
    }
    let ns = r.numer().sqrt();
    let ds = r.denom().sqrt();
    if &(&ns * &ns) == r.numer() && &(&ds * &ds) == r.denom() {
        Some(BigRational::new(ns, ds))
    } else {
        None
    }
}

/// Apply the power rewrites to every atom of both sides of a fraction.
fn contract(ctx: &mut Context, rf: &RatFunc) -> Result<RatFunc, EngineError> {
    let num = contract_poly(ctx, &rf.num)?;
    let den = contract_poly(ctx, &rf.den)?;
    num.div(&den)
}

fn contract_poly(ctx: &mut Context, p: &Poly) -> Result<RatFunc, EngineError> {
    let mut out = RatFunc::constant(BigRational::zero());
    for (mono, coeff) in p.terms() {
        let mut term = RatFunc::constant(coeff.clone());
        for (atom, exp) in mono.iter() {
            let factor = atom_pow_rf(ctx, atom, exp)?;
            term = term.mul(&factor)?;
        }
        out = out.add(&term)?;
    }
    Ok(out)
}

fn atom_pow_rf(ctx: &mut Context, atom: ExprId, exp: u32) -> Result<RatFunc, EngineError> {
    let expr = ctx.get(atom).clone();
    match expr {
        Expr::Function(name, args) if exp >= 2 => match ctx.builtin_of(name) {
            Some(BuiltinFn::Cos) => {
                let u = args[0];
                let sin_u = ctx.call(BuiltinFn::Sin, vec![u]);
                // cos^2 u = 1 - sin^2 u
                let pyth = Poly::one().sub(&Poly::from_atom(sin_u).pow(2));
                let mut rest = Poly::one();
                if exp % 2 == 1 {
                    rest = Poly::from_atom(atom);
                }
                Ok(RatFunc::from_poly(pyth.pow(exp / 2).mul(&rest)))
            }
            Some(BuiltinFn::Sqrt) => {
                let inner = rf_of(ctx, args[0])?;
                let whole = inner.pow_i((exp / 2) as i64)?;
                if exp % 2 == 1 {
                    whole.mul(&RatFunc::from_poly(Poly::from_atom(atom)))
                } else {
                    Ok(whole)
                }
            }
            _ => Ok(RatFunc::from_poly(Poly::atom_pow(atom, exp))),
        },
        Expr::Pow(b, e) => {
            if let Some(n) = ctx.as_number(e) {
                let total = n * BigRational::from_integer(exp.into());
                if total.is_integer() {
                    if let Some(i) = total.to_integer().to_i64() {
                        return rf_of(ctx, b)?.pow_i(i);
                    }
                }
            }
            Ok(RatFunc::from_poly(Poly::atom_pow(atom, exp)))
        }
        _ => Ok(RatFunc::from_poly(Poly::atom_pow(atom, exp))),
    }
}

/// Rebuild a polynomial as an expression, terms in monomial order.
pub fn poly_to_expr(ctx: &mut Context, p: &Poly) -> ExprId {
    let terms: Vec<(Mono, BigRational)> = p
        .terms()
        .map(|(m, c)| (m.clone(), c.clone()))
        .collect();
    if terms.is_empty() {
        return ctx.num(0);
    }
    let mut acc: Option<ExprId> = None;
    for (mono, coeff) in terms {
        let negative = coeff.is_negative();
        acc = Some(match acc {
            // A leading constant keeps its sign inside the number so
            // `as_number` still sees it.
            None if negative && mono.is_unit() => ctx.number(coeff),
            None => {
                let t = term_expr(ctx, &mono, coeff.abs());
                if negative {
                    ctx.add(Expr::Neg(t))
                } else {
                    t
                }
            }
            Some(a) => {
                let t = term_expr(ctx, &mono, coeff.abs());
                if negative {
                    ctx.add(Expr::Sub(a, t))
                } else {
                    ctx.add(Expr::Add(a, t))
                }
            }
        });
    }
    acc.unwrap_or_else(|| ctx.num(0))
}

fn term_expr(ctx: &mut Context, mono: &Mono, coeff: BigRational) -> ExprId {
    let mut factors = Vec::new();
    if !coeff.is_one() || mono.is_unit() {
        factors.push(ctx.number(coeff));
    }
    for (atom, exp) in mono.iter() {
        if exp == 1 {
            factors.push(atom);
        } else {
            let e = ctx.num(exp as i64);
            factors.push(ctx.add(Expr::Pow(atom, e)));
        }
    }
    let mut it = factors.into_iter();
    let first = it.next().unwrap_or_else(|| unreachable!("term has a factor"));
    it.fold(first, |acc, f| ctx.add(Expr::Mul(acc, f)))
}

/// Rebuild a fraction as an expression, dividing only when needed.
pub fn ratfunc_to_expr(ctx: &mut Context, rf: &RatFunc) -> ExprId {
    let num = poly_to_expr(ctx, &rf.num);
    if rf.is_polynomial() {
        return num;
    }
    let den = poly_to_expr(ctx, &rf.den);
    ctx.add(Expr::Div(num, den))
}
