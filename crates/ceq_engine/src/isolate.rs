//! Isolating one symbol in one equation.
//!
//! The equation is normalized to a numerator polynomial; the symbol
//! must reach it through exactly one atom. If that atom is the plain
//! variable, linear and quadratic polynomials are solved in closed
//! form. If it is a function call or a fractional power, the
//! polynomial is solved for the atom first and the call structure is
//! then inverted layer by layer (`sin` with `asin`, `sqrt` by
//! squaring, and so on) until the variable is alone.

use crate::error::EngineError;
use crate::poly::Poly;
use crate::simplify::{poly_to_expr, safe_simplify, to_ratfunc};
use crate::RatFunc;
use ceq_ast::{contains_symbol, BuiltinFn, Context, Equation, Expr, ExprId, SymbolId};
use num_rational::BigRational;
use num_traits::Signed;

/// How the symbol was freed, ordered from cheapest to invert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IsolationKind {
    Linear,
    Quadratic,
    FunctionInverse,
}

/// Closed-form values of one symbol. `roots` may be empty when the
/// equation provably has no real solution for it.
#[derive(Debug, Clone)]
pub struct Isolation {
    pub roots: Vec<ExprId>,
    pub kind: IsolationKind,
}

/// Solve `eq` for `sym`, returning every closed-form root.
pub fn solve_for(
    ctx: &mut Context,
    eq: Equation,
    sym: SymbolId,
) -> Result<Isolation, EngineError> {
    let diff = eq.as_difference(ctx);
    let rf = to_ratfunc(ctx, diff)?;
    let p = rf.num;

    let carriers: Vec<ExprId> = p
        .atoms()
        .into_iter()
        .filter(|a| contains_symbol(ctx, *a, sym))
        .collect();
    let carrier = match carriers.as_slice() {
        [one] => *one,
        _ => {
            // Absent, or the symbol reaches the polynomial through
            // several distinct atoms at once.
            return Err(cannot(ctx, sym));
        }
    };

    let (atom_values, kind) = atom_roots(ctx, &p, carrier, sym)?;
    let mut roots = Vec::new();
    if ctx.as_variable(carrier) == Some(sym) {
        roots = atom_values;
    } else {
        for value in atom_values {
            roots.extend(invert_chain(ctx, carrier, value, sym)?);
        }
    }

    let mut out = Vec::new();
    for root in roots {
        let simplified = safe_simplify(ctx, root);
        // Self-reference guard: a root still mentioning the symbol is
        // not a solution.
        if !contains_symbol(ctx, simplified, sym) && !out.contains(&simplified) {
            out.push(simplified);
        }
    }
    let kind = if ctx.as_variable(carrier) == Some(sym) {
        kind
    } else {
        IsolationKind::FunctionInverse
    };
    Ok(Isolation { roots: out, kind })
}

fn cannot(ctx: &Context, sym: SymbolId) -> EngineError {
    EngineError::CannotIsolate {
        symbol: ctx.sym_name(sym).to_string(),
    }
}

/// Roots of `p` seen as a polynomial in `atom`.
fn atom_roots(
    ctx: &mut Context,
    p: &Poly,
    atom: ExprId,
    sym: SymbolId,
) -> Result<(Vec<ExprId>, IsolationKind), EngineError> {
    let coeffs = p.coeffs_in(atom);
    match coeffs.len() - 1 {
        1 => {
            let root_rf = RatFunc::new(coeffs[0].neg(), coeffs[1].clone())?;
            let root = crate::simplify::ratfunc_to_expr(ctx, &root_rf);
            Ok((vec![root], IsolationKind::Linear))
        }
        2 => quadratic_roots(ctx, &coeffs),
        degree => Err(EngineError::DegreeTooHigh {
            symbol: ctx.sym_name(sym).to_string(),
            degree: degree as u32,
        }),
    }
}

/// Both branches of the quadratic formula, numeric discriminants decided
/// exactly.
fn quadratic_roots(
    ctx: &mut Context,
    coeffs: &[Poly],
) -> Result<(Vec<ExprId>, IsolationKind), EngineError> {
    let (c, b, a) = (&coeffs[0], &coeffs[1], &coeffs[2]);
    let four = BigRational::from_integer(4.into());
    let disc = b.mul(b).sub(&a.mul(c).scale(&four));

    if let Some(d) = disc.as_constant() {
        if d.is_negative() {
            return Ok((Vec::new(), IsolationKind::Quadratic));
        }
    }
    let disc_expr = poly_to_expr(ctx, &disc);
    let sqrt_disc = ctx.call(BuiltinFn::Sqrt, vec![disc_expr]);
    let s = safe_simplify(ctx, sqrt_disc);

    let b_expr = poly_to_expr(ctx, b);
    let neg_b = ctx.add(Expr::Neg(b_expr));
    let two_a_poly = a.scale(&BigRational::from_integer(2.into()));
    let two_a = poly_to_expr(ctx, &two_a_poly);

    let plus_num = ctx.add(Expr::Add(neg_b, s));
    let plus = ctx.add(Expr::Div(plus_num, two_a));
    let minus_num = ctx.add(Expr::Sub(neg_b, s));
    let minus = ctx.add(Expr::Div(minus_num, two_a));
    // A zero discriminant collapses both branches to one root after
    // simplification and deduplication upstream.
    Ok((vec![plus, minus], IsolationKind::Quadratic))
}

/// Peel inverses off `f` until `sym` stands alone, with `rhs` tracking
/// the other side.
fn invert_chain(
    ctx: &mut Context,
    f: ExprId,
    rhs: ExprId,
    sym: SymbolId,
) -> Result<Vec<ExprId>, EngineError> {
    if ctx.as_variable(f) == Some(sym) {
        return Ok(vec![rhs]);
    }
    let node = ctx.get(f).clone();
    match node {
        Expr::Function(name, args) => {
            let builtin = ctx.builtin_of(name).ok_or_else(|| cannot(ctx, sym))?;
            match builtin {
                BuiltinFn::Sin => unary_inverse(ctx, args[0], rhs, sym, BuiltinFn::Asin),
                BuiltinFn::Cos => unary_inverse(ctx, args[0], rhs, sym, BuiltinFn::Acos),
                BuiltinFn::Tan => unary_inverse(ctx, args[0], rhs, sym, BuiltinFn::Atan),
                BuiltinFn::Asin => unary_inverse(ctx, args[0], rhs, sym, BuiltinFn::Sin),
                BuiltinFn::Acos => unary_inverse(ctx, args[0], rhs, sym, BuiltinFn::Cos),
                BuiltinFn::Atan => unary_inverse(ctx, args[0], rhs, sym, BuiltinFn::Tan),
                BuiltinFn::Sqrt => {
                    // sqrt never takes a negative value
                    if signed_number(ctx, rhs).map_or(false, |n| n.is_negative()) {
                        return Ok(Vec::new());
                    }
                    let two = ctx.num(2);
                    let squared = ctx.add(Expr::Pow(rhs, two));
                    descend(ctx, args[0], squared, sym)
                }
                BuiltinFn::Atan2 => {
                    let (y, x) = (args[0], args[1]);
                    let tan_rhs = ctx.call(BuiltinFn::Tan, vec![rhs]);
                    if contains_symbol(ctx, y, sym) {
                        if contains_symbol(ctx, x, sym) {
                            return Err(cannot(ctx, sym));
                        }
                        let new_rhs = ctx.add(Expr::Mul(x, tan_rhs));
                        descend(ctx, y, new_rhs, sym)
                    } else {
                        let new_rhs = ctx.add(Expr::Div(y, tan_rhs));
                        descend(ctx, x, new_rhs, sym)
                    }
                }
            }
        }
        Expr::Pow(b, e) => {
            if contains_symbol(ctx, e, sym) {
                return Err(cannot(ctx, sym));
            }
            let inv_e = match ctx.as_number(e) {
                Some(n) => {
                    let flipped = BigRational::new(n.denom().clone(), n.numer().clone());
                    ctx.number(flipped)
                }
                None => {
                    let one = ctx.num(1);
                    ctx.add(Expr::Div(one, e))
                }
            };
            let new_rhs = ctx.add(Expr::Pow(rhs, inv_e));
            descend(ctx, b, new_rhs, sym)
        }
        _ => Err(cannot(ctx, sym)),
    }
}

/// A literal number, seen through any `Neg` wrappers.
fn signed_number(ctx: &Context, id: ExprId) -> Option<BigRational> {
    match ctx.get(id) {
        Expr::Number(n) => Some(n.clone()),
        Expr::Neg(e) => signed_number(ctx, *e).map(|n| -n),
        _ => None,
    }
}

/// Continue inversion into `inner = rhs`. A bare variable finishes the
/// chain; anything else is a fresh, strictly smaller isolation problem.
fn descend(
    ctx: &mut Context,
    inner: ExprId,
    rhs: ExprId,
    sym: SymbolId,
) -> Result<Vec<ExprId>, EngineError> {
    if ctx.as_variable(inner) == Some(sym) {
        return Ok(vec![rhs]);
    }
    Ok(solve_for(ctx, Equation::new(inner, rhs), sym)?.roots)
}

fn unary_inverse(
    ctx: &mut Context,
    arg: ExprId,
    rhs: ExprId,
    sym: SymbolId,
    inverse: BuiltinFn,
) -> Result<Vec<ExprId>, EngineError> {
    let new_rhs = ctx.call(inverse, vec![rhs]);
    descend(ctx, arg, new_rhs, sym)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots_str(ctx: &mut Context, eq: Equation, name: &str) -> Vec<String> {
        let sym = ctx.sym(name);
        let iso = solve_for(ctx, eq, sym).unwrap();
        iso.roots
            .iter()
            .map(|&r| ctx.display(r).to_string())
            .collect()
    }

    #[test]
    fn test_linear() {
        let mut ctx = Context::new();
        // 2x + 6 = 0 -> x = -3
        let x = ctx.var("x");
        let two = ctx.num(2);
        let six = ctx.num(6);
        let tx = ctx.add(Expr::Mul(two, x));
        let lhs = ctx.add(Expr::Add(tx, six));
        let zero = ctx.num(0);
        let eq = Equation::new(lhs, zero);
        assert_eq!(roots_str(&mut ctx, eq, "x"), vec!["-3"]);
        let sym = ctx.sym("x");
        assert_eq!(
            solve_for(&mut ctx, eq, sym).unwrap().kind,
            IsolationKind::Linear
        );
    }

    #[test]
    fn test_linear_symbolic_coefficients() {
        let mut ctx = Context::new();
        // v*t = d -> t = d/v
        let v = ctx.var("v");
        let t = ctx.var("t");
        let d = ctx.var("d");
        let vt = ctx.add(Expr::Mul(v, t));
        let eq = Equation::new(vt, d);
        assert_eq!(roots_str(&mut ctx, eq, "t"), vec!["d/v"]);
    }

    #[test]
    fn test_quadratic_two_roots() {
        let mut ctx = Context::new();
        // x^2 = 9 -> x = 3, x = -3
        let x = ctx.var("x");
        let two = ctx.num(2);
        let x2 = ctx.add(Expr::Pow(x, two));
        let nine = ctx.num(9);
        let eq = Equation::new(x2, nine);
        let mut roots = roots_str(&mut ctx, eq, "x");
        roots.sort();
        assert_eq!(roots, vec!["-3", "3"]);
    }

    #[test]
    fn test_quadratic_factored_zero_root() {
        let mut ctx = Context::new();
        // v*t = a*t^2/2 -> t = 0 or t = 2v/a
        let v = ctx.var("v");
        let t = ctx.var("t");
        let a = ctx.var("a");
        let two = ctx.num(2);
        let vt = ctx.add(Expr::Mul(v, t));
        let t2 = ctx.add(Expr::Pow(t, two));
        let at2 = ctx.add(Expr::Mul(a, t2));
        let rhs = ctx.add(Expr::Div(at2, two));
        let eq = Equation::new(vt, rhs);
        let sym = ctx.sym("t");
        let iso = solve_for(&mut ctx, eq, sym).unwrap();
        assert_eq!(iso.kind, IsolationKind::Quadratic);
        assert_eq!(iso.roots.len(), 2);
        let zero = ctx.num(0);
        assert!(iso.roots.contains(&zero));
    }

    #[test]
    fn test_quadratic_negative_discriminant() {
        let mut ctx = Context::new();
        // x^2 + 1 = 0 has no real roots
        let x = ctx.var("x");
        let two = ctx.num(2);
        let x2 = ctx.add(Expr::Pow(x, two));
        let one = ctx.num(1);
        let lhs = ctx.add(Expr::Add(x2, one));
        let zero = ctx.num(0);
        let sym = ctx.sym("x");
        let iso = solve_for(&mut ctx, Equation::new(lhs, zero), sym).unwrap();
        assert!(iso.roots.is_empty());
        assert_eq!(iso.kind, IsolationKind::Quadratic);
    }

    #[test]
    fn test_sin_inverse() {
        let mut ctx = Context::new();
        // v*sin(theta) = w -> theta = asin(w/v)
        let v = ctx.var("v");
        let th = ctx.var("theta");
        let w = ctx.var("w");
        let s = ctx.call(BuiltinFn::Sin, vec![th]);
        let lhs = ctx.add(Expr::Mul(v, s));
        let eq = Equation::new(lhs, w);
        let sym = ctx.sym("theta");
        let iso = solve_for(&mut ctx, eq, sym).unwrap();
        assert_eq!(iso.kind, IsolationKind::FunctionInverse);
        assert_eq!(iso.roots.len(), 1);
        assert_eq!(ctx.display(iso.roots[0]).to_string(), "asin(w/v)");
    }

    #[test]
    fn test_sqrt_inverse_squares() {
        let mut ctx = Context::new();
        // sqrt(x + 1) = 3 -> x = 8
        let x = ctx.var("x");
        let one = ctx.num(1);
        let arg = ctx.add(Expr::Add(x, one));
        let root = ctx.call(BuiltinFn::Sqrt, vec![arg]);
        let three = ctx.num(3);
        let eq = Equation::new(root, three);
        assert_eq!(roots_str(&mut ctx, eq, "x"), vec!["8"]);
    }

    #[test]
    fn test_sqrt_equals_negative_has_no_root() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let root = ctx.call(BuiltinFn::Sqrt, vec![x]);
        let neg = ctx.num(-2);
        let eq = Equation::new(root, neg);
        let sym = ctx.sym("x");
        let iso = solve_for(&mut ctx, eq, sym).unwrap();
        assert!(iso.roots.is_empty());
    }

    #[test]
    fn test_sqrt_plus_positive_constant_has_no_root() {
        let mut ctx = Context::new();
        // sqrt(x) + 2 = 0: the rhs reaching the inversion is the
        // normalized -2
        let x = ctx.var("x");
        let root = ctx.call(BuiltinFn::Sqrt, vec![x]);
        let two = ctx.num(2);
        let lhs = ctx.add(Expr::Add(root, two));
        let zero = ctx.num(0);
        let sym = ctx.sym("x");
        let iso = solve_for(&mut ctx, Equation::new(lhs, zero), sym).unwrap();
        assert!(iso.roots.is_empty());
    }

    #[test]
    fn test_sqrt_inversion_rejects_negated_rhs() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let root = ctx.call(BuiltinFn::Sqrt, vec![x]);
        let two = ctx.num(2);
        let neg = ctx.add(Expr::Neg(two));
        let sym = ctx.sym("x");
        let out = invert_chain(&mut ctx, root, neg, sym).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_atan2_both_slots() {
        let mut ctx = Context::new();
        // atan2(y, x) = r -> y = x*tan(r)
        let y = ctx.var("y");
        let x = ctx.var("x");
        let r = ctx.var("r");
        let at = ctx.call(BuiltinFn::Atan2, vec![y, x]);
        let eq = Equation::new(at, r);
        let ysym = ctx.sym("y");
        let iso = solve_for(&mut ctx, eq, ysym).unwrap();
        assert_eq!(iso.roots.len(), 1);
        assert_eq!(ctx.display(iso.roots[0]).to_string(), "x*tan(r)");
        let xsym = ctx.sym("x");
        let iso_x = solve_for(&mut ctx, eq, xsym).unwrap();
        assert_eq!(ctx.display(iso_x.roots[0]).to_string(), "y/tan(r)");
    }

    #[test]
    fn test_two_carriers_rejected() {
        let mut ctx = Context::new();
        // sin(x) + x = 1 cannot be isolated
        let x = ctx.var("x");
        let s = ctx.call(BuiltinFn::Sin, vec![x]);
        let lhs = ctx.add(Expr::Add(s, x));
        let one = ctx.num(1);
        let sym = ctx.sym("x");
        assert!(matches!(
            solve_for(&mut ctx, Equation::new(lhs, one), sym),
            Err(EngineError::CannotIsolate { .. })
        ));
    }

    #[test]
    fn test_cubic_rejected() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let three = ctx.num(3);
        let x3 = ctx.add(Expr::Pow(x, three));
        let one = ctx.num(1);
        let sym = ctx.sym("x");
        assert!(matches!(
            solve_for(&mut ctx, Equation::new(x3, one), sym),
            Err(EngineError::DegreeTooHigh { degree: 3, .. })
        ));
    }
}
