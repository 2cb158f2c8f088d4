//! Shared helpers for the scenario tests.

#![allow(dead_code)]

pub mod kinematics;

use ceq_ast::{Context, Equation, Expr, ExprId, SymbolId};
use ceq_engine::eval_f64;
use ceq_solver::{eliminate, reduce, EngineAlgebra, Problem, SolveOptions};
use num_traits::Zero;
use std::collections::BTreeMap;

pub fn sub(ctx: &mut Context, a: ExprId, b: ExprId) -> ExprId {
    ctx.add(Expr::Sub(a, b))
}

pub fn add(ctx: &mut Context, a: ExprId, b: ExprId) -> ExprId {
    ctx.add(Expr::Add(a, b))
}

pub fn mul(ctx: &mut Context, a: ExprId, b: ExprId) -> ExprId {
    ctx.add(Expr::Mul(a, b))
}

pub fn div(ctx: &mut Context, a: ExprId, b: ExprId) -> ExprId {
    ctx.add(Expr::Div(a, b))
}

pub fn square(ctx: &mut Context, a: ExprId) -> ExprId {
    let two = ctx.num(2);
    ctx.add(Expr::Pow(a, two))
}

/// The symbol behind a plain variable expression.
pub fn sym_of(ctx: &Context, id: ExprId) -> SymbolId {
    ctx.as_variable(id).expect("expected a plain variable")
}

/// Build equations from a flat lhs, rhs, lhs, rhs... list.
pub fn eq_flat(pairs: &[(ExprId, ExprId)]) -> Vec<Equation> {
    pairs.iter().map(|&(l, r)| Equation::new(l, r)).collect()
}

/// Structurally eliminate every symbol that an equation pins to a
/// literal zero, mirroring how models are flattened before solving.
pub fn eliminate_zero_eqs(ctx: &mut Context, eqs: Vec<Equation>) -> Vec<Equation> {
    let zero_syms: Vec<SymbolId> = eqs
        .iter()
        .filter(|eq| ctx.as_number(eq.rhs).map_or(false, |n| n.is_zero()))
        .filter_map(|eq| ctx.as_variable(eq.lhs))
        .collect();
    let mut current = eqs;
    for sym in zero_syms {
        let out = eliminate(ctx, &EngineAlgebra, &current, sym, &SolveOptions::default())
            .expect("zero elimination");
        current = out.equations;
    }
    current
}

/// Numeric bindings for the known symbols, evaluated from their exact
/// known expressions.
pub fn known_bindings(
    ctx: &Context,
    knowns: &BTreeMap<SymbolId, ExprId>,
) -> BTreeMap<SymbolId, f64> {
    knowns
        .iter()
        .map(|(&sym, &value)| {
            let v = eval_f64(ctx, value, &BTreeMap::new()).expect("known value");
            (sym, v)
        })
        .collect()
}

/// Reduce and evaluate: every solution's value of `target` as f64,
/// sorted ascending.
pub fn solve_numeric_solutions(
    ctx: &mut Context,
    eqs: &[Equation],
    knowns: &BTreeMap<SymbolId, ExprId>,
    target: SymbolId,
) -> Vec<f64> {
    let problem = Problem {
        equations: eqs.to_vec(),
        targets: vec![target],
        knowns: knowns.clone(),
    };
    let reduction = reduce(ctx, &EngineAlgebra, &problem, &SolveOptions::default())
        .expect("reduction succeeds");
    let bindings = known_bindings(ctx, knowns);
    let mut out: Vec<f64> = reduction
        .solutions
        .iter()
        .map(|sol| eval_f64(ctx, sol[&target], &bindings).expect("numeric value"))
        .collect();
    out.sort_by(|a, b| a.partial_cmp(b).expect("finite"));
    out
}

/// Reduce expecting exactly one solution for `target`.
pub fn solve_numeric(
    ctx: &mut Context,
    eqs: &[Equation],
    knowns: &BTreeMap<SymbolId, ExprId>,
    target: SymbolId,
) -> f64 {
    let values = solve_numeric_solutions(ctx, eqs, knowns, target);
    assert_eq!(values.len(), 1, "expected one solution, got {values:?}");
    values[0]
}

/// Nine-decimal-place agreement, the tolerance the worked examples use.
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
