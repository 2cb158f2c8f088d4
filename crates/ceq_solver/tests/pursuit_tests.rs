//! A motorist passing a waiting police officer who then accelerates
//! from rest. The catch-up time is the root of a quadratic; the t = 0
//! crossing must be discarded because it leaves 0/0 residuals.

mod common;

use common::kinematics::{kinematics_fundamental, make_states_model, Axis};
use common::{assert_close, eliminate_zero_eqs, eq_flat, known_bindings, sym_of};
use ceq_ast::Context;
use ceq_engine::eval_f64;
use ceq_solver::{reduce, EngineAlgebra, Problem, SolveOptions};
use std::collections::BTreeMap;

#[test]
fn test_pursuit_catch_up() {
    let mut ctx = Context::new();
    let m = make_states_model(&mut ctx, "m", 2);
    let p = make_states_model(&mut ctx, "p", 2);
    let mut eqs = kinematics_fundamental(&mut ctx, &m, &[Axis::X]);
    eqs.extend(kinematics_fundamental(&mut ctx, &p, &[Axis::X]));

    let m_v = ctx.var("m_v");
    let dist = ctx.var("dist");
    let t_01 = ctx.var("t_01");
    let zero = ctx.num(0);
    eqs.extend(eq_flat(&[
        (m_v, m.states[0].vel.x),
        (m_v, m.states[1].vel.x),
        (p.states[0].vel.x, zero),
        (m.states[0].pos.x, zero),
        (p.states[0].pos.x, zero),
        (m.states[0].t, zero),
        (p.states[0].t, zero),
        (dist, m.states[1].pos.x),
        (dist, p.states[1].pos.x),
        (t_01, m.states[1].t),
        (t_01, p.states[1].t),
    ]));
    let eqs = eliminate_zero_eqs(&mut ctx, eqs);

    let fifteen = ctx.num(15);
    let three = ctx.num(3);
    let knowns = BTreeMap::from([
        (sym_of(&ctx, m_v), fifteen),
        (sym_of(&ctx, p.intervals[0].a.x), three),
    ]);
    let t_sym = sym_of(&ctx, t_01);
    let dist_sym = sym_of(&ctx, dist);
    let p1v_sym = sym_of(&ctx, p.states[1].vel.x);

    let problem = Problem {
        equations: eqs,
        targets: vec![t_sym],
        knowns: knowns.clone(),
    };
    let reduction = reduce(&mut ctx, &EngineAlgebra, &problem, &SolveOptions::default())
        .expect("pursuit reduces");
    assert_eq!(reduction.solutions.len(), 1, "the t = 0 crossing must be rejected");

    let sol = &reduction.solutions[0];
    let bindings = known_bindings(&ctx, &knowns);
    let t = eval_f64(&ctx, sol[&t_sym], &bindings).unwrap();
    let d = eval_f64(&ctx, sol[&dist_sym], &bindings).unwrap();
    let v = eval_f64(&ctx, sol[&p1v_sym], &bindings).unwrap();
    assert_close(t, 10.0);
    assert_close(d, 150.0);
    assert_close(v, 30.0);
}
