//! Constant-acceleration state models used by the scenario tests.
//!
//! A model is a chain of numbered states, each with position, velocity,
//! and a clock reading, plus per-interval acceleration and average
//! velocity variables. The fundamental equations relate neighbouring
//! states per axis.

use super::{add, div, mul, square, sub};
use ceq_ast::{BuiltinFn, Context, Equation, ExprId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn suffix(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// A named vector quantity, with optional polar aliases.
#[derive(Debug, Clone)]
pub struct Point3 {
    pub x: ExprId,
    pub y: ExprId,
    pub z: ExprId,
    pub mag: Option<ExprId>,
    pub angle: Option<ExprId>,
}

impl Point3 {
    pub fn component(&self, axis: Axis) -> ExprId {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

#[derive(Debug, Clone)]
pub struct State {
    pub pos: Point3,
    pub vel: Point3,
    pub t: ExprId,
}

/// Quantities attached to the interval between two states.
#[derive(Debug, Clone)]
pub struct Interval {
    pub dt: ExprId,
    pub a: Point3,
    pub v_av: Point3,
}

#[derive(Debug, Clone)]
pub struct StatesModel {
    pub states: Vec<State>,
    pub intervals: Vec<Interval>,
}

fn cartesian(ctx: &mut Context, base: &str) -> Point3 {
    Point3 {
        x: ctx.var(&format!("{base}_x")),
        y: ctx.var(&format!("{base}_y")),
        z: ctx.var(&format!("{base}_z")),
        mag: None,
        angle: None,
    }
}

fn polar(ctx: &mut Context, base: &str) -> Point3 {
    Point3 {
        x: ctx.var(&format!("{base}_x")),
        y: ctx.var(&format!("{base}_y")),
        z: ctx.var(&format!("{base}_z")),
        mag: Some(ctx.var(&format!("{base}_mag"))),
        angle: Some(ctx.var(&format!("{base}_angle"))),
    }
}

/// A chain of `n_states` states named `{prefix}_0`, `{prefix}_1`, ...
pub fn make_states_model(ctx: &mut Context, prefix: &str, n_states: usize) -> StatesModel {
    let states = (0..n_states)
        .map(|i| State {
            pos: cartesian(ctx, &format!("{prefix}_{i}")),
            vel: polar(ctx, &format!("{prefix}_{i}_v")),
            t: ctx.var(&format!("{prefix}_{i}_t")),
        })
        .collect();
    let intervals = (0..n_states.saturating_sub(1))
        .map(|i| {
            let j = i + 1;
            Interval {
                dt: ctx.var(&format!("dt_{prefix}_{i}_{j}")),
                a: Point3 {
                    x: ctx.var(&format!("a_x_{prefix}_{i}_{j}")),
                    y: ctx.var(&format!("a_y_{prefix}_{i}_{j}")),
                    z: ctx.var(&format!("a_z_{prefix}_{i}_{j}")),
                    mag: None,
                    angle: None,
                },
                v_av: Point3 {
                    x: ctx.var(&format!("v_av_x_{prefix}_{i}_{j}")),
                    y: ctx.var(&format!("v_av_y_{prefix}_{i}_{j}")),
                    z: ctx.var(&format!("v_av_z_{prefix}_{i}_{j}")),
                    mag: None,
                    angle: None,
                },
            }
        })
        .collect();
    StatesModel { states, intervals }
}

/// dt = t1 - t0
pub fn eq_dt_def(ctx: &mut Context, iv: &Interval, s0: &State, s1: &State) -> Equation {
    let rhs = sub(ctx, s1.t, s0.t);
    Equation::new(iv.dt, rhs)
}

/// v_av = (x1 - x0) / dt
pub fn eq_average_velocity(
    ctx: &mut Context,
    iv: &Interval,
    s0: &State,
    s1: &State,
    axis: Axis,
) -> Equation {
    let dx = sub(ctx, s1.pos.component(axis), s0.pos.component(axis));
    let rhs = div(ctx, dx, iv.dt);
    Equation::new(iv.v_av.component(axis), rhs)
}

/// a = (v1 - v0) / dt
pub fn eq_average_acceleration(
    ctx: &mut Context,
    iv: &Interval,
    s0: &State,
    s1: &State,
    axis: Axis,
) -> Equation {
    let dv = sub(ctx, s1.vel.component(axis), s0.vel.component(axis));
    let rhs = div(ctx, dv, iv.dt);
    Equation::new(iv.a.component(axis), rhs)
}

/// v_av = (v0 + v1) / 2, which holds when acceleration is constant.
pub fn eq_mean_velocity(
    ctx: &mut Context,
    iv: &Interval,
    s0: &State,
    s1: &State,
    axis: Axis,
) -> Equation {
    let vsum = add(ctx, s0.vel.component(axis), s1.vel.component(axis));
    let two = ctx.num(2);
    let rhs = div(ctx, vsum, two);
    Equation::new(iv.v_av.component(axis), rhs)
}

/// The four fundamental relations per interval and axis.
pub fn kinematics_fundamental(ctx: &mut Context, model: &StatesModel, axes: &[Axis]) -> Vec<Equation> {
    let mut eqs = Vec::new();
    for (i, iv) in model.intervals.iter().enumerate() {
        let s0 = &model.states[i];
        let s1 = &model.states[i + 1];
        eqs.push(eq_dt_def(ctx, iv, s0, s1));
        for &axis in axes {
            eqs.push(eq_average_velocity(ctx, iv, s0, s1, axis));
            eqs.push(eq_average_acceleration(ctx, iv, s0, s1, axis));
            eqs.push(eq_mean_velocity(ctx, iv, s0, s1, axis));
        }
    }
    eqs
}

/// Tie a state's velocity components to its magnitude and direction:
/// vx = mag*cos(angle), vy = mag*sin(angle), mag = sqrt(vx^2 + vy^2),
/// angle = atan2(vy, vx).
pub fn magnitude_and_angle_equations(ctx: &mut Context, state: &State) -> Vec<Equation> {
    let mag = state.vel.mag.expect("velocity magnitude variable");
    let angle = state.vel.angle.expect("velocity angle variable");
    let vx = state.vel.x;
    let vy = state.vel.y;
    let cos_a = ctx.call(BuiltinFn::Cos, vec![angle]);
    let sin_a = ctx.call(BuiltinFn::Sin, vec![angle]);
    let mag_cos = mul(ctx, mag, cos_a);
    let mag_sin = mul(ctx, mag, sin_a);
    let vx2 = square(ctx, vx);
    let vy2 = square(ctx, vy);
    let sum = add(ctx, vx2, vy2);
    let norm = ctx.call(BuiltinFn::Sqrt, vec![sum]);
    let dir = ctx.call(BuiltinFn::Atan2, vec![vy, vx]);
    vec![
        Equation::new(vx, mag_cos),
        Equation::new(vy, mag_sin),
        Equation::new(mag, norm),
        Equation::new(angle, dir),
    ]
}
