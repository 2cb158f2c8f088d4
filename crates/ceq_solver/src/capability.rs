//! The algebra seam between orchestration and the engine.
//!
//! Reduction only needs four operations from an algebra backend.
//! Keeping them behind a trait lets tests rig a backend that refuses
//! direct system solves, forcing the elimination retry path that a
//! well-behaved engine would rarely take.

use ceq_ast::{Context, Equation, ExprId, SymbolId};
use ceq_engine::{Assignment, EngineError, EqClass, Isolation};

pub trait AlgebraCapability {
    /// Normalize an expression, returning the input when undefined.
    fn simplify(&self, ctx: &mut Context, id: ExprId) -> ExprId;

    /// What an equation says: identity, contradiction, undefined, or a
    /// genuine constraint.
    fn classify(&self, ctx: &mut Context, eq: Equation) -> EqClass;

    /// Closed-form roots of one symbol in one equation.
    fn solve_for(
        &self,
        ctx: &mut Context,
        eq: Equation,
        sym: SymbolId,
    ) -> Result<Isolation, EngineError>;

    /// All consistent assignments for `unknowns`; empty when the
    /// backend cannot solve the system as given.
    fn solve_system(
        &self,
        ctx: &mut Context,
        eqs: &[Equation],
        unknowns: &[SymbolId],
    ) -> Vec<Assignment>;
}

/// The exact-algebra backend from `ceq_engine`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineAlgebra;

impl AlgebraCapability for EngineAlgebra {
    fn simplify(&self, ctx: &mut Context, id: ExprId) -> ExprId {
        ceq_engine::safe_simplify(ctx, id)
    }

    fn classify(&self, ctx: &mut Context, eq: Equation) -> EqClass {
        ceq_engine::classify_equation(ctx, eq)
    }

    fn solve_for(
        &self,
        ctx: &mut Context,
        eq: Equation,
        sym: SymbolId,
    ) -> Result<Isolation, EngineError> {
        ceq_engine::solve_for(ctx, eq, sym)
    }

    fn solve_system(
        &self,
        ctx: &mut Context,
        eqs: &[Equation],
        unknowns: &[SymbolId],
    ) -> Vec<Assignment> {
        ceq_engine::solve_system(ctx, eqs, unknowns)
    }
}
