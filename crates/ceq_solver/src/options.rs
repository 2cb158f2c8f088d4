//! Tunable policy for the reduction loop.

use ceq_ast::{count_all_nodes, Context, ExprId};

/// Candidate score: fewer nodes is simpler. The default counts every
/// node of the expression tree.
pub type ScoreFn = fn(&Context, ExprId) -> usize;

pub fn node_score(ctx: &Context, id: ExprId) -> usize {
    count_all_nodes(ctx, id)
}

/// Bounds and policy hooks for one reduction.
#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Solve attempts before giving up, each preceded by one
    /// elimination except the first.
    pub max_rounds: usize,
    /// Substitution sweeps inside a single elimination.
    pub max_passes: usize,
    /// Ranks candidate replacement expressions; the smallest wins.
    pub score: ScoreFn,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            max_passes: 10,
            score: node_score,
        }
    }
}
