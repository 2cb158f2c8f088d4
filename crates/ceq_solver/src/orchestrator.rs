//! The reduction pipeline.
//!
//! A problem is a set of relations, target unknowns, and known values.
//! Reduction narrows the system to the unknowns connected to the
//! targets, filters it for consistency, then alternates direct system
//! solving with symbol elimination: whenever the backend cannot solve
//! the system as given, one expendable unknown is eliminated and the
//! solve is retried, up to a round budget. Knowns stay symbolic the
//! whole way; callers substitute numbers only when evaluating results.

use crate::capability::AlgebraCapability;
use crate::eliminate::eliminate;
use crate::error::SolveError;
use crate::filter::{clear_zero_denominators, filter_relevant};
use crate::history::{DerivationArena, NodeId};
use crate::options::SolveOptions;
use crate::relevance::connected_unknowns;
use ceq_ast::{Context, Equation, ExprId, SymbolId};
use ceq_engine::Assignment;
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// What to reduce: relations, what to find, what is given.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    pub equations: Vec<Equation>,
    pub targets: Vec<SymbolId>,
    pub knowns: BTreeMap<SymbolId, ExprId>,
}

/// Outcome of one round of the loop.
#[derive(Debug, Clone)]
pub enum Attempt {
    /// The backend solved the system as given.
    Solved(Vec<Assignment>),
    /// The system was reduced by one unknown; solve again.
    Eliminated {
        symbol: SymbolId,
        equations: Vec<Equation>,
    },
    /// No candidate made progress and still no solution.
    Stuck,
}

/// A successful reduction.
#[derive(Debug, Clone)]
pub struct Reduction {
    /// Verified assignments for every connected unknown, targets
    /// included, as expressions over the known symbols.
    pub solutions: Vec<Assignment>,
    /// Solve rounds spent, elimination rounds included.
    pub rounds: usize,
    pub elapsed: Duration,
    pub history: DerivationArena,
}

pub fn reduce<C: AlgebraCapability>(
    ctx: &mut Context,
    cap: &C,
    problem: &Problem,
    opts: &SolveOptions,
) -> Result<Reduction, SolveError> {
    let start = Instant::now();
    let targets: BTreeSet<SymbolId> = problem.targets.iter().copied().collect();
    let known_syms: BTreeSet<SymbolId> = problem.knowns.keys().copied().collect();

    let relevant = connected_unknowns(ctx, &problem.equations, &targets, &known_syms);
    let cleared = clear_zero_denominators(ctx, &problem.equations);
    let mut eqs = filter_relevant(ctx, cap, &cleared, &relevant, &problem.knowns)?;

    let mut history = DerivationArena::new();
    let mut node_ids: Vec<NodeId> = eqs.iter().map(|eq| history.add_given(*eq)).collect();

    let mut unknowns = collect_unknowns(ctx, &eqs, &relevant);
    for &target in &problem.targets {
        if !unknowns.contains(&target) {
            return Err(SolveError::NoSolutionFound {
                target: ctx.sym_name(target).to_string(),
                rounds: 0,
                elapsed: start.elapsed(),
            });
        }
    }
    info!(
        equations = eqs.len(),
        unknowns = unknowns.len(),
        "reduction started"
    );

    let mut rounds = 0;
    while rounds < opts.max_rounds {
        rounds += 1;
        match attempt_round(ctx, cap, &eqs, &unknowns, &targets, &known_syms, opts)? {
            Attempt::Solved(solutions) => {
                let elapsed = start.elapsed();
                info!(rounds, solutions = solutions.len(), ?elapsed, "reduced");
                return Ok(Reduction {
                    solutions,
                    rounds,
                    elapsed,
                    history,
                });
            }
            Attempt::Eliminated { symbol, equations } => {
                let parents: Vec<NodeId> = eqs
                    .iter()
                    .zip(&node_ids)
                    .filter(|(eq, _)| eq.contains_symbol(ctx, symbol))
                    .map(|(_, &id)| id)
                    .collect();
                node_ids = equations
                    .iter()
                    .map(|eq| match eqs.iter().position(|old| old == eq) {
                        Some(pos) => node_ids[pos],
                        None => history.add_derived(*eq, symbol, parents.iter().copied()),
                    })
                    .collect();
                eqs = equations;
                unknowns.retain(|u| *u != symbol);
                debug!(
                    symbol = ctx.sym_name(symbol),
                    rounds, "eliminated and retrying"
                );
            }
            Attempt::Stuck => break,
        }
    }

    Err(SolveError::NoSolutionFound {
        target: problem
            .targets
            .first()
            .map(|&t| ctx.sym_name(t).to_string())
            .unwrap_or_default(),
        rounds,
        elapsed: start.elapsed(),
    })
}

fn attempt_round<C: AlgebraCapability>(
    ctx: &mut Context,
    cap: &C,
    eqs: &[Equation],
    unknowns: &[SymbolId],
    targets: &BTreeSet<SymbolId>,
    knowns: &BTreeSet<SymbolId>,
    opts: &SolveOptions,
) -> Result<Attempt, SolveError> {
    let solutions = cap.solve_system(ctx, eqs, unknowns);
    if !solutions.is_empty() {
        return Ok(Attempt::Solved(solutions));
    }
    for sym in elimination_candidates(ctx, eqs, unknowns, targets, knowns) {
        let outcome = eliminate(ctx, cap, eqs, sym, opts)?;
        if outcome.replacement.is_none() {
            trace!(symbol = ctx.sym_name(sym), "candidate made no progress");
            continue;
        }
        return Ok(Attempt::Eliminated {
            symbol: sym,
            equations: outcome.equations,
        });
    }
    Ok(Attempt::Stuck)
}

/// Expendable unknowns in retry order: never a target, symbols that
/// lost their connection to every target first (knowns do not carry
/// connectivity), then fewest equation occurrences, name as the final
/// tiebreak.
fn elimination_candidates(
    ctx: &Context,
    eqs: &[Equation],
    unknowns: &[SymbolId],
    targets: &BTreeSet<SymbolId>,
    knowns: &BTreeSet<SymbolId>,
) -> Vec<SymbolId> {
    let connected = connected_unknowns(ctx, eqs, targets, knowns);
    let mut out: Vec<SymbolId> = unknowns
        .iter()
        .copied()
        .filter(|sym| !targets.contains(sym))
        .filter(|sym| eqs.iter().any(|eq| eq.contains_symbol(ctx, *sym)))
        .collect();
    out.sort_by_cached_key(|sym| {
        let count = eqs
            .iter()
            .filter(|eq| eq.contains_symbol(ctx, *sym))
            .count();
        (connected.contains(sym), count, ctx.sym_name(*sym).to_string())
    });
    out
}

/// Relevant unknowns that survived filtering, ordered by name.
fn collect_unknowns(
    ctx: &Context,
    eqs: &[Equation],
    relevant: &BTreeSet<SymbolId>,
) -> Vec<SymbolId> {
    let mut present: BTreeSet<SymbolId> = BTreeSet::new();
    for eq in eqs {
        for sym in eq.free_symbols(ctx) {
            if relevant.contains(&sym) {
                present.insert(sym);
            }
        }
    }
    let mut out: Vec<SymbolId> = present.into_iter().collect();
    out.sort_by(|a, b| ctx.sym_name(*a).cmp(ctx.sym_name(*b)));
    out
}
