//! Eliminating one symbol from a system by isolate-and-substitute.
//!
//! Every equation that can be solved for the symbol contributes
//! candidate replacements; the simplest one (by the configured score,
//! ties broken on printed form) is substituted into the rest and its
//! source equation retired. The sweep repeats until the symbol is gone
//! or the pass budget runs out.

use crate::capability::AlgebraCapability;
use crate::error::SolveError;
use crate::options::SolveOptions;
use ceq_ast::{contains_symbol, Context, Equation, ExprId, SymbolId};
use ceq_engine::EqClass;
use tracing::{debug, trace};

/// One elimination: the rewritten system and the expression that was
/// substituted for the symbol. `replacement` is `None` when no equation
/// offered a usable solved form, in which case the equations come back
/// unchanged and the caller should try a different symbol.
#[derive(Debug, Clone)]
pub struct Elimination {
    pub equations: Vec<Equation>,
    pub replacement: Option<ExprId>,
}

/// Remove `sym` from `eqs`. On success the result never mentions the
/// symbol; when the symbol cannot be isolated anywhere this is not an
/// error, only a no-progress outcome.
pub fn eliminate<C: AlgebraCapability>(
    ctx: &mut Context,
    cap: &C,
    eqs: &[Equation],
    sym: SymbolId,
    opts: &SolveOptions,
) -> Result<Elimination, SolveError> {
    let mut current = eqs.to_vec();
    let mut replacement = None;
    for pass in 0..opts.max_passes {
        if !current.iter().any(|eq| eq.contains_symbol(ctx, sym)) {
            debug!(
                symbol = ctx.sym_name(sym),
                passes = pass,
                remaining = current.len(),
                "symbol eliminated"
            );
            break;
        }
        let (used, chosen) = match best_candidate(ctx, cap, &current, sym, opts) {
            Some(found) => found,
            None => {
                debug!(symbol = ctx.sym_name(sym), pass, "no usable candidate");
                break;
            }
        };
        trace!(
            pass,
            replacement = %ctx.display(chosen),
            "substituting candidate"
        );
        let mut next = Vec::with_capacity(current.len() - 1);
        for (i, eq) in current.iter().enumerate() {
            if i == used {
                continue;
            }
            let substituted = eq.substitute(ctx, sym, chosen);
            match cap.classify(ctx, substituted) {
                EqClass::Identity => {}
                EqClass::Contradiction | EqClass::Undefined => {
                    return Err(SolveError::InconsistentSystem {
                        equation: ctx.display_eq(*eq).to_string(),
                    });
                }
                EqClass::Constraint(_) => {
                    let lhs = cap.simplify(ctx, substituted.lhs);
                    let rhs = cap.simplify(ctx, substituted.rhs);
                    next.push(Equation::new(lhs, rhs));
                }
            }
        }
        replacement.get_or_insert(chosen);
        current = next;
    }
    Ok(Elimination {
        equations: current,
        replacement,
    })
}

/// The simplest solved form of `sym` across all equations. Solved
/// forms that still mention the symbol are non-reductions and are
/// rejected here no matter which backend produced them.
fn best_candidate<C: AlgebraCapability>(
    ctx: &mut Context,
    cap: &C,
    eqs: &[Equation],
    sym: SymbolId,
    opts: &SolveOptions,
) -> Option<(usize, ExprId)> {
    let mut best: Option<(usize, String, usize, ExprId)> = None;
    for (i, eq) in eqs.iter().enumerate() {
        if !eq.contains_symbol(ctx, sym) {
            continue;
        }
        let iso = match cap.solve_for(ctx, *eq, sym) {
            Ok(iso) => iso,
            Err(_) => continue,
        };
        for root in iso.roots {
            if contains_symbol(ctx, root, sym) {
                continue;
            }
            let key = ((opts.score)(ctx, root), ctx.display(root).to_string());
            let better = match &best {
                None => true,
                Some((score, printed, ..)) => key < (*score, printed.clone()),
            };
            if better {
                best = Some((key.0, key.1, i, root));
            }
        }
    }
    best.map(|(_, _, i, root)| (i, root))
}
