use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by filtering and reduction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// A substituted equation reduced to a provably false statement.
    #[error("inconsistent system: `{equation}` cannot hold")]
    InconsistentSystem { equation: String },

    /// All symbols substituted away, yet the residual could not be
    /// proven zero or nonzero.
    #[error("unprovable residual: `{equation}`")]
    UnprovenResidual { equation: String },

    /// Direct solving and every elimination retry ran out.
    #[error("no solution found for `{target}` after {rounds} round(s) in {elapsed:?}")]
    NoSolutionFound {
        target: String,
        rounds: usize,
        elapsed: Duration,
    },
}
