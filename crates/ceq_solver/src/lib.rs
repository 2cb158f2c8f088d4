//! Equation-system reduction for symbolic relations.
//!
//! Feed [`reduce`] a [`Problem`] (relations between interned symbols,
//! target unknowns, and known values) and get back every consistent
//! closed-form assignment for the unknowns connected to the targets.
//! The pipeline filters the system for consistency, narrows it to the
//! relevant unknowns, and alternates direct solving with bounded
//! symbol elimination.

pub mod capability;
pub mod eliminate;
pub mod error;
pub mod filter;
pub mod history;
pub mod options;
pub mod orchestrator;
pub mod relevance;

pub use capability::{AlgebraCapability, EngineAlgebra};
pub use eliminate::{eliminate, Elimination};
pub use error::SolveError;
pub use filter::{clear_zero_denominators, filter_relevant};
pub use history::{DerivationArena, DerivationNode, NodeId, StepKind};
pub use options::{node_score, ScoreFn, SolveOptions};
pub use orchestrator::{reduce, Attempt, Problem, Reduction};
pub use relevance::connected_unknowns;
