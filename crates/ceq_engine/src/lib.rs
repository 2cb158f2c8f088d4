//! Exact algebra over `ceq_ast` expressions: rational-function
//! normalization, closed-form isolation, simultaneous solving and
//! floating-point evaluation.

pub mod error;
pub mod eval;
pub mod isolate;
pub mod poly;
pub mod ratfunc;
pub mod simplify;
pub mod system;

pub use error::EngineError;
pub use eval::{eval_f64, eval_partial};
pub use isolate::{solve_for, Isolation, IsolationKind};
pub use poly::{Mono, Poly};
pub use ratfunc::RatFunc;
pub use simplify::{classify_equation, normalize, safe_simplify, to_ratfunc, EqClass};
pub use system::{solve_system, Assignment};
