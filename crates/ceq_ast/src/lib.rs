//! Expression and equation model for the combine-equations workspace.
//!
//! Everything lives in an arena [`Context`]: expression nodes are
//! hash-consed and addressed by [`ExprId`], symbols are interned to
//! [`SymbolId`]. Equations are id pairs, cheap to copy and compare.

pub mod builtin;
pub mod display;
pub mod eq;
pub mod expression;
pub mod ordering;
pub mod symbol;
pub mod traversal;

pub use builtin::{BuiltinFn, BuiltinIds};
pub use display::{DisplayEquation, DisplayExpr};
pub use eq::Equation;
pub use expression::{Constant, Context, Expr, ExprId};
pub use ordering::compare_expr;
pub use symbol::{SymbolId, SymbolTable};
pub use traversal::{
    contains_symbol, count_all_nodes, free_symbols, substitute_map, substitute_symbol,
};
