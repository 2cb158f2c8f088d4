//! Expression nodes and the arena `Context` that owns them.
//!
//! Expressions are immutable values: every operation that "changes" an
//! expression allocates new nodes and returns a new `ExprId`. Nodes are
//! hash-consed, so structurally equal expressions built in the same
//! `Context` always share one id and equality is an id comparison.

use crate::builtin::{BuiltinFn, BuiltinIds};
use crate::symbol::{SymbolId, SymbolTable};
use num_bigint::BigInt;
use num_rational::BigRational;
use rustc_hash::FxHashMap;

/// Index of an expression node inside a `Context`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Named mathematical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
}

/// One expression node. Children are ids into the owning `Context`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Number(BigRational),
    Constant(Constant),
    Variable(SymbolId),
    Add(ExprId, ExprId),
    Sub(ExprId, ExprId),
    Mul(ExprId, ExprId),
    Div(ExprId, ExprId),
    Pow(ExprId, ExprId),
    Neg(ExprId),
    Function(SymbolId, Vec<ExprId>),
}

/// Arena owning expression nodes, the symbol registry, and the builtin
/// function id cache.
#[derive(Debug, Clone)]
pub struct Context {
    nodes: Vec<Expr>,
    memo: FxHashMap<Expr, ExprId>,
    symbols: SymbolTable,
    builtins: BuiltinIds,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        let mut symbols = SymbolTable::new();
        let builtins = BuiltinIds::new(|s| symbols.intern(s));
        Self {
            nodes: Vec::new(),
            memo: FxHashMap::default(),
            symbols,
            builtins,
        }
    }

    /// Add a node, reusing the id of an identical existing node.
    pub fn add(&mut self, expr: Expr) -> ExprId {
        if let Some(&id) = self.memo.get(&expr) {
            return id;
        }
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(expr.clone());
        self.memo.insert(expr, id);
        id
    }

    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.nodes[id.index()]
    }

    /// Intern a symbol name.
    pub fn sym(&mut self, name: &str) -> SymbolId {
        self.symbols.intern(name)
    }

    #[inline]
    pub fn sym_name(&self, id: SymbolId) -> &str {
        self.symbols.resolve(id)
    }

    /// Look up a symbol by name without interning.
    pub fn sym_id(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get_id(name)
    }

    /// Variable node for a (possibly new) symbol name.
    pub fn var(&mut self, name: &str) -> ExprId {
        let sym = self.sym(name);
        self.add(Expr::Variable(sym))
    }

    /// Variable node for an already interned symbol.
    pub fn var_of(&mut self, sym: SymbolId) -> ExprId {
        self.add(Expr::Variable(sym))
    }

    /// Integer literal.
    pub fn num(&mut self, n: i64) -> ExprId {
        self.add(Expr::Number(BigRational::from_integer(BigInt::from(n))))
    }

    /// Rational literal `n/d`.
    ///
    /// # Panics
    /// Panics if `d == 0`.
    pub fn ratio(&mut self, n: i64, d: i64) -> ExprId {
        self.add(Expr::Number(BigRational::new(
            BigInt::from(n),
            BigInt::from(d),
        )))
    }

    /// Arbitrary rational literal.
    pub fn number(&mut self, r: BigRational) -> ExprId {
        self.add(Expr::Number(r))
    }

    pub fn pi(&mut self) -> ExprId {
        self.add(Expr::Constant(Constant::Pi))
    }

    /// Builtin function application.
    pub fn call(&mut self, f: BuiltinFn, args: Vec<ExprId>) -> ExprId {
        debug_assert_eq!(args.len(), f.arity());
        let sym = self.builtins.get(f);
        self.add(Expr::Function(sym, args))
    }

    #[inline]
    pub fn builtin_id(&self, f: BuiltinFn) -> SymbolId {
        self.builtins.get(f)
    }

    /// Which builtin a function symbol denotes, if any.
    #[inline]
    pub fn builtin_of(&self, sym: SymbolId) -> Option<BuiltinFn> {
        self.builtins.classify(sym)
    }

    /// The node's numeric value, when it is a literal.
    pub fn as_number(&self, id: ExprId) -> Option<&BigRational> {
        match self.get(id) {
            Expr::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The node's symbol, when it is a plain variable.
    pub fn as_variable(&self, id: ExprId) -> Option<SymbolId> {
        match self.get(id) {
            Expr::Variable(s) => Some(*s),
            _ => None,
        }
    }

    /// Arguments of `id` when it is a call to the given builtin.
    pub fn builtin_call(&self, id: ExprId, f: BuiltinFn) -> Option<&[ExprId]> {
        match self.get(id) {
            Expr::Function(sym, args) if self.builtins.get(f) == *sym => Some(args),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
