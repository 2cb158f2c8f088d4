//! Builtin function identifiers for O(1) comparison.
//!
//! Function names in the AST are interned `SymbolId`s; this module caches
//! the ids of the functions the engine knows how to invert and evaluate,
//! so rules compare identities by id instead of by string.

use crate::symbol::SymbolId;

/// Known built-in functions with cached `SymbolId`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BuiltinFn {
    Sin = 0,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sqrt,
}

impl BuiltinFn {
    /// Total number of builtin functions.
    pub const COUNT: usize = 8;

    /// All builtins, in id-cache order.
    pub const ALL: [BuiltinFn; Self::COUNT] = [
        BuiltinFn::Sin,
        BuiltinFn::Cos,
        BuiltinFn::Tan,
        BuiltinFn::Asin,
        BuiltinFn::Acos,
        BuiltinFn::Atan,
        BuiltinFn::Atan2,
        BuiltinFn::Sqrt,
    ];

    /// Canonical name as it appears in the symbol table.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinFn::Sin => "sin",
            BuiltinFn::Cos => "cos",
            BuiltinFn::Tan => "tan",
            BuiltinFn::Asin => "asin",
            BuiltinFn::Acos => "acos",
            BuiltinFn::Atan => "atan",
            BuiltinFn::Atan2 => "atan2",
            BuiltinFn::Sqrt => "sqrt",
        }
    }

    /// Number of arguments the function takes.
    pub fn arity(self) -> usize {
        match self {
            BuiltinFn::Atan2 => 2,
            _ => 1,
        }
    }
}

/// Cache of the `SymbolId` for every builtin, filled at `Context` creation.
#[derive(Debug, Clone)]
pub struct BuiltinIds {
    ids: [SymbolId; BuiltinFn::COUNT],
}

impl BuiltinIds {
    pub fn new(intern: impl FnMut(&str) -> SymbolId) -> Self {
        let mut intern = intern;
        let mut ids = [0; BuiltinFn::COUNT];
        for f in BuiltinFn::ALL {
            ids[f as usize] = intern(f.name());
        }
        Self { ids }
    }

    #[inline]
    pub fn get(&self, f: BuiltinFn) -> SymbolId {
        self.ids[f as usize]
    }

    /// Reverse lookup: which builtin a function symbol denotes, if any.
    pub fn classify(&self, sym: SymbolId) -> Option<BuiltinFn> {
        BuiltinFn::ALL.into_iter().find(|f| self.ids[*f as usize] == sym)
    }
}
