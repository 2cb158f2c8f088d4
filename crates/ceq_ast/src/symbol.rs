//! Symbol interning for unknown names.
//!
//! Every scalar unknown is registered once and referred to by `SymbolId`
//! afterwards. Identity is the id, never the printed name: interactive
//! layers that want to go from a display string back to a symbol query
//! the registry instead of re-parsing output.

use rustc_hash::FxHashMap;

/// Unique identifier for an interned symbol.
///
/// Using usize for direct Vec indexing without casts.
pub type SymbolId = usize;

/// Registry of interned symbol names.
///
/// `names` is the canonical storage (SymbolId = index); `lookup` is the
/// reverse map so interning the same name twice yields the same id.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    names: Vec<String>,
    lookup: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a name, returning its id. Re-interning is idempotent.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), id);
        id
    }

    /// Resolve an id back to its name.
    ///
    /// # Panics
    /// Panics if the id was not produced by this table.
    #[inline]
    pub fn resolve(&self, id: SymbolId) -> &str {
        &self.names[id]
    }

    /// Look up a name without interning it.
    #[inline]
    pub fn get_id(&self, name: &str) -> Option<SymbolId> {
        self.lookup.get(name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
