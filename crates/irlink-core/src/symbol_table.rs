//! SymbolTable - per-category bookkeeping of referenced and bound symbols.
//!
//! The IR builder references declarations through [`SymbolTable::reference`]. A
//! referenced symbol stays in its category's unbound set until something binds
//! it to a [`Declaration`]: the IR builder itself (for declarations defined in the
//! current tree), a stub generator, or a deserializer.
//!
//! # Invariants
//!
//! - An unbound symbol is in exactly one category's unbound set; a bound symbol is
//!   in none.
//! - Binding is permanent. There is no way to unbind a symbol, and binding an
//!   already-bound symbol returns the existing declaration.
//!
//! # Thread Safety
//!
//! `SymbolTable` is owned by one compilation unit and mutated through `&mut`
//! only. The closure driver holds it exclusively for its whole run.
//!
//! # Example
//!
//! ```
//! use irlink_core::{DeclarationOrigin, Descriptor, SymbolKind, SymbolTable};
//!
//! let mut table = SymbolTable::new();
//! let string = table.reference(SymbolKind::Class, Descriptor::new("kotlin.String"));
//! assert!(!table.is_bound(string));
//! assert_eq!(table.unbound(SymbolKind::Class).len(), 1);
//!
//! table.bind(string, DeclarationOrigin::ExternalStub).unwrap();
//! assert!(table.is_bound(string));
//! assert!(table.is_closed());
//! ```

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::{
    Declaration, DeclarationId, DeclarationOrigin, Descriptor, SymbolHash, SymbolKind,
    SymbolTableError,
};

/// Unbound symbols of one category, in deterministic order.
pub type UnboundSet = IndexSet<SymbolHash, FxBuildHasher>;

/// Per-symbol state.
#[derive(Debug, Clone)]
struct SymbolEntry {
    kind: SymbolKind,
    descriptor: Descriptor,
    owner: Option<DeclarationId>,
}

/// Symbol table for one compilation unit.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// All symbols ever referenced, by identity.
    symbols: FxHashMap<SymbolHash, SymbolEntry>,

    /// Unbound symbols, indexed by `SymbolKind::index()`.
    unbound: [UnboundSet; SymbolKind::COUNT],

    /// Declaration arena, indexed by `DeclarationId`.
    declarations: Vec<Declaration>,
}

impl SymbolTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Referencing
    // ==========================================================================

    /// Reference a declaration, returning its symbol.
    ///
    /// A new symbol starts unbound. Referencing an already known symbol returns it
    /// unchanged, whatever its binding state.
    pub fn reference(&mut self, kind: SymbolKind, descriptor: Descriptor) -> SymbolHash {
        let symbol = SymbolHash::from_descriptor(kind, &descriptor);
        if !self.symbols.contains_key(&symbol) {
            self.symbols.insert(
                symbol,
                SymbolEntry {
                    kind,
                    descriptor,
                    owner: None,
                },
            );
            self.unbound[kind.index()].insert(symbol);
        }
        symbol
    }

    /// Reference and immediately bind a declaration defined in the current tree.
    pub fn declare_defined(
        &mut self,
        kind: SymbolKind,
        descriptor: Descriptor,
    ) -> Result<DeclarationId, SymbolTableError> {
        let symbol = self.reference(kind, descriptor);
        self.bind(symbol, DeclarationOrigin::Defined)
    }

    // ==========================================================================
    // Binding
    // ==========================================================================

    /// Bind a symbol to a new declaration with the given origin.
    ///
    /// If the symbol is already bound this is a no-op returning the existing
    /// declaration; `origin` is ignored in that case.
    pub fn bind(
        &mut self,
        symbol: SymbolHash,
        origin: DeclarationOrigin,
    ) -> Result<DeclarationId, SymbolTableError> {
        let entry = self
            .symbols
            .get_mut(&symbol)
            .ok_or(SymbolTableError::UnknownSymbol { symbol })?;

        if let Some(owner) = entry.owner {
            return Ok(owner);
        }

        let id = DeclarationId::try_from(self.declarations.len())?;
        entry.owner = Some(id);
        self.declarations.push(Declaration {
            id,
            symbol,
            kind: entry.kind,
            descriptor: entry.descriptor.clone(),
            origin,
        });
        // swap_remove keeps removal O(1); order stays deterministic
        self.unbound[entry.kind.index()].swap_remove(&symbol);

        Ok(id)
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// Whether the symbol is bound. Unknown symbols are reported as unbound.
    pub fn is_bound(&self, symbol: SymbolHash) -> bool {
        self.owner(symbol).is_some()
    }

    /// The declaration a symbol is bound to.
    pub fn owner(&self, symbol: SymbolHash) -> Option<DeclarationId> {
        self.symbols.get(&symbol).and_then(|e| e.owner)
    }

    pub fn kind(&self, symbol: SymbolHash) -> Option<SymbolKind> {
        self.symbols.get(&symbol).map(|e| e.kind)
    }

    pub fn descriptor(&self, symbol: SymbolHash) -> Option<&Descriptor> {
        self.symbols.get(&symbol).map(|e| &e.descriptor)
    }

    /// Get a declaration by id.
    pub fn declaration(&self, id: DeclarationId) -> Option<&Declaration> {
        self.declarations.get(id.index())
    }

    /// Get the declaration a symbol is bound to.
    pub fn declaration_of(&self, symbol: SymbolHash) -> Option<&Declaration> {
        self.owner(symbol).and_then(|id| self.declaration(id))
    }

    /// All declarations in creation order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// The live unbound set of one category.
    pub fn unbound(&self, kind: SymbolKind) -> &UnboundSet {
        &self.unbound[kind.index()]
    }

    /// An owned copy of one category's unbound set, safe to iterate while binding.
    pub fn unbound_snapshot(&self, kind: SymbolKind) -> Vec<SymbolHash> {
        self.unbound[kind.index()].iter().copied().collect()
    }

    /// Total number of unbound symbols across all categories.
    pub fn unbound_count(&self) -> usize {
        self.unbound.iter().map(|s| s.len()).sum()
    }

    /// Whether every referenced symbol is bound.
    pub fn is_closed(&self) -> bool {
        self.unbound.iter().all(|s| s.is_empty())
    }

    /// Number of symbols ever referenced.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_is_deduplicated() {
        let mut table = SymbolTable::new();
        let a = table.reference(SymbolKind::Class, Descriptor::new("a.A"));
        let b = table.reference(SymbolKind::Class, Descriptor::new("a.A"));
        assert_eq!(a, b);
        assert_eq!(table.symbol_count(), 1);
        assert_eq!(table.unbound(SymbolKind::Class).len(), 1);
    }

    #[test]
    fn unbound_symbol_is_in_its_own_category_only() {
        let mut table = SymbolTable::new();
        let f = table.reference(SymbolKind::Field, Descriptor::new("a.A.x"));
        for kind in SymbolKind::ALL {
            assert_eq!(table.unbound(kind).contains(&f), kind == SymbolKind::Field);
        }
    }

    #[test]
    fn bind_removes_from_unbound_set() {
        let mut table = SymbolTable::new();
        let f = table.reference(SymbolKind::SimpleFunction, Descriptor::new("a.f"));
        let id = table.bind(f, DeclarationOrigin::ExternalStub).unwrap();

        assert!(table.is_bound(f));
        assert!(table.unbound(SymbolKind::SimpleFunction).is_empty());
        let decl = table.declaration(id).unwrap();
        assert_eq!(decl.symbol, f);
        assert_eq!(decl.kind, SymbolKind::SimpleFunction);
        assert_eq!(decl.origin, DeclarationOrigin::ExternalStub);
    }

    #[test]
    fn rebinding_is_a_noop() {
        let mut table = SymbolTable::new();
        let p = table.reference(SymbolKind::Property, Descriptor::new("a.p"));
        let first = table.bind(p, DeclarationOrigin::ExternalStub).unwrap();
        let second = table.bind(p, DeclarationOrigin::ForwardDeclaration).unwrap();

        assert_eq!(first, second);
        assert_eq!(table.declaration_count(), 1);
        assert_eq!(
            table.declaration_of(p).map(|d| &d.origin),
            Some(&DeclarationOrigin::ExternalStub)
        );
    }

    #[test]
    fn re_referencing_bound_symbol_keeps_it_bound() {
        let mut table = SymbolTable::new();
        let id = table
            .declare_defined(SymbolKind::Class, Descriptor::new("a.A"))
            .unwrap();
        let a = table.reference(SymbolKind::Class, Descriptor::new("a.A"));

        assert_eq!(table.owner(a), Some(id));
        assert!(table.is_closed());
    }

    #[test]
    fn bind_unknown_symbol_fails() {
        let mut table = SymbolTable::new();
        let err = table
            .bind(SymbolHash(7), DeclarationOrigin::ExternalStub)
            .unwrap_err();
        assert_eq!(
            err,
            SymbolTableError::UnknownSymbol {
                symbol: SymbolHash(7)
            }
        );
        assert!(!table.is_bound(SymbolHash(7)));
    }

    #[test]
    fn declarations_are_listed_in_creation_order() {
        let mut table = SymbolTable::new();
        table
            .declare_defined(SymbolKind::SimpleFunction, Descriptor::new("app.main"))
            .unwrap();
        let c = table.reference(SymbolKind::Class, Descriptor::new("lib.C"));
        table.bind(c, DeclarationOrigin::ExternalStub).unwrap();

        let listed: Vec<_> = table
            .declarations()
            .map(|d| (d.id.index(), d.origin.is_external()))
            .collect();
        assert_eq!(listed, vec![(0, false), (1, true)]);
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let mut table = SymbolTable::new();
        let a = table.reference(SymbolKind::Class, Descriptor::new("a.A"));
        let snapshot = table.unbound_snapshot(SymbolKind::Class);

        table.bind(a, DeclarationOrigin::ExternalStub).unwrap();
        table.reference(SymbolKind::Class, Descriptor::new("a.B"));

        assert_eq!(snapshot, vec![a]);
        assert_eq!(table.unbound(SymbolKind::Class).len(), 1);
        assert_eq!(table.unbound_count(), 1);
        assert!(!table.is_closed());
    }
}
