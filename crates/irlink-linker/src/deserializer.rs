//! Resolution strategies: where unbound symbols get their declarations from.
//!
//! - [`EmptyDeserializer`]: nothing precompiled is available, every symbol is stubbed
//! - [`ArtifactDeserializer`]: look the symbol up in a [`CompiledArtifactIndex`] first,
//!   stub it only if the index has nothing

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use tracing::{debug, trace};

use irlink_core::{
    DeclarationId, DeclarationOrigin, Descriptor, ResolveError, SymbolHash, SymbolKind,
    SymbolTable, SymbolTableError,
};

/// Fallback invoked when a strategy has no compiled declaration for a symbol.
pub type StubFallback<'a> =
    dyn FnMut(&mut SymbolTable, SymbolHash) -> Result<Option<DeclarationId>, ResolveError> + 'a;

/// Locates previously compiled declarations.
pub trait IrDeserializer {
    /// Resolve `symbol` from compiled state.
    ///
    /// If nothing compiled is available the implementation must call `fallback`
    /// before returning. Calling this for an already-bound symbol must not change
    /// its binding.
    fn find_declaration(
        &mut self,
        table: &mut SymbolTable,
        symbol: SymbolHash,
        fallback: &mut StubFallback<'_>,
    ) -> Result<Option<DeclarationId>, ResolveError>;

    /// Declare symbols that are satisfied outside this table at link time.
    ///
    /// Called once, after no resolution pass makes progress anymore.
    fn declare_forward_declarations(
        &mut self,
        table: &mut SymbolTable,
    ) -> Result<(), ResolveError>;
}

impl<T: IrDeserializer + ?Sized> IrDeserializer for &mut T {
    fn find_declaration(
        &mut self,
        table: &mut SymbolTable,
        symbol: SymbolHash,
        fallback: &mut StubFallback<'_>,
    ) -> Result<Option<DeclarationId>, ResolveError> {
        (**self).find_declaration(table, symbol, fallback)
    }

    fn declare_forward_declarations(
        &mut self,
        table: &mut SymbolTable,
    ) -> Result<(), ResolveError> {
        (**self).declare_forward_declarations(table)
    }
}

impl<T: IrDeserializer + ?Sized> IrDeserializer for Box<T> {
    fn find_declaration(
        &mut self,
        table: &mut SymbolTable,
        symbol: SymbolHash,
        fallback: &mut StubFallback<'_>,
    ) -> Result<Option<DeclarationId>, ResolveError> {
        (**self).find_declaration(table, symbol, fallback)
    }

    fn declare_forward_declarations(
        &mut self,
        table: &mut SymbolTable,
    ) -> Result<(), ResolveError> {
        (**self).declare_forward_declarations(table)
    }
}

/// Strategy used when there are no precompiled dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyDeserializer;

impl IrDeserializer for EmptyDeserializer {
    fn find_declaration(
        &mut self,
        table: &mut SymbolTable,
        symbol: SymbolHash,
        fallback: &mut StubFallback<'_>,
    ) -> Result<Option<DeclarationId>, ResolveError> {
        fallback(table, symbol)
    }

    fn declare_forward_declarations(
        &mut self,
        _table: &mut SymbolTable,
    ) -> Result<(), ResolveError> {
        Ok(())
    }
}

// ============================================================================
// Compiled artifacts
// ============================================================================

/// A declaration read from a previously compiled module.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDeclaration {
    /// Name of the module the declaration was compiled into.
    pub module: String,
    pub kind: SymbolKind,
    pub descriptor: Descriptor,
}

/// Lookup table over the declarations of all precompiled dependencies.
#[derive(Debug, Default)]
pub struct CompiledArtifactIndex {
    declarations: FxHashMap<SymbolHash, CompiledDeclaration>,
    forward_declarations: FxHashSet<SymbolHash>,
}

impl CompiledArtifactIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration compiled into `module`, keyed by its symbol identity.
    pub fn add_declaration(
        &mut self,
        module: impl Into<String>,
        kind: SymbolKind,
        descriptor: Descriptor,
    ) -> SymbolHash {
        let symbol = SymbolHash::from_descriptor(kind, &descriptor);
        self.declarations.insert(
            symbol,
            CompiledDeclaration {
                module: module.into(),
                kind,
                descriptor,
            },
        );
        symbol
    }

    /// Insert an entry under an explicit identity, as read from persisted output.
    pub fn insert(&mut self, symbol: SymbolHash, declaration: CompiledDeclaration) {
        self.declarations.insert(symbol, declaration);
    }

    /// Mark a declaration as a forward declaration (platform contract).
    pub fn add_forward_declaration(
        &mut self,
        kind: SymbolKind,
        descriptor: &Descriptor,
    ) -> SymbolHash {
        let symbol = SymbolHash::from_descriptor(kind, descriptor);
        self.forward_declarations.insert(symbol);
        symbol
    }

    pub fn get(&self, symbol: SymbolHash) -> Option<&CompiledDeclaration> {
        self.declarations.get(&symbol)
    }

    pub fn is_forward_declaration(&self, symbol: SymbolHash) -> bool {
        self.forward_declarations.contains(&symbol)
    }

    /// Number of compiled declarations (forward declarations excluded).
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.forward_declarations.is_empty()
    }
}

/// Strategy that prefers compiled declarations over stubs.
///
/// Symbols known to the index as forward declarations are not stubbed. They are
/// queued and bound with [`DeclarationOrigin::ForwardDeclaration`] by
/// [`declare_forward_declarations`](IrDeserializer::declare_forward_declarations).
#[derive(Debug, Default)]
pub struct ArtifactDeserializer {
    index: CompiledArtifactIndex,
    pending_forward: IndexSet<SymbolHash, FxBuildHasher>,
    deserialized: usize,
    forward_declared: usize,
}

impl ArtifactDeserializer {
    pub fn new(index: CompiledArtifactIndex) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Number of symbols bound from compiled declarations.
    pub fn deserialized_count(&self) -> usize {
        self.deserialized
    }

    /// Number of symbols bound as forward declarations.
    pub fn forward_declared_count(&self) -> usize {
        self.forward_declared
    }
}

impl IrDeserializer for ArtifactDeserializer {
    fn find_declaration(
        &mut self,
        table: &mut SymbolTable,
        symbol: SymbolHash,
        fallback: &mut StubFallback<'_>,
    ) -> Result<Option<DeclarationId>, ResolveError> {
        if let Some(owner) = table.owner(symbol) {
            return Ok(Some(owner));
        }
        let kind = table
            .kind(symbol)
            .ok_or(SymbolTableError::UnknownSymbol { symbol })?;

        if let Some(compiled) = self.index.get(symbol) {
            if compiled.kind != kind {
                return Err(ResolveError::KindMismatch {
                    symbol,
                    expected: kind,
                    found: compiled.kind,
                });
            }
            let id = table.bind(
                symbol,
                DeclarationOrigin::Deserialized {
                    module: compiled.module.clone(),
                },
            )?;
            for reference in &compiled.descriptor.references {
                table.reference(reference.kind, reference.descriptor.clone());
            }
            self.deserialized += 1;
            trace!(
                descriptor = %compiled.descriptor,
                module = %compiled.module,
                "deserialized declaration"
            );
            return Ok(Some(id));
        }

        if self.index.is_forward_declaration(symbol) {
            self.pending_forward.insert(symbol);
            return Ok(None);
        }

        fallback(table, symbol)
    }

    fn declare_forward_declarations(
        &mut self,
        table: &mut SymbolTable,
    ) -> Result<(), ResolveError> {
        for symbol in self.pending_forward.drain(..) {
            if table.is_bound(symbol) {
                continue;
            }
            table.bind(symbol, DeclarationOrigin::ForwardDeclaration)?;
            self.forward_declared += 1;
        }
        debug!(
            forward_declared = self.forward_declared,
            "declared forward declarations"
        );
        Ok(())
    }
}
