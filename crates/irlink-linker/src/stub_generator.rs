//! Stub generation for external declarations.
//!
//! A stub is the smallest declaration that can stand in for something that is
//! referenced from the IR tree but not defined in it. Generating one binds the
//! symbol, and may reference further symbols the stub mentions (parameter types,
//! supertypes, ...), which then show up as new unbound symbols.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::trace;

use irlink_core::{
    DeclarationId, DeclarationOrigin, Descriptor, ResolveError, SymbolHash, SymbolTable,
    SymbolTableError,
};

/// Synthesizes external declarations for unbound symbols.
pub trait StubGenerator {
    /// Create and bind a stub for `symbol`.
    ///
    /// Must be a no-op for an already-bound symbol. Returns `None` if the generator
    /// declined to bind the symbol.
    fn generate_stub(
        &mut self,
        table: &mut SymbolTable,
        symbol: SymbolHash,
    ) -> Result<Option<DeclarationId>, ResolveError>;

    /// Toggled by the closure driver before each resolution pass.
    fn set_unbound_symbol_generation(&mut self, _enabled: bool) {}
}

impl<T: StubGenerator + ?Sized> StubGenerator for &mut T {
    fn generate_stub(
        &mut self,
        table: &mut SymbolTable,
        symbol: SymbolHash,
    ) -> Result<Option<DeclarationId>, ResolveError> {
        (**self).generate_stub(table, symbol)
    }

    fn set_unbound_symbol_generation(&mut self, enabled: bool) {
        (**self).set_unbound_symbol_generation(enabled)
    }
}

/// Chooses the origin recorded on generated stubs.
pub type ExternalOriginFn = Box<dyn Fn(&Descriptor) -> DeclarationOrigin>;

/// External stubs belonging to one package.
#[derive(Debug, Clone, Default)]
pub struct ExternalPackageFragment {
    pub package: String,
    pub declarations: Vec<DeclarationId>,
}

/// All generated stubs, grouped by package in first-seen order.
#[derive(Debug, Default)]
pub struct ExternalDeclarations {
    fragments: IndexMap<String, ExternalPackageFragment, FxBuildHasher>,
    len: usize,
}

impl ExternalDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, package: &str, declaration: DeclarationId) {
        self.fragments
            .entry(package.to_string())
            .or_insert_with(|| ExternalPackageFragment {
                package: package.to_string(),
                declarations: Vec::new(),
            })
            .declarations
            .push(declaration);
        self.len += 1;
    }

    /// The fragment for a package, if any stub was generated in it.
    pub fn fragment(&self, package: &str) -> Option<&ExternalPackageFragment> {
        self.fragments.get(package)
    }

    pub fn fragments(&self) -> impl Iterator<Item = &ExternalPackageFragment> {
        self.fragments.values()
    }

    /// Total number of stubs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Default stub generator.
///
/// Binds every symbol it is asked about, records the stub in
/// [`ExternalDeclarations`], and references everything the symbol's descriptor
/// refers to.
#[derive(Default)]
pub struct DeclarationStubGenerator {
    external: ExternalDeclarations,
    external_declaration_origin: Option<ExternalOriginFn>,
    unbound_symbol_generation: bool,
    stubs_for_unbound: usize,
}

impl DeclarationStubGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `origin` instead of [`DeclarationOrigin::ExternalStub`] for new stubs.
    pub fn with_external_declaration_origin(
        mut self,
        origin: impl Fn(&Descriptor) -> DeclarationOrigin + 'static,
    ) -> Self {
        self.external_declaration_origin = Some(Box::new(origin));
        self
    }

    pub fn external_declarations(&self) -> &ExternalDeclarations {
        &self.external
    }

    pub fn into_external_declarations(self) -> ExternalDeclarations {
        self.external
    }

    pub fn unbound_symbol_generation(&self) -> bool {
        self.unbound_symbol_generation
    }

    /// Stubs generated while unbound-symbol generation was enabled.
    pub fn stubs_generated_for_unbound(&self) -> usize {
        self.stubs_for_unbound
    }
}

impl StubGenerator for DeclarationStubGenerator {
    fn generate_stub(
        &mut self,
        table: &mut SymbolTable,
        symbol: SymbolHash,
    ) -> Result<Option<DeclarationId>, ResolveError> {
        if let Some(owner) = table.owner(symbol) {
            return Ok(Some(owner));
        }

        let descriptor = table
            .descriptor(symbol)
            .cloned()
            .ok_or(SymbolTableError::UnknownSymbol { symbol })?;

        let origin = match &self.external_declaration_origin {
            Some(origin) => origin(&descriptor),
            None => DeclarationOrigin::ExternalStub,
        };

        let id = table.bind(symbol, origin)?;
        for reference in &descriptor.references {
            table.reference(reference.kind, reference.descriptor.clone());
        }

        self.external.add(descriptor.package(), id);
        if self.unbound_symbol_generation {
            self.stubs_for_unbound += 1;
        }

        trace!(
            %descriptor,
            references = descriptor.references.len(),
            "generated external stub"
        );
        Ok(Some(id))
    }

    fn set_unbound_symbol_generation(&mut self, enabled: bool) {
        self.unbound_symbol_generation = enabled;
    }
}
