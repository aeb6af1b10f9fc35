//! Link unit API.
//!
//! A [`LinkUnit`] owns the symbol table of one compilation unit. The IR builder
//! references and defines symbols through [`LinkUnit::table_mut`]; [`LinkUnit::link`]
//! then binds everything that is still unbound.
//!
//! # Example
//!
//! ```
//! use irlink::{Descriptor, LinkUnit, SymbolKind};
//!
//! let mut unit = LinkUnit::new();
//! unit.table_mut()
//!     .declare_defined(SymbolKind::SimpleFunction, Descriptor::new("app.main"))
//!     .unwrap();
//! unit.table_mut().reference(SymbolKind::Class, Descriptor::new("kotlin.String"));
//!
//! let output = unit.link().unwrap();
//! assert_eq!(output.external.len(), 1);
//! assert!(unit.table().is_closed());
//! ```

use tracing::info;

use irlink_core::{ClosureError, DeclarationOrigin, Descriptor, SymbolTable};
use irlink_linker::{
    ArtifactDeserializer, ClosureOptions, ClosureOutput, CompiledArtifactIndex,
    DeclarationStubGenerator, ExternalDeclarations, ExternalDependenciesGenerator,
};

/// Result of linking a unit.
#[derive(Debug)]
pub struct LinkOutput {
    pub closure: ClosureOutput,
    /// Stubs generated for this unit, grouped by package.
    pub external: ExternalDeclarations,
}

/// One compilation unit's symbol table plus the sources used to close it.
#[derive(Default)]
pub struct LinkUnit {
    table: SymbolTable,
    artifacts: Option<ArtifactDeserializer>,
    external_origin: Option<fn(&Descriptor) -> DeclarationOrigin>,
    options: ClosureOptions,
}

impl LinkUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve from precompiled dependencies before generating stubs.
    ///
    /// The index stays with the unit, so every call to [`link`](Self::link)
    /// consults it.
    pub fn with_artifacts(mut self, artifacts: CompiledArtifactIndex) -> Self {
        self.artifacts = Some(ArtifactDeserializer::new(artifacts));
        self
    }

    /// Origin recorded on generated stubs.
    pub fn with_external_origin(mut self, origin: fn(&Descriptor) -> DeclarationOrigin) -> Self {
        self.external_origin = Some(origin);
        self
    }

    pub fn with_options(mut self, options: ClosureOptions) -> Self {
        self.options = options;
        self
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut SymbolTable {
        &mut self.table
    }

    /// The artifact-backed strategy, if the unit has one.
    pub fn artifacts(&self) -> Option<&ArtifactDeserializer> {
        self.artifacts.as_ref()
    }

    /// Bind every unbound symbol of this unit.
    ///
    /// Can be called again after more symbols were referenced; only the new
    /// unbound symbols are resolved.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn link(&mut self) -> Result<LinkOutput, ClosureError> {
        let mut stubs = DeclarationStubGenerator::new();
        if let Some(origin) = self.external_origin {
            stubs = stubs.with_external_declaration_origin(origin);
        }

        let generator = ExternalDependenciesGenerator::new(&mut self.table, &mut stubs)
            .with_options(self.options.clone());
        let closure = match &mut self.artifacts {
            Some(artifacts) => generator
                .with_deserializer(artifacts)
                .generate_unbound_symbols_as_dependencies()?,
            None => generator.generate_unbound_symbols_as_dependencies()?,
        };

        let external = stubs.into_external_declarations();
        info!(
            symbols = self.table.symbol_count(),
            external_declarations = self
                .table
                .declarations()
                .filter(|d| d.origin.is_external())
                .count(),
            stubs = external.len(),
            passes = closure.passes,
            "linked unit"
        );
        Ok(LinkOutput { closure, external })
    }
}
