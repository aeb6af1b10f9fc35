//! irlink
//!
//! Binds the unbound symbols of an incrementally built IR: every reference to a
//! declaration outside the current tree is resolved from precompiled artifacts or
//! replaced by a generated stub, until the symbol table is closed.
//!
//! - [`irlink_core`]: symbols, descriptors, declarations, the symbol table
//! - [`irlink_linker`]: stub generation, deserialization, the closure driver
//! - [`LinkUnit`]: one compilation unit, linked in a single call

mod unit;

pub use irlink_core::{
    ClosureError, Declaration, DeclarationId, DeclarationOrigin, Descriptor, ResolveError,
    SymbolHash, SymbolKind, SymbolRef, SymbolTable, SymbolTableError, UnboundCategory,
    UnboundSymbolsError,
};
pub use irlink_linker::{
    ArtifactDeserializer, ClosureOptions, ClosureOutput, CompiledArtifactIndex,
    CompiledDeclaration, DeclarationStubGenerator, EmptyDeserializer, ExternalDeclarations,
    ExternalDependenciesGenerator, ExternalPackageFragment, IrDeserializer, StubFallback,
    StubGenerator,
};
pub use unit::{LinkOutput, LinkUnit};

pub mod prelude {
    pub use crate::{
        ClosureError, Descriptor, ExternalDependenciesGenerator, IrDeserializer, LinkUnit,
        StubGenerator, SymbolKind, SymbolTable,
    };
}
