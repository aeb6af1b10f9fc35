//! irlink Linker
//!
//! Closes a [`SymbolTable`](irlink_core::SymbolTable) over symbols that refer to
//! declarations outside the current IR tree.
//!
//! ## Modules
//!
//! - [`stub_generator`]: [`StubGenerator`] and the default [`DeclarationStubGenerator`]
//! - [`deserializer`]: [`IrDeserializer`] strategies ([`EmptyDeserializer`],
//!   [`ArtifactDeserializer`])
//! - [`external_dependencies`]: the [`ExternalDependenciesGenerator`] fixpoint driver
//! - [`options`]: [`ClosureOptions`]

pub mod deserializer;
pub mod external_dependencies;
pub mod options;
pub mod stub_generator;

pub use deserializer::{
    ArtifactDeserializer, CompiledArtifactIndex, CompiledDeclaration, EmptyDeserializer,
    IrDeserializer, StubFallback,
};
pub use external_dependencies::{ClosureOutput, ExternalDependenciesGenerator};
pub use options::ClosureOptions;
pub use stub_generator::{
    DeclarationStubGenerator, ExternalDeclarations, ExternalOriginFn, ExternalPackageFragment,
    StubGenerator,
};

// Re-export the error types callers match on
pub use irlink_core::{ClosureError, ResolveError, UnboundSymbolsError};
