//! irlink core types.
//!
//! - [`SymbolKind`]: declaration categories
//! - [`SymbolHash`]: deterministic symbol identity
//! - [`Descriptor`]: what the IR builder knows about a referenced declaration
//! - [`Declaration`]: what a symbol is bound to
//! - [`SymbolTable`]: per-category unbound sets and the declaration arena
//! - [`error`]: error types shared by the linker crate

mod declaration;
mod descriptor;
pub mod error;
mod symbol_hash;
mod symbol_kind;
mod symbol_table;

pub use declaration::{Declaration, DeclarationId, DeclarationOrigin};
pub use descriptor::{Descriptor, SymbolRef};
pub use error::{
    ClosureError, ResolveError, SymbolTableError, UnboundCategory, UnboundSymbolsError,
};
pub use symbol_hash::{SymbolHash, hash_constants};
pub use symbol_kind::SymbolKind;
pub use symbol_table::{SymbolTable, UnboundSet};
