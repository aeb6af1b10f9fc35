//! Declarations that symbols get bound to.

use std::fmt;

use crate::{Descriptor, SymbolHash, SymbolKind, SymbolTableError};

/// Index of a declaration in the [`SymbolTable`](crate::SymbolTable) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationId(pub u32);

impl DeclarationId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for DeclarationId {
    type Error = SymbolTableError;

    /// The id of the declaration at arena position `index`.
    fn try_from(index: usize) -> Result<Self, Self::Error> {
        u32::try_from(index)
            .map(DeclarationId)
            .map_err(|_| SymbolTableError::DeclarationLimit { count: index })
    }
}

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decl#{}", self.0)
    }
}

/// Where a declaration came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclarationOrigin {
    /// Built from source as part of the current IR tree.
    Defined,
    /// Synthesized stub standing in for an external declaration.
    ExternalStub,
    /// Loaded from a previously compiled module.
    Deserialized { module: String },
    /// Platform contract satisfied outside this table at link time.
    ForwardDeclaration,
    /// Caller-defined origin for stubs.
    Custom(&'static str),
}

impl DeclarationOrigin {
    /// Whether this declaration was created by closing external dependencies.
    pub fn is_external(&self) -> bool {
        !matches!(self, DeclarationOrigin::Defined)
    }
}

impl fmt::Display for DeclarationOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationOrigin::Defined => f.write_str("DEFINED"),
            DeclarationOrigin::ExternalStub => f.write_str("IR_EXTERNAL_DECLARATION_STUB"),
            DeclarationOrigin::Deserialized { module } => write!(f, "DESERIALIZED({module})"),
            DeclarationOrigin::ForwardDeclaration => f.write_str("FORWARD_DECLARATION"),
            DeclarationOrigin::Custom(name) => f.write_str(name),
        }
    }
}

/// A declaration a symbol is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub id: DeclarationId,
    pub symbol: SymbolHash,
    pub kind: SymbolKind,
    pub descriptor: Descriptor,
    pub origin: DeclarationOrigin,
}

impl Declaration {
    /// Whether this is a forward declaration.
    pub fn is_forward_declaration(&self) -> bool {
        self.origin == DeclarationOrigin::ForwardDeclaration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_arena_position() {
        assert_eq!(DeclarationId::try_from(7usize), Ok(DeclarationId(7)));
        assert_eq!(DeclarationId::try_from(7usize).map(DeclarationId::index), Ok(7));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn id_past_u32_range_is_rejected() {
        let count = u32::MAX as usize + 1;
        assert_eq!(
            DeclarationId::try_from(count),
            Err(SymbolTableError::DeclarationLimit { count })
        );
    }

    #[test]
    fn only_defined_declarations_are_internal() {
        assert!(!DeclarationOrigin::Defined.is_external());
        assert!(DeclarationOrigin::ExternalStub.is_external());
        assert!(DeclarationOrigin::ForwardDeclaration.is_external());
        assert!(DeclarationOrigin::Custom("UNIT_STUB").is_external());
    }
}
