//! Error types for symbol binding and dependency closure.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ClosureError (returned by the closure driver)
//! ├── ResolveError        - stub generation / deserialization failed (propagated as-is)
//! │   └── SymbolTableError  - unknown symbol or full declaration arena
//! └── UnboundSymbolsError - symbols left unbound after the fixpoint (fatal)
//! ```
//!
//! `UnboundSymbolsError` marks a misconfigured pipeline (a missing dependency
//! module or a stub generator bug). Callers must not retry on it.

use std::fmt;

use thiserror::Error;

use crate::{SymbolHash, SymbolKind};

// ============================================================================
// Symbol Table Errors
// ============================================================================

/// Errors raised by [`SymbolTable`](crate::SymbolTable) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolTableError {
    /// The symbol was never referenced in this table.
    #[error("unknown symbol {symbol}")]
    UnknownSymbol { symbol: SymbolHash },

    /// The declaration arena cannot hold another declaration.
    #[error("declaration limit reached at {count} declarations")]
    DeclarationLimit { count: usize },
}

// ============================================================================
// Resolution Errors
// ============================================================================

/// Failures raised by stub generators and deserializers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Table(#[from] SymbolTableError),

    /// A compiled declaration was found under the symbol's identity but has a
    /// different category.
    #[error("symbol {symbol}: expected {expected} declaration, artifact has {found}")]
    KindMismatch {
        symbol: SymbolHash,
        expected: SymbolKind,
        found: SymbolKind,
    },

    /// Persisted compiler output could not be interpreted.
    #[error("malformed artifact '{module}': {message}")]
    MalformedArtifact { module: String, message: String },

    #[error("{message}")]
    Other { message: String },
}

// ============================================================================
// Closure Errors
// ============================================================================

/// One category that still has unbound symbols after the fixpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundCategory {
    pub kind: SymbolKind,
    /// Total number of unbound symbols in this category.
    pub count: usize,
    /// Descriptor text of the first few offenders.
    pub sample: Vec<String>,
}

impl fmt::Display for UnboundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} unbound:", self.kind.plural_name(), self.count)?;
        for descriptor in &self.sample {
            write!(f, "\n{descriptor}")?;
        }
        Ok(())
    }
}

/// The symbol table was not closed after all resolution attempts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct UnboundSymbolsError {
    /// Non-empty categories in verification order.
    pub categories: Vec<UnboundCategory>,
}

impl UnboundSymbolsError {
    /// Total number of unbound symbols across all categories.
    pub fn total(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }

    /// The report for one category, if it had unbound symbols.
    pub fn category(&self, kind: SymbolKind) -> Option<&UnboundCategory> {
        self.categories.iter().find(|c| c.kind == kind)
    }
}

impl fmt::Display for UnboundSymbolsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, category) in self.categories.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{category}")?;
        }
        Ok(())
    }
}

/// Errors returned by the external dependency closure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClosureError {
    /// A collaborator failed; the closure was aborted.
    #[error("external dependency resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// Symbols remained unbound.
    #[error("{0}")]
    Unbound(#[from] UnboundSymbolsError),
}

impl ClosureError {
    pub fn is_unbound(&self) -> bool {
        matches!(self, ClosureError::Unbound(_))
    }

    /// The unbound-symbol report, if this is the fatal residual case.
    pub fn unbound(&self) -> Option<&UnboundSymbolsError> {
        match self {
            ClosureError::Unbound(e) => Some(e),
            ClosureError::Resolve(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_message_lists_categories() {
        let err = UnboundSymbolsError {
            categories: vec![
                UnboundCategory {
                    kind: SymbolKind::Class,
                    count: 2,
                    sample: vec!["a.A".into(), "a.B".into()],
                },
                UnboundCategory {
                    kind: SymbolKind::Property,
                    count: 1,
                    sample: vec!["a.p".into()],
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "classes: 2 unbound:\na.A\na.B\nproperties: 1 unbound:\na.p"
        );
        assert_eq!(err.total(), 3);
        assert_eq!(err.category(SymbolKind::Property).map(|c| c.count), Some(1));
        assert!(err.category(SymbolKind::Field).is_none());
    }

    #[test]
    fn closure_error_conversions() {
        let err: ClosureError = ResolveError::Other {
            message: "boom".into(),
        }
        .into();
        assert!(!err.is_unbound());
        assert!(err.unbound().is_none());
        assert_eq!(err.to_string(), "external dependency resolution failed: boom");

        let err: ClosureError = UnboundSymbolsError { categories: vec![] }.into();
        assert!(err.is_unbound());
    }

    #[test]
    fn table_error_is_transparent() {
        let err: ResolveError = SymbolTableError::UnknownSymbol {
            symbol: SymbolHash(1),
        }
        .into();
        assert_eq!(err.to_string(), "unknown symbol 0x0000000000000001");
    }
}
