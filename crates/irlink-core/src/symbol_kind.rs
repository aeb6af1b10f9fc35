//! Declaration categories tracked by the symbol table.

use std::fmt;

/// The category a symbol belongs to.
///
/// Each category has its own unbound set in [`SymbolTable`](crate::SymbolTable).
/// [`SymbolKind::ALL`] fixes the order in which the closure driver snapshots and
/// verifies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    Class,
    Constructor,
    EnumEntry,
    Field,
    SimpleFunction,
    Property,
    TypeParameter,
}

impl SymbolKind {
    /// Number of categories.
    pub const COUNT: usize = 7;

    /// All categories in snapshot/verification order.
    pub const ALL: [SymbolKind; Self::COUNT] = [
        SymbolKind::Class,
        SymbolKind::Constructor,
        SymbolKind::EnumEntry,
        SymbolKind::Field,
        SymbolKind::SimpleFunction,
        SymbolKind::Property,
        SymbolKind::TypeParameter,
    ];

    /// Dense index used for per-category storage.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Singular human-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Constructor => "constructor",
            SymbolKind::EnumEntry => "enum entry",
            SymbolKind::Field => "field",
            SymbolKind::SimpleFunction => "simple function",
            SymbolKind::Property => "property",
            SymbolKind::TypeParameter => "type parameter",
        }
    }

    /// Plural name used in unbound-symbol diagnostics.
    pub fn plural_name(self) -> &'static str {
        match self {
            SymbolKind::Class => "classes",
            SymbolKind::Constructor => "constructors",
            SymbolKind::EnumEntry => "enum entries",
            SymbolKind::Field => "fields",
            SymbolKind::SimpleFunction => "simple functions",
            SymbolKind::Property => "properties",
            SymbolKind::TypeParameter => "type parameters",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, kind) in SymbolKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn plural_names() {
        assert_eq!(SymbolKind::Property.plural_name(), "properties");
        assert_eq!(SymbolKind::EnumEntry.plural_name(), "enum entries");
        assert_eq!(SymbolKind::SimpleFunction.to_string(), "simple function");
    }
}
