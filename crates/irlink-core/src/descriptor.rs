//! Source descriptors for symbols.

use std::fmt;

use crate::SymbolKind;

/// What the IR builder knows about a referenced declaration.
///
/// The closure driver only prints descriptors in diagnostics. Stub generators and
/// deserializers read `references` to learn which further symbols a declaration
/// built from this descriptor will mention (e.g. parameter and return types).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Descriptor {
    /// Fully qualified name, `.`-separated (e.g. `kotlin.collections.List`).
    pub fq_name: String,

    /// Signature text distinguishing overloads, e.g. `(kotlin.Int)`.
    pub signature: Option<String>,

    /// Symbols a declaration for this descriptor refers to.
    pub references: Vec<SymbolRef>,
}

/// A reference from one descriptor to another symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    pub kind: SymbolKind,
    pub descriptor: Descriptor,
}

impl Descriptor {
    /// Create a descriptor with no signature and no references.
    pub fn new(fq_name: impl Into<String>) -> Self {
        Self {
            fq_name: fq_name.into(),
            ..Default::default()
        }
    }

    /// Set the signature.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Add a referenced symbol.
    pub fn with_reference(mut self, kind: SymbolKind, descriptor: Descriptor) -> Self {
        self.references.push(SymbolRef { kind, descriptor });
        self
    }

    /// The package part of the name: everything before the last `.`.
    ///
    /// Returns `""` for names in the root package.
    pub fn package(&self) -> &str {
        match self.fq_name.rfind('.') {
            Some(pos) => &self.fq_name[..pos],
            None => "",
        }
    }

    /// The simple name: everything after the last `.`.
    pub fn short_name(&self) -> &str {
        match self.fq_name.rfind('.') {
            Some(pos) => &self.fq_name[pos + 1..],
            None => &self.fq_name,
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fq_name)?;
        if let Some(signature) = &self.signature {
            f.write_str(signature)?;
        }
        Ok(())
    }
}
