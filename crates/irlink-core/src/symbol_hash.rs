//! Deterministic symbol identity.
//!
//! A [`SymbolHash`] is computed from a symbol's category, fully qualified name and
//! (optional) signature. The same reference always produces the same hash, so the
//! IR builder can reference an external declaration many times and the symbol
//! table keeps exactly one symbol for it.
//!
//! # Examples
//!
//! ```
//! use irlink_core::{SymbolHash, SymbolKind};
//!
//! let a = SymbolHash::from_parts(SymbolKind::Class, "kotlin.String", None);
//! let b = SymbolHash::from_parts(SymbolKind::Class, "kotlin.String", None);
//! assert_eq!(a, b);
//!
//! // Same name, different category
//! let c = SymbolHash::from_parts(SymbolKind::Constructor, "kotlin.String", None);
//! assert_ne!(a, c);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

use crate::{Descriptor, SymbolKind};

/// Mixing constants for hash computation.
pub mod hash_constants {
    /// Separator mixed in before the signature.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Seed for hashing the signature text.
    pub const SIGNATURE: u64 = 0x1a095090689d4647;

    /// Domain markers, one per [`SymbolKind`](crate::SymbolKind) in index order.
    pub const KIND_MARKERS: [u64; 7] = [
        0x2fac10b63a6cc57c,
        0x9a7f3d5e2b8c4601,
        0x3e9f5d2a8c7b1403,
        0x7d3c8b4a92e15f6d,
        0x5ea77ffbcdf5f302,
        0xc6a4a7935bd1e995,
        0x94d049bb133111eb,
    ];
}

/// A deterministic 64-bit identity for a symbol.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolHash(pub u64);

impl SymbolHash {
    /// Hash a symbol reference from its parts.
    #[inline]
    pub fn from_parts(kind: SymbolKind, fq_name: &str, signature: Option<&str>) -> Self {
        let mut hash = hash_constants::KIND_MARKERS[kind.index()] ^ xxh64(fq_name.as_bytes(), 0);
        if let Some(signature) = signature {
            // order-sensitive mix, name and signature are not interchangeable
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(xxh64(signature.as_bytes(), hash_constants::SIGNATURE));
        }
        SymbolHash(hash)
    }

    /// Hash a symbol reference from its descriptor.
    ///
    /// Only the name and signature participate; `references` do not.
    #[inline]
    pub fn from_descriptor(kind: SymbolKind, descriptor: &Descriptor) -> Self {
        Self::from_parts(kind, &descriptor.fq_name, descriptor.signature.as_deref())
    }
}

impl fmt::Debug for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolHash({:#018x})", self.0)
    }
}

impl fmt::Display for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_determinism() {
        let h1 = SymbolHash::from_parts(SymbolKind::SimpleFunction, "foo.bar", Some("(Int)"));
        let h2 = SymbolHash::from_parts(SymbolKind::SimpleFunction, "foo.bar", Some("(Int)"));
        assert_eq!(h1, h2);
    }

    #[test]
    fn signature_distinguishes_overloads() {
        let int = SymbolHash::from_parts(SymbolKind::SimpleFunction, "foo.bar", Some("(Int)"));
        let long = SymbolHash::from_parts(SymbolKind::SimpleFunction, "foo.bar", Some("(Long)"));
        let none = SymbolHash::from_parts(SymbolKind::SimpleFunction, "foo.bar", None);
        assert_ne!(int, long);
        assert_ne!(int, none);
    }

    #[test]
    fn kind_distinguishes_same_name() {
        let hashes: Vec<_> = SymbolKind::ALL
            .iter()
            .map(|&k| SymbolHash::from_parts(k, "a.B", None))
            .collect();
        for (i, a) in hashes.iter().enumerate() {
            for b in &hashes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn references_do_not_affect_identity() {
        let plain = Descriptor::new("a.f").with_signature("(B)");
        let with_refs = plain
            .clone()
            .with_reference(SymbolKind::Class, Descriptor::new("a.B"));
        assert_eq!(
            SymbolHash::from_descriptor(SymbolKind::SimpleFunction, &plain),
            SymbolHash::from_descriptor(SymbolKind::SimpleFunction, &with_refs)
        );
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", SymbolHash(0x2a)), "SymbolHash(0x000000000000002a)");
    }
}
