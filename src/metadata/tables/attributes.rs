//! Visibility flag constants for types, fields and methods.
//!
//! Only the access bits are modelled here. Every other bit of a flags word (layout,
//! semantics, interop, `static`, `virtual`, ...) is carried through unchanged by the
//! publicizer, so none of them need names.
//!
//! # Reference
//! - ECMA-335 6th Edition, Partition II, Section 23.1 - Values for flags

use bitflags::bitflags;

#[allow(non_snake_case)]
/// Visibility constants of the `TypeDef.Flags` column.
///
/// Top-level types use [`TypeAttributes::NOT_PUBLIC`] and [`TypeAttributes::PUBLIC`],
/// nested types one of the `NESTED_*` values.
pub mod TypeAttributes {
    /// Mask for extracting type visibility information.
    ///
    /// Use this mask with bitwise AND to isolate the 3 visibility bits,
    /// then compare with specific visibility constants.
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Type has no public scope (internal to assembly)
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    /// Type has public scope
    pub const PUBLIC: u32 = 0x0000_0001;
    /// Nested type accessible wherever the enclosing type is
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;
    /// Nested type only accessible within the enclosing type
    pub const NESTED_PRIVATE: u32 = 0x0000_0003;
    /// Nested type accessible to the enclosing type and its sub-types
    pub const NESTED_FAMILY: u32 = 0x0000_0004;
    /// Nested type accessible within the assembly
    pub const NESTED_ASSEMBLY: u32 = 0x0000_0005;
    /// Nested type accessible to sub-types within the assembly
    pub const NESTED_FAM_AND_ASSEM: u32 = 0x0000_0006;
    /// Nested type accessible to sub-types anywhere and within the assembly
    pub const NESTED_FAM_OR_ASSEM: u32 = 0x0000_0007;
}

#[allow(non_snake_case)]
/// Access constants of the `Field.Flags` column
pub mod FieldAttributes {
    /// These 3 bits contain one of the following values:
    pub const FIELD_ACCESS_MASK: u32 = 0x0007;
    /// Member not referenceable
    pub const COMPILER_CONTROLLED: u32 = 0x0000;
    /// Accessible only by the parent type
    pub const PRIVATE: u32 = 0x0001;
    /// Accessible by sub-types only in this Assembly
    pub const FAM_AND_ASSEM: u32 = 0x0002;
    /// Accessibly by anyone in the Assembly
    pub const ASSEMBLY: u32 = 0x0003;
    /// Accessible only by type and sub-types
    pub const FAMILY: u32 = 0x0004;
    /// Accessibly by sub-types anywhere, plus anyone in assembly
    pub const FAM_OR_ASSEM: u32 = 0x0005;
    /// Accessibly by anyone who has visibility to this scope
    pub const PUBLIC: u32 = 0x0006;
}

/// Bitmask for `ACCESS` state extraction
pub const METHOD_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    #[derive(PartialEq, Debug)]
    /// Method access flags
    pub struct MethodAccessFlags: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessibly by anyone in the Assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessibly by sub-types anywhere, plus anyone in assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessibly by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
    }
}

impl MethodAccessFlags {
    /// Extract access flags from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_ACCESS_MASK)
    }
}
