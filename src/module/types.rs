//! Arena entries of the module graph.
//!
//! Types, methods, fields and events live in flat vectors owned by
//! [`crate::Module`] and refer to each other through the index newtypes below. Every
//! entry that carries a visibility flag remembers the absolute file offset of its flags
//! column so the flag can be written back without re-encoding the tables.

use crate::metadata::{
    tables::{FieldAttributes, MethodAccessFlags, TypeAttributes, METHOD_ACCESS_MASK},
    token::Token,
};

macro_rules! arena_index {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Position of the entry in its arena
            #[must_use]
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

arena_index!(TypeIndex, "Index of a [`TypeDef`] in its module");
arena_index!(MethodIndex, "Index of a [`MethodDef`] in its module");
arena_index!(FieldIndex, "Index of a [`FieldDef`] in its module");
arena_index!(EventIndex, "Index of an [`EventDef`] in its module");

/// A type declared in the module, top-level or nested.
#[derive(Clone, Debug)]
pub struct TypeDef {
    /// `TypeDef` token
    pub token: Token,
    /// Simple name
    pub name: String,
    /// Namespace, empty for nested and global types
    pub namespace: String,
    pub(crate) flags: u32,
    pub(crate) flags_offset: usize,
    pub(crate) enclosing: Option<TypeIndex>,
    pub(crate) nested: Vec<TypeIndex>,
    pub(crate) methods: Vec<MethodIndex>,
    pub(crate) fields: Vec<FieldIndex>,
    pub(crate) events: Vec<EventIndex>,
}

impl TypeDef {
    /// The raw `TypeAttributes` word.
    #[must_use]
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// The visibility bits of the flags word.
    #[must_use]
    pub fn visibility(&self) -> u32 {
        self.flags & TypeAttributes::VISIBILITY_MASK
    }

    /// Returns true if the type is `public` or `nested public`.
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(
            self.visibility(),
            TypeAttributes::PUBLIC | TypeAttributes::NESTED_PUBLIC
        )
    }

    /// Returns true if the type is declared inside another type.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.enclosing.is_some()
    }

    /// Replace the visibility bits, leaving every other flag untouched.
    pub fn set_visibility(&mut self, visibility: u32) {
        self.flags = (self.flags & !TypeAttributes::VISIBILITY_MASK)
            | (visibility & TypeAttributes::VISIBILITY_MASK);
    }

    /// The enclosing type of a nested type
    #[must_use]
    pub fn enclosing(&self) -> Option<TypeIndex> {
        self.enclosing
    }

    /// Directly nested types in declaration order
    #[must_use]
    pub fn nested(&self) -> &[TypeIndex] {
        &self.nested
    }

    /// Methods owned by this type, accessors included
    #[must_use]
    pub fn methods(&self) -> &[MethodIndex] {
        &self.methods
    }

    /// Fields owned by this type
    #[must_use]
    pub fn fields(&self) -> &[FieldIndex] {
        &self.fields
    }

    /// Events owned by this type
    #[must_use]
    pub fn events(&self) -> &[EventIndex] {
        &self.events
    }

    /// `Namespace.Name`, or just the name without a namespace.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// A method definition.
#[derive(Clone, Debug)]
pub struct MethodDef {
    /// `MethodDef` token
    pub token: Token,
    /// Method name
    pub name: String,
    pub(crate) flags: u32,
    pub(crate) flags_offset: usize,
}

impl MethodDef {
    /// The raw `MethodAttributes` word.
    #[must_use]
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// The access bits of the flags word.
    #[must_use]
    pub fn access(&self) -> MethodAccessFlags {
        MethodAccessFlags::from_method_flags(self.flags)
    }

    /// Returns true if the method is `public`.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access() == MethodAccessFlags::PUBLIC
    }

    /// Replace the access bits, leaving every other flag untouched.
    pub fn set_access(&mut self, access: MethodAccessFlags) {
        self.flags = (self.flags & !METHOD_ACCESS_MASK) | (access.bits() & METHOD_ACCESS_MASK);
    }
}

/// A field definition.
#[derive(Clone, Debug)]
pub struct FieldDef {
    /// Field token
    pub token: Token,
    /// Field name
    pub name: String,
    pub(crate) flags: u32,
    pub(crate) flags_offset: usize,
}

impl FieldDef {
    /// The raw `FieldAttributes` word.
    #[must_use]
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// The access bits of the flags word.
    #[must_use]
    pub fn access(&self) -> u32 {
        self.flags & FieldAttributes::FIELD_ACCESS_MASK
    }

    /// Returns true if the field is `public`.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access() == FieldAttributes::PUBLIC
    }

    /// Replace the access bits, leaving every other flag untouched.
    pub fn set_access(&mut self, access: u32) {
        self.flags = (self.flags & !FieldAttributes::FIELD_ACCESS_MASK)
            | (access & FieldAttributes::FIELD_ACCESS_MASK);
    }
}

/// An event definition. Events are only read, never rewritten.
#[derive(Clone, Debug)]
pub struct EventDef {
    /// Event token
    pub token: Token,
    /// Event name
    pub name: String,
}
