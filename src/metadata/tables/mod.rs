//! Metadata table layout and row access.
//!
//! The tables stream stores every table back to back, and the width of almost every
//! column depends on the row counts of other tables and on the heap size flags. This
//! module computes those widths for all ECMA-335 tables so that any table can be
//! located, and decodes the rows the module graph is built from.
//!
//! # Key Components
//!
//! - [`TableId`] - Table identifiers in storage order
//! - [`TableInfo`] - Row counts and index widths
//! - [`CodedIndexType`] - Coded index kinds and their tag widths
//! - [`MetadataTable`] / [`RowReadable`] - Typed row access
//! - [`TypeAttributes`], [`FieldAttributes`], [`MethodAccessFlags`] - Visibility flags
//!
//! # Reference
//! - ECMA-335 6th Edition, Partition II, Section 22 and Section 24.2.6

mod attributes;
mod codedindex;
mod rows;
mod table;
mod tableid;
mod tableinfo;

pub use attributes::{
    FieldAttributes, MethodAccessFlags, TypeAttributes, METHOD_ACCESS_MASK,
};
pub use codedindex::CodedIndexType;
pub use rows::{
    EventMapRaw, EventPtrRaw, EventRaw, FieldPtrRaw, FieldRaw, MethodDefRaw, MethodPtrRaw,
    NestedClassRaw, TypeDefRaw,
};
pub use table::{MetadataTable, RowReadable, TableIterator};
pub use tableid::TableId;
pub use tableinfo::{
    TableInfo, TableInfoRef, TableRowInfo, HEAP_EXTRA_DATA, HEAP_LARGE_BLOB, HEAP_LARGE_GUID,
    HEAP_LARGE_STRINGS,
};
