//! Raw rows of the tables the module graph is built from.
//!
//! Each row remembers its `offset` within the table so the flags column can later be
//! written back in place. Index columns are kept as raw 1-based row ids.

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndexType, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

fn read_coded(
    data: &[u8],
    offset: &mut usize,
    sizes: &TableInfoRef,
    kind: CodedIndexType,
) -> Result<u32> {
    read_le_at_dyn(data, offset, sizes.coded_index_bytes(kind) == 4)
}

fn read_index(data: &[u8], offset: &mut usize, sizes: &TableInfoRef, table: TableId) -> Result<u32> {
    read_le_at_dyn(data, offset, sizes.table_index_bytes(table) == 4)
}

#[derive(Clone, Debug)]
/// The `TypeDef` table defines types (classes, interfaces, value types, enums) in the current module. `TableId` = 0x02
pub struct TypeDefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 4-byte bitmask of type `TypeAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub type_name: u32,
    /// an index into the String heap
    pub type_namespace: u32,
    /// a `TypeDefOrRef` coded index, kept undecoded
    pub extends: u32,
    /// an index into the Field table; it marks the first of a contiguous run of Fields owned by this Type
    pub field_list: u32,
    /// an index into the `MethodDef` table; it marks the first of a continguous run of Methods owned by this Type
    pub method_list: u32,
}

impl RowReadable for TypeDefRaw {
    const TABLE: TableId = TableId::TypeDef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(TypeDefRaw {
            rid,
            token: Token::new(Self::TABLE.token_type() + rid),
            offset: *offset,
            flags: read_le_at::<u32>(data, offset)?,
            type_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            type_namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            extends: read_coded(data, offset, sizes, CodedIndexType::TypeDefOrRef)?,
            field_list: read_index(data, offset, sizes, TableId::Field)?,
            method_list: read_index(data, offset, sizes, TableId::MethodDef)?,
        })
    }
}

#[derive(Clone, Debug)]
/// The Field table defines fields, `TableId` = 0x04
pub struct FieldRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `FieldAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap
    pub signature: u32,
}

impl RowReadable for FieldRaw {
    const TABLE: TableId = TableId::Field;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(FieldRaw {
            rid,
            token: Token::new(Self::TABLE.token_type() + rid),
            offset: *offset,
            flags: u32::from(read_le_at::<u16>(data, offset)?),
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.blob_bytes() == 4)?,
        })
    }
}

#[derive(Clone, Debug)]
/// The `MethodDef` table defines methods, including property and event accessors. `TableId` = 0x06
pub struct MethodDefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 4-byte constant, the RVA of the method body
    pub rva: u32,
    /// a 2-byte bitmask of type `MethodImplAttributes`
    pub impl_flags: u32,
    /// a 2-byte bitmask of type `MethodAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// an index into the Blob heap
    pub signature: u32,
    /// an index into the Param table
    pub param_list: u32,
}

impl MethodDefRaw {
    /// Position of the flags column within the row
    pub const FLAGS_OFFSET: usize = 6;
}

impl RowReadable for MethodDefRaw {
    const TABLE: TableId = TableId::MethodDef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MethodDefRaw {
            rid,
            token: Token::new(Self::TABLE.token_type() + rid),
            offset: *offset,
            rva: read_le_at::<u32>(data, offset)?,
            impl_flags: u32::from(read_le_at::<u16>(data, offset)?),
            flags: u32::from(read_le_at::<u16>(data, offset)?),
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.blob_bytes() == 4)?,
            param_list: read_index(data, offset, sizes, TableId::Param)?,
        })
    }
}

#[derive(Clone, Debug)]
/// The `FieldPtr` table adds a level of indirection to the Field table, `TableId` = 0x03
pub struct FieldPtrRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the Field table
    pub field: u32,
}

impl RowReadable for FieldPtrRaw {
    const TABLE: TableId = TableId::FieldPtr;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(FieldPtrRaw {
            rid,
            token: Token::new(Self::TABLE.token_type() + rid),
            offset: *offset,
            field: read_index(data, offset, sizes, TableId::Field)?,
        })
    }
}

#[derive(Clone, Debug)]
/// The `MethodPtr` table adds a level of indirection to the `MethodDef` table, `TableId` = 0x05
pub struct MethodPtrRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `MethodDef` table
    pub method: u32,
}

impl RowReadable for MethodPtrRaw {
    const TABLE: TableId = TableId::MethodPtr;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MethodPtrRaw {
            rid,
            token: Token::new(Self::TABLE.token_type() + rid),
            offset: *offset,
            method: read_index(data, offset, sizes, TableId::MethodDef)?,
        })
    }
}

#[derive(Clone, Debug)]
/// The `EventPtr` table adds a level of indirection to the Event table, `TableId` = 0x13
pub struct EventPtrRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the Event table
    pub event: u32,
}

impl RowReadable for EventPtrRaw {
    const TABLE: TableId = TableId::EventPtr;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(EventPtrRaw {
            rid,
            token: Token::new(Self::TABLE.token_type() + rid),
            offset: *offset,
            event: read_index(data, offset, sizes, TableId::Event)?,
        })
    }
}

#[derive(Clone, Debug)]
/// The `EventMap` table maps types to the first of a contiguous run of events, `TableId` = 0x12
pub struct EventMapRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `TypeDef` table
    pub parent: u32,
    /// an index into the Event table; it marks the first of a contiguous run of Events owned by `parent`
    pub event_list: u32,
}

impl RowReadable for EventMapRaw {
    const TABLE: TableId = TableId::EventMap;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(EventMapRaw {
            rid,
            token: Token::new(Self::TABLE.token_type() + rid),
            offset: *offset,
            parent: read_index(data, offset, sizes, TableId::TypeDef)?,
            event_list: read_index(data, offset, sizes, TableId::Event)?,
        })
    }
}

#[derive(Clone, Debug)]
/// The Event table defines events, `TableId` = 0x14
pub struct EventRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// a 2-byte bitmask of type `EventAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub name: u32,
    /// a `TypeDefOrRef` coded index, kept undecoded
    pub event_type: u32,
}

impl RowReadable for EventRaw {
    const TABLE: TableId = TableId::Event;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(EventRaw {
            rid,
            token: Token::new(Self::TABLE.token_type() + rid),
            offset: *offset,
            flags: u32::from(read_le_at::<u16>(data, offset)?),
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            event_type: read_coded(data, offset, sizes, CodedIndexType::TypeDefOrRef)?,
        })
    }
}

#[derive(Clone, Debug)]
/// The `NestedClass` table records which type encloses which nested type, `TableId` = 0x29
pub struct NestedClassRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Offset
    pub offset: usize,
    /// an index into the `TypeDef` table, the nested type
    pub nested_class: u32,
    /// an index into the `TypeDef` table, the enclosing type
    pub enclosing_class: u32,
}

impl RowReadable for NestedClassRaw {
    const TABLE: TableId = TableId::NestedClass;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(NestedClassRaw {
            rid,
            token: Token::new(Self::TABLE.token_type() + rid),
            offset: *offset,
            nested_class: read_index(data, offset, sizes, TableId::TypeDef)?,
            enclosing_class: read_index(data, offset, sizes, TableId::TypeDef)?,
        })
    }
}
