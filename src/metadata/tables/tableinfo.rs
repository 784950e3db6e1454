use std::sync::Arc;
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::read_le_at,
    metadata::tables::{CodedIndexType, TableId},
    Error::OutOfBounds,
    Result,
};

/// Number of bits in the `valid` vector, one per possible table id.
const MAX_TABLES: usize = 64;

/// Heap size flag: string heap indices are 4 bytes wide.
pub const HEAP_LARGE_STRINGS: u8 = 0x01;
/// Heap size flag: GUID heap indices are 4 bytes wide.
pub const HEAP_LARGE_GUID: u8 = 0x02;
/// Heap size flag: blob heap indices are 4 bytes wide.
pub const HEAP_LARGE_BLOB: u8 = 0x04;
/// Heap size flag: an extra 4-byte word follows the row counts.
pub const HEAP_EXTRA_DATA: u8 = 0x40;

/// Row count of a single table and the width of indices into it.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// Number of rows
    pub rows: u32,
    /// Bits needed to represent the row count
    pub bits: u8,
    /// Whether indices into the table are 4 bytes wide
    pub is_large: bool,
}

impl TableRowInfo {
    /// Describe a table with `rows` rows.
    #[must_use]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// Row counts and index widths for every table of a tables stream.
///
/// The widths of heap indices, simple table indices and coded indices all follow from
/// this information, and together they determine every row size.
#[derive(Clone, Default, Debug)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

/// Shared reference to a [`TableInfo`]
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Read the row counts that follow the fixed tables stream header.
    ///
    /// Every bit of `valid_bitvec` has a row count, including tables this library does
    /// not model; they only have to be skipped. Returns the info and the offset just past
    /// the row counts.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the row counts are truncated.
    pub fn new(data: &[u8], valid_bitvec: u64, heap_sizes: u8) -> Result<(Self, usize)> {
        let mut table_info = vec![TableRowInfo::default(); MAX_TABLES];
        let mut next_row_offset = 24;

        for (table_index, info) in table_info.iter_mut().enumerate() {
            if (valid_bitvec & (1 << table_index)) == 0 {
                continue;
            }

            if data.len() < next_row_offset + 4 {
                return Err(OutOfBounds);
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            *info = TableRowInfo::new(row_count);
        }

        let mut table_info = TableInfo {
            rows: table_info,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_sizes & HEAP_LARGE_STRINGS != 0,
            is_large_index_guid: heap_sizes & HEAP_LARGE_GUID != 0,
            is_large_index_blob: heap_sizes & HEAP_LARGE_BLOB != 0,
        };

        table_info.calculate_coded_index_bits();

        Ok((table_info, next_row_offset))
    }

    /// Row counts and heap widths given directly, for crafted layouts.
    #[cfg(test)]
    pub(crate) fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); MAX_TABLES],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for valid_table in valid_tables {
            table_info.rows[valid_table.0 as usize] = TableRowInfo::new(valid_table.1);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Number of rows in `table`.
    #[must_use]
    pub fn rows(&self, table: TableId) -> u32 {
        self.rows[table as usize].rows
    }

    /// Whether `#Strings` indices are 4 bytes wide.
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// Width of a `#Strings` index in bytes.
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Width of a `#GUID` index in bytes.
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Width of a `#Blob` index in bytes.
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Width of a simple index into `table_id` in bytes.
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.rows[table_id as usize].bits > 16 {
            4
        } else {
            2
        }
    }

    /// Width of a coded index of `coded_index_type` in bytes.
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_indexes[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    /// Size of one row of `table` in bytes.
    #[rustfmt::skip]
    #[must_use]
    pub fn row_size(&self, table: TableId) -> u32 {
        use CodedIndexType as C;
        use TableId as T;

        let str = self.str_bytes();
        let guid = self.guid_bytes();
        let blob = self.blob_bytes();
        let idx = |id: TableId| self.table_index_bytes(id);
        let coded = |kind: CodedIndexType| self.coded_index_bytes(kind);

        u32::from(match table {
            T::Module =>                 2 + str + guid + guid + guid,
            T::TypeRef =>                coded(C::ResolutionScope) + str + str,
            T::TypeDef =>                4 + str + str + coded(C::TypeDefOrRef) + idx(T::Field) + idx(T::MethodDef),
            T::FieldPtr =>               idx(T::Field),
            T::Field =>                  2 + str + blob,
            T::MethodPtr =>              idx(T::MethodDef),
            T::MethodDef =>              4 + 2 + 2 + str + blob + idx(T::Param),
            T::ParamPtr =>               idx(T::Param),
            T::Param =>                  2 + 2 + str,
            T::InterfaceImpl =>          idx(T::TypeDef) + coded(C::TypeDefOrRef),
            T::MemberRef =>              coded(C::MemberRefParent) + str + blob,
            T::Constant =>               1 + 1 + coded(C::HasConstant) + blob,
            T::CustomAttribute =>        coded(C::HasCustomAttribute) + coded(C::CustomAttributeType) + blob,
            T::FieldMarshal =>           coded(C::HasFieldMarshal) + blob,
            T::DeclSecurity =>           2 + coded(C::HasDeclSecurity) + blob,
            T::ClassLayout =>            2 + 4 + idx(T::TypeDef),
            T::FieldLayout =>            4 + idx(T::Field),
            T::StandAloneSig =>          blob,
            T::EventMap =>               idx(T::TypeDef) + idx(T::Event),
            T::EventPtr =>               idx(T::Event),
            T::Event =>                  2 + str + coded(C::TypeDefOrRef),
            T::PropertyMap =>            idx(T::TypeDef) + idx(T::Property),
            T::PropertyPtr =>            idx(T::Property),
            T::Property =>               2 + str + blob,
            T::MethodSemantics =>        2 + idx(T::MethodDef) + coded(C::HasSemantics),
            T::MethodImpl =>             idx(T::TypeDef) + coded(C::MethodDefOrRef) + coded(C::MethodDefOrRef),
            T::ModuleRef =>              str,
            T::TypeSpec =>               blob,
            T::ImplMap =>                2 + coded(C::MemberForwarded) + str + idx(T::ModuleRef),
            T::FieldRVA =>               4 + idx(T::Field),
            T::EncLog =>                 4 + 4,
            T::EncMap =>                 4,
            T::Assembly =>               4 + 2 + 2 + 2 + 2 + 4 + blob + str + str,
            T::AssemblyProcessor =>      4,
            T::AssemblyOS =>             4 + 4 + 4,
            T::AssemblyRef =>            2 + 2 + 2 + 2 + 4 + blob + str + str + blob,
            T::AssemblyRefProcessor =>   4 + idx(T::AssemblyRef),
            T::AssemblyRefOS =>          4 + 4 + 4 + idx(T::AssemblyRef),
            T::File =>                   4 + str + blob,
            T::ExportedType =>           4 + 4 + str + str + coded(C::Implementation),
            T::ManifestResource =>       4 + 4 + str + coded(C::Implementation),
            T::NestedClass =>            idx(T::TypeDef) + idx(T::TypeDef),
            T::GenericParam =>           2 + 2 + coded(C::TypeOrMethodDef) + str,
            T::MethodSpec =>             coded(C::MethodDefOrRef) + blob,
            T::GenericParamConstraint => idx(T::GenericParam) + coded(C::TypeDefOrRef),
        })
    }

    fn calculate_coded_index_size(&self, coded_index_type: CodedIndexType) -> u8 {
        let max_bits = coded_index_type
            .tables()
            .iter()
            .map(|table| self.rows[*table as usize].bits)
            .max()
            .unwrap_or(1);

        max_bits + coded_index_type.tag_bits()
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let size = self.calculate_coded_index_size(coded_index);
            self.coded_indexes[coded_index as usize] = size;
        }
    }
}
