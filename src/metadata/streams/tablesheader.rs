//! Tables stream (`#~` / `#-`) header parsing and table location.
//!
//! The header announces which tables are present and how many rows each has. Tables
//! follow the row counts back to back in [`TableId`] order, so locating one table
//! means summing the sizes of every present table before it.
//!
//! # Reference
//! - ECMA-335 6th Edition, Partition II, Section 24.2.6 - `#~` stream

use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    file::io::read_le,
    metadata::tables::{
        MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef, HEAP_EXTRA_DATA,
    },
    Error::OutOfBounds,
    Result,
};

/// The parsed header of a tables stream.
pub struct TablesHeader<'a> {
    /// Major version of the table schema, 2 for current runtimes
    pub major_version: u8,
    /// Minor version of the table schema
    pub minor_version: u8,
    /// Heap size flags
    pub heap_sizes: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    data: &'a [u8],
    offsets: Vec<Option<usize>>,
}

impl<'a> TablesHeader<'a> {
    /// Parse the tables stream header and compute the offset of every modelled table.
    ///
    /// ## Arguments
    /// * 'data' - The complete tables stream
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the header or a table is truncated, and
    /// [`crate::Error::Malformed`] if no table is present.
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let valid_bitvec = read_le::<u64>(&data[8..])?;
        if valid_bitvec == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let heap_sizes = read_le::<u8>(&data[6..])?;
        let (info, counts_end) = TableInfo::new(data, valid_bitvec, heap_sizes)?;

        let mut current_offset = counts_end;
        if heap_sizes & HEAP_EXTRA_DATA != 0 {
            current_offset += 4;
        }

        let mut offsets = vec![None; TableId::GenericParamConstraint as usize + 1];
        for table_id in TableId::iter() {
            let rows = info.rows(table_id);
            if rows == 0 {
                continue;
            }

            let size = rows as usize * info.row_size(table_id) as usize;
            if current_offset + size > data.len() {
                return Err(OutOfBounds);
            }

            offsets[table_id as usize] = Some(current_offset);
            current_offset += size;
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            heap_sizes,
            valid: valid_bitvec,
            sorted: read_le::<u64>(&data[16..])?,
            info: Arc::new(info),
            data,
            offsets,
        })
    }

    /// Number of rows in `table_id`
    #[must_use]
    pub fn rows(&self, table_id: TableId) -> u32 {
        self.info.rows(table_id)
    }

    /// Offset of `table_id` from the start of the stream, `None` if it has no rows.
    #[must_use]
    pub fn table_offset(&self, table_id: TableId) -> Option<usize> {
        self.offsets.get(table_id as usize).copied().flatten()
    }

    /// A typed view over the rows of `T`'s table, `None` if it has no rows.
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'a, T>> {
        let offset = self.table_offset(T::TABLE)?;
        MetadataTable::new(&self.data[offset..], self.rows(T::TABLE), self.info.clone()).ok()
    }
}
