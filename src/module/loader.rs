//! Builds the module graph from the metadata tables.
//!
//! The loader follows the CLR runtime header to the CLI header, the CLI header to the
//! metadata root, and the root to the `#~`/`#-` and `#Strings` streams. Member ownership
//! is resolved from the contiguous `field_list`/`method_list`/`event_list` runs,
//! through the pointer tables when an uncompressed stream carries them.

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        root::Root,
        streams::{Strings, TablesHeader},
        tables::{
            EventMapRaw, EventPtrRaw, EventRaw, FieldPtrRaw, FieldRaw, MetadataTable,
            MethodDefRaw, MethodPtrRaw, NestedClassRaw, RowReadable, TableId, TypeDefRaw,
        },
    },
    module::types::{
        EventDef, EventIndex, FieldDef, FieldIndex, MethodDef, MethodIndex, TypeDef, TypeIndex,
    },
    Error::NotSupported,
    Result,
};

/// The arenas of a loaded module.
#[derive(Default)]
pub(crate) struct Graph {
    pub types: Vec<TypeDef>,
    pub methods: Vec<MethodDef>,
    pub fields: Vec<FieldDef>,
    pub events: Vec<EventDef>,
    pub top_level: Vec<TypeIndex>,
}

/// Maps logical member positions (as used by the `*_list` columns) to physical rows.
struct MemberRuns<'a, P: RowReadable> {
    pointers: Option<MetadataTable<'a, P>>,
    physical_rows: u32,
}

impl<'a, P: RowReadable> MemberRuns<'a, P> {
    fn new(pointers: Option<MetadataTable<'a, P>>, physical_rows: u32) -> Self {
        MemberRuns {
            pointers,
            physical_rows,
        }
    }

    /// Number of logical positions; runs of the last owner end one past it.
    fn logical_rows(&self) -> u32 {
        match &self.pointers {
            Some(pointers) => pointers.row_count(),
            None => self.physical_rows,
        }
    }

    /// Physical 0-based arena indices for the logical run `[start, end)`.
    ///
    /// The end is clamped to the table, and pointer rows that lead outside the physical
    /// table are skipped.
    fn resolve(&self, start: u32, end: u32, target: impl Fn(&P) -> u32) -> Vec<usize> {
        let end = end.min(self.logical_rows() + 1);
        if start == 0 || start >= end {
            return Vec::new();
        }

        (start..end)
            .filter_map(|logical| {
                let physical = match &self.pointers {
                    Some(pointers) => target(&pointers.get(logical)?),
                    None => logical,
                };

                if physical == 0 || physical > self.physical_rows {
                    None
                } else {
                    Some(physical as usize - 1)
                }
            })
            .collect()
    }
}

/// Absolute file offset of `table`, or 0 when the table is empty.
fn table_base(tables: &TablesHeader, tables_offset: usize, table: TableId) -> usize {
    tables
        .table_offset(table)
        .map_or(0, |offset| tables_offset + offset)
}

/// Read the module graph of `file`.
///
/// # Errors
/// Returns [`crate::Error::NotSupported`] when the image carries no CLI header, and a
/// parse error for any malformed header, stream or table.
pub(crate) fn load(file: &File) -> Result<Graph> {
    let (clr_rva, clr_size) = file.clr();
    if clr_rva == 0 || clr_size < Cor20Header::SIZE {
        return Err(NotSupported);
    }

    let clr_offset = file.rva_to_offset(clr_rva)?;
    let cor20 = Cor20Header::read(file.data_slice(clr_offset, Cor20Header::SIZE)?)?;

    let metadata_offset = file.rva_to_offset(cor20.meta_data_rva as usize)?;
    let metadata = file.data_slice(metadata_offset, cor20.meta_data_size as usize)?;
    let root = Root::read(metadata)?;

    let Some(tables_stream) = root.stream_headers.iter().find(|stream| stream.is_tables()) else {
        return Err(malformed_error!("Metadata has no tables stream"));
    };
    let Some(strings_stream) = root.stream("#Strings") else {
        return Err(malformed_error!("Metadata has no #Strings stream"));
    };

    let tables_data = &metadata[tables_stream.offset as usize..][..tables_stream.size as usize];
    let strings = Strings::from(
        &metadata[strings_stream.offset as usize..][..strings_stream.size as usize],
    )?;
    let tables = TablesHeader::from(tables_data)?;
    let tables_offset = metadata_offset + tables_stream.offset as usize;

    let mut graph = Graph::default();

    if let Some(method_table) = tables.table::<MethodDefRaw>() {
        let base = table_base(&tables, tables_offset, TableId::MethodDef);
        for row in &method_table {
            graph.methods.push(MethodDef {
                token: row.token,
                name: strings.get(row.name as usize)?.to_string(),
                flags: row.flags,
                flags_offset: base + row.offset + MethodDefRaw::FLAGS_OFFSET,
            });
        }
    }

    if let Some(field_table) = tables.table::<FieldRaw>() {
        let base = table_base(&tables, tables_offset, TableId::Field);
        for row in &field_table {
            graph.fields.push(FieldDef {
                token: row.token,
                name: strings.get(row.name as usize)?.to_string(),
                flags: row.flags,
                flags_offset: base + row.offset,
            });
        }
    }

    if let Some(event_table) = tables.table::<EventRaw>() {
        for row in &event_table {
            graph.events.push(EventDef {
                token: row.token,
                name: strings.get(row.name as usize)?.to_string(),
            });
        }
    }

    let Some(type_table) = tables.table::<TypeDefRaw>() else {
        log::debug!("Module declares no types");
        return Ok(graph);
    };

    let method_runs = MemberRuns::new(tables.table::<MethodPtrRaw>(), tables.rows(TableId::MethodDef));
    let field_runs = MemberRuns::new(tables.table::<FieldPtrRaw>(), tables.rows(TableId::Field));
    let event_runs = MemberRuns::new(tables.table::<EventPtrRaw>(), tables.rows(TableId::Event));

    let type_base = table_base(&tables, tables_offset, TableId::TypeDef);
    let type_rows: Vec<TypeDefRaw> = type_table.iter().collect();
    for (index, row) in type_rows.iter().enumerate() {
        let (fields_end, methods_end) = match type_rows.get(index + 1) {
            Some(next_row) => (next_row.field_list, next_row.method_list),
            None => (field_runs.logical_rows() + 1, method_runs.logical_rows() + 1),
        };

        graph.types.push(TypeDef {
            token: row.token,
            name: strings.get(row.type_name as usize)?.to_string(),
            namespace: strings.get(row.type_namespace as usize)?.to_string(),
            flags: row.flags,
            flags_offset: type_base + row.offset,
            enclosing: None,
            nested: Vec::new(),
            methods: method_runs
                .resolve(row.method_list, methods_end, |ptr| ptr.method)
                .into_iter()
                .map(MethodIndex)
                .collect(),
            fields: field_runs
                .resolve(row.field_list, fields_end, |ptr| ptr.field)
                .into_iter()
                .map(FieldIndex)
                .collect(),
            events: Vec::new(),
        });
    }

    if let Some(event_map) = tables.table::<EventMapRaw>() {
        let map_rows: Vec<EventMapRaw> = event_map.iter().collect();
        for (index, row) in map_rows.iter().enumerate() {
            let end = map_rows
                .get(index + 1)
                .map_or(event_runs.logical_rows() + 1, |next_row| next_row.event_list);

            let Some(owner) = graph.types.get_mut((row.parent as usize).wrapping_sub(1)) else {
                log::debug!("EventMap row {} has invalid parent {}", row.rid, row.parent);
                continue;
            };

            owner.events.extend(
                event_runs
                    .resolve(row.event_list, end, |ptr| ptr.event)
                    .into_iter()
                    .map(EventIndex),
            );
        }
    }

    if let Some(nested_classes) = tables.table::<NestedClassRaw>() {
        let type_count = graph.types.len();
        for row in &nested_classes {
            let nested = (row.nested_class as usize).wrapping_sub(1);
            let enclosing = (row.enclosing_class as usize).wrapping_sub(1);
            if nested >= type_count || enclosing >= type_count || nested == enclosing {
                log::debug!("Skipping invalid NestedClass row {}", row.rid);
                continue;
            }

            // A type has at most one enclosing type; later rows cannot re-parent it
            if graph.types[nested].enclosing.is_some() {
                log::debug!("Skipping duplicate NestedClass row {}", row.rid);
                continue;
            }

            graph.types[nested].enclosing = Some(TypeIndex(enclosing));
            graph.types[enclosing].nested.push(TypeIndex(nested));
        }

        for type_def in &mut graph.types {
            type_def.nested.sort_unstable();
        }
    }

    graph.top_level = graph
        .types
        .iter()
        .enumerate()
        .filter(|(_, type_def)| type_def.enclosing.is_none())
        .map(|(index, _)| TypeIndex(index))
        .collect();

    Ok(graph)
}
