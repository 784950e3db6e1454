//! Synthetic .NET assembly images for tests.
//!
//! [`AssemblyBuilder`] emits a minimal PE32 DLL with a CLI header, a metadata root and
//! the `#~` (or `#-`), `#Strings`, `#GUID` and `#Blob` streams. The tables stream holds
//! `Module`, `TypeRef`, `TypeDef`, `Field`, `MethodDef`, `EventMap`, `Event` and
//! `NestedClass` rows, plus the pointer tables and zeroed filler tables when requested.
//! Method bodies are not emitted; every method has an RVA of zero.
//!
//! Only the standard library is used so integration tests can include this file too.

#![allow(dead_code)]

const FILE_ALIGNMENT: u32 = 0x200;
const SECTION_ALIGNMENT: u32 = 0x2000;
const TEXT_RVA: u32 = 0x2000;
const CLI_HEADER_SIZE: u32 = 72;

const BLOB_FIELD_SIG: u16 = 1;
const BLOB_METHOD_SIG: u16 = 4;

const FILLER_ROWS: u32 = 2;

/// Column kinds of the tables the publicizer never reads, per ECMA-335 II.22.
#[derive(Clone, Copy)]
enum Column {
    U8,
    U16,
    U32,
    Str,
    Blob,
    /// Table or coded index; every filler layout keeps these at 2 bytes
    Index,
}

use Column::{Blob, Index, Str, U16, U32, U8};

#[rustfmt::skip]
const FILLER_TABLES: &[(u8, &[Column])] = &[
    (0x08, &[U16, U16, Str]),                                 // Param
    (0x09, &[Index, Index]),                                  // InterfaceImpl
    (0x0A, &[Index, Str, Blob]),                              // MemberRef
    (0x0B, &[U8, U8, Index, Blob]),                           // Constant
    (0x0C, &[Index, Index, Blob]),                            // CustomAttribute
    (0x0D, &[Index, Blob]),                                   // FieldMarshal
    (0x0E, &[U16, Index, Blob]),                              // DeclSecurity
    (0x0F, &[U16, U32, Index]),                               // ClassLayout
    (0x10, &[U32, Index]),                                    // FieldLayout
    (0x11, &[Blob]),                                          // StandAloneSig
    (0x15, &[Index, Index]),                                  // PropertyMap
    (0x17, &[U16, Str, Blob]),                                // Property
    (0x18, &[U16, Index, Index]),                             // MethodSemantics
    (0x19, &[Index, Index, Index]),                           // MethodImpl
    (0x1A, &[Str]),                                           // ModuleRef
    (0x1B, &[Blob]),                                          // TypeSpec
    (0x1C, &[U16, Index, Str, Index]),                        // ImplMap
    (0x1D, &[U32, Index]),                                    // FieldRVA
    (0x20, &[U32, U16, U16, U16, U16, U32, Blob, Str, Str]),  // Assembly
    (0x23, &[U16, U16, U16, U16, U32, Blob, Str, Str, Blob]), // AssemblyRef
    (0x27, &[U32, U32, Str, Str, Index]),                     // ExportedType
    (0x28, &[U32, U32, Str, Index]),                          // ManifestResource
    (0x2A, &[U16, U16, Index, Str]),                          // GenericParam
    (0x2B, &[Index, Blob]),                                   // MethodSpec
    (0x2C, &[Index, Index]),                                  // GenericParamConstraint
];

struct TypeEntry {
    namespace: String,
    name: String,
    flags: u32,
    enclosing: Option<usize>,
    methods: Vec<(String, u16)>,
    fields: Vec<(String, u16)>,
    events: Vec<String>,
}

/// Builder for small in-memory assemblies with chosen types and members.
///
/// Type index 0 is always the `<Module>` pseudo type.
pub struct AssemblyBuilder {
    types: Vec<TypeEntry>,
    pointer_tables: bool,
    wide_strings: bool,
    filler_tables: bool,
    clr_header: bool,
}

impl Default for AssemblyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblyBuilder {
    /// A builder holding only the `<Module>` type.
    pub fn new() -> Self {
        AssemblyBuilder {
            types: vec![TypeEntry {
                namespace: String::new(),
                name: "<Module>".to_string(),
                flags: 0,
                enclosing: None,
                methods: Vec::new(),
                fields: Vec::new(),
                events: Vec::new(),
            }],
            pointer_tables: false,
            wide_strings: false,
            filler_tables: false,
            clr_header: true,
        }
    }

    /// Add a top-level type, returning its index.
    pub fn add_type(&mut self, namespace: &str, name: &str, flags: u32) -> usize {
        self.push_type(namespace, name, flags, None)
    }

    /// Add a type nested in `enclosing`, returning its index.
    pub fn add_nested_type(&mut self, enclosing: usize, name: &str, flags: u32) -> usize {
        self.push_type("", name, flags, Some(enclosing))
    }

    /// Add a method with the given `MethodAttributes` to type `owner`.
    pub fn add_method(&mut self, owner: usize, name: &str, flags: u16) -> &mut Self {
        self.types[owner].methods.push((name.to_string(), flags));
        self
    }

    /// Add a field with the given `FieldAttributes` to type `owner`.
    pub fn add_field(&mut self, owner: usize, name: &str, flags: u16) -> &mut Self {
        self.types[owner].fields.push((name.to_string(), flags));
        self
    }

    /// Add an event to type `owner`.
    pub fn add_event(&mut self, owner: usize, name: &str) -> &mut Self {
        self.types[owner].events.push(name.to_string());
        self
    }

    /// Overwrite the flags of an existing type, including `<Module>` at index 0.
    pub fn set_type_flags(&mut self, index: usize, flags: u32) -> &mut Self {
        self.types[index].flags = flags;
        self
    }

    /// Emit an uncompressed `#-` stream with `FieldPtr`, `MethodPtr` and `EventPtr`
    /// tables. The physical member tables are stored in reverse logical order.
    pub fn with_pointer_tables(&mut self) -> &mut Self {
        self.pointer_tables = true;
        self
    }

    /// Use 4-byte `#Strings` indices.
    pub fn wide_string_indices(&mut self) -> &mut Self {
        self.wide_strings = true;
        self
    }

    /// Add zeroed rows to the tables a compiler emits around the modelled ones
    /// (`Param`, `MemberRef`, `CustomAttribute`, `Property`, `Assembly`, ...), so the
    /// modelled tables sit where they would in a real assembly.
    pub fn with_filler_tables(&mut self) -> &mut Self {
        self.filler_tables = true;
        self
    }

    /// Leave the CLR runtime header directory empty, producing a native image.
    pub fn without_clr_header(&mut self) -> &mut Self {
        self.clr_header = false;
        self
    }

    fn push_type(
        &mut self,
        namespace: &str,
        name: &str,
        flags: u32,
        enclosing: Option<usize>,
    ) -> usize {
        self.types.push(TypeEntry {
            namespace: namespace.to_string(),
            name: name.to_string(),
            flags,
            enclosing,
            methods: Vec::new(),
            fields: Vec::new(),
            events: Vec::new(),
        });
        self.types.len() - 1
    }

    /// Produce the complete PE image.
    pub fn build(&self) -> Vec<u8> {
        let metadata = self.metadata();
        let text_size = CLI_HEADER_SIZE + metadata.len() as u32;
        let raw_size = align(text_size, FILE_ALIGNMENT);
        let image_size = TEXT_RVA + align(text_size, SECTION_ALIGNMENT);

        let mut image = vec![0u8; (FILE_ALIGNMENT + raw_size) as usize];

        // DOS header
        image[0..2].copy_from_slice(b"MZ");
        put_u32(&mut image, 0x3C, 0x80);

        // PE signature and COFF header
        image[0x80..0x84].copy_from_slice(b"PE\0\0");
        put_u16(&mut image, 0x84, 0x014C);
        put_u16(&mut image, 0x86, 1);
        put_u16(&mut image, 0x94, 0xE0);
        put_u16(&mut image, 0x96, 0x2102);

        // PE32 optional header
        let opt = 0x98;
        put_u16(&mut image, opt, 0x010B);
        image[opt + 2] = 0x30;
        put_u32(&mut image, opt + 4, raw_size);
        put_u32(&mut image, opt + 20, TEXT_RVA);
        put_u32(&mut image, opt + 24, TEXT_RVA + SECTION_ALIGNMENT);
        put_u32(&mut image, opt + 28, 0x0040_0000);
        put_u32(&mut image, opt + 32, SECTION_ALIGNMENT);
        put_u32(&mut image, opt + 36, FILE_ALIGNMENT);
        put_u16(&mut image, opt + 40, 4);
        put_u16(&mut image, opt + 48, 4);
        put_u32(&mut image, opt + 56, image_size);
        put_u32(&mut image, opt + 60, FILE_ALIGNMENT);
        put_u16(&mut image, opt + 68, 3);
        put_u16(&mut image, opt + 70, 0x8560);
        put_u32(&mut image, opt + 72, 0x0010_0000);
        put_u32(&mut image, opt + 76, 0x1000);
        put_u32(&mut image, opt + 80, 0x0010_0000);
        put_u32(&mut image, opt + 84, 0x1000);
        put_u32(&mut image, opt + 92, 16);

        // Data directory 14, the CLR runtime header
        if self.clr_header {
            let clr_dir = opt + 96 + 14 * 8;
            put_u32(&mut image, clr_dir, TEXT_RVA);
            put_u32(&mut image, clr_dir + 4, CLI_HEADER_SIZE);
        }

        // .text section header
        let section = opt + 0xE0;
        image[section..section + 5].copy_from_slice(b".text");
        put_u32(&mut image, section + 8, text_size);
        put_u32(&mut image, section + 12, TEXT_RVA);
        put_u32(&mut image, section + 16, raw_size);
        put_u32(&mut image, section + 20, FILE_ALIGNMENT);
        put_u32(&mut image, section + 36, 0x6000_0020);

        // CLI header
        let cli = FILE_ALIGNMENT as usize;
        put_u32(&mut image, cli, CLI_HEADER_SIZE);
        put_u16(&mut image, cli + 4, 2);
        put_u16(&mut image, cli + 6, 5);
        put_u32(&mut image, cli + 8, TEXT_RVA + CLI_HEADER_SIZE);
        put_u32(&mut image, cli + 12, metadata.len() as u32);
        put_u32(&mut image, cli + 16, 1);

        let metadata_start = cli + CLI_HEADER_SIZE as usize;
        image[metadata_start..metadata_start + metadata.len()].copy_from_slice(&metadata);

        image
    }

    fn metadata(&self) -> Vec<u8> {
        let mut strings = StringHeap::new();
        let tables = self.tables(&mut strings);

        let guid: Vec<u8> = (1..=16).collect();
        #[rustfmt::skip]
        let blob = vec![
            0x00,
            0x02, 0x06, 0x08,       // field sig: int32
            0x03, 0x00, 0x00, 0x01, // method sig: void ()
        ];

        let tables_name: &[u8] = if self.pointer_tables { b"#-" } else { b"#~" };
        let streams: [(&[u8], Vec<u8>); 4] = [
            (tables_name, tables),
            (b"#Strings", strings.into_bytes()),
            (b"#GUID", guid),
            (b"#Blob", blob),
        ];

        let version = b"v4.0.30319\0\0";
        let headers_size: usize = streams
            .iter()
            .map(|(name, _)| 8 + align(name.len() as u32 + 1, 4) as usize)
            .sum();

        let mut root = Vec::new();
        root.extend_from_slice(b"BSJB");
        root.extend_from_slice(&1u16.to_le_bytes());
        root.extend_from_slice(&1u16.to_le_bytes());
        root.extend_from_slice(&0u32.to_le_bytes());
        root.extend_from_slice(&(version.len() as u32).to_le_bytes());
        root.extend_from_slice(version);
        root.extend_from_slice(&0u16.to_le_bytes());
        root.extend_from_slice(&(streams.len() as u16).to_le_bytes());

        let mut data_offset = root.len() + headers_size;
        for (name, data) in &streams {
            root.extend_from_slice(&(data_offset as u32).to_le_bytes());
            root.extend_from_slice(&(data.len() as u32).to_le_bytes());
            root.extend_from_slice(name);
            let padded = align(name.len() as u32 + 1, 4) as usize;
            root.resize(root.len() + padded - name.len(), 0);
            data_offset += data.len();
        }

        for (_, data) in &streams {
            root.extend_from_slice(data);
        }

        root
    }

    fn tables(&self, strings: &mut StringHeap) -> Vec<u8> {
        let str_index = |buf: &mut Vec<u8>, value: u32, wide: bool| {
            if wide {
                buf.extend_from_slice(&value.to_le_bytes());
            } else {
                buf.extend_from_slice(&(value as u16).to_le_bytes());
            }
        };
        let wide = self.wide_strings;

        let method_count: usize = self.types.iter().map(|t| t.methods.len()).sum();
        let field_count: usize = self.types.iter().map(|t| t.fields.len()).sum();
        let event_count: usize = self.types.iter().map(|t| t.events.len()).sum();

        // Logical member position n maps to physical row `physical(n, count)`
        let reversed = self.pointer_tables;
        let physical = |logical: usize, count: usize| {
            if reversed {
                count + 1 - logical
            } else {
                logical
            }
        };

        let mut counts: Vec<(u8, u32)> = Vec::new();
        let mut rows: Vec<u8> = Vec::new();

        // Module
        counts.push((0x00, 1));
        put_row_u16(&mut rows, 0);
        str_index(&mut rows, strings.add("Synthetic.dll"), wide);
        put_row_u16(&mut rows, 1);
        put_row_u16(&mut rows, 0);
        put_row_u16(&mut rows, 0);

        // TypeRef: System.Object, resolved through the module
        counts.push((0x01, 1));
        put_row_u16(&mut rows, 1 << 2);
        str_index(&mut rows, strings.add("Object"), wide);
        str_index(&mut rows, strings.add("System"), wide);

        // TypeDef
        counts.push((0x02, self.types.len() as u32));
        let mut next_field = 1;
        let mut next_method = 1;
        for (index, entry) in self.types.iter().enumerate() {
            rows.extend_from_slice(&entry.flags.to_le_bytes());
            str_index(&mut rows, strings.add(&entry.name), wide);
            str_index(&mut rows, strings.add(&entry.namespace), wide);
            // extends System.Object, except for <Module>
            put_row_u16(&mut rows, if index == 0 { 0 } else { (1 << 2) | 1 });
            put_row_u16(&mut rows, next_field as u16);
            put_row_u16(&mut rows, next_method as u16);
            next_field += entry.fields.len();
            next_method += entry.methods.len();
        }

        let fields: Vec<&(String, u16)> = self.types.iter().flat_map(|t| &t.fields).collect();
        let methods: Vec<&(String, u16)> = self.types.iter().flat_map(|t| &t.methods).collect();
        let events: Vec<&String> = self.types.iter().flat_map(|t| &t.events).collect();

        // FieldPtr
        if reversed && field_count > 0 {
            counts.push((0x03, field_count as u32));
            for logical in 1..=field_count {
                put_row_u16(&mut rows, physical(logical, field_count) as u16);
            }
        }

        // Field
        if field_count > 0 {
            counts.push((0x04, field_count as u32));
            for row in 1..=field_count {
                let (name, flags) = fields[physical(row, field_count) - 1];
                put_row_u16(&mut rows, *flags);
                str_index(&mut rows, strings.add(name), wide);
                put_row_u16(&mut rows, BLOB_FIELD_SIG);
            }
        }

        // MethodPtr
        if reversed && method_count > 0 {
            counts.push((0x05, method_count as u32));
            for logical in 1..=method_count {
                put_row_u16(&mut rows, physical(logical, method_count) as u16);
            }
        }

        // MethodDef
        if method_count > 0 {
            counts.push((0x06, method_count as u32));
            for row in 1..=method_count {
                let (name, flags) = methods[physical(row, method_count) - 1];
                rows.extend_from_slice(&0u32.to_le_bytes());
                put_row_u16(&mut rows, 0);
                put_row_u16(&mut rows, *flags);
                str_index(&mut rows, strings.add(name), wide);
                put_row_u16(&mut rows, BLOB_METHOD_SIG);
                put_row_u16(&mut rows, 1);
            }
        }

        self.push_fillers(0x07..0x12, &mut counts, &mut rows);

        // EventMap
        let owners: Vec<(usize, usize)> = {
            let mut next_event = 1;
            let mut owners = Vec::new();
            for (index, entry) in self.types.iter().enumerate() {
                if !entry.events.is_empty() {
                    owners.push((index + 1, next_event));
                }
                next_event += entry.events.len();
            }
            owners
        };
        if !owners.is_empty() {
            counts.push((0x12, owners.len() as u32));
            for (parent, event_list) in &owners {
                put_row_u16(&mut rows, *parent as u16);
                put_row_u16(&mut rows, *event_list as u16);
            }
        }

        // EventPtr
        if reversed && event_count > 0 {
            counts.push((0x13, event_count as u32));
            for logical in 1..=event_count {
                put_row_u16(&mut rows, physical(logical, event_count) as u16);
            }
        }

        // Event
        if event_count > 0 {
            counts.push((0x14, event_count as u32));
            for row in 1..=event_count {
                let name = events[physical(row, event_count) - 1];
                put_row_u16(&mut rows, 0);
                str_index(&mut rows, strings.add(name), wide);
                put_row_u16(&mut rows, (1 << 2) | 1);
            }
        }

        self.push_fillers(0x15..0x29, &mut counts, &mut rows);

        // NestedClass
        let nesting: Vec<(usize, usize)> = self
            .types
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.enclosing.map(|outer| (index + 1, outer + 1)))
            .collect();
        if !nesting.is_empty() {
            counts.push((0x29, nesting.len() as u32));
            for (nested, enclosing) in &nesting {
                put_row_u16(&mut rows, *nested as u16);
                put_row_u16(&mut rows, *enclosing as u16);
            }
        }

        self.push_fillers(0x2A..0x2D, &mut counts, &mut rows);

        let valid = counts.iter().fold(0u64, |valid, (id, _)| valid | (1 << id));

        let mut stream = Vec::new();
        stream.extend_from_slice(&0u32.to_le_bytes());
        stream.push(2);
        stream.push(0);
        stream.push(u8::from(wide));
        stream.push(1);
        stream.extend_from_slice(&valid.to_le_bytes());
        stream.extend_from_slice(&(1u64 << 0x29).to_le_bytes());
        for (_, count) in &counts {
            stream.extend_from_slice(&count.to_le_bytes());
        }
        stream.extend_from_slice(&rows);
        stream.resize(align(stream.len() as u32, 4) as usize, 0);
        stream
    }
}

impl AssemblyBuilder {
    /// Append the filler tables with ids in `ids`, if enabled.
    fn push_fillers(
        &self,
        ids: std::ops::Range<u8>,
        counts: &mut Vec<(u8, u32)>,
        rows: &mut Vec<u8>,
    ) {
        if !self.filler_tables {
            return;
        }

        let str_width = if self.wide_strings { 4 } else { 2 };
        for (id, columns) in FILLER_TABLES.iter().filter(|(id, _)| ids.contains(id)) {
            let row_size: usize = columns
                .iter()
                .map(|column| match column {
                    U8 => 1,
                    U16 | Blob | Index => 2,
                    U32 => 4,
                    Str => str_width,
                })
                .sum();

            counts.push((*id, FILLER_ROWS));
            rows.resize(rows.len() + row_size * FILLER_ROWS as usize, 0);
        }
    }
}

struct StringHeap {
    data: Vec<u8>,
}

impl StringHeap {
    fn new() -> Self {
        StringHeap { data: vec![0] }
    }

    fn add(&mut self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }

        let index = self.data.len() as u32;
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        index
    }

    fn into_bytes(mut self) -> Vec<u8> {
        self.data.resize(align(self.data.len() as u32, 4) as usize, 0);
        self.data
    }
}

fn align(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}

fn put_u16(image: &mut [u8], offset: usize, value: u16) {
    image[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(image: &mut [u8], offset: usize, value: u32) {
    image[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_row_u16(rows: &mut Vec<u8>, value: u16) {
    rows.extend_from_slice(&value.to_le_bytes());
}
