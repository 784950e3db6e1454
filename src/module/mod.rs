//! The mutable module graph.
//!
//! A [`Module`] owns the loaded image and an arena of its types and members. Visibility
//! flags are changed on the arena entries; [`Module::serialize`] produces the original
//! image with every type, method and field flags word written back in place. No table
//! is re-encoded, so every other byte of the image is preserved.
//!
//! # Examples
//!
//! ```rust,no_run
//! use publicizer::Module;
//! use std::path::Path;
//!
//! let module = Module::from_file(Path::new("Library.dll"))?;
//! for index in module.top_level() {
//!     if let Some(type_def) = module.type_def(*index) {
//!         println!("{} ({} nested)", type_def.full_name(), type_def.nested().len());
//!     }
//! }
//! # Ok::<(), publicizer::Error>(())
//! ```

mod loader;
mod types;

pub use types::{
    EventDef, EventIndex, FieldDef, FieldIndex, MethodDef, MethodIndex, TypeDef, TypeIndex,
};

use std::path::{Path, PathBuf};

use crate::{
    file::{io::write_le_at, File},
    Error::OutOfBounds,
    Result,
};

/// A parsed .NET module with a mutable view of its type graph.
pub struct Module {
    file: File,
    path: Option<PathBuf>,
    types: Vec<TypeDef>,
    methods: Vec<MethodDef>,
    fields: Vec<FieldDef>,
    events: Vec<EventDef>,
    top_level: Vec<TypeIndex>,
}

impl Module {
    /// Load the module at `path`.
    ///
    /// The file stays memory-mapped until the module is dropped.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be mapped, and a parse error
    /// if it is not a .NET module.
    pub fn from_file(path: &Path) -> Result<Module> {
        let file = File::from_file(path)?;
        Self::load(file, Some(path.to_path_buf()))
    }

    /// Load a module from an in-memory image.
    ///
    /// # Errors
    /// Returns a parse error if `data` is not a .NET module.
    pub fn from_mem(data: Vec<u8>) -> Result<Module> {
        let file = File::from_mem(data)?;
        Self::load(file, None)
    }

    fn load(file: File, path: Option<PathBuf>) -> Result<Module> {
        let graph = loader::load(&file)?;

        log::debug!(
            "Loaded {} types, {} methods, {} fields, {} events",
            graph.types.len(),
            graph.methods.len(),
            graph.fields.len(),
            graph.events.len()
        );

        Ok(Module {
            file,
            path,
            types: graph.types,
            methods: graph.methods,
            fields: graph.fields,
            events: graph.events,
            top_level: graph.top_level,
        })
    }

    /// Types without an enclosing type, in declaration order. Includes `<Module>`.
    #[must_use]
    pub fn top_level(&self) -> &[TypeIndex] {
        &self.top_level
    }

    /// All types, top-level and nested, in `TypeDef` table order
    #[must_use]
    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    /// All methods in `MethodDef` table order
    #[must_use]
    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    /// All fields in `Field` table order
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// All events in `Event` table order
    #[must_use]
    pub fn events(&self) -> &[EventDef] {
        &self.events
    }

    /// The type at `index`, `None` if it does not exist.
    #[must_use]
    pub fn type_def(&self, index: TypeIndex) -> Option<&TypeDef> {
        self.types.get(index.0)
    }

    /// Mutable access to the type at `index`.
    pub fn type_def_mut(&mut self, index: TypeIndex) -> Option<&mut TypeDef> {
        self.types.get_mut(index.0)
    }

    /// The method at `index`, `None` if it does not exist.
    #[must_use]
    pub fn method(&self, index: MethodIndex) -> Option<&MethodDef> {
        self.methods.get(index.0)
    }

    /// Mutable access to the method at `index`.
    pub fn method_mut(&mut self, index: MethodIndex) -> Option<&mut MethodDef> {
        self.methods.get_mut(index.0)
    }

    /// The field at `index`, `None` if it does not exist.
    #[must_use]
    pub fn field(&self, index: FieldIndex) -> Option<&FieldDef> {
        self.fields.get(index.0)
    }

    /// Mutable access to the field at `index`.
    pub fn field_mut(&mut self, index: FieldIndex) -> Option<&mut FieldDef> {
        self.fields.get_mut(index.0)
    }

    /// The event at `index`, `None` if it does not exist.
    #[must_use]
    pub fn event(&self, index: EventIndex) -> Option<&EventDef> {
        self.events.get(index.0)
    }

    /// The file this module was loaded from, `None` for in-memory images.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory of the input file, where sibling dependencies of the module live.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    /// Size of the serialized image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.file.len()
    }

    /// Returns true if the serialized image is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the image, with the current visibility flags, into `target`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `target` is not exactly [`Module::len`]
    /// bytes long or a flags offset lies outside of it.
    pub fn write_to(&self, target: &mut [u8]) -> Result<()> {
        if target.len() != self.len() {
            return Err(OutOfBounds);
        }

        target.copy_from_slice(self.file.data());

        for type_def in &self.types {
            let mut offset = type_def.flags_offset;
            write_le_at::<u32>(target, &mut offset, type_def.flags)?;
        }

        // Method and field flags are 2-byte columns
        for (mut offset, flags) in self
            .methods
            .iter()
            .map(|method| (method.flags_offset, method.flags))
            .chain(self.fields.iter().map(|field| (field.flags_offset, field.flags)))
        {
            let flags = u16::try_from(flags).map_err(|_| OutOfBounds)?;
            write_le_at::<u16>(target, &mut offset, flags)?;
        }

        Ok(())
    }

    /// The image with the current visibility flags.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if a flags offset lies outside the image.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut image = vec![0u8; self.len()];
        self.write_to(&mut image)?;
        Ok(image)
    }
}
