//! PE file abstraction for .NET binaries.
//!
//! This module abstracts over the data source of an assembly (a memory-mapped file on
//! disk or an owned buffer) and exposes the handful of PE structures the publicizer needs:
//! the CLR runtime header directory and RVA to file offset translation.
//!
//! # Key Components
//!
//! - [`crate::file::File`] - PE image with .NET-specific accessors
//! - [`crate::file::Backend`] - Trait for different data sources
//! - [`crate::file::io`] - Little-endian read/write helpers
//!
//! # Examples
//!
//! ```rust,no_run
//! use publicizer::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("Library.dll"))?;
//! let (clr_rva, clr_size) = file.clr();
//! let clr_offset = file.rva_to_offset(clr_rva)?;
//! println!("CLR header at 0x{:x} ({} bytes)", clr_offset, clr_size);
//! # Ok::<(), publicizer::Error>(())
//! ```

pub mod io;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, GoblinErr, OutOfBounds},
    Result,
};
use goblin::pe::PE;
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

/// Source of the raw bytes of a PE image.
pub trait Backend: Send + Sync {
    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the complete data.
    fn data(&self) -> &[u8];

    /// Returns the total size of the data.
    fn len(&self) -> usize;
}

/// A loaded PE image that carries a CLR runtime header.
///
/// The parsed goblin [`PE`] borrows from the backend, so both live in one
/// self-referencing struct.
#[self_referencing]
pub struct File {
    data: Box<dyn Backend>,
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Memory-map and parse the PE file at `file`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened, [`crate::Error::Empty`]
    /// for empty files, and a parse error if it is not a PE image with a CLR header.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Parse a PE image held in memory.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for an empty buffer, and a parse error if it is not a
    /// PE image with a CLR header.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data: Box<dyn Backend> = Box::new(data);

        File::try_new(data, |data| match PE::parse(data.data()) {
            Ok(pe) => match pe.header.optional_header {
                Some(optional_header) => {
                    if optional_header
                        .data_directories
                        .get_clr_runtime_header()
                        .is_none()
                    {
                        Err(malformed_error!(
                            "File does not have a CLR runtime header directory"
                        ))
                    } else {
                        Ok(pe)
                    }
                }
                None => Err(malformed_error!("File does not have an OptionalHeader")),
            },
            Err(error) => Err(GoblinErr(error)),
        })
    }

    /// Total size of the image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns true if the image holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// RVA and size of the CLR runtime header, `(0, 0)` if absent.
    #[must_use]
    pub fn clr(&self) -> (usize, usize) {
        self.with_pe(|pe| {
            // Presence was verified during load
            let Some(optional_header) = pe.header.optional_header else {
                return (0, 0);
            };

            match optional_header.data_directories.get_clr_runtime_header() {
                Some(clr_dir) => (clr_dir.virtual_address as usize, clr_dir.size as usize),
                None => (0, 0),
            }
        })
    }

    /// The raw bytes of the image.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// `len` bytes of the image starting at file offset `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the image.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// Translate a relative virtual address to a file offset using the section table.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if no section contains `rva`.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva = u32::try_from(rva).map_err(|_| OutOfBounds)?;

        self.with_pe(|pe| {
            for section in &pe.sections {
                let extent = section.virtual_size.max(section.size_of_raw_data);
                let Some(section_max) = section.virtual_address.checked_add(extent) else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        extent
                    ));
                };

                if section.virtual_address <= rva && rva < section_max {
                    return Ok((rva - section.virtual_address) as usize
                        + section.pointer_to_raw_data as usize);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}
