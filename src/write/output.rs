//! Memory-mapped output file.
//!
//! The [`Output`] type maps a freshly created file of the final size so the serializer
//! can write directly into it. A file that is dropped without [`Output::finalize`] is
//! removed again, so a failed serialization never leaves a partial file behind.

use std::path::{Path, PathBuf};

use memmap2::{MmapMut, MmapOptions};

use crate::{Error, Result};

/// A memory-mapped file being written.
pub struct Output {
    mmap: MmapMut,
    target_path: PathBuf,
    finalized: bool,
}

impl Output {
    /// Create (or truncate) `target_path` with `size` bytes and map it for writing.
    ///
    /// # Errors
    /// Returns [`crate::Error::WriteFailed`] if the file cannot be created, sized or
    /// mapped.
    pub fn create<P: AsRef<Path>>(target_path: P, size: u64) -> Result<Self> {
        let target_path = target_path.as_ref().to_path_buf();

        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&target_path)
            .map_err(|error| Error::write_failed(&target_path, error))?;

        if let Err(error) = file.set_len(size) {
            let _ = std::fs::remove_file(&target_path);
            return Err(Error::write_failed(&target_path, error));
        }

        let mmap = match unsafe { MmapOptions::new().map_mut(&file) } {
            Ok(mmap) => mmap,
            Err(error) => {
                let _ = std::fs::remove_file(&target_path);
                return Err(Error::write_failed(&target_path, error));
            }
        };

        Ok(Self {
            mmap,
            target_path,
            finalized: false,
        })
    }

    /// The complete mapped file.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.mmap[..]
    }

    /// Flush the mapping and keep the file.
    ///
    /// The mapping is released when this returns, so the file can be renamed
    /// afterwards.
    ///
    /// # Errors
    /// Returns [`crate::Error::WriteFailed`] if the flush fails; the file is removed.
    pub fn finalize(mut self) -> Result<()> {
        self.mmap
            .flush()
            .map_err(|error| Error::write_failed(&self.target_path, error))?;

        self.finalized = true;
        Ok(())
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        if !self.finalized {
            // Incomplete output, the mapping goes away with self
            let _ = self.mmap.flush();
            let _ = std::fs::remove_file(&self.target_path);
        }
    }
}
