//! Finding the assemblies to publicize.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

/// Collect all `.dll` and `.exe` files below `dir`, recursively and sorted.
///
/// Directories named `skip_dir` are not entered, so a rerun over the same tree does not
/// pick up its own output.
///
/// # Errors
/// Returns [`crate::Error::ReadFailed`] if a directory cannot be listed.
pub fn collect_assemblies(dir: &Path, skip_dir: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_recursive(dir, skip_dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_recursive(dir: &Path, skip_dir: &str, files: &mut Vec<PathBuf>) -> Result<()> {
    let read_failed = |source| Error::ReadFailed {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_failed)? {
        let path = entry.map_err(read_failed)?.path();
        if path.is_dir() {
            if !skip_dir.is_empty() && path.file_name().is_some_and(|name| name == skip_dir) {
                log::debug!("Skipping output directory {}", path.display());
                continue;
            }
            collect_recursive(&path, skip_dir, files)?;
        } else if is_assembly_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Returns true if the path has a `.dll` or `.exe` extension, in any case.
#[must_use]
pub fn is_assembly_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dll") || ext.eq_ignore_ascii_case("exe"))
}
