//! Per-file processing: load, publicize, write.
//!
//! Inputs are processed one after another. An error aborts only the input it occurred
//! on; deciding whether to continue with the next one is up to the caller.

use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    discovery::collect_assemblies,
    module::Module,
    publicize::{publicize, PublicizeStats},
    write::{write_module, RetryPolicy},
    Error, Result,
};

/// Default name of the directory the output is written to, next to the input.
pub const DEFAULT_OUTPUT_SUBDIRECTORY: &str = "publicized_assemblies";

/// Where and how publicized assemblies are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicizeOptions {
    /// Appended to the file stem of every output
    pub suffix: String,
    /// Directory below the input's directory that receives the output
    pub output_subdirectory: String,
    /// Retry behaviour when replacing the output
    pub retry: RetryPolicy,
}

impl Default for PublicizeOptions {
    fn default() -> Self {
        PublicizeOptions {
            suffix: String::new(),
            output_subdirectory: DEFAULT_OUTPUT_SUBDIRECTORY.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome of publicizing one input.
#[derive(Clone, Debug, Serialize)]
pub struct FileReport {
    /// The assembly that was read
    pub input: PathBuf,
    /// The publicized copy that was written
    pub output: PathBuf,
    /// What was changed
    pub stats: PublicizeStats,
}

/// The output path for `input`: `<input dir>/<subdirectory>/<stem><suffix><ext>`.
#[must_use]
pub fn output_path_for(input: &Path, options: &PublicizeOptions) -> PathBuf {
    let mut name = input
        .file_stem()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(&options.suffix);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }

    input
        .parent()
        .unwrap_or(Path::new(""))
        .join(&options.output_subdirectory)
        .join(name)
}

/// The inputs named by `path`: the file itself, or every assembly below a directory.
///
/// # Errors
/// Returns [`crate::Error::ReadFailed`] if `path` does not exist or a directory cannot
/// be listed.
pub fn resolve_inputs(path: &Path, options: &PublicizeOptions) -> Result<Vec<PathBuf>> {
    if path.is_dir() {
        collect_assemblies(path, &options.output_subdirectory)
    } else if path.exists() {
        Ok(vec![path.to_path_buf()])
    } else {
        Err(not_found(path))
    }
}

/// Publicize `input` and write the result to [`output_path_for`].
///
/// # Errors
/// - [`crate::Error::ReadFailed`] if the input is missing or cannot be opened
/// - a parse error if it is not a .NET module
/// - [`crate::Error::WriteFailed`] if the output cannot be written
///
/// Nothing is written unless the input loaded successfully.
pub fn process_file(input: &Path, options: &PublicizeOptions) -> Result<FileReport> {
    if !input.is_file() {
        return Err(not_found(input));
    }

    let mut module = Module::from_file(input).map_err(|error| match error {
        Error::FileError(source) => Error::ReadFailed {
            path: input.to_path_buf(),
            source,
        },
        other => other,
    })?;

    let stats = publicize(&mut module);
    let output = output_path_for(input, options);
    write_module(module, &output, &options.retry)?;

    log::info!("{} -> {}: {stats}", input.display(), output.display());

    Ok(FileReport {
        input: input.to_path_buf(),
        output,
        stats,
    })
}

fn not_found(path: &Path) -> Error {
    Error::ReadFailed {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
    }
}
