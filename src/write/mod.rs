//! Durable output of publicized modules.
//!
//! A module is never written straight to its final path. It is serialized into
//! `<output>.tmp` first; only then is an existing output deleted and the temporary file
//! moved into place. A reader of the output path therefore sees either the previous file
//! or the complete new one.
//!
//! Deleting and moving can fail transiently on platforms that release file handles
//! lazily (a scanner or the just-closed input still holding the file). Both steps are
//! retried according to a [`RetryPolicy`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use publicizer::{publicize, write_module, Module, RetryPolicy};
//! use std::path::Path;
//!
//! let mut module = Module::from_file(Path::new("Library.dll"))?;
//! publicize(&mut module);
//! write_module(module, Path::new("publicized/Library.dll"), &RetryPolicy::default())?;
//! # Ok::<(), publicizer::Error>(())
//! ```

mod output;

pub use output::Output;

use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use crate::{module::Module, Error, Result};

/// Bounded retry for filesystem operations that can fail while a handle is released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt
    pub attempts: u32,
    /// Pause before each retry
    pub delay: Duration,
    /// Pause after the input is released and before the output is replaced
    pub settle: Duration,
}

impl Default for RetryPolicy {
    /// One retry after 100 ms. Windows additionally waits 100 ms for the input handle
    /// to go away before touching the output.
    fn default() -> Self {
        RetryPolicy {
            attempts: 1,
            delay: Duration::from_millis(100),
            settle: if cfg!(windows) {
                Duration::from_millis(100)
            } else {
                Duration::ZERO
            },
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries or pauses.
    #[must_use]
    pub fn none() -> Self {
        RetryPolicy {
            attempts: 0,
            delay: Duration::ZERO,
            settle: Duration::ZERO,
        }
    }

    /// Run `operation`, retrying it up to [`RetryPolicy::attempts`] more times.
    ///
    /// # Errors
    /// Returns the error of the last attempt if every attempt fails.
    pub fn run<T>(&self, what: &str, mut operation: impl FnMut() -> io::Result<T>) -> io::Result<T> {
        let mut remaining = self.attempts;

        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(error) if remaining > 0 => {
                    log::warn!("{what} failed ({error}), retrying in {:?}", self.delay);
                    remaining -= 1;
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// The temporary file a module is serialized into before it replaces `output`.
#[must_use]
pub fn temp_path_for(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".tmp");
    output.with_file_name(name)
}

/// Serialize `module` to `output`, replacing any existing file.
///
/// The module is consumed: it is dropped, releasing its mapping of the input file,
/// before the output is replaced, so the output may be the input itself.
///
/// # Errors
/// Returns [`crate::Error::WriteFailed`] if the output directory cannot be created, the
/// temporary file cannot be written, or deleting or moving still fails after the
/// retries of `policy`.
pub fn write_module(module: Module, output: &Path, policy: &RetryPolicy) -> Result<()> {
    if let Some(directory) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(directory).map_err(|error| Error::write_failed(directory, error))?;
    }

    let temp_path = temp_path_for(output);
    if temp_path.exists() {
        log::debug!("Removing stale {}", temp_path.display());
        fs::remove_file(&temp_path).map_err(|error| Error::write_failed(&temp_path, error))?;
    }

    let mut temp = Output::create(&temp_path, module.len() as u64)?;
    module.write_to(temp.as_mut_slice())?;
    temp.finalize()?;

    drop(module);
    if !policy.settle.is_zero() {
        thread::sleep(policy.settle);
    }

    if output.exists() {
        policy
            .run("Deleting existing output", || fs::remove_file(output))
            .map_err(|error| Error::write_failed(output, error))?;
    }

    policy
        .run("Moving temporary file into place", || fs::rename(&temp_path, output))
        .map_err(|error| Error::write_failed(output, error))?;

    log::debug!("Wrote {}", output.display());
    Ok(())
}
