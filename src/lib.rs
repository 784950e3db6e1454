// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
// - 'file/physical.rs' uses mmap to map the input into memory
// - 'write/output.rs' uses mmap to map the output into memory

//! # publicizer
//!
//! Rewrites .NET PE assemblies so that every type, method and field they declare becomes
//! publicly accessible. The result is a copy of the assembly that other code can compile
//! against without reflection, while the program itself behaves exactly as before: only
//! visibility flags in the metadata tables change, CIL bodies and layout are untouched.
//!
//! ## Features
//!
//! - **Every nesting depth** - types nested arbitrarily deep are promoted to `nested public`
//! - **Event-safe** - fields backing an event keep their visibility, so the event and its
//!   field do not collide once both are public
//! - **Byte-preserving** - the output differs from the input only in the changed flags
//! - **Durable output** - the result is written to a temporary file and moved into place,
//!   with a bounded retry for files that are still held open
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use publicizer::prelude::*;
//! use std::path::Path;
//!
//! let report = process_file(Path::new("Game.dll"), &PublicizeOptions::default())?;
//! println!("{} -> {}: {}", report.input.display(), report.output.display(), report.stats);
//! # Ok::<(), publicizer::Error>(())
//! ```
//!
//! ### Step by step
//!
//! ```rust,no_run
//! use publicizer::{publicize, write_module, Module, RetryPolicy};
//! use std::path::Path;
//!
//! let mut module = Module::from_file(Path::new("Game.dll"))?;
//! let stats = publicize(&mut module);
//! println!("Promoted {stats}");
//!
//! write_module(module, Path::new("out/Game.dll"), &RetryPolicy::default())?;
//! # Ok::<(), publicizer::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - ECMA-335 headers, streams and the tables the publicizer reads
//! - [`module`] - the mutable type graph and its re-serialization
//! - [`publicize`](mod@publicize) - type enumeration, event-field filtering and promotion
//! - [`write`] - durable output through `<output>.tmp`
//! - [`pipeline`] and [`discovery`] - per-file processing and input collection
//! - [`Error`] and [`Result`] - error handling, with [`Error::exit_code`] for the CLI
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use publicizer::{process_file, Error, PublicizeOptions};
//! use std::path::Path;
//!
//! match process_file(Path::new("Game.dll"), &PublicizeOptions::default()) {
//!     Ok(report) => println!("{}", report.stats),
//!     Err(Error::ReadFailed { path, .. }) => println!("Cannot read {}", path.display()),
//!     Err(Error::WriteFailed { path, .. }) => println!("Cannot write {}", path.display()),
//!     Err(e) => println!("Not a .NET module: {e} (exit code {})", e.exit_code()),
//! }
//! ```
#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use publicizer::prelude::*;
///
/// let mut module = Module::from_file("Game.dll".as_ref())?;
/// let stats = publicize(&mut module);
/// # Ok::<(), publicizer::Error>(())
/// ```
pub mod prelude;

/// Parsing of the ECMA-335 metadata a publicizer needs
///
/// This module reads the CLI header, the metadata root, the `#Strings` heap and the
/// metadata tables stream. Every table's position is computed so that the rows of
/// interest can be located and their flags patched in place.
///
/// # Key Components
///
/// - [`metadata::cor20header`] - CLR 2.0 header
/// - [`metadata::root`] - Metadata root and stream directory
/// - [`metadata::streams`] - `#Strings` heap and the tables stream header
/// - [`metadata::tables`] - Row layouts, coded indices and flag constants
/// - [`metadata::token`] - Metadata tokens
pub mod metadata;

/// The mutable type graph of a loaded module
pub mod module;

/// Making types, methods and fields public
pub mod publicize;

/// Writing modules to disk
pub mod write;

/// Processing a single input end to end
pub mod pipeline;

/// Collecting inputs from a directory tree
pub mod discovery;

/// `publicizer` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `publicizer` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use publicizer::{Error, Module};
///
/// match Module::from_file(std::path::Path::new("native.dll")) {
///     Ok(module) => println!("{} types", module.types().len()),
///     Err(Error::NotSupported) => println!("Not a .NET module"),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::{Error, EXIT_INVALID_MODULE, EXIT_READ_FAILED, EXIT_WRITE_FAILED};

/// Loaded image, memory-mapped or owned.
pub use file::File;

pub use discovery::{collect_assemblies, is_assembly_file};
pub use metadata::streams::{StreamHeader, Strings, TablesHeader};
pub use module::Module;
pub use pipeline::{
    output_path_for, process_file, resolve_inputs, FileReport, PublicizeOptions,
    DEFAULT_OUTPUT_SUBDIRECTORY,
};
pub use publicize::{flatten, publicize, PublicizeStats};
pub use write::{temp_path_for, write_module, RetryPolicy};
