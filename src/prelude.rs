//! # publicizer Prelude
//!
//! The types and functions needed to publicize an assembly, for glob import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all publicizer operations
pub use crate::Error;

/// The result type used throughout publicizer
pub use crate::Result;

// ================================================================================================
// Module Graph
// ================================================================================================

/// A loaded module with its mutable type graph
pub use crate::Module;

/// Arena indices and entries of the type graph
pub use crate::module::{FieldDef, FieldIndex, MethodDef, MethodIndex, TypeDef, TypeIndex};

// ================================================================================================
// Publicizing
// ================================================================================================

/// Promote everything in a module and count the changes
pub use crate::publicize::{publicize, PublicizeStats};

/// Flattened type enumeration
pub use crate::publicize::flatten;

// ================================================================================================
// Output and Pipeline
// ================================================================================================

/// Durable writing with retry
pub use crate::write::{write_module, RetryPolicy};

/// Per-file processing
pub use crate::pipeline::{process_file, resolve_inputs, FileReport, PublicizeOptions};
